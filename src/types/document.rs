//! Base save-data documents as exported by save editors.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::error::{BaseError, Result};
use crate::validation::validate_anchor_document;

use super::PlacementRecord;

/// Key of the object collection in a base document.
pub const OBJECTS_KEY: &str = "Objects";

/// An in-memory base document.
///
/// Everything except the object collection is carried through untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct SaveDocument {
    root: Value,
}

impl SaveDocument {
    /// Wrap an already-decoded JSON value.
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Parse a document from a JSON string.
    pub fn parse(content: &str) -> Result<Self> {
        let root = serde_json::from_str(content).map_err(|e| BaseError::Parse {
            message: format!("Invalid base JSON: {}", e),
            help: Some("Export the base again from the save editor".to_string()),
        })?;
        Ok(Self { root })
    }

    /// Load a document from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| BaseError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read base data: {}", e),
        })?;
        Self::parse(&content)
    }

    /// The raw JSON root.
    pub fn as_value(&self) -> &Value {
        &self.root
    }

    /// The object collection, if present.
    pub fn objects(&self) -> Option<&Vec<Value>> {
        self.root.get(OBJECTS_KEY).and_then(Value::as_array)
    }

    /// Validate the document and decode its anchor (the first object).
    pub fn anchor(&self, anchor_id: &str) -> Result<PlacementRecord> {
        validate_anchor_document(&self.root, anchor_id)?;

        let first = self
            .objects()
            .and_then(|objects| objects.first())
            .ok_or_else(|| BaseError::InvalidAnchorData {
                message: "Objects array is empty".to_string(),
            })?;

        PlacementRecord::from_json(first).map_err(|e| BaseError::InvalidAnchorData {
            message: format!("Anchor object is malformed: {}", e),
        })
    }

    /// Append placements to the object collection.
    pub fn append(&mut self, records: &[PlacementRecord]) -> Result<()> {
        let objects = self
            .root
            .get_mut(OBJECTS_KEY)
            .and_then(Value::as_array_mut)
            .ok_or_else(|| BaseError::InvalidAnchorData {
                message: "Objects array in base data was not found".to_string(),
            })?;

        objects.extend(records.iter().map(PlacementRecord::to_json));
        Ok(())
    }

    /// Serialize with 4-space indentation, like the save editor writes.
    pub fn to_string_pretty(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.root.serialize(&mut ser).map_err(|e| BaseError::Parse {
            message: format!("Failed to serialize base data: {}", e),
            help: None,
        })?;

        String::from_utf8(buf).map_err(|e| BaseError::Parse {
            message: format!("Serialized base data is not UTF-8: {}", e),
            help: None,
        })
    }

    /// Write the document to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_string_pretty()?;
        fs::write(path, content).map_err(|e| BaseError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to write base data: {}", e),
        })
    }
}
