//! Pixel key to object resolution.

use crate::error::{BaseError, Result};
use crate::types::PixelKey;

use super::table::{ColorTable, ObjectKind};

/// Resolves pixel keys against one colour table.
///
/// Unknown keys are errors, never background: a colour the table does not
/// know means the table and the palette have drifted apart.
#[derive(Debug, Clone, Copy)]
pub struct ColorResolver<'a> {
    table: &'a ColorTable,
}

impl<'a> ColorResolver<'a> {
    pub fn new(table: &'a ColorTable) -> Self {
        Self { table }
    }

    /// The table this resolver reads.
    pub fn table(&self) -> &'a ColorTable {
        self.table
    }

    /// Resolve a key at a (column, row) pixel position.
    ///
    /// Returns `Ok(None)` for background keys.
    pub fn resolve_at(&self, key: PixelKey, column: u32, row: u32) -> Result<Option<&'a ObjectKind>> {
        self.table
            .get(&key)
            .ok_or(BaseError::UnmappedColor { key, column, row })
    }

    /// Resolve a key with no pixel position attached.
    pub fn resolve(&self, key: PixelKey) -> Result<Option<&'a ObjectKind>> {
        self.resolve_at(key, 0, 0)
    }
}
