//! Colour tables: which object each pixel key becomes.
//!
//! A table is built once (from a builtin, a YAML file or a builder) and is
//! read-only afterwards. A key maps either to an object with its modifier, or
//! to background, which places nothing.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BaseError, Result};
use crate::types::{Colour, PixelKey};

use super::objects::{
    CUBE_GLASS, CUBE_ROOM, CUBE_SOLID, DEFAULT_OBJECT_ID, FREIGHTER_FLOOR, METAL_FLOOR,
    OLD_WOOD_FLOOR, PAVING, STONE_DOME_ROOF, STONE_FLOOR_TILE, WOOD_FLOOR_TILE, WOOD_ROOF,
};

/// The object a pixel key becomes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectKind {
    /// Object identifier, e.g. `^BUILDPAVING_BIG`
    pub object: String,

    /// Appearance modifier written to the record's user data
    #[serde(default)]
    pub modifier: u64,
}

impl ObjectKind {
    pub fn new(object: impl Into<String>, modifier: u64) -> Self {
        Self {
            object: object.into(),
            modifier,
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.object, self.modifier)
    }
}

/// Static mapping from pixel keys to objects or background.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorTable {
    /// Table name (builtin name or the file stem)
    pub name: String,

    /// `None` marks a background key
    entries: BTreeMap<PixelKey, Option<ObjectKind>>,
}

impl ColorTable {
    /// Look up a key. The outer `None` means the key is not in the table.
    pub fn get(&self, key: &PixelKey) -> Option<Option<&ObjectKind>> {
        self.entries.get(key).map(Option::as_ref)
    }

    /// Check if a key is present (as an object or as background).
    pub fn contains(&self, key: &PixelKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&PixelKey, Option<&ObjectKind>)> {
        self.entries.iter().map(|(k, v)| (k, v.as_ref()))
    }

    /// Keys explicitly mapped to background.
    pub fn background_keys(&self) -> impl Iterator<Item = &PixelKey> {
        self.entries
            .iter()
            .filter(|(_, v)| v.is_none())
            .map(|(k, _)| k)
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A table mapping every index below `count` to the same object.
    pub fn uniform(
        name: impl Into<String>,
        count: usize,
        object: impl Into<String>,
        modifier: u64,
    ) -> Result<Self> {
        if count > 256 {
            return Err(BaseError::Parse {
                message: format!("Uniform table needs {} indices, at most 256 fit", count),
                help: None,
            });
        }

        let kind = ObjectKind::new(object, modifier);
        let mut builder = ColorTableBuilder::new(name);
        for index in 0..count {
            builder.map(PixelKey::Index(index as u8), kind.clone());
        }
        builder.build()
    }

    /// The builtin table for sprites quantized to the NES palette.
    ///
    /// Indexed in the palette's sheet order (see [`crate::types::NES_PALETTE`]).
    pub fn nes_default() -> Self {
        let white_tile = ObjectKind::new(PAVING, 0);
        let red_tile = ObjectKind::new(OLD_WOOD_FLOOR, 8);
        let black_tile = ObjectKind::new(FREIGHTER_FLOOR, 0);

        let rows: [ObjectKind; 64] = [
            // row 0: greys and bright hues
            ObjectKind::new(CUBE_SOLID, 15),
            ObjectKind::new(CUBE_SOLID, 14),
            ObjectKind::new(OLD_WOOD_FLOOR, 5),
            ObjectKind::new(PAVING, 5),
            ObjectKind::new(PAVING, 13),
            ObjectKind::new(PAVING, 0x0300_0007),
            red_tile,
            ObjectKind::new(PAVING, 0x0100_0008),
            // row 1
            ObjectKind::new(OLD_WOOD_FLOOR, 10),
            ObjectKind::new(WOOD_FLOOR_TILE, 0),
            ObjectKind::new(PAVING, 0x0200_000B),
            ObjectKind::new(PAVING, 11),
            ObjectKind::new(PAVING, 11),
            ObjectKind::new(OLD_WOOD_FLOOR, 12),
            black_tile.clone(),
            black_tile.clone(),
            // row 2
            black_tile.clone(),
            white_tile.clone(),
            ObjectKind::new(OLD_WOOD_FLOOR, 4),
            ObjectKind::new(OLD_WOOD_FLOOR, 6),
            ObjectKind::new(OLD_WOOD_FLOOR, 6),
            ObjectKind::new(PAVING, 0x0300_0007),
            ObjectKind::new(PAVING, 0x0100_0008),
            ObjectKind::new(DEFAULT_OBJECT_ID, 0),
            // row 3
            ObjectKind::new(STONE_FLOOR_TILE, 27),
            ObjectKind::new(STONE_FLOOR_TILE, 0x0100_0019),
            ObjectKind::new(PAVING, 0x0100_000B),
            ObjectKind::new(WOOD_FLOOR_TILE, 12),
            ObjectKind::new(WOOD_FLOOR_TILE, 12),
            ObjectKind::new(PAVING, 3),
            ObjectKind::new(PAVING, 14),
            black_tile.clone(),
            // row 4
            black_tile.clone(),
            white_tile,
            ObjectKind::new(PAVING, 3),
            ObjectKind::new(PAVING, 0x0100_0007),
            ObjectKind::new(PAVING, 0x0100_0007),
            ObjectKind::new(PAVING, 0x0100_0007),
            ObjectKind::new(PAVING, 0x0100_0007),
            ObjectKind::new(STONE_FLOOR_TILE, 24),
            // row 5
            ObjectKind::new(STONE_FLOOR_TILE, 25),
            ObjectKind::new(STONE_FLOOR_TILE, 24),
            ObjectKind::new(STONE_FLOOR_TILE, 30),
            ObjectKind::new(STONE_FLOOR_TILE, 30),
            ObjectKind::new(STONE_FLOOR_TILE, 30),
            ObjectKind::new(WOOD_ROOF, 78),
            ObjectKind::new(PAVING, 0x0100_0007),
            ObjectKind::new(METAL_FLOOR, 50),
            // row 6
            black_tile.clone(),
            ObjectKind::new(PAVING, 0x0300_0008),
            ObjectKind::new(PAVING, 0x0300_0008),
            ObjectKind::new(PAVING, 8),
            ObjectKind::new(WOOD_ROOF, 0x0100_004D),
            ObjectKind::new(PAVING, 11),
            ObjectKind::new(PAVING, 0x0300_000B),
            ObjectKind::new(PAVING, 0x0300_000B),
            // row 7: dark hues and blacks
            ObjectKind::new(PAVING, 4),
            ObjectKind::new(PAVING, 5),
            ObjectKind::new(OLD_WOOD_FLOOR, 6),
            ObjectKind::new(OLD_WOOD_FLOOR, 6),
            ObjectKind::new(PAVING, 0x0300_000B),
            black_tile.clone(),
            black_tile.clone(),
            black_tile,
        ];

        let entries = rows
            .into_iter()
            .enumerate()
            .map(|(index, kind)| (PixelKey::Index(index as u8), Some(kind)))
            .collect();

        Self {
            name: "nes".to_string(),
            entries,
        }
    }

    /// The builtin table for unquantized classic console sprites.
    ///
    /// Sky blue and the grey outline colour are background.
    pub fn sprite_colours() -> Self {
        let entries: [(Colour, Option<ObjectKind>); 19] = [
            // sky background
            (Colour::rgb(146, 144, 255), None),
            (Colour::rgb(181, 49, 32), Some(ObjectKind::new(STONE_DOME_ROOF, 34))),
            (Colour::rgb(107, 109, 0), Some(ObjectKind::new(WOOD_FLOOR_TILE, 88))),
            (Colour::rgb(234, 158, 34), Some(ObjectKind::new(STONE_FLOOR_TILE, 0))),
            (Colour::new(0, 0, 0, 0), Some(ObjectKind::new(FREIGHTER_FLOOR, 0))),
            (Colour::rgb(0, 0, 0), Some(ObjectKind::new(FREIGHTER_FLOOR, 0))),
            (Colour::rgb(0, 112, 236), Some(ObjectKind::new(CUBE_GLASS, 0))),
            (Colour::rgb(0, 232, 216), Some(ObjectKind::new(CUBE_ROOM, 0))),
            (Colour::rgb(252, 216, 168), Some(ObjectKind::new(STONE_FLOOR_TILE, 0))),
            (Colour::new(255, 255, 255, 0), Some(ObjectKind::new(PAVING, 0))),
            (Colour::rgb(252, 252, 252), Some(ObjectKind::new(PAVING, 0))),
            (Colour::rgb(252, 152, 56), Some(ObjectKind::new(STONE_FLOOR_TILE, 0))),
            (Colour::rgb(200, 76, 12), Some(ObjectKind::new(WOOD_FLOOR_TILE, 88))),
            (Colour::rgb(128, 208, 16), Some(ObjectKind::new(WOOD_ROOF, 46))),
            // outline grey
            (Colour::rgb(116, 116, 116), None),
            (Colour::rgb(216, 40, 0), Some(ObjectKind::new(PAVING, 0xFF00_0008))),
            (Colour::rgb(0, 148, 0), Some(ObjectKind::new(PAVING, 0xFF00_000B))),
            // green paver with rust applied
            (Colour::rgb(184, 248, 24), Some(ObjectKind::new(PAVING, 0x0100_000B))),
            (Colour::rgb(255, 255, 255), Some(ObjectKind::new(PAVING, 0))),
        ];

        Self {
            name: "sprites".to_string(),
            entries: entries
                .into_iter()
                .map(|(colour, kind)| (PixelKey::Colour(colour), kind))
                .collect(),
        }
    }

    /// Resolve a table name: `nes` and `sprites` are builtin, anything else
    /// is a YAML path.
    pub fn resolve(spec: &str) -> Result<Self> {
        match spec {
            "nes" => Ok(Self::nes_default()),
            "sprites" => Ok(Self::sprite_colours()),
            path => Self::load(Path::new(path)),
        }
    }

    /// Load a table from a YAML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BaseError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read colour table: {}", e),
        })?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table");

        Self::parse_yaml(name, &content)
    }

    /// Parse a table from YAML.
    ///
    /// ```yaml
    /// 0: { object: "^CUBE_SOLID", modifier: 15 }
    /// "#9290FF": ~          # background
    /// ```
    ///
    /// Integer keys are palette indices, quoted hex keys are exact colours.
    pub fn parse_yaml(name: impl Into<String>, content: &str) -> Result<Self> {
        let mapping: serde_yaml::Mapping =
            serde_yaml::from_str(content).map_err(|e| BaseError::Parse {
                message: format!("Invalid colour table: {}", e),
                help: Some("Check the table's YAML syntax; hex keys must be quoted".to_string()),
            })?;

        let mut builder = ColorTableBuilder::new(name);
        for (key, value) in mapping {
            let key = parse_table_key(&key)?;
            let kind: Option<ObjectKind> =
                serde_yaml::from_value(value).map_err(|e| BaseError::Parse {
                    message: format!("Invalid entry for {}: {}", key, e),
                    help: Some("Entries are { object, modifier } or ~ for background".to_string()),
                })?;

            match kind {
                Some(kind) => builder.map(key, kind),
                None => builder.background(key),
            };
        }

        builder.build()
    }
}

/// Parse a YAML key into a pixel key.
fn parse_table_key(key: &serde_yaml::Value) -> Result<PixelKey> {
    let invalid = |shown: String| BaseError::Parse {
        message: format!("Invalid colour table key: {}", shown),
        help: Some("Keys are palette indices (0-255) or quoted hex colours".to_string()),
    };

    match key {
        serde_yaml::Value::Number(n) => n
            .as_u64()
            .and_then(|i| u8::try_from(i).ok())
            .map(PixelKey::Index)
            .ok_or_else(|| invalid(n.to_string())),
        serde_yaml::Value::String(s) => {
            if let Ok(index) = s.trim().parse::<u8>() {
                return Ok(PixelKey::Index(index));
            }
            Colour::from_hex(s).map(PixelKey::Colour)
        }
        other => Err(invalid(format!("{:?}", other))),
    }
}

/// Builder for constructing colour tables.
///
/// Duplicate keys are rejected at build time.
#[derive(Debug)]
pub struct ColorTableBuilder {
    name: String,
    definitions: Vec<(PixelKey, Option<ObjectKind>)>,
}

impl ColorTableBuilder {
    /// Create a new table builder.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            definitions: Vec::new(),
        }
    }

    /// Map a key to an object.
    pub fn map(&mut self, key: impl Into<PixelKey>, kind: ObjectKind) -> &mut Self {
        self.definitions.push((key.into(), Some(kind)));
        self
    }

    /// Mark a key as background.
    pub fn background(&mut self, key: impl Into<PixelKey>) -> &mut Self {
        self.definitions.push((key.into(), None));
        self
    }

    /// Build the table.
    pub fn build(self) -> Result<ColorTable> {
        let mut entries = BTreeMap::new();

        for (key, kind) in self.definitions {
            match entries.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(kind);
                }
                Entry::Occupied(_) => {
                    return Err(BaseError::Parse {
                        message: format!("Duplicate key {} in colour table '{}'", key, self.name),
                        help: Some("Each colour or index may appear only once".to_string()),
                    });
                }
            }
        }

        Ok(ColorTable {
            name: self.name,
            entries,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nes_default_is_total() {
        let table = ColorTable::nes_default();
        assert_eq!(table.len(), 64);
        for index in 0..64u8 {
            assert!(table.contains(&PixelKey::Index(index)), "missing {}", index);
        }
        assert_eq!(table.background_keys().count(), 0);
    }

    #[test]
    fn test_nes_default_entries() {
        let table = ColorTable::nes_default();
        assert_eq!(
            table.get(&PixelKey::Index(0)),
            Some(Some(&ObjectKind::new(CUBE_SOLID, 15)))
        );
        assert_eq!(
            table.get(&PixelKey::Index(5)),
            Some(Some(&ObjectKind::new(PAVING, 50331655)))
        );
        assert_eq!(
            table.get(&PixelKey::Index(47)),
            Some(Some(&ObjectKind::new(METAL_FLOOR, 50)))
        );
        assert_eq!(table.get(&PixelKey::Index(64)), None);
    }

    #[test]
    fn test_nes_default_follows_quantized_colours() {
        use crate::render::Quantizer;
        use crate::types::Palette;

        let quantizer = Quantizer::new(Palette::nes());
        let table = ColorTable::nes_default();
        let object_for = |colour: Colour| {
            let key = PixelKey::Index(quantizer.nearest(colour));
            table.get(&key).flatten().cloned()
        };

        assert_eq!(object_for(Colour::rgb(188, 188, 188)), Some(ObjectKind::new(CUBE_SOLID, 14)));
        assert_eq!(object_for(Colour::rgb(0, 120, 248)), Some(ObjectKind::new(OLD_WOOD_FLOOR, 5)));
        assert_eq!(object_for(Colour::rgb(216, 0, 204)), Some(ObjectKind::new(PAVING, 0x0300_0007)));
        assert_eq!(object_for(Colour::BLACK), Some(ObjectKind::new(FREIGHTER_FLOOR, 0)));
        assert_eq!(object_for(Colour::rgb(252, 252, 252)), Some(ObjectKind::new(PAVING, 0)));
    }

    #[test]
    fn test_sprite_colours_background() {
        let table = ColorTable::sprite_colours();
        let sky = PixelKey::Colour(Colour::rgb(146, 144, 255));
        assert_eq!(table.get(&sky), Some(None));
        assert_eq!(table.background_keys().count(), 2);

        let red = PixelKey::Colour(Colour::rgb(216, 40, 0));
        assert_eq!(
            table.get(&red),
            Some(Some(&ObjectKind::new(PAVING, 4278190088)))
        );
    }

    #[test]
    fn test_uniform_table() {
        let table = ColorTable::uniform("flat", 64, STONE_FLOOR_TILE, 0).unwrap();
        assert_eq!(table.len(), 64);
        assert!(table.iter().all(|(_, kind)| kind.map(|k| k.object.as_str()) == Some(STONE_FLOOR_TILE)));
        assert!(ColorTable::uniform("too-big", 257, STONE_FLOOR_TILE, 0).is_err());
    }

    #[test]
    fn test_builder_rejects_duplicates() {
        let mut builder = ColorTableBuilder::new("dup");
        builder
            .map(3u8, ObjectKind::new(PAVING, 0))
            .background(3u8);
        assert!(builder.build().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r##"
0: { object: "^CUBE_SOLID", modifier: 15 }
"1": { object: "^T_FLOOR" }
"#9290FF": ~
"#FFFFFF00": { object: "^BUILDPAVING_BIG", modifier: 4 }
"##;

        let table = ColorTable::parse_yaml("custom", yaml).unwrap();
        assert_eq!(table.len(), 4);
        assert_eq!(
            table.get(&PixelKey::Index(0)),
            Some(Some(&ObjectKind::new(CUBE_SOLID, 15)))
        );
        assert_eq!(
            table.get(&PixelKey::Index(1)),
            Some(Some(&ObjectKind::new(WOOD_FLOOR_TILE, 0)))
        );
        assert_eq!(
            table.get(&PixelKey::Colour(Colour::rgb(146, 144, 255))),
            Some(None)
        );
        assert_eq!(
            table.get(&PixelKey::Colour(Colour::new(255, 255, 255, 0))),
            Some(Some(&ObjectKind::new(PAVING, 4)))
        );
    }

    #[test]
    fn test_parse_yaml_bad_key() {
        assert!(ColorTable::parse_yaml("bad", "300: { object: \"^T_FLOOR\" }").is_err());
        assert!(ColorTable::parse_yaml("bad", "\"teal\": { object: \"^T_FLOOR\" }").is_err());
    }

    #[test]
    fn test_parse_yaml_bad_entry() {
        assert!(ColorTable::parse_yaml("bad", "0: { modifier: 3 }").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("castle.yaml");
        std::fs::write(&path, "2: { object: \"^S_FLOOR\", modifier: 27 }\n").unwrap();

        let table = ColorTable::load(&path).unwrap();
        assert_eq!(table.name, "castle");
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_resolve_builtin() {
        assert_eq!(ColorTable::resolve("nes").unwrap(), ColorTable::nes_default());
        assert_eq!(ColorTable::resolve("sprites").unwrap(), ColorTable::sprite_colours());
    }
}
