//! Colour table coverage checks.

use std::collections::BTreeMap;

use tracing::warn;

use crate::mapping::{ColorTable, TransparencyMask};
use crate::types::{Palette, PixelKey, Sprite};

use super::{Diagnostic, ValidationResult};

/// Check that an index table covers every index of a palette.
///
/// Missing indices are errors (the quantizer could produce them), background
/// entries are warnings, and indices past the end of the palette are
/// warnings since nothing can reach them.
pub fn check_table_coverage(table: &ColorTable, palette: &Palette) -> ValidationResult {
    let mut result = ValidationResult::new();

    for index in 0..palette.len() {
        let key = PixelKey::Index(index as u8);
        match table.get(&key) {
            None => {
                warn!(table = %table.name, index, "palette index missing from table");
                result.push(
                    Diagnostic::error(
                        "pxbase::table::unmapped",
                        format!(
                            "Palette '{}' index {} ({}) has no entry in table '{}'",
                            palette.name,
                            index,
                            palette.get(index as u8).unwrap_or_default(),
                            table.name
                        ),
                    )
                    .with_help("Add the index to the table, or map it to ~ for background"),
                );
            }
            Some(None) => result.warning(
                "pxbase::table::background",
                format!("Index {} is background and will place nothing", index),
            ),
            Some(Some(_)) => {}
        }
    }

    for (key, _) in table.iter() {
        if let PixelKey::Index(i) = key {
            if *i as usize >= palette.len() {
                result.warning(
                    "pxbase::table::unreachable",
                    format!(
                        "Index {} is past the end of palette '{}' ({} colours)",
                        i,
                        palette.name,
                        palette.len()
                    ),
                );
            }
        }
    }

    result
}

/// Check that every visible pixel of a sprite has a table entry.
///
/// Reports each missing key once, with the number of pixels using it.
pub fn check_sprite_coverage(
    sprite: &Sprite,
    table: &ColorTable,
    mask: Option<&TransparencyMask>,
) -> ValidationResult {
    let mut missing: BTreeMap<PixelKey, usize> = BTreeMap::new();

    for (offset, key) in sprite.pixels().iter().enumerate() {
        if mask.is_some_and(|m| m.is_transparent(offset)) {
            continue;
        }
        if !table.contains(key) {
            *missing.entry(*key).or_insert(0) += 1;
        }
    }

    let mut result = ValidationResult::new();
    for (key, count) in missing {
        result.push(
            Diagnostic::error(
                "pxbase::sprite::unmapped",
                format!("{} is used by {} pixel(s) but missing from table '{}'", key, count, table.name),
            )
            .with_help("Add the colour to the table, or quantize the sprite first"),
        );
    }

    result
}
