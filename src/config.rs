//! Project configuration (pxbase.yaml).
//!
//! Every field is optional; command-line flags override whatever the file
//! sets, and the file overrides the builtin defaults.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{BaseError, Result};
use crate::mapping::{PlacementOptions, BASE_FLAG_ID, DEFAULT_TILE_SPACING, MAX_BASE_OBJECTS};
use crate::render::{ColourMetric, DitherMethod};

/// Config filename looked for in the working directory.
pub const CONFIG_FILENAME: &str = "pxbase.yaml";

/// How sprite pixels are keyed into the colour table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SpriteMode {
    /// Quantize to the reference palette and look up indices
    #[default]
    Indexed,
    /// Look up exact RGBA colours
    Rgba,
}

/// Project configuration loaded from pxbase.yaml.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ObjectID the first object of the base must have.
    pub anchor_id: String,

    /// Object limit for one base.
    pub max_objects: usize,

    /// World distance between neighbouring tiles.
    pub tile_spacing: f64,

    /// Height above the anchor for the whole layer.
    pub vertical_lift: f64,

    /// Reference palette: `nes` or a PNG path.
    pub palette: String,

    /// Colour table: `nes`, `sprites` or a YAML path. Defaults by mode.
    pub table: Option<String>,

    pub mode: SpriteMode,

    pub dither: DitherMethod,

    pub metric: ColourMetric,

    /// Skip fully transparent pixels.
    pub transparency: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            anchor_id: BASE_FLAG_ID.to_string(),
            max_objects: MAX_BASE_OBJECTS,
            tile_spacing: DEFAULT_TILE_SPACING,
            vertical_lift: 0.0,
            palette: "nes".to_string(),
            table: None,
            mode: SpriteMode::default(),
            dither: DitherMethod::default(),
            metric: ColourMetric::default(),
            transparency: true,
        }
    }
}

impl Config {
    /// Load config from a YAML file.
    ///
    /// Relative palette and table paths are taken relative to the file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| BaseError::Io {
            path: path.to_path_buf(),
            message: format!("Failed to read config: {}", e),
        })?;

        let mut config = Self::parse(&content)?;
        if let Some(dir) = path.parent() {
            config.rebase(dir);
        }
        Ok(config)
    }

    /// Parse config from a YAML string.
    pub fn parse(content: &str) -> Result<Self> {
        // An empty file is a valid, all-default config.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(content).map_err(|e| BaseError::Parse {
            message: format!("Invalid config: {}", e),
            help: Some(format!("Check {} syntax", CONFIG_FILENAME)),
        })
    }

    /// Load `path` if given, else `pxbase.yaml` in the working directory if
    /// it exists, else the defaults.
    pub fn discover(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let local = PathBuf::from(CONFIG_FILENAME);
                if local.is_file() {
                    Self::load(&local)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// The colour table to use, falling back to the builtin for the mode.
    pub fn table_spec(&self) -> &str {
        match (&self.table, self.mode) {
            (Some(table), _) => table,
            (None, SpriteMode::Indexed) => "nes",
            (None, SpriteMode::Rgba) => "sprites",
        }
    }

    /// Pipeline options derived from this config.
    pub fn placement_options(&self) -> PlacementOptions {
        PlacementOptions {
            vertical_lift: self.vertical_lift,
            tile_spacing: self.tile_spacing,
            max_objects: self.max_objects,
        }
    }

    fn rebase(&mut self, dir: &Path) {
        if !is_builtin(&self.palette) {
            self.palette = rebase_path(dir, &self.palette);
        }
        if let Some(table) = &self.table {
            if !is_builtin(table) {
                self.table = Some(rebase_path(dir, table));
            }
        }
    }
}

fn is_builtin(spec: &str) -> bool {
    matches!(spec, "nes" | "sprites")
}

fn rebase_path(dir: &Path, path: &str) -> String {
    let p = Path::new(path);
    if p.is_absolute() || dir.as_os_str().is_empty() {
        path.to_string()
    } else {
        dir.join(p).to_string_lossy().into_owned()
    }
}
