//! Game object identifiers and limits.

/// Most objects the game allows in a single base.
pub const MAX_BASE_OBJECTS: usize = 3000;

/// The base flag, which anchors every generated placement.
pub const BASE_FLAG_ID: &str = "^BASE_FLAG";

pub const STONE_DOME_ROOF: &str = "^S_ROOF5";
pub const WOOD_FLOOR_TILE: &str = "^T_FLOOR";
pub const STONE_FLOOR_TILE: &str = "^S_FLOOR";
pub const PAVING: &str = "^BUILDPAVING_BIG";
pub const OLD_WOOD_FLOOR: &str = "^W_FLOOR";
pub const CUBE_SOLID: &str = "^CUBE_SOLID";
pub const CUBE_GLASS: &str = "^CUBEGLASS";
pub const CUBE_ROOM: &str = "^CUBEROOM";
pub const FREIGHTER_FLOOR: &str = "^F_FLOOR";
pub const WOOD_ROOF: &str = "^T_ROOF6";
pub const METAL_FLOOR: &str = "^M_FLOOR";

/// The "standard" object used when every colour should become a plain tile.
pub const DEFAULT_OBJECT_ID: &str = STONE_FLOOR_TILE;
