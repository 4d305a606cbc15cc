//! Placement record synthesis.

use crate::types::{PlacementRecord, Vec3};

use super::coords::add;

/// Build a placement next to the anchor.
///
/// Orientation, timestamp and message come from the anchor as they are,
/// including their absence; the returned record owns all of its data.
pub fn create_placement(
    anchor: &PlacementRecord,
    offset: Vec3,
    type_id: &str,
    modifier: u64,
) -> PlacementRecord {
    PlacementRecord {
        type_id: type_id.to_string(),
        position: add(anchor.position, offset),
        up: anchor.up.clone(),
        facing: anchor.facing.clone(),
        timestamp: anchor.timestamp.clone(),
        modifier,
        annotation: anchor.annotation.clone(),
    }
}
