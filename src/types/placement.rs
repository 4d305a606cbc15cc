//! Placement records as stored in a base's save data.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// A world-space vector used for positions.
pub type Vec3 = [f64; 3];

/// An orientation vector (`Up` or `At`) kept in the number form it was read in.
pub type Axis = [Number; 3];

/// Record timestamp. Save editors emit numbers, older exports strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(Number),
    Text(String),
}

impl From<i64> for Timestamp {
    fn from(t: i64) -> Self {
        Timestamp::Number(t.into())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Number(t) => write!(f, "{}", t),
            Timestamp::Text(t) => write!(f, "{}", t),
        }
    }
}

/// One placed object. Also used for the anchor (the base flag).
///
/// Orientation, timestamp and message are optional and stay absent when
/// the source object lacks them, so generated records carry exactly what
/// the anchor had.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementRecord {
    /// Object kind, e.g. `^BUILDPAVING_BIG`
    #[serde(rename = "ObjectID", default)]
    pub type_id: String,

    #[serde(rename = "Position", default)]
    pub position: Vec3,

    #[serde(rename = "Up", default, skip_serializing_if = "Option::is_none")]
    pub up: Option<Axis>,

    #[serde(rename = "At", default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<Axis>,

    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,

    /// Appearance selector (colour and material variants)
    #[serde(rename = "UserData", default)]
    pub modifier: u64,

    #[serde(rename = "Message", default, skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl PlacementRecord {
    /// Decode a record from a save-document object.
    pub fn from_json(value: &Value) -> serde_json::Result<Self> {
        Self::deserialize(value)
    }

    /// Encode as a save-document object. Absent optional fields are omitted.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        object.insert("ObjectID".into(), Value::from(self.type_id.as_str()));
        object.insert("Position".into(), Value::from(self.position.to_vec()));
        if let Some(up) = &self.up {
            object.insert("Up".into(), Value::from(axis_values(up)));
        }
        if let Some(facing) = &self.facing {
            object.insert("At".into(), Value::from(axis_values(facing)));
        }
        if let Some(timestamp) = &self.timestamp {
            let value = match timestamp {
                Timestamp::Number(t) => Value::Number(t.clone()),
                Timestamp::Text(t) => Value::String(t.clone()),
            };
            object.insert("Timestamp".into(), value);
        }
        object.insert("UserData".into(), Value::from(self.modifier));
        if let Some(annotation) = &self.annotation {
            object.insert("Message".into(), Value::from(annotation.as_str()));
        }
        Value::Object(object)
    }
}

fn axis_values(axis: &Axis) -> Vec<Value> {
    axis.iter().cloned().map(Value::Number).collect()
}
