use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Preference key switching room status tracking on.
pub const FEATURE_ROOM: &str = "feature_room";
/// Preference key switching table status tracking on.
pub const FEATURE_TABLE: &str = "feature_table";

/// Store-wide preferences, key to raw string value.
pub type StoreSetting = BTreeMap<String, String>;

/// Floor of the store layout with denormalized resource counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub total_tables: u64,
    #[serde(default)]
    pub total_rooms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tables: Option<Vec<Table>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rooms: Option<Vec<Room>>,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Dine-in table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub id: i32,
    pub floor_id: i32,
    pub name: String,
    pub x_pos: f32,
    pub y_pos: f32,
    pub w_size: f32,
    pub h_size: f32,
    pub capacity: i32,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Bookable room.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: i32,
    pub floor_id: i32,
    pub name: String,
    pub x_pos: f32,
    pub y_pos: f32,
    pub w_size: f32,
    pub h_size: f32,
    pub capacity: i32,
    pub price: f32,
    #[serde(default)]
    pub created_at: Option<i64>,
    #[serde(default)]
    pub updated_at: Option<i64>,
}

/// Read a feature switch from the preference set.
///
/// Absent or unparsable values count as disabled. Accepts the usual boolean
/// spellings: `1`, `t`, `T`, `TRUE`, `true`, `True` and their false forms.
pub fn feature_enabled(prefs: &StoreSetting, key: &str) -> bool {
    match prefs.get(key).map(String::as_str) {
        Some("1" | "t" | "T" | "TRUE" | "true" | "True") => true,
        _ => false,
    }
}
