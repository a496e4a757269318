//! Store layout (floors, tables, rooms) and store-wide preferences.

pub mod pref_service;
pub mod service;

pub use pref_service::StorePreferenceService;
pub use service::{FloorResource, StoreService};
