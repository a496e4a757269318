//! SeaORM entities backing the account and store-layout tables.

pub mod errors;
pub mod db;
pub mod role;
pub mod user;
pub mod floor;
pub mod table;
pub mod room;
pub mod store_pref;

/// Current unix timestamp in seconds, the format of every `created_at` /
/// `updated_at` column.
pub fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}
