//! Business views of the account and store-layout entities.
//!
//! These are what services accept and return; storage adapters convert
//! to and from their own row types.

pub mod account;
pub mod store;

pub use account::{Role, User};
pub use store::{Floor, Room, StoreSetting, Table, FEATURE_ROOM, FEATURE_TABLE};
