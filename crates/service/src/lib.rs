//! Business tier of the point-of-sale back office.
//! - Services apply business-rule guards on top of storage capabilities.
//! - Storage, hashing and caching are traits; SeaORM, Argon2 and moka back them.
//! - `Provider` wires one instance of everything for the process.

pub mod errors;
pub mod domain;
pub mod repository;
pub mod hash;
pub mod cache;
pub mod account;
pub mod store;
pub mod provider;
pub mod bootstrap;
pub mod repo;
#[cfg(test)]
pub mod test_support;

pub use bootstrap::{BootstrapOutcome, BootstrapReport, PreferenceBootstrap};
pub use errors::ServiceError;
pub use provider::{Provider, RepositoryFactory};
