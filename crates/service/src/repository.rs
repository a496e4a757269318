//! Storage capabilities the services depend on.
//!
//! Services only ever see these traits; every adapter (SeaORM, test doubles)
//! reports "no matching row" as [`RepoError::NoRows`] and every other
//! failure as [`RepoError::Storage`].

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::StoreSetting;

/// Predicate selector for `find` / `all_where`, carrying its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindWith {
    Id(i32),
    /// Foreign key of the parent row (e.g. the floor of a table).
    RelationId(i32),
    Name(String),
    Username(String),
    Email(String),
    Phone(String),
}

impl FindWith {
    fn column(&self) -> &'static str {
        match self {
            FindWith::Id(_) => "id",
            FindWith::RelationId(_) => "relation_id",
            FindWith::Name(_) => "name",
            FindWith::Username(_) => "username",
            FindWith::Email(_) => "email",
            FindWith::Phone(_) => "phone",
        }
    }
}

impl fmt::Display for FindWith {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FindWith::Id(v) | FindWith::RelationId(v) => write!(f, "{} = {}", self.column(), v),
            FindWith::Name(v) | FindWith::Username(v) | FindWith::Email(v) | FindWith::Phone(v) => {
                write!(f, "{} = {:?}", self.column(), v)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepoError {
    #[error("no rows in result set")]
    NoRows,
    #[error("storage error: {0}")]
    Storage(String),
}

impl RepoError {
    pub fn storage(e: impl fmt::Display) -> Self {
        RepoError::Storage(e.to_string())
    }

    pub fn unsupported(entity: &str, by: &FindWith) -> Self {
        RepoError::Storage(format!("{entity} cannot be looked up by {}", by.column()))
    }
}

pub type RepoResult<T> = Result<T, RepoError>;

/// CRUD capability over one entity type.
#[async_trait]
pub trait GenericRepository<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    async fn all(&self) -> RepoResult<Vec<T>>;
    async fn find(&self, by: FindWith) -> RepoResult<T>;
    /// Persist a new entity, returning it with its generated identity.
    async fn create(&self, item: T) -> RepoResult<T>;
    /// Whole-entity replace.
    async fn update(&self, item: T) -> RepoResult<T>;
    async fn delete(&self, item: &T) -> RepoResult<()>;
}

/// CRUD plus "all rows belonging to a parent".
#[async_trait]
pub trait RelationalRepository<T>: GenericRepository<T>
where
    T: Send + Sync + 'static,
{
    async fn all_where(&self, by: FindWith) -> RepoResult<Vec<T>>;
}

/// Key/value store preferences.
#[async_trait]
pub trait PreferenceRepository: Send + Sync {
    async fn all(&self) -> RepoResult<StoreSetting>;
    /// Single-entry setting for `key`, `NoRows` when the key does not exist.
    async fn find(&self, key: &str) -> RepoResult<StoreSetting>;
    /// Replace the value of `key`, returning the updated single entry.
    async fn update(&self, key: &str, value: &str) -> RepoResult<StoreSetting>;
}
