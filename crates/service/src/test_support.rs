#![cfg(test)]
//! Scripted test doubles for the storage, hash and cache capabilities.
//!
//! Failures are injected per operation and stay in effect until the double
//! is dropped; call counters let tests assert that a guarded call never ran.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::{Cache, CacheError};
use crate::domain::{Floor, Role, Room, StoreSetting, Table, User};
use crate::hash::{HashError, HashProvider};
use crate::repository::{
    FindWith, GenericRepository, PreferenceRepository, RelationalRepository, RepoError, RepoResult,
};

/// Row type the scripted repository can store.
pub trait Record: Clone + Send + Sync + 'static {
    fn id(&self) -> i32;
    fn set_id(&mut self, id: i32);
    fn matches(&self, by: &FindWith) -> bool;
}

impl Record for Role {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id
    }
    fn matches(&self, by: &FindWith) -> bool {
        match by {
            FindWith::Id(id) => self.id == *id,
            FindWith::Name(name) => &self.name == name,
            _ => false,
        }
    }
}

impl Record for User {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id
    }
    fn matches(&self, by: &FindWith) -> bool {
        match by {
            FindWith::Id(id) => self.id == *id,
            FindWith::RelationId(role_id) => self.role_id == *role_id,
            FindWith::Name(name) => &self.name == name,
            FindWith::Username(username) => &self.username == username,
            FindWith::Email(email) => self.email.as_ref() == Some(email),
            FindWith::Phone(phone) => self.phone.as_ref() == Some(phone),
        }
    }
}

impl Record for Floor {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id
    }
    fn matches(&self, by: &FindWith) -> bool {
        match by {
            FindWith::Id(id) => self.id == *id,
            FindWith::Name(name) => &self.name == name,
            _ => false,
        }
    }
}

impl Record for Table {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id
    }
    fn matches(&self, by: &FindWith) -> bool {
        match by {
            FindWith::Id(id) => self.id == *id,
            FindWith::RelationId(floor_id) => self.floor_id == *floor_id,
            FindWith::Name(name) => &self.name == name,
            _ => false,
        }
    }
}

impl Record for Room {
    fn id(&self) -> i32 {
        self.id
    }
    fn set_id(&mut self, id: i32) {
        self.id = id
    }
    fn matches(&self, by: &FindWith) -> bool {
        match by {
            FindWith::Id(id) => self.id == *id,
            FindWith::RelationId(floor_id) => self.floor_id == *floor_id,
            FindWith::Name(name) => &self.name == name,
            _ => false,
        }
    }
}

/// In-memory repository with injectable failures.
pub struct ScriptedRepo<T> {
    rows: Mutex<Vec<T>>,
    last_written: Mutex<Option<T>>,
    fail_all: Mutex<Option<RepoError>>,
    fail_find: Mutex<Option<RepoError>>,
    fail_update: Mutex<Option<RepoError>>,
    fail_delete: Mutex<Option<RepoError>>,
    /// `None` finder means every `all_where` call fails.
    fail_all_where: Mutex<Option<(Option<FindWith>, RepoError)>>,
    delete_calls: AtomicUsize,
}

impl<T> Default for ScriptedRepo<T> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            last_written: Mutex::new(None),
            fail_all: Mutex::new(None),
            fail_find: Mutex::new(None),
            fail_update: Mutex::new(None),
            fail_delete: Mutex::new(None),
            fail_all_where: Mutex::new(None),
            delete_calls: AtomicUsize::new(0),
        }
    }
}

impl<T: Record> ScriptedRepo<T> {
    pub fn with_rows(rows: Vec<T>) -> Self {
        let repo = Self::default();
        *repo.rows.lock().unwrap() = rows;
        repo
    }

    pub fn rows(&self) -> Vec<T> {

        self.rows.lock().unwrap().clone()

    }
    pub fn last_written(&self) -> Option<T> {
        self.last_written.lock().unwrap().clone()
    }
    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    pub fn fail_all(&self, e: RepoError) {

        *self.fail_all.lock().unwrap() = Some(e)

    }
    pub fn fail_find(&self, e: RepoError) {
        *self.fail_find.lock().unwrap() = Some(e)
    }
    pub fn fail_update(&self, e: RepoError) {
        *self.fail_update.lock().unwrap() = Some(e)
    }
    pub fn fail_delete(&self, e: RepoError) {
        *self.fail_delete.lock().unwrap() = Some(e)
    }
    pub fn fail_all_where(&self, e: RepoError) {
        *self.fail_all_where.lock().unwrap() = Some((None, e))
    }
    pub fn fail_all_where_on(&self, by: FindWith, e: RepoError) {
        *self.fail_all_where.lock().unwrap() = Some((Some(by), e))
    }

    fn injected(slot: &Mutex<Option<RepoError>>) -> RepoResult<()> {
        match slot.lock().unwrap().clone() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl<T: Record> GenericRepository<T> for ScriptedRepo<T> {
    async fn all(&self) -> RepoResult<Vec<T>> {
        Self::injected(&self.fail_all)?;
        Ok(self.rows())
    }

    async fn find(&self, by: FindWith) -> RepoResult<T> {
        Self::injected(&self.fail_find)?;
        self.rows
            .lock()
            .unwrap()
            .iter()
            .find(|row| row.matches(&by))
            .cloned()
            .ok_or(RepoError::NoRows)
    }

    async fn create(&self, item: T) -> RepoResult<T> {
        *self.last_written.lock().unwrap() = Some(item.clone());
        let mut rows = self.rows.lock().unwrap();
        let mut created = item;
        if created.id() == 0 {
            let next = rows.iter().map(Record::id).max().unwrap_or(0) + 1;
            created.set_id(next);
        }
        rows.push(created.clone());
        Ok(created)
    }

    async fn update(&self, item: T) -> RepoResult<T> {
        *self.last_written.lock().unwrap() = Some(item.clone());
        Self::injected(&self.fail_update)?;
        let mut rows = self.rows.lock().unwrap();
        let slot = rows.iter_mut().find(|row| row.id() == item.id()).ok_or(RepoError::NoRows)?;
        *slot = item.clone();
        Ok(item)
    }

    async fn delete(&self, item: &T) -> RepoResult<()> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        Self::injected(&self.fail_delete)?;
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|row| row.id() != item.id());
        if rows.len() == before {
            return Err(RepoError::NoRows);
        }
        Ok(())
    }
}

#[async_trait]
impl<T: Record> RelationalRepository<T> for ScriptedRepo<T> {
    async fn all_where(&self, by: FindWith) -> RepoResult<Vec<T>> {
        if let Some((target, e)) = self.fail_all_where.lock().unwrap().clone() {
            if target.as_ref().map_or(true, |t| *t == by) {
                return Err(e);
            }
        }
        Ok(self.rows.lock().unwrap().iter().filter(|row| row.matches(&by)).cloned().collect())
    }
}

/// In-memory preference repository with injectable failures.
#[derive(Default)]
pub struct ScriptedPrefs {
    entries: Mutex<StoreSetting>,
    fail_all: Mutex<Option<RepoError>>,
    fail_find: Mutex<Option<RepoError>>,
    fail_update: Mutex<Option<RepoError>>,
    update_calls: AtomicUsize,
}

impl ScriptedPrefs {
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let prefs = Self::default();
        *prefs.entries.lock().unwrap() =
            entries.into_iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        prefs
    }

    pub fn entries(&self) -> StoreSetting {

        self.entries.lock().unwrap().clone()

    }
    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
    pub fn fail_all(&self, e: RepoError) {
        *self.fail_all.lock().unwrap() = Some(e)
    }
    pub fn fail_find(&self, e: RepoError) {
        *self.fail_find.lock().unwrap() = Some(e)
    }
    pub fn fail_update(&self, e: RepoError) {
        *self.fail_update.lock().unwrap() = Some(e)
    }
}

#[async_trait]
impl PreferenceRepository for ScriptedPrefs {
    async fn all(&self) -> RepoResult<StoreSetting> {
        if let Some(e) = self.fail_all.lock().unwrap().clone() {
            return Err(e);
        }
        Ok(self.entries())
    }

    async fn find(&self, key: &str) -> RepoResult<StoreSetting> {
        if let Some(e) = self.fail_find.lock().unwrap().clone() {
            return Err(e);
        }
        let entries = self.entries.lock().unwrap();
        let value = entries.get(key).ok_or(RepoError::NoRows)?;
        Ok(StoreSetting::from([(key.to_string(), value.clone())]))
    }

    async fn update(&self, key: &str, value: &str) -> RepoResult<StoreSetting> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = self.fail_update.lock().unwrap().clone() {
            return Err(e);
        }
        let mut entries = self.entries.lock().unwrap();
        let slot = entries.get_mut(key).ok_or(RepoError::NoRows)?;
        *slot = value.to_string();
        Ok(StoreSetting::from([(key.to_string(), value.to_string())]))
    }
}

/// Deterministic hasher: digest is `hashed:<plaintext>`.
#[derive(Default)]
pub struct FakeHasher {
    fail_hash: bool,
    fail_compare: bool,
    hash_calls: AtomicUsize,
}

impl FakeHasher {
    pub fn failing_hash() -> Self {
        Self { fail_hash: true, ..Default::default() }
    }
    pub fn failing_compare() -> Self {
        Self { fail_compare: true, ..Default::default() }
    }
    pub fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }
}

impl HashProvider for FakeHasher {
    fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_hash {
            return Err(HashError::Hash("entropy unavailable".into()));
        }
        Ok(format!("hashed:{plaintext}"))
    }

    fn compare(&self, plaintext: &str, digest: &str) -> Result<bool, HashError> {
        if self.fail_compare {
            return Err(HashError::Verify("corrupt digest".into()));
        }
        Ok(digest == format!("hashed:{plaintext}"))
    }
}

/// Cache double that records writes and can fail reads with a backend error.
#[derive(Default)]
pub struct ScriptedCache {
    entries: Mutex<HashMap<String, (String, Option<Duration>)>>,
    fail_get: Mutex<Option<CacheError>>,
    fail_set_prefix: Mutex<Option<String>>,
    set_calls: AtomicUsize,
}

impl ScriptedCache {
    pub fn fail_get(&self, e: CacheError) {
        *self.fail_get.lock().unwrap() = Some(e)
    }
    /// Fail every `set` whose key starts with `prefix`.
    pub fn fail_set_with_prefix(&self, prefix: &str) {
        *self.fail_set_prefix.lock().unwrap() = Some(prefix.to_string())
    }
    pub fn set_calls(&self) -> usize {
        self.set_calls.load(Ordering::SeqCst)
    }
    pub fn entry(&self, key: &str) -> Option<(String, Option<Duration>)> {
        self.entries.lock().unwrap().get(key).cloned()
    }
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().unwrap().keys().cloned().collect();
        keys.sort();
        keys
    }
    pub fn insert(&self, key: &str, value: &str) {
        self.entries.lock().unwrap().insert(key.to_string(), (value.to_string(), None));
    }
}

#[async_trait]
impl Cache for ScriptedCache {
    async fn get(&self, key: &str) -> Result<String, CacheError> {
        if let Some(e) = self.fail_get.lock().unwrap().clone() {
            return Err(e);
        }
        self.entries.lock().unwrap().get(key).map(|(v, _)| v.clone()).ok_or(CacheError::Missing)
    }

    async fn set(&self, key: &str, value: String, ttl: Option<Duration>) -> Result<(), CacheError> {
        self.set_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(prefix) = self.fail_set_prefix.lock().unwrap().as_deref() {
            if key.starts_with(prefix) {
                return Err(CacheError::Backend("READONLY".into()));
            }
        }
        self.entries.lock().unwrap().insert(key.to_string(), (value, ttl));
        Ok(())
    }
}
