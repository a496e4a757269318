//! One-shot startup step that warms the cache from persisted store
//! preferences.
//!
//! Best effort: every failure is logged and the remaining steps still run.
//! Nothing here is surfaced to the caller as an error.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{Cache, CacheError};
use crate::domain::store::feature_enabled;
use crate::domain::{Room, Table, FEATURE_ROOM, FEATURE_TABLE};
use crate::provider::Provider;
use crate::repository::{GenericRepository, PreferenceRepository, RelationalRepository, RepoResult};

/// Cache key holding the JSON snapshot of all store preferences.
pub const STORE_PREFS_KEY: &str = "store_prefs";
/// Value every resource status starts with.
pub const INITIAL_STATUS: &str = "0";

pub fn room_status_key(id: i32) -> String {
    format!("room_{id}_status")
}

pub fn table_status_key(id: i32) -> String {
    format!("table_{id}_status")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// Snapshot key already present; nothing was touched.
    AlreadySeeded,
    /// Cache lookup failed with something other than "missing".
    CacheUnavailable,
    /// Preferences could not be loaded from storage.
    PreferencesUnavailable,
    /// Seeding steps ran (individually they may still have failed).
    Seeded,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapReport {
    pub outcome: BootstrapOutcome,
    pub room_statuses: usize,
    pub table_statuses: usize,
    pub snapshot_written: bool,
}

impl BootstrapReport {
    fn stopped(outcome: BootstrapOutcome) -> Self {
        Self { outcome, room_statuses: 0, table_statuses: 0, snapshot_written: false }
    }
}

pub struct PreferenceBootstrap {
    cache: Arc<dyn Cache>,
    prefs: Arc<dyn PreferenceRepository>,
    rooms: Arc<dyn RelationalRepository<Room>>,
    tables: Arc<dyn RelationalRepository<Table>>,
}

impl PreferenceBootstrap {
    pub fn new(
        cache: Arc<dyn Cache>,
        prefs: Arc<dyn PreferenceRepository>,
        rooms: Arc<dyn RelationalRepository<Room>>,
        tables: Arc<dyn RelationalRepository<Table>>,
    ) -> Self {
        Self { cache, prefs, rooms, tables }
    }

    pub fn from_provider(provider: &Provider) -> Self {
        Self::new(
            provider.cache(),
            provider.pref_repository(),
            provider.room_repository(),
            provider.table_repository(),
        )
    }

    pub async fn run(&self) -> BootstrapReport {
        match self.cache.get(STORE_PREFS_KEY).await {
            Ok(_) => {
                debug!(key = STORE_PREFS_KEY, "store preferences already cached");
                return BootstrapReport::stopped(BootstrapOutcome::AlreadySeeded);
            }
            Err(CacheError::Missing) => {}
            Err(e) => {
                warn!(error = %e, "cache lookup failed; skipping preference bootstrap");
                return BootstrapReport::stopped(BootstrapOutcome::CacheUnavailable);
            }
        }

        let prefs = match self.prefs.all().await {
            Ok(prefs) => prefs,
            Err(e) => {
                warn!(error = %e, "store preferences unavailable; skipping preference bootstrap");
                return BootstrapReport::stopped(BootstrapOutcome::PreferencesUnavailable);
            }
        };

        let mut report = BootstrapReport::stopped(BootstrapOutcome::Seeded);

        if feature_enabled(&prefs, FEATURE_ROOM) {
            let ids = self.rooms.all().await.map(|rows| rows.iter().map(|r| r.id).collect());
            report.room_statuses = self.seed_statuses("room", ids, room_status_key).await;
        }

        if feature_enabled(&prefs, FEATURE_TABLE) {
            let ids = self.tables.all().await.map(|rows| rows.iter().map(|t| t.id).collect());
            report.table_statuses = self.seed_statuses("table", ids, table_status_key).await;
        }

        match serde_json::to_string(&prefs) {
            Ok(snapshot) => match self.cache.set(STORE_PREFS_KEY, snapshot, None).await {
                Ok(()) => report.snapshot_written = true,
                Err(e) => warn!(error = %e, "failed to cache store preferences"),
            },
            Err(e) => warn!(error = %e, "failed to serialize store preferences"),
        }

        info!(
            rooms = report.room_statuses,
            tables = report.table_statuses,
            snapshot = report.snapshot_written,
            "preference bootstrap finished"
        );
        report
    }

    async fn seed_statuses(
        &self,
        kind: &'static str,
        ids: RepoResult<Vec<i32>>,
        key_for: fn(i32) -> String,
    ) -> usize {
        let ids = match ids {
            Ok(ids) => ids,
            Err(e) => {
                warn!(kind, error = %e, "cannot load resources for status seeding");
                return 0;
            }
        };
        let mut written = 0;
        for id in ids {
            let key = key_for(id);
            match self.cache.set(&key, INITIAL_STATUS.to_string(), None).await {
                Ok(()) => written += 1,
                Err(e) => warn!(kind, %key, error = %e, "failed to seed status"),
            }
        }
        written
    }
}
