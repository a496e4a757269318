//! Composition root: one lazily built instance of every repository and
//! service for the lifetime of the process.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::debug;

use crate::account::AccountService;
use crate::cache::Cache;
use crate::domain::{Floor, Role, Room, Table, User};
use crate::hash::HashProvider;
use crate::repository::{GenericRepository, PreferenceRepository, RelationalRepository};
use crate::store::{StorePreferenceService, StoreService};

/// Storage backend able to build each repository.
///
/// The provider calls each method at most once.
pub trait RepositoryFactory: Send + Sync {
    fn roles(&self) -> Arc<dyn GenericRepository<Role>>;
    fn users(&self) -> Arc<dyn GenericRepository<User>>;
    fn floors(&self) -> Arc<dyn GenericRepository<Floor>>;
    fn tables(&self) -> Arc<dyn RelationalRepository<Table>>;
    fn rooms(&self) -> Arc<dyn RelationalRepository<Room>>;
    fn prefs(&self) -> Arc<dyn PreferenceRepository>;
}

/// Built once at startup and shared by reference with every handler.
///
/// Each accessor constructs its value on first use; concurrent first callers
/// block on the same initialization and all receive the same `Arc`.
pub struct Provider {
    factory: Arc<dyn RepositoryFactory>,
    hasher: Arc<dyn HashProvider>,
    cache: Arc<dyn Cache>,

    roles: OnceCell<Arc<dyn GenericRepository<Role>>>,
    users: OnceCell<Arc<dyn GenericRepository<User>>>,
    floors: OnceCell<Arc<dyn GenericRepository<Floor>>>,
    tables: OnceCell<Arc<dyn RelationalRepository<Table>>>,
    rooms: OnceCell<Arc<dyn RelationalRepository<Room>>>,
    prefs: OnceCell<Arc<dyn PreferenceRepository>>,

    account_service: OnceCell<Arc<AccountService>>,
    store_service: OnceCell<Arc<StoreService>>,
    store_pref_service: OnceCell<Arc<StorePreferenceService>>,
}

impl Provider {
    pub fn new(
        factory: Arc<dyn RepositoryFactory>,
        hasher: Arc<dyn HashProvider>,
        cache: Arc<dyn Cache>,
    ) -> Self {
        Self {
            factory,
            hasher,
            cache,
            roles: OnceCell::new(),
            users: OnceCell::new(),
            floors: OnceCell::new(),
            tables: OnceCell::new(),
            rooms: OnceCell::new(),
            prefs: OnceCell::new(),
            account_service: OnceCell::new(),
            store_service: OnceCell::new(),
            store_pref_service: OnceCell::new(),
        }
    }

    pub fn cache(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache)
    }

    pub fn role_repository(&self) -> Arc<dyn GenericRepository<Role>> {
        Arc::clone(self.roles.get_or_init(|| {
            debug!(repository = "role", "constructing");
            self.factory.roles()
        }))
    }

    pub fn user_repository(&self) -> Arc<dyn GenericRepository<User>> {
        Arc::clone(self.users.get_or_init(|| {
            debug!(repository = "user", "constructing");
            self.factory.users()
        }))
    }

    pub fn floor_repository(&self) -> Arc<dyn GenericRepository<Floor>> {
        Arc::clone(self.floors.get_or_init(|| {
            debug!(repository = "floor", "constructing");
            self.factory.floors()
        }))
    }

    pub fn table_repository(&self) -> Arc<dyn RelationalRepository<Table>> {
        Arc::clone(self.tables.get_or_init(|| {
            debug!(repository = "table", "constructing");
            self.factory.tables()
        }))
    }

    pub fn room_repository(&self) -> Arc<dyn RelationalRepository<Room>> {
        Arc::clone(self.rooms.get_or_init(|| {
            debug!(repository = "room", "constructing");
            self.factory.rooms()
        }))
    }

    pub fn pref_repository(&self) -> Arc<dyn PreferenceRepository> {
        Arc::clone(self.prefs.get_or_init(|| {
            debug!(repository = "store_pref", "constructing");
            self.factory.prefs()
        }))
    }

    pub fn account_service(&self) -> Arc<AccountService> {
        Arc::clone(self.account_service.get_or_init(|| {
            Arc::new(AccountService::new(
                self.role_repository(),
                self.user_repository(),
                Arc::clone(&self.hasher),
            ))
        }))
    }

    pub fn store_service(&self) -> Arc<StoreService> {
        Arc::clone(self.store_service.get_or_init(|| {
            Arc::new(StoreService::new(
                self.floor_repository(),
                self.table_repository(),
                self.room_repository(),
            ))
        }))
    }

    pub fn store_pref_service(&self) -> Arc<StorePreferenceService> {
        Arc::clone(
            self.store_pref_service
                .get_or_init(|| Arc::new(StorePreferenceService::new(self.pref_repository()))),
        )
    }
}
