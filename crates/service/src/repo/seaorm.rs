//! SeaORM-backed repositories, one per entity, plus the factory the
//! provider builds them from.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, Set,
};

use models::errors::ModelError;
use models::{floor, now_unix, role, room, store_pref, table, user};

use crate::domain::{Floor, Role, Room, StoreSetting, Table, User};
use crate::provider::RepositoryFactory;
use crate::repository::{
    FindWith, GenericRepository, PreferenceRepository, RelationalRepository, RepoError, RepoResult,
};

/// Missing rows on update are reported by SeaORM as errors; fold them into
/// the `NoRows` sentinel.
fn db_err(e: DbErr) -> RepoError {
    match e {
        DbErr::RecordNotFound(_) | DbErr::RecordNotUpdated => RepoError::NoRows,
        other => RepoError::storage(other),
    }
}

impl From<ModelError> for RepoError {
    fn from(e: ModelError) -> Self {
        RepoError::storage(e)
    }
}

fn deleted(rows_affected: u64) -> RepoResult<()> {
    if rows_affected == 0 {
        return Err(RepoError::NoRows);
    }
    Ok(())
}

impl From<role::Model> for Role {
    fn from(m: role::Model) -> Self {
        Role { id: m.id, name: m.name, description: m.description, usage: 0 }
    }
}

impl From<role::WithUsage> for Role {
    fn from(r: role::WithUsage) -> Self {
        Role { id: r.id, name: r.name, description: r.description, usage: count(r.usage) }
    }
}

/// `COUNT(..)` comes back as a signed bigint.
fn count(n: i64) -> u64 {
    u64::try_from(n).unwrap_or_default()
}

impl From<(user::Model, Option<role::Model>)> for User {
    fn from((m, r): (user::Model, Option<role::Model>)) -> Self {
        User {
            id: m.id,
            role_id: m.role_id,
            name: m.name,
            username: m.username,
            email: m.email,
            phone: m.phone,
            password: m.password,
            role: r.map(Role::from),
        }
    }
}

impl From<floor::Model> for Floor {
    fn from(m: floor::Model) -> Self {
        Floor {
            id: m.id,
            name: m.name,
            created_at: m.created_at,
            updated_at: m.updated_at,
            ..Default::default()
        }
    }
}

impl From<floor::WithTotals> for Floor {
    fn from(f: floor::WithTotals) -> Self {
        Floor {
            id: f.id,
            name: f.name,
            total_tables: count(f.total_tables),
            total_rooms: count(f.total_rooms),
            created_at: f.created_at,
            updated_at: f.updated_at,
            ..Default::default()
        }
    }
}

impl From<table::Model> for Table {
    fn from(m: table::Model) -> Self {
        Table {
            id: m.id,
            floor_id: m.floor_id,
            name: m.name,
            x_pos: m.x_pos,
            y_pos: m.y_pos,
            w_size: m.w_size,
            h_size: m.h_size,
            capacity: m.capacity,
            kind: m.kind,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<room::Model> for Room {
    fn from(m: room::Model) -> Self {
        Room {
            id: m.id,
            floor_id: m.floor_id,
            name: m.name,
            x_pos: m.x_pos,
            y_pos: m.y_pos,
            w_size: m.w_size,
            h_size: m.h_size,
            capacity: m.capacity,
            price: m.price,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

pub struct SeaOrmRoleRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SeaOrmRoleRepository {
    async fn roles_where(&self, filter: Condition) -> RepoResult<Vec<Role>> {
        let rows = role::list_with_usage(&self.db, filter).await?;
        Ok(rows.into_iter().map(Role::from).collect())
    }
}

#[async_trait]
impl GenericRepository<Role> for SeaOrmRoleRepository {
    async fn all(&self) -> RepoResult<Vec<Role>> {
        self.roles_where(Condition::all()).await
    }

    async fn find(&self, by: FindWith) -> RepoResult<Role> {
        let filter = match &by {
            FindWith::Id(id) => Condition::all().add(role::Column::Id.eq(*id)),
            FindWith::Name(name) => Condition::all().add(role::Column::Name.eq(name.as_str())),
            other => return Err(RepoError::unsupported("role", other)),
        };
        self.roles_where(filter).await?.into_iter().next().ok_or(RepoError::NoRows)
    }

    async fn create(&self, item: Role) -> RepoResult<Role> {
        let am = role::ActiveModel {
            id: NotSet,
            name: Set(item.name),
            description: Set(item.description),
        };
        let m = am.insert(&*self.db).await.map_err(db_err)?;
        Ok(Role::from(m))
    }

    async fn update(&self, item: Role) -> RepoResult<Role> {
        let am = role::ActiveModel {
            id: Set(item.id),
            name: Set(item.name),
            description: Set(item.description),
        };
        let m = am.update(&*self.db).await.map_err(db_err)?;
        self.find(FindWith::Id(m.id)).await
    }

    async fn delete(&self, item: &Role) -> RepoResult<()> {
        let res = role::Entity::delete_by_id(item.id).exec(&*self.db).await.map_err(db_err)?;
        deleted(res.rows_affected)
    }
}

pub struct SeaOrmUserRepository {
    pub db: Arc<DatabaseConnection>,
}

#[async_trait]
impl GenericRepository<User> for SeaOrmUserRepository {
    async fn all(&self) -> RepoResult<Vec<User>> {
        let rows = user::Entity::find()
            .find_also_related(role::Entity)
            .order_by_asc(user::Column::Id)
            .all(&*self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find(&self, by: FindWith) -> RepoResult<User> {
        let select = user::Entity::find();
        let select = match by {
            FindWith::Id(id) => select.filter(user::Column::Id.eq(id)),
            FindWith::RelationId(role_id) => select.filter(user::Column::RoleId.eq(role_id)),
            FindWith::Name(name) => select.filter(user::Column::Name.eq(name)),
            FindWith::Username(username) => select.filter(user::Column::Username.eq(username)),
            FindWith::Email(email) => select.filter(user::Column::Email.eq(email)),
            FindWith::Phone(phone) => select.filter(user::Column::Phone.eq(phone)),
        };
        let row = select
            .find_also_related(role::Entity)
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(RepoError::NoRows)?;
        Ok(User::from(row))
    }

    async fn create(&self, item: User) -> RepoResult<User> {
        let now = now_unix();
        let am = user::ActiveModel {
            id: NotSet,
            role_id: Set(item.role_id),
            name: Set(item.name),
            username: Set(item.username),
            email: Set(item.email),
            phone: Set(item.phone),
            password: Set(item.password),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };
        let m = am.insert(&*self.db).await.map_err(db_err)?;
        Ok(User::from((m, None)))
    }

    async fn update(&self, item: User) -> RepoResult<User> {
        // empty password leaves the stored digest alone
        let password = if item.has_password() { Set(item.password) } else { NotSet };
        let am = user::ActiveModel {
            id: Set(item.id),
            role_id: Set(item.role_id),
            name: Set(item.name),
            username: Set(item.username),
            email: Set(item.email),
            phone: Set(item.phone),
            password,
            created_at: NotSet,
            updated_at: Set(Some(now_unix())),
        };
        let m = am.update(&*self.db).await.map_err(db_err)?;
        Ok(User::from((m, None)))
    }

    async fn delete(&self, item: &User) -> RepoResult<()> {
        let res = user::Entity::delete_by_id(item.id).exec(&*self.db).await.map_err(db_err)?;
        deleted(res.rows_affected)
    }
}

pub struct SeaOrmFloorRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SeaOrmFloorRepository {
    async fn floors_where(&self, filter: Condition) -> RepoResult<Vec<Floor>> {
        let rows = floor::list_with_totals(&self.db, filter).await?;
        Ok(rows.into_iter().map(Floor::from).collect())
    }
}

#[async_trait]
impl GenericRepository<Floor> for SeaOrmFloorRepository {
    async fn all(&self) -> RepoResult<Vec<Floor>> {
        self.floors_where(Condition::all()).await
    }

    async fn find(&self, by: FindWith) -> RepoResult<Floor> {
        let filter = match &by {
            FindWith::Id(id) => Condition::all().add(floor::Column::Id.eq(*id)),
            FindWith::Name(name) => Condition::all().add(floor::Column::Name.eq(name.as_str())),
            other => return Err(RepoError::unsupported("floor", other)),
        };
        self.floors_where(filter).await?.into_iter().next().ok_or(RepoError::NoRows)
    }

    async fn create(&self, item: Floor) -> RepoResult<Floor> {
        let now = now_unix();
        let am = floor::ActiveModel {
            id: NotSet,
            name: Set(item.name),
            created_at: Set(Some(now)),
            updated_at: Set(Some(now)),
        };
        let m = am.insert(&*self.db).await.map_err(db_err)?;
        Ok(Floor::from(m))
    }

    async fn update(&self, item: Floor) -> RepoResult<Floor> {
        let am = floor::ActiveModel {
            id: Set(item.id),
            name: Set(item.name),
            created_at: NotSet,
            updated_at: Set(Some(now_unix())),
        };
        let m = am.update(&*self.db).await.map_err(db_err)?;
        self.find(FindWith::Id(m.id)).await
    }

    async fn delete(&self, item: &Floor) -> RepoResult<()> {
        let res = floor::Entity::delete_by_id(item.id).exec(&*self.db).await.map_err(db_err)?;
        deleted(res.rows_affected)
    }
}

pub struct SeaOrmTableRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SeaOrmTableRepository {
    fn active(item: Table) -> table::ActiveModel {
        table::ActiveModel {
            id: NotSet,
            floor_id: Set(item.floor_id),
            name: Set(item.name),
            x_pos: Set(item.x_pos),
            y_pos: Set(item.y_pos),
            w_size: Set(item.w_size),
            h_size: Set(item.h_size),
            capacity: Set(item.capacity),
            kind: Set(item.kind),
            created_at: NotSet,
            updated_at: Set(Some(now_unix())),
        }
    }
}

#[async_trait]
impl GenericRepository<Table> for SeaOrmTableRepository {
    async fn all(&self) -> RepoResult<Vec<Table>> {
        let rows = table::Entity::find()
            .order_by_asc(table::Column::Id)
            .all(&*self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Table::from).collect())
    }

    async fn find(&self, by: FindWith) -> RepoResult<Table> {
        let select = match &by {
            FindWith::Id(id) => table::Entity::find_by_id(*id),
            FindWith::Name(name) => {
                table::Entity::find().filter(table::Column::Name.eq(name.as_str()))
            }
            other => return Err(RepoError::unsupported("table", other)),
        };
        let m = select.one(&*self.db).await.map_err(db_err)?.ok_or(RepoError::NoRows)?;
        Ok(Table::from(m))
    }

    async fn create(&self, item: Table) -> RepoResult<Table> {
        let mut am = Self::active(item);
        am.created_at = am.updated_at.clone();
        let m = am.insert(&*self.db).await.map_err(db_err)?;
        Ok(Table::from(m))
    }

    async fn update(&self, item: Table) -> RepoResult<Table> {
        let id = item.id;
        let mut am = Self::active(item);
        am.id = Set(id);
        let m = am.update(&*self.db).await.map_err(db_err)?;
        Ok(Table::from(m))
    }

    async fn delete(&self, item: &Table) -> RepoResult<()> {
        let res = table::Entity::delete_by_id(item.id).exec(&*self.db).await.map_err(db_err)?;
        deleted(res.rows_affected)
    }
}

#[async_trait]
impl RelationalRepository<Table> for SeaOrmTableRepository {
    async fn all_where(&self, by: FindWith) -> RepoResult<Vec<Table>> {
        let FindWith::RelationId(floor_id) = by else {
            return Err(RepoError::unsupported("table", &by));
        };
        let rows = table::Entity::find()
            .filter(table::Column::FloorId.eq(floor_id))
            .order_by_asc(table::Column::Id)
            .all(&*self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Table::from).collect())
    }
}

pub struct SeaOrmRoomRepository {
    pub db: Arc<DatabaseConnection>,
}

impl SeaOrmRoomRepository {
    fn active(item: Room) -> room::ActiveModel {
        room::ActiveModel {
            id: NotSet,
            floor_id: Set(item.floor_id),
            name: Set(item.name),
            x_pos: Set(item.x_pos),
            y_pos: Set(item.y_pos),
            w_size: Set(item.w_size),
            h_size: Set(item.h_size),
            capacity: Set(item.capacity),
            price: Set(item.price),
            created_at: NotSet,
            updated_at: Set(Some(now_unix())),
        }
    }
}

#[async_trait]
impl GenericRepository<Room> for SeaOrmRoomRepository {
    async fn all(&self) -> RepoResult<Vec<Room>> {
        let rows = room::Entity::find()
            .order_by_asc(room::Column::Id)
            .all(&*self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }

    async fn find(&self, by: FindWith) -> RepoResult<Room> {
        let select = match &by {
            FindWith::Id(id) => room::Entity::find_by_id(*id),
            FindWith::Name(name) => {
                room::Entity::find().filter(room::Column::Name.eq(name.as_str()))
            }
            other => return Err(RepoError::unsupported("room", other)),
        };
        let m = select.one(&*self.db).await.map_err(db_err)?.ok_or(RepoError::NoRows)?;
        Ok(Room::from(m))
    }

    async fn create(&self, item: Room) -> RepoResult<Room> {
        let mut am = Self::active(item);
        am.created_at = am.updated_at.clone();
        let m = am.insert(&*self.db).await.map_err(db_err)?;
        Ok(Room::from(m))
    }

    async fn update(&self, item: Room) -> RepoResult<Room> {
        let id = item.id;
        let mut am = Self::active(item);
        am.id = Set(id);
        let m = am.update(&*self.db).await.map_err(db_err)?;
        Ok(Room::from(m))
    }

    async fn delete(&self, item: &Room) -> RepoResult<()> {
        let res = room::Entity::delete_by_id(item.id).exec(&*self.db).await.map_err(db_err)?;
        deleted(res.rows_affected)
    }
}

#[async_trait]
impl RelationalRepository<Room> for SeaOrmRoomRepository {
    async fn all_where(&self, by: FindWith) -> RepoResult<Vec<Room>> {
        let FindWith::RelationId(floor_id) = by else {
            return Err(RepoError::unsupported("room", &by));
        };
        let rows = room::Entity::find()
            .filter(room::Column::FloorId.eq(floor_id))
            .order_by_asc(room::Column::Id)
            .all(&*self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Room::from).collect())
    }
}

pub struct SeaOrmStorePrefRepository {
    pub db: Arc<DatabaseConnection>,
}

#[async_trait]
impl PreferenceRepository for SeaOrmStorePrefRepository {
    async fn all(&self) -> RepoResult<StoreSetting> {
        let rows = store_pref::Entity::find().all(&*self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(|m| (m.key, m.value)).collect())
    }

    async fn find(&self, key: &str) -> RepoResult<StoreSetting> {
        let m = store_pref::Entity::find_by_id(key.to_string())
            .one(&*self.db)
            .await
            .map_err(db_err)?
            .ok_or(RepoError::NoRows)?;
        Ok(StoreSetting::from([(m.key, m.value)]))
    }

    async fn update(&self, key: &str, value: &str) -> RepoResult<StoreSetting> {
        let am = store_pref::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            created_at: NotSet,
            updated_at: Set(Some(now_unix())),
        };
        let m = am.update(&*self.db).await.map_err(db_err)?;
        Ok(StoreSetting::from([(m.key, m.value)]))
    }
}

/// Builds every repository over one shared connection pool.
#[derive(Clone)]
pub struct SeaOrmRepositories {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRepositories {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db: Arc::new(db) }
    }
}

impl RepositoryFactory for SeaOrmRepositories {
    fn roles(&self) -> Arc<dyn GenericRepository<Role>> {
        Arc::new(SeaOrmRoleRepository { db: Arc::clone(&self.db) })
    }

    fn users(&self) -> Arc<dyn GenericRepository<User>> {
        Arc::new(SeaOrmUserRepository { db: Arc::clone(&self.db) })
    }

    fn floors(&self) -> Arc<dyn GenericRepository<Floor>> {
        Arc::new(SeaOrmFloorRepository { db: Arc::clone(&self.db) })
    }

    fn tables(&self) -> Arc<dyn RelationalRepository<Table>> {
        Arc::new(SeaOrmTableRepository { db: Arc::clone(&self.db) })
    }

    fn rooms(&self) -> Arc<dyn RelationalRepository<Room>> {
        Arc::new(SeaOrmRoomRepository { db: Arc::clone(&self.db) })
    }

    fn prefs(&self) -> Arc<dyn PreferenceRepository> {
        Arc::new(SeaOrmStorePrefRepository { db: Arc::clone(&self.db) })
    }
}
