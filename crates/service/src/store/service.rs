use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{Floor, Room, Table};
use crate::errors::ServiceError;
use crate::repository::{FindWith, GenericRepository, RelationalRepository};

/// Resource kind that can be laid out on a floor.
///
/// Each kind names the floor counter that says whether the floor has any,
/// where fetched rows are attached, and which repository serves them.
pub trait FloorResource: Sized + Send + Sync + 'static {
    const KIND: &'static str;

    fn count_on(floor: &Floor) -> u64;
    fn attach(floor: &mut Floor, items: Option<Vec<Self>>);
    fn repository(service: &StoreService) -> &Arc<dyn RelationalRepository<Self>>;
}

impl FloorResource for Table {
    const KIND: &'static str = "table";

    fn count_on(floor: &Floor) -> u64 {
        floor.total_tables
    }

    fn attach(floor: &mut Floor, items: Option<Vec<Self>>) {
        floor.tables = items;
    }

    fn repository(service: &StoreService) -> &Arc<dyn RelationalRepository<Self>> {
        &service.tables
    }
}

impl FloorResource for Room {
    const KIND: &'static str = "room";

    fn count_on(floor: &Floor) -> u64 {
        floor.total_rooms
    }

    fn attach(floor: &mut Floor, items: Option<Vec<Self>>) {
        floor.rooms = items;
    }

    fn repository(service: &StoreService) -> &Arc<dyn RelationalRepository<Self>> {
        &service.rooms
    }
}

/// Floor, table and room management.
pub struct StoreService {
    floors: Arc<dyn GenericRepository<Floor>>,
    tables: Arc<dyn RelationalRepository<Table>>,
    rooms: Arc<dyn RelationalRepository<Room>>,
}

impl StoreService {
    pub fn new(
        floors: Arc<dyn GenericRepository<Floor>>,
        tables: Arc<dyn RelationalRepository<Table>>,
        rooms: Arc<dyn RelationalRepository<Room>>,
    ) -> Self {
        Self { floors, tables, rooms }
    }

    pub async fn floor_list(&self) -> Result<Vec<Floor>, ServiceError> {
        Ok(self.floors.all().await?)
    }

    pub async fn add_floor(&self, floor: Floor) -> Result<Floor, ServiceError> {
        let created = self.floors.create(floor).await?;
        info!(floor_id = created.id, "floor_created");
        Ok(created)
    }

    pub async fn edit_floor(&self, floor: Floor) -> Result<Floor, ServiceError> {
        Ok(self.floors.update(floor).await?)
    }

    /// Delete a floor unless tables are still placed on it.
    #[instrument(skip(self, floor), fields(floor_id = floor.id))]
    pub async fn delete_floor(&self, floor: &Floor) -> Result<(), ServiceError> {
        let stored = self.floors.find(FindWith::Id(floor.id)).await?;
        if stored.total_tables >= 1 {
            debug!(total_tables = stored.total_tables, "floor still has tables");
            return Err(ServiceError::unable_to_delete());
        }
        self.floors.delete(&stored).await.map_err(ServiceError::internal)?;
        info!("floor_deleted");
        Ok(())
    }

    pub async fn table_list(&self) -> Result<Vec<Table>, ServiceError> {
        Ok(self.tables.all().await?)
    }

    pub async fn add_table(&self, table: Table) -> Result<Table, ServiceError> {
        Ok(self.tables.create(table).await?)
    }

    pub async fn edit_table(&self, table: Table) -> Result<Table, ServiceError> {
        Ok(self.tables.update(table).await?)
    }

    pub async fn delete_table(&self, table: &Table) -> Result<(), ServiceError> {
        let stored = self.tables.find(FindWith::Id(table.id)).await?;
        self.tables.delete(&stored).await.map_err(ServiceError::internal)
    }

    pub async fn room_list(&self) -> Result<Vec<Room>, ServiceError> {
        Ok(self.rooms.all().await?)
    }

    pub async fn add_room(&self, room: Room) -> Result<Room, ServiceError> {
        Ok(self.rooms.create(room).await?)
    }

    pub async fn edit_room(&self, room: Room) -> Result<Room, ServiceError> {
        Ok(self.rooms.update(room).await?)
    }

    pub async fn delete_room(&self, room: &Room) -> Result<(), ServiceError> {
        let stored = self.rooms.find(FindWith::Id(room.id)).await?;
        self.rooms.delete(&stored).await.map_err(ServiceError::internal)
    }

    /// Floors holding at least one `R`, each with its `R` rows attached.
    ///
    /// Floors without any `R` are left out. A floor whose rows cannot be
    /// fetched is still returned, with nothing attached.
    #[instrument(skip(self), fields(kind = R::KIND))]
    pub async fn floors_with<R: FloorResource>(&self) -> Result<Vec<Floor>, ServiceError> {
        let floors = self.floors.all().await.map_err(ServiceError::internal)?;
        let repo = R::repository(self);

        let mut out = Vec::new();
        for mut floor in floors.into_iter().filter(|f| R::count_on(f) >= 1) {
            let items = match repo.all_where(FindWith::RelationId(floor.id)).await {
                Ok(items) => Some(items),
                Err(e) => {
                    warn!(floor_id = floor.id, error = %e, "related rows unavailable");
                    None
                }
            };
            R::attach(&mut floor, items);
            out.push(floor);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::RepoError;
    use crate::test_support::ScriptedRepo;

    struct Fixture {
        floors: Arc<ScriptedRepo<Floor>>,
        tables: Arc<ScriptedRepo<Table>>,
        rooms: Arc<ScriptedRepo<Room>>,
        svc: StoreService,
    }

    fn fixture(floors: Vec<Floor>, tables: Vec<Table>, rooms: Vec<Room>) -> Fixture {
        let floors = Arc::new(ScriptedRepo::with_rows(floors));
        let tables = Arc::new(ScriptedRepo::with_rows(tables));
        let rooms = Arc::new(ScriptedRepo::with_rows(rooms));
        let svc = StoreService::new(floors.clone(), tables.clone(), rooms.clone());
        Fixture { floors, tables, rooms, svc }
    }

    fn floor(id: i32, total_tables: u64, total_rooms: u64) -> Floor {
        Floor { id, name: format!("floor-{id}"), total_tables, total_rooms, ..Default::default() }
    }

    fn table(id: i32, floor_id: i32) -> Table {
        Table {
            id,
            floor_id,
            name: format!("T{id}"),
            capacity: 4,
            kind: "square".into(),
            ..Default::default()
        }
    }

    fn room(id: i32, floor_id: i32) -> Room {
        Room {
            id,
            floor_id,
            name: format!("R{id}"),
            capacity: 8,
            price: 150.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn floors_with_tables_filters_and_attaches() {
        let fx = fixture(
            vec![floor(1, 1, 0), floor(2, 0, 0)],
            vec![table(10, 1), table(11, 2)],
            vec![],
        );
        let out = fx.svc.floors_with::<Table>().await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
        let tables = out[0].tables.as_ref().unwrap();
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].id, 10);
        assert!(out[0].rooms.is_none());
    }

    #[tokio::test]
    async fn floors_with_keeps_floor_when_sub_fetch_fails() {
        let fx = fixture(vec![floor(1, 1, 0), floor(2, 0, 0)], vec![table(10, 1)], vec![]);
        fx.tables.fail_all_where(RepoError::Storage("timeout".into()));

        let out = fx.svc.floors_with::<Table>().await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
        assert!(out[0].tables.clone().unwrap_or_default().is_empty());
    }

    #[tokio::test]
    async fn floors_with_degrades_per_floor() {
        let fx = fixture(
            vec![floor(1, 1, 0), floor(3, 2, 0)],
            vec![table(10, 1), table(30, 3), table(31, 3)],
            vec![],
        );
        fx.tables.fail_all_where_on(FindWith::RelationId(3), RepoError::Storage("boom".into()));

        let out = fx.svc.floors_with::<Table>().await.unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tables.as_ref().map(Vec::len), Some(1));
        assert!(out[1].tables.is_none());
    }

    #[tokio::test]
    async fn floors_with_rooms_uses_room_counter() {
        let fx = fixture(
            vec![floor(1, 3, 0), floor(2, 0, 1)],
            vec![table(10, 1)],
            vec![room(20, 2)],
        );
        let out = fx.svc.floors_with::<Room>().await.unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
        assert_eq!(out[0].rooms.as_ref().unwrap()[0].id, 20);
        assert!(out[0].tables.is_none());
    }

    #[tokio::test]
    async fn floors_with_fails_when_floor_list_fails() {
        let fx = fixture(vec![floor(1, 1, 1)], vec![], vec![]);
        fx.floors.fail_all(RepoError::NoRows);
        let err = fx.svc.floors_with::<Table>().await.unwrap_err();
        assert_eq!(err.code(), 500);
    }

    #[tokio::test]
    async fn delete_floor_with_tables_is_forbidden() {
        let fx = fixture(vec![floor(1, 1, 0)], vec![table(10, 1)], vec![]);
        let err = fx.svc.delete_floor(&floor(1, 0, 0)).await.unwrap_err();
        assert_eq!(err.code(), 403);
        assert_eq!(fx.floors.delete_calls(), 0);
    }

    #[tokio::test]
    async fn delete_empty_floor() {
        let fx = fixture(vec![floor(1, 0, 2)], vec![], vec![]);
        fx.svc.delete_floor(&floor(1, 0, 0)).await.unwrap();
        assert_eq!(fx.floors.delete_calls(), 1);
        assert_eq!(fx.svc.delete_floor(&floor(1, 0, 0)).await.unwrap_err().code(), 404);
    }

    #[tokio::test]
    async fn table_and_room_crud_pass_through() {
        let fx = fixture(vec![floor(1, 0, 0)], vec![], vec![]);

        let t = fx.svc.add_table(table(0, 1)).await.unwrap();
        assert_eq!(t.id, 1);
        let mut moved = t.clone();
        moved.x_pos = 12.5;
        assert_eq!(fx.svc.edit_table(moved).await.unwrap().x_pos, 12.5);
        assert_eq!(fx.svc.table_list().await.unwrap().len(), 1);
        fx.svc.delete_table(&t).await.unwrap();
        assert_eq!(fx.tables.delete_calls(), 1);

        let r = fx.svc.add_room(room(0, 1)).await.unwrap();
        assert_eq!(fx.svc.room_list().await.unwrap().len(), 1);
        fx.svc.delete_room(&r).await.unwrap();
        assert_eq!(fx.svc.delete_room(&r).await.unwrap_err().code(), 404);
        assert_eq!(fx.rooms.delete_calls(), 1);
    }

    #[tokio::test]
    async fn floor_crud_maps_storage_errors() {
        let fx = fixture(vec![], vec![], vec![]);
        let f = fx.svc.add_floor(floor(0, 0, 0)).await.unwrap();
        assert_eq!(fx.svc.floor_list().await.unwrap(), vec![f.clone()]);

        fx.floors.fail_update(RepoError::Storage("deadlock".into()));
        assert_eq!(fx.svc.edit_floor(f).await.unwrap_err().code(), 500);
    }
}
