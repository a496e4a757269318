//! Migrator registering schema migrations in dependency order.
//! Account tables first, then store layout, then seeded preferences.
pub use sea_orm_migration::prelude::*;

mod m20240101_000001_create_role;
mod m20240101_000002_create_user;
mod m20240101_000003_create_floor;
mod m20240101_000004_create_table;
mod m20240101_000005_create_room;
mod m20240101_000006_create_store_pref;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_role::Migration),
            Box::new(m20240101_000002_create_user::Migration),
            Box::new(m20240101_000003_create_floor::Migration),
            Box::new(m20240101_000004_create_table::Migration),
            Box::new(m20240101_000005_create_room::Migration),
            Box::new(m20240101_000006_create_store_pref::Migration),
        ]
    }
}
