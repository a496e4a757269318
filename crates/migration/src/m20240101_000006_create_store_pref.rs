//! Create `store_prefs` key/value table and seed the feature switches.
//!
//! Both features start disabled; the preference bootstrap only seeds
//! status entries for enabled features.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

const DEFAULT_PREFS: &[(&str, &str)] = &[("feature_room", "false"), ("feature_table", "false")];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StorePrefs::Table)
                    .if_not_exists()
                    .col(string_len(StorePrefs::Key, 64).primary_key())
                    .col(string_len(StorePrefs::Value, 255).not_null())
                    .col(big_integer_null(StorePrefs::CreatedAt))
                    .col(big_integer_null(StorePrefs::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        let mut seed = Query::insert();
        seed.into_table(StorePrefs::Table)
            .columns([StorePrefs::Key, StorePrefs::Value])
            .on_conflict(OnConflict::column(StorePrefs::Key).do_nothing().to_owned());
        for (key, value) in DEFAULT_PREFS {
            seed.values_panic([(*key).into(), (*value).into()]);
        }
        manager.exec_stmt(seed).await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(StorePrefs::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum StorePrefs { Table, Key, Value, CreatedAt, UpdatedAt }
