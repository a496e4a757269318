//! Create `floors` table.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Floors::Table)
                    .if_not_exists()
                    .col(pk_auto(Floors::Id))
                    .col(string_len(Floors::Name, 64).not_null())
                    .col(big_integer_null(Floors::CreatedAt))
                    .col(big_integer_null(Floors::UpdatedAt))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Floors::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Floors { Table, Id, Name, CreatedAt, UpdatedAt }
