//! Create `tables` (dine-in tables) with FK to `floors`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tables::Table)
                    .if_not_exists()
                    .col(pk_auto(Tables::Id))
                    .col(integer(Tables::FloorId).not_null())
                    .col(string_len(Tables::Name, 64).not_null())
                    .col(float(Tables::XPos).not_null())
                    .col(float(Tables::YPos).not_null())
                    .col(float(Tables::WSize).not_null())
                    .col(float(Tables::HSize).not_null())
                    .col(integer(Tables::Capacity).not_null())
                    .col(string_len(Tables::Type, 32).not_null())
                    .col(big_integer_null(Tables::CreatedAt))
                    .col(big_integer_null(Tables::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tables_floor")
                            .from(Tables::Table, Tables::FloorId)
                            .to(Floors::Table, Floors::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tables_floor_id")
                    .table(Tables::Table)
                    .col(Tables::FloorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Tables::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Tables {
    Table,
    Id,
    FloorId,
    Name,
    XPos,
    YPos,
    WSize,
    HSize,
    Capacity,
    Type,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Floors { Table, Id }
