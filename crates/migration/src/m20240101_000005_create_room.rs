//! Create `rooms` with FK to `floors`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rooms::Table)
                    .if_not_exists()
                    .col(pk_auto(Rooms::Id))
                    .col(integer(Rooms::FloorId).not_null())
                    .col(string_len(Rooms::Name, 64).not_null())
                    .col(float(Rooms::XPos).not_null())
                    .col(float(Rooms::YPos).not_null())
                    .col(float(Rooms::WSize).not_null())
                    .col(float(Rooms::HSize).not_null())
                    .col(integer(Rooms::Capacity).not_null())
                    .col(float(Rooms::Price).not_null())
                    .col(big_integer_null(Rooms::CreatedAt))
                    .col(big_integer_null(Rooms::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rooms_floor")
                            .from(Rooms::Table, Rooms::FloorId)
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
                    .name("idx_rooms_floor_id")
                    .table(Rooms::Table)
                    .col(Rooms::FloorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Rooms::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Rooms {
    Table,
    Id,
    FloorId,
    Name,
    XPos,
    YPos,
    WSize,
    HSize,
    Capacity,
    Price,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Floors { Table, Id }
