//! Create `users` table with FK to `roles`.
//!
//! A role referenced by any user cannot be removed (RESTRICT).
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(integer(Users::RoleId).not_null())
                    .col(string_len(Users::Name, 128).not_null())
                    .col(string_len(Users::Username, 64).unique_key().not_null())
                    .col(string_len_null(Users::Email, 255))
                    .col(string_len_null(Users::Phone, 32))
                    .col(string_len(Users::Password, 255).not_null())
                    .col(big_integer_null(Users::CreatedAt))
                    .col(big_integer_null(Users::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_users_role")
                            .from(Users::Table, Users::RoleId)
                            .to(Roles::Table, Roles::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Users { Table, Id, RoleId, Name, Username, Email, Phone, Password, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum Roles { Table, Id }
