//! Create `setting` table: unique string keys with audit metadata.
//!
//! Backs the service-area configuration; read on every serviceability check.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Setting::Table)
                    .if_not_exists()
                    .col(uuid(Setting::Id).primary_key())
                    .col(string_len(Setting::Key, 64).unique_key().not_null())
                    .col(text(Setting::Value).not_null())
                    .col(ColumnDef::new(Setting::Description).text().null())
                    .col(timestamp_with_time_zone(Setting::UpdatedAt).not_null())
                    .col(ColumnDef::new(Setting::UpdatedBy).uuid().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_setting_updated_by")
                            .from(Setting::Table, Setting::UpdatedBy)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Setting::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Setting { Table, Id, Key, Value, Description, UpdatedAt, UpdatedBy }

#[derive(DeriveIden)]
enum User { Table, Id }
