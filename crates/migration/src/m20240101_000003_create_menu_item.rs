//! Create `menu_item` table.
//!
//! Items are scoped to a calendar day; expiry flips `is_available`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(MenuItem::Table)
                    .if_not_exists()
                    .col(uuid(MenuItem::Id).primary_key())
                    .col(string_len(MenuItem::Name, 128).not_null())
                    .col(ColumnDef::new(MenuItem::Description).text().null())
                    .col(string_len(MenuItem::MealType, 32).not_null())
                    .col(double(MenuItem::PriceFull).not_null())
                    .col(double(MenuItem::PriceRotiOnly).not_null())
                    .col(boolean(MenuItem::IsAvailable).not_null().default(true))
                    .col(date(MenuItem::Date).not_null())
                    .col(timestamp_with_time_zone(MenuItem::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(MenuItem::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(MenuItem::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum MenuItem { Table, Id, Name, Description, MealType, PriceFull, PriceRotiOnly, IsAvailable, Date, CreatedAt, UpdatedAt }
