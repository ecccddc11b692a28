//! Create `order` table with FKs to `user` and `menu_item`.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Order::Table)
                    .if_not_exists()
                    .col(uuid(Order::Id).primary_key())
                    .col(uuid(Order::UserId).not_null())
                    .col(uuid(Order::MenuItemId).not_null())
                    .col(integer(Order::Quantity).not_null())
                    .col(boolean(Order::IsRotiOnly).not_null().default(false))
                    .col(double(Order::TotalPrice).not_null())
                    .col(text(Order::DeliveryAddress).not_null())
                    .col(ColumnDef::new(Order::DeliveryLat).double().null())
                    .col(ColumnDef::new(Order::DeliveryLng).double().null())
                    .col(string_len(Order::Status, 32).not_null())
                    .col(ColumnDef::new(Order::Notes).text().null())
                    .col(ColumnDef::new(Order::AdminNotes).text().null())
                    .col(date(Order::OrderDate).not_null())
                    .col(timestamp_with_time_zone(Order::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Order::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_user")
                            .from(Order::Table, Order::UserId)
                            .to(User::Table, User::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_order_menu_item")
                            .from(Order::Table, Order::MenuItemId)
                            .to(MenuItem::Table, MenuItem::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Order::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Order { Table, Id, UserId, MenuItemId, Quantity, IsRotiOnly, TotalPrice, DeliveryAddress, DeliveryLat, DeliveryLng, Status, Notes, AdminNotes, OrderDate, CreatedAt, UpdatedAt }

#[derive(DeriveIden)]
enum User { Table, Id }

#[derive(DeriveIden)]
enum MenuItem { Table, Id }
