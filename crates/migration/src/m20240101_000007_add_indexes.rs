use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // MenuItem: daily menu listings filter on date
        manager
            .create_index(
                Index::create()
                    .name("idx_menu_item_date")
                    .table(MenuItem::Table)
                    .col(MenuItem::Date)
                    .to_owned(),
            )
            .await?;

        // Order: admin listings filter on status, dashboards on order_date
        manager
            .create_index(
                Index::create()
                    .name("idx_order_status")
                    .table(Order::Table)
                    .col(Order::Status)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_order_date")
                    .table(Order::Table)
                    .col(Order::OrderDate)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_order_user")
                    .table(Order::Table)
                    .col(Order::UserId)
                    .to_owned(),
            )
            .await?;

        // Feedback: lookups by order
        manager
            .create_index(
                Index::create()
                    .name("idx_feedback_order")
                    .table(Feedback::Table)
                    .col(Feedback::OrderId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_menu_item_date").table(MenuItem::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_status").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_date").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_order_user").table(Order::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_feedback_order").table(Feedback::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum MenuItem { Table, Date }

#[derive(DeriveIden)]
enum Order { Table, Status, OrderDate, UserId }

#[derive(DeriveIden)]
enum Feedback { Table, OrderId }
