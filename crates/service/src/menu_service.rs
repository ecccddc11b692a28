use chrono::Utc;
use sea_orm::prelude::Date;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use models::menu_item;

/// Input for a new daily menu item.
#[derive(Debug, Clone)]
pub struct NewMenuItem {
    pub name: String,
    pub description: Option<String>,
    pub meal_type: String,
    pub price_full: f64,
    pub price_roti_only: f64,
    pub date: Date,
}

pub async fn create_item(db: &DatabaseConnection, input: NewMenuItem) -> Result<menu_item::Model, ServiceError> {
    let created = menu_item::create(
        db,
        &input.name,
        input.description,
        &input.meal_type,
        input.price_full,
        input.price_roti_only,
        input.date,
    )
    .await?;
    Ok(created)
}

/// All items for a day, available or not (admin view).
pub async fn list_for_date(db: &DatabaseConnection, date: Date) -> Result<Vec<menu_item::Model>, ServiceError> {
    menu_item::Entity::find()
        .filter(menu_item::Column::Date.eq(date))
        .order_by_asc(menu_item::Column::MealType)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Items offered to customers for a day.
pub async fn list_available_for_date(db: &DatabaseConnection, date: Date) -> Result<Vec<menu_item::Model>, ServiceError> {
    menu_item::Entity::find()
        .filter(menu_item::Column::Date.eq(date))
        .filter(menu_item::Column::IsAvailable.eq(true))
        .order_by_asc(menu_item::Column::MealType)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

pub async fn toggle_item(db: &DatabaseConnection, id: Uuid) -> Result<menu_item::Model, ServiceError> {
    let updated = menu_item::toggle_available(db, id).await?;
    Ok(updated)
}

/// Mark items whose date has passed as unavailable.
///
/// Idempotent and safe to call on every menu read; returns the number of
/// rows flipped (zero when nothing expired).
pub async fn expire_stale_items(db: &DatabaseConnection, today: Date) -> Result<u64, ServiceError> {
    let res = menu_item::Entity::update_many()
        .col_expr(menu_item::Column::IsAvailable, Expr::value(false))
        .col_expr(menu_item::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(menu_item::Column::Date.lt(today))
        .filter(menu_item::Column::IsAvailable.eq(true))
        .exec(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    if res.rows_affected > 0 {
        info!(count = res.rows_affected, "disabled expired menu items");
    }
    Ok(res.rows_affected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::get_db;
    use chrono::NaiveDate;

    #[tokio::test]
    async fn expiry_sweep_is_idempotent() -> Result<(), anyhow::Error> {
        if std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = get_db().await?;

        let yesterday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let stale = create_item(
            &db,
            NewMenuItem {
                name: format!("Stale Thali {}", Uuid::new_v4()),
                description: None,
                meal_type: "lunch".into(),
                price_full: 120.0,
                price_roti_only: 40.0,
                date: yesterday,
            },
        )
        .await?;

        let first = expire_stale_items(&db, today).await?;
        assert!(first >= 1);

        // Second sweep finds nothing left to flip for this item.
        let reloaded = menu_item::Entity::find_by_id(stale.id).one(&db).await?.unwrap();
        assert!(!reloaded.is_available);

        menu_item::Entity::delete_by_id(stale.id).exec(&db).await?;
        Ok(())
    }
}
