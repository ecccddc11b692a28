use chrono::Utc;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use tracing::info;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::geo::Coordinate;
use crate::pagination::Pagination;
use crate::service_area::store::SettingsStore;
use crate::service_area::ServiceAreaService;
use models::{menu_item, order, user};

/// Input for a customer order.
#[derive(Debug, Clone)]
pub struct PlaceOrderInput {
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub is_roti_only: bool,
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub notes: Option<String>,
}

/// Unit price for an order line: roti-only or the full tiffin.
pub fn unit_price(item: &menu_item::Model, is_roti_only: bool) -> f64 {
    if is_roti_only { item.price_roti_only } else { item.price_full }
}

/// Place an order for a customer.
///
/// The delivery point is the explicit coordinates when supplied, otherwise
/// the customer's registered ones; either way it must fall inside the
/// current service area.
pub async fn place_order<S: SettingsStore>(
    db: &DatabaseConnection,
    area: &ServiceAreaService<S>,
    customer: &user::Model,
    input: PlaceOrderInput,
) -> Result<order::Model, ServiceError> {
    if customer.is_admin {
        return Err(ServiceError::Validation("admins cannot place orders".into()));
    }
    if input.quantity < 1 {
        return Err(ServiceError::Validation("quantity must be at least 1".into()));
    }
    if input.delivery_address.trim().is_empty() {
        return Err(ServiceError::Validation("delivery address required".into()));
    }

    let item = menu_item::Entity::find_by_id(input.menu_item_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("menu item"))?;
    if !item.is_available {
        return Err(ServiceError::Validation("menu item is not available".into()));
    }

    let (delivery_lat, delivery_lng) = match (input.delivery_lat, input.delivery_lng) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => match (customer.latitude, customer.longitude) {
            (Some(lat), Some(lng)) => (lat, lng),
            _ => return Err(ServiceError::Validation("delivery location required".into())),
        },
    };
    if !area.is_serviceable(Coordinate::new(delivery_lat, delivery_lng)).await {
        return Err(ServiceError::Validation(
            "no services are available at the delivery location".into(),
        ));
    }

    let total_price = unit_price(&item, input.is_roti_only) * input.quantity as f64;
    let created = order::create(
        db,
        customer.id,
        item.id,
        input.quantity,
        input.is_roti_only,
        total_price,
        &input.delivery_address,
        Some(delivery_lat),
        Some(delivery_lng),
        input.notes,
        Utc::now().date_naive(),
    )
    .await?;
    info!(order_id = %created.id, user_id = %customer.id, total = total_price, "order_placed");
    Ok(created)
}

/// A customer's most recent orders.
pub async fn list_recent_for_user(
    db: &DatabaseConnection,
    user_id: Uuid,
    limit: u64,
) -> Result<Vec<order::Model>, ServiceError> {
    order::Entity::find()
        .filter(order::Column::UserId.eq(user_id))
        .order_by_desc(order::Column::CreatedAt)
        .limit(limit)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Admin listing, optionally filtered by status, newest first.
pub async fn list_paginated(
    db: &DatabaseConnection,
    status: Option<&str>,
    opts: Pagination,
) -> Result<Vec<order::Model>, ServiceError> {
    if let Some(s) = status {
        order::validate_status(s)?;
    }
    let (page_idx, per_page) = opts.normalize();
    let mut query = order::Entity::find();
    if let Some(s) = status {
        query = query.filter(order::Column::Status.eq(s.to_string()));
    }
    query
        .order_by_desc(order::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Move an order to a new status, optionally attaching admin notes.
pub async fn update_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
    admin_notes: Option<String>,
) -> Result<order::Model, ServiceError> {
    let updated = order::update_status(db, id, status, admin_notes).await?;
    info!(order_id = %updated.id, status = %updated.status, "order_status_updated");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(price_full: f64, price_roti_only: f64) -> menu_item::Model {
        menu_item::Model {
            id: Uuid::new_v4(),
            name: "Thali".into(),
            description: None,
            meal_type: "lunch".into(),
            price_full,
            price_roti_only,
            is_available: true,
            date: chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    #[test]
    fn unit_price_follows_roti_flag() {
        let i = item(120.0, 40.0);
        assert_eq!(unit_price(&i, false), 120.0);
        assert_eq!(unit_price(&i, true), 40.0);
    }
}
