use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::pagination::Pagination;
use models::{order, user};

/// List users, optionally filtered by active state, newest first.
pub async fn list_paginated(
    db: &DatabaseConnection,
    active: Option<bool>,
    opts: Pagination,
) -> Result<Vec<user::Model>, ServiceError> {
    let (page_idx, per_page) = opts.normalize();
    let mut query = user::Entity::find();
    if let Some(active) = active {
        query = query.filter(user::Column::IsActive.eq(active));
    }
    query
        .order_by_desc(user::Column::CreatedAt)
        .paginate(db, per_page)
        .fetch_page(page_idx)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}

/// Toggle a user's active flag. Admin accounts cannot be deactivated.
pub async fn set_active(db: &DatabaseConnection, id: Uuid, active: bool) -> Result<user::Model, ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    if found.is_admin && !active {
        return Err(ServiceError::Validation("cannot deactivate admin users".into()));
    }
    let updated = user::set_active(db, id, active).await?;
    Ok(updated)
}

/// A user together with their lifetime order count (admin detail view).
pub async fn details(db: &DatabaseConnection, id: Uuid) -> Result<(user::Model, u64), ServiceError> {
    let found = user::Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("user"))?;
    let order_count = order::Entity::find()
        .filter(order::Column::UserId.eq(id))
        .count(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?;
    Ok((found, order_count))
}
