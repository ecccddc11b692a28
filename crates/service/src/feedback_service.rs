use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::errors::ServiceError;
use models::{feedback, order};

/// Record feedback for a delivered order. The order must belong to the
/// submitting user.
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    order_id: Uuid,
    rating: i16,
    comment: Option<String>,
) -> Result<feedback::Model, ServiceError> {
    let found = order::Entity::find_by_id(order_id)
        .one(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))?
        .ok_or_else(|| ServiceError::not_found("order"))?;
    if found.user_id != user_id {
        return Err(ServiceError::Validation("order does not belong to this user".into()));
    }
    let created = feedback::create(db, user_id, order_id, rating, comment).await?;
    Ok(created)
}

pub async fn list_for_order(db: &DatabaseConnection, order_id: Uuid) -> Result<Vec<feedback::Model>, ServiceError> {
    feedback::Entity::find()
        .filter(feedback::Column::OrderId.eq(order_id))
        .order_by_desc(feedback::Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| ServiceError::Db(e.to_string()))
}
