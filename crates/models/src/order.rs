use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, menu_item, user};

pub const STATUSES: [&str; 4] = ["pending", "approved", "denied", "delivered"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub menu_item_id: Uuid,
    pub quantity: i32,
    pub is_roti_only: bool,
    pub total_price: f64,
    pub delivery_address: String,
    pub delivery_lat: Option<f64>,
    pub delivery_lng: Option<f64>,
    pub status: String,
    pub notes: Option<String>,
    pub admin_notes: Option<String>,
    pub order_date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    MenuItem,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::User => Entity::belongs_to(user::Entity)
                .from(Column::UserId)
                .to(user::Column::Id)
                .into(),
            Relation::MenuItem => Entity::belongs_to(menu_item::Entity)
                .from(Column::MenuItemId)
                .to(menu_item::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_status(status: &str) -> Result<(), errors::ModelError> {
    if !STATUSES.contains(&status) {
        return Err(errors::ModelError::Validation("invalid status".into()));
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    db: &DatabaseConnection,
    user_id: Uuid,
    menu_item_id: Uuid,
    quantity: i32,
    is_roti_only: bool,
    total_price: f64,
    delivery_address: &str,
    delivery_lat: Option<f64>,
    delivery_lng: Option<f64>,
    notes: Option<String>,
    order_date: Date,
) -> Result<Model, errors::ModelError> {
    if quantity < 1 {
        return Err(errors::ModelError::Validation("quantity must be at least 1".into()));
    }
    if delivery_address.trim().is_empty() {
        return Err(errors::ModelError::Validation("delivery address required".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        menu_item_id: Set(menu_item_id),
        quantity: Set(quantity),
        is_roti_only: Set(is_roti_only),
        total_price: Set(total_price),
        delivery_address: Set(delivery_address.to_string()),
        delivery_lat: Set(delivery_lat),
        delivery_lng: Set(delivery_lng),
        status: Set("pending".into()),
        notes: Set(notes),
        admin_notes: Set(None),
        order_date: Set(order_date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn update_status(
    db: &DatabaseConnection,
    id: Uuid,
    status: &str,
    admin_notes: Option<String>,
) -> Result<Model, errors::ModelError> {
    validate_status(status)?;
    let mut am: ActiveModel = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("order not found".into()))?
        .into();
    am.status = Set(status.to_string());
    if admin_notes.is_some() {
        am.admin_notes = Set(admin_notes);
    }
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_known_statuses_are_accepted() {
        for s in STATUSES {
            assert!(validate_status(s).is_ok());
        }
        assert!(validate_status("cancelled").is_err());
        assert!(validate_status("Pending").is_err());
    }
}
