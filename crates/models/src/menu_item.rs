use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors;

pub const MEAL_TYPES: [&str; 3] = ["breakfast", "lunch", "dinner"];

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "menu_item")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub meal_type: String,
    pub price_full: f64,
    pub price_roti_only: f64,
    pub is_available: bool,
    pub date: Date,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef { panic!("no relations defined here") }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_meal_type(meal_type: &str) -> Result<(), errors::ModelError> {
    if !MEAL_TYPES.contains(&meal_type) {
        return Err(errors::ModelError::Validation("invalid meal type".into()));
    }
    Ok(())
}

pub async fn create(
    db: &DatabaseConnection,
    name: &str,
    description: Option<String>,
    meal_type: &str,
    price_full: f64,
    price_roti_only: f64,
    date: Date,
) -> Result<Model, errors::ModelError> {
    if name.trim().is_empty() {
        return Err(errors::ModelError::Validation("name required".into()));
    }
    validate_meal_type(meal_type)?;
    if price_full <= 0.0 || price_roti_only <= 0.0 {
        return Err(errors::ModelError::Validation("prices must be positive".into()));
    }
    let now = Utc::now().into();
    let am = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
        description: Set(description),
        meal_type: Set(meal_type.to_string()),
        price_full: Set(price_full),
        price_roti_only: Set(price_roti_only),
        is_available: Set(true),
        date: Set(date),
        created_at: Set(now),
        updated_at: Set(now),
    };
    am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

pub async fn toggle_available(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Model, errors::ModelError> {
    let found = Entity::find_by_id(id)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
        .ok_or_else(|| errors::ModelError::Validation("menu item not found".into()))?;
    let next = !found.is_available;
    let mut am: ActiveModel = found.into();
    am.is_available = Set(next);
    am.updated_at = Set(Utc::now().into());
    am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meal_type_is_closed_set() {
        for t in MEAL_TYPES {
            assert!(validate_meal_type(t).is_ok());
        }
        assert!(validate_meal_type("brunch").is_err());
    }
}
