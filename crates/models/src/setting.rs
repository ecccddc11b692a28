use chrono::Utc;
use sea_orm::{entity::prelude::*, DatabaseConnection, Set};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{errors, user};

/// Key/value configuration rows with audit metadata. Consumers treat this
/// table purely as a string store; interpretation of values is theirs.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "setting")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub key: String,
    pub value: String,
    pub description: Option<String>,
    pub updated_at: DateTimeWithTimeZone,
    pub updated_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    UpdatedBy,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::UpdatedBy => Entity::belongs_to(user::Entity)
                .from(Column::UpdatedBy)
                .to(user::Column::Id)
                .into(),
        }
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub async fn get_value(
    db: &DatabaseConnection,
    key: &str,
) -> Result<Option<String>, errors::ModelError> {
    let found = Entity::find()
        .filter(Column::Key.eq(key.to_string()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?;
    Ok(found.map(|s| s.value))
}

/// Create-or-update a key. An existing row keeps its description unless a
/// new one is supplied.
pub async fn set_value(
    db: &DatabaseConnection,
    key: &str,
    value: &str,
    description: Option<&str>,
    updated_by: Option<Uuid>,
) -> Result<Model, errors::ModelError> {
    if key.trim().is_empty() {
        return Err(errors::ModelError::Validation("setting key required".into()));
    }
    let now = Utc::now().into();
    if let Some(existing) = Entity::find()
        .filter(Column::Key.eq(key.to_string()))
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))?
    {
        let mut am: ActiveModel = existing.into();
        am.value = Set(value.to_string());
        if let Some(desc) = description {
            am.description = Set(Some(desc.to_string()));
        }
        am.updated_by = Set(updated_by);
        am.updated_at = Set(now);
        am.update(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    } else {
        let am = ActiveModel {
            id: Set(Uuid::new_v4()),
            key: Set(key.to_string()),
            value: Set(value.to_string()),
            description: Set(description.map(|d| d.to_string())),
            updated_at: Set(now),
            updated_by: Set(updated_by),
        };
        am.insert(db).await.map_err(|e| errors::ModelError::Db(e.to_string()))
    }
}
