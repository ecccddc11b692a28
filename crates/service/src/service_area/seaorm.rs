use sea_orm::DatabaseConnection;
use uuid::Uuid;

use super::errors::StoreError;
use super::store::SettingsStore;

/// Settings store backed by the `setting` table.
pub struct SeaOrmSettingsStore {
    pub db: DatabaseConnection,
}

#[async_trait::async_trait]
impl SettingsStore for SeaOrmSettingsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        models::setting::get_value(&self.db, key)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
        actor: Option<Uuid>,
    ) -> Result<(), StoreError> {
        models::setting::set_value(&self.db, key, value, description, actor)
            .await
            .map(|_| ())
            .map_err(|e| StoreError::Unavailable(e.to_string()))
    }
}
