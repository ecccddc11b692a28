use async_trait::async_trait;
use uuid::Uuid;

use super::errors::StoreError;

/// Key/value settings backing store abstraction.
/// Implementations can be database-backed or in-memory test doubles; the
/// resolver receives one at construction so checks run without a real store.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    async fn set(
        &self,
        key: &str,
        value: &str,
        description: Option<&str>,
        actor: Option<Uuid>,
    ) -> Result<(), StoreError>;
}

/// Simple in-memory mock store for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockSettingsStore {
        values: Mutex<HashMap<String, String>>,
        unavailable: AtomicBool,
    }

    impl MockSettingsStore {
        pub fn with_values(pairs: &[(&str, &str)]) -> Self {
            let store = Self::default();
            {
                let mut values = store.values.lock().unwrap();
                for (k, v) in pairs {
                    values.insert((*k).to_string(), (*v).to_string());
                }
            }
            store
        }

        /// Make every subsequent read fail, simulating an unreachable store.
        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl SettingsStore for MockSettingsStore {
        async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock store offline".into()));
            }
            let values = self.values.lock().unwrap();
            Ok(values.get(key).cloned())
        }

        async fn set(
            &self,
            key: &str,
            value: &str,
            _description: Option<&str>,
            _actor: Option<Uuid>,
        ) -> Result<(), StoreError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(StoreError::Unavailable("mock store offline".into()));
            }
            let mut values = self.values.lock().unwrap();
            values.insert(key.to_string(), value.to_string());
            Ok(())
        }
    }
}
