use std::sync::Arc;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::geo::{self, Coordinate};

use super::domain::{
    PersistOutcome, ResolvedLocation, ServiceAreaConfig, DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG,
    DEFAULT_SERVICE_RADIUS_KM, KEY_CENTRAL_LAT, KEY_CENTRAL_LNG, KEY_SERVICE_RADIUS_KM,
    MAX_SERVICE_RADIUS_KM,
};
use super::env_file::EnvFileMirror;
use super::errors::StoreError;
use super::store::SettingsStore;

/// Resolver answering whether a coordinate lies inside the serviceable disk
/// and owning writes of the configuration to both backing surfaces.
///
/// The store is injected at construction so tests run against an in-memory
/// double. There is no in-memory cache: every check re-reads the store.
pub struct ServiceAreaService<S: SettingsStore> {
    store: Arc<S>,
    mirror: EnvFileMirror,
}

impl<S: SettingsStore> ServiceAreaService<S> {
    pub fn new(store: Arc<S>, mirror: EnvFileMirror) -> Self {
        Self { store, mirror }
    }

    /// Current center and radius.
    ///
    /// Reads the three well-known keys from the settings store, substituting
    /// the static default for an absent key. When any key fails to read or
    /// to parse, the whole read is discarded and the configuration comes
    /// from process environment variables instead; store and environment
    /// values are never mixed, and no error reaches the caller.
    pub async fn current_config(&self) -> ServiceAreaConfig {
        match self.read_store_config().await {
            Ok(cfg) => cfg,
            Err(e) => {
                debug!(error = %e, "settings store read failed; using environment fallback");
                env_fallback_config()
            }
        }
    }

    async fn read_store_config(&self) -> Result<ServiceAreaConfig, StoreError> {
        let lat = self.read_f64(KEY_CENTRAL_LAT, DEFAULT_CENTRAL_LAT).await?;
        let lng = self.read_f64(KEY_CENTRAL_LNG, DEFAULT_CENTRAL_LNG).await?;
        let radius_km = self
            .read_f64(KEY_SERVICE_RADIUS_KM, DEFAULT_SERVICE_RADIUS_KM)
            .await?;
        Ok(ServiceAreaConfig { center: Coordinate::new(lat, lng), radius_km })
    }

    async fn read_f64(&self, key: &str, default: f64) -> Result<f64, StoreError> {
        match self.store.get(key).await? {
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map_err(|_| StoreError::Malformed { key: key.to_string(), value: raw }),
            None => Ok(default),
        }
    }

    /// Whether the point lies within the serviceable disk. The boundary is
    /// inclusive: a point at exactly the radius is serviceable.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::geo::Coordinate;
    /// use service::service_area::{ServiceAreaService, env_file::EnvFileMirror, store::mock::MockSettingsStore};
    /// let store = Arc::new(MockSettingsStore::default());
    /// let svc = ServiceAreaService::new(store, EnvFileMirror::new(std::env::temp_dir().join("doc_area.env")));
    /// let center = Coordinate::new(20.457316, 75.016754);
    /// assert!(tokio_test::block_on(svc.is_serviceable(center)));
    /// ```
    pub async fn is_serviceable(&self, point: Coordinate) -> bool {
        let cfg = self.current_config().await;
        geo::distance_km(cfg.center, point) <= cfg.radius_km
    }

    /// Geocoding placeholder: echoes the address back and returns the
    /// configured center coordinates regardless of the input. Callers must
    /// not assume the result reflects the real address.
    pub async fn resolve_address(&self, address: &str) -> ResolvedLocation {
        let cfg = self.current_config().await;
        ResolvedLocation {
            latitude: cfg.center.lat,
            longitude: cfg.center.lng,
            formatted_address: address.to_string(),
        }
    }

    /// Persist a new service area to the settings store and mirror it into
    /// the env file.
    ///
    /// Inputs are validated before storage is touched; the radius must lie
    /// in `(0, 50]` km. The store write is authoritative: a store failure
    /// surfaces as an error, while a mirror failure is logged, reported via
    /// [`PersistOutcome`], and never rolls the store write back.
    #[instrument(skip(self))]
    pub async fn update_service_area(
        &self,
        center: Coordinate,
        radius_km: f64,
        actor: Option<Uuid>,
    ) -> Result<PersistOutcome, ServiceError> {
        if !center.lat.is_finite() || !center.lng.is_finite() || !radius_km.is_finite() {
            return Err(ServiceError::Validation("center and radius must be finite numbers".into()));
        }
        if !(-90.0..=90.0).contains(&center.lat) {
            return Err(ServiceError::Validation("latitude must be within [-90, 90]".into()));
        }
        if !(-180.0..=180.0).contains(&center.lng) {
            return Err(ServiceError::Validation("longitude must be within [-180, 180]".into()));
        }
        if radius_km <= 0.0 || radius_km > MAX_SERVICE_RADIUS_KM {
            return Err(ServiceError::Validation(format!(
                "service radius must be within (0, {MAX_SERVICE_RADIUS_KM}] km"
            )));
        }

        let lat = format!("{}", center.lat);
        let lng = format!("{}", center.lng);
        let radius = format!("{}", radius_km);

        self.store
            .set(KEY_CENTRAL_LAT, &lat, Some("Central service location latitude"), actor)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        self.store
            .set(KEY_CENTRAL_LNG, &lng, Some("Central service location longitude"), actor)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;
        self.store
            .set(KEY_SERVICE_RADIUS_KM, &radius, Some("Service radius in kilometers"), actor)
            .await
            .map_err(|e| ServiceError::Db(e.to_string()))?;

        let entries = [
            (KEY_CENTRAL_LAT, lat),
            (KEY_CENTRAL_LNG, lng),
            (KEY_SERVICE_RADIUS_KM, radius),
        ];
        let mirror_synced = match self.mirror.sync(&entries).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "env mirror write failed; settings store remains authoritative");
                false
            }
        };

        info!(radius_km, mirror_synced, "service_area_updated");
        Ok(PersistOutcome { mirror_synced })
    }
}

/// Total fallback configuration read from process environment variables,
/// with the same static defaults as the store path.
pub fn env_fallback_config() -> ServiceAreaConfig {
    ServiceAreaConfig {
        center: Coordinate::new(
            env_f64(KEY_CENTRAL_LAT, DEFAULT_CENTRAL_LAT),
            env_f64(KEY_CENTRAL_LNG, DEFAULT_CENTRAL_LNG),
        ),
        radius_km: env_f64(KEY_SERVICE_RADIUS_KM, DEFAULT_SERVICE_RADIUS_KM),
    }
}

fn env_f64(key: &str, default: f64) -> f64 {
    std::env::var(key)
        .ok()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service_area::store::mock::MockSettingsStore;
    use std::path::PathBuf;

    fn temp_env_path() -> PathBuf {
        std::env::temp_dir().join(format!("service_area_{}.env", Uuid::new_v4()))
    }

    fn svc_with(store: MockSettingsStore) -> (ServiceAreaService<MockSettingsStore>, PathBuf) {
        let path = temp_env_path();
        (ServiceAreaService::new(Arc::new(store), EnvFileMirror::new(&path)), path)
    }

    #[tokio::test]
    async fn center_is_always_serviceable() {
        let (svc, _path) = svc_with(MockSettingsStore::default());
        let cfg = svc.current_config().await;
        assert!(svc.is_serviceable(cfg.center).await);
    }

    #[tokio::test]
    async fn defaults_apply_when_keys_are_absent() {
        let (svc, _path) = svc_with(MockSettingsStore::default());
        let cfg = svc.current_config().await;
        assert_eq!(cfg.center, Coordinate::new(DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG));
        assert_eq!(cfg.radius_km, DEFAULT_SERVICE_RADIUS_KM);
    }

    #[tokio::test]
    async fn boundary_is_inclusive() {
        let center = Coordinate::new(28.6139, 77.2090);
        let point = Coordinate::new(28.7041, 77.1025);
        let d = geo::distance_km(center, point);

        // Radius exactly the measured distance: the point is still in.
        let store = MockSettingsStore::with_values(&[
            ("CENTRAL_LAT", "28.6139"),
            ("CENTRAL_LNG", "77.2090"),
            ("SERVICE_RADIUS_KM", &format!("{d}")),
        ]);
        let (svc, _path) = svc_with(store);
        assert!(svc.is_serviceable(point).await);

        // A radius epsilon short of the distance excludes it.
        let store = MockSettingsStore::with_values(&[
            ("CENTRAL_LAT", "28.6139"),
            ("CENTRAL_LNG", "77.2090"),
            ("SERVICE_RADIUS_KM", &format!("{}", d - 1e-9)),
        ]);
        let (svc, _path) = svc_with(store);
        assert!(!svc.is_serviceable(point).await);
    }

    #[tokio::test]
    async fn store_failure_falls_back_without_error() {
        let store = MockSettingsStore::with_values(&[
            ("CENTRAL_LAT", "1.0"),
            ("CENTRAL_LNG", "2.0"),
            ("SERVICE_RADIUS_KM", "3.0"),
        ]);
        store.set_unavailable(true);
        let (svc, _path) = svc_with(store);

        // Still answers, from the static defaults rather than store values.
        let cfg = svc.current_config().await;
        assert_eq!(cfg.center, Coordinate::new(DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG));
        assert!(svc.is_serviceable(cfg.center).await);
    }

    #[tokio::test]
    async fn malformed_value_triggers_total_fallback() {
        let store = MockSettingsStore::with_values(&[
            ("CENTRAL_LAT", "not-a-number"),
            ("CENTRAL_LNG", "75.016754"),
            ("SERVICE_RADIUS_KM", "5"),
        ]);
        let (svc, _path) = svc_with(store);
        let cfg = svc.current_config().await;
        // No partial mix: the well-formed keys are discarded too.
        assert_eq!(cfg.center, Coordinate::new(DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG));
        assert_eq!(cfg.radius_km, DEFAULT_SERVICE_RADIUS_KM);
    }

    #[tokio::test]
    async fn resolve_address_returns_configured_center() {
        let store = MockSettingsStore::with_values(&[
            ("CENTRAL_LAT", "12.5"),
            ("CENTRAL_LNG", "76.25"),
        ]);
        let (svc, _path) = svc_with(store);
        let resolved = svc.resolve_address("42 Nowhere Lane, Pune").await;
        assert_eq!(resolved.latitude, 12.5);
        assert_eq!(resolved.longitude, 76.25);
        assert_eq!(resolved.formatted_address, "42 Nowhere Lane, Pune");
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_radius() {
        let (svc, _path) = svc_with(MockSettingsStore::default());
        let center = Coordinate::new(10.0, 20.0);
        assert!(svc.update_service_area(center, 0.0, None).await.is_err());
        assert!(svc.update_service_area(center, 51.0, None).await.is_err());
        assert!(svc.update_service_area(center, -1.0, None).await.is_err());
        assert!(svc.update_service_area(center, f64::NAN, None).await.is_err());
    }

    #[tokio::test]
    async fn update_rejects_out_of_range_center() {
        let (svc, _path) = svc_with(MockSettingsStore::default());
        assert!(svc.update_service_area(Coordinate::new(91.0, 0.0), 5.0, None).await.is_err());
        assert!(svc.update_service_area(Coordinate::new(0.0, 181.0), 5.0, None).await.is_err());
    }

    #[tokio::test]
    async fn update_is_visible_on_the_next_read() -> Result<(), anyhow::Error> {
        let (svc, path) = svc_with(MockSettingsStore::default());
        let outcome = svc
            .update_service_area(Coordinate::new(10.0, 20.0), 25.0, None)
            .await?;
        assert!(outcome.mirror_synced);

        let cfg = svc.current_config().await;
        assert_eq!(cfg.center, Coordinate::new(10.0, 20.0));
        assert_eq!(cfg.radius_km, 25.0);

        // A point ~11 km from the new center is inside the 25 km disk.
        assert!(svc.is_serviceable(Coordinate::new(10.1, 20.0)).await);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn update_writes_canonical_lines_to_the_mirror() -> Result<(), anyhow::Error> {
        let path = temp_env_path();
        tokio::fs::write(&path, "CENTRAL_LAT=99.9\nOTHER=keep\n").await?;
        let svc = ServiceAreaService::new(
            Arc::new(MockSettingsStore::default()),
            EnvFileMirror::new(&path),
        );

        svc.update_service_area(Coordinate::new(10.0, 20.0), 7.0, None).await?;

        let content = tokio::fs::read_to_string(&path).await?;
        assert!(content.contains("CENTRAL_LAT=10\n"));
        assert!(content.contains("CENTRAL_LNG=20\n"));
        assert!(content.contains("SERVICE_RADIUS_KM=7\n"));
        assert!(content.contains("OTHER=keep\n"));
        assert_eq!(content.matches("CENTRAL_LAT=").count(), 1);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn mirror_failure_is_swallowed_and_reported() -> Result<(), anyhow::Error> {
        // Pointing the mirror at a directory makes the write fail.
        let dir = std::env::temp_dir().join(format!("service_area_dir_{}", Uuid::new_v4()));
        tokio::fs::create_dir_all(&dir).await?;
        let store = Arc::new(MockSettingsStore::default());
        let svc = ServiceAreaService::new(Arc::clone(&store), EnvFileMirror::new(&dir));

        let outcome = svc
            .update_service_area(Coordinate::new(10.0, 20.0), 7.0, None)
            .await?;
        assert!(!outcome.mirror_synced);

        // The store write stands regardless.
        let cfg = svc.current_config().await;
        assert_eq!(cfg.radius_km, 7.0);

        let _ = tokio::fs::remove_dir(&dir).await;
        Ok(())
    }

    #[tokio::test]
    async fn store_failure_during_update_is_an_error() {
        let store = MockSettingsStore::default();
        store.set_unavailable(true);
        let (svc, _path) = svc_with(store);
        let res = svc.update_service_area(Coordinate::new(10.0, 20.0), 7.0, None).await;
        assert!(matches!(res, Err(ServiceError::Db(_))));
    }
}
