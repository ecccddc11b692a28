use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// Well-known settings keys holding the service-area configuration. The
/// same names are used in the settings store, the env mirror file, and the
/// process environment consulted by the fallback path.
pub const KEY_CENTRAL_LAT: &str = "CENTRAL_LAT";
pub const KEY_CENTRAL_LNG: &str = "CENTRAL_LNG";
pub const KEY_SERVICE_RADIUS_KM: &str = "SERVICE_RADIUS_KM";

/// Static defaults applied when a key is absent, and by the total fallback
/// when the store is unreachable.
pub const DEFAULT_CENTRAL_LAT: f64 = 20.457316;
pub const DEFAULT_CENTRAL_LNG: f64 = 75.016754;
pub const DEFAULT_SERVICE_RADIUS_KM: f64 = 5.0;

/// Upper bound accepted for the configurable radius, in kilometers.
pub const MAX_SERVICE_RADIUS_KM: f64 = 50.0;

/// Current center and radius of the serviceable disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ServiceAreaConfig {
    pub center: Coordinate,
    pub radius_km: f64,
}

impl Default for ServiceAreaConfig {
    fn default() -> Self {
        Self {
            center: Coordinate::new(DEFAULT_CENTRAL_LAT, DEFAULT_CENTRAL_LNG),
            radius_km: DEFAULT_SERVICE_RADIUS_KM,
        }
    }
}

/// Geocoding stub output. The coordinates are always the configured center;
/// only the echoed address reflects the caller's input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub formatted_address: String,
}

/// Composite result of a configuration update. The settings-store write is
/// authoritative and has already succeeded when this is returned; the env
/// mirror is best-effort and reports its outcome here.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PersistOutcome {
    pub mirror_synced: bool,
}
