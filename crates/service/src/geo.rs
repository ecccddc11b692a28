//! Great-circle distance on a spherical Earth.

use serde::{Deserialize, Serialize};

/// Mean Earth radius in kilometers used by the haversine computation.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A latitude/longitude pair in degrees. Always passed by value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Haversine distance between two coordinates, in kilometers.
///
/// Symmetric, non-negative, and zero for identical inputs. Accepts any
/// numeric degrees; callers are responsible for supplying sane values.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair below zero for near-antipodal inputs.
    let c = 2.0 * h.max(0.0).sqrt().asin();
    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points_have_zero_distance() {
        let p = Coordinate::new(28.6139, 77.2090);
        assert_eq!(distance_km(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(20.457316, 75.016754);
        let b = Coordinate::new(28.7041, 77.1025);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn delhi_landmark_distance_matches_known_value() {
        let india_gate = Coordinate::new(28.6139, 77.2090);
        let delhi_university = Coordinate::new(28.7041, 77.1025);
        let d = distance_km(india_gate, delhi_university);
        // ~0.09 degrees of latitude and ~0.11 of longitude at this parallel.
        assert!((d - 14.44).abs() < 0.5, "got {d}");
    }

    #[test]
    fn antipodal_points_stay_finite_and_non_negative() {
        let a = Coordinate::new(90.0, 0.0);
        let b = Coordinate::new(-90.0, 180.0);
        let d = distance_km(a, b);
        assert!(d.is_finite());
        assert!(d >= 0.0);
        // Half the Earth's circumference, give or take the spherical model.
        assert!((d - EARTH_RADIUS_KM * std::f64::consts::PI).abs() < 1.0);
    }
}
