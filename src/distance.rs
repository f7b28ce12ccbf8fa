//! Distance metrics for spatial queries.
//!
//! Searches record a candidate when the metric's distance to the target is within the requested
//! radius, and the same value is reported back with each result.

use crate::r#type::LatLon;

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A trait for calculating distances between two coordinates.
pub trait DistanceMetric {
    /// Calculate the distance between two coordinates, in the unit of this metric.
    fn distance(&self, a: &LatLon, b: &LatLon) -> f64;
}

/// Haversine distance metric.
///
/// This calculates the great-circle distance between two points on a sphere. Input coordinates
/// are in degrees and the output distance has the unit of `earth_radius`, kilometers by default.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HaversineDistance {
    /// Sphere radius, kilometers by default
    pub earth_radius: f64,
}

impl Default for HaversineDistance {
    fn default() -> Self {
        Self {
            earth_radius: EARTH_RADIUS_KM,
        }
    }
}

impl HaversineDistance {
    /// Create a new Haversine distance metric with custom Earth radius.
    pub fn with_radius(earth_radius: f64) -> Self {
        Self { earth_radius }
    }
}

impl DistanceMetric for HaversineDistance {
    #[inline]
    fn distance(&self, a: &LatLon, b: &LatLon) -> f64 {
        let d_lat = (b.lat - a.lat).to_radians();
        let d_lon = (b.lon - a.lon).to_radians();
        let h = (d_lat / 2.0).sin().powi(2)
            + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
        // rounding can push near-antipodal pairs just past 1
        let h = h.min(1.0);
        2.0 * self.earth_radius * h.sqrt().atan2((1.0 - h).sqrt())
    }
}

/// Great-circle distance in kilometers between two coordinates.
#[inline]
pub fn haversine_km(a: &LatLon, b: &LatLon) -> f64 {
    HaversineDistance::default().distance(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_distance() {
        let new_york = LatLon::new(40.7, -74.0);
        let london = LatLon::new(51.5, -0.1);
        // Should be approximately 5585 km
        let distance = haversine_km(&new_york, &london);
        assert!((distance - 5585.0).abs() < 50.0);
    }

    #[test]
    fn one_degree_at_equator() {
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        let d_lat = haversine_km(&LatLon::new(0.0, 0.0), &LatLon::new(1.0, 0.0));
        let d_lon = haversine_km(&LatLon::new(0.0, 0.0), &LatLon::new(0.0, 1.0));
        assert!((d_lat - expected).abs() < 1e-9);
        assert!((d_lon - expected).abs() < 1e-9);
    }

    #[test]
    fn coincident_points_are_zero() {
        let p = LatLon::new(-33.86, 151.21);
        assert_eq!(haversine_km(&p, &p), 0.0);
    }

    #[test]
    fn symmetric() {
        let a = LatLon::new(35.7, 139.7);
        let b = LatLon::new(-34.6, -58.4);
        assert!((haversine_km(&a, &b) - haversine_km(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn custom_radius_scales() {
        let a = LatLon::new(0.0, 0.0);
        let b = LatLon::new(0.0, 90.0);
        let meters = HaversineDistance::with_radius(EARTH_RADIUS_KM * 1000.0).distance(&a, &b);
        assert!((meters - haversine_km(&a, &b) * 1000.0).abs() < 1e-6);
    }
}
