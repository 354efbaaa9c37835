use geo::{GeodesicDistance, Point};
use serde::Deserialize;
use crate::models::Position;

/// Earth's mean radius in kilometers
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance formula used when ranking candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMethod {
    /// Ellipsoidal geodesic on WGS-84 (Karney)
    #[default]
    Geodesic,
    /// Great-circle distance on a sphere
    Haversine,
}

impl DistanceMethod {
    #[inline]
    pub fn distance_km(self, from: &Position, to: &Position) -> f64 {
        match self {
            DistanceMethod::Geodesic => geodesic_distance_km(from, to),
            DistanceMethod::Haversine => haversine_distance_km(from, to),
        }
    }
}

/// Calculate the WGS-84 geodesic distance between two positions in kilometers
///
/// Identical positions short-circuit to exactly `0.0`.
#[inline]
pub fn geodesic_distance_km(from: &Position, to: &Position) -> f64 {
    if from == to {
        return 0.0;
    }

    let a = Point::new(from.longitude, from.latitude);
    let b = Point::new(to.longitude, to.latitude);

    a.geodesic_distance(&b) / 1000.0
}

/// Calculate the Haversine distance between two positions in kilometers
///
/// # Arguments
/// * `from` - First position in degrees
/// * `to` - Second position in degrees
///
/// # Returns
/// Distance in kilometers
#[inline]
pub fn haversine_distance_km(from: &Position, to: &Position) -> f64 {
    let lat1_rad = from.latitude.to_radians();
    let lat2_rad = to.latitude.to_radians();
    let delta_lat = (to.latitude - from.latitude).to_radians();
    let delta_lon = (to.longitude - from.longitude).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}
