//! Great-circle geometry between ground stations.

use crate::descriptor::SiteDescriptor;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine great-circle distance in km between two (lat, lon) pairs
/// given in degrees.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    // Rounding can push `a` a hair above 1 for antipodal points.
    2.0 * EARTH_RADIUS_KM * a.clamp(0.0, 1.0).sqrt().asin()
}

/// Great-circle distance in km between two sites.
pub fn great_circle_km(a: &SiteDescriptor, b: &SiteDescriptor) -> f64 {
    haversine_km(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}
