//! Geographic coordinate math.
//!
//! Provides the [`Coordinate`] type reported by location providers and the
//! great-circle distance used by movement and proximity detection.

mod types;

pub use types::{CoordError, Coordinate};

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Conversion factor from degrees to radians.
const DEG_TO_RAD: f64 = std::f64::consts::PI / 180.0;

/// Calculate the great-circle distance between two coordinates.
///
/// Uses the haversine formula. The intermediate haversine term is clamped to
/// `[0, 1]` so that floating-point overshoot for antipodal or identical
/// points can never reach the inverse trigonometric step out of domain.
///
/// # Returns
///
/// Distance in meters. Always finite and non-negative for finite inputs.
///
/// # Example
///
/// ```
/// use findwatch::coord::{distance_meters, Coordinate};
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// let d = distance_meters(a, b);
/// assert!((d - 111_195.0).abs() < 10.0); // 1 degree of longitude at the equator
/// ```
pub fn distance_meters(a: Coordinate, b: Coordinate) -> f64 {
    let lat1_rad = a.latitude * DEG_TO_RAD;
    let lat2_rad = b.latitude * DEG_TO_RAD;
    let delta_lat = (b.latitude - a.latitude) * DEG_TO_RAD;
    let delta_lon = (b.longitude - a.longitude) * DEG_TO_RAD;

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);

    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_METERS * c
}

#[cfg(test)]
mod tests;
