//! Coordinate type definitions

use std::fmt;

/// A geographic position in decimal degrees.
///
/// Locations are taken as reported by the upstream provider; only
/// finiteness is checked (by [`Coordinate::try_new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, positive north
    pub latitude: f64,
    /// Longitude in degrees, positive east
    pub longitude: f64,
}

impl Coordinate {
    /// Create a coordinate without validation.
    #[inline]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create a coordinate, rejecting NaN and infinite components.
    pub fn try_new(latitude: f64, longitude: f64) -> Result<Self, CoordError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(CoordError::NonFinite {
                latitude,
                longitude,
            });
        }
        Ok(Self::new(latitude, longitude))
    }

    /// Great-circle distance to another coordinate, in meters.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        super::distance_meters(*self, *other)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lat {}, lng {}", self.latitude, self.longitude)
    }
}

/// Errors that can occur when constructing coordinates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoordError {
    /// Latitude or longitude is NaN or infinite.
    #[error("Coordinate is not finite: lat {latitude}, lng {longitude}")]
    NonFinite { latitude: f64, longitude: f64 },
}
