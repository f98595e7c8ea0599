//! Distance command - great-circle distance between two points.

use findwatch::coord::{distance_meters, Coordinate};

use crate::error::CliError;

/// Print the distance in meters between (lat1, lon1) and (lat2, lon2).
pub fn run(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<(), CliError> {
    let meters = measure(lat1, lon1, lat2, lon2)?;
    println!("{:.1} m", meters);
    Ok(())
}

fn measure(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Result<f64, CliError> {
    let a = Coordinate::try_new(lat1, lon1)
        .map_err(|e| CliError::InvalidArgument(format!("first point: {}", e)))?;
    let b = Coordinate::try_new(lat2, lon2)
        .map_err(|e| CliError::InvalidArgument(format!("second point: {}", e)))?;
    Ok(distance_meters(a, b))
}
