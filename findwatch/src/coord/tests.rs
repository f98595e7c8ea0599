//! Tests for great-circle distance

use super::*;

/// Meters per degree of latitude along a meridian.
const METERS_PER_DEGREE: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

#[test]
fn test_distance_to_self_is_zero() {
    let points = [
        Coordinate::new(0.0, 0.0),
        Coordinate::new(53.630278, 9.988333),
        Coordinate::new(-33.9, 151.2),
        Coordinate::new(89.9999, -179.9999),
    ];

    for p in points {
        assert_eq!(distance_meters(p, p), 0.0, "distance from {} to itself", p);
    }
}

#[test]
fn test_distance_is_symmetric() {
    let a = Coordinate::new(43.629444, 1.363889);
    let b = Coordinate::new(53.630278, 9.988333);

    let ab = distance_meters(a, b);
    let ba = distance_meters(b, a);
    assert!((ab - ba).abs() < 1e-6, "ab={} ba={}", ab, ba);
}

#[test]
fn test_one_kilometer_along_meridian() {
    let a = Coordinate::new(10.0, 20.0);
    let b = Coordinate::new(10.0 + 1000.0 / METERS_PER_DEGREE, 20.0);

    let d = distance_meters(a, b);
    assert!((d - 1000.0).abs() < 10.0, "expected ~1000m, got {}", d);
}

#[test]
fn test_antipodal_points_are_finite() {
    let a = Coordinate::new(0.0, 0.0);
    let b = Coordinate::new(0.0, 180.0);

    let d = distance_meters(a, b);
    let half_circumference = std::f64::consts::PI * EARTH_RADIUS_METERS;
    assert!(d.is_finite());
    assert!((d - half_circumference).abs() < 1.0, "got {}", d);
}

#[test]
fn test_pole_to_pole() {
    let north = Coordinate::new(90.0, 0.0);
    let south = Coordinate::new(-90.0, 45.0);

    let d = distance_meters(north, south);
    assert!(!d.is_nan());
    assert!((d - std::f64::consts::PI * EARTH_RADIUS_METERS).abs() < 1.0);
}

#[test]
fn test_near_identical_points() {
    let a = Coordinate::new(51.5074, -0.1278);
    let b = Coordinate::new(51.5074 + 1e-9, -0.1278);

    let d = distance_meters(a, b);
    assert!(d >= 0.0);
    assert!(d < 0.01, "got {}", d);
}

#[test]
fn test_distance_to_method_matches_function() {
    let a = Coordinate::new(40.7128, -74.0060);
    let b = Coordinate::new(51.5074, -0.1278);

    assert_eq!(a.distance_to(&b), distance_meters(a, b));
    // New York to London is roughly 5570 km
    assert!((a.distance_to(&b) - 5_570_000.0).abs() < 20_000.0);
}

#[test]
fn test_try_new_rejects_non_finite() {
    assert!(Coordinate::try_new(f64::NAN, 0.0).is_err());
    assert!(Coordinate::try_new(0.0, f64::INFINITY).is_err());
    assert_eq!(
        Coordinate::try_new(1.5, 2.5).unwrap(),
        Coordinate::new(1.5, 2.5)
    );
}

#[test]
fn test_display_format() {
    let c = Coordinate::new(1.5, -2.25);
    assert_eq!(c.to_string(), "lat 1.5, lng -2.25");
}
