//! Unit conversions for raw upstream measurements
//!
//! Pure numeric helpers used by the normalizer: temperature in Kelvin, wind
//! as eastward/northward vector components in m/s, and dewpoint.

use super::CompassDirection;

/// Offset between Kelvin and Celsius
const KELVIN_OFFSET: f64 = 273.15;

/// m/s to km/h
const MS_TO_KMH: f64 = 3.6;

/// Magnus formula coefficients
const MAGNUS_A: f64 = 17.27;
const MAGNUS_B: f64 = 237.7;

/// Precipitation (mm) to probability (%) multiplier. Fixed policy, not a derived formula.
const PRECIP_PROBABILITY_PER_MM: f64 = 10.0;

/// Converts Kelvin to Celsius. A missing or non-finite sample yields 0.
pub fn kelvin_to_celsius(kelvin: Option<f64>) -> f64 {
    match kelvin {
        Some(k) if k.is_finite() => k - KELVIN_OFFSET,
        _ => 0.0,
    }
}

/// Wind speed in km/h from eastward (`u`) and northward (`v`) components in m/s
pub fn wind_speed_kmh(u: f64, v: f64) -> f64 {
    (u * u + v * v).sqrt() * MS_TO_KMH
}

/// Compass sector for a wind vector.
///
/// The angle is `atan2(u, v)`, measured clockwise from north, i.e. the
/// direction the vector points toward. (0, 1) is N and (1, 0) is E.
pub fn wind_direction(u: f64, v: f64) -> CompassDirection {
    direction_from_degrees(u.atan2(v).to_degrees())
}

/// Buckets an angle in degrees into one of eight 45° sectors.
///
/// Sector boundaries (22.5°, 67.5°, ...) round half away from zero, so 22.5°
/// is NE and 337.5° wraps to N.
pub fn direction_from_degrees(degrees: f64) -> CompassDirection {
    let normalized = (degrees + 360.0) % 360.0;
    let index = (normalized / 45.0).round() as usize % 8;
    CompassDirection::ALL[index]
}

/// Relative humidity (%) from temperature and dewpoint in Celsius via the
/// Magnus approximation, clamped to [0, 100]
pub fn humidity_from_dewpoint(temp_c: f64, dewpoint_c: f64) -> f64 {
    let alpha = |t: f64| MAGNUS_A * t / (MAGNUS_B + t);
    let humidity = 100.0 * (alpha(dewpoint_c) - alpha(temp_c)).exp();
    if humidity.is_nan() {
        return 0.0;
    }
    humidity.clamp(0.0, 100.0)
}

/// Maps a precipitation amount in mm to a probability percentage
pub fn precipitation_probability(precipitation_mm: f64) -> f64 {
    if precipitation_mm > 0.0 {
        (precipitation_mm * PRECIP_PROBABILITY_PER_MM).min(100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    #[test]
    fn test_kelvin_to_celsius() {
        assert!((kelvin_to_celsius(Some(273.15)) - 0.0).abs() < 1e-9);
        assert!((kelvin_to_celsius(Some(297.87)) - 24.72).abs() < 1e-9);
        assert_eq!(kelvin_to_celsius(None), 0.0);
        assert_eq!(kelvin_to_celsius(Some(f64::NAN)), 0.0);
    }

    #[test]
    fn test_wind_speed_kmh() {
        assert!((wind_speed_kmh(3.0, 4.0) - 18.0).abs() < 1e-9);
        assert_eq!(wind_speed_kmh(0.0, 0.0), 0.0);
        assert!(wind_speed_kmh(-3.0, -4.0) > 0.0);
    }

    #[test]
    fn test_wind_direction_canonical_unit_vectors() {
        let d = FRAC_1_SQRT_2;
        let cases = [
            ((0.0, 1.0), CompassDirection::North),
            ((d, d), CompassDirection::NorthEast),
            ((1.0, 0.0), CompassDirection::East),
            ((d, -d), CompassDirection::SouthEast),
            ((0.0, -1.0), CompassDirection::South),
            ((-d, -d), CompassDirection::SouthWest),
            ((-1.0, 0.0), CompassDirection::West),
            ((-d, d), CompassDirection::NorthWest),
        ];
        for ((u, v), expected) in cases {
            assert_eq!(wind_direction(u, v), expected, "u={}, v={}", u, v);
        }
    }

    #[test]
    fn test_calm_wind_is_north() {
        assert_eq!(wind_direction(0.0, 0.0), CompassDirection::North);
    }

    #[test]
    fn test_direction_sector_boundaries_round_up() {
        assert_eq!(direction_from_degrees(22.5), CompassDirection::NorthEast);
        assert_eq!(direction_from_degrees(67.5), CompassDirection::East);
        assert_eq!(direction_from_degrees(112.5), CompassDirection::SouthEast);
        assert_eq!(direction_from_degrees(157.5), CompassDirection::South);
        assert_eq!(direction_from_degrees(202.5), CompassDirection::SouthWest);
        assert_eq!(direction_from_degrees(247.5), CompassDirection::West);
        assert_eq!(direction_from_degrees(292.5), CompassDirection::NorthWest);
        assert_eq!(direction_from_degrees(337.5), CompassDirection::North);
    }

    #[test]
    fn test_direction_just_below_boundary() {
        assert_eq!(direction_from_degrees(22.4), CompassDirection::North);
        assert_eq!(direction_from_degrees(-22.4), CompassDirection::North);
        assert_eq!(direction_from_degrees(-22.6), CompassDirection::NorthWest);
    }

    #[test]
    fn test_humidity_saturated_when_dewpoint_equals_temperature() {
        assert!((humidity_from_dewpoint(20.0, 20.0) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_humidity_typical_value() {
        // 25°C with a 15°C dewpoint is roughly 54%
        let rh = humidity_from_dewpoint(25.0, 15.0);
        assert!((rh - 53.9).abs() < 1.0, "got {}", rh);
    }

    #[test]
    fn test_humidity_clamped_when_dewpoint_exceeds_temperature() {
        assert_eq!(humidity_from_dewpoint(10.0, 15.0), 100.0);
    }

    #[test]
    fn test_precipitation_probability() {
        assert_eq!(precipitation_probability(0.0), 0.0);
        assert_eq!(precipitation_probability(-1.0), 0.0);
        assert!((precipitation_probability(2.5) - 25.0).abs() < 1e-9);
        assert_eq!(precipitation_probability(42.0), 100.0);
    }
}
