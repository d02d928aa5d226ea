//! Deterministic simulated weather
//!
//! Stands in for the live API when it is unreachable. The generator is a
//! pure function of latitude and hour offset, so the same coordinate always
//! produces the same conditions. Timestamps are the only varying part.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, Utc};

use super::risk::{simulated_risk_score, SimulatedRiskInputs};
use super::{
    coordinate_id, coordinate_name, CompassDirection, ForecastHour, WeatherCondition,
    WeatherLocation, FORECAST_HOURS,
};

/// Rotating description labels, picked by volatility
const DESCRIPTIONS: [&str; 8] = [
    "Clear Sky",
    "Partly Cloudy",
    "Overcast",
    "Light Rain",
    "Heavy Rain",
    "Thunderstorm",
    "Snow Showers",
    "Mist",
];

/// Fixed city set served when the bulk endpoint is unavailable
const CITIES: [(&str, &str, f64, f64); 12] = [
    ("New York", "USA", 40.7128, -74.0060),
    ("London", "UK", 51.5074, -0.1278),
    ("Tokyo", "Japan", 35.6762, 139.6503),
    ("Sydney", "Australia", -33.8688, 151.2093),
    ("Reykjavik", "Iceland", 64.1466, -21.9426),
    ("Cape Town", "South Africa", -33.9249, 18.4241),
    ("Mumbai", "India", 19.0760, 72.8777),
    ("Rio de Janeiro", "Brazil", -22.9068, -43.1729),
    ("Cairo", "Egypt", 30.0444, 31.2357),
    ("Singapore", "Singapore", 1.3521, 103.8198),
    ("Moscow", "Russia", 55.7558, 37.6173),
    ("Vancouver", "Canada", 49.2827, -123.1207),
];

/// Source of locally generated forecasts
pub trait SimulationSource: Send + Sync {
    /// The static location set. Repeated calls return identical data.
    fn locations(&self) -> Vec<WeatherLocation>;

    /// A simulated location at exactly the given coordinates
    fn location_at(&self, latitude: f64, longitude: f64) -> WeatherLocation;
}

/// Seeded generator with a fixed 12-city dataset
#[derive(Debug, Clone)]
pub struct SeededSimulation {
    dataset: Vec<WeatherLocation>,
}

impl SeededSimulation {
    pub fn new() -> Self {
        Self::anchored_at(Utc::now())
    }

    /// Builds the static dataset with hour 0 at `anchor`
    pub fn anchored_at(anchor: DateTime<Utc>) -> Self {
        let dataset = CITIES
            .iter()
            .enumerate()
            .filter_map(|(i, (name, country, lat, lon))| {
                WeatherLocation::from_forecast(
                    format!("loc-{}", i),
                    *name,
                    *country,
                    *lat,
                    *lon,
                    simulated_forecast(*lat, anchor),
                )
            })
            .collect();

        Self { dataset }
    }
}

impl Default for SeededSimulation {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationSource for SeededSimulation {
    fn locations(&self) -> Vec<WeatherLocation> {
        self.dataset.clone()
    }

    fn location_at(&self, latitude: f64, longitude: f64) -> WeatherLocation {
        let forecast = simulated_forecast(latitude, Utc::now());
        let current = forecast
            .first()
            .map(|h| h.conditions.clone())
            .unwrap_or_default();

        WeatherLocation {
            id: coordinate_id(latitude, longitude),
            name: coordinate_name(latitude, longitude),
            country: "Unknown".to_string(),
            latitude,
            longitude,
            current,
            forecast,
        }
    }
}

/// Pseudo-random value in [0, 1), fully determined by `seed`
pub fn seeded_random(seed: f64) -> f64 {
    let x = seed.sin() * 10_000.0;
    x - x.floor()
}

/// 24 hours of simulated conditions for a latitude
pub fn simulated_forecast(latitude: f64, anchor: DateTime<Utc>) -> Vec<ForecastHour> {
    // Colder toward the poles
    let base_temperature = 20.0 - (latitude.abs() / 90.0) * 30.0;

    (0..FORECAST_HOURS)
        .map(|i| {
            let volatility = seeded_random(latitude + i as f64);
            let diurnal = ((i as f64 - 6.0) * PI / 12.0).sin() * 5.0;

            let temperature = base_temperature + diurnal + volatility * 2.0;
            let wind_speed = 5.0 + volatility * 25.0;
            let precipitation = if volatility > 0.7 {
                volatility * 100.0
            } else {
                0.0
            };

            let direction_index = ((volatility * 8.0).floor() as usize).min(7);
            let description_index = ((volatility * DESCRIPTIONS.len() as f64).floor() as usize)
                .min(DESCRIPTIONS.len() - 1);

            ForecastHour {
                hour_offset: i as u8,
                timestamp: anchor + Duration::hours(i as i64),
                conditions: WeatherCondition {
                    temperature: temperature.round(),
                    humidity: (50.0 + volatility * 40.0).round(),
                    wind_speed: wind_speed.round(),
                    wind_direction: CompassDirection::ALL[direction_index],
                    cloud_cover: (volatility * 100.0).round(),
                    precipitation_probability: precipitation.round(),
                    description: DESCRIPTIONS[description_index].to_string(),
                    risk_score: simulated_risk_score(&SimulatedRiskInputs {
                        temperature,
                        wind_speed,
                        precipitation,
                        volatility,
                    }),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn anchor() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 23, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_seeded_random_range_and_determinism() {
        for seed in [-90.0, -1.5, 0.0, 0.3, 40.7128, 64.1466, 1000.0] {
            let value = seeded_random(seed);
            assert!((0.0..1.0).contains(&value), "seed {} gave {}", seed, value);
            assert_eq!(value, seeded_random(seed));
        }
    }

    #[test]
    fn test_static_dataset_shape() {
        let locations = SeededSimulation::anchored_at(anchor()).locations();

        assert_eq!(locations.len(), 12);
        assert_eq!(locations[0].id, "loc-0");
        assert_eq!(locations[0].name, "New York");
        assert_eq!(locations[11].name, "Vancouver");
        for location in &locations {
            assert_eq!(location.forecast.len(), FORECAST_HOURS);
            assert_eq!(location.current, location.forecast[0].conditions);
        }
    }

    #[test]
    fn test_locations_are_stable_across_calls() {
        let simulation = SeededSimulation::new();
        assert_eq!(simulation.locations(), simulation.locations());
    }

    #[test]
    fn test_same_latitude_same_conditions() {
        let a = simulated_forecast(12.34, anchor());
        let b = simulated_forecast(12.34, anchor() + Duration::days(3));

        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.conditions, y.conditions);
        }
        assert_ne!(a[0].timestamp, b[0].timestamp);
    }

    #[test]
    fn test_location_at_uses_exact_coordinates() {
        let location = SeededSimulation::new().location_at(-33.8, 151.2);

        assert_eq!(location.latitude, -33.8);
        assert_eq!(location.longitude, 151.2);
        assert_eq!(location.id, "coord--33.8000-151.2000");
        assert_eq!(location.name, "33.80°S, 151.20°E");
        assert_eq!(location.country, "Unknown");
        assert_eq!(location.forecast.len(), FORECAST_HOURS);
    }

    #[test]
    fn test_generated_values_stay_in_bounds() {
        for latitude in [-89.9, -45.0, 0.0, 23.5, 64.1466, 89.9] {
            for hour in simulated_forecast(latitude, anchor()) {
                let c = &hour.conditions;
                assert!((0.0..=1.0).contains(&c.risk_score));
                assert!((50.0..=90.0).contains(&c.humidity));
                assert!((5.0..=30.0).contains(&c.wind_speed));
                assert!((0.0..=100.0).contains(&c.cloud_cover));
                assert!((0.0..=100.0).contains(&c.precipitation_probability));
            }
        }
    }

    #[test]
    fn test_rain_only_above_volatility_threshold() {
        for hour in simulated_forecast(40.7128, anchor()) {
            let volatility = seeded_random(40.7128 + hour.hour_offset as f64);
            if volatility <= 0.7 {
                assert_eq!(hour.conditions.precipitation_probability, 0.0);
            } else {
                assert!(hour.conditions.precipitation_probability >= 70.0);
            }
        }
    }
}
