//! Core data models for riskglobe
//!
//! This module contains the uniform forecast model shared by the whole
//! application: every upstream payload, live or simulated, ends up as a
//! [`WeatherLocation`] holding an ordered 24-hour [`ForecastHour`] sequence.

pub mod client;
pub mod normalize;
pub mod risk;
pub mod simulation;
pub mod units;

pub use client::{
    FetchFailure, ForecastApiClient, ForecastVariable, LiveWeatherSource, TimeWindow,
    VariableSeries,
};
pub use normalize::{ColumnSeriesPayload, LocationListPayload, RawPayload};
pub use risk::{RiskInputs, RiskLevel};
pub use simulation::{SeededSimulation, SimulationSource};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Number of hourly entries in a well-formed forecast
pub const FORECAST_HOURS: usize = 24;

/// One of the eight compass points used for wind direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassDirection {
    #[serde(rename = "N")]
    North,
    #[serde(rename = "NE")]
    NorthEast,
    #[serde(rename = "E")]
    East,
    #[serde(rename = "SE")]
    SouthEast,
    #[serde(rename = "S")]
    South,
    #[serde(rename = "SW")]
    SouthWest,
    #[serde(rename = "W")]
    West,
    #[serde(rename = "NW")]
    NorthWest,
}

impl CompassDirection {
    /// All eight sectors, clockwise from north. Index `i` covers `i * 45°`.
    pub const ALL: [CompassDirection; 8] = [
        CompassDirection::North,
        CompassDirection::NorthEast,
        CompassDirection::East,
        CompassDirection::SouthEast,
        CompassDirection::South,
        CompassDirection::SouthWest,
        CompassDirection::West,
        CompassDirection::NorthWest,
    ];

    /// Short label as shown to users ("N", "NE", ...)
    pub fn label(&self) -> &'static str {
        match self {
            CompassDirection::North => "N",
            CompassDirection::NorthEast => "NE",
            CompassDirection::East => "E",
            CompassDirection::SouthEast => "SE",
            CompassDirection::South => "S",
            CompassDirection::SouthWest => "SW",
            CompassDirection::West => "W",
            CompassDirection::NorthWest => "NW",
        }
    }

    /// Parses a short label, case-insensitively. Returns `None` for anything
    /// that is not one of the eight points.
    pub fn from_label(s: &str) -> Option<Self> {
        let upper = s.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|d| d.label() == upper)
    }
}

impl fmt::Display for CompassDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Weather conditions for a single point in time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherCondition {
    /// Temperature in Celsius, rounded to a whole degree
    pub temperature: f64,
    /// Relative humidity percentage (0-100)
    pub humidity: f64,
    /// Wind speed in km/h (never negative)
    pub wind_speed: f64,
    /// Direction the wind is coming from
    pub wind_direction: CompassDirection,
    /// Cloud cover percentage (0-100), 0 when unknown
    pub cloud_cover: f64,
    /// Precipitation probability percentage (0-100)
    pub precipitation_probability: f64,
    /// Short human-readable label, e.g. "Light Rain"
    pub description: String,
    /// Heuristic severity in [0.0, 1.0]
    pub risk_score: f64,
}

impl Default for WeatherCondition {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            humidity: 0.0,
            wind_speed: 0.0,
            wind_direction: CompassDirection::North,
            cloud_cover: 0.0,
            precipitation_probability: 0.0,
            description: "Unknown".to_string(),
            risk_score: 0.0,
        }
    }
}

/// Forecast for one hour within the rolling 24-hour window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastHour {
    /// Position within the forecast sequence (0..=23), not a wall-clock hour
    pub hour_offset: u8,
    /// Absolute time this entry applies to
    pub timestamp: DateTime<Utc>,
    /// Conditions for this hour
    #[serde(flatten)]
    pub conditions: WeatherCondition,
}

/// A location with its current conditions and hourly forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherLocation {
    /// Stable identity, from the source or synthesized from coordinates
    pub id: String,
    /// Display name
    pub name: String,
    /// Country name, "Unknown" for ad-hoc coordinates
    pub country: String,
    /// Latitude in degrees (-90..=90)
    pub latitude: f64,
    /// Longitude in degrees (-180..=180)
    pub longitude: f64,
    /// Always equal to `forecast[0]`'s conditions
    pub current: WeatherCondition,
    /// Hourly entries; index `i` has `hour_offset == i`
    pub forecast: Vec<ForecastHour>,
}

impl WeatherLocation {
    /// Builds a location from an ordered forecast.
    ///
    /// Hour offsets are reassigned from sequence position and `current` is
    /// taken from the first entry. Returns `None` for an empty forecast so a
    /// location without data can never be surfaced.
    pub fn from_forecast(
        id: impl Into<String>,
        name: impl Into<String>,
        country: impl Into<String>,
        latitude: f64,
        longitude: f64,
        mut forecast: Vec<ForecastHour>,
    ) -> Option<Self> {
        forecast.truncate(FORECAST_HOURS);
        for (i, hour) in forecast.iter_mut().enumerate() {
            hour.hour_offset = i as u8;
        }
        let current = forecast.first()?.conditions.clone();

        Some(Self {
            id: id.into(),
            name: name.into(),
            country: country.into(),
            latitude,
            longitude,
            current,
            forecast,
        })
    }

    /// Returns the forecast entry for an hour offset, if present
    pub fn hour(&self, hour_offset: usize) -> Option<&ForecastHour> {
        self.forecast.get(hour_offset)
    }

    /// Whether this location sits within `tolerance` degrees of a point on both axes
    pub fn is_near(&self, latitude: f64, longitude: f64, tolerance: f64) -> bool {
        (self.latitude - latitude).abs() < tolerance
            && (self.longitude - longitude).abs() < tolerance
    }
}

/// Synthesizes the id used for ad-hoc coordinate lookups
pub fn coordinate_id(latitude: f64, longitude: f64) -> String {
    format!("coord-{:.4}-{:.4}", latitude, longitude)
}

/// Formats coordinates as a display name, e.g. "40.71°N, 74.01°W"
pub fn coordinate_name(latitude: f64, longitude: f64) -> String {
    let ns = if latitude >= 0.0 { 'N' } else { 'S' };
    let ew = if longitude >= 0.0 { 'E' } else { 'W' };
    format!(
        "{:.2}\u{00B0}{}, {:.2}\u{00B0}{}",
        latitude.abs(),
        ns,
        longitude.abs(),
        ew
    )
}

/// Where a result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DataSource {
    /// The external forecast API answered
    Live,
    /// The local simulation generator stood in
    Simulated,
}

impl DataSource {
    pub fn label(&self) -> &'static str {
        match self {
            DataSource::Live => "LIVE",
            DataSource::Simulated => "SIMULATED",
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
