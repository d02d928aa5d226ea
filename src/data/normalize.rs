//! Upstream payload normalization
//!
//! Turns the two raw payload shapes the live service can produce into the
//! uniform [`WeatherLocation`] model:
//!
//! - [`ColumnSeriesPayload`]: one value array per physical variable, aligned
//!   to a shared time axis, for a single coordinate.
//! - [`LocationListPayload`]: a list of location objects, each with a
//!   forecast array whose field names vary between snake_case and camelCase.
//!
//! Missing values are never errors. They fall back to neutral defaults.

use std::collections::HashMap;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::warn;

use super::client::{FetchFailure, ForecastVariable, VariableSeries};
use super::risk::{clamp_risk, risk_score, RiskInputs};
use super::units::{
    humidity_from_dewpoint, kelvin_to_celsius, precipitation_probability, wind_direction,
    wind_speed_kmh,
};
use super::{
    coordinate_id, coordinate_name, CompassDirection, ForecastHour, WeatherCondition,
    WeatherLocation, FORECAST_HOURS,
};

/// Pressure assumed when the surface pressure series is absent (standard atmosphere, Pa)
const STANDARD_PRESSURE_PA: f64 = 101_325.0;

/// A raw upstream payload, tagged by shape
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    ColumnSeries(ColumnSeriesPayload),
    LocationList(LocationListPayload),
}

impl RawPayload {
    /// Normalizes into zero or more locations. Locations without forecast
    /// data are never returned.
    pub fn normalize(&self) -> Vec<WeatherLocation> {
        match self {
            RawPayload::ColumnSeries(payload) => {
                normalize_column_series(payload).into_iter().collect()
            }
            RawPayload::LocationList(payload) => normalize_location_list(payload),
        }
    }
}

impl From<ColumnSeriesPayload> for RawPayload {
    fn from(payload: ColumnSeriesPayload) -> Self {
        RawPayload::ColumnSeries(payload)
    }
}

impl From<LocationListPayload> for RawPayload {
    fn from(payload: LocationListPayload) -> Self {
        RawPayload::LocationList(payload)
    }
}

// ============================================================================
// Column / time-series shape
// ============================================================================

/// Per-variable series for one coordinate, aligned to a shared time axis
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSeriesPayload {
    pub latitude: f64,
    pub longitude: f64,
    /// Shared time axis; its length decides how many hours are produced
    pub time: Vec<String>,
    /// Samples per variable. Absent variables and short series read as missing.
    pub series: HashMap<ForecastVariable, Vec<Option<f64>>>,
    /// When the payload was received; anchors timestamps upstream left out
    pub received_at: DateTime<Utc>,
}

impl ColumnSeriesPayload {
    /// Merges single-variable responses.
    ///
    /// The time axis comes from the temperature series, or from the first
    /// series that carries one.
    pub fn from_variables(
        latitude: f64,
        longitude: f64,
        variables: Vec<VariableSeries>,
        received_at: DateTime<Utc>,
    ) -> Self {
        let time = variables
            .iter()
            .find(|s| s.variable == ForecastVariable::Temperature && !s.time.is_empty())
            .or_else(|| variables.iter().find(|s| !s.time.is_empty()))
            .map(|s| s.time.clone())
            .unwrap_or_default();

        let series = variables
            .into_iter()
            .map(|s| (s.variable, s.values))
            .collect();

        Self {
            latitude,
            longitude,
            time,
            series,
            received_at,
        }
    }

    /// Sample `index` of a variable, `None` when absent, null, short or non-finite
    fn value(&self, variable: ForecastVariable, index: usize) -> Option<f64> {
        self.series
            .get(&variable)
            .and_then(|values| values.get(index).copied().flatten())
            .filter(|v| v.is_finite())
    }
}

/// Normalizes a column payload into a single location.
///
/// Returns `None` when the time axis is empty.
pub fn normalize_column_series(payload: &ColumnSeriesPayload) -> Option<WeatherLocation> {
    let forecast = payload
        .time
        .iter()
        .take(FORECAST_HOURS)
        .enumerate()
        .map(|(i, time)| {
            let temp_c = kelvin_to_celsius(payload.value(ForecastVariable::Temperature, i));
            let u = payload.value(ForecastVariable::WindU, i).unwrap_or(0.0);
            let v = payload.value(ForecastVariable::WindV, i).unwrap_or(0.0);
            let wind_kmh = wind_speed_kmh(u, v);
            let precipitation = payload
                .value(ForecastVariable::Precipitation, i)
                .unwrap_or(0.0);
            let pressure_pa = payload
                .value(ForecastVariable::SurfacePressure, i)
                .unwrap_or(STANDARD_PRESSURE_PA);
            let dewpoint_c = payload
                .value(ForecastVariable::Dewpoint, i)
                .map(|k| kelvin_to_celsius(Some(k)))
                .unwrap_or(temp_c);
            let humidity = humidity_from_dewpoint(temp_c, dewpoint_c);

            let risk = risk_score(&RiskInputs {
                temperature: temp_c,
                wind_speed: wind_kmh,
                precipitation,
                pressure: pressure_pa / 100.0,
                humidity,
            });

            ForecastHour {
                hour_offset: i as u8,
                timestamp: parse_timestamp(time)
                    .unwrap_or_else(|| payload.received_at + Duration::hours(i as i64)),
                conditions: WeatherCondition {
                    temperature: temp_c.round(),
                    humidity: humidity.round(),
                    wind_speed: wind_kmh.round(),
                    wind_direction: wind_direction(u, v),
                    cloud_cover: 0.0,
                    precipitation_probability: precipitation_probability(precipitation),
                    description: describe_conditions(temp_c, precipitation, wind_kmh).to_string(),
                    risk_score: risk,
                },
            }
        })
        .collect();

    WeatherLocation::from_forecast(
        coordinate_id(payload.latitude, payload.longitude),
        coordinate_name(payload.latitude, payload.longitude),
        "Unknown",
        payload.latitude,
        payload.longitude,
        forecast,
    )
}

/// Short label for derived conditions. The first matching rule wins:
/// precipitation, then wind, then temperature.
pub fn describe_conditions(temperature: f64, precipitation: f64, wind_speed: f64) -> &'static str {
    if precipitation > 10.0 {
        "Heavy Rain"
    } else if precipitation > 5.0 {
        "Rain"
    } else if precipitation > 0.0 {
        "Light Rain"
    } else if wind_speed > 75.0 {
        "Storm"
    } else if wind_speed > 50.0 {
        "Strong Wind"
    } else if wind_speed > 30.0 {
        "Windy"
    } else if temperature > 30.0 {
        "Hot"
    } else if temperature < 0.0 {
        "Cold"
    } else {
        "Clear Sky"
    }
}

/// Parses the timestamp formats seen upstream. Values without an offset are
/// taken as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

// ============================================================================
// Location list shape
// ============================================================================

/// A list of location objects from the bulk endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct LocationListPayload {
    /// Raw entries, decoded one at a time so a bad entry only drops itself
    pub entries: Vec<Value>,
    /// When the payload was received; anchors timestamps upstream left out
    pub received_at: DateTime<Utc>,
}

impl LocationListPayload {
    /// Wraps a decoded response body. Anything other than a JSON array is malformed.
    pub fn from_json(value: Value, received_at: DateTime<Utc>) -> Result<Self, FetchFailure> {
        match value {
            Value::Array(entries) => Ok(Self {
                entries,
                received_at,
            }),
            other => Err(FetchFailure::Malformed(format!(
                "expected an array of locations, got {}",
                json_kind(&other)
            ))),
        }
    }
}

/// Field names accepted for each value, in priority order
mod fields {
    pub const ID: &[&str] = &["id"];
    pub const NAME: &[&str] = &["city", "name"];
    pub const COUNTRY: &[&str] = &["country"];
    pub const LATITUDE: &[&str] = &["lat", "latitude"];
    pub const LONGITUDE: &[&str] = &["lon", "lng", "longitude"];

    pub const TEMPERATURE: &[&str] = &["temp", "temperature"];
    pub const HUMIDITY: &[&str] = &["humidity"];
    pub const WIND_SPEED: &[&str] = &["wind_speed", "windSpeed"];
    pub const WIND_DIRECTION: &[&str] = &["wind_dir", "wind_direction", "windDirection"];
    pub const CLOUD_COVER: &[&str] = &["cloud_cover", "cloudCover"];
    pub const PRECIPITATION_PROBABILITY: &[&str] = &["precip_prob", "precipitationProbability"];
    pub const DESCRIPTION: &[&str] = &["condition", "description"];
    pub const RISK_SCORE: &[&str] = &["risk_score", "riskScore"];
    pub const TIMESTAMP: &[&str] = &["timestamp"];
}

type JsonObject = serde_json::Map<String, Value>;

/// Normalizes every well-formed entry. Entries that are not objects, lack
/// valid coordinates or have an empty forecast are dropped and logged.
pub fn normalize_location_list(payload: &LocationListPayload) -> Vec<WeatherLocation> {
    payload
        .entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| match map_location(index, entry, payload.received_at) {
            Ok(location) => Some(location),
            Err(reason) => {
                warn!(index, %reason, "dropping malformed location");
                None
            }
        })
        .collect()
}

fn map_location(
    index: usize,
    entry: &Value,
    received_at: DateTime<Utc>,
) -> Result<WeatherLocation, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| format!("expected a location object, got {}", json_kind(entry)))?;

    let latitude = number(obj, fields::LATITUDE)
        .filter(|lat| (-90.0..=90.0).contains(lat))
        .ok_or("missing or out-of-range latitude")?;
    let longitude = number(obj, fields::LONGITUDE)
        .filter(|lon| (-180.0..=180.0).contains(lon))
        .ok_or("missing or out-of-range longitude")?;

    let forecast = match obj.get("forecast") {
        Some(Value::Array(hours)) => hours
            .iter()
            .enumerate()
            .map(|(i, hour)| map_hour(i, hour, received_at))
            .collect(),
        _ => Vec::new(),
    };

    WeatherLocation::from_forecast(
        identifier(obj, fields::ID).unwrap_or_else(|| format!("remote-{}", index)),
        text(obj, fields::NAME).unwrap_or_else(|| "Unknown".to_string()),
        text(obj, fields::COUNTRY).unwrap_or_else(|| "Global".to_string()),
        latitude,
        longitude,
        forecast,
    )
    .ok_or_else(|| "empty forecast".to_string())
}

fn map_hour(index: usize, hour: &Value, received_at: DateTime<Utc>) -> ForecastHour {
    let empty = JsonObject::new();
    let obj = hour.as_object().unwrap_or(&empty);
    let value = |names: &[&str]| number(obj, names).unwrap_or(0.0);
    let percent = |names: &[&str]| value(names).clamp(0.0, 100.0);

    let timestamp = text(obj, fields::TIMESTAMP)
        .as_deref()
        .and_then(parse_timestamp)
        .unwrap_or_else(|| received_at + Duration::hours(index as i64));
    let wind_direction = text(obj, fields::WIND_DIRECTION)
        .as_deref()
        .and_then(CompassDirection::from_label)
        .unwrap_or(CompassDirection::North);
    let description =
        text(obj, fields::DESCRIPTION).unwrap_or_else(|| "Unknown".to_string());

    ForecastHour {
        hour_offset: index as u8,
        timestamp,
        conditions: WeatherCondition {
            temperature: value(fields::TEMPERATURE).round(),
            humidity: percent(fields::HUMIDITY),
            wind_speed: value(fields::WIND_SPEED).max(0.0),
            wind_direction,
            cloud_cover: percent(fields::CLOUD_COVER),
            precipitation_probability: percent(fields::PRECIPITATION_PROBABILITY),
            description,
            risk_score: clamp_risk(value(fields::RISK_SCORE)),
        },
    }
}

/// First listed field holding a number or numeric string
fn number(obj: &JsonObject, names: &[&str]) -> Option<f64> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find_map(as_number)
}

/// Other types, unparseable strings and non-finite numbers read as missing
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

/// First listed field holding a non-blank string
fn text(obj: &JsonObject, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        })
}

/// Like [`text`], but numeric ids are accepted too
fn identifier(obj: &JsonObject, names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| obj.get(*name))
        .find_map(|value| match value {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
