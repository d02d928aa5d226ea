//! Live forecast API client
//!
//! Fetches raw payloads from the external forecast service: the bulk
//! location list, and one time series per physical variable for arbitrary
//! coordinates. Nothing here normalizes; see [`super::normalize`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Local, NaiveDateTime, Utc};
use reqwest::{header, Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::normalize::LocationListPayload;
use crate::config::ServiceConfig;

/// Timestamp format the API expects for `start_time`/`end_time` (local time, no offset)
const QUERY_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Maximum number of characters of an error body kept for diagnostics
const ERROR_BODY_LIMIT: usize = 200;

/// Why a live fetch did not produce usable data
#[derive(Debug, Error)]
pub enum FetchFailure {
    /// The deadline expired before the upstream answered
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// Network, DNS or TLS failure
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("upstream returned {status} for {target}: {body}")]
    Status {
        status: StatusCode,
        target: String,
        body: String,
    },

    /// Response body was not valid JSON
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON was valid but not in a recognised shape
    #[error("Malformed payload: {0}")]
    Malformed(String),

    /// Normalization left nothing to show
    #[error("response contained no usable forecast data")]
    NoForecastData,
}

/// Physical variables requested for a coordinate lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ForecastVariable {
    /// Air temperature at 2 m, Kelvin
    Temperature,
    /// Eastward wind at 100 m, m/s
    WindU,
    /// Northward wind at 100 m, m/s
    WindV,
    /// Total precipitation, mm
    Precipitation,
    /// Surface pressure, Pa
    SurfacePressure,
    /// Dewpoint at 2 m, Kelvin
    Dewpoint,
}

impl ForecastVariable {
    /// Every variable a coordinate lookup needs
    pub const ALL: [ForecastVariable; 6] = [
        ForecastVariable::Temperature,
        ForecastVariable::WindU,
        ForecastVariable::WindV,
        ForecastVariable::Precipitation,
        ForecastVariable::SurfacePressure,
        ForecastVariable::Dewpoint,
    ];

    /// Name used in the `variable` query parameter and response keys
    pub fn api_name(&self) -> &'static str {
        match self {
            ForecastVariable::Temperature => "2m_temperature",
            ForecastVariable::WindU => "100m_u_component_of_wind",
            ForecastVariable::WindV => "100m_v_component_of_wind",
            ForecastVariable::Precipitation => "total_precipitation",
            ForecastVariable::SurfacePressure => "surface_pressure",
            ForecastVariable::Dewpoint => "2m_dewpoint_temperature",
        }
    }

    pub fn from_api_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.api_name() == name)
    }
}

/// The `[start, end)` window requested from the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// A 24-hour window beginning at `now`, in local wall-clock time
    pub fn next_24_hours(now: DateTime<Local>) -> Self {
        let start = now.naive_local();
        Self {
            start,
            end: start + ChronoDuration::hours(24),
        }
    }

    pub fn start_param(&self) -> String {
        self.start.format(QUERY_TIME_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(QUERY_TIME_FORMAT).to_string()
    }
}

/// One variable's values plus the time axis they align to
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSeries {
    pub variable: ForecastVariable,
    /// Samples; `None` where upstream sent null
    pub values: Vec<Option<f64>>,
    pub unit: Option<String>,
    /// Time axis as sent by upstream (may be empty)
    pub time: Vec<String>,
}

/// `{ "data": [...], "unit": "K" }`
#[derive(Debug, Deserialize)]
struct SeriesBody {
    #[serde(default)]
    data: Vec<Option<f64>>,
    #[serde(default)]
    unit: Option<String>,
}

/// `{ "data": ["2026-01-23 07:00:00+10:00", ...] }`
#[derive(Debug, Default, Deserialize)]
struct TimeAxis {
    #[serde(default)]
    data: Vec<String>,
}

/// Single-variable response. The series is either at the top level or
/// nested under the variable's name.
#[derive(Debug, Deserialize)]
struct VariableResponse {
    #[serde(default)]
    data: Option<Vec<Option<f64>>>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(default)]
    time: Option<TimeAxis>,
    #[serde(flatten)]
    nested: HashMap<String, serde_json::Value>,
}

impl VariableSeries {
    /// Parses a single-variable response body
    pub fn from_json(variable: ForecastVariable, body: &str) -> Result<Self, FetchFailure> {
        let response: VariableResponse = serde_json::from_str(body)?;
        let time = response.time.map(|t| t.data).unwrap_or_default();

        if let Some(values) = response.data {
            return Ok(Self {
                variable,
                values,
                unit: response.unit,
                time,
            });
        }

        let nested = response.nested.get(variable.api_name()).ok_or_else(|| {
            FetchFailure::Malformed(format!("no series for {}", variable.api_name()))
        })?;
        let series: SeriesBody = serde_json::from_value(nested.clone())?;

        Ok(Self {
            variable,
            values: series.data,
            unit: series.unit,
            time,
        })
    }
}

/// Abstraction over the live forecast service
#[async_trait]
pub trait LiveWeatherSource: Send + Sync {
    /// Fetches the bulk list of locations
    async fn fetch_location_list(&self) -> Result<LocationListPayload, FetchFailure>;

    /// Fetches one variable's series for a coordinate over a time window
    async fn fetch_variable(
        &self,
        variable: ForecastVariable,
        latitude: f64,
        longitude: f64,
        window: &TimeWindow,
    ) -> Result<VariableSeries, FetchFailure>;
}

/// HTTP client for the forecast API
#[derive(Clone)]
pub struct ForecastApiClient {
    client: Client,
    endpoint: String,
    locations_endpoint: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ForecastApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ForecastApiClient")
            .field("endpoint", &self.endpoint)
            .field("locations_endpoint", &self.locations_endpoint)
            .field("api_key_set", &self.api_key.is_some())
            .finish()
    }
}

impl ForecastApiClient {
    /// Creates a client from the resolved service configuration
    pub fn new(config: &ServiceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Creates a client with a custom HTTP client
    pub fn with_client(client: Client, config: &ServiceConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            locations_endpoint: config.locations_endpoint().to_string(),
            api_key: config.api_key.clone(),
        }
    }

    /// Adds the headers every request carries
    fn decorate(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(header::ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    /// Sends a request and returns the body of a successful response
    async fn send(&self, request: RequestBuilder, target: &str) -> Result<String, FetchFailure> {
        let response = self.decorate(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Could not read error response".to_string());
            return Err(FetchFailure::Status {
                status,
                target: target.to_string(),
                body: truncate_body(&body),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LiveWeatherSource for ForecastApiClient {
    async fn fetch_location_list(&self) -> Result<LocationListPayload, FetchFailure> {
        debug!(url = %self.locations_endpoint, "fetching location list");

        let request = self.client.get(&self.locations_endpoint);
        let body = self.send(request, "location list").await?;
        let value: serde_json::Value = serde_json::from_str(&body)?;

        LocationListPayload::from_json(value, Utc::now())
    }

    async fn fetch_variable(
        &self,
        variable: ForecastVariable,
        latitude: f64,
        longitude: f64,
        window: &TimeWindow,
    ) -> Result<VariableSeries, FetchFailure> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("variable", variable.api_name().to_string()),
            ("start_time", window.start_param()),
            ("end_time", window.end_param()),
        ];
        debug!(url = %self.endpoint, variable = variable.api_name(), ?query, "fetching variable");

        let request = self.client.get(&self.endpoint).query(&query);
        let body = self.send(request, variable.api_name()).await?;

        VariableSeries::from_json(variable, &body)
    }
}

/// Keeps at most [`ERROR_BODY_LIMIT`] characters of a response body
fn truncate_body(body: &str) -> String {
    body.chars().take(ERROR_BODY_LIMIT).collect()
}
