//! Weather service with automatic simulation fallback
//!
//! The two public operations never fail. Each one tries the live source
//! under a deadline; any failure is logged, then after a short pause the
//! simulation generator answers instead. The result always carries a
//! [`DataSource`] tag saying which source produced it.
//!
//! The live attempts are exposed separately (`try_live_*`) and return a
//! typed [`FetchFailure`] so the failure path can be tested on its own.

use std::sync::Arc;

use chrono::{Local, Utc};
use futures::future::try_join_all;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::data::{
    ColumnSeriesPayload, DataSource, FetchFailure, ForecastApiClient, ForecastVariable,
    LiveWeatherSource, RawPayload, SeededSimulation, SimulationSource, TimeWindow,
    WeatherLocation,
};

/// Result of [`WeatherService::fetch_all_locations`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationsResponse {
    pub locations: Vec<WeatherLocation>,
    pub source: DataSource,
}

/// Result of [`WeatherService::fetch_by_coordinates`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoordinateResponse {
    pub location: Option<WeatherLocation>,
    pub source: DataSource,
}

/// Chooses between the live API and the simulation for every request
#[derive(Clone)]
pub struct WeatherService {
    live: Arc<dyn LiveWeatherSource>,
    simulation: Arc<dyn SimulationSource>,
    config: ServiceConfig,
}

impl WeatherService {
    /// Creates a service backed by the HTTP client and the seeded simulation
    pub fn new(config: ServiceConfig) -> Self {
        let live = Arc::new(ForecastApiClient::new(&config));
        Self::with_sources(config, live, Arc::new(SeededSimulation::new()))
    }

    /// Creates a service with custom sources
    pub fn with_sources(
        config: ServiceConfig,
        live: Arc<dyn LiveWeatherSource>,
        simulation: Arc<dyn SimulationSource>,
    ) -> Self {
        info!(
            endpoint = %config.endpoint,
            locations_endpoint = %config.locations_endpoint(),
            api_key_set = config.has_api_key(),
            api_key_len = config.api_key.as_ref().map(|k| k.len()).unwrap_or(0),
            "weather service configured"
        );
        Self {
            live,
            simulation,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// All known locations. Falls back to the static simulated set on any failure.
    pub async fn fetch_all_locations(&self) -> LocationsResponse {
        match self.try_live_locations().await {
            Ok(locations) => {
                info!(count = locations.len(), "loaded live locations");
                LocationsResponse {
                    locations,
                    source: DataSource::Live,
                }
            }
            Err(failure) => {
                warn!(error = %failure, "live location list unavailable, using simulation");
                tokio::time::sleep(self.config.bulk_fallback_delay).await;
                LocationsResponse {
                    locations: self.simulation.locations(),
                    source: DataSource::Simulated,
                }
            }
        }
    }

    /// Forecast for arbitrary coordinates. Falls back to a simulated
    /// location at exactly those coordinates on any failure.
    pub async fn fetch_by_coordinates(&self, latitude: f64, longitude: f64) -> CoordinateResponse {
        match self.try_live_coordinates(latitude, longitude).await {
            Ok(location) => {
                info!(
                    latitude,
                    longitude,
                    hours = location.forecast.len(),
                    "loaded live forecast for coordinates"
                );
                CoordinateResponse {
                    location: Some(location),
                    source: DataSource::Live,
                }
            }
            Err(failure) => {
                warn!(
                    latitude,
                    longitude,
                    error = %failure,
                    "live coordinate forecast unavailable, using simulation"
                );
                tokio::time::sleep(self.config.coordinate_fallback_delay).await;
                CoordinateResponse {
                    location: Some(self.simulation.location_at(latitude, longitude)),
                    source: DataSource::Simulated,
                }
            }
        }
    }

    /// One live attempt at the bulk list, bounded by the bulk timeout.
    ///
    /// Malformed entries are dropped; an empty result is a failure.
    pub async fn try_live_locations(&self) -> Result<Vec<WeatherLocation>, FetchFailure> {
        let deadline = self.config.bulk_timeout;
        let payload = tokio::time::timeout(deadline, self.live.fetch_location_list())
            .await
            .map_err(|_| FetchFailure::Timeout(deadline))??;

        let locations = RawPayload::from(payload).normalize();
        // A live list with nothing usable is served as a failure, so the
        // dashboard shows the simulated set rather than an empty LIVE globe.
        if locations.is_empty() {
            return Err(FetchFailure::NoForecastData);
        }
        Ok(locations)
    }

    /// One live attempt at a coordinate lookup.
    ///
    /// Every variable is requested concurrently over the same 24-hour window.
    /// The first failing request fails the whole lookup and cancels the rest;
    /// the whole batch shares the coordinate timeout.
    pub async fn try_live_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherLocation, FetchFailure> {
        let window = TimeWindow::next_24_hours(Local::now());
        let requests = ForecastVariable::ALL
            .into_iter()
            .map(|variable| self.live.fetch_variable(variable, latitude, longitude, &window));

        let deadline = self.config.coordinate_timeout;
        let series = tokio::time::timeout(deadline, try_join_all(requests))
            .await
            .map_err(|_| FetchFailure::Timeout(deadline))??;

        let payload = ColumnSeriesPayload::from_variables(latitude, longitude, series, Utc::now());
        RawPayload::from(payload)
            .normalize()
            .into_iter()
            .next()
            .ok_or(FetchFailure::NoForecastData)
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
