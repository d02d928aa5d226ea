//! Command-line interface parsing for riskglobe
//!
//! This module handles parsing of CLI arguments using clap and resolves them,
//! together with the environment, into the [`StartupConfig`] the binary runs
//! with. Precedence is flag, then environment variable, then built-in default.

use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

use crate::config::ServiceConfig;

/// Error types for CLI argument parsing
#[derive(Debug, Error, PartialEq)]
pub enum CliError {
    /// Not of the form `LAT,LON` with two numbers
    #[error("Invalid coordinates: '{0}'. Expected LAT,LON, e.g. 40.71,-74.01")]
    InvalidCoordinates(String),

    #[error("Latitude {0} out of range (-90 to 90)")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} out of range (-180 to 180)")]
    LongitudeOutOfRange(f64),

    /// Endpoint is not an absolute http(s) URL
    #[error("Invalid endpoint URL: '{0}'")]
    InvalidEndpoint(String),
}

/// riskglobe - Global weather risk dashboard
#[derive(Parser, Debug)]
#[command(name = "riskglobe")]
#[command(about = "Global weather risk dashboard with live forecasts and simulated fallback")]
#[command(version)]
pub struct Cli {
    /// Forecast API endpoint used for coordinate lookups
    #[arg(long, env = "RISKGLOBE_ENDPOINT", value_name = "URL")]
    pub endpoint: Option<String>,

    /// Endpoint returning the bulk location list (defaults to --endpoint)
    #[arg(long, env = "RISKGLOBE_LOCATIONS_ENDPOINT", value_name = "URL")]
    pub locations_endpoint: Option<String>,

    /// Bearer token sent with every API request
    #[arg(long, env = "RISKGLOBE_API_KEY", hide_env_values = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Look up a coordinate after startup; may be repeated
    ///
    /// Examples:
    ///   riskglobe --probe 40.71,-74.01
    ///   riskglobe --probe=-33.87,151.21 --probe 64.15,-21.94
    #[arg(
        long = "probe",
        value_name = "LAT,LON",
        allow_hyphen_values = true,
        value_parser = parse_coordinates
    )]
    pub probes: Vec<Coordinates>,

    /// Print locations as JSON instead of starting the dashboard
    #[arg(long)]
    pub json: bool,

    /// Write logs to this file (the dashboard never logs to the terminal)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

/// A validated latitude/longitude pair in degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Validates ranges: latitude -90..=90, longitude -180..=180
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CliError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CliError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CliError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }
}

impl FromStr for Coordinates {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_coordinates(s)
    }
}

/// Parses `LAT,LON` (whitespace around either number is allowed)
pub fn parse_coordinates(s: &str) -> Result<Coordinates, CliError> {
    let invalid = || CliError::InvalidCoordinates(s.to_string());

    let (lat, lon) = s.split_once(',').ok_or_else(invalid)?;
    let latitude: f64 = lat.trim().parse().map_err(|_| invalid())?;
    let longitude: f64 = lon.trim().parse().map_err(|_| invalid())?;
    if !latitude.is_finite() || !longitude.is_finite() {
        return Err(invalid());
    }

    Coordinates::new(latitude, longitude)
}

/// How results are presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Terminal dashboard
    #[default]
    Interactive,
    /// One-shot JSON on stdout
    Json,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone, Default)]
pub struct StartupConfig {
    pub service: ServiceConfig,
    /// Coordinates to look up once the location list has loaded
    pub probes: Vec<Coordinates>,
    pub output: OutputMode,
    pub log_file: Option<PathBuf>,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// Endpoints must be absolute http(s) URLs. An empty API key counts as unset.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let defaults = ServiceConfig::default();

        let endpoint = match &cli.endpoint {
            Some(url) => validate_endpoint(url)?,
            None => defaults.endpoint.clone(),
        };
        let locations_endpoint = cli
            .locations_endpoint
            .as_deref()
            .map(validate_endpoint)
            .transpose()?;
        let api_key = cli
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string);

        Ok(StartupConfig {
            service: ServiceConfig {
                endpoint,
                locations_endpoint,
                api_key,
                ..defaults
            },
            probes: cli.probes.clone(),
            output: if cli.json {
                OutputMode::Json
            } else {
                OutputMode::Interactive
            },
            log_file: cli.log_file.clone(),
        })
    }
}

fn validate_endpoint(url: &str) -> Result<String, CliError> {
    match reqwest::Url::parse(url.trim()) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Ok(url.trim().to_string()),
        _ => Err(CliError::InvalidEndpoint(url.to_string())),
    }
}
