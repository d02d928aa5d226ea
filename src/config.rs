//! Service configuration
//!
//! Resolved once at startup (see [`crate::cli::StartupConfig`]) and passed by
//! value into the weather service. Nothing else reads configuration.

use std::fmt;
use std::time::Duration;

/// Default forecast API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.zeussubnet.com/forecast";

/// Deadline for the bulk location list request
pub const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(5);

/// Aggregate deadline for all variable requests of one coordinate lookup
pub const DEFAULT_COORDINATE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pause before serving the simulated location set
pub const DEFAULT_BULK_FALLBACK_DELAY: Duration = Duration::from_millis(1500);

/// Pause before serving a simulated coordinate lookup
pub const DEFAULT_COORDINATE_FALLBACK_DELAY: Duration = Duration::from_millis(800);

/// Everything the weather service needs to talk to the live API
#[derive(Clone, PartialEq)]
pub struct ServiceConfig {
    /// Per-variable forecast endpoint
    pub endpoint: String,
    /// Bulk location list endpoint; the forecast endpoint when unset
    pub locations_endpoint: Option<String>,
    /// Bearer credential, attached to every request when present
    pub api_key: Option<String>,
    pub bulk_timeout: Duration,
    pub coordinate_timeout: Duration,
    pub bulk_fallback_delay: Duration,
    pub coordinate_fallback_delay: Duration,
}

impl ServiceConfig {
    /// URL the bulk location list is fetched from
    pub fn locations_endpoint(&self) -> &str {
        self.locations_endpoint.as_deref().unwrap_or(&self.endpoint)
    }

    /// Whether an API key is configured
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            locations_endpoint: None,
            api_key: None,
            bulk_timeout: DEFAULT_BULK_TIMEOUT,
            coordinate_timeout: DEFAULT_COORDINATE_TIMEOUT,
            bulk_fallback_delay: DEFAULT_BULK_FALLBACK_DELAY,
            coordinate_fallback_delay: DEFAULT_COORDINATE_FALLBACK_DELAY,
        }
    }
}

// The key itself must never reach logs
impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("endpoint", &self.endpoint)
            .field("locations_endpoint", &self.locations_endpoint())
            .field("api_key_len", &self.api_key.as_ref().map(|k| k.len()))
            .field("bulk_timeout", &self.bulk_timeout)
            .field("coordinate_timeout", &self.coordinate_timeout)
            .field("bulk_fallback_delay", &self.bulk_fallback_delay)
            .field("coordinate_fallback_delay", &self.coordinate_fallback_delay)
            .finish()
    }
}
