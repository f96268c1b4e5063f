//! Shared configuration and plumbing for the map service HTTP adapters.
//!
//! The places, directions, and geocoding adapters all talk to the same web
//! service family: one base URL, one API key, one timeout policy, and the
//! same `lat,lng` coordinate formatting. This module centralises that
//! plumbing so each adapter only owns its endpoint and wire documents.

use std::time::Duration;

use geo::Coord;
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

/// Default base URL for the map service web APIs.
pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

/// Default user agent for map service requests.
pub const DEFAULT_USER_AGENT: &str = "nestmap-data/0.1";

/// Default request timeout in seconds.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Error raised when an adapter's HTTP client cannot be constructed.
#[derive(Debug, Error)]
#[error("failed to build the HTTP client: {source}")]
pub struct ServiceBuildError {
    #[from]
    source: reqwest::Error,
}

/// Shared configuration for the map service adapters.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use nestmap_data::MapsServiceConfig;
///
/// let config = MapsServiceConfig::new("secret-key")
///     .with_timeout(Duration::from_secs(5));
/// assert_eq!(config.base_url, "https://maps.googleapis.com");
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Clone)]
pub struct MapsServiceConfig {
    /// API key sent with every request.
    pub api_key: String,
    /// Base URL for the service (e.g. `"https://maps.googleapis.com"`).
    pub base_url: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for MapsServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapsServiceConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl MapsServiceConfig {
    /// Create a configuration with the given API key and default settings.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Set the service base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Build the HTTP client an adapter sends its requests with.
pub(crate) fn build_client(
    timeout: Duration,
    user_agent: &str,
) -> Result<Client, ServiceBuildError> {
    let client = Client::builder()
        .user_agent(user_agent)
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()?;
    Ok(client)
}

/// Join the configured base URL with an endpoint path.
pub(crate) fn service_url(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Format a coordinate as the `lat,lng` pair the service expects.
///
/// Positions in this workspace keep `x = longitude` and `y = latitude`, so
/// the components swap order on the wire.
pub(crate) fn format_latlng(position: Coord<f64>) -> String {
    format!("{},{}", position.y, position.x)
}

/// Geographic point as serialised in map service documents.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct LatLng {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl LatLng {
    /// Convert to a coordinate, `x = longitude`, `y = latitude`.
    pub fn coord(self) -> Coord<f64> {
        Coord {
            x: self.lng,
            y: self.lat,
        }
    }
}

/// Wrapper for the `geometry.location` shape shared by the place and
/// geocoding documents.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub(crate) struct Geometry {
    /// Position of the document's subject.
    pub location: LatLng,
}
