//! Listing and institution records fetched from a JSON directory service.
//!
//! The directory is the one external collaborator the engine does not own:
//! a plain HTTP service returning JSON arrays of listings and institutions,
//! optionally behind a bearer token. Fetch failures degrade to an empty
//! collection with an error flag ([`FetchReport`]) so a broken directory
//! renders an empty marker layer instead of taking down the surface.

use std::time::Duration;

use async_trait::async_trait;
use geo::Coord;
use nestmap_core::{Institution, Listing};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use crate::http::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT, ServiceBuildError, build_client, service_url};

/// Endpoint path for listing records.
const LISTINGS_PATH: &str = "listings";

/// Endpoint path for institution records.
const INSTITUTIONS_PATH: &str = "institutions";

/// Errors from one directory fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout.
    #[error("the directory request timed out")]
    Timeout,
    /// The service answered with a non-success HTTP status.
    #[error("the directory returned HTTP status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The service could not be reached.
    #[error("failed to reach the directory: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode the directory response: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
}

/// Outcome of one directory fetch: the records recovered plus the error
/// that curtailed them, if any.
///
/// # Examples
///
/// ```
/// use nestmap_data::{FetchError, FetchReport};
///
/// let report: FetchReport<u32> = FetchReport::from_result(Err(FetchError::Timeout));
/// assert!(report.is_degraded());
/// assert!(report.records.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetchReport<T> {
    /// Records fetched, in the directory's display order; empty when the
    /// fetch failed.
    pub records: Vec<T>,
    /// Failure that degraded this fetch, if any.
    pub error: Option<FetchError>,
}

impl<T> FetchReport<T> {
    /// Wrap a fetch result, turning an `Err` into the degraded shape.
    #[must_use]
    pub fn from_result(result: Result<Vec<T>, FetchError>) -> Self {
        match result {
            Ok(records) => Self {
                records,
                error: None,
            },
            Err(error) => Self {
                records: Vec::new(),
                error: Some(error),
            },
        }
    }

    /// Whether this fetch failed and reported an empty collection.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.error.is_some()
    }
}

impl<T> Default for FetchReport<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            error: None,
        }
    }
}

/// Source of listing and institution records.
///
/// Implementations report failures as a degraded [`FetchReport`] rather
/// than an `Err`; the host renders whatever records came back.
#[async_trait(?Send)]
pub trait ListingDirectory {
    /// Fetch all rental listings, in display order.
    async fn fetch_listings(&self) -> FetchReport<Listing>;

    /// Fetch all routable institutions, in display order.
    async fn fetch_institutions(&self) -> FetchReport<Institution>;
}

/// Configuration for [`HttpListingDirectory`].
#[derive(Clone)]
pub struct DirectoryConfig {
    /// Base URL of the directory service.
    pub base_url: String,
    /// Bearer token attached to every request, if any.
    pub bearer_token: Option<String>,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("base_url", &self.base_url)
            .field("bearer_token", &self.bearer_token.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl DirectoryConfig {
    /// Create a configuration for the directory at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            bearer_token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }

    /// Attach a bearer token to every request.
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
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

/// Listing record as serialised by the directory service.
///
/// Coordinates arrive as flat `latitude`/`longitude` columns; the aliases
/// accept the legacy field names (`type`, `images`) some deployments still
/// emit.
#[derive(Debug, Clone, Deserialize)]
struct ListingDoc {
    id: String,
    title: String,
    price: u32,
    latitude: f64,
    longitude: f64,
    #[serde(default, alias = "type")]
    room_type: String,
    #[serde(default)]
    address: String,
    #[serde(default)]
    description: String,
    #[serde(default, alias = "images")]
    image_urls: Vec<String>,
}

impl From<ListingDoc> for Listing {
    fn from(doc: ListingDoc) -> Self {
        Self::new(
            doc.id,
            doc.title,
            doc.price,
            Coord {
                x: doc.longitude,
                y: doc.latitude,
            },
        )
        .with_room_type(doc.room_type)
        .with_address(doc.address)
        .with_description(doc.description)
        .with_image_urls(doc.image_urls)
    }
}

/// Institution record as serialised by the directory service.
#[derive(Debug, Clone, Deserialize)]
struct InstitutionDoc {
    id: String,
    name: String,
    #[serde(default, alias = "type")]
    category: String,
    latitude: f64,
    longitude: f64,
}

impl From<InstitutionDoc> for Institution {
    fn from(doc: InstitutionDoc) -> Self {
        Self::new(
            doc.id,
            doc.name,
            doc.category,
            Coord {
                x: doc.longitude,
                y: doc.latitude,
            },
        )
    }
}

/// HTTP JSON directory adapter for listings and institutions.
#[derive(Debug)]
pub struct HttpListingDirectory {
    client: Client,
    config: DirectoryConfig,
}

impl HttpListingDirectory {
    /// Create a directory adapter from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: DirectoryConfig) -> Result<Self, ServiceBuildError> {
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    /// Fetch and decode one record collection.
    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Vec<T>, FetchError> {
        let url = service_url(&self.config.base_url, path);

        let mut request = self.client.get(&url);
        if let Some(token) = &self.config.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| classify_transport(&err))?
            .error_for_status()
            .map_err(|err| classify_transport(&err))?;

        response.json().await.map_err(|err| FetchError::Decode {
            message: err.to_string(),
        })
    }
}

#[async_trait(?Send)]
impl ListingDirectory for HttpListingDirectory {
    async fn fetch_listings(&self) -> FetchReport<Listing> {
        let result = self.fetch::<ListingDoc>(LISTINGS_PATH).await;
        if let Err(err) = &result {
            log::warn!("listing fetch degraded: {err}");
        }
        FetchReport::from_result(
            result.map(|docs| docs.into_iter().map(Listing::from).collect()),
        )
    }

    async fn fetch_institutions(&self) -> FetchReport<Institution> {
        let result = self.fetch::<InstitutionDoc>(INSTITUTIONS_PATH).await;
        if let Err(err) = &result {
            log::warn!("institution fetch degraded: {err}");
        }
        FetchReport::from_result(
            result.map(|docs| docs.into_iter().map(Institution::from).collect()),
        )
    }
}

/// Convert a transport-level failure to a `FetchError`.
fn classify_transport(error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::Timeout;
    }

    if let Some(status) = error.status() {
        return FetchError::Http {
            status: status.as_u16(),
        };
    }

    FetchError::Network {
        message: error.to_string(),
    }
}
