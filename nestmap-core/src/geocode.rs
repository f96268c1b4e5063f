use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

/// Errors from forward or reverse geocoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeocodeError {
    /// The query matched no location.
    #[error("no location matches the query")]
    NotFound,
    /// The request exceeded the configured timeout.
    #[error("the geocoding request timed out")]
    Timeout,
    /// The service answered with a non-success HTTP status.
    #[error("the geocoding service returned HTTP status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The service could not be reached.
    #[error("failed to reach the geocoding service: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode the geocoding response: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
    /// The service reported a request-level failure status.
    #[error("the geocoding service rejected the request ({status}): {message}")]
    Service {
        /// Provider status word, e.g. `REQUEST_DENIED`.
        status: String,
        /// Provider-supplied detail, possibly empty.
        message: String,
    },
}

/// Address-to-position and position-to-address lookups.
#[async_trait(?Send)]
pub trait Geocoder {
    /// Resolve a free-form address to a position, `x = longitude`,
    /// `y = latitude`.
    async fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError>;

    /// Resolve a position to its closest formatted address.
    async fn reverse_geocode(&self, position: Coord<f64>) -> Result<String, GeocodeError>;
}
