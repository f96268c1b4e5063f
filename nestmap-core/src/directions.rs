use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::route::TransitRoute;

/// Transit sub-modes requested from the directions service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitMode {
    /// Bus services.
    Bus,
    /// Rail services.
    Train,
}

impl TransitMode {
    /// Sub-modes requested by default.
    pub const DEFAULT: [Self; 2] = [Self::Bus, Self::Train];

    /// Stable wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Bus => "bus",
            Self::Train => "train",
        }
    }
}

/// Errors from one transit route request.
///
/// `NoRoute` is the expected miss: the endpoints are valid but no transit
/// path connects them. All variants are recovered locally by the route
/// coordinator, which clears its overlay and reports an absent summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// No transit route exists between the requested endpoints.
    #[error("no transit route exists between the requested endpoints")]
    NoRoute,
    /// The request exceeded the configured timeout.
    #[error("the directions request timed out")]
    Timeout,
    /// The service answered with a non-success HTTP status.
    #[error("the directions service returned HTTP status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The service could not be reached.
    #[error("failed to reach the directions service: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode the directions response: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
    /// The service reported a request-level failure status.
    #[error("the directions service rejected the request ({status}): {message}")]
    Service {
        /// Provider status word, e.g. `REQUEST_DENIED`.
        status: String,
        /// Provider-supplied detail, possibly empty.
        message: String,
    },
}

/// Transit directions boundary.
#[async_trait(?Send)]
pub trait DirectionsProvider {
    /// Compute a transit route between two positions.
    ///
    /// Positions use `x = longitude`, `y = latitude`.
    async fn transit_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<TransitRoute, RouteError>;
}
