use async_trait::async_trait;
use geo::Coord;
use thiserror::Error;

use crate::poi::{Poi, PoiCategory};

/// Default nearby-search radius in metres.
pub const DEFAULT_SEARCH_RADIUS_M: f64 = 1000.0;

/// One nearby-place query: a category searched around a focal point.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use nestmap_core::{NearbyQuery, PoiCategory};
///
/// let query = NearbyQuery::new(Coord { x: 34.99, y: 32.79 }, PoiCategory::Gym);
/// assert!((query.radius_m - 1000.0).abs() < f64::EPSILON);
/// let wide = query.with_radius(2500.0);
/// assert!((wide.radius_m - 2500.0).abs() < f64::EPSILON);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    /// Focal point, `x = longitude`, `y = latitude`.
    pub centre: Coord<f64>,
    /// Search radius in metres.
    pub radius_m: f64,
    /// Category to search for.
    pub category: PoiCategory,
}

impl NearbyQuery {
    /// Query around `centre` with the default radius.
    #[must_use]
    pub fn new(centre: Coord<f64>, category: PoiCategory) -> Self {
        Self {
            centre,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
            category,
        }
    }

    /// Override the search radius.
    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }
}

/// Errors from one nearby-place lookup.
///
/// Search failures are recovered locally by the coordinator: the failing
/// category is logged and skipped, and the pass continues.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// The request exceeded the configured timeout.
    #[error("the nearby place request timed out")]
    Timeout,
    /// The service answered with a non-success HTTP status.
    #[error("the place service returned HTTP status {status}")]
    Http {
        /// HTTP status code.
        status: u16,
    },
    /// The service could not be reached.
    #[error("failed to reach the place service: {message}")]
    Network {
        /// Transport-level failure description.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to decode the place service response: {message}")]
    Decode {
        /// Decoder failure description.
        message: String,
    },
    /// The service reported a request-level failure status.
    #[error("the place service rejected the request ({status}): {message}")]
    Service {
        /// Provider status word, e.g. `REQUEST_DENIED`.
        status: String,
        /// Provider-supplied detail, possibly empty.
        message: String,
    },
}

/// Nearby-place search boundary.
///
/// An empty result is a valid answer ("nothing of that category here"); an
/// `Err` marks the category's lookup as failed for the current pass.
#[async_trait(?Send)]
pub trait PlaceSearch {
    /// Search for places of one category around a focal point.
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Poi>, SearchError>;
}
