//! HTTP data adapters for the nestmap engine.
//!
//! Responsibilities:
//! - Implement the core provider boundaries (places, directions, geocoding)
//!   against the map service's web APIs.
//! - Fetch listing and institution records from a JSON directory service,
//!   degrading failures to empty collections.
//! - Ship the built-in demo dataset used by the CLI and tests.
//!
//! Boundaries:
//! - Do not encode reconciliation or session rules (live in `nestmap-core`).
//! - Wire documents stay private; the public surface speaks core domain
//!   types.
//!
//! # Example
//!
//! ```no_run
//! use nestmap_core::{NearbyQuery, PlaceSearch, PoiCategory};
//! use nestmap_data::{HttpPlaceSearch, MapsServiceConfig};
//! use geo::Coord;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MapsServiceConfig::new("api-key");
//! let search = HttpPlaceSearch::new(config)?;
//!
//! let query = NearbyQuery::new(Coord { x: 34.99, y: 32.79 }, PoiCategory::Supermarket);
//! let places = search.nearby(&query).await?;
//! println!("found {} supermarkets", places.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod demo;
mod directions;
mod geocode;
mod http;
mod listings;
mod places;

pub use demo::{demo_institutions, demo_listings};
pub use directions::HttpDirectionsProvider;
pub use geocode::HttpGeocoder;
pub use http::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT, MapsServiceConfig, ServiceBuildError};
pub use listings::{
    DirectoryConfig, FetchError, FetchReport, HttpListingDirectory, ListingDirectory,
};
pub use places::HttpPlaceSearch;
