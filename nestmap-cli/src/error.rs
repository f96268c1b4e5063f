//! Error types emitted by the nestmap CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use nestmap_core::{GatewayError, GeocodeError, RouteError, SearchError};
use nestmap_data::ServiceBuildError;
use thiserror::Error;

/// Errors emitted by the nestmap CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A listing identifier matched nothing in the dataset.
    #[error("no listing with id {id:?} in the dataset")]
    UnknownListing { id: String },
    /// An institution identifier matched nothing in the dataset.
    #[error("no institution with id {id:?} in the dataset")]
    UnknownInstitution { id: String },
    /// A POI category name was not recognised.
    #[error("unknown POI category {value:?} (expected supermarket, gym, restaurant, or transit_station)")]
    InvalidCategory { value: String },
    /// A coordinate pair could not be parsed.
    #[error("invalid coordinate pair {value:?} (expected \"lat,lng\")")]
    InvalidCoordinate { value: String },
    /// The dataset directory could not be opened.
    #[error("failed to open data directory {path:?}: {source}")]
    OpenDataDir {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A fixture file could not be read.
    #[error("failed to read fixture {path:?}: {source}")]
    ReadFixture {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Fixture JSON could not be decoded.
    #[error("failed to parse fixture JSON at {path:?}: {source}")]
    ParseFixture {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Constructing an HTTP adapter failed.
    #[error(transparent)]
    BuildAdapter(#[from] ServiceBuildError),
    /// The async runtime could not be started.
    #[error("failed to start the async runtime: {0}")]
    BuildRuntime(#[source] std::io::Error),
    /// The map engine could not be initialised.
    #[error("map engine unavailable: {0}")]
    Gateway(#[from] GatewayError),
    /// Nearby-place search failed for every requested category.
    #[error("nearby search failed: {0}")]
    Search(#[from] SearchError),
    /// Transit routing failed.
    #[error("transit routing failed: {0}")]
    Route(#[from] RouteError),
    /// Geocoding failed.
    #[error("geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
