//! Test helpers: command configurations, a scripted geocoder, and dataset
//! fixtures on disk.

use super::*;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::future::Future;
use std::path::Path;

use async_trait::async_trait;
use geo::Coord;
use nestmap_core::{DEFAULT_SEARCH_RADIUS_M, GeocodeError, Geocoder, PoiCategory};
use nestmap_data::DEFAULT_BASE_URL;

use crate::fixture::{INSTITUTIONS_FILE, LISTINGS_FILE};
use crate::geocode::GeocodeConfig;
use crate::pois::PoisConfig;
use crate::route::RouteConfig;

/// Drive a `?Send` future to completion on a current-thread runtime.
pub(super) fn run_local<F: Future>(future: F) -> F::Output {
    build_runtime()
        .expect("runtime should build")
        .block_on(future)
}

/// Pois configuration against the demo dataset with a test key.
pub(super) fn pois_config(listing: &str) -> PoisConfig {
    PoisConfig {
        listing: listing.to_owned(),
        api_key: "test-key".to_owned(),
        radius_m: DEFAULT_SEARCH_RADIUS_M,
        categories: [PoiCategory::Supermarket, PoiCategory::TransitStation]
            .into_iter()
            .collect(),
        base_url: DEFAULT_BASE_URL.to_owned(),
        data_dir: None,
    }
}

/// Route configuration against the demo dataset with a test key.
pub(super) fn route_config(listing: &str, institution: &str) -> RouteConfig {
    RouteConfig {
        listing: listing.to_owned(),
        institution: institution.to_owned(),
        api_key: "test-key".to_owned(),
        base_url: DEFAULT_BASE_URL.to_owned(),
        data_dir: None,
    }
}

/// Geocode configuration with a test key.
pub(super) fn geocode_config(query: &str, reverse: bool) -> GeocodeConfig {
    GeocodeConfig {
        query: query.to_owned(),
        reverse,
        api_key: "test-key".to_owned(),
        base_url: DEFAULT_BASE_URL.to_owned(),
    }
}

/// Write `listings.json` and `institutions.json` fixtures into `dir`.
pub(super) fn write_dataset(
    dir: &Path,
    listings: &[nestmap_core::Listing],
    institutions: &[nestmap_core::Institution],
) {
    let listings_json = serde_json::to_string(listings).expect("serialise listings");
    let institutions_json =
        serde_json::to_string(institutions).expect("serialise institutions");
    fs::write(dir.join(LISTINGS_FILE), listings_json).expect("write listings fixture");
    fs::write(dir.join(INSTITUTIONS_FILE), institutions_json)
        .expect("write institutions fixture");
}

/// Geocoder that answers from queues of scripted responses.
///
/// An unscripted call resolves to [`GeocodeError::NotFound`] so a
/// mis-scripted test fails on the output instead of hanging.
#[derive(Default)]
pub(super) struct ScriptedGeocoder {
    forward: RefCell<VecDeque<Result<Coord<f64>, GeocodeError>>>,
    reverse: RefCell<VecDeque<Result<String, GeocodeError>>>,
}

impl ScriptedGeocoder {
    pub(super) fn new() -> Self {
        Self::default()
    }

    pub(super) fn push_forward(&self, result: Result<Coord<f64>, GeocodeError>) {
        self.forward.borrow_mut().push_back(result);
    }

    pub(super) fn push_reverse(&self, result: Result<String, GeocodeError>) {
        self.reverse.borrow_mut().push_back(result);
    }
}

#[async_trait(?Send)]
impl Geocoder for ScriptedGeocoder {
    async fn geocode(&self, _address: &str) -> Result<Coord<f64>, GeocodeError> {
        self.forward
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(GeocodeError::NotFound))
    }

    async fn reverse_geocode(&self, _position: Coord<f64>) -> Result<String, GeocodeError> {
        self.reverse
            .borrow_mut()
            .pop_front()
            .unwrap_or(Err(GeocodeError::NotFound))
    }
}
