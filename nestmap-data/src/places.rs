//! Nearby-place search backed by the map service's Places API.
//!
//! This module provides [`HttpPlaceSearch`], an implementation of
//! [`nestmap_core::PlaceSearch`] that queries the Nearby Search endpoint for
//! one category of place around a focal point.
//!
//! See: <https://developers.google.com/maps/documentation/places/web-service/search-nearby>

use async_trait::async_trait;
use nestmap_core::{NearbyQuery, PlaceSearch, Poi, PoiCategory, SearchError};
use reqwest::Client;
use serde::Deserialize;

use crate::http::{
    Geometry, MapsServiceConfig, ServiceBuildError, build_client, format_latlng, service_url,
};

/// Endpoint path for the Nearby Search API.
const NEARBY_PATH: &str = "maps/api/place/nearbysearch/json";

/// Nearby Search API response.
///
/// The response carries the matching places on success or an error message
/// on failure. The `status` field indicates the outcome.
#[derive(Debug, Deserialize)]
struct NearbySearchResponse {
    /// Status word from the service.
    ///
    /// Common values:
    /// - `"OK"` - At least one place matched
    /// - `"ZERO_RESULTS"` - The search ran but nothing matched
    /// - `"OVER_QUERY_LIMIT"` - Quota exhausted
    /// - `"REQUEST_DENIED"` - Key missing or invalid
    /// - `"INVALID_REQUEST"` - Malformed query parameters
    status: String,

    /// Places matching the query; absent or empty on failure.
    #[serde(default)]
    results: Vec<NearbyPlace>,

    /// Optional detail when `status` is not `"OK"`.
    error_message: Option<String>,
}

impl NearbySearchResponse {
    /// Check if the response indicates a completed search.
    ///
    /// `ZERO_RESULTS` counts as success: the lookup ran and found nothing,
    /// which is a valid answer for a sparse neighbourhood.
    fn is_ok(&self) -> bool {
        self.status == "OK" || self.status == "ZERO_RESULTS"
    }
}

/// One place in a Nearby Search response.
#[derive(Debug, Deserialize)]
struct NearbyPlace {
    /// Stable identifier assigned by the service.
    place_id: String,
    /// Display name.
    name: String,
    /// Position of the place.
    geometry: Geometry,
}

/// HTTP-based nearby-place search.
///
/// One instance serves every category; the category travels in the query.
/// Lookup failures map onto [`SearchError`], which the search coordinator
/// recovers from per category.
#[derive(Debug)]
pub struct HttpPlaceSearch {
    client: Client,
    config: MapsServiceConfig,
}

impl HttpPlaceSearch {
    /// Create a place search adapter from the shared service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: MapsServiceConfig) -> Result<Self, ServiceBuildError> {
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    fn nearby_url(&self) -> String {
        service_url(&self.config.base_url, NEARBY_PATH)
    }

    /// Build the query parameters for one nearby lookup.
    fn nearby_params(&self, query: &NearbyQuery) -> Vec<(&'static str, String)> {
        vec![
            ("location", format_latlng(query.centre)),
            ("radius", query.radius_m.to_string()),
            ("type", query.category.as_str().to_string()),
            ("key", self.config.api_key.clone()),
        ]
    }
}

#[async_trait(?Send)]
impl PlaceSearch for HttpPlaceSearch {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Poi>, SearchError> {
        let response = self
            .client
            .get(self.nearby_url())
            .query(&self.nearby_params(query))
            .send()
            .await
            .map_err(|err| classify_transport(&err))?
            .error_for_status()
            .map_err(|err| classify_transport(&err))?;

        let document: NearbySearchResponse =
            response
                .json()
                .await
                .map_err(|err| SearchError::Decode {
                    message: err.to_string(),
                })?;

        convert_nearby(document, query.category)
    }
}

/// Convert a transport-level failure to a `SearchError`.
fn classify_transport(error: &reqwest::Error) -> SearchError {
    if error.is_timeout() {
        return SearchError::Timeout;
    }

    if let Some(status) = error.status() {
        return SearchError::Http {
            status: status.as_u16(),
        };
    }

    SearchError::Network {
        message: error.to_string(),
    }
}

/// Convert a Nearby Search document to domain places.
fn convert_nearby(
    response: NearbySearchResponse,
    category: PoiCategory,
) -> Result<Vec<Poi>, SearchError> {
    if !response.is_ok() {
        return Err(SearchError::Service {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    Ok(response
        .results
        .into_iter()
        .map(|place| {
            Poi::new(
                place.place_id,
                place.name,
                category,
                place.geometry.location.coord(),
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::{fixture, rstest};

    #[fixture]
    fn search() -> HttpPlaceSearch {
        let config =
            MapsServiceConfig::new("test-key").with_base_url("https://maps.example.com");
        HttpPlaceSearch::new(config).expect("adapter should build")
    }

    #[rstest]
    fn nearby_url_targets_the_search_endpoint(search: HttpPlaceSearch) {
        assert_eq!(
            search.nearby_url(),
            "https://maps.example.com/maps/api/place/nearbysearch/json"
        );
    }

    #[rstest]
    fn nearby_params_carry_location_radius_type_and_key(search: HttpPlaceSearch) {
        let query = NearbyQuery::new(
            Coord {
                x: 35.0233,
                y: 32.7767,
            },
            PoiCategory::Supermarket,
        );

        let params = search.nearby_params(&query);

        assert_eq!(
            params,
            vec![
                ("location", "32.7767,35.0233".to_string()),
                ("radius", "1000".to_string()),
                ("type", "supermarket".to_string()),
                ("key", "test-key".to_string()),
            ]
        );
    }

    #[test]
    fn deserialise_success_response() {
        let json = r#"{
            "status": "OK",
            "results": [
                {
                    "place_id": "ChIJsupermarket1",
                    "name": "Corner Market",
                    "geometry": {"location": {"lat": 32.7772, "lng": 35.0241}}
                }
            ]
        }"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.is_ok());
        let places = convert_nearby(response, PoiCategory::Supermarket).expect("should convert");
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].external_id, "ChIJsupermarket1");
        assert_eq!(places[0].name, "Corner Market");
        assert_eq!(places[0].category, PoiCategory::Supermarket);
        assert_eq!(places[0].position, Coord { x: 35.0241, y: 32.7772 });
    }

    #[test]
    fn zero_results_converts_to_an_empty_list() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        let places = convert_nearby(response, PoiCategory::Gym).expect("should convert");
        assert!(places.is_empty());
    }

    #[test]
    fn request_denied_converts_to_a_service_error() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        let err = convert_nearby(response, PoiCategory::Restaurant).expect_err("should fail");

        match err {
            SearchError::Service { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[test]
    fn a_missing_results_field_deserialises_as_empty() {
        let json = r#"{"status": "OVER_QUERY_LIMIT"}"#;

        let response: NearbySearchResponse =
            serde_json::from_str(json).expect("should deserialise");

        assert!(response.results.is_empty());
        assert!(!response.is_ok());
    }
}
