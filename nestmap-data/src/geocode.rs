//! Forward and reverse geocoding backed by the map service's Geocoding API.
//!
//! This module provides [`HttpGeocoder`], an implementation of
//! [`nestmap_core::Geocoder`] that resolves free-form addresses to positions
//! and positions to formatted addresses.
//!
//! See: <https://developers.google.com/maps/documentation/geocoding/requests-geocoding>

use async_trait::async_trait;
use geo::Coord;
use nestmap_core::{GeocodeError, Geocoder};
use reqwest::Client;
use serde::Deserialize;

use crate::http::{
    Geometry, MapsServiceConfig, ServiceBuildError, build_client, format_latlng, service_url,
};

/// Endpoint path for the Geocoding API.
const GEOCODE_PATH: &str = "maps/api/geocode/json";

/// Geocoding API response.
///
/// The response carries candidate locations on success or an error message
/// on failure. The `status` field indicates the outcome.
#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    /// Status word from the service.
    ///
    /// Common values:
    /// - `"OK"` - At least one candidate matched
    /// - `"ZERO_RESULTS"` - The query resolved to no location
    /// - `"OVER_QUERY_LIMIT"` - Quota exhausted
    /// - `"REQUEST_DENIED"` - Key missing or invalid
    /// - `"INVALID_REQUEST"` - Malformed query parameters
    status: String,

    /// Candidate locations, best match first; absent or empty on failure.
    #[serde(default)]
    results: Vec<GeocodeCandidate>,

    /// Optional detail when `status` is not `"OK"`.
    error_message: Option<String>,
}

/// One candidate location in a Geocoding response.
#[derive(Debug, Deserialize)]
struct GeocodeCandidate {
    /// Human-readable address of the candidate.
    formatted_address: String,
    /// Position of the candidate.
    geometry: Geometry,
}

/// HTTP-based forward and reverse geocoder.
#[derive(Debug)]
pub struct HttpGeocoder {
    client: Client,
    config: MapsServiceConfig,
}

impl HttpGeocoder {
    /// Create a geocoding adapter from the shared service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: MapsServiceConfig) -> Result<Self, ServiceBuildError> {
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    fn geocode_url(&self) -> String {
        service_url(&self.config.base_url, GEOCODE_PATH)
    }

    /// Build the query parameters for a forward lookup.
    fn forward_params(&self, address: &str) -> Vec<(&'static str, String)> {
        vec![
            ("address", address.to_string()),
            ("key", self.config.api_key.clone()),
        ]
    }

    /// Build the query parameters for a reverse lookup.
    fn reverse_params(&self, position: Coord<f64>) -> Vec<(&'static str, String)> {
        vec![
            ("latlng", format_latlng(position)),
            ("key", self.config.api_key.clone()),
        ]
    }

    /// Issue one lookup and return the best candidate.
    async fn lookup(
        &self,
        params: Vec<(&'static str, String)>,
    ) -> Result<GeocodeCandidate, GeocodeError> {
        let response = self
            .client
            .get(self.geocode_url())
            .query(&params)
            .send()
            .await
            .map_err(|err| classify_transport(&err))?
            .error_for_status()
            .map_err(|err| classify_transport(&err))?;

        let document: GeocodeResponse =
            response.json().await.map_err(|err| GeocodeError::Decode {
                message: err.to_string(),
            })?;

        best_candidate(document)
    }
}

#[async_trait(?Send)]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        let candidate = self.lookup(self.forward_params(address)).await?;
        Ok(candidate.geometry.location.coord())
    }

    async fn reverse_geocode(&self, position: Coord<f64>) -> Result<String, GeocodeError> {
        let candidate = self.lookup(self.reverse_params(position)).await?;
        Ok(candidate.formatted_address)
    }
}

/// Convert a transport-level failure to a `GeocodeError`.
fn classify_transport(error: &reqwest::Error) -> GeocodeError {
    if error.is_timeout() {
        return GeocodeError::Timeout;
    }

    if let Some(status) = error.status() {
        return GeocodeError::Http {
            status: status.as_u16(),
        };
    }

    GeocodeError::Network {
        message: error.to_string(),
    }
}

/// Pick the best candidate out of a Geocoding document.
fn best_candidate(response: GeocodeResponse) -> Result<GeocodeCandidate, GeocodeError> {
    if response.status == "ZERO_RESULTS" {
        return Err(GeocodeError::NotFound);
    }

    if response.status != "OK" {
        return Err(GeocodeError::Service {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    // An empty candidate list on a success status is treated as not found.
    response
        .results
        .into_iter()
        .next()
        .ok_or(GeocodeError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn geocoder() -> HttpGeocoder {
        let config =
            MapsServiceConfig::new("test-key").with_base_url("https://maps.example.com");
        HttpGeocoder::new(config).expect("adapter should build")
    }

    #[rstest]
    fn geocode_url_targets_the_geocoding_endpoint(geocoder: HttpGeocoder) {
        assert_eq!(
            geocoder.geocode_url(),
            "https://maps.example.com/maps/api/geocode/json"
        );
    }

    #[rstest]
    fn forward_params_carry_address_and_key(geocoder: HttpGeocoder) {
        let params = geocoder.forward_params("Neve Shaanan, Haifa");

        assert_eq!(
            params,
            vec![
                ("address", "Neve Shaanan, Haifa".to_string()),
                ("key", "test-key".to_string()),
            ]
        );
    }

    #[rstest]
    fn reverse_params_carry_latlng_and_key(geocoder: HttpGeocoder) {
        let params = geocoder.reverse_params(Coord {
            x: 34.989167,
            y: 32.794167,
        });

        assert_eq!(
            params,
            vec![
                ("latlng", "32.794167,34.989167".to_string()),
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
                    "formatted_address": "Derech Ya'akov Dori, Haifa, Israel",
                    "geometry": {"location": {"lat": 32.776667, "lng": 35.023333}}
                }
            ]
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");
        let candidate = best_candidate(response).expect("should resolve");

        assert_eq!(
            candidate.formatted_address,
            "Derech Ya'akov Dori, Haifa, Israel"
        );
        assert_eq!(candidate.geometry.location.coord().x, 35.023333);
        assert_eq!(candidate.geometry.location.coord().y, 32.776667);
    }

    #[test]
    fn zero_results_converts_to_not_found() {
        let json = r#"{"status": "ZERO_RESULTS", "results": []}"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(matches!(
            best_candidate(response),
            Err(GeocodeError::NotFound)
        ));
    }

    #[test]
    fn an_empty_candidate_list_converts_to_not_found() {
        let json = r#"{"status": "OK", "results": []}"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        assert!(matches!(
            best_candidate(response),
            Err(GeocodeError::NotFound)
        ));
    }

    #[test]
    fn request_denied_converts_to_a_service_error() {
        let json = r#"{
            "status": "REQUEST_DENIED",
            "error_message": "The provided API key is invalid."
        }"#;

        let response: GeocodeResponse = serde_json::from_str(json).expect("should deserialise");

        let err = best_candidate(response).expect_err("should fail");

        match err {
            GeocodeError::Service { status, message } => {
                assert_eq!(status, "REQUEST_DENIED");
                assert_eq!(message, "The provided API key is invalid.");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }
}
