//! Transit directions backed by the map service's Directions API.
//!
//! This module provides [`HttpDirectionsProvider`], an implementation of
//! [`nestmap_core::DirectionsProvider`] that requests a transit itinerary
//! between two positions and decodes the overview polyline into a
//! renderable path.
//!
//! See: <https://developers.google.com/maps/documentation/directions/get-directions>

use async_trait::async_trait;
use geo::Coord;
use nestmap_core::{DirectionsProvider, RouteError, RouteStep, RouteSummary, TransitMode, TransitRoute};
use reqwest::Client;
use serde::Deserialize;

use crate::http::{MapsServiceConfig, ServiceBuildError, build_client, format_latlng, service_url};

/// Endpoint path for the Directions API.
const DIRECTIONS_PATH: &str = "maps/api/directions/json";

/// Precision of the encoded overview polyline.
const POLYLINE_PRECISION: u32 = 5;

/// Directions API response.
///
/// The response carries the computed routes on success or an error message
/// on failure. The `status` field indicates the outcome.
#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    /// Status word from the service.
    ///
    /// Common values:
    /// - `"OK"` - At least one route was found
    /// - `"ZERO_RESULTS"` - No route connects the endpoints
    /// - `"NOT_FOUND"` - An endpoint could not be resolved
    /// - `"OVER_QUERY_LIMIT"` - Quota exhausted
    /// - `"REQUEST_DENIED"` - Key missing or invalid
    status: String,

    /// Computed routes; absent or empty on failure.
    #[serde(default)]
    routes: Vec<RouteDoc>,

    /// Optional detail when `status` is not `"OK"`.
    error_message: Option<String>,
}

impl DirectionsResponse {
    /// Check if the response indicates a computed route.
    fn is_ok(&self) -> bool {
        self.status == "OK"
    }
}

/// One route in a Directions response.
#[derive(Debug, Deserialize)]
struct RouteDoc {
    /// Encoded polyline covering the whole route.
    overview_polyline: PolylineDoc,
    /// Route legs; a single-destination request yields one leg.
    #[serde(default)]
    legs: Vec<LegDoc>,
}

/// Encoded polyline container.
#[derive(Debug, Deserialize)]
struct PolylineDoc {
    /// Encoded point sequence.
    points: String,
}

/// One leg of a route: the metrics and steps between two waypoints.
#[derive(Debug, Deserialize)]
struct LegDoc {
    /// Formatted total duration, e.g. `{"text": "24 mins", "value": 1440}`.
    duration: TextValue,
    /// Formatted total distance, e.g. `{"text": "6.3 km", "value": 6300}`.
    distance: TextValue,
    /// Ordered itinerary steps.
    #[serde(default)]
    steps: Vec<StepDoc>,
}

impl LegDoc {
    fn into_summary(self) -> RouteSummary {
        RouteSummary {
            duration: self.duration.text,
            distance: self.distance.text,
            steps: self.steps.into_iter().map(StepDoc::into_step).collect(),
        }
    }
}

/// One step of a leg, as formatted by the service.
#[derive(Debug, Deserialize)]
struct StepDoc {
    /// Instruction text; may contain markup.
    #[serde(default)]
    html_instructions: String,
    /// Formatted step distance.
    distance: Option<TextValue>,
    /// Formatted step duration.
    duration: Option<TextValue>,
    /// Travel mode for the step, e.g. `"WALKING"` or `"TRANSIT"`.
    travel_mode: String,
}

impl StepDoc {
    fn into_step(self) -> RouteStep {
        RouteStep {
            instruction: self.html_instructions,
            distance: self.distance.map(|value| value.text).unwrap_or_default(),
            duration: self.duration.map(|value| value.text).unwrap_or_default(),
            mode: self.travel_mode,
        }
    }
}

/// Formatted quantity; only the display text is carried onward.
#[derive(Debug, Deserialize)]
struct TextValue {
    /// Provider-formatted rendering, e.g. `"24 mins"`.
    text: String,
}

/// HTTP-based transit directions provider.
///
/// Requests are transit-mode with bus and train sub-modes, without
/// alternatives; the first returned route wins.
#[derive(Debug)]
pub struct HttpDirectionsProvider {
    client: Client,
    config: MapsServiceConfig,
}

impl HttpDirectionsProvider {
    /// Create a directions adapter from the shared service configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: MapsServiceConfig) -> Result<Self, ServiceBuildError> {
        let client = build_client(config.timeout, &config.user_agent)?;
        Ok(Self { client, config })
    }

    fn directions_url(&self) -> String {
        service_url(&self.config.base_url, DIRECTIONS_PATH)
    }

    /// Build the query parameters for one transit route request.
    fn route_params(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Vec<(&'static str, String)> {
        let sub_modes: Vec<&str> = TransitMode::DEFAULT
            .iter()
            .map(|mode| mode.as_str())
            .collect();
        vec![
            ("origin", format_latlng(origin)),
            ("destination", format_latlng(destination)),
            ("mode", "transit".to_string()),
            ("transit_mode", sub_modes.join("|")),
            ("alternatives", "false".to_string()),
            ("key", self.config.api_key.clone()),
        ]
    }
}

#[async_trait(?Send)]
impl DirectionsProvider for HttpDirectionsProvider {
    async fn transit_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<TransitRoute, RouteError> {
        let response = self
            .client
            .get(self.directions_url())
            .query(&self.route_params(origin, destination))
            .send()
            .await
            .map_err(|err| classify_transport(&err))?
            .error_for_status()
            .map_err(|err| classify_transport(&err))?;

        let document: DirectionsResponse =
            response.json().await.map_err(|err| RouteError::Decode {
                message: err.to_string(),
            })?;

        convert_directions(document)
    }
}

/// Convert a transport-level failure to a `RouteError`.
fn classify_transport(error: &reqwest::Error) -> RouteError {
    if error.is_timeout() {
        return RouteError::Timeout;
    }

    if let Some(status) = error.status() {
        return RouteError::Http {
            status: status.as_u16(),
        };
    }

    RouteError::Network {
        message: error.to_string(),
    }
}

/// Convert a Directions document to a domain route.
fn convert_directions(response: DirectionsResponse) -> Result<TransitRoute, RouteError> {
    if matches!(response.status.as_str(), "ZERO_RESULTS" | "NOT_FOUND") {
        return Err(RouteError::NoRoute);
    }

    if !response.is_ok() {
        return Err(RouteError::Service {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    // An empty route list on a success status is treated as no route.
    let Some(route) = response.routes.into_iter().next() else {
        return Err(RouteError::NoRoute);
    };

    let path = decode_path(&route.overview_polyline.points)?;

    let leg = route
        .legs
        .into_iter()
        .next()
        .ok_or_else(|| RouteError::Decode {
            message: "route document has no legs".to_string(),
        })?;

    Ok(TransitRoute {
        path,
        summary: leg.into_summary(),
    })
}

/// Decode an encoded overview polyline into path vertices.
fn decode_path(points: &str) -> Result<Vec<Coord<f64>>, RouteError> {
    let line = polyline::decode_polyline(points, POLYLINE_PRECISION).map_err(|err| {
        RouteError::Decode {
            message: err.to_string(),
        }
    })?;
    Ok(line.0)
}
