use geo::Coord;

/// One step in a transit itinerary, as formatted by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteStep {
    /// Provider-formatted instruction text; may contain markup.
    pub instruction: String,
    /// Formatted distance for this step, e.g. "450 m".
    pub distance: String,
    /// Formatted duration for this step, e.g. "6 mins".
    pub duration: String,
    /// Travel mode for this step, e.g. "WALKING" or "TRANSIT".
    pub mode: String,
}

/// Summary metrics reported upward when a route renders.
///
/// Duration and distance keep the provider's display formatting; the core
/// never re-derives them from raw values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    /// Total formatted duration, e.g. "24 mins".
    pub duration: String,
    /// Total formatted distance, e.g. "6.3 km".
    pub distance: String,
    /// Ordered itinerary steps.
    pub steps: Vec<RouteStep>,
}

/// A computed transit route: the renderable path plus its summary.
///
/// Created by one successful route request, replaced wholesale by the next,
/// and cleared entirely when origin or destination becomes absent.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransitRoute {
    /// Path vertices, `x = longitude`, `y = latitude`.
    pub path: Vec<Coord<f64>>,
    /// Display summary for the UI layer.
    pub summary: RouteSummary,
}

/// Visual styling for the rendered route overlay.
///
/// # Examples
/// ```
/// use nestmap_core::RouteStyle;
///
/// let style = RouteStyle::default();
/// assert_eq!(style.colour, "#3B82F6");
/// assert_eq!(style.weight_px, 4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RouteStyle {
    /// Stroke colour as a `#RRGGBB` hex string.
    pub colour: String,
    /// Stroke weight in pixels.
    pub weight_px: u32,
    /// Stroke opacity in `0.0..=1.0`.
    pub opacity: f64,
}

impl Default for RouteStyle {
    fn default() -> Self {
        Self {
            colour: crate::marker::LISTING_COLOUR.to_owned(),
            weight_px: 4,
            opacity: 0.8,
        }
    }
}
