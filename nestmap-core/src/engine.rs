use std::rc::Rc;

use geo::Coord;

use crate::directions::DirectionsProvider;
use crate::marker::{MarkerSpec, ScreenPoint};
use crate::places::PlaceSearch;
use crate::route::RouteStyle;

/// Default surface centre: Haifa city centre.
pub const DEFAULT_CENTRE: Coord<f64> = Coord {
    x: 34.989_167,
    y: 32.794_167,
};

/// Default surface zoom level.
pub const DEFAULT_ZOOM: u8 = 12;

/// How the surface responds to scroll and drag gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GestureMode {
    /// All gestures pan and zoom the map directly.
    #[default]
    Greedy,
    /// Gestures require a modifier key; plain scrolling scrolls the page.
    Cooperative,
    /// The provider picks based on context.
    Auto,
    /// Gestures are ignored.
    None,
}

impl GestureMode {
    /// Stable provider-facing name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Greedy => "greedy",
            Self::Cooperative => "cooperative",
            Self::Auto => "auto",
            Self::None => "none",
        }
    }
}

/// Options for creating one map surface.
///
/// Defaults match the product's house style: Haifa centre, zoom 12, greedy
/// gestures, only the zoom control, and the provider's own POI/transit
/// clutter suppressed so the application's markers stand alone.
///
/// # Examples
/// ```
/// use nestmap_core::SurfaceOptions;
///
/// let options = SurfaceOptions::default();
/// assert_eq!(options.zoom, 12);
/// assert!(options.suppress_default_poi);
/// assert!(!options.street_view_control);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceOptions {
    /// Initial camera centre, `x = longitude`, `y = latitude`.
    pub centre: Coord<f64>,
    /// Initial zoom level.
    pub zoom: u8,
    /// Show the zoom +/- control.
    pub zoom_control: bool,
    /// Show the map-type switcher.
    pub map_type_control: bool,
    /// Show the street-view control.
    pub street_view_control: bool,
    /// Show the fullscreen control.
    pub fullscreen_control: bool,
    /// Gesture handling mode.
    pub gesture: GestureMode,
    /// Hide the provider's built-in POI and transit labels.
    pub suppress_default_poi: bool,
}

impl Default for SurfaceOptions {
    fn default() -> Self {
        Self {
            centre: DEFAULT_CENTRE,
            zoom: DEFAULT_ZOOM,
            zoom_control: true,
            map_type_control: false,
            street_view_control: false,
            fullscreen_control: false,
            gesture: GestureMode::Greedy,
            suppress_default_poi: true,
        }
    }
}

impl SurfaceOptions {
    /// Options centred on the given position at the default zoom.
    #[must_use]
    pub fn centred_on(centre: Coord<f64>) -> Self {
        Self {
            centre,
            ..Self::default()
        }
    }
}

/// Native marker handle owned by the provider.
///
/// The provider can detach a marker out-of-band (for example when its
/// surface is torn down), so every mutation must be preceded by an
/// [`is_attached`](Self::is_attached) liveness check. `detach` on an
/// already-detached handle is a no-op and must never panic.
pub trait MarkerHandle {
    /// Whether the marker is still bound to its surface.
    fn is_attached(&self) -> bool;

    /// Unbind the marker from its surface. Idempotent.
    ///
    /// Detaching also releases any click handler registered through
    /// [`attach_click`](Self::attach_click).
    fn detach(&mut self);

    /// Register the click handler, replacing any previous one.
    ///
    /// The handler receives the pointer's screen coordinates at click time.
    fn attach_click(&mut self, handler: Box<dyn Fn(ScreenPoint)>);
}

/// Native route overlay handle, with the same liveness discipline as
/// [`MarkerHandle`].
pub trait RouteOverlayHandle {
    /// Whether the overlay is still bound to its surface.
    fn is_attached(&self) -> bool;

    /// Unbind the overlay from its surface. Idempotent.
    fn detach(&mut self);
}

/// One rendered map viewport.
///
/// Surfaces are created through the engine and owned by the hosting UI;
/// exactly one reconciler and one coordinator of each kind attach to a
/// surface at a time. Marker creation and disposal are synchronous.
pub trait MapSurface {
    /// Create a native marker on this surface.
    fn create_marker(&self, spec: &MarkerSpec) -> Box<dyn MarkerHandle>;

    /// Render a route polyline on this surface.
    fn render_route(&self, path: &[Coord<f64>], style: &RouteStyle) -> Box<dyn RouteOverlayHandle>;
}

/// The loaded map engine: surface factory plus its places and directions
/// sub-libraries.
///
/// One engine handle serves the whole process; it is shared read-only
/// across surfaces and coordinators once the gateway has loaded it.
pub trait MapEngine {
    /// Create a surface bound to the named host region.
    fn create_surface(&self, container: &str, options: &SurfaceOptions) -> Rc<dyn MapSurface>;

    /// Nearby-place search sub-library.
    fn places(&self) -> &dyn PlaceSearch;

    /// Transit directions sub-library.
    fn directions(&self) -> &dyn DirectionsProvider;
}
