//! Domain core for nestmap: rental-listing map sessions over a pluggable
//! map engine.
//!
//! One interactive map is a [`MapSession`]. The host describes the world
//! with its listing and institution collections plus a [`SelectionState`],
//! and the session converges the surface onto that description: markers are
//! reconciled rather than rebuilt, nearby places refresh around the
//! selected listing, and at most one transit route overlay is maintained.
//! Provider specifics stay behind the [`MapEngine`], [`MapSurface`],
//! [`PlaceSearch`], and [`DirectionsProvider`] traits, so the core never
//! speaks HTTP itself.
//!
//! The concurrency model is single-threaded and cooperative. State lives in
//! `Rc`/`RefCell` cells, asynchronous passes carry pass numbers instead of
//! locks, and a result that settles after a newer pass began is discarded.
//! Drive sessions from a current-thread executor.
//!
//! Positions use [`geo::Coord`] with `x = longitude` and `y = latitude`.
//!
//! # Examples
//!
//! ```
//! use nestmap_core::{PoiCategory, SelectionState};
//!
//! let mut selection = SelectionState::default();
//! selection.selected_listing = Some("1".to_owned());
//! selection.enabled_categories.insert(PoiCategory::Supermarket);
//! selection.pois_visible = true;
//! assert!(selection.markers.listings);
//! ```

#![forbid(unsafe_code)]

mod directions;
mod distance;
mod engine;
mod events;
mod gateway;
mod geocode;
mod listing;
mod marker;
mod overlay;
mod places;
mod poi;
mod poi_search;
mod reconcile;
mod route;
mod selection;
mod session;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
mod transit;

pub use directions::{DirectionsProvider, RouteError, TransitMode};
pub use distance::distance_between;
pub use engine::{
    DEFAULT_CENTRE, DEFAULT_ZOOM, GestureMode, MapEngine, MapSurface, MarkerHandle,
    RouteOverlayHandle, SurfaceOptions,
};
pub use events::{MapEvent, NullObserver, SurfaceObserver};
pub use gateway::{EngineLoader, GatewayError, MapGateway};
pub use geocode::{GeocodeError, Geocoder};
pub use listing::{Institution, Listing};
pub use marker::{
    INSTITUTION_COLOUR, LISTING_COLOUR, MarkerDescriptor, MarkerKey, MarkerKind, MarkerSpec,
    ScreenPoint,
};
pub use overlay::{OverlayPresenter, OverlaySubject, OverlayView};
pub use places::{DEFAULT_SEARCH_RADIUS_M, NearbyQuery, PlaceSearch, SearchError};
pub use poi::{Poi, PoiCategory};
pub use poi_search::{PoiSearchCoordinator, merge_nearby_results};
pub use reconcile::MarkerReconciler;
pub use route::{RouteStep, RouteStyle, RouteSummary, TransitRoute};
pub use selection::{MarkerVisibility, SelectionState};
pub use session::MapSession;
pub use transit::RouteCoordinator;
