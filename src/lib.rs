//! Facade crate for the nestmap map-reconciliation engine.
//!
//! This crate re-exports the core domain types, the provider trait seams,
//! and the reconciliation components, and exposes the HTTP provider
//! adapters behind the `http` feature flag.

#![forbid(unsafe_code)]

pub use nestmap_core::{
    DEFAULT_CENTRE, DEFAULT_SEARCH_RADIUS_M, DEFAULT_ZOOM, DirectionsProvider, EngineLoader,
    GatewayError, GeocodeError, Geocoder, GestureMode, Institution, Listing, MapEngine, MapEvent,
    MapGateway, MapSession, MapSurface, MarkerDescriptor, MarkerHandle, MarkerKey, MarkerKind,
    MarkerReconciler, MarkerSpec, MarkerVisibility, NearbyQuery, NullObserver, OverlayPresenter,
    OverlaySubject, OverlayView, PlaceSearch, Poi, PoiCategory, PoiSearchCoordinator,
    RouteCoordinator, RouteError, RouteOverlayHandle, RouteStep, RouteStyle, RouteSummary,
    ScreenPoint, SearchError, SelectionState, SurfaceObserver, SurfaceOptions, TransitMode,
    TransitRoute, distance_between, merge_nearby_results,
};

#[cfg(feature = "http")]
pub use nestmap_data::{
    DirectoryConfig, FetchError, FetchReport, HttpDirectionsProvider, HttpGeocoder,
    HttpListingDirectory, HttpPlaceSearch, ListingDirectory, MapsServiceConfig,
    ServiceBuildError, demo_institutions, demo_listings,
};
