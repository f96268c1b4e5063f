use crate::listing::{Institution, Listing};
use crate::marker::ScreenPoint;
use crate::poi::Poi;
use crate::route::RouteSummary;

/// Events the core publishes upward to the hosting UI.
///
/// Selection events carry an owned snapshot of the clicked entity plus the
/// pointer's screen coordinates at click time; route summary events carry
/// `None` when the route clears.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// A listing marker was clicked.
    ListingSelected {
        /// The listing behind the clicked marker.
        listing: Listing,
        /// Pointer position at click time.
        at: ScreenPoint,
    },
    /// An institution marker was clicked.
    InstitutionSelected {
        /// The institution behind the clicked marker.
        institution: Institution,
        /// Pointer position at click time.
        at: ScreenPoint,
    },
    /// A POI marker was clicked.
    PoiSelected {
        /// The place behind the clicked marker.
        poi: Poi,
        /// Pointer position at click time.
        at: ScreenPoint,
    },
    /// The reported route summary changed; `None` means cleared.
    RouteSummaryChanged {
        /// Summary of the rendered route, absent when no route shows.
        summary: Option<RouteSummary>,
    },
    /// The map cannot render and the host should fall back to a static
    /// view.
    MapUnavailable {
        /// Human-readable cause suitable for display.
        cause: String,
    },
}

/// Receiver for [`MapEvent`]s, implemented by the hosting UI.
///
/// Notification happens synchronously on the UI thread; implementations
/// must not block.
pub trait SurfaceObserver {
    /// Handle one published event.
    fn notify(&self, event: MapEvent);
}

/// Observer that drops every event, for hosts that only poll state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullObserver;

impl SurfaceObserver for NullObserver {
    fn notify(&self, _event: MapEvent) {}
}
