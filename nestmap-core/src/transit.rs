//! Transit route overlay management.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use geo::Coord;

use crate::directions::RouteError;
use crate::engine::{MapEngine, MapSurface, RouteOverlayHandle};
use crate::events::{MapEvent, SurfaceObserver};
use crate::route::{RouteStyle, RouteSummary};

/// The endpoint pair that caused a route request.
#[derive(Debug, Clone, PartialEq)]
struct RouteTrigger {
    origin: Coord<f64>,
    destination: Coord<f64>,
}

/// Requests transit routes and keeps at most one route overlay on the
/// surface.
///
/// Requests are numbered; a result whose sequence number no longer matches
/// the current one is stale and silently discarded. A successful result is
/// rendered before the previous overlay is detached, so the surface never
/// shows zero overlays mid-swap.
///
/// An absent route, whether from a missing endpoint, hidden visibility, or
/// the provider finding no connection, clears the overlay and publishes a
/// summary of `None`. Summary events fire only when the summary actually
/// changes.
pub struct RouteCoordinator {
    engine: Rc<dyn MapEngine>,
    surface: Rc<dyn MapSurface>,
    observer: Rc<dyn SurfaceObserver>,
    style: RouteStyle,
    overlay: RefCell<Option<Box<dyn RouteOverlayHandle>>>,
    summary: RefCell<Option<RouteSummary>>,
    seq: Cell<u64>,
    last_trigger: RefCell<Option<RouteTrigger>>,
}

impl std::fmt::Debug for RouteCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteCoordinator")
            .field("style", &self.style)
            .field("rendered", &self.is_rendered())
            .finish()
    }
}

impl RouteCoordinator {
    /// Create a coordinator drawing routes in the default style.
    #[must_use]
    pub fn new(
        engine: Rc<dyn MapEngine>,
        surface: Rc<dyn MapSurface>,
        observer: Rc<dyn SurfaceObserver>,
    ) -> Self {
        Self {
            engine,
            surface,
            observer,
            style: RouteStyle::default(),
            overlay: RefCell::new(None),
            summary: RefCell::new(None),
            seq: Cell::new(0),
            last_trigger: RefCell::new(None),
        }
    }

    /// Override the polyline style.
    #[must_use]
    pub fn with_style(mut self, style: RouteStyle) -> Self {
        self.style = style;
        self
    }

    /// Re-evaluate the route overlay for the given endpoints and visibility
    /// flag.
    ///
    /// Both endpoints must be present and the route visible for a request to
    /// be issued; otherwise the overlay is cleared. Identical consecutive
    /// triggers are skipped, so a failed request is not retried until an
    /// endpoint or the visibility changes.
    pub async fn refresh(
        &self,
        origin: Option<Coord<f64>>,
        destination: Option<Coord<f64>>,
        visible: bool,
    ) {
        let trigger = match (origin, destination) {
            (Some(origin), Some(destination)) if visible => {
                Some(RouteTrigger { origin, destination })
            }
            _ => None,
        };
        if *self.last_trigger.borrow() == trigger {
            log::trace!("route trigger unchanged; skipping refresh");
            return;
        }
        *self.last_trigger.borrow_mut() = trigger.clone();
        let seq = self.seq.get().wrapping_add(1);
        self.seq.set(seq);

        let Some(trigger) = trigger else {
            self.clear_overlay();
            self.set_summary(None);
            return;
        };

        let result = self
            .engine
            .directions()
            .transit_route(trigger.origin, trigger.destination)
            .await;
        if self.seq.get() != seq {
            log::debug!("discarding stale route result from request {seq}");
            return;
        }

        match result {
            Ok(route) => {
                let fresh = self.surface.render_route(&route.path, &self.style);
                let previous = self.overlay.borrow_mut().replace(fresh);
                if let Some(previous) = previous {
                    Self::dispose_overlay(previous);
                }
                self.set_summary(Some(route.summary));
            }
            Err(RouteError::NoRoute) => {
                log::info!("no transit route between the requested endpoints");
                self.clear_overlay();
                self.set_summary(None);
            }
            Err(err) => {
                log::warn!("transit route request failed: {err}");
                self.clear_overlay();
                self.set_summary(None);
            }
        }
    }

    /// The summary of the currently rendered route, if any.
    #[must_use]
    pub fn summary(&self) -> Option<RouteSummary> {
        self.summary.borrow().clone()
    }

    /// Whether a route overlay is currently on the surface.
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.overlay.borrow().is_some()
    }

    /// Invalidate any in-flight request and remove the overlay without
    /// publishing events.
    pub fn dispose(&self) {
        self.seq.set(self.seq.get().wrapping_add(1));
        *self.last_trigger.borrow_mut() = None;
        self.clear_overlay();
        *self.summary.borrow_mut() = None;
    }

    fn clear_overlay(&self) {
        if let Some(handle) = self.overlay.borrow_mut().take() {
            Self::dispose_overlay(handle);
        }
    }

    fn dispose_overlay(mut handle: Box<dyn RouteOverlayHandle>) {
        if handle.is_attached() {
            handle.detach();
        } else {
            log::trace!("route overlay already detached; dispose is a no-op");
        }
    }

    fn set_summary(&self, value: Option<RouteSummary>) {
        let changed = {
            let mut slot = self.summary.borrow_mut();
            if *slot == value {
                false
            } else {
                slot.clone_from(&value);
                true
            }
        };
        if changed {
            self.observer
                .notify(MapEvent::RouteSummaryChanged { summary: value });
        }
    }
}
