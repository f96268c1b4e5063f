//! Session wiring: one surface, its marker set, overlays, and coordinators.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use geo::Coord;

use crate::engine::SurfaceOptions;
use crate::events::{MapEvent, SurfaceObserver};
use crate::gateway::{GatewayError, MapGateway};
use crate::listing::{Institution, Listing};
use crate::marker::MarkerKey;
use crate::overlay::{OverlayPresenter, OverlaySubject, OverlayView};
use crate::poi_search::PoiSearchCoordinator;
use crate::reconcile::MarkerReconciler;
use crate::route::RouteSummary;
use crate::selection::SelectionState;
use crate::transit::RouteCoordinator;

/// Routes marker clicks into the overlay presenter before forwarding every
/// event to the host observer.
struct SessionObserver {
    presenter: Rc<RefCell<OverlayPresenter>>,
    host: Rc<dyn SurfaceObserver>,
}

impl SurfaceObserver for SessionObserver {
    fn notify(&self, event: MapEvent) {
        match &event {
            MapEvent::ListingSelected { listing, at } => {
                self.presenter
                    .borrow_mut()
                    .show(OverlaySubject::Listing(listing.clone()), *at);
            }
            MapEvent::InstitutionSelected { institution, at } => {
                self.presenter
                    .borrow_mut()
                    .show(OverlaySubject::Institution(institution.clone()), *at);
            }
            _ => {}
        }
        self.host.notify(event);
    }
}

/// A live map session: one surface plus the marker, POI, route, and overlay
/// state attached to it.
///
/// The session is the single writer for everything on its surface. Hosts
/// describe the world with [`MapSession::apply`] and the session converges
/// the surface onto it; they never touch markers or overlays directly.
///
/// Marker clicks open the selection overlay and are forwarded to the host
/// observer, as are route summary changes.
pub struct MapSession {
    markers: Rc<RefCell<MarkerReconciler>>,
    pois: PoiSearchCoordinator,
    route: RouteCoordinator,
    presenter: Rc<RefCell<OverlayPresenter>>,
    disposed: Cell<bool>,
}

impl std::fmt::Debug for MapSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapSession")
            .field("markers", &self.markers.borrow().len())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

impl MapSession {
    /// Initialise the engine through the gateway and create a surface in the
    /// named container.
    ///
    /// On a failed initialisation the host observer receives
    /// [`MapEvent::MapUnavailable`] before the error is returned, so a host
    /// can switch to a non-map presentation from either signal. The gateway
    /// is left ready to retry.
    ///
    /// # Errors
    ///
    /// Returns the [`GatewayError`] produced by engine initialisation.
    pub async fn create(
        gateway: &MapGateway,
        container: &str,
        options: &SurfaceOptions,
        observer: Rc<dyn SurfaceObserver>,
    ) -> Result<Self, GatewayError> {
        let engine = match gateway.initialise().await {
            Ok(engine) => engine,
            Err(err) => {
                observer.notify(MapEvent::MapUnavailable {
                    cause: err.to_string(),
                });
                return Err(err);
            }
        };
        let surface = engine.create_surface(container, options);
        let presenter = Rc::new(RefCell::new(OverlayPresenter::new()));
        let session_observer: Rc<dyn SurfaceObserver> = Rc::new(SessionObserver {
            presenter: Rc::clone(&presenter),
            host: observer,
        });
        let markers = Rc::new(RefCell::new(MarkerReconciler::new(
            Rc::clone(&surface),
            Rc::clone(&session_observer),
        )));
        let pois = PoiSearchCoordinator::new(Rc::clone(&engine), Rc::clone(&markers));
        let route = RouteCoordinator::new(engine, surface, session_observer);
        Ok(Self {
            markers,
            pois,
            route,
            presenter,
            disposed: Cell::new(false),
        })
    }

    /// Converge the surface onto the given collections and selection.
    ///
    /// The focal point is the selected listing's position; a selection
    /// naming no known listing leaves the session without a focal point,
    /// which empties the POI layer and the route. Entity markers are
    /// reconciled synchronously, then the POI and route layers refresh
    /// asynchronously with stale results discarded.
    ///
    /// Calling this on a disposed session does nothing.
    pub async fn apply(
        &self,
        listings: &[Listing],
        institutions: &[Institution],
        selection: &SelectionState,
    ) {
        if self.disposed.get() {
            log::warn!("apply called on a disposed session; ignoring");
            return;
        }
        let focal = Self::position_of_listing(listings, selection.selected_listing.as_deref());
        let destination =
            Self::position_of_institution(institutions, selection.selected_institution.as_deref());

        self.markers
            .borrow_mut()
            .reconcile(listings, institutions, selection.markers);
        self.pois
            .refresh(focal, &selection.enabled_categories, selection.pois_visible)
            .await;
        self.route
            .refresh(focal, destination, selection.route_visible)
            .await;
    }

    /// The current selection overlay, if one is shown.
    #[must_use]
    pub fn overlay_view(&self) -> Option<OverlayView> {
        self.presenter.borrow().view()
    }

    /// Hide the selection overlay.
    pub fn close_overlay(&self) {
        self.presenter.borrow_mut().close();
    }

    /// Collapse the selection overlay to its title bar.
    pub fn minimise_overlay(&self) {
        self.presenter.borrow_mut().minimise();
    }

    /// Expand a collapsed selection overlay.
    pub fn restore_overlay(&self) {
        self.presenter.borrow_mut().restore();
    }

    /// Keys of every marker currently on the surface, in sorted order.
    #[must_use]
    pub fn marker_keys(&self) -> Vec<MarkerKey> {
        self.markers.borrow().tracked_keys()
    }

    /// The summary of the currently rendered route, if any.
    #[must_use]
    pub fn route_summary(&self) -> Option<RouteSummary> {
        self.route.summary()
    }

    /// Whether a route overlay is currently on the surface.
    #[must_use]
    pub fn is_route_rendered(&self) -> bool {
        self.route.is_rendered()
    }

    /// Whether the session has been disposed.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Tear the session down: invalidate in-flight work, dispose every
    /// marker and overlay, and close the selection overlay.
    ///
    /// Safe to call more than once; later calls do nothing. Teardown
    /// publishes no events.
    pub fn dispose(&self) {
        if self.disposed.replace(true) {
            return;
        }
        self.pois.dispose();
        self.route.dispose();
        self.markers.borrow_mut().dispose_all();
        self.presenter.borrow_mut().close();
    }

    fn position_of_listing(listings: &[Listing], id: Option<&str>) -> Option<Coord<f64>> {
        let id = id?;
        let found = listings.iter().find(|listing| listing.id == id);
        if found.is_none() {
            log::debug!("selected listing {id} is not in the applied collection");
        }
        found.map(|listing| listing.position)
    }

    fn position_of_institution(
        institutions: &[Institution],
        id: Option<&str>,
    ) -> Option<Coord<f64>> {
        let id = id?;
        let found = institutions.iter().find(|institution| institution.id == id);
        if found.is_none() {
            log::debug!("selected institution {id} is not in the applied collection");
        }
        found.map(|institution| institution.position)
    }
}

impl Drop for MapSession {
    fn drop(&mut self) {
        self.dispose();
    }
}
