//! In-memory fakes for exercising sessions without a real map provider.
//!
//! Compiled for this crate's own tests and for dependants that enable the
//! `test-support` feature. Scripted providers answer from queued responses
//! and can gate individual answers behind a oneshot channel, which lets
//! single-threaded tests interleave passes deterministically.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::rc::Rc;

use async_trait::async_trait;
use geo::Coord;
use tokio::sync::oneshot;

use crate::directions::{DirectionsProvider, RouteError};
use crate::engine::{MapEngine, MapSurface, MarkerHandle, RouteOverlayHandle, SurfaceOptions};
use crate::events::{MapEvent, SurfaceObserver};
use crate::gateway::{EngineLoader, GatewayError};
use crate::marker::{MarkerSpec, ScreenPoint};
use crate::places::{NearbyQuery, PlaceSearch, SearchError};
use crate::poi::{Poi, PoiCategory};
use crate::route::{RouteStep, RouteSummary, TransitRoute};

/// Run a future to completion on a fresh current-thread runtime.
///
/// The session stack is `?Send`, so tests drive it with a local `block_on`
/// instead of a multi-threaded test runtime. No IO or time driver is
/// enabled; the scripted fakes only ever await oneshot gates.
pub fn block_on_for_tests<F: Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .expect("current-thread runtime should build")
        .block_on(future)
}

/// Observer that records every event it receives.
#[derive(Default)]
pub struct RecordingObserver {
    events: RefCell<Vec<MapEvent>>,
}

impl RecordingObserver {
    /// Create an observer with an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far, in arrival order.
    #[must_use]
    pub fn events(&self) -> Vec<MapEvent> {
        self.events.borrow().clone()
    }

    /// Discard the recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl SurfaceObserver for RecordingObserver {
    fn notify(&self, event: MapEvent) {
        self.events.borrow_mut().push(event);
    }
}

struct FakeMarkerState {
    spec: MarkerSpec,
    attached: Cell<bool>,
    click: RefCell<Option<Box<dyn Fn(ScreenPoint)>>>,
}

/// Marker handle backed by shared in-memory state, so the surface can
/// observe and manipulate the marker after handing the handle out.
pub struct FakeMarkerHandle {
    state: Rc<FakeMarkerState>,
}

impl MarkerHandle for FakeMarkerHandle {
    fn is_attached(&self) -> bool {
        self.state.attached.get()
    }

    fn detach(&mut self) {
        self.state.attached.set(false);
        self.state.click.borrow_mut().take();
    }

    fn attach_click(&mut self, handler: Box<dyn Fn(ScreenPoint)>) {
        *self.state.click.borrow_mut() = Some(handler);
    }
}

/// What one rendered route looked like at render time.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlot {
    /// Path vertices, `x = longitude`, `y = latitude`.
    pub path: Vec<Coord<f64>>,
    /// Stroke colour as given in the style.
    pub colour: String,
    /// Stroke weight as given in the style.
    pub weight_px: u32,
}

/// One entry in the surface's route overlay history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOp {
    /// A route overlay was rendered.
    Rendered,
    /// A route overlay was detached.
    Detached,
}

struct FakeRouteState {
    plot: RoutePlot,
    attached: Cell<bool>,
    log: Rc<RefCell<Vec<RouteOp>>>,
}

/// Route overlay handle backed by shared in-memory state.
pub struct FakeRouteHandle {
    state: Rc<FakeRouteState>,
}

impl RouteOverlayHandle for FakeRouteHandle {
    fn is_attached(&self) -> bool {
        self.state.attached.get()
    }

    fn detach(&mut self) {
        self.state.attached.set(false);
        self.state.log.borrow_mut().push(RouteOp::Detached);
    }
}

/// In-memory surface that keeps every marker and route overlay ever
/// created, attached or not, so tests can assert on lifecycle behaviour.
#[derive(Default)]
pub struct FakeSurface {
    markers: RefCell<Vec<Rc<FakeMarkerState>>>,
    routes: RefCell<Vec<Rc<FakeRouteState>>>,
    route_log: Rc<RefCell<Vec<RouteOp>>>,
}

impl FakeSurface {
    /// Create an empty surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of markers currently attached.
    #[must_use]
    pub fn live_marker_count(&self) -> usize {
        self.markers
            .borrow()
            .iter()
            .filter(|state| state.attached.get())
            .count()
    }

    /// Number of markers ever created.
    #[must_use]
    pub fn created_count(&self) -> usize {
        self.markers.borrow().len()
    }

    /// Number of markers created and since detached.
    #[must_use]
    pub fn detached_count(&self) -> usize {
        self.created_count() - self.live_marker_count()
    }

    /// Titles of the currently attached markers, in creation order.
    #[must_use]
    pub fn live_marker_titles(&self) -> Vec<String> {
        self.markers
            .borrow()
            .iter()
            .filter(|state| state.attached.get())
            .map(|state| state.spec.title.clone())
            .collect()
    }

    /// Fire the click handler of the first attached marker with the given
    /// title. Returns whether a handler ran.
    pub fn click_marker(&self, title: &str, at: ScreenPoint) -> bool {
        let markers = self.markers.borrow();
        let Some(state) = markers
            .iter()
            .find(|state| state.attached.get() && state.spec.title == title)
        else {
            return false;
        };
        let click = state.click.borrow();
        match click.as_ref() {
            Some(handler) => {
                handler(at);
                true
            }
            None => false,
        }
    }

    /// Detach the first attached marker with the given title out-of-band,
    /// as a provider tearing down its own objects would. Returns whether a
    /// marker was found.
    pub fn detach_marker(&self, title: &str) -> bool {
        let markers = self.markers.borrow();
        let Some(state) = markers
            .iter()
            .find(|state| state.attached.get() && state.spec.title == title)
        else {
            return false;
        };
        state.attached.set(false);
        state.click.borrow_mut().take();
        true
    }

    /// Number of route overlays currently attached.
    #[must_use]
    pub fn live_route_count(&self) -> usize {
        self.routes
            .borrow()
            .iter()
            .filter(|state| state.attached.get())
            .count()
    }

    /// The most recently rendered route, attached or not.
    #[must_use]
    pub fn last_route(&self) -> Option<RoutePlot> {
        self.routes.borrow().last().map(|state| state.plot.clone())
    }

    /// Render and detach operations in the order the surface saw them.
    #[must_use]
    pub fn route_history(&self) -> Vec<RouteOp> {
        self.route_log.borrow().clone()
    }
}

impl MapSurface for FakeSurface {
    fn create_marker(&self, spec: &MarkerSpec) -> Box<dyn MarkerHandle> {
        let state = Rc::new(FakeMarkerState {
            spec: spec.clone(),
            attached: Cell::new(true),
            click: RefCell::new(None),
        });
        self.markers.borrow_mut().push(Rc::clone(&state));
        Box::new(FakeMarkerHandle { state })
    }

    fn render_route(
        &self,
        path: &[Coord<f64>],
        style: &crate::route::RouteStyle,
    ) -> Box<dyn RouteOverlayHandle> {
        let state = Rc::new(FakeRouteState {
            plot: RoutePlot {
                path: path.to_vec(),
                colour: style.colour.clone(),
                weight_px: style.weight_px,
            },
            attached: Cell::new(true),
            log: Rc::clone(&self.route_log),
        });
        self.route_log.borrow_mut().push(RouteOp::Rendered);
        self.routes.borrow_mut().push(Rc::clone(&state));
        Box::new(FakeRouteHandle { state })
    }
}

struct ScriptedSearch {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<Vec<Poi>, SearchError>,
}

/// Place search that answers each category from a queue of scripted
/// responses.
///
/// An unscripted call fails with a network error naming the category, so a
/// mis-scripted test fails loudly instead of hanging.
#[derive(Default)]
pub struct ScriptedPlaceSearch {
    responses: RefCell<BTreeMap<PoiCategory, VecDeque<ScriptedSearch>>>,
    calls: RefCell<Vec<NearbyQuery>>,
}

impl ScriptedPlaceSearch {
    /// Create a search with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response for a category.
    pub fn push_response(&self, category: PoiCategory, result: Result<Vec<Poi>, SearchError>) {
        self.responses
            .borrow_mut()
            .entry(category)
            .or_default()
            .push_back(ScriptedSearch { gate: None, result });
    }

    /// Queue a response that is only delivered once the returned sender
    /// fires (or is dropped).
    pub fn push_gated_response(
        &self,
        category: PoiCategory,
        result: Result<Vec<Poi>, SearchError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses
            .borrow_mut()
            .entry(category)
            .or_default()
            .push_back(ScriptedSearch {
                gate: Some(rx),
                result,
            });
        tx
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// The queries received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<NearbyQuery> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl PlaceSearch for ScriptedPlaceSearch {
    async fn nearby(&self, query: &NearbyQuery) -> Result<Vec<Poi>, SearchError> {
        self.calls.borrow_mut().push(query.clone());
        let scripted = self
            .responses
            .borrow_mut()
            .get_mut(&query.category)
            .and_then(VecDeque::pop_front);
        let Some(scripted) = scripted else {
            return Err(SearchError::Network {
                message: format!("unscripted nearby response for {}", query.category),
            });
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result
    }
}

struct ScriptedRoute {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<TransitRoute, RouteError>,
}

/// Directions provider that answers from a queue of scripted responses.
#[derive(Default)]
pub struct ScriptedDirections {
    responses: RefCell<VecDeque<ScriptedRoute>>,
    calls: RefCell<Vec<(Coord<f64>, Coord<f64>)>>,
}

impl ScriptedDirections {
    /// Create a provider with no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the next response.
    pub fn push_response(&self, result: Result<TransitRoute, RouteError>) {
        self.responses
            .borrow_mut()
            .push_back(ScriptedRoute { gate: None, result });
    }

    /// Queue a response that is only delivered once the returned sender
    /// fires (or is dropped).
    pub fn push_gated_response(
        &self,
        result: Result<TransitRoute, RouteError>,
    ) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.responses.borrow_mut().push_back(ScriptedRoute {
            gate: Some(rx),
            result,
        });
        tx
    }

    /// Number of calls received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    /// The `(origin, destination)` pairs received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<(Coord<f64>, Coord<f64>)> {
        self.calls.borrow().clone()
    }
}

#[async_trait(?Send)]
impl DirectionsProvider for ScriptedDirections {
    async fn transit_route(
        &self,
        origin: Coord<f64>,
        destination: Coord<f64>,
    ) -> Result<TransitRoute, RouteError> {
        self.calls.borrow_mut().push((origin, destination));
        let scripted = self.responses.borrow_mut().pop_front();
        let Some(scripted) = scripted else {
            return Err(RouteError::Network {
                message: "unscripted route response".to_owned(),
            });
        };
        if let Some(gate) = scripted.gate {
            let _ = gate.await;
        }
        scripted.result
    }
}

/// A plausible two-leg transit route for scripting.
#[must_use]
pub fn scripted_route(duration: &str, distance: &str) -> TransitRoute {
    TransitRoute {
        path: vec![
            Coord {
                x: 34.989_167,
                y: 32.794_167,
            },
            Coord {
                x: 35.004_2,
                y: 32.786_1,
            },
            Coord {
                x: 35.023_3,
                y: 32.776_7,
            },
        ],
        summary: RouteSummary {
            duration: duration.to_owned(),
            distance: distance.to_owned(),
            steps: vec![
                RouteStep {
                    instruction: "Walk to HaNevi'im/Herzl".to_owned(),
                    distance: "250 m".to_owned(),
                    duration: "3 mins".to_owned(),
                    mode: "WALKING".to_owned(),
                },
                RouteStep {
                    instruction: "Bus 11 towards Technion".to_owned(),
                    distance: distance.to_owned(),
                    duration: duration.to_owned(),
                    mode: "TRANSIT".to_owned(),
                },
            ],
        },
    }
}

/// Engine whose surfaces and sub-libraries are all in-memory fakes.
#[derive(Default)]
pub struct FakeEngine {
    /// Scriptable nearby-place search.
    pub places: ScriptedPlaceSearch,
    /// Scriptable transit directions.
    pub directions: ScriptedDirections,
    surfaces: RefCell<Vec<Rc<FakeSurface>>>,
}

impl FakeEngine {
    /// Create an engine with no scripted responses and no surfaces.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently created surface.
    #[must_use]
    pub fn last_surface(&self) -> Option<Rc<FakeSurface>> {
        self.surfaces.borrow().last().map(Rc::clone)
    }

    /// Number of surfaces created so far.
    #[must_use]
    pub fn surface_count(&self) -> usize {
        self.surfaces.borrow().len()
    }
}

impl MapEngine for FakeEngine {
    fn create_surface(&self, _container: &str, _options: &SurfaceOptions) -> Rc<dyn MapSurface> {
        let surface = Rc::new(FakeSurface::new());
        self.surfaces.borrow_mut().push(Rc::clone(&surface));
        surface
    }

    fn places(&self) -> &dyn PlaceSearch {
        &self.places
    }

    fn directions(&self) -> &dyn DirectionsProvider {
        &self.directions
    }
}

/// Loader that hands out a shared [`FakeEngine`], counting calls and
/// optionally failing or stalling on demand.
pub struct FakeLoader {
    engine: Rc<FakeEngine>,
    calls: Rc<Cell<usize>>,
    fail_first: RefCell<Option<GatewayError>>,
    gate: RefCell<Option<oneshot::Receiver<()>>>,
}

impl FakeLoader {
    /// Create a loader that succeeds immediately with the given engine.
    #[must_use]
    pub fn new(engine: Rc<FakeEngine>) -> Self {
        Self {
            engine,
            calls: Rc::new(Cell::new(0)),
            fail_first: RefCell::new(None),
            gate: RefCell::new(None),
        }
    }

    /// Handle onto the call counter, usable after the loader moves into a
    /// gateway.
    #[must_use]
    pub fn call_count_handle(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.calls)
    }

    /// Fail the next load with the given error; later loads succeed.
    #[must_use]
    pub fn fail_first(self, error: GatewayError) -> Self {
        *self.fail_first.borrow_mut() = Some(error);
        self
    }

    /// Stall the next load until the returned sender fires (or is dropped).
    #[must_use]
    pub fn gated(self) -> (Self, oneshot::Sender<()>) {
        let (tx, rx) = oneshot::channel();
        *self.gate.borrow_mut() = Some(rx);
        (self, tx)
    }
}

#[async_trait(?Send)]
impl EngineLoader for FakeLoader {
    async fn load(&self) -> Result<Rc<dyn MapEngine>, GatewayError> {
        self.calls.set(self.calls.get() + 1);
        let gate = self.gate.borrow_mut().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        if let Some(error) = self.fail_first.borrow_mut().take() {
            return Err(error);
        }
        Ok(Rc::clone(&self.engine) as Rc<dyn MapEngine>)
    }
}
