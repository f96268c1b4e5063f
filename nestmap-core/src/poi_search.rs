//! Nearby-place refresh with last-trigger-wins staleness control.

use std::cell::{Cell, RefCell};
use std::collections::BTreeSet;
use std::rc::Rc;

use futures_util::future::join_all;
use geo::Coord;

use crate::distance::distance_between;
use crate::engine::MapEngine;
use crate::places::{DEFAULT_SEARCH_RADIUS_M, NearbyQuery, SearchError};
use crate::poi::{Poi, PoiCategory};
use crate::reconcile::MarkerReconciler;

/// The inputs that caused a POI refresh. Two refreshes with equal triggers
/// are the same request and the second is skipped.
#[derive(Debug, Clone, PartialEq)]
struct PoiTrigger {
    focus: Coord<f64>,
    categories: BTreeSet<PoiCategory>,
}

/// Drives nearby-place searches and mirrors the results onto the surface.
///
/// Each change to the focal point, the enabled categories, or the POI
/// visibility flag is one numbered pass. Queries for all enabled categories
/// run concurrently; when they settle, the pass number is compared against
/// the current one and stale results are discarded, so only the latest
/// trigger ever reaches the surface.
///
/// Identical consecutive triggers are memoized: re-applying the same focus
/// and category set issues no new queries, which also means a degraded pass
/// is not retried until its inputs change.
pub struct PoiSearchCoordinator {
    engine: Rc<dyn MapEngine>,
    markers: Rc<RefCell<MarkerReconciler>>,
    radius_m: f64,
    pass: Cell<u64>,
    last_trigger: RefCell<Option<PoiTrigger>>,
}

impl std::fmt::Debug for PoiSearchCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoiSearchCoordinator")
            .field("radius_m", &self.radius_m)
            .field("pass", &self.pass.get())
            .finish()
    }
}

impl PoiSearchCoordinator {
    /// Create a coordinator searching within the default radius.
    #[must_use]
    pub fn new(engine: Rc<dyn MapEngine>, markers: Rc<RefCell<MarkerReconciler>>) -> Self {
        Self {
            engine,
            markers,
            radius_m: DEFAULT_SEARCH_RADIUS_M,
            pass: Cell::new(0),
            last_trigger: RefCell::new(None),
        }
    }

    /// Override the search radius in metres.
    #[must_use]
    pub fn with_radius(mut self, radius_m: f64) -> Self {
        self.radius_m = radius_m;
        self
    }

    /// Re-evaluate the POI layer for the given focal point, category set,
    /// and visibility flag.
    ///
    /// A missing focus, an empty category set, or hidden POIs all resolve to
    /// the empty layer. Search failures degrade per category: the failed
    /// category contributes nothing while the others still render.
    pub async fn refresh(
        &self,
        focus: Option<Coord<f64>>,
        categories: &BTreeSet<PoiCategory>,
        visible: bool,
    ) {
        let trigger = match focus {
            Some(focus) if visible && !categories.is_empty() => Some(PoiTrigger {
                focus,
                categories: categories.clone(),
            }),
            _ => None,
        };
        if *self.last_trigger.borrow() == trigger {
            log::trace!("poi trigger unchanged; skipping refresh");
            return;
        }
        *self.last_trigger.borrow_mut() = trigger.clone();
        let pass = self.pass.get().wrapping_add(1);
        self.pass.set(pass);

        let Some(trigger) = trigger else {
            self.markers.borrow_mut().clear_pois();
            return;
        };

        let places = self.engine.places();
        let queries = trigger.categories.iter().map(|&category| {
            let query = NearbyQuery::new(trigger.focus, category).with_radius(self.radius_m);
            async move { (category, places.nearby(&query).await) }
        });
        let results = join_all(queries).await;

        if self.pass.get() != pass {
            log::debug!("discarding stale nearby results from pass {pass}");
            return;
        }
        let pois = merge_nearby_results(results, trigger.focus);
        self.markers.borrow_mut().reconcile_pois(&pois);
    }

    /// Invalidate any in-flight pass and forget the last trigger. Pending
    /// results are discarded when they settle.
    pub fn dispose(&self) {
        self.pass.set(self.pass.get().wrapping_add(1));
        *self.last_trigger.borrow_mut() = None;
    }
}

/// Merge per-category search outcomes into one marker-ready list.
///
/// Duplicate places (same external identifier across categories) keep their
/// first occurrence. Failed categories are logged and skipped. The merged
/// list is ordered by distance from the focal point, nearest first.
#[must_use]
pub fn merge_nearby_results(
    results: Vec<(PoiCategory, Result<Vec<Poi>, SearchError>)>,
    focus: Coord<f64>,
) -> Vec<Poi> {
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut merged: Vec<Poi> = Vec::new();
    for (category, result) in results {
        match result {
            Ok(pois) => {
                for poi in pois {
                    if seen.insert(poi.external_id.clone()) {
                        merged.push(poi);
                    }
                }
            }
            Err(err) => {
                log::warn!("nearby search for {category} failed: {err}");
            }
        }
    }
    merged.sort_by(|a, b| {
        distance_between(a.position, focus).total_cmp(&distance_between(b.position, focus))
    });
    merged
}
