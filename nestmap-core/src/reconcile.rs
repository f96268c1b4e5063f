use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::rc::Rc;

use crate::engine::{MapSurface, MarkerHandle};
use crate::events::{MapEvent, SurfaceObserver};
use crate::listing::{Institution, Listing};
use crate::marker::{MarkerDescriptor, MarkerKey, MarkerKind, MarkerSpec, ScreenPoint};
use crate::poi::Poi;
use crate::selection::MarkerVisibility;

/// The entity behind one marker, owned for the marker's lifetime so click
/// events can republish it.
#[derive(Debug, Clone)]
enum MarkerSubject {
    Listing(Listing),
    Institution(Institution),
    Poi(Poi),
}

impl MarkerSubject {
    fn key(&self) -> MarkerKey {
        match self {
            Self::Listing(listing) => MarkerKey::listing(listing.id.clone()),
            Self::Institution(institution) => MarkerKey::institution(institution.id.clone()),
            Self::Poi(poi) => MarkerKey::poi(poi.external_id.clone()),
        }
    }

    fn spec(&self) -> MarkerSpec {
        match self {
            Self::Listing(listing) => MarkerSpec {
                position: listing.position,
                title: listing.title.clone(),
                descriptor: MarkerDescriptor::listing(),
            },
            Self::Institution(institution) => MarkerSpec {
                position: institution.position,
                title: institution.name.clone(),
                descriptor: MarkerDescriptor::institution(),
            },
            Self::Poi(poi) => MarkerSpec {
                position: poi.position,
                title: poi.name.clone(),
                descriptor: MarkerDescriptor::poi(poi.category),
            },
        }
    }

    fn event(&self, at: ScreenPoint) -> MapEvent {
        match self {
            Self::Listing(listing) => MapEvent::ListingSelected {
                listing: listing.clone(),
                at,
            },
            Self::Institution(institution) => MapEvent::InstitutionSelected {
                institution: institution.clone(),
                at,
            },
            Self::Poi(poi) => MapEvent::PoiSelected {
                poi: poi.clone(),
                at,
            },
        }
    }
}

/// Which slice of the key space one pass may touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReconcileScope {
    /// Listing and institution markers.
    Entities,
    /// POI markers only.
    Pois,
    /// Everything; used by teardown.
    All,
}

impl ReconcileScope {
    fn covers(self, kind: MarkerKind) -> bool {
        match self {
            Self::Entities => matches!(kind, MarkerKind::Listing | MarkerKind::Institution),
            Self::Pois => kind == MarkerKind::Poi,
            Self::All => true,
        }
    }
}

/// Keeps a surface's native marker set equal to a declared target set.
///
/// Each pass diffs the target against the tracked set keyed by
/// `(kind, key)`: missing entries are created, surplus entries are disposed,
/// and entries present in both are left untouched so unchanged markers never
/// flicker. Passes are synchronous and atomic from the caller's view.
///
/// Listing/institution passes and POI passes are scoped to their own kinds,
/// so a POI refresh can never disturb entity markers and vice versa.
///
/// Disposal is defensive: the provider may have detached a handle
/// out-of-band, so every disposal checks liveness first and treats an
/// already-detached handle as a no-op.
pub struct MarkerReconciler {
    surface: Rc<dyn MapSurface>,
    observer: Rc<dyn SurfaceObserver>,
    tracked: BTreeMap<MarkerKey, Box<dyn MarkerHandle>>,
}

impl std::fmt::Debug for MarkerReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerReconciler")
            .field("tracked", &self.tracked.len())
            .finish()
    }
}

impl MarkerReconciler {
    /// Create a reconciler bound to one surface, publishing click events to
    /// the observer.
    #[must_use]
    pub fn new(surface: Rc<dyn MapSurface>, observer: Rc<dyn SurfaceObserver>) -> Self {
        Self {
            surface,
            observer,
            tracked: BTreeMap::new(),
        }
    }

    /// Bring listing and institution markers in line with the given
    /// collections, honouring the per-kind visibility flags. POI markers
    /// are untouched.
    pub fn reconcile(
        &mut self,
        listings: &[Listing],
        institutions: &[Institution],
        visibility: MarkerVisibility,
    ) {
        let mut targets: Vec<MarkerSubject> = Vec::new();
        if visibility.listings {
            targets.extend(listings.iter().cloned().map(MarkerSubject::Listing));
        }
        if visibility.institutions {
            targets.extend(
                institutions
                    .iter()
                    .cloned()
                    .map(MarkerSubject::Institution),
            );
        }
        self.apply_scoped(ReconcileScope::Entities, targets);
    }

    /// Bring POI markers in line with the given places. Listing and
    /// institution markers are untouched.
    pub fn reconcile_pois(&mut self, pois: &[Poi]) {
        let targets: Vec<MarkerSubject> = pois.iter().cloned().map(MarkerSubject::Poi).collect();
        self.apply_scoped(ReconcileScope::Pois, targets);
    }

    /// Dispose every POI marker.
    pub fn clear_pois(&mut self) {
        self.apply_scoped(ReconcileScope::Pois, Vec::new());
    }

    /// Dispose every tracked marker, leaving the reconciler inert.
    pub fn dispose_all(&mut self) {
        self.apply_scoped(ReconcileScope::All, Vec::new());
    }

    /// Keys of all currently tracked markers, in sorted order.
    #[must_use]
    pub fn tracked_keys(&self) -> Vec<MarkerKey> {
        self.tracked.keys().cloned().collect()
    }

    /// Number of currently tracked markers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracked.len()
    }

    /// Whether no marker is currently tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracked.is_empty()
    }

    fn apply_scoped(&mut self, scope: ReconcileScope, targets: Vec<MarkerSubject>) {
        let mut desired: BTreeMap<MarkerKey, MarkerSubject> = BTreeMap::new();
        for subject in targets {
            let key = subject.key();
            debug_assert!(scope.covers(key.kind));
            match desired.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(subject);
                }
                Entry::Occupied(slot) => {
                    log::warn!(
                        "duplicate marker key {} in target set; keeping the first entry",
                        slot.key()
                    );
                }
            }
        }

        let surplus: Vec<MarkerKey> = self
            .tracked
            .keys()
            .filter(|key| scope.covers(key.kind) && !desired.contains_key(*key))
            .cloned()
            .collect();
        for key in surplus {
            if let Some(handle) = self.tracked.remove(&key) {
                Self::dispose_handle(&key, handle);
            }
        }

        for (key, subject) in desired {
            if self.tracked.contains_key(&key) {
                continue;
            }
            let mut handle = self.surface.create_marker(&subject.spec());
            let observer = Rc::clone(&self.observer);
            handle.attach_click(Box::new(move |at| observer.notify(subject.event(at))));
            self.tracked.insert(key, handle);
        }
    }

    fn dispose_handle(key: &MarkerKey, mut handle: Box<dyn MarkerHandle>) {
        if handle.is_attached() {
            handle.detach();
        } else {
            log::trace!("marker {key} already detached; dispose is a no-op");
        }
    }
}
