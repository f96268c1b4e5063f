//! Behavioural coverage for marker reconciliation on a live surface.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use geo::Coord;
use nestmap_core::test_support::{FakeSurface, RecordingObserver};
use nestmap_core::{Institution, Listing, MapSurface, MarkerReconciler, MarkerVisibility};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};

const FIRST_LISTING: &str = "Cozy Studio near Technion";
const SECOND_LISTING: &str = "Spacious 2BR with Sea View";
const INSTITUTION: &str = "Technion - Israel Institute of Technology";

fn listings() -> Vec<Listing> {
    vec![
        Listing::new(
            "1",
            FIRST_LISTING,
            2800,
            Coord {
                x: 35.0233,
                y: 32.7767,
            },
        ),
        Listing::new(
            "2",
            SECOND_LISTING,
            4200,
            Coord {
                x: 34.9892,
                y: 32.8156,
            },
        ),
    ]
}

fn institutions() -> Vec<Institution> {
    vec![Institution::new(
        "technion",
        INSTITUTION,
        "university",
        Coord {
            x: 35.0233,
            y: 32.7767,
        },
    )]
}

/// Surface under test.
#[fixture]
pub fn surface() -> Rc<FakeSurface> {
    Rc::new(FakeSurface::new())
}

/// Shared slot for the reconciler once the surface is populated.
#[fixture]
pub fn reconciler() -> RefCell<Option<MarkerReconciler>> {
    RefCell::new(None)
}

/// Marker churn after the initial pass: `(created, detached)`.
#[fixture]
pub fn baseline() -> RefCell<Option<(usize, usize)>> {
    RefCell::new(None)
}

#[given("a surface reconciled with two listings and one institution")]
fn populated_surface(
    surface: &Rc<FakeSurface>,
    reconciler: &RefCell<Option<MarkerReconciler>>,
    baseline: &RefCell<Option<(usize, usize)>>,
) {
    let mut fresh = MarkerReconciler::new(
        Rc::clone(surface) as Rc<dyn MapSurface>,
        Rc::new(RecordingObserver::new()),
    );
    fresh.reconcile(&listings(), &institutions(), MarkerVisibility::default());
    *baseline.borrow_mut() = Some((surface.created_count(), surface.detached_count()));
    *reconciler.borrow_mut() = Some(fresh);
}

#[when("the same collections are applied again")]
fn reapply_identical(reconciler: &RefCell<Option<MarkerReconciler>>) {
    let mut slot = reconciler.borrow_mut();
    let reconciler = slot
        .as_mut()
        .unwrap_or_else(|| panic!("reconciler must be initialised"));
    reconciler.reconcile(&listings(), &institutions(), MarkerVisibility::default());
}

#[when("the collections are applied without the first listing")]
fn reapply_without_first_listing(reconciler: &RefCell<Option<MarkerReconciler>>) {
    let mut slot = reconciler.borrow_mut();
    let reconciler = slot
        .as_mut()
        .unwrap_or_else(|| panic!("reconciler must be initialised"));
    let mut all = listings();
    let remaining = all.split_off(1);
    reconciler.reconcile(&remaining, &institutions(), MarkerVisibility::default());
}

#[when("listings are hidden and the collections are applied again")]
fn reapply_with_listings_hidden(reconciler: &RefCell<Option<MarkerReconciler>>) {
    let mut slot = reconciler.borrow_mut();
    let reconciler = slot
        .as_mut()
        .unwrap_or_else(|| panic!("reconciler must be initialised"));
    reconciler.reconcile(
        &listings(),
        &institutions(),
        MarkerVisibility {
            listings: false,
            institutions: true,
        },
    );
}

#[when("the provider detaches the first listing's marker out-of-band")]
fn provider_detaches_first_listing(surface: &Rc<FakeSurface>) {
    assert!(surface.detach_marker(FIRST_LISTING));
}

#[when("every marker is disposed")]
fn dispose_everything(reconciler: &RefCell<Option<MarkerReconciler>>) {
    let mut slot = reconciler.borrow_mut();
    let reconciler = slot
        .as_mut()
        .unwrap_or_else(|| panic!("reconciler must be initialised"));
    reconciler.dispose_all();
}

#[then("no native marker is created or disposed by the second pass")]
fn no_marker_churn(surface: &Rc<FakeSurface>, baseline: &RefCell<Option<(usize, usize)>>) {
    let Some((created, detached)) = *baseline.borrow() else {
        panic!("baseline must be recorded")
    };
    assert_eq!(surface.created_count(), created);
    assert_eq!(surface.detached_count(), detached);
}

#[then("only the first listing's marker is disposed")]
fn first_listing_disposed(surface: &Rc<FakeSurface>) {
    let titles = surface.live_marker_titles();
    assert!(!titles.iter().any(|title| title == FIRST_LISTING));
    assert!(titles.iter().any(|title| title == SECOND_LISTING));
    assert!(titles.iter().any(|title| title == INSTITUTION));
    assert_eq!(surface.detached_count(), 1);
}

#[then("only the institution marker remains live")]
fn institution_remains(surface: &Rc<FakeSurface>) {
    assert_eq!(surface.live_marker_titles(), vec![INSTITUTION.to_owned()]);
}

#[then("the surface ends with no live markers")]
fn surface_is_empty(surface: &Rc<FakeSurface>, reconciler: &RefCell<Option<MarkerReconciler>>) {
    assert_eq!(surface.live_marker_count(), 0);
    let slot = reconciler.borrow();
    let reconciler = slot
        .as_ref()
        .unwrap_or_else(|| panic!("reconciler must be initialised"));
    assert!(reconciler.is_empty());
}

#[scenario(path = "tests/features/marker_sync.feature", index = 0)]
fn identical_collections_do_not_flicker(
    surface: Rc<FakeSurface>,
    reconciler: RefCell<Option<MarkerReconciler>>,
    baseline: RefCell<Option<(usize, usize)>>,
) {
    let _ = (surface, reconciler, baseline);
}

#[scenario(path = "tests/features/marker_sync.feature", index = 1)]
fn removal_disposes_only_the_removed_marker(
    surface: Rc<FakeSurface>,
    reconciler: RefCell<Option<MarkerReconciler>>,
    baseline: RefCell<Option<(usize, usize)>>,
) {
    let _ = (surface, reconciler, baseline);
}

#[scenario(path = "tests/features/marker_sync.feature", index = 2)]
fn hidden_listings_leave_institutions(
    surface: Rc<FakeSurface>,
    reconciler: RefCell<Option<MarkerReconciler>>,
    baseline: RefCell<Option<(usize, usize)>>,
) {
    let _ = (surface, reconciler, baseline);
}

#[scenario(path = "tests/features/marker_sync.feature", index = 3)]
fn teardown_tolerates_provider_detach(
    surface: Rc<FakeSurface>,
    reconciler: RefCell<Option<MarkerReconciler>>,
    baseline: RefCell<Option<(usize, usize)>>,
) {
    let _ = (surface, reconciler, baseline);
}

#[test]
fn scenario_indices_follow_feature_order() {
    let feature =
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/features/marker_sync.feature");
    let contents = fs::read_to_string(&feature).unwrap_or_else(|err| {
        panic!("failed to read feature file {feature:?}: {err}");
    });
    let titles: Vec<&str> = contents
        .lines()
        .filter_map(|line| line.trim().strip_prefix("Scenario: "))
        .collect();
    let expected = [
        "Re-applying identical collections leaves markers untouched",
        "Removing a listing disposes exactly its marker",
        "Hiding listings keeps institution markers live",
        "Teardown tolerates provider-detached markers",
    ];
    assert_eq!(
        titles, expected,
        "scenario registrations bind by index; keep the feature order stable"
    );
}
