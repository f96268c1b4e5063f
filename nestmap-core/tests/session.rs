//! End-to-end coverage for map sessions over a fake engine.

use std::rc::Rc;

use futures_util::future;
use geo::Coord;
use nestmap_core::test_support::{
    FakeEngine, FakeLoader, RecordingObserver, block_on_for_tests, scripted_route,
};
use nestmap_core::{
    GatewayError, Institution, Listing, MapEvent, MapGateway, MapSession, MarkerKey,
    MarkerVisibility, Poi, PoiCategory, ScreenPoint, SelectionState, SurfaceObserver,
    SurfaceOptions,
};

const STUDIO: Coord<f64> = Coord {
    x: 35.0211,
    y: 32.7782,
};
const SEAFRONT: Coord<f64> = Coord {
    x: 34.9892,
    y: 32.8156,
};
const CAMPUS: Coord<f64> = Coord {
    x: 35.0233,
    y: 32.7767,
};

fn listings() -> Vec<Listing> {
    vec![
        Listing::new("1", "Cozy Studio near Technion", 2800, STUDIO),
        Listing::new("2", "Spacious 2BR with Sea View", 4200, SEAFRONT),
    ]
}

fn institutions() -> Vec<Institution> {
    vec![Institution::new(
        "technion",
        "Technion - Israel Institute of Technology",
        "university",
        CAMPUS,
    )]
}

fn full_selection() -> SelectionState {
    SelectionState {
        selected_listing: Some("1".to_owned()),
        selected_institution: Some("technion".to_owned()),
        enabled_categories: [PoiCategory::Supermarket].into_iter().collect(),
        pois_visible: true,
        route_visible: true,
        markers: MarkerVisibility::default(),
    }
}

fn market() -> Poi {
    Poi::new(
        "s1",
        "Corner Market",
        PoiCategory::Supermarket,
        Coord {
            x: 35.0221,
            y: 32.7771,
        },
    )
}

async fn start_session(
    engine: &Rc<FakeEngine>,
    observer: &Rc<RecordingObserver>,
) -> (MapGateway, MapSession) {
    let gateway = MapGateway::new(Box::new(FakeLoader::new(Rc::clone(engine))));
    let session = MapSession::create(
        &gateway,
        "map-root",
        &SurfaceOptions::default(),
        Rc::clone(observer) as Rc<dyn SurfaceObserver>,
    )
    .await
    .expect("session should initialise");
    (gateway, session)
}

#[test]
fn apply_renders_markers_pois_and_route() {
    let engine = Rc::new(FakeEngine::new());
    engine
        .places
        .push_response(PoiCategory::Supermarket, Ok(vec![market()]));
    engine
        .directions
        .push_response(Ok(scripted_route("18 mins", "3.2 km")));
    let observer = Rc::new(RecordingObserver::new());

    let (_gateway, session) = block_on_for_tests(async {
        let (gateway, session) = start_session(&engine, &observer).await;
        session
            .apply(&listings(), &institutions(), &full_selection())
            .await;
        (gateway, session)
    });

    assert_eq!(
        session.marker_keys(),
        vec![
            MarkerKey::listing("1"),
            MarkerKey::listing("2"),
            MarkerKey::institution("technion"),
            MarkerKey::poi("s1"),
        ]
    );
    assert!(session.is_route_rendered());
    let summary = session.route_summary().expect("route summary");
    assert_eq!(summary.duration, "18 mins");
    assert!(observer.events().iter().any(|event| matches!(
        event,
        MapEvent::RouteSummaryChanged { summary: Some(_) }
    )));
    assert_eq!(engine.directions.calls(), vec![(STUDIO, CAMPUS)]);
}

#[test]
fn deselecting_the_listing_empties_dependent_layers() {
    let engine = Rc::new(FakeEngine::new());
    engine
        .places
        .push_response(PoiCategory::Supermarket, Ok(vec![market()]));
    engine
        .directions
        .push_response(Ok(scripted_route("18 mins", "3.2 km")));
    let observer = Rc::new(RecordingObserver::new());

    let (_gateway, session) = block_on_for_tests(async {
        let (gateway, session) = start_session(&engine, &observer).await;
        session
            .apply(&listings(), &institutions(), &full_selection())
            .await;

        let mut deselected = full_selection();
        deselected.selected_listing = None;
        session
            .apply(&listings(), &institutions(), &deselected)
            .await;
        (gateway, session)
    });

    assert_eq!(
        session.marker_keys(),
        vec![
            MarkerKey::listing("1"),
            MarkerKey::listing("2"),
            MarkerKey::institution("technion"),
        ]
    );
    assert!(!session.is_route_rendered());
    assert_eq!(session.route_summary(), None);
    assert!(observer.events().iter().any(|event| matches!(
        event,
        MapEvent::RouteSummaryChanged { summary: None }
    )));
}

#[test]
fn clicking_a_poi_publishes_the_event_without_an_overlay() {
    let engine = Rc::new(FakeEngine::new());
    engine
        .places
        .push_response(PoiCategory::Supermarket, Ok(vec![market()]));
    engine
        .directions
        .push_response(Ok(scripted_route("18 mins", "3.2 km")));
    let observer = Rc::new(RecordingObserver::new());

    let (_gateway, session) = block_on_for_tests(async {
        let (gateway, session) = start_session(&engine, &observer).await;
        session
            .apply(&listings(), &institutions(), &full_selection())
            .await;
        (gateway, session)
    });

    let surface = engine.last_surface().expect("surface");
    let at = ScreenPoint::new(64.0, 48.0);
    assert!(surface.click_marker("Corner Market", at));

    assert!(observer.events().iter().any(|event| matches!(
        event,
        MapEvent::PoiSelected { poi, at: point } if poi.external_id == "s1" && *point == at
    )));
    assert_eq!(session.overlay_view(), None);
}

#[test]
fn concurrent_initialisation_shares_a_single_load() {
    let engine = Rc::new(FakeEngine::new());
    let (loader, release) = FakeLoader::new(Rc::clone(&engine)).gated();
    let calls = loader.call_count_handle();
    let gateway = MapGateway::new(Box::new(loader));

    let (first, second, ()) = block_on_for_tests(future::join3(
        gateway.initialise(),
        gateway.initialise(),
        async {
            let _ = release.send(());
        },
    ));

    let first = first.expect("first initialise");
    let second = second.expect("second initialise");
    assert!(Rc::ptr_eq(&first, &second));
    assert_eq!(calls.get(), 1);
}

#[test]
fn dispose_tears_down_and_ignores_later_applies() {
    let engine = Rc::new(FakeEngine::new());
    engine
        .places
        .push_response(PoiCategory::Supermarket, Ok(vec![market()]));
    engine
        .directions
        .push_response(Ok(scripted_route("18 mins", "3.2 km")));
    let observer = Rc::new(RecordingObserver::new());

    let (_gateway, session) = block_on_for_tests(async {
        let (gateway, session) = start_session(&engine, &observer).await;
        session
            .apply(&listings(), &institutions(), &full_selection())
            .await;
        (gateway, session)
    });

    session.dispose();
    session.dispose();

    let surface = engine.last_surface().expect("surface");
    assert!(session.is_disposed());
    assert_eq!(surface.live_marker_count(), 0);
    assert_eq!(surface.live_route_count(), 0);
    assert_eq!(session.overlay_view(), None);

    let events_before = observer.events().len();
    let queries_before = engine.places.call_count();
    block_on_for_tests(session.apply(&listings(), &institutions(), &full_selection()));
    assert!(session.marker_keys().is_empty());
    assert_eq!(observer.events().len(), events_before);
    assert_eq!(engine.places.call_count(), queries_before);
}

#[test]
fn remounting_builds_a_fresh_surface_on_the_cached_engine() {
    let engine = Rc::new(FakeEngine::new());
    let observer = Rc::new(RecordingObserver::new());
    let loader = FakeLoader::new(Rc::clone(&engine));
    let calls = loader.call_count_handle();
    let gateway = MapGateway::new(Box::new(loader));

    let (first_surface, _second) = block_on_for_tests(async {
        let first = MapSession::create(
            &gateway,
            "map-root",
            &SurfaceOptions::default(),
            Rc::clone(&observer) as Rc<dyn SurfaceObserver>,
        )
        .await
        .expect("first mount");
        first
            .apply(&listings(), &institutions(), &SelectionState::default())
            .await;
        let first_surface = engine.last_surface().expect("first surface");
        first.dispose();

        let second = MapSession::create(
            &gateway,
            "map-root",
            &SurfaceOptions::default(),
            Rc::clone(&observer) as Rc<dyn SurfaceObserver>,
        )
        .await
        .expect("second mount");
        second
            .apply(&listings(), &institutions(), &SelectionState::default())
            .await;
        (first_surface, second)
    });

    assert_eq!(engine.surface_count(), 2);
    assert_eq!(calls.get(), 1);
    assert_eq!(first_surface.live_marker_count(), 0);
    let second_surface = engine.last_surface().expect("second surface");
    assert_eq!(second_surface.live_marker_count(), 3);
}

#[test]
fn a_failed_mount_notifies_map_unavailable_and_can_retry() {
    let engine = Rc::new(FakeEngine::new());
    let loader = FakeLoader::new(Rc::clone(&engine)).fail_first(GatewayError::Auth {
        reason: "bad key".to_owned(),
    });
    let gateway = MapGateway::new(Box::new(loader));
    let observer = Rc::new(RecordingObserver::new());

    let failure = block_on_for_tests(MapSession::create(
        &gateway,
        "map-root",
        &SurfaceOptions::default(),
        Rc::clone(&observer) as Rc<dyn SurfaceObserver>,
    ))
    .expect_err("mount should fail");

    assert_eq!(
        failure,
        GatewayError::Auth {
            reason: "bad key".to_owned()
        }
    );
    assert_eq!(
        observer.events(),
        vec![MapEvent::MapUnavailable {
            cause: failure.to_string(),
        }]
    );
    assert!(!gateway.is_initialised());

    let session = block_on_for_tests(MapSession::create(
        &gateway,
        "map-root",
        &SurfaceOptions::default(),
        Rc::clone(&observer) as Rc<dyn SurfaceObserver>,
    ))
    .expect("retry should succeed");
    assert!(gateway.is_initialised());
    assert!(!session.is_disposed());
}
