//! Demo command: an offline, scripted walkthrough of one map session.
//!
//! The walkthrough mounts a surface on a scripted in-memory engine,
//! converges it onto the built-in Haifa dataset with listing "1" selected,
//! clicks the selected marker to open the overlay, and disposes the
//! session. `--fail-mount` fails engine initialisation instead and renders
//! the plain list view a host falls back to when the map is unavailable.

use std::io::Write;
use std::rc::Rc;

use clap::Parser;
use geo::Coord;
use nestmap_core::test_support::{FakeEngine, FakeLoader, FakeSurface, RecordingObserver, scripted_route};
use nestmap_core::{
    GatewayError, MapEvent, MapGateway, MapSession, MarkerKind, Poi, PoiCategory, ScreenPoint,
    SelectionState, SurfaceObserver, SurfaceOptions,
};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fixture::Dataset;
use crate::{ARG_FAIL_MOUNT, CliError, build_runtime};

const CONTAINER: &str = "app-root";
const SELECTED_LISTING: &str = "1";
const SELECTED_INSTITUTION: &str = "technion";

/// CLI arguments for the `demo` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Walk a scripted map session end to end without touching \
                 the network: mount a surface, reconcile markers, search \
                 nearby places, render a transit route, and open the \
                 selection overlay.",
    about = "Walk a scripted map session end to end, offline"
)]
#[ortho_config(prefix = "NESTMAP")]
pub(crate) struct DemoArgs {
    /// Fail engine initialisation to show the fallback list view.
    #[arg(long = ARG_FAIL_MOUNT, action = clap::ArgAction::SetTrue)]
    #[serde(default)]
    pub(crate) fail_mount: Option<bool>,
}

impl DemoArgs {
    fn into_config(self) -> Result<DemoConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(DemoConfig {
            fail_mount: merged.fail_mount.unwrap_or(false),
        })
    }
}

/// Resolved `demo` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct DemoConfig {
    /// Fail engine initialisation instead of mounting the map.
    pub(crate) fail_mount: bool,
}

pub(super) fn run_demo(args: DemoArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let dataset = Dataset::demo();
    let runtime = build_runtime()?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(run_demo_with(&config, &dataset, &mut stdout))
}

/// Run the walkthrough against a fresh scripted engine, writing the
/// transcript to `writer`.
pub(super) async fn run_demo_with(
    config: &DemoConfig,
    dataset: &Dataset,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let engine = scripted_engine();
    let mut loader = FakeLoader::new(Rc::clone(&engine));
    if config.fail_mount {
        loader = loader.fail_first(GatewayError::MissingCredential);
    }
    let gateway = MapGateway::new(Box::new(loader));
    let observer = Rc::new(RecordingObserver::new());

    let created = MapSession::create(
        &gateway,
        CONTAINER,
        &SurfaceOptions::default(),
        Rc::clone(&observer) as Rc<dyn SurfaceObserver>,
    )
    .await;
    let session = match created {
        Ok(session) => session,
        Err(err) => return render_fallback(dataset, &err, writer).map_err(CliError::WriteOutput),
    };

    writeln!(writer, "engine initialised; surface mounted in {CONTAINER:?}")
        .map_err(CliError::WriteOutput)?;

    session
        .apply(&dataset.listings, &dataset.institutions, &demo_selection())
        .await;

    if let Some(surface) = engine.last_surface() {
        write_surface_state(&session, &surface, writer).map_err(CliError::WriteOutput)?;

        let listing = dataset.listing(SELECTED_LISTING)?;
        let anchor = ScreenPoint { x: 320.0, y: 240.0 };
        if surface.click_marker(&listing.title, anchor) {
            writeln!(writer, "clicked {:?}", listing.title).map_err(CliError::WriteOutput)?;
        }
        write_overlay_state(&session, writer).map_err(CliError::WriteOutput)?;
        session.minimise_overlay();
        write_overlay_state(&session, writer).map_err(CliError::WriteOutput)?;

        write_events(&observer, writer).map_err(CliError::WriteOutput)?;

        session.dispose();
        writeln!(
            writer,
            "session disposed; markers remaining: {}",
            surface.live_marker_count()
        )
        .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

/// The engine the walkthrough runs against, with one scripted answer per
/// enabled category and one scripted transit route.
fn scripted_engine() -> Rc<FakeEngine> {
    let engine = FakeEngine::new();
    engine.places.push_response(
        PoiCategory::Supermarket,
        Ok(vec![Poi::new(
            "demo-market",
            "Neve Shaanan Market",
            PoiCategory::Supermarket,
            Coord {
                x: 35.021,
                y: 32.777,
            },
        )]),
    );
    engine.places.push_response(
        PoiCategory::TransitStation,
        Ok(vec![Poi::new(
            "demo-stop",
            "Bus Stop HaNevi'im",
            PoiCategory::TransitStation,
            Coord {
                x: 35.024,
                y: 32.776,
            },
        )]),
    );
    engine
        .directions
        .push_response(Ok(scripted_route("24 mins", "6.3 km")));
    Rc::new(engine)
}

/// Selection the walkthrough converges on: listing "1" routed to the
/// Technion, with supermarkets and transit stations enabled.
fn demo_selection() -> SelectionState {
    let mut selection = SelectionState::default();
    selection.selected_listing = Some(SELECTED_LISTING.to_owned());
    selection.selected_institution = Some(SELECTED_INSTITUTION.to_owned());
    selection.enabled_categories.insert(PoiCategory::Supermarket);
    selection
        .enabled_categories
        .insert(PoiCategory::TransitStation);
    selection.pois_visible = true;
    selection.route_visible = true;
    selection
}

fn write_surface_state(
    session: &MapSession,
    surface: &FakeSurface,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    let keys = session.marker_keys();
    let count_of = |kind: MarkerKind| keys.iter().filter(|key| key.kind == kind).count();
    writeln!(
        writer,
        "markers: {} attached ({} listings, {} institutions, {} places)",
        keys.len(),
        count_of(MarkerKind::Listing),
        count_of(MarkerKind::Institution),
        count_of(MarkerKind::Poi),
    )?;
    for title in surface.live_marker_titles() {
        writeln!(writer, "  - {title}")?;
    }
    match session.route_summary() {
        Some(summary) => {
            writeln!(writer, "route: {} ({})", summary.duration, summary.distance)?;
            for (index, step) in summary.steps.iter().enumerate() {
                writeln!(
                    writer,
                    "  {}. [{}] {} ({}, {})",
                    index + 1,
                    step.mode,
                    step.instruction,
                    step.duration,
                    step.distance,
                )?;
            }
        }
        None => writeln!(writer, "route: none")?,
    }
    Ok(())
}

fn write_overlay_state(session: &MapSession, writer: &mut dyn Write) -> std::io::Result<()> {
    match session.overlay_view() {
        Some(view) => {
            let state = if view.minimised { "minimised" } else { "expanded" };
            writeln!(writer, "overlay: {} ({state})", view.subject.title())
        }
        None => writeln!(writer, "overlay: none"),
    }
}

fn write_events(observer: &RecordingObserver, writer: &mut dyn Write) -> std::io::Result<()> {
    let names: Vec<&str> = observer.events().iter().map(event_name).collect();
    writeln!(writer, "events: {}", names.join(", "))
}

fn event_name(event: &MapEvent) -> &'static str {
    match event {
        MapEvent::ListingSelected { .. } => "ListingSelected",
        MapEvent::InstitutionSelected { .. } => "InstitutionSelected",
        MapEvent::PoiSelected { .. } => "PoiSelected",
        MapEvent::RouteSummaryChanged { .. } => "RouteSummaryChanged",
        MapEvent::MapUnavailable { .. } => "MapUnavailable",
    }
}

/// The plain list view shown when the map cannot mount.
fn render_fallback(
    dataset: &Dataset,
    cause: &GatewayError,
    writer: &mut dyn Write,
) -> std::io::Result<()> {
    writeln!(writer, "map unavailable: {cause}")?;
    writeln!(writer, "showing the plain list view instead")?;
    writeln!(writer)?;
    writeln!(writer, "{} listings:", dataset.listings.len())?;
    for listing in &dataset.listings {
        writeln!(
            writer,
            "  [{}] {} ({}, \u{20aa}{}/month) {}",
            listing.id, listing.title, listing.room_type, listing.price, listing.address,
        )?;
    }
    writeln!(writer, "{} institutions:", dataset.institutions.len())?;
    for institution in &dataset.institutions {
        writeln!(writer, "  [{}] {}", institution.id, institution.name)?;
    }
    Ok(())
}
