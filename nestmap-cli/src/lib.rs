//! Command-line interface for nestmap map sessions and data adapters.
//!
//! `nestmap demo` walks a scripted map session end to end without touching
//! the network. The remaining subcommands (`pois`, `route`, `geocode`) call
//! the live Maps-style HTTP services; their API keys come from flags or
//! `NESTMAP_*` environment variables, layered through `ortho_config`.
#![forbid(unsafe_code)]

use clap::{Parser, Subcommand};

mod demo;
mod error;
mod fixture;
mod geocode;
mod pois;
mod route;

pub use error::CliError;

use demo::DemoArgs;
use geocode::GeocodeArgs;
use pois::PoisArgs;
use route::RouteArgs;

const ARG_API_KEY: &str = "api-key";
const ARG_BASE_URL: &str = "base-url";
const ARG_CATEGORIES: &str = "categories";
const ARG_DATA_DIR: &str = "data-dir";
const ARG_FAIL_MOUNT: &str = "fail-mount";
const ARG_INSTITUTION: &str = "institution";
const ARG_LISTING: &str = "listing";
const ARG_QUERY: &str = "query";
const ARG_RADIUS_M: &str = "radius-m";
const ARG_REVERSE: &str = "reverse";

const ENV_GEOCODE_API_KEY: &str = "NESTMAP_CMDS_GEOCODE_API_KEY";
const ENV_GEOCODE_QUERY: &str = "NESTMAP_CMDS_GEOCODE_QUERY";
const ENV_POIS_API_KEY: &str = "NESTMAP_CMDS_POIS_API_KEY";
const ENV_POIS_LISTING: &str = "NESTMAP_CMDS_POIS_LISTING";
const ENV_ROUTE_API_KEY: &str = "NESTMAP_CMDS_ROUTE_API_KEY";
const ENV_ROUTE_INSTITUTION: &str = "NESTMAP_CMDS_ROUTE_INSTITUTION";
const ENV_ROUTE_LISTING: &str = "NESTMAP_CMDS_ROUTE_LISTING";

/// Run the nestmap CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns a [`CliError`] when argument parsing, configuration layering, or
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Demo(args) => demo::run_demo(args),
        Command::Pois(args) => pois::run_pois(args),
        Command::Route(args) => route::run_route(args),
        Command::Geocode(args) => geocode::run_geocode(args),
    }
}

/// Build the current-thread runtime that drives async commands.
///
/// Sessions hold `Rc` state and the provider traits are `?Send`, so
/// commands drive them with `block_on` on a single thread.
fn build_runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(CliError::BuildRuntime)
}

#[derive(Debug, Parser)]
#[command(
    name = "nestmap",
    about = "Map-session walkthroughs and Maps-service lookups for the nestmap engine",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk a scripted map session end to end, offline.
    Demo(DemoArgs),
    /// Search for places near a listing.
    Pois(PoisArgs),
    /// Fetch a transit route from a listing to an institution.
    Route(RouteArgs),
    /// Resolve an address to coordinates, or the reverse.
    Geocode(GeocodeArgs),
}

#[cfg(test)]
mod tests;
