//! Route command: live transit route from a listing to an institution.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use nestmap_core::{DirectionsProvider, RouteError};
use nestmap_data::{HttpDirectionsProvider, MapsServiceConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fixture::Dataset;
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_DATA_DIR, ARG_INSTITUTION, ARG_LISTING, CliError,
    ENV_ROUTE_API_KEY, ENV_ROUTE_INSTITUTION, ENV_ROUTE_LISTING, build_runtime,
};

/// CLI arguments for the `route` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Fetch a bus-and-train transit route from a listing's \
                 position to an institution's position and print the \
                 summary with its step list. The dataset defaults to the \
                 built-in Haifa listings.",
    about = "Fetch a transit route from a listing to an institution"
)]
#[ortho_config(prefix = "NESTMAP")]
pub(crate) struct RouteArgs {
    /// Listing identifier to route from.
    #[arg(long = ARG_LISTING, value_name = "id")]
    #[serde(default)]
    pub(crate) listing: Option<String>,
    /// Institution identifier to route to.
    #[arg(long = ARG_INSTITUTION, value_name = "id")]
    #[serde(default)]
    pub(crate) institution: Option<String>,
    /// API key for the directions service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Base URL of the directions service.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Directory holding listings.json and institutions.json.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl RouteArgs {
    fn into_config(self) -> Result<RouteConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        RouteConfig::try_from(merged)
    }
}

/// Resolved `route` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RouteConfig {
    /// Listing to route from.
    pub(crate) listing: String,
    /// Institution to route to.
    pub(crate) institution: String,
    /// Directions service API key.
    pub(crate) api_key: String,
    /// Directions service base URL.
    pub(crate) base_url: String,
    /// Dataset directory; the demo dataset when absent.
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl TryFrom<RouteArgs> for RouteConfig {
    type Error = CliError;

    fn try_from(args: RouteArgs) -> Result<Self, Self::Error> {
        let listing = args.listing.ok_or(CliError::MissingArgument {
            field: ARG_LISTING,
            env: ENV_ROUTE_LISTING,
        })?;
        let institution = args.institution.ok_or(CliError::MissingArgument {
            field: ARG_INSTITUTION,
            env: ENV_ROUTE_INSTITUTION,
        })?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_ROUTE_API_KEY,
        })?;
        Ok(Self {
            listing,
            institution,
            api_key,
            base_url: args
                .base_url
                .unwrap_or_else(|| nestmap_data::DEFAULT_BASE_URL.to_owned()),
            data_dir: args.data_dir,
        })
    }
}

pub(super) fn run_route(args: RouteArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let dataset = Dataset::resolve(config.data_dir.as_deref())?;
    let provider = HttpDirectionsProvider::new(
        MapsServiceConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone()),
    )?;
    let runtime = build_runtime()?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(run_route_with(&config, &provider, &dataset, &mut stdout))
}

/// Fetch the route and print its summary and steps.
///
/// An empty result from the service is an ordinary outcome, not an error:
/// the command reports that no transit route exists and exits cleanly.
pub(super) async fn run_route_with(
    config: &RouteConfig,
    provider: &dyn DirectionsProvider,
    dataset: &Dataset,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let listing = dataset.listing(&config.listing)?;
    let institution = dataset.institution(&config.institution)?;

    let route = match provider
        .transit_route(listing.position, institution.position)
        .await
    {
        Ok(route) => route,
        Err(RouteError::NoRoute) => {
            writeln!(
                writer,
                "no transit route between {:?} and {:?}",
                listing.title, institution.name,
            )
            .map_err(CliError::WriteOutput)?;
            return Ok(());
        }
        Err(err) => return Err(CliError::Route(err)),
    };

    writeln!(
        writer,
        "transit route {:?} -> {:?}",
        listing.title, institution.name,
    )
    .map_err(CliError::WriteOutput)?;
    writeln!(
        writer,
        "{} ({}), path of {} points",
        route.summary.duration,
        route.summary.distance,
        route.path.len(),
    )
    .map_err(CliError::WriteOutput)?;
    for (index, step) in route.summary.steps.iter().enumerate() {
        writeln!(
            writer,
            "  {}. [{}] {} ({}, {})",
            index + 1,
            step.mode,
            step.instruction,
            step.duration,
            step.distance,
        )
        .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}
