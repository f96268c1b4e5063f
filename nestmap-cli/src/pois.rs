//! Pois command: live nearby-place search around a listing.

use std::collections::BTreeSet;
use std::io::Write;

use camino::Utf8PathBuf;
use clap::Parser;
use nestmap_core::{
    DEFAULT_SEARCH_RADIUS_M, NearbyQuery, PlaceSearch, PoiCategory, distance_between,
    merge_nearby_results,
};
use nestmap_data::{HttpPlaceSearch, MapsServiceConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::fixture::Dataset;
use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_CATEGORIES, ARG_DATA_DIR, ARG_LISTING, ARG_RADIUS_M, CliError,
    ENV_POIS_API_KEY, ENV_POIS_LISTING, build_runtime,
};

/// CLI arguments for the `pois` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Search the live nearby-place service around a listing's \
                 position, one request per category, and print the merged \
                 results ordered by distance. The dataset defaults to the \
                 built-in Haifa listings.",
    about = "Search for places near a listing"
)]
#[ortho_config(prefix = "NESTMAP")]
pub(crate) struct PoisArgs {
    /// Listing identifier to centre the search on.
    #[arg(long = ARG_LISTING, value_name = "id")]
    #[serde(default)]
    pub(crate) listing: Option<String>,
    /// API key for the place service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Search radius in metres (default 1000).
    #[arg(long = ARG_RADIUS_M, value_name = "metres")]
    #[serde(default)]
    pub(crate) radius_m: Option<f64>,
    /// Comma-separated POI categories (default: all).
    #[arg(long = ARG_CATEGORIES, value_name = "names")]
    #[serde(default)]
    pub(crate) categories: Option<String>,
    /// Base URL of the place service.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Directory holding listings.json and institutions.json.
    #[arg(long = ARG_DATA_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl PoisArgs {
    fn into_config(self) -> Result<PoisConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        PoisConfig::try_from(merged)
    }
}

/// Resolved `pois` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PoisConfig {
    /// Listing to centre the search on.
    pub(crate) listing: String,
    /// Place service API key.
    pub(crate) api_key: String,
    /// Search radius in metres.
    pub(crate) radius_m: f64,
    /// Categories to search, never empty.
    pub(crate) categories: BTreeSet<PoiCategory>,
    /// Place service base URL.
    pub(crate) base_url: String,
    /// Dataset directory; the demo dataset when absent.
    pub(crate) data_dir: Option<Utf8PathBuf>,
}

impl TryFrom<PoisArgs> for PoisConfig {
    type Error = CliError;

    fn try_from(args: PoisArgs) -> Result<Self, Self::Error> {
        let listing = args.listing.ok_or(CliError::MissingArgument {
            field: ARG_LISTING,
            env: ENV_POIS_LISTING,
        })?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_POIS_API_KEY,
        })?;
        let categories = match args.categories.as_deref() {
            Some(raw) => parse_categories(raw)?,
            None => PoiCategory::ALL.into_iter().collect(),
        };
        Ok(Self {
            listing,
            api_key,
            radius_m: args.radius_m.unwrap_or(DEFAULT_SEARCH_RADIUS_M),
            categories,
            base_url: args
                .base_url
                .unwrap_or_else(|| nestmap_data::DEFAULT_BASE_URL.to_owned()),
            data_dir: args.data_dir,
        })
    }
}

/// Parse a comma-separated category list, rejecting unknown names.
pub(crate) fn parse_categories(raw: &str) -> Result<BTreeSet<PoiCategory>, CliError> {
    let mut categories = BTreeSet::new();
    for part in raw.split(',') {
        let name = part.trim();
        let category = name
            .parse::<PoiCategory>()
            .map_err(|_| CliError::InvalidCategory {
                value: name.to_owned(),
            })?;
        categories.insert(category);
    }
    Ok(categories)
}

pub(super) fn run_pois(args: PoisArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let dataset = Dataset::resolve(config.data_dir.as_deref())?;
    let search = HttpPlaceSearch::new(
        MapsServiceConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone()),
    )?;
    let runtime = build_runtime()?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(run_pois_with(&config, &search, &dataset, &mut stdout))
}

/// Search each configured category and print the merged results.
///
/// A category that fails is dropped from the merge, matching the session's
/// degraded behaviour; when no category answers at all the first failure is
/// surfaced instead of an empty list.
pub(super) async fn run_pois_with(
    config: &PoisConfig,
    search: &dyn PlaceSearch,
    dataset: &Dataset,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let listing = dataset.listing(&config.listing)?;
    let mut outcomes = Vec::new();
    for category in &config.categories {
        let query = NearbyQuery {
            centre: listing.position,
            radius_m: config.radius_m,
            category: *category,
        };
        outcomes.push((*category, search.nearby(&query).await));
    }

    if !outcomes.iter().any(|(_, outcome)| outcome.is_ok()) {
        let first_failure = outcomes
            .iter()
            .find_map(|(_, outcome)| outcome.as_ref().err())
            .cloned();
        if let Some(source) = first_failure {
            return Err(CliError::Search(source));
        }
    }

    let pois = merge_nearby_results(outcomes, listing.position);
    writeln!(
        writer,
        "places near {:?} within {:.0} m: {}",
        listing.title,
        config.radius_m,
        pois.len(),
    )
    .map_err(CliError::WriteOutput)?;
    for poi in &pois {
        let metres = distance_between(listing.position, poi.position);
        writeln!(
            writer,
            "  {} {} ({}, {:.0} m)",
            poi.category.glyph(),
            poi.name,
            poi.category.label(),
            metres,
        )
        .map_err(CliError::WriteOutput)?;
    }
    Ok(())
}
