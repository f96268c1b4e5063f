//! Geocode command: forward and reverse geocoding lookups.

use std::io::Write;

use clap::Parser;
use geo::Coord;
use nestmap_core::{GeocodeError, Geocoder};
use nestmap_data::{HttpGeocoder, MapsServiceConfig};
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_QUERY, ARG_REVERSE, CliError, ENV_GEOCODE_API_KEY,
    ENV_GEOCODE_QUERY, build_runtime,
};

/// CLI arguments for the `geocode` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Resolve a street address to coordinates through the live \
                 geocoding service. With --reverse the query is a \
                 \"lat,lng\" pair and the service resolves it to a \
                 formatted address.",
    about = "Resolve an address to coordinates, or the reverse"
)]
#[ortho_config(prefix = "NESTMAP")]
pub(crate) struct GeocodeArgs {
    /// Address to resolve, or a "lat,lng" pair with --reverse.
    #[arg(long = ARG_QUERY, value_name = "text", allow_hyphen_values = true)]
    #[serde(default)]
    pub(crate) query: Option<String>,
    /// Treat the query as a "lat,lng" pair and resolve it to an address.
    #[arg(long = ARG_REVERSE, action = clap::ArgAction::SetTrue)]
    #[serde(default)]
    pub(crate) reverse: Option<bool>,
    /// API key for the geocoding service.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// Base URL of the geocoding service.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
}

impl GeocodeArgs {
    fn into_config(self) -> Result<GeocodeConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        GeocodeConfig::try_from(merged)
    }
}

/// Resolved `geocode` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GeocodeConfig {
    /// Address or coordinate query.
    pub(crate) query: String,
    /// Whether the query is a coordinate pair.
    pub(crate) reverse: bool,
    /// Geocoding service API key.
    pub(crate) api_key: String,
    /// Geocoding service base URL.
    pub(crate) base_url: String,
}

impl TryFrom<GeocodeArgs> for GeocodeConfig {
    type Error = CliError;

    fn try_from(args: GeocodeArgs) -> Result<Self, Self::Error> {
        let query = args.query.ok_or(CliError::MissingArgument {
            field: ARG_QUERY,
            env: ENV_GEOCODE_QUERY,
        })?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_GEOCODE_API_KEY,
        })?;
        Ok(Self {
            query,
            reverse: args.reverse.unwrap_or(false),
            api_key,
            base_url: args
                .base_url
                .unwrap_or_else(|| nestmap_data::DEFAULT_BASE_URL.to_owned()),
        })
    }
}

/// Parse a "lat,lng" pair, rejecting out-of-range coordinates.
pub(crate) fn parse_latlng(raw: &str) -> Result<Coord<f64>, CliError> {
    let invalid = || CliError::InvalidCoordinate {
        value: raw.to_owned(),
    };
    let (lat_text, lng_text) = raw.split_once(',').ok_or_else(invalid)?;
    let lat: f64 = lat_text.trim().parse().map_err(|_| invalid())?;
    let lng: f64 = lng_text.trim().parse().map_err(|_| invalid())?;
    if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lng) {
        return Err(invalid());
    }
    Ok(Coord { x: lng, y: lat })
}

pub(super) fn run_geocode(args: GeocodeArgs) -> Result<(), CliError> {
    let config = args.into_config()?;
    let geocoder = HttpGeocoder::new(
        MapsServiceConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone()),
    )?;
    let runtime = build_runtime()?;
    let mut stdout = std::io::stdout().lock();
    runtime.block_on(run_geocode_with(&config, &geocoder, &mut stdout))
}

/// Resolve the query in the configured direction and print the result.
///
/// A query the service cannot match is an ordinary outcome: the command
/// reports it and exits cleanly.
pub(super) async fn run_geocode_with(
    config: &GeocodeConfig,
    geocoder: &dyn Geocoder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    if config.reverse {
        let position = parse_latlng(&config.query)?;
        match geocoder.reverse_geocode(position).await {
            Ok(address) => writeln!(writer, "{:.6},{:.6} -> {address}", position.y, position.x)
                .map_err(CliError::WriteOutput),
            Err(GeocodeError::NotFound) => {
                writeln!(writer, "no address found at {:?}", config.query)
                    .map_err(CliError::WriteOutput)
            }
            Err(err) => Err(CliError::Geocode(err)),
        }
    } else {
        match geocoder.geocode(&config.query).await {
            Ok(position) => writeln!(
                writer,
                "{:?} -> {:.6},{:.6}",
                config.query, position.y, position.x,
            )
            .map_err(CliError::WriteOutput),
            Err(GeocodeError::NotFound) => {
                writeln!(writer, "no match for {:?}", config.query).map_err(CliError::WriteOutput)
            }
            Err(err) => Err(CliError::Geocode(err)),
        }
    }
}
