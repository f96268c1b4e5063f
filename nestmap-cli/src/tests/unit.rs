//! Focused unit tests covering argument parsing, configuration
//! resolution, and dataset loading.

use super::*;
use std::collections::BTreeSet;
use std::fs;

use camino::Utf8PathBuf;
use clap::Parser;
use geo::Coord;
use nestmap_core::{DEFAULT_SEARCH_RADIUS_M, PoiCategory};
use nestmap_data::DEFAULT_BASE_URL;
use rstest::rstest;
use tempfile::TempDir;

use super::helpers::write_dataset;
use crate::fixture::{Dataset, INSTITUTIONS_FILE, LISTINGS_FILE};
use crate::geocode::{GeocodeArgs, GeocodeConfig, parse_latlng};
use crate::pois::{PoisArgs, PoisConfig, parse_categories};
use crate::route::{RouteArgs, RouteConfig};

#[rstest]
#[case(None, Some("key"), ARG_LISTING, ENV_POIS_LISTING)]
#[case(Some("1"), None, ARG_API_KEY, ENV_POIS_API_KEY)]
fn pois_config_requires_listing_and_key(
    #[case] listing: Option<&str>,
    #[case] api_key: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = PoisArgs {
        listing: listing.map(str::to_owned),
        api_key: api_key.map(str::to_owned),
        ..PoisArgs::default()
    };
    let err = PoisConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn pois_config_applies_defaults() {
    let args = PoisArgs {
        listing: Some("1".to_owned()),
        api_key: Some("k".to_owned()),
        ..PoisArgs::default()
    };
    let config = PoisConfig::try_from(args).expect("config should build");
    assert_eq!(config.radius_m, DEFAULT_SEARCH_RADIUS_M);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.categories.len(), PoiCategory::ALL.len());
    assert!(config.data_dir.is_none());
}

#[rstest]
#[case("supermarket,gym", &[PoiCategory::Supermarket, PoiCategory::Gym])]
#[case(" transit_station , restaurant ", &[PoiCategory::Restaurant, PoiCategory::TransitStation])]
#[case("GYM", &[PoiCategory::Gym])]
fn parse_categories_accepts_known_names(#[case] raw: &str, #[case] expected: &[PoiCategory]) {
    let parsed = parse_categories(raw).expect("categories should parse");
    let wanted: BTreeSet<PoiCategory> = expected.iter().copied().collect();
    assert_eq!(parsed, wanted);
}

#[rstest]
#[case("bakery", "bakery")]
#[case("supermarket,,gym", "")]
fn parse_categories_rejects_unknown_names(#[case] raw: &str, #[case] bad: &str) {
    let err = parse_categories(raw).expect_err("unknown category should error");
    match err {
        CliError::InvalidCategory { value } => assert_eq!(value, bad),
        other => panic!("expected InvalidCategory, found {other:?}"),
    }
}

#[rstest]
#[case(None, Some("technion"), Some("k"), ARG_LISTING, ENV_ROUTE_LISTING)]
#[case(Some("1"), None, Some("k"), ARG_INSTITUTION, ENV_ROUTE_INSTITUTION)]
#[case(Some("1"), Some("technion"), None, ARG_API_KEY, ENV_ROUTE_API_KEY)]
fn route_config_requires_endpoints_and_key(
    #[case] listing: Option<&str>,
    #[case] institution: Option<&str>,
    #[case] api_key: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = RouteArgs {
        listing: listing.map(str::to_owned),
        institution: institution.map(str::to_owned),
        api_key: api_key.map(str::to_owned),
        ..RouteArgs::default()
    };
    let err = RouteConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
#[case(None, Some("k"), ARG_QUERY, ENV_GEOCODE_QUERY)]
#[case(Some("Technion"), None, ARG_API_KEY, ENV_GEOCODE_API_KEY)]
fn geocode_config_requires_query_and_key(
    #[case] query: Option<&str>,
    #[case] api_key: Option<&str>,
    #[case] field: &'static str,
    #[case] env_var: &'static str,
) {
    let args = GeocodeArgs {
        query: query.map(str::to_owned),
        api_key: api_key.map(str::to_owned),
        ..GeocodeArgs::default()
    };
    let err = GeocodeConfig::try_from(args).expect_err("missing field should error");
    match err {
        CliError::MissingArgument {
            field: missing,
            env,
        } => {
            assert_eq!(missing, field);
            assert_eq!(env, env_var);
        }
        other => panic!("expected MissingArgument, found {other:?}"),
    }
}

#[rstest]
fn geocode_config_defaults_to_forward() {
    let args = GeocodeArgs {
        query: Some("Technion".to_owned()),
        api_key: Some("k".to_owned()),
        ..GeocodeArgs::default()
    };
    let config = GeocodeConfig::try_from(args).expect("config should build");
    assert!(!config.reverse);
    assert_eq!(config.base_url, DEFAULT_BASE_URL);
}

#[rstest]
#[case("32.794167,34.989167", 34.989167, 32.794167)]
#[case(" 32.8 , 35.0 ", 35.0, 32.8)]
#[case("-33.9,151.2", 151.2, -33.9)]
fn parse_latlng_accepts_lat_lng_pairs(#[case] raw: &str, #[case] x: f64, #[case] y: f64) {
    let position = parse_latlng(raw).expect("pair should parse");
    assert_eq!(position, Coord { x, y });
}

#[rstest]
#[case::no_comma("32.8 35.0")]
#[case::junk("north,east")]
#[case::lat_out_of_range("95.0,35.0")]
#[case::lng_out_of_range("32.8,200.0")]
fn parse_latlng_rejects_malformed_pairs(#[case] raw: &str) {
    let err = parse_latlng(raw).expect_err("pair should be rejected");
    match err {
        CliError::InvalidCoordinate { value } => assert_eq!(value, raw),
        other => panic!("expected InvalidCoordinate, found {other:?}"),
    }
}

#[rstest]
fn dataset_lookups_reject_unknown_ids() {
    let dataset = Dataset::demo();
    match dataset.listing("42") {
        Err(CliError::UnknownListing { id }) => assert_eq!(id, "42"),
        other => panic!("expected UnknownListing, found {other:?}"),
    }
    match dataset.institution("oxford") {
        Err(CliError::UnknownInstitution { id }) => assert_eq!(id, "oxford"),
        other => panic!("expected UnknownInstitution, found {other:?}"),
    }
}

#[rstest]
fn dataset_loads_fixture_files() {
    let dir = TempDir::new().expect("tempdir");
    let demo = Dataset::demo();
    write_dataset(dir.path(), &demo.listings, &demo.institutions);
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");

    let dataset = Dataset::load(&root).expect("fixtures should load");
    assert_eq!(dataset.listings, demo.listings);
    assert_eq!(dataset.institutions, demo.institutions);
}

#[rstest]
fn dataset_load_reports_missing_fixture() {
    let dir = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    let err = Dataset::load(&root).expect_err("missing fixtures should error");
    match err {
        CliError::ReadFixture { path, .. } => {
            assert_eq!(path.file_name(), Some(LISTINGS_FILE));
        }
        other => panic!("expected ReadFixture, found {other:?}"),
    }
}

#[rstest]
fn dataset_load_reports_malformed_json() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join(LISTINGS_FILE), b"not json").expect("write fixture");
    fs::write(dir.path().join(INSTITUTIONS_FILE), b"[]").expect("write fixture");
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 tempdir");
    let err = Dataset::load(&root).expect_err("malformed JSON should error");
    match err {
        CliError::ParseFixture { path, .. } => {
            assert_eq!(path.file_name(), Some(LISTINGS_FILE));
        }
        other => panic!("expected ParseFixture, found {other:?}"),
    }
}

#[rstest]
fn dataset_load_reports_missing_directory() {
    let dir = TempDir::new().expect("tempdir");
    let root =
        Utf8PathBuf::from_path_buf(dir.path().join("absent")).expect("utf-8 tempdir");
    let err = Dataset::load(&root).expect_err("missing directory should error");
    match err {
        CliError::OpenDataDir { path, .. } => assert_eq!(path, root),
        other => panic!("expected OpenDataDir, found {other:?}"),
    }
}

#[rstest]
fn cli_parses_pois_flags() {
    let cli = Cli::try_parse_from([
        "nestmap",
        "pois",
        "--listing",
        "3",
        "--api-key",
        "k",
        "--radius-m",
        "500",
        "--categories",
        "gym",
    ])
    .expect("args should parse");
    match cli.command {
        Command::Pois(args) => {
            assert_eq!(args.listing.as_deref(), Some("3"));
            assert_eq!(args.api_key.as_deref(), Some("k"));
            assert_eq!(args.radius_m, Some(500.0));
            assert_eq!(args.categories.as_deref(), Some("gym"));
        }
        other => panic!("expected Pois, found {other:?}"),
    }
}

#[rstest]
fn cli_parses_geocode_reverse_flag() {
    let cli = Cli::try_parse_from([
        "nestmap",
        "geocode",
        "--query",
        "32.8,35.0",
        "--reverse",
        "--api-key",
        "k",
    ])
    .expect("args should parse");
    match cli.command {
        Command::Geocode(args) => {
            assert_eq!(args.query.as_deref(), Some("32.8,35.0"));
            assert_eq!(args.reverse, Some(true));
        }
        other => panic!("expected Geocode, found {other:?}"),
    }
}

#[rstest]
fn cli_demo_flag_defaults_to_absent() {
    let cli = Cli::try_parse_from(["nestmap", "demo"]).expect("args should parse");
    match cli.command {
        Command::Demo(args) => assert_eq!(args.fail_mount, None),
        other => panic!("expected Demo, found {other:?}"),
    }
}
