//! Dataset loading for CLI commands.
//!
//! Commands operate on a listing and institution collection. By default it
//! is the built-in Haifa demo dataset; `--data-dir` points at a directory
//! holding `listings.json` and `institutions.json` instead, in the same JSON
//! shape the domain types serialise to.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use nestmap_core::{Institution, Listing};
use nestmap_data::{demo_institutions, demo_listings};
use serde::de::DeserializeOwned;

use crate::CliError;

pub(crate) const LISTINGS_FILE: &str = "listings.json";
pub(crate) const INSTITUTIONS_FILE: &str = "institutions.json";

/// The listing and institution collections a command operates on.
#[derive(Debug, Clone)]
pub(crate) struct Dataset {
    pub(crate) listings: Vec<Listing>,
    pub(crate) institutions: Vec<Institution>,
}

impl Dataset {
    /// The built-in Haifa demo dataset.
    pub(crate) fn demo() -> Self {
        Self {
            listings: demo_listings(),
            institutions: demo_institutions(),
        }
    }

    /// Load `listings.json` and `institutions.json` from a directory.
    pub(crate) fn load(data_dir: &Utf8Path) -> Result<Self, CliError> {
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority()).map_err(|source| {
            CliError::OpenDataDir {
                path: data_dir.to_path_buf(),
                source,
            }
        })?;
        Ok(Self {
            listings: read_fixture(&dir, data_dir, LISTINGS_FILE)?,
            institutions: read_fixture(&dir, data_dir, INSTITUTIONS_FILE)?,
        })
    }

    /// Load from `data_dir` when given, falling back to the demo dataset.
    pub(crate) fn resolve(data_dir: Option<&Utf8Path>) -> Result<Self, CliError> {
        data_dir.map_or_else(|| Ok(Self::demo()), Self::load)
    }

    /// The listing with the given identifier.
    pub(crate) fn listing(&self, id: &str) -> Result<&Listing, CliError> {
        self.listings
            .iter()
            .find(|listing| listing.id == id)
            .ok_or_else(|| CliError::UnknownListing { id: id.to_owned() })
    }

    /// The institution with the given identifier.
    pub(crate) fn institution(&self, id: &str) -> Result<&Institution, CliError> {
        self.institutions
            .iter()
            .find(|institution| institution.id == id)
            .ok_or_else(|| CliError::UnknownInstitution { id: id.to_owned() })
    }
}

fn read_fixture<T: DeserializeOwned>(
    dir: &Dir,
    data_dir: &Utf8Path,
    name: &str,
) -> Result<Vec<T>, CliError> {
    let contents = dir
        .read_to_string(name)
        .map_err(|source| CliError::ReadFixture {
            path: data_dir.join(name),
            source,
        })?;
    serde_json::from_str(&contents).map_err(|source| CliError::ParseFixture {
        path: data_dir.join(name),
        source,
    })
}
