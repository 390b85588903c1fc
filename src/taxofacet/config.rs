//! # Configuration
//!
//! Search settings are loaded with [`confique`] from layered sources, in
//! priority order:
//!
//! 1. **Environment variables**: `TAXOFACET_PAGE_SIZE`, `TAXOFACET_SHUFFLE_TIES`,
//!    `TAXOFACET_SHUFFLE_SEED`, `TAXOFACET_TAXONOMY_FILE`.
//! 2. **Explicit file**: passed with `--config`. Must exist.
//! 3. **User file**: `taxofacet.toml` in the OS config directory (via
//!    [`directories`]). Skipped when absent.
//! 4. **Compiled defaults**.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `page_size` | `12` | Listings per page |
//! | `shuffle_ties` | `true` | Randomize order among equally promoted listings |
//! | `shuffle_seed` | none | Seed for the tie-break, for repeatable output |
//! | `taxonomy_file` | none | JSON taxonomy replacing the built-in catalog |

use crate::error::{FacetError, Result};
use crate::query::{QueryOptions, DEFAULT_PAGE_SIZE};
use crate::taxonomy::{shared_marketplace, TaxonomyTree};
use confique::Config;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

pub const CONFIG_FILE_NAME: &str = "taxofacet.toml";

#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Listings per page.
    #[config(default = 12, env = "TAXOFACET_PAGE_SIZE")]
    pub page_size: u32,

    /// Shuffle listings of equal promotion before applying the sort key.
    /// Turning this off makes the sort key decide.
    #[config(default = true, env = "TAXOFACET_SHUFFLE_TIES")]
    pub shuffle_ties: bool,

    #[config(env = "TAXOFACET_SHUFFLE_SEED")]
    pub shuffle_seed: Option<u64>,

    /// JSON taxonomy file. When absent the built-in catalog is used.
    #[config(env = "TAXOFACET_TAXONOMY_FILE")]
    pub taxonomy_file: Option<PathBuf>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            shuffle_ties: true,
            shuffle_seed: None,
            taxonomy_file: None,
        }
    }
}

/// Path of the per-user config file, if the platform has a config dir.
pub fn user_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taxofacet").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

impl SearchConfig {
    /// Load from every layer. `explicit` must exist when given.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        Self::load_layers(explicit, user_config_path().as_deref())
    }

    pub(crate) fn load_layers(explicit: Option<&Path>, user: Option<&Path>) -> Result<Self> {
        let mut builder = SearchConfig::builder().env();
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(FacetError::Io(io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            }
            builder = builder.file(path);
        }
        if let Some(path) = user {
            builder = builder.file(path);
        }
        let config = builder.load()?;
        debug!(?config, "loaded configuration");
        Ok(config)
    }

    pub fn query_options(&self) -> QueryOptions {
        QueryOptions {
            page_size: self.page_size.max(1),
            shuffle_ties: self.shuffle_ties,
        }
    }

    /// The configured taxonomy: the file when set, the built-in catalog
    /// otherwise.
    pub fn taxonomy(&self) -> Result<Arc<TaxonomyTree>> {
        match &self.taxonomy_file {
            Some(path) => Ok(Arc::new(TaxonomyTree::load(path)?)),
            None => Ok(shared_marketplace()),
        }
    }
}
