//! Resolver configuration from `addons.toml`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};
use crate::{CONFIG_FILENAME, MANIFEST_FILENAME};

/// Settings for one resolution run, stored next to the addon directories.
///
/// Every key is optional:
///
/// ```toml
/// disabled = ["legacy-theme"]
/// strict = true
/// manifest = "addon.toml"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverConfig {
    /// Addons dropped from the candidate list before the pass starts.
    pub disabled: Vec<String>,
    /// Whether any resolution failure should be treated as fatal by the caller.
    pub strict: bool,
    /// Manifest file name looked up in each addon directory.
    pub manifest: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            disabled: Vec::new(),
            strict: false,
            manifest: MANIFEST_FILENAME.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Read a configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Read `addons.toml` from `root`, falling back to defaults when absent.
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(CONFIG_FILENAME);
        if !path.is_file() {
            debug!(path = %path.display(), "no resolver config, using defaults");
            return Ok(Self::default());
        }
        Self::from_path(&path)
    }

    pub fn is_disabled(&self, name: &str) -> bool {
        self.disabled.iter().any(|d| d == name)
    }

    /// Remove disabled addons from a candidate list, keeping the order of
    /// the rest.
    pub fn filter(&self, candidates: Vec<ExtensionDescriptor>) -> Vec<ExtensionDescriptor> {
        candidates
            .into_iter()
            .filter(|candidate| {
                let disabled = self.is_disabled(candidate.name());
                if disabled {
                    debug!(addon = candidate.name(), "addon disabled by config");
                }
                !disabled
            })
            .collect()
    }
}
