//! Addon manifest parsing for `addon.toml` files, and directory discovery.
//!
//! # Example TOML
//!
//! ```toml
//! [addon]
//! name = "charts"
//! version = "1.2.0"
//! description = "Charting widgets"
//!
//! [dependencies]
//! swing = ">=1.0"
//! i18n = "*"
//! ```
//!
//! Dependencies keep their declaration order.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::descriptor::ExtensionDescriptor;
use crate::error::{Error, Result};

/// Complete addon manifest loaded from `addon.toml`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddonManifest {
    /// Core addon metadata.
    pub addon: AddonMeta,
    /// Dependency name to version constraint expression.
    #[serde(default)]
    pub dependencies: toml::Table,
}

/// Basic metadata about an addon.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AddonMeta {
    pub name: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AddonManifest {
    /// Parse an addon manifest from a TOML string.
    ///
    /// The manifest is fully validated: a manifest that parses here always
    /// converts into a descriptor.
    pub fn from_toml(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        manifest.to_descriptor()?;
        Ok(manifest)
    }

    /// Read and parse an addon manifest from a file path.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::ManifestNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// A minimal manifest for a new addon.
    pub fn scaffold(name: &str) -> Self {
        Self {
            addon: AddonMeta {
                name: name.to_string(),
                version: "0.1.0".to_string(),
                description: Some(String::new()),
            },
            dependencies: toml::Table::new(),
        }
    }

    /// Serialize the manifest back to a TOML string.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::ManifestSerialize(e.to_string()))
    }

    /// Build the descriptor this manifest declares.
    pub fn to_descriptor(&self) -> Result<ExtensionDescriptor> {
        let mut dependencies = Vec::with_capacity(self.dependencies.len());
        for (name, value) in &self.dependencies {
            let expression = value.as_str().ok_or_else(|| {
                Error::validation(
                    self.addon.name.clone(),
                    format!("constraint for dependency '{name}' must be a string"),
                )
            })?;
            dependencies.push((name.clone(), expression));
        }

        let descriptor =
            ExtensionDescriptor::new(self.addon.name.clone(), &self.addon.version, dependencies)?;
        Ok(match &self.addon.description {
            Some(text) if !text.is_empty() => descriptor.with_description(text.clone()),
            _ => descriptor,
        })
    }
}

/// Collect descriptors from the immediate subdirectories of `root`.
///
/// Each subdirectory containing a file named `manifest_name` contributes one
/// descriptor. Subdirectories are visited in name order, which becomes the
/// input order of the resolution pass. Subdirectories without a manifest are
/// skipped; a manifest that fails to parse aborts discovery.
pub fn discover(root: &Path, manifest_name: &str) -> Result<Vec<ExtensionDescriptor>> {
    let mut dirs: Vec<PathBuf> = std::fs::read_dir(root)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_dir())
        .collect();
    dirs.sort();

    let mut descriptors = Vec::new();
    for dir in dirs {
        let manifest_path = dir.join(manifest_name);
        if !manifest_path.is_file() {
            debug!(dir = %dir.display(), "no addon manifest, skipping");
            continue;
        }
        let descriptor = AddonManifest::from_path(&manifest_path)?.to_descriptor()?;
        debug!(
            addon = descriptor.name(),
            version = %descriptor.version(),
            path = %manifest_path.display(),
            "discovered addon"
        );
        descriptors.push(descriptor);
    }
    Ok(descriptors)
}
