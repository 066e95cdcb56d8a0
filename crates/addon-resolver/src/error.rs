use std::path::PathBuf;

/// Errors raised by the addon resolver.
///
/// Only structural problems and invariant violations are errors. Per-addon
/// resolution outcomes (missing or incompatible dependencies, cycles) are
/// recorded in the [`ExtensionRegistry`](crate::ExtensionRegistry) instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A descriptor field is blank or otherwise unusable.
    #[error("invalid addon '{name}': {reason}")]
    Validation { name: String, reason: String },

    /// A version constraint expression could not be parsed.
    #[error("invalid version constraint '{constraint}': {reason}")]
    InvalidConstraint { constraint: String, reason: String },

    /// Two descriptors in one pass share a name.
    #[error("duplicate addon name: {0}")]
    DuplicateExtension(String),

    /// A name was recorded twice in a registry.
    #[error("addon already recorded in registry: {0}")]
    AlreadyResolved(String),

    /// Failed to parse addon manifest TOML.
    #[error("failed to parse addon manifest: {0}")]
    ManifestParse(#[from] toml::de::Error),

    /// Failed to serialize addon manifest.
    #[error("failed to serialize addon manifest: {0}")]
    ManifestSerialize(String),

    /// Addon manifest file not found at the expected path.
    #[error("addon manifest not found: {0}")]
    ManifestNotFound(PathBuf),

    /// Failed to parse the resolver configuration file.
    #[error("failed to parse resolver config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading manifests or configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn validation(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
