//! Dependency resolution and staged loading for addons.
//!
//! This crate turns a list of discovered addon descriptors into a safe load
//! order plus a set of failures. Descriptors are attempted in discovery
//! order; the ones waiting on dependencies are retried until no further
//! progress is possible, and the rest are failed with a reason. An addon is
//! never placed in the load order before its dependencies.

pub mod config;
pub mod descriptor;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod version;

/// The canonical filename for addon manifest files.
pub const MANIFEST_FILENAME: &str = "addon.toml";

/// The resolver configuration file looked up in the addon root.
pub const CONFIG_FILENAME: &str = "addons.toml";

pub use config::ResolverConfig;
pub use descriptor::{Dependency, ExtensionDescriptor};
pub use error::{Error, Result};
pub use loader::{Activator, LoadReport, NotLoaded, StagedLoader};
pub use manifest::{AddonManifest, discover};
pub use registry::{ExtensionRegistry, FailureKind, FailureReason};
pub use report::ResolutionReport;
pub use resolver::{DependencyResolver, resolve};
pub use version::{Version, VersionConstraint};
