//! `addons resolve`: discovery, resolution and activation.
//!
//! This is the loader side of the resolver: it decides which descriptors
//! take part in the pass, activates the resulting load order and reports
//! failures to the operator.

use std::path::Path;

use addon_resolver::{
    Activator, ExtensionDescriptor, ExtensionRegistry, LoadReport, ResolutionReport,
    ResolverConfig, StagedLoader, discover, resolve,
};
use colored::Colorize;
use tracing::{info, warn};

use crate::error::{CliError, Result};

/// Activator that records each activation in the log.
struct LoggingActivator;

impl Activator for LoggingActivator {
    fn activate(&mut self, addon: &ExtensionDescriptor) -> std::result::Result<(), String> {
        info!(
            addon = addon.name(),
            version = %addon.version(),
            "addon loaded"
        );
        Ok(())
    }
}

/// Handle `addons resolve [root] [--config PATH] [--json]`
///
/// Structural errors (bad manifest, duplicate names) abort before anything
/// is resolved. Resolution failures are reported and only turn into an
/// error when the config is `strict`.
pub fn handle_resolve(root: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    if !root.is_dir() {
        return Err(CliError::user(format!(
            "Addon root '{}' is not a directory",
            root.display()
        )));
    }

    let config = match config_path {
        Some(path) => ResolverConfig::from_path(path)?,
        None => ResolverConfig::load(root)?,
    };

    let candidates = config.filter(discover(root, &config.manifest)?);
    let registry = resolve(candidates)?;
    for (name, reason) in registry.failures() {
        warn!(addon = name, %reason, "addon failed to resolve");
    }

    let load = StagedLoader::new(&registry).load(&mut LoggingActivator);
    for entry in load.failed.iter().chain(&load.skipped) {
        warn!(addon = %entry.name, reason = %entry.reason, "addon not activated");
    }

    if json {
        let output = serde_json::json!({
            "resolution": ResolutionReport::from(&registry),
            "activation": load,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_summary(&registry, &load);
    }

    let problems = registry.failure_count() + load.failed.len() + load.skipped.len();
    if config.strict && problems > 0 {
        return Err(CliError::user(format!(
            "{problems} addon(s) could not be loaded (strict mode)"
        )));
    }

    Ok(())
}

fn print_summary(registry: &ExtensionRegistry, load: &LoadReport) {
    if registry.is_empty() {
        println!("{} No addons found.", "=>".blue().bold());
        return;
    }

    println!("{} Load order:", "=>".blue().bold());
    for (i, addon) in registry.resolved().enumerate() {
        println!(
            "   {:>3}. {} {}",
            i + 1,
            addon.name().cyan(),
            addon.version().to_string().dimmed()
        );
    }

    if registry.failure_count() > 0 {
        println!("{} Failed to resolve:", "=>".red().bold());
        for (name, reason) in registry.failures() {
            println!("   {} - {}", name.yellow(), reason);
        }
    }

    for entry in load.failed.iter().chain(&load.skipped) {
        println!(
            "   {} {} - {}",
            "not activated:".dimmed(),
            entry.name.yellow(),
            entry.reason
        );
    }
}
