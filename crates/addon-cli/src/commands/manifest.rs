//! Manifest command implementations: `addons check` and `addons init`.

use std::path::Path;

use addon_resolver::{AddonManifest, MANIFEST_FILENAME};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Handle `addons check <manifest>`
///
/// Reports structural problems only; whether the declared dependencies
/// resolve depends on the other addons of a pass.
pub fn handle_check(path: &Path) -> Result<()> {
    let descriptor = AddonManifest::from_path(path)
        .and_then(|manifest| manifest.to_descriptor())
        .map_err(|e| CliError::user(format!("Invalid addon manifest: {e}")))?;

    println!(
        "{} Addon '{}' v{} validated",
        "=>".blue().bold(),
        descriptor.name().cyan(),
        descriptor.version()
    );
    if let Some(description) = descriptor.description() {
        println!("   {} {}", "Description:".dimmed(), description);
    }
    for dep in descriptor.dependencies() {
        println!(
            "   {} {} {}",
            "Requires:".dimmed(),
            dep.name().yellow(),
            dep.constraint()
        );
    }

    Ok(())
}

/// Handle `addons init <name>`
///
/// Prints a scaffold `addon.toml` to stdout.
pub fn handle_init(name: &str) -> Result<()> {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CliError::user(
            "Addon name must contain only alphanumeric characters, hyphens, or underscores",
        ));
    }

    let scaffold = AddonManifest::scaffold(name).to_toml()?;

    println!("{} Addon scaffold for '{}':", "=>".blue().bold(), name.cyan());
    println!();
    println!("{scaffold}");
    println!(
        "   {} Write this to {}",
        "=>".blue().bold(),
        MANIFEST_FILENAME.bold()
    );

    Ok(())
}
