//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Addon resolver - Compute a safe load order for a directory of addons
#[derive(Parser, Debug)]
#[command(name = "addons")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Resolve every addon under a directory and activate them in order
    ///
    /// Each immediate subdirectory holding an addon.toml is one addon.
    /// An optional addons.toml in the root disables addons or turns on
    /// strict mode.
    ///
    /// Examples:
    ///   addons resolve                 # Resolve addons under the current directory
    ///   addons resolve plugins --json  # Machine-readable report
    Resolve {
        /// Directory containing one subdirectory per addon
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Resolver config file (defaults to <ROOT>/addons.toml)
        #[arg(short, long, env = "ADDONS_CONFIG")]
        config: Option<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Validate a single addon manifest
    Check {
        /// Path to an addon.toml file
        manifest: PathBuf,
    },

    /// Print a manifest scaffold for a new addon
    Init {
        /// Name of the new addon
        name: String,
    },
}
