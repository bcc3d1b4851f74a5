//! CLI definitions for adg-analyze
//!
//! This module contains the clap CLI structure definitions, separated from
//! main.rs so the command handlers can borrow the parsed arguments.

use std::path::PathBuf;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::{Args, Parser, Subcommand};

#[cfg(feature = "release")]
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
#[cfg(not(feature = "release"))]
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("VERGEN_GIT_SHA"), ")");

/// Build clap styles.
///
/// - Green: headers, usage, command names
/// - White: placeholders and valid values
pub fn build_cli_styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::Green.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::White.on_default())
        .valid(AnsiColor::White.on_default())
        .invalid(AnsiColor::Red.on_default())
        .error(AnsiColor::Red.on_default() | Effects::BOLD)
}

#[derive(Parser)]
#[command(name = "adg-analyze")]
#[command(about = "[ ADG Analyzer ] - inspect the chains, devices and macros of Ableton Live racks")]
#[command(
    long_about = "ADG Analyzer - extract the signal-chain topology of Ableton Live device racks.

Reads .adg rack presets (gzip-compressed XML) and prints a JSON description
of each rack: chains, devices (recursively through nested racks), macro
controls, the Live version that saved it and the minimum Live edition needed
to load it.

QUICK START:
    adg-analyze analyze Bass.adg              Analyze one rack
    adg-analyze analyze *.adg --pretty        Analyze several racks in parallel
    adg-analyze classify Eq8                  Look up a device tag
    adg-analyze config show                   Show effective configuration

Set RUST_LOG=debug to trace each analysis stage on stderr."
)]
#[command(version = VERSION)]
#[command(styles = build_cli_styles())]
pub struct Cli {
    /// Use this config file instead of ~/.config/adg-analyzer/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze one or more rack files
    #[command(long_about = "Analyze one or more .adg rack files and print the results as JSON.

A single file prints one JSON object; several files print an array in the
order given. Files are analyzed in parallel. A file that fails validation
(missing, wrong size, wrong extension) is reported on stderr and makes the
command exit with status 1; parse problems are reported inside the JSON.

EXAMPLES:
    adg-analyze analyze Bass.adg
    adg-analyze analyze racks/*.adg --pretty
    adg-analyze analyze Drums.adg --max-depth 4 --no-cache
    adg-analyze analyze *.adg --cache-dir ~/.cache/adg-analyzer")]
    Analyze(AnalyzeArgs),

    /// Classify a raw device tag
    #[command(long_about = "Show how a raw XML device tag is classified.

Prints the display name, whether the tag is unknown (custom, e.g. Max for
Live or third-party), and the Live edition the device requires.

EXAMPLES:
    adg-analyze classify Eq8
    adg-analyze classify OriginalSimpler")]
    Classify {
        #[arg(help = "Device tag as it appears in the rack XML")]
        tag: String,
    },

    /// Configuration management
    #[command(
        subcommand,
        long_about = "Inspect the analyzer configuration.

Configuration is stored in ~/.config/adg-analyzer/config.toml. The
ABLETON_MAX_FILE_SIZE, ABLETON_MAX_MEMORY_USAGE, ABLETON_ANALYSIS_TIMEOUT
and ABLETON_STREAM_PARSING_THRESHOLD environment variables override the
matching limits.

EXAMPLES:
    adg-analyze config show          Display effective configuration
    adg-analyze config path          Print the config file location"
    )]
    Config(ConfigCommands),
}

#[derive(Args)]
pub struct AnalyzeArgs {
    #[arg(required = true, help = "Rack files to analyze (.adg)")]
    pub files: Vec<PathBuf>,

    #[arg(long, help = "Pretty-print the JSON output")]
    pub pretty: bool,

    #[arg(long, value_name = "DIR", help = "Cache results as files in DIR")]
    pub cache_dir: Option<PathBuf>,

    #[arg(long, conflicts_with = "cache_dir", help = "Disable result caching")]
    pub no_cache: bool,

    #[arg(long, value_name = "N", help = "Maximum nested device depth (overrides config)")]
    pub max_depth: Option<usize>,

    #[arg(long, short, value_name = "N", help = "Worker threads (default: one per CPU)")]
    pub jobs: Option<usize>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective configuration as TOML
    #[command(long_about = "Display the effective configuration in TOML format.

Environment overrides are applied before printing.

EXAMPLE:
    adg-analyze config show")]
    Show,
    /// Print the config file path
    Path,
}
