//! Storefront CLI — App Store marketing assets from demo clips.
//!
//! Usage:
//!   storefront cards [OPTIONS]       Render screenshot cards for every clip
//!   storefront preview [OPTIONS]     Assemble App Preview videos
//!   storefront event [OPTIONS]       Build in-app event videos
//!   storefront fonts                 Show the face chosen for each language
//!   storefront check                 Check tools, fonts and clip sources
//!   storefront init-catalog <PATH>   Write the built-in catalog to a file
//!   storefront validate [PATH]       Validate a catalog

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use storefront_common::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "storefront",
    about = "App Store screenshots, App Previews and event videos from demo clips",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to $XDG_CONFIG_HOME/storefront/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Catalog file (defaults to the built-in catalog)
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render screenshot cards for every (device, language, clip, size)
    Cards {
        /// Output root (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Directory clip sources are resolved against (overrides config)
        #[arg(long)]
        clips_dir: Option<PathBuf>,

        /// Text treatment: label-block-top|pill-background|plain-stroke
        #[arg(long, default_value = "label-block-top")]
        layout: String,

        /// Teleprompter darkening: anchored-band|centered
        #[arg(long, default_value = "anchored-band")]
        overlay: String,

        /// Only these devices (repeatable)
        #[arg(long = "device")]
        devices: Vec<String>,

        /// Only these languages (repeatable)
        #[arg(long = "language")]
        languages: Vec<String>,

        /// Only these clips (repeatable)
        #[arg(long = "clip")]
        clips: Vec<String>,
    },

    /// Normalize and concatenate device clips into App Preview videos
    Preview {
        /// Only these devices (repeatable)
        #[arg(long = "device")]
        devices: Vec<String>,
    },

    /// Build in-app event videos
    Event {
        /// Only these event targets (repeatable)
        #[arg(long = "name")]
        names: Vec<String>,
    },

    /// Show which font face each language renders with
    Fonts,

    /// Check tools, fonts and clip sources
    Check,

    /// Write the built-in catalog as an editable JSON file
    InitCatalog {
        /// Destination file
        #[arg(default_value = "catalog.json")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate a catalog file (or the built-in catalog)
    Validate {
        /// Catalog file; falls back to --catalog, then the built-in catalog
        path: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load(),
    };
    let logging = storefront_common::logging::with_verbosity(&config.logging, cli.verbose);
    storefront_common::logging::init_logging(&logging);
    tracing::debug!(
        config = ?cli.config,
        catalog = ?cli.catalog,
        output_root = %config.output_root.display(),
        "Configuration loaded"
    );

    let catalog = cli.catalog;
    match cli.command {
        Commands::Cards {
            output,
            clips_dir,
            layout,
            overlay,
            devices,
            languages,
            clips,
        } => commands::cards::run(
            &config,
            catalog.as_deref(),
            commands::cards::CardArgs {
                output,
                clips_dir,
                layout,
                overlay,
                devices,
                languages,
                clips,
            },
        ),
        Commands::Preview { devices } => {
            commands::preview::run(&config, catalog.as_deref(), devices)
        }
        Commands::Event { names } => commands::event::run(&config, catalog.as_deref(), names),
        Commands::Fonts => commands::fonts::run(&config, catalog.as_deref()),
        Commands::Check => commands::check::run(&config, catalog.as_deref()),
        Commands::InitCatalog { path, force } => commands::init_catalog::run(path, force),
        Commands::Validate { path } => {
            commands::validate::run(path.as_deref().or(catalog.as_deref()))
        }
    }
}
