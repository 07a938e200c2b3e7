//! Capabilities probe for dashboard layer descriptors.
//!
//! Prints the GetCapabilities URL, bounding box, time values or full extent
//! of the layers in an overlayer JSON file.

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::info;

use capabilities_client::CapabilitiesBoundsResolver;

#[derive(Parser, Debug)]
#[command(name = "bounds-probe")]
#[command(about = "Resolve WMS layer extents from GetCapabilities", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Overlayer JSON file (one record or an array)
    #[arg(short, long, global = true, env = "LAYER_DESCRIPTORS")]
    descriptor: Option<PathBuf>,

    /// Only probe this layer (`name` or `workspace:name`)
    #[arg(short, long, global = true)]
    layer: Option<String>,

    /// Resolver configuration YAML
    #[arg(short, long, global = true, env = "RESOLVER_CONFIG")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the GetCapabilities URL of each layer
    Url,
    /// Print the geographic bounding box of each layer
    Bounds,
    /// Print the sorted time dimension values of each layer
    Times,
    /// Print bounds and time dimension of each layer
    Extent,
    /// List every layer named in each capabilities document
    Layers,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    bounds_probe::logging::init(&cli.log_level, matches!(cli.log_format, LogFormat::Json))?;

    let Some(path) = cli.descriptor.as_deref() else {
        anyhow::bail!("--descriptor <FILE> (or LAYER_DESCRIPTORS) is required");
    };
    let descriptors = bounds_probe::load_descriptors(path, cli.layer.as_deref())?;
    let config = bounds_probe::load_config(cli.config.as_deref())?;
    info!(layers = descriptors.len(), anchor = %config.anchor, "Loaded layer descriptors");

    let resolver = CapabilitiesBoundsResolver::new(config)?;

    let report = match cli.command {
        Commands::Url => bounds_probe::url_report(&resolver, &descriptors)?,
        Commands::Bounds => bounds_probe::bounds_report(&resolver, &descriptors).await?,
        Commands::Times => bounds_probe::times_report(&resolver, &descriptors).await?,
        Commands::Extent => bounds_probe::extent_report(&resolver, &descriptors).await?,
        Commands::Layers => bounds_probe::layers_report(&resolver, &descriptors).await?,
    };

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
