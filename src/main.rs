use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use ndvi_aoi::cli::{Cli, Commands};
use ndvi_aoi::{commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    match &cli.command {
        Commands::Districts => commands::districts(&config),
        Commands::Talukas(args) => commands::talukas(&config, args),
        Commands::Villages(args) => commands::villages(&config, args),
        Commands::Select(args) => commands::select(&config, args),
        Commands::Render(args) => commands::render(&config, args),
    }
}

/// Log to stderr; RUST_LOG wins over -v/-vv.
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
