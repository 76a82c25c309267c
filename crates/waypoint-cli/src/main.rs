//! Waypoint CLI - Collect and vet transport-policy data from multiple sources.

use clap::Parser;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use waypoint_cli::commands;
use waypoint_cli::{Cli, Command, Config, Formatter};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,waypoint=info".into()),
        )
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> waypoint_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load config
    let path = Config::resolve_path(cli.config.as_deref())?;
    let config = Config::load(&path)?;
    tracing::debug!("Loaded configuration from {}", path.display());

    // Flags override the [output] table
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.output.data_dir.clone());
    let format = cli.format.map(Into::into).unwrap_or(config.output.format);
    let color_enabled = !cli.no_color && config.output.color;

    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Collect => {
            commands::execute_collect(&config, &data_dir, &formatter).await?;
        }
        Command::Analyze(args) => {
            commands::execute_analyze(args, &data_dir, &formatter)?;
        }
        Command::Schedule(args) => {
            commands::execute_schedule(args, &config, &data_dir, &formatter).await?;
        }
        Command::Sources(args) => {
            commands::execute_sources(args, &config.pipeline.catalog, &formatter)?;
        }
    }

    Ok(())
}
