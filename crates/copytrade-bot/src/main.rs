//! Copy-trade webhook bridge - Entry Point

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Copy-trade webhook bridge
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via COPYTRADE_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config first: it carries the logging settings
    let config_path = copytrade_bot::AppConfig::resolve_path(args.config);
    let config = copytrade_bot::AppConfig::load(&config_path)?;

    copytrade_telemetry::init_logging(&config.telemetry)?;

    info!("Starting copytrade-bot v{}", env!("CARGO_PKG_VERSION"));
    info!(
        config_path = %config_path,
        from_file = std::path::Path::new(&config_path).exists(),
        port = config.webhook.port,
        path = %config.webhook.path,
        "Configuration loaded"
    );

    let app = copytrade_bot::Application::new(config)?;
    app.run().await?;

    Ok(())
}
