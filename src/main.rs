use clap::Parser;
use reality_check::cli::{self, Cli};
use reality_check::config::AppConfig;
use reality_check::error::AppError;
use reality_check::telemetry;

#[tokio::main]
async fn main() {
    if let Err(err) = start(Cli::parse()).await {
        eprintln!("reality-check: {err}");
        std::process::exit(1);
    }
}

async fn start(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    cli::run(cli, config).await
}
