use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::api::{self, ApiState, DiagnosisResponse, RoundResponse, parse_concern_ids};
use crate::config::AppConfig;
use crate::core::{Round, run_batch};
use crate::error::AppError;

#[derive(Debug, Parser)]
#[command(
    name = "reality-check",
    version,
    about = "Ten-year student finance projections and a spot-the-red-flag game"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Run the JSON HTTP API (default).
    Serve {
        /// Overrides APP_HOST.
        #[arg(long)]
        host: Option<String>,
        /// Overrides APP_PORT.
        #[arg(long)]
        port: Option<u16>,
    },
    /// Generate one round and print it; with --select, also score the selection.
    Play {
        /// Comma-separated concern ids, e.g. debt_burden,job_market.
        #[arg(long, value_delimiter = ',', num_args = 0..)]
        select: Option<Vec<String>>,
    },
    /// Simulate many rounds and print aggregate statistics.
    Batch {
        #[arg(long, default_value_t = 1_000)]
        rounds: usize,
    },
}

#[derive(Serialize)]
struct PlayOutput<'a> {
    round: RoundResponse<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    diagnosis: Option<DiagnosisResponse>,
}

pub async fn run(cli: Cli, mut config: AppConfig) -> Result<(), AppError> {
    let command = cli.command.unwrap_or(Command::Serve {
        host: None,
        port: None,
    });

    match command {
        Command::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            let addr = config.server.socket_addr()?;
            api::run_http_server(addr, ApiState::from(&config)).await
        }
        Command::Play { select } => {
            let round = Round::generate();
            println!("{}", render_play(&round, select.as_deref())?);
            Ok(())
        }
        Command::Batch { rounds } => {
            if rounds == 0 || rounds > config.batch_limit {
                return Err(AppError::BatchSize {
                    requested: rounds,
                    limit: config.batch_limit,
                });
            }
            info!(rounds, "running batch");
            let summary = run_batch(rounds, &mut rand::thread_rng());
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
    }
}

/// Pretty JSON for one round, scored when a selection was given.
pub fn render_play(round: &Round, select: Option<&[String]>) -> Result<String, AppError> {
    let diagnosis = match select {
        Some(ids) => {
            let selected = parse_concern_ids(ids)?;
            Some(DiagnosisResponse::new(round, &selected))
        }
        None => None,
    };
    let output = PlayOutput {
        round: RoundResponse::new(round),
        diagnosis,
    };
    Ok(serde_json::to_string_pretty(&output)?)
}
