mod config;
mod estimator;
mod fix;
mod gate;
mod pipeline;
mod receiver;
mod session;
mod storage;

use clap::{Parser, Subcommand};
use log::{error, info, warn};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::config::Config;
use crate::pipeline::{LogSink, PipelineError, RunSummary};
use crate::receiver::ReplayReceiver;
use crate::storage::DirectoryStorage;

#[derive(Parser)]
#[command(name = "gnss-logger")]
#[command(about = "GNSS fix gating, smoothing and CSV session logging")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and print the effective settings
    Check { config: String },
    /// Log a session from a recorded receiver stream
    Run {
        config: String,
        /// JSON lines file, one receiver epoch per line
        #[arg(long)]
        replay: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check { config } => check(&config),
        Commands::Run { config, replay } => run(&config, &replay),
    }
}

fn check(path: &str) -> ExitCode {
    match Config::from_file(path) {
        Ok(config) => {
            println!("Configuration is valid");
            println!("{:#?}", config);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Config error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(path: &str, replay: &Path) -> ExitCode {
    let config = match Config::from_file(path) {
        Ok(c) => c,
        Err(e) => {
            error!("config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .enable_io()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            error!("failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(log_session(&config, replay)) {
        Ok(summary) => {
            info!(
                "session {} finished: {} ticks, {} raw rows, {} filtered rows",
                summary.session.filtered_name(),
                summary.ticks,
                summary.rows_raw,
                summary.rows_filtered
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn log_session(config: &Config, replay: &Path) -> Result<RunSummary, PipelineError> {
    let logging = &config.logging;
    let storage = if logging.create_directory {
        DirectoryStorage::create(logging.directory.clone())?
    } else {
        DirectoryStorage::new(logging.directory.clone())
    };
    let mut receiver = ReplayReceiver::open(replay)?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("ctrl-c handler unavailable: {}", e);
            std::future::pending::<()>().await;
        }
    };

    pipeline::run(config, &mut receiver, storage, &mut LogSink, shutdown).await
}
