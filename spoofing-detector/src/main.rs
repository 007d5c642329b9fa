#![deny(rust_2018_idioms)]

use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use spoofing_detector::{Result, settings::Settings, startup::App};
use tracing::error;
use tracing_subscriber::FmtSubscriber;

/// Flags AIS position reports that look spoofed.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Settings file layered on top of the built-in defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
    /// Number of trajectory workers (defaults to available parallelism)
    #[arg(short, long, global = true)]
    workers: Option<usize>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run both detection phases and write the merged anomaly table
    Detect {
        #[arg(short, long)]
        input: PathBuf,
        /// CSV output, JSON lines if the path ends in `.json`
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Compare sequential and parallel trajectory detection
    Benchmark {
        #[arg(short, long)]
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let settings = match settings(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{e:?}");
            return ExitCode::FAILURE;
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(tracing::Level::from(settings.log_level))
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to install tracing subscriber: {e}");
    }

    let app = match App::build(settings) {
        Ok(app) => app,
        Err(e) => {
            error!("invalid settings: {e:?}");
            return ExitCode::FAILURE;
        }
    };

    let res = match args.command {
        Command::Detect { input, output } => {
            app.detect(&input, output.as_deref()).await.map(|_| ())
        }
        Command::Benchmark { input } => app.benchmark(&input).await.map(|_| ()),
    };

    match res {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:?}");
            ExitCode::FAILURE
        }
    }
}

fn settings(args: &Args) -> Result<Settings> {
    let mut settings = Settings::load(args.config.as_deref())?;

    if let Some(workers) = args.workers {
        settings.executor.num_workers = Some(workers);
    }

    Ok(settings)
}
