mod cli;
mod error;

use std::time::Duration;

use clap::Parser;
use tokio::time::MissedTickBehavior;
use tracing::info;
use tracing_subscriber::EnvFilter;

use respondd_core::{Snapshot, SnapshotAssembler};

use crate::cli::{Cli, LogFormat};
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_format);

    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

/// Logs go to stderr; stdout carries only snapshots.
fn init_tracing(verbosity: u8, format: LogFormat) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let config = respondd_config::load_config(cli.config.as_deref())?;
    if cli.print_config {
        print!("{}", config.to_redacted_toml()?);
        return Ok(());
    }

    let pipeline = respondd_config::to_pipeline_config(&config)?;
    let assembler = SnapshotAssembler::new(pipeline)?;

    let Some(every) = cli.interval else {
        let snapshot = assembler.run().await;
        return emit(&snapshot, cli.compact);
    };

    info!(interval_secs = every, "polling until interrupted");
    let mut ticker = tokio::time::interval(Duration::from_secs(every));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        let cycle = async {
            ticker.tick().await;
            assembler.run().await
        };
        tokio::select! {
            snapshot = cycle => emit(&snapshot, cli.compact)?,
            _ = &mut shutdown => {
                info!("interrupted, stopping");
                return Ok(());
            }
        }
    }
}

fn emit(snapshot: &Snapshot, compact: bool) -> Result<(), CliError> {
    let rendered = if compact {
        serde_json::to_string(snapshot)?
    } else {
        serde_json::to_string_pretty(snapshot)?
    };
    println!("{rendered}");
    Ok(())
}
