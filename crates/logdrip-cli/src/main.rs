//! logdrip - synthetic and replayed log traffic
//!
//! Reads lines from stdin (or a built-in generator) and writes them out on a
//! schedule. With `--speed` the lines are replayed once, following the gaps
//! between their leading timestamps; without it they are picked at random
//! every interval until interrupted.

mod app;
mod args;
mod burst;
mod config;
mod generate;
mod sink;

use app::Outcome;
use args::Args;
use clap::Parser;
use config::Config;
use sink::LineSink;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_tracing(&args.log_level);

    let config = Config::resolve(&args)?;
    let source = config.source;
    let lines =
        tokio::task::spawn_blocking(move || source.load(std::io::stdin().lock())).await??;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    if config.replay_speed().is_none() {
        // Replay keeps the default SIGINT behaviour and dies on Ctrl-C
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => info!("interrupted, shutting down"),
                Err(e) => warn!(error = %e, "could not listen for Ctrl-C"),
            }
            let _ = shutdown_tx.send(true);
        });
    }

    let sink = LineSink::new(config.output).shared();
    match app::run(&config, lines, sink, shutdown_rx).await? {
        Outcome::Replayed(report) => info!(emitted = report.emitted, "done"),
        Outcome::Generated { steady, burst } => info!(steady, burst, "done"),
    }

    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
