//! Command-line arguments for logdrip
//!
//! Every setting is optional here so that a config file can supply it;
//! see [`Config::apply_args`](crate::config::Config::apply_args).

use clap::Parser;
use std::path::PathBuf;

/// Emit synthetic or replayed log traffic on a schedule
#[derive(Parser, Debug, Clone)]
#[command(name = "logdrip")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Emit synthetic or replayed log lines on a schedule")]
pub struct Args {
    /// Path to a RON configuration file
    #[arg(short, long, env = "LOGDRIP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Draw lines from the built-in Lorem-ipsum text instead of stdin
    #[arg(short, long, conflicts_with = "numbered")]
    pub random: bool,

    /// Generate "line 1" .. "line N" instead of reading stdin
    #[arg(short, long, value_name = "N")]
    pub numbered: Option<usize>,

    /// Replay stdin with its embedded timing, scaled by this factor.
    /// 1.0 is real time; 0 or less keeps generator mode
    #[arg(short, long, value_name = "FACTOR", allow_negative_numbers = true)]
    pub speed: Option<f64>,

    /// Upper bound on any single replay wait, in milliseconds
    #[arg(long, value_name = "MS")]
    pub max_wait_ms: Option<u64>,

    /// Replay without sleeping, logging the waits that would have happened
    #[arg(long)]
    pub dry_run: bool,

    /// Delay between generated lines, in milliseconds
    #[arg(short, long, value_name = "MS")]
    pub interval_ms: Option<u64>,

    /// Stop after this many generated lines
    #[arg(long, value_name = "N")]
    pub count: Option<u64>,

    /// Deal lines from a shuffled deck instead of picking with replacement
    #[arg(long)]
    pub shuffle: bool,

    /// Emit a burst of lines every this many milliseconds
    #[arg(long, value_name = "MS")]
    pub burst_interval_ms: Option<u64>,

    /// Lines per burst
    #[arg(long, value_name = "N")]
    pub burst_size: Option<usize>,

    /// Seed for line selection; defaults to the wall clock
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write to stdout instead of stderr
    #[arg(long)]
    pub stdout: bool,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(long, env = "LOGDRIP_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}
