//! RON configuration for logdrip
//!
//! Settings come from three layers: built-in defaults, an optional RON file,
//! then command-line flags. Later layers win.

use crate::args::Args;
use crate::sink::OutputTarget;
use logdrip_core::{ReplaySpeed, Selection, SourceKind, MAX_WAIT};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Root configuration
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where lines come from
    pub source: SourceKind,
    /// How generator mode draws lines
    pub selection: Selection,
    /// Output stream
    pub output: OutputTarget,
    /// RNG seed; wall clock when absent
    pub seed: Option<u64>,
    /// Delay between generated lines in milliseconds
    pub interval_ms: u64,
    /// Stop generator mode after this many lines
    pub count: Option<u64>,
    /// Periodic bursts on top of the steady stream
    pub burst: Option<BurstConfig>,
    /// Timed replay settings
    pub replay: ReplayConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceKind::default(),
            selection: Selection::default(),
            output: OutputTarget::default(),
            seed: None,
            interval_ms: default_interval(),
            count: None,
            burst: None,
            replay: ReplayConfig::default(),
        }
    }
}

fn default_interval() -> u64 {
    1000
}

/// Burst task configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BurstConfig {
    /// Period between bursts in milliseconds
    pub interval_ms: u64,
    /// Lines per burst
    #[serde(default = "default_burst_size")]
    pub size: usize,
}

fn default_burst_size() -> usize {
    10
}

impl BurstConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Replay configuration
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReplayConfig {
    /// Speed factor; 0 or less disables replay
    pub speed: f64,
    /// Cap on a single wait in milliseconds
    pub max_wait_ms: u64,
    /// Record waits instead of sleeping
    pub dry_run: bool,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self {
            speed: 0.0,
            max_wait_ms: MAX_WAIT.as_millis() as u64,
            dry_run: false,
        }
    }
}

impl ReplayConfig {
    pub fn max_wait(&self) -> Duration {
        Duration::from_millis(self.max_wait_ms)
    }
}

impl Config {
    /// Load configuration from a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_ron(&content)
    }

    /// Parse configuration from RON text
    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Defaults, then the file named by `--config`, then the flags
    pub fn resolve(args: &Args) -> Result<Self, ConfigError> {
        let mut config = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    /// Overlay explicitly given flags
    pub fn apply_args(&mut self, args: &Args) {
        if args.random {
            self.source = SourceKind::Lorem;
        }
        if let Some(count) = args.numbered {
            self.source = SourceKind::Numbered(count);
        }
        if args.shuffle {
            self.selection = Selection::Shuffle;
        }
        if args.stdout {
            self.output = OutputTarget::Stdout;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(interval_ms) = args.interval_ms {
            self.interval_ms = interval_ms;
        }
        if args.count.is_some() {
            self.count = args.count;
        }

        if let Some(interval_ms) = args.burst_interval_ms {
            let burst = self.burst.get_or_insert(BurstConfig {
                interval_ms,
                size: default_burst_size(),
            });
            burst.interval_ms = interval_ms;
        }
        if let (Some(size), Some(burst)) = (args.burst_size, &mut self.burst) {
            burst.size = size;
        }

        if let Some(speed) = args.speed {
            self.replay.speed = speed;
        }
        if let Some(max_wait_ms) = args.max_wait_ms {
            self.replay.max_wait_ms = max_wait_ms;
        }
        if args.dry_run {
            self.replay.dry_run = true;
        }
    }

    /// Reject settings the runtime can't honour
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Finite speeds at or below zero pick generator mode
        let speed = self.replay.speed;
        if !speed.is_finite() || speed > 0.0 {
            ReplaySpeed::try_from(speed).map_err(|e| ConfigError::Validation(e.to_string()))?;
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::Validation(
                "interval_ms must be greater than zero".into(),
            ));
        }
        if let Some(burst) = &self.burst {
            if burst.interval_ms == 0 {
                return Err(ConfigError::Validation(
                    "burst interval_ms must be greater than zero".into(),
                ));
            }
            if burst.size == 0 {
                return Err(ConfigError::Validation(
                    "burst size must be greater than zero".into(),
                ));
            }
        }
        Ok(())
    }

    /// Replay speed, or `None` for generator mode
    pub fn replay_speed(&self) -> Option<ReplaySpeed> {
        ReplaySpeed::new(self.replay.speed)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),
}
