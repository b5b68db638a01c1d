//! Periodic bursts of lines on top of the steady stream
//!
//! The burst loop runs as its own tokio task and stops when its handle says
//! so, which keeps it bound to the lifetime of whoever spawned it.

use crate::config::BurstConfig;
use crate::sink::{emit_shared, SharedSink};
use logdrip_core::LinePicker;
use std::io;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Handle to a running burst task
pub struct BurstHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<io::Result<u64>>,
}

impl BurstHandle {
    /// Start bursting; the first burst comes one interval from now
    pub fn spawn(picker: LinePicker, sink: SharedSink, config: BurstConfig) -> Self {
        let (shutdown, rx) = watch::channel(false);
        let task = tokio::spawn(run_bursts(picker, sink, config.interval(), config.size, rx));
        Self { shutdown, task }
    }

    /// Stop the task and wait for it; returns the number of lines it wrote
    pub async fn stop(self) -> io::Result<u64> {
        // The task may already have ended on a write error
        let _ = self.shutdown.send(true);
        self.task.await.map_err(io::Error::other)?
    }
}

async fn run_bursts(
    mut picker: LinePicker,
    sink: SharedSink,
    interval: Duration,
    size: usize,
    mut shutdown: watch::Receiver<bool>,
) -> io::Result<u64> {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut emitted = 0;

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        for _ in 0..size {
            let Some(line) = picker.next_line() else {
                return Ok(emitted);
            };
            emit_shared(&sink, line)?;
            emitted += 1;
        }
        debug!(size, "burst emitted");
    }

    Ok(emitted)
}
