//! Steady generator loop: one picked line per interval

use crate::sink::{emit_shared, SharedSink};
use logdrip_core::LinePicker;
use std::io;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};
use tracing::debug;

/// Emit one line per `interval` until `limit` lines are out or `shutdown` fires
///
/// The first line goes out immediately. Returns the number of lines written.
pub async fn run_steady(
    mut picker: LinePicker,
    sink: SharedSink,
    interval: Duration,
    limit: Option<u64>,
    mut shutdown: watch::Receiver<bool>,
) -> io::Result<u64> {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut emitted = 0;

    while limit.map_or(true, |limit| emitted < limit) {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        let Some(line) = picker.next_line() else {
            break;
        };
        emit_shared(&sink, line)?;
        emitted += 1;
    }

    debug!(emitted, "steady loop finished");
    Ok(emitted)
}
