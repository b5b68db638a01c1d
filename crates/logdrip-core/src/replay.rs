//! Timed replay of timestamped log lines
//!
//! Every input line becomes a [`LogEntry`]. Lines whose leading timestamp
//! parses keep that instant; the rest get the wall-clock time at which they
//! were read. Runs of unparseable lines therefore come out back to back, but
//! an unparseable line right after a timestamped one waits out the gap
//! between that timestamp and now, which for old logs is the full cap.
//!
//! Emission then follows the recorded gaps: the wait before entry `i` is
//! `(ts[i] - ts[i-1]) / speed`, capped at [`MAX_WAIT`]. Gaps that are zero or
//! negative produce no wait at all.

use crate::timestamp::extract;
use crate::{Error, Result};
use chrono::{DateTime, TimeDelta, Utc};
use std::io::Write;
use std::time::Duration;
use tracing::{debug, trace};

/// Default upper bound on any single wait
pub const MAX_WAIT: Duration = Duration::from_secs(10);

/// Playback rate relative to the recorded timeline
///
/// 1.0 is real time, 2.0 twice as fast, 0.5 half speed.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct ReplaySpeed(f64);

impl ReplaySpeed {
    /// Real-time playback
    pub const REAL_TIME: ReplaySpeed = ReplaySpeed(1.0);

    /// Returns `None` for values that disable replay (zero, negative, NaN, infinite)
    pub fn new(factor: f64) -> Option<Self> {
        (factor.is_finite() && factor > 0.0).then_some(Self(factor))
    }

    /// The raw factor
    pub fn factor(self) -> f64 {
        self.0
    }
}

impl Default for ReplaySpeed {
    fn default() -> Self {
        Self::REAL_TIME
    }
}

impl TryFrom<f64> for ReplaySpeed {
    type Error = Error;

    fn try_from(factor: f64) -> Result<Self> {
        Self::new(factor).ok_or(Error::InvalidSpeed(factor))
    }
}

/// Source of the fallback timestamp for lines without one
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Suspends the replay between emissions
pub trait Pacer {
    fn pause(&mut self, wait: Duration);
}

/// Blocks the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, wait: Duration) {
        std::thread::sleep(wait);
    }
}

/// Records waits instead of sleeping, for dry runs
#[derive(Debug, Clone, Default)]
pub struct RecordingPacer {
    waits: Vec<Duration>,
}

impl RecordingPacer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every wait requested so far, in order
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Pacer for RecordingPacer {
    fn pause(&mut self, wait: Duration) {
        self.waits.push(wait);
    }
}

/// One line ready for replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub message: String,
}

impl LogEntry {
    /// Build an entry, falling back to `clock` when no timestamp parses
    ///
    /// The flag is true when the timestamp came from the line itself.
    pub fn from_line(line: &str, clock: &impl Clock) -> (Self, bool) {
        let extracted = extract(line);
        match extracted.timestamp {
            Some(timestamp) => (
                Self {
                    timestamp,
                    message: extracted.remainder.to_string(),
                },
                true,
            ),
            None => {
                trace!(line, "no leading timestamp, using wall clock");
                (
                    Self {
                        timestamp: clock.now(),
                        message: line.to_string(),
                    },
                    false,
                )
            }
        }
    }
}

/// Wait before an entry that follows its predecessor by `delta`
///
/// `None` when `delta` is zero or negative. Otherwise `delta / speed`,
/// capped at `cap`.
pub fn adjusted_wait(delta: TimeDelta, speed: ReplaySpeed, cap: Duration) -> Option<Duration> {
    let delta = delta.to_std().ok().filter(|d| !d.is_zero())?;
    let secs = delta.as_secs_f64() / speed.factor();
    if secs >= cap.as_secs_f64() {
        Some(cap)
    } else {
        Some(Duration::from_secs_f64(secs))
    }
}

/// Summary of a finished replay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplayReport {
    /// Lines written
    pub emitted: usize,
    /// Lines whose timestamp parsed
    pub parsed: usize,
    /// Sum of all waits
    pub total_wait: Duration,
}

/// Replays a buffered sequence of lines with their original pacing
pub struct Replayer<P = ThreadPacer, C = SystemClock> {
    speed: ReplaySpeed,
    max_wait: Duration,
    pacer: P,
    clock: C,
}

impl Replayer {
    /// Create a replayer that sleeps the current thread and reads the wall clock
    pub fn new(speed: ReplaySpeed) -> Self {
        Self::with_parts(speed, ThreadPacer, SystemClock)
    }
}

impl<P: Pacer, C: Clock> Replayer<P, C> {
    /// Create a replayer with a custom pacer and clock
    pub fn with_parts(speed: ReplaySpeed, pacer: P, clock: C) -> Self {
        Self {
            speed,
            max_wait: MAX_WAIT,
            pacer,
            clock,
        }
    }

    /// Override the wait cap
    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }

    /// Get the replay speed
    pub fn speed(&self) -> ReplaySpeed {
        self.speed
    }

    /// Get the wait cap
    pub fn max_wait(&self) -> Duration {
        self.max_wait
    }

    /// Get the pacer
    pub fn pacer(&self) -> &P {
        &self.pacer
    }

    /// Replay `lines` into `out`
    ///
    /// All lines are converted before the first one is written. An empty
    /// input writes nothing. The only error is a failed write.
    pub fn replay<I, S, W>(&mut self, lines: I, out: &mut W) -> Result<ReplayReport>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        W: Write,
    {
        let mut parsed = 0;
        let entries: Vec<LogEntry> = lines
            .into_iter()
            .map(|line| {
                let (entry, found) = LogEntry::from_line(line.as_ref(), &self.clock);
                parsed += usize::from(found);
                entry
            })
            .collect();

        let mut report = self.emit_all(&entries, out)?;
        report.parsed = parsed;
        Ok(report)
    }

    fn emit_all<W: Write>(&mut self, entries: &[LogEntry], out: &mut W) -> Result<ReplayReport> {
        let mut report = ReplayReport::default();
        let Some(first) = entries.first() else {
            return Ok(report);
        };

        writeln!(out, "{}", first.message)?;
        out.flush()?;
        report.emitted = 1;

        for (index, pair) in entries.windows(2).enumerate() {
            let (prev, entry) = (&pair[0], &pair[1]);
            let index = index + 1;

            let delta = entry.timestamp - prev.timestamp;
            if let Some(wait) = adjusted_wait(delta, self.speed, self.max_wait) {
                debug!(index, ?wait, "pausing before entry");
                self.pacer.pause(wait);
                report.total_wait += wait;
            }

            writeln!(out, "({index}) {}", entry.message)?;
            out.flush()?;
            report.emitted += 1;
        }

        Ok(report)
    }
}
