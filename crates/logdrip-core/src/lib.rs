//! Logdrip Core - timestamp extraction and timed replay of log lines
//!
//! This crate provides the pieces the `logdrip` binary is assembled from:
//! - Best-effort leading-timestamp extraction (`extract`, `TimestampFormat`)
//! - A replay engine that reproduces inter-line gaps, scaled and clamped
//!   (`Replayer`, `ReplaySpeed`)
//! - Line sources for stdin and the synthetic generators (`SourceKind`)
//! - A deterministic RNG and line picker, passed explicitly (`LineRng`, `LinePicker`)
//!
//! # Example
//!
//! ```rust
//! use logdrip_core::{RecordingPacer, ReplaySpeed, Replayer, SystemClock};
//!
//! let lines = [
//!     "2024-01-01T00:00:00Z start",
//!     "2024-01-01T00:00:02Z two seconds later",
//! ];
//! let speed = ReplaySpeed::new(10.0).unwrap();
//! let mut replayer = Replayer::with_parts(speed, RecordingPacer::new(), SystemClock);
//! let mut out = Vec::new();
//! replayer.replay(lines, &mut out).unwrap();
//!
//! assert_eq!(String::from_utf8(out).unwrap(), "start\n(1) two seconds later\n");
//! ```

mod error;
mod picker;
pub mod replay;
mod rng;
pub mod source;
pub mod timestamp;

pub use error::{Error, Result};
pub use picker::{LinePicker, Selection};
pub use replay::{
    adjusted_wait, Clock, LogEntry, Pacer, RecordingPacer, ReplayReport, ReplaySpeed, Replayer,
    SystemClock, ThreadPacer, MAX_WAIT,
};
pub use rng::LineRng;
pub use source::{lorem_lines, numbered_lines, read_lines, SourceKind};
pub use timestamp::{extract, Extracted, TimestampFormat};
