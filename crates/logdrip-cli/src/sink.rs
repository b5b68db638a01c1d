//! Output stream shared by the generator loops and the replay engine

use serde::{Deserialize, Serialize};
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Stream the lines go to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum OutputTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Line-oriented writer; every line is flushed as soon as it is written
pub struct LineSink {
    out: Box<dyn Write + Send>,
}

/// Sink shared between the steady loop and the burst task
pub type SharedSink = Arc<Mutex<LineSink>>;

impl LineSink {
    /// Open the given standard stream
    pub fn new(target: OutputTarget) -> Self {
        match target {
            OutputTarget::Stderr => Self::from_writer(io::stderr()),
            OutputTarget::Stdout => Self::from_writer(io::stdout()),
        }
    }

    /// Wrap an arbitrary writer
    pub fn from_writer(out: impl Write + Send + 'static) -> Self {
        Self { out: Box::new(out) }
    }

    /// Wrap for sharing
    pub fn shared(self) -> SharedSink {
        Arc::new(Mutex::new(self))
    }

    /// Write one line and flush
    pub fn emit(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.out, "{line}")?;
        self.out.flush()
    }
}

impl Write for LineSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.out.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

/// Emit through a shared sink
///
/// A panic in another writer leaves the stream usable, so poisoning is ignored.
pub fn emit_shared(sink: &SharedSink, line: &str) -> io::Result<()> {
    sink.lock()
        .unwrap_or_else(PoisonError::into_inner)
        .emit(line)
}

/// In-memory writer for tests
#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct Captured(pub Arc<Mutex<Vec<u8>>>);

#[cfg(test)]
impl Captured {
    pub fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

#[cfg(test)]
impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
