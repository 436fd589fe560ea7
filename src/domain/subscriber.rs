//! Concrete listener variants and their shared output log.

use std::fmt;
use std::io::Write;
use std::sync::Arc;

use parking_lot::Mutex;

use super::listener::Listener;
use crate::error::ListenerError;

type EchoWriter = Arc<Mutex<Box<dyn Write + Send>>>;

/// Ordered, cloneable log of lines produced by subscribers.
///
/// Clones share the same underlying buffer and echo writer. A transcript
/// built with [`Transcript::echoing`] or [`Transcript::with_writer`] also
/// writes every line to that writer as it is recorded.
#[derive(Clone, Default)]
pub struct Transcript {
    lines: Arc<Mutex<Vec<String>>>,
    echo: Option<EchoWriter>,
}

impl Transcript {
    /// Creates an empty transcript that only records.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty transcript that also prints each line to stdout.
    #[must_use]
    pub fn echoing() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Creates an empty transcript that also writes each line to `writer`.
    #[must_use]
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            lines: Arc::default(),
            echo: Some(Arc::new(Mutex::new(Box::new(writer)))),
        }
    }

    /// Appends a line.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::Io`] if echoing the line fails. The line
    /// is recorded either way.
    pub fn record(&self, line: impl Into<String>) -> Result<(), ListenerError> {
        let line = line.into();
        self.lines.lock().push(line.clone());
        if let Some(echo) = &self.echo {
            let mut out = echo.lock();
            writeln!(out, "{line}")?;
            out.flush()?;
        }
        Ok(())
    }

    /// Returns a copy of every recorded line, oldest first.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }

    /// Removes and returns every recorded line.
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.lock())
    }
}

impl fmt::Debug for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transcript")
            .field("lines", &self.lines.lock().len())
            .field("echo", &self.echo.is_some())
            .finish()
    }
}

/// Default listener variant: records `"{name} notified"`.
#[derive(Debug, Clone)]
pub struct Subscriber {
    name: String,
    transcript: Transcript,
}

impl Subscriber {
    /// Creates a subscriber writing to `transcript`.
    #[must_use]
    pub fn new(name: impl Into<String>, transcript: Transcript) -> Self {
        Self {
            name: name.into(),
            transcript,
        }
    }
}

impl<E> Listener<E> for Subscriber {
    fn notify(&self, _event: &E) -> Result<(), ListenerError> {
        self.transcript.record(format!("{} notified", self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Listener variant that wants a "special invitation" instead of the
/// default notice.
#[derive(Debug, Clone)]
pub struct SpecialSubscriber {
    name: String,
    transcript: Transcript,
}

impl SpecialSubscriber {
    /// Creates a special subscriber writing to `transcript`.
    #[must_use]
    pub fn new(name: impl Into<String>, transcript: Transcript) -> Self {
        Self {
            name: name.into(),
            transcript,
        }
    }
}

impl<E> Listener<E> for SpecialSubscriber {
    fn notify(&self, _event: &E) -> Result<(), ListenerError> {
        self.transcript
            .record(format!("{} received a special invitation", self.name))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
