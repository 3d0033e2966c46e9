//! What the host application provides to a running alias.

use std::cell::RefCell;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::dispatch::SubcommandTable;

type Sink = Mutex<Box<dyn Write + Send>>;

/// The caller's standard output and standard error.
///
/// Each stream sits behind its own lock so the two relay threads of an
/// external command can write concurrently.
pub struct Output {
    stdout: Sink,
    stderr: Sink,
}

impl Output {
    #[must_use]
    pub fn new(stdout: Box<dyn Write + Send>, stderr: Box<dyn Write + Send>) -> Self {
        Self {
            stdout: Mutex::new(stdout),
            stderr: Mutex::new(stderr),
        }
    }

    /// Writes straight to the process' own stdout and stderr.
    #[must_use]
    pub fn inherit() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn stdout(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.stdout.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn stderr(&self) -> MutexGuard<'_, Box<dyn Write + Send>> {
        self.stderr.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Flushes both streams.
    ///
    /// # Errors
    ///
    /// Returns the first flush error.
    pub fn flush(&self) -> io::Result<()> {
        self.stdout().flush()?;
        self.stderr().flush()
    }
}

/// Cloneable in-memory sink, mostly for capturing output in tests.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    #[must_use]
    pub fn contents(&self) -> Vec<u8> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Lifecycle hooks of the host application.
pub trait Host {
    /// Run the host's shutdown sequence. Must be safe to call more than once.
    fn shutdown(&self);
}

/// Host without any shutdown work.
#[derive(Debug, Default)]
pub struct NoopHost;

impl Host for NoopHost {
    fn shutdown(&self) {}
}

/// Everything a subcommand may use while it runs.
pub struct Context<'a> {
    pub table: &'a SubcommandTable,
    pub host: &'a dyn Host,
    pub output: &'a Output,
    active: RefCell<Vec<String>>,
}

impl<'a> Context<'a> {
    #[must_use]
    pub fn new(table: &'a SubcommandTable, host: &'a dyn Host, output: &'a Output) -> Self {
        Self {
            table,
            host,
            output,
            active: RefCell::new(Vec::new()),
        }
    }

    /// Marks `alias` as running. Returns `false` if it already was.
    pub(crate) fn enter(&self, alias: &str) -> bool {
        let mut active = self.active.borrow_mut();
        if active.iter().any(|name| name == alias) {
            return false;
        }
        active.push(alias.to_string());
        true
    }

    pub(crate) fn leave(&self, alias: &str) {
        let mut active = self.active.borrow_mut();
        if let Some(position) = active.iter().rposition(|name| name == alias) {
            active.remove(position);
        }
    }
}
