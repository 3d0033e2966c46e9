//! The running `aka` process as seen by the aliases.

use std::cell::Cell;
use std::sync::Arc;

use log::{debug, warn};

use aka_core::events::{Event, Notifier};
use aka_core::host::{Host, Output};

/// Host of one `aka` invocation.
///
/// Shutting down announces [`Event::CliExit`] and flushes the output. Only
/// the first call does anything.
pub struct Session<'a> {
    notifier: Arc<dyn Notifier>,
    output: &'a Output,
    closed: Cell<bool>,
}

impl<'a> Session<'a> {
    #[must_use]
    pub fn new(notifier: Arc<dyn Notifier>, output: &'a Output) -> Self {
        Self {
            notifier,
            output,
            closed: Cell::new(false),
        }
    }
}

impl Host for Session<'_> {
    fn shutdown(&self) {
        if self.closed.replace(true) {
            return;
        }

        debug!("Shutting down");
        self.notifier.notify(&Event::CliExit);
        if let Err(e) = self.output.flush() {
            warn!("Failed to flush output: {e}");
        }
    }
}
