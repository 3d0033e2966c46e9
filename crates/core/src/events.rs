//! Notifications emitted around alias execution.

use std::sync::{Mutex, PoisonError};

use log::{debug, info};

/// Something observers may want to know about. Delivery is fire-and-forget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    AliasSucceeded {
        alias: String,
        command: Vec<String>,
        args: Vec<String>,
    },
    AliasFailed {
        alias: String,
        command: Vec<String>,
        args: Vec<String>,
        exit_code: Option<i32>,
        message: Option<String>,
    },
    /// The host is about to shut down.
    CliExit,
}

impl Event {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::AliasSucceeded { .. } => "alias_succeeded",
            Self::AliasFailed { .. } => "alias_failed",
            Self::CliExit => "cli_exit",
        }
    }
}

/// Receiver of [`Event`]s. Implementations must not fail.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Event);
}

/// Reports events through the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &Event) {
        match event {
            Event::AliasSucceeded { alias, command, .. } => {
                info!("alias `{alias}` succeeded: {}", shell_words::join(command));
            }
            Event::AliasFailed {
                alias, exit_code, ..
            } => {
                info!("alias `{alias}` failed (exit code: {exit_code:?})");
            }
            Event::CliExit => debug!("cli_exit"),
        }
    }
}

/// Keeps every event in memory, in the order received.
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    #[must_use]
    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(Event::name).collect()
    }
}

impl Notifier for Recorder {
    fn notify(&self, event: &Event) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
