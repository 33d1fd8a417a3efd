//! Telemetry utilities for command timing and span construction.

use std::time::Instant;
use tracing::debug;

/// Guard for timing command execution.
///
/// Logs the command latency when dropped.
pub struct CommandTimer {
    command: String,
    start: Instant,
}

impl CommandTimer {
    /// Start timing a command.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            start: Instant::now(),
        }
    }

    /// Time elapsed since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for CommandTimer {
    fn drop(&mut self) {
        debug!(
            command = %self.command,
            elapsed_ms = self.elapsed_ms(),
            "Command finished"
        );
    }
}

/// Standardized span constructors for dispatch observability.
pub mod spans {
    use tracing::{Span, debug_span, info_span};

    /// Create a span for one raw input line.
    pub fn dispatch(caller: &str, environment: &str) -> Span {
        info_span!("dispatch", caller = %caller, environment = %environment)
    }

    /// Create a span for a command execution.
    pub fn command(namespace: &str, id: &str) -> Span {
        debug_span!("command", namespace = %namespace, command = %id)
    }
}
