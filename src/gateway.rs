//! Host integration.
//!
//! A [`Gateway`] feeds raw lines from every surface into one shared engine
//! and hands replies to the [`MessageChannel`] bound for that surface.

use crate::engine::Engine;
use crate::handlers::core::context::{Caller, CommandOutcome, Environment};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outbound text to a caller. Fire-and-forget.
pub trait MessageChannel: Send + Sync {
    fn send(&self, recipient: &Caller, text: &str);
}

/// Routes input lines to the engine and replies back to their surface.
pub struct Gateway {
    engine: Arc<Engine>,
    channels: HashMap<Environment, Arc<dyn MessageChannel>>,
}

impl Gateway {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self {
            engine,
            channels: HashMap::new(),
        }
    }

    /// Bind the channel replies for `environment` go to, replacing any
    /// previous one.
    pub fn bind(&mut self, environment: Environment, channel: Arc<dyn MessageChannel>) -> &mut Self {
        self.channels.insert(environment, channel);
        self
    }

    pub fn engine(&self) -> &Arc<Engine> {
        &self.engine
    }

    /// Handle one input line.
    ///
    /// Returns `None` when the line is not a command; otherwise the outcome,
    /// after any reply text has been sent.
    pub fn handle(&self, caller: &Caller, environment: Environment, raw: &str) -> Option<CommandOutcome> {
        let execution = self.engine.dispatch(caller, environment, raw)?;

        if let Some(ref text) = execution.message {
            match self.channels.get(&environment) {
                Some(channel) => channel.send(caller, text),
                None => warn!(
                    environment = %environment,
                    caller = %caller,
                    "No message channel bound, dropping reply"
                ),
            }
        }

        debug!(caller = %caller, outcome = ?execution.outcome, "Handled input line");
        Some(execution.outcome)
    }
}
