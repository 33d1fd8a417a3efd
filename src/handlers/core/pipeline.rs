//! Execution pipeline.
//!
//! Runs one resolved command: middleware guards, argument binding, handler
//! invocation, then observers. Every failure is turned into localized text
//! here; nothing escapes to the caller, including panics in handlers,
//! middleware hooks and type parsers.

use super::context::{Caller, CommandContext, CommandOutcome, Environment};
use super::middleware::Verdict;
use super::registry::{Command, CommandLookup};
use super::traits::{Arguments, ParameterKind};
use crate::engine::Engine;
use crate::error::ExecutionFailure;
use crate::handlers::helpers::{command_signature, type_display_name};
use crate::localization::{keys, substitute};
use crate::telemetry::{CommandTimer, spans};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error};

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Execution {
    pub outcome: CommandOutcome,
    /// Text for the caller; `None` when nothing was produced.
    pub message: Option<String>,
}

impl Execution {
    /// Join message fragments with newlines.
    pub fn new(outcome: CommandOutcome, fragments: Vec<String>) -> Self {
        let message = if fragments.is_empty() {
            None
        } else {
            Some(fragments.join("\n"))
        };
        Self { outcome, message }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(CommandOutcome::Failed, vec![message.into()])
    }
}

/// Execute the command behind `lookup` with the caller's raw argument tokens.
pub fn execute(
    engine: &Engine,
    caller: &Caller,
    environment: Environment,
    lookup: &CommandLookup,
    tokens: &[String],
) -> Execution {
    let user_id = caller.user_id();
    let Some(command) = engine.command(lookup) else {
        debug!(command = %lookup, "Command disappeared before execution");
        return Execution::failed(engine.localize(user_id, keys::COMMAND_UNAVAILABLE));
    };

    command.record_invocation();
    let _span = spans::command(&lookup.namespace, &command.id).entered();
    let _timer = CommandTimer::new(lookup.to_string());

    let mut fragments = Vec::new();
    let mut ctx = CommandContext::new(engine, caller, environment, &lookup.namespace, &command.id);

    for mw in &command.middleware {
        match contained(|| mw.before(&mut ctx)) {
            Ok(Verdict::Allow(message)) => fragments.extend(message),
            Ok(Verdict::Deny(message)) => {
                fragments.extend(message);
                debug!(command = %lookup, caller = %caller, "Command denied by middleware");
                return Execution::new(CommandOutcome::Denied, fragments);
            }
            Err(failure) => {
                report(engine, user_id, lookup, &command, caller, tokens, &failure, &mut fragments);
                return Execution::new(CommandOutcome::Failed, fragments);
            }
        }
    }

    let args = match bind(engine, &command, tokens) {
        Ok(args) => args,
        Err(failure) => {
            report(engine, user_id, lookup, &command, caller, tokens, &failure, &mut fragments);
            return Execution::new(CommandOutcome::Failed, fragments);
        }
    };

    let handler = command.handler;
    let failure = match contained(|| handler(&mut ctx, &args)) {
        Ok(Ok(reply)) => {
            fragments.extend(reply.filter(|text| !text.is_empty()));
            None
        }
        Ok(Err(e)) => Some(ExecutionFailure::Handler(e)),
        Err(failure) => Some(failure),
    };

    if let Some(failure) = failure {
        report(engine, user_id, lookup, &command, caller, tokens, &failure, &mut fragments);
        return Execution::new(CommandOutcome::Failed, fragments);
    }

    for mw in &command.middleware {
        if let Err(failure) = contained(|| mw.after(&mut ctx, CommandOutcome::Succeeded)) {
            error!(
                command = %lookup,
                caller = %caller,
                error = %failure,
                "Middleware observer failed"
            );
        }
    }

    Execution::new(CommandOutcome::Succeeded, fragments)
}

/// Bind tokens to the declared parameters, by position.
///
/// Surplus tokens are ignored by binding but stay visible through
/// [`Arguments::raw`].
fn bind(engine: &Engine, command: &Command, tokens: &[String]) -> Result<Arguments, ExecutionFailure> {
    let mut values = Vec::with_capacity(command.parameters.len());

    for (i, parameter) in command.parameters.iter().enumerate() {
        let value = match tokens.get(i) {
            Some(token) => {
                let parser = engine.type_parser(&parameter.type_tag).ok_or_else(|| {
                    ExecutionFailure::ParserMissing {
                        tag: parameter.type_tag.clone(),
                        parameter: parameter.name.clone(),
                    }
                })?;
                let value = contained(|| parser.parse(token))?.ok_or_else(|| {
                    ExecutionFailure::Parse {
                        input: token.clone(),
                        tag: parameter.type_tag.clone(),
                    }
                })?;
                Some(value)
            }
            None => match parameter.kind {
                ParameterKind::Default(ref value) => Some(value.clone()),
                ParameterKind::Optional => None,
                ParameterKind::Required => return Err(ExecutionFailure::NotEnoughArguments),
            },
        };
        values.push(value);
    }

    Ok(Arguments::new(values, tokens.to_vec()))
}

/// Log a failure and append the caller-facing text for it.
#[allow(clippy::too_many_arguments)]
fn report(
    engine: &Engine,
    user_id: u64,
    lookup: &CommandLookup,
    command: &Command,
    caller: &Caller,
    tokens: &[String],
    failure: &ExecutionFailure,
    fragments: &mut Vec<String>,
) {
    if failure.is_internal() {
        error!(
            command = %lookup.id,
            namespace = %lookup.namespace,
            caller = %caller,
            args = ?tokens,
            error = %failure,
            code = failure.error_code(),
            "Command failed"
        );
    } else {
        debug!(
            command = %lookup,
            caller = %caller,
            code = failure.error_code(),
            "Command rejected input"
        );
    }

    match failure {
        ExecutionFailure::CommandUnavailable => {
            fragments.push(engine.localize(user_id, keys::COMMAND_UNAVAILABLE));
        }
        ExecutionFailure::Parse { input, tag } => {
            let type_name = type_display_name(engine, user_id, tag);
            fragments.push(substitute(
                &engine.localize(user_id, keys::PARSING_ERROR),
                &[("input", input), ("type", &type_name)],
            ));
            if let Some(rules) = engine.type_parser(tag).and_then(|p| p.rules_key()) {
                fragments.push(engine.localize(user_id, rules));
            }
        }
        ExecutionFailure::NotEnoughArguments => {
            fragments.push(engine.localize(user_id, keys::NOT_ENOUGH_ARGUMENTS));
            fragments.extend(command_signature(engine, user_id, command));
        }
        ExecutionFailure::ParserMissing { .. }
        | ExecutionFailure::Handler(_)
        | ExecutionFailure::Panic(_) => {
            fragments.push(engine.localize(user_id, keys::INTERNAL_ERROR));
        }
    }
}

/// Run plugin-supplied code, turning a panic into [`ExecutionFailure::Panic`].
fn contained<T>(f: impl FnOnce() -> T) -> Result<T, ExecutionFailure> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| ExecutionFailure::Panic(panic_message(payload.as_ref())))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
