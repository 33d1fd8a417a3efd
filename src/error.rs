//! Unified error handling for chatcmd.
//!
//! This module provides the error hierarchy shared by the registries and the
//! execution pipeline, with metric-style labels for logging. Configuration
//! errors live next to the loader in [`crate::config`].

use thiserror::Error;

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors a command handler may return.
///
/// None of these reach the caller verbatim: the pipeline logs the error and
/// replies with the generic internal-error text.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error("internal error: {0}")]
    Internal(String),

    #[error("argument {0} was not bound")]
    MissingArgument(usize),

    #[error("argument {index} is not a {expected}")]
    ArgumentType { index: usize, expected: &'static str },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HandlerError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Internal(_) => "internal_error",
            Self::MissingArgument(_) => "missing_argument",
            Self::ArgumentType { .. } => "argument_type",
            Self::Other(_) => "handler_error",
        }
    }
}

/// Result type for command handlers. `Some(text)` is appended to the reply.
pub type HandlerResult = Result<Option<String>, HandlerError>;

// ============================================================================
// Middleware Errors (template resolution)
// ============================================================================

/// Errors raised while turning a middleware declaration into instances.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiddlewareError {
    #[error("middleware template {0:?} is not configured")]
    UnknownTemplate(String),

    #[error("middleware {origin} has no string \"Id\" naming its provider")]
    MissingProviderId { origin: String },

    #[error("middleware {origin} has a \"Template\" that is not a string")]
    InvalidTemplateRef { origin: String },

    #[error("middleware provider {0:?} is not registered")]
    UnknownProvider(String),

    #[error("middleware provider {id:?} rejected its template: {reason}")]
    Provider { id: String, reason: String },
}

impl MiddlewareError {
    /// Convenience constructor for providers rejecting a template.
    pub fn provider(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Provider {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

// ============================================================================
// Registration Errors (command registry)
// ============================================================================

/// Reasons a command descriptor is refused by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("command id must not be empty")]
    EmptyId,

    #[error("command {0:?} declares no environment")]
    NoEnvironments(String),

    #[error("command {id:?}: required parameter {parameter:?} follows an optional one")]
    RequiredAfterOptional { id: String, parameter: String },

    #[error("command {id:?}: parameter {parameter:?} is declared twice")]
    DuplicateParameter { id: String, parameter: String },

    #[error("command middleware: {0}")]
    Middleware(#[from] MiddlewareError),
}

// ============================================================================
// Execution Failures (pipeline internals)
// ============================================================================

/// Why an execution stopped before producing a successful outcome.
///
/// Only the pipeline constructs these; callers see the localized text.
#[derive(Debug, Error)]
pub enum ExecutionFailure {
    #[error("command is no longer registered")]
    CommandUnavailable,

    #[error("no type parser registered for tag {tag:?} (parameter {parameter:?})")]
    ParserMissing { tag: String, parameter: String },

    #[error("could not parse {input:?} as {tag}")]
    Parse { input: String, tag: String },

    #[error("not enough arguments")]
    NotEnoughArguments,

    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),

    #[error("plugin code panicked: {0}")]
    Panic(String),
}

impl ExecutionFailure {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::CommandUnavailable => "command_unavailable",
            Self::ParserMissing { .. } => "parser_missing",
            Self::Parse { .. } => "parse_error",
            Self::NotEnoughArguments => "not_enough_arguments",
            Self::Handler(e) => e.error_code(),
            Self::Panic(_) => "plugin_panic",
        }
    }

    /// Whether the failure stems from a fault rather than from user input.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::ParserMissing { .. } | Self::Handler(_) | Self::Panic(_)
        )
    }
}
