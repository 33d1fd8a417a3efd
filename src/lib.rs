//! chatcmd - chat command dispatch engine.
//!
//! Turns lines such as `.admin!kick "Some Player" 10m` into typed handler
//! invocations: parse, resolve against namespaced aliases (exact match,
//! else near misses), run middleware guards, bind arguments through
//! pluggable type parsers, invoke, and report back localized text.

pub mod config;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod handlers;
pub mod localization;
pub mod parsers;
pub mod telemetry;

pub use chatcmd_syntax::{CommandSyntax, ParsedCommand};
pub use config::{Config, ConfigError};
pub use engine::Engine;
pub use error::{HandlerError, HandlerResult, MiddlewareError, RegistrationError};
pub use gateway::{Gateway, MessageChannel};
pub use handlers::core::{
    Arguments, Caller, CommandContext, CommandDescriptor, CommandLookup, CommandOutcome,
    Environment, Execution, Middleware, MiddlewareProvider, Parameter, Template, Value, Verdict,
    tags,
};
pub use localization::{EnglishFallback, Localizer};
pub use parsers::TypeParser;
