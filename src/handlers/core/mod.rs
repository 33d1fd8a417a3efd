//! Core infrastructure of the command system.
//!
//! - [`context`]: who called, from where, and the `CommandContext` handed to
//!   handlers and middleware
//! - [`traits`]: handler signature, typed values, parameters, descriptors
//! - [`registry`]: namespaced command storage and alias resolution
//! - [`middleware`]: guard/observer hooks, providers and template merging
//! - [`pipeline`]: guarded, panic-isolated execution of one command

pub mod context;
pub mod middleware;
pub mod pipeline;
pub mod registry;
pub mod traits;

pub use context::{Caller, CommandContext, CommandOutcome, Environment};
pub use middleware::{Middleware, MiddlewareProvider, MiddlewareRegistry, Template, Verdict};
pub use pipeline::Execution;
pub use registry::{Command, CommandLookup, CommandRegistry, Resolution};
pub use traits::{
    Arguments, CommandDescriptor, FromValue, Handler, Parameter, ParameterKind, Value, tags,
};
