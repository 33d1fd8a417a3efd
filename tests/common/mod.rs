//! Integration test common infrastructure.
//!
//! Provides an engine builder with a few sample commands, middleware
//! providers driven by configuration, and a recording message channel.

#![allow(dead_code)]

use chatcmd::error::MiddlewareError;
use chatcmd::handlers::core::middleware::MiddlewareProvider;
use chatcmd::{
    Arguments, Caller, CommandContext, CommandDescriptor, CommandOutcome, Config, Engine,
    Environment, Execution, HandlerResult, MessageChannel, Middleware, Parameter, Template,
    Verdict, tags,
};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Sample commands
// ============================================================================

pub fn add(_: &mut CommandContext<'_>, args: &Arguments) -> HandlerResult {
    let a: i64 = args.get(0)?;
    let b: i64 = args.get(1)?;
    Ok(Some((a + b).to_string()))
}

pub fn echo(_: &mut CommandContext<'_>, args: &Arguments) -> HandlerResult {
    let text: String = args.get(0)?;
    let times: u8 = args.get(1)?;
    Ok(Some(vec![text; times as usize].join(" ")))
}

pub fn pong(_: &mut CommandContext<'_>, _: &Arguments) -> HandlerResult {
    Ok(Some("pong".into()))
}

pub fn silent(_: &mut CommandContext<'_>, _: &Arguments) -> HandlerResult {
    Ok(None)
}

pub fn explode(_: &mut CommandContext<'_>, _: &Arguments) -> HandlerResult {
    panic!("handler bug");
}

/// Register `math:add`, `math:echo` and `net:ping`.
pub fn register_samples(engine: &Engine) {
    engine
        .register_command(
            "math",
            CommandDescriptor::new("add", add)
                .aliases(["add", "plus"])
                .param(Parameter::required("a", tags::I64))
                .param(Parameter::required("b", tags::I64)),
        )
        .unwrap();
    engine
        .register_command(
            "math",
            CommandDescriptor::new("echo", echo)
                .alias("echo")
                .param(Parameter::required("text", tags::STRING))
                .param(Parameter::optional("times", tags::U8).with_default(1u8)),
        )
        .unwrap();
    engine
        .register_command(
            "net",
            CommandDescriptor::new("ping", pong)
                .alias("ping")
                .environments(Environment::ALL),
        )
        .unwrap();
}

/// Engine for `toml` with the sample commands registered.
pub fn engine_with_samples(toml: &str) -> Engine {
    let engine = Engine::new(Config::from_toml(toml).unwrap());
    register_samples(&engine);
    engine
}

pub fn user(name: &str) -> Caller {
    Caller::user(42, name)
}

/// Dispatch in chat as `user("tester")`; panics on non-command lines.
pub fn chat(engine: &Engine, line: &str) -> Execution {
    engine
        .dispatch(&user("tester"), Environment::Chat, line)
        .expect("line should be a command")
}

// ============================================================================
// Middleware
// ============================================================================

/// Lets a user through only when their name equals the configured role.
/// Rcon callers always pass.
pub struct RequireRole {
    role: String,
    message: String,
}

impl RequireRole {
    fn granted(&self, caller: &Caller) -> bool {
        match caller {
            Caller::User { name, .. } => *name == self.role,
            Caller::Rcon { .. } => true,
        }
    }
}

impl Middleware for RequireRole {
    fn can_suggest(&self, ctx: &CommandContext<'_>) -> bool {
        self.granted(ctx.caller)
    }

    fn before(&self, ctx: &mut CommandContext<'_>) -> Verdict {
        if self.granted(ctx.caller) {
            Verdict::allow()
        } else {
            Verdict::deny(self.message.clone())
        }
    }
}

/// Provider `role`: reads `Role` and `Settings.Message`.
pub fn role_provider(template: &Template) -> Result<Arc<dyn Middleware>, MiddlewareError> {
    let role = template
        .get("Role")
        .and_then(|v| v.as_str())
        .ok_or_else(|| MiddlewareError::provider("role", "missing Role"))?;
    let message = template
        .get("Settings")
        .and_then(|s| s.get("Message"))
        .and_then(|v| v.as_str())
        .unwrap_or("denied");
    Ok(Arc::new(RequireRole {
        role: role.to_string(),
        message: message.to_string(),
    }))
}

/// Records hook calls as `before:<label>` and `after:<label>:<outcome>`.
pub struct Journal {
    label: String,
    log: Arc<Mutex<Vec<String>>>,
}

impl Middleware for Journal {
    fn before(&self, _ctx: &mut CommandContext<'_>) -> Verdict {
        self.log.lock().push(format!("before:{}", self.label));
        Verdict::allow()
    }

    fn after(&self, _ctx: &mut CommandContext<'_>, outcome: CommandOutcome) {
        self.log.lock().push(format!("after:{}:{:?}", self.label, outcome));
    }
}

/// Provider `journal`: reads `Label`, shares one log between instances.
#[derive(Default)]
pub struct JournalProvider {
    pub log: Arc<Mutex<Vec<String>>>,
}

impl MiddlewareProvider for JournalProvider {
    fn create(&self, template: &Template) -> Result<Arc<dyn Middleware>, MiddlewareError> {
        let label = template
            .get("Label")
            .and_then(|v| v.as_str())
            .unwrap_or("unnamed");
        Ok(Arc::new(Journal {
            label: label.to_string(),
            log: Arc::clone(&self.log),
        }))
    }
}

// ============================================================================
// Channels
// ============================================================================

/// Message channel that keeps everything sent through it.
#[derive(Default)]
pub struct RecordingChannel {
    sent: Mutex<Vec<(Caller, String)>>,
}

impl RecordingChannel {
    pub fn sent(&self) -> Vec<(Caller, String)> {
        self.sent.lock().clone()
    }
}

impl MessageChannel for RecordingChannel {
    fn send(&self, recipient: &Caller, text: &str) {
        self.sent.lock().push((recipient.clone(), text.to_string()));
    }
}
