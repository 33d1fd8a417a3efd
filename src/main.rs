//! chatcmd - interactive console host.
//!
//! Loads a configuration, installs the built-in commands and dispatches every
//! stdin line as the console user. Replies go to stdout, logs to stderr.

use chatcmd::{Caller, Config, Engine, Environment, Gateway, MessageChannel};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Writes replies to stdout, one block per reply.
struct Stdout;

impl MessageChannel for Stdout {
    fn send(&self, _recipient: &Caller, text: &str) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{}", text) {
            warn!(error = %e, "Failed to write reply");
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);
    if std::env::var("CHATCMD_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(
        path = %config_path,
        prefixes = ?config.prefixes,
        templates = config.middleware_templates.len(),
        info_commands = config.info_commands.len(),
        "Starting chatcmd console"
    );

    let engine = Arc::new(Engine::new(config));
    let problems = engine.verify_templates();
    if !problems.is_empty() {
        warn!(count = problems.len(), "Some middleware templates cannot be instantiated");
    }
    let installed = engine.install_builtins()?;
    info!(installed, "Ready, reading commands from stdin");

    let mut gateway = Gateway::new(Arc::clone(&engine));
    gateway.bind(Environment::Console, Arc::new(Stdout));

    let caller = Caller::user(0, "console");
    for line in std::io::stdin().lock().lines() {
        let line = line?;
        if gateway.handle(&caller, Environment::Console, &line).is_none() && !line.trim().is_empty() {
            info!(line = %line, "Not a command");
        }
    }

    for (lookup, count) in engine.command_stats() {
        info!(command = %lookup, count, "Command usage");
    }
    info!("Shutdown complete");
    Ok(())
}
