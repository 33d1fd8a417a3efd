//! Built-in commands.
//!
//! Registered under [`NAMESPACE`] by [`install`], each only when the
//! configuration declares it. Info commands are generated from
//! `[info_commands.<id>]` and reply with the localized text keyed by their id.

use crate::engine::Engine;
use crate::error::{HandlerResult, RegistrationError};
use crate::handlers::core::context::CommandContext;
use crate::handlers::core::traits::{Arguments, CommandDescriptor, Handler, Parameter, tags};
use crate::handlers::helpers::command_signature;
use crate::localization::{CORE_NAMESPACE, keys};
use chatcmd_syntax::format_duration;
use std::time::Duration;
use tracing::info;

/// Namespace of every built-in command.
pub const NAMESPACE: &str = CORE_NAMESPACE;

/// Type tag used by `test1` that deliberately has no parser.
pub const CUSTOM_TYPE_TAG: &str = "CustomType";

/// Value type behind [`CUSTOM_TYPE_TAG`]. Hosts that want `test1` to accept
/// it register a parser producing `Value::custom(CustomType(..))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomType(pub String);

/// Register every declared built-in. Returns how many were registered.
pub fn install(engine: &Engine) -> Result<usize, RegistrationError> {
    let config = engine.config();
    let declared: [(&str, Handler, Vec<Parameter>, _); 3] = [
        ("help", help as Handler, help_parameters(), &config.commands.help),
        ("test1", test1 as Handler, test1_parameters(), &config.commands.test1),
        ("test2", test2 as Handler, Vec::new(), &config.commands.test2),
    ];

    let mut installed = 0;
    for (id, handler, parameters, declaration) in declared {
        let Some(declaration) = declaration else {
            continue;
        };
        let descriptor =
            CommandDescriptor::from_declaration(id, handler, parameters, declaration, engine)?;
        engine.register_command(NAMESPACE, descriptor)?;
        installed += 1;
    }

    for (id, declaration) in &config.info_commands {
        let descriptor =
            CommandDescriptor::from_declaration(id.as_str(), info_text, Vec::new(), declaration, engine)?;
        engine.register_command(NAMESPACE, descriptor)?;
        installed += 1;
    }

    info!(installed, "Installed built-in commands");
    Ok(installed)
}

// ============================================================================
// help
// ============================================================================

fn help_parameters() -> Vec<Parameter> {
    vec![Parameter::optional("plugin", tags::STRING)]
}

/// Signatures the caller may see, per namespace. Namespaces without any are
/// left out.
fn suggestable(ctx: &CommandContext<'_>) -> Vec<(String, Vec<String>)> {
    let engine = ctx.engine;
    engine
        .commands_snapshot()
        .into_iter()
        .filter_map(|(namespace, commands)| {
            let lines: Vec<String> = commands
                .iter()
                .filter(|command| {
                    let probe = CommandContext::new(
                        engine,
                        ctx.caller,
                        ctx.environment,
                        &namespace,
                        &command.id,
                    );
                    command.can_suggest(&probe)
                })
                .filter_map(|command| command_signature(engine, ctx.user_id(), command))
                .collect();
            (!lines.is_empty()).then_some((namespace, lines))
        })
        .collect()
}

fn section(ctx: &CommandContext<'_>, namespace: &str, lines: &[String]) -> String {
    let header = ctx.localize_with(
        keys::HELP_PLUGIN_FORMAT,
        &[("plugin", &ctx.engine.friendly_namespace(namespace))],
    );
    let mut out = header;
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    out
}

fn help(ctx: &mut CommandContext<'_>, args: &Arguments) -> HandlerResult {
    let listing = suggestable(ctx);
    if listing.is_empty() {
        return Ok(Some(ctx.localize(keys::NO_COMMANDS_FOUND)));
    }

    if let Some(query) = args.opt::<String>(0)? {
        match ctx.engine.find_namespace(&query) {
            Some(namespace) => {
                if let Some((ns, lines)) = listing.iter().find(|(ns, _)| *ns == namespace) {
                    return Ok(Some(section(ctx, ns, lines)));
                }
            }
            None => {
                let names: Vec<String> = listing
                    .iter()
                    .map(|(ns, _)| ctx.engine.friendly_namespace(ns))
                    .collect();
                return Ok(Some(ctx.localize_with(
                    keys::SHOW_SIMILAR_CANDIDATES,
                    &[("candidates", &names.join(", "))],
                )));
            }
        }
    }

    let sections: Vec<String> = listing
        .iter()
        .map(|(ns, lines)| section(ctx, ns, lines))
        .collect();
    Ok(Some(sections.join("\n")))
}

// ============================================================================
// test1 / test2
// ============================================================================

fn test1_parameters() -> Vec<Parameter> {
    vec![
        Parameter::required("number", tags::I32),
        Parameter::required("symbol", tags::CHAR),
        Parameter::required("boolean", tags::BOOL),
        Parameter::required("time", tags::DURATION),
        Parameter::optional("optional_string", tags::STRING),
        Parameter::optional("custom_type", CUSTOM_TYPE_TAG),
    ]
}

fn test1(_ctx: &mut CommandContext<'_>, args: &Arguments) -> HandlerResult {
    let number: i32 = args.get(0)?;
    let symbol: char = args.get(1)?;
    let boolean: bool = args.get(2)?;
    let time: Duration = args.get(3)?;
    let text: Option<String> = args.opt(4)?;

    let mut reply = format!(
        "You've entered\nNumber: {}, Symbol: {}, Boolean: {}, Text: {}, Time: {}",
        number,
        symbol,
        boolean,
        text.unwrap_or_default(),
        format_duration(time)
    );
    if let Some(custom) = args.custom::<CustomType>(5) {
        reply.push_str(&format!(", Custom: {}", custom.0));
    }
    Ok(Some(reply))
}

fn test2(_ctx: &mut CommandContext<'_>, _args: &Arguments) -> HandlerResult {
    Ok(None)
}

// ============================================================================
// info commands
// ============================================================================

fn info_text(ctx: &mut CommandContext<'_>, _args: &Arguments) -> HandlerResult {
    let text = ctx
        .engine
        .localizer()
        .get(ctx.user_id(), CORE_NAMESPACE, ctx.command_id);
    Ok(Some(text))
}
