//! Helper functions for rendering commands to users.
//!
//! Signatures look like `.give [Player Name: Text] [Amount: Number?]`; every
//! piece of text comes from the localizer so hosts can translate it.

use crate::engine::Engine;
use crate::handlers::core::registry::Command;
use crate::handlers::core::traits::{Parameter, ParameterKind};
use crate::localization::{keys, substitute};
use chatcmd_syntax::friendly_parameter_name;

/// Display name of a type tag, e.g. `Number` for `i32`.
///
/// Tags without a registered parser render through the custom-type format,
/// which receives the tag itself.
pub fn type_display_name(engine: &Engine, user_id: u64, tag: &str) -> String {
    let key = engine
        .type_parser(tag)
        .map(|parser| parser.display_key())
        .unwrap_or(keys::TYPE_CUSTOM);
    substitute(&engine.localize(user_id, key), &[("type", tag)])
}

/// One bracketed parameter, e.g. `[Player Name: Text]`.
pub fn parameter_signature(engine: &Engine, user_id: u64, parameter: &Parameter) -> String {
    let key = match parameter.kind {
        ParameterKind::Required => keys::PARAMETER_FORMAT,
        ParameterKind::Optional | ParameterKind::Default(_) => keys::OPTIONAL_PARAMETER_FORMAT,
    };
    let name = friendly_parameter_name(&parameter.name);
    let type_name = type_display_name(engine, user_id, &parameter.type_tag);
    substitute(
        &engine.localize(user_id, key),
        &[("name", &name), ("type", &type_name)],
    )
}

/// Full usage line of a command, or `None` for commands without aliases.
pub fn command_signature(engine: &Engine, user_id: u64, command: &Command) -> Option<String> {
    let alias = command.primary_alias()?;
    let prefix = engine.primary_prefix();

    let mut line = format!("{}{}", prefix, alias);
    for parameter in &command.parameters {
        line.push(' ');
        line.push_str(&parameter_signature(engine, user_id, parameter));
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::HandlerResult;
    use crate::handlers::core::context::CommandContext;
    use crate::handlers::core::traits::{Arguments, CommandDescriptor, tags};

    fn noop(_: &mut CommandContext<'_>, _: &Arguments) -> HandlerResult {
        Ok(None)
    }

    fn command(descriptor: CommandDescriptor) -> Command {
        Command::try_from(descriptor).unwrap()
    }

    #[test]
    fn test_type_names() {
        let engine = Engine::new(Config::default());
        assert_eq!(type_display_name(&engine, 0, tags::I64), "Number");
        assert_eq!(type_display_name(&engine, 0, tags::F32), "Number");
        assert_eq!(type_display_name(&engine, 0, tags::BOOL), "True/False");
        assert_eq!(type_display_name(&engine, 0, tags::DURATION), "Duration");
        assert_eq!(type_display_name(&engine, 0, "CustomType"), "CustomType");
    }

    #[test]
    fn test_signature() {
        let engine = Engine::new(Config::default());
        let cmd = command(
            CommandDescriptor::new("give", noop)
                .alias("give")
                .alias("g")
                .param(Parameter::required("player_name", tags::STRING))
                .param(Parameter::optional("amount", tags::U32).with_default(1u32)),
        );
        assert_eq!(
            command_signature(&engine, 0, &cmd).as_deref(),
            Some(".give [Player Name: Text] [Amount: Number?]")
        );
    }

    #[test]
    fn test_signature_keeps_acronyms() {
        let engine = Engine::new(Config::default());
        let cmd = command(
            CommandDescriptor::new("ban", noop)
                .alias("ban")
                .param(Parameter::required("steamID", tags::U64)),
        );
        assert_eq!(
            command_signature(&engine, 0, &cmd).as_deref(),
            Some(".ban [Steam ID: Number]")
        );
    }

    #[test]
    fn test_signature_without_parameters_or_aliases() {
        let engine = Engine::new(Config::from_toml("prefixes = [\"!\", \".\"]").unwrap());
        let cmd = command(CommandDescriptor::new("ping", noop).alias("ping"));
        assert_eq!(command_signature(&engine, 0, &cmd).as_deref(), Some("!ping"));

        let hidden = command(CommandDescriptor::new("internal", noop));
        assert_eq!(command_signature(&engine, 0, &hidden), None);
    }
}
