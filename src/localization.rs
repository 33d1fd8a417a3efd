//! Localization seam.
//!
//! The engine never hardcodes user-facing text. Every message is looked up
//! through a [`Localizer`] by `(user, namespace, key)` and `{placeholder}`
//! substitution happens here. [`EnglishFallback`] renders readable English
//! when the host provides no localization service.

use std::collections::HashMap;

/// Namespace under which the engine's own messages are looked up.
pub const CORE_NAMESPACE: &str = "chatcmd";

/// Message keys used by the engine.
pub mod keys {
    pub const TYPE_NUMERIC: &str = "Type_Numeric";
    pub const TYPE_CHAR: &str = "Type_Char";
    pub const TYPE_STRING: &str = "Type_String";
    pub const TYPE_BOOL: &str = "Type_Bool";
    pub const TYPE_DURATION: &str = "Type_TimeSpan";
    pub const TYPE_CUSTOM: &str = "Type_Custom";

    pub const PARAMETER_FORMAT: &str = "ParameterFormat";
    pub const OPTIONAL_PARAMETER_FORMAT: &str = "OptionalParameterFormat";
    pub const HELP_PLUGIN_FORMAT: &str = "HelpPluginFormat";

    pub const NOT_ENOUGH_ARGUMENTS: &str = "NotEnoughArguments";
    pub const INTERNAL_ERROR: &str = "InternalError";
    pub const PARSING_ERROR: &str = "ParsingError";
    pub const PARSING_RULES_BOOL: &str = "ParsingRules_Bool";
    pub const PARSING_RULES_DURATION: &str = "ParsingRules_TimeSpan";

    pub const SHOW_SIMILAR_CANDIDATES: &str = "ShowSimilarCandidates";
    pub const SHOW_EXACT_CANDIDATES: &str = "ShowExactCandidates";
    pub const COMMAND_NOT_FOUND: &str = "CommandNotFound";
    pub const COMMAND_UNAVAILABLE: &str = "CommandUnavailable";
    pub const NO_COMMANDS_FOUND: &str = "NoCommandsFound";
}

/// Source of localized message templates.
///
/// Implementations choose the language per user. Unknown keys should come
/// back as the key itself so that a missing translation stays visible.
pub trait Localizer: Send + Sync {
    fn get(&self, user_id: u64, namespace: &str, key: &str) -> String;
}

/// Replace every `{name}` placeholder in `template`.
pub fn substitute(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{}}}", name), value);
    }
    out
}

/// Built-in English table.
///
/// Keys are looked up regardless of namespace. Hosts can add entries, e.g.
/// the text of info commands, with [`EnglishFallback::with`].
#[derive(Debug, Clone)]
pub struct EnglishFallback {
    entries: HashMap<String, String>,
}

impl Default for EnglishFallback {
    fn default() -> Self {
        let entries = [
            (keys::TYPE_NUMERIC, "Number"),
            (keys::TYPE_CHAR, "Symbol"),
            (keys::TYPE_STRING, "Text"),
            (keys::TYPE_BOOL, "True/False"),
            (keys::TYPE_DURATION, "Duration"),
            (keys::TYPE_CUSTOM, "{type}"),
            (keys::PARAMETER_FORMAT, "[{name}: {type}]"),
            (keys::OPTIONAL_PARAMETER_FORMAT, "[{name}: {type}?]"),
            (keys::HELP_PLUGIN_FORMAT, "{plugin}:"),
            (keys::NOT_ENOUGH_ARGUMENTS, "Not enough arguments. Usage:"),
            (
                keys::INTERNAL_ERROR,
                "Something went wrong while running this command.",
            ),
            (keys::PARSING_ERROR, "Couldn't read \"{input}\" as {type}."),
            (
                keys::PARSING_RULES_BOOL,
                "Use true/false, yes/no, on/off, 1/0 or +/-.",
            ),
            (
                keys::PARSING_RULES_DURATION,
                "Use the form 1d 2h 3m 4s; every part is optional.",
            ),
            (
                keys::SHOW_SIMILAR_CANDIDATES,
                "Command not found. Did you mean:\n{candidates}",
            ),
            (
                keys::SHOW_EXACT_CANDIDATES,
                "Several commands match. Pick one:\n{candidates}",
            ),
            (keys::COMMAND_NOT_FOUND, "Command \"{command}\" not found."),
            (keys::COMMAND_UNAVAILABLE, "Couldn't find command"),
            (keys::NO_COMMANDS_FOUND, "No commands found"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self { entries }
    }
}

impl EnglishFallback {
    /// Add or replace an entry.
    pub fn with(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.entries.insert(key.into(), text.into());
        self
    }
}

impl Localizer for EnglishFallback {
    fn get(&self, _user_id: u64, _namespace: &str, key: &str) -> String {
        self.entries
            .get(key)
            .cloned()
            .unwrap_or_else(|| key.to_string())
    }
}
