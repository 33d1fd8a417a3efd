//! Core configuration types.

use super::defaults::{default_plugin_delimiters, default_prefixes};
use super::validation::{ValidationError, validate};
use crate::handlers::core::context::Environment;
use crate::handlers::core::middleware::Template;
use chatcmd_syntax::{CommandSyntax, eq_ignore_case};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ops::Deref;
use std::path::Path;
use thiserror::Error;
use tracing::warn;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Namespace aliases, by namespace.
pub type PluginAliases = BTreeMap<String, StringList>;

/// A list written either as a TOML array or as one comma-separated string.
///
/// Entries are trimmed and blanks dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "StringListRepr")]
pub struct StringList(Vec<String>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StringListRepr {
    One(String),
    Many(Vec<String>),
}

impl From<StringListRepr> for StringList {
    fn from(repr: StringListRepr) -> Self {
        match repr {
            StringListRepr::One(s) => s.split(',').collect(),
            StringListRepr::Many(items) => items.iter().map(String::as_str).collect(),
        }
    }
}

impl<'a> FromIterator<&'a str> for StringList {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

impl From<Vec<String>> for StringList {
    fn from(items: Vec<String>) -> Self {
        items.iter().map(String::as_str).collect()
    }
}

impl Deref for StringList {
    type Target = [String];

    fn deref(&self) -> &[String] {
        &self.0
    }
}

impl StringList {
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

/// How a command declares its middleware.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MiddlewareSpec {
    /// Comma-separated template names: `"admin, cooldown"`.
    Templates(String),
    /// Inline objects, each optionally pulling in templates via `Template`.
    Inline(Vec<Template>),
}

/// Declarative settings of one configurable command.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CommandDeclaration {
    #[serde(default)]
    pub aliases: StringList,
    /// Absent means chat only.
    #[serde(default)]
    pub environments: Option<StringList>,
    #[serde(default)]
    pub middleware: Option<MiddlewareSpec>,
}

impl CommandDeclaration {
    /// The declared environments. Unknown names are logged and skipped.
    pub fn environments(&self) -> Vec<Environment> {
        let Some(ref names) = self.environments else {
            return vec![Environment::Chat];
        };

        names
            .iter()
            .filter_map(|name| match name.parse::<Environment>() {
                Ok(env) => Some(env),
                Err(_) => {
                    warn!(environment = %name, "Ignoring unknown command environment");
                    None
                }
            })
            .collect()
    }
}

/// Declarations of the built-in commands. Absent commands are not registered.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct BuiltinCommands {
    pub help: Option<CommandDeclaration>,
    pub test1: Option<CommandDeclaration>,
    pub test2: Option<CommandDeclaration>,
}

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Line prefixes marking a command, in match order.
    #[serde(default = "default_prefixes")]
    pub prefixes: Vec<String>,
    /// Separators between plugin qualifier and command name.
    #[serde(default = "default_plugin_delimiters")]
    pub plugin_delimiters: Vec<String>,
    /// Extra names users may type instead of a namespace.
    #[serde(default)]
    pub plugin_aliases: PluginAliases,
    /// Named middleware templates.
    #[serde(default)]
    pub middleware_templates: BTreeMap<String, Template>,
    /// Built-in command declarations.
    #[serde(default)]
    pub commands: BuiltinCommands,
    /// Info commands, each replying with the localized text keyed by its id.
    #[serde(default)]
    pub info_commands: BTreeMap<String, CommandDeclaration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prefixes: default_prefixes(),
            plugin_delimiters: default_plugin_delimiters(),
            plugin_aliases: PluginAliases::new(),
            middleware_templates: BTreeMap::new(),
            commands: BuiltinCommands::default(),
            info_commands: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Load, sanitize and validate configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse, sanitize and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content)?;
        config.sanitize();
        validate(&config).map_err(ConfigError::Invalid)?;
        Ok(config)
    }

    /// Drop entries that cannot work, logging each one.
    ///
    /// - prefixes and delimiters that are empty or contain a quote character
    ///   (the tokenizer treats quotes specially); an emptied list falls back
    ///   to its default
    /// - namespace aliases already claimed, case-insensitively, by an
    ///   earlier alias; namespaces are considered in sorted order
    pub fn sanitize(&mut self) {
        fn usable(kind: &str, value: &str) -> bool {
            let ok = !value.is_empty() && !value.contains(['"', '\'']);
            if !ok {
                warn!(value = %value, "Ignoring {} containing quotes or empty", kind);
            }
            ok
        }

        self.prefixes.retain(|p| usable("prefix", p));
        if self.prefixes.is_empty() {
            self.prefixes = default_prefixes();
        }

        self.plugin_delimiters.retain(|d| usable("plugin delimiter", d));
        if self.plugin_delimiters.is_empty() {
            self.plugin_delimiters = default_plugin_delimiters();
        }

        let mut claimed: Vec<String> = Vec::new();
        let mut aliases = PluginAliases::new();
        for (namespace, list) in std::mem::take(&mut self.plugin_aliases) {
            let mut kept = Vec::new();
            for alias in list.into_vec() {
                if let Some(existing) = claimed.iter().find(|c| eq_ignore_case(c, &alias)) {
                    warn!(
                        namespace = %namespace,
                        alias = %alias,
                        conflicts_with = %existing,
                        "Ignoring conflicting plugin alias"
                    );
                    continue;
                }
                claimed.push(alias.clone());
                kept.push(alias);
            }
            aliases.insert(namespace, StringList::from(kept));
        }
        self.plugin_aliases = aliases;
    }

    /// Prefix and delimiter matcher for this configuration.
    pub fn syntax(&self) -> CommandSyntax {
        CommandSyntax::new(self.prefixes.iter().cloned(), self.plugin_delimiters.iter().cloned())
    }

    /// The name shown to users for a namespace: its first alias, else itself.
    pub fn friendly_namespace<'a>(&'a self, namespace: &'a str) -> &'a str {
        self.plugin_aliases
            .get(namespace)
            .and_then(|list| list.first())
            .map(String::as_str)
            .unwrap_or(namespace)
    }
}
