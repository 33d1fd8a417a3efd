//! Command line parsing.
//!
//! Command line format:
//! ```text
//! <prefix>[<plugin><delimiter>]<command> [arg | "quoted arg"]...
//! ```
//!
//! Lines that do not start with a configured prefix are ordinary chat text
//! and parse to `None`.

use crate::tokenize::tokenize;
use std::fmt;

/// Prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = ".";

/// Plugin delimiter used when none is configured.
pub const DEFAULT_DELIMITER: &str = "!";

/// A command invocation extracted from one input line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedCommand {
    /// Plugin namespace qualifier, if the user wrote `plugin!command`.
    pub namespace: Option<String>,
    /// Delimiter that split off `namespace`, as it appeared in the input.
    pub delimiter: Option<String>,
    /// Command name as typed. May be empty (e.g. the line `..`).
    pub name: String,
    /// Positional argument tokens, quotes stripped.
    pub args: Vec<String>,
}

impl ParsedCommand {
    /// Create a parsed command from its parts. A namespace is rendered with
    /// [`DEFAULT_DELIMITER`].
    pub fn new(namespace: Option<String>, name: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            namespace,
            delimiter: None,
            name: name.into(),
            args,
        }
    }
}

/// Renders the command without its prefix, qualified with the delimiter the
/// user typed: `admin!kick "bob"`.
impl fmt::Display for ParsedCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref ns) = self.namespace {
            let delimiter = self.delimiter.as_deref().unwrap_or(DEFAULT_DELIMITER);
            write!(f, "{}{}", ns, delimiter)?;
        }
        f.write_str(&self.name)?;
        for arg in &self.args {
            write!(f, " {:?}", arg)?;
        }
        Ok(())
    }
}

/// Prefixes and plugin delimiters recognised on input lines.
///
/// Both lists are ordered: the first matching entry wins. Empty strings are
/// discarded on construction since they would match every line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSyntax {
    prefixes: Vec<String>,
    delimiters: Vec<String>,
}

impl Default for CommandSyntax {
    fn default() -> Self {
        Self {
            prefixes: vec![DEFAULT_PREFIX.to_string()],
            delimiters: vec![DEFAULT_DELIMITER.to_string()],
        }
    }
}

impl CommandSyntax {
    /// Build a syntax from ordered prefix and delimiter lists.
    ///
    /// Falls back to [`DEFAULT_PREFIX`] / [`DEFAULT_DELIMITER`] when a list is
    /// empty after discarding empty strings.
    pub fn new<P, D>(prefixes: P, delimiters: D) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        D: IntoIterator,
        D::Item: Into<String>,
    {
        let mut prefixes: Vec<String> = prefixes
            .into_iter()
            .map(Into::into)
            .filter(|p| !p.is_empty())
            .collect();
        let mut delimiters: Vec<String> = delimiters
            .into_iter()
            .map(Into::into)
            .filter(|d| !d.is_empty())
            .collect();

        if prefixes.is_empty() {
            prefixes.push(DEFAULT_PREFIX.to_string());
        }
        if delimiters.is_empty() {
            delimiters.push(DEFAULT_DELIMITER.to_string());
        }

        Self {
            prefixes,
            delimiters,
        }
    }

    /// Configured prefixes, in match order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// Configured plugin delimiters, in match order.
    pub fn delimiters(&self) -> &[String] {
        &self.delimiters
    }

    /// The prefix shown to users in signatures and suggestions.
    pub fn primary_prefix(&self) -> &str {
        self.prefixes
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_PREFIX)
    }

    /// The delimiter shown to users when qualifying a command.
    pub fn primary_delimiter(&self) -> &str {
        self.delimiters
            .first()
            .map(String::as_str)
            .unwrap_or(DEFAULT_DELIMITER)
    }

    /// The first configured prefix the input starts with.
    pub fn matching_prefix(&self, input: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|p| input.starts_with(p))
    }

    /// Parse a raw input line.
    ///
    /// Returns `None` when the line is not a command. Repeated prefixes are
    /// stripped (`..cmd` reads as `cmd`), and the first delimiter found in
    /// the head token splits off the plugin qualifier.
    pub fn parse(&self, input: &str) -> Option<ParsedCommand> {
        let prefix = self.matching_prefix(input)?;
        let tokens = tokenize(input);

        let mut head = tokens.first().copied().unwrap_or("");
        while let Some(rest) = head.strip_prefix(prefix) {
            head = rest;
        }

        let split = self
            .delimiters
            .iter()
            .find(|d| head.contains(d.as_str()))
            .and_then(|d| head.split_once(d.as_str()).map(|parts| (d, parts)));

        let (namespace, delimiter, name) = match split {
            Some((d, (ns, name))) if !ns.is_empty() => (Some(ns.to_string()), Some(d.clone()), name),
            Some((_, (_, name))) => (None, None, name),
            None => (None, None, head),
        };

        let args = tokens.iter().skip(1).map(|t| t.to_string()).collect();

        Some(ParsedCommand {
            namespace,
            delimiter,
            name: name.to_string(),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn syntax() -> CommandSyntax {
        CommandSyntax::default()
    }

    #[test]
    fn test_parse_plain_command() {
        let cmd = syntax().parse(".help").unwrap();
        assert_eq!(cmd.namespace, None);
        assert_eq!(cmd.name, "help");
        assert!(cmd.args.is_empty());
    }

    #[test]
    fn test_parse_qualified_with_quoted_args() {
        let cmd = syntax().parse(r#".ns!cmd "a b" c"#).unwrap();
        assert_eq!(cmd.namespace.as_deref(), Some("ns"));
        assert_eq!(cmd.name, "cmd");
        assert_eq!(cmd.args, vec!["a b", "c"]);
    }

    #[test]
    fn test_not_a_command() {
        assert!(syntax().parse("hello world").is_none());
        assert!(syntax().parse("").is_none());
        assert!(syntax().parse(" .help").is_none());
    }

    #[test]
    fn test_repeated_prefix_stripped() {
        assert_eq!(syntax().parse("..command").unwrap().name, "command");
        assert_eq!(syntax().parse("...command").unwrap().name, "command");
    }

    #[test]
    fn test_only_prefixes_yields_empty_name() {
        let cmd = syntax().parse("..").unwrap();
        assert_eq!(cmd.name, "");
        assert_eq!(cmd.namespace, None);
        assert!(cmd.args.is_empty());

        assert_eq!(syntax().parse(".").unwrap().name, "");
    }

    #[test]
    fn test_prefix_followed_by_space() {
        let cmd = syntax().parse(". foo bar").unwrap();
        assert_eq!(cmd.name, "");
        assert_eq!(cmd.args, vec!["foo", "bar"]);
    }

    #[test]
    fn test_empty_qualifier_is_dropped() {
        let cmd = syntax().parse(".!kick").unwrap();
        assert_eq!(cmd.namespace, None);
        assert_eq!(cmd.name, "kick");
    }

    #[test]
    fn test_delimiter_splits_once() {
        let cmd = syntax().parse(".a!b!c").unwrap();
        assert_eq!(cmd.namespace.as_deref(), Some("a"));
        assert_eq!(cmd.name, "b!c");
    }

    #[test]
    fn test_first_matching_prefix_wins() {
        let syntax = CommandSyntax::new(["!", "!!"], [":"]);
        let cmd = syntax.parse("!!ban").unwrap();
        assert_eq!(cmd.name, "ban");
    }

    #[test]
    fn test_multi_char_prefix_and_delimiter() {
        let syntax = CommandSyntax::new(["//"], ["::", "!"]);
        let cmd = syntax.parse("//admin::kick bob").unwrap();
        assert_eq!(cmd.namespace.as_deref(), Some("admin"));
        assert_eq!(cmd.name, "kick");
        assert_eq!(cmd.args, vec!["bob"]);
    }

    #[test]
    fn test_delimiters_scanned_in_order() {
        let syntax = CommandSyntax::new(["."], ["#", "!"]);
        let cmd = syntax.parse(".a!b#c").unwrap();
        assert_eq!(cmd.namespace.as_deref(), Some("a!b"));
        assert_eq!(cmd.name, "c");
    }

    #[test]
    fn test_display_uses_matched_delimiter() {
        let syntax = CommandSyntax::new(["//"], ["::", "!"]);
        let cmd = syntax.parse(r#"//admin::kick "bad bob""#).unwrap();
        assert_eq!(cmd.delimiter.as_deref(), Some("::"));
        assert_eq!(cmd.to_string(), r#"admin::kick "bad bob""#);

        assert_eq!(syntax.parse("//kick").unwrap().to_string(), "kick");
        assert_eq!(
            ParsedCommand::new(Some("admin".into()), "kick", vec![]).to_string(),
            "admin!kick"
        );
    }

    #[test]
    fn test_empty_lists_fall_back_to_defaults() {
        let syntax = CommandSyntax::new(Vec::<String>::new(), [""]);
        assert_eq!(syntax.prefixes(), &["."]);
        assert_eq!(syntax.delimiters(), &["!"]);
        assert_eq!(syntax.primary_prefix(), ".");
        assert_eq!(syntax.primary_delimiter(), "!");
    }
}
