//! Property-based tests for command line parsing.
//!
//! Uses proptest to generate random lines and verify that:
//! 1. Parsing never panics, whatever the input
//! 2. Lines without a prefix are never commands
//! 3. Unquoted arguments survive parsing unchanged

use chatcmd_syntax::{normalized_levenshtein, parse_duration, tokenize, CommandSyntax};
use proptest::prelude::*;

/// A command or plugin identifier: no whitespace, quotes, prefixes or delimiters.
fn ident_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z][a-zA-Z0-9_-]{0,15}").expect("valid regex")
}

/// An unquoted argument token.
fn arg_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_:/+-]{1,12}").expect("valid regex")
}

proptest! {
    #[test]
    fn parse_never_panics(input in any::<String>()) {
        let syntax = CommandSyntax::default();
        let _ = syntax.parse(&input);
        let _ = tokenize(&input);
    }

    #[test]
    fn tokens_are_never_empty(input in "[a-z \"]{0,40}") {
        prop_assert!(tokenize(&input).iter().all(|t| !t.is_empty()));
    }

    #[test]
    fn duration_never_panics(input in "[0-9dhms ]{0,24}") {
        let _ = parse_duration(&input);
    }

    #[test]
    fn unprefixed_lines_are_not_commands(input in "[a-zA-Z0-9 ]{0,40}") {
        let syntax = CommandSyntax::default();
        prop_assert!(syntax.parse(&input).is_none());
    }

    #[test]
    fn qualified_command_roundtrip(
        ns in ident_strategy(),
        name in ident_strategy(),
        args in prop::collection::vec(arg_strategy(), 0..6),
    ) {
        let syntax = CommandSyntax::default();
        let mut line = format!(".{}!{}", ns, name);
        for arg in &args {
            line.push(' ');
            line.push_str(arg);
        }

        let parsed = syntax.parse(&line).expect("prefixed line parses");
        prop_assert_eq!(parsed.namespace.as_deref(), Some(ns.as_str()));
        prop_assert_eq!(&parsed.name, &name);
        prop_assert_eq!(&parsed.args, &args);
    }

    #[test]
    fn quoted_args_keep_spaces(words in prop::collection::vec(arg_strategy(), 1..4)) {
        let joined = words.join(" ");
        let line = format!(".say \"{}\"", joined);
        let parsed = CommandSyntax::default().parse(&line).expect("prefixed line parses");
        prop_assert_eq!(parsed.args, vec![joined]);
    }

    #[test]
    fn similarity_is_symmetric_and_bounded(a in "[a-z]{0,10}", b in "[a-z]{0,10}") {
        let ab = normalized_levenshtein(&a, &b);
        let ba = normalized_levenshtein(&b, &a);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert!((ab - ba).abs() < f64::EPSILON);
    }
}
