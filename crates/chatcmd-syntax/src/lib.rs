//! # chatcmd-syntax
//!
//! The textual layer of the chatcmd dispatch engine. Nothing in this crate
//! knows about registries or handlers; it only turns raw input into
//! structured pieces.
//!
//! ## Features
//!
//! - Prefix detection and plugin-qualifier splitting (`.plugin!command`)
//! - Quote-aware tokenization (`"spaced argument"`)
//! - Duration grammar (`1d 23h 59m 59s`)
//! - Normalized Levenshtein similarity for alias suggestions
//! - Case-insensitive helpers and display names for parameters
//!
//! ## Quick Start
//!
//! ```rust
//! use chatcmd_syntax::CommandSyntax;
//!
//! let syntax = CommandSyntax::default();
//! let parsed = syntax.parse(r#".admin!kick "Bad Player" 10m"#).expect("a command");
//!
//! assert_eq!(parsed.namespace.as_deref(), Some("admin"));
//! assert_eq!(parsed.name, "kick");
//! assert_eq!(parsed.args, vec!["Bad Player", "10m"]);
//!
//! // Ordinary chat text is not a command.
//! assert!(syntax.parse("hello there").is_none());
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod duration;
pub mod error;
pub mod ident;
pub mod line;
pub mod similarity;
pub mod tokenize;

pub use self::duration::{format_duration, parse_duration};
pub use self::error::DurationError;
pub use self::ident::{eq_ignore_case, fold_case, friendly_parameter_name};
pub use self::line::{CommandSyntax, ParsedCommand, DEFAULT_DELIMITER, DEFAULT_PREFIX};
pub use self::similarity::{levenshtein, normalized_levenshtein};
pub use self::tokenize::{tokenize, Tokens};
