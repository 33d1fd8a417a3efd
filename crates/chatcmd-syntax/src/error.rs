//! Error types for the syntax layer.
//!
//! Parsing a command line never fails (non-commands are `None`), so the only
//! fallible grammar here is the duration grammar.

use thiserror::Error;

/// Errors produced by [`parse_duration`](crate::parse_duration).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// The input held no duration component at all.
    #[error("empty duration")]
    Empty,

    /// Input was left over after the last recognised component.
    #[error("unexpected input at position {position} in duration {input:?}")]
    Malformed {
        /// The original input.
        input: String,
        /// Byte offset of the first unparsed character.
        position: usize,
    },

    /// A component or the total did not fit into a duration.
    #[error("duration {0:?} is too large")]
    Overflow(String),
}
