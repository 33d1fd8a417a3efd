//! Nom-based tokenizer for command lines.
//!
//! A token is either a double-quoted span (`"two words"`) or a maximal run
//! of non-whitespace characters. Surrounding double quotes are trimmed from
//! every token, so an unterminated `"word` reads as `word`. A token left
//! empty by trimming (`""`, a lone `"`) is dropped.

use nom::{
    branch::alt,
    bytes::complete::{take_till1, take_while, take_while1},
    character::complete::char,
    sequence::{delimited, preceded},
    IResult,
};
use smallvec::SmallVec;

/// Tokens borrowed from the input line.
///
/// Most command lines carry only a handful of arguments, so the buffer stays
/// on the stack.
pub type Tokens<'a> = SmallVec<[&'a str; 8]>;

/// Parse a quoted span; the quotes themselves are not part of the output.
fn quoted(input: &str) -> IResult<&str, &str> {
    delimited(char('"'), take_till1(|c: char| c == '"'), char('"'))(input)
}

/// Parse a run of non-whitespace characters.
fn bare(input: &str) -> IResult<&str, &str> {
    take_while1(|c: char| !c.is_whitespace())(input)
}

/// Skip leading whitespace, then read one token.
fn token(input: &str) -> IResult<&str, &str> {
    preceded(take_while(char::is_whitespace), alt((quoted, bare)))(input)
}

/// Split a line into tokens, honouring double-quoted spans.
///
/// Never fails: anything that is not a token is whitespace.
pub fn tokenize(input: &str) -> Tokens<'_> {
    let mut tokens = Tokens::new();
    let mut rest = input;

    while let Ok((remaining, raw)) = token(rest) {
        let text = raw.trim_matches('"');
        if !text.is_empty() {
            tokens.push(text);
        }
        rest = remaining;
    }

    tokens
}
