use super::TypeParser;
use crate::handlers::core::traits::Value;
use crate::localization::keys;

/// Accepts any token unchanged.
pub struct StringParser;

impl TypeParser for StringParser {
    fn parse(&self, input: &str) -> Option<Value> {
        Some(Value::Text(input.to_string()))
    }

    fn display_key(&self) -> &'static str {
        keys::TYPE_STRING
    }
}

/// Accepts exactly one character.
pub struct CharParser;

impl TypeParser for CharParser {
    fn parse(&self, input: &str) -> Option<Value> {
        let mut chars = input.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Value::Char(c)),
            _ => None,
        }
    }

    fn display_key(&self) -> &'static str {
        keys::TYPE_CHAR
    }
}
