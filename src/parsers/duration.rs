use super::TypeParser;
use crate::handlers::core::traits::Value;
use crate::localization::keys;
use chatcmd_syntax::parse_duration;

/// Accepts `1d 2h 3m 4s` style durations.
pub struct DurationParser;

impl TypeParser for DurationParser {
    fn parse(&self, input: &str) -> Option<Value> {
        parse_duration(input).ok().map(Value::Duration)
    }

    fn display_key(&self) -> &'static str {
        keys::TYPE_DURATION
    }

    fn rules_key(&self) -> Option<&'static str> {
        Some(keys::PARSING_RULES_DURATION)
    }
}
