use super::TypeParser;
use crate::handlers::core::traits::Value;
use crate::localization::keys;

const TRUE_VALUES: &[&str] = &["true", "1", "yes", "on", "enabled", "enable", "+"];
const FALSE_VALUES: &[&str] = &["false", "0", "no", "off", "disabled", "disable", "-"];

/// Accepts the usual spellings of yes and no, case-insensitively.
pub struct BoolParser;

impl TypeParser for BoolParser {
    fn parse(&self, input: &str) -> Option<Value> {
        if TRUE_VALUES.iter().any(|v| v.eq_ignore_ascii_case(input)) {
            Some(Value::Bool(true))
        } else if FALSE_VALUES.iter().any(|v| v.eq_ignore_ascii_case(input)) {
            Some(Value::Bool(false))
        } else {
            None
        }
    }

    fn display_key(&self) -> &'static str {
        keys::TYPE_BOOL
    }

    fn rules_key(&self) -> Option<&'static str> {
        Some(keys::PARSING_RULES_BOOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthy_and_falsy() {
        for input in ["true", "TRUE", "1", "Yes", "on", "enabled", "enable", "+"] {
            assert_eq!(BoolParser.parse(input), Some(Value::Bool(true)), "{input}");
        }
        for input in ["false", "0", "NO", "off", "Disabled", "disable", "-"] {
            assert_eq!(BoolParser.parse(input), Some(Value::Bool(false)), "{input}");
        }
    }

    #[test]
    fn test_rejects_other_words() {
        assert_eq!(BoolParser.parse("maybe"), None);
        assert_eq!(BoolParser.parse(""), None);
        assert_eq!(BoolParser.parse("2"), None);
        assert_eq!(BoolParser.rules_key(), Some(keys::PARSING_RULES_BOOL));
    }
}
