//! Identifier helpers: case-insensitive comparison and display names.
//!
//! Aliases and plugin namespaces compare without regard to case, using full
//! Unicode lowercase mapping rather than ASCII-only folding.

/// Lowercase a string for case-insensitive keys.
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Compare two strings case-insensitively.
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Turn a parameter identifier into a human readable title.
///
/// Both `snake_case` and `camelCase` are split into words, and each word is
/// capitalized: `player_name` and `playerName` both become `Player Name`.
/// A run of capitals is one word and keeps its case: `targetID` becomes
/// `Target ID`, `xmlURLPath` becomes `Xml URL Path`.
pub fn friendly_parameter_name(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut spaced = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            spaced.push(' ');
            continue;
        }
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_numeric() || (prev.is_uppercase() && next_is_lower) {
                spaced.push(' ');
            }
        }
        spaced.push(c);
    }

    spaced
        .split_whitespace()
        .map(|word| {
            if word.chars().count() > 1 && !word.chars().any(char::is_lowercase) {
                return word.to_string();
            }
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case("Kick", "kICK"));
        assert!(eq_ignore_case("ÄRGER", "ärger"));
        assert!(!eq_ignore_case("kick", "kicks"));
        assert!(eq_ignore_case("", ""));
    }

    #[test]
    fn test_fold_case() {
        assert_eq!(fold_case("Admin"), "admin");
    }

    #[test]
    fn test_friendly_names() {
        assert_eq!(friendly_parameter_name("player_name"), "Player Name");
        assert_eq!(friendly_parameter_name("playerName"), "Player Name");
        assert_eq!(friendly_parameter_name("number"), "Number");
        assert_eq!(friendly_parameter_name("optional_string"), "Optional String");
        assert_eq!(friendly_parameter_name("player_Name"), "Player Name");
    }

    #[test]
    fn test_friendly_names_keep_acronyms() {
        assert_eq!(friendly_parameter_name("ID"), "ID");
        assert_eq!(friendly_parameter_name("targetID"), "Target ID");
        assert_eq!(friendly_parameter_name("player_ID"), "Player ID");
        assert_eq!(friendly_parameter_name("XMLFile"), "XML File");
        assert_eq!(friendly_parameter_name("xmlURLPath"), "Xml URL Path");
        assert_eq!(friendly_parameter_name("steam64Id"), "Steam64 Id");
    }
}
