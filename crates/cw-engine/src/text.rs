//! Text placeholder substitution helpers.

use std::collections::HashMap;

/// Replace `<key>` placeholder tokens with values from the given map.
///
/// Unknown keys are left in place verbatim, so missing data degrades
/// visibly instead of silently vanishing. A `<` with no closing `>` is
/// treated as literal text.
pub fn replace_placeholders(text: &str, placeholders: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('>') {
            Some(close) => {
                let key = &after[..close];
                match placeholders.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('<');
                        out.push_str(key);
                        out.push('>');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_keys() {
        let placeholders = map(&[("playerName", "Rook"), ("assistantName", "AX-7")]);
        assert_eq!(
            replace_placeholders("Hello <playerName>, I am <assistantName>.", &placeholders),
            "Hello Rook, I am AX-7."
        );
    }

    #[test]
    fn unknown_key_left_verbatim() {
        let placeholders = map(&[]);
        assert_eq!(
            replace_placeholders("Hello <who>?", &placeholders),
            "Hello <who>?"
        );
    }

    #[test]
    fn unclosed_bracket_is_literal() {
        let placeholders = map(&[("x", "y")]);
        assert_eq!(replace_placeholders("a < b", &placeholders), "a < b");
    }

    #[test]
    fn empty_text() {
        assert_eq!(replace_placeholders("", &map(&[])), "");
    }
}
