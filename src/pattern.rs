//! Key pattern matching for `KEYS`.
//!
//! Only a single wildcard is understood, and everything after the first `*`
//! is ignored:
//!
//! - `*` at position 0 matches every key;
//! - `*` at position `i` matches keys sharing the pattern's first `i` characters;
//! - no `*` at all matches the literal key only.
//!
//! `?`, `[...]` and escapes are treated as ordinary characters.

/// A parsed `KEYS` pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum KeyPattern {
    All,
    Prefix(String),
    Exact(String),
}

impl KeyPattern {
    pub fn parse(pattern: &str) -> Self {
        match pattern.find('*') {
            Some(0) => KeyPattern::All,
            Some(end) => KeyPattern::Prefix(pattern[..end].to_owned()),
            None => KeyPattern::Exact(pattern.to_owned()),
        }
    }

    pub fn matches(&self, key: &str) -> bool {
        match self {
            KeyPattern::All => true,
            KeyPattern::Prefix(prefix) => key.starts_with(prefix.as_str()),
            KeyPattern::Exact(literal) => key == literal,
        }
    }
}

impl From<&str> for KeyPattern {
    fn from(pattern: &str) -> Self {
        Self::parse(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_star_matches_everything() {
        let p = KeyPattern::parse("*");
        assert_eq!(p, KeyPattern::All);
        assert!(p.matches("anything"));
        assert!(p.matches(""));
    }

    #[test]
    fn leading_star_ignores_the_rest() {
        assert_eq!(KeyPattern::parse("*suffix"), KeyPattern::All);
    }

    #[test]
    fn trailing_star_is_a_prefix_match() {
        let p = KeyPattern::parse("foo*");
        assert!(p.matches("foo"));
        assert!(p.matches("foobar"));
        assert!(!p.matches("fo"));
        assert!(!p.matches("barfoo"));
    }

    #[test]
    fn characters_after_the_star_are_ignored() {
        let p = KeyPattern::parse("f*o");
        assert_eq!(p, KeyPattern::Prefix("f".into()));
        assert!(p.matches("fizz"));
    }

    #[test]
    fn no_star_requires_equality() {
        let p = KeyPattern::parse("bar");
        assert!(p.matches("bar"));
        assert!(!p.matches("barn"));
        assert!(!p.matches("ba"));
    }

    #[test]
    fn glob_metacharacters_are_literal() {
        let p = KeyPattern::parse("h?llo");
        assert!(p.matches("h?llo"));
        assert!(!p.matches("hello"));
        assert!(KeyPattern::parse("h[ae]*").matches("h[ae]llo"));
        assert!(!KeyPattern::parse("h[ae]*").matches("hello"));
    }

    #[test]
    fn prefix_respects_multibyte_characters() {
        let p = KeyPattern::parse("çafé*");
        assert!(p.matches("çafé:1"));
        assert!(!p.matches("cafe:1"));
    }

    #[test]
    fn from_str_matches_parse() {
        assert_eq!(KeyPattern::from("a*"), KeyPattern::parse("a*"));
    }
}
