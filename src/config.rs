pub const DEFAULT_DATABASE: u32 = 0;

/// Character set a real client would use to decode replies. Recorded only;
/// values are always held as Rust strings.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    Latin1,
}

impl TextEncoding {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "ascii" | "us-ascii" => Some(TextEncoding::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" => Some(TextEncoding::Latin1),
            _ => None,
        }
    }
}

/// How a real client would handle undecodable bytes. Recorded only.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    #[default]
    Strict,
    Replace,
    Ignore,
}

impl ErrorPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Some(ErrorPolicy::Strict),
            "replace" => Some(ErrorPolicy::Replace),
            "ignore" => Some(ErrorPolicy::Ignore),
            _ => None,
        }
    }
}

/// Connection parameters accepted by [`Client`](crate::Client) and
/// [`Factory`](crate::Factory).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Database selected when the client is created.
    pub database: u32,
    /// Accepted for interface compatibility. Never checked.
    pub password: Option<String>,
    pub encoding: TextEncoding,
    pub errors: ErrorPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DEFAULT_DATABASE,
            password: None,
            encoding: TextEncoding::Utf8,
            errors: ErrorPolicy::Strict,
        }
    }
}

impl Config {
    /// Builds a config from loosely typed settings. Missing or unparseable
    /// values fall back to the defaults.
    pub fn from_vars(
        database: Option<&str>,
        password: Option<&str>,
        encoding: Option<&str>,
        errors: Option<&str>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            database: database
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(defaults.database),
            password: password.map(|s| s.to_string()),
            encoding: encoding
                .and_then(TextEncoding::from_str)
                .unwrap_or(defaults.encoding),
            errors: errors
                .and_then(ErrorPolicy::from_str)
                .unwrap_or(defaults.errors),
        }
    }

    pub fn with_database(mut self, database: u32) -> Self {
        self.database = database;
        self
    }

    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn with_errors(mut self, errors: ErrorPolicy) -> Self {
        self.errors = errors;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let c = Config::default();
        assert_eq!(c.database, 0);
        assert!(c.password.is_none());
        assert_eq!(c.encoding, TextEncoding::Utf8);
        assert_eq!(c.errors, ErrorPolicy::Strict);
    }

    #[test]
    fn from_vars_all_none_returns_defaults() {
        assert_eq!(Config::from_vars(None, None, None, None), Config::default());
    }

    #[test]
    fn from_vars_database_override() {
        let c = Config::from_vars(Some("3"), None, None, None);
        assert_eq!(c.database, 3);
    }

    #[test]
    fn from_vars_invalid_database_falls_back_to_default() {
        let c = Config::from_vars(Some("not_a_db"), None, None, None);
        assert_eq!(c.database, DEFAULT_DATABASE);
        let c = Config::from_vars(Some("-1"), None, None, None);
        assert_eq!(c.database, DEFAULT_DATABASE);
    }

    #[test]
    fn from_vars_password_is_kept_verbatim() {
        let c = Config::from_vars(None, Some(" s3cret "), None, None);
        assert_eq!(c.password.as_deref(), Some(" s3cret "));
    }

    #[test]
    fn from_vars_encoding_and_errors_override() {
        let c = Config::from_vars(None, None, Some("latin1"), Some("replace"));
        assert_eq!(c.encoding, TextEncoding::Latin1);
        assert_eq!(c.errors, ErrorPolicy::Replace);
    }

    #[test]
    fn from_vars_unknown_encoding_and_errors_fall_back() {
        let c = Config::from_vars(None, None, Some("ebcdic"), Some("panic"));
        assert_eq!(c.encoding, TextEncoding::Utf8);
        assert_eq!(c.errors, ErrorPolicy::Strict);
    }

    #[test]
    fn encoding_from_str_aliases_and_case() {
        assert_eq!(TextEncoding::from_str("UTF-8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_str("utf8"), Some(TextEncoding::Utf8));
        assert_eq!(TextEncoding::from_str("US-ASCII"), Some(TextEncoding::Ascii));
        assert_eq!(TextEncoding::from_str("ISO-8859-1"), Some(TextEncoding::Latin1));
        assert_eq!(TextEncoding::from_str(""), None);
    }

    #[test]
    fn error_policy_from_str_case_insensitive() {
        assert_eq!(ErrorPolicy::from_str("STRICT"), Some(ErrorPolicy::Strict));
        assert_eq!(ErrorPolicy::from_str("Ignore"), Some(ErrorPolicy::Ignore));
        assert_eq!(ErrorPolicy::from_str("fifo"), None);
    }

    #[test]
    fn builders_set_fields() {
        let c = Config::default()
            .with_database(9)
            .with_password("pw")
            .with_encoding(TextEncoding::Ascii)
            .with_errors(ErrorPolicy::Ignore);
        assert_eq!(c.database, 9);
        assert_eq!(c.password.as_deref(), Some("pw"));
        assert_eq!(c.encoding, TextEncoding::Ascii);
        assert_eq!(c.errors, ErrorPolicy::Ignore);
    }
}
