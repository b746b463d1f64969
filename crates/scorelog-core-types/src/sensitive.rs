//! Redacting wrapper for secrets that travel through config and logs.

use std::fmt;

use serde::{Deserialize, Deserializer};

const REDACTED: &str = "***REDACTED***";

/// A value whose `Debug` and `Display` never show the contents.
///
/// Holds the PostgreSQL password and each user's TOTP secret. The only way
/// to read the value is `expose`.
///
/// ```
/// use scorelog_core_types::Sensitive;
///
/// let password = Sensitive::new(String::from("pg-pass"));
/// assert_eq!(format!("{:?}", password), "***REDACTED***");
/// assert_eq!(password.expose(), "pg-pass");
/// ```
#[derive(Clone, Default)]
pub struct Sensitive<T>(T);

impl<T> Sensitive<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }

    pub fn expose(&self) -> &T {
        &self.0
    }
}

impl<T> fmt::Debug for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl<T> fmt::Display for Sensitive<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Deserializes as the bare inner value, so config files and credential
/// JSON need no wrapper shape.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Sensitive<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        T::deserialize(deserializer).map(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_never_shows_the_secret() {
        let secret = Sensitive::new("JBSWY3DPEHPK3PXP");
        assert_eq!(format!("{:?}", secret), REDACTED);
        assert_eq!(secret.to_string(), REDACTED);
        assert_eq!(secret.expose(), &"JBSWY3DPEHPK3PXP");
    }

    #[test]
    fn test_deserializes_from_bare_value() {
        let secret: Sensitive<String> = serde_json::from_str("\"hunter2\"").unwrap();
        assert_eq!(secret.expose(), "hunter2");
        assert_eq!(format!("{:?}", secret), REDACTED);
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Login {
            user: String,
            password: Sensitive<String>,
        }

        let login: Login =
            serde_json::from_str(r#"{ "user": "postgres", "password": "pg-pass" }"#).unwrap();
        let rendered = format!("{:?}", login);
        assert!(rendered.contains("postgres"));
        assert!(!rendered.contains("pg-pass"));
    }

    #[test]
    fn test_default_is_empty() {
        let empty: Sensitive<String> = Sensitive::default();
        assert!(empty.expose().is_empty());
    }
}
