//! Flat credential list
//!
//! ```json
//! { "teacherA": { "secret": "JBSWY3DPEHPK3PXP" } }
//! ```

use std::collections::HashMap;
use std::path::Path;

use scorelog_core::errors::{ExError, ExErrorKind, Result};
use scorelog_core_types::Sensitive;
use serde::Deserialize;

/// One user's shared TOTP secret, base32 encoded.
#[derive(Debug, Clone, Deserialize)]
pub struct Credential {
    pub secret: Sensitive<String>,
}

/// Credentials keyed by user id.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    entries: HashMap<String, Credential>,
}

impl CredentialStore {
    /// Load the credential file.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Io` if the file cannot be read, `ExErrorKind::Serialization`
    /// if it is not the expected JSON shape.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExError::new(ExErrorKind::Io)
                .with_op("load_credentials")
                .with_message(format!("{}: {}", path.display(), e))
        })?;
        let store = Self::from_json(&text)?;
        tracing::info!(
            op = "load_credentials",
            path = %path.display(),
            users = store.len() as u64,
            "credentials loaded"
        );
        Ok(store)
    }

    /// Parse credentials from JSON text.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Serialization` on malformed input.
    pub fn from_json(text: &str) -> Result<Self> {
        let entries: HashMap<String, Credential> = serde_json::from_str(text).map_err(|e| {
            ExError::new(ExErrorKind::Serialization)
                .with_op("load_credentials")
                .with_message(format!("Invalid credentials JSON: {}", e))
        })?;
        Ok(Self { entries })
    }

    pub fn get(&self, user: &str) -> Option<&Credential> {
        self.entries.get(user)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
