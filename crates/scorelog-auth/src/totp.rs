//! TOTP verification with a fixed tolerance window.

use std::time::{SystemTime, UNIX_EPOCH};

use scorelog_core::errors::{ExError, ExErrorKind, Result};
use totp_rs::{Algorithm, Secret, TOTP};

use crate::credentials::CredentialStore;

/// Verifies six-digit SHA-1 codes on a 30 second step.
///
/// `skew` is the number of steps accepted on either side of the current
/// one.
#[derive(Debug, Clone, Copy)]
pub struct TotpVerifier {
    digits: usize,
    step: u64,
    skew: u8,
}

impl Default for TotpVerifier {
    fn default() -> Self {
        Self {
            digits: 6,
            step: 30,
            skew: 1,
        }
    }
}

impl TotpVerifier {
    /// Check `token` for `user` at the current wall-clock time.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::Unauthorised` for an unknown user, an undecodable
    /// secret or a wrong code. The message never says which.
    pub fn verify_now(&self, credentials: &CredentialStore, user: &str, token: &str) -> Result<()> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();
        self.verify_at(credentials, user, token, now)
    }

    /// Check `token` for `user` at a given unix time in seconds.
    ///
    /// # Errors
    ///
    /// As `verify_now`.
    pub fn verify_at(
        &self,
        credentials: &CredentialStore,
        user: &str,
        token: &str,
        unix_time: u64,
    ) -> Result<()> {
        let Some(credential) = credentials.get(user) else {
            tracing::warn!(op = "verify_totp", user, "unknown user");
            return Err(rejected());
        };

        let totp = self.totp_for(credential.secret.expose()).map_err(|reason| {
            tracing::error!(op = "verify_totp", user, reason = %reason, "unusable secret");
            rejected()
        })?;

        if totp.check(token.trim(), unix_time) {
            tracing::info!(op = "verify_totp", user, "login accepted");
            Ok(())
        } else {
            tracing::warn!(op = "verify_totp", user, "wrong code");
            Err(rejected())
        }
    }

    /// Code for a secret at a given time; used by tests and tooling.
    ///
    /// # Errors
    ///
    /// `ExErrorKind::InvalidInput` if the secret is not valid base32.
    pub fn generate(&self, secret: &str, unix_time: u64) -> Result<String> {
        let totp = self.totp_for(secret).map_err(|reason| {
            ExError::new(ExErrorKind::InvalidInput)
                .with_op("generate_totp")
                .with_message(reason)
        })?;
        Ok(totp.generate(unix_time))
    }

    fn totp_for(&self, secret: &str) -> std::result::Result<TOTP, String> {
        let bytes = Secret::Encoded(secret.trim().to_string())
            .to_bytes()
            .map_err(|e| format!("{:?}", e))?;
        Ok(TOTP::new_unchecked(
            Algorithm::SHA1,
            self.digits,
            self.skew,
            self.step,
            bytes,
        ))
    }
}

fn rejected() -> ExError {
    ExError::new(ExErrorKind::Unauthorised)
        .with_op("verify_totp")
        .with_message("invalid credentials")
}
