//! scorelog auth - TOTP login verification
//!
//! Independent of the report store: reads a flat credential file keyed by
//! user id and checks six-digit codes against each user's shared secret.

pub mod credentials;
pub mod totp;

pub use credentials::{Credential, CredentialStore};
pub use totp::TotpVerifier;
