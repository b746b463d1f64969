//! Core types shared across scorelog facilities
//!
//! This crate provides foundational types used by the error, logging,
//! store and server layers:
//!
//! - **Correlation types**: RequestId for tagging HTTP requests and errors
//! - **Sensitive data**: Sensitive<T> marker for automatic redaction
//! - **Schema constants**: Canonical field keys and event names

pub mod correlation;
pub mod schema;
pub mod sensitive;

pub use correlation::RequestId;
pub use sensitive::Sensitive;
