//! scorelog server - HTTP surface and process wiring
//!
//! The binary in `main.rs` parses the CLI and dispatches to `commands`;
//! this library half holds what the integration tests drive directly.

pub mod http;
pub mod settings;
pub mod shutdown;

pub use http::{router, AppState};
pub use settings::Settings;
