//! OpenRouter connectivity check library
//!
//! Probes OpenRouter, runs a plain and a streaming chat completion, and turns
//! failures into remediation guidance

pub mod config;
pub mod models;
pub mod providers;
pub mod services;
pub mod utils;

// Re-export common types
pub use config::Settings;
pub use models::openai;
pub use providers::{OpenRouterProvider, Provider};
pub use services::{classify, Console, Diagnosis, Outcome, Runner};
pub use utils::error::{ClientError, ClientResult};

/// Library version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Library description
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Get version information
pub fn version_info() -> String {
    format!("{} v{} - {}", NAME, VERSION, DESCRIPTION)
}
