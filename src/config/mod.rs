//! Configuration management module
//!
//! Responsible for loading configuration from the env file and process environment

pub mod settings;

pub use settings::{DemoConfig, GuidanceMode, LoggingConfig, OpenRouterConfig, Settings};
