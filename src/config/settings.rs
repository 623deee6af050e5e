//! Application configuration settings
//!
//! Defines all configuration structures and loading logic

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Default API root for OpenRouter's OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

/// Default reachability probe target
pub const DEFAULT_SITE_URL: &str = "https://openrouter.ai";

/// Default attribution referer sent with every API request
pub const DEFAULT_REFERER: &str = "https://github.com/OpenRouterTeam/openrouter-examples";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// OpenRouter API configuration
    pub openrouter: OpenRouterConfig,
    /// Demo flow configuration
    pub demo: DemoConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// OpenRouter API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenRouterConfig {
    /// API key, `None` when unset or empty
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Web root used by the reachability probe
    pub site_url: String,
    /// `HTTP-Referer` attribution header
    pub referer: String,
    /// `X-Title` attribution header (optional)
    pub app_title: Option<String>,
}

/// Demo flow configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    /// Model for the non-streaming request
    pub model: String,
    /// Model for the streaming request
    pub stream_model: String,
    /// User message sent with both requests
    pub prompt: String,
    /// Whether to probe the site before calling the API
    pub probe_connectivity: bool,
    /// Which classification rules to apply to failures
    pub guidance: GuidanceMode,
}

/// Classification rule set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceMode {
    /// Connection, billing, auth and network rules
    #[default]
    Full,
    /// Billing and auth rules only
    Basic,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter directive
    pub level: String,
    /// Log format (text/json)
    pub format: String,
}

impl FromStr for GuidanceMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <Self as ValueEnum>::from_str(s.trim(), true)
            .map_err(|_| anyhow::anyhow!("Invalid guidance mode: {}", s.trim()))
    }
}

impl Settings {
    /// Load an env file into the process environment
    ///
    /// Returns false when the file does not exist or cannot be parsed.
    pub fn load_env_file(path: &Path) -> bool {
        match dotenv::from_path(path) {
            Ok(()) => {
                debug!("Loaded environment from {:?}", path);
                true
            }
            Err(e) => {
                debug!("No environment file loaded from {:?}: {}", path, e);
                false
            }
        }
    }

    /// Build settings from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let get_or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        Self {
            openrouter: OpenRouterConfig {
                api_key: get("OPENROUTER_API_KEY").map(|v| v.trim().to_string()),
                base_url: get_or("OPENROUTER_BASE_URL", DEFAULT_BASE_URL),
                site_url: get_or("OPENROUTER_SITE_URL", DEFAULT_SITE_URL),
                referer: get_or("OPENROUTER_REFERER", DEFAULT_REFERER),
                app_title: get("OPENROUTER_APP_TITLE"),
            },
            demo: DemoConfig {
                model: get_or("OPENROUTER_MODEL", "openai/gpt-3.5-turbo"),
                stream_model: get_or("OPENROUTER_STREAM_MODEL", "openai/gpt-4"),
                prompt: get_or("OPENROUTER_PROMPT", "Say this is a test"),
                probe_connectivity: parse_or_default(get("OPENROUTER_PROBE"), "OPENROUTER_PROBE", true),
                guidance: parse_or_default(
                    get("OPENROUTER_ERROR_GUIDANCE"),
                    "OPENROUTER_ERROR_GUIDANCE",
                    GuidanceMode::Full,
                ),
            },
            logging: LoggingConfig {
                level: get_or("RUST_LOG", "warn"),
                format: get_or("LOG_FORMAT", "text"),
            },
        }
    }
}

impl OpenRouterConfig {
    /// Host name of the probe target, for guidance text
    pub fn site_host(&self) -> String {
        reqwest::Url::parse(&self.site_url)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .unwrap_or_else(|| self.site_url.clone())
    }
}

/// Parse an optional value, falling back to the default on absence or error
fn parse_or_default<T>(value: Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            warn!("Ignoring invalid {}={:?}: {}", key, raw, e);
            default
        }),
        None => default,
    }
}
