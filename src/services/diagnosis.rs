//! Failure classification
//!
//! Maps a provider failure onto a closed set of diagnoses, each of which
//! knows the remediation text to print. Rules are checked in table order and
//! the first match wins.

use crate::config::settings::{GuidanceMode, DEFAULT_BASE_URL};
use crate::utils::error::{ClientError, ECONNREFUSED, ENOTFOUND};

/// Billing page referenced by the credits guidance
pub const CREDITS_URL: &str = "https://openrouter.ai/settings/credits";

/// Key management page referenced by the invalid key guidance
pub const KEYS_URL: &str = "https://openrouter.ai/keys";

/// Classified failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnosis {
    /// The API could not be reached
    Connection,
    /// The account has no credits left (402)
    InsufficientCredits,
    /// The API key was rejected (401)
    InvalidApiKey,
    /// DNS lookup failed or the connection was refused
    Network,
    /// Anything else
    Unexpected {
        message: String,
        code: Option<String>,
    },
    /// The reachability probe failed
    Unreachable { host: String },
}

/// The fields of a failure that classification looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorFacts {
    pub message: String,
    pub status: Option<u16>,
    pub code: Option<String>,
}

/// Text printed for a diagnosis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    /// Lines for stderr
    pub headline: Vec<String>,
    /// Heading printed before the numbered steps
    pub intro: Option<&'static str>,
    /// Remediation steps, printed numbered
    pub steps: Vec<String>,
}

type Rule = fn(&ErrorFacts) -> Option<Diagnosis>;

const FULL_RULES: &[Rule] = &[
    connection_message,
    insufficient_credits,
    invalid_api_key,
    network_code,
];

const BASIC_RULES: &[Rule] = &[insufficient_credits, invalid_api_key];

fn connection_message(facts: &ErrorFacts) -> Option<Diagnosis> {
    facts
        .message
        .contains("Connection error")
        .then_some(Diagnosis::Connection)
}

fn insufficient_credits(facts: &ErrorFacts) -> Option<Diagnosis> {
    (facts.status == Some(402)).then_some(Diagnosis::InsufficientCredits)
}

fn invalid_api_key(facts: &ErrorFacts) -> Option<Diagnosis> {
    (facts.status == Some(401)).then_some(Diagnosis::InvalidApiKey)
}

fn network_code(facts: &ErrorFacts) -> Option<Diagnosis> {
    matches!(facts.code.as_deref(), Some(ENOTFOUND) | Some(ECONNREFUSED)).then_some(Diagnosis::Network)
}

impl From<&ClientError> for ErrorFacts {
    fn from(error: &ClientError) -> Self {
        Self {
            message: error.to_string(),
            status: error.status(),
            code: error.code().map(str::to_string),
        }
    }
}

/// Classify a provider failure
pub fn classify(error: &ClientError, mode: GuidanceMode) -> Diagnosis {
    classify_facts(&ErrorFacts::from(error), mode)
}

/// Classify already extracted failure fields
pub fn classify_facts(facts: &ErrorFacts, mode: GuidanceMode) -> Diagnosis {
    let rules = match mode {
        GuidanceMode::Full => FULL_RULES,
        GuidanceMode::Basic => BASIC_RULES,
    };

    rules
        .iter()
        .find_map(|rule| rule(facts))
        .unwrap_or_else(|| Diagnosis::Unexpected {
            message: facts.message.clone(),
            code: facts.code.clone(),
        })
}

impl Diagnosis {
    /// Diagnosis for a failed reachability probe of `host`
    pub fn unreachable(host: impl Into<String>) -> Self {
        Diagnosis::Unreachable { host: host.into() }
    }

    /// Remediation text for this diagnosis
    pub fn guidance(&self) -> Guidance {
        match self {
            Diagnosis::Connection => Guidance {
                headline: vec!["🌐 Connection error - cannot reach OpenRouter API".to_string()],
                intro: Some("Troubleshooting steps:"),
                steps: vec![
                    "Verify your internet connection is stable".to_string(),
                    format!(
                        "Check if OPENROUTER_BASE_URL in .env is correct (should be {})",
                        DEFAULT_BASE_URL
                    ),
                    "Ensure firewall/proxy allows access to openrouter.ai".to_string(),
                    "Try running the command again in a few moments".to_string(),
                ],
            },
            Diagnosis::InsufficientCredits => Guidance {
                headline: vec!["💳 Insufficient credits on your OpenRouter account".to_string()],
                intro: Some("To fix this issue:"),
                steps: vec![
                    format!("Visit {}", CREDITS_URL),
                    "Purchase credits for your account".to_string(),
                    "Or verify your API key is correct in the .env file".to_string(),
                ],
            },
            Diagnosis::InvalidApiKey => Guidance {
                headline: vec!["🔑 Invalid API key".to_string()],
                intro: Some("To fix this issue:"),
                steps: vec![
                    "Check your OPENROUTER_API_KEY in the .env file".to_string(),
                    format!("Generate a new API key at {}", KEYS_URL),
                ],
            },
            Diagnosis::Network => Guidance {
                headline: vec!["🌐 Network connection failed".to_string()],
                intro: Some("This usually means:"),
                steps: vec![
                    "No internet connection".to_string(),
                    "DNS resolution failed".to_string(),
                    "Firewall blocking the connection".to_string(),
                ],
            },
            Diagnosis::Unexpected { message, code } => {
                let mut headline = vec![format!("🚨 Unexpected error: {}", message)];
                if let Some(code) = code {
                    headline.push(format!("Error code: {}", code));
                }
                Guidance {
                    headline,
                    intro: None,
                    steps: Vec::new(),
                }
            }
            Diagnosis::Unreachable { host } => Guidance {
                headline: vec![
                    "❌ Network connectivity test failed:".to_string(),
                    format!("🌐 Cannot reach {}", host),
                ],
                intro: Some("Possible solutions:"),
                steps: vec![
                    "Check your internet connection".to_string(),
                    format!("Verify firewall/proxy settings allow access to {}", host),
                    "Try disabling VPN temporarily".to_string(),
                    "Check if your network blocks external API calls".to_string(),
                ],
            },
        }
    }
}
