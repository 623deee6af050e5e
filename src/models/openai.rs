//! OpenAI-compatible API data models
//!
//! Request, response and streaming chunk structures spoken by OpenRouter.
//! Response types are lenient: missing fields default instead of failing,
//! since the demo prints whatever the server returns.

use serde::{Deserialize, Serialize};

/// Chat completion request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIRequest {
    /// Model identifier
    pub model: String,
    /// Message list
    pub messages: Vec<OpenAIMessage>,
    /// Whether to stream the response (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// Chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpenAIMessage {
    /// Role (system/user/assistant)
    pub role: String,
    /// Text content
    pub content: String,
}

/// Non-streaming chat completion response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIResponse {
    /// Response ID
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Choices exactly as returned
    #[serde(default)]
    pub choices: Vec<serde_json::Value>,
    /// Usage statistics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<serde_json::Value>,
}

/// One chunk of a streaming response
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIStreamResponse {
    /// Response ID
    #[serde(default)]
    pub id: Option<String>,
    /// Model used
    #[serde(default)]
    pub model: Option<String>,
    /// Choice list
    #[serde(default)]
    pub choices: Vec<OpenAIStreamChoice>,
    /// Error reported mid-stream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OpenAIError>,
}

/// Streaming choice
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIStreamChoice {
    /// Choice index
    #[serde(default)]
    pub index: u32,
    /// Delta content
    #[serde(default)]
    pub delta: Option<OpenAIStreamDelta>,
    /// Finish reason
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Streaming delta
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIStreamDelta {
    /// Role (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Content (optional)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Error response envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIErrorResponse {
    /// Error information
    pub error: OpenAIError,
}

/// Error object
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenAIError {
    /// Error message
    #[serde(default)]
    pub message: String,
    /// Error code; OpenRouter sends numbers, OpenAI sends strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<serde_json::Value>,
}

impl OpenAIRequest {
    /// Request carrying a single user message
    pub fn user_prompt(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: vec![OpenAIMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
            stream: None,
        }
    }

    /// Same request with streaming enabled
    pub fn streaming(mut self) -> Self {
        self.stream = Some(true);
        self
    }
}

impl OpenAIStreamResponse {
    /// Text of the first choice's delta, empty when any level is missing
    pub fn delta_text(&self) -> &str {
        self.choices
            .first()
            .and_then(|choice| choice.delta.as_ref())
            .and_then(|delta| delta.content.as_deref())
            .unwrap_or("")
    }
}

impl OpenAIError {
    /// Code rendered as a string
    pub fn code_string(&self) -> Option<String> {
        match &self.code {
            Some(serde_json::Value::String(s)) => Some(s.clone()),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        }
    }
}
