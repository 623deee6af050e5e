//! Logging utilities
//!
//! Subscriber setup and request summaries for debug logs

use crate::config::LoggingConfig;
use crate::models::openai::OpenAIRequest;

/// Maximum message length kept in request summaries
const MAX_CONTENT_LEN: usize = 200;

/// Initialize logging system
///
/// Logs go to stderr so they never interleave with the demo's stdout output.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    let subscriber: Box<dyn tracing::Subscriber + Send + Sync> = if config.format == "json" {
        // JSON format logs
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .with_writer(std::io::stderr)
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .finish(),
        )
    } else {
        // Human readable format
        Box::new(
            tracing_subscriber::fmt()
                .with_env_filter(config.level.as_str())
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .finish(),
        )
    };

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!("Logging system initialized");
    Ok(())
}

/// Truncate a string with a note about original length
fn truncate_content(s: &str, max_len: usize) -> String {
    match s.char_indices().nth(max_len) {
        Some((cut, _)) => format!(
            "{}... ({} chars truncated)",
            &s[..cut],
            s.chars().count() - max_len
        ),
        None => s.to_string(),
    }
}

/// Create a filtered summary of a completion request for logging
pub fn create_request_log_summary(request: &OpenAIRequest) -> serde_json::Value {
    let messages: Vec<serde_json::Value> = request
        .messages
        .iter()
        .map(|msg| {
            serde_json::json!({
                "role": msg.role,
                "content": truncate_content(&msg.content, MAX_CONTENT_LEN),
            })
        })
        .collect();

    serde_json::json!({
        "model": request.model,
        "stream": request.stream,
        "messages": messages,
    })
}
