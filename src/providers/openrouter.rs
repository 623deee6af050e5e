//! OpenRouter Provider implementation
//!
//! Talks to OpenRouter through its OpenAI-compatible chat completions API

use super::sse::chunk_stream;
use super::{BoxStream, Provider};
use crate::config::OpenRouterConfig;
use crate::models::openai::*;
use crate::utils::error::{ClientError, ClientResult};
use crate::utils::logging::create_request_log_summary;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use tracing::{debug, error, info, warn};

/// OpenRouter Provider
pub struct OpenRouterProvider {
    client: Client,
    api_key: String,
    base_url: String,
    site_url: String,
    referer: String,
    app_title: Option<String>,
}

impl OpenRouterProvider {
    /// Create a provider from configuration
    ///
    /// No request timeout is set; reqwest waits indefinitely by default.
    pub fn new(config: &OpenRouterConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("openrouter-check/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ClientError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone().unwrap_or_default(),
            base_url: config.base_url.clone(),
            site_url: config.site_url.clone(),
            referer: config.referer.clone(),
            app_title: config.app_title.clone(),
        })
    }

    /// Build the request URL
    fn build_url(&self) -> String {
        let base_url = self.base_url.trim_end_matches('/');
        format!("{}/chat/completions", base_url)
    }

    /// Start a completion request with auth and attribution headers
    fn completion_request(&self, request: &OpenAIRequest) -> RequestBuilder {
        let builder = self
            .client
            .post(self.build_url())
            .bearer_auth(&self.api_key)
            .header("HTTP-Referer", &self.referer)
            .json(request);

        match &self.app_title {
            Some(title) => builder.header("X-Title", title),
            None => builder,
        }
    }

    /// Turn a non-success response into an API error
    async fn error_from_response(response: Response) -> ClientError {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_default();

        if let Ok(error_response) = serde_json::from_str::<OpenAIErrorResponse>(&error_text) {
            error!("OpenRouter API error: {:?}", error_response.error);
            let message = if error_response.error.message.is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                error_response.error.message.clone()
            };
            ClientError::Api {
                status: status.as_u16(),
                message,
                code: error_response.error.code_string(),
            }
        } else {
            error!("OpenRouter API request failed: {} - {}", status, error_text);
            let message = if error_text.trim().is_empty() {
                status.canonical_reason().unwrap_or("Unknown error").to_string()
            } else {
                error_text
            };
            ClientError::Api {
                status: status.as_u16(),
                message,
                code: None,
            }
        }
    }
}

#[async_trait]
impl Provider for OpenRouterProvider {
    fn name(&self) -> &str {
        "openrouter"
    }

    async fn probe(&self) -> ClientResult<()> {
        debug!("Probing {}", self.site_url);

        let response = self.client.get(&self.site_url).send().await?;
        let status = response.status();

        if !status.is_success() {
            warn!("Reachability probe returned {}", status);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message: format!("HTTP {}", status.as_u16()),
                code: None,
            });
        }

        info!("Reachability probe succeeded: {}", status);
        Ok(())
    }

    async fn chat_complete(&self, request: OpenAIRequest) -> ClientResult<OpenAIResponse> {
        debug!(
            "Sending chat completion request: {}",
            create_request_log_summary(&request)
        );

        let response = self.completion_request(&request).send().await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        let body = response.text().await?;
        let completion: OpenAIResponse = serde_json::from_str(&body)?;

        debug!("Chat completion finished with {} choices", completion.choices.len());
        Ok(completion)
    }

    async fn chat_stream(
        &self,
        mut request: OpenAIRequest,
    ) -> ClientResult<BoxStream<'static, OpenAIStreamResponse>> {
        request.stream = Some(true);
        debug!(
            "Sending streaming chat completion request: {}",
            create_request_log_summary(&request)
        );

        let response = self
            .completion_request(&request)
            .header("Accept", "text/event-stream")
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from_response(response).await);
        }

        Ok(chunk_stream(response.bytes_stream()))
    }
}
