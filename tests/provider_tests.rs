//! OpenRouter provider tests against a mock HTTP server

use httpmock::prelude::*;
use openrouter_check::config::Settings;
use openrouter_check::utils::error::{ClientError, ECONNREFUSED};
use openrouter_check::openai::OpenAIRequest;
use openrouter_check::{OpenRouterProvider, Provider};
use serde_json::json;
use tokio_stream::StreamExt;

/// Create a provider pointed at the mock server
fn create_test_provider(server: &MockServer) -> OpenRouterProvider {
    let mut settings = Settings::from_lookup(|_| None);
    settings.openrouter.api_key = Some("sk-or-test-key".to_string());
    settings.openrouter.base_url = server.url("/api/v1");
    settings.openrouter.site_url = server.url("/");
    settings.openrouter.app_title = Some("openrouter-check".to_string());
    OpenRouterProvider::new(&settings.openrouter).unwrap()
}

fn sse_chunk(content: &str) -> String {
    format!(
        "data: {}\n\n",
        json!({
            "id": "gen-123",
            "model": "openai/gpt-4",
            "choices": [{"index": 0, "delta": {"content": content}, "finish_reason": null}]
        })
    )
}

#[tokio::test]
async fn test_chat_complete_success() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("authorization", "Bearer sk-or-test-key")
                .header("http-referer", "https://github.com/OpenRouterTeam/openrouter-examples")
                .header("x-title", "openrouter-check")
                .body_contains("\"model\":\"openai/gpt-3.5-turbo\"")
                .body_contains("Say this is a test");
            then.status(200).json_body(json!({
                "id": "gen-1",
                "model": "openai/gpt-3.5-turbo",
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": "This is a test"},
                    "finish_reason": "stop"
                }]
            }));
        })
        .await;

    let provider = create_test_provider(&server);
    let response = provider
        .chat_complete(OpenAIRequest::user_prompt("openai/gpt-3.5-turbo", "Say this is a test"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(response.choices.len(), 1);
    assert_eq!(response.choices[0]["message"]["content"], "This is a test");
}

#[tokio::test]
async fn test_chat_complete_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(401)
                .json_body(json!({"error": {"message": "No auth credentials found", "code": 401}}));
        })
        .await;

    let provider = create_test_provider(&server);
    let err = provider
        .chat_complete(OpenAIRequest::user_prompt("openai/gpt-3.5-turbo", "hi"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        ClientError::Api {
            status: 401,
            message: "No auth credentials found".to_string(),
            code: Some("401".to_string()),
        }
    );
}

#[tokio::test]
async fn test_chat_complete_plain_text_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(402).body("Payment Required");
        })
        .await;

    let provider = create_test_provider(&server);
    let err = provider
        .chat_complete(OpenAIRequest::user_prompt("openai/gpt-3.5-turbo", "hi"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(402));
    assert_eq!(err.to_string(), "402 Payment Required");
    assert_eq!(err.code(), None);
}

#[tokio::test]
async fn test_chat_complete_invalid_json() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let provider = create_test_provider(&server);
    let err = provider
        .chat_complete(OpenAIRequest::user_prompt("openai/gpt-3.5-turbo", "hi"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Decode(_)));
}

#[tokio::test]
async fn test_chat_stream_fragments() {
    let server = MockServer::start_async().await;
    let body = format!(
        ": OPENROUTER PROCESSING\n\n{}{}{}{}data: [DONE]\n\n",
        sse_chunk("This"),
        sse_chunk(" is"),
        sse_chunk(" a"),
        sse_chunk(" test"),
    );
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v1/chat/completions")
                .header("accept", "text/event-stream")
                .body_contains("\"stream\":true")
                .body_contains("\"model\":\"openai/gpt-4\"");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(body);
        })
        .await;

    let provider = create_test_provider(&server);
    let mut stream = provider
        .chat_stream(OpenAIRequest::user_prompt("openai/gpt-4", "Say this is a test"))
        .await
        .unwrap();

    let mut text = String::new();
    while let Some(chunk) = stream.next().await {
        text.push_str(chunk.unwrap().delta_text());
    }

    mock.assert_async().await;
    assert_eq!(text, "This is a test");
}

#[tokio::test]
async fn test_chat_stream_ignores_events_after_done() {
    let server = MockServer::start_async().await;
    let body = format!("{}data: [DONE]\n\n{}", sse_chunk("only"), sse_chunk("late"));
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).body(body);
        })
        .await;

    let provider = create_test_provider(&server);
    let chunks: Vec<_> = provider
        .chat_stream(OpenAIRequest::user_prompt("openai/gpt-4", "hi"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].as_ref().unwrap().delta_text(), "only");
}

#[tokio::test]
async fn test_chat_stream_carriage_return_line_endings() {
    let server = MockServer::start_async().await;
    let body = format!(
        "{}{}data: [DONE]\r\r",
        sse_chunk("This is").replace("\n", "\r"),
        sse_chunk(" a test").replace("\n", "\r"),
    );
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200)
                .header("content-type", "text/event-stream")
                .body(body);
        })
        .await;

    let provider = create_test_provider(&server);
    let chunks: Vec<_> = provider
        .chat_stream(OpenAIRequest::user_prompt("openai/gpt-4", "hi"))
        .await
        .unwrap()
        .collect()
        .await;

    let text: Vec<&str> = chunks
        .iter()
        .map(|chunk| chunk.as_ref().unwrap().delta_text())
        .collect();
    assert_eq!(text, vec!["This is", " a test"]);
}

#[tokio::test]
async fn test_chat_stream_mid_stream_error() {
    let server = MockServer::start_async().await;
    let body = format!(
        "{}data: {}\n\n",
        sse_chunk("partial"),
        json!({
            "error": {"code": 502, "message": "Provider returned error"},
            "choices": [{"index": 0, "delta": {"content": ""}, "finish_reason": "error"}]
        })
    );
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(200).body(body);
        })
        .await;

    let provider = create_test_provider(&server);
    let chunks: Vec<_> = provider
        .chat_stream(OpenAIRequest::user_prompt("openai/gpt-4", "hi"))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].as_ref().unwrap().delta_text(), "partial");
    assert_eq!(
        chunks[1].as_ref().unwrap_err(),
        &ClientError::Stream {
            message: "Provider returned error".to_string(),
            code: Some("502".to_string()),
        }
    );
}

#[tokio::test]
async fn test_chat_stream_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/api/v1/chat/completions");
            then.status(402)
                .json_body(json!({"error": {"message": "Insufficient credits", "code": 402}}));
        })
        .await;

    let provider = create_test_provider(&server);
    let result = provider
        .chat_stream(OpenAIRequest::user_prompt("openai/gpt-4", "hi"))
        .await;

    match result {
        Err(err) => assert_eq!(err.status(), Some(402)),
        Ok(_) => panic!("Expected a 402 error"),
    }
}

#[tokio::test]
async fn test_probe_success_and_failure() {
    let server = MockServer::start_async().await;
    let mut ok = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body("<html></html>");
        })
        .await;

    let provider = create_test_provider(&server);
    assert!(provider.probe().await.is_ok());
    ok.assert_async().await;
    ok.delete_async().await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(503);
        })
        .await;

    let err = provider.probe().await.unwrap_err();
    assert_eq!(err.status(), Some(503));
    assert_eq!(err.to_string(), "503 HTTP 503");
}

#[tokio::test]
async fn test_connection_refused() {
    let mut settings = Settings::from_lookup(|_| None);
    settings.openrouter.api_key = Some("sk-or-test-key".to_string());
    // Nothing listens on port 1
    settings.openrouter.base_url = "http://127.0.0.1:1/api/v1".to_string();
    let provider = OpenRouterProvider::new(&settings.openrouter).unwrap();

    let err = provider
        .chat_complete(OpenAIRequest::user_prompt("openai/gpt-3.5-turbo", "hi"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Connection error.");
    assert_eq!(err.code(), Some(ECONNREFUSED));
}
