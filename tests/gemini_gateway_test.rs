use anyhow::Result;
use catalog_relay::domain::model::Envelope;
use catalog_relay::domain::ports::InferenceGateway;
use catalog_relay::utils::error::ErrorCategory;
use catalog_relay::{AskHandler, CatalogStore, GeminiGateway, PromptComposer};
use httpmock::prelude::*;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

fn gateway_for(server: &MockServer, timeout: Duration) -> GeminiGateway {
    GeminiGateway::new("test-key", "gemini-2.0-flash", &server.base_url(), timeout).unwrap()
}

#[tokio::test]
async fn test_generate_returns_candidate_text() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .header("x-goog-api-key", "test-key")
            .body_contains("Tell me about Go Pro");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "Go Pro costs AUD $5999."}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 10, "candidatesTokenCount": 6, "totalTokenCount": 16}
            }));
    });

    let gateway = gateway_for(&server, Duration::from_secs(5));
    let answer = gateway.generate("Tell me about Go Pro").await?;

    api_mock.assert();
    assert_eq!(answer, "Go Pro costs AUD $5999.");
    Ok(())
}

#[tokio::test]
async fn test_api_error_message_is_surfaced() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(400)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "error": {
                    "code": 400,
                    "message": "API key not valid. Please pass a valid API key.",
                    "status": "INVALID_ARGUMENT"
                }
            }));
    });

    let gateway = gateway_for(&server, Duration::from_secs(5));
    let err = gateway.generate("hello").await.unwrap_err();

    api_mock.assert();
    assert_eq!(err.category(), ErrorCategory::Gateway);
    assert_eq!(err.status_code(), 500);
    assert!(err
        .to_string()
        .contains("API key not valid. Please pass a valid API key."));
    assert!(err.to_string().contains("400"));
    Ok(())
}

#[tokio::test]
async fn test_non_json_error_body_is_kept() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(503).body("upstream unavailable");
    });

    let gateway = gateway_for(&server, Duration::from_secs(5));
    let err = gateway.generate("hello").await.unwrap_err();

    assert!(err.to_string().contains("upstream unavailable"));
    Ok(())
}

#[tokio::test]
async fn test_timeout_is_gateway_error() -> Result<()> {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(GENERATE_PATH);
        then.status(200)
            .delay(Duration::from_secs(3))
            .json_body(json!({"candidates": []}));
    });

    let gateway = gateway_for(&server, Duration::from_millis(300));
    let err = gateway.generate("hello").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::Gateway);
    Ok(())
}

/// 端到端：處理器經由真實的 Gemini adapter 呼叫 mock server 恰好一次
#[tokio::test]
async fn test_handler_calls_gemini_once_per_request() -> Result<()> {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(POST)
            .path(GENERATE_PATH)
            .body_contains("Basic Website Start-Up")
            .body_contains("What packages do you offer?");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "Hello"}]}}]
            }));
    });

    let store = CatalogStore::builtin()?;
    let handler = AskHandler::new(
        PromptComposer::new(Arc::new(store)),
        gateway_for(&server, Duration::from_secs(5)),
        "pds",
        "concise",
    );

    let outcome = handler
        .handle(br#"{"question": "What packages do you offer?"}"#)
        .await;

    api_mock.assert_hits(1);
    assert_eq!(outcome.status, 200);
    assert_eq!(
        outcome.envelope,
        Envelope::answered("What packages do you offer?".into(), "Hello".into())
    );

    // 驗證失敗的請求不會打到模型
    let outcome = handler.handle(br#"{"question": 12}"#).await;
    assert_eq!(outcome.status, 400);
    api_mock.assert_hits(1);
    Ok(())
}
