//! LLM client tests with mocked network responses
//!
//! These tests use wiremock to mock the OpenAI-compatible and Ollama chat
//! endpoints and validate request shape, content handling and errors.

use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yojana::llm::ollama::OllamaClient;
use yojana::llm::openai::OpenAIClient;
use yojana::types::ChatMessage;
use yojana::utils::toml_config::LlmConfig;
use yojana::{ClientOptions, LLMClient, Planner, Provider};

// ============= Helper Functions =============

fn openai_completion(content: Option<&str>) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-4o-mini",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

fn ollama_chat(content: &str) -> serde_json::Value {
    json!({
        "model": "llama3.2",
        "created_at": "2024-01-01T00:00:00Z",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

fn openai_client(server: &MockServer) -> OpenAIClient {
    OpenAIClient::new(
        "sk-test".to_string(),
        format!("{}/v1", server.uri()),
        "gpt-4o-mini".to_string(),
    )
}

// ============= OpenAI =============

#[tokio::test]
async fn test_openai_complete_sends_messages_with_bearer_auth() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "messages": [{ "role": "user", "content": "你好" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_completion(Some("您好！"))))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server);
    let reply = client.complete(&[ChatMessage::user("你好")]).await.unwrap();
    assert_eq!(reply.as_deref(), Some("您好！"));
}

#[tokio::test]
async fn test_openai_null_content_is_none() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_completion(None)))
        .mount(&server)
        .await;

    let client = openai_client(&server);
    assert_eq!(client.complete(&[ChatMessage::user("hi")]).await.unwrap(), None);
    assert_eq!(client.generate("hi").await.unwrap(), "");
}

#[tokio::test]
async fn test_openai_sends_temperature_option() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "temperature": 0.0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(openai_completion(Some("ok"))))
        .expect(1)
        .mount(&server)
        .await;

    let client = openai_client(&server)
        .with_options(&ClientOptions {
            temperature: Some(0.0),
            timeout: Some(Duration::from_secs(5)),
        })
        .unwrap();

    assert_eq!(client.generate("hi").await.unwrap(), "ok");
}

#[tokio::test]
async fn test_openai_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let err = openai_client(&server).generate("hi").await.unwrap_err();
    assert!(err.to_string().contains("500"));
}

#[tokio::test]
async fn test_openai_no_choices_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    assert!(openai_client(&server).generate("hi").await.is_err());
}

// ============= Ollama =============

#[tokio::test]
async fn test_ollama_complete_non_streaming() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({ "model": "llama3.2", "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_chat("Hello from Ollama")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "llama3.2".to_string());
    assert_eq!(client.generate("hi").await.unwrap(), "Hello from Ollama");
    assert_eq!(client.model_name(), "llama3.2");
}

#[tokio::test]
async fn test_ollama_not_found_model() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "error": "model 'nope' not found" })),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::new(server.uri(), "nope".to_string());
    let err = client.generate("hi").await.unwrap_err();
    assert!(err.to_string().contains("not found"));
}

// ============= Provider & Planner =============

#[test]
fn test_provider_from_ollama_config() {
    let config = LlmConfig::Ollama {
        base_url: "http://localhost:11434".to_string(),
        model: "qwen2.5:7b".to_string(),
        temperature: None,
        timeout_secs: None,
    };

    let provider = Provider::from_config(&config).unwrap();
    assert_eq!(provider.name(), "Ollama");
    assert_eq!(provider.model(), "qwen2.5:7b");
}

#[test]
fn test_provider_missing_api_key() {
    let config = LlmConfig::OpenAI {
        api_key_env: "YOJANA_TEST_UNSET_LLM_KEY".to_string(),
        api_base: "https://api.openai.com/v1".to_string(),
        model: "gpt-4o-mini".to_string(),
        temperature: None,
        timeout_secs: None,
    };

    assert!(Provider::from_config(&config).is_err());
}

#[tokio::test]
async fn test_planner_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(ollama_chat(
            "```python\n[\"搜索英伟达最新发布\", \"整理型号信息\"]\n```",
        )))
        .mount(&server)
        .await;

    let provider = Provider::Ollama {
        base_url: server.uri(),
        model: "llama3.2".to_string(),
    };
    let planner = Planner::new(provider.create_client().unwrap());

    let plan = planner.plan("英伟达最新的GPU型号是什么").await;
    assert_eq!(plan.steps(), ["搜索英伟达最新发布", "整理型号信息"]);
}
