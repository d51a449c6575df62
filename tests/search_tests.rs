//! Search tool integration tests with a mocked SerpApi endpoint
//!
//! These tests use wiremock to stand in for SerpApi and validate:
//! - Request parameters (engine, locale, key)
//! - The answer extraction order
//! - Error handling

use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use yojana::tools::search::{SearchTool, SerpApiBackend};
use yojana::utils::toml_config::SearchConfig;

// ============= Helper Functions =============

fn search_config(server: &MockServer) -> SearchConfig {
    SearchConfig {
        base_url: format!("{}/search", server.uri()),
        ..Default::default()
    }
}

fn search_tool(server: &MockServer) -> SearchTool {
    let config = search_config(server);
    SearchTool::new(
        Arc::new(SerpApiBackend::new(config.base_url.clone())),
        config,
        Some("test-key".to_string()),
    )
}

fn organic(count: usize) -> Vec<serde_json::Value> {
    (1..=count)
        .map(|i| {
            json!({
                "position": i,
                "title": format!("结果{}", i),
                "link": format!("https://example.com/{}", i),
                "snippet": format!("摘要{}", i)
            })
        })
        .collect()
}

// ============= Tests =============

#[tokio::test]
async fn test_request_carries_locale_and_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("engine", "google"))
        .and(query_param("q", "英伟达最新的GPU型号是什么"))
        .and(query_param("gl", "cn"))
        .and(query_param("hl", "zh-cn"))
        .and(query_param("api_key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "answer_box": { "answer": "GeForce RTX 5090" } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("英伟达最新的GPU型号是什么").await;
    assert_eq!(answer, "GeForce RTX 5090");
}

#[tokio::test]
async fn test_direct_answers_take_priority() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer_box_list": ["北京今天晴", "最高气温 25°C"],
            "answer_box": { "answer": "晴" },
            "knowledge_graph": { "description": "北京是中国的首都" },
            "organic_results": organic(2)
        })))
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("北京天气").await;
    assert_eq!(answer, "北京今天晴\n最高气温 25°C");
}

#[tokio::test]
async fn test_knowledge_graph_before_organic_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "knowledge_graph": { "title": "Rust", "description": "A systems programming language" },
            "organic_results": organic(3)
        })))
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("Rust").await;
    assert_eq!(answer, "A systems programming language");
}

#[tokio::test]
async fn test_organic_results_are_capped_at_three() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "organic_results": organic(5) })),
        )
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("q").await;
    assert_eq!(
        answer,
        "[1] 结果1\n摘要1\n\n[2] 结果2\n摘要2\n\n[3] 结果3\n摘要3"
    );
}

#[tokio::test]
async fn test_unrecognised_response_reports_no_information() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "search_metadata": { "status": "Success" },
            "error": "Google hasn't returned any results for this query."
        })))
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("zzqxj").await;
    assert_eq!(answer, "Sorry, no information found for zzqxj");
}

#[tokio::test]
async fn test_http_error_becomes_text() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Invalid API key." })),
        )
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("q").await;
    assert!(answer.starts_with("Search error: "), "got {:?}", answer);
    assert!(answer.contains("Invalid API key."));
}

#[tokio::test]
async fn test_missing_key_skips_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let config = search_config(&server);
    let tool = SearchTool::new(
        Arc::new(SerpApiBackend::new(config.base_url.clone())),
        config,
        None,
    );

    assert_eq!(
        tool.search("q").await,
        "Error: SERPAPI_API_KEY is not configured"
    );
}

#[tokio::test]
async fn test_search_via_registry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "answer_box": { "answer": "42" } })),
        )
        .mount(&server)
        .await;

    let mut registry = yojana::ToolRegistry::new();
    registry.register_tool(Arc::new(search_tool(&server))).unwrap();

    assert_eq!(registry.execute("Search", "answer").await.unwrap(), "42");
}

#[tokio::test]
async fn test_misshapen_answer_box_falls_back_to_organic_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer_box": [{ "type": "organic_result", "title": "carousel" }],
            "organic_results": organic(1)
        })))
        .mount(&server)
        .await;

    let answer = search_tool(&server).search("q").await;
    assert_eq!(answer, "[1] 结果1\n摘要1");
}
