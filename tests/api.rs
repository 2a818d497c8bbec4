//! End-to-end tests of the HTTP surface with a scripted model backend.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use goal_tasks::api::{router, AppState};
use goal_tasks::generation::{GenerationSettings, TaskGenerator};
use goal_tasks::llm::{
    ChatMessage, ChatOptions, ChatResponse, LlmClient, LlmError, LlmProvider,
};
use goal_tasks::Config;

struct FakeBackend {
    replies: Mutex<VecDeque<String>>,
    calls: Mutex<usize>,
}

impl FakeBackend {
    fn new(replies: Vec<String>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(0),
        })
    }

    fn calls(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl LlmClient for FakeBackend {
    async fn chat_completion(
        &self,
        model: &str,
        _messages: &[ChatMessage],
        _options: ChatOptions,
    ) -> Result<ChatResponse, LlmError> {
        *self.calls.lock().unwrap() += 1;
        let reply = self.replies.lock().unwrap().pop_front();
        match reply {
            Some(content) => Ok(ChatResponse {
                content: Some(content),
                finish_reason: Some("stop".to_string()),
                usage: None,
                model: Some(model.to_string()),
            }),
            None => Err(LlmError::server_error(500, "no more replies".to_string())),
        }
    }
}

struct FakeProvider(Option<Arc<FakeBackend>>);

impl LlmProvider for FakeProvider {
    fn client(&self) -> Result<Arc<dyn LlmClient>, LlmError> {
        self.0
            .clone()
            .map(|b| b as Arc<dyn LlmClient>)
            .ok_or_else(|| LlmError::missing_credential("OPENAI_API_KEY is not set".to_string()))
    }
}

fn app(backend: Option<Arc<FakeBackend>>) -> axum::Router {
    let config = Config::new("gpt-test");
    let generator = TaskGenerator::new(
        Arc::new(FakeProvider(backend)),
        GenerationSettings::from_config(&config),
    );
    router(Arc::new(AppState { config, generator }))
}

fn task_list(n: usize) -> String {
    let items: Vec<Value> = (1..=n)
        .map(|i| json!({"description": format!(" Day {} ", i), "instructions": format!(" Do thing {} ", i)}))
        .collect();
    serde_json::to_string(&items).unwrap()
}

fn post_json(body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/api/generate-tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn generates_exact_task_list() {
    let backend = FakeBackend::new(vec![task_list(5)]);
    let (status, body) = send(
        app(Some(Arc::clone(&backend))),
        post_json(json!({"goalDescription": "Learn basic guitar", "durationDays": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 5);
    assert_eq!(tasks[0], json!({"description": "Day 1", "instructions": "Do thing 1"}));
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn retries_until_count_matches() {
    let backend = FakeBackend::new(vec![task_list(4), task_list(4), task_list(5)]);
    let (status, body) = send(
        app(Some(Arc::clone(&backend))),
        post_json(json!({"goalDescription": "Learn basic guitar", "durationDays": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["tasks"].as_array().unwrap().len(), 5);
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn exhausted_retries_return_bad_gateway() {
    let backend = FakeBackend::new(vec![
        "nope".to_string(),
        "still nope".to_string(),
        "```\nnot json\n```".to_string(),
    ]);
    let (status, body) = send(
        app(Some(Arc::clone(&backend))),
        post_json(json!({"goalDescription": "Learn basic guitar", "durationDays": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "retries_exhausted");
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("could not generate exactly 5 tasks"));
    assert_eq!(body["details"], "```\nnot json\n```");
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn upstream_failure_details_carry_backend_body() {
    let backend = FakeBackend::new(vec![]);
    let (status, body) = send(
        app(Some(Arc::clone(&backend))),
        post_json(json!({"goalDescription": "Learn basic guitar", "durationDays": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["kind"], "retries_exhausted");
    assert_eq!(body["details"], "no more replies");
    assert_eq!(backend.calls(), 3);
}

#[tokio::test]
async fn invalid_input_is_rejected_without_calls() {
    let backend = FakeBackend::new(vec![task_list(1)]);
    for body in [
        json!({"goalDescription": "Learn basic guitar"}),
        json!({"goalDescription": "Learn basic guitar", "durationDays": 0}),
        json!({"goalDescription": "Learn basic guitar", "durationDays": "soon"}),
        json!({"goalDescription": "", "durationDays": 3}),
    ] {
        let (status, response) = send(app(Some(Arc::clone(&backend))), post_json(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(response["kind"], "invalid_input");
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn unparseable_body_is_invalid_input() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/generate-tasks")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{goalDescription:"))
        .unwrap();
    let (status, body) = send(app(None), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "invalid_input");
}

#[tokio::test]
async fn missing_credential_is_service_unavailable() {
    let (status, body) = send(
        app(None),
        post_json(json!({"goalDescription": "Learn basic guitar", "durationDays": 5})),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "backend_unavailable");
}

#[tokio::test]
async fn preflight_is_permissive() {
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/generate-tasks")
        .header(header::ORIGIN, "https://app.example.com")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(
            header::ACCESS_CONTROL_REQUEST_HEADERS,
            "authorization, x-client-info, apikey, content-type",
        )
        .body(Body::empty())
        .unwrap();
    let response = app(None).oneshot(request).await.unwrap();

    assert!(response.status().is_success());
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}

#[tokio::test]
async fn health_reports_model() {
    let request = Request::builder()
        .uri("/api/health")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(None), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model"], "gpt-test");
    assert_eq!(body["max_attempts"], 3);
}
