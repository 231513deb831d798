mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

use common::{router, FakeLlm, FakeWeather};

async fn body_string(response: axum::response::Response) -> String {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    String::from_utf8(body.to_vec()).expect("response body was not utf-8")
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/chat")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

fn json_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/v1/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("failed to build request")
}

#[tokio::test]
async fn index_serves_the_chat_page() {
    let app = router(Arc::new(FakeWeather::new()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains(r#"name="mensagem""#));
    assert!(html.contains(r#"hx-post="/chat""#));
}

#[tokio::test]
async fn chat_form_renders_reply_fragment() {
    let app = router(
        Arc::new(FakeWeather::new()),
        Arc::new(FakeLlm::new("Vai estar sol em Aveiro.")),
    );

    let resp = app
        .oneshot(form_request("mensagem=tempo+em+aveiro+com+mapa+%3Cb%3E"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("Vai estar sol em Aveiro."));
    assert!(html.contains("tempo em aveiro com mapa &lt;b&gt;"));
    assert!(html.contains("L.map("));
    assert!(!html.contains("Plotly.newPlot"));
}

#[tokio::test]
async fn chat_form_without_field_asks_for_a_message() {
    let app = router(Arc::new(FakeWeather::new()), Arc::new(FakeLlm::new("")));

    let resp = app.oneshot(form_request("")).await.expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("não recebi nenhuma mensagem"));
}

#[tokio::test]
async fn chat_form_apologises_when_upstream_fails() {
    let app = router(Arc::new(FakeWeather::failing()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(form_request("mensagem=tempo+em+aveiro"))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let html = body_string(resp).await;
    assert!(html.contains("ocorreu um erro ao obter a previsão"));
}

#[tokio::test]
async fn chat_api_returns_reply_json() {
    let app = router(
        Arc::new(FakeWeather::new()),
        Arc::new(FakeLlm::new("Céu limpo em Lisboa.")),
    );

    let resp = app
        .oneshot(json_request(serde_json::json!({
            "message": "Previsão do tempo em Lisboa com gráfico"
        })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["reply"], "Céu limpo em Lisboa.");
    assert_eq!(body["user_message"], "Previsão do tempo em Lisboa com gráfico");
    assert!(body["chart_html"].as_str().unwrap().contains("Plotly.newPlot"));
    assert!(body["map_html"].is_null());
    assert!(body["generated_at"].is_string());
}

#[tokio::test]
async fn chat_api_rejects_empty_message() {
    let app = router(Arc::new(FakeWeather::new()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(json_request(serde_json::json!({ "message": "  " })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION");
}

#[tokio::test]
async fn chat_api_maps_upstream_failure_to_bad_gateway() {
    let app = router(Arc::new(FakeWeather::failing()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(json_request(serde_json::json!({ "message": "tempo em faro" })))
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["error"]["code"], "BAD_GATEWAY");
}

#[tokio::test]
async fn health_reports_version() {
    let app = router(Arc::new(FakeWeather::new()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn ready_when_model_installed() {
    let app = router(Arc::new(FakeWeather::new()), Arc::new(FakeLlm::new("")));

    let resp = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["status"], "ready");
    assert_eq!(body["model"], "mistral:latest");
}

#[tokio::test]
async fn not_ready_without_model_or_runtime() {
    let mut llm = FakeLlm::new("");
    llm.installed = false;
    let app = router(Arc::new(FakeWeather::new()), Arc::new(llm));

    let resp = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["ollama"], "connected");
    assert_eq!(body["model_installed"], false);

    let mut llm = FakeLlm::new("");
    llm.reachable = false;
    let app = router(Arc::new(FakeWeather::new()), Arc::new(llm));

    let resp = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .expect("request failed");

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(body["ollama"], "disconnected");
}
