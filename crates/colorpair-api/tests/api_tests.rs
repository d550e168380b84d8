//! API integration tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use colorpair_api::{create_router, ApiConfig, AppState};
use colorpair_gemini::{ColorAdvisor, GeminiError, GeminiResult, InlineImage};
use colorpair_models::{ColorSuggestion, GarmentType};

const BOUNDARY: &str = "colorpair-test-boundary";

/// What the scripted advisor answers with.
enum Reply {
    Text(String),
    Fail { status: u16, body: String },
}

/// Advisor that returns a canned reply and records what it was asked.
struct ScriptedAdvisor {
    reply: Reply,
    calls: Mutex<Vec<(String, usize, GarmentType)>>,
}

impl ScriptedAdvisor {
    fn text(text: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Text(text.into()),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn failing(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Reply::Fail {
                status,
                body: body.to_string(),
            },
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(String, usize, GarmentType)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ColorAdvisor for ScriptedAdvisor {
    fn model_name(&self) -> &str {
        "scripted"
    }

    async fn suggest_colors(
        &self,
        image: &InlineImage,
        garment: &GarmentType,
    ) -> GeminiResult<String> {
        self.calls
            .lock()
            .unwrap()
            .push((image.mime_type.clone(), image.len(), garment.clone()));
        match &self.reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail { status, body } => Err(GeminiError::Api {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn test_router(advisor: Arc<ScriptedAdvisor>) -> Router {
    test_router_with_config(ApiConfig::default(), advisor)
}

fn test_router_with_config(config: ApiConfig, advisor: Arc<ScriptedAdvisor>) -> Router {
    let state = AppState::new(config, advisor);
    create_router(state, None)
}

/// A multipart part: field name, file content type (files only), payload.
struct FormPart<'a> {
    name: &'a str,
    content_type: Option<&'a str>,
    data: &'a [u8],
}

fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part.content_type {
            Some(ct) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"upload.bin\"\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", ct).as_bytes());
            }
            None => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                        part.name
                    )
                    .as_bytes(),
                );
            }
        }
        body.extend_from_slice(part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn analyze_request(parts: &[FormPart<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/analyze-image")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn image_upload<'a>(content_type: &'a str, image_type: &'a str) -> Vec<FormPart<'a>> {
    vec![
        FormPart {
            name: "image",
            content_type: Some(content_type),
            data: &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A],
        },
        FormPart {
            name: "image_type",
            content_type: None,
            data: image_type.as_bytes(),
        },
    ]
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

fn five_colors() -> String {
    serde_json::json!([
        { "ColorName": "Navy Blue", "hexCode": "#000080", "description": "Deep blue" },
        { "ColorName": "Burgundy", "hexCode": "#800020", "description": "Rich red" },
        { "ColorName": "Forest Green", "hexCode": "#228B22", "description": "Earthy" },
        { "ColorName": "Camel", "hexCode": "#C19A6B", "description": "Warm neutral" },
        { "ColorName": "Ivory", "hexCode": "#FFFFF0", "description": "Off-white" }
    ])
    .to_string()
}

/// Test health endpoint.
#[tokio::test]
async fn test_health_endpoint() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let (status, body) = send(
        app,
        Request::builder().uri("/health").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_ready_reports_model() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let (status, body) = send(
        app,
        Request::builder().uri("/ready").body(Body::empty()).unwrap(),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
    assert_eq!(body["model"], "scripted");
}

#[tokio::test]
async fn test_analyze_success() {
    let advisor = ScriptedAdvisor::text(five_colors());
    let app = test_router(advisor.clone());

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0]["ColorName"], "Navy Blue");
    assert_eq!(data[4]["hexCode"], "#FFFFF0");

    let calls = advisor.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "image/png");
    assert_eq!(calls[0].1, 6);
    assert_eq!(calls[0].2, GarmentType::Top);
}

#[tokio::test]
async fn test_analyze_pads_short_reply() {
    let reply = r##"[{"ColorName":"A","hexCode":"#111111","description":"d"}]"##;
    let app = test_router(ScriptedAdvisor::text(reply));

    let (status, body) = send(app, analyze_request(&image_upload("image/jpeg", "bottom"))).await;

    assert_eq!(status, StatusCode::OK);
    let data: Vec<ColorSuggestion> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(data.len(), 5);
    assert_eq!(data[0], ColorSuggestion::new("A", "#111111", "d"));
    assert!(data[1..].iter().all(|s| *s == ColorSuggestion::filler()));
}

#[tokio::test]
async fn test_analyze_recovers_fenced_reply() {
    let reply = format!("Sure! Here you go:\n```json\n{}\n```", five_colors());
    let app = test_router(ScriptedAdvisor::text(reply));

    let (status, body) = send(app, analyze_request(&image_upload("image/webp", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"][2]["ColorName"], "Forest Green");
}

#[tokio::test]
async fn test_analyze_rejects_non_image() {
    let advisor = ScriptedAdvisor::text(five_colors());
    let app = test_router(advisor.clone());

    let (status, body) = send(
        app,
        analyze_request(&image_upload("application/pdf", "top")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Uploaded file must be an image");
    assert!(advisor.calls().is_empty());
}

#[tokio::test]
async fn test_non_image_rejected_before_missing_image_type() {
    let advisor = ScriptedAdvisor::text(five_colors());
    let app = test_router(advisor.clone());
    let parts = vec![FormPart {
        name: "image",
        content_type: Some("text/plain"),
        data: b"not an image",
    }];

    let (status, body) = send(app, analyze_request(&parts)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Uploaded file must be an image");
    assert!(advisor.calls().is_empty());
}

#[tokio::test]
async fn test_oversized_upload_is_payload_too_large() {
    let advisor = ScriptedAdvisor::text(five_colors());
    let config = ApiConfig {
        max_body_size: 256,
        ..ApiConfig::default()
    };
    let app = test_router_with_config(config, advisor.clone());
    let image = vec![0xFFu8; 4096];
    let parts = vec![
        FormPart {
            name: "image_type",
            content_type: None,
            data: b"top",
        },
        FormPart {
            name: "image",
            content_type: Some("image/jpeg"),
            data: &image,
        },
    ];

    let (status, body) = send(app, analyze_request(&parts)).await;

    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["detail"].is_string());
    assert!(advisor.calls().is_empty());
}

#[tokio::test]
async fn test_upload_within_limit_is_accepted() {
    let config = ApiConfig {
        max_body_size: 4096,
        ..ApiConfig::default()
    };
    let app = test_router_with_config(config, ScriptedAdvisor::text(five_colors()));

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_analyze_rejects_upload_without_content_type() {
    let app = test_router(ScriptedAdvisor::text(five_colors()));
    let parts = vec![
        FormPart {
            name: "image",
            content_type: None,
            data: b"raw bytes",
        },
        FormPart {
            name: "image_type",
            content_type: None,
            data: b"top",
        },
    ];

    let (status, _) = send(app, analyze_request(&parts)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analyze_missing_image_type() {
    let app = test_router(ScriptedAdvisor::text(five_colors()));
    let parts = vec![FormPart {
        name: "image",
        content_type: Some("image/png"),
        data: b"png",
    }];

    let (status, body) = send(app, analyze_request(&parts)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("image_type"));
}

#[tokio::test]
async fn test_analyze_missing_image() {
    let app = test_router(ScriptedAdvisor::text(five_colors()));
    let parts = vec![FormPart {
        name: "image_type",
        content_type: None,
        data: b"top",
    }];

    let (status, _) = send(app, analyze_request(&parts)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_analyze_forwards_unknown_image_type() {
    let advisor = ScriptedAdvisor::text(five_colors());
    let app = test_router(advisor.clone());

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "scarf"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        advisor.calls()[0].2,
        GarmentType::Other("scarf".to_string())
    );
}

#[tokio::test]
async fn test_advisor_failure_is_error_body() {
    let app = test_router(ScriptedAdvisor::failing(503, "model overloaded"));

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("503"));
    assert!(message.contains("model overloaded"));
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_unparseable_reply_is_error_body() {
    let app = test_router(ScriptedAdvisor::text(
        "This image does not appear to be clothing.",
    ));

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert_eq!(
        body["message"],
        "Could not parse AI response into valid JSON format"
    );
}

#[tokio::test]
async fn test_object_reply_is_error_body() {
    let app = test_router(ScriptedAdvisor::text(r#"{"colors": []}"#));

    let (status, body) = send(app, analyze_request(&image_upload("image/png", "top"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "error");
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Invalid response format: expected a list"));
}

/// Test CORS headers.
#[tokio::test]
async fn test_cors_preflight_allows_frontend_origin() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .method("OPTIONS")
                .uri("/analyze-image")
                .header("Origin", "http://localhost:3000")
                .header("Access-Control-Request-Method", "POST")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        response.status() == StatusCode::OK || response.status() == StatusCode::NO_CONTENT
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "http://localhost:3000"
    );
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-credentials")
            .unwrap(),
        "true"
    );
}

/// Test security and request ID headers.
#[tokio::test]
async fn test_response_headers() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "req-12345")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
    assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
    assert_eq!(headers.get("X-Request-ID").unwrap(), "req-12345");
}

#[tokio::test]
async fn test_request_id_generated_when_absent() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let response = app
        .oneshot(Request::builder().uri("/ready").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let id = response.headers().get("X-Request-ID").unwrap();
    assert!(uuid::Uuid::parse_str(id.to_str().unwrap()).is_ok());
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let app = test_router(ScriptedAdvisor::text("[]"));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/metrics")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
