//! End-to-end tests for the upload flow using mocked provider backends.
//!
//! A wiremock server stands in for the transcription and chat-completion
//! APIs; requests are driven straight into the router with `oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::util::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley_gateway::routes::create_router;
use parley_gateway::{AppState, ServerConfig};

const BOUNDARY: &str = "test-boundary-7MA4YWxkTrZu0gW";

fn test_config(deepgram_url: &str, openai_url: &str) -> ServerConfig {
    ServerConfig {
        deepgram_api_key: Some("test_deepgram_key".to_string()),
        openai_api_key: Some("test_openai_key".to_string()),
        deepgram_base_url: Some(deepgram_url.to_string()),
        openai_base_url: Some(openai_url.to_string()),
        ..ServerConfig::default()
    }
}

async fn test_router() -> (axum::Router, MockServer, MockServer) {
    let deepgram = MockServer::start().await;
    let openai = MockServer::start().await;
    let config = test_config(&deepgram.uri(), &openai.uri());
    let state = Arc::new(AppState::new(config).expect("state construction failed"));
    (create_router(state), deepgram, openai)
}

/// Build a multipart/form-data body. Each field is (name, filename, content).
fn multipart_body(fields: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, filename, content) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\r\n"
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
            ),
        }
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(fields: &[(&str, Option<&str>, &[u8])]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields)))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn completion_response(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{"message": {"role": "assistant", "content": content}}]
    }))
}

fn transcription_response(transcript: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "results": {"channels": [{"alternatives": [{
            "transcript": "unformatted",
            "confidence": 0.99,
            "paragraphs": {"transcript": transcript}
        }]}]}
    }))
}

fn wav_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&[0x24, 0x00, 0x00, 0x00]);
    bytes.extend_from_slice(b"WAVEfmt ");
    bytes.resize(64, 0);
    bytes
}

#[tokio::test]
async fn test_ajax_text_upload_returns_formatted_insight() {
    let (router, _deepgram, openai) = test_router().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_response(
            "[Speaker_1] is upbeat. [Speaker_2] sounds tired.",
        ))
        .expect(1)
        .mount(&openai)
        .await;

    let response = router
        .oneshot(upload_request(&[
            (
                "file",
                Some("chat.txt"),
                b"Speaker 1: great day!\nSpeaker 2: I guess.".as_slice(),
            ),
            ("__ajax", None, b"true"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(
        json["msg"],
        "[Speaker_1] is upbeat.\n[Speaker_2] sounds tired."
    );
}

#[tokio::test]
async fn test_audio_upload_is_transcribed_before_analysis() {
    let (router, deepgram, openai) = test_router().await;
    Mock::given(method("POST"))
        .and(path("/v1/listen"))
        .respond_with(transcription_response(
            "Speaker 0: hello there\nSpeaker 1: hi",
        ))
        .expect(1)
        .mount(&deepgram)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_response("[Speaker_1] is friendly."))
        .expect(1)
        .mount(&openai)
        .await;

    let response = router
        .oneshot(upload_request(&[
            ("file", Some("call.wav"), &wav_bytes()),
            ("__ajax", None, b"true"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["msg"], "[Speaker_1] is friendly.");
}

#[tokio::test]
async fn test_non_ajax_upload_redirects_to_result_page() {
    let (router, _deepgram, openai) = test_router().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(completion_response("[Speaker_1] is content."))
        .mount(&openai)
        .await;

    let response = router
        .oneshot(upload_request(&[(
            "file",
            Some("chat.txt"),
            b"Speaker 1: all good".as_slice(),
        )]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(location.starts_with("/result/"), "got location {location}");
}

#[tokio::test]
async fn test_result_page_renders_line_breaks() {
    let (router, _deepgram, _openai) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/result/first%20line%0Asecond%20line")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("first line<br />second line"));
}

#[tokio::test]
async fn test_missing_file_is_a_generic_error_message() {
    let (router, _deepgram, _openai) = test_router().await;

    let response = router
        .oneshot(upload_request(&[("__ajax", None, b"true")]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert!(json["msg"].as_str().unwrap().contains("no file uploaded"));
}

#[tokio::test]
async fn test_upstream_failure_reports_error_status() {
    let (router, _deepgram, openai) = test_router().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "context too long", "type": "invalid_request_error"}
        })))
        .mount(&openai)
        .await;

    let response = router
        .oneshot(upload_request(&[
            ("file", Some("chat.txt"), b"Speaker 1: hi".as_slice()),
            ("__ajax", None, b"true"),
        ]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
}

#[tokio::test]
async fn test_index_serves_upload_form() {
    let (router, _deepgram, _openai) = test_router().await;

    let response = router
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("multipart/form-data"));
}
