mod common;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use common::{file_part, TestApp, MP3_BYTES};
use gateway_service::models::Part;
use gateway_service::services::providers::mock::MockProvider;
use reqwest::multipart::Form;
use serde_json::json;
use std::sync::Arc;

#[tokio::test]
async fn text_audio_forwards_text_and_encoded_audio() {
    let provider = Arc::new(MockProvider::replying("A short jingle."));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "what is playing?")
        .part("audio", file_part(MP3_BYTES, "song.mp3"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 200);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "response": "A short jingle." }));

    assert_eq!(
        provider.requests().await[0].parts(),
        &[
            Part::Text("what is playing?".to_string()),
            Part::InlineData {
                media_type: "audio/mpeg".to_string(),
                data: STANDARD.encode(MP3_BYTES),
            },
        ]
    );
}

#[tokio::test]
async fn m4a_is_sent_as_audio_mp4() {
    let provider = Arc::new(MockProvider::replying("ok"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "transcribe")
        .part("audio", file_part(b"\x00\x00\x00\x20ftypM4A ", "memo.m4a"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 200);
    match &provider.requests().await[0].parts()[1] {
        Part::InlineData { media_type, .. } => assert_eq!(media_type, "audio/mp4"),
        other => panic!("expected inline data, got {:?}", other),
    }
}

#[tokio::test]
async fn wrong_extension_is_rejected_before_generation() {
    let provider = Arc::new(MockProvider::replying("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "what is playing?")
        .part("audio", file_part(MP3_BYTES, "clip.txt"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body, json!({ "error": "Unsupported audio format: text/plain" }));
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn image_file_on_audio_endpoint_is_rejected() {
    let provider = Arc::new(MockProvider::replying("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "what is playing?")
        .part("audio", file_part(b"\x89PNG", "cover.png"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Unsupported audio format: image/png");
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn image_field_does_not_satisfy_audio_endpoint() {
    let provider = Arc::new(MockProvider::replying("unused"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "what is playing?")
        .part("image", file_part(MP3_BYTES, "song.mp3"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 422);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["error"], "Missing required field: audio");
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn provider_failure_returns_500() {
    let provider = Arc::new(MockProvider::failing("upstream timeout"));
    let app = TestApp::spawn(provider.clone()).await;

    let form = Form::new()
        .text("text", "what is playing?")
        .part("audio", file_part(MP3_BYTES, "song.mp3"));
    let response = app.post_form("/text-audio", form).await;

    assert_eq!(response.status().as_u16(), 500);
    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body["error"]
        .as_str()
        .expect("error field")
        .contains("upstream timeout"));
}
