use crate::e2e::helpers;

use ai_chat_backend::error::{AUDIO_UNAVAILABLE_MESSAGE, GENERATION_FAILED_MESSAGE};
use helpers::assertions::{assert_audio_url, assert_chat_response};
use helpers::fakes::{Upstream, FAKE_AUDIO};
use helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_answer_with_text_language_and_audio(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/chat", &json!({ "message": "Hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.body.as_ref().unwrap();
    assert_chat_response(body, "Hi there", "en");
    assert!(body.get("error").is_none());
    let audio_url = response.str_field("audio_url").unwrap().to_string();
    assert_audio_url(&audio_url);

    assert_eq!(*ctx.upstream.prompts.lock(), vec!["Hello".to_string()]);
    assert_eq!(
        *ctx.upstream.tts_calls.lock(),
        vec![("Hi there".to_string(), "en".to_string())]
    );

    let audio = ctx.client.get(&audio_url).await.unwrap();
    audio.assert_status(StatusCode::OK);
    audio.assert_header("content-type", "audio/mpeg");
    assert_eq!(audio.body_bytes, FAKE_AUDIO.to_vec());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_missing_message(ctx: &TestContext) {
    for body in [json!({}), json!({ "message": "" }), json!({ "message": null, "file_id": "x.txt" })] {
        let response = ctx.client.post("/chat", &body).await.unwrap();

        response
            .assert_status(StatusCode::BAD_REQUEST)
            .assert_error_message("No message provided");
    }

    assert_eq!(ctx.upstream.generation_calls(), 0);
    assert!(ctx.upstream.tts_calls.lock().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_accept_whitespace_only_message(ctx: &TestContext) {
    let response = ctx
        .client
        .post("/chat", &json!({ "message": "   " }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_chat_response(response.body.as_ref().unwrap(), "Hi there", "en");
    assert_eq!(*ctx.upstream.prompts.lock(), vec!["   ".to_string()]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_body(ctx: &TestContext) {
    let response = ctx
        .client
        .post_raw("/chat", "application/json", "{not json")
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid request body");
    assert_eq!(ctx.upstream.generation_calls(), 0);
}

#[tokio::test]
async fn it_should_fail_with_language_when_generation_fails() {
    let ctx = TestContext::start(Upstream::healthy().with_generation_error("HTTP 503: overloaded")).await;

    let response = ctx
        .client
        .post("/chat", &json!({ "message": "Hello" }))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::INTERNAL_SERVER_ERROR)
        .assert_error_message(GENERATION_FAILED_MESSAGE);
    assert_eq!(response.str_field("language"), Some("en"));
    assert!(response.field("audio_url").is_none());
    assert!(response.field("response").is_none());
    // Upstream detail is not leaked
    assert!(!String::from_utf8_lossy(&response.body_bytes).contains("overloaded"));
    assert!(ctx.upstream.tts_calls.lock().is_empty());
}

#[tokio::test]
async fn it_should_return_text_without_audio_when_speech_fails() {
    let ctx = TestContext::start(Upstream::healthy().with_tts_error()).await;

    let response = ctx
        .client
        .post("/chat", &json!({ "message": "Hello" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_chat_response(response.body.as_ref().unwrap(), "Hi there", "en");
    assert!(response.field("audio_url").is_none());
    assert_eq!(response.str_field("error"), Some(AUDIO_UNAVAILABLE_MESSAGE));
}

#[tokio::test]
async fn it_should_fall_back_to_vietnamese_when_detection_fails() {
    let ctx = TestContext::start(Upstream::healthy().with_undetectable_language()).await;

    let response = ctx
        .client
        .post("/chat", &json!({ "message": "???" }))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_chat_response(response.body.as_ref().unwrap(), "Hi there", "vi");
    assert_eq!(ctx.upstream.tts_calls.lock()[0].1, "vi");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_include_uploaded_file_in_prompt(ctx: &TestContext) {
    let upload = ctx
        .client
        .upload("notes.txt", "Meeting at 10am\nBring slides".as_bytes())
        .await
        .unwrap();
    upload.assert_status(StatusCode::OK);
    let file_id = upload.str_field("filename").unwrap().to_string();

    let response = ctx
        .client
        .post(
            "/chat",
            &json!({ "message": "When is the meeting?", "file_id": file_id }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(
        *ctx.upstream.prompts.lock(),
        vec!["File content:\nMeeting at 10am\nBring slides\n\nUser message: When is the meeting?".to_string()]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ignore_unknown_file_reference(ctx: &TestContext) {
    let response = ctx
        .client
        .post(
            "/chat",
            &json!({ "message": "Hello", "file_id": "20240101_000000_000000_gone.txt" }),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(*ctx.upstream.prompts.lock(), vec!["Hello".to_string()]);
}
