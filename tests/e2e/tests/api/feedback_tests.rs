//! Feedback ingestion and listing

use axum::http::StatusCode;
use feedlens_core::{FeedbackRecord, SafetyPolicy, DEFAULT_PRODUCT};
use feedlens_e2e_tests::{fixtures, ScriptedModel, TestApp};
use serde_json::json;

// ============================================================================
// INGESTION
// ============================================================================

#[tokio::test]
async fn test_submit_persists_one_record_matching_response() {
    let app = TestApp::new(ScriptedModel::always(fixtures::analysis_reply(
        "es",
        "The product is excellent",
        "positive",
    )));

    let response = app
        .post_json(
            "/api/feedback",
            json!({ "text": "El producto es excelente", "product": "acme" }),
        )
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["original"], "El producto es excelente");
    assert_eq!(response.body["translated"], "The product is excellent");
    assert_eq!(response.body["sentiment"], "positive");
    assert_eq!(response.body["language"], "es");
    assert_eq!(response.body["product"], "acme");
    assert_eq!(app.stored_count(), 1);

    let id = response.body["id"].as_i64().expect("id should be an integer");
    let stored = app
        .storage
        .get_feedback(id)
        .unwrap()
        .expect("record should be stored under the returned id");
    assert_eq!(stored.text_original, "El producto es excelente");
    assert_eq!(stored.text_translated, "The product is excellent");
    assert_eq!(stored.product, "acme");
}

#[tokio::test]
async fn test_submit_uses_unfiltered_analysis_request() {
    let app = TestApp::new(ScriptedModel::always(fixtures::analysis_reply(
        "en", "meh", "neutral",
    )));

    app.post_json("/api/feedback", json!({ "text": "meh" })).await;

    let requests = app.model.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].safety, SafetyPolicy::Unfiltered);
    assert!(requests[0].prompt.contains("meh"));
}

#[tokio::test]
async fn test_submit_without_product_uses_default() {
    let app = TestApp::new(ScriptedModel::always(fixtures::analysis_reply(
        "en", "Fine", "neutral",
    )));

    let response = app.post_json("/api/feedback", json!({ "text": "Fine" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["product"], DEFAULT_PRODUCT);
}

#[tokio::test]
async fn test_submit_normalizes_sentiment_label() {
    let app = TestApp::new(ScriptedModel::always(fixtures::analysis_reply(
        "en", "Awful", " Negative ",
    )));

    let response = app.post_json("/api/feedback", json!({ "text": "Awful" })).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["sentiment"], "negative");
}

#[tokio::test]
async fn test_fenced_reply_is_handled_like_bare_reply() {
    let reply = fixtures::analysis_reply("fr", "Very good", "positive");
    let app = TestApp::new(
        ScriptedModel::new()
            .then_reply(fixtures::fenced(&reply, Some("json")))
            .then_reply(reply.clone()),
    );

    let fenced = app.post_json("/api/feedback", json!({ "text": "Très bien" })).await;
    let bare = app.post_json("/api/feedback", json!({ "text": "Très bien" })).await;

    assert_eq!(fenced.status, StatusCode::OK);
    assert_eq!(bare.status, StatusCode::OK);
    for field in ["translated", "sentiment", "language", "product"] {
        assert_eq!(fenced.body[field], bare.body[field], "field {field} differs");
    }
    assert_eq!(app.stored_count(), 2);
}

#[tokio::test]
async fn test_missing_text_is_rejected_without_model_call() {
    let app = TestApp::without_model();

    let response = app.post_json("/api/feedback", json!({ "product": "acme" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.detail(), Some("Text is required"));
    assert_eq!(app.model.calls(), 0);
    assert_eq!(app.stored_count(), 0);
}

#[tokio::test]
async fn test_whitespace_text_is_rejected() {
    let app = TestApp::without_model();

    let response = app.post_json("/api/feedback", json!({ "text": "   \n\t" })).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(app.model.calls(), 0);
}

#[tokio::test]
async fn test_malformed_body_is_a_client_error() {
    let app = TestApp::without_model();

    let response = app.post_raw("/api/feedback", "{not json").await;

    assert!(response.status.is_client_error());
    assert!(response.detail().is_some());
    assert_eq!(app.model.calls(), 0);
}

// ============================================================================
// GATEWAY FAILURES
// ============================================================================

#[tokio::test]
async fn test_model_failure_returns_500_and_stores_nothing() {
    let app = TestApp::new(ScriptedModel::new().then_fail("quota exceeded"));

    let response = app.post_json("/api/feedback", json!({ "text": "Hello" })).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.detail(), Some("Gemini API error occurred"));
    assert_eq!(app.stored_count(), 0);
}

#[tokio::test]
async fn test_prose_reply_returns_500_and_stores_nothing() {
    let app = TestApp::new(ScriptedModel::always(fixtures::prose_reply()));

    let response = app.post_json("/api/feedback", json!({ "text": "Hello" })).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.detail(), Some("Gemini API error occurred"));
    assert_eq!(app.stored_count(), 0);
}

#[tokio::test]
async fn test_incomplete_reply_returns_500_and_stores_nothing() {
    let app = TestApp::new(ScriptedModel::always(fixtures::incomplete_analysis_reply()));

    let response = app.post_json("/api/feedback", json!({ "text": "Hello" })).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(app.stored_count(), 0);
}

#[tokio::test]
async fn test_failure_detail_does_not_leak_model_error() {
    let app = TestApp::new(ScriptedModel::new().then_fail("secret upstream detail"));

    let response = app.post_json("/api/feedback", json!({ "text": "Hello" })).await;

    assert!(!response.body.to_string().contains("secret upstream detail"));
}

// ============================================================================
// LISTING
// ============================================================================

fn records(body: &serde_json::Value) -> Vec<FeedbackRecord> {
    serde_json::from_value(body.clone()).expect("listing should be an array of records")
}

#[tokio::test]
async fn test_list_empty_database() {
    let app = TestApp::without_model();

    let response = app.get("/api/feedback").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_list_filters_by_product_newest_first() {
    let app = TestApp::without_model();
    let first = app.seed("first", "en", "positive", "acme");
    app.seed("other", "en", "neutral", "globex");
    let second = app.seed("second", "de", "negative", "acme");

    let response = app.get("/api/feedback?product=acme").await;

    assert_eq!(response.status, StatusCode::OK);
    let listed = records(&response.body);
    let ids: Vec<i64> = listed.iter().map(|r| r.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
    assert!(listed.iter().all(|r| r.product == "acme"));
}

#[tokio::test]
async fn test_list_filters_by_language_and_product() {
    let app = TestApp::without_model();
    app.seed("a", "en", "positive", "acme");
    let wanted = app.seed("b", "es", "positive", "acme");
    app.seed("c", "es", "positive", "globex");

    let response = app.get("/api/feedback?language=es&product=acme").await;

    let listed = records(&response.body);
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0], wanted);
}

#[tokio::test]
async fn test_list_blank_filter_matches_everything() {
    let app = TestApp::without_model();
    app.seed("a", "en", "positive", "acme");
    app.seed("b", "es", "negative", "globex");

    let response = app.get("/api/feedback?language=&product=").await;

    assert_eq!(records(&response.body).len(), 2);
}

#[tokio::test]
async fn test_list_unknown_product_is_empty() {
    let app = TestApp::without_model();
    app.seed("a", "en", "positive", "acme");

    let response = app.get("/api/feedback?product=initech").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, json!([]));
}

#[tokio::test]
async fn test_submitted_feedback_appears_in_listing() {
    let app = TestApp::new(ScriptedModel::always(fixtures::analysis_reply(
        "it", "Great", "positive",
    )));

    let created = app
        .post_json("/api/feedback", json!({ "text": "Ottimo", "product": "acme" }))
        .await;
    let listed = records(&app.get("/api/feedback?language=it").await.body);

    assert_eq!(listed.len(), 1);
    assert_eq!(json!(listed[0].id), created.body["id"]);
    assert_eq!(listed[0].text_original, "Ottimo");
}
