//! Sentiment statistics

use axum::http::StatusCode;
use feedlens_core::SentimentStats;
use feedlens_e2e_tests::{fixtures, ScriptedModel, TestApp};
use serde_json::json;

fn stats(body: &serde_json::Value) -> SentimentStats {
    serde_json::from_value(body.clone()).expect("stats body should deserialize")
}

#[tokio::test]
async fn test_stats_on_empty_table_are_zero() {
    let app = TestApp::without_model();

    let response = app.get("/api/stats").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(stats(&response.body), SentimentStats::default());
    assert_eq!(response.body["percent_positive"].as_f64(), Some(0.0));
    assert_eq!(response.body["percent_neutral"].as_f64(), Some(0.0));
    assert_eq!(response.body["percent_negative"].as_f64(), Some(0.0));
}

#[tokio::test]
async fn test_stats_percentages_round_to_two_decimals() {
    let app = TestApp::new(
        ScriptedModel::new()
            .then_reply(fixtures::analysis_reply("en", "Love it", "positive"))
            .then_reply(fixtures::analysis_reply("en", "Great", "positive"))
            .then_reply(fixtures::analysis_reply("en", "Broken", "negative")),
    );
    for text in ["Love it", "Great", "Broken"] {
        let response = app.post_json("/api/feedback", json!({ "text": text })).await;
        assert_eq!(response.status, StatusCode::OK);
    }

    let result = stats(&app.get("/api/stats").await.body);

    assert_eq!(result.total, 3);
    assert_eq!(result.positive, 2);
    assert_eq!(result.neutral, 0);
    assert_eq!(result.negative, 1);
    assert_eq!(result.percent_positive, 66.67);
    assert_eq!(result.percent_neutral, 0.0);
    assert_eq!(result.percent_negative, 33.33);
}

#[tokio::test]
async fn test_stats_counts_sum_to_total() {
    let app = TestApp::without_model();
    app.seed("a", "en", "positive", "acme");
    app.seed("b", "en", "neutral", "acme");
    app.seed("c", "fr", "neutral", "globex");
    app.seed("d", "de", "negative", "globex");

    let result = stats(&app.get("/api/stats").await.body);

    assert_eq!(result.total, 4);
    assert_eq!(result.positive + result.neutral + result.negative, result.total);
    assert_eq!(result.percent_positive, 25.0);
    assert_eq!(result.percent_neutral, 50.0);
    assert_eq!(result.percent_negative, 25.0);
}

#[tokio::test]
async fn test_failed_submission_does_not_change_stats() {
    let app = TestApp::new(ScriptedModel::new().then_fail("unavailable"));
    app.seed("a", "en", "positive", "acme");

    let failed = app.post_json("/api/feedback", json!({ "text": "lost" })).await;
    let result = stats(&app.get("/api/stats").await.body);

    assert_eq!(failed.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(result.total, 1);
    assert_eq!(result.percent_positive, 100.0);
}
