// tests/metrics.rs
use axum::body::{self, Body};
use axum::Router;
use http::{Request, StatusCode};
use serde_json::json;
use serial_test::serial;
use tower::ServiceExt;

// Build full in-process app (includes /metrics when gated via env).
async fn build_app() -> Router {
    halftime_edge::app()
        .await
        .expect("app() should build Router in tests")
}

// Ensure the metrics route is enabled for this process.
fn set_metrics_env() {
    std::env::set_var("METRICS_ENABLED", "1");
    std::env::set_var("BANKROLL", "500");
    // No live providers; keeps /live deterministic.
    std::env::set_var("LIVE_FIXTURE_PATH", "tests/no_such_fixture.json");
    std::env::remove_var("LIVE_FEED_URL");
}

fn evaluate_request(signals: serde_json::Value) -> Request<Body> {
    Request::post("/evaluate")
        .header("content-type", "application/json")
        .body(Body::from(json!({ "signals": signals }).to_string()))
        .unwrap()
}

async fn scrape(app: &Router) -> String {
    let resp = app
        .clone()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    // axum::body::to_bytes requires an explicit limit
    let body = body::to_bytes(resp.into_body(), 1_048_576).await.unwrap(); // 1 MiB
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
#[serial]
async fn metrics_endpoint_counts_evaluations() {
    set_metrics_env();
    let app = build_app().await;

    let scored = json!({
        "pre_match_odds": { "over05": 1.18, "home": 1.50, "draw": 4.20, "away": 6.50 },
        "halftime_stats": { "shots": 8, "shots_on_target": 4, "expected_goals": 0.9 },
        "halftime_odds": 1.18,
        "momentum": { "shots_delta": 3, "shots_on_target_delta": 2, "expected_goals_delta": 0.35 }
    });
    let resp = app.clone().oneshot(evaluate_request(scored)).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .clone()
        .oneshot(evaluate_request(json!({})))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let text = scrape(&app).await;
    assert!(text.contains("evaluations_total"), "{text}");
    assert!(text.contains("recommendations_total"), "{text}");
    assert!(text.contains(r#"label="TOP PICK""#), "{text}");
    assert!(text.contains("evaluations_insufficient_total"), "{text}");
}

#[tokio::test]
#[serial]
async fn live_gate_counter_is_exported() {
    set_metrics_env();
    let app = build_app().await;

    let resp = app
        .clone()
        .oneshot(Request::get("/live").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let text = scrape(&app).await;
    assert!(text.contains("live_matches_filtered_total"), "{text}");
    assert!(text.contains("ingest_last_run_ts"), "{text}");
}
