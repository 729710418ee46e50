use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{find_query, response_json, TestApp, OBJECTS_PATH};

#[tokio::test]
async fn track_stores_the_event_with_the_user_agent() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .and(body_partial_json(json!({
            "type": "analytics-events",
            "metadata": {
                "event_type": "cta_click",
                "event_data": "{\"button\":\"hero\"}",
                "page_url": "/pricing",
                "user_agent": "integration-test"
            }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "object": { "id": "event-1", "metadata": {} }
        })))
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .request(Method::POST, "/api/analytics/track")
        .header("User-Agent", "integration-test")
        .json(&json!({
            "eventType": "cta_click",
            "eventData": { "button": "hero" },
            "pageUrl": "/pricing"
        }))
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response_json(response).await, json!({ "success": true }));
}

#[tokio::test]
async fn track_returns_400_without_event_type() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_json("/api/analytics/track", &json!({ "pageUrl": "/pricing" }))
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Event type is required" })
    );
}

#[tokio::test]
async fn stats_aggregate_the_stored_events() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(method("GET"))
        .and(path(OBJECTS_PATH))
        .and(find_query("analytics-events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "objects": [
                { "id": "1", "metadata": { "event_type": "cta_click", "timestamp": "t1", "page_url": "/" } },
                { "id": "2", "metadata": { "event_type": "cta_click", "timestamp": "t2", "page_url": "/pricing" } },
                { "id": "3", "metadata": { "timestamp": "t3" } }
            ]
        })))
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app.get("/api/analytics/stats").await;

    assert_eq!(200, response.status().as_u16());

    let stats = response_json(response).await;

    assert_eq!(stats["totalEvents"], 3);
    assert_eq!(stats["eventsByType"], json!({ "cta_click": 2, "unknown": 1 }));
    assert_eq!(stats["recentEvents"][1]["pageUrl"], "/pricing");
    assert_eq!(stats["recentEvents"][2]["type"], json!(null));
}

#[tokio::test]
async fn stats_are_empty_when_no_event_exists() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app.get("/api/analytics/stats").await;

    assert_eq!(
        response_json(response).await,
        json!({ "totalEvents": 0, "eventsByType": {}, "recentEvents": [] })
    );
}

#[tokio::test]
async fn stats_return_500_when_the_backend_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app.get("/api/analytics/stats").await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Failed to fetch stats" })
    );
}
