use serde_json::json;
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{response_json, TestApp, OBJECTS_PATH};

#[tokio::test]
async fn chat_returns_200_and_stores_the_message() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .and(body_partial_json(json!({
            "type": "chat-messages",
            "metadata": { "message": "Hello", "message_type": "support" }
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "object": { "id": "chat-1", "title": "Chat from Frank", "metadata": {} }
        })))
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json(
            "/api/chat",
            &json!({
                "name": "Frank",
                "email": "frank@test.com",
                "message": "Hello",
                "message_type": "support"
            }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": true, "message": "Chat message stored successfully", "id": "chat-1" })
    );
}

#[tokio::test]
async fn chat_returns_400_when_message_type_is_missing() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json(
            "/api/chat",
            &json!({ "name": "Frank", "email": "frank@test.com", "message": "Hello" }),
        )
        .await;

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Missing required fields" })
    );
}

#[tokio::test]
async fn chat_returns_500_when_the_backend_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json(
            "/api/chat",
            &json!({
                "name": "Frank",
                "email": "frank@test.com",
                "message": "Hello",
                "message_type": "sales"
            }),
        )
        .await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "error": "Failed to store chat message" })
    );
}
