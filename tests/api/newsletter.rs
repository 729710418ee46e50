use reqwest::Method;
use serde_json::{json, Value};
use wiremock::matchers::{any, body_partial_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{find_query, response_json, TestApp, OBJECTS_PATH, WEBHOOK_PATH};

const SUBSCRIBERS: &str = "newsletter-subscribers";

fn subscriber_object(email: &str, status: &str) -> Value {
    json!({
        "id": "sub-1",
        "title": email,
        "type": SUBSCRIBERS,
        "metadata": {
            "email": email,
            "status": status,
            "subscribed_at": "2020-01-01T00:00:00.000Z",
            "source": "footer"
        }
    })
}

async fn mount_subscriber_lookup(test_app: &TestApp, email: &str, found: Option<Value>) {
    let response = match found {
        Some(object) => ResponseTemplate::new(200).set_body_json(json!({ "objects": [object] })),
        None => ResponseTemplate::new(404),
    };

    Mock::given(method("GET"))
        .and(path(OBJECTS_PATH))
        .and(find_query(SUBSCRIBERS).with("metadata.email", email))
        .respond_with(response)
        .mount(&test_app.cosmic_server)
        .await;
}

#[tokio::test]
async fn subscribe_returns_200_and_stores_a_new_subscriber() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(&test_app, "frank@test.com", None).await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .and(body_partial_json(json!({
            "title": "frank@test.com",
            "type": SUBSCRIBERS,
            "metadata": { "email": "frank@test.com", "status": "subscribed", "source": "footer" }
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "object": subscriber_object("frank@test.com", "subscribed") })),
        )
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(method("POST"))
        .and(path(WEBHOOK_PATH))
        .and(body_partial_json(json!({ "email": "frank@test.com", "source": "footer" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.webhook_server)
        .await;

    let response = test_app
        .post_json(
            "/api/newsletter/subscribe",
            &json!({ "email": "frank@test.com", "source": "footer" }),
        )
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": true,
            "message": "Successfully subscribed to the newsletter!",
            "data": { "email": "frank@test.com" }
        })
    );
}

#[tokio::test]
async fn subscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    let test_cases = vec![
        (json!({}), "missing email"),
        (json!({ "email": "" }), "empty email"),
        (json!({ "email": "frank.test.com" }), "email without @"),
    ];

    for (body, description) in test_cases {
        let response = test_app.post_json("/api/newsletter/subscribe", &body).await;

        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            description
        );
        assert_eq!(
            response_json(response).await,
            json!({ "success": false, "message": "Please provide a valid email address" })
        );
    }
}

#[tokio::test]
async fn subscribe_reports_a_duplicate_without_writing() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(
        &test_app,
        "frank@test.com",
        Some(subscriber_object("frank@test.com", "subscribed")),
    )
    .await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.webhook_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/subscribe", &json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": false,
            "message": "This email is already subscribed to our newsletter.",
            "duplicate": true
        })
    );
}

#[tokio::test]
async fn second_subscribe_of_the_same_email_is_a_duplicate() {
    let test_app = TestApp::spawn_app().await;

    // Nothing is found until the first subscription is stored
    Mock::given(method("GET"))
        .and(find_query(SUBSCRIBERS).with("metadata.email", "frank@test.com"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .mount(&test_app.cosmic_server)
        .await;
    mount_subscriber_lookup(
        &test_app,
        "frank@test.com",
        Some(subscriber_object("frank@test.com", "subscribed")),
    )
    .await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "object": subscriber_object("frank@test.com", "subscribed") })),
        )
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .mount(&test_app.webhook_server)
        .await;

    let body = json!({ "email": "frank@test.com" });
    let first = response_json(test_app.post_json("/api/newsletter/subscribe", &body).await).await;
    let second = response_json(test_app.post_json("/api/newsletter/subscribe", &body).await).await;

    assert_eq!(first["success"], true);
    assert_eq!(second["success"], false);
    assert_eq!(second["duplicate"], true);
}

#[tokio::test]
async fn subscribe_reactivates_an_unsubscribed_email() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(
        &test_app,
        "frank@test.com",
        Some(subscriber_object("frank@test.com", "unsubscribed")),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/sub-1", OBJECTS_PATH)))
        .and(body_partial_json(json!({ "metadata": { "status": "subscribed" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "object": subscriber_object("frank@test.com", "subscribed") })),
        )
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&test_app.webhook_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/subscribe", &json!({ "email": "frank@test.com" }))
        .await;
    let body = response_json(response).await;

    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Welcome back! You have been resubscribed.");
}

#[tokio::test]
async fn subscribe_succeeds_when_the_webhook_fails() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(&test_app, "frank@test.com", None).await;

    Mock::given(method("POST"))
        .and(path(OBJECTS_PATH))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({ "object": subscriber_object("frank@test.com", "subscribed") })),
        )
        .mount(&test_app.cosmic_server)
        .await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&test_app.webhook_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/subscribe", &json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(response_json(response).await["success"], true);
}

#[tokio::test]
async fn subscribe_returns_500_when_the_backend_fails() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/subscribe", &json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "message": "An error occurred. Please try again later." })
    );
}

#[tokio::test]
async fn unsubscribe_of_an_unknown_email_is_not_found() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(&test_app, "frank@test.com", None).await;

    Mock::given(method("PATCH"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/unsubscribe", &json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "message": "Email address not found in our subscriber list." })
    );
}

#[tokio::test]
async fn unsubscribe_marks_the_subscriber_as_unsubscribed() {
    let test_app = TestApp::spawn_app().await;

    mount_subscriber_lookup(
        &test_app,
        "frank@test.com",
        Some(subscriber_object("frank@test.com", "subscribed")),
    )
    .await;

    Mock::given(method("PATCH"))
        .and(path(format!("{}/sub-1", OBJECTS_PATH)))
        .and(body_partial_json(json!({ "metadata": { "status": "unsubscribed" } })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "object": subscriber_object("frank@test.com", "unsubscribed") })),
        )
        .expect(1)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .post_json("/api/newsletter/unsubscribe", &json!({ "email": "frank@test.com" }))
        .await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({
            "success": true,
            "message": "You have been successfully unsubscribed from our newsletter."
        })
    );
}

#[tokio::test]
async fn unsubscribe_returns_400_when_email_is_invalid() {
    let test_app = TestApp::spawn_app().await;

    let response = test_app
        .post_json("/api/newsletter/unsubscribe", &json!({ "email": "frank.test.com" }))
        .await;

    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn newsletter_endpoints_return_400_json_when_email_is_not_a_string() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    let test_cases = vec![
        (json!({ "email": null }), "null email"),
        (json!({ "email": 42 }), "numeric email"),
    ];

    for endpoint in ["/api/newsletter/subscribe", "/api/newsletter/unsubscribe"] {
        for (body, description) in &test_cases {
            let response = test_app.post_json(endpoint, body).await;

            assert_eq!(
                400,
                response.status().as_u16(),
                "{} did not fail with 400 Bad Request when the payload was {}.",
                endpoint,
                description
            );
            assert_eq!(
                response_json(response).await,
                json!({ "success": false, "message": "Please provide a valid email address" })
            );
        }
    }
}

#[tokio::test]
async fn subscribe_returns_400_json_when_the_body_is_not_json() {
    let test_app = TestApp::spawn_app().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&test_app.cosmic_server)
        .await;

    let response = test_app
        .request(Method::POST, "/api/newsletter/subscribe")
        .header("Content-Type", "application/json")
        .body("{\"email\": ")
        .send()
        .await
        .expect("Failed to execute request.");

    assert_eq!(400, response.status().as_u16());
    assert_eq!(
        response_json(response).await,
        json!({ "success": false, "message": "Please provide a valid email address" })
    );
}
