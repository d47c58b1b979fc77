use owl_core_lead_contracts::MockLeadFeatureService;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use super::TestApp;

#[tokio::test]
async fn health_is_ok() {
    // Arrange
    let app = TestApp::spawn(MockLeadFeatureService::new()).await;

    // Act
    let response = app.client.get(app.url("/health")).send().await.unwrap();

    // Assert
    assert_eq!(response.status(), 200);
    assert_eq!(response.json::<Value>().await.unwrap(), json!({"ok": true}));
}

#[tokio::test]
async fn responses_carry_request_id() {
    // Arrange
    let app = TestApp::spawn(MockLeadFeatureService::new()).await;

    // Act
    let first = app.client.get(app.url("/health")).send().await.unwrap();
    let second = app.client.get(app.url("/health")).send().await.unwrap();

    // Assert
    let first = first.headers().get("x-request-id").unwrap().clone();
    let second = second.headers().get("x-request-id").unwrap().clone();
    assert_ne!(first, second);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    // Arrange
    let app = TestApp::spawn(MockLeadFeatureService::new()).await;

    // Act
    let response = app.client.get(app.url("/nope")).send().await.unwrap();

    // Assert
    assert_eq!(response.status(), 404);
    assert_eq!(
        response.json::<Value>().await.unwrap(),
        json!({"detail": "Not Found"})
    );
}
