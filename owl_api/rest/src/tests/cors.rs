use owl_core_lead_contracts::MockLeadFeatureService;
use pretty_assertions::assert_eq;

use super::TestApp;

const ORIGIN: &str = "https://www.theowl.solutions";

#[tokio::test]
async fn mirrors_origin_with_credentials() {
    // Arrange
    let app = TestApp::spawn(MockLeadFeatureService::new()).await;

    // Act
    let response = app
        .client
        .get(app.url("/health"))
        .header("Origin", ORIGIN)
        .send()
        .await
        .unwrap();

    // Assert
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-credentials"], "true");
}

#[tokio::test]
async fn preflight_allows_lead_post() {
    // Arrange
    let app = TestApp::spawn(MockLeadFeatureService::new()).await;

    // Act
    let response = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/owl-latam/lead"))
        .header("Origin", ORIGIN)
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .send()
        .await
        .unwrap();

    // Assert
    assert!(response.status().is_success());
    let headers = response.headers();
    assert_eq!(headers["access-control-allow-origin"], ORIGIN);
    assert_eq!(headers["access-control-allow-methods"], "POST");
    assert_eq!(headers["access-control-allow-headers"], "content-type");
    assert_eq!(headers["access-control-allow-credentials"], "true");
}
