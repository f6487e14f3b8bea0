mod common;

use axum_test::TestServer;
use serde_json::Value;
use tinylink::routes::app_router;

#[tokio::test]
async fn test_health_ok() {
    let (server, _repo) = common::create_test_server();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 200);
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["store"]["status"], "ok");
    assert_eq!(body["checks"]["click_queue"]["status"], "ok");
    assert_eq!(body["checks"]["cache"]["status"], "ok");
}

#[tokio::test]
async fn test_health_degraded_when_click_queue_closed() {
    let (state, _repo, rx) = common::create_state_without_worker();
    drop(rx);
    let server = TestServer::new(app_router(state)).unwrap();

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), 503);
    let body: Value = response.json();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["click_queue"]["status"], "error");
}
