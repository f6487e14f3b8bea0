mod common;

use serde_json::{Value, json};

/// Shorten, redirect, inspect, delete: the full lifecycle of one link.
#[tokio::test]
async fn test_link_lifecycle() {
    let (server, repo) = common::create_test_server();

    let created: Value = server
        .post("/shorten")
        .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
        .await
        .json();
    let code = created["short_code"].as_str().unwrap().to_string();

    let redirect = server.get(&format!("/{code}")).await;
    assert_eq!(redirect.status_code(), 301);
    assert_eq!(
        redirect.header("location"),
        "https://www.rust-lang.org/learn"
    );

    common::wait_for_clicks(&repo, &code, 1).await;

    let stats: Value = server.get(&format!("/api/stats/{code}")).await.json();
    assert_eq!(stats["long_url"], "https://www.rust-lang.org/learn");
    assert_eq!(stats["click_count"], 1);

    let again: Value = server
        .post("/shorten")
        .json(&json!({ "url": "https://www.rust-lang.org/learn" }))
        .await
        .json();
    assert_eq!(again["short_code"], code);
    assert_eq!(again["created"], false);

    let deleted = server.delete(&format!("/api/delete/{code}")).await;
    assert_eq!(deleted.status_code(), 200);

    assert_eq!(server.get(&format!("/{code}")).await.status_code(), 404);
    assert_eq!(
        server.get(&format!("/api/stats/{code}")).await.status_code(),
        404
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_shortening_allocates_unique_codes() {
    let (state, repo) = common::create_test_state();

    let mut handles = Vec::new();
    for i in 0..50 {
        let service = state.mapping_service.clone();
        handles.push(tokio::spawn(async move {
            service
                .create_or_get(&format!("https://example.com/{i}"))
                .await
                .unwrap()
        }));
    }

    let mut codes = std::collections::HashSet::new();
    for handle in handles {
        let outcome = handle.await.unwrap();
        assert!(outcome.created);
        assert!(codes.insert(outcome.mapping.short_code));
    }

    assert_eq!(repo.len(), 50);
}
