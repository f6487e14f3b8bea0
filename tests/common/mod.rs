#![allow(dead_code)]

use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;
use tinylink::application::services::MappingSettings;
use tinylink::domain::click_event::ClickEvent;
use tinylink::domain::click_worker::run_click_worker;
use tinylink::domain::entities::{NewUrlMapping, UrlMapping};
use tinylink::domain::repositories::MappingRepository;
use tinylink::infrastructure::cache::NullCache;
use tinylink::infrastructure::persistence::InMemoryMappingRepository;
use tinylink::routes::app_router;
use tinylink::state::AppState;
use tokio::sync::mpsc;

pub const BASE_URL: &str = "http://sho.rt";

pub fn test_settings() -> MappingSettings {
    MappingSettings {
        code_length: 7,
        max_collision_retries: 5,
        base_url: BASE_URL.to_string(),
    }
}

/// State over an in-memory store with a running click worker.
pub fn create_test_state() -> (AppState, Arc<InMemoryMappingRepository>) {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let (tx, rx) = mpsc::channel(100);

    tokio::spawn(run_click_worker(rx, repo.clone()));

    let state = AppState::new(
        repo.clone(),
        Arc::new(NullCache::new()),
        tx,
        test_settings(),
    );

    (state, repo)
}

/// State whose click queue has no consumer.
pub fn create_state_without_worker() -> (
    AppState,
    Arc<InMemoryMappingRepository>,
    mpsc::Receiver<ClickEvent>,
) {
    let repo = Arc::new(InMemoryMappingRepository::new());
    let (tx, rx) = mpsc::channel(100);

    let state = AppState::new(
        repo.clone(),
        Arc::new(NullCache::new()),
        tx,
        test_settings(),
    );

    (state, repo, rx)
}

pub fn create_test_server() -> (TestServer, Arc<InMemoryMappingRepository>) {
    let (state, repo) = create_test_state();
    let server = TestServer::new(app_router(state)).unwrap();
    (server, repo)
}

pub async fn create_test_mapping(
    repo: &InMemoryMappingRepository,
    code: &str,
    url: &str,
) -> UrlMapping {
    repo.insert_if_absent(NewUrlMapping::new(code, url))
        .await
        .unwrap()
        .expect("code already taken")
}

/// Polls the store until `code` reaches `expected` clicks.
pub async fn wait_for_clicks(repo: &InMemoryMappingRepository, code: &str, expected: i64) {
    for _ in 0..100 {
        let mapping = repo.find_by_code(code).await.unwrap();
        if mapping.is_some_and(|m| m.click_count >= expected) {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("click count for {code} never reached {expected}");
}
