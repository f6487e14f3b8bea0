//! Shared application state injected into all handlers.

use std::sync::Arc;
use tokio::sync::mpsc;

use crate::application::services::{MappingService, MappingSettings, ResolutionService};
use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::MappingRepository;
use crate::infrastructure::cache::CacheService;

/// Services and handles shared by every request.
///
/// The store is held behind `dyn MappingRepository`, so the same router runs
/// against PostgreSQL in production and against the in-memory store in tests.
#[derive(Clone)]
pub struct AppState {
    pub mapping_service: Arc<MappingService<dyn MappingRepository>>,
    pub resolution_service: Arc<ResolutionService<dyn MappingRepository>>,
    pub repository: Arc<dyn MappingRepository>,
    pub cache: Arc<dyn CacheService>,
    pub click_sender: mpsc::Sender<ClickEvent>,
}

impl AppState {
    pub fn new(
        repository: Arc<dyn MappingRepository>,
        cache: Arc<dyn CacheService>,
        click_sender: mpsc::Sender<ClickEvent>,
        settings: MappingSettings,
    ) -> Self {
        let mapping_service = Arc::new(MappingService::new(repository.clone(), settings));
        let resolution_service = Arc::new(ResolutionService::new(
            repository.clone(),
            cache.clone(),
            click_sender.clone(),
        ));

        Self {
            mapping_service,
            resolution_service,
            repository,
            cache,
            click_sender,
        }
    }
}
