//! Process-local mapping repository.
//!
//! Backs `STORAGE=memory` and the HTTP tests. State is lost on restart.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::domain::entities::{NewUrlMapping, UrlMapping};
use crate::domain::repositories::MappingRepository;
use crate::error::AppError;

/// In-memory implementation of [`MappingRepository`] keyed by short code.
///
/// Code uniqueness comes from the map's entry API: the occupied check and the
/// insert happen under the same shard lock.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    by_code: DashMap<String, UrlMapping>,
    last_id: AtomicI64,
}

impl InMemoryMappingRepository {
    /// Creates an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored mappings.
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn find_by_long_url(&self, long_url: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(self
            .by_code
            .iter()
            .filter(|entry| entry.long_url == long_url)
            .min_by_key(|entry| entry.id)
            .map(|entry| entry.value().clone()))
    }

    async fn insert_if_absent(
        &self,
        new_mapping: NewUrlMapping,
    ) -> Result<Option<UrlMapping>, AppError> {
        match self.by_code.entry(new_mapping.short_code) {
            Entry::Occupied(_) => Ok(None),
            Entry::Vacant(slot) => {
                let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
                let mapping = UrlMapping::new(
                    id,
                    new_mapping.long_url,
                    slot.key().clone(),
                    Utc::now(),
                    0,
                );
                slot.insert(mapping.clone());
                Ok(Some(mapping))
            }
        }
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<UrlMapping>, AppError> {
        Ok(self.by_code.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn increment_click_count(&self, short_code: &str) -> Result<bool, AppError> {
        match self.by_code.get_mut(short_code) {
            Some(mut entry) => {
                entry.click_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, short_code: &str) -> Result<bool, AppError> {
        Ok(self.by_code.remove(short_code).is_some())
    }

    async fn list_all(&self) -> Result<Vec<UrlMapping>, AppError> {
        let mut all: Vec<UrlMapping> = self
            .by_code
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        all.sort_by_key(|m| m.id);
        Ok(all)
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }
}
