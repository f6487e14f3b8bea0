//! Domain layer: entities, storage contracts and click accounting.
//!
//! - [`entities`] - The [`entities::UrlMapping`] record
//! - [`repositories`] - Storage trait implemented by the infrastructure layer
//! - [`click_event`] - Pending click increments
//! - [`click_worker`] - Asynchronous consumer that applies them
//!
//! # Click Processing Flow
//!
//! 1. A redirect resolves a short code
//! 2. A [`click_event::ClickEvent`] is offered to a bounded channel
//! 3. [`click_worker::run_click_worker`] applies the increment once
//! 4. The counter is persisted via [`repositories::MappingRepository::increment_click_count`]

pub mod click_event;
pub mod click_worker;
pub mod entities;
pub mod repositories;
