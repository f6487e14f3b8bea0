//! Background worker that applies click counter increments.
//!
//! Each event is applied at most once: a failed increment is logged and
//! dropped, never retried.

use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::repositories::MappingRepository;

/// Consumes click events until every sender is dropped.
///
/// Events already queued when the senders go away are still applied, so
/// awaiting this future after shutting the server down drains the queue.
pub async fn run_click_worker<R>(mut rx: mpsc::Receiver<ClickEvent>, repository: Arc<R>)
where
    R: MappingRepository + ?Sized,
{
    info!("Click worker started");

    while let Some(event) = rx.recv().await {
        record_click(repository.as_ref(), &event).await;
    }

    info!("Click worker stopped");
}

/// Applies a single click event.
pub async fn record_click<R>(repository: &R, event: &ClickEvent)
where
    R: MappingRepository + ?Sized,
{
    match repository.increment_click_count(&event.short_code).await {
        Ok(true) => {
            metrics::counter!("clicks_recorded_total").increment(1);
        }
        Ok(false) => {
            debug!(short_code = %event.short_code, "click for a deleted mapping ignored");
        }
        Err(e) => {
            metrics::counter!("clicks_failed_total").increment(1);
            warn!(short_code = %event.short_code, error = %e, "failed to record click");
        }
    }
}
