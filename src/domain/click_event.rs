//! Click event model for asynchronous click accounting.

/// A successful resolution waiting to be counted.
///
/// Sent from [`crate::application::services::ResolutionService::resolve`] to
/// [`crate::domain::click_worker::run_click_worker`] over a bounded channel, so
/// the redirect response never waits on the counter update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub short_code: String,
}

impl ClickEvent {
    pub fn new(short_code: impl Into<String>) -> Self {
        Self {
            short_code: short_code.into(),
        }
    }
}
