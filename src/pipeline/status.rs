use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Cooperative cancellation shared by every stage of one run.
///
/// Two independent stop sources: the user (silent wind-down) and internally detected failures
/// (wind-down with reasons). Workers poll [`PipelineStatus::keep_running`] between iterations.
#[derive(Debug, Default)]
pub struct PipelineStatus {
    user_stop: AtomicBool,
    internal_stop: AtomicBool,
    reasons: Mutex<Vec<String>>,
}

impl PipelineStatus {
    /// Fresh status: both sources say continue.
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while neither source has requested a stop.
    pub fn keep_running(&self) -> bool {
        !self.user_stop.load(Ordering::Acquire) && !self.internal_stop.load(Ordering::Acquire)
    }

    /// User-initiated stop.
    pub fn stop_request(&self) {
        if !self.user_stop.swap(true, Ordering::AcqRel) {
            tracing::info!("stop requested by user");
        }
    }

    /// Failure-initiated stop; `reason` is reported to the caller.
    pub fn internal_stop_request(&self, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!(%reason, "internal stop requested");
        self.reasons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(reason);
        self.internal_stop.store(true, Ordering::Release);
    }

    /// `true` once the user asked to stop.
    pub fn is_cancelled(&self) -> bool {
        self.user_stop.load(Ordering::Acquire)
    }

    /// `true` once a failure was reported.
    pub fn is_failed(&self) -> bool {
        self.internal_stop.load(Ordering::Acquire)
    }

    /// Failure reasons in report order.
    pub fn reasons(&self) -> Vec<String> {
        self.reasons
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/status.rs"]
mod tests;
