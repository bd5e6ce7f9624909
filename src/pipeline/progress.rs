use crate::foundation::core::FrameIndex;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Orchestration phases, in execution order; `Rollback` is reachable from any boundary.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Save host state and prepare scratch storage.
    Setup,
    /// Read frame opacity from the host.
    Extract,
    /// Run the growth automaton on every frame.
    Grow,
    /// Create the writable target surfaces.
    MakeTargets,
    /// Commit, refresh, export, clear.
    Write,
    /// Import exported frames and clean up.
    Finalize,
    /// Completed successfully.
    Done,
    /// Undoing side effects after a stop.
    Rollback,
}

impl Phase {
    /// Stable lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Setup => "setup",
            Self::Extract => "extract",
            Self::Grow => "grow",
            Self::MakeTargets => "make-targets",
            Self::Write => "write",
            Self::Finalize => "finalize",
            Self::Done => "done",
            Self::Rollback => "rollback",
        }
    }
}

/// One progress notification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Phase that made progress.
    pub phase: Phase,
    /// Steps completed so far, across all phases.
    pub steps_done: u64,
    /// Steps the whole run will take.
    pub steps_total: u64,
    /// Frame the step worked on.
    pub frame: FrameIndex,
}

/// Progress callback; called from whichever thread completed the step.
pub type ProgressFn = dyn Fn(&Progress) + Send + Sync;

/// Shared step counter feeding an optional callback.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    done: Arc<AtomicU64>,
    total: u64,
    callback: Option<Arc<ProgressFn>>,
}

impl ProgressTracker {
    /// Track `total` steps, reporting each to `callback`.
    pub fn new(total: u64, callback: Option<Arc<ProgressFn>>) -> Self {
        Self {
            done: Arc::new(AtomicU64::new(0)),
            total,
            callback,
        }
    }

    /// Record one finished step.
    pub fn advance(&self, phase: Phase, frame: FrameIndex) {
        let steps_done = self.done.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(cb) = &self.callback {
            cb(&Progress {
                phase,
                steps_done,
                steps_total: self.total,
                frame,
            });
        }
    }

    /// Steps completed so far.
    pub fn steps_done(&self) -> u64 {
        self.done.load(Ordering::Acquire)
    }

    /// Steps the run will take.
    pub fn steps_total(&self) -> u64 {
        self.total
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("done", &self.steps_done())
            .field("total", &self.total)
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
