use crate::foundation::error::BorderResult;

type Undo = Box<dyn FnOnce() -> BorderResult<()> + Send>;

/// Compensating actions for one run, undone last-in first-out.
///
/// Each completed side effect registers its undo. On cancel or failure the ledger runs every entry
/// in reverse registration order; a failing entry is logged and the unwind continues. On success
/// the ledger is discarded unexecuted.
#[derive(Default)]
pub struct RollbackLedger {
    entries: Vec<(String, Undo)>,
}

impl RollbackLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the undo for a side effect that just happened.
    pub fn push<F>(&mut self, label: impl Into<String>, undo: F)
    where
        F: FnOnce() -> BorderResult<()> + Send + 'static,
    {
        self.entries.push((label.into(), Box::new(undo)));
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Labels in registration order.
    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|(l, _)| l.as_str()).collect()
    }

    /// Move the actions registered from index `at` onward into a new ledger.
    ///
    /// # Panics
    ///
    /// Panics if `at > self.len()`.
    pub fn split_off(&mut self, at: usize) -> Self {
        Self {
            entries: self.entries.split_off(at),
        }
    }

    /// Run every action, most recent first; returns how many succeeded.
    #[tracing::instrument(skip_all, fields(entries = self.entries.len()))]
    pub fn execute(self) -> usize {
        let mut ok = 0;
        for (label, undo) in self.entries.into_iter().rev() {
            match undo() {
                Ok(()) => {
                    tracing::debug!(%label, "rolled back");
                    ok += 1;
                }
                Err(e) => tracing::warn!(%label, error = %e, "rollback action failed"),
            }
        }
        ok
    }

    /// Drop every action without running it.
    pub fn discard(self) {
        tracing::debug!(entries = self.entries.len(), "rollback ledger discarded");
    }
}

impl std::fmt::Debug for RollbackLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollbackLedger")
            .field("entries", &self.labels())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/rollback.rs"]
mod tests;
