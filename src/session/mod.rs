/// Run orchestration and reporting.
pub mod border;
/// JSON configuration.
pub mod config;
/// Last-in first-out undo of run side effects.
pub mod rollback;
