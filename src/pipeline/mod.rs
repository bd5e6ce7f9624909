/// Parallel growth stage.
pub mod generator;
/// Phase and step reporting.
pub mod progress;
/// Sequential extraction stage.
pub mod reader;
/// Stage records and queues.
pub mod records;
/// Shared cancellation state.
pub mod status;
/// Barrier-locked write stage.
pub mod writer;
