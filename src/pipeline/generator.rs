use crate::foundation::core::OpacityMask;
use crate::foundation::error::{BorderError, BorderResult};
use crate::growth::automaton::GrowthAutomaton;
use crate::growth::recipe::Recipe;
use crate::pipeline::progress::{Phase, ProgressTracker};
use crate::pipeline::records::{BorderRecord, FrameRecord, RecordQueue};
use crate::pipeline::status::PipelineStatus;

/// Default generator thread count for animations.
pub const DEFAULT_GENERATORS: usize = 4;

/// Parallel growth stage.
///
/// Every worker drains the raw queue with non-blocking pops, growing each frame with its own
/// reusable [`GrowthAutomaton`]. Output order on the border queue is unspecified.
#[derive(Debug)]
pub struct GeneratorPool {
    pool: rayon::ThreadPool,
}

impl GeneratorPool {
    /// Build a pool of exactly `threads` workers.
    pub fn new(threads: usize) -> BorderResult<Self> {
        if threads == 0 {
            return Err(BorderError::validation("generator thread count must be >= 1"));
        }
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("border-generator-{i}"))
            .build()
            .map_err(|e| BorderError::worker(format!("failed to build generator pool: {e}")))?;
        Ok(Self { pool })
    }

    /// Number of worker threads.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Grow every queued frame; returns how many border records were produced.
    #[tracing::instrument(skip_all, fields(threads = self.threads(), queued = input.len()))]
    pub fn run(
        &self,
        recipe: &Recipe,
        input: &RecordQueue<FrameRecord>,
        output: &RecordQueue<BorderRecord>,
        status: &PipelineStatus,
        progress: &ProgressTracker,
    ) -> usize {
        let per_worker = self.pool.broadcast(|ctx| {
            let mut automaton = None;
            let mut produced = 0usize;
            while status.keep_running() {
                let Some(record) = input.try_pop() else {
                    break;
                };
                match grow(&mut automaton, recipe, &record) {
                    Ok(delta) => {
                        tracing::debug!(
                            worker = ctx.index(),
                            time = record.time.0,
                            grown = delta.opaque_count(),
                            "frame grown"
                        );
                        output.push(BorderRecord {
                            delta,
                            time: record.time,
                            bounds: record.bounds,
                        });
                        produced += 1;
                        progress.advance(Phase::Grow, record.time);
                    }
                    Err(e) => {
                        status.internal_stop_request(format!(
                            "grow frame {}: {e}",
                            record.time.0
                        ));
                        break;
                    }
                }
            }
            produced
        });
        per_worker.into_iter().sum()
    }
}

/// Grow one record, reusing the worker's automaton when possible.
fn grow(
    slot: &mut Option<GrowthAutomaton>,
    recipe: &Recipe,
    record: &FrameRecord,
) -> BorderResult<OpacityMask> {
    let mask = record.mask.as_slice();
    let width = record.mask.width();
    let automaton = match slot.take() {
        Some(mut a) => {
            a.reset(mask, width)?;
            a
        }
        None => GrowthAutomaton::new(mask, width)?,
    };
    let automaton = slot.insert(automaton);
    automaton.apply_recipe(recipe);
    OpacityMask::new(width, automaton.difference_with(mask)?)
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/generator.rs"]
mod tests;
