//! Run orchestration: phases, cancellation and rollback.
//!
//! A [`Border`] drives one run through `Setup -> Extract -> Grow -> MakeTargets -> Write ->
//! Finalize -> Done`. Every host side effect registers its undo in a [`RollbackLedger`]. The
//! shared [`PipelineStatus`] is checked at each phase boundary; once it says stop, the ledger is
//! unwound and the run ends cancelled (user stop) or failed (internal stop, with reasons).

use crate::foundation::core::{FrameIndex, FrameRange};
use crate::foundation::error::{BorderError, BorderResult};
use crate::growth::index::IndexWidth;
use crate::growth::recipe::Recipe;
use crate::host::proxy::{HostClient, HostService};
use crate::host::sink::{Host, SurfaceId};
use crate::pipeline::generator::{DEFAULT_GENERATORS, GeneratorPool};
use crate::pipeline::progress::{Phase, Progress, ProgressFn, ProgressTracker};
use crate::pipeline::reader::Reader;
use crate::pipeline::records::RecordQueue;
use crate::pipeline::status::PipelineStatus;
use crate::pipeline::writer::{WriterOpts, WriterPool};
use crate::session::rollback::RollbackLedger;
use anyhow::Context as _;
use std::path::PathBuf;
use std::sync::Arc;

/// Default border color: opaque black.
pub const DEFAULT_COLOR: [u8; 4] = [0, 0, 0, 255];

/// Inputs of one border run.
#[derive(Clone, Debug)]
pub struct BorderOpts {
    /// Growth recipe applied to every frame.
    pub recipe: Recipe,
    /// Border thickness in pixels; must equal the recipe's total step count.
    pub thickness: u32,
    /// Frames to process; `None` processes the host's current frame only.
    pub timeline: Option<FrameRange>,
    /// Writer threads, one target surface each (animation mode).
    pub targets: usize,
    /// Generator threads (animation mode); `None` uses [`DEFAULT_GENERATORS`].
    pub generators: Option<usize>,
    /// Straight RGBA8 border color.
    pub color: [u8; 4],
}

impl BorderOpts {
    /// Single-frame options for `recipe`, thickness derived from it.
    pub fn new(recipe: Recipe) -> Self {
        let thickness = recipe.thickness();
        Self {
            recipe,
            thickness,
            timeline: None,
            targets: 1,
            generators: None,
            color: DEFAULT_COLOR,
        }
    }

    /// Process every frame of `timeline`.
    pub fn with_timeline(mut self, timeline: FrameRange) -> Self {
        self.timeline = Some(timeline);
        self
    }

    /// Reject options that could never run.
    pub fn validate(&self) -> BorderResult<()> {
        self.recipe.validate()?;
        if self.thickness != self.recipe.thickness() {
            return Err(BorderError::validation(format!(
                "thickness {} does not match the recipe's {} steps",
                self.thickness,
                self.recipe.thickness()
            )));
        }
        if self.targets == 0 {
            return Err(BorderError::validation("target count must be >= 1"));
        }
        if self.generators == Some(0) {
            return Err(BorderError::validation("generator count must be >= 1"));
        }
        if let Some(t) = self.timeline
            && t.len_frames() == 0
        {
            return Err(BorderError::validation(format!(
                "timeline {}..{} is empty",
                t.start.0, t.end.0
            )));
        }
        Ok(())
    }

    fn is_animation(&self) -> bool {
        self.timeline.is_some()
    }
}

/// Terminal state of a run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BorderOutcome {
    /// The border surface was produced.
    Completed {
        /// Surface holding the border (the target in single-frame mode, the import otherwise).
        surface: SurfaceId,
    },
    /// The user stopped the run; side effects were rolled back.
    Cancelled,
    /// An operation failed; side effects were rolled back.
    Failed {
        /// Failure reasons in report order.
        reasons: Vec<String>,
    },
}

/// Summary of one run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BorderReport {
    /// How the run ended.
    pub outcome: BorderOutcome,
    /// Phases entered, in order.
    pub phases: Vec<Phase>,
    /// Frames extracted from the host.
    pub frames_read: usize,
    /// Frames grown by the generators.
    pub frames_grown: usize,
    /// Frames committed by the writers.
    pub frames_written: usize,
    /// Rollback actions that ran successfully.
    pub rolled_back: usize,
}

impl BorderReport {
    /// Produced surface, if the run completed.
    pub fn surface(&self) -> Option<SurfaceId> {
        match self.outcome {
            BorderOutcome::Completed { surface } => Some(surface),
            _ => None,
        }
    }

    /// Return `true` when the run completed.
    pub fn is_completed(&self) -> bool {
        self.surface().is_some()
    }
}

/// Border orchestrator for one run.
pub struct Border {
    opts: BorderOpts,
    status: Arc<PipelineStatus>,
    on_progress: Option<Arc<ProgressFn>>,
}

impl std::fmt::Debug for Border {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Border")
            .field("opts", &self.opts)
            .field("status", &self.status)
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

#[derive(Default)]
struct Tally {
    phases: Vec<Phase>,
    read: usize,
    grown: usize,
    written: usize,
}

impl Tally {
    fn enter(&mut self, phase: Phase) {
        tracing::info!(phase = phase.name(), "entering phase");
        self.phases.push(phase);
    }
}

impl Border {
    /// Validate `opts`; configuration errors surface here, before any thread starts.
    pub fn new(opts: BorderOpts) -> BorderResult<Self> {
        opts.validate()?;
        Ok(Self {
            opts,
            status: Arc::new(PipelineStatus::new()),
            on_progress: None,
        })
    }

    /// Report progress to `f` from whichever thread finished a step.
    pub fn with_progress<F>(mut self, f: F) -> Self
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(f));
        self
    }

    /// Cancellation handle; call [`PipelineStatus::stop_request`] to stop the run.
    pub fn status(&self) -> Arc<PipelineStatus> {
        Arc::clone(&self.status)
    }

    /// Options this run was built with.
    pub fn opts(&self) -> &BorderOpts {
        &self.opts
    }

    /// Run against `host`, dispatching host calls on a dedicated owner thread.
    ///
    /// The host is handed back once every call has been served.
    pub fn run<H: Host>(self, host: H) -> (BorderResult<BorderReport>, H) {
        let (service, client) = HostService::new(host);
        std::thread::scope(|scope| {
            let owner = scope.spawn(move || service.run());
            let result = self.run_with_client(&client);
            drop(client);
            let host = match owner.join() {
                Ok(host) => host,
                Err(panic) => std::panic::resume_unwind(panic),
            };
            (result, host)
        })
    }

    /// Run through an existing client; the caller keeps its [`HostService`] dispatching.
    ///
    /// `Err` is returned only for configuration errors found before any worker starts. Every
    /// other problem ends in a report with a cancelled or failed outcome.
    #[tracing::instrument(
        skip_all,
        fields(animation = self.opts.is_animation(), thickness = self.opts.thickness)
    )]
    pub fn run_with_client<H: Host>(self, client: &HostClient<H>) -> BorderResult<BorderReport> {
        let mut tally = Tally::default();
        let mut ledger = RollbackLedger::new();
        let status = &*self.status;

        // Setup
        tally.enter(Phase::Setup);
        let (canvas, saved_time) = match client.call(|h: &mut H| (h.canvas(), h.current_time())) {
            Ok(v) => v,
            Err(e) => {
                status.internal_stop_request(format!("setup: {e}"));
                return Ok(self.roll_back(tally, ledger));
            }
        };
        let area = (canvas.width as usize)
            .checked_mul(canvas.height as usize)
            .ok_or(BorderError::IndexOverflow { len: usize::MAX })?;
        IndexWidth::for_len(area)?;

        let frames: Vec<FrameIndex> = match self.opts.timeline {
            Some(range) => range.frames().collect(),
            None => vec![saved_time],
        };
        let generators = match self.opts.timeline {
            Some(_) => self.opts.generators.unwrap_or(DEFAULT_GENERATORS),
            None => 1,
        };
        let targets = if self.opts.is_animation() {
            self.opts.targets
        } else {
            1
        };
        let progress = ProgressTracker::new(3 * frames.len() as u64, self.on_progress.clone());

        let restore = client.clone();
        ledger.push("restore time cursor", move || {
            restore.try_call(move |h: &mut H| h.set_time(saved_time))
        });

        let export_dir = if self.opts.is_animation() {
            match create_export_dir() {
                Ok(dir) => {
                    let d = dir.clone();
                    ledger.push("remove export directory", move || {
                        std::fs::remove_dir_all(&d)
                            .with_context(|| format!("remove '{}'", d.display()))?;
                        Ok(())
                    });
                    Some(dir)
                }
                Err(e) => {
                    status.internal_stop_request(format!("create export directory: {e}"));
                    None
                }
            }
        } else {
            None
        };
        let pool = match GeneratorPool::new(generators) {
            Ok(p) => Some(p),
            Err(e) => {
                status.internal_stop_request(format!("start generators: {e}"));
                None
            }
        };
        let Some(pool) = pool.filter(|_| status.keep_running()) else {
            return Ok(self.roll_back(tally, ledger));
        };

        // Extract
        tally.enter(Phase::Extract);
        let raw = RecordQueue::new();
        tally.read = Reader::new(&frames, self.opts.thickness).run(client, status, &progress, &raw);
        if !status.keep_running() {
            return Ok(self.roll_back(tally, ledger));
        }

        // Grow
        tally.enter(Phase::Grow);
        let borders = RecordQueue::new();
        tally.grown = pool.run(&self.opts.recipe, &raw, &borders, status, &progress);
        drop(raw);
        if !status.keep_running() {
            return Ok(self.roll_back(tally, ledger));
        }

        // MakeTargets
        tally.enter(Phase::MakeTargets);
        let mut surfaces = Vec::with_capacity(targets);
        for i in 0..targets {
            let name = format!("border target {i}");
            match client.try_call(move |h: &mut H| h.create_surface(&name)) {
                Ok(id) => {
                    surfaces.push(id);
                    ledger.push(format!("remove target {i}"), remove_surface_undo(client, id));
                }
                Err(e) => {
                    status.internal_stop_request(format!("create target {i}: {e}"));
                    break;
                }
            }
        }
        if !status.keep_running() {
            return Ok(self.roll_back(tally, ledger));
        }
        let writers = match WriterPool::new(surfaces.clone()) {
            Ok(w) => w,
            Err(e) => {
                status.internal_stop_request(format!("start writers: {e}"));
                return Ok(self.roll_back(tally, ledger));
            }
        };

        // Write
        tally.enter(Phase::Write);
        let opts = WriterOpts {
            color: self.opts.color,
            export_dir: export_dir.clone(),
        };
        let written = writers.run(client, &borders, status, &progress, &opts);
        tally.written = written.written;
        if !status.keep_running() {
            return Ok(self.roll_back(tally, ledger));
        }

        // Finalize
        tally.enter(Phase::Finalize);
        let surface = match (self.opts.timeline, &export_dir) {
            (Some(range), Some(_)) => {
                let paths: Vec<PathBuf> = written.exported.into_iter().map(|(_, p)| p).collect();
                let start = range.start;
                let imported = client.try_call(move |h: &mut H| h.import_frames(start, &paths));
                let surface = match imported {
                    Ok(s) => s,
                    Err(e) => {
                        status.internal_stop_request(format!("import border frames: {e}"));
                        return Ok(self.roll_back(tally, ledger));
                    }
                };
                let scratch_len = ledger.len();
                ledger.push("remove imported border", remove_surface_undo(client, surface));
                if !status.keep_running() {
                    return Ok(self.roll_back(tally, ledger));
                }
                // Targets, export directory and time cursor are released on success too; only
                // the import stays undoable.
                let kept = ledger.split_off(scratch_len);
                let released = std::mem::replace(&mut ledger, kept).execute();
                tracing::debug!(released, "scratch state released");
                surface
            }
            _ => match surfaces.first() {
                Some(&id) => {
                    if let Err(e) = client.try_call(move |h: &mut H| h.set_time(saved_time)) {
                        tracing::warn!(
                            time = saved_time.0,
                            error = %e,
                            "failed to restore time cursor"
                        );
                    }
                    id
                }
                None => {
                    status.internal_stop_request("no target surface to hand back");
                    return Ok(self.roll_back(tally, ledger));
                }
            },
        };
        if !status.keep_running() {
            return Ok(self.roll_back(tally, ledger));
        }

        tally.enter(Phase::Done);
        ledger.discard();
        Ok(BorderReport {
            outcome: BorderOutcome::Completed { surface },
            phases: tally.phases,
            frames_read: tally.read,
            frames_grown: tally.grown,
            frames_written: tally.written,
            rolled_back: 0,
        })
    }

    fn roll_back(&self, mut tally: Tally, ledger: RollbackLedger) -> BorderReport {
        tally.enter(Phase::Rollback);
        let rolled_back = ledger.execute();
        // A failure outranks a concurrent user stop.
        let outcome = if self.status.is_failed() {
            BorderOutcome::Failed {
                reasons: self.status.reasons(),
            }
        } else {
            BorderOutcome::Cancelled
        };
        tracing::info!(?outcome, rolled_back, "run rolled back");
        BorderReport {
            outcome,
            phases: tally.phases,
            frames_read: tally.read,
            frames_grown: tally.grown,
            frames_written: tally.written,
            rolled_back,
        }
    }
}

fn remove_surface_undo<H: Host>(
    client: &HostClient<H>,
    surface: SurfaceId,
) -> impl FnOnce() -> BorderResult<()> + Send + 'static {
    let client = client.clone();
    move || client.try_call(move |h: &mut H| h.remove_surface(surface))
}

fn create_export_dir() -> BorderResult<PathBuf> {
    let dir = std::env::temp_dir().join(format!(
        "layer_border_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0)
    ));
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("create '{}'", dir.display()))?;
    Ok(dir)
}

#[cfg(test)]
#[path = "../../tests/unit/session/border.rs"]
mod tests;
