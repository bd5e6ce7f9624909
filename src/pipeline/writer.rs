use crate::foundation::core::{FrameIndex, OpacityMask};
use crate::foundation::error::{BorderError, BorderResult};
use crate::host::proxy::HostClient;
use crate::host::sink::{Host, SurfaceId};
use crate::pipeline::progress::{Phase, ProgressTracker};
use crate::pipeline::records::{BorderRecord, RecordQueue};
use crate::pipeline::status::PipelineStatus;
use std::path::{Path, PathBuf};
use std::sync::{Barrier, Mutex, PoisonError};

/// Writer output settings.
#[derive(Clone, Debug)]
pub struct WriterOpts {
    /// Straight RGBA8 color painted on border pixels.
    pub color: [u8; 4],
    /// Directory receiving one exported PNG per frame; `None` leaves the border on the target.
    pub export_dir: Option<PathBuf>,
}

/// Result of the write phase.
#[derive(Clone, Debug, Default)]
pub struct WriterReport {
    /// Frames committed to a target surface.
    pub written: usize,
    /// Exported frame files, sorted by frame.
    pub exported: Vec<(FrameIndex, PathBuf)>,
}

/// File name of the exported border frame for `time`.
pub fn export_file_name(time: FrameIndex) -> String {
    format!("border_{:05}.png", time.0)
}

/// Lock-step write stage: one worker per target surface.
///
/// Each iteration every worker commits one frame concurrently, then:
/// barrier A (worker 0 refreshes the host), barrier B (export, clear), barrier C. When no worker
/// found work in an iteration, all of them leave together at barrier A.
#[derive(Debug)]
pub struct WriterPool {
    targets: Vec<SurfaceId>,
}

struct Shared<'a, H> {
    client: &'a HostClient<H>,
    input: &'a RecordQueue<BorderRecord>,
    status: &'a PipelineStatus,
    progress: &'a ProgressTracker,
    opts: &'a WriterOpts,
    busy: Mutex<Vec<bool>>,
    exported: Mutex<Vec<(FrameIndex, PathBuf)>>,
    arrive: Barrier,
    refreshed: Barrier,
    drained: Barrier,
}

impl WriterPool {
    /// One writer per target surface.
    pub fn new(targets: Vec<SurfaceId>) -> BorderResult<Self> {
        if targets.is_empty() {
            return Err(BorderError::validation("writer pool needs at least one target"));
        }
        Ok(Self { targets })
    }

    /// Target surfaces, one per worker.
    pub fn targets(&self) -> &[SurfaceId] {
        &self.targets
    }

    /// Write every queued border record.
    #[tracing::instrument(skip_all, fields(writers = self.targets.len(), queued = input.len()))]
    pub fn run<H: Host>(
        &self,
        client: &HostClient<H>,
        input: &RecordQueue<BorderRecord>,
        status: &PipelineStatus,
        progress: &ProgressTracker,
        opts: &WriterOpts,
    ) -> WriterReport {
        let n = self.targets.len();
        let shared = Shared {
            client,
            input,
            status,
            progress,
            opts,
            busy: Mutex::new(vec![true; n]),
            exported: Mutex::new(Vec::new()),
            arrive: Barrier::new(n),
            refreshed: Barrier::new(n),
            drained: Barrier::new(n),
        };

        let written = std::thread::scope(|scope| {
            let handles: Vec<_> = self
                .targets
                .iter()
                .enumerate()
                .map(|(index, &surface)| {
                    let shared = &shared;
                    scope.spawn(move || write_loop(shared, index, surface))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| {
                    h.join().unwrap_or_else(|_| {
                        status.internal_stop_request("writer thread panicked");
                        0
                    })
                })
                .sum()
        });

        let mut exported = shared
            .exported
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        exported.sort_by_key(|(t, _)| *t);
        WriterReport { written, exported }
    }
}

fn write_loop<H: Host>(shared: &Shared<'_, H>, index: usize, surface: SurfaceId) -> usize {
    let mut written = 0;
    let mut finished = false;
    loop {
        let record = if finished || !shared.status.keep_running() {
            None
        } else {
            shared.input.try_pop()
        };
        finished = record.is_none();
        set_busy(shared, index, !finished);

        if let Some(rec) = &record
            && let Err(e) = commit(shared.client, surface, rec, shared.opts.color)
        {
            shared
                .status
                .internal_stop_request(format!("commit frame {}: {e}", rec.time.0));
        }

        shared.arrive.wait();
        if !any_busy(shared) {
            break;
        }
        if index == 0
            && let Err(e) = shared.client.try_call(|h: &mut H| h.refresh())
        {
            shared
                .status
                .internal_stop_request(format!("refresh host: {e}"));
        }
        shared.refreshed.wait();

        if let Some(rec) = record {
            if let Some(dir) = &shared.opts.export_dir {
                export_and_clear(shared, surface, &rec, dir);
            }
            written += 1;
            shared.progress.advance(Phase::Write, rec.time);
        }
        shared.drained.wait();
    }
    tracing::debug!(index, written, "writer finished");
    written
}

fn set_busy<H>(shared: &Shared<'_, H>, index: usize, busy: bool) {
    shared.busy.lock().unwrap_or_else(PoisonError::into_inner)[index] = busy;
}

fn any_busy<H>(shared: &Shared<'_, H>) -> bool {
    shared
        .busy
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .iter()
        .any(|&b| b)
}

fn commit<H: Host>(
    client: &HostClient<H>,
    surface: SurfaceId,
    rec: &BorderRecord,
    color: [u8; 4],
) -> BorderResult<()> {
    if rec.bounds.is_empty() {
        return Ok(());
    }
    let rgba = render_delta(&rec.delta, color);
    let rect = rec.bounds;
    client.try_call(move |h: &mut H| h.commit(surface, &rgba, rect))
}

fn export_and_clear<H: Host>(
    shared: &Shared<'_, H>,
    surface: SurfaceId,
    rec: &BorderRecord,
    dir: &Path,
) {
    let path = dir.join(export_file_name(rec.time));
    let target = path.clone();
    match shared
        .client
        .try_call(move |h: &mut H| h.export_frame(&target, surface))
    {
        Ok(()) => shared
            .exported
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((rec.time, path)),
        Err(e) => shared
            .status
            .internal_stop_request(format!("export frame {}: {e}", rec.time.0)),
    }

    if rec.bounds.is_empty() {
        return;
    }
    let rect = rec.bounds;
    if let Err(e) = shared
        .client
        .try_call(move |h: &mut H| h.clear(surface, rect))
    {
        shared
            .status
            .internal_stop_request(format!("clear frame {}: {e}", rec.time.0));
    }
}

/// Paint border pixels of `delta` with `color`, everything else transparent.
pub fn render_delta(delta: &OpacityMask, color: [u8; 4]) -> Vec<u8> {
    let mut out = Vec::with_capacity(delta.len() * 4);
    for &v in delta.as_slice() {
        out.extend_from_slice(if v != 0 { &color } else { &[0; 4] });
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/writer.rs"]
mod tests;
