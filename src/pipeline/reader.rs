use crate::foundation::core::{FrameIndex, OpacityMask, Rect};
use crate::foundation::error::BorderResult;
use crate::host::proxy::HostClient;
use crate::host::sink::Host;
use crate::pipeline::progress::{Phase, ProgressTracker};
use crate::pipeline::records::{FrameRecord, RecordQueue};
use crate::pipeline::status::PipelineStatus;

/// Sequential extraction stage.
///
/// Walks `frames` in order, pulls each frame's opacity from the host, pads it by `thickness` so the
/// border has room to grow, and enqueues a [`FrameRecord`]. Host failures become internal stop
/// requests; the reader never returns an error.
#[derive(Debug)]
pub struct Reader<'a> {
    frames: &'a [FrameIndex],
    thickness: u32,
}

impl<'a> Reader<'a> {
    /// Read `frames`, padding each by `thickness` pixels.
    pub fn new(frames: &'a [FrameIndex], thickness: u32) -> Self {
        Self { frames, thickness }
    }

    /// Run the stage; returns how many records were enqueued.
    #[tracing::instrument(skip_all, fields(frames = self.frames.len(), thickness = self.thickness))]
    pub fn run<H: Host>(
        &self,
        client: &HostClient<H>,
        status: &PipelineStatus,
        progress: &ProgressTracker,
        out: &RecordQueue<FrameRecord>,
    ) -> usize {
        let mut read = 0;
        for &time in self.frames {
            if !status.keep_running() {
                tracing::debug!(time = time.0, "reader stopping early");
                break;
            }
            match self.read_one(client, time) {
                Ok(record) => {
                    out.push(record);
                    read += 1;
                    progress.advance(Phase::Extract, time);
                }
                Err(e) => {
                    status.internal_stop_request(format!("read frame {}: {e}", time.0));
                    break;
                }
            }
        }
        read
    }

    fn read_one<H: Host>(
        &self,
        client: &HostClient<H>,
        time: FrameIndex,
    ) -> BorderResult<FrameRecord> {
        let thickness = self.thickness;
        let (mask, content, bounds): (OpacityMask, Rect, Rect) = client.try_call(move |h: &mut H| {
            h.set_time(time)?;
            let (mask, content) = h.extract(time)?;
            Ok((mask, content, h.bounds(content, thickness)))
        })?;
        let mask = mask.embed(content, bounds)?;
        tracing::debug!(time = time.0, ?bounds, opaque = mask.opaque_count(), "frame read");
        Ok(FrameRecord { mask, time, bounds })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/pipeline/reader.rs"]
mod tests;
