use crate::foundation::core::{FrameIndex, Rect};
use crate::foundation::error::BorderResult;
use crate::host::source::FrameSource;
use std::path::{Path, PathBuf};

/// Handle to a writable surface owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SurfaceId(pub u64);

/// Write side of the host: surfaces, commits, and durable frame export.
pub trait FrameSink {
    /// Create a transparent, canvas-sized surface.
    fn create_surface(&mut self, name: &str) -> BorderResult<SurfaceId>;

    /// Delete a surface.
    fn remove_surface(&mut self, surface: SurfaceId) -> BorderResult<()>;

    /// Copy straight RGBA8 pixels covering `rect` into `surface`.
    fn commit(&mut self, surface: SurfaceId, rgba: &[u8], rect: Rect) -> BorderResult<()>;

    /// Reset `rect` of `surface` to transparent.
    fn clear(&mut self, surface: SurfaceId, rect: Rect) -> BorderResult<()> {
        let zeros = vec![0u8; rect.area() * 4];
        self.commit(surface, &zeros, rect)
    }

    /// Flush pending commits so that exports observe them.
    fn refresh(&mut self) -> BorderResult<()>;

    /// Write the current content of `surface` to `path`.
    fn export_frame(&mut self, path: &Path, surface: SurfaceId) -> BorderResult<()>;

    /// Load previously exported frames, in order, as a new animated surface starting at `start`.
    fn import_frames(&mut self, start: FrameIndex, paths: &[PathBuf]) -> BorderResult<SurfaceId>;
}

/// A host resource usable by the border pipeline.
///
/// Hosts are owned by one thread at a time; worker threads reach them through
/// [`crate::HostClient`].
pub trait Host: FrameSource + FrameSink + Send + 'static {}

impl<T> Host for T where T: FrameSource + FrameSink + Send + 'static {}
