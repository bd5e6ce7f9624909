use crate::foundation::core::{Canvas, FrameIndex, FrameRange, OpacityMask, Rect};
use crate::foundation::error::{BorderError, BorderResult};
use crate::host::sink::{FrameSink, SurfaceId};
use crate::host::source::{AlphaMatch, FrameSource, crop_to_content, mask_from_rgba};
use image::RgbaImage;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// A host-owned surface: one frame for pipeline targets, several for imported animations.
#[derive(Clone, Debug)]
pub struct Surface {
    name: String,
    start: FrameIndex,
    frames: Vec<RgbaImage>,
}

impl Surface {
    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Timeline position of the first frame.
    pub fn start(&self) -> FrameIndex {
        self.start
    }

    /// Frames in timeline order.
    pub fn frames(&self) -> &[RgbaImage] {
        &self.frames
    }
}

/// In-memory raster canvas: a source layer (one RGBA8 image per frame) plus writable surfaces.
///
/// Frames export as PNG files and import back from them.
#[derive(Clone, Debug)]
pub struct RasterHost {
    canvas: Canvas,
    layer: Vec<RgbaImage>,
    alpha: AlphaMatch,
    time: FrameIndex,
    surfaces: BTreeMap<SurfaceId, Surface>,
    next_surface: u64,
    refreshes: u64,
}

impl RasterHost {
    /// Build a host whose source layer has one frame per image.
    ///
    /// All frames must share the same non-zero dimensions.
    pub fn new(layer: Vec<RgbaImage>) -> BorderResult<Self> {
        let first = layer
            .first()
            .ok_or_else(|| BorderError::validation("source layer needs at least one frame"))?;
        let canvas = Canvas {
            width: first.width(),
            height: first.height(),
        };
        if canvas.width == 0 || canvas.height == 0 {
            return Err(BorderError::validation("canvas width/height must be non-zero"));
        }
        if let Some((i, _)) = layer
            .iter()
            .enumerate()
            .find(|(_, f)| f.dimensions() != (canvas.width, canvas.height))
        {
            return Err(BorderError::validation(format!(
                "frame {i} does not match the {}x{} canvas",
                canvas.width, canvas.height
            )));
        }
        Ok(Self {
            canvas,
            layer,
            alpha: AlphaMatch::default(),
            time: FrameIndex(0),
            surfaces: BTreeMap::new(),
            next_surface: 0,
            refreshes: 0,
        })
    }

    /// Load the source layer from image files, one frame per path.
    pub fn from_paths<P: AsRef<Path>>(paths: &[P]) -> BorderResult<Self> {
        let layer = paths
            .iter()
            .map(|p| load_rgba(p.as_ref()))
            .collect::<BorderResult<Vec<_>>>()?;
        Self::new(layer)
    }

    /// Use `alpha` to decide which pixels are transparent.
    pub fn with_alpha_match(mut self, alpha: AlphaMatch) -> Self {
        self.alpha = alpha;
        self
    }

    /// Number of frames in the source layer.
    pub fn frame_count(&self) -> u64 {
        self.layer.len() as u64
    }

    /// Timeline covering every source frame.
    pub fn timeline(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frame_count()),
        }
    }

    /// Look up a surface.
    pub fn surface(&self, id: SurfaceId) -> Option<&Surface> {
        self.surfaces.get(&id)
    }

    /// Ids of every live surface, ascending.
    pub fn surface_ids(&self) -> Vec<SurfaceId> {
        self.surfaces.keys().copied().collect()
    }

    /// Number of refresh requests served.
    pub fn refresh_count(&self) -> u64 {
        self.refreshes
    }

    fn surface_mut(&mut self, id: SurfaceId) -> BorderResult<&mut Surface> {
        self.surfaces
            .get_mut(&id)
            .ok_or_else(|| BorderError::host(format!("unknown surface {}", id.0)))
    }

    fn insert_surface(&mut self, surface: Surface) -> SurfaceId {
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, surface);
        id
    }
}

impl FrameSource for RasterHost {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn current_time(&self) -> FrameIndex {
        self.time
    }

    fn set_time(&mut self, time: FrameIndex) -> BorderResult<()> {
        if time.0 >= self.frame_count() {
            return Err(BorderError::host(format!(
                "time {} is outside the {}-frame layer",
                time.0,
                self.frame_count()
            )));
        }
        self.time = time;
        Ok(())
    }

    fn extract(&mut self, time: FrameIndex) -> BorderResult<(OpacityMask, Rect)> {
        let frame = usize::try_from(time.0)
            .ok()
            .and_then(|i| self.layer.get(i))
            .ok_or_else(|| BorderError::host(format!("no source frame at time {}", time.0)))?;
        let full = mask_from_rgba(frame.as_raw(), self.canvas.width as usize, self.alpha)?;
        Ok(crop_to_content(&full))
    }
}

impl FrameSink for RasterHost {
    fn create_surface(&mut self, name: &str) -> BorderResult<SurfaceId> {
        let frame = RgbaImage::new(self.canvas.width, self.canvas.height);
        Ok(self.insert_surface(Surface {
            name: name.to_string(),
            start: self.time,
            frames: vec![frame],
        }))
    }

    fn remove_surface(&mut self, surface: SurfaceId) -> BorderResult<()> {
        self.surfaces
            .remove(&surface)
            .map(|_| ())
            .ok_or_else(|| BorderError::host(format!("unknown surface {}", surface.0)))
    }

    fn commit(&mut self, surface: SurfaceId, rgba: &[u8], rect: Rect) -> BorderResult<()> {
        if !self.canvas.rect().contains_rect(rect) {
            return Err(BorderError::host(format!(
                "commit rect {rect:?} lies outside the canvas"
            )));
        }
        if rgba.len() != rect.area() * 4 {
            return Err(BorderError::host(format!(
                "commit buffer has {} bytes, rect needs {}",
                rgba.len(),
                rect.area() * 4
            )));
        }
        if rect.is_empty() {
            return Ok(());
        }

        let stride = self.canvas.width as usize * 4;
        let row_bytes = rect.width as usize * 4;
        let target = self.surface_mut(surface)?;
        let dst = target
            .frames
            .first_mut()
            .ok_or_else(|| BorderError::host("surface has no frame to commit into"))?;
        let dst: &mut [u8] = dst;
        for (row, src) in rgba.chunks_exact(row_bytes).enumerate() {
            let at = (rect.y as usize + row) * stride + rect.x as usize * 4;
            dst[at..at + row_bytes].copy_from_slice(src);
        }
        Ok(())
    }

    fn refresh(&mut self) -> BorderResult<()> {
        self.refreshes += 1;
        Ok(())
    }

    fn export_frame(&mut self, path: &Path, surface: SurfaceId) -> BorderResult<()> {
        let frame = self
            .surface_mut(surface)?
            .frames
            .first()
            .ok_or_else(|| BorderError::host("surface has no frame to export"))?;
        frame
            .save_with_format(path, image::ImageFormat::Png)
            .map_err(|e| BorderError::host(format!("export frame '{}': {e}", path.display())))
    }

    fn import_frames(&mut self, start: FrameIndex, paths: &[PathBuf]) -> BorderResult<SurfaceId> {
        let frames = paths
            .iter()
            .map(|p| load_rgba(p))
            .collect::<BorderResult<Vec<_>>>()?;
        if let Some(bad) = frames
            .iter()
            .position(|f| f.dimensions() != (self.canvas.width, self.canvas.height))
        {
            return Err(BorderError::host(format!(
                "imported frame '{}' does not match the canvas",
                paths[bad].display()
            )));
        }
        Ok(self.insert_surface(Surface {
            name: "border".to_string(),
            start,
            frames,
        }))
    }
}

fn load_rgba(path: &Path) -> BorderResult<RgbaImage> {
    image::open(path)
        .map(|img| img.to_rgba8())
        .map_err(|e| BorderError::host(format!("load image '{}': {e}", path.display())))
}

#[cfg(test)]
#[path = "../../tests/unit/host/raster.rs"]
mod tests;
