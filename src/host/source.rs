use crate::foundation::core::{Canvas, FrameIndex, OpacityMask, Rect};
use crate::foundation::error::{BorderError, BorderResult};

/// Alpha values that count as transparent.
///
/// A pixel is transparent iff its alpha lies in `[target - threshold, target + threshold]`,
/// saturating in the `u8` domain. Every other pixel is opaque.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AlphaMatch {
    /// Alpha value treated as fully transparent.
    #[serde(default)]
    pub target: u8,
    /// Allowed distance from `target`.
    #[serde(default)]
    pub threshold: u8,
}

impl AlphaMatch {
    /// Return `true` when `alpha` matches the transparent target.
    #[inline]
    pub fn is_transparent(self, alpha: u8) -> bool {
        let lo = self.target.saturating_sub(self.threshold);
        let hi = self.target.saturating_add(self.threshold);
        (lo..=hi).contains(&alpha)
    }
}

/// Read side of the host: per-frame opacity extraction.
pub trait FrameSource {
    /// Canvas dimensions.
    fn canvas(&self) -> Canvas;

    /// Current time cursor.
    fn current_time(&self) -> FrameIndex;

    /// Move the time cursor.
    fn set_time(&mut self, time: FrameIndex) -> BorderResult<()>;

    /// Opacity of the source layer at `time`, cropped to its opaque content.
    ///
    /// Returns the cropped mask and the rectangle it covers in canvas coordinates.
    fn extract(&mut self, time: FrameIndex) -> BorderResult<(OpacityMask, Rect)>;

    /// Grow `constraint` by `thickness` pixels per side, clipped to the canvas.
    fn bounds(&self, constraint: Rect, thickness: u32) -> Rect {
        constraint.grow_clipped(thickness, self.canvas().rect())
    }
}

/// Build a full-canvas mask from straight RGBA8 pixels.
pub fn mask_from_rgba(rgba: &[u8], width: usize, alpha: AlphaMatch) -> BorderResult<OpacityMask> {
    if !rgba.len().is_multiple_of(4) {
        return Err(BorderError::host(format!(
            "RGBA buffer length {} is not a multiple of 4",
            rgba.len()
        )));
    }
    let data = rgba
        .chunks_exact(4)
        .map(|px| {
            if alpha.is_transparent(px[3]) {
                OpacityMask::TRANSPARENT
            } else {
                OpacityMask::OPAQUE
            }
        })
        .collect();
    OpacityMask::new(width, data)
}

/// Crop `mask` to the bounding rectangle of its opaque pixels.
///
/// A mask without opaque pixels crops to an empty rectangle at the origin.
pub fn crop_to_content(mask: &OpacityMask) -> (OpacityMask, Rect) {
    let w = mask.width();
    let (mut x0, mut y0, mut x1, mut y1) = (usize::MAX, usize::MAX, 0usize, 0usize);
    for (i, &v) in mask.as_slice().iter().enumerate() {
        if v != 0 {
            let (x, y) = (i % w, i / w);
            x0 = x0.min(x);
            y0 = y0.min(y);
            x1 = x1.max(x + 1);
            y1 = y1.max(y + 1);
        }
    }
    if x0 == usize::MAX {
        return (OpacityMask::default(), Rect::default());
    }

    let cw = x1 - x0;
    let mut data = Vec::with_capacity(cw * (y1 - y0));
    for row in mask.as_slice().chunks_exact(w).skip(y0).take(y1 - y0) {
        data.extend_from_slice(&row[x0..x1]);
    }
    let rect = Rect::new(x0 as u32, y0 as u32, cw as u32, (y1 - y0) as u32);
    (OpacityMask::new(cw, data).unwrap_or_default(), rect)
}

#[cfg(test)]
#[path = "../../tests/unit/host/source.rs"]
mod tests;
