use crate::foundation::error::{BorderError, BorderResult};

/// Absolute 0-based frame index in timeline space.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)` in timeline space.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex, // exclusive
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> BorderResult<Self> {
        if start.0 > end.0 {
            return Err(BorderError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }

    /// Iterate the frames of the range in timeline order.
    pub fn frames(self) -> impl Iterator<Item = FrameIndex> {
        (self.start.0..self.end.0).map(FrameIndex)
    }
}

/// Host canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The rectangle covering the whole canvas.
    pub fn rect(self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

/// Integer pixel rectangle in canvas coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its origin and size.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Number of pixels covered.
    pub fn area(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Return `true` when the rectangle covers no pixels.
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Return `true` when `other` lies entirely inside `self`.
    pub fn contains_rect(self, other: Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// Grow by `by` pixels on every side, clipped to `clip`.
    ///
    /// Empty rectangles stay empty: there is nothing to grow around.
    pub fn grow_clipped(self, by: u32, clip: Rect) -> Rect {
        if self.is_empty() {
            return Rect::new(self.x.min(clip.right()), self.y.min(clip.bottom()), 0, 0);
        }
        let x0 = self.x.saturating_sub(by).max(clip.x);
        let y0 = self.y.saturating_sub(by).max(clip.y);
        let x1 = self.right().saturating_add(by).min(clip.right());
        let y1 = self.bottom().saturating_add(by).min(clip.bottom());
        Rect::new(x0, y0, x1.saturating_sub(x0), y1.saturating_sub(y0))
    }
}

/// Per-pixel opacity buffer, row-major, one byte per pixel.
///
/// Outside the growth automaton every byte is either [`OpacityMask::TRANSPARENT`] or
/// [`OpacityMask::OPAQUE`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OpacityMask {
    width: usize,
    data: Vec<u8>,
}

impl OpacityMask {
    /// Byte value of a fully opaque pixel.
    pub const OPAQUE: u8 = 0xFF;
    /// Byte value of a fully transparent pixel.
    pub const TRANSPARENT: u8 = 0x00;

    /// Wrap `data` as a mask `width` pixels wide.
    pub fn new(width: usize, data: Vec<u8>) -> BorderResult<Self> {
        if data.is_empty() {
            return Ok(Self { width, data });
        }
        if width == 0 {
            return Err(BorderError::validation(
                "mask width must be > 0 for a non-empty mask",
            ));
        }
        if !data.len().is_multiple_of(width) {
            return Err(BorderError::validation(format!(
                "mask length {} is not a multiple of width {width}",
                data.len()
            )));
        }
        Ok(Self { width, data })
    }

    /// A fully transparent mask of the given size.
    pub fn transparent(width: usize, height: usize) -> Self {
        Self {
            width,
            data: vec![Self::TRANSPARENT; width.saturating_mul(height)],
        }
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        if self.width == 0 {
            0
        } else {
            self.data.len() / self.width
        }
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Return `true` when the mask covers no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Borrow the raw bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Take the raw bytes.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }

    /// Return `true` when the pixel at `(x, y)` is opaque.
    pub fn is_opaque(&self, x: usize, y: usize) -> bool {
        x < self.width && self.data.get(y * self.width + x).is_some_and(|&v| v != 0)
    }

    /// Count opaque pixels.
    pub fn opaque_count(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    /// Re-home a mask covering `from` into a transparent mask covering `into`.
    ///
    /// `into` must contain `from`; pixels outside `from` are transparent.
    pub fn embed(&self, from: Rect, into: Rect) -> BorderResult<Self> {
        if !into.contains_rect(from) && !from.is_empty() {
            return Err(BorderError::validation(format!(
                "cannot embed {from:?} into {into:?}"
            )));
        }
        if self.len() != from.area() {
            return Err(BorderError::validation(format!(
                "mask has {} pixels but its rectangle covers {}",
                self.len(),
                from.area()
            )));
        }
        let mut out = Self::transparent(into.width as usize, into.height as usize);
        if from.is_empty() {
            return Ok(out);
        }
        let dx = (from.x - into.x) as usize;
        let dy = (from.y - into.y) as usize;
        let w = from.width as usize;
        for (row, src) in self.data.chunks_exact(w).enumerate() {
            let start = (dy + row) * out.width + dx;
            out.data[start..start + w].copy_from_slice(src);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
