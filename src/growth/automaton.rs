use crate::foundation::core::OpacityMask;
use crate::foundation::error::{BorderError, BorderResult};
use crate::growth::index::{IndexBuf, IndexWidth};
use crate::growth::policy::{GrowthPolicy, NeighborFlags};
use crate::growth::recipe::Recipe;

// Per-pixel state byte. The low nibble holds the neighbor flags in `NeighborFlags` bit order and is
// only meaningful while QUEUED is set; QUEUED and OPAQUE are valid for every pixel.
const QUEUED: u8 = 0b0001_0000;
const OPAQUE: u8 = 0b1000_0000;
const DIRS: u8 = NeighborFlags::ALL;

/// Incremental edge-growth automaton over a binary opacity mask.
///
/// Only the frontier (transparent pixels touching an opaque one) is revisited per step, so a step
/// costs O(frontier) rather than O(canvas). Instances are reusable: [`GrowthAutomaton::reset`]
/// keeps allocations when the buffer size is unchanged.
#[derive(Clone, Debug)]
pub struct GrowthAutomaton {
    width: usize,
    state: Vec<u8>,
    search: IndexBuf,
    modified: IndexBuf,
    preserved: IndexBuf,
}

impl GrowthAutomaton {
    /// Build the automaton from a raw mask `width` pixels wide; any non-zero byte is opaque.
    pub fn new(mask: &[u8], width: usize) -> BorderResult<Self> {
        let index = IndexWidth::for_len(mask.len())?;
        let mut out = Self {
            width: 0,
            state: Vec::new(),
            search: IndexBuf::new(index),
            modified: IndexBuf::new(index),
            preserved: IndexBuf::new(index),
        };
        out.reset(mask, width)?;
        Ok(out)
    }

    /// Build the automaton from an [`OpacityMask`].
    pub fn from_mask(mask: &OpacityMask) -> BorderResult<Self> {
        Self::new(mask.as_slice(), mask.width())
    }

    /// Reload a new mask, reusing buffers when the pixel count is unchanged.
    pub fn reset(&mut self, mask: &[u8], width: usize) -> BorderResult<()> {
        check_geometry(mask.len(), width)?;
        if mask.len() != self.state.len() {
            let index = IndexWidth::for_len(mask.len())?;
            self.state = vec![0; mask.len()];
            self.search = IndexBuf::new(index);
            self.modified = IndexBuf::new(index);
            self.preserved = IndexBuf::new(index);
        }
        self.width = width;
        for (s, &m) in self.state.iter_mut().zip(mask) {
            *s = if m != 0 { OPAQUE } else { 0 };
        }

        self.search.clear();
        self.modified.clear();
        self.preserved.clear();
        for pos in 0..self.state.len() {
            if self.state[pos] & OPAQUE != 0 {
                enqueue_neighbors(&mut self.state, self.width, pos, &mut self.preserved);
            }
        }
        self.refresh_preserved();
        std::mem::swap(&mut self.search, &mut self.preserved);
        Ok(())
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of pixels.
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Return `true` for an empty buffer.
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Width of the stored search indices.
    pub fn index_width(&self) -> IndexWidth {
        self.search.width()
    }

    /// Number of pixels eligible for the next step.
    pub fn frontier_len(&self) -> usize {
        self.search.len()
    }

    /// Positions eligible for the next step, in search order.
    pub fn frontier(&self) -> Vec<usize> {
        self.search.to_vec()
    }

    /// Number of opaque pixels.
    pub fn opaque_count(&self) -> usize {
        self.state.iter().filter(|&&s| s & OPAQUE != 0).count()
    }

    /// Neighbor flags of `pos` if it is on the frontier.
    pub fn neighbor_flags(&self, pos: usize) -> Option<NeighborFlags> {
        let s = *self.state.get(pos)?;
        (s & QUEUED != 0).then(|| NeighborFlags::from_bits(s & DIRS))
    }

    /// Run one growth step and return how many pixels became opaque.
    pub fn run_step(&mut self, policy: &GrowthPolicy) -> usize {
        self.modified.clear();
        self.preserved.clear();

        {
            let state = &mut self.state;
            let modified = &mut self.modified;
            let preserved = &mut self.preserved;
            self.search.for_each(|pos| {
                let s = state[pos];
                if policy.grows(NeighborFlags::from_bits(s & DIRS)) {
                    state[pos] = OPAQUE;
                    modified.push(pos);
                } else {
                    preserved.push(pos);
                }
            });
        }

        let grown = self.modified.len();
        {
            let state = &mut self.state;
            let preserved = &mut self.preserved;
            let width = self.width;
            self.modified
                .for_each(|pos| enqueue_neighbors(state, width, pos, preserved));
        }
        self.refresh_preserved();
        std::mem::swap(&mut self.search, &mut self.preserved);
        grown
    }

    /// Run every `(policy, steps)` pair of `recipe` in order; returns the total pixels grown.
    pub fn apply_recipe(&mut self, recipe: &Recipe) -> usize {
        let mut grown = 0;
        for step in recipe.steps() {
            for _ in 0..step.steps {
                grown += self.run_step(&step.policy);
            }
        }
        grown
    }

    /// Pixels opaque now but transparent in `original`, as `0x00`/`0xFF`.
    pub fn difference_with(&self, original: &[u8]) -> BorderResult<Vec<u8>> {
        self.check_len(original.len())?;
        Ok(self
            .state
            .iter()
            .zip(original)
            .map(|(&s, &o)| lift(s & OPAQUE != 0 && o == 0))
            .collect())
    }

    /// Pixels whose opacity differs from `other`, as `0x00`/`0xFF`.
    pub fn xor_with(&self, other: &[u8]) -> BorderResult<Vec<u8>> {
        self.check_len(other.len())?;
        Ok(self
            .state
            .iter()
            .zip(other)
            .map(|(&s, &o)| lift((s & OPAQUE != 0) != (o != 0)))
            .collect())
    }

    /// Current opacity as a canonical `0x00`/`0xFF` buffer.
    pub fn unlift(&self) -> Vec<u8> {
        self.state.iter().map(|&s| lift(s & OPAQUE != 0)).collect()
    }

    fn refresh_preserved(&mut self) {
        let state = &mut self.state;
        let width = self.width;
        self.preserved.for_each(|pos| {
            let flags = opaque_neighbors(state, width, pos);
            state[pos] = (state[pos] & !DIRS) | flags;
        });
    }

    fn check_len(&self, len: usize) -> BorderResult<()> {
        if len != self.state.len() {
            return Err(BorderError::validation(format!(
                "buffer has {len} pixels, automaton holds {}",
                self.state.len()
            )));
        }
        Ok(())
    }
}

fn check_geometry(len: usize, width: usize) -> BorderResult<()> {
    if len == 0 {
        return Ok(());
    }
    if width == 0 || !len.is_multiple_of(width) {
        return Err(BorderError::validation(format!(
            "mask of {len} pixels cannot be {width} pixels wide"
        )));
    }
    Ok(())
}

#[inline]
fn lift(opaque: bool) -> u8 {
    if opaque {
        OpacityMask::OPAQUE
    } else {
        OpacityMask::TRANSPARENT
    }
}

/// In-bounds 4-neighbors of `pos`, as `(flag, position)` pairs.
#[inline]
fn neighbors(len: usize, width: usize, pos: usize) -> [Option<(u8, usize)>; 4] {
    let col = pos % width;
    [
        (col != 0).then(|| (NeighborFlags::WEST, pos - 1)),
        (pos >= width).then(|| (NeighborFlags::NORTH, pos - width)),
        (pos + width < len).then(|| (NeighborFlags::SOUTH, pos + width)),
        (col != width - 1).then(|| (NeighborFlags::EAST, pos + 1)),
    ]
}

fn enqueue_neighbors(state: &mut [u8], width: usize, pos: usize, out: &mut IndexBuf) {
    for (_, n) in neighbors(state.len(), width, pos).into_iter().flatten() {
        if state[n] & (OPAQUE | QUEUED) == 0 {
            state[n] |= QUEUED;
            out.push(n);
        }
    }
}

fn opaque_neighbors(state: &[u8], width: usize, pos: usize) -> u8 {
    neighbors(state.len(), width, pos)
        .into_iter()
        .flatten()
        .filter(|&(_, n)| state[n] & OPAQUE != 0)
        .fold(0, |acc, (flag, _)| acc | flag)
}

#[cfg(test)]
#[path = "../../tests/unit/growth/automaton.rs"]
mod tests;
