use crate::foundation::core::{FrameIndex, OpacityMask, Rect};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Raw opacity of one frame, produced by the reader.
#[derive(Clone, Debug)]
pub struct FrameRecord {
    /// Opacity covering `bounds`.
    pub mask: OpacityMask,
    /// Frame the mask was extracted from.
    pub time: FrameIndex,
    /// Canvas rectangle covered by `mask`.
    pub bounds: Rect,
}

/// Newly grown border pixels of one frame, produced by the generators.
#[derive(Clone, Debug)]
pub struct BorderRecord {
    /// Pixels opaque after growth but not before.
    pub delta: OpacityMask,
    /// Frame the border belongs to.
    pub time: FrameIndex,
    /// Canvas rectangle covered by `delta`.
    pub bounds: Rect,
}

/// Multi-producer, multi-consumer record queue with non-blocking pops.
///
/// Consumers never wait for input: an empty queue means the stage is done.
#[derive(Debug)]
pub struct RecordQueue<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Default for RecordQueue<T> {
    fn default() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }
}

impl<T> RecordQueue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enqueue a record; ownership moves to the queue.
    pub fn push(&self, item: T) {
        self.lock().push_back(item);
    }

    /// Dequeue the oldest record, or `None` when empty.
    pub fn try_pop(&self) -> Option<T> {
        self.lock().pop_front()
    }

    /// Number of queued records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Return `true` when nothing is queued.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Take every queued record, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.lock().drain(..).collect()
    }
}
