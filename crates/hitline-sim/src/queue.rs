//! Resolution queue: hit groups waiting for their trigger time.

use tracing::trace;

use crate::hit::HitGroup;

/// Pending hit groups in insertion order.
#[derive(Debug, Default)]
pub struct ResolutionQueue {
    pending: Vec<HitGroup>,
}

impl ResolutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, group: HitGroup) {
        debug_assert!(!group.is_empty(), "empty hit group scheduled");
        self.pending.push(group);
    }

    /// Release every group with `time <= now_ms`, in insertion order.
    ///
    /// Released groups leave the queue for good; a second call with the
    /// same `now_ms` returns nothing.
    pub fn slice_current_hits(&mut self, now_ms: f64) -> Vec<HitGroup> {
        if !self.pending.iter().any(|g| g.is_due(now_ms)) {
            return Vec::new();
        }
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.pending)
            .into_iter()
            .partition(|g| g.is_due(now_ms));
        self.pending = pending;
        trace!(
            released = due.len(),
            pending = self.pending.len(),
            now_ms,
            "released hit groups"
        );
        due
    }

    /// Earliest trigger time still waiting.
    pub fn next_due_ms(&self) -> Option<f64> {
        self.pending.iter().map(HitGroup::time_ms).min_by(f64::total_cmp)
    }

    pub fn pending(&self) -> &[HitGroup] {
        &self.pending
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop everything still scheduled.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}
