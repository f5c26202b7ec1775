// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Root scanning and collection triggers.

use tracing::debug;

use crate::value::Value;

use super::Interpreter;

/// Heap occupancy and cumulative collection counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    pub live: usize,
    pub threshold: usize,
    pub collections: usize,
    pub objects_freed: usize,
    pub last_freed: usize,
}

impl Interpreter {
    /// Run a full collection now. Roots are every binding in every live
    /// scope plus the values pinned by expressions still being evaluated.
    /// Returns the number of objects freed.
    pub fn collect_garbage(&mut self) -> usize {
        debug!(live = self.heap.len(), pending = self.pending.len(), "gc: start");

        let mut marked = 0;
        for value in self.env.values().chain(self.pending.iter()) {
            marked += self.heap.mark(value);
        }
        let freed = self.heap.sweep();

        self.stats.collections += 1;
        self.stats.objects_freed += freed;
        self.stats.last_freed = freed;

        debug!(marked, freed, live = self.heap.len(), "gc: end");
        freed
    }

    pub fn heap_stats(&self) -> HeapStats {
        HeapStats {
            live: self.heap.len(),
            threshold: self.config.gc_threshold,
            ..self.stats
        }
    }

    /// Collect if the live count is over the threshold. Called right after
    /// an allocation, with the new object pinned by the caller.
    pub(super) fn check_heap_pressure(&mut self) {
        if self.heap.len() > self.config.gc_threshold {
            self.collect_garbage();
        }
    }

    /// Run `f` with `value` treated as a root, unpinning it afterwards
    /// whatever `f` returns.
    pub(super) fn with_pinned<T>(&mut self, value: Value, f: impl FnOnce(&mut Self) -> T) -> T {
        self.pending.push(value);
        let result = f(self);
        self.pending.pop();
        result
    }
}
