//! Todo identifier allocation.

use std::sync::atomic::{AtomicI32, Ordering};

/// Hands out todo identifiers.
///
/// The allocator owns a counter holding the highest id it has seen so far.
/// Generated ids are always strictly greater than every id previously
/// generated or observed. The counter is only ever advanced, never set.
#[derive(Debug, Default)]
pub struct IdAllocator {
    next_id: AtomicI32,
}

impl IdAllocator {
    /// Creates an allocator starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for a new todo whose client-supplied id is `requested`.
    ///
    /// `0` allocates a fresh id. A positive id is kept as is and advances the
    /// counter past it. Returns `None` for negative ids and when the id space
    /// is exhausted.
    pub fn assign(&self, requested: i32) -> Option<i32> {
        match requested {
            0 => self.next(),
            id if id > 0 => {
                self.observe(id);
                Some(id)
            }
            _ => None,
        }
    }

    /// Allocates a fresh id.
    pub fn next(&self) -> Option<i32> {
        self.next_id
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                current.checked_add(1)
            })
            .ok()
            .map(|previous| previous + 1)
    }

    /// Advances the counter to `id` if it is behind it.
    pub fn observe(&self, id: i32) {
        self.next_id.fetch_max(id, Ordering::SeqCst);
    }

    /// Highest id handed out or observed so far.
    pub fn current(&self) -> i32 {
        self.next_id.load(Ordering::SeqCst)
    }
}
