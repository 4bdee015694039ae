//! Per-source run exclusivity.
//!
//! A second invocation for a source with a run already in flight is
//! rejected, not queued. The guard releases the lock on drop, so a run
//! that panics or errors still frees its source.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use uuid::Uuid;

/// Registry of sources with a run currently in flight.
#[derive(Clone, Default)]
pub struct RunLocks {
    held: Arc<Mutex<HashSet<Uuid>>>,
}

impl RunLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to acquire the run lock for a source. Returns `None` if a run
    /// for it is already in flight.
    pub fn acquire(&self, source_id: Uuid) -> Option<RunGuard> {
        let mut held = self.held.lock().unwrap();
        if held.insert(source_id) {
            Some(RunGuard {
                held: Arc::clone(&self.held),
                source_id,
            })
        } else {
            None
        }
    }

    pub fn is_held(&self, source_id: Uuid) -> bool {
        self.held.lock().unwrap().contains(&source_id)
    }
}

/// RAII guard for one source's run lock.
pub struct RunGuard {
    held: Arc<Mutex<HashSet<Uuid>>>,
    source_id: Uuid,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.held.lock().unwrap().remove(&self.source_id);
    }
}
