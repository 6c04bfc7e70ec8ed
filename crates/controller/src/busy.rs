use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared in-flight flag; at most one completion call at a time.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag(Arc<AtomicBool>);

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Set the flag if it is clear. The flag clears again when the guard drops.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.0
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(self.0.clone()))
    }
}

/// Clears the busy flag on drop, whatever the outcome of the call.
#[derive(Debug)]
pub struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}
