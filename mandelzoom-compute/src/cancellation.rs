use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Trait for checking if computation should be cancelled
pub trait CancellationChecker: Clone + Send + Sync {
    /// Returns true if computation should be cancelled
    fn is_cancelled(&self) -> bool;
}

/// Never cancels - for single-threaded or non-cancellable contexts
#[derive(Clone, Copy, Debug, Default)]
pub struct NeverCancel;

impl CancellationChecker for NeverCancel {
    fn is_cancelled(&self) -> bool {
        false
    }
}

/// Cancelled once a shared generation counter moves past the generation the
/// work was started for.
#[derive(Clone, Debug)]
pub struct GenerationChecker {
    current: Arc<AtomicU64>,
    started: u64,
}

impl GenerationChecker {
    /// Capture the counter's present value as the generation of new work.
    pub fn new(current: Arc<AtomicU64>) -> Self {
        let started = current.load(Ordering::Acquire);
        Self { current, started }
    }

    pub fn generation(&self) -> u64 {
        self.started
    }
}

impl CancellationChecker for GenerationChecker {
    fn is_cancelled(&self) -> bool {
        self.current.load(Ordering::Acquire) != self.started
    }
}
