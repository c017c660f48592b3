//! Host-supplied progress and update sinks.

use super::function_parser::TapsetTree;
use log::info;
use std::sync::atomic::{AtomicBool, Ordering};

/// Coarse progress reporting with cooperative cancellation
pub trait ProgressSink: Send + Sync {
    fn begin(&self, task: &str, total_work: usize);
    fn worked(&self, units: usize);

    /// Polled between line-processing steps
    fn is_cancelled(&self) -> bool {
        false
    }

    fn done(&self);
}

/// Receives each completed tree exactly once per run
pub trait TreeListener: Send + Sync {
    fn on_update(&self, tree: &TapsetTree);
}

/// Progress sink that ignores everything
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn begin(&self, _task: &str, _total_work: usize) {}
    fn worked(&self, _units: usize) {}
    fn done(&self) {}
}

/// Progress sink that logs milestones and can be cancelled from another thread
#[derive(Debug, Default)]
pub struct LogProgress {
    cancelled: AtomicBool,
}

impl LogProgress {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

impl ProgressSink for LogProgress {
    fn begin(&self, task: &str, total_work: usize) {
        info!("{}: {} lines to scan", task, total_work);
    }

    fn worked(&self, _units: usize) {}

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn done(&self) {
        info!("Tapset scan finished");
    }
}
