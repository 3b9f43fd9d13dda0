use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::debug;

/// Snapshot handed to a progress callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderProgress {
    /// Kernel pass that produced the event
    pub stage: &'static str,
    pub rows_done: usize,
    pub total_rows: usize,
}

pub type ProgressCallback = Arc<dyn Fn(RenderProgress) + Send + Sync>;

/// Counts finished rows across worker threads and reports once per batch.
///
/// Batches complete in whatever order the workers finish them, so callbacks
/// can arrive from any thread.
pub struct RowProgress<'a> {
    stage: &'static str,
    total_rows: usize,
    batch_rows: usize,
    done: AtomicUsize,
    callback: Option<&'a ProgressCallback>,
}

impl<'a> RowProgress<'a> {
    pub fn new(
        stage: &'static str,
        total_rows: usize,
        batch_rows: usize,
        callback: Option<&'a ProgressCallback>,
    ) -> Self {
        Self {
            stage,
            total_rows,
            batch_rows: batch_rows.max(1),
            done: AtomicUsize::new(0),
            callback,
        }
    }

    pub fn silent(stage: &'static str, total_rows: usize) -> Self {
        Self::new(stage, total_rows, usize::MAX, None)
    }

    pub fn row_finished(&self) {
        let rows_done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if rows_done % self.batch_rows != 0 && rows_done != self.total_rows {
            return;
        }

        debug!(stage = self.stage, rows_done, total_rows = self.total_rows, "Rows finished");
        if let Some(callback) = self.callback {
            callback(RenderProgress {
                stage: self.stage,
                rows_done,
                total_rows: self.total_rows,
            });
        }
    }

    pub fn rows_done(&self) -> usize {
        self.done.load(Ordering::Relaxed)
    }
}

impl fmt::Debug for RowProgress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowProgress")
            .field("stage", &self.stage)
            .field("total_rows", &self.total_rows)
            .field("batch_rows", &self.batch_rows)
            .field("rows_done", &self.rows_done())
            .field("has_callback", &self.callback.is_some())
            .finish()
    }
}
