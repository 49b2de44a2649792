use std::sync::Arc;

use poll_promise::Promise;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;
use crate::data::{ApiResult, BatchJob};
use crate::ui::app::DashboardApp;

/// A batch trigger waiting for the backend's acknowledgement
pub(super) struct PendingBatch {
    slot: String,
    label: String,
    promise: Promise<ApiResult<String>>,
}

impl DashboardApp {
    /// Fires a batch job unless the same trigger is still outstanding.
    pub(super) fn start_batch(&mut self, job: BatchJob) {
        let Some(api) = self.api.as_ref().map(Arc::clone) else {
            return;
        };
        let slot = job.slot();
        if self.pending_batches.iter().any(|p| p.slot == slot) {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_ui_interactions {
                log::info!("Batch slot '{}' is busy, ignoring trigger", slot);
            }
            return;
        }

        let label = job.label();
        log::info!("Triggering batch: {}", label);
        let promise = Promise::spawn_async(job.run(api));
        self.pending_batches.push(PendingBatch {
            slot,
            label,
            promise,
        });
    }

    /// Moves every settled batch into the session log.
    pub(super) fn poll_batches(&mut self) {
        let mut finished = Vec::new();
        self.pending_batches.retain(|pending| match pending.promise.ready() {
            Some(result) => {
                let outcome = result.clone().map_err(|e| e.to_string());
                finished.push((pending.label.clone(), outcome));
                false
            }
            None => true,
        });
        for (label, outcome) in finished {
            self.batch_log.record(label, outcome);
        }
    }

    pub(super) fn busy_slots(&self) -> Vec<String> {
        self.pending_batches.iter().map(|p| p.slot.clone()).collect()
    }

    pub(super) fn has_pending_batches(&self) -> bool {
        !self.pending_batches.is_empty()
    }
}
