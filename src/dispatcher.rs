//! Replication dispatcher.
//!
//! Turns a fetched [`HistoryBatch`] into a [`ReplicationRequest`] and hands it
//! to the local [`ReplicationApplier`] under its own per-call timeout. No retry
//! and no interpretation of the applier's error happen here; the resender
//! classifies the result.

use crate::apply::ReplicationApplier;
use crate::error::{Operation, ResendError, Result};
use crate::metrics;
use crate::resilience::Deadline;
use crate::types::{HistoryBatch, ReplicationRequest, WorkflowExecutionRef};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::trace;

/// Delivers replication requests to the local applier.
pub struct ReplicationDispatcher {
    applier: Arc<dyn ReplicationApplier>,
    call_timeout: Duration,
}

impl ReplicationDispatcher {
    pub fn new(applier: Arc<dyn ReplicationApplier>, call_timeout: Duration) -> Self {
        Self {
            applier,
            call_timeout,
        }
    }

    /// Build the request for one batch. Pure: equal inputs give equal requests.
    pub fn build_request(execution: &WorkflowExecutionRef, batch: HistoryBatch) -> ReplicationRequest {
        ReplicationRequest {
            domain_id: execution.domain_id.clone(),
            workflow_execution: execution.execution(),
            events: batch.raw_event_batch,
            version_history_items: batch.version_history.items.clone(),
        }
    }

    /// Apply one request, bounded by the per-call timeout and `deadline`.
    pub async fn dispatch(
        &self,
        execution: &WorkflowExecutionRef,
        deadline: Deadline,
        request: ReplicationRequest,
    ) -> Result<()> {
        let start = Instant::now();
        let result = deadline
            .call(self.call_timeout, self.applier.apply(request))
            .await;
        metrics::record_dispatch(
            &execution.domain_id,
            matches!(result, Ok(Ok(()))),
            start.elapsed(),
        );

        match result {
            Ok(Ok(())) => {
                trace!(run_id = %execution.run_id, "Replicated event batch");
                Ok(())
            }
            Ok(Err(source)) => Err(ResendError::Apply {
                execution: execution.clone(),
                source,
            }),
            Err(expired) => {
                metrics::record_timeout(Operation::ReplicateEvents.as_str(), expired.bound());
                Err(expired.into_error(execution, Operation::ReplicateEvents))
            }
        }
    }
}
