// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Resend orchestrator.
//!
//! The public entry point that ties together:
//! - Raw history fetching via [`crate::fetcher::RemoteHistoryFetcher`]
//! - Token pagination via [`crate::pagination::PagingIterator`]
//! - Local replication via [`crate::dispatcher::ReplicationDispatcher`]
//! - Not-found recovery via [`crate::repair::RepairGate`]
//!
//! # Flow
//!
//! ```text
//! send_single_workflow_history(execution, range)
//!   │
//!   ├─ overall deadline = timeout_source(domain_id)   (0 / unset = none)
//!   │
//!   └─ for batch in pages(execution, range):          (strict remote order)
//!        ├─ fetch error, not found ──▶ repair gate ──▶ SkipTask | original error
//!        ├─ fetch error, other     ──▶ return error
//!        └─ dispatch(batch)
//!             ├─ ok                ──▶ next batch
//!             ├─ not found         ──▶ repair gate ──▶ SkipTask | original error
//!             └─ other error       ──▶ return error
//! ```
//!
//! There is no partial success and no retry here: the first failure ends the
//! call, and retry policy belongs to whoever scheduled the resend.

use crate::apply::ReplicationApplier;
use crate::config::{DomainTimeoutSource, ResendConfig};
use crate::dispatcher::ReplicationDispatcher;
use crate::domain::DomainResolver;
use crate::error::{ResendError, Result};
use crate::fetcher::RemoteHistoryFetcher;
use crate::invariant::InvariantChecker;
use crate::metrics;
use crate::pagination::PagingIterator;
use crate::remote::RemoteHistoryClient;
use crate::repair::RepairGate;
use crate::resilience::Deadline;
use crate::types::{EventRange, WorkflowExecutionRef};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Object-safe resend interface, for callers that want to substitute the engine.
pub trait HistoryResender: Send + Sync {
    /// Resend one run's history in `range` to the local cluster.
    fn send_single_workflow_history<'a>(
        &'a self,
        execution: &'a WorkflowExecutionRef,
        range: EventRange,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// The history resender.
///
/// Holds only shared, immutable collaborators, so one instance serves any
/// number of concurrent resends for different executions.
pub struct Resender {
    fetcher: RemoteHistoryFetcher,
    dispatcher: ReplicationDispatcher,
    repair_gate: RepairGate,
    timeout_source: Option<Arc<dyn DomainTimeoutSource>>,
}

impl Resender {
    /// Create a resender with no invariant checker.
    ///
    /// When `config.domain_timeouts` is set it becomes the overall-deadline
    /// source; [`with_timeout_source`](Self::with_timeout_source) replaces it.
    pub fn new(
        domains: Arc<dyn DomainResolver>,
        remote: Arc<dyn RemoteHistoryClient>,
        applier: Arc<dyn ReplicationApplier>,
        config: &ResendConfig,
    ) -> Self {
        let call_timeout = config.call_timeout_duration();
        let timeout_source = config
            .domain_timeouts
            .clone()
            .map(|timeouts| Arc::new(timeouts) as Arc<dyn DomainTimeoutSource>);

        Self {
            fetcher: RemoteHistoryFetcher::new(domains, remote, call_timeout),
            dispatcher: ReplicationDispatcher::new(applier, call_timeout),
            repair_gate: RepairGate::disabled(),
            timeout_source,
        }
    }

    /// Use a dynamic per-domain deadline source.
    #[must_use]
    pub fn with_timeout_source(mut self, source: Arc<dyn DomainTimeoutSource>) -> Self {
        self.timeout_source = Some(source);
        self
    }

    /// Enable current-execution repair on remote not-found.
    #[must_use]
    pub fn with_invariant_checker(mut self, checker: Arc<dyn InvariantChecker>) -> Self {
        self.repair_gate = RepairGate::new(Some(checker));
        self
    }

    fn overall_deadline(&self, domain_id: &str) -> Deadline {
        match self.timeout_source {
            Some(ref source) => Deadline::from_budget(source.timeout_for(domain_id)),
            None => Deadline::none(),
        }
    }

    /// Resend one run's history in `range`, batch by batch, in remote order.
    ///
    /// Returns `Ok(())` once every batch was applied,
    /// [`ResendError::SkipTask`] when the source workflow is gone and local
    /// state is healthy, or the first error encountered.
    pub async fn send_single_workflow_history(
        &self,
        execution: &WorkflowExecutionRef,
        range: EventRange,
    ) -> Result<()> {
        let span = info_span!(
            "resend",
            domain_id = %execution.domain_id,
            workflow_id = %execution.workflow_id,
            run_id = %execution.run_id,
        );

        async move {
            let start = Instant::now();
            let deadline = self.overall_deadline(&execution.domain_id);
            debug!(
                bounded = deadline.is_bounded(),
                budget_ms = deadline.budget().as_millis() as u64,
                unbounded_range = range.is_unbounded(),
                "Starting history resend"
            );

            let fetcher = &self.fetcher;
            let mut history = PagingIterator::new(move |token| {
                fetcher.fetch_page(execution, range, deadline, token)
            });

            let mut dispatched = 0usize;
            let result = loop {
                let batch = match history.next().await {
                    None => break Ok(()),
                    Some(Ok(batch)) => batch,
                    Some(Err(e)) if e.is_execution_not_found() => {
                        break self.handle_not_found(execution, e).await;
                    }
                    Some(Err(e)) => {
                        error!(error = %e, "Failed to get history events");
                        break Err(e);
                    }
                };

                let request = ReplicationDispatcher::build_request(execution, batch);
                match self.dispatcher.dispatch(execution, deadline, request).await {
                    Ok(()) => dispatched += 1,
                    Err(e) if e.is_execution_not_found() => {
                        break self.handle_not_found(execution, e).await;
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to replicate events");
                        break Err(e);
                    }
                }
            };

            let outcome = match &result {
                Ok(()) => "success",
                Err(e) if e.is_skip() => "skipped",
                Err(_) => "failure",
            };
            metrics::record_resend(&execution.domain_id, outcome, dispatched, start.elapsed());
            if result.is_ok() {
                info!(
                    batches = dispatched,
                    pages = history.pages_fetched(),
                    "History resend complete"
                );
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Route an execution-not-found through the repair gate.
    async fn handle_not_found(&self, execution: &WorkflowExecutionRef, err: ResendError) -> Result<()> {
        warn!(error = %err, "Workflow execution not found");
        if self.repair_gate.resolve_not_found(execution).await {
            return Err(ResendError::SkipTask {
                execution: execution.clone(),
            });
        }
        Err(err)
    }
}

impl HistoryResender for Resender {
    fn send_single_workflow_history<'a>(
        &'a self,
        execution: &'a WorkflowExecutionRef,
        range: EventRange,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(Resender::send_single_workflow_history(self, execution, range))
    }
}
