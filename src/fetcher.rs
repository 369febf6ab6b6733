// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Remote history fetcher.
//!
//! One call to [`RemoteHistoryFetcher::fetch_page`] is one round trip:
//!
//! 1. Resolve the domain ID to its name (fresh every time, never cached here)
//! 2. Request one page of raw history from the remote cluster, bounded by the
//!    per-call timeout nested inside the overall deadline
//! 3. Fan the page's raw batches out into [`HistoryBatch`]es that share the
//!    page's version history
//!
//! The fetcher is stateless across pages; the token lives in the
//! [`PagingIterator`](crate::pagination::PagingIterator) that drives it.

use crate::domain::DomainResolver;
use crate::error::{Operation, ResendError, Result};
use crate::metrics;
use crate::pagination::{Page, PageToken};
use crate::remote::{RawHistoryRequest, RemoteHistoryClient};
use crate::resilience::Deadline;
use crate::types::{EventRange, HistoryBatch, WorkflowExecutionRef};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};

/// Page size requested from the remote cluster.
pub const DEFAULT_PAGE_SIZE: i32 = 100;

/// Fetches raw history pages from the remote cluster.
pub struct RemoteHistoryFetcher {
    domains: Arc<dyn DomainResolver>,
    remote: Arc<dyn RemoteHistoryClient>,
    call_timeout: Duration,
}

impl RemoteHistoryFetcher {
    pub fn new(
        domains: Arc<dyn DomainResolver>,
        remote: Arc<dyn RemoteHistoryClient>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            domains,
            remote,
            call_timeout,
        }
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    /// Fetch the page identified by `token`.
    pub async fn fetch_page(
        &self,
        execution: &WorkflowExecutionRef,
        range: EventRange,
        deadline: Deadline,
        token: PageToken,
    ) -> Result<Page<HistoryBatch>> {
        let domain_name = self.resolve_domain_name(execution, deadline).await?;

        let request = RawHistoryRequest {
            domain: domain_name,
            execution: execution.execution(),
            range,
            maximum_page_size: DEFAULT_PAGE_SIZE,
            next_page_token: token,
        };

        let start = Instant::now();
        let response = match deadline
            .call(self.call_timeout, self.remote.get_raw_history(request))
            .await
        {
            Ok(Ok(response)) => {
                metrics::record_history_fetch(&execution.domain_id, true, start.elapsed());
                response
            }
            Ok(Err(source)) => {
                metrics::record_history_fetch(&execution.domain_id, false, start.elapsed());
                if source.is_not_found() {
                    warn!(run_id = %execution.run_id, error = %source, "Remote history not found");
                } else {
                    error!(run_id = %execution.run_id, error = %source, "Error getting history");
                }
                return Err(ResendError::Fetch {
                    execution: execution.clone(),
                    source,
                });
            }
            Err(expired) => {
                metrics::record_history_fetch(&execution.domain_id, false, start.elapsed());
                metrics::record_timeout(Operation::FetchHistory.as_str(), expired.bound());
                error!(
                    run_id = %execution.run_id,
                    bound = expired.bound(),
                    "Timed out getting history"
                );
                return Err(expired.into_error(execution, Operation::FetchHistory));
            }
        };

        let version_history = Arc::new(response.version_history.unwrap_or_default());
        let items: Vec<HistoryBatch> = response
            .history_batches
            .into_iter()
            .map(|raw_event_batch| HistoryBatch {
                version_history: Arc::clone(&version_history),
                raw_event_batch,
            })
            .collect();

        metrics::record_batches_fetched(&execution.domain_id, items.len());
        debug!(
            run_id = %execution.run_id,
            batches = items.len(),
            has_more = !response.next_page_token.is_empty(),
            "Fetched history page"
        );

        Ok(Page::new(items, response.next_page_token))
    }

    async fn resolve_domain_name(
        &self,
        execution: &WorkflowExecutionRef,
        deadline: Deadline,
    ) -> Result<String> {
        match deadline
            .bound(self.domains.get_domain_by_id(&execution.domain_id))
            .await
        {
            Ok(Ok(entry)) => Ok(entry.name),
            Ok(Err(source)) => {
                error!(run_id = %execution.run_id, error = %source, "Error getting domain");
                Err(ResendError::DomainLookup {
                    execution: execution.clone(),
                    source,
                })
            }
            Err(expired) => {
                metrics::record_timeout(Operation::DomainLookup.as_str(), expired.bound());
                error!(run_id = %execution.run_id, "Timed out getting domain");
                Err(expired.into_error(execution, Operation::DomainLookup))
            }
        }
    }
}
