//! # History Resender
//!
//! Re-delivers a range of a workflow's event history from a remote (source)
//! cluster into the local cluster's replication pipeline.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────────┐
//! │                              history-resender                             │
//! │                                                                           │
//! │  ┌──────────┐    ┌────────────────┐    ┌──────────────────┐               │
//! │  │ Resender │───►│ PagingIterator │───►│ HistoryFetcher   │──► remote     │
//! │  │          │◄───│ (token cursor) │◄───│ (domain + RPC)   │    cluster    │
//! │  └──────────┘    └────────────────┘    └──────────────────┘               │
//! │       │  │                                                                │
//! │       │  └──────────────►┌──────────────────┐                             │
//! │       │                  │ Dispatcher       │──► local replication apply  │
//! │       │ not found        └──────────────────┘                             │
//! │       ▼                                                                   │
//! │  ┌────────────┐                                                           │
//! │  │ RepairGate │──► invariant checker (current execution record)           │
//! │  └────────────┘                                                           │
//! └───────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Batches are fetched and applied strictly in remote order, one at a time.
//! Each remote fetch and each local apply has its own timeout, nested inside
//! an optional per-domain deadline for the whole resend.
//!
//! ## Outcomes
//!
//! - `Ok(())`: every batch in the range was applied.
//! - [`ResendError::SkipTask`]: the source no longer has the workflow and the
//!   local record looks healthy. Drop the task; do not retry.
//! - Any other [`ResendError`]: the first failure. See
//!   [`ResendError::is_retryable()`].
//!
//! ## Usage
//!
//! ```rust,no_run
//! use history_resender::{
//!     EventRange, NoOpApplier, ResendConfig, Resender, StaticDomainResolver,
//!     WorkflowExecutionRef,
//! };
//! use history_resender::remote::RemoteHistoryClient;
//! use std::sync::Arc;
//!
//! async fn resend(remote: Arc<dyn RemoteHistoryClient>) {
//!     let domains = Arc::new(StaticDomainResolver::with_domains([("d1", "orders")]));
//!     let resender = Resender::new(domains, remote, Arc::new(NoOpApplier), &ResendConfig::default());
//!
//!     let execution = WorkflowExecutionRef::new("d1", "order-42", "run-7");
//!     match resender.send_single_workflow_history(&execution, EventRange::unbounded()).await {
//!         Ok(()) => {}
//!         Err(e) if e.is_skip() => { /* expected absence, drop the task */ }
//!         Err(e) => eprintln!("resend failed: {e}"),
//!     }
//! }
//! ```

pub mod apply;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod fetcher;
pub mod invariant;
pub mod metrics;
pub mod pagination;
pub mod remote;
pub mod repair;
pub mod resender;
pub mod resilience;
pub mod types;

// Re-exports for convenience
pub use apply::{NoOpApplier, ReplicationApplier};
pub use config::{DomainTimeoutConfig, DomainTimeoutSource, ResendConfig};
pub use domain::{DomainEntry, DomainResolver, StaticDomainResolver};
pub use error::{CollaboratorError, ErrorKind, ResendError, Result};
pub use invariant::{CheckOutcome, CheckResult, CurrentExecutionProbe, FixOutcome, FixResult, InvariantChecker};
pub use pagination::{Page, PageToken, PagingIterator};
pub use remote::{RawHistoryRequest, RawHistoryResponse, RemoteHistoryClient};
pub use resender::{HistoryResender, Resender};
pub use types::{DataBlob, EventRange, HistoryBatch, ReplicationRequest, WorkflowExecutionRef};
