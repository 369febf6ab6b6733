// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Local replication apply boundary.
//!
//! The resender never commits events itself. It hands each
//! [`ReplicationRequest`] to a [`ReplicationApplier`], which the embedding
//! history service implements on top of its real replication path.
//!
//! # Example
//!
//! ```rust,no_run
//! use history_resender::apply::ReplicationApplier;
//! use history_resender::error::BoxFuture;
//! use history_resender::types::ReplicationRequest;
//!
//! struct HistoryServiceApplier { /* client handle */ }
//!
//! impl ReplicationApplier for HistoryServiceApplier {
//!     fn apply(&self, request: ReplicationRequest) -> BoxFuture<'_, ()> {
//!         Box::pin(async move {
//!             let _ = request; // forward to the history service
//!             Ok(())
//!         })
//!     }
//! }
//! ```

use crate::error::BoxFuture;
use crate::types::ReplicationRequest;

/// Delivers one replication request to the local cluster.
///
/// Shared across concurrent resends of different executions, so it must be
/// safe for concurrent use. A missing execution on the local side should be
/// reported with [`ErrorKind::NotFound`](crate::ErrorKind::NotFound).
pub trait ReplicationApplier: Send + Sync {
    fn apply(&self, request: ReplicationRequest) -> BoxFuture<'_, ()>;
}

/// A no-op applier for testing/standalone mode.
///
/// Logs requests but doesn't replicate anything.
#[derive(Debug, Clone, Default)]
pub struct NoOpApplier;

impl ReplicationApplier for NoOpApplier {
    fn apply(&self, request: ReplicationRequest) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            tracing::debug!(
                domain_id = %request.domain_id,
                workflow_id = %request.workflow_execution.workflow_id,
                run_id = %request.workflow_execution.run_id,
                len = request.events.len(),
                version_items = request.version_history_items.len(),
                "NoOp: would replicate events"
            );
            Ok(())
        })
    }
}
