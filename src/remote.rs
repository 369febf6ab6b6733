// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Remote cluster raw-history RPC boundary.
//!
//! [`RemoteHistoryClient`] is the admin-API call that returns one page of a
//! workflow's serialized history. The wire client lives outside this crate;
//! this module only defines the request/response shapes and the trait.

use crate::error::BoxFuture;
use crate::pagination::PageToken;
use crate::types::{DataBlob, EventRange, VersionHistory, WorkflowExecution};

/// One page request for raw history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawHistoryRequest {
    /// Domain *name* (not ID) as the remote cluster knows it.
    pub domain: String,
    pub execution: WorkflowExecution,
    pub range: EventRange,
    pub maximum_page_size: i32,
    /// Empty on the first request; otherwise the previous response's token, verbatim.
    pub next_page_token: PageToken,
}

/// One page of raw history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawHistoryResponse {
    /// Serialized event batches, in history order.
    pub history_batches: Vec<DataBlob>,
    /// Version history shared by every batch in this page.
    pub version_history: Option<VersionHistory>,
    /// Empty when there are no further pages.
    pub next_page_token: PageToken,
}

/// Client for the remote cluster's raw-history API.
///
/// Implementations must report a missing workflow execution with
/// [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) so the resender can
/// route it to the repair gate instead of treating it as a transport failure.
pub trait RemoteHistoryClient: Send + Sync {
    fn get_raw_history(&self, request: RawHistoryRequest) -> BoxFuture<'_, RawHistoryResponse>;
}
