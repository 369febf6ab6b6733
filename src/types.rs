//! Core value types shared by the fetch and replication paths.
//!
//! Everything here is transient: built and dropped within a single call to
//! [`Resender::send_single_workflow_history`](crate::Resender::send_single_workflow_history).
//! Event payloads are carried as opaque [`DataBlob`]s and never decoded.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Identity of one workflow run: `(domain_id, workflow_id, run_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowExecutionRef {
    pub domain_id: String,
    pub workflow_id: String,
    pub run_id: String,
}

impl WorkflowExecutionRef {
    pub fn new(
        domain_id: impl Into<String>,
        workflow_id: impl Into<String>,
        run_id: impl Into<String>,
    ) -> Self {
        Self {
            domain_id: domain_id.into(),
            workflow_id: workflow_id.into(),
            run_id: run_id.into(),
        }
    }

    /// The workflow/run half of the identity, as sent on the wire.
    pub fn execution(&self) -> WorkflowExecution {
        WorkflowExecution {
            workflow_id: self.workflow_id.clone(),
            run_id: self.run_id.clone(),
        }
    }
}

impl fmt::Display for WorkflowExecutionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.domain_id, self.workflow_id, self.run_id)
    }
}

/// Workflow ID + run ID, without the domain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorkflowExecution {
    pub workflow_id: String,
    pub run_id: String,
}

/// Optional event-ID/version bounds for a resend.
///
/// A `None` bound means "unbounded on that side". The version qualifies the
/// event ID so the remote can pick the right branch of a multi-version history.
/// Start/end ordering is not checked here; the remote cluster is authoritative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRange {
    #[serde(default)]
    pub start_event_id: Option<i64>,
    #[serde(default)]
    pub start_event_version: Option<i64>,
    #[serde(default)]
    pub end_event_id: Option<i64>,
    #[serde(default)]
    pub end_event_version: Option<i64>,
}

impl EventRange {
    /// The whole history.
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_start(mut self, event_id: i64, version: i64) -> Self {
        self.start_event_id = Some(event_id);
        self.start_event_version = Some(version);
        self
    }

    #[must_use]
    pub fn with_end(mut self, event_id: i64, version: i64) -> Self {
        self.end_event_id = Some(event_id);
        self.end_event_version = Some(version);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        *self == Self::default()
    }
}

/// Serialization format of a [`DataBlob`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EncodingType {
    #[default]
    ThriftRw,
    Json,
    Proto,
}

/// An opaque serialized payload plus its encoding tag.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataBlob {
    pub encoding: EncodingType,
    pub data: Vec<u8>,
}

impl DataBlob {
    pub fn new(encoding: EncodingType, data: impl Into<Vec<u8>>) -> Self {
        Self {
            encoding,
            data: data.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One `(event_id, version)` entry of a version history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VersionHistoryItem {
    pub event_id: i64,
    pub version: i64,
}

impl VersionHistoryItem {
    pub fn new(event_id: i64, version: i64) -> Self {
        Self { event_id, version }
    }
}

/// Branch lineage for a page of events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionHistory {
    #[serde(default)]
    pub branch_token: Vec<u8>,
    #[serde(default)]
    pub items: Vec<VersionHistoryItem>,
}

/// One raw event batch paired with the version history of the page it came from.
///
/// Batches from the same page share one `Arc<VersionHistory>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryBatch {
    pub version_history: Arc<VersionHistory>,
    pub raw_event_batch: DataBlob,
}

/// The unit handed to the local replication applier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationRequest {
    pub domain_id: String,
    pub workflow_execution: WorkflowExecution,
    pub events: DataBlob,
    pub version_history_items: Vec<VersionHistoryItem>,
}
