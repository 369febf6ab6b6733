// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Error types for the history resender.
//!
//! Collaborators (domain resolver, remote history client, replication applier)
//! report failures as a [`CollaboratorError`] tagged with an [`ErrorKind`].
//! The resender wraps those into [`ResendError`], attaching the identity of the
//! execution being resent so every error can be traced back to its workflow.
//!
//! # Error Categories
//!
//! | Error Type | Retryable | Description |
//! |------------|-----------|-------------|
//! | `DomainLookup` | Kind-dependent | Domain ID could not be mapped to a name |
//! | `Fetch` | Kind-dependent | Remote raw-history RPC failed |
//! | `Apply` | Kind-dependent | Local replication rejected a batch |
//! | `Timeout` | Yes | A single fetch/apply call exceeded its own timeout |
//! | `DeadlineExceeded` | Yes | The per-domain resend deadline expired |
//! | `SkipTask` | No | Source workflow is gone and local state is healthy |
//! | `Config` | No | Configuration invalid |
//!
//! `SkipTask` is not a failure: it tells the caller the absence is expected
//! and the task should be dropped rather than retried.

use crate::types::WorkflowExecutionRef;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for resend operations.
pub type Result<T> = std::result::Result<T, ResendError>;

/// Result type for collaborator calls.
pub type CollaboratorResult<T> = std::result::Result<T, CollaboratorError>;

/// Boxed future returned by collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = CollaboratorResult<T>> + Send + 'a>>;

/// Classification of a collaborator failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The entity (domain, workflow execution) does not exist.
    NotFound,
    /// Timeouts, transport failures, overload. Worth retrying later.
    Transient,
    /// Anything that will fail again the same way.
    Fatal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Transient => write!(f, "transient"),
            Self::Fatal => write!(f, "fatal"),
        }
    }
}

/// Error reported by an injected collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}: {message}")]
pub struct CollaboratorError {
    pub kind: ErrorKind,
    pub message: String,
}

impl CollaboratorError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Transient, message)
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Fatal, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.kind == ErrorKind::NotFound
    }
}

/// The blocking step an error or timeout is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    DomainLookup,
    FetchHistory,
    ReplicateEvents,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DomainLookup => "domain_lookup",
            Self::FetchHistory => "fetch_history",
            Self::ReplicateEvents => "replicate_events",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`Resender`](crate::Resender).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResendError {
    /// The domain ID could not be resolved to a domain name.
    #[error("Domain lookup failed ({execution}): {source}")]
    DomainLookup {
        execution: WorkflowExecutionRef,
        #[source]
        source: CollaboratorError,
    },

    /// The remote raw-history RPC failed.
    #[error("History fetch failed ({execution}): {source}")]
    Fetch {
        execution: WorkflowExecutionRef,
        #[source]
        source: CollaboratorError,
    },

    /// The local replication applier rejected a batch.
    #[error("Replication failed ({execution}): {source}")]
    Apply {
        execution: WorkflowExecutionRef,
        #[source]
        source: CollaboratorError,
    },

    /// A single call ran past its own timeout.
    #[error("{operation} timed out after {after:?} ({execution})")]
    Timeout {
        execution: WorkflowExecutionRef,
        operation: Operation,
        after: Duration,
    },

    /// The overall resend deadline expired while `operation` was in flight.
    #[error("Resend deadline of {after:?} exceeded during {operation} ({execution})")]
    DeadlineExceeded {
        execution: WorkflowExecutionRef,
        operation: Operation,
        after: Duration,
    },

    /// The source workflow does not exist and there is nothing to repair locally.
    #[error("the source workflow does not exist ({execution})")]
    SkipTask { execution: WorkflowExecutionRef },

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ResendError {
    /// The collaborator-level kind behind this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DomainLookup { source, .. }
            | Self::Fetch { source, .. }
            | Self::Apply { source, .. } => source.kind,
            Self::Timeout { .. } | Self::DeadlineExceeded { .. } => ErrorKind::Transient,
            Self::SkipTask { .. } => ErrorKind::NotFound,
            Self::Config(_) => ErrorKind::Fatal,
        }
    }

    /// True when the remote (fetch) or local apply path reported that the
    /// workflow execution does not exist.
    ///
    /// A missing *domain* is not an execution-level absence and returns false.
    pub fn is_execution_not_found(&self) -> bool {
        match self {
            Self::Fetch { source, .. } | Self::Apply { source, .. } => source.is_not_found(),
            _ => false,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Self::SkipTask { .. })
    }

    /// Check if the caller should retry the resend later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::SkipTask { .. } => false,
            Self::Config(_) => false,
            _ => self.kind() == ErrorKind::Transient,
        }
    }

    /// The execution this error belongs to, if any.
    pub fn execution(&self) -> Option<&WorkflowExecutionRef> {
        match self {
            Self::DomainLookup { execution, .. }
            | Self::Fetch { execution, .. }
            | Self::Apply { execution, .. }
            | Self::Timeout { execution, .. }
            | Self::DeadlineExceeded { execution, .. }
            | Self::SkipTask { execution } => Some(execution),
            Self::Config(_) => None,
        }
    }
}
