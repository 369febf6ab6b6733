//! Current-execution invariant checking boundary.
//!
//! When the source cluster no longer has a workflow, the local
//! current-execution record may point at a run that can never make progress.
//! An [`InvariantChecker`] inspects that record and can repair it. The check
//! algorithm itself lives outside this crate.

use crate::types::WorkflowExecutionRef;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// Boxed future for invariant operations (they report outcomes, not errors).
pub type InvariantFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Persisted workflow lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WorkflowState {
    Created,
    Running,
    Completed,
    Zombie,
    Void,
    Corrupted,
}

/// Probe for the local current-execution record of one workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentExecutionProbe {
    pub domain_id: String,
    pub workflow_id: String,
    pub state: WorkflowState,
}

impl CurrentExecutionProbe {
    /// Probe asking whether `execution`'s workflow looks consistently running.
    pub fn running(execution: &WorkflowExecutionRef) -> Self {
        Self {
            domain_id: execution.domain_id.clone(),
            workflow_id: execution.workflow_id.clone(),
            state: WorkflowState::Running,
        }
    }
}

/// Outcome of a check. Closed set: anything else is a checker bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckOutcome {
    Healthy,
    Corrupted,
    CheckFailed,
}

impl CheckOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Corrupted => "corrupted",
            Self::CheckFailed => "failed",
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of [`InvariantChecker::check`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckResult {
    pub outcome: CheckOutcome,
    /// Name of the invariant that produced this result.
    pub invariant: String,
    pub info: String,
    pub details: String,
}

impl CheckResult {
    pub fn new(outcome: CheckOutcome, invariant: impl Into<String>) -> Self {
        Self {
            outcome,
            invariant: invariant.into(),
            info: String::new(),
            details: String::new(),
        }
    }

    #[must_use]
    pub fn with_info(mut self, info: impl Into<String>, details: impl Into<String>) -> Self {
        self.info = info.into();
        self.details = details.into();
        self
    }
}

/// Outcome of a repair attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixOutcome {
    Fixed,
    Skipped,
    Failed,
}

impl FixOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fixed => "fixed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }
}

/// Result of [`InvariantChecker::fix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixResult {
    pub outcome: FixOutcome,
    pub info: String,
}

impl FixResult {
    pub fn new(outcome: FixOutcome, info: impl Into<String>) -> Self {
        Self {
            outcome,
            info: info.into(),
        }
    }
}

/// Checks (and optionally repairs) the local current-execution record.
///
/// Concurrency control over the record is the implementation's job; the
/// resender calls `check` then maybe `fix` without holding any lock.
pub trait InvariantChecker: Send + Sync {
    /// Invariant name, for logs and metrics.
    fn name(&self) -> &str;

    fn check(&self, probe: CurrentExecutionProbe) -> InvariantFuture<'_, CheckResult>;

    fn fix(&self, probe: CurrentExecutionProbe) -> InvariantFuture<'_, FixResult>;
}
