//! Mock local cluster: replication applier and invariant checker.

#![allow(dead_code)]

use history_resender::error::{BoxFuture, CollaboratorError};
use history_resender::invariant::InvariantFuture;
use history_resender::{
    CheckOutcome, CheckResult, CurrentExecutionProbe, FixOutcome, FixResult, InvariantChecker,
    ReplicationApplier, ReplicationRequest,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Replication applier that records every request it accepts.
pub struct MockApplier {
    /// Accepted apply() requests, in order
    applied: Mutex<Vec<ReplicationRequest>>,
    /// Fail the call with this zero-based index
    fail_at: Option<(usize, CollaboratorError)>,
    /// Delay before every apply
    delay: Duration,
    /// Calls started (including failed ones)
    calls: AtomicUsize,
}

impl MockApplier {
    /// An applier that accepts everything.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::accepting())
    }

    /// Fail the `index`-th call (zero-based) with `error`.
    pub fn failing_at(index: usize, error: CollaboratorError) -> Arc<Self> {
        Arc::new(Self {
            fail_at: Some((index, error)),
            ..Self::accepting()
        })
    }

    /// Sleep `delay` before each apply.
    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            delay,
            ..Self::accepting()
        })
    }

    fn accepting() -> Self {
        Self {
            applied: Mutex::new(Vec::new()),
            fail_at: None,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub async fn applied(&self) -> Vec<ReplicationRequest> {
        self.applied.lock().await.clone()
    }

    /// Payloads of accepted requests, in apply order.
    pub async fn applied_payloads(&self) -> Vec<Vec<u8>> {
        self.applied
            .lock()
            .await
            .iter()
            .map(|r| r.events.data.clone())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ReplicationApplier for MockApplier {
    fn apply(&self, request: ReplicationRequest) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            if let Some((fail_index, ref error)) = self.fail_at {
                if fail_index == index {
                    return Err(error.clone());
                }
            }
            self.applied.lock().await.push(request);
            Ok(())
        })
    }
}

/// Invariant checker that always reports the same outcome.
pub struct MockChecker {
    outcome: CheckOutcome,
    fix_outcome: FixOutcome,
    checks: Mutex<Vec<CurrentExecutionProbe>>,
    fixes: AtomicUsize,
}

impl MockChecker {
    pub fn new(outcome: CheckOutcome) -> Arc<Self> {
        Self::with_fix_outcome(outcome, FixOutcome::Fixed)
    }

    /// A checker whose repairs report `fix_outcome`.
    pub fn with_fix_outcome(outcome: CheckOutcome, fix_outcome: FixOutcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            fix_outcome,
            checks: Mutex::new(Vec::new()),
            fixes: AtomicUsize::new(0),
        })
    }

    pub async fn checks(&self) -> Vec<CurrentExecutionProbe> {
        self.checks.lock().await.clone()
    }

    pub fn fix_count(&self) -> usize {
        self.fixes.load(Ordering::SeqCst)
    }
}

impl InvariantChecker for MockChecker {
    fn name(&self) -> &str {
        "mock_concrete_execution_exists"
    }

    fn check(&self, probe: CurrentExecutionProbe) -> InvariantFuture<'_, CheckResult> {
        Box::pin(async move {
            self.checks.lock().await.push(probe);
            CheckResult::new(self.outcome, self.name()).with_info("mock", "")
        })
    }

    fn fix(&self, _probe: CurrentExecutionProbe) -> InvariantFuture<'_, FixResult> {
        Box::pin(async move {
            self.fixes.fetch_add(1, Ordering::SeqCst);
            FixResult::new(self.fix_outcome, "mock fix")
        })
    }
}
