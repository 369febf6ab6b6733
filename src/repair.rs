// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Consistency repair gate.
//!
//! A "workflow execution not found" from the source cluster has two readings:
//!
//! 1. The workflow outlived its retention period on the source. Expected; the
//!    resend task should be dropped.
//! 2. The local current-execution record is corrupted and points at a run the
//!    source never had. Local state needs fixing, and the task still fails.
//!
//! The gate asks the configured [`InvariantChecker`] which one applies:
//!
//! | Check outcome | Action | Skip |
//! |---------------|--------|------|
//! | no checker | none | `false` |
//! | `Corrupted` | `fix()` the record | `false` |
//! | `CheckFailed` | none | `false` |
//! | `Healthy` | none | `true` |

use crate::invariant::{CheckOutcome, CurrentExecutionProbe, FixOutcome, InvariantChecker};
use crate::metrics;
use crate::types::WorkflowExecutionRef;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Decides whether a remote not-found can be skipped, repairing local state on the way.
#[derive(Clone, Default)]
pub struct RepairGate {
    checker: Option<Arc<dyn InvariantChecker>>,
}

impl RepairGate {
    pub fn new(checker: Option<Arc<dyn InvariantChecker>>) -> Self {
        Self { checker }
    }

    /// A gate that never skips.
    pub fn disabled() -> Self {
        Self { checker: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.checker.is_some()
    }

    /// Returns `true` when the caller should stop retrying this resend.
    pub async fn resolve_not_found(&self, execution: &WorkflowExecutionRef) -> bool {
        let Some(checker) = self.checker.as_ref() else {
            return false;
        };

        let probe = CurrentExecutionProbe::running(execution);
        let result = checker.check(probe.clone()).await;
        metrics::record_repair_check(result.outcome.as_str());

        match result.outcome {
            CheckOutcome::Corrupted => {
                error!(
                    domain_id = %execution.domain_id,
                    workflow_id = %execution.workflow_id,
                    run_id = %execution.run_id,
                    invariant = %result.invariant,
                    info = %result.info,
                    "Encountered corrupted workflow"
                );
                let fix = checker.fix(probe).await;
                metrics::record_repair_fix(fix.outcome.as_str());
                match fix.outcome {
                    FixOutcome::Fixed => info!(
                        workflow_id = %execution.workflow_id,
                        "Repaired current execution record"
                    ),
                    FixOutcome::Skipped | FixOutcome::Failed => warn!(
                        workflow_id = %execution.workflow_id,
                        outcome = fix.outcome.as_str(),
                        info = %fix.info,
                        "Current execution record not repaired"
                    ),
                }
                false
            }
            CheckOutcome::CheckFailed => {
                warn!(
                    workflow_id = %execution.workflow_id,
                    run_id = %execution.run_id,
                    invariant = %result.invariant,
                    info = %result.info,
                    "Current execution check failed"
                );
                false
            }
            CheckOutcome::Healthy => {
                info!(
                    workflow_id = %execution.workflow_id,
                    run_id = %execution.run_id,
                    "Source workflow gone and local record healthy, skipping"
                );
                true
            }
        }
    }
}
