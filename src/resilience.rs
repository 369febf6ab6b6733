//! Deadline composition for blocking calls.
//!
//! A resend has two independent time bounds:
//!
//! - an optional **overall deadline** for the whole call, taken from the
//!   per-domain timeout source when it yields a positive duration;
//! - a fixed **per-call timeout** for each remote fetch and each local apply.
//!
//! Each blocking call runs under whichever of the two expires first. The
//! resulting [`Expired`] says which bound governed so the error can report it.
//! A bound too large to represent as an [`Instant`] is treated as absent.
//!
//! ```text
//! t0 ─────────────── overall deadline (optional) ──────────────▶|
//!    ├─ fetch ─▶| per-call                                       |
//!                 ├─ apply ─▶| per-call                          |
//!                                          ├─ fetch ──── cut ───▶|
//! ```
//!
//! # Example
//!
//! ```rust
//! # async fn example() {
//! use history_resender::resilience::Deadline;
//! use std::time::Duration;
//!
//! let deadline = Deadline::from_budget(Duration::from_secs(120));
//! let value = deadline
//!     .call(Duration::from_secs(30), async { 42 })
//!     .await
//!     .expect("not expired");
//! assert_eq!(value, 42);
//! # }
//! ```

use crate::error::{Operation, ResendError};
use crate::types::WorkflowExecutionRef;
use std::future::Future;
use std::time::Duration;
use tokio::time::{timeout_at, Instant};

/// Which bound cut a call short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expired {
    /// The per-call timeout elapsed first.
    CallTimeout(Duration),
    /// The overall deadline elapsed first.
    Deadline(Duration),
}

impl Expired {
    pub fn bound(&self) -> &'static str {
        match self {
            Self::CallTimeout(_) => "call",
            Self::Deadline(_) => "deadline",
        }
    }

    /// Convert into the matching [`ResendError`] for `execution`.
    pub fn into_error(self, execution: &WorkflowExecutionRef, operation: Operation) -> ResendError {
        match self {
            Self::CallTimeout(after) => ResendError::Timeout {
                execution: execution.clone(),
                operation,
                after,
            },
            Self::Deadline(after) => ResendError::DeadlineExceeded {
                execution: execution.clone(),
                operation,
                after,
            },
        }
    }
}

/// Optional overall deadline for one resend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Option<Instant>,
    budget: Duration,
}

impl Deadline {
    /// No overall bound; only per-call timeouts apply.
    pub fn none() -> Self {
        Self {
            expires_at: None,
            budget: Duration::ZERO,
        }
    }

    /// A deadline `budget` from now, or [`Deadline::none`] when `budget` is
    /// zero or too far out to represent.
    pub fn from_budget(budget: Duration) -> Self {
        if budget.is_zero() {
            return Self::none();
        }
        match Instant::now().checked_add(budget) {
            Some(at) => Self {
                expires_at: Some(at),
                budget,
            },
            None => Self::none(),
        }
    }

    pub fn is_bounded(&self) -> bool {
        self.expires_at.is_some()
    }

    /// Total budget this deadline was created with (zero when unbounded).
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left before the deadline, `None` when unbounded.
    pub fn remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|at| at.saturating_duration_since(Instant::now()))
    }

    /// Run `fut` bounded only by the overall deadline.
    pub async fn bound<F, T>(&self, fut: F) -> Result<T, Expired>
    where
        F: Future<Output = T>,
    {
        match self.expires_at {
            Some(at) => timeout_at(at, fut)
                .await
                .map_err(|_| Expired::Deadline(self.budget)),
            None => Ok(fut.await),
        }
    }

    /// Run `fut` under `call_timeout`, nested inside the overall deadline.
    pub async fn call<F, T>(&self, call_timeout: Duration, fut: F) -> Result<T, Expired>
    where
        F: Future<Output = T>,
    {
        let call_expiry = Instant::now().checked_add(call_timeout);
        let (expiry, expired) = match (self.expires_at, call_expiry) {
            (Some(at), Some(call_at)) if at <= call_at => (at, Expired::Deadline(self.budget)),
            (Some(at), None) => (at, Expired::Deadline(self.budget)),
            (_, Some(call_at)) => (call_at, Expired::CallTimeout(call_timeout)),
            (None, None) => return Ok(fut.await),
        };
        timeout_at(expiry, fut).await.map_err(|_| expired)
    }
}

impl Default for Deadline {
    fn default() -> Self {
        Self::none()
    }
}
