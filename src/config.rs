//! Configuration for the history resender.
//!
//! Configuration is passed to [`Resender::new()`](crate::Resender::new) and can
//! be constructed programmatically or deserialized from YAML/JSON. Durations are
//! human-readable strings (`"30s"`, `"2m"`, `"500ms"`).
//!
//! # Quick Start
//!
//! ```rust
//! use history_resender::config::{ResendConfig, DomainTimeoutConfig};
//!
//! let config = ResendConfig {
//!     call_timeout: "10s".into(),
//!     domain_timeouts: Some(DomainTimeoutConfig::uniform("2m")),
//! };
//! assert!(config.validate().is_ok());
//! ```
//!
//! # Configuration Structure
//!
//! ```text
//! ResendConfig
//! ├── call_timeout: String              # per fetch / per apply call
//! └── domain_timeouts: Option<...>      # overall deadline per resend
//!     ├── default_timeout: String       # "0s" = no overall deadline
//!     └── per_domain: {domain_id: String}
//! ```
//!
//! # YAML Example
//!
//! ```yaml
//! call_timeout: "30s"
//! domain_timeouts:
//!   default_timeout: "0s"
//!   per_domain:
//!     "0f3c9a62-domain-id": "5m"
//! ```

use crate::error::{ResendError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Fallback for an unparsable `call_timeout`.
const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(30);

/// Source of the overall per-domain resend deadline.
///
/// A zero duration means "no overall deadline". Implementations are shared
/// across concurrent resends and must be cheap to call.
pub trait DomainTimeoutSource: Send + Sync {
    fn timeout_for(&self, domain_id: &str) -> Duration;
}

impl<F> DomainTimeoutSource for F
where
    F: Fn(&str) -> Duration + Send + Sync,
{
    fn timeout_for(&self, domain_id: &str) -> Duration {
        self(domain_id)
    }
}

/// Top-level resender configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResendConfig {
    /// Timeout applied to each remote fetch and each local apply.
    #[serde(default = "default_call_timeout")]
    pub call_timeout: String,

    /// Static per-domain overall deadlines.
    ///
    /// Ignored when a [`DomainTimeoutSource`] is injected explicitly.
    #[serde(default)]
    pub domain_timeouts: Option<DomainTimeoutConfig>,
}

fn default_call_timeout() -> String {
    "30s".to_string()
}

impl Default for ResendConfig {
    fn default() -> Self {
        Self {
            call_timeout: default_call_timeout(),
            domain_timeouts: None,
        }
    }
}

impl ResendConfig {
    /// Short timeouts for tests.
    pub fn for_testing() -> Self {
        Self {
            call_timeout: "500ms".to_string(),
            domain_timeouts: None,
        }
    }

    /// Parse `call_timeout`, falling back to 30s when invalid or zero.
    pub fn call_timeout_duration(&self) -> Duration {
        match humantime::parse_duration(&self.call_timeout) {
            Ok(d) if !d.is_zero() => d,
            _ => DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Report configuration mistakes that the use sites would silently paper over.
    ///
    /// Durations too large to schedule (e.g. `"500000000000y"`) are accepted:
    /// they mean "no bound" for that call or deadline.
    pub fn validate(&self) -> Result<()> {
        let call_timeout = humantime::parse_duration(&self.call_timeout).map_err(|e| {
            ResendError::Config(format!("invalid call_timeout {:?}: {}", self.call_timeout, e))
        })?;
        if call_timeout.is_zero() {
            return Err(ResendError::Config("call_timeout must be positive".to_string()));
        }
        if let Some(ref timeouts) = self.domain_timeouts {
            timeouts.validate()?;
        }
        Ok(())
    }
}

/// Static per-domain overall deadlines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainTimeoutConfig {
    /// Deadline for domains without an override. `"0s"` disables it.
    #[serde(default = "default_domain_timeout")]
    pub default_timeout: String,

    /// Overrides keyed by domain ID.
    #[serde(default)]
    pub per_domain: HashMap<String, String>,
}

fn default_domain_timeout() -> String {
    "0s".to_string()
}

impl Default for DomainTimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout: default_domain_timeout(),
            per_domain: HashMap::new(),
        }
    }
}

impl DomainTimeoutConfig {
    /// Same deadline for every domain.
    pub fn uniform(timeout: &str) -> Self {
        Self {
            default_timeout: timeout.to_string(),
            per_domain: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_domain(mut self, domain_id: &str, timeout: &str) -> Self {
        self.per_domain.insert(domain_id.to_string(), timeout.to_string());
        self
    }

    fn validate(&self) -> Result<()> {
        humantime::parse_duration(&self.default_timeout).map_err(|e| {
            ResendError::Config(format!("invalid default_timeout {:?}: {}", self.default_timeout, e))
        })?;
        for (domain_id, timeout) in &self.per_domain {
            humantime::parse_duration(timeout).map_err(|e| {
                ResendError::Config(format!("invalid timeout {:?} for domain {}: {}", timeout, domain_id, e))
            })?;
        }
        Ok(())
    }
}

impl DomainTimeoutSource for DomainTimeoutConfig {
    /// Unparsable values resolve to zero (no overall deadline).
    fn timeout_for(&self, domain_id: &str) -> Duration {
        let raw = self
            .per_domain
            .get(domain_id)
            .unwrap_or(&self.default_timeout);
        humantime::parse_duration(raw).unwrap_or(Duration::ZERO)
    }
}
