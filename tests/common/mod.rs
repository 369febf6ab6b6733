//! Shared test utilities for resend, property and chaos tests.
//!
//! This module provides:
//! - Scripted remote history client that records every request
//! - Recording replication applier with configurable failures
//! - Invariant checker with a fixed outcome
//! - Page and domain helpers

pub mod mock_remote;
pub mod mock_local;

pub use mock_local::*;
pub use mock_remote::*;
