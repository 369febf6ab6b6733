//! Fuzz target for configuration parsing.
//!
//! Arbitrary JSON must never panic the config loader, and any config that
//! deserializes must resolve its durations and turn them into deadlines
//! without panicking, however large they are.

#![no_main]

use history_resender::resilience::Deadline;
use history_resender::{DomainTimeoutSource, ResendConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (json, domain_id) = data;

    let Ok(config) = serde_json::from_str::<ResendConfig>(json) else {
        return;
    };

    let _ = config.validate();
    let timeout = config.call_timeout_duration();
    assert!(!timeout.is_zero());

    let deadline = match &config.domain_timeouts {
        Some(timeouts) => Deadline::from_budget(timeouts.timeout_for(domain_id)),
        None => Deadline::none(),
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let result = runtime.block_on(deadline.call(timeout, async { 1 }));
    assert_eq!(result, Ok(1));
});
