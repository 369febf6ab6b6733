//! Mock remote cluster.
//!
//! Serves scripted pages in order and records every request it receives, so
//! tests can assert on page tokens and request shape.

#![allow(dead_code)]

use history_resender::error::{BoxFuture, CollaboratorError};
use history_resender::{
    DataBlob, PageToken, RawHistoryRequest, RawHistoryResponse, RemoteHistoryClient,
    StaticDomainResolver,
};
use history_resender::types::{EncodingType, VersionHistory, VersionHistoryItem};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

pub type ScriptedResponse = Result<RawHistoryResponse, CollaboratorError>;

/// Remote history client that replays a script of responses.
///
/// # Example
/// ```rust,ignore
/// let remote = MockRemote::new(vec![
///     page(&[b"e1", b"e2"], b"t1"),
///     page(&[b"e3"], b""),
/// ]);
///
/// // Run the resend...
///
/// assert_eq!(remote.tokens().await, vec![vec![], b"t1".to_vec()]);
/// ```
pub struct MockRemote {
    /// Responses still to serve, front first
    script: Mutex<VecDeque<ScriptedResponse>>,
    /// Recorded get_raw_history() requests
    requests: Mutex<Vec<RawHistoryRequest>>,
    /// Delay before every response
    delay: Duration,
    /// Calls started (including ones later cancelled by a timeout)
    calls: AtomicUsize,
}

impl MockRemote {
    pub fn new(script: Vec<ScriptedResponse>) -> Arc<Self> {
        Self::with_delay(script, Duration::ZERO)
    }

    /// A remote that sleeps `delay` before each response.
    pub fn with_delay(script: Vec<ScriptedResponse>, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
            delay,
            calls: AtomicUsize::new(0),
        })
    }

    /// Every request seen, in order.
    pub async fn requests(&self) -> Vec<RawHistoryRequest> {
        self.requests.lock().await.clone()
    }

    /// The page tokens sent, in order.
    pub async fn tokens(&self) -> Vec<Vec<u8>> {
        self.requests
            .lock()
            .await
            .iter()
            .map(|r| r.next_page_token.as_bytes().to_vec())
            .collect()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RemoteHistoryClient for MockRemote {
    fn get_raw_history(&self, request: RawHistoryRequest) -> BoxFuture<'_, RawHistoryResponse> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.requests.lock().await.push(request);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.script
                .lock()
                .await
                .pop_front()
                .unwrap_or_else(|| Err(CollaboratorError::fatal("script exhausted")))
        })
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// The version history every helper page carries.
pub fn version_history() -> VersionHistory {
    VersionHistory {
        branch_token: b"branch-1".to_vec(),
        items: vec![VersionHistoryItem::new(10, 1), VersionHistoryItem::new(25, 4)],
    }
}

/// A page of batches with the given payloads and continuation token.
pub fn page(batches: &[&[u8]], token: &[u8]) -> ScriptedResponse {
    Ok(RawHistoryResponse {
        history_batches: batches
            .iter()
            .map(|b| DataBlob::new(EncodingType::ThriftRw, b.to_vec()))
            .collect(),
        version_history: Some(version_history()),
        next_page_token: PageToken::from(token),
    })
}

/// Domain resolver that knows `d1 -> orders` and `d2 -> payments`.
pub fn domains() -> Arc<StaticDomainResolver> {
    Arc::new(StaticDomainResolver::with_domains([
        ("d1", "orders"),
        ("d2", "payments"),
    ]))
}
