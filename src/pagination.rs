// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Token-following pagination driver.
//!
//! [`PagingIterator`] turns a "fetch one page for this token" function into a
//! lazy, forward-only sequence of items.
//!
//! # Token Semantics
//!
//! ```text
//! fetch(<empty>) ──▶ [a, b, c] + T1
//!                          fetch(T1) ──▶ [] + T2        (empty page, keep going)
//!                                   fetch(T2) ──▶ [d] + <empty>   (done)
//! ```
//!
//! - The first request always carries the empty token.
//! - A non-empty returned token is passed back verbatim on the next request.
//! - An empty returned token ends the sequence.
//! - A page is fetched only once every item of the previous page was consumed.
//! - After an error the iterator is finished; there is no resume. Start a new
//!   iterator to start over from the first page.

use std::future::Future;
use std::vec;

/// Opaque continuation token. Empty means start (on request) or end (on response).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PageToken(Vec<u8>);

impl PageToken {
    /// The empty token.
    pub fn start() -> Self {
        Self::default()
    }

    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for PageToken {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PageToken {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// One fetched page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_page_token: PageToken,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page_token: PageToken) -> Self {
        Self {
            items,
            next_page_token,
        }
    }

    /// A final page (empty continuation token).
    pub fn last(items: Vec<T>) -> Self {
        Self::new(items, PageToken::start())
    }
}

/// Lazily walks a token-paginated source.
pub struct PagingIterator<T, F> {
    fetch: F,
    items: vec::IntoIter<T>,
    next_token: PageToken,
    started: bool,
    finished: bool,
    pages_fetched: usize,
}

impl<T, E, F, Fut> PagingIterator<T, F>
where
    F: FnMut(PageToken) -> Fut,
    Fut: Future<Output = Result<Page<T>, E>>,
{
    pub fn new(fetch: F) -> Self {
        Self {
            fetch,
            items: Vec::new().into_iter(),
            next_token: PageToken::start(),
            started: false,
            finished: false,
            pages_fetched: 0,
        }
    }

    /// Next item, fetching pages as needed.
    ///
    /// Returns `None` once the source is exhausted or after an error was yielded.
    pub async fn next(&mut self) -> Option<Result<T, E>> {
        loop {
            if let Some(item) = self.items.next() {
                return Some(Ok(item));
            }
            if self.finished {
                return None;
            }
            if self.started && self.next_token.is_empty() {
                self.finished = true;
                return None;
            }

            self.started = true;
            let token = std::mem::take(&mut self.next_token);
            match (self.fetch)(token).await {
                Ok(page) => {
                    self.pages_fetched += 1;
                    self.next_token = page.next_page_token;
                    self.items = page.items.into_iter();
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Number of pages fetched successfully so far.
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// True once no further items will be produced.
    pub fn is_finished(&self) -> bool {
        self.finished && self.items.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted pages; records every token it was asked for.
    struct Script {
        pages: Mutex<VecDeque<Result<Page<u32>, String>>>,
        tokens: Mutex<Vec<PageToken>>,
    }

    impl Script {
        fn new(pages: Vec<Result<Page<u32>, String>>) -> Arc<Self> {
            Arc::new(Self {
                pages: Mutex::new(pages.into()),
                tokens: Mutex::new(Vec::new()),
            })
        }

        fn fetch(&self, token: PageToken) -> Result<Page<u32>, String> {
            self.tokens.lock().unwrap().push(token);
            self.pages
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err("fetched past the last page".to_string()))
        }

        fn tokens(&self) -> Vec<PageToken> {
            self.tokens.lock().unwrap().clone()
        }
    }

    fn iterator(
        script: &Arc<Script>,
    ) -> PagingIterator<u32, impl FnMut(PageToken) -> std::future::Ready<Result<Page<u32>, String>>> {
        let script = Arc::clone(script);
        PagingIterator::new(move |token| std::future::ready(script.fetch(token)))
    }

    async fn drain<F, Fut>(iter: &mut PagingIterator<u32, F>) -> (Vec<u32>, Option<String>)
    where
        F: FnMut(PageToken) -> Fut,
        Fut: Future<Output = Result<Page<u32>, String>>,
    {
        let mut items = Vec::new();
        while let Some(next) = iter.next().await {
            match next {
                Ok(item) => items.push(item),
                Err(e) => return (items, Some(e)),
            }
        }
        (items, None)
    }

    #[tokio::test]
    async fn test_single_page() {
        let script = Script::new(vec![Ok(Page::last(vec![1, 2, 3]))]);
        let mut iter = iterator(&script);

        let (items, err) = drain(&mut iter).await;
        assert_eq!(items, vec![1, 2, 3]);
        assert!(err.is_none());
        assert_eq!(iter.pages_fetched(), 1);
        assert_eq!(script.tokens(), vec![PageToken::start()]);
        assert!(iter.is_finished());
    }

    #[tokio::test]
    async fn test_follows_tokens_verbatim() {
        let script = Script::new(vec![
            Ok(Page::new(vec![1, 2], PageToken::new(b"t1".to_vec()))),
            Ok(Page::new(vec![3], PageToken::new(b"t2".to_vec()))),
            Ok(Page::last(vec![4])),
        ]);
        let mut iter = iterator(&script);

        let (items, err) = drain(&mut iter).await;
        assert_eq!(items, vec![1, 2, 3, 4]);
        assert!(err.is_none());
        assert_eq!(
            script.tokens(),
            vec![
                PageToken::start(),
                PageToken::new(b"t1".to_vec()),
                PageToken::new(b"t2".to_vec()),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_page_with_token_keeps_going() {
        let script = Script::new(vec![
            Ok(Page::new(vec![], PageToken::new(b"t1".to_vec()))),
            Ok(Page::last(vec![9])),
        ]);
        let mut iter = iterator(&script);

        let (items, _) = drain(&mut iter).await;
        assert_eq!(items, vec![9]);
        assert_eq!(iter.pages_fetched(), 2);
    }

    #[tokio::test]
    async fn test_empty_source() {
        let script = Script::new(vec![Ok(Page::last(vec![]))]);
        let mut iter = iterator(&script);

        assert!(iter.next().await.is_none());
        // Stays exhausted without fetching again.
        assert!(iter.next().await.is_none());
        assert_eq!(script.tokens().len(), 1);
    }

    #[tokio::test]
    async fn test_error_finishes_iterator() {
        let script = Script::new(vec![
            Ok(Page::new(vec![1], PageToken::new(b"t1".to_vec()))),
            Err("remote unavailable".to_string()),
            Ok(Page::last(vec![2])),
        ]);
        let mut iter = iterator(&script);

        let (items, err) = drain(&mut iter).await;
        assert_eq!(items, vec![1]);
        assert_eq!(err.as_deref(), Some("remote unavailable"));
        assert!(iter.next().await.is_none());
        assert_eq!(script.tokens().len(), 2);
        assert_eq!(iter.pages_fetched(), 1);
    }

    #[tokio::test]
    async fn test_lazy_fetching() {
        let script = Script::new(vec![
            Ok(Page::new(vec![1, 2], PageToken::new(b"t1".to_vec()))),
            Ok(Page::last(vec![3])),
        ]);
        let mut iter = iterator(&script);

        assert!(script.tokens().is_empty());
        assert_eq!(iter.next().await, Some(Ok(1)));
        assert_eq!(script.tokens().len(), 1);
        assert_eq!(iter.next().await, Some(Ok(2)));
        // Second page not requested until the first is drained.
        assert_eq!(script.tokens().len(), 1);
        assert_eq!(iter.next().await, Some(Ok(3)));
        assert_eq!(script.tokens().len(), 2);
    }

    #[test]
    fn test_page_token_conversions() {
        let token = PageToken::from(vec![1u8, 2, 3]);
        assert!(!token.is_empty());
        assert_eq!(token.as_bytes(), &[1, 2, 3]);
        assert_eq!(token.clone().into_bytes(), vec![1, 2, 3]);
        assert_eq!(PageToken::from(&[1u8, 2, 3][..]), token);
        assert!(PageToken::start().is_empty());
    }
}
