//! Fuzz target for token-following pagination.
//!
//! Each input byte describes one page (low nibble: item count, high bit: the
//! page returns an error). Checks that the iterator never panics, yields the
//! items of every page before the first error in order, and stops afterwards.

#![no_main]

use history_resender::{Page, PageToken, PagingIterator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() || data.len() > 64 {
        return;
    }

    let pages: Vec<Result<Page<usize>, usize>> = data
        .iter()
        .enumerate()
        .map(|(i, &byte)| {
            if byte & 0x80 != 0 {
                return Err(i);
            }
            let items = (0..(byte & 0x0f) as usize).map(|j| i * 16 + j).collect();
            let token = if i + 1 == data.len() {
                PageToken::start()
            } else {
                PageToken::new((i + 1).to_string().into_bytes())
            };
            Ok(Page::new(items, token))
        })
        .collect();

    let mut expected = Vec::new();
    let mut error_at = None;
    for page in &pages {
        match page {
            Ok(page) => expected.extend(page.items.iter().copied()),
            Err(i) => {
                error_at = Some(*i);
                break;
            }
        }
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();

    runtime.block_on(async {
        let mut iter = PagingIterator::new(|token: PageToken| {
            let index = if token.is_empty() {
                0
            } else {
                String::from_utf8_lossy(token.as_bytes()).parse::<usize>().unwrap()
            };
            std::future::ready(pages[index].clone())
        });

        let mut items = Vec::new();
        let mut error = None;
        while let Some(item) = iter.next().await {
            match item {
                Ok(item) => items.push(item),
                Err(i) => error = Some(i),
            }
        }

        assert_eq!(items, expected);
        assert_eq!(error, error_at);
        assert!(iter.next().await.is_none());
    });
});
