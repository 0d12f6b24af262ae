//! Eager pagination drains for the two remote paging protocols.
//!
//! Both surfaces page their collection endpoints, but with different
//! mechanics: the Admin API hands back an opaque cursor in
//! `response_metadata.next_cursor`, while SCIM uses 1-based `startIndex` /
//! `count` offsets against a reported `totalResults`. The drains here fetch
//! pages sequentially and return the full accumulated collection; callers
//! never see partial results, and a failure on any page aborts the whole
//! drain with that page's error.

use crate::error::Result;
use std::future::Future;

/// A decoded page from a cursor-paged Admin endpoint.
pub(crate) trait CursorPage {
    type Item;

    /// Cursor for the next page, if the server sent one.
    fn next_cursor(&self) -> Option<&str>;

    /// Consume the page, yielding its items in server order.
    fn into_items(self) -> Vec<Self::Item>;
}

/// A decoded page from an offset-paged SCIM list endpoint.
pub(crate) trait OffsetPage {
    type Item;

    /// Total matching resources reported by the server.
    fn total_results(&self) -> u64;

    /// Number of resources the server actually served on this page.
    fn items_per_page(&self) -> u64;

    /// 1-based index of the first resource on this page, as reported.
    fn start_index(&self) -> u64;

    /// Consume the page, yielding its resources in server order.
    fn into_items(self) -> Vec<Self::Item>;
}

/// Drain a cursor-paged endpoint to completion.
///
/// `fetch` receives `None` for the first page and the previous page's cursor
/// afterwards. The drain stops when the cursor comes back absent or empty,
/// or when a page arrives with no items at all, whichever happens first.
pub(crate) async fn drain_cursor<P, F, Fut>(mut fetch: F) -> Result<Vec<P::Item>>
where
    P: CursorPage,
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let mut items = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let page = fetch(cursor.take()).await?;
        let next = page
            .next_cursor()
            .filter(|c| !c.is_empty())
            .map(str::to_owned);
        let mut page_items = page.into_items();
        let exhausted = page_items.is_empty();
        items.append(&mut page_items);

        match next {
            Some(next) if !exhausted => cursor = Some(next),
            _ => return Ok(items),
        }
    }
}

/// Drain an offset-paged endpoint to completion.
///
/// `fetch` receives the 1-based index of the first resource wanted. The next
/// index is advanced from what the response reports, not from what was
/// requested, so a server that serves short pages is still walked without
/// gaps. The drain stops once `startIndex + itemsPerPage - 1` reaches
/// `totalResults`, or as soon as a page arrives empty.
pub(crate) async fn drain_offset<P, F, Fut>(mut fetch: F) -> Result<Vec<P::Item>>
where
    P: OffsetPage,
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<P>>,
{
    let mut items = Vec::new();
    let mut start_index = 1u64;

    loop {
        let page = fetch(start_index).await?;
        let total = page.total_results();
        let served = page.items_per_page();
        let reported_start = page.start_index();
        let mut page_items = page.into_items();
        let exhausted = page_items.is_empty();
        items.append(&mut page_items);

        if exhausted || served == 0 || reported_start + served - 1 >= total {
            return Ok(items);
        }
        start_index = reported_start + served;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    struct CursorScript {
        items: Vec<u32>,
        next: Option<&'static str>,
    }

    impl CursorPage for CursorScript {
        type Item = u32;

        fn next_cursor(&self) -> Option<&str> {
            self.next
        }

        fn into_items(self) -> Vec<u32> {
            self.items
        }
    }

    struct OffsetScript {
        total: u64,
        start: u64,
        items: Vec<u32>,
    }

    impl OffsetPage for OffsetScript {
        type Item = u32;

        fn total_results(&self) -> u64 {
            self.total
        }

        fn items_per_page(&self) -> u64 {
            self.items.len() as u64
        }

        fn start_index(&self) -> u64 {
            self.start
        }

        fn into_items(self) -> Vec<u32> {
            self.items
        }
    }

    fn scripted<P>(
        pages: Vec<Result<P>>,
    ) -> (
        Arc<Mutex<VecDeque<Result<P>>>>,
        Arc<Mutex<Vec<Option<String>>>>,
    ) {
        (
            Arc::new(Mutex::new(pages.into())),
            Arc::new(Mutex::new(Vec::new())),
        )
    }

    #[tokio::test]
    async fn test_cursor_drain_follows_cursors_in_order() {
        let (pages, seen) = scripted(vec![
            Ok(CursorScript {
                items: vec![1, 2],
                next: Some("c1"),
            }),
            Ok(CursorScript {
                items: vec![3],
                next: Some("c2"),
            }),
            Ok(CursorScript {
                items: vec![4],
                next: Some(""),
            }),
        ]);

        let all = drain_cursor({
            let pages = Arc::clone(&pages);
            let seen = Arc::clone(&seen);
            move |cursor| {
                let pages = Arc::clone(&pages);
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(cursor);
                    pages.lock().unwrap().pop_front().unwrap()
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(all, vec![1, 2, 3, 4]);
        assert_eq!(
            *seen.lock().unwrap(),
            vec![None, Some("c1".to_string()), Some("c2".to_string())]
        );
    }

    #[tokio::test]
    async fn test_cursor_drain_stops_on_missing_cursor() {
        let (pages, _) = scripted(vec![Ok(CursorScript {
            items: vec![7],
            next: None,
        })]);

        let all = drain_cursor({
            let pages = Arc::clone(&pages);
            move |_| {
                let pages = Arc::clone(&pages);
                async move { pages.lock().unwrap().pop_front().unwrap() }
            }
        })
        .await
        .unwrap();

        assert_eq!(all, vec![7]);
        assert!(pages.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cursor_drain_stops_on_empty_page_despite_cursor() {
        let (pages, _) = scripted(vec![Ok(CursorScript {
            items: vec![],
            next: Some("never-followed"),
        })]);

        let all: Vec<u32> = drain_cursor({
            let pages = Arc::clone(&pages);
            move |_| {
                let pages = Arc::clone(&pages);
                async move { pages.lock().unwrap().pop_front().unwrap() }
            }
        })
        .await
        .unwrap();

        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_cursor_drain_aborts_on_page_error() {
        let (pages, _) = scripted(vec![
            Ok(CursorScript {
                items: vec![1],
                next: Some("c1"),
            }),
            Err(Error::api("ratelimited")),
        ]);

        let result = drain_cursor({
            let pages = Arc::clone(&pages);
            move |_| {
                let pages = Arc::clone(&pages);
                async move { pages.lock().unwrap().pop_front().unwrap() }
            }
        })
        .await;

        assert!(matches!(result, Err(Error::Api { .. })));
    }

    fn offset_pages(total: u64, page_size: u64) -> Vec<Result<OffsetScript>> {
        let mut pages = Vec::new();
        let mut start = 1;
        while start <= total {
            let served = page_size.min(total - start + 1);
            pages.push(Ok(OffsetScript {
                total,
                start,
                items: (start..start + served).map(|n| n as u32).collect(),
            }));
            start += served;
        }
        pages
    }

    async fn run_offset(pages: Vec<Result<OffsetScript>>) -> (Result<Vec<u32>>, Vec<u64>) {
        let pages = Arc::new(Mutex::new(VecDeque::from(pages)));
        let seen: Arc<Mutex<Vec<u64>>> = Arc::new(Mutex::new(Vec::new()));

        let result = drain_offset({
            let pages = Arc::clone(&pages);
            let seen = Arc::clone(&seen);
            move |start| {
                let pages = Arc::clone(&pages);
                let seen = Arc::clone(&seen);
                async move {
                    seen.lock().unwrap().push(start);
                    pages.lock().unwrap().pop_front().unwrap()
                }
            }
        })
        .await;

        let seen = seen.lock().unwrap().clone();
        (result, seen)
    }

    #[tokio::test]
    async fn test_offset_drain_walks_partial_last_page() {
        // 250 results at 100 per page: pages start at 1, 101, 201
        let (result, seen) = run_offset(offset_pages(250, 100)).await;
        let all = result.unwrap();

        assert_eq!(all.len(), 250);
        assert_eq!(all[0], 1);
        assert_eq!(all[249], 250);
        assert_eq!(seen, vec![1, 101, 201]);
    }

    #[tokio::test]
    async fn test_offset_drain_exact_boundary_stops_without_extra_fetch() {
        // 200 results at 100 per page: the second page satisfies the total
        let (result, seen) = run_offset(offset_pages(200, 100)).await;

        assert_eq!(result.unwrap().len(), 200);
        assert_eq!(seen, vec![1, 101]);
    }

    #[tokio::test]
    async fn test_offset_drain_single_short_page() {
        let (result, seen) = run_offset(offset_pages(3, 100)).await;

        assert_eq!(result.unwrap(), vec![1, 2, 3]);
        assert_eq!(seen, vec![1]);
    }

    #[tokio::test]
    async fn test_offset_drain_empty_collection() {
        let (result, seen) = run_offset(vec![Ok(OffsetScript {
            total: 0,
            start: 1,
            items: vec![],
        })])
        .await;

        assert!(result.unwrap().is_empty());
        assert_eq!(seen, vec![1]);
    }

    #[tokio::test]
    async fn test_offset_drain_advances_from_reported_page_size() {
        // server serves short pages of 2 even though more were requested
        let pages = vec![
            Ok(OffsetScript {
                total: 5,
                start: 1,
                items: vec![1, 2],
            }),
            Ok(OffsetScript {
                total: 5,
                start: 3,
                items: vec![3, 4],
            }),
            Ok(OffsetScript {
                total: 5,
                start: 5,
                items: vec![5],
            }),
        ];
        let (result, seen) = run_offset(pages).await;

        assert_eq!(result.unwrap(), vec![1, 2, 3, 4, 5]);
        assert_eq!(seen, vec![1, 3, 5]);
    }

    #[tokio::test]
    async fn test_offset_drain_aborts_on_page_error() {
        let pages = vec![
            Ok(OffsetScript {
                total: 200,
                start: 1,
                items: (1..=100).collect(),
            }),
            Err(Error::transport("connection reset")),
        ];
        let (result, seen) = run_offset(pages).await;

        assert!(matches!(result, Err(Error::Transport { .. })));
        assert_eq!(seen, vec![1, 101]);
    }
}
