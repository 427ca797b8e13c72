//! Paginated listing
//!
//! The listing endpoint returns one page per request and reports the overall
//! item count in the `Total` header and the page size in `Per-Page`. Pages
//! are fetched in order and concatenated until the reported total is covered.
//!
//! A server that keeps reporting more items than it serves must not keep us
//! looping: an empty page ends the listing, and the number of pages is capped
//! by what the first reported total implies.

use std::future::Future;

use reqwest::header::HeaderMap;

use crate::error::Result;

const TOTAL_HEADER: &str = "Total";
const PER_PAGE_HEADER: &str = "Per-Page";

/// Pagination metadata of one response
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub total: Option<usize>,
    pub per_page: Option<usize>,
}

impl PageInfo {
    pub fn new(total: Option<usize>, per_page: Option<usize>) -> Self {
        Self { total, per_page }
    }

    /// Read `Total` and `Per-Page`; unparsable values count as absent
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let number = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse().ok())
        };

        Self {
            total: number(TOTAL_HEADER),
            per_page: number(PER_PAGE_HEADER),
        }
    }
}

/// Progress through a paginated listing
#[derive(Debug, Clone)]
pub struct Pagination {
    page: u32,
    fetched: usize,
    max_page: Option<u32>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new()
    }
}

impl Pagination {
    pub fn new() -> Self {
        Self {
            page: 1,
            fetched: 0,
            max_page: None,
        }
    }

    /// Page to fetch next
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Items fetched so far
    pub fn fetched(&self) -> usize {
        self.fetched
    }

    /// Record the current page; returns the next page number, or `None` when done
    pub fn advance(&mut self, page_len: usize, info: &PageInfo) -> Option<u32> {
        self.fetched += page_len;

        // Without a total the first page is the whole listing
        let total = info.total?;
        if self.fetched >= total {
            return None;
        }

        if page_len == 0 {
            tracing::warn!(
                page = self.page,
                fetched = self.fetched,
                total,
                "Empty page before the reported total was reached, stopping"
            );
            return None;
        }

        let per_page = info.per_page.filter(|n| *n > 0).unwrap_or(page_len);
        let max_page = *self.max_page.get_or_insert_with(|| {
            u32::try_from(total.div_ceil(per_page))
                .unwrap_or(u32::MAX)
                .saturating_add(1)
        });
        if self.page >= max_page {
            tracing::warn!(
                page = self.page,
                fetched = self.fetched,
                total,
                "Listing did not converge on the reported total, stopping"
            );
            return None;
        }

        self.page += 1;
        Some(self.page)
    }
}

/// Fetch every page and concatenate the results in page order
///
/// `fetch_page` receives 1-based page numbers. The first error aborts the
/// listing; items from earlier pages are dropped.
pub async fn fetch_all<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<(Vec<T>, PageInfo)>>,
{
    let mut pagination = Pagination::new();
    let mut items = Vec::new();
    let mut page = pagination.page();

    loop {
        let (batch, info) = fetch_page(page).await?;
        tracing::debug!(page, items = batch.len(), total = ?info.total, "Fetched page");

        let len = batch.len();
        items.extend(batch);

        match pagination.advance(len, &info) {
            Some(next) => page = next,
            None => return Ok(items),
        }
    }
}
