//! Page requests, page envelopes and the total-count shortcut used by the
//! optimized member search.

use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const MAX_PAGE_SIZE: usize = 2000;

/// Zero-based page index together with the requested page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: usize,
    size: usize,
}

impl PageRequest {
    /// Builds a page request, clamping `size` into `1..=MAX_PAGE_SIZE`.
    pub fn new(page: usize, size: usize) -> Self {
        Self {
            page,
            size: size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Builds a page request from optional transport values.
    pub fn of(page: Option<usize>, size: Option<usize>) -> Self {
        Self::new(page.unwrap_or(0), size.unwrap_or(DEFAULT_PAGE_SIZE))
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of rows skipped before this page starts.
    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Offset as a SQL bind value, or `None` when the page starts beyond any
    /// row SQLite can address.
    pub fn sql_offset(&self) -> Option<i64> {
        self.page
            .checked_mul(self.size)
            .and_then(|offset| i64::try_from(offset).ok())
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// A page of results plus the metadata clients need to navigate.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: usize,
    pub total_pages: usize,
    /// Zero-based index of this page.
    pub number: usize,
    pub size: usize,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: PageRequest, total_elements: usize) -> Self {
        let total_pages = total_elements.div_ceil(request.size());
        let number = request.page();
        let number_of_elements = content.len();

        Self {
            empty: content.is_empty(),
            content,
            total_elements,
            total_pages,
            number,
            size: request.size(),
            number_of_elements,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
        }
    }

    /// Converts the content while keeping the page metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
            empty: self.empty,
        }
    }
}

/// Resolves the total number of matches for a fetched page.
///
/// A first page holding fewer rows than requested already contains every
/// match, so its length is the total and `count` is never called. Any other
/// page, including a short page past the first, needs `count`.
pub fn total_from_content<E, F>(
    request: &PageRequest,
    content_len: usize,
    count: F,
) -> Result<usize, E>
where
    F: FnOnce() -> Result<usize, E>,
{
    if request.offset() == 0 && content_len < request.size() {
        return Ok(content_len);
    }
    count()
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    fn counting(calls: &Cell<usize>, total: usize) -> impl FnOnce() -> Result<usize, ()> + '_ {
        move || {
            calls.set(calls.get() + 1);
            Ok(total)
        }
    }

    #[test]
    fn short_first_page_skips_count() {
        let calls = Cell::new(0);
        let total = total_from_content(&PageRequest::new(0, 10), 4, counting(&calls, 99));
        assert_eq!(total, Ok(4));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn empty_first_page_is_zero_total() {
        let calls = Cell::new(0);
        let total = total_from_content(&PageRequest::new(0, 10), 0, counting(&calls, 99));
        assert_eq!(total, Ok(0));
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn full_first_page_runs_count() {
        let calls = Cell::new(0);
        let total = total_from_content(&PageRequest::new(0, 2), 2, counting(&calls, 4));
        assert_eq!(total, Ok(4));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn short_later_page_still_runs_count() {
        let calls = Cell::new(0);
        let total = total_from_content(&PageRequest::new(3, 2), 1, counting(&calls, 7));
        assert_eq!(total, Ok(7));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn count_errors_propagate() {
        let total: Result<usize, &str> =
            total_from_content(&PageRequest::new(1, 2), 2, || Err("store unavailable"));
        assert_eq!(total, Err("store unavailable"));
    }

    #[test]
    fn page_request_clamps_size() {
        assert_eq!(PageRequest::new(0, 0).size(), 1);
        assert_eq!(PageRequest::new(0, 10_000).size(), MAX_PAGE_SIZE);
        assert_eq!(PageRequest::of(None, None), PageRequest::new(0, DEFAULT_PAGE_SIZE));
        assert_eq!(PageRequest::new(3, 5).offset(), 15);
    }

    #[test]
    fn page_metadata() {
        let page = Page::new(vec!["c", "d"], PageRequest::new(1, 2), 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.number_of_elements, 2);
        assert!(!page.first);
        assert!(!page.last);
        assert!(!page.empty);

        let last = Page::new(vec!["e"], PageRequest::new(2, 2), 5).map(str::len);
        assert!(last.last);
        assert_eq!(last.content, vec![1]);

        let none: Page<i32> = Page::new(vec![], PageRequest::new(0, 20), 0);
        assert_eq!(none.total_pages, 0);
        assert!(none.first && none.last && none.empty);
    }

    #[test]
    fn huge_page_index_has_no_sql_offset() {
        assert_eq!(PageRequest::new(3, 5).sql_offset(), Some(15));
        assert_eq!(PageRequest::new(1 << 62, 2).sql_offset(), None);
        assert_eq!(PageRequest::new(usize::MAX, 2).sql_offset(), None);
        assert_eq!(PageRequest::new(usize::MAX, 2).offset(), usize::MAX);
    }

    #[test]
    fn last_page_index_does_not_overflow() {
        let page: Page<i32> = Page::new(vec![], PageRequest::new(usize::MAX, 2), 4);
        assert_eq!(page.number, usize::MAX);
        assert_eq!(page.total_pages, 2);
        assert!(page.last);
        assert!(!page.first);
        assert!(page.empty);
    }

    #[test]
    fn page_serializes_camel_case() {
        let page = Page::new(vec![1, 2], PageRequest::new(0, 2), 4);
        let json = serde_json::to_value(&page).expect("serializable page");
        assert_eq!(json["totalElements"], 4);
        assert_eq!(json["numberOfElements"], 2);
        assert_eq!(json["totalPages"], 2);
        assert_eq!(json["first"], true);
        assert_eq!(json["last"], false);
    }
}
