//! Offset pagination primitives.
//!
//! [`PageRequest`] validates the page number and page size a caller asked
//! for; [`PagedResult`] carries one page of rows together with the totals
//! the response envelope derives its page-count and adjacency flags from.

use serde::{Deserialize, Serialize};

/// Page size applied when a request omits one.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Upper bound on the page size; larger requests are rejected.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validation failures for [`PageRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// The page number was zero or negative.
    #[error("Page number must be greater than 0")]
    PageNumberOutOfRange,
    /// The page number exceeded the representable range.
    #[error("Page number is too large")]
    PageNumberTooLarge,
    /// The page size was outside `1..=MAX_PAGE_SIZE`.
    #[error("Page size must be between 1 and {MAX_PAGE_SIZE}")]
    PageSizeOutOfRange,
}

/// A validated offset-pagination request.
///
/// Construction enforces `page_number >= 1` and
/// `1 <= page_size <= MAX_PAGE_SIZE`, so offsets and limits derived from a
/// `PageRequest` are always well formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page_number: u32,
    page_size: u32,
}

impl PageRequest {
    /// Validate a page number and size pair.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageRequest;
    ///
    /// let page = PageRequest::new(2, 25).expect("valid request");
    /// assert_eq!(page.offset(), 25);
    /// assert_eq!(page.limit(), 25);
    /// ```
    pub fn new(page_number: u32, page_size: u32) -> Result<Self, PageRequestError> {
        if page_number < 1 {
            return Err(PageRequestError::PageNumberOutOfRange);
        }
        if page_size < 1 || page_size > MAX_PAGE_SIZE {
            return Err(PageRequestError::PageSizeOutOfRange);
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// The 1-based page number.
    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    /// Rows per page.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Row offset of the first row on this page.
    pub fn offset(&self) -> i64 {
        i64::from(self.page_number - 1) * i64::from(self.page_size)
    }

    /// Row limit for this page.
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_number: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals of the filtered set.
///
/// `total_records` counts the whole filtered set, not just this page, so
/// the derived [`total_pages`](Self::total_pages) and adjacency flags stay
/// correct on every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResult<T> {
    pub data: Vec<T>,
    pub total_records: u64,
    pub page_number: u32,
    pub page_size: u32,
}

impl<T> PagedResult<T> {
    /// Assemble a page of rows with the pre-pagination total.
    pub fn new(data: Vec<T>, total_records: u64, page: PageRequest) -> Self {
        Self {
            data,
            total_records,
            page_number: page.page_number(),
            page_size: page.page_size(),
        }
    }

    /// Number of pages in the filtered set: `ceil(total_records / page_size)`.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_records.div_ceil(u64::from(self.page_size))
    }

    /// Whether a page precedes this one.
    pub fn has_previous_page(&self) -> bool {
        self.page_number > 1
    }

    /// Whether a page follows this one.
    pub fn has_next_page(&self) -> bool {
        u64::from(self.page_number) < self.total_pages()
    }

    /// Transform each row while keeping the pagination totals.
    ///
    /// # Examples
    /// ```
    /// use pagination::{PageRequest, PagedResult};
    ///
    /// let page = PageRequest::new(1, 10).expect("valid request");
    /// let result = PagedResult::new(vec![1, 2], 2, page).map(|n| n * 10);
    /// assert_eq!(result.data, vec![10, 20]);
    /// assert_eq!(result.total_records, 2);
    /// ```
    pub fn map<U, F>(self, f: F) -> PagedResult<U>
    where
        F: FnMut(T) -> U,
    {
        PagedResult {
            data: self.data.into_iter().map(f).collect(),
            total_records: self.total_records,
            page_number: self.page_number,
            page_size: self.page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, 1)]
    #[case(1, MAX_PAGE_SIZE)]
    #[case(u32::MAX, 10)]
    fn page_request_accepts_valid_bounds(#[case] number: u32, #[case] size: u32) {
        let page = PageRequest::new(number, size).expect("valid request");
        assert_eq!(page.page_number(), number);
        assert_eq!(page.page_size(), size);
    }

    #[rstest]
    #[case(0, 10, PageRequestError::PageNumberOutOfRange)]
    #[case(1, 0, PageRequestError::PageSizeOutOfRange)]
    #[case(1, MAX_PAGE_SIZE + 1, PageRequestError::PageSizeOutOfRange)]
    fn page_request_rejects_out_of_range(
        #[case] number: u32,
        #[case] size: u32,
        #[case] expected: PageRequestError,
    ) {
        assert_eq!(PageRequest::new(number, size), Err(expected));
    }

    #[rstest]
    fn default_request_is_first_page_of_ten() {
        let page = PageRequest::default();
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(page.offset(), 0);
    }

    #[rstest]
    fn error_messages_are_caller_facing() {
        assert_eq!(
            PageRequestError::PageNumberOutOfRange.to_string(),
            "Page number must be greater than 0"
        );
        assert_eq!(
            PageRequestError::PageNumberTooLarge.to_string(),
            "Page number is too large"
        );
        assert_eq!(
            PageRequestError::PageSizeOutOfRange.to_string(),
            "Page size must be between 1 and 100"
        );
    }

    #[rstest]
    #[case(0, 10, 0)]
    #[case(1, 10, 1)]
    #[case(10, 10, 1)]
    #[case(11, 10, 2)]
    #[case(21, 10, 3)]
    fn total_pages_rounds_up(#[case] total: u64, #[case] size: u32, #[case] expected: u64) {
        let page = PageRequest::new(1, size).expect("valid request");
        let result: PagedResult<()> = PagedResult::new(Vec::new(), total, page);
        assert_eq!(result.total_pages(), expected);
    }

    #[rstest]
    fn adjacency_flags_track_position() {
        let first = PagedResult::new(vec![1], 3, PageRequest::new(1, 1).expect("valid"));
        assert!(!first.has_previous_page());
        assert!(first.has_next_page());

        let last = PagedResult::new(vec![3], 3, PageRequest::new(3, 1).expect("valid"));
        assert!(last.has_previous_page());
        assert!(!last.has_next_page());
    }

    #[rstest]
    fn empty_set_has_no_pages() {
        let result: PagedResult<()> =
            PagedResult::new(Vec::new(), 0, PageRequest::new(1, 10).expect("valid"));
        assert_eq!(result.total_pages(), 0);
        assert!(!result.has_previous_page());
        assert!(!result.has_next_page());
    }

    #[rstest]
    fn serialises_with_camel_case_names() {
        let result = PagedResult::new(vec!["A"], 1, PageRequest::new(1, 10).expect("valid"));
        let value = serde_json::to_value(&result).expect("serialise");
        assert_eq!(value["totalRecords"], 1);
        assert_eq!(value["pageNumber"], 1);
        assert_eq!(value["pageSize"], 10);
    }
}
