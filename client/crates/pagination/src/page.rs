//! Page metadata, page requests, and the canonical list envelope.

use serde::{Deserialize, Serialize};

/// Page size used when a caller does not ask for one.
pub const DEFAULT_PER_PAGE: u32 = 10;

/// Position and size of one requested page.
///
/// ## Invariants
/// - `page` is 1-based and never zero.
///
/// # Examples
/// ```
/// use pagination::PageRequest;
///
/// let request = PageRequest::new(0, 25);
/// assert_eq!(request.page(), 1);
/// assert_eq!(request.per_page(), 25);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
}

impl PageRequest {
    /// Build a request, clamping `page` to at least 1.
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Requested page size.
    #[must_use]
    pub const fn per_page(&self) -> u32 {
        self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// Page metadata carried alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// 1-based page number.
    pub page: u32,
    /// Page size the backend applied.
    pub per_page: u32,
    /// Total number of records across all pages.
    pub total: u64,
    /// Number of pages needed to hold `total` records.
    pub total_pages: u64,
}

impl PageMeta {
    /// Build metadata, deriving `total_pages` from `total` and `per_page`.
    ///
    /// A zero `per_page` yields zero pages.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageMeta;
    ///
    /// let meta = PageMeta::new(1, 10, 21);
    /// assert_eq!(meta.total_pages, 3);
    /// ```
    #[must_use]
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        Self {
            page,
            per_page,
            total,
            total_pages: total_pages(total, per_page),
        }
    }

    /// Metadata for `total` records at the position described by `request`.
    #[must_use]
    pub fn for_request(request: PageRequest, total: u64) -> Self {
        Self::new(request.page(), request.per_page(), total)
    }

    /// Copy of this metadata with a new total.
    #[must_use]
    pub fn with_total(self, total: u64) -> Self {
        Self::new(self.page, self.per_page, total)
    }
}

impl Default for PageMeta {
    fn default() -> Self {
        Self::for_request(PageRequest::default(), 0)
    }
}

fn total_pages(total: u64, per_page: u32) -> u64 {
    if per_page == 0 {
        0
    } else {
        total.div_ceil(u64::from(per_page))
    }
}

/// Canonical list envelope: one page of records plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Records on this page.
    pub data: Vec<T>,
    /// Position and totals.
    pub meta: PageMeta,
}

impl<T> PaginatedResponse<T> {
    /// Wrap `data` with metadata derived from `request` and `total`.
    #[must_use]
    pub fn new(data: Vec<T>, request: PageRequest, total: u64) -> Self {
        Self {
            data,
            meta: PageMeta::for_request(request, total),
        }
    }

    /// An empty page at the position described by `request`.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Insert a record at the front and count it in the total.
    pub fn prepend(&mut self, item: T) {
        self.data.insert(0, item);
        self.meta = self.meta.with_total(self.meta.total.saturating_add(1));
    }

    /// Replace the first record matching `matches`.
    ///
    /// Returns `false` when nothing matched; the page is left as it was.
    pub fn replace_where(&mut self, item: T, matches: impl Fn(&T) -> bool) -> bool {
        match self.data.iter_mut().find(|existing| matches(existing)) {
            Some(slot) => {
                *slot = item;
                true
            }
            None => false,
        }
    }

    /// Remove every record matching `matches` and discount them from the
    /// total. Returns how many were removed.
    pub fn remove_where(&mut self, matches: impl Fn(&T) -> bool) -> usize {
        let before = self.data.len();
        self.data.retain(|item| !matches(item));
        let removed = before.saturating_sub(self.data.len());
        let removed_total = u64::try_from(removed).unwrap_or(u64::MAX);
        self.meta = self
            .meta
            .with_total(self.meta.total.saturating_sub(removed_total));
        removed
    }

    /// Number of records on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether this page holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Default for PaginatedResponse<T> {
    fn default() -> Self {
        Self::empty(PageRequest::default())
    }
}
