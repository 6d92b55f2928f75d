use serde::Serialize;

/// Pagination metadata for one page of hits.
///
/// `current_page` is clamped into `1..=max(page_count, 1)`, so a request for
/// a page past the data reports the last real page, and an empty result
/// reports page 1 of 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    current_page: u64,
    entries_per_page: u64,
    total_entries: u64,
}

impl Paginator {
    pub fn new(requested_page: u64, entries_per_page: u64, total_entries: u64) -> Self {
        let page_count = Self::count_pages(total_entries, entries_per_page);
        let current_page = requested_page.max(1).min(page_count.max(1));
        Self { current_page, entries_per_page, total_entries }
    }

    fn count_pages(total_entries: u64, entries_per_page: u64) -> u64 {
        if entries_per_page == 0 || total_entries == 0 {
            return 0;
        }
        total_entries.div_ceil(entries_per_page)
    }

    pub fn current_page(&self) -> u64 { self.current_page }
    pub fn entries_per_page(&self) -> u64 { self.entries_per_page }
    pub fn total_entries(&self) -> u64 { self.total_entries }

    pub fn page_count(&self) -> u64 {
        Self::count_pages(self.total_entries, self.entries_per_page)
    }

    pub fn first_page(&self) -> u64 { 1 }

    pub fn last_page(&self) -> u64 {
        self.page_count().max(1)
    }

    pub fn previous_page(&self) -> Option<u64> {
        (self.current_page > 1).then(|| self.current_page - 1)
    }

    pub fn next_page(&self) -> Option<u64> {
        (self.current_page < self.page_count()).then(|| self.current_page + 1)
    }

    /// Zero-based offset of the current page.
    pub fn offset(&self) -> u64 {
        (self.current_page - 1).saturating_mul(self.entries_per_page)
    }

    /// 1-based position of the first entry on this page, 0 when empty.
    pub fn first(&self) -> u64 {
        if self.entries_on_this_page() == 0 { 0 } else { self.offset() + 1 }
    }

    /// 1-based position of the last entry on this page, 0 when empty.
    pub fn last(&self) -> u64 {
        if self.entries_on_this_page() == 0 { 0 } else { self.offset() + self.entries_on_this_page() }
    }

    pub fn entries_on_this_page(&self) -> u64 {
        self.total_entries
            .saturating_sub(self.offset())
            .min(self.entries_per_page)
    }
}
