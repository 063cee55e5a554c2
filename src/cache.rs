use crate::search::ResultRecord;
use tracing::debug;

/// Number of records shown per page
pub const PAGE_SIZE: usize = 10;

/// Append-only store of everything fetched for the current query.
///
/// Exactly one cache is live at a time; a new query resets it wholesale.
#[derive(Debug, Clone)]
pub struct ResultCache {
    query: String,
    records: Vec<ResultRecord>,
    total_count: usize,
    current_page: usize,
    page_size: usize,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self::with_page_size(PAGE_SIZE)
    }

    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            query: String::new(),
            records: Vec::new(),
            total_count: 0,
            current_page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Discard everything and scope the cache to `query`
    pub fn reset(&mut self, query: &str) {
        debug!(target: "cache", "Reset for '{}' (dropping {} records)", query, self.records.len());
        self.query = query.to_string();
        self.records.clear();
        self.total_count = 0;
        self.current_page = 1;
    }

    /// Push a batch to the tail and record the backend's total.
    ///
    /// Records past `reported_total` are not kept, so the cache never grows
    /// beyond what the backend says exists. Returns how many were stored.
    pub fn append(&mut self, new_records: Vec<ResultRecord>, reported_total: usize) -> usize {
        self.total_count = reported_total;
        let room = reported_total.saturating_sub(self.records.len());
        let offered = new_records.len();
        self.records.extend(new_records.into_iter().take(room));

        let stored = offered.min(room);
        if stored < offered {
            debug!(target: "cache", "Dropped {} records beyond reported total {}", offered - stored, reported_total);
        }
        debug!(target: "cache", "Appended {} records, {} of {} cached", stored, self.records.len(), self.total_count);
        stored
    }

    /// True if the page is covered by cached records or lies at/after the tail
    pub fn has_page(&self, page_index: usize) -> bool {
        let end = page_index * self.page_size;
        self.records.len() >= end || end >= self.total_count
    }

    /// True if every record the page can ever show is already cached
    pub fn is_page_resident(&self, page_index: usize) -> bool {
        let end = (page_index * self.page_size).min(self.total_count);
        self.records.len() >= end
    }

    /// Records for a 1-based page, clamped to what is cached
    pub fn slice_for_page(&self, page_index: usize) -> &[ResultRecord] {
        let len = self.records.len();
        let start = (page_index.saturating_sub(1) * self.page_size).min(len);
        let end = (page_index * self.page_size).min(len);
        &self.records[start..end]
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn records(&self) -> &[ResultRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn set_current_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_count.div_ceil(self.page_size)
    }

    /// Correlations in rank order, for the chart
    pub fn correlations(&self) -> impl Iterator<Item = f64> + '_ {
        self.records.iter().map(|r| r.correlation)
    }
}
