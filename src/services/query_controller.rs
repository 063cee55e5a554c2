use crate::cache::ResultCache;
use crate::error::{SearchError, SEARCH_FAILED_MESSAGE};
use crate::pagination::{self, PagePlan};
use crate::search::{RankingMode, ResultRecord, SearchPayload};
use tracing::{debug, info, warn};

/// Surface the controller renders into
pub trait RenderTarget {
    fn set_loading(&mut self, loading: bool);

    /// Replace the result-count line
    fn set_result_info(&mut self, text: &str);

    /// Show one page of results together with its navigation window
    fn render_page(&mut self, query: &str, records: &[ResultRecord], plan: &PagePlan);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchKind {
    /// First batch of a newly submitted query; replaces the cache on success
    Fresh,
    /// Next batch of the cached query, appended at `offset`
    Continuation,
}

/// A network fetch the caller has to perform and report back
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub generation: u64,
    pub query: String,
    pub offset: usize,
    pub mode: RankingMode,
    pub kind: FetchKind,
}

/// Page navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    /// One page past the current one
    Next,
    /// Absolute 1-based page index
    Page(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Dispatch {
    /// Nothing to do (empty query, no results yet, page already being fetched)
    Ignored,
    /// Data is missing; perform this fetch
    Fetch(FetchRequest),
    /// Served from the cache
    Rendered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome {
    Applied {
        kind: FetchKind,
        stored: usize,
        /// The current page is still not resident; perform this fetch too
        follow_up: Option<FetchRequest>,
    },
    Failed {
        kind: FetchKind,
    },
    /// Superseded by a newer action and dropped untouched
    Stale,
}

/// Decides, for every query and page change, whether the cache can serve it
/// or a fetch is needed, and keeps the rendered page consistent with the cache.
///
/// Every issued request carries a generation. Only a response whose generation
/// matches the latest issued one is applied, so the last user action wins even
/// when responses arrive out of order.
#[derive(Debug)]
pub struct QueryController {
    cache: ResultCache,
    generation: u64,
    in_flight: Option<FetchRequest>,
    rendered_page: usize,
}

impl Default for QueryController {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryController {
    pub fn new() -> Self {
        Self::with_cache(ResultCache::new())
    }

    pub fn with_cache(cache: ResultCache) -> Self {
        Self {
            cache,
            generation: 0,
            in_flight: None,
            rendered_page: 1,
        }
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight(&self) -> Option<&FetchRequest> {
        self.in_flight.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Submit text from either search box.
    ///
    /// A submission is always treated as a new query, even if the text
    /// matches the cached one; blank input is ignored.
    pub fn submit_query(
        &mut self,
        raw_text: &str,
        mode: RankingMode,
        target: &mut impl RenderTarget,
    ) -> Dispatch {
        let query = raw_text.trim();
        if query.is_empty() {
            debug!(target: "query", "Ignoring blank submission");
            return Dispatch::Ignored;
        }

        info!(target: "query", "Submitting '{}' (mode {})", query, mode);
        let request = self.issue(query.to_string(), 0, mode, FetchKind::Fresh);
        target.set_loading(true);
        Dispatch::Fetch(request)
    }

    /// Move to another page, fetching first if its records are not cached
    pub fn change_page(
        &mut self,
        page_target: PageTarget,
        mode: RankingMode,
        target: &mut impl RenderTarget,
    ) -> Dispatch {
        if self.cache.query().is_empty() {
            return Dispatch::Ignored;
        }

        let last_page = self.cache.total_pages().max(1);
        let page = match page_target {
            PageTarget::Next => self.cache.current_page() + 1,
            PageTarget::Page(page) => page,
        }
        .clamp(1, last_page);
        self.cache.set_current_page(page);

        if !self.cache.is_page_resident(page) {
            if let Some(pending) = self.in_flight.as_ref().filter(|r| {
                r.kind == FetchKind::Continuation && r.offset == self.cache.len()
            }) {
                debug!(target: "query", "Page {} waits for request #{}", page, pending.generation);
                return Dispatch::Ignored;
            }
            debug!(target: "query", "Page {} not cached ({} records), fetching", page, self.cache.len());
            let request = self.continuation(mode);
            target.set_loading(true);
            return Dispatch::Fetch(request);
        }

        if let Some(stale) = self.in_flight.take() {
            debug!(target: "query", "Page {} served from cache, dropping request #{}", page, stale.generation);
            self.generation += 1;
            target.set_loading(false);
        }
        self.render_current(target);
        Dispatch::Rendered
    }

    /// Apply the outcome of a fetch previously returned by this controller
    pub fn apply_response(
        &mut self,
        generation: u64,
        result: Result<SearchPayload, SearchError>,
        target: &mut impl RenderTarget,
    ) -> ResponseOutcome {
        let request = match self.in_flight.take() {
            Some(request) if request.generation == generation => request,
            other => {
                debug!(target: "query", "Discarding stale response #{}", generation);
                self.in_flight = other;
                return ResponseOutcome::Stale;
            }
        };

        match result {
            Ok(payload) => self.apply_payload(request, payload, target),
            Err(err) => {
                warn!(target: "query", "Fetch #{} for '{}' at offset {} failed: {}", request.generation, request.query, request.offset, err);
                target.set_result_info(SEARCH_FAILED_MESSAGE);
                if request.kind == FetchKind::Continuation {
                    // Keep showing the last page that was actually rendered
                    self.cache.set_current_page(self.rendered_page);
                    self.render_current(target);
                }
                target.set_loading(false);
                ResponseOutcome::Failed { kind: request.kind }
            }
        }
    }

    /// Draw the last rendered page again without touching the cache
    pub fn rerender(&self, target: &mut impl RenderTarget) {
        if !self.cache.query().is_empty() {
            self.draw_page(self.rendered_page, target);
        }
    }

    fn apply_payload(
        &mut self,
        request: FetchRequest,
        payload: SearchPayload,
        target: &mut impl RenderTarget,
    ) -> ResponseOutcome {
        let summary = payload.summary_line();
        let total = payload.results_count;

        match request.kind {
            FetchKind::Fresh => self.cache.reset(&request.query),
            FetchKind::Continuation => {
                if request.offset != self.cache.len() || request.query != self.cache.query() {
                    warn!(target: "query", "Continuation #{} no longer matches the cache, dropping it", request.generation);
                    target.set_loading(false);
                    return ResponseOutcome::Stale;
                }
            }
        }

        let stored = self.cache.append(payload.into_records(), total);
        target.set_result_info(&summary);
        info!(target: "query", "'{}': {} of {} results cached", request.query, self.cache.len(), total);

        let last_page = self.cache.total_pages().max(1);
        if self.cache.current_page() > last_page {
            self.cache.set_current_page(last_page);
        }

        let page = self.cache.current_page();
        if !self.cache.is_page_resident(page) {
            if stored > 0 {
                let follow_up = self.continuation(request.mode);
                return ResponseOutcome::Applied {
                    kind: request.kind,
                    stored,
                    follow_up: Some(follow_up),
                };
            }
            // The backend has nothing more; fall back to the last cached page
            let last = self.cache.len().div_ceil(self.cache.page_size()).max(1);
            self.cache.set_current_page(last);
        }

        self.render_current(target);
        target.set_loading(false);
        ResponseOutcome::Applied {
            kind: request.kind,
            stored,
            follow_up: None,
        }
    }

    fn continuation(&mut self, mode: RankingMode) -> FetchRequest {
        let query = self.cache.query().to_string();
        let offset = self.cache.len();
        self.issue(query, offset, mode, FetchKind::Continuation)
    }

    fn issue(&mut self, query: String, offset: usize, mode: RankingMode, kind: FetchKind) -> FetchRequest {
        self.generation += 1;
        if let Some(previous) = &self.in_flight {
            debug!(target: "query", "Request #{} supersedes #{}", self.generation, previous.generation);
        }
        let request = FetchRequest {
            generation: self.generation,
            query,
            offset,
            mode,
            kind,
        };
        self.in_flight = Some(request.clone());
        request
    }

    fn render_current(&mut self, target: &mut impl RenderTarget) {
        let page = self.cache.current_page();
        self.draw_page(page, target);
        self.rendered_page = page;
    }

    fn draw_page(&self, page: usize, target: &mut impl RenderTarget) {
        let plan = pagination::plan(page, self.cache.total_count(), self.cache.page_size());
        target.render_page(self.cache.query(), self.cache.slice_for_page(page), &plan);
    }
}
