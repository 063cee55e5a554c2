#![allow(dead_code)]

use searchvd::api_client::SearchBackend;
use searchvd::error::SearchError;
use searchvd::search::{OrderUpdate, RankingMode, SearchPayload};
use searchvd::services::{ApplicationOrchestrator, EventOutcome, Job};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub offset: usize,
    pub mode: RankingMode,
}

/// In-memory backend with a fixed number of hits per query
pub struct FakeBackend {
    totals: HashMap<String, usize>,
    batch: usize,
    padded: bool,
    delays: HashMap<String, Duration>,
    failing_searches: Mutex<usize>,
    order: Mutex<Option<i64>>,
    computed_orders: Vec<i64>,
    calls: Mutex<Vec<SearchCall>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            totals: HashMap::new(),
            batch: 200,
            padded: false,
            delays: HashMap::new(),
            failing_searches: Mutex::new(0),
            order: Mutex::new(Some(150)),
            computed_orders: vec![150],
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_query(mut self, query: &str, total: usize) -> Self {
        self.totals.insert(query.to_string(), total);
        self
    }

    pub fn with_batch(mut self, batch: usize) -> Self {
        self.batch = batch;
        self
    }

    /// Always return a full batch, filling past the total with zero-correlation hits
    pub fn padded(mut self) -> Self {
        self.padded = true;
        self
    }

    pub fn with_delay(mut self, query: &str, delay: Duration) -> Self {
        self.delays.insert(query.to_string(), delay);
        self
    }

    pub fn without_order(self) -> Self {
        *self.order.lock().unwrap() = None;
        self
    }

    pub fn fail_next_searches(&self, count: usize) {
        *self.failing_searches.lock().unwrap() = count;
    }

    pub fn calls(&self) -> Vec<SearchCall> {
        self.calls.lock().unwrap().clone()
    }
}

impl SearchBackend for FakeBackend {
    fn search(&self, query: &str, offset: usize, mode: RankingMode) -> Result<SearchPayload, SearchError> {
        self.calls.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            offset,
            mode,
        });
        if let Some(delay) = self.delays.get(query) {
            std::thread::sleep(*delay);
        }

        {
            let mut failing = self.failing_searches.lock().unwrap();
            if *failing > 0 {
                *failing -= 1;
                return Err(SearchError::Malformed("expected value at line 1 column 1".into()));
            }
        }

        let total = self.totals.get(query).copied().unwrap_or(0);
        let count = if self.padded {
            self.batch
        } else {
            self.batch.min(total.saturating_sub(offset))
        };
        let range = offset..offset + count;

        Ok(SearchPayload {
            results_count: total,
            links: range.clone().map(|i| format!("https://{query}.example/{i}")).collect(),
            titles: range.clone().map(|i| format!("{query} #{i}")).collect(),
            contents: range.clone().map(|i| format!("text about {query}\nnumber {i}")).collect(),
            correlations: range
                .map(|i| if i < total { 1.0 / (i as f64 + 1.0) } else { 0.0 })
                .collect(),
            time: 0.01,
        })
    }

    fn fetch_order(&self) -> Result<i64, SearchError> {
        self.order
            .lock()
            .unwrap()
            .ok_or_else(|| SearchError::Status { status: 500, body: "no index".into() })
    }

    fn update_order(&self, order: i64) -> Result<OrderUpdate, SearchError> {
        Ok(OrderUpdate {
            computed: self.computed_orders.contains(&order),
        })
    }
}

/// Run `job` and any follow-up fetches it triggers, inline
pub fn complete(app: &mut ApplicationOrchestrator, backend: &FakeBackend, job: Option<Job>) -> EventOutcome {
    let mut last = EventOutcome::default();
    let mut next = job;
    while let Some(job) = next {
        let event = job.run(backend);
        last = app.handle_event(event, Instant::now());
        next = last.follow_up.take();
    }
    last
}
