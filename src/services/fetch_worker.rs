use crate::api_client::SearchBackend;
use crate::error::SearchError;
use crate::search::{OrderUpdate, SearchPayload};
use crate::services::query_controller::FetchRequest;
use anyhow::Result;
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Network work requested by the application
#[derive(Debug, Clone, PartialEq)]
pub enum Job {
    Search(FetchRequest),
    LoadOrder,
    UpdateOrder(i64),
}

/// Completion of a [`Job`], delivered back to the UI thread
#[derive(Debug)]
pub enum WorkerEvent {
    Search {
        generation: u64,
        result: Result<SearchPayload, SearchError>,
    },
    OrderLoaded(Result<i64, SearchError>),
    OrderUpdated {
        order: i64,
        result: Result<OrderUpdate, SearchError>,
    },
}

impl Job {
    /// Perform the job on the calling thread
    pub fn run(self, backend: &dyn SearchBackend) -> WorkerEvent {
        match self {
            Job::Search(request) => WorkerEvent::Search {
                generation: request.generation,
                result: backend.search(&request.query, request.offset, request.mode),
            },
            Job::LoadOrder => WorkerEvent::OrderLoaded(backend.fetch_order()),
            Job::UpdateOrder(order) => WorkerEvent::OrderUpdated {
                order,
                result: backend.update_order(order),
            },
        }
    }

    fn name(&self) -> String {
        match self {
            Job::Search(request) => format!("search-{}", request.generation),
            Job::LoadOrder => "load-order".to_string(),
            Job::UpdateOrder(_) => "update-order".to_string(),
        }
    }
}

/// Runs blocking backend calls off the UI thread.
///
/// Each job gets its own short-lived thread; completions arrive on one
/// channel in whatever order the backend answers.
pub struct FetchWorker {
    backend: Arc<dyn SearchBackend>,
    tx: Sender<WorkerEvent>,
    rx: Receiver<WorkerEvent>,
}

impl FetchWorker {
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        let (tx, rx) = channel();
        Self { backend, tx, rx }
    }

    pub fn spawn(&self, job: Job) -> Result<()> {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        let name = job.name();
        debug!(target: "worker", "Starting {}", name);

        std::thread::Builder::new()
            .name(format!("searchvd-{name}"))
            .spawn(move || {
                let event = job.run(backend.as_ref());
                if tx.send(event).is_err() {
                    // UI is gone; nothing left to deliver to
                    debug!(target: "worker", "Dropping result of {}", name);
                }
            })?;
        Ok(())
    }

    /// Next completed job, if any, without blocking
    pub fn try_next(&self) -> Option<WorkerEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait up to `timeout` for a completed job
    pub fn next_timeout(&self, timeout: Duration) -> Option<WorkerEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                warn!(target: "worker", "Worker channel disconnected");
                None
            }
        }
    }
}
