mod common;

use anyhow::Result;
use common::FakeBackend;
use searchvd::config::Config;
use searchvd::services::{ApplicationOrchestrator, FetchWorker};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn test_slow_stale_response_does_not_win() -> Result<()> {
    let backend = Arc::new(
        FakeBackend::new()
            .with_query("cats", 30)
            .with_query("dogs", 30)
            .with_delay("cats", Duration::from_millis(300)),
    );
    let worker = FetchWorker::new(backend.clone());
    let mut app = ApplicationOrchestrator::new(&Config::default());

    if let Some(job) = app.submit_search("cats") {
        worker.spawn(job)?;
    }
    if let Some(job) = app.submit_search("dogs") {
        worker.spawn(job)?;
    }

    for _ in 0..2 {
        let event = worker
            .next_timeout(Duration::from_secs(5))
            .expect("both searches complete");
        app.handle_event(event, Instant::now());
    }

    assert_eq!(app.cache().query(), "dogs");
    assert!(app.pane().records.iter().all(|r| r.title.starts_with("dogs")));
    assert!(!app.pane().loading);
    assert_eq!(backend.calls().len(), 2);

    Ok(())
}

#[test]
fn test_follow_up_jobs_run_on_worker() -> Result<()> {
    let backend = Arc::new(FakeBackend::new().with_query("ocean", 100).with_batch(10));
    let worker = FetchWorker::new(backend.clone());
    let mut app = ApplicationOrchestrator::new(&Config::default());

    let mut pending = app.submit_search("ocean");
    while let Some(job) = pending.take() {
        worker.spawn(job)?;
        let event = worker
            .next_timeout(Duration::from_secs(5))
            .expect("search completes");
        pending = app.handle_event(event, Instant::now()).follow_up;
    }

    // Page 3 lies two batches past the cached frontier
    pending = app.jump_to_slot(3);
    assert!(pending.is_some());
    let mut fetches = 0;
    while let Some(job) = pending.take() {
        worker.spawn(job)?;
        let event = worker
            .next_timeout(Duration::from_secs(5))
            .expect("continuation completes");
        pending = app.handle_event(event, Instant::now()).follow_up;
        fetches += 1;
    }

    assert_eq!(fetches, 2);
    assert_eq!(app.cache().current_page(), 3);
    assert_eq!(app.pane().records[0].title, "ocean #20");

    Ok(())
}
