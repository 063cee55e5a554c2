use crate::cache::ResultCache;
use crate::config::Config;
use crate::services::fetch_worker::{Job, WorkerEvent};
use crate::services::query_controller::{
    Dispatch, FetchKind, PageTarget, QueryController, ResponseOutcome,
};
use crate::state::{ResultsPane, Settings, SettingsForm, ViewCoordinator};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What the UI has to do after a worker event was handled
#[derive(Debug, Default, PartialEq)]
pub struct EventOutcome {
    /// Another job to start right away
    pub follow_up: Option<Job>,
    /// Query of a freshly applied result set, for the search box
    pub applied_query: Option<String>,
}

/// Application core: everything the terminal front end drives.
///
/// Owns the query controller, the view coordinator, the session settings and
/// the rendered results pane. It performs no I/O itself; network work comes
/// back to the caller as [`Job`]s and their completions are fed in through
/// [`ApplicationOrchestrator::handle_event`].
pub struct ApplicationOrchestrator {
    controller: QueryController,
    view: ViewCoordinator,
    settings: Settings,
    pane: ResultsPane,
    load_order_on_startup: bool,
    restored_query: Option<String>,
}

impl ApplicationOrchestrator {
    pub fn new(config: &Config) -> Self {
        ApplicationOrchestratorBuilder::new()
            .with_settings(Settings::from_config(config))
            .with_notification_lifetime(Duration::from_secs(config.display.notification_secs))
            .with_load_order_on_startup(config.behavior.load_order_on_startup)
            .build()
    }

    /// Jobs to start before the first frame
    pub fn startup_jobs(&self) -> Vec<Job> {
        if self.load_order_on_startup {
            vec![Job::LoadOrder]
        } else {
            Vec::new()
        }
    }

    /// Submit text from the landing box or the results search box
    pub fn submit_search(&mut self, raw_text: &str) -> Option<Job> {
        let dispatch = self
            .controller
            .submit_query(raw_text, self.settings.mode, &mut self.pane);
        match dispatch {
            Dispatch::Fetch(request) => {
                self.view.enter_results_view();
                self.view.invalidate_chart_for_new_query();
                Some(Job::Search(request))
            }
            Dispatch::Rendered | Dispatch::Ignored => None,
        }
    }

    pub fn change_page(&mut self, target: PageTarget) -> Option<Job> {
        let fresh_pending = self
            .controller
            .in_flight()
            .is_some_and(|request| request.kind == FetchKind::Fresh);

        match self
            .controller
            .change_page(target, self.settings.mode, &mut self.pane)
        {
            Dispatch::Fetch(request) => Some(Job::Search(request)),
            Dispatch::Rendered => {
                if fresh_pending {
                    info!(target: "query", "Submission cancelled, back to '{}'", self.controller.cache().query());
                    self.restored_query = Some(self.controller.cache().query().to_string());
                }
                None
            }
            Dispatch::Ignored => None,
        }
    }

    pub fn next_page(&mut self) -> Option<Job> {
        let cache = self.controller.cache();
        if cache.current_page() >= cache.total_pages() {
            return None;
        }
        self.change_page(PageTarget::Next)
    }

    /// Query shown again after page navigation cancelled a pending submission
    pub fn take_restored_query(&mut self) -> Option<String> {
        self.restored_query.take()
    }

    pub fn previous_page(&mut self) -> Option<Job> {
        let current = self.controller.cache().current_page();
        if current <= 1 {
            return None;
        }
        self.change_page(PageTarget::Page(current - 1))
    }

    /// Jump to the `slot`-th (1-based) entry of the page widget
    pub fn jump_to_slot(&mut self, slot: usize) -> Option<Job> {
        let page = self.pane.plan.targets().get(slot.checked_sub(1)?).copied()?;
        self.change_page(PageTarget::Page(page))
    }

    /// Redraw the page on screen, e.g. after a terminal resize
    pub fn rerender(&mut self) {
        self.controller.rerender(&mut self.pane);
    }

    pub fn toggle_chart(&mut self) -> bool {
        self.view.toggle_chart(self.controller.cache())
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.view.toggle_settings()
    }

    pub fn close_settings(&mut self) {
        self.view.close_settings();
    }

    /// Fresh form for the settings panel
    pub fn settings_form(&self) -> SettingsForm {
        self.settings.form()
    }

    pub fn submit_settings(&mut self, form: &SettingsForm) -> Option<Job> {
        self.view
            .submit_settings(&mut self.settings, form, Instant::now())
            .map(Job::UpdateOrder)
    }

    pub fn handle_event(&mut self, event: WorkerEvent, now: Instant) -> EventOutcome {
        match event {
            WorkerEvent::Search { generation, result } => {
                let outcome = self
                    .controller
                    .apply_response(generation, result, &mut self.pane);
                self.after_search(outcome)
            }
            WorkerEvent::OrderLoaded(Ok(order)) => {
                self.settings.apply_loaded_order(order);
                EventOutcome::default()
            }
            WorkerEvent::OrderLoaded(Err(err)) => {
                warn!(target: "settings", "Could not read ranking order: {}", err);
                EventOutcome::default()
            }
            WorkerEvent::OrderUpdated { order, result } => {
                self.view
                    .apply_order_update(&mut self.settings, order, result, now);
                EventOutcome::default()
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        self.view.notify(message, now);
    }

    /// Expire popups
    pub fn tick(&mut self, now: Instant) {
        self.view.prune_notifications(now);
    }

    fn after_search(&mut self, outcome: ResponseOutcome) -> EventOutcome {
        match outcome {
            ResponseOutcome::Applied {
                kind,
                stored,
                follow_up,
            } => {
                debug!(target: "view", "Applied {:?} batch of {} records", kind, stored);
                self.view.refresh_chart(self.controller.cache());
                let applied_query = (kind == FetchKind::Fresh)
                    .then(|| self.controller.cache().query().to_string());
                if let Some(request) = &follow_up {
                    info!(target: "query", "Page still incomplete, fetching from offset {}", request.offset);
                }
                EventOutcome {
                    follow_up: follow_up.map(Job::Search),
                    applied_query,
                }
            }
            ResponseOutcome::Failed { .. } | ResponseOutcome::Stale => EventOutcome::default(),
        }
    }

    pub fn cache(&self) -> &ResultCache {
        self.controller.cache()
    }

    pub fn controller(&self) -> &QueryController {
        &self.controller
    }

    pub fn view(&self) -> &ViewCoordinator {
        &self.view
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn pane(&self) -> &ResultsPane {
        &self.pane
    }

    pub fn pane_mut(&mut self) -> &mut ResultsPane {
        &mut self.pane
    }
}

/// Builder for configuring the ApplicationOrchestrator
pub struct ApplicationOrchestratorBuilder {
    settings: Settings,
    notification_lifetime: Duration,
    load_order_on_startup: bool,
    cache: ResultCache,
}

impl ApplicationOrchestratorBuilder {
    pub fn new() -> Self {
        Self {
            settings: Settings::default(),
            notification_lifetime: crate::state::view_coordinator::NOTIFICATION_LIFETIME,
            load_order_on_startup: true,
            cache: ResultCache::new(),
        }
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_notification_lifetime(mut self, lifetime: Duration) -> Self {
        self.notification_lifetime = lifetime;
        self
    }

    pub fn with_load_order_on_startup(mut self, value: bool) -> Self {
        self.load_order_on_startup = value;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.cache = ResultCache::with_page_size(page_size);
        self
    }

    pub fn build(self) -> ApplicationOrchestrator {
        ApplicationOrchestrator {
            controller: QueryController::with_cache(self.cache),
            view: ViewCoordinator::new(self.notification_lifetime),
            settings: self.settings,
            pane: ResultsPane::new(),
            load_order_on_startup: self.load_order_on_startup,
            restored_query: None,
        }
    }
}

impl Default for ApplicationOrchestratorBuilder {
    fn default() -> Self {
        Self::new()
    }
}
