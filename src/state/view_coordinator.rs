use crate::cache::ResultCache;
use crate::error::SearchError;
use crate::search::OrderUpdate;
use crate::state::chart::CorrelationChart;
use crate::state::settings::{Settings, SettingsForm};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Default lifetime of a popup notification
pub const NOTIFICATION_LIFETIME: Duration = Duration::from_secs(9);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Location {
    #[default]
    Home,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewState {
    pub location: Location,
    pub chart_visible: bool,
    pub settings_visible: bool,
}

/// Non-blocking popup message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub expires_at: Instant,
}

/// Owns the view state and the panels derived from the cache
#[derive(Debug)]
pub struct ViewCoordinator {
    state: ViewState,
    chart: Option<CorrelationChart>,
    notifications: Vec<Notification>,
    notification_lifetime: Duration,
}

impl Default for ViewCoordinator {
    fn default() -> Self {
        Self::new(NOTIFICATION_LIFETIME)
    }
}

impl ViewCoordinator {
    pub fn new(notification_lifetime: Duration) -> Self {
        Self {
            state: ViewState::default(),
            chart: None,
            notifications: Vec::new(),
            notification_lifetime,
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn chart(&self) -> Option<&CorrelationChart> {
        self.chart.as_ref()
    }

    /// Switch from Home to Results. Returns true only on the actual transition.
    pub fn enter_results_view(&mut self) -> bool {
        if self.state.location == Location::Results {
            return false;
        }
        info!(target: "view", "Entering results view");
        self.state.location = Location::Results;
        true
    }

    /// Flip chart visibility, building the chart if it was invalidated
    pub fn toggle_chart(&mut self, cache: &ResultCache) -> bool {
        self.state.chart_visible = !self.state.chart_visible;
        if self.state.chart_visible && self.chart.is_none() {
            debug!(target: "view", "Building chart from {} records", cache.len());
            self.chart = Some(CorrelationChart::from_cache(cache));
        }
        self.state.chart_visible
    }

    pub fn toggle_settings(&mut self) -> bool {
        self.state.settings_visible = !self.state.settings_visible;
        self.state.settings_visible
    }

    pub fn close_settings(&mut self) {
        self.state.settings_visible = false;
    }

    /// Hide and drop the chart; its data belongs to the previous query
    pub fn invalidate_chart_for_new_query(&mut self) {
        if self.chart.take().is_some() || self.state.chart_visible {
            debug!(target: "view", "Chart invalidated by new query");
        }
        self.state.chart_visible = false;
    }

    /// Drop the chart after the cache grew, rebuilding it if it is on screen
    pub fn refresh_chart(&mut self, cache: &ResultCache) {
        self.chart = None;
        if self.state.chart_visible {
            self.chart = Some(CorrelationChart::from_cache(cache));
        }
    }

    /// Apply the settings panel.
    ///
    /// The mode takes effect immediately. Returns the order to send to the
    /// backend when it differs from the last known one. An edited order that
    /// is not a positive integer is reported and not sent.
    pub fn submit_settings(
        &mut self,
        settings: &mut Settings,
        form: &SettingsForm,
        now: Instant,
    ) -> Option<i64> {
        self.state.settings_visible = false;

        if settings.mode != form.mode {
            info!(target: "settings", "Ranking mode {} -> {}", settings.mode, form.mode);
            settings.mode = form.mode;
        }

        match form.parsed_order() {
            Some(order) if order != settings.svd_order => {
                info!(target: "settings", "Requesting ranking order {} (was {})", order, settings.svd_order);
                Some(order)
            }
            Some(_) => None,
            None if form.order.trim() == settings.svd_order.to_string() => None,
            None => {
                self.notify(
                    format!("Ranking order must be a positive integer, got '{}'", form.order.trim()),
                    now,
                );
                None
            }
        }
    }

    /// Outcome of an order change requested through [`Self::submit_settings`]
    pub fn apply_order_update(
        &mut self,
        settings: &mut Settings,
        order: i64,
        result: Result<OrderUpdate, SearchError>,
        now: Instant,
    ) {
        match result {
            Ok(update) => {
                settings.svd_order = order;
                if !update.computed {
                    self.notify(
                        format!("Ranking order {order} is being computed, this may take a while"),
                        now,
                    );
                }
            }
            Err(err) => {
                warn!(target: "settings", "Order update to {} failed: {}", order, err);
                self.notify(format!("Could not change ranking order to {order}"), now);
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>, now: Instant) {
        let message = message.into();
        info!(target: "view", "Notification: {}", message);
        self.notifications.push(Notification {
            message,
            expires_at: now + self.notification_lifetime,
        });
    }

    /// Drop expired notifications
    pub fn prune_notifications(&mut self, now: Instant) {
        self.notifications.retain(|n| n.expires_at > now);
    }

    /// Newest notification still on screen
    pub fn active_notification(&self, now: Instant) -> Option<&Notification> {
        self.notifications.iter().rev().find(|n| n.expires_at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{RankingMode, ResultRecord};

    fn cache_with(query: &str, count: usize) -> ResultCache {
        let mut cache = ResultCache::new();
        cache.reset(query);
        let records = (0..count)
            .map(|i| ResultRecord {
                link: format!("https://{query}.org/{i}"),
                title: format!("{query} {i}"),
                snippet: String::new(),
                correlation: 0.5,
            })
            .collect();
        cache.append(records, count);
        cache
    }

    #[test]
    fn test_enter_results_is_idempotent() {
        let mut view = ViewCoordinator::default();
        assert!(view.enter_results_view());
        assert!(!view.enter_results_view());
        assert_eq!(view.state().location, Location::Results);
    }

    #[test]
    fn test_chart_is_built_lazily_and_reused() {
        let mut view = ViewCoordinator::default();
        let cache = cache_with("ocean", 10);
        assert!(view.chart().is_none());

        assert!(view.toggle_chart(&cache));
        assert_eq!(view.chart().map(|c| c.len()), Some(10));

        // Hiding keeps the derived chart, showing again does not rebuild
        let grown = cache_with("ocean", 20);
        assert!(!view.toggle_chart(&grown));
        assert!(view.toggle_chart(&grown));
        assert_eq!(view.chart().map(|c| c.len()), Some(10));
    }

    #[test]
    fn test_new_query_hides_and_drops_chart() {
        let mut view = ViewCoordinator::default();
        view.toggle_chart(&cache_with("cats", 10));
        view.invalidate_chart_for_new_query();
        assert!(!view.state().chart_visible);
        assert!(view.chart().is_none());

        view.toggle_chart(&cache_with("dogs", 5));
        assert_eq!(view.chart().map(|c| c.query()), Some("dogs"));
    }

    #[test]
    fn test_refresh_rebuilds_only_when_visible() {
        let mut view = ViewCoordinator::default();
        view.toggle_chart(&cache_with("ocean", 10));
        view.refresh_chart(&cache_with("ocean", 20));
        assert_eq!(view.chart().map(|c| c.len()), Some(20));

        view.toggle_chart(&cache_with("ocean", 20));
        view.refresh_chart(&cache_with("ocean", 30));
        assert!(view.chart().is_none());
    }

    #[test]
    fn test_settings_toggle_is_independent() {
        let mut view = ViewCoordinator::default();
        assert!(view.toggle_settings());
        assert!(!view.state().chart_visible);
        assert!(!view.toggle_settings());
    }

    #[test]
    fn test_submit_settings_only_sends_changed_order() {
        let mut view = ViewCoordinator::default();
        let mut settings = Settings::default();
        settings.apply_loaded_order(150);
        view.toggle_settings();

        let now = Instant::now();
        let mut form = settings.form();
        form.mode = RankingMode::TermByDocument;
        assert_eq!(view.submit_settings(&mut settings, &form, now), None);
        assert_eq!(settings.mode, RankingMode::TermByDocument);
        assert!(!view.state().settings_visible);

        form.order = "200".to_string();
        assert_eq!(view.submit_settings(&mut settings, &form, now), Some(200));
        // Unchanged until the backend confirms
        assert_eq!(settings.svd_order, 150);
        assert!(view.active_notification(now).is_none());
    }

    #[test]
    fn test_rejected_order_is_reported() {
        let mut view = ViewCoordinator::default();
        let mut settings = Settings::default();
        let now = Instant::now();

        // Untouched unknown order is not an error
        let untouched = settings.form();
        assert_eq!(view.submit_settings(&mut settings, &untouched, now), None);
        assert!(view.active_notification(now).is_none());

        for bad in ["0", "", "-5"] {
            let mut form = settings.form();
            form.order = bad.to_string();
            assert_eq!(view.submit_settings(&mut settings, &form, now), None);
            let note = view.active_notification(now).unwrap();
            assert!(note.message.contains("positive integer"));
        }
        assert_eq!(settings.svd_order, crate::state::UNKNOWN_ORDER);
    }

    #[test]
    fn test_order_update_notifications() {
        let mut view = ViewCoordinator::new(Duration::from_secs(9));
        let mut settings = Settings::default();
        let now = Instant::now();

        view.apply_order_update(&mut settings, 200, Ok(OrderUpdate { computed: true }), now);
        assert_eq!(settings.svd_order, 200);
        assert!(view.active_notification(now).is_none());

        view.apply_order_update(&mut settings, 300, Ok(OrderUpdate { computed: false }), now);
        assert_eq!(settings.svd_order, 300);
        let note = view.active_notification(now).unwrap();
        assert!(note.message.contains("this may take a while"));

        view.apply_order_update(
            &mut settings,
            400,
            Err(SearchError::Status { status: 500, body: String::new() }),
            now,
        );
        assert_eq!(settings.svd_order, 300);
    }

    #[test]
    fn test_notifications_expire() {
        let mut view = ViewCoordinator::new(Duration::from_secs(9));
        let now = Instant::now();
        view.notify("hello", now);
        assert!(view.active_notification(now + Duration::from_secs(8)).is_some());
        assert!(view.active_notification(now + Duration::from_secs(9)).is_none());

        view.prune_notifications(now + Duration::from_secs(10));
        assert!(view.active_notification(now).is_none());
    }
}
