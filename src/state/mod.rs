pub mod chart;
pub mod results_pane;
pub mod settings;
pub mod view_coordinator;

pub use chart::CorrelationChart;
pub use results_pane::ResultsPane;
pub use settings::{Settings, SettingsForm, UNKNOWN_ORDER};
pub use view_coordinator::{Location, Notification, ViewCoordinator, ViewState};
