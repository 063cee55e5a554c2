pub mod chart_widget;
pub mod page_nav_widget;
pub mod results_widget;
pub mod settings_widget;

pub use chart_widget::render_chart;
pub use page_nav_widget::PageNavWidget;
pub use results_widget::ResultsWidget;
pub use settings_widget::{render_settings, SettingsField};
