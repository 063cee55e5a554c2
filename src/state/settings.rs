use crate::config::Config;
use crate::search::RankingMode;
use tracing::{debug, info};

/// Order shown while the backend's ranking order is not known
pub const UNKNOWN_ORDER: i64 = -1;

/// Session-wide ranking settings, independent of any query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub mode: RankingMode,
    pub svd_order: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            mode: RankingMode::default(),
            svd_order: UNKNOWN_ORDER,
        }
    }
}

impl Settings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.behavior.default_mode,
            svd_order: UNKNOWN_ORDER,
        }
    }

    pub fn order_known(&self) -> bool {
        self.svd_order != UNKNOWN_ORDER
    }

    /// Record the order read from the backend at startup
    pub fn apply_loaded_order(&mut self, order: i64) {
        info!(target: "settings", "Backend ranking order is {}", order);
        self.svd_order = order;
    }

    /// Values edited in the settings panel, seeded from the current settings
    pub fn form(&self) -> SettingsForm {
        SettingsForm::from(*self)
    }
}

/// Editable copy of [`Settings`] backing the settings panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub mode: RankingMode,
    /// Raw text of the order field
    pub order: String,
}

impl From<Settings> for SettingsForm {
    fn from(settings: Settings) -> Self {
        Self {
            mode: settings.mode,
            order: settings.svd_order.to_string(),
        }
    }
}

impl SettingsForm {
    /// Parsed order, `None` if the field is not a positive integer
    pub fn parsed_order(&self) -> Option<i64> {
        match self.order.trim().parse::<i64>() {
            Ok(order) if order > 0 => Some(order),
            _ => {
                debug!(target: "settings", "Ignoring order field '{}'", self.order);
                None
            }
        }
    }

    pub fn push_digit(&mut self, c: char) {
        if c.is_ascii_digit() {
            if self.order == UNKNOWN_ORDER.to_string() {
                self.order.clear();
            }
            self.order.push(c);
        }
    }

    pub fn pop_digit(&mut self) {
        self.order.pop();
    }
}
