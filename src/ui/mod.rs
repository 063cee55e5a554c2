pub mod app;
pub mod widgets;

pub use app::{run_tui, SearchTui};
