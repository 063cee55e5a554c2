//! Utility functions and helpers
//!
//! Application paths, logging setup and text helpers used by the views.

pub mod app_paths;
pub mod logging;
pub mod text;
