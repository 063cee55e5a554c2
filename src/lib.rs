pub mod api_client;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod pagination;
pub mod search;
pub mod services;
pub mod state;
pub mod ui;
pub mod utils;
