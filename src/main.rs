use anyhow::{Context, Result};
use clap::Parser;
use searchvd::api_client::ApiClient;
use searchvd::cli::Cli;
use searchvd::config::Config;
use searchvd::utils::logging::{init_tracing, log_file_path};
use std::sync::Arc;
use tracing::info;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Check for config file generation
    if cli.generate_config {
        let path = match &cli.config {
            Some(path) => path.clone(),
            None => Config::get_config_path()?,
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        std::fs::write(&path, Config::create_default_with_comments())
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Configuration file created at: {}", path.display());
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => Config::load().unwrap_or_else(|e| {
            eprintln!("Warning: could not load config ({e}), using defaults");
            Config::default()
        }),
    };
    cli.apply_overrides(&mut config);

    let log_buffer = init_tracing(&config.logging);
    if let Some(path) = log_file_path() {
        eprintln!("Logs are written to {}", path.display());
    }

    let client = ApiClient::new(&config.server).context("building HTTP client")?;
    info!(target: "system", "Using backend at {}", client.base_url());

    searchvd::ui::run_tui(config, Arc::new(client), log_buffer, cli.initial_query())
}
