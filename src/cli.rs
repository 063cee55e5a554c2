use crate::config::Config;
use crate::search::RankingMode;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "searchvd")]
#[command(about = "Terminal client for a latent-semantic search backend", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Backend base URL, e.g. http://127.0.0.1:8000
    #[arg(long)]
    pub server: Option<String>,

    /// Ranking mode 0-3 for this session
    #[arg(long)]
    pub mode: Option<RankingMode>,

    /// Write a commented default config file and exit
    #[arg(long)]
    pub generate_config: bool,

    /// Query to run right away
    #[arg(trailing_var_arg = true)]
    pub query: Vec<String>,
}

impl Cli {
    /// Command-line values take precedence over the config file
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(server) = &self.server {
            config.server.base_url = server.clone();
        }
        if let Some(mode) = self.mode {
            config.behavior.default_mode = mode;
        }
    }

    pub fn initial_query(&self) -> Option<String> {
        let query = self.query.join(" ");
        let query = query.trim();
        (!query.is_empty()).then(|| query.to_string())
    }
}
