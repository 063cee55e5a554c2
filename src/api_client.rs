use crate::config::config::ServerConfig;
use crate::error::SearchError;
use crate::search::{OrderRequest, OrderResponse, OrderUpdate, RankingMode, SearchPayload};
use std::time::Duration;
use tracing::{debug, warn};

/// Remote side of the search interface
pub trait SearchBackend: Send + Sync {
    /// Fetch the batch of ranked results starting at `offset`
    fn search(
        &self,
        query: &str,
        offset: usize,
        mode: RankingMode,
    ) -> Result<SearchPayload, SearchError>;

    /// Current ranking order of the backend
    fn fetch_order(&self) -> Result<i64, SearchError>;

    /// Ask the backend to switch to a new ranking order
    fn update_order(&self, order: i64) -> Result<OrderUpdate, SearchError>;
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    search_path: String,
    settings_path: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(server: &ServerConfig) -> Result<Self, SearchError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(server.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: server.base_url.trim_end_matches('/').to_string(),
            search_path: server.search_path.clone(),
            settings_path: server.settings_path.clone(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    fn read_body(response: reqwest::blocking::Response) -> Result<String, SearchError> {
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            warn!(target: "api", "HTTP {} from backend: {}", status.as_u16(), body);
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

impl SearchBackend for ApiClient {
    fn search(
        &self,
        query: &str,
        offset: usize,
        mode: RankingMode,
    ) -> Result<SearchPayload, SearchError> {
        let url = self.url(&self.search_path);
        debug!(target: "api", "GET {} q='{}' offset={} mode={}", url, query, offset, mode);

        let offset = offset.to_string();
        let mode = mode.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[("q", query), ("offset", offset.as_str()), ("mode", mode.as_str())])
            .send()?;

        let body = Self::read_body(response)?;
        SearchPayload::from_body(&body)
    }

    fn fetch_order(&self) -> Result<i64, SearchError> {
        let url = self.url(&self.settings_path);
        debug!(target: "api", "GET {}", url);

        let body = Self::read_body(self.client.get(&url).send()?)?;
        let order: OrderResponse = serde_json::from_str(&body)?;
        Ok(order.k)
    }

    fn update_order(&self, order: i64) -> Result<OrderUpdate, SearchError> {
        let url = self.url(&self.settings_path);
        debug!(target: "api", "PUT {} order={}", url, order);

        let response = self
            .client
            .put(&url)
            .json(&OrderRequest { order })
            .send()?;

        let body = Self::read_body(response)?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_join_base_and_paths() {
        let server = ServerConfig {
            base_url: "http://localhost:8000/".to_string(),
            ..ServerConfig::default()
        };
        let client = ApiClient::new(&server).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/search"), "http://localhost:8000/search");
        assert_eq!(client.url("settings"), "http://localhost:8000/settings");
    }

    #[test]
    fn test_unreachable_backend_is_a_transport_error() {
        let server = ServerConfig {
            // Port 9 (discard) on localhost is closed in test environments
            base_url: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..ServerConfig::default()
        };
        let client = ApiClient::new(&server).unwrap();
        let err = client
            .search("ocean", 0, RankingMode::default())
            .unwrap_err();
        assert!(err.is_transport());
    }
}
