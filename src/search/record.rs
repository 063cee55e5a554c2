use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// A single ranked hit as returned by the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub link: String,
    pub title: String,
    pub snippet: String,
    /// Relevance in [0, 1]
    pub correlation: f64,
}

/// Ranking strategy the backend applies to a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum RankingMode {
    TermByDocument,
    TermByDocumentIdf,
    LowRank,
    #[default]
    LowRankIdf,
}

impl RankingMode {
    pub const ALL: [RankingMode; 4] = [
        RankingMode::TermByDocument,
        RankingMode::TermByDocumentIdf,
        RankingMode::LowRank,
        RankingMode::LowRankIdf,
    ];

    pub fn id(self) -> u8 {
        match self {
            RankingMode::TermByDocument => 0,
            RankingMode::TermByDocumentIdf => 1,
            RankingMode::LowRank => 2,
            RankingMode::LowRankIdf => 3,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    pub fn label(self) -> &'static str {
        match self {
            RankingMode::TermByDocument => "term-by-document",
            RankingMode::TermByDocumentIdf => "term-by-document + IDF",
            RankingMode::LowRank => "low-rank (SVD)",
            RankingMode::LowRankIdf => "low-rank (SVD) + IDF",
        }
    }

    /// Cycle forward, wrapping after the last mode
    pub fn next(self) -> Self {
        Self::ALL[(self.id() as usize + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.id() as usize + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl TryFrom<u8> for RankingMode {
    type Error = String;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        RankingMode::from_id(id).ok_or_else(|| format!("mode has to be in range [0, 3], got {id}"))
    }
}

impl From<RankingMode> for u8 {
    fn from(mode: RankingMode) -> Self {
        mode.id()
    }
}

impl FromStr for RankingMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let id: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("mode must be a number in [0, 3], got '{s}'"))?;
        RankingMode::try_from(id)
    }
}

impl fmt::Display for RankingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

/// Body of a successful search response.
///
/// The four sequences are parallel: index `i` of each describes the same hit.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchPayload {
    pub results_count: usize,
    pub links: Vec<String>,
    pub titles: Vec<String>,
    pub contents: Vec<String>,
    pub correlations: Vec<f64>,
    pub time: f64,
}

impl SearchPayload {
    /// Decode a raw response body.
    ///
    /// The backend serialises the payload to a JSON string and then encodes
    /// that string again, so the body is usually a quoted JSON document.
    pub fn from_body(body: &str) -> Result<Self, SearchError> {
        let outer: Value = serde_json::from_str(body)?;
        let payload: SearchPayload = match outer {
            Value::String(inner) => serde_json::from_str(&inner)?,
            Value::Object(_) => serde_json::from_value(outer)?,
            other => {
                return Err(SearchError::Malformed(format!(
                    "expected a JSON object or string, got {}",
                    json_kind(&other)
                )))
            }
        };
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<(), SearchError> {
        let len = self.links.len();
        if self.titles.len() != len || self.contents.len() != len || self.correlations.len() != len
        {
            return Err(SearchError::Malformed(format!(
                "parallel sequences differ in length: links={}, titles={}, contents={}, correlations={}",
                len,
                self.titles.len(),
                self.contents.len(),
                self.correlations.len()
            )));
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Result-count line shown above the list
    pub fn summary_line(&self) -> String {
        format!("About {} results ({} seconds)", self.results_count, self.time)
    }

    /// Zip the parallel sequences into records, preserving rank order
    pub fn into_records(self) -> Vec<ResultRecord> {
        self.links
            .into_iter()
            .zip(self.titles)
            .zip(self.contents)
            .zip(self.correlations)
            .map(|(((link, title), snippet), correlation)| ResultRecord {
                link,
                title,
                snippet,
                correlation,
            })
            .collect()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Response of `GET <settings-endpoint>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderResponse {
    pub k: i64,
}

/// Response of `PUT <settings-endpoint>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct OrderUpdate {
    /// False when the backend has to build the new decomposition asynchronously
    pub computed: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OrderRequest {
    pub order: i64,
}
