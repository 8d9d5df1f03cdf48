//! Data models for serprank.
//!
//! This module contains the search result types produced by the SerpApi
//! client and the report structures built from the aggregated rankings.

use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// A single organic result for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// 1-based rank within the keyword's result set.
    pub position: u32,
    /// Result title.
    pub title: String,
    /// Full result URL.
    pub link: String,
    /// Hostname extracted from `link` (empty when the link has none).
    pub domain: String,
    /// Result snippet.
    pub snippet: String,
    /// Link as displayed by the search engine.
    pub displayed_link: String,
}

impl SearchResult {
    /// Minimal constructor used when only ranking data matters.
    #[allow(dead_code)] // Used by tests and fake providers
    pub fn new(position: u32, domain: &str, title: &str) -> Self {
        Self {
            position,
            title: title.to_string(),
            link: format!("https://{}/", domain),
            domain: domain.to_string(),
            snippet: String::new(),
            displayed_link: String::new(),
        }
    }
}

/// A single Google Shopping result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShoppingResult {
    pub position: u32,
    pub title: String,
    pub link: String,
    pub price: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviews: Option<u64>,
}

/// Organic search response as handed to tool callers.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub location: String,
    pub total_results: usize,
    pub results: Vec<SearchResult>,
}

/// Shopping response as handed to tool callers.
#[derive(Debug, Clone, Serialize)]
pub struct ShoppingResponse {
    pub query: String,
    pub total_results: usize,
    pub results: Vec<ShoppingResult>,
}

/// One row of the global competitor leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorRanking {
    /// 1-based rank in the leaderboard.
    pub rank: usize,
    pub domain: String,
    /// Number of distinct keywords the domain appeared for.
    pub appearances: usize,
    /// Mean of every position the domain was seen at.
    pub avg_position: f64,
    /// Keywords that produced an appearance, in recording order.
    pub keywords: Vec<String>,
}

/// A domain and its appearance count inside one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub domain: String,
    pub appearances: usize,
}

/// Top domains for one keyword category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryInsight {
    pub category: String,
    pub entries: Vec<CategoryEntry>,
}

/// Category insights, serialized as a JSON object keyed by category name
/// in configured order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryInsights(pub Vec<CategoryInsight>);

impl Serialize for CategoryInsights {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for insight in &self.0 {
            map.serialize_entry(&insight.category, &insight.entries)?;
        }
        map.end()
    }
}

/// Where the tracked domain ranks for one keyword.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TargetRanking {
    pub keyword: String,
    /// `None` when the domain is absent from the results.
    pub position: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Tracked competitors seen for this keyword, in result order.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<CompetitorHit>,
}

/// A tracked competitor's position for one keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompetitorHit {
    pub domain: String,
    pub position: u32,
}

/// Leaderboard entry as persisted (average rounded to one decimal).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompetitorEntry {
    pub rank: usize,
    pub domain: String,
    pub appearances: usize,
    pub avg_position: f64,
    pub keywords: Vec<String>,
}

impl From<&CompetitorRanking> for CompetitorEntry {
    fn from(ranking: &CompetitorRanking) -> Self {
        Self {
            rank: ranking.rank,
            domain: ranking.domain.clone(),
            appearances: ranking.appearances,
            avg_position: round_one_decimal(ranking.avg_position),
            keywords: ranking.keywords.clone(),
        }
    }
}

/// The persisted competitor report.
#[derive(Debug, Clone, Serialize)]
pub struct SeoReport {
    /// Report date, `YYYY-MM-DD`.
    pub date: String,
    /// Number of configured keywords.
    pub keywords_analyzed: usize,
    pub top_competitors: Vec<CompetitorEntry>,
    pub category_insights: CategoryInsights,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub target_rankings: Vec<TargetRanking>,
}

/// Run details shown in the Markdown report header.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub generated_at: DateTime<Utc>,
    pub location: String,
    pub language: String,
    pub results_per_keyword: u32,
    pub target_domain: Option<String>,
    pub duration_seconds: f64,
}

/// Round to one decimal place.
///
/// Formatting works on the exact binary value: true ties such as 2.25 go to
/// the even digit and 2.15 (stored just below) rounds down.
pub fn round_one_decimal(value: f64) -> f64 {
    format!("{:.1}", value).parse().unwrap_or(value)
}
