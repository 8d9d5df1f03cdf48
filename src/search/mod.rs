//! SerpApi search client and response handling.

pub mod client;
pub mod domain;
pub mod error;
pub mod parse;

pub use client::{SearchSettings, SerpApiClient};
pub use error::{Result, SearchError};

use crate::models::{SearchResult, ShoppingResult};
use async_trait::async_trait;
use serde_json::Value;

/// Source of search results for the keyword sweep and the tool dispatcher.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Organic results for one query, ranked 1-based.
    async fn search(
        &self,
        query: &str,
        location: &str,
        num: u32,
        language: &str,
    ) -> Result<Vec<SearchResult>>;

    /// Google Shopping results for one query.
    async fn shopping(&self, query: &str, location: &str, num: u32) -> Result<Vec<ShoppingResult>>;

    /// Raw Google Trends document.
    async fn trends(&self, query: &str, date: &str, geo: &str) -> Result<Value>;
}
