//! HTTP client for the SerpApi REST endpoint.

use super::error::{Result, SearchError};
use super::parse::{check_api_error, parse_organic, parse_shopping};
use super::SearchProvider;
use crate::models::{SearchResult, ShoppingResult};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

/// Settings needed to talk to SerpApi.
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
    /// Drop a leading `www.` from extracted domains.
    pub strip_www: bool,
}

/// SerpApi client. One request per call, no retries.
pub struct SerpApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    strip_www: bool,
}

impl SerpApiClient {
    /// Create a client; fails without an API key.
    pub fn new(settings: &SearchSettings) -> Result<Self> {
        let api_key = settings
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or(SearchError::MissingApiKey)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_seconds))
            .build()?;

        info!("SerpApi client ready ({})", settings.base_url);

        Ok(Self {
            http,
            base_url: settings.base_url.clone(),
            api_key,
            strip_www: settings.strip_www,
        })
    }

    /// Issue one GET with the given parameters and return the JSON body.
    async fn fetch(&self, params: &[(&str, String)]) -> Result<Value> {
        debug!("SerpApi request: {:?}", params);

        let resp = self
            .http
            .get(&self.base_url)
            .query(params)
            .query(&[("api_key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        let body: Value = match serde_json::from_str(&text) {
            Ok(body) => body,
            Err(e) if status.is_success() => return Err(e.into()),
            Err(_) => {
                return Err(SearchError::Api {
                    status: status.as_u16(),
                    message: text,
                })
            }
        };

        check_api_error(&body, status.as_u16())?;

        if !status.is_success() {
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: text,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(
        &self,
        query: &str,
        location: &str,
        num: u32,
        language: &str,
    ) -> Result<Vec<SearchResult>> {
        let body = self
            .fetch(&[
                ("q", query.to_string()),
                ("location", location.to_string()),
                ("num", num.to_string()),
                ("hl", language.to_string()),
            ])
            .await?;

        let results = parse_organic(&body, num as usize, self.strip_www);
        debug!("'{}': {} organic results", query, results.len());
        Ok(results)
    }

    async fn shopping(&self, query: &str, location: &str, num: u32) -> Result<Vec<ShoppingResult>> {
        let body = self
            .fetch(&[
                ("q", query.to_string()),
                ("location", location.to_string()),
                ("num", num.to_string()),
                ("engine", "google_shopping".to_string()),
            ])
            .await?;

        Ok(parse_shopping(&body, num as usize))
    }

    async fn trends(&self, query: &str, date: &str, geo: &str) -> Result<Value> {
        self.fetch(&[
            ("q", query.to_string()),
            ("date", date.to_string()),
            ("geo", geo.to_string()),
            ("engine", "google_trends".to_string()),
        ])
        .await
    }
}
