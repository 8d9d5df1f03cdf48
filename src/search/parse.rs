//! SerpApi response parsing.
//!
//! Responses are walked as `serde_json::Value` so one malformed entry
//! never fails the whole batch.

use super::domain::{extract_domain, strip_www};
use super::error::{Result, SearchError};
use crate::models::{SearchResult, ShoppingResult};
use serde_json::Value;
use tracing::debug;

/// Fail if the body carries a top-level `"error"` message.
pub fn check_api_error(body: &Value, status: u16) -> Result<()> {
    match body.get("error").and_then(|v| v.as_str()) {
        Some(message) => Err(SearchError::Api {
            status,
            message: message.to_string(),
        }),
        None => Ok(()),
    }
}

fn str_field(entry: &Value, key: &str) -> String {
    entry
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Parse `organic_results`, keeping at most `num` entries.
///
/// Positions are assigned 1-based in response order; an entry that is not
/// an object is skipped but still consumes its position.
pub fn parse_organic(body: &Value, num: usize, normalize_www: bool) -> Vec<SearchResult> {
    let Some(entries) = body.get("organic_results").and_then(|v| v.as_array()) else {
        debug!("Response has no organic_results");
        return Vec::new();
    };

    entries
        .iter()
        .take(num)
        .enumerate()
        .filter_map(|(idx, entry)| {
            if !entry.is_object() {
                debug!("Skipping malformed organic entry at {}", idx + 1);
                return None;
            }

            let link = str_field(entry, "link");
            let mut domain = extract_domain(&link);
            if normalize_www {
                domain = strip_www(&domain).to_string();
            }

            Some(SearchResult {
                position: idx as u32 + 1,
                title: str_field(entry, "title"),
                domain,
                link,
                snippet: str_field(entry, "snippet"),
                displayed_link: str_field(entry, "displayed_link"),
            })
        })
        .collect()
}

/// Parse `shopping_results`, keeping at most `num` entries.
pub fn parse_shopping(body: &Value, num: usize) -> Vec<ShoppingResult> {
    let Some(entries) = body.get("shopping_results").and_then(|v| v.as_array()) else {
        debug!("Response has no shopping_results");
        return Vec::new();
    };

    entries
        .iter()
        .take(num)
        .enumerate()
        .filter(|(_, entry)| entry.is_object())
        .map(|(idx, entry)| {
            let price = match entry.get("price") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            };

            ShoppingResult {
                position: idx as u32 + 1,
                title: str_field(entry, "title"),
                link: str_field(entry, "link"),
                price,
                source: str_field(entry, "source"),
                rating: entry.get("rating").and_then(|v| v.as_f64()),
                reviews: entry.get("reviews").and_then(|v| v.as_u64()),
            }
        })
        .collect()
}
