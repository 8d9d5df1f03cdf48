//! Search tools exposed to tool-calling clients.
//!
//! This module lists the search tools with their JSON-schema parameters and
//! dispatches tool calls to a [`SearchProvider`].

use crate::models::{SearchResponse, ShoppingResponse};
use crate::search::SearchProvider;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

pub const GOOGLE_SEARCH: &str = "google_search";
pub const GOOGLE_SHOPPING: &str = "google_shopping";
pub const GOOGLE_TRENDS: &str = "google_trends";

/// Tool definition in function-calling format.
#[derive(Debug, Clone, Serialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDefinition,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

/// A tool invocation.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolCall {
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// Result of executing a tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub success: bool,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(message),
        }
    }
}

/// Defaults applied when a call omits optional arguments.
#[derive(Debug, Clone)]
pub struct ToolDefaults {
    pub location: String,
    pub language: String,
    pub num: u32,
    pub trends_date: String,
    pub trends_geo: String,
}

impl Default for ToolDefaults {
    fn default() -> Self {
        Self {
            location: "Morocco".to_string(),
            language: "fr".to_string(),
            num: 10,
            trends_date: "today 12-m".to_string(),
            trends_geo: "MA".to_string(),
        }
    }
}

/// Executes tool calls against a search provider.
pub struct ToolExecutor<'a, P: SearchProvider + ?Sized> {
    provider: &'a P,
    defaults: ToolDefaults,
}

impl<'a, P: SearchProvider + ?Sized> ToolExecutor<'a, P> {
    pub fn new(provider: &'a P, defaults: ToolDefaults) -> Self {
        Self { provider, defaults }
    }

    /// Execute a tool call and return the result.
    pub async fn execute(&self, call: &ToolCall) -> ToolResult {
        let args = &call.arguments;
        debug!("Executing tool: {} with args: {:?}", call.name, args);

        match call.name.as_str() {
            GOOGLE_SEARCH => self.google_search(args).await,
            GOOGLE_SHOPPING => self.google_shopping(args).await,
            GOOGLE_TRENDS => self.google_trends(args).await,
            _ => ToolResult::error(format!("Unknown tool: {}", call.name)),
        }
    }

    async fn google_search(&self, args: &Value) -> ToolResult {
        let query = match required_str(args, "query") {
            Ok(q) => q,
            Err(e) => return e,
        };
        let location = optional_str(args, "location", &self.defaults.location);
        let language = optional_str(args, "hl", &self.defaults.language);
        let num = match optional_num(args, self.defaults.num) {
            Ok(n) => n,
            Err(e) => return e,
        };

        match self.provider.search(&query, &location, num, &language).await {
            Ok(results) => to_output(&SearchResponse {
                query,
                location,
                total_results: results.len(),
                results,
            }),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    async fn google_shopping(&self, args: &Value) -> ToolResult {
        let query = match required_str(args, "query") {
            Ok(q) => q,
            Err(e) => return e,
        };
        let location = optional_str(args, "location", &self.defaults.location);
        let num = match optional_num(args, self.defaults.num) {
            Ok(n) => n,
            Err(e) => return e,
        };

        match self.provider.shopping(&query, &location, num).await {
            Ok(results) => to_output(&ShoppingResponse {
                query,
                total_results: results.len(),
                results,
            }),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }

    async fn google_trends(&self, args: &Value) -> ToolResult {
        let query = match required_str(args, "query") {
            Ok(q) => q,
            Err(e) => return e,
        };
        let date = optional_str(args, "date", &self.defaults.trends_date);
        let geo = optional_str(args, "geo", &self.defaults.trends_geo);

        match self.provider.trends(&query, &date, &geo).await {
            Ok(doc) => to_output(&doc),
            Err(e) => ToolResult::error(e.to_string()),
        }
    }
}

fn required_str(args: &Value, key: &str) -> Result<String, ToolResult> {
    match args.get(key).and_then(|v| v.as_str()) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(ToolResult::error(format!(
            "Missing required parameter: {}",
            key
        ))),
    }
}

fn optional_str(args: &Value, key: &str, default: &str) -> String {
    args.get(key)
        .and_then(|v| v.as_str())
        .unwrap_or(default)
        .to_string()
}

fn optional_num(args: &Value, default: u32) -> Result<u32, ToolResult> {
    match args.get("num") {
        None | Some(Value::Null) => Ok(default),
        Some(v) => match v.as_u64() {
            Some(n) if (1..=100).contains(&n) => Ok(n as u32),
            _ => Err(ToolResult::error(
                "Parameter num must be an integer between 1 and 100".to_string(),
            )),
        },
    }
}

fn to_output<T: Serialize>(value: &T) -> ToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(output) => ToolResult::success(output),
        Err(e) => ToolResult::error(format!("Failed to encode result: {}", e)),
    }
}

/// Get the search tool definitions.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: GOOGLE_SEARCH.to_string(),
                description: "Search Google for websites, pages, and content. Useful for SEO analysis and competitor research.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search query (e.g., 'impression en ligne maroc')"
                        },
                        "location": {
                            "type": "string",
                            "description": "Location for localized results (default: 'Morocco')",
                            "default": "Morocco"
                        },
                        "num": {
                            "type": "integer",
                            "description": "Number of results to return (default: 10)",
                            "default": 10
                        },
                        "hl": {
                            "type": "string",
                            "description": "Language code (default: 'fr')",
                            "default": "fr"
                        }
                    },
                    "required": ["query"]
                }),
            },
        },
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: GOOGLE_SHOPPING.to_string(),
                description: "Search Google Shopping for products and pricing. Useful for competitive pricing analysis.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Product search query"
                        },
                        "location": {
                            "type": "string",
                            "description": "Location (default: 'Morocco')",
                            "default": "Morocco"
                        },
                        "num": {
                            "type": "integer",
                            "description": "Number of results (default: 10)",
                            "default": 10
                        }
                    },
                    "required": ["query"]
                }),
            },
        },
        ToolDefinition {
            tool_type: "function".to_string(),
            function: FunctionDefinition {
                name: GOOGLE_TRENDS.to_string(),
                description: "Get Google Trends data for search terms. Useful for keyword research and trend analysis.".to_string(),
                parameters: json!({
                    "type": "object",
                    "properties": {
                        "query": {
                            "type": "string",
                            "description": "Search term to analyze trends"
                        },
                        "date": {
                            "type": "string",
                            "description": "Date range (e.g., 'today 12-m', 'today 3-m')",
                            "default": "today 12-m"
                        },
                        "geo": {
                            "type": "string",
                            "description": "Geographic location code (default: 'MA')",
                            "default": "MA"
                        }
                    },
                    "required": ["query"]
                }),
            },
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SearchResult, ShoppingResult};
    use crate::search::{Result, SearchError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the arguments it was called with.
    #[derive(Default)]
    struct RecordingProvider {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl SearchProvider for RecordingProvider {
        async fn search(
            &self,
            query: &str,
            location: &str,
            num: u32,
            language: &str,
        ) -> Result<Vec<SearchResult>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("search|{}|{}|{}|{}", query, location, num, language));
            Ok(vec![
                SearchResult::new(1, "a.ma", "A"),
                SearchResult::new(2, "b.ma", "B"),
            ])
        }

        async fn shopping(&self, query: &str, location: &str, num: u32) -> Result<Vec<ShoppingResult>> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("shopping|{}|{}|{}", query, location, num));
            Ok(vec![ShoppingResult {
                position: 1,
                title: "Stylo".to_string(),
                link: "https://s.ma".to_string(),
                price: "10 MAD".to_string(),
                source: "s.ma".to_string(),
                rating: None,
                reviews: None,
            }])
        }

        async fn trends(&self, query: &str, _date: &str, geo: &str) -> Result<Value> {
            if query == "fail" {
                return Err(SearchError::Network("down".to_string()));
            }
            Ok(json!({"query": query, "geo": geo}))
        }
    }

    fn call(name: &str, arguments: Value) -> ToolCall {
        ToolCall {
            name: name.to_string(),
            arguments,
        }
    }

    #[test]
    fn test_tool_definitions() {
        let tools = get_tool_definitions();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.function.name.as_str()).collect();
        assert_eq!(names, vec![GOOGLE_SEARCH, GOOGLE_SHOPPING, GOOGLE_TRENDS]);
        for tool in &tools {
            assert_eq!(tool.function.parameters["required"], json!(["query"]));
        }
    }

    #[test]
    fn test_google_search_applies_defaults() {
        let provider = RecordingProvider::default();
        let executor = ToolExecutor::new(&provider, ToolDefaults::default());

        let result = tokio_test::block_on(
            executor.execute(&call(GOOGLE_SEARCH, json!({"query": "goodies maroc"}))),
        );

        assert!(result.success);
        let output: Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(output["query"], "goodies maroc");
        assert_eq!(output["location"], "Morocco");
        assert_eq!(output["total_results"], 2);
        assert_eq!(output["results"][1]["domain"], "b.ma");
        assert_eq!(
            provider.calls.lock().unwrap()[0],
            "search|goodies maroc|Morocco|10|fr"
        );
    }

    #[test]
    fn test_google_shopping_overrides() {
        let provider = RecordingProvider::default();
        let executor = ToolExecutor::new(&provider, ToolDefaults::default());

        let result = tokio_test::block_on(executor.execute(&call(
            GOOGLE_SHOPPING,
            json!({"query": "stylo", "location": "France", "num": 3}),
        )));

        assert!(result.success);
        assert!(result.output.contains("\"price\": \"10 MAD\""));
        assert_eq!(provider.calls.lock().unwrap()[0], "shopping|stylo|France|3");
    }

    #[test]
    fn test_google_trends_passthrough_and_error() {
        let provider = RecordingProvider::default();
        let executor = ToolExecutor::new(&provider, ToolDefaults::default());

        let ok = tokio_test::block_on(executor.execute(&call(GOOGLE_TRENDS, json!({"query": "mug"}))));
        assert!(ok.success);
        assert!(ok.output.contains("\"geo\": \"MA\""));

        let failed =
            tokio_test::block_on(executor.execute(&call(GOOGLE_TRENDS, json!({"query": "fail"}))));
        assert!(!failed.success);
        assert!(failed.error.unwrap().contains("down"));
    }

    #[test]
    fn test_invalid_calls() {
        let provider = RecordingProvider::default();
        let executor = ToolExecutor::new(&provider, ToolDefaults::default());

        let unknown = tokio_test::block_on(executor.execute(&call("bing", json!({}))));
        assert_eq!(unknown.error.as_deref(), Some("Unknown tool: bing"));

        let missing = tokio_test::block_on(executor.execute(&call(GOOGLE_SEARCH, json!({}))));
        assert_eq!(
            missing.error.as_deref(),
            Some("Missing required parameter: query")
        );

        let bad_num = tokio_test::block_on(
            executor.execute(&call(GOOGLE_SEARCH, json!({"query": "x", "num": 0}))),
        );
        assert!(!bad_num.success);
        assert!(provider.calls.lock().unwrap().is_empty());
    }
}
