//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.serprank.toml` files.

use crate::cli::{Args, Command, OutputFormat};
use crate::search::SearchSettings;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".serprank.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Search API settings.
    #[serde(default)]
    pub search: SearchConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Own-domain rank tracking.
    #[serde(default)]
    pub target: TargetConfig,

    /// Keyword groups, processed in order.
    #[serde(default = "default_categories")]
    pub categories: Vec<KeywordCategory>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search: SearchConfig::default(),
            report: ReportConfig::default(),
            target: TargetConfig::default(),
            categories: default_categories(),
        }
    }
}

/// SerpApi settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// SerpApi endpoint.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// API key. Prefer the SERPAPI_API_KEY environment variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Location for localized results.
    #[serde(default = "default_location")]
    pub location: String,

    /// Interface language code (`hl`).
    #[serde(default = "default_language")]
    pub language: String,

    /// Results requested per keyword.
    #[serde(default = "default_num")]
    pub num: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Treat `www.example.com` and `example.com` as one competitor.
    #[serde(default)]
    pub strip_www: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            location: default_location(),
            language: default_language(),
            num: default_num(),
            timeout_seconds: default_timeout(),
            strip_www: false,
        }
    }
}

fn default_base_url() -> String {
    "https://serpapi.com/search.json".to_string()
}

fn default_location() -> String {
    "Morocco".to_string()
}

fn default_language() -> String {
    "fr".to_string()
}

fn default_num() -> u32 {
    10
}

fn default_timeout() -> u64 {
    60
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output file path.
    #[serde(default = "default_output")]
    pub output: String,

    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Size of the global leaderboard.
    #[serde(default = "default_top_competitors")]
    pub top_competitors: usize,

    /// Size of each category leaderboard.
    #[serde(default = "default_top_per_category")]
    pub top_per_category: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: OutputFormat::default(),
            top_competitors: default_top_competitors(),
            top_per_category: default_top_per_category(),
        }
    }
}

fn default_output() -> String {
    "serprank-report.json".to_string()
}

fn default_top_competitors() -> usize {
    crate::analysis::DEFAULT_TOP_COMPETITORS
}

fn default_top_per_category() -> usize {
    crate::analysis::DEFAULT_TOP_PER_CATEGORY
}

/// The business's own site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Domain to track, e.g. `arteva.ma`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    /// Competitor domains to locate in every keyword's results.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub competitors: Vec<String>,
}

/// A named group of related keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCategory {
    pub name: String,
    pub keywords: Vec<String>,
}

impl KeywordCategory {
    pub fn new(name: &str, keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

fn default_categories() -> Vec<KeywordCategory> {
    vec![
        KeywordCategory::new(
            "Génériques B2B",
            &[
                "objets publicitaires personnalisés maroc",
                "cadeaux d'entreprise personnalisés",
                "goodies entreprise maroc",
                "articles promotionnels maroc",
                "communication par l'objet maroc",
            ],
        ),
        KeywordCategory::new(
            "Catégories Produits",
            &[
                "stylos personnalisés entreprise",
                "bloc notes personnalisé entreprise",
                "carnets personnalisés logo",
                "chemises personnalisées entreprise",
                "fournitures bureau personnalisées",
            ],
        ),
        KeywordCategory::new(
            "Occasions B2B",
            &[
                "cadeaux fin d'année entreprise maroc",
                "cadeaux clients fidélité",
                "goodies événement entreprise",
                "kit bienvenue employé",
                "cadeaux séminaire entreprise",
            ],
        ),
        KeywordCategory::new(
            "Secteur & Services",
            &[
                "imprimerie corporate maroc",
                "fournisseur objets publicitaires maroc",
                "personnalisation produits entreprise",
                "impression logo entreprise",
            ],
        ),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load `.serprank.toml` from a directory.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings and only
    /// override when explicitly given.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref key) = args.api_key {
            self.search.api_key = Some(key.clone());
        }
        if let Some(ref location) = args.location {
            self.search.location = location.clone();
        }
        if let Some(ref language) = args.language {
            self.search.language = language.clone();
        }
        if let Some(num) = args.num {
            self.search.num = num;
        }
        if let Some(timeout) = args.timeout {
            self.search.timeout_seconds = timeout;
        }

        if let Some(Command::Report {
            ref output,
            format,
            ref target,
        }) = args.command
        {
            if let Some(output) = output {
                self.report.output = output.display().to_string();
            }
            if let Some(format) = format {
                self.report.format = format;
            }
            if let Some(target) = target {
                self.target.domain = Some(target.clone());
            }
        }
    }

    /// Check values that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.search.num == 0 || self.search.num > 100 {
            bail!("search.num must be between 1 and 100");
        }
        if self.search.timeout_seconds == 0 {
            bail!("search.timeout_seconds must be at least 1");
        }
        if !self.search.base_url.starts_with("http://")
            && !self.search.base_url.starts_with("https://")
        {
            bail!("search.base_url must start with 'http://' or 'https://'");
        }
        if self.report.top_competitors == 0 {
            bail!("report.top_competitors must be at least 1");
        }
        if self.report.top_per_category == 0 {
            bail!("report.top_per_category must be at least 1");
        }
        if self.target.competitors.iter().any(|c| c.trim().is_empty()) {
            bail!("target.competitors contains an empty domain");
        }
        for category in &self.categories {
            if category.name.trim().is_empty() {
                bail!("Keyword categories need a name");
            }
            if category.keywords.iter().any(|k| k.trim().is_empty()) {
                bail!("Category '{}' contains an empty keyword", category.name);
            }
        }
        Ok(())
    }

    /// Total number of configured keywords.
    pub fn keyword_count(&self) -> usize {
        self.categories.iter().map(|c| c.keywords.len()).sum()
    }

    /// Settings for the SerpApi client.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings {
            base_url: self.search.base_url.clone(),
            api_key: self.search.api_key.clone(),
            timeout_seconds: self.search.timeout_seconds,
            strip_www: self.search.strip_www,
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.search.location, "Morocco");
        assert_eq!(config.search.language, "fr");
        assert_eq!(config.search.num, 10);
        assert_eq!(config.report.top_competitors, 10);
        assert_eq!(config.report.top_per_category, 5);
        assert_eq!(config.categories.len(), 4);
        assert_eq!(config.keyword_count(), 19);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[search]
location = "Casablanca, Morocco"
num = 20
strip_www = true

[report]
output = "custom.json"
top_per_category = 3

[target]
domain = "arteva.ma"
competitors = ["publiimport.ma", "imagia.ma"]

[[categories]]
name = "Core"
keywords = ["goodies entreprise", "stylos personnalisés"]

[[categories]]
name = "Events"
keywords = ["kit bienvenue employé"]
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.search.location, "Casablanca, Morocco");
        assert_eq!(config.search.num, 20);
        assert!(config.search.strip_www);
        assert_eq!(config.search.language, "fr");
        assert_eq!(config.report.output, "custom.json");
        assert_eq!(config.report.top_per_category, 3);
        assert_eq!(config.report.top_competitors, 10);
        assert_eq!(config.target.domain.as_deref(), Some("arteva.ma"));
        assert_eq!(config.target.competitors, vec!["publiimport.ma", "imagia.ma"]);
        assert_eq!(config.categories.len(), 2);
        assert_eq!(config.categories[0].name, "Core");
        assert_eq!(config.keyword_count(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.search.num = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.report.top_competitors = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.categories = vec![KeywordCategory::new("Empty kw", &["ok", "  "])];
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.target.competitors = vec!["imagia.ma".to_string(), String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let args = Args::parse_from([
            "serprank",
            "--location",
            "France",
            "--num",
            "20",
            "report",
            "--output",
            "out.md",
            "--format",
            "markdown",
            "--target",
            "arteva.ma",
        ]);

        let mut config = Config::default();
        config.merge_with_args(&args);

        assert_eq!(config.search.location, "France");
        assert_eq!(config.search.num, 20);
        assert_eq!(config.search.language, "fr");
        assert_eq!(config.report.output, "out.md");
        assert_eq!(config.report.format, OutputFormat::Markdown);
        assert_eq!(config.target.domain.as_deref(), Some("arteva.ma"));
    }

    #[test]
    fn test_load_from_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).unwrap().is_none());

        std::fs::write(
            temp_dir.path().join(CONFIG_FILE),
            "[search]\nlanguage = \"en\"\n",
        )
        .unwrap();

        let config = Config::load_from_dir(temp_dir.path()).unwrap().unwrap();
        assert_eq!(config.search.language, "en");
        assert_eq!(config.categories.len(), 4);

        std::fs::write(temp_dir.path().join(CONFIG_FILE), "[search\n").unwrap();
        assert!(Config::load_from_dir(temp_dir.path()).is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[search]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[[categories]]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.keyword_count(), 19);
    }
}
