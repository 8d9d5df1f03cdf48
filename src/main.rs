//! serprank - competitor frequency reports from SerpApi
//!
//! A CLI tool that searches a business's keyword set through SerpApi and
//! ranks the competing domains by how often, and how high, they appear.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing API key, bad config, unwritable report, etc.)

mod analysis;
mod cli;
mod config;
mod models;
mod report;
mod search;
mod tools;

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use cli::{join_query, Args, Command, OutputFormat};
use config::Config;
use models::RunMetadata;
use search::{SearchProvider, SerpApiClient};
use std::path::Path;
use std::time::Instant;
use tools::{ToolCall, ToolDefaults, ToolExecutor};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("serprank v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", redacted(&args));

    match run(args).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .serprank.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to set your keyword categories, location and target domain.");
    Ok(())
}

/// Initialize logging. RUST_LOG wins over the verbosity flags when set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_level().as_str().to_lowercase()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Args with the API key masked, for debug logging.
fn redacted(args: &Args) -> Args {
    let mut args = args.clone();
    if args.api_key.is_some() {
        args.api_key = Some("***".to_string());
    }
    args
}

/// Load configuration from file or use defaults.
///
/// A config file that exists but does not parse is an error, not a reason
/// to fall back to the built-in keywords.
fn load_config(args: &Args, dir: &Path) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_from_dir(dir)? {
        Some(config) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        None => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

async fn run(args: Args) -> Result<()> {
    let mut config = load_config(&args, Path::new("."))?;
    config.merge_with_args(&args);
    config.validate()?;

    let Some(command) = args.command.clone() else {
        anyhow::bail!("No command given");
    };

    // Listing tools needs no API access
    if let Command::Tools = command {
        let definitions = tools::get_tool_definitions();
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    let client = SerpApiClient::new(&config.search_settings())?;

    match command {
        Command::Report { .. } => run_report(&client, &config, args.quiet).await,
        Command::Search { query } => {
            let query = join_query(&query);
            let results = client
                .search(
                    &query,
                    &config.search.location,
                    config.search.num,
                    &config.search.language,
                )
                .await?;
            print!("{}", report::console::render_search_results(&query, &results));
            Ok(())
        }
        Command::Shopping { query } => {
            let arguments = serde_json::json!({ "query": join_query(&query) });
            run_tool(&client, &config, tools::GOOGLE_SHOPPING, arguments).await
        }
        Command::Trends { query, date, geo } => {
            let arguments = serde_json::json!({
                "query": join_query(&query),
                "date": date,
                "geo": geo,
            });
            run_tool(&client, &config, tools::GOOGLE_TRENDS, arguments).await
        }
        Command::Call { name, arguments } => {
            let arguments: serde_json::Value =
                serde_json::from_str(&arguments).context("Invalid --arguments JSON")?;
            run_tool(&client, &config, &name, arguments).await
        }
        Command::Tools => Ok(()),
    }
}

/// Dispatch one tool call and print its output.
async fn run_tool<P: SearchProvider + ?Sized>(
    provider: &P,
    config: &Config,
    name: &str,
    arguments: serde_json::Value,
) -> Result<()> {
    let defaults = ToolDefaults {
        location: config.search.location.clone(),
        language: config.search.language.clone(),
        num: config.search.num,
        ..ToolDefaults::default()
    };
    let executor = ToolExecutor::new(provider, defaults);

    let call = ToolCall {
        name: name.to_string(),
        arguments,
    };
    let result = executor.execute(&call).await;

    if result.success {
        println!("{}", result.output);
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "Tool {} failed: {}",
            name,
            result.error.unwrap_or_default()
        ))
    }
}

/// Run the full keyword sweep and write the report.
async fn run_report<P: SearchProvider + ?Sized>(
    provider: &P,
    config: &Config,
    quiet: bool,
) -> Result<()> {
    let start_time = Instant::now();

    if config.categories.is_empty() {
        warn!("No keyword categories configured; the report will be empty");
    }

    println!("🎯 Competitor report");
    println!("   Keywords: {}", config.keyword_count());
    println!("   Location: {}", config.search.location);
    println!("   Language: {}", config.search.language);
    if let Some(ref domain) = config.target.domain {
        println!("   Tracking: {}", domain);
    }
    if !config.target.competitors.is_empty() {
        println!("   Watching: {}", config.target.competitors.join(", "));
    }
    println!();

    let settings = analysis::SweepSettings {
        location: config.search.location.clone(),
        language: config.search.language.clone(),
        num: config.search.num,
        top_competitors: config.report.top_competitors,
        top_per_category: config.report.top_per_category,
        target_domain: config.target.domain.clone(),
        tracked_competitors: config.target.competitors.clone(),
        show_progress: !quiet,
    };

    let outcome = analysis::run_sweep(provider, &config.categories, &settings).await;

    if !quiet {
        print!("{}", report::console::render_keywords(&outcome.keywords));
    }
    print!("{}", report::console::render_summary(&outcome));

    let seo_report = report::build_report(&outcome, Local::now().date_naive());
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&seo_report)?,
        OutputFormat::Markdown => {
            let metadata = RunMetadata {
                generated_at: Utc::now(),
                location: config.search.location.clone(),
                language: config.search.language.clone(),
                results_per_keyword: config.search.num,
                target_domain: config.target.domain.clone(),
                duration_seconds: start_time.elapsed().as_secs_f64(),
            };
            report::generate_markdown_report(&seo_report, &metadata)
        }
    };

    let output_path = Path::new(&config.report.output);
    report::write_report(&output, output_path)?;

    let failed = outcome.failed_keywords();
    if failed > 0 {
        println!("\n⚠️  {} of {} searches failed", failed, outcome.keywords_analyzed);
    }
    println!(
        "\n📊 {} domains seen across {} keywords in {:.1}s",
        outcome.aggregator.domains().len(),
        outcome.aggregator.keywords_recorded(),
        start_time.elapsed().as_secs_f64()
    );
    println!("✅ Report saved to: {}", output_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_load_config_fails_on_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(config::CONFIG_FILE),
            "[search\nnum = ",
        )
        .unwrap();

        let args = Args::parse_from(["serprank", "report"]);
        let err = load_config(&args, temp_dir.path()).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn test_load_config_defaults_without_file() {
        let temp_dir = TempDir::new().unwrap();
        let args = Args::parse_from(["serprank", "report"]);

        let config = load_config(&args, temp_dir.path()).unwrap();
        assert_eq!(config.keyword_count(), 19);
    }

    #[test]
    fn test_load_config_reads_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(config::CONFIG_FILE),
            "[[categories]]\nname = \"Core\"\nkeywords = [\"mugs\"]\n",
        )
        .unwrap();

        let args = Args::parse_from(["serprank", "report"]);
        let config = load_config(&args, temp_dir.path()).unwrap();
        assert_eq!(config.keyword_count(), 1);
    }
}
