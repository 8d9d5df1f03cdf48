//! JSON and Markdown report generation.
//!
//! The JSON layout (`date`, `keywords_analyzed`, `top_competitors`,
//! `category_insights`) is kept stable for downstream consumers.

use crate::analysis::{summarize, SweepOutcome};
use crate::models::{
    CategoryInsights, CompetitorEntry, CompetitorHit, RunMetadata, SeoReport, TargetRanking,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::Path;

/// Build the persisted report from a finished sweep.
pub fn build_report(outcome: &SweepOutcome, date: NaiveDate) -> SeoReport {
    SeoReport {
        date: date.format("%Y-%m-%d").to_string(),
        keywords_analyzed: outcome.keywords_analyzed,
        top_competitors: outcome
            .top_competitors
            .iter()
            .map(CompetitorEntry::from)
            .collect(),
        category_insights: outcome.category_insights.clone(),
        target_rankings: outcome.target_rankings.clone(),
    }
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SeoReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SeoReport, metadata: &RunMetadata) -> String {
    let mut output = String::new();

    output.push_str("# Competitor Report\n\n");
    output.push_str(&generate_metadata_section(report, metadata));
    output.push_str(&generate_competitors_section(report));
    output.push_str(&generate_categories_section(&report.category_insights));
    if !report.target_rankings.is_empty() {
        output.push_str(&generate_target_section(
            metadata.target_domain.as_deref(),
            &report.target_rankings,
        ));
    }
    output.push_str("---\n\n*Report generated by serprank*\n");

    output
}

fn generate_metadata_section(report: &SeoReport, metadata: &RunMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Date:** {}\n", report.date));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Location:** {}\n", metadata.location));
    section.push_str(&format!("- **Language:** `{}`\n", metadata.language));
    section.push_str(&format!(
        "- **Results per Keyword:** {}\n",
        metadata.results_per_keyword
    ));
    section.push_str(&format!(
        "- **Keywords Analyzed:** {}\n",
        report.keywords_analyzed
    ));
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_competitors_section(report: &SeoReport) -> String {
    let mut section = String::new();

    section.push_str("## Top Competitors\n\n");

    if report.top_competitors.is_empty() {
        section.push_str("No competitors found.\n\n");
        return section;
    }

    section.push_str("| # | Domain | Appearances | Avg. Position | Keywords |\n");
    section.push_str("|:---:|:---|:---:|:---:|:---|\n");

    for entry in &report.top_competitors {
        section.push_str(&format!(
            "| {} | `{}` | {}/{} | {:.1} | {} |\n",
            entry.rank,
            entry.domain,
            entry.appearances,
            report.keywords_analyzed,
            entry.avg_position,
            keyword_preview(&entry.keywords)
        ));
    }
    section.push('\n');

    section
}

fn generate_categories_section(insights: &CategoryInsights) -> String {
    if insights.0.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("## Competitors by Category\n\n");

    for insight in &insights.0 {
        section.push_str(&format!("### {}\n\n", insight.category));

        if insight.entries.is_empty() {
            section.push_str("No results.\n\n");
            continue;
        }

        section.push_str("| Domain | Appearances |\n");
        section.push_str("|:---|:---:|\n");
        for entry in &insight.entries {
            section.push_str(&format!("| `{}` | {} |\n", entry.domain, entry.appearances));
        }
        section.push('\n');
    }

    section
}

fn generate_target_section(domain: Option<&str>, rankings: &[TargetRanking]) -> String {
    let mut section = String::new();

    match domain {
        Some(domain) => {
            let summary = summarize(rankings);
            section.push_str(&format!("## Rankings for `{}`\n\n", domain));
            section.push_str(&format!(
                "Ranking for {}/{} keywords",
                summary.keywords_ranking, summary.keywords_tracked
            ));
            match summary.avg_position {
                Some(avg) => section.push_str(&format!(", average position {:.1}.\n\n", avg)),
                None => section.push_str(".\n\n"),
            }
        }
        None => section.push_str("## Tracked Competitors\n\n"),
    }

    section.push_str("| Keyword | Position | Tracked Competitors |\n");
    section.push_str("|:---|:---:|:---|\n");
    for ranking in rankings {
        let position = match (domain, ranking.position) {
            (None, _) => "-".to_string(),
            (Some(_), Some(p)) => format!("#{}", p),
            (Some(_), None) => "Not found".to_string(),
        };
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            ranking.keyword,
            position,
            competitor_hits(&ranking.competitors)
        ));
    }
    section.push('\n');

    section
}

/// `domain #pos` pairs, or `-` when nothing was seen.
pub fn competitor_hits(hits: &[CompetitorHit]) -> String {
    if hits.is_empty() {
        return "-".to_string();
    }
    hits.iter()
        .map(|hit| format!("{} #{}", hit.domain, hit.position))
        .collect::<Vec<_>>()
        .join(", ")
}

/// First three keywords, with `...` when more exist.
pub fn keyword_preview(keywords: &[String]) -> String {
    let shown = keywords
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    if keywords.len() > 3 {
        format!("{}...", shown)
    } else {
        shown
    }
}

/// Write report content to a file.
pub fn write_report(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}
