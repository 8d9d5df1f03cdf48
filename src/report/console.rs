//! Console rendering of sweep results and single searches.

use super::generator::{competitor_hits, keyword_preview};
use crate::analysis::{summarize, KeywordOutcome, SweepOutcome};
use crate::models::SearchResult;

const RULE_WIDTH: usize = 80;

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}

/// Per-keyword top results, grouped under their category.
pub fn render_keywords(keywords: &[KeywordOutcome]) -> String {
    let mut out = String::new();
    let mut current_category: Option<&str> = None;

    for outcome in keywords {
        if current_category != Some(outcome.category.as_str()) {
            out.push_str(&format!("\n📊 {}\n{}\n", outcome.category, "-".repeat(RULE_WIDTH)));
            current_category = Some(outcome.category.as_str());
        }

        out.push_str(&format!("\n🔍 {}\n", outcome.keyword));

        if let Some(ref error) = outcome.error {
            out.push_str(&format!("   ⚠️  Search failed: {}\n", error));
            continue;
        }
        if outcome.preview.is_empty() {
            out.push_str("   ⚠️  No results\n");
            continue;
        }

        out.push_str("   Top 3:\n");
        for (i, result) in outcome.preview.iter().enumerate() {
            out.push_str(&format!(
                "   #{} {}: {}\n",
                i + 1,
                result.domain,
                truncate(&result.title, 60)
            ));
        }
    }

    out
}

/// Category leaderboards and the global leaderboard.
pub fn render_summary(outcome: &SweepOutcome) -> String {
    let mut out = String::new();

    for insight in &outcome.category_insights.0 {
        out.push_str(&format!("\n🏆 Top competitors - {}:\n", insight.category));
        if insight.entries.is_empty() {
            out.push_str("   (none)\n");
        }
        for entry in &insight.entries {
            out.push_str(&format!(
                "   {}: {} appearances\n",
                entry.domain, entry.appearances
            ));
        }
    }

    out.push_str(&format!("\n{}\n", "=".repeat(RULE_WIDTH)));
    out.push_str(&format!(
        "🥇 TOP {} COMPETITORS (by appearance frequency)\n",
        outcome.top_competitors.len()
    ));
    out.push_str(&format!("{}\n\n", "=".repeat(RULE_WIDTH)));

    if outcome.top_competitors.is_empty() {
        out.push_str("No competitors found.\n");
    }

    for ranking in &outcome.top_competitors {
        out.push_str(&format!("{}. {}\n", ranking.rank, ranking.domain));
        out.push_str(&format!(
            "   - Appearances: {}/{} searches\n",
            ranking.appearances, outcome.keywords_analyzed
        ));
        out.push_str(&format!("   - Average position: {:.1}\n", ranking.avg_position));
        out.push_str(&format!(
            "   - Keywords: {}\n\n",
            keyword_preview(&ranking.keywords)
        ));
    }

    if outcome.target_domain.is_some() {
        let summary = summarize(&outcome.target_rankings);
        out.push_str(&format!(
            "🎯 Own domain ranks for {}/{} keywords",
            summary.keywords_ranking, summary.keywords_tracked
        ));
        match summary.avg_position {
            Some(avg) => out.push_str(&format!(" (average position {:.1})\n", avg)),
            None => out.push('\n'),
        }
    }

    let watched: Vec<_> = outcome
        .target_rankings
        .iter()
        .filter(|r| !r.competitors.is_empty())
        .collect();
    if !watched.is_empty() {
        out.push_str("👀 Tracked competitors:\n");
        for ranking in watched {
            out.push_str(&format!(
                "   {}: {}\n",
                ranking.keyword,
                competitor_hits(&ranking.competitors)
            ));
        }
    }

    out
}

/// A single query's organic results.
pub fn render_search_results(query: &str, results: &[SearchResult]) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n🔍 Analyzing competitors for: {}\n\n", query));
    out.push_str(&format!("Total results: {}\n\n", results.len()));
    out.push_str(&format!("{}\n", "=".repeat(RULE_WIDTH)));

    for result in results {
        out.push_str(&format!("\n#{} - {}\n", result.position, result.title));
        out.push_str(&format!("URL: {}\n", result.link));
        out.push_str(&format!("Snippet: {}\n", truncate(&result.snippet, 150)));
        out.push_str(&format!("{}\n", "-".repeat(RULE_WIDTH)));
    }

    out
}
