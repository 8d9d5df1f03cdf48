//! Sequential keyword sweep.
//!
//! Searches each configured keyword in order and folds the results into a
//! [`CompetitorAggregator`] (and the optional [`RankTracker`]) before moving
//! on to the next one.

use super::aggregator::CompetitorAggregator;
use super::tracking::RankTracker;
use crate::config::KeywordCategory;
use crate::models::{CategoryInsight, CategoryInsights, CompetitorRanking, SearchResult, TargetRanking};
use crate::search::SearchProvider;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

/// Number of results kept per keyword for the console preview.
const PREVIEW_RESULTS: usize = 3;

/// Parameters for one sweep.
#[derive(Debug, Clone)]
pub struct SweepSettings {
    pub location: String,
    pub language: String,
    pub num: u32,
    pub top_competitors: usize,
    pub top_per_category: usize,
    pub target_domain: Option<String>,
    /// Competitor domains whose positions are recorded per keyword.
    pub tracked_competitors: Vec<String>,
    pub show_progress: bool,
}

/// What happened for one keyword.
#[derive(Debug, Clone)]
pub struct KeywordOutcome {
    pub category: String,
    pub keyword: String,
    /// Total results returned (0 on error).
    pub result_count: usize,
    /// First results, for display.
    pub preview: Vec<SearchResult>,
    /// Search error, if the request failed.
    pub error: Option<String>,
}

/// Everything a sweep produces.
#[derive(Debug)]
pub struct SweepOutcome {
    /// Number of configured keywords.
    pub keywords_analyzed: usize,
    pub keywords: Vec<KeywordOutcome>,
    pub category_insights: CategoryInsights,
    pub top_competitors: Vec<CompetitorRanking>,
    /// Per-keyword tracking, empty when nothing is tracked.
    pub target_rankings: Vec<TargetRanking>,
    /// Own domain the rankings refer to, if one was configured.
    pub target_domain: Option<String>,
    /// Full accumulator, for callers that need every domain.
    pub aggregator: CompetitorAggregator,
}

impl SweepOutcome {
    /// Keywords whose search failed.
    pub fn failed_keywords(&self) -> usize {
        self.keywords.iter().filter(|k| k.error.is_some()).count()
    }
}

fn progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Run the sweep over every category and keyword.
///
/// Search failures are logged and treated as empty result batches; the
/// sweep itself never fails.
pub async fn run_sweep<P>(
    provider: &P,
    categories: &[KeywordCategory],
    settings: &SweepSettings,
) -> SweepOutcome
where
    P: SearchProvider + ?Sized,
{
    let total: usize = categories.iter().map(|c| c.keywords.len()).sum();
    info!(
        "Sweeping {} keywords in {} categories",
        total,
        categories.len()
    );

    let pb = if settings.show_progress {
        progress_bar(total)
    } else {
        ProgressBar::hidden()
    };

    let mut aggregator = CompetitorAggregator::new();
    let mut tracker = (settings.target_domain.is_some() || !settings.tracked_competitors.is_empty())
        .then(|| {
            RankTracker::new(
                settings.target_domain.as_deref(),
                &settings.tracked_competitors,
            )
        });
    let mut keywords = Vec::with_capacity(total);
    let mut insights = Vec::with_capacity(categories.len());

    for category in categories {
        debug!("Category: {}", category.name);
        aggregator.start_category(&category.name);

        for keyword in &category.keywords {
            pb.set_message(keyword.clone());

            let (results, error) = match provider
                .search(keyword, &settings.location, settings.num, &settings.language)
                .await
            {
                Ok(results) => (results, None),
                Err(e) => {
                    warn!("Search failed for '{}': {}", keyword, e);
                    (Vec::new(), Some(e.to_string()))
                }
            };

            if let Some(tracker) = tracker.as_mut() {
                tracker.record(keyword, &results);
            }

            if results.is_empty() {
                warn!("No results for '{}'", keyword);
            } else {
                debug!("'{}': {} results", keyword, results.len());
                aggregator.record(keyword, &results);
            }

            keywords.push(KeywordOutcome {
                category: category.name.clone(),
                keyword: keyword.clone(),
                result_count: results.len(),
                preview: results.into_iter().take(PREVIEW_RESULTS).collect(),
                error,
            });

            pb.inc(1);
        }

        insights.push(CategoryInsight {
            category: category.name.clone(),
            entries: aggregator.finalize_category(&category.name, settings.top_per_category),
        });
    }

    pb.finish_and_clear();

    let top_competitors = aggregator.finalize_global(settings.top_competitors);
    info!(
        "Sweep done: {} domains seen, {} keywords with results",
        aggregator.domains().len(),
        aggregator.keywords_recorded()
    );

    SweepOutcome {
        keywords_analyzed: total,
        keywords,
        category_insights: CategoryInsights(insights),
        top_competitors,
        target_rankings: tracker.map(RankTracker::into_rankings).unwrap_or_default(),
        target_domain: settings.target_domain.clone(),
        aggregator,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ShoppingResult;
    use crate::search::{Result, SearchError};
    use async_trait::async_trait;
    use serde_json::Value;
    use std::collections::HashMap;

    /// In-memory provider keyed by query; unknown queries fail.
    struct FakeProvider {
        responses: HashMap<String, Vec<SearchResult>>,
    }

    impl FakeProvider {
        fn new(entries: Vec<(&str, Vec<(u32, &str)>)>) -> Self {
            let responses = entries
                .into_iter()
                .map(|(query, results)| {
                    let results = results
                        .iter()
                        .map(|(pos, domain)| SearchResult::new(*pos, domain, "t"))
                        .collect();
                    (query.to_string(), results)
                })
                .collect();
            Self { responses }
        }
    }

    #[async_trait]
    impl SearchProvider for FakeProvider {
        async fn search(
            &self,
            query: &str,
            _location: &str,
            num: u32,
            _language: &str,
        ) -> Result<Vec<SearchResult>> {
            match self.responses.get(query) {
                Some(results) => Ok(results.iter().take(num as usize).cloned().collect()),
                None => Err(SearchError::Api {
                    status: 500,
                    message: "boom".to_string(),
                }),
            }
        }

        async fn shopping(&self, _: &str, _: &str, _: u32) -> Result<Vec<ShoppingResult>> {
            Ok(Vec::new())
        }

        async fn trends(&self, _: &str, _: &str, _: &str) -> Result<Value> {
            Ok(Value::Null)
        }
    }

    fn settings(target: Option<&str>) -> SweepSettings {
        SweepSettings {
            location: "Morocco".to_string(),
            language: "fr".to_string(),
            num: 10,
            top_competitors: 10,
            top_per_category: 5,
            target_domain: target.map(String::from),
            tracked_competitors: Vec::new(),
            show_progress: false,
        }
    }

    #[test]
    fn test_sweep_aggregates_across_categories() {
        let provider = FakeProvider::new(vec![
            ("goodies", vec![(1, "a.ma"), (2, "b.ma"), (3, "a.ma")]),
            ("stylos", vec![(1, "b.ma"), (2, "c.ma")]),
            ("mugs", vec![(1, "b.ma"), (4, "arteva.ma")]),
        ]);
        let categories = vec![
            KeywordCategory::new("Generic", &["goodies", "stylos"]),
            KeywordCategory::new("Products", &["mugs"]),
        ];

        let outcome =
            tokio_test::block_on(run_sweep(&provider, &categories, &settings(Some("arteva.ma"))));

        assert_eq!(outcome.keywords_analyzed, 3);
        assert_eq!(outcome.failed_keywords(), 0);

        let top = &outcome.top_competitors;
        assert_eq!(top[0].domain, "b.ma");
        assert_eq!(top[0].appearances, 3);
        assert_eq!(top[1].domain, "a.ma");
        assert_eq!(top[1].avg_position, 2.0);

        let generic = &outcome.category_insights.0[0];
        assert_eq!(generic.category, "Generic");
        assert_eq!(generic.entries[0].domain, "b.ma");
        assert_eq!(generic.entries[0].appearances, 2);
        let products = &outcome.category_insights.0[1];
        assert_eq!(products.entries.len(), 2);

        assert_eq!(outcome.target_rankings.len(), 3);
        assert_eq!(outcome.target_rankings[2].position, Some(4));
        assert_eq!(outcome.target_rankings[0].position, None);
    }

    #[test]
    fn test_sweep_treats_errors_as_empty() {
        let provider = FakeProvider::new(vec![("ok", vec![(1, "a.ma")])]);
        let categories = vec![KeywordCategory::new("Mixed", &["ok", "broken"])];

        let outcome = tokio_test::block_on(run_sweep(&provider, &categories, &settings(None)));

        assert_eq!(outcome.keywords_analyzed, 2);
        assert_eq!(outcome.failed_keywords(), 1);
        assert_eq!(outcome.keywords[1].result_count, 0);
        assert!(outcome.keywords[1].error.is_some());
        assert_eq!(outcome.aggregator.keywords_recorded(), 1);
        assert_eq!(outcome.top_competitors.len(), 1);
        assert!(outcome.target_rankings.is_empty());
    }

    #[test]
    fn test_sweep_keeps_three_result_preview() {
        let provider = FakeProvider::new(vec![(
            "wide",
            vec![(1, "a.ma"), (2, "b.ma"), (3, "c.ma"), (4, "d.ma")],
        )]);
        let categories = vec![KeywordCategory::new("One", &["wide"])];

        let outcome = tokio_test::block_on(run_sweep(&provider, &categories, &settings(None)));

        assert_eq!(outcome.keywords[0].result_count, 4);
        assert_eq!(outcome.keywords[0].preview.len(), 3);
    }

    #[test]
    fn test_sweep_with_no_categories() {
        let provider = FakeProvider::new(vec![]);
        let outcome = tokio_test::block_on(run_sweep(&provider, &[], &settings(None)));

        assert_eq!(outcome.keywords_analyzed, 0);
        assert!(outcome.top_competitors.is_empty());
        assert!(outcome.category_insights.0.is_empty());
    }

    #[test]
    fn test_sweep_tracks_competitors_without_target() {
        let provider = FakeProvider::new(vec![
            ("goodies", vec![(1, "www.imagia.ma"), (2, "b.ma")]),
            ("mugs", vec![(1, "b.ma")]),
        ]);
        let categories = vec![KeywordCategory::new("One", &["goodies", "mugs"])];
        let mut settings = settings(None);
        settings.tracked_competitors = vec!["imagia.ma".to_string()];

        let outcome = tokio_test::block_on(run_sweep(&provider, &categories, &settings));

        assert!(outcome.target_domain.is_none());
        assert_eq!(outcome.target_rankings.len(), 2);
        assert_eq!(outcome.target_rankings[0].position, None);
        assert_eq!(outcome.target_rankings[0].competitors[0].domain, "www.imagia.ma");
        assert!(outcome.target_rankings[1].competitors.is_empty());
    }
}
