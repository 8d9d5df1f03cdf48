//! Competitor aggregation and ranking.
//!
//! Folds per-keyword search result batches into a global leaderboard of
//! domains (by distinct-keyword appearances, then best average position)
//! and per-category leaderboards (by raw appearance count).

use crate::models::{CategoryEntry, CompetitorRanking, SearchResult};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::debug;

/// Default size of the global leaderboard.
pub const DEFAULT_TOP_COMPETITORS: usize = 10;

/// Default size of each category leaderboard.
pub const DEFAULT_TOP_PER_CATEGORY: usize = 5;

/// Accumulated statistics for one domain across all keywords.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainStats {
    pub domain: String,
    /// Number of keywords the domain appeared for (at most one per keyword call).
    pub appearances: usize,
    pub keywords: Vec<String>,
    /// Every position the domain was seen at, in recording order.
    pub positions: Vec<u32>,
    /// Mean of `positions`. Stays `0.0` until finalized.
    pub avg_position: f64,
}

impl DomainStats {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            appearances: 0,
            keywords: Vec::new(),
            positions: Vec::new(),
            avg_position: 0.0,
        }
    }

    /// Recompute `avg_position`; no-op without positions.
    fn finalize(&mut self) {
        if !self.positions.is_empty() {
            let sum: u64 = self.positions.iter().map(|&p| u64::from(p)).sum();
            self.avg_position = sum as f64 / self.positions.len() as f64;
        }
    }
}

/// Per-domain appearance counts scoped to one category.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryStats {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl CategoryStats {
    fn increment(&mut self, domain: &str) {
        match self.index.get(domain) {
            Some(&slot) => self.counts[slot].1 += 1,
            None => {
                self.index.insert(domain.to_string(), self.counts.len());
                self.counts.push((domain.to_string(), 1));
            }
        }
    }

    /// Count for a domain (0 if never seen).
    #[allow(dead_code)] // Read accessor for downstream formatting
    pub fn count(&self, domain: &str) -> usize {
        self.index
            .get(domain)
            .map(|&slot| self.counts[slot].1)
            .unwrap_or(0)
    }

    /// All counts in first-seen order.
    #[allow(dead_code)] // Read accessor for downstream formatting
    pub fn entries(&self) -> &[(String, usize)] {
        &self.counts
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Top `n` domains by count, descending; ties keep first-seen order.
    pub fn top(&self, n: usize) -> Vec<CategoryEntry> {
        let mut sorted: Vec<&(String, usize)> = self.counts.iter().collect();
        sorted.sort_by_key(|(_, count)| std::cmp::Reverse(*count));
        sorted
            .into_iter()
            .take(n)
            .map(|(domain, count)| CategoryEntry {
                domain: domain.clone(),
                appearances: *count,
            })
            .collect()
    }
}

/// Cross-keyword competitor accumulator.
///
/// Construct one per run, pass it by `&mut` through the keyword loop and
/// call [`CompetitorAggregator::finalize_global`] once every keyword is in.
#[derive(Debug, Clone, Default)]
pub struct CompetitorAggregator {
    domains: Vec<DomainStats>,
    index: HashMap<String, usize>,
    categories: Vec<(String, CategoryStats)>,
    active_category: Option<usize>,
    keywords_recorded: usize,
}

impl CompetitorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `name` the active category, resetting its counts.
    pub fn start_category(&mut self, name: &str) {
        let slot = match self.categories.iter().position(|(n, _)| n == name) {
            Some(slot) => {
                self.categories[slot].1 = CategoryStats::default();
                slot
            }
            None => {
                self.categories
                    .push((name.to_string(), CategoryStats::default()));
                self.categories.len() - 1
            }
        };
        self.active_category = Some(slot);
    }

    /// Fold one keyword's results into the global and active-category stats.
    ///
    /// A domain counts once toward `appearances` per call, however many
    /// positions it holds. Results with an empty domain or position 0 are
    /// skipped.
    pub fn record(&mut self, keyword: &str, results: &[SearchResult]) {
        let mut batch: Vec<(&str, Vec<u32>)> = Vec::new();

        for result in results {
            if result.domain.is_empty() || result.position == 0 {
                debug!(
                    "Skipping malformed result for '{}': {:?}",
                    keyword, result.link
                );
                continue;
            }

            match batch.iter_mut().find(|(d, _)| *d == result.domain) {
                Some((_, positions)) => positions.push(result.position),
                None => batch.push((result.domain.as_str(), vec![result.position])),
            }
        }

        if batch.is_empty() {
            return;
        }

        self.keywords_recorded += 1;

        for (domain, positions) in batch {
            let stats = self.get_or_insert(domain);
            stats.appearances += 1;
            stats.keywords.push(keyword.to_string());
            stats.positions.extend(positions);

            if let Some(slot) = self.active_category {
                self.categories[slot].1.increment(domain);
            }
        }
    }

    fn get_or_insert(&mut self, domain: &str) -> &mut DomainStats {
        let slot = match self.index.get(domain) {
            Some(&slot) => slot,
            None => {
                self.index.insert(domain.to_string(), self.domains.len());
                self.domains.push(DomainStats::new(domain));
                self.domains.len() - 1
            }
        };
        &mut self.domains[slot]
    }

    /// Top `n` domains for a category; empty if the category is unknown.
    pub fn finalize_category(&self, category: &str, n: usize) -> Vec<CategoryEntry> {
        self.category(category)
            .map(|stats| stats.top(n))
            .unwrap_or_default()
    }

    /// Compute averages and return the top `n` domains.
    ///
    /// Ordered by appearances (descending), then average position
    /// (ascending, a lower average is a better rank). Remaining ties keep
    /// first-seen order.
    pub fn finalize_global(&mut self, n: usize) -> Vec<CompetitorRanking> {
        for stats in &mut self.domains {
            stats.finalize();
        }

        let mut ranked: Vec<&DomainStats> = self.domains.iter().collect();
        ranked.sort_by(|a, b| compare_competitors(a, b));

        ranked
            .into_iter()
            .take(n)
            .enumerate()
            .map(|(i, stats)| CompetitorRanking {
                rank: i + 1,
                domain: stats.domain.clone(),
                appearances: stats.appearances,
                avg_position: stats.avg_position,
                keywords: stats.keywords.clone(),
            })
            .collect()
    }

    /// Stats for one domain.
    #[allow(dead_code)] // Read accessor for downstream formatting
    pub fn domain(&self, domain: &str) -> Option<&DomainStats> {
        self.index.get(domain).map(|&slot| &self.domains[slot])
    }

    /// All domain stats in first-seen order.
    pub fn domains(&self) -> &[DomainStats] {
        &self.domains
    }

    /// Counts for one category.
    pub fn category(&self, name: &str) -> Option<&CategoryStats> {
        self.categories
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, stats)| stats)
    }

    /// Number of `record` calls that contributed at least one domain.
    pub fn keywords_recorded(&self) -> usize {
        self.keywords_recorded
    }
}

fn compare_competitors(a: &DomainStats, b: &DomainStats) -> Ordering {
    b.appearances
        .cmp(&a.appearances)
        .then_with(|| a.avg_position.total_cmp(&b.avg_position))
}
