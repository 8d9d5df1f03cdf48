//! Rank tracking for the business's own domain and a watch list of
//! competitors.

use crate::models::{CompetitorHit, SearchResult, TargetRanking};
use crate::search::domain::{contains_domain, matches_domain};

/// Competitor hits kept per keyword.
pub const MAX_COMPETITOR_HITS: usize = 5;

/// Summary of where the tracked domain ranks.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackingSummary {
    pub keywords_tracked: usize,
    pub keywords_ranking: usize,
    /// Mean position over ranking keywords, `None` if it ranks nowhere.
    pub avg_position: Option<f64>,
}

/// Records, per keyword, the first position of the tracked domain and where
/// the watched competitors show up.
#[derive(Debug, Clone)]
pub struct RankTracker {
    target: Option<String>,
    competitors: Vec<String>,
    rankings: Vec<TargetRanking>,
}

impl RankTracker {
    pub fn new(target: Option<&str>, competitors: &[String]) -> Self {
        Self {
            target: target.map(str::to_string),
            competitors: competitors.to_vec(),
            rankings: Vec::new(),
        }
    }

    /// Record the target's best position and the competitor hits for
    /// `keyword`.
    pub fn record(&mut self, keyword: &str, results: &[SearchResult]) {
        let ranked = || results.iter().filter(|r| r.position > 0);

        let hit = self
            .target
            .as_deref()
            .and_then(|target| ranked().find(|r| matches_domain(&r.domain, target)));

        let competitors = ranked()
            .filter(|r| {
                self.competitors
                    .iter()
                    .any(|c| contains_domain(&r.domain, c))
            })
            .take(MAX_COMPETITOR_HITS)
            .map(|r| CompetitorHit {
                domain: r.domain.clone(),
                position: r.position,
            })
            .collect();

        self.rankings.push(TargetRanking {
            keyword: keyword.to_string(),
            position: hit.map(|r| r.position),
            link: hit.map(|r| r.link.clone()),
            title: hit.map(|r| r.title.clone()),
            competitors,
        });
    }

    #[allow(dead_code)]
    pub fn rankings(&self) -> &[TargetRanking] {
        &self.rankings
    }

    pub fn into_rankings(self) -> Vec<TargetRanking> {
        self.rankings
    }

    #[allow(dead_code)] // Sweep callers summarize the finished rankings instead
    pub fn summary(&self) -> TrackingSummary {
        summarize(&self.rankings)
    }
}

/// Summarize a list of target rankings.
pub fn summarize(rankings: &[TargetRanking]) -> TrackingSummary {
    let positions: Vec<u32> = rankings.iter().filter_map(|r| r.position).collect();
    let avg_position = if positions.is_empty() {
        None
    } else {
        Some(positions.iter().map(|&p| f64::from(p)).sum::<f64>() / positions.len() as f64)
    };

    TrackingSummary {
        keywords_tracked: rankings.len(),
        keywords_ranking: positions.len(),
        avg_position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn watch_list(domains: &[&str]) -> Vec<String> {
        domains.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_tracker_records_first_hit() {
        let mut tracker = RankTracker::new(Some("arteva.ma"), &[]);
        tracker.record(
            "goodies",
            &[
                SearchResult::new(1, "other.ma", "Other"),
                SearchResult::new(3, "www.arteva.ma", "Arteva"),
                SearchResult::new(5, "arteva.ma", "Arteva again"),
            ],
        );
        tracker.record("stylos", &[SearchResult::new(1, "other.ma", "Other")]);

        let rankings = tracker.rankings();
        assert_eq!(rankings.len(), 2);
        assert_eq!(rankings[0].position, Some(3));
        assert_eq!(rankings[0].title.as_deref(), Some("Arteva"));
        assert!(rankings[0].competitors.is_empty());
        assert_eq!(rankings[1].position, None);
        assert!(rankings[1].link.is_none());
    }

    #[test]
    fn test_tracker_records_competitor_hits() {
        let mut tracker = RankTracker::new(
            Some("arteva.ma"),
            &watch_list(&["publiimport.ma", "www.imagia.ma"]),
        );
        tracker.record(
            "goodies",
            &[
                SearchResult::new(1, "www.publiimport.ma", "P"),
                SearchResult::new(2, "other.ma", "O"),
                SearchResult::new(3, "shop.imagia.ma", "I"),
                SearchResult::new(4, "arteva.ma", "A"),
                SearchResult::new(6, "publiimport.ma", "P again"),
            ],
        );

        let ranking = &tracker.rankings()[0];
        assert_eq!(ranking.position, Some(4));
        assert_eq!(
            ranking.competitors,
            vec![
                CompetitorHit {
                    domain: "www.publiimport.ma".to_string(),
                    position: 1,
                },
                CompetitorHit {
                    domain: "shop.imagia.ma".to_string(),
                    position: 3,
                },
                CompetitorHit {
                    domain: "publiimport.ma".to_string(),
                    position: 6,
                },
            ]
        );
    }

    #[test]
    fn test_tracker_caps_competitor_hits() {
        let mut tracker = RankTracker::new(None, &watch_list(&["imagia.ma"]));
        let results: Vec<SearchResult> = (1..=8)
            .map(|p| SearchResult::new(p, "imagia.ma", "I"))
            .collect();
        tracker.record("goodies", &results);

        let ranking = &tracker.rankings()[0];
        assert_eq!(ranking.position, None);
        assert_eq!(ranking.competitors.len(), MAX_COMPETITOR_HITS);
        assert_eq!(ranking.competitors[4].position, 5);
    }

    #[test]
    fn test_summary() {
        let mut tracker = RankTracker::new(Some("arteva.ma"), &[]);
        tracker.record("a", &[SearchResult::new(2, "arteva.ma", "t")]);
        tracker.record("b", &[SearchResult::new(4, "arteva.ma", "t")]);
        tracker.record("c", &[]);

        let summary = tracker.summary();
        assert_eq!(summary.keywords_tracked, 3);
        assert_eq!(summary.keywords_ranking, 2);
        assert_eq!(summary.avg_position, Some(3.0));
    }

    #[test]
    fn test_summary_nowhere() {
        let summary = summarize(&[]);
        assert_eq!(summary.keywords_ranking, 0);
        assert!(summary.avg_position.is_none());
    }
}
