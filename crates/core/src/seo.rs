//! Search Console keyword tracking rules.
//!
//! Search Analytics rows are reported per query. Each tracked keyword is
//! credited with every query that contains it (see [`crate::keyword`]), and
//! the matched rows are folded into one [`KeywordMetrics`] per report window.

use chrono::Days;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::keyword::{normalize, NormalizedKeyword};
use crate::types::Date;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Keyword entered by hand in the back office.
pub const KEYWORD_SOURCE_MANUAL: &str = "manual";
/// Keyword imported automatically from Search Console queries.
pub const KEYWORD_SOURCE_GSC: &str = "gsc";

pub const VALID_KEYWORD_SOURCES: &[&str] = &[KEYWORD_SOURCE_MANUAL, KEYWORD_SOURCE_GSC];

pub const MAX_KEYWORD_LENGTH: usize = 255;

/// Days of Search Console data aggregated per sync.
pub const DEFAULT_LOOKBACK_DAYS: u64 = 28;
/// Search Console data is incomplete for the most recent days.
pub const DEFAULT_DATA_LAG_DAYS: u64 = 3;
pub const DEFAULT_ROW_LIMIT: u32 = 1000;
pub const DEFAULT_IMPORT_MIN_IMPRESSIONS: u32 = 10;
pub const DEFAULT_IMPORT_MAX_PER_RUN: usize = 20;
pub const DEFAULT_POSITION_RETENTION_DAYS: u64 = 365;
/// Imported keywords without data for this long are deactivated.
pub const DEFAULT_KEYWORD_STALE_DAYS: u64 = 90;

/* --------------------------------------------------------------------------
Types
-------------------------------------------------------------------------- */

/// One Search Analytics row for the `query` dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRow {
    pub query: String,
    pub clicks: f64,
    pub impressions: f64,
    pub ctr: f64,
    pub position: f64,
}

/// Metrics credited to a keyword for one report window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordMetrics {
    pub clicks: i32,
    pub impressions: i32,
    /// Click-through rate, 0 to 1, four decimals.
    pub ctr: f64,
    /// Average position weighted by impressions, two decimals.
    pub position: f64,
}

/* --------------------------------------------------------------------------
Validation
-------------------------------------------------------------------------- */

pub fn validate_keyword(keyword: &str) -> Result<(), CoreError> {
    if normalize(keyword).is_empty() {
        return Err(CoreError::Validation(
            "Keyword must contain at least one letter or digit".to_string(),
        ));
    }
    if keyword.chars().count() > MAX_KEYWORD_LENGTH {
        return Err(CoreError::Validation(format!(
            "Keyword exceeds maximum length of {MAX_KEYWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_keyword_source(source: &str) -> Result<(), CoreError> {
    if VALID_KEYWORD_SOURCES.contains(&source) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid keyword source '{source}'. Must be one of: {}",
            VALID_KEYWORD_SOURCES.join(", ")
        )))
    }
}

/// Inclusive `(start, end)` dates of the report window ending `lag_days`
/// before `today` and spanning `lookback_days` days.
pub fn report_window(today: Date, lookback_days: u64, lag_days: u64) -> (Date, Date) {
    let end = today - Days::new(lag_days);
    let start = end - Days::new(lookback_days.saturating_sub(1));
    (start, end)
}

/* --------------------------------------------------------------------------
Query index
-------------------------------------------------------------------------- */

/// Search Analytics rows with their queries normalized once.
#[derive(Debug, Clone, Default)]
pub struct QueryIndex {
    rows: Vec<(String, QueryRow)>,
}

impl QueryIndex {
    pub fn new(rows: Vec<QueryRow>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| (normalize(&row.query), row))
            .collect();
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose query contains `keyword`.
    pub fn matching<'a>(&'a self, keyword: &'a NormalizedKeyword) -> impl Iterator<Item = &'a QueryRow> {
        self.rows
            .iter()
            .filter(move |(normalized, _)| keyword.matches_normalized(normalized))
            .map(|(_, row)| row)
    }

    /// Aggregate the rows matching `keyword`. `None` when nothing matches.
    pub fn metrics_for(&self, keyword: &str) -> Option<KeywordMetrics> {
        let keyword = NormalizedKeyword::new(keyword);
        aggregate(self.matching(&keyword))
    }

    /// Queries worth tracking that no existing keyword covers yet.
    ///
    /// Candidates have at least `min_impressions`, are deduplicated by
    /// normalized text and ordered by impressions (most first).
    pub fn import_candidates(
        &self,
        existing_keywords: &[String],
        min_impressions: u32,
        max: usize,
    ) -> Vec<&QueryRow> {
        let existing: Vec<NormalizedKeyword> = existing_keywords
            .iter()
            .map(|k| NormalizedKeyword::new(k))
            .filter(|k| !k.is_empty())
            .collect();

        let mut candidates: Vec<&(String, QueryRow)> = self
            .rows
            .iter()
            .filter(|(normalized, row)| {
                !normalized.is_empty()
                    && row.impressions >= f64::from(min_impressions)
                    && !existing.iter().any(|k| k.matches_normalized(normalized))
            })
            .collect();
        candidates.sort_by(|a, b| b.1.impressions.total_cmp(&a.1.impressions));

        let mut seen: Vec<&str> = Vec::new();
        let mut picked = Vec::new();
        for (normalized, row) in candidates {
            if picked.len() >= max {
                break;
            }
            if seen.contains(&normalized.as_str()) {
                continue;
            }
            seen.push(normalized);
            picked.push(row);
        }
        picked
    }
}

/// Fold rows into one set of metrics.
///
/// Position is weighted by impressions; rows without impressions fall back
/// to a plain mean.
pub fn aggregate<'a>(rows: impl IntoIterator<Item = &'a QueryRow>) -> Option<KeywordMetrics> {
    let mut count = 0usize;
    let mut clicks = 0.0;
    let mut impressions = 0.0;
    let mut weighted_position = 0.0;
    let mut position_sum = 0.0;

    for row in rows {
        count += 1;
        clicks += row.clicks;
        impressions += row.impressions;
        weighted_position += row.position * row.impressions;
        position_sum += row.position;
    }

    if count == 0 {
        return None;
    }

    let position = if impressions > 0.0 {
        weighted_position / impressions
    } else {
        position_sum / count as f64
    };
    let ctr = if impressions > 0.0 {
        clicks / impressions
    } else {
        0.0
    };

    Some(KeywordMetrics {
        clicks: clicks.round() as i32,
        impressions: impressions.round() as i32,
        ctr: round_to(ctr, 4),
        position: round_to(position, 2),
    })
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(query: &str, clicks: f64, impressions: f64, position: f64) -> QueryRow {
        QueryRow {
            query: query.to_string(),
            clicks,
            impressions,
            ctr: if impressions > 0.0 { clicks / impressions } else { 0.0 },
            position,
        }
    }

    fn date(s: &str) -> Date {
        s.parse().unwrap()
    }

    #[test]
    fn report_window_accounts_for_lag() {
        let (start, end) = report_window(date("2026-10-19"), 28, 3);
        assert_eq!(end, date("2026-10-16"));
        assert_eq!(start, date("2026-09-19"));
    }

    #[test]
    fn single_day_window() {
        let (start, end) = report_window(date("2026-10-19"), 1, 0);
        assert_eq!(start, end);
    }

    #[test]
    fn accented_query_is_credited_to_plain_keyword() {
        let index = QueryIndex::new(vec![row("Création Site Web", 3.0, 100.0, 8.0)]);
        let metrics = index.metrics_for("creation site web").unwrap();
        assert_eq!(metrics.clicks, 3);
        assert_eq!(metrics.impressions, 100);
        assert_eq!(metrics.ctr, 0.03);
        assert_eq!(metrics.position, 8.0);
    }

    #[test]
    fn position_is_weighted_by_impressions() {
        let index = QueryIndex::new(vec![
            row("site web lyon", 1.0, 300.0, 4.0),
            row("création site web", 2.0, 100.0, 12.0),
            row("logo", 9.0, 900.0, 1.0),
        ]);
        let metrics = index.metrics_for("site web").unwrap();
        assert_eq!(metrics.clicks, 3);
        assert_eq!(metrics.impressions, 400);
        assert_eq!(metrics.position, 6.0);
        assert_eq!(metrics.ctr, 0.0075);
    }

    #[test]
    fn zero_impressions_fall_back_to_mean_position() {
        let metrics = aggregate(&[row("a", 0.0, 0.0, 3.0), row("a b", 0.0, 0.0, 6.0)]).unwrap();
        assert_eq!(metrics.position, 4.5);
        assert_eq!(metrics.ctr, 0.0);
    }

    #[test]
    fn unmatched_keyword_has_no_metrics() {
        let index = QueryIndex::new(vec![row("logo", 1.0, 10.0, 2.0)]);
        assert!(index.metrics_for("site web").is_none());
        assert!(index.metrics_for("").is_none());
    }

    #[test]
    fn import_skips_covered_and_small_queries() {
        let index = QueryIndex::new(vec![
            row("création site web lyon", 2.0, 500.0, 5.0),
            row("developpeur symfony", 1.0, 50.0, 9.0),
            row("Développeur Symfony", 0.0, 20.0, 11.0),
            row("refonte site", 0.0, 5.0, 30.0),
            row("agence web", 4.0, 80.0, 7.0),
        ]);
        let existing = vec!["creation site web".to_string()];
        let picked: Vec<&str> = index
            .import_candidates(&existing, 10, 20)
            .iter()
            .map(|r| r.query.as_str())
            .collect();
        assert_eq!(picked, vec!["agence web", "developpeur symfony"]);
    }

    #[test]
    fn import_respects_max_per_run() {
        let index = QueryIndex::new(vec![
            row("a", 0.0, 30.0, 1.0),
            row("b", 0.0, 20.0, 1.0),
            row("c", 0.0, 10.0, 1.0),
        ]);
        let picked = index.import_candidates(&[], 0, 2);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].query, "a");
    }

    #[test]
    fn keyword_validation() {
        assert!(validate_keyword("création site").is_ok());
        assert!(validate_keyword("  ").is_err());
        assert!(validate_keyword(&"a".repeat(MAX_KEYWORD_LENGTH + 1)).is_err());
        assert!(validate_keyword_source(KEYWORD_SOURCE_GSC).is_ok());
        assert!(validate_keyword_source("ahrefs").is_err());
    }
}
