//! Company leaderboard queries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::CompanyRecord;

/// Which posting count drives the leaderboard ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingMetric {
    Total,
    Unique,
}

impl PostingMetric {
    fn value(self, record: &CompanyRecord) -> u64 {
        match self {
            PostingMetric::Total => record.total_postings,
            PostingMetric::Unique => record.unique_postings,
        }
    }
}

impl fmt::Display for PostingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PostingMetric::Total => write!(f, "Total Postings"),
            PostingMetric::Unique => write!(f, "Unique Postings"),
        }
    }
}

impl FromStr for PostingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "total" => Ok(PostingMetric::Total),
            "unique" => Ok(PostingMetric::Unique),
            other => Err(format!("Unknown posting metric '{other}'")),
        }
    }
}

/// One bar of the leaderboard chart: a company under a single posting type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub company: String,
    pub posting_type: PostingMetric,
    pub postings: u64,
    pub median_duration_days: u32,
    /// Total-to-unique ratio label shown on the bar, e.g. "3:1".
    pub ratio_label: String,
}

/// Top-N companies by the chosen metric, descending.
///
/// The sort is stable: companies with equal counts keep their source row
/// order, so repeated renders produce identical leaderboards.
pub fn leaderboard(
    records: &[CompanyRecord],
    metric: PostingMetric,
    top_n: usize,
) -> Vec<CompanyRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| metric.value(b).cmp(&metric.value(a)));
    sorted.truncate(top_n);
    sorted
}

/// Melt leaderboard records into one row per (company, posting type), the
/// shape the grouped bar chart consumes. Each row carries the company's
/// total-to-unique ratio label.
pub fn melt_both(top: &[CompanyRecord]) -> Vec<LeaderboardRow> {
    let mut rows = Vec::with_capacity(top.len() * 2);
    for record in top {
        let ratio = ratio_label(record.total_postings, record.unique_postings);
        rows.push(LeaderboardRow {
            company: record.company.clone(),
            posting_type: PostingMetric::Total,
            postings: record.total_postings,
            median_duration_days: record.median_duration_days,
            ratio_label: ratio.clone(),
        });
        rows.push(LeaderboardRow {
            company: record.company.clone(),
            posting_type: PostingMetric::Unique,
            postings: record.unique_postings,
            median_duration_days: record.median_duration_days,
            ratio_label: ratio,
        });
    }
    rows
}

/// Rows for a single-metric leaderboard view.
pub fn melt_single(top: &[CompanyRecord], metric: PostingMetric) -> Vec<LeaderboardRow> {
    top.iter()
        .map(|record| LeaderboardRow {
            company: record.company.clone(),
            posting_type: metric,
            postings: metric.value(record),
            median_duration_days: record.median_duration_days,
            // Single-metric bars label the posting duration instead.
            ratio_label: record.median_duration_days.to_string(),
        })
        .collect()
}

/// Integer-truncated total:unique label, e.g. 120 total / 40 unique -> "3:1".
pub fn ratio_label(total: u64, unique: u64) -> String {
    if unique == 0 {
        return "n/a".to_string();
    }
    format!("{}:1", total / unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<CompanyRecord> {
        vec![
            CompanyRecord {
                company: "Acme".into(),
                total_postings: 120,
                unique_postings: 40,
                median_duration_days: 31,
            },
            CompanyRecord {
                company: "Globex".into(),
                total_postings: 90,
                unique_postings: 60,
                median_duration_days: 28,
            },
            CompanyRecord {
                company: "Initech".into(),
                total_postings: 90,
                unique_postings: 30,
                median_duration_days: 25,
            },
        ]
    }

    #[test]
    fn test_leaderboard_orders_by_metric() {
        let top = leaderboard(&sample(), PostingMetric::Unique, 2);
        assert_eq!(top[0].company, "Globex");
        assert_eq!(top[1].company, "Acme");
    }

    #[test]
    fn test_leaderboard_ties_keep_source_order() {
        let top = leaderboard(&sample(), PostingMetric::Total, 3);
        // Globex and Initech both have 90 total; Globex came first in the
        // source and must stay first.
        assert_eq!(top[1].company, "Globex");
        assert_eq!(top[2].company, "Initech");
    }

    #[test]
    fn test_leaderboard_top_n_larger_than_input() {
        let top = leaderboard(&sample(), PostingMetric::Total, 10);
        assert_eq!(top.len(), 3);
    }

    #[test]
    fn test_melt_both_two_rows_per_company() {
        let top = leaderboard(&sample(), PostingMetric::Total, 2);
        let rows = melt_both(&top);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows[0].posting_type, PostingMetric::Total);
        assert_eq!(rows[1].posting_type, PostingMetric::Unique);
        assert_eq!(rows[0].ratio_label, "3:1");
        assert_eq!(rows[1].ratio_label, "3:1");
    }

    #[test]
    fn test_ratio_label_truncates() {
        assert_eq!(ratio_label(90, 60), "1:1");
        assert_eq!(ratio_label(120, 40), "3:1");
        assert_eq!(ratio_label(10, 0), "n/a");
    }

    #[test]
    fn test_metric_from_str() {
        assert_eq!("total".parse::<PostingMetric>().unwrap(), PostingMetric::Total);
        assert_eq!("Unique".parse::<PostingMetric>().unwrap(), PostingMetric::Unique);
        assert!("both".parse::<PostingMetric>().is_err());
    }
}
