//! Monthly series queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::MonthlyPoint;

/// One row of the posting-intensity side table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityRow {
    pub month: NaiveDate,
    pub posting_intensity: f64,
}

/// Points within the inclusive `[start, end]` range. Either bound may be
/// omitted. A range matching nothing yields an empty vector, never an error.
pub fn filter_range(
    points: &[MonthlyPoint],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<MonthlyPoint> {
    points
        .iter()
        .filter(|p| start.map_or(true, |s| p.month >= s))
        .filter(|p| end.map_or(true, |e| p.month <= e))
        .cloned()
        .collect()
}

/// The (month, intensity) view backing the optional intensity table.
pub fn intensity_table(points: &[MonthlyPoint]) -> Vec<IntensityRow> {
    points
        .iter()
        .map(|p| IntensityRow {
            month: p.month,
            posting_intensity: p.posting_intensity,
        })
        .collect()
}

/// Unique-posting counts paired with their months, the forecast input shape.
pub fn count_pairs(points: &[MonthlyPoint]) -> Vec<(NaiveDate, f64)> {
    points
        .iter()
        .map(|p| (p.month, p.unique_postings as f64))
        .collect()
}
