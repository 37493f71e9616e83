//! Record types for the three source tables.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One company's posting totals for the snapshot year.
///
/// Invariant: `total_postings >= unique_postings` (duplicate listings of the
/// same role only ever add to the total).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRecord {
    /// Company name as it appears in the source.
    pub company: String,
    /// All postings published during the snapshot period.
    pub total_postings: u64,
    /// Distinct positions, duplicates collapsed.
    pub unique_postings: u64,
    /// Median days a posting stayed open.
    pub median_duration_days: u32,
}

/// One county's posting statistics.
///
/// The source keys counties as "Some County, TX"; the state code is derived
/// from the suffix at load time. One record per county per snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// County name including the state suffix, e.g. "Travis County, TX".
    pub county: String,
    /// Uppercase state code derived from the county suffix.
    pub state: String,
    /// Median annual advertised salary in dollars.
    pub median_salary: f64,
    /// Distinct postings during the snapshot period.
    pub unique_postings: u64,
    /// Median days a posting stayed open.
    pub median_duration_days: u32,
}

/// One month of the posting time series.
///
/// Loaded series are sorted by month and contain at most one point per
/// month; `month` is always the first of the month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// First-of-month date.
    pub month: NaiveDate,
    /// Distinct postings observed that month.
    pub unique_postings: u64,
    /// Pre-computed demand score, carried through from the source.
    pub posting_intensity: f64,
}
