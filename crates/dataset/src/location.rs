//! County/state location queries.

use crate::model::LocationRecord;

/// Derive the uppercase state code from a county name's trailing segment,
/// e.g. "Travis County, TX" -> "TX". Names without a comma yield the whole
/// trimmed name uppercased, matching how the source data behaves.
pub fn derive_state(county: &str) -> String {
    county
        .rsplit(',')
        .next()
        .unwrap_or(county)
        .trim()
        .to_uppercase()
}

/// Distinct state codes present in the table, sorted.
pub fn states(records: &[LocationRecord]) -> Vec<String> {
    let mut names: Vec<String> = records.iter().map(|r| r.state.clone()).collect();
    names.sort();
    names.dedup();
    names
}

/// Records for a single state. An unknown state yields an empty list.
pub fn filter_state(records: &[LocationRecord], state: &str) -> Vec<LocationRecord> {
    let wanted = state.trim().to_uppercase();
    records
        .iter()
        .filter(|r| r.state == wanted)
        .cloned()
        .collect()
}

/// The records with the highest and lowest median salary, in that order.
/// Returns `None` for an empty slice.
pub fn salary_extremes(records: &[LocationRecord]) -> Option<(&LocationRecord, &LocationRecord)> {
    let mut iter = records.iter();
    let first = iter.next()?;
    let mut highest = first;
    let mut lowest = first;
    for record in iter {
        if record.median_salary > highest.median_salary {
            highest = record;
        }
        if record.median_salary < lowest.median_salary {
            lowest = record;
        }
    }
    Some((highest, lowest))
}

/// Look up a single county's record by exact name.
pub fn county_detail<'a>(records: &'a [LocationRecord], county: &str) -> Option<&'a LocationRecord> {
    let wanted = county.trim();
    records.iter().find(|r| r.county == wanted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(county: &str, salary: f64) -> LocationRecord {
        LocationRecord {
            county: county.to_string(),
            state: derive_state(county),
            median_salary: salary,
            unique_postings: 100,
            median_duration_days: 30,
        }
    }

    fn sample() -> Vec<LocationRecord> {
        vec![
            record("Travis County, TX", 95_000.0),
            record("Harris County, TX", 88_000.0),
            record("King County, wa", 120_000.0),
        ]
    }

    #[test]
    fn test_derive_state() {
        assert_eq!(derive_state("Travis County, TX"), "TX");
        assert_eq!(derive_state("King County, wa "), "WA");
        assert_eq!(derive_state("Statewide"), "STATEWIDE");
    }

    #[test]
    fn test_states_sorted_distinct() {
        assert_eq!(states(&sample()), vec!["TX", "WA"]);
    }

    #[test]
    fn test_filter_state_case_insensitive() {
        let tx = filter_state(&sample(), "tx");
        assert_eq!(tx.len(), 2);
        assert!(filter_state(&sample(), "ZZ").is_empty());
    }

    #[test]
    fn test_salary_extremes() {
        let records = sample();
        let (highest, lowest) = salary_extremes(&records).unwrap();
        assert_eq!(highest.county, "King County, wa");
        assert_eq!(lowest.county, "Harris County, TX");
        assert!(salary_extremes(&[]).is_none());
    }

    #[test]
    fn test_county_detail() {
        let records = sample();
        assert!(county_detail(&records, "Travis County, TX").is_some());
        assert!(county_detail(&records, "Nowhere County, TX").is_none());
    }
}
