//! CSV loaders for the three source tables.
//!
//! The source workbooks export one CSV per sheet. Some sheets carry a couple
//! of preamble rows above the header, so every loader takes the number of
//! rows to skip before the header line.
//!
//! Cleaning rules match what the dashboards expect: numeric fields that fail
//! to parse drop the whole row, duration cells like "31 days" keep their
//! leading integer, and the month column accepts "Jan 2023" style labels.

use std::io::{BufRead, BufReader, Read};

use chrono::NaiveDate;

use crate::error::{DataError, Result};
use crate::location::derive_state;
use crate::model::{CompanyRecord, LocationRecord, MonthlyPoint};

const COL_COMPANY: &str = "Company";
const COL_TOTAL: &str = "Total Postings";
const COL_UNIQUE: &str = "Unique Postings";
const COL_DURATION: &str = "Median Posting Duration";
const COL_COUNTY: &str = "County Name";
const COL_SALARY: &str = "Median Annual Advertised Salary";
const COL_MONTH: &str = "Month";
const COL_INTENSITY: &str = "Posting Intensity";

/// Load the company leaderboard table.
pub fn load_companies<R: Read>(reader: R, skip_rows: usize) -> Result<Vec<CompanyRecord>> {
    let mut csv = csv_after_preamble(reader, skip_rows)?;
    let headers = csv.headers()?.clone();

    let company_idx = find_column(&headers, COL_COMPANY)?;
    let total_idx = find_column(&headers, COL_TOTAL)?;
    let unique_idx = find_column(&headers, COL_UNIQUE)?;
    let duration_idx = find_column(&headers, COL_DURATION)?;

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let company = match row.get(company_idx).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let (Some(total), Some(unique), Some(duration)) = (
            row.get(total_idx).and_then(parse_count),
            row.get(unique_idx).and_then(parse_count),
            row.get(duration_idx).and_then(parse_leading_digits),
        ) else {
            continue;
        };
        records.push(CompanyRecord {
            company,
            total_postings: total,
            unique_postings: unique,
            median_duration_days: duration,
        });
    }

    if records.is_empty() {
        return Err(DataError::EmptyTable("companies".to_string()));
    }
    Ok(records)
}

/// Load the county/state location table.
pub fn load_locations<R: Read>(reader: R, skip_rows: usize) -> Result<Vec<LocationRecord>> {
    let mut csv = csv_after_preamble(reader, skip_rows)?;
    let headers = csv.headers()?.clone();

    let county_idx = find_column(&headers, COL_COUNTY)?;
    let salary_idx = find_column(&headers, COL_SALARY)?;
    let unique_idx = find_column(&headers, COL_UNIQUE)?;
    let duration_idx = find_column(&headers, COL_DURATION)?;

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        let county = match row.get(county_idx).map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };
        let (Some(salary), Some(unique), Some(duration)) = (
            row.get(salary_idx).and_then(parse_amount),
            row.get(unique_idx).and_then(parse_count),
            row.get(duration_idx).and_then(parse_leading_digits),
        ) else {
            continue;
        };
        let state = derive_state(&county);
        records.push(LocationRecord {
            county,
            state,
            median_salary: salary,
            unique_postings: unique,
            median_duration_days: duration,
        });
    }

    if records.is_empty() {
        return Err(DataError::EmptyTable("locations".to_string()));
    }
    Ok(records)
}

/// Load the monthly posting series, sorted by month.
///
/// Rows without a parseable month or count are dropped. Two surviving rows
/// on the same month violate the series invariant and fail the load.
pub fn load_series<R: Read>(reader: R, skip_rows: usize) -> Result<Vec<MonthlyPoint>> {
    let mut csv = csv_after_preamble(reader, skip_rows)?;
    let headers = csv.headers()?.clone();

    let month_idx = find_column(&headers, COL_MONTH)?;
    let unique_idx = find_column(&headers, COL_UNIQUE)?;
    let intensity_idx = find_column(&headers, COL_INTENSITY)?;

    let mut points = Vec::new();
    for row in csv.records() {
        let row = row?;
        let (Some(month), Some(unique), Some(intensity)) = (
            row.get(month_idx).and_then(parse_month),
            row.get(unique_idx).and_then(parse_count),
            row.get(intensity_idx).and_then(parse_amount),
        ) else {
            continue;
        };
        points.push(MonthlyPoint {
            month,
            unique_postings: unique,
            posting_intensity: intensity,
        });
    }

    if points.is_empty() {
        return Err(DataError::EmptyTable("series".to_string()));
    }

    points.sort_by_key(|p| p.month);
    for pair in points.windows(2) {
        if pair[0].month == pair[1].month {
            return Err(DataError::DuplicateMonth(pair[0].month.to_string()));
        }
    }
    Ok(points)
}

/// Skip preamble lines, then hand the rest to the CSV reader.
fn csv_after_preamble<R: Read>(
    reader: R,
    skip_rows: usize,
) -> Result<csv::Reader<impl Read>> {
    let mut buffered = BufReader::new(reader);
    let mut discard = String::new();
    for _ in 0..skip_rows {
        discard.clear();
        buffered.read_line(&mut discard)?;
    }
    Ok(csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(buffered))
}

/// Locate a column by exact header, falling back to prefix match so the
/// period-stamped variants ("Unique Postings from Jan 2023 - Dec 2023")
/// resolve to the same column.
fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .or_else(|| headers.iter().position(|h| h.trim().starts_with(name)))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

/// Parse a non-negative count, tolerating thousands separators.
fn parse_count(value: &str) -> Option<u64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse().ok()
}

/// Parse a dollar amount or score, tolerating "$" and thousands separators.
fn parse_amount(value: &str) -> Option<f64> {
    let cleaned: String = value
        .trim()
        .chars()
        .filter(|c| *c != ',' && *c != '$')
        .collect();
    let parsed: f64 = cleaned.parse().ok()?;
    parsed.is_finite().then_some(parsed)
}

/// Extract the first run of digits, as in "31 days" -> 31.
fn parse_leading_digits(value: &str) -> Option<u32> {
    let digits: String = value
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().ok()
}

/// Parse "Jan 2023" style month labels to a first-of-month date.
fn parse_month(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    NaiveDate::parse_from_str(&format!("01 {trimmed}"), "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(trimmed, "%Y-%m-%d"))
        .ok()
}
