//! # dataset
//!
//! Tabular models for job-posting statistics: company leaderboards,
//! county/state location records and the monthly posting series.
//!
//! Source spreadsheets are consumed as per-sheet CSV exports. Loaders are
//! lenient the way the dashboards need them to be: rows with uncoercible
//! numeric fields are dropped, everything that survives is typed.
//!
//! ## Example
//!
//! ```rust
//! use dataset::{load_companies, company::{leaderboard, PostingMetric}};
//!
//! let csv = "Company,Total Postings,Unique Postings,Median Posting Duration\n\
//!            Acme,120,40,31 days\n\
//!            Globex,90,60,28 days\n";
//! let records = load_companies(csv.as_bytes(), 0).unwrap();
//! let top = leaderboard(&records, PostingMetric::Total, 1);
//! assert_eq!(top[0].company, "Acme");
//! ```

pub mod company;
mod error;
mod load;
pub mod location;
mod model;
pub mod series;

pub use error::{DataError, Result};
pub use load::{load_companies, load_locations, load_series};
pub use model::{CompanyRecord, LocationRecord, MonthlyPoint};
