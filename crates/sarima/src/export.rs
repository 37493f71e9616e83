//! Forecast CSV export.
//!
//! Renders a forecast as the two-column `date,forecast` table offered for
//! download by the dashboard.

use std::io::Write;

use crate::error::{Result, SarimaError};
use crate::pipeline::ForecastPoint;

/// Write `date,forecast` rows for every point.
pub fn write_csv<W: Write>(points: &[ForecastPoint], writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["date", "forecast"])
        .map_err(export_err)?;
    for point in points {
        out.write_record([
            point.month.format("%Y-%m-%d").to_string(),
            format!("{:.2}", point.value),
        ])
        .map_err(export_err)?;
    }
    out.flush().map_err(|e| SarimaError::ExportFailed(e.to_string()))
}

/// The CSV document as a string, for HTTP responses.
pub fn to_csv_string(points: &[ForecastPoint]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(points, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| SarimaError::ExportFailed(e.to_string()))
}

fn export_err(e: csv::Error) -> SarimaError {
    SarimaError::ExportFailed(e.to_string())
}
