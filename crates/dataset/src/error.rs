//! Data loading error types.

use thiserror::Error;

/// Errors raised while loading or validating source tables.
#[derive(Debug, Clone, Error)]
pub enum DataError {
    /// Could not read the source file.
    #[error("Failed to read source: {0}")]
    Io(String),

    /// Malformed CSV input.
    #[error("CSV error: {0}")]
    Csv(String),

    /// A required column is absent from the header row.
    #[error("Missing column '{0}' in source table")]
    MissingColumn(String),

    /// Every row was dropped during cleaning, or the table had no rows.
    #[error("No usable rows in source table '{0}'")]
    EmptyTable(String),

    /// Two series rows resolved to the same month.
    #[error("Duplicate month in series: {0}")]
    DuplicateMonth(String),
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

impl From<std::io::Error> for DataError {
    fn from(e: std::io::Error) -> Self {
        DataError::Io(e.to_string())
    }
}

impl From<csv::Error> for DataError {
    fn from(e: csv::Error) -> Self {
        DataError::Csv(e.to_string())
    }
}
