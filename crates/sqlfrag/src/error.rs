//! Error types for sqlfrag.

use thiserror::Error;

/// Result type alias for fallible fragment construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Recoverable validation errors raised while constructing fragments.
///
/// These report bad input data and abort construction cleanly. Caller bugs
/// are a different tier: an `embed` template whose marker count does not
/// match the number of supplied fragments panics at construction instead of
/// returning one of these.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// An IN list was given no values.
    #[error("IN list for column `{0}` requires at least one value")]
    EmptyInList(String),

    /// A VALUES clause was given no rows.
    #[error("VALUES requires at least one row")]
    EmptyRows,

    /// A VALUES row contained no values.
    #[error("VALUES row {row} is empty")]
    EmptyRow {
        /// Zero-based index of the offending row.
        row: usize,
    },

    /// A VALUES row length differed from the first row's length.
    #[error("VALUES row {row} has {got} values, expected {expected}")]
    RowLengthMismatch {
        /// Zero-based index of the offending row.
        row: usize,
        /// Length of the first row.
        expected: usize,
        /// Length of the offending row.
        got: usize,
    },

    /// The column list length differed from the row length.
    #[error("{columns} columns were given for rows of {row_len} values")]
    ColumnCountMismatch {
        /// Number of columns supplied.
        columns: usize,
        /// Length of each row.
        row_len: usize,
    },
}
