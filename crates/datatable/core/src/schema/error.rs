//! Structural errors raised while loading a matrix or building its schema.

use crate::codec::LookupError;
use crate::error::{ErrorSeverity, TableError};

/// The source text or its metadata rows are malformed.
///
/// Every variant aborts the table; nothing is encoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("row {row} has {found} columns, row 0 has {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("{what} index {value} is negative")]
    NegativeIndex { what: &'static str, value: i64 },

    #[error("{what} {row} is out of range, table has {row_count} rows")]
    RowOutOfRange {
        what: &'static str,
        row: usize,
        row_count: usize,
    },

    #[error("content start row {row} is past the end of the table ({row_count} rows)")]
    ContentStartOutOfRange { row: usize, row_count: usize },

    #[error("identifier column {column} is out of range, table has {column_count} columns")]
    ColumnOutOfRange { column: usize, column_count: usize },

    #[error("column {column} ('{name}'): {source}")]
    UnknownType {
        column: usize,
        name: String,
        #[source]
        source: LookupError,
    },

    #[error("column {column} has invalid name '{name}'")]
    InvalidColumnName { column: usize, name: String },

    #[error("column name '{name}' appears in columns {first} and {second}")]
    DuplicateColumnName {
        name: String,
        first: usize,
        second: usize,
    },

    #[error("row layout needs exactly one identifier field, found {found}")]
    IdentifierCount { found: usize },
}

impl TableError for SchemaError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::RaggedRow { .. } => "RAGGED_ROW",
            Self::NegativeIndex { .. } => "NEGATIVE_INDEX",
            Self::RowOutOfRange { .. } => "ROW_OUT_OF_RANGE",
            Self::ContentStartOutOfRange { .. } => "CONTENT_START_OUT_OF_RANGE",
            Self::ColumnOutOfRange { .. } => "COLUMN_OUT_OF_RANGE",
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::InvalidColumnName { .. } => "INVALID_COLUMN_NAME",
            Self::DuplicateColumnName { .. } => "DUPLICATE_COLUMN_NAME",
            Self::IdentifierCount { .. } => "IDENTIFIER_COUNT",
        }
    }
}
