//! Table loader: delimited text → rectangular matrix of trimmed cells.
//!
//! The matrix keeps every row, metadata rows included. [`MatrixLayout`] says
//! which rows carry names, types, defaults and comments, where content starts
//! and which column holds the identifier.

use crate::schema::SchemaError;

const BOM: char = '\u{feff}';

/// Cell splitting options.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadOptions {
    /// Column separator.
    pub delimiter: char,
    /// Characters stripped from both ends of every cell, all occurrences.
    pub trim_chars: Vec<char>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            trim_chars: vec!['"'],
        }
    }
}

/// Positions of the metadata rows, content range and identifier column.
///
/// All indices are 0-based.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixLayout {
    pub name_row: usize,
    pub type_row: usize,
    pub default_row: Option<usize>,
    pub comment_row: Option<usize>,
    pub content_start_row: usize,
    pub id_column: usize,
}

impl Default for MatrixLayout {
    /// Row 0 and column 0 are reserved for `#` markers; names, types and
    /// comments follow, then content.
    fn default() -> Self {
        Self {
            name_row: 1,
            type_row: 2,
            default_row: None,
            comment_row: Some(3),
            content_start_row: 4,
            id_column: 1,
        }
    }
}

impl MatrixLayout {
    /// Layout with no default or comment row.
    pub const fn new(
        name_row: usize,
        type_row: usize,
        content_start_row: usize,
        id_column: usize,
    ) -> Self {
        Self {
            name_row,
            type_row,
            default_row: None,
            comment_row: None,
            content_start_row,
            id_column,
        }
    }

    pub const fn with_default_row(mut self, row: usize) -> Self {
        self.default_row = Some(row);
        self
    }

    pub const fn with_comment_row(mut self, row: usize) -> Self {
        self.comment_row = Some(row);
        self
    }

    /// Builds a layout from signed indices, rejecting negatives.
    pub fn from_signed(
        name_row: i64,
        type_row: i64,
        default_row: Option<i64>,
        comment_row: Option<i64>,
        content_start_row: i64,
        id_column: i64,
    ) -> Result<Self, SchemaError> {
        fn index(what: &'static str, value: i64) -> Result<usize, SchemaError> {
            usize::try_from(value).map_err(|_| SchemaError::NegativeIndex { what, value })
        }

        Ok(Self {
            name_row: index("name row", name_row)?,
            type_row: index("type row", type_row)?,
            default_row: default_row.map(|r| index("default row", r)).transpose()?,
            comment_row: comment_row.map(|r| index("comment row", r)).transpose()?,
            content_start_row: index("content start row", content_start_row)?,
            id_column: index("id column", id_column)?,
        })
    }

    /// Checks every index against the matrix dimensions.
    pub fn validate(&self, matrix: &RawMatrix) -> Result<(), SchemaError> {
        let row_count = matrix.row_count();
        let metadata = [
            ("name row", Some(self.name_row)),
            ("type row", Some(self.type_row)),
            ("default row", self.default_row),
            ("comment row", self.comment_row),
        ];
        for (what, row) in metadata {
            if let Some(row) = row
                && row >= row_count
            {
                return Err(SchemaError::RowOutOfRange {
                    what,
                    row,
                    row_count,
                });
            }
        }

        if self.content_start_row > row_count {
            return Err(SchemaError::ContentStartOutOfRange {
                row: self.content_start_row,
                row_count,
            });
        }

        if self.id_column >= matrix.column_count() {
            return Err(SchemaError::ColumnOutOfRange {
                column: self.id_column,
                column_count: matrix.column_count(),
            });
        }

        Ok(())
    }
}

/// Rectangular grid of trimmed cells.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawMatrix {
    rows: Vec<Vec<String>>,
    column_count: usize,
}

impl RawMatrix {
    /// Splits `text` into rows and cells.
    ///
    /// A leading byte-order mark is dropped. Every row must have as many cells
    /// as row 0.
    pub fn parse(text: &str, options: &LoadOptions) -> Result<Self, SchemaError> {
        let text = text.strip_prefix(BOM).unwrap_or(text);
        let trim = |c: char| options.trim_chars.contains(&c);

        let mut rows = Vec::new();
        let mut column_count = 0;
        for (index, line) in text.lines().enumerate() {
            let cells: Vec<String> = line
                .split(options.delimiter)
                .map(|cell| cell.trim_matches(trim).to_owned())
                .collect();

            if index == 0 {
                column_count = cells.len();
            } else if cells.len() != column_count {
                return Err(SchemaError::RaggedRow {
                    row: index,
                    expected: column_count,
                    found: cells.len(),
                });
            }
            rows.push(cells);
        }

        Ok(Self { rows, column_count })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn row(&self, index: usize) -> Option<&[String]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows.get(row)?.get(column).map(String::as_str)
    }

    /// True when the row's first cell starts with `#`.
    pub fn is_comment_row(&self, index: usize) -> bool {
        self.cell(index, 0).is_some_and(|cell| cell.starts_with('#'))
    }

    /// Non-comment rows from `start` on, with their matrix index.
    pub fn content_rows(&self, start: usize) -> impl Iterator<Item = (usize, &[String])> + '_ {
        self.rows
            .iter()
            .enumerate()
            .skip(start)
            .filter(|(index, _)| !self.is_comment_row(*index))
            .map(|(index, row)| (index, row.as_slice()))
    }
}

/// Parses `text` and validates `layout` against it.
pub fn load(
    text: &str,
    options: &LoadOptions,
    layout: &MatrixLayout,
) -> Result<RawMatrix, SchemaError> {
    let matrix = RawMatrix::parse(text, options)?;
    layout.validate(&matrix)?;
    Ok(matrix)
}
