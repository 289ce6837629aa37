//! Row encoder: content rows → length-prefixed binary rows.
//!
//! # Fallback policy
//!
//! Each non-comment column is parsed and written by its codec, in column
//! order. When a cell fails:
//!
//! 1. identifier column, or no default configured → [`EncodeError::InvalidCell`]
//! 2. otherwise the default text is encoded instead and a [`FallbackNotice`]
//!    is recorded; if the default fails too → [`EncodeError::InvalidDefault`]
//!
//! Any error aborts the whole table. No partial blob is returned.

use crate::blob::{self, BlobFormat};
use crate::codec::{ColumnCodec, ParseError, WriteError};
use crate::error::{ErrorSeverity, TableError};
use crate::matrix::RawMatrix;
use crate::schema::{ColumnSchema, Schema, SchemaFingerprint};
use crate::varint;

/// Why a single cell could not be encoded.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CellFailure {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Write(#[from] WriteError),
}

/// A cell was replaced by its column default.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FallbackNotice {
    /// Matrix row index.
    pub row: usize,
    pub column: usize,
    pub name: String,
    pub type_keyword: String,
    pub raw_text: String,
    pub default_value: String,
    #[cfg_attr(feature = "serde", serde(serialize_with = "serialize_display"))]
    pub reason: CellFailure,
}

#[cfg(feature = "serde")]
fn serialize_display<S: serde::Serializer>(
    reason: &CellFailure,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(reason)
}

/// Fatal encoding errors. `row` is the matrix row index.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    #[error("row {row}, column {column} '{name}' ({type_keyword}): cannot encode '{raw_text}': {reason}")]
    InvalidCell {
        row: usize,
        column: usize,
        name: String,
        type_keyword: String,
        raw_text: String,
        #[source]
        reason: CellFailure,
    },

    #[error(
        "row {row}, column {column} '{name}' ({type_keyword}): cannot encode '{raw_text}', and default '{default_value}' failed too: {reason}"
    )]
    InvalidDefault {
        row: usize,
        column: usize,
        name: String,
        type_keyword: String,
        raw_text: String,
        default_value: String,
        #[source]
        reason: CellFailure,
    },

    #[error("row {row} has {found} cells, schema expects {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("row {row} encodes to {len} bytes, above the u32 length prefix")]
    RowTooLarge { row: usize, len: usize },
}

impl TableError for EncodeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidCell { .. } => "INVALID_CELL",
            Self::InvalidDefault { .. } => "INVALID_DEFAULT",
            Self::RowWidth { .. } => "ROW_WIDTH",
            Self::RowTooLarge { .. } => "ROW_TOO_LARGE",
        }
    }
}

/// Encodes rows against one schema.
#[derive(Debug, Clone, Copy)]
pub struct RowEncoder<'a> {
    schema: &'a Schema,
}

impl<'a> RowEncoder<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self { schema }
    }

    /// Encodes one content row, without its length prefix.
    ///
    /// Fallbacks taken while encoding are appended to `notices`.
    pub fn encode_row(
        &self,
        row: usize,
        cells: &[String],
        notices: &mut Vec<FallbackNotice>,
    ) -> Result<Vec<u8>, EncodeError> {
        let expected = self.schema.columns().len();
        if cells.len() != expected {
            return Err(EncodeError::RowWidth {
                row,
                expected,
                found: cells.len(),
            });
        }

        let mut bytes = Vec::new();
        for (column, codec) in self.schema.encoded_codecs() {
            let raw_text = cells[column.index].as_str();
            let mark = bytes.len();

            let Err(reason) = encode_cell(codec.as_ref(), raw_text, &mut bytes) else {
                continue;
            };
            bytes.truncate(mark);

            let default_value = match (&column.default_value, column.is_identifier) {
                (Some(default_value), false) => default_value,
                _ => {
                    return Err(EncodeError::InvalidCell {
                        row,
                        column: column.index,
                        name: column.name.clone(),
                        type_keyword: column.type_keyword.clone(),
                        raw_text: raw_text.to_owned(),
                        reason,
                    });
                }
            };

            encode_cell(codec.as_ref(), default_value, &mut bytes).map_err(|default_reason| {
                EncodeError::InvalidDefault {
                    row,
                    column: column.index,
                    name: column.name.clone(),
                    type_keyword: column.type_keyword.clone(),
                    raw_text: raw_text.to_owned(),
                    default_value: default_value.clone(),
                    reason: default_reason,
                }
            })?;
            notices.push(fallback_notice(row, column, raw_text, default_value, reason));
        }

        Ok(bytes)
    }
}

fn encode_cell(codec: &dyn ColumnCodec, text: &str, sink: &mut Vec<u8>) -> Result<(), CellFailure> {
    let value = codec.parse(text)?;
    codec.write(&value, sink)?;
    Ok(())
}

fn fallback_notice(
    row: usize,
    column: &ColumnSchema,
    raw_text: &str,
    default_value: &str,
    reason: CellFailure,
) -> FallbackNotice {
    FallbackNotice {
        row,
        column: column.index,
        name: column.name.clone(),
        type_keyword: column.type_keyword.clone(),
        raw_text: raw_text.to_owned(),
        default_value: default_value.to_owned(),
        reason,
    }
}

/// A fully encoded table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedTable {
    pub blob: Vec<u8>,
    /// Number of encoded rows.
    pub rows: usize,
    pub fallbacks: Vec<FallbackNotice>,
    pub format: BlobFormat,
    pub fingerprint: SchemaFingerprint,
}

/// Encodes every non-comment content row of `matrix`.
pub fn encode_table(
    matrix: &RawMatrix,
    schema: &Schema,
    format: BlobFormat,
) -> Result<EncodedTable, EncodeError> {
    let encoder = RowEncoder::new(schema);
    let fingerprint = schema.fingerprint();

    let mut blob = Vec::new();
    blob::write_header(&mut blob, format, fingerprint);

    let mut fallbacks = Vec::new();
    let mut rows = 0;
    for (index, cells) in matrix.content_rows(schema.content_start_row()) {
        let bytes = encoder.encode_row(index, cells, &mut fallbacks)?;
        let len = u32::try_from(bytes.len()).map_err(|_| EncodeError::RowTooLarge {
            row: index,
            len: bytes.len(),
        })?;
        varint::write_u32(&mut blob, len);
        blob.extend_from_slice(&bytes);
        rows += 1;
    }

    Ok(EncodedTable {
        blob,
        rows,
        fallbacks,
        format,
        fingerprint,
    })
}
