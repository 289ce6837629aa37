//! Row decoder: length-prefixed binary rows → [`Record`]s.
//!
//! Decoding mirrors the encoder field for field using the same [`RowLayout`].
//! Everything is strict: a truncated varint, a length prefix running past the
//! blob, a read past the row's declared length, invalid UTF-8 or unread bytes
//! left inside a row all abort the table.

use crate::blob::{self, BlobFormat};
use crate::codec::ParseError;
use crate::error::{ErrorSeverity, TableError};
use crate::matrix::RawMatrix;
use crate::reader::RowReader;
use crate::record::Record;
use crate::schema::{RowLayout, Schema, SchemaFingerprint};
use crate::value::Value;
use crate::varint::{self, VarintError};

/// Fatal decoding errors.
///
/// Offsets inside [`Field`](Self::Field) are relative to the row; frame
/// offsets are relative to the row stream.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("read of {needed} bytes at offset {offset} with {remaining} left")]
    UnexpectedEnd {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("bad varint at offset {offset}: {source}")]
    Varint {
        offset: usize,
        #[source]
        source: VarintError,
    },

    #[error("invalid UTF-8 at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("invalid boolean byte {byte:#04x} at offset {offset}")]
    InvalidBool { offset: usize, byte: u8 },

    #[error("{keyword} columns cannot be decoded")]
    NotDecodable { keyword: String },

    #[error("row {row} at offset {offset} declares {length} bytes, {remaining} left in blob")]
    RowOverrun {
        row: usize,
        offset: usize,
        length: usize,
        remaining: usize,
    },

    #[error("row {row} leaves {unread} bytes unread")]
    TrailingBytes { row: usize, unread: usize },

    #[error("row {row}, field '{field}': {source}")]
    Field {
        row: usize,
        field: String,
        #[source]
        source: Box<DecodeError>,
    },

    #[error("row {row}: identifier decoded as {found}, expected int")]
    InvalidIdentifier { row: usize, found: &'static str },

    #[error("blob has no DTB1 fingerprint header")]
    MissingHeader,

    #[error("blob fingerprint {found} does not match row layout {expected}")]
    FingerprintMismatch {
        expected: SchemaFingerprint,
        found: SchemaFingerprint,
    },

    #[error("source columns (fingerprint {found}) do not match row layout {expected}")]
    LayoutMismatch {
        expected: SchemaFingerprint,
        found: SchemaFingerprint,
    },

    #[error("row {row}, field '{field}': {source}")]
    TextCell {
        row: usize,
        field: String,
        #[source]
        source: ParseError,
    },
}

impl TableError for DecodeError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnexpectedEnd { .. } => "UNEXPECTED_END",
            Self::Varint { .. } => "BAD_VARINT",
            Self::InvalidUtf8 { .. } => "INVALID_UTF8",
            Self::InvalidBool { .. } => "INVALID_BOOL",
            Self::NotDecodable { .. } => "NOT_DECODABLE",
            Self::RowOverrun { .. } => "ROW_OVERRUN",
            Self::TrailingBytes { .. } => "TRAILING_BYTES",
            Self::Field { source, .. } => source.error_code(),
            Self::InvalidIdentifier { .. } => "INVALID_IDENTIFIER",
            Self::MissingHeader => "MISSING_HEADER",
            Self::FingerprintMismatch { .. } => "FINGERPRINT_MISMATCH",
            Self::LayoutMismatch { .. } => "LAYOUT_MISMATCH",
            Self::TextCell { .. } => "TEXT_CELL",
        }
    }
}

/// Iterator over the `(varint length, bytes)` frames of a row stream.
///
/// Yields `(row ordinal, row bytes)`. Stops after the first error.
#[derive(Debug, Clone)]
pub struct RowFrames<'a> {
    data: &'a [u8],
    position: usize,
    row: usize,
    failed: bool,
}

impl<'a> RowFrames<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            position: 0,
            row: 0,
            failed: false,
        }
    }

    fn next_frame(&mut self) -> Result<&'a [u8], DecodeError> {
        let offset = self.position;
        let (length, read) = varint::read_u32(&self.data[offset..])
            .map_err(|source| DecodeError::Varint { offset, source })?;
        let length = length as usize;

        let start = offset + read;
        let remaining = self.data.len() - start;
        if length > remaining {
            return Err(DecodeError::RowOverrun {
                row: self.row,
                offset,
                length,
                remaining,
            });
        }

        self.position = start + length;
        Ok(&self.data[start..self.position])
    }
}

impl<'a> Iterator for RowFrames<'a> {
    type Item = Result<(usize, &'a [u8]), DecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.position >= self.data.len() {
            return None;
        }

        let row = self.row;
        match self.next_frame() {
            Ok(bytes) => {
                self.row += 1;
                Some(Ok((row, bytes)))
            }
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}

/// Decodes rows against one layout.
#[derive(Debug, Clone, Copy)]
pub struct RowDecoder<'a> {
    layout: &'a RowLayout,
}

impl<'a> RowDecoder<'a> {
    pub fn new(layout: &'a RowLayout) -> Self {
        Self { layout }
    }

    /// Decodes the bytes of one row (without its length prefix).
    pub fn decode_row(&self, row: usize, bytes: &[u8]) -> Result<Record, DecodeError> {
        let mut reader = RowReader::new(bytes);
        let mut values = Vec::with_capacity(self.layout.len());
        for field in self.layout.fields() {
            let value = field
                .codec
                .read(&mut reader)
                .map_err(|source| DecodeError::Field {
                    row,
                    field: field.name.clone(),
                    source: Box::new(source),
                })?;
            values.push(value);
        }

        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes {
                row,
                unread: reader.remaining(),
            });
        }

        record(self.layout, row, values)
    }
}

fn record(layout: &RowLayout, row: usize, values: Vec<Value>) -> Result<Record, DecodeError> {
    let id = match values.get(layout.identifier_position()) {
        Some(Value::I32(id)) => *id,
        Some(other) => {
            return Err(DecodeError::InvalidIdentifier {
                row,
                found: other.kind_name(),
            });
        }
        None => {
            return Err(DecodeError::InvalidIdentifier { row, found: "nothing" });
        }
    };
    Ok(Record::new(id, layout.names(), values))
}

/// Decodes every row of `blob`.
///
/// For [`BlobFormat::Fingerprinted`] the header must carry the layout's
/// fingerprint.
pub fn decode_table(
    blob: &[u8],
    layout: &RowLayout,
    format: BlobFormat,
) -> Result<Vec<Record>, DecodeError> {
    let rows = blob::split_header(blob, format, layout.fingerprint())?;
    let decoder = RowDecoder::new(layout);

    RowFrames::new(rows)
        .map(|frame| {
            let (row, bytes) = frame?;
            decoder.decode_row(row, bytes)
        })
        .collect()
}

/// Builds records straight from source text, skipping the binary form.
///
/// Cells are parsed with the schema's codecs and no default fallback. The
/// schema must describe the same fields as `expected`.
pub fn decode_text(
    matrix: &RawMatrix,
    schema: &Schema,
    expected: &RowLayout,
) -> Result<Vec<Record>, DecodeError> {
    let found = schema.fingerprint();
    if found != expected.fingerprint() {
        return Err(DecodeError::LayoutMismatch {
            expected: expected.fingerprint(),
            found,
        });
    }

    let layout = schema.row_layout();
    matrix
        .content_rows(schema.content_start_row())
        .map(|(row, cells)| {
            let values = layout
                .fields()
                .iter()
                .map(|field| {
                    let text = cells.get(field.column).map_or("", String::as_str);
                    field
                        .codec
                        .parse(text)
                        .map_err(|source| DecodeError::TextCell {
                            row,
                            field: field.name.clone(),
                            source,
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            record(expected, row, values)
        })
        .collect()
}
