//! Blob framing options.
//!
//! A [`BlobFormat::Raw`] blob is the bare row stream: `(varint length, row
//! bytes)` repeated, no header, no row count. A [`BlobFormat::Fingerprinted`]
//! blob prefixes that stream with:
//!
//! ```text
//! offset  size  field
//! 0       4     magic  b"DTB1"
//! 4       8     schema fingerprint (truncated SHA-256 of the row layout)
//! 12      ..    row stream
//! ```

use crate::decoder::DecodeError;
use crate::schema::SchemaFingerprint;

/// Magic bytes opening a fingerprinted blob.
pub const BLOB_MAGIC: &[u8; 4] = b"DTB1";

/// Total size of the fingerprint header.
pub const HEADER_LEN: usize = BLOB_MAGIC.len() + SchemaFingerprint::LEN;

/// How the row stream is framed on disk.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum BlobFormat {
    /// Bare row stream.
    #[default]
    Raw,
    /// Row stream behind a magic + schema fingerprint header.
    Fingerprinted,
}

/// Writes the header for `format` into an empty blob.
pub fn write_header(blob: &mut Vec<u8>, format: BlobFormat, fingerprint: SchemaFingerprint) {
    if format == BlobFormat::Fingerprinted {
        blob.extend_from_slice(BLOB_MAGIC);
        blob.extend_from_slice(fingerprint.as_bytes());
    }
}

/// Checks the header for `format` and returns the row stream behind it.
pub fn split_header(
    blob: &[u8],
    format: BlobFormat,
    expected: SchemaFingerprint,
) -> Result<&[u8], DecodeError> {
    match format {
        BlobFormat::Raw => Ok(blob),
        BlobFormat::Fingerprinted => {
            let Some((magic, rest)) = blob.split_first_chunk::<4>() else {
                return Err(DecodeError::MissingHeader);
            };
            if magic != BLOB_MAGIC {
                return Err(DecodeError::MissingHeader);
            }
            let Some((found, rows)) = rest.split_first_chunk::<{ SchemaFingerprint::LEN }>() else {
                return Err(DecodeError::MissingHeader);
            };
            let found = SchemaFingerprint(*found);
            if found != expected {
                return Err(DecodeError::FingerprintMismatch { expected, found });
            }
            Ok(rows)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRINT: SchemaFingerprint = SchemaFingerprint([1, 2, 3, 4, 5, 6, 7, 8]);

    #[test]
    fn raw_has_no_header() {
        let mut blob = Vec::new();
        write_header(&mut blob, BlobFormat::Raw, PRINT);
        assert!(blob.is_empty());
        assert_eq!(split_header(&[7, 7], BlobFormat::Raw, PRINT).unwrap(), &[7, 7]);
    }

    #[test]
    fn fingerprinted_header_round_trip() {
        let mut blob = Vec::new();
        write_header(&mut blob, BlobFormat::Fingerprinted, PRINT);
        assert_eq!(blob.len(), HEADER_LEN);
        blob.extend_from_slice(&[9, 9]);
        assert_eq!(
            split_header(&blob, BlobFormat::Fingerprinted, PRINT).unwrap(),
            &[9, 9]
        );
    }

    #[test]
    fn mismatched_fingerprint_is_rejected() {
        let mut blob = Vec::new();
        write_header(&mut blob, BlobFormat::Fingerprinted, PRINT);
        let other = SchemaFingerprint([0; 8]);
        assert_eq!(
            split_header(&blob, BlobFormat::Fingerprinted, other),
            Err(DecodeError::FingerprintMismatch {
                expected: other,
                found: PRINT
            })
        );
    }

    #[test]
    fn missing_header_is_rejected() {
        assert_eq!(
            split_header(&[2, 0, 0], BlobFormat::Fingerprinted, PRINT),
            Err(DecodeError::MissingHeader)
        );
        assert_eq!(
            split_header(b"DTB1\x01", BlobFormat::Fingerprinted, PRINT),
            Err(DecodeError::MissingHeader)
        );
    }

    #[test]
    fn format_parses_from_text() {
        assert_eq!("Fingerprinted".parse::<BlobFormat>().unwrap(), BlobFormat::Fingerprinted);
        assert_eq!(BlobFormat::Raw.to_string(), "raw");
    }
}
