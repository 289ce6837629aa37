//! Column codecs: one object per column type owning its text and wire forms.
//!
//! A [`ColumnCodec`] parses the canonical text of a cell into a [`Value`],
//! writes that value to the row buffer, and reads it back from an encoded row.
//! `write` and `read` are exact inverses; the encoder and decoder never
//! special-case a type.
//!
//! Codecs are looked up by keyword through the [`TypeRegistry`]. The standard
//! set lives in [`primitive`] and [`composite`].

pub mod composite;
pub mod primitive;
pub mod registry;

pub use composite::{
    Color32Codec, ColorCodec, QuaternionCodec, RectCodec, Vector2Codec, Vector3Codec,
    Vector4Codec,
};
pub use primitive::{
    BoolCodec, ByteCodec, CharCodec, CommentCodec, DoubleCodec, FloatCodec, IdCodec, Int16Codec,
    Int32Codec, Int64Codec, SByteCodec, StringCodec, TimestampCodec, UInt16Codec, UInt32Codec,
    UInt64Codec,
};
pub use registry::{LookupError, TypeRegistry};

use core::fmt;
use core::num::{IntErrorKind, ParseIntError};
use core::str::FromStr;

use crate::decoder::DecodeError;
use crate::error::{ErrorSeverity, TableError};
use crate::reader::RowReader;
use crate::value::Value;

/// Parse, write and read capability bound to one column type.
pub trait ColumnCodec: Send + Sync + fmt::Debug {
    /// Canonical keyword this codec is registered under.
    fn type_keyword(&self) -> &str;

    /// Parses the canonical text form of a cell.
    fn parse(&self, text: &str) -> Result<Value, ParseError>;

    /// Appends the wire form of `value` to `sink`.
    ///
    /// On error the sink may hold a partial write; callers truncate.
    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError>;

    /// Reads one value back from an encoded row.
    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError>;

    /// True for the identifier codec.
    fn is_identifier(&self) -> bool {
        false
    }

    /// True for codecs that mark a column as documentation only.
    fn is_comment(&self) -> bool {
        false
    }

    /// True for codecs whose cells feed the string pool.
    fn is_string(&self) -> bool {
        false
    }
}

/// A cell's text is not a valid instance of the column type.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("'{text}' is not a valid {expected}")]
    Invalid { expected: &'static str, text: String },

    #[error("'{text}' is out of range for {expected}")]
    OutOfRange { expected: &'static str, text: String },

    #[error("'{text}' has {found} components, {expected} expects {arity}")]
    Arity {
        expected: &'static str,
        arity: usize,
        found: usize,
        text: String,
    },

    #[error("{keyword} columns carry no value")]
    NotEncodable { keyword: String },
}

impl ParseError {
    pub fn invalid(expected: &'static str, text: &str) -> Self {
        Self::Invalid {
            expected,
            text: text.to_owned(),
        }
    }

    pub fn out_of_range(expected: &'static str, text: &str) -> Self {
        Self::OutOfRange {
            expected,
            text: text.to_owned(),
        }
    }
}

impl TableError for ParseError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Invalid { .. } => "PARSE_INVALID",
            Self::OutOfRange { .. } => "PARSE_OUT_OF_RANGE",
            Self::Arity { .. } => "PARSE_ARITY",
            Self::NotEncodable { .. } => "PARSE_NOT_ENCODABLE",
        }
    }
}

/// A value could not be written by the codec it was handed to.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    #[error("{codec} codec cannot write a {found} value")]
    TypeMismatch { codec: String, found: &'static str },

    #[error("{keyword} columns are never encoded")]
    NotEncodable { keyword: String },
}

impl WriteError {
    pub fn mismatch(codec: &str, found: &Value) -> Self {
        Self::TypeMismatch {
            codec: codec.to_owned(),
            found: found.kind_name(),
        }
    }
}

impl TableError for WriteError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "WRITE_TYPE_MISMATCH",
            Self::NotEncodable { .. } => "WRITE_NOT_ENCODABLE",
        }
    }
}

/// Parses a decimal integer, telling overflow apart from malformed text.
pub(crate) fn parse_int<T>(text: &str, expected: &'static str) -> Result<T, ParseError>
where
    T: FromStr<Err = ParseIntError>,
{
    let trimmed = text.trim();
    trimmed.parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ParseError::out_of_range(expected, text)
        }
        _ => ParseError::invalid(expected, text),
    })
}

/// Parses a decimal floating-point number.
pub(crate) fn parse_float<T: FromStr>(text: &str, expected: &'static str) -> Result<T, ParseError> {
    text.trim()
        .parse::<T>()
        .map_err(|_| ParseError::invalid(expected, text))
}

/// Splits comma-separated components and parses each with `parse_one`.
///
/// The component count must be exactly `N`.
pub(crate) fn parse_components<T, const N: usize>(
    text: &str,
    expected: &'static str,
    parse_one: impl Fn(&str) -> Result<T, ParseError>,
) -> Result<[T; N], ParseError>
where
    T: Copy + Default,
{
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() != N {
        return Err(ParseError::Arity {
            expected,
            arity: N,
            found: parts.len(),
            text: text.to_owned(),
        });
    }

    let mut out = [T::default(); N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = parse_one(part).map_err(|_| ParseError::invalid(expected, text))?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_int_classifies_failures() {
        assert_eq!(parse_int::<i16>(" 42 ", "short"), Ok(42));
        assert!(matches!(
            parse_int::<i16>("40000", "short"),
            Err(ParseError::OutOfRange { expected: "short", .. })
        ));
        assert!(matches!(
            parse_int::<u8>("-1", "byte"),
            Err(ParseError::Invalid { .. })
        ));
        assert!(matches!(
            parse_int::<i32>("twelve", "int"),
            Err(ParseError::Invalid { .. })
        ));
    }

    #[test]
    fn components_require_exact_arity() {
        let parsed: [f32; 3] =
            parse_components("1, 2.5,-3", "vector3", |s| parse_float(s, "float")).unwrap();
        assert_eq!(parsed, [1.0, 2.5, -3.0]);

        let err = parse_components::<f32, 3>("1,2", "vector3", |s| parse_float(s, "float"))
            .unwrap_err();
        assert!(matches!(err, ParseError::Arity { arity: 3, found: 2, .. }));
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(ParseError::invalid("int", "x").error_code(), "PARSE_INVALID");
        assert!(ParseError::invalid("int", "x").severity().is_recoverable());
        assert_eq!(
            WriteError::mismatch("float", &Value::Bool(true)).to_string(),
            "float codec cannot write a bool value"
        );
    }
}
