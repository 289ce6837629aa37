//! Scalar codecs: integers, floats, booleans, characters, strings, timestamps
//! and the comment marker.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::{ColumnCodec, ParseError, WriteError, parse_float, parse_int};
use crate::decoder::DecodeError;
use crate::reader::RowReader;
use crate::value::{Timestamp, Value};
use crate::varint;

/// Fixed-width little-endian numeric codec.
macro_rules! fixed_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident, $keyword:literal, $parse:ident, $read:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl ColumnCodec for $name {
            fn type_keyword(&self) -> &str {
                $keyword
            }

            fn parse(&self, text: &str) -> Result<Value, ParseError> {
                $parse::<$ty>(text, $keyword).map(Value::$variant)
            }

            fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
                match value {
                    Value::$variant(v) => {
                        sink.extend_from_slice(&v.to_le_bytes());
                        Ok(())
                    }
                    other => Err(WriteError::mismatch($keyword, other)),
                }
            }

            fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
                reader.$read().map(Value::$variant)
            }
        }
    };
}

/// Varint codec; signed values travel as their unsigned bit pattern.
macro_rules! varint_codec {
    ($(#[$meta:meta])* $name:ident, $ty:ty, $variant:ident, $keyword:literal, $wire:ty, $write:path, $read:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl ColumnCodec for $name {
            fn type_keyword(&self) -> &str {
                $keyword
            }

            fn parse(&self, text: &str) -> Result<Value, ParseError> {
                parse_int::<$ty>(text, $keyword).map(Value::$variant)
            }

            fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
                match value {
                    Value::$variant(v) => {
                        $write(sink, *v as $wire);
                        Ok(())
                    }
                    other => Err(WriteError::mismatch($keyword, other)),
                }
            }

            fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
                reader.$read().map(|raw| Value::$variant(raw as $ty))
            }
        }
    };
}

fixed_codec!(
    /// `byte`: one unsigned byte.
    ByteCodec, u8, U8, "byte", parse_int, read_u8
);
fixed_codec!(
    /// `sbyte`: one signed byte.
    SByteCodec, i8, I8, "sbyte", parse_int, read_i8
);
fixed_codec!(
    /// `short`: two bytes, little-endian.
    Int16Codec, i16, I16, "short", parse_int, read_i16
);
fixed_codec!(
    /// `ushort`: two bytes, little-endian.
    UInt16Codec, u16, U16, "ushort", parse_int, read_u16
);
fixed_codec!(
    /// `float`: IEEE-754 single precision, little-endian.
    FloatCodec, f32, F32, "float", parse_float, read_f32
);
fixed_codec!(
    /// `double`: IEEE-754 double precision, little-endian.
    DoubleCodec, f64, F64, "double", parse_float, read_f64
);

varint_codec!(
    /// `int`: 32-bit signed varint.
    Int32Codec, i32, I32, "int", u32, varint::write_u32, read_varint_u32
);
varint_codec!(
    /// `uint`: 32-bit unsigned varint.
    UInt32Codec, u32, U32, "uint", u32, varint::write_u32, read_varint_u32
);
varint_codec!(
    /// `long`: 64-bit signed varint.
    Int64Codec, i64, I64, "long", u64, varint::write_u64, read_varint_u64
);
varint_codec!(
    /// `ulong`: 64-bit unsigned varint.
    UInt64Codec, u64, U64, "ulong", u64, varint::write_u64, read_varint_u64
);

/// Identifier column codec.
///
/// Same wire form as `int`; the schema builder assigns it to the identifier
/// column regardless of what the type row says.
#[derive(Clone, Copy, Debug, Default)]
pub struct IdCodec;

impl IdCodec {
    pub const KEYWORD: &'static str = "id";
}

impl ColumnCodec for IdCodec {
    fn type_keyword(&self) -> &str {
        Self::KEYWORD
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        parse_int::<i32>(text, Self::KEYWORD).map(Value::I32)
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        Int32Codec.write(value, sink)
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        Int32Codec.read(reader)
    }

    fn is_identifier(&self) -> bool {
        true
    }
}

/// `bool`: one byte, `0` or `1`.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoolCodec;

impl ColumnCodec for BoolCodec {
    fn type_keyword(&self) -> &str {
        "bool"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") || trimmed == "1" {
            Ok(Value::Bool(true))
        } else if trimmed.eq_ignore_ascii_case("false") || trimmed == "0" {
            Ok(Value::Bool(false))
        } else {
            Err(ParseError::invalid("bool", text))
        }
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        match value {
            Value::Bool(v) => {
                sink.push(u8::from(*v));
                Ok(())
            }
            other => Err(WriteError::mismatch("bool", other)),
        }
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        reader.read_bool().map(Value::Bool)
    }
}

/// `char`: a single Unicode scalar, written as its UTF-8 bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct CharCodec;

impl ColumnCodec for CharCodec {
    fn type_keyword(&self) -> &str {
        "char"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(Value::Char(c)),
            _ => Err(ParseError::invalid("char", text)),
        }
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        match value {
            Value::Char(c) => {
                let mut buf = [0u8; 4];
                sink.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                Ok(())
            }
            other => Err(WriteError::mismatch("char", other)),
        }
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        reader.read_char().map(Value::Char)
    }
}

/// `string`: varint byte length followed by UTF-8.
///
/// Cell text is taken verbatim; an empty cell is the empty string.
#[derive(Clone, Copy, Debug, Default)]
pub struct StringCodec;

impl ColumnCodec for StringCodec {
    fn type_keyword(&self) -> &str {
        "string"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        Ok(Value::String(text.to_owned()))
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        match value {
            Value::String(s) => {
                let len = u32::try_from(s.len())
                    .map_err(|_| WriteError::mismatch("string", value))?;
                varint::write_u32(sink, len);
                sink.extend_from_slice(s.as_bytes());
                Ok(())
            }
            other => Err(WriteError::mismatch("string", other)),
        }
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        reader.read_string().map(Value::String)
    }

    fn is_string(&self) -> bool {
        true
    }
}

/// `datetime`: 100 ns ticks since `0001-01-01`, eight bytes little-endian.
///
/// Accepts a raw tick count, RFC 3339, `YYYY-MM-DD HH:MM:SS`,
/// `YYYY-MM-DDTHH:MM:SS` or a bare `YYYY-MM-DD`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TimestampCodec;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

impl TimestampCodec {
    fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
        if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
            return Some(datetime.naive_utc());
        }
        NAIVE_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                NaiveDate::parse_from_str(text, "%Y-%m-%d")
                    .ok()
                    .and_then(|date| date.and_hms_opt(0, 0, 0))
            })
    }
}

impl ColumnCodec for TimestampCodec {
    fn type_keyword(&self) -> &str {
        "datetime"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let trimmed = text.trim();
        if let Ok(ticks) = trimmed.parse::<i64>() {
            if ticks < 0 {
                return Err(ParseError::out_of_range("datetime", text));
            }
            return Ok(Value::Timestamp(Timestamp::from_ticks(ticks)));
        }

        let datetime =
            Self::parse_datetime(trimmed).ok_or_else(|| ParseError::invalid("datetime", text))?;
        Timestamp::from_datetime(datetime)
            .map(Value::Timestamp)
            .ok_or_else(|| ParseError::out_of_range("datetime", text))
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        match value {
            Value::Timestamp(ts) => {
                sink.extend_from_slice(&ts.ticks().to_le_bytes());
                Ok(())
            }
            other => Err(WriteError::mismatch("datetime", other)),
        }
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        reader
            .read_i64()
            .map(|ticks| Value::Timestamp(Timestamp::from_ticks(ticks)))
    }
}

/// Marks a documentation-only column. Never parsed, written or read.
#[derive(Clone, Copy, Debug, Default)]
pub struct CommentCodec;

impl CommentCodec {
    pub const KEYWORD: &'static str = "comment";
}

impl ColumnCodec for CommentCodec {
    fn type_keyword(&self) -> &str {
        Self::KEYWORD
    }

    fn parse(&self, _text: &str) -> Result<Value, ParseError> {
        Err(ParseError::NotEncodable {
            keyword: Self::KEYWORD.to_owned(),
        })
    }

    fn write(&self, _value: &Value, _sink: &mut Vec<u8>) -> Result<(), WriteError> {
        Err(WriteError::NotEncodable {
            keyword: Self::KEYWORD.to_owned(),
        })
    }

    fn read(&self, _reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        Err(DecodeError::NotDecodable {
            keyword: Self::KEYWORD.to_owned(),
        })
    }

    fn is_comment(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(codec: &dyn ColumnCodec, text: &str) -> Vec<u8> {
        let value = codec.parse(text).unwrap();
        let mut sink = Vec::new();
        codec.write(&value, &mut sink).unwrap();
        sink
    }

    fn decode(codec: &dyn ColumnCodec, bytes: &[u8]) -> Value {
        let mut reader = RowReader::new(bytes);
        let value = codec.read(&mut reader).unwrap();
        assert!(reader.is_empty(), "{} left bytes unread", codec.type_keyword());
        value
    }

    #[test]
    fn int_uses_varint_bit_pattern() {
        assert_eq!(encode(&Int32Codec, "300"), vec![0xAC, 0x02]);
        let negative = encode(&Int32Codec, "-1");
        assert_eq!(negative, vec![0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
        assert_eq!(decode(&Int32Codec, &negative), Value::I32(-1));
    }

    #[test]
    fn long_round_trips_extremes() {
        for text in ["0", "-9223372036854775808", "9223372036854775807"] {
            let bytes = encode(&Int64Codec, text);
            assert_eq!(decode(&Int64Codec, &bytes).to_string(), text);
        }
    }

    #[test]
    fn fixed_width_numbers_are_little_endian() {
        assert_eq!(encode(&Int16Codec, "-2"), vec![0xFE, 0xFF]);
        assert_eq!(encode(&UInt16Codec, "513"), vec![0x01, 0x02]);
        assert_eq!(encode(&FloatCodec, "12.5"), 12.5f32.to_le_bytes().to_vec());
        assert_eq!(encode(&DoubleCodec, "0.1"), 0.1f64.to_le_bytes().to_vec());
        assert_eq!(encode(&SByteCodec, "-128"), vec![0x80]);
    }

    #[test]
    fn byte_rejects_out_of_range() {
        assert!(matches!(
            ByteCodec.parse("256"),
            Err(ParseError::OutOfRange { expected: "byte", .. })
        ));
    }

    #[test]
    fn bool_accepts_words_and_digits() {
        assert_eq!(BoolCodec.parse("True"), Ok(Value::Bool(true)));
        assert_eq!(BoolCodec.parse("0"), Ok(Value::Bool(false)));
        assert!(BoolCodec.parse("yes").is_err());
        assert_eq!(encode(&BoolCodec, "true"), vec![1]);
    }

    #[test]
    fn char_is_exactly_one_scalar() {
        assert_eq!(CharCodec.parse("é"), Ok(Value::Char('é')));
        assert!(CharCodec.parse("").is_err());
        assert!(CharCodec.parse("ab").is_err());
        let bytes = encode(&CharCodec, "€");
        assert_eq!(bytes.len(), 3);
        assert_eq!(decode(&CharCodec, &bytes), Value::Char('€'));
    }

    #[test]
    fn string_is_length_prefixed_and_verbatim() {
        assert_eq!(encode(&StringCodec, "Scout"), b"\x05Scout".to_vec());
        assert_eq!(encode(&StringCodec, ""), vec![0]);
        assert_eq!(StringCodec.parse(" padded "), Ok(Value::String(" padded ".into())));
        assert!(StringCodec.is_string());
    }

    #[test]
    fn datetime_accepts_ticks_and_calendar_forms() {
        let expected = Value::Timestamp(Timestamp::from_ticks(630_822_816_000_000_000));
        assert_eq!(TimestampCodec.parse("630822816000000000"), Ok(expected.clone()));
        assert_eq!(TimestampCodec.parse("2000-01-01"), Ok(expected.clone()));
        assert_eq!(TimestampCodec.parse("2000-01-01 00:00:00"), Ok(expected.clone()));
        assert_eq!(TimestampCodec.parse("2000-01-01T00:00:00Z"), Ok(expected.clone()));
        assert_eq!(TimestampCodec.parse("2000-01-01T01:00:00+01:00"), Ok(expected));
        assert!(TimestampCodec.parse("yesterday").is_err());
        assert!(TimestampCodec.parse("-5").is_err());
    }

    #[test]
    fn datetime_is_eight_bytes() {
        let bytes = encode(&TimestampCodec, "1");
        assert_eq!(bytes, 1i64.to_le_bytes().to_vec());
        assert_eq!(decode(&TimestampCodec, &bytes), Value::Timestamp(Timestamp::from_ticks(1)));
    }

    #[test]
    fn id_codec_matches_int_wire_form() {
        assert!(IdCodec.is_identifier());
        assert_eq!(encode(&IdCodec, "10001"), encode(&Int32Codec, "10001"));
    }

    #[test]
    fn write_rejects_foreign_values() {
        let mut sink = Vec::new();
        assert!(FloatCodec.write(&Value::I32(1), &mut sink).is_err());
        assert!(sink.is_empty());
    }

    #[test]
    fn comment_never_encodes() {
        assert!(CommentCodec.is_comment());
        assert!(CommentCodec.parse("anything").is_err());
        assert!(CommentCodec.write(&Value::Bool(true), &mut Vec::new()).is_err());
    }
}
