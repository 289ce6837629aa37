//! Composite codecs: comma-separated text, fixed sequence of components on the
//! wire.
//!
//! | keyword      | text             | wire          |
//! |--------------|------------------|---------------|
//! | `vector2`    | `x,y`            | 2 × f32 LE    |
//! | `vector3`    | `x,y,z`          | 3 × f32 LE    |
//! | `vector4`    | `x,y,z,w`        | 4 × f32 LE    |
//! | `quaternion` | `x,y,z,w`        | 4 × f32 LE    |
//! | `rect`       | `x,y,width,height` | 4 × f32 LE  |
//! | `color`      | `r,g,b,a`        | 4 × f32 LE    |
//! | `color32`    | `r,g,b,a`        | 4 × u8        |

use super::{ColumnCodec, ParseError, WriteError, parse_components, parse_float, parse_int};
use crate::decoder::DecodeError;
use crate::reader::RowReader;
use crate::value::{Color, Color32, Quaternion, Rect, Value, Vector2, Vector3, Vector4};

/// Codec for a struct of `f32` components, written in field order.
macro_rules! float_composite {
    ($(#[$meta:meta])* $name:ident, $ty:ident, $keyword:literal, $arity:literal, [$($field:ident),+]) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name;

        impl ColumnCodec for $name {
            fn type_keyword(&self) -> &str {
                $keyword
            }

            fn parse(&self, text: &str) -> Result<Value, ParseError> {
                let parts = parse_components::<f32, $arity>(text, $keyword, |s| {
                    parse_float::<f32>(s, $keyword)
                })?;
                let mut parts = parts.into_iter();
                Ok(Value::$ty($ty {
                    $($field: parts.next().unwrap_or_default(),)+
                }))
            }

            fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
                match value {
                    Value::$ty(v) => {
                        $(sink.extend_from_slice(&v.$field.to_le_bytes());)+
                        Ok(())
                    }
                    other => Err(WriteError::mismatch($keyword, other)),
                }
            }

            fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
                Ok(Value::$ty($ty {
                    $($field: reader.read_f32()?,)+
                }))
            }
        }
    };
}

float_composite!(
    /// `vector2`: `x,y`.
    Vector2Codec, Vector2, "vector2", 2, [x, y]
);
float_composite!(
    /// `vector3`: `x,y,z`.
    Vector3Codec, Vector3, "vector3", 3, [x, y, z]
);
float_composite!(
    /// `vector4`: `x,y,z,w`.
    Vector4Codec, Vector4, "vector4", 4, [x, y, z, w]
);
float_composite!(
    /// `quaternion`: `x,y,z,w`.
    QuaternionCodec, Quaternion, "quaternion", 4, [x, y, z, w]
);
float_composite!(
    /// `rect`: `x,y,width,height`.
    RectCodec, Rect, "rect", 4, [x, y, width, height]
);
float_composite!(
    /// `color`: `r,g,b,a` as floats.
    ColorCodec, Color, "color", 4, [r, g, b, a]
);

/// `color32`: `r,g,b,a` as bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Color32Codec;

impl ColumnCodec for Color32Codec {
    fn type_keyword(&self) -> &str {
        "color32"
    }

    fn parse(&self, text: &str) -> Result<Value, ParseError> {
        let [r, g, b, a] = parse_components::<u8, 4>(text, "color32", |s| parse_int(s, "byte"))?;
        Ok(Value::Color32(Color32 { r, g, b, a }))
    }

    fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
        match value {
            Value::Color32(c) => {
                sink.extend_from_slice(&[c.r, c.g, c.b, c.a]);
                Ok(())
            }
            other => Err(WriteError::mismatch("color32", other)),
        }
    }

    fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
        let [r, g, b, a] = reader.read_array::<4>()?;
        Ok(Value::Color32(Color32 { r, g, b, a }))
    }
}
