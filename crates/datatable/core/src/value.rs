//! Decoded cell values.
//!
//! [`Value`] is the closed set of things a column codec can produce. Composite
//! types are small `Copy` structs whose field order is the wire order.
//! `Display` renders every value in the canonical text form its codec parses,
//! so `parse(value.to_string())` reproduces the value.

use core::fmt;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

/// Two-component float vector (`x, y`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

/// Three-component float vector (`x, y, z`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// Four-component float vector (`x, y, z, w`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector4 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Rotation quaternion (`x, y, z, w`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

/// Axis-aligned rectangle (`x, y, width, height`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Floating-point RGBA color, components nominally in `0.0..=1.0`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

/// 32-bit RGBA color, one byte per component.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color32 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Point in time stored as 100-nanosecond ticks since `0001-01-01T00:00:00`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp {
    ticks: i64,
}

impl Timestamp {
    /// Ticks per second.
    pub const TICKS_PER_SECOND: i64 = 10_000_000;

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub const fn ticks(&self) -> i64 {
        self.ticks
    }

    /// Converts a calendar datetime into ticks.
    ///
    /// Returns `None` for datetimes before year 1.
    pub fn from_datetime(datetime: NaiveDateTime) -> Option<Self> {
        let delta = datetime.signed_duration_since(tick_epoch()?);
        if delta < TimeDelta::zero() {
            return None;
        }
        let ticks = delta
            .num_seconds()
            .checked_mul(Self::TICKS_PER_SECOND)?
            .checked_add(i64::from(delta.subsec_nanos()) / 100)?;
        Some(Self { ticks })
    }

    /// Converts back into a calendar datetime, if representable.
    pub fn to_datetime(&self) -> Option<NaiveDateTime> {
        let seconds = self.ticks.div_euclid(Self::TICKS_PER_SECOND);
        let nanos = (self.ticks.rem_euclid(Self::TICKS_PER_SECOND) * 100) as u32;
        tick_epoch()?.checked_add_signed(TimeDelta::new(seconds, nanos)?)
    }
}

fn tick_epoch() -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(1, 1, 1)?.and_hms_opt(0, 0, 0)
}

/// A single decoded cell.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Value {
    Bool(bool),
    U8(u8),
    I8(i8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Char(char),
    String(String),
    Timestamp(Timestamp),
    Vector2(Vector2),
    Vector3(Vector3),
    Vector4(Vector4),
    Quaternion(Quaternion),
    Rect(Rect),
    Color(Color),
    Color32(Color32),
}

impl Value {
    /// Short name of the variant, used in mismatch diagnostics.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Bool(_) => "bool",
            Self::U8(_) => "byte",
            Self::I8(_) => "sbyte",
            Self::I16(_) => "short",
            Self::U16(_) => "ushort",
            Self::I32(_) => "int",
            Self::U32(_) => "uint",
            Self::I64(_) => "long",
            Self::U64(_) => "ulong",
            Self::F32(_) => "float",
            Self::F64(_) => "double",
            Self::Char(_) => "char",
            Self::String(_) => "string",
            Self::Timestamp(_) => "datetime",
            Self::Vector2(_) => "vector2",
            Self::Vector3(_) => "vector3",
            Self::Vector4(_) => "vector4",
            Self::Quaternion(_) => "quaternion",
            Self::Rect(_) => "rect",
            Self::Color(_) => "color",
            Self::Color32(_) => "color32",
        }
    }

    /// Returns the string payload, if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Widens any integer variant to `i64`.
    ///
    /// Returns `None` for non-integers and for `u64` values above `i64::MAX`.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::U8(v) => Some(i64::from(v)),
            Self::I8(v) => Some(i64::from(v)),
            Self::I16(v) => Some(i64::from(v)),
            Self::U16(v) => Some(i64::from(v)),
            Self::I32(v) => Some(i64::from(v)),
            Self::U32(v) => Some(i64::from(v)),
            Self::I64(v) => Some(v),
            Self::U64(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "{v}"),
            Self::U8(v) => write!(f, "{v}"),
            Self::I8(v) => write!(f, "{v}"),
            Self::I16(v) => write!(f, "{v}"),
            Self::U16(v) => write!(f, "{v}"),
            Self::I32(v) => write!(f, "{v}"),
            Self::U32(v) => write!(f, "{v}"),
            Self::I64(v) => write!(f, "{v}"),
            Self::U64(v) => write!(f, "{v}"),
            Self::F32(v) => write!(f, "{v}"),
            Self::F64(v) => write!(f, "{v}"),
            Self::Char(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Timestamp(v) => write!(f, "{}", v.ticks()),
            Self::Vector2(v) => write!(f, "{},{}", v.x, v.y),
            Self::Vector3(v) => write!(f, "{},{},{}", v.x, v.y, v.z),
            Self::Vector4(v) => write!(f, "{},{},{},{}", v.x, v.y, v.z, v.w),
            Self::Quaternion(v) => write!(f, "{},{},{},{}", v.x, v.y, v.z, v.w),
            Self::Rect(v) => write!(f, "{},{},{},{}", v.x, v.y, v.width, v.height),
            Self::Color(v) => write!(f, "{},{},{},{}", v.r, v.g, v.b, v.a),
            Self::Color32(v) => write!(f, "{},{},{},{}", v.r, v.g, v.b, v.a),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_epoch_is_zero_ticks() {
        let epoch = NaiveDate::from_ymd_opt(1, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(Timestamp::from_datetime(epoch), Some(Timestamp::from_ticks(0)));
    }

    #[test]
    fn timestamp_matches_known_tick_count() {
        // 2000-01-01T00:00:00 is 630822816000000000 ticks.
        let datetime = NaiveDate::from_ymd_opt(2000, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let ts = Timestamp::from_datetime(datetime).unwrap();
        assert_eq!(ts.ticks(), 630_822_816_000_000_000);
        assert_eq!(ts.to_datetime(), Some(datetime));
    }

    #[test]
    fn display_uses_canonical_text() {
        assert_eq!(Value::Vector3(Vector3 { x: 1.0, y: 2.5, z: -3.0 }).to_string(), "1,2.5,-3");
        assert_eq!(
            Value::Rect(Rect { x: 0.0, y: 0.0, width: 4.0, height: 2.0 }).to_string(),
            "0,0,4,2"
        );
        assert_eq!(Value::Bool(true).to_string(), "true");
        assert_eq!(Value::String("Scout".into()).to_string(), "Scout");
    }

    #[test]
    fn as_i64_widens_integers_only() {
        assert_eq!(Value::U8(7).as_i64(), Some(7));
        assert_eq!(Value::I32(-4).as_i64(), Some(-4));
        assert_eq!(Value::U64(u64::MAX).as_i64(), None);
        assert_eq!(Value::F32(1.0).as_i64(), None);
    }
}
