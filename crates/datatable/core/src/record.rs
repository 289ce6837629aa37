//! Decoded records and typed field access.

use std::sync::Arc;

use crate::error::{ErrorSeverity, TableError};
use crate::table::Row;
use crate::value::{
    Color, Color32, Quaternion, Rect, Timestamp, Value, Vector2, Vector3, Vector4,
};

/// Errors from typed field access on a [`Record`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("record {id} has no field '{name}'")]
    Missing { id: i32, name: String },

    #[error("record {id}, field '{name}': expected {expected}, found {found}")]
    TypeMismatch {
        id: i32,
        name: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl TableError for FieldError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Missing { .. } => "FIELD_MISSING",
            Self::TypeMismatch { .. } => "FIELD_TYPE_MISMATCH",
        }
    }
}

/// Conversion from a decoded [`Value`] to a Rust type.
pub trait FromValue: Sized {
    /// Name used in mismatch errors.
    const EXPECTED: &'static str;

    fn from_value(value: &Value) -> Option<Self>;
}

macro_rules! impl_from_value {
    ($($ty:ty => $variant:ident, $expected:literal;)+) => {
        $(
            impl FromValue for $ty {
                const EXPECTED: &'static str = $expected;

                fn from_value(value: &Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Some(v.clone()),
                        _ => None,
                    }
                }
            }
        )+
    };
}

impl_from_value! {
    bool => Bool, "bool";
    u8 => U8, "byte";
    i8 => I8, "sbyte";
    i16 => I16, "short";
    u16 => U16, "ushort";
    i32 => I32, "int";
    u32 => U32, "uint";
    i64 => I64, "long";
    u64 => U64, "ulong";
    f32 => F32, "float";
    f64 => F64, "double";
    char => Char, "char";
    String => String, "string";
    Timestamp => Timestamp, "datetime";
    Vector2 => Vector2, "vector2";
    Vector3 => Vector3, "vector3";
    Vector4 => Vector4, "vector4";
    Quaternion => Quaternion, "quaternion";
    Rect => Rect, "rect";
    Color => Color, "color";
    Color32 => Color32, "color32";
}

impl FromValue for Value {
    const EXPECTED: &'static str = "any";

    fn from_value(value: &Value) -> Option<Self> {
        Some(value.clone())
    }
}

/// One decoded row: the identifier plus one value per encoded column.
///
/// Field names are shared by every record of a table.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    id: i32,
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl Record {
    /// `names` and `values` are parallel, in wire order.
    pub fn new(id: i32, names: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self { id, names, values }
    }

    pub fn id(&self) -> i32 {
        self.id
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.names
            .iter()
            .position(|field| field == name)
            .and_then(|position| self.values.get(position))
    }

    /// Typed access to a field.
    pub fn field<T: FromValue>(&self, name: &str) -> Result<T, FieldError> {
        let value = self.get(name).ok_or_else(|| FieldError::Missing {
            id: self.id,
            name: name.to_owned(),
        })?;
        T::from_value(value).ok_or_else(|| FieldError::TypeMismatch {
            id: self.id,
            name: name.to_owned(),
            expected: T::EXPECTED,
            found: value.kind_name(),
        })
    }

    /// `(name, value)` pairs in wire order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> + '_ {
        self.names.iter().map(String::as_str).zip(&self.values)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Fields named `<prefix><n>`, sorted by `n`.
    ///
    /// `field_group("WeaponId")` on a record with `WeaponId0`, `WeaponId1`
    /// returns `[(0, ..), (1, ..)]`. Names where the suffix is not all digits
    /// are ignored.
    pub fn field_group(&self, prefix: &str) -> Vec<(u32, &Value)> {
        let mut group: Vec<(u32, &Value)> = self
            .fields()
            .filter_map(|(name, value)| {
                let suffix = name.strip_prefix(prefix)?;
                if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                suffix.parse().ok().map(|n| (n, value))
            })
            .collect();
        group.sort_by_key(|(n, _)| *n);
        group
    }

    /// Typed values of [`field_group`](Self::field_group), in numeric order.
    pub fn field_group_as<T: FromValue>(&self, prefix: &str) -> Result<Vec<T>, FieldError> {
        self.field_group(prefix)
            .into_iter()
            .map(|(n, value)| {
                T::from_value(value).ok_or_else(|| FieldError::TypeMismatch {
                    id: self.id,
                    name: format!("{prefix}{n}"),
                    expected: T::EXPECTED,
                    found: value.kind_name(),
                })
            })
            .collect()
    }
}

impl Row for Record {
    fn id(&self) -> i32 {
        self.id
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Record {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in self.fields() {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aircraft() -> Record {
        let names: Arc<[String]> = ["Id", "ThrusterId", "WeaponId1", "WeaponId0", "WeaponIdx", "ArmorId0"]
            .into_iter()
            .map(String::from)
            .collect();
        Record::new(
            10000,
            names,
            vec![
                Value::I32(10000),
                Value::I32(30000),
                Value::I32(40001),
                Value::I32(40000),
                Value::I32(0),
                Value::String("plate".into()),
            ],
        )
    }

    #[test]
    fn typed_access() {
        let record = aircraft();
        assert_eq!(record.id(), 10000);
        assert_eq!(record.field::<i32>("ThrusterId"), Ok(30000));
        assert_eq!(
            record.field::<f32>("ThrusterId"),
            Err(FieldError::TypeMismatch {
                id: 10000,
                name: "ThrusterId".into(),
                expected: "float",
                found: "int"
            })
        );
        assert!(matches!(
            record.field::<i32>("Speed"),
            Err(FieldError::Missing { .. })
        ));
    }

    #[test]
    fn field_group_sorts_numerically_and_skips_non_numeric() {
        let record = aircraft();
        let group: Vec<u32> = record.field_group("WeaponId").into_iter().map(|(n, _)| n).collect();
        assert_eq!(group, vec![0, 1]);
        assert_eq!(record.field_group_as::<i32>("WeaponId"), Ok(vec![40000, 40001]));
        assert!(record.field_group("Missing").is_empty());
    }

    #[test]
    fn field_group_as_reports_mismatch() {
        let record = aircraft();
        assert!(matches!(
            record.field_group_as::<i32>("ArmorId"),
            Err(FieldError::TypeMismatch { ref name, .. }) if name == "ArmorId0"
        ));
    }

    #[test]
    fn fields_keep_wire_order() {
        let record = aircraft();
        let names: Vec<&str> = record.fields().map(|(name, _)| name).collect();
        assert_eq!(names[..3], ["Id", "ThrusterId", "WeaponId1"]);
    }
}
