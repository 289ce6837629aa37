//! Keyword → codec lookup.

use std::collections::HashMap;
use std::sync::Arc;

use super::composite::{
    Color32Codec, ColorCodec, QuaternionCodec, RectCodec, Vector2Codec, Vector3Codec,
    Vector4Codec,
};
use super::primitive::{
    BoolCodec, ByteCodec, CharCodec, CommentCodec, DoubleCodec, FloatCodec, IdCodec, Int16Codec,
    Int32Codec, Int64Codec, SByteCodec, StringCodec, TimestampCodec, UInt16Codec, UInt32Codec,
    UInt64Codec,
};
use super::ColumnCodec;
use crate::error::{ErrorSeverity, TableError};

/// Namespace prefixes dropped before lookup (`System.Int32` → `int32`).
const NAMESPACE_PREFIXES: [&str; 2] = ["system.", "unityengine."];

/// Errors from keyword lookup and registration.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("unknown column type '{keyword}'")]
    UnknownType { keyword: String },

    #[error("'{keyword}' is reserved for the identifier column")]
    ReservedKeyword { keyword: String },
}

impl TableError for LookupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownType { .. } => "UNKNOWN_TYPE",
            Self::ReservedKeyword { .. } => "RESERVED_KEYWORD",
        }
    }
}

/// Maps type keywords to shared codecs.
///
/// Lookup is ASCII case-insensitive and ignores a leading `system.` or
/// `unityengine.` namespace. A registry is an ordinary value: build one, adjust
/// it with [`register`](Self::register), and pass it by reference.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    codecs: HashMap<String, Arc<dyn ColumnCodec>>,
    identifier: Arc<dyn ColumnCodec>,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Registry populated with every standard codec and its aliases.
    pub fn new() -> Self {
        let identifier: Arc<dyn ColumnCodec> = Arc::new(IdCodec);
        let mut registry = Self {
            codecs: HashMap::new(),
            identifier: Arc::clone(&identifier),
        };
        registry.insert(&[IdCodec::KEYWORD], identifier);

        registry.insert(&["bool", "boolean"], Arc::new(BoolCodec));
        registry.insert(&["byte", "uint8", "u8"], Arc::new(ByteCodec));
        registry.insert(&["sbyte", "int8", "i8"], Arc::new(SByteCodec));
        registry.insert(&["short", "int16", "i16"], Arc::new(Int16Codec));
        registry.insert(&["ushort", "uint16", "u16"], Arc::new(UInt16Codec));
        registry.insert(&["int", "int32", "i32"], Arc::new(Int32Codec));
        registry.insert(&["uint", "uint32", "u32"], Arc::new(UInt32Codec));
        registry.insert(&["long", "int64", "i64"], Arc::new(Int64Codec));
        registry.insert(&["ulong", "uint64", "u64"], Arc::new(UInt64Codec));
        registry.insert(&["float", "single", "f32"], Arc::new(FloatCodec));
        registry.insert(&["double", "f64"], Arc::new(DoubleCodec));
        registry.insert(&["char"], Arc::new(CharCodec));
        registry.insert(&["string"], Arc::new(StringCodec));
        registry.insert(&["datetime", "timestamp"], Arc::new(TimestampCodec));
        registry.insert(&["vector2"], Arc::new(Vector2Codec));
        registry.insert(&["vector3"], Arc::new(Vector3Codec));
        registry.insert(&["vector4"], Arc::new(Vector4Codec));
        registry.insert(&["quaternion"], Arc::new(QuaternionCodec));
        registry.insert(&["rect"], Arc::new(RectCodec));
        registry.insert(&["color"], Arc::new(ColorCodec));
        registry.insert(&["color32"], Arc::new(Color32Codec));
        registry.insert(&[CommentCodec::KEYWORD, "#", ""], Arc::new(CommentCodec));

        registry
    }

    /// Canonical lookup form of a keyword.
    pub fn normalize(keyword: &str) -> String {
        let lowered = keyword.trim().to_ascii_lowercase();
        for prefix in NAMESPACE_PREFIXES {
            if let Some(rest) = lowered.strip_prefix(prefix) {
                return rest.to_owned();
            }
        }
        lowered
    }

    fn insert(&mut self, keywords: &[&str], codec: Arc<dyn ColumnCodec>) {
        for keyword in keywords {
            self.codecs.insert(Self::normalize(keyword), Arc::clone(&codec));
        }
    }

    /// Registers `codec` under every keyword in `keywords`.
    ///
    /// An existing mapping for a keyword is replaced. The identifier keyword
    /// cannot be taken; on that error nothing is registered.
    pub fn register(
        &mut self,
        keywords: &[&str],
        codec: Arc<dyn ColumnCodec>,
    ) -> Result<(), LookupError> {
        if let Some(reserved) = keywords
            .iter()
            .find(|keyword| Self::normalize(keyword) == IdCodec::KEYWORD)
        {
            return Err(LookupError::ReservedKeyword {
                keyword: (*reserved).to_owned(),
            });
        }
        self.insert(keywords, codec);
        Ok(())
    }

    /// Resolves a type keyword to its codec.
    pub fn resolve(&self, keyword: &str) -> Result<Arc<dyn ColumnCodec>, LookupError> {
        self.codecs
            .get(&Self::normalize(keyword))
            .cloned()
            .ok_or_else(|| LookupError::UnknownType {
                keyword: keyword.to_owned(),
            })
    }

    /// The codec assigned to every identifier column.
    pub fn identifier(&self) -> Arc<dyn ColumnCodec> {
        Arc::clone(&self.identifier)
    }

    /// All registered keywords, sorted.
    pub fn keywords(&self) -> Vec<&str> {
        let mut keywords: Vec<&str> = self.codecs.keys().map(String::as_str).collect();
        keywords.sort_unstable();
        keywords
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{ParseError, WriteError};
    use crate::decoder::DecodeError;
    use crate::reader::RowReader;
    use crate::value::Value;

    #[derive(Debug)]
    struct Percent;

    impl ColumnCodec for Percent {
        fn type_keyword(&self) -> &str {
            "percent"
        }

        fn parse(&self, text: &str) -> Result<Value, ParseError> {
            let digits = text.trim().trim_end_matches('%');
            crate::codec::parse_int::<u8>(digits, "percent").map(Value::U8)
        }

        fn write(&self, value: &Value, sink: &mut Vec<u8>) -> Result<(), WriteError> {
            ByteCodec.write(value, sink)
        }

        fn read(&self, reader: &mut RowReader<'_>) -> Result<Value, DecodeError> {
            ByteCodec.read(reader)
        }
    }

    #[test]
    fn lookup_ignores_case_and_namespace() {
        let registry = TypeRegistry::new();
        for keyword in ["int", "Int32", "System.Int32", "  INT  ", "i32"] {
            assert_eq!(registry.resolve(keyword).unwrap().type_keyword(), "int", "{keyword}");
        }
        assert_eq!(
            registry.resolve("UnityEngine.Vector3").unwrap().type_keyword(),
            "vector3"
        );
        assert_eq!(registry.resolve("System.String").unwrap().type_keyword(), "string");
    }

    #[test]
    fn empty_and_hash_resolve_to_comment() {
        let registry = TypeRegistry::new();
        assert!(registry.resolve("").unwrap().is_comment());
        assert!(registry.resolve("#").unwrap().is_comment());
    }

    #[test]
    fn unknown_keyword_fails() {
        let registry = TypeRegistry::new();
        assert_eq!(
            registry.resolve("matrix4x4").unwrap_err(),
            LookupError::UnknownType {
                keyword: "matrix4x4".into()
            }
        );
    }

    #[test]
    fn id_resolves_to_identifier_and_is_reserved() {
        let mut registry = TypeRegistry::new();
        assert!(registry.resolve("Id").unwrap().is_identifier());
        assert!(registry.identifier().is_identifier());

        let err = registry
            .register(&["percent", "ID"], Arc::new(Percent))
            .unwrap_err();
        assert!(matches!(err, LookupError::ReservedKeyword { .. }));
        assert!(registry.resolve("percent").is_err());
    }

    #[test]
    fn register_adds_and_replaces() {
        let mut registry = TypeRegistry::new();
        registry.register(&["percent"], Arc::new(Percent)).unwrap();
        let codec = registry.resolve("Percent").unwrap();
        assert_eq!(codec.parse("40%").unwrap(), Value::U8(40));

        registry.register(&["byte"], Arc::new(Percent)).unwrap();
        assert_eq!(registry.resolve("byte").unwrap().type_keyword(), "percent");
    }

    #[test]
    fn keywords_are_sorted() {
        let registry = TypeRegistry::new();
        let keywords = registry.keywords();
        assert!(keywords.windows(2).all(|w| w[0] <= w[1]));
        assert!(keywords.contains(&"color32"));
    }
}
