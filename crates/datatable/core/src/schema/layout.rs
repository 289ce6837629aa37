//! Ordered encoded fields shared by the encoder and decoder.

use core::fmt;
use std::sync::Arc;

use sha2::{Digest, Sha256};

use super::SchemaError;
use crate::codec::{ColumnCodec, TypeRegistry};

/// Name separator in the fingerprint input.
const UNIT_SEPARATOR: u8 = 0x1F;
/// Field separator in the fingerprint input.
const RECORD_SEPARATOR: u8 = 0x1E;

/// Effective name of the identifier field.
pub const IDENTIFIER_NAME: &str = "Id";

/// One encoded field: its name, source column and codec.
#[derive(Clone, Debug)]
pub struct FieldLayout {
    pub name: String,
    /// Matrix column the field is read from.
    pub column: usize,
    pub codec: Arc<dyn ColumnCodec>,
}

/// The non-comment fields of a table, in wire order.
///
/// Produced by the schema builder for compiling, or declared directly by a
/// runtime that only holds the blob.
#[derive(Clone, Debug)]
pub struct RowLayout {
    fields: Vec<FieldLayout>,
    names: Arc<[String]>,
    identifier: usize,
}

impl RowLayout {
    /// Builds a layout from fields already in wire order.
    ///
    /// Exactly one field must use the identifier codec; it is renamed `Id`.
    pub fn new(mut fields: Vec<FieldLayout>) -> Result<Self, SchemaError> {
        let identifiers: Vec<usize> = fields
            .iter()
            .enumerate()
            .filter(|(_, field)| field.codec.is_identifier())
            .map(|(position, _)| position)
            .collect();

        let &[identifier] = identifiers.as_slice() else {
            return Err(SchemaError::IdentifierCount {
                found: identifiers.len(),
            });
        };
        fields[identifier].name = IDENTIFIER_NAME.to_owned();

        let names = fields.iter().map(|field| field.name.clone()).collect();
        Ok(Self {
            fields,
            names,
            identifier,
        })
    }

    /// Declares a layout from `(name, type keyword)` pairs.
    ///
    /// Field `i` is taken from column `i`.
    pub fn declare(registry: &TypeRegistry, fields: &[(&str, &str)]) -> Result<Self, SchemaError> {
        let fields = fields
            .iter()
            .enumerate()
            .map(|(column, (name, keyword))| {
                let codec = registry
                    .resolve(keyword)
                    .map_err(|source| SchemaError::UnknownType {
                        column,
                        name: (*name).to_owned(),
                        source,
                    })?;
                Ok(FieldLayout {
                    name: (*name).to_owned(),
                    column,
                    codec,
                })
            })
            .collect::<Result<Vec<_>, SchemaError>>()?;
        Self::new(fields)
    }

    pub fn fields(&self) -> &[FieldLayout] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in wire order, shared with every decoded record.
    pub fn names(&self) -> Arc<[String]> {
        Arc::clone(&self.names)
    }

    /// Position of the identifier field.
    pub fn identifier_position(&self) -> usize {
        self.identifier
    }

    pub fn field(&self, name: &str) -> Option<&FieldLayout> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Truncated SHA-256 over the ordered `(name, keyword)` pairs.
    pub fn fingerprint(&self) -> SchemaFingerprint {
        let mut hasher = Sha256::new();
        for field in &self.fields {
            hasher.update(field.name.as_bytes());
            hasher.update([UNIT_SEPARATOR]);
            hasher.update(field.codec.type_keyword().as_bytes());
            hasher.update([RECORD_SEPARATOR]);
        }
        let digest = hasher.finalize();

        let mut fingerprint = [0u8; SchemaFingerprint::LEN];
        fingerprint.copy_from_slice(&digest[..SchemaFingerprint::LEN]);
        SchemaFingerprint(fingerprint)
    }
}

/// Eight-byte identity of a row layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SchemaFingerprint(pub [u8; SchemaFingerprint::LEN]);

impl SchemaFingerprint {
    pub const LEN: usize = 8;

    pub fn as_bytes(&self) -> &[u8; Self::LEN] {
        &self.0
    }
}

impl fmt::Display for SchemaFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for SchemaFingerprint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
