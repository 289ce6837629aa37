//! Schema builder: metadata rows + type registry → one codec per column.
//!
//! # Column classification
//!
//! - The identifier column is named `Id` and always uses the identifier codec;
//!   its type row cell is ignored.
//! - A column with an empty name, or whose codec is comment-only, is a comment
//!   column. It stays in the schema for documentation and code generation but
//!   is never encoded and is absent from the [`RowLayout`].
//! - An unnamed column whose type does not resolve is treated as a comment
//!   column; a named one is a [`SchemaError::UnknownType`].

mod error;
mod layout;

pub use error::SchemaError;
pub use layout::{FieldLayout, IDENTIFIER_NAME, RowLayout, SchemaFingerprint};

use std::collections::HashMap;
use std::sync::Arc;

use crate::codec::{ColumnCodec, CommentCodec, TypeRegistry};
use crate::matrix::{MatrixLayout, RawMatrix};

/// Metadata of a single column.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColumnSchema {
    pub index: usize,
    pub name: String,
    /// Canonical keyword of the resolved codec.
    pub type_keyword: String,
    pub is_identifier: bool,
    pub is_comment: bool,
    /// Feeds the string pool.
    pub is_string: bool,
    /// Fallback text used when a cell fails to parse. Never empty.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub default_value: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub comment: Option<String>,
}

/// The finished schema of one table.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Schema {
    columns: Vec<ColumnSchema>,
    #[cfg_attr(feature = "serde", serde(skip))]
    codecs: Vec<Arc<dyn ColumnCodec>>,
    #[cfg_attr(feature = "serde", serde(skip))]
    row_layout: RowLayout,
    layout: MatrixLayout,
    fingerprint: SchemaFingerprint,
}

impl Schema {
    /// Resolves every column of `matrix` against `registry`.
    ///
    /// `layout` must already be validated against `matrix`
    /// (see [`crate::matrix::load`]).
    pub fn build(
        matrix: &RawMatrix,
        layout: &MatrixLayout,
        registry: &TypeRegistry,
    ) -> Result<Self, SchemaError> {
        layout.validate(matrix)?;

        let cell = |row: usize, column: usize| matrix.cell(row, column).unwrap_or_default();
        let optional_cell = |row: Option<usize>, column: usize| {
            row.map(|row| cell(row, column))
                .filter(|text| !text.is_empty())
                .map(str::to_owned)
        };

        let mut columns = Vec::with_capacity(matrix.column_count());
        let mut codecs = Vec::with_capacity(matrix.column_count());
        for index in 0..matrix.column_count() {
            let is_identifier = index == layout.id_column;
            let name = if is_identifier {
                IDENTIFIER_NAME.to_owned()
            } else {
                cell(layout.name_row, index).to_owned()
            };

            let codec: Arc<dyn ColumnCodec> = if is_identifier {
                registry.identifier()
            } else {
                match registry.resolve(cell(layout.type_row, index)) {
                    Ok(codec) => codec,
                    Err(_) if name.is_empty() => Arc::new(CommentCodec),
                    Err(source) => {
                        return Err(SchemaError::UnknownType {
                            column: index,
                            name,
                            source,
                        });
                    }
                }
            };

            let is_comment = !is_identifier && (name.is_empty() || codec.is_comment());
            columns.push(ColumnSchema {
                index,
                name,
                type_keyword: codec.type_keyword().to_owned(),
                is_identifier,
                is_comment,
                is_string: !is_comment && codec.is_string(),
                default_value: optional_cell(layout.default_row, index),
                comment: optional_cell(layout.comment_row, index),
            });
            codecs.push(codec);
        }

        let fields = columns
            .iter()
            .zip(&codecs)
            .filter(|(column, _)| !column.is_comment)
            .map(|(column, codec)| FieldLayout {
                name: column.name.clone(),
                column: column.index,
                codec: Arc::clone(codec),
            })
            .collect();
        let row_layout = RowLayout::new(fields)?;
        let fingerprint = row_layout.fingerprint();

        Ok(Self {
            columns,
            codecs,
            row_layout,
            layout: *layout,
            fingerprint,
        })
    }

    /// Checks that every encoded column has a valid, unique name.
    ///
    /// Names must match `[A-Z][A-Za-z0-9_]*` so they can become identifiers in
    /// generated code.
    pub fn check_names(&self) -> Result<(), SchemaError> {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        for column in self.encoded_columns() {
            if !is_valid_name(&column.name) {
                return Err(SchemaError::InvalidColumnName {
                    column: column.index,
                    name: column.name.clone(),
                });
            }
            if let Some(&first) = seen.get(column.name.as_str()) {
                return Err(SchemaError::DuplicateColumnName {
                    name: column.name.clone(),
                    first,
                    second: column.index,
                });
            }
            seen.insert(&column.name, column.index);
        }
        Ok(())
    }

    pub fn columns(&self) -> &[ColumnSchema] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&ColumnSchema> {
        self.columns.get(index)
    }

    pub fn codec(&self, index: usize) -> Option<&Arc<dyn ColumnCodec>> {
        self.codecs.get(index)
    }

    /// Non-comment columns in index order.
    pub fn encoded_columns(&self) -> impl Iterator<Item = &ColumnSchema> + '_ {
        self.columns.iter().filter(|column| !column.is_comment)
    }

    /// Non-comment columns paired with their codecs.
    pub fn encoded_codecs(
        &self,
    ) -> impl Iterator<Item = (&ColumnSchema, &Arc<dyn ColumnCodec>)> + '_ {
        self.columns
            .iter()
            .zip(&self.codecs)
            .filter(|(column, _)| !column.is_comment)
    }

    pub fn row_layout(&self) -> &RowLayout {
        &self.row_layout
    }

    pub fn layout(&self) -> &MatrixLayout {
        &self.layout
    }

    pub fn id_column(&self) -> usize {
        self.layout.id_column
    }

    pub fn content_start_row(&self) -> usize {
        self.layout.content_start_row
    }

    pub fn fingerprint(&self) -> SchemaFingerprint {
        self.fingerprint
    }
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_uppercase())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::LoadOptions;

    fn matrix(text: &str) -> RawMatrix {
        RawMatrix::parse(text, &LoadOptions::default()).unwrap()
    }

    const AIRCRAFT: &str = "\
#\tAircraft\t\t\t\t
#\tId\t\tThrusterId\tWeaponId0\tDeadSoundId
#\tint\t\tint\tint\tint
#\tAircraft id\tDesigner note\tThruster\tPrimary weapon\tDeath sound
\t10000\tScout\t30000\t40000\t50001
";

    #[test]
    fn classifies_identifier_and_comment_columns() {
        let schema = Schema::build(
            &matrix(AIRCRAFT),
            &MatrixLayout::default(),
            &TypeRegistry::new(),
        )
        .unwrap();

        let columns = schema.columns();
        assert_eq!(columns.len(), 6);
        assert!(columns[0].is_comment);
        assert!(columns[1].is_identifier);
        assert_eq!(columns[1].name, "Id");
        assert_eq!(columns[1].type_keyword, "id");
        assert!(columns[2].is_comment);
        assert_eq!(columns[2].comment.as_deref(), Some("Designer note"));
        assert_eq!(columns[3].comment.as_deref(), Some("Thruster"));
        assert_eq!(columns[3].default_value, None);

        let names = schema.row_layout().names();
        assert_eq!(&*names, ["Id", "ThrusterId", "WeaponId0", "DeadSoundId"]);
        assert!(schema.check_names().is_ok());
    }

    #[test]
    fn identifier_type_cell_is_ignored() {
        let schema = Schema::build(
            &matrix("Key\tName\nwhatever\tstring\n1\tA"),
            &MatrixLayout::new(0, 1, 2, 0),
            &TypeRegistry::new(),
        )
        .unwrap();
        assert!(schema.columns()[0].is_identifier);
        assert_eq!(schema.columns()[0].name, "Id");
    }

    #[test]
    fn named_column_with_unknown_type_fails() {
        let err = Schema::build(
            &matrix("Id\tMesh\nid\tmesh\n1\tcube"),
            &MatrixLayout::new(0, 1, 2, 0),
            &TypeRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::UnknownType { column: 1, .. }));
    }

    #[test]
    fn default_row_is_captured_when_present() {
        let schema = Schema::build(
            &matrix("Id\tSpeed\nid\tfloat\n\t0\n1\t2.5"),
            &MatrixLayout::new(0, 1, 3, 0).with_default_row(2),
            &TypeRegistry::new(),
        )
        .unwrap();
        assert_eq!(schema.columns()[0].default_value, None);
        assert_eq!(schema.columns()[1].default_value.as_deref(), Some("0"));
    }

    #[test]
    fn check_names_rejects_bad_and_duplicate_names() {
        let registry = TypeRegistry::new();
        let layout = MatrixLayout::new(0, 1, 2, 0);

        let schema = Schema::build(&matrix("Id\tmax_hp\nid\tint"), &layout, &registry).unwrap();
        assert!(matches!(
            schema.check_names(),
            Err(SchemaError::InvalidColumnName { column: 1, .. })
        ));

        let schema =
            Schema::build(&matrix("Id\tHp\tHp\nid\tint\tint"), &layout, &registry).unwrap();
        assert_eq!(
            schema.check_names(),
            Err(SchemaError::DuplicateColumnName {
                name: "Hp".into(),
                first: 1,
                second: 2
            })
        );
    }

    #[test]
    fn fingerprint_ignores_comment_columns() {
        let registry = TypeRegistry::new();
        let layout = MatrixLayout::new(0, 1, 2, 0);
        let plain = Schema::build(&matrix("Id\tHp\nid\tint"), &layout, &registry).unwrap();
        let noted =
            Schema::build(&matrix("Id\t\tHp\nid\tstring\tint"), &layout, &registry).unwrap();
        assert_eq!(plain.fingerprint(), noted.fingerprint());
    }

    #[test]
    fn name_rule() {
        assert!(is_valid_name("MaxHP"));
        assert!(is_valid_name("WeaponId_2"));
        assert!(!is_valid_name("maxHp"));
        assert!(!is_valid_name("Max HP"));
        assert!(!is_valid_name(""));
    }
}
