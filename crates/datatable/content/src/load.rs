//! Runtime loading of compiled tables.

use std::path::{Path, PathBuf};

use anyhow::Context;
use datatable_core::{
    BlobFormat, DataTable, DuplicateIdPolicy, Record, RowLayout, Schema, TypeRegistry,
    decode_table, decode_text, load,
};

use crate::kind::TableName;
use crate::manifest::TableSettings;
use crate::registry::TableRegistry;
use crate::rows::{DataRow, LoadedTable, build_table};

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

fn read_bytes(path: &Path) -> LoadResult<Vec<u8>> {
    std::fs::read(path).map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}

/// Loads compiled tables from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── Aircraft.bytes
/// ├── Aircraft_Enemy.bytes
/// ├── Weapon.bytes
/// └── ...
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
    types: TypeRegistry,
}

impl ContentFactory {
    /// Creates a factory reading `{data_dir}/{name}.bytes` with the standard
    /// column types.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            types: TypeRegistry::new(),
        }
    }

    /// Replaces the column type registry (for custom column types).
    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = types;
        self
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn asset_path(&self, name: &TableName) -> PathBuf {
        self.data_dir.join(name.asset_file())
    }

    /// Decodes `{name}.bytes` with an explicit layout.
    pub fn load_records(
        &self,
        name: &TableName,
        layout: &RowLayout,
        format: BlobFormat,
    ) -> LoadResult<Vec<Record>> {
        let path = self.asset_path(name);
        let blob = read_bytes(&path)?;
        let records = decode_table(&blob, layout, format)
            .with_context(|| format!("Failed to decode {}", path.display()))?;
        tracing::debug!(table = %name, rows = records.len(), "decoded table");
        Ok(records)
    }

    /// Loads `{name}.bytes` as a typed table.
    pub fn load_table<R: DataRow>(
        &self,
        name: &TableName,
        format: BlobFormat,
        policy: DuplicateIdPolicy,
    ) -> LoadResult<DataTable<R>> {
        let layout = R::layout(&self.types)?;
        let records = self.load_records(name, &layout, format)?;
        let table = build_table(records, policy).with_context(|| format!("Failed to index table {name}"))?;
        log_overrides(name, table.overridden_ids());
        Ok(table)
    }

    /// Loads `{name}.bytes` as the row type its name selects.
    pub fn load_kind(
        &self,
        name: &TableName,
        format: BlobFormat,
        policy: DuplicateIdPolicy,
    ) -> LoadResult<LoadedTable> {
        let kind = name.kind()?;
        let layout = kind.layout(&self.types)?;
        let records = self.load_records(name, &layout, format)?;
        let table = kind
            .build(records, policy)
            .with_context(|| format!("Failed to index table {name}"))?;
        log_overrides(name, table.overridden_ids());
        Ok(table)
    }

    /// Builds a typed table straight from its source text.
    ///
    /// Cells go through the same codecs as the compiler, but an invalid cell
    /// is an error here: there is no default fallback.
    pub fn load_text_table<R: DataRow>(&self, settings: &TableSettings) -> LoadResult<DataTable<R>> {
        let text = read_file(&settings.source)?;
        let matrix = load(&text, &settings.options, &settings.layout)
            .with_context(|| format!("Failed to load {}", settings.source.display()))?;
        let schema = Schema::build(&matrix, &settings.layout, &self.types)
            .with_context(|| format!("Failed to build schema for {}", settings.name))?;
        let expected = R::layout(&self.types)?;
        let records = decode_text(&matrix, &schema, &expected)
            .with_context(|| format!("Failed to read table {} as text", settings.name))?;

        let table = build_table(records, settings.duplicate_ids)
            .with_context(|| format!("Failed to index table {}", settings.name))?;
        log_overrides(&settings.name, table.overridden_ids());
        Ok(table)
    }

    /// Loads every named table into a registry.
    pub fn load_registry(
        &self,
        tables: impl IntoIterator<Item = (TableName, BlobFormat, DuplicateIdPolicy)>,
    ) -> LoadResult<TableRegistry> {
        let mut registry = TableRegistry::new();
        for (name, format, policy) in tables {
            let table = self.load_kind(&name, format, policy)?;
            registry.insert(name, table)?;
        }
        tracing::info!(tables = registry.len(), "table registry loaded");
        Ok(registry)
    }
}

fn log_overrides(name: &TableName, overridden: &[i32]) {
    if !overridden.is_empty() {
        tracing::warn!(table = %name, ids = ?overridden, "later rows replaced earlier ones");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
        assert_eq!(
            factory.asset_path(&"Aircraft_Player".parse().unwrap()),
            Path::new("/tmp/data/Aircraft_Player.bytes")
        );
    }

    #[test]
    fn missing_asset_names_the_file() {
        let factory = ContentFactory::new("/nonexistent");
        let err = factory
            .load_kind(&"Armor".parse().unwrap(), BlobFormat::Raw, DuplicateIdPolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("Armor.bytes"), "{err}");
    }

    #[test]
    fn unknown_kind_is_rejected_before_reading() {
        let factory = ContentFactory::new("/nonexistent");
        let err = factory
            .load_kind(&"TestConfig".parse().unwrap(), BlobFormat::Raw, DuplicateIdPolicy::Reject)
            .unwrap_err();
        assert!(err.to_string().contains("TestConfig"), "{err}");
    }
}
