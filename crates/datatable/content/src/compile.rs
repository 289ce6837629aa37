//! Source text → binary asset.
//!
//! [`compile_source`] is the pure pipeline (load, schema, name check, string
//! pool, encode). [`TableCompiler`] adds the filesystem: it reads sources named
//! by the manifest, logs fallbacks, and writes each blob atomically so a failed
//! table never leaves a partial asset behind.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use datatable_core::{
    BlobFormat, EncodeError, EncodedTable, FallbackNotice, LoadOptions, MatrixLayout, RawMatrix,
    Schema, SchemaError, SchemaFingerprint, StringPool, TypeRegistry, encode_table, load,
};
use rayon::prelude::*;
use serde::Serialize;

use crate::kind::TableName;
use crate::load::{LoadResult, read_file};
use crate::manifest::TableSettings;

/// Errors from compiling one table's text.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Everything produced from one source table.
#[derive(Clone, Debug)]
pub struct CompiledTable {
    pub matrix: RawMatrix,
    pub schema: Schema,
    pub pool: StringPool,
    pub encoded: EncodedTable,
}

/// Loads and validates a table without encoding it.
///
/// Column names must be identifiers and unique; every type must resolve.
pub fn check_source(
    text: &str,
    options: &LoadOptions,
    layout: &MatrixLayout,
    types: &TypeRegistry,
) -> Result<(RawMatrix, Schema), SchemaError> {
    let matrix = load(text, options, layout)?;
    let schema = Schema::build(&matrix, layout, types)?;
    schema.check_names()?;
    Ok((matrix, schema))
}

/// Runs the whole pipeline on source text.
pub fn compile_source(
    text: &str,
    options: &LoadOptions,
    layout: &MatrixLayout,
    format: BlobFormat,
    types: &TypeRegistry,
) -> Result<CompiledTable, CompileError> {
    let (matrix, schema) = check_source(text, options, layout, types)?;
    let pool = StringPool::build(&matrix, schema.columns(), schema.content_start_row());
    let encoded = encode_table(&matrix, &schema, format)?;
    Ok(CompiledTable {
        matrix,
        schema,
        pool,
        encoded,
    })
}

/// Outcome of one written table.
#[derive(Clone, Debug, Serialize)]
pub struct TableReport {
    pub name: TableName,
    pub output: PathBuf,
    pub rows: usize,
    pub bytes: usize,
    pub pool_size: usize,
    pub format: BlobFormat,
    pub fingerprint: SchemaFingerprint,
    pub fallbacks: Vec<FallbackNotice>,
}

/// Compiles manifest tables to disk.
pub struct TableCompiler<'a> {
    types: &'a TypeRegistry,
}

impl<'a> TableCompiler<'a> {
    pub fn new(types: &'a TypeRegistry) -> Self {
        Self { types }
    }

    /// Reads and compiles a table without writing anything.
    pub fn compile_in_memory(&self, settings: &TableSettings) -> LoadResult<CompiledTable> {
        let text = read_file(&settings.source)?;
        compile_source(
            &text,
            &settings.options,
            &settings.layout,
            settings.format,
            self.types,
        )
        .with_context(|| format!("Failed to compile table {}", settings.name))
    }

    /// Validates a table's source.
    pub fn check(&self, settings: &TableSettings) -> LoadResult<Schema> {
        let text = read_file(&settings.source)?;
        let (_, schema) = check_source(&text, &settings.options, &settings.layout, self.types)
            .with_context(|| format!("Table {} failed the raw data check", settings.name))?;
        tracing::debug!(
            table = %settings.name,
            columns = schema.columns().len(),
            "raw data check passed"
        );
        Ok(schema)
    }

    /// Compiles one table and writes its blob.
    pub fn compile(&self, settings: &TableSettings) -> LoadResult<TableReport> {
        let compiled = self.compile_in_memory(settings)?;
        let encoded = compiled.encoded;

        for notice in &encoded.fallbacks {
            tracing::warn!(
                table = %settings.name,
                row = notice.row,
                column = %notice.name,
                raw = %notice.raw_text,
                default = %notice.default_value,
                "cell fell back to default: {}",
                notice.reason
            );
        }

        write_atomic(&settings.output, &encoded.blob)
            .with_context(|| format!("Failed to write table {}", settings.name))?;

        tracing::info!(
            table = %settings.name,
            rows = encoded.rows,
            bytes = encoded.blob.len(),
            output = %settings.output.display(),
            "table compiled"
        );

        Ok(TableReport {
            name: settings.name.clone(),
            output: settings.output.clone(),
            rows: encoded.rows,
            bytes: encoded.blob.len(),
            pool_size: compiled.pool.len(),
            format: encoded.format,
            fingerprint: encoded.fingerprint,
            fallbacks: encoded.fallbacks,
        })
    }

    /// Compiles every table in parallel. Each table succeeds or fails on its
    /// own; results come back in input order.
    pub fn compile_all(&self, tables: &[TableSettings]) -> Vec<(TableName, LoadResult<TableReport>)> {
        tables
            .par_iter()
            .map(|settings| {
                let result = self.compile(settings);
                if let Err(e) = &result {
                    tracing::error!(table = %settings.name, "{:#}", e);
                }
                (settings.name.clone(), result)
            })
            .collect()
    }

    /// Checks every table in parallel.
    pub fn check_all(&self, tables: &[TableSettings]) -> Vec<(TableName, LoadResult<Schema>)> {
        tables
            .par_iter()
            .map(|settings| (settings.name.clone(), self.check(settings)))
            .collect()
    }
}

/// Writes `bytes` to a temp file next to `path`, then renames it into place.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> LoadResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path)
        .map_err(|e| anyhow::anyhow!("Failed to persist {}: {}", path.display(), e.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRCRAFT: &str = "\
#\tAircraft\t\t\n\
#\tId\t\tThrusterId\n\
#\tid\t\tint\n\
#\t\tnote\tthruster\n\
\t10000\tplayer ship\t30000\n\
\t10001\tenemy ship\t30001\n";

    #[test]
    fn compile_source_reports_rows_and_pool() {
        let compiled = compile_source(
            AIRCRAFT,
            &LoadOptions::default(),
            &MatrixLayout::default(),
            BlobFormat::Raw,
            &TypeRegistry::new(),
        )
        .unwrap();

        assert_eq!(compiled.encoded.rows, 2);
        assert!(compiled.encoded.fallbacks.is_empty());
        assert!(compiled.pool.is_empty());
        assert_eq!(compiled.schema.columns()[1].name, "Id");
    }

    #[test]
    fn check_rejects_bad_column_name() {
        let text = AIRCRAFT.replace("ThrusterId", "thruster id");
        let err = check_source(
            &text,
            &LoadOptions::default(),
            &MatrixLayout::default(),
            &TypeRegistry::new(),
        )
        .unwrap_err();
        assert!(matches!(err, SchemaError::InvalidColumnName { .. }), "{err}");
    }

    #[test]
    fn write_atomic_replaces_existing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("Armor.bytes");

        write_atomic(&path, &[1, 2, 3]).unwrap();
        write_atomic(&path, &[4]).unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), vec![4]);
        let leftovers = std::fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
