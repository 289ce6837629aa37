//! `tables.toml` manifest: where tables live and how they are laid out.
//!
//! ```toml
//! source_dir = "source"
//! output_dir = "bytes"
//!
//! [defaults]
//! delimiter = "\t"
//! trim = "\""
//! content_start_row = 4
//!
//! [[tables]]
//! name = "Upgrade"
//! default_row = 3
//! ```
//!
//! Relative directories resolve against the manifest's own directory.

use std::env;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Context;
use datatable_core::{BlobFormat, DuplicateIdPolicy, LoadOptions, MatrixLayout};
use serde::{Deserialize, Serialize};

use crate::kind::TableName;
use crate::load::{LoadResult, read_file};

/// Manifest file name looked up when `DATATABLE_MANIFEST` is unset.
pub const DEFAULT_MANIFEST: &str = "tables.toml";

pub const ENV_MANIFEST: &str = "DATATABLE_MANIFEST";
pub const ENV_SOURCE_DIR: &str = "DATATABLE_SOURCE_DIR";
pub const ENV_OUTPUT_DIR: &str = "DATATABLE_OUTPUT_DIR";

/// Settings shared by every table unless a table entry overrides them.
///
/// Row and column indices are signed so that a negative value in the file is
/// reported as a layout error rather than a TOML type error.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TableDefaults {
    pub delimiter: char,
    /// Every character in this string is trimmed from both ends of a cell.
    pub trim: String,
    pub name_row: i64,
    pub type_row: i64,
    pub default_row: Option<i64>,
    pub comment_row: Option<i64>,
    pub content_start_row: i64,
    pub id_column: i64,
    pub format: BlobFormat,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Default for TableDefaults {
    fn default() -> Self {
        Self {
            delimiter: '\t',
            trim: "\"".to_owned(),
            name_row: 1,
            type_row: 2,
            default_row: None,
            comment_row: Some(3),
            content_start_row: 4,
            id_column: 1,
            format: BlobFormat::Raw,
            duplicate_ids: DuplicateIdPolicy::Reject,
        }
    }
}

/// One `[[tables]]` entry. Unset fields fall back to `[defaults]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableEntry {
    pub name: TableName,
    /// Source path relative to `source_dir`; `{name}.txt` when unset.
    #[serde(default)]
    pub source: Option<PathBuf>,
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub trim: Option<String>,
    #[serde(default)]
    pub name_row: Option<i64>,
    #[serde(default)]
    pub type_row: Option<i64>,
    #[serde(default)]
    pub default_row: Option<i64>,
    #[serde(default)]
    pub comment_row: Option<i64>,
    #[serde(default)]
    pub content_start_row: Option<i64>,
    #[serde(default)]
    pub id_column: Option<i64>,
    #[serde(default)]
    pub format: Option<BlobFormat>,
    #[serde(default)]
    pub duplicate_ids: Option<DuplicateIdPolicy>,
}

impl TableEntry {
    pub fn new(name: TableName) -> Self {
        Self {
            name,
            source: None,
            delimiter: None,
            trim: None,
            name_row: None,
            type_row: None,
            default_row: None,
            comment_row: None,
            content_start_row: None,
            id_column: None,
            format: None,
            duplicate_ids: None,
        }
    }
}

/// Parsed `tables.toml`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub defaults: TableDefaults,
    #[serde(default)]
    pub tables: Vec<TableEntry>,
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("source")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("bytes")
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            defaults: TableDefaults::default(),
            tables: Vec::new(),
        }
    }
}

/// Fully resolved settings for one table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableSettings {
    pub name: TableName,
    pub source: PathBuf,
    pub output: PathBuf,
    pub options: LoadOptions,
    pub layout: MatrixLayout,
    pub format: BlobFormat,
    pub duplicate_ids: DuplicateIdPolicy,
}

impl Manifest {
    /// Loads a manifest and resolves its directories against the file's
    /// parent directory.
    pub fn load(path: &Path) -> LoadResult<Self> {
        let content = read_file(path)?;
        let mut manifest = Self::parse(&content)
            .with_context(|| format!("Failed to parse manifest {}", path.display()))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        manifest.source_dir = base.join(&manifest.source_dir);
        manifest.output_dir = base.join(&manifest.output_dir);
        Ok(manifest)
    }

    /// Parses manifest text without touching the filesystem.
    pub fn parse(content: &str) -> LoadResult<Self> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse manifest TOML: {}", e))
    }

    /// Loads the manifest named by `DATATABLE_MANIFEST` (or `tables.toml`)
    /// and applies the directory overrides from the environment.
    pub fn from_env() -> LoadResult<Self> {
        let path = manifest_path_from_env();
        let mut manifest = Self::load(&path)?;
        manifest.apply_env();
        Ok(manifest)
    }

    /// Applies `DATATABLE_SOURCE_DIR` and `DATATABLE_OUTPUT_DIR`.
    pub fn apply_env(&mut self) {
        self.override_dirs(read_env(ENV_SOURCE_DIR), read_env(ENV_OUTPUT_DIR));
    }

    pub fn override_dirs(&mut self, source_dir: Option<PathBuf>, output_dir: Option<PathBuf>) {
        if let Some(dir) = source_dir {
            self.source_dir = dir;
        }
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
    }

    pub fn entry(&self, name: &TableName) -> Option<&TableEntry> {
        self.tables.iter().find(|entry| &entry.name == name)
    }

    /// Settings for `name`; tables without an entry use the defaults.
    pub fn settings(&self, name: &TableName) -> LoadResult<TableSettings> {
        match self.entry(name) {
            Some(entry) => self.resolve(entry),
            None => self.resolve(&TableEntry::new(name.clone())),
        }
    }

    /// Settings for every `[[tables]]` entry, in file order.
    pub fn all_settings(&self) -> LoadResult<Vec<TableSettings>> {
        self.tables.iter().map(|entry| self.resolve(entry)).collect()
    }

    fn resolve(&self, entry: &TableEntry) -> LoadResult<TableSettings> {
        let d = &self.defaults;
        let layout = MatrixLayout::from_signed(
            entry.name_row.unwrap_or(d.name_row),
            entry.type_row.unwrap_or(d.type_row),
            entry.default_row.or(d.default_row),
            entry.comment_row.or(d.comment_row),
            entry.content_start_row.unwrap_or(d.content_start_row),
            entry.id_column.unwrap_or(d.id_column),
        )
        .with_context(|| format!("Invalid layout for table {}", entry.name))?;

        let trim = entry.trim.as_deref().unwrap_or(&d.trim);
        let options = LoadOptions {
            delimiter: entry.delimiter.unwrap_or(d.delimiter),
            trim_chars: trim.chars().collect(),
        };

        let source = match &entry.source {
            Some(path) => self.source_dir.join(path),
            None => self.source_dir.join(entry.name.source_file()),
        };

        Ok(TableSettings {
            name: entry.name.clone(),
            source,
            output: self.output_dir.join(entry.name.asset_file()),
            options,
            layout,
            format: entry.format.unwrap_or(d.format),
            duplicate_ids: entry.duplicate_ids.unwrap_or(d.duplicate_ids),
        })
    }
}

/// Manifest path from `DATATABLE_MANIFEST`, else [`DEFAULT_MANIFEST`].
pub fn manifest_path_from_env() -> PathBuf {
    read_env(ENV_MANIFEST).unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST))
}

fn read_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
source_dir = "tables"
output_dir = "out"

[defaults]
format = "fingerprinted"

[[tables]]
name = "Aircraft"

[[tables]]
name = "Upgrade"
default_row = 3
content_start_row = 5
duplicate_ids = "override"

[[tables]]
name = "Weapon_Boss"
source = "boss/weapons.tsv"
delimiter = ","
trim = ""
"#;

    #[test]
    fn defaults_match_source_layout() {
        let manifest = Manifest::parse("").unwrap();
        let settings = manifest.settings(&"Armor".parse().unwrap()).unwrap();
        assert_eq!(settings.layout, MatrixLayout::default());
        assert_eq!(settings.options, LoadOptions::default());
        assert_eq!(settings.format, BlobFormat::Raw);
        assert_eq!(settings.duplicate_ids, DuplicateIdPolicy::Reject);
        assert_eq!(settings.source, Path::new("source/Armor.txt"));
        assert_eq!(settings.output, Path::new("bytes/Armor.bytes"));
    }

    #[test]
    fn entries_override_defaults() {
        let manifest = Manifest::parse(SAMPLE).unwrap();
        let all = manifest.all_settings().unwrap();
        assert_eq!(all.len(), 3);

        assert_eq!(all[0].format, BlobFormat::Fingerprinted);
        assert_eq!(all[0].source, Path::new("tables/Aircraft.txt"));

        assert_eq!(all[1].layout.default_row, Some(3));
        assert_eq!(all[1].layout.content_start_row, 5);
        assert_eq!(all[1].layout.name_row, 1);
        assert_eq!(all[1].duplicate_ids, DuplicateIdPolicy::Override);

        assert_eq!(all[2].source, Path::new("tables/boss/weapons.tsv"));
        assert_eq!(all[2].output, Path::new("out/Weapon_Boss.bytes"));
        assert_eq!(all[2].options.delimiter, ',');
        assert!(all[2].options.trim_chars.is_empty());
    }

    #[test]
    fn negative_index_is_a_layout_error() {
        let manifest = Manifest::parse("[defaults]\nid_column = -1\n").unwrap();
        let err = manifest.settings(&"Armor".parse().unwrap()).unwrap_err();
        assert!(format!("{err:#}").contains("id column"), "{err:#}");
    }

    #[test]
    fn malformed_table_name_is_rejected() {
        let err = Manifest::parse("[[tables]]\nname = \"A_B_C\"\n").unwrap_err();
        assert!(err.to_string().contains("separator"), "{err}");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Manifest::parse("[defaults]\ndelimeter = \",\"\n").is_err());
    }

    #[test]
    fn directory_overrides() {
        let mut manifest = Manifest::parse(SAMPLE).unwrap();
        manifest.override_dirs(None, Some(PathBuf::from("/tmp/assets")));
        assert_eq!(manifest.source_dir, Path::new("tables"));
        assert_eq!(manifest.output_dir, Path::new("/tmp/assets"));
    }
}
