//! Utility functions for datatable commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use datatable_content::manifest::manifest_path_from_env;
use datatable_content::{Manifest, TableName, TableSettings};

/// Manifest selection shared by every command.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Path to tables.toml (defaults to $DATATABLE_MANIFEST, then ./tables.toml)
    #[arg(short, long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,
}

impl ManifestArgs {
    /// Loads the manifest and applies `DATATABLE_SOURCE_DIR` /
    /// `DATATABLE_OUTPUT_DIR`.
    pub fn load(&self) -> Result<Manifest> {
        let Some(path) = &self.manifest else {
            return Manifest::from_env().with_context(|| {
                format!("Failed to load manifest {}", manifest_path_from_env().display())
            });
        };
        let mut manifest = Manifest::load(path)
            .with_context(|| format!("Failed to load manifest {}", path.display()))?;
        manifest.apply_env();
        Ok(manifest)
    }
}

/// Settings for the named tables, or for every manifest table when `names`
/// is empty.
pub fn select_tables(manifest: &Manifest, names: &[String]) -> Result<Vec<TableSettings>> {
    if names.is_empty() {
        return manifest.all_settings();
    }
    names.iter().map(|name| table_settings(manifest, name)).collect()
}

pub fn table_settings(manifest: &Manifest, name: &str) -> Result<TableSettings> {
    let name: TableName = name
        .parse()
        .with_context(|| format!("Invalid table name: {name}"))?;
    manifest.settings(&name)
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize to JSON")?;
    println!("{}", json);
    Ok(())
}

pub fn format_bytes(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}
