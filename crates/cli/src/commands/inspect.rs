//! Decode a compiled asset and print its rows
//!
//! The row layout comes from the table's source text, so any table in the
//! manifest can be inspected, including types with no typed row.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use datatable_content::TableCompiler;
use datatable_core::{BlobFormat, Record, TypeRegistry, decode_table};

use super::OutputFormat;
use crate::utils::{ManifestArgs, format_bytes, print_json, table_settings};

/// Decode a compiled asset and print its rows
#[derive(Parser)]
pub struct Inspect {
    /// Table to inspect (e.g., Aircraft, Aircraft_Enemy)
    #[arg(value_name = "TABLE")]
    table: String,

    /// Only print the row with this identifier
    #[arg(long, value_name = "ID")]
    id: Option<i32>,

    /// Blob framing (defaults to the manifest setting)
    #[arg(long, value_name = "FORMAT")]
    blob_format: Option<BlobFormat>,

    #[command(flatten)]
    manifest: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Inspect {
    pub fn execute(self) -> Result<()> {
        let manifest = self.manifest.load()?;
        let settings = table_settings(&manifest, &self.table)?;

        let types = TypeRegistry::new();
        let schema = TableCompiler::new(&types).check(&settings)?;

        if !settings.output.exists() {
            anyhow::bail!(
                "Asset not found: {}\n\nHint: run `datatable build {}` first",
                settings.output.display(),
                settings.name
            );
        }
        let blob = std::fs::read(&settings.output)
            .with_context(|| format!("Failed to read asset: {}", settings.output.display()))?;

        let format = self.blob_format.unwrap_or(settings.format);
        let records = decode_table(&blob, schema.row_layout(), format)
            .with_context(|| format!("Failed to decode asset: {}", settings.output.display()))?;

        let records: Vec<Record> = match self.id {
            Some(id) => records.into_iter().filter(|r| r.id() == id).collect(),
            None => records,
        };
        if let Some(id) = self.id
            && records.is_empty()
        {
            anyhow::bail!("Table {} has no row with id {}", settings.name, id);
        }

        println!("{} {}", style("Asset:").bold().cyan(), settings.output.display());
        println!("{} {}", style("Size:").bold().cyan(), format_bytes(blob.len()));
        println!("{} {}", style("Format:").bold().cyan(), format);
        println!("{} {}", style("Fingerprint:").bold().cyan(), schema.fingerprint());
        println!();

        match self.format {
            OutputFormat::Summary => print_summary(&records),
            OutputFormat::Json => print_json(&records)?,
            OutputFormat::Debug => println!("{:#?}", records),
        }
        Ok(())
    }
}

fn print_summary(records: &[Record]) {
    println!("{}", style(format!("=== {} rows ===", records.len())).bold().green());
    for record in records {
        let fields: Vec<String> = record
            .fields()
            .skip(1)
            .map(|(name, value)| format!("{name}={value}"))
            .collect();
        println!("  {} {}", style(record.id()).yellow(), fields.join("  "));
    }
}
