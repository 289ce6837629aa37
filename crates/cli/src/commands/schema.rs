//! Print a table's schema
//!
//! The JSON form is the input for external code generators: column names,
//! canonical type keywords, defaults and designer comments.

use anyhow::Result;
use clap::Parser;
use console::style;
use datatable_content::TableCompiler;
use datatable_core::{Schema, TypeRegistry};

use super::OutputFormat;
use crate::utils::{ManifestArgs, print_json, table_settings};

/// Print a table's schema for code generators
#[derive(Parser)]
pub struct SchemaDump {
    /// Table whose source to read
    #[arg(value_name = "TABLE")]
    table: String,

    /// Include comment columns
    #[arg(long)]
    all: bool,

    #[command(flatten)]
    manifest: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl SchemaDump {
    pub fn execute(self) -> Result<()> {
        let manifest = self.manifest.load()?;
        let settings = table_settings(&manifest, &self.table)?;

        let types = TypeRegistry::new();
        let schema = TableCompiler::new(&types).check(&settings)?;

        match self.format {
            OutputFormat::Summary => print_summary(&schema, self.all),
            OutputFormat::Json => print_json(&schema)?,
            OutputFormat::Debug => println!("{:#?}", schema.columns()),
        }
        Ok(())
    }
}

fn print_summary(schema: &Schema, all: bool) {
    println!("{} {}", style("Fingerprint:").bold().cyan(), schema.fingerprint());
    println!();
    for column in schema.columns() {
        if column.is_comment && !all {
            continue;
        }
        let marker = if column.is_identifier {
            style("id").yellow().bold()
        } else if column.is_comment {
            style("#").dim()
        } else {
            style(" ").dim()
        };
        let default = column
            .default_value
            .as_deref()
            .map(|d| format!(" = {d}"))
            .unwrap_or_default();
        let comment = column
            .comment
            .as_deref()
            .map(|c| format!("  // {c}"))
            .unwrap_or_default();
        println!(
            "  {:>3} {:>2} {:<24} {:<12}{}{}",
            column.index, marker, column.name, column.type_keyword, default, comment
        );
    }
}
