//! Print a table's string pool
//!
//! The pool lists every distinct string cell, most frequent first.

use anyhow::Result;
use clap::Parser;
use console::style;
use datatable_content::TableCompiler;
use datatable_core::TypeRegistry;

use super::OutputFormat;
use crate::utils::{ManifestArgs, print_json, table_settings};

/// Print a table's string pool
#[derive(Parser)]
pub struct Strings {
    /// Table whose source to scan
    #[arg(value_name = "TABLE")]
    table: String,

    #[command(flatten)]
    manifest: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Strings {
    pub fn execute(self) -> Result<()> {
        let manifest = self.manifest.load()?;
        let settings = table_settings(&manifest, &self.table)?;

        let types = TypeRegistry::new();
        let compiled = TableCompiler::new(&types).compile_in_memory(&settings)?;
        let pool = compiled.pool;

        match self.format {
            OutputFormat::Summary => {
                println!(
                    "{} {} ({} strings)",
                    style("String pool:").bold().cyan(),
                    settings.name,
                    pool.len()
                );
                for (index, (text, count)) in pool.iter().enumerate() {
                    println!("  {:>4}  {:>4}x  {:?}", index, count, text);
                }
            }
            OutputFormat::Json => print_json(&pool)?,
            OutputFormat::Debug => println!("{:#?}", pool),
        }
        Ok(())
    }
}
