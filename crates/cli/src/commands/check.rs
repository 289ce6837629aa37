//! Raw data check
//!
//! Loads each source table, resolves its column types and validates column
//! names. Nothing is encoded or written.

use anyhow::Result;
use clap::Parser;
use console::style;
use datatable_content::TableCompiler;
use datatable_core::TypeRegistry;

use crate::utils::{ManifestArgs, select_tables};

/// Run the raw data check without writing anything
#[derive(Parser)]
pub struct Check {
    /// Tables to check (defaults to every table in the manifest)
    #[arg(value_name = "TABLE")]
    tables: Vec<String>,

    #[command(flatten)]
    manifest: ManifestArgs,
}

impl Check {
    pub fn execute(self) -> Result<()> {
        let manifest = self.manifest.load()?;
        let tables = select_tables(&manifest, &self.tables)?;

        let types = TypeRegistry::new();
        let results = TableCompiler::new(&types).check_all(&tables);

        let mut failed = 0;
        for (name, result) in &results {
            match result {
                Ok(schema) => println!(
                    "{} {} ({} encoded columns)",
                    style("✓").green().bold(),
                    style(name).cyan(),
                    schema.encoded_columns().count()
                ),
                Err(e) => {
                    failed += 1;
                    println!("{} {}: {:#}", style("✗").red().bold(), style(name).cyan(), e);
                }
            }
        }

        if failed > 0 {
            anyhow::bail!("{} of {} tables failed the raw data check", failed, results.len());
        }
        Ok(())
    }
}
