//! Compile tables to binary assets
//!
//! Every selected table compiles independently; a failing table is reported
//! and leaves no asset, the others are still written.

use anyhow::Result;
use clap::Parser;
use console::style;
use datatable_content::{TableCompiler, TableReport};
use datatable_core::TypeRegistry;

use super::OutputFormat;
use crate::utils::{ManifestArgs, format_bytes, print_json, select_tables};

/// Compile tables to binary assets
#[derive(Parser)]
pub struct Build {
    /// Tables to compile (defaults to every table in the manifest)
    #[arg(value_name = "TABLE")]
    tables: Vec<String>,

    #[command(flatten)]
    manifest: ManifestArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Build {
    pub fn execute(self) -> Result<()> {
        let manifest = self.manifest.load()?;
        let tables = select_tables(&manifest, &self.tables)?;

        let types = TypeRegistry::new();
        let results = TableCompiler::new(&types).compile_all(&tables);

        let mut reports = Vec::new();
        let mut failures = Vec::new();
        for (name, result) in results {
            match result {
                Ok(report) => reports.push(report),
                Err(e) => failures.push((name, e)),
            }
        }

        match self.format {
            OutputFormat::Summary => print_summary(&reports),
            OutputFormat::Json => print_json(&reports)?,
            OutputFormat::Debug => println!("{:#?}", reports),
        }

        if !failures.is_empty() {
            eprintln!();
            for (name, e) in &failures {
                eprintln!("{} {}: {:#}", style("✗").red().bold(), style(name).cyan(), e);
            }
            anyhow::bail!("{} of {} tables failed", failures.len(), tables.len());
        }

        Ok(())
    }
}

fn print_summary(reports: &[TableReport]) {
    println!("{}", style("=== Compiled Tables ===").bold().green());
    for report in reports {
        println!(
            "{} {} {:>5} rows  {:>12}  pool {:>4}  {}",
            style("✓").green().bold(),
            style(format!("{:<16}", report.name.to_string())).cyan(),
            report.rows,
            format_bytes(report.bytes),
            report.pool_size,
            report.format,
        );
        for notice in &report.fallbacks {
            println!(
                "    {} row {} '{}': '{}' → default '{}'",
                style("fallback").yellow(),
                notice.row,
                notice.name,
                notice.raw_text,
                notice.default_value,
            );
        }
    }
}
