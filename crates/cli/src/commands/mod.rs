//! Command implementations for datatable
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod build;
mod check;
mod inspect;
mod schema;
mod strings;

pub use build::Build;
pub use check::Check;
pub use inspect::Inspect;
pub use schema::SchemaDump;
pub use strings::Strings;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
    /// Pretty-printed debug format
    Debug,
}
