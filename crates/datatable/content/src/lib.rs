//! Table content for the game: manifest, compile pipeline and runtime loading.
//!
//! - [`manifest`]: `tables.toml`, resolved into per-table [`TableSettings`]
//! - [`compile`]: source text → `.bytes` assets, one table per rayon task
//! - [`load`]: `.bytes` (or `.txt`) → typed [`DataTable`](datatable_core::DataTable)s
//! - [`rows`] / [`kind`]: typed rows for each known table and their names
//! - [`registry`]: every loaded table keyed by name
//!
//! Codecs, schemas and the wire format live in `datatable-core`; this crate
//! adds the filesystem and logging.

pub mod compile;
pub mod kind;
pub mod load;
pub mod manifest;
pub mod registry;
pub mod rows;

pub use compile::{
    CompileError, CompiledTable, TableCompiler, TableReport, check_source, compile_source,
    write_atomic,
};
pub use kind::{TableKind, TableName, TableNameError};
pub use load::{ContentFactory, LoadResult};
pub use manifest::{Manifest, TableDefaults, TableEntry, TableSettings};
pub use registry::{RegistryError, TableRegistry};
pub use rows::{
    AircraftRow, ArmorRow, AsteroidRow, DataRow, EntityRow, LoadedTable, MusicRow, RowBuildError,
    SceneRow, SoundRow, TableSlot, ThrusterRow, UiFormRow, UiSoundRow, UpgradeRow, WeaponRow,
    build_table,
};
