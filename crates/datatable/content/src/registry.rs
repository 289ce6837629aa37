//! Loaded tables keyed by table name.

use std::collections::BTreeMap;

use datatable_core::DataTable;

use crate::kind::{TableKind, TableName, TableNameError};
use crate::rows::{DataRow, LoadedTable};

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Name(#[from] TableNameError),

    #[error("table {name} holds {expected} rows, got a {found} table")]
    KindMismatch {
        name: TableName,
        expected: TableKind,
        found: TableKind,
    },

    #[error("table {name} is already registered")]
    AlreadyLoaded { name: TableName },
}

/// Every loaded table, built once and passed around by reference.
#[derive(Clone, Debug, Default)]
pub struct TableRegistry {
    tables: BTreeMap<TableName, LoadedTable>,
}

impl TableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a table. Its kind must match the name's type.
    pub fn insert(&mut self, name: TableName, table: LoadedTable) -> Result<(), RegistryError> {
        let expected = name.kind()?;
        if table.kind() != expected {
            return Err(RegistryError::KindMismatch {
                name,
                expected,
                found: table.kind(),
            });
        }
        if self.tables.contains_key(&name) {
            return Err(RegistryError::AlreadyLoaded { name });
        }
        self.tables.insert(name, table);
        Ok(())
    }

    /// Adds a typed table under `name`.
    pub fn insert_table<R: DataRow>(
        &mut self,
        name: TableName,
        table: DataTable<R>,
    ) -> Result<(), RegistryError> {
        self.insert(name, R::wrap(table))
    }

    /// The typed table registered under `name`.
    pub fn get<R: DataRow>(&self, name: &TableName) -> Option<&DataTable<R>> {
        self.tables.get(name).and_then(R::slot)
    }

    /// The un-instanced table of `R`'s kind (`Aircraft`, not `Aircraft_Player`).
    pub fn table<R: DataRow>(&self) -> Option<&DataTable<R>> {
        self.get(&TableName::from(R::KIND))
    }

    pub fn loaded(&self, name: &TableName) -> Option<&LoadedTable> {
        self.tables.get(name)
    }

    pub fn contains(&self, name: &TableName) -> bool {
        self.tables.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &TableName> + '_ {
        self.tables.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TableName, &LoadedTable)> + '_ {
        self.tables.iter()
    }
}
