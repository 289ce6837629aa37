//! Runtime table index keyed by identifier.

use std::collections::BTreeMap;

use crate::error::{ErrorSeverity, TableError};

/// A row stored in a [`DataTable`].
pub trait Row {
    fn id(&self) -> i32;
}

/// What to do when two rows share an identifier.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DuplicateIdPolicy {
    /// Fail the whole table.
    #[default]
    Reject,
    /// Keep the later row and report the replaced identifiers.
    Override,
}

/// Errors raised while indexing rows.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum IndexError {
    #[error("identifier {id} appears more than once")]
    DuplicateId { id: i32 },
}

impl TableError for IndexError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::DuplicateId { .. } => "DUPLICATE_ID",
        }
    }
}

/// Immutable collection of rows, iterated in identifier order.
#[derive(Clone, Debug)]
pub struct DataTable<R> {
    rows: BTreeMap<i32, R>,
    overridden: Vec<i32>,
}

impl<R> Default for DataTable<R> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            overridden: Vec::new(),
        }
    }
}

impl<R: Row> DataTable<R> {
    /// Indexes `rows` under `policy`.
    pub fn from_rows(
        rows: impl IntoIterator<Item = R>,
        policy: DuplicateIdPolicy,
    ) -> Result<Self, IndexError> {
        let mut table = Self::default();
        for row in rows {
            let id = row.id();
            if table.rows.insert(id, row).is_some() {
                match policy {
                    DuplicateIdPolicy::Reject => return Err(IndexError::DuplicateId { id }),
                    DuplicateIdPolicy::Override => table.overridden.push(id),
                }
            }
        }
        Ok(table)
    }

    /// Converts every row, keeping identifiers and override history.
    ///
    /// `f` must preserve each row's identifier.
    pub fn try_map<U, E>(self, mut f: impl FnMut(R) -> Result<U, E>) -> Result<DataTable<U>, E> {
        let rows = self
            .rows
            .into_iter()
            .map(|(id, row)| f(row).map(|mapped| (id, mapped)))
            .collect::<Result<BTreeMap<_, _>, E>>()?;
        Ok(DataTable {
            rows,
            overridden: self.overridden,
        })
    }
}

impl<R> DataTable<R> {
    pub fn get_row(&self, id: i32) -> Option<&R> {
        self.rows.get(&id)
    }

    pub fn has_row(&self, id: i32) -> bool {
        self.rows.contains_key(&id)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every row, ordered by identifier.
    pub fn all_rows(&self) -> Vec<&R> {
        self.rows.values().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &R> + '_ {
        self.rows.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = i32> + '_ {
        self.rows.keys().copied()
    }

    pub fn min_id_row(&self) -> Option<&R> {
        self.rows.values().next()
    }

    pub fn max_id_row(&self) -> Option<&R> {
        self.rows.values().next_back()
    }

    /// Rows matching `predicate`, ordered by identifier.
    pub fn rows_where(&self, mut predicate: impl FnMut(&R) -> bool) -> Vec<&R> {
        self.rows.values().filter(|row| predicate(*row)).collect()
    }

    /// Identifiers replaced under [`DuplicateIdPolicy::Override`], in the
    /// order the replacements happened.
    pub fn overridden_ids(&self) -> &[i32] {
        &self.overridden
    }
}

impl<'a, R> IntoIterator for &'a DataTable<R> {
    type Item = &'a R;
    type IntoIter = std::collections::btree_map::Values<'a, i32, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.values()
    }
}
