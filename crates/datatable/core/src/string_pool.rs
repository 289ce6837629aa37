//! Deduplicated table of the strings appearing in string-typed columns.
//!
//! Ordering is fully deterministic: occurrence count descending, then the
//! string itself in byte order. Rows are still encoded with full strings; the
//! pool is a side artifact for tooling and downstream consumers.

use std::collections::HashMap;

use crate::matrix::RawMatrix;
use crate::schema::ColumnSchema;

/// Distinct strings with occurrence counts, indexed `0..len()`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StringPool {
    entries: Vec<(String, usize)>,
    #[cfg_attr(feature = "serde", serde(skip))]
    index: HashMap<String, usize>,
}

impl StringPool {
    /// Counts every string-typed cell of every non-comment content row.
    pub fn build(matrix: &RawMatrix, columns: &[ColumnSchema], content_start_row: usize) -> Self {
        let string_columns: Vec<usize> = columns
            .iter()
            .filter(|column| column.is_string && !column.is_comment)
            .map(|column| column.index)
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for (_, row) in matrix.content_rows(content_start_row) {
            for &column in &string_columns {
                if let Some(cell) = row.get(column) {
                    *counts.entry(cell.as_str()).or_default() += 1;
                }
            }
        }

        let mut entries: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(text, count)| (text.to_owned(), count))
            .collect();
        entries.sort_unstable_by(|(a, a_count), (b, b_count)| {
            b_count.cmp(a_count).then_with(|| a.as_bytes().cmp(b.as_bytes()))
        });

        let index = entries
            .iter()
            .enumerate()
            .map(|(position, (text, _))| (text.clone(), position))
            .collect();

        Self { entries, index }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(|(text, _)| text.as_str())
    }

    pub fn index_of(&self, text: &str) -> Option<usize> {
        self.index.get(text).copied()
    }

    /// Occurrence count of `text`, zero when absent.
    pub fn count_of(&self, text: &str) -> usize {
        self.index_of(text).map_or(0, |position| self.entries[position].1)
    }

    /// `(string, count)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.entries.iter().map(|(text, count)| (text.as_str(), *count))
    }
}
