//! Upgrade cards offered between waves.

use datatable_core::{FieldError, Record};
use serde::Serialize;

use super::DataRow;
use crate::kind::TableKind;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpgradeRow {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub rarity: i32,
    /// Effect selector; the meaning of the params depends on it.
    pub type_s: String,
    /// `(n, ParamN)` pairs in ascending `n`.
    pub params: Vec<(u32, String)>,
}

impl UpgradeRow {
    /// The value of `Param{n}`.
    pub fn param(&self, n: u32) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == n)
            .map(|(_, value)| value.as_str())
    }

    pub fn param_at(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(|(_, value)| value.as_str())
    }

    pub fn param_count(&self) -> usize {
        self.params.len()
    }
}

impl DataRow for UpgradeRow {
    const KIND: TableKind = TableKind::Upgrade;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("Name", "string"),
        ("Description", "string"),
        ("Rarity", "int"),
        ("TypeS", "string"),
        ("Param1", "string"),
        ("Param2", "string"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        let keys = record.field_group("Param").into_iter().map(|(n, _)| n);
        let values = record.field_group_as::<String>("Param")?;

        Ok(Self {
            id: record.id(),
            name: record.field("Name")?,
            description: record.field("Description")?,
            rarity: record.field("Rarity")?,
            type_s: record.field("TypeS")?,
            params: keys.zip(values).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use datatable_core::Value;

    use super::*;

    #[test]
    fn params_are_numbered_from_one() {
        let names: Arc<[String]> = UpgradeRow::COLUMNS
            .iter()
            .map(|(name, _)| name.to_string())
            .collect();
        let text = |s: &str| Value::String(s.to_owned());
        let record = Record::new(
            1,
            names,
            vec![
                Value::I32(1),
                text("Overdrive"),
                text("Fire faster"),
                Value::I32(2),
                text("AttackInterval"),
                text("0.8"),
                text(""),
            ],
        );

        let row = UpgradeRow::from_record(&record).unwrap();
        assert_eq!(row.param_count(), 2);
        assert_eq!(row.param(1), Some("0.8"));
        assert_eq!(row.param_at(1), Some(""));
        assert_eq!(row.param(3), None);
    }
}
