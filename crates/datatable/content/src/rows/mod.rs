//! Typed rows for the game's tables.
//!
//! Each row type declares its wire columns and converts from a decoded
//! [`Record`]. [`LoadedTable`] holds one typed table per [`TableKind`], so a
//! registry can store tables of every shape side by side.

mod actors;
mod media;
mod upgrade;

pub use actors::{AircraftRow, ArmorRow, AsteroidRow, ThrusterRow, WeaponRow};
pub use media::{EntityRow, MusicRow, SceneRow, SoundRow, UiFormRow, UiSoundRow};
pub use upgrade::UpgradeRow;

use datatable_core::{
    DataTable, DuplicateIdPolicy, FieldError, IndexError, Record, Row, RowLayout, SchemaError,
    TypeRegistry,
};

use crate::kind::TableKind;

/// Errors from turning decoded records into a typed table.
#[derive(Debug, thiserror::Error)]
pub enum RowBuildError {
    #[error(transparent)]
    Index(#[from] IndexError),

    #[error(transparent)]
    Field(#[from] FieldError),
}

/// A row type with a fixed column declaration.
pub trait DataRow: Row + TableSlot {
    const KIND: TableKind;

    /// `(name, type keyword)` pairs in wire order, identifier first.
    const COLUMNS: &'static [(&'static str, &'static str)];

    fn from_record(record: &Record) -> Result<Self, FieldError>;

    /// Row layout the decoder expects for this row type.
    fn layout(registry: &TypeRegistry) -> Result<RowLayout, SchemaError> {
        RowLayout::declare(registry, Self::COLUMNS)
    }
}

/// Moves a typed table in and out of [`LoadedTable`].
pub trait TableSlot: Sized {
    fn wrap(table: DataTable<Self>) -> LoadedTable;

    fn slot(table: &LoadedTable) -> Option<&DataTable<Self>>;
}

/// Indexes `records` under `policy` and converts each one to `R`.
pub fn build_table<R: DataRow>(
    records: Vec<Record>,
    policy: DuplicateIdPolicy,
) -> Result<DataTable<R>, RowBuildError> {
    let indexed = DataTable::from_rows(records, policy)?;
    Ok(indexed.try_map(|record| R::from_record(&record))?)
}

macro_rules! data_rows {
    ($($kind:ident => $row:ty),+ $(,)?) => {
        /// A typed table of any known kind.
        #[derive(Clone, Debug)]
        pub enum LoadedTable {
            $($kind(DataTable<$row>),)+
        }

        impl LoadedTable {
            pub fn kind(&self) -> TableKind {
                match self {
                    $(Self::$kind(_) => TableKind::$kind,)+
                }
            }

            pub fn row_count(&self) -> usize {
                match self {
                    $(Self::$kind(table) => table.row_count(),)+
                }
            }

            pub fn is_empty(&self) -> bool {
                self.row_count() == 0
            }

            /// Identifiers in ascending order.
            pub fn ids(&self) -> Vec<i32> {
                match self {
                    $(Self::$kind(table) => table.ids().collect(),)+
                }
            }

            /// Identifiers replaced by later rows while indexing.
            pub fn overridden_ids(&self) -> &[i32] {
                match self {
                    $(Self::$kind(table) => table.overridden_ids(),)+
                }
            }
        }

        impl TableKind {
            /// Declared columns of this kind's row type.
            pub fn columns(self) -> &'static [(&'static str, &'static str)] {
                match self {
                    $(Self::$kind => <$row as DataRow>::COLUMNS,)+
                }
            }

            pub fn layout(self, registry: &TypeRegistry) -> Result<RowLayout, SchemaError> {
                RowLayout::declare(registry, self.columns())
            }

            /// Builds this kind's typed table from decoded records.
            pub fn build(
                self,
                records: Vec<Record>,
                policy: DuplicateIdPolicy,
            ) -> Result<LoadedTable, RowBuildError> {
                match self {
                    $(Self::$kind => build_table::<$row>(records, policy).map(LoadedTable::$kind),)+
                }
            }
        }

        $(
            impl TableSlot for $row {
                fn wrap(table: DataTable<Self>) -> LoadedTable {
                    LoadedTable::$kind(table)
                }

                fn slot(table: &LoadedTable) -> Option<&DataTable<Self>> {
                    match table {
                        LoadedTable::$kind(table) => Some(table),
                        #[allow(unreachable_patterns)]
                        _ => None,
                    }
                }
            }

            impl Row for $row {
                fn id(&self) -> i32 {
                    self.id
                }
            }
        )+
    };
}

data_rows! {
    Aircraft => AircraftRow,
    Armor => ArmorRow,
    Asteroid => AsteroidRow,
    Entity => EntityRow,
    Music => MusicRow,
    Scene => SceneRow,
    Sound => SoundRow,
    Thruster => ThrusterRow,
    UiForm => UiFormRow,
    UiSound => UiSoundRow,
    Weapon => WeaponRow,
    Upgrade => UpgradeRow,
}

/// Leading positive values of a numbered id group.
///
/// `WeaponId0 = 40000, WeaponId1 = 0, WeaponId2 = 40002` yields `[40000]`;
/// the first non-positive id ends the list.
fn leading_ids(record: &Record, prefix: &str) -> Result<Vec<i32>, FieldError> {
    Ok(record
        .field_group_as::<i32>(prefix)?
        .into_iter()
        .take_while(|id| *id > 0)
        .collect())
}
