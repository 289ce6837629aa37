//! Table kinds and table names.
//!
//! A table name is `Type` or `Type_Instance`. The type half selects the row
//! shape; the instance half lets several tables share one shape
//! (`Aircraft_Player`, `Aircraft_Enemy`).

use std::fmt;
use std::str::FromStr;

/// Row shapes known to the game.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    serde::Serialize,
)]
pub enum TableKind {
    Aircraft,
    Armor,
    Asteroid,
    Entity,
    Music,
    Scene,
    Sound,
    Thruster,
    #[strum(serialize = "UIForm")]
    #[serde(rename = "UIForm")]
    UiForm,
    #[strum(serialize = "UISound")]
    #[serde(rename = "UISound")]
    UiSound,
    Weapon,
    Upgrade,
}

impl TableKind {
    pub const ALL: [TableKind; 12] = [
        Self::Aircraft,
        Self::Armor,
        Self::Asteroid,
        Self::Entity,
        Self::Music,
        Self::Scene,
        Self::Sound,
        Self::Thruster,
        Self::UiForm,
        Self::UiSound,
        Self::Weapon,
        Self::Upgrade,
    ];
}

/// Errors from parsing a table name.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TableNameError {
    #[error("table name is empty")]
    Empty,

    #[error("table name '{name}' has more than one '_' separator")]
    TooManySeparators { name: String },

    #[error("table name '{name}' has an empty type or instance")]
    EmptyPart { name: String },

    #[error("table '{name}' has no known row type '{type_name}'")]
    UnknownKind { name: String, type_name: String },
}

/// Parsed `Type` or `Type_Instance` table name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableName {
    type_name: String,
    instance: Option<String>,
}

impl TableName {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn instance(&self) -> Option<&str> {
        self.instance.as_deref()
    }

    /// The row shape of this table.
    pub fn kind(&self) -> Result<TableKind, TableNameError> {
        self.type_name
            .parse()
            .map_err(|_| TableNameError::UnknownKind {
                name: self.to_string(),
                type_name: self.type_name.clone(),
            })
    }

    /// `{name}.txt`
    pub fn source_file(&self) -> String {
        format!("{self}.txt")
    }

    /// `{name}.bytes`
    pub fn asset_file(&self) -> String {
        format!("{self}.bytes")
    }
}

impl From<TableKind> for TableName {
    fn from(kind: TableKind) -> Self {
        Self {
            type_name: kind.to_string(),
            instance: None,
        }
    }
}

impl FromStr for TableName {
    type Err = TableNameError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        if name.is_empty() {
            return Err(TableNameError::Empty);
        }

        let mut parts = name.split('_');
        let type_name = parts.next().unwrap_or_default();
        let instance = parts.next();
        if parts.next().is_some() {
            return Err(TableNameError::TooManySeparators {
                name: name.to_owned(),
            });
        }
        if type_name.is_empty() || instance.is_some_and(str::is_empty) {
            return Err(TableNameError::EmptyPart {
                name: name.to_owned(),
            });
        }

        Ok(Self {
            type_name: type_name.to_owned(),
            instance: instance.map(str::to_owned),
        })
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.instance {
            Some(instance) => write!(f, "{}_{}", self.type_name, instance),
            None => f.write_str(&self.type_name),
        }
    }
}

impl serde::Serialize for TableName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for TableName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_and_instanced_names() {
        let plain: TableName = "Aircraft".parse().unwrap();
        assert_eq!(plain.type_name(), "Aircraft");
        assert_eq!(plain.instance(), None);
        assert_eq!(plain.kind(), Ok(TableKind::Aircraft));

        let instanced: TableName = "Aircraft_Player".parse().unwrap();
        assert_eq!(instanced.instance(), Some("Player"));
        assert_eq!(instanced.to_string(), "Aircraft_Player");
        assert_eq!(instanced.asset_file(), "Aircraft_Player.bytes");
        assert_eq!(instanced.source_file(), "Aircraft_Player.txt");
    }

    #[test]
    fn rejects_extra_separators() {
        assert_eq!(
            "Aircraft_Player_Two".parse::<TableName>(),
            Err(TableNameError::TooManySeparators {
                name: "Aircraft_Player_Two".into()
            })
        );
        assert!(matches!(
            "Aircraft_".parse::<TableName>(),
            Err(TableNameError::EmptyPart { .. })
        ));
        assert_eq!("".parse::<TableName>(), Err(TableNameError::Empty));
    }

    #[test]
    fn unknown_type_parses_but_has_no_kind() {
        let name: TableName = "TestConfig".parse().unwrap();
        assert!(matches!(name.kind(), Err(TableNameError::UnknownKind { .. })));
    }

    #[test]
    fn ui_kinds_keep_source_spelling() {
        assert_eq!(TableKind::UiForm.to_string(), "UIForm");
        assert_eq!("UISound".parse::<TableKind>(), Ok(TableKind::UiSound));
        assert_eq!(TableName::from(TableKind::UiSound).to_string(), "UISound");
    }
}
