//! Asset-reference rows: entities, scenes, music, sounds and UI forms.

use datatable_core::{FieldError, Record};
use serde::Serialize;

use super::DataRow;
use crate::kind::TableKind;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EntityRow {
    pub id: i32,
    pub asset_name: String,
}

impl DataRow for EntityRow {
    const KIND: TableKind = TableKind::Entity;
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Id", "id"), ("AssetName", "string")];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MusicRow {
    pub id: i32,
    pub asset_name: String,
}

impl DataRow for MusicRow {
    const KIND: TableKind = TableKind::Music;
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Id", "id"), ("AssetName", "string")];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SceneRow {
    pub id: i32,
    pub asset_name: String,
    /// `0` plays no music.
    pub background_music_id: i32,
}

impl DataRow for SceneRow {
    const KIND: TableKind = TableKind::Scene;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("AssetName", "string"),
        ("BackgroundMusicId", "int"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
            background_music_id: record.field("BackgroundMusicId")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SoundRow {
    pub id: i32,
    pub asset_name: String,
    pub priority: i32,
    #[serde(rename = "loop")]
    pub looped: bool,
    pub volume: f32,
    /// 0 is fully 2D, 1 fully 3D.
    pub spatial_blend: f32,
}

impl DataRow for SoundRow {
    const KIND: TableKind = TableKind::Sound;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("AssetName", "string"),
        ("Priority", "int"),
        ("Loop", "bool"),
        ("Volume", "float"),
        ("SpatialBlend", "float"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
            priority: record.field("Priority")?,
            looped: record.field("Loop")?,
            volume: record.field("Volume")?,
            spatial_blend: record.field("SpatialBlend")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UiFormRow {
    pub id: i32,
    pub asset_name: String,
    pub ui_group_name: String,
    pub allow_multi_instance: bool,
    pub pause_covered_ui_form: bool,
}

impl DataRow for UiFormRow {
    const KIND: TableKind = TableKind::UiForm;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("AssetName", "string"),
        ("UIGroupName", "string"),
        ("AllowMultiInstance", "bool"),
        ("PauseCoveredUIForm", "bool"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
            ui_group_name: record.field("UIGroupName")?,
            allow_multi_instance: record.field("AllowMultiInstance")?,
            pause_covered_ui_form: record.field("PauseCoveredUIForm")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UiSoundRow {
    pub id: i32,
    pub asset_name: String,
    pub priority: i32,
    pub volume: f32,
}

impl DataRow for UiSoundRow {
    const KIND: TableKind = TableKind::UiSound;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("AssetName", "string"),
        ("Priority", "int"),
        ("Volume", "float"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            asset_name: record.field("AssetName")?,
            priority: record.field("Priority")?,
            volume: record.field("Volume")?,
        })
    }
}
