//! Aircraft and the parts they are assembled from.

use datatable_core::{FieldError, Record};
use serde::Serialize;

use super::{DataRow, leading_ids};
use crate::kind::TableKind;

/// A ship template: thruster, weapon and armor slots, death effects.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AircraftRow {
    pub id: i32,
    pub thruster_id: i32,
    /// Equipped weapons, in slot order.
    pub weapon_ids: Vec<i32>,
    /// Equipped armor, in slot order.
    pub armor_ids: Vec<i32>,
    pub dead_effect_id: i32,
    pub dead_sound_id: i32,
}

impl DataRow for AircraftRow {
    const KIND: TableKind = TableKind::Aircraft;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("ThrusterId", "int"),
        ("WeaponId0", "int"),
        ("WeaponId1", "int"),
        ("WeaponId2", "int"),
        ("ArmorId0", "int"),
        ("ArmorId1", "int"),
        ("ArmorId2", "int"),
        ("DeadEffectId", "int"),
        ("DeadSoundId", "int"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            thruster_id: record.field("ThrusterId")?,
            weapon_ids: leading_ids(record, "WeaponId")?,
            armor_ids: leading_ids(record, "ArmorId")?,
            dead_effect_id: record.field("DeadEffectId")?,
            dead_sound_id: record.field("DeadSoundId")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ArmorRow {
    pub id: i32,
    pub max_hp: i32,
    pub defense: i32,
}

impl DataRow for ArmorRow {
    const KIND: TableKind = TableKind::Armor;
    const COLUMNS: &'static [(&'static str, &'static str)] =
        &[("Id", "id"), ("MaxHP", "int"), ("Defense", "int")];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            max_hp: record.field("MaxHP")?,
            defense: record.field("Defense")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AsteroidRow {
    pub id: i32,
    pub max_hp: i32,
    pub attack: i32,
    pub speed: f32,
    pub angular_speed: f32,
    pub dead_effect_id: i32,
    pub dead_sound_id: i32,
}

impl DataRow for AsteroidRow {
    const KIND: TableKind = TableKind::Asteroid;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("MaxHP", "int"),
        ("Attack", "int"),
        ("Speed", "float"),
        ("AngularSpeed", "float"),
        ("DeadEffectId", "int"),
        ("DeadSoundId", "int"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            max_hp: record.field("MaxHP")?,
            attack: record.field("Attack")?,
            speed: record.field("Speed")?,
            angular_speed: record.field("AngularSpeed")?,
            dead_effect_id: record.field("DeadEffectId")?,
            dead_sound_id: record.field("DeadSoundId")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ThrusterRow {
    pub id: i32,
    pub speed: f32,
}

impl DataRow for ThrusterRow {
    const KIND: TableKind = TableKind::Thruster;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[("Id", "id"), ("Speed", "float")];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            speed: record.field("Speed")?,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeaponRow {
    pub id: i32,
    pub attack: i32,
    /// Seconds between shots.
    pub attack_interval: f32,
    pub bullet_id: i32,
    pub bullet_speed: f32,
    pub bullet_sound_id: i32,
}

impl DataRow for WeaponRow {
    const KIND: TableKind = TableKind::Weapon;
    const COLUMNS: &'static [(&'static str, &'static str)] = &[
        ("Id", "id"),
        ("Attack", "int"),
        ("AttackInterval", "float"),
        ("BulletId", "int"),
        ("BulletSpeed", "float"),
        ("BulletSoundId", "int"),
    ];

    fn from_record(record: &Record) -> Result<Self, FieldError> {
        Ok(Self {
            id: record.id(),
            attack: record.field("Attack")?,
            attack_interval: record.field("AttackInterval")?,
            bullet_id: record.field("BulletId")?,
            bullet_speed: record.field("BulletSpeed")?,
            bullet_sound_id: record.field("BulletSoundId")?,
        })
    }
}
