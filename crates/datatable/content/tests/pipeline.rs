use std::path::{Path, PathBuf};

use datatable_content::{
    AircraftRow, ContentFactory, Manifest, SoundRow, TableCompiler, TableKind, TableName,
    TableSettings, ThrusterRow, UpgradeRow, WeaponRow,
};
use datatable_core::{BlobFormat, DuplicateIdPolicy, TypeRegistry};
use tempfile::TempDir;

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data")
}

/// The bundled manifest, writing into `output`.
fn bundled_manifest(output: &Path) -> Manifest {
    let mut manifest =
        Manifest::load(&data_dir().join("tables.toml")).expect("bundled manifest should parse");
    manifest.override_dirs(None, Some(output.to_path_buf()));
    manifest
}

fn runtime_tables(manifest: &Manifest) -> Vec<(TableName, BlobFormat, DuplicateIdPolicy)> {
    manifest
        .all_settings()
        .expect("settings")
        .into_iter()
        .map(|settings| (settings.name, settings.format, settings.duplicate_ids))
        .collect()
}

// ============================================================================
// Bundled tables
// ============================================================================

/// Every bundled table compiles, and the runtime registry reads them all back.
#[test]
fn test_bundled_tables_compile_and_load() {
    let out = TempDir::new().expect("temp dir");
    let manifest = bundled_manifest(out.path());
    let settings = manifest.all_settings().expect("settings");
    assert_eq!(settings.len(), TableKind::ALL.len());

    let types = TypeRegistry::new();
    let reports = TableCompiler::new(&types).compile_all(&settings);
    for (name, result) in &reports {
        let report = result.as_ref().unwrap_or_else(|e| panic!("{name}: {e:#}"));
        assert!(report.rows > 0, "{name} has no rows");
        assert!(report.fallbacks.is_empty(), "{name} fell back");
        assert!(out.path().join(name.asset_file()).exists());
    }

    let factory = ContentFactory::new(out.path());
    let registry = factory
        .load_registry(runtime_tables(&manifest))
        .expect("registry should load");
    assert_eq!(registry.len(), TableKind::ALL.len());

    let player = registry
        .table::<AircraftRow>()
        .and_then(|t| t.get_row(10000))
        .expect("player aircraft");
    assert_eq!(player.thruster_id, 30000);
    assert_eq!(player.weapon_ids, vec![40000]);
    assert_eq!(player.armor_ids, vec![50000]);

    let thruster = registry
        .table::<ThrusterRow>()
        .and_then(|t| t.get_row(player.thruster_id))
        .expect("thruster");
    assert_eq!(thruster.speed, 5.0);

    let weapons = registry.table::<WeaponRow>().expect("weapons");
    let interceptor = registry.table::<AircraftRow>().and_then(|t| t.get_row(10001)).unwrap();
    for id in &interceptor.weapon_ids {
        assert!(weapons.has_row(*id), "weapon {id} missing");
    }

    let sounds = registry.table::<SoundRow>().expect("sounds");
    assert!(sounds.iter().all(|sound| !sound.looped));
    assert_eq!(sounds.min_id_row().map(|s| s.id), Some(20000));
}

/// Reading a table from its source text gives the same rows as the blob.
#[test]
fn test_text_mode_matches_binary() {
    let out = TempDir::new().expect("temp dir");
    let manifest = bundled_manifest(out.path());
    let settings = manifest
        .settings(&TableKind::Upgrade.into())
        .expect("upgrade settings");

    let types = TypeRegistry::new();
    TableCompiler::new(&types).compile(&settings).expect("compile");

    let factory = ContentFactory::new(out.path());
    let from_blob = factory
        .load_table::<UpgradeRow>(&settings.name, settings.format, settings.duplicate_ids)
        .expect("binary load");
    let from_text = factory
        .load_text_table::<UpgradeRow>(&settings)
        .expect("text load");

    assert_eq!(from_blob.all_rows(), from_text.all_rows());
    let twin = from_text.get_row(3).expect("upgrade 3");
    assert_eq!(twin.param(1), Some("40001"));
    assert_eq!(twin.param(2), Some("1"));
}

// ============================================================================
// Failure isolation
// ============================================================================

fn write_source(dir: &Path, name: &str, text: &str) {
    std::fs::write(dir.join(format!("{name}.txt")), text).expect("write source");
}

fn settings_for(manifest: &Manifest, name: &str) -> TableSettings {
    manifest.settings(&name.parse().expect("name")).expect("settings")
}

/// A broken table fails alone and leaves no asset; its neighbours still build.
#[test]
fn test_failed_table_writes_nothing() {
    let dir = TempDir::new().expect("temp dir");
    let source = dir.path().join("source");
    let output = dir.path().join("bytes");
    std::fs::create_dir_all(&source).unwrap();

    write_source(
        &source,
        "Thruster",
        "#\tThruster\t\n#\tId\tSpeed\n#\tid\tfloat\n#\t\t\n\t30000\t5\n",
    );
    write_source(
        &source,
        "Armor",
        "#\tArmor\t\t\n#\tId\tMaxHP\tDefense\n#\tid\tint\tint\n#\t\t\t\n\t50000\tlots\t5\n",
    );

    let mut manifest = Manifest::default();
    manifest.override_dirs(Some(source), Some(output.clone()));
    let tables = vec![
        settings_for(&manifest, "Thruster"),
        settings_for(&manifest, "Armor"),
    ];

    let types = TypeRegistry::new();
    let reports = TableCompiler::new(&types).compile_all(&tables);
    assert_eq!(reports[0].0.to_string(), "Thruster");
    assert!(reports[0].1.is_ok());
    let err = reports[1].1.as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("lots"), "{err:#}");

    assert!(output.join("Thruster.bytes").exists());
    assert!(!output.join("Armor.bytes").exists());
}

/// An invalid cell with a configured default is logged and replaced.
#[test]
fn test_default_row_fallback_is_reported() {
    let dir = TempDir::new().expect("temp dir");
    write_source(
        dir.path(),
        "Thruster_Boss",
        "#\tThruster\t\n#\tId\tSpeed\n#\tid\tfloat\n#\t\t1.5\n\t30100\tfast\n",
    );

    let mut manifest = Manifest::parse("[[tables]]\nname = \"Thruster_Boss\"\ndefault_row = 3\ncomment_row = 0\n")
        .expect("manifest");
    manifest.override_dirs(Some(dir.path().to_path_buf()), Some(dir.path().join("out")));
    let settings = settings_for(&manifest, "Thruster_Boss");

    let types = TypeRegistry::new();
    let report = TableCompiler::new(&types).compile(&settings).expect("compile");
    assert_eq!(report.fallbacks.len(), 1);
    assert_eq!(report.fallbacks[0].raw_text, "fast");

    let factory = ContentFactory::new(dir.path().join("out"));
    let table = factory
        .load_table::<ThrusterRow>(&settings.name, settings.format, settings.duplicate_ids)
        .expect("load");
    assert_eq!(table.get_row(30100).map(|t| t.speed), Some(1.5));

    let err = factory.load_text_table::<ThrusterRow>(&settings).unwrap_err();
    assert!(format!("{err:#}").contains("fast"), "{err:#}");
}

/// Fingerprinted assets refuse to load as a different row type.
#[test]
fn test_fingerprinted_asset_rejects_wrong_row_type() {
    let dir = TempDir::new().expect("temp dir");
    write_source(
        dir.path(),
        "Music",
        "#\tMusic\t\n#\tId\tAssetName\n#\tid\tstring\n#\t\t\n\t1\tmusic_menu\n",
    );

    let mut manifest = Manifest::parse("[defaults]\nformat = \"fingerprinted\"\n").expect("manifest");
    manifest.override_dirs(Some(dir.path().to_path_buf()), Some(dir.path().to_path_buf()));
    let settings = settings_for(&manifest, "Music");

    let types = TypeRegistry::new();
    TableCompiler::new(&types).compile(&settings).expect("compile");

    let factory = ContentFactory::new(dir.path());
    let music = factory
        .load_kind(&settings.name, BlobFormat::Fingerprinted, DuplicateIdPolicy::Reject)
        .expect("music loads");
    assert_eq!(music.ids(), vec![1]);

    let err = factory
        .load_table::<ThrusterRow>(&settings.name, BlobFormat::Fingerprinted, DuplicateIdPolicy::Reject)
        .unwrap_err();
    assert!(format!("{err:#}").contains("fingerprint"), "{err:#}");
}
