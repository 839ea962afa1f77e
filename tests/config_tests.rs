//! Integration tests for configuration persistence

use jumplist_manager::config::{AppConfig, ConfigManager, EnumerationLimits, MAX_LIMIT};
use jumplist_manager::jumplist::JumpList;
use jumplist_manager::shell::MemoryShell;

#[test]
fn test_config_round_trip_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");

    let config = AppConfig {
        limits: EnumerationLimits {
            recent: 5,
            pinned_lookup: 250,
            ..EnumerationLimits::default()
        },
        thumbnail_size: 48,
        include_frequent: true,
    };
    ConfigManager::save_to(&config, &path).unwrap();

    assert_eq!(ConfigManager::load_from(&path).unwrap(), config);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_missing_and_corrupt_files_load_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    assert_eq!(ConfigManager::load_from(&path).unwrap(), AppConfig::default());

    std::fs::write(&path, "{ not json").unwrap();
    assert_eq!(ConfigManager::load_from(&path).unwrap(), AppConfig::default());
}

#[test]
fn test_out_of_range_values_are_clamped_by_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(
        &path,
        r#"{"limits":{"recent":0,"custom":5000},"thumbnail_size":4096}"#,
    )
    .unwrap();
    let config = ConfigManager::load_from(&path).unwrap();

    let list = JumpList::create(MemoryShell::new(), "Contoso.Viewer")
        .unwrap()
        .with_config(&config);
    assert_eq!(list.limits().recent, 1);
    assert_eq!(list.limits().custom, MAX_LIMIT);
    assert_eq!(list.thumbnail_size(), 256);
}
