//! Settings persistence tests.

use gridseek::GameSettings;

#[test]
fn test_toml_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");

    let mut settings = GameSettings::new()
        .with_sound_enabled(false)
        .with_music_volume(0.25)
        .with_last_theme_id("tideglass");
    settings.unlock_theme("tideglass");
    settings.save(&path).unwrap();

    let loaded = GameSettings::load(&path).unwrap();
    assert_eq!(loaded, settings);
    assert!(loaded.unlocked_themes().contains("tideglass"));
}

#[test]
fn test_partial_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "sound_enabled = false\n").unwrap();

    let loaded = GameSettings::load(&path).unwrap();
    assert!(!loaded.sound_enabled());
    assert_eq!(*loaded.music_volume(), 0.7);
    assert_eq!(loaded.last_theme_id(), "starlight_realm");
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(GameSettings::load(dir.path().join("absent.toml")).is_err());
}

#[test]
fn test_malformed_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "music_volume = \"loud\"\n").unwrap();
    assert!(GameSettings::load(&path).is_err());
}
