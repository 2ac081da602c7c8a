use tempfile::tempdir;
use tour_overlay::settings::{OverlayColor, OverlaySettings};

#[test]
fn missing_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let settings = OverlaySettings::load(dir.path().join("absent.json")).unwrap();
    assert_eq!(settings, OverlaySettings::default());
    assert_eq!(settings.border_width, 3.0);
    assert_eq!(settings.skip_margin, 30.0);
    assert_eq!(settings.image_margin, 32.0);
    assert_eq!(settings.border_color, OverlayColor::rgba(255, 120, 0, 255));
}

#[test]
fn empty_file_loads_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "  \n").unwrap();
    assert_eq!(OverlaySettings::load(&path).unwrap(), OverlaySettings::default());
}

#[test]
fn saved_settings_load_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = OverlaySettings {
        overlay_color: OverlayColor::rgba(10, 20, 30, 128),
        skip_label: "Later".into(),
        propagate_events: false,
        log_file: Some(dir.path().join("overlay.log")),
        ..OverlaySettings::default()
    };
    settings.save(&path).unwrap();
    assert_eq!(OverlaySettings::load(&path).unwrap(), settings);
}

#[test]
fn invalid_lengths_are_replaced_on_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, r#"{"border_width": -4, "skip_margin": 12}"#).unwrap();
    let settings = OverlaySettings::load(&path).unwrap();
    assert_eq!(settings.border_width, 3.0);
    assert_eq!(settings.skip_margin, 12.0);
}

#[test]
fn malformed_file_is_an_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").unwrap();
    assert!(OverlaySettings::load(&path).is_err());
}
