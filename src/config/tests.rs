use super::*;
use std::fs;
use tempfile::TempDir;

fn defaults() -> Figment {
    Figment::new().merge(Toml::string(DEFAULT_CONFIG))
}

#[test]
fn test_config_loads_defaults() {
    let config = ComicConfig::from_figment(defaults()).expect("Should load default config");

    assert_eq!(config.stitch.original_page_width, 3000);
    assert_eq!(config.stitch.wide_threshold, 65.0);
    assert_eq!(config.stitch.mid_threshold, 50.0);
    assert_eq!(config.stitch.small_next_threshold, 15.0);
    assert_eq!(config.stitch.combined_threshold, 65.0);
    assert_eq!(config.general.image_extension, "jpg");
    assert_eq!(config.resize.width, 1448);
    assert_eq!(config.resize.height, 1072);
    assert_eq!(config.parallel.max_workers, 0);
    assert_eq!(config.tools.magick, "magick");
}

#[test]
fn test_custom_file_overrides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(
        &path,
        "[stitch]\noriginal_page_width = 2400\n\n[tools]\nmagick = \"/opt/im/magick\"\n",
    )
    .unwrap();

    let config =
        ComicConfig::from_figment(defaults().merge(Toml::file(&path))).expect("Should merge file");

    assert_eq!(config.stitch.original_page_width, 2400);
    assert_eq!(config.tools.magick, "/opt/im/magick");
    // Untouched keys keep their defaults
    assert_eq!(config.stitch.wide_threshold, 65.0);
    assert_eq!(config.tools.zip, "zip");
}

#[test]
fn test_missing_custom_file_falls_back_to_defaults() {
    let config = ComicConfig::from_figment(defaults().merge(Toml::file("non_existent.toml")));
    assert!(config.is_ok(), "Should handle missing custom config gracefully");
}

#[test]
fn test_zero_page_width_is_rejected() {
    let figment = defaults().merge(Toml::string("[stitch]\noriginal_page_width = 0\n"));
    let err = ComicConfig::from_figment(figment).unwrap_err();
    assert!(format!("{err:#}").contains("original_page_width"));
}

#[test]
fn test_out_of_range_quality_is_rejected() {
    let figment = defaults().merge(Toml::string("[grayscale]\nquality = 0\n"));
    assert!(ComicConfig::from_figment(figment).is_err());
}

#[test]
fn test_spacer_image_resolves_against_data_dir() {
    let mut config = ComicConfig::from_figment(defaults()).unwrap();
    config.general.data_dir = PathBuf::from("/books");
    assert_eq!(config.spacer_image(), PathBuf::from("/books/space.jpg"));

    config.stitch.spacer_image = PathBuf::from("/assets/gap.jpg");
    assert_eq!(config.spacer_image(), PathBuf::from("/assets/gap.jpg"));
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = ComicConfig::from_figment(defaults()).unwrap();
    let rendered = config.to_toml().unwrap();
    assert!(rendered.contains("original_page_width = 3000"));

    let reparsed = ComicConfig::from_figment(Figment::new().merge(Toml::string(&rendered)));
    assert!(reparsed.is_ok());
}

#[test]
fn test_env_vars_override_config_files() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("custom.toml");
    fs::write(&path, "[resize]\nwidth = 1200\n").unwrap();

    // No other test builds the environment layer
    unsafe {
        std::env::set_var("COMIC_SAN_RESIZE__WIDTH", "1600");
    }
    let config = ComicConfig::from_figment(ComicConfig::figment(path.to_str()));
    unsafe {
        std::env::remove_var("COMIC_SAN_RESIZE__WIDTH");
    }

    let config = config.expect("Should load layered config");
    assert_eq!(config.resize.width, 1600);
    assert_eq!(config.resize.height, 1072);
}
