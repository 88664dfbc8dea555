//! Integration tests for the Comic-San CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Command isolated from the user's and the working directory's config files
fn comic_san(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("comic-san").unwrap();
    cmd.current_dir(home).env("HOME", home);
    cmd
}

#[test]
fn test_cli_help() {
    let temp_dir = TempDir::new().unwrap();
    comic_san(temp_dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("stitches narrow panels"))
        .stdout(predicate::str::contains("plan"));
}

#[test]
fn test_cli_version() {
    let temp_dir = TempDir::new().unwrap();
    comic_san(temp_dir.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("comic-san"));
}

#[test]
fn test_invalid_subcommand() {
    let temp_dir = TempDir::new().unwrap();
    comic_san(temp_dir.path())
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_config_show_merges_custom_file() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "[stitch]\noriginal_page_width = 2400\n").unwrap();

    comic_san(temp_dir.path())
        .args(["config", "show", "--config"])
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("original_page_width = 2400"))
        .stdout(predicate::str::contains("quality = 50"));
}

#[test]
fn test_page_width_flag_overrides_config() {
    let temp_dir = TempDir::new().unwrap();
    comic_san(temp_dir.path())
        .args(["config", "show", "--page-width", "1800"])
        .assert()
        .success()
        .stdout(predicate::str::contains("original_page_width = 1800"));
}

#[test]
fn test_invalid_config_is_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[grayscale]\nquality = 0\n").unwrap();

    comic_san(temp_dir.path())
        .args(["config", "validate", "--config"])
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("grayscale.quality"));
}

#[test]
fn test_plan_on_missing_directory_fails() {
    let temp_dir = TempDir::new().unwrap();
    comic_san(temp_dir.path())
        .args(["plan", "no-such-dir"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[cfg(unix)]
mod fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    // Stands in for ImageMagick: reports widths by panel name and touches
    // whatever file a write would have produced.
    const FAKE_MAGICK: &str = r#"#!/bin/sh
for last; do :; done
case "$1" in
  identify)
    case "$(basename "$last")" in
      001.jpg) echo 2100 ;;
      002.jpg) echo 1600 ;;
      003.jpg) echo 400 ;;
      004.jpg) echo 3100 ;;
      *_a.jpg) echo 1600 ;;
      *_b.jpg) echo 300 ;;
      *) echo unknown ;;
    esac
    ;;
  montage)
    : > "$last"
    ;;
  mogrify)
    if [ "$2" = "-path" ]; then
      : > "$3/$(basename "$last")"
    fi
    ;;
  *)
    exit 1
    ;;
esac
"#;

    // unzip -j BOOK -d DIR
    const FAKE_UNZIP: &str = r#"#!/bin/sh
: > "$4/page1.jpg"
: > "$4/page2.jpg"
"#;

    // segmenter -i PAGE -s DIR
    const FAKE_SEGMENTER: &str = r#"#!/bin/sh
stem=$(basename "$2" .jpg)
: > "$4/${stem}_a.jpg"
: > "$4/${stem}_b.jpg"
"#;

    // zip -j ARCHIVE FILES...
    const FAKE_ZIP: &str = r#"#!/bin/sh
: > "$2"
"#;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, body).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Temp home with a data directory, fake tools and a config pointing at them
    fn setup() -> (TempDir, PathBuf, PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let bin = temp_dir.path().join("bin");
        let data = temp_dir.path().join("data");
        fs::create_dir_all(&bin).unwrap();
        fs::create_dir_all(&data).unwrap();
        fs::write(data.join("space.jpg"), b"spacer").unwrap();

        let magick = script(&bin, "magick", FAKE_MAGICK);
        let unzip = script(&bin, "unzip", FAKE_UNZIP);
        let segmenter = script(&bin, "kumiko", FAKE_SEGMENTER);
        let zip = script(&bin, "zip", FAKE_ZIP);

        let config = format!(
            "[general]\ndata_dir = {:?}\n\n[parallel]\nmax_workers = 2\n\n\
             [tools]\nmagick = {:?}\nsegmenter = {:?}\nunzip = {:?}\nzip = {:?}\n",
            data.to_string_lossy(),
            magick.to_string_lossy(),
            segmenter.to_string_lossy(),
            unzip.to_string_lossy(),
            zip.to_string_lossy(),
        );
        let config_path = temp_dir.path().join("comic.toml");
        fs::write(&config_path, config).unwrap();

        (temp_dir, data, config_path)
    }

    fn write_reference_panels(data: &Path) -> PathBuf {
        let panels = data.join("panels");
        fs::create_dir_all(&panels).unwrap();
        for name in ["004.jpg", "001.jpg", "003.jpg", "002.jpg"] {
            fs::write(panels.join(name), name).unwrap();
        }
        panels
    }

    fn sorted_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_plan_prints_decisions_as_json() {
        let (temp_dir, data, config_path) = setup();
        write_reference_panels(&data);

        let assert = comic_san(temp_dir.path())
            .args(["plan", "--format", "json", "--config"])
            .arg(&config_path)
            .assert()
            .success();

        let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
        let plan: serde_json::Value = serde_json::from_str(&stdout).unwrap();
        let decisions = plan.as_array().unwrap();

        assert_eq!(decisions.len(), 3);
        assert_eq!(decisions[0]["action"], "keep");
        assert_eq!(decisions[0]["panel"]["name"], "001.jpg");
        assert_eq!(decisions[1]["action"], "merge");
        assert_eq!(decisions[1]["first"]["name"], "002.jpg");
        assert_eq!(decisions[1]["second"]["width"], 400);
        assert_eq!(decisions[2]["panel"]["name"], "004.jpg");
    }

    #[test]
    fn test_plan_text_output() {
        let (temp_dir, data, config_path) = setup();
        let panels = write_reference_panels(&data);

        comic_san(temp_dir.path())
            .arg("plan")
            .arg(&panels)
            .arg("--config")
            .arg(&config_path)
            .assert()
            .success()
            .stdout(predicate::str::contains("merge  002.jpg + 003.jpg -> 002_003.jpg"))
            .stdout(predicate::str::contains("keep   004.jpg"));
    }

    #[test]
    fn test_stitch_writes_strips() {
        let (temp_dir, data, config_path) = setup();
        write_reference_panels(&data);

        comic_san(temp_dir.path())
            .args(["stitch", "--quiet", "--config"])
            .arg(&config_path)
            .assert()
            .success();

        let strips = data.join("stitched_color");
        assert_eq!(
            sorted_names(&strips),
            vec!["001.jpg", "002_003.jpg", "004.jpg"]
        );
        // Kept panels are real copies
        assert_eq!(fs::read(strips.join("004.jpg")).unwrap(), b"004.jpg");
    }

    #[test]
    fn test_stitch_without_spacer_fails() {
        let (temp_dir, data, config_path) = setup();
        write_reference_panels(&data);
        fs::remove_file(data.join("space.jpg")).unwrap();

        comic_san(temp_dir.path())
            .args(["stitch", "--config"])
            .arg(&config_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Spacer image"));
    }

    #[test]
    fn test_run_builds_all_books() {
        let (temp_dir, data, config_path) = setup();
        fs::write(data.join("Akira.cbz"), b"book").unwrap();

        comic_san(temp_dir.path())
            .args(["run", "--yes", "--quiet", "--skip-tool-check", "--config"])
            .arg(&config_path)
            .assert()
            .success();

        assert_eq!(
            sorted_names(&data.join("stitched_color")),
            vec!["page1_a_page1_b.jpg", "page2_a_page2_b.jpg"]
        );
        assert_eq!(
            sorted_names(&data.join("stitched_bw")),
            vec!["page1_a_page1_b.jpg", "page2_a_page2_b.jpg"]
        );
        assert_eq!(
            sorted_names(&data.join("assets")),
            vec!["Akira_bw.cbz", "Akira_color.cbz", "Akira_panels.zip"]
        );
        assert!(data.join("Akira.cbz").exists());
    }

    #[test]
    fn test_run_surfaces_tool_failures() {
        let (temp_dir, data, config_path) = setup();
        fs::write(data.join("Akira.cbz"), b"book").unwrap();
        script(
            &temp_dir.path().join("bin"),
            "kumiko",
            "#!/bin/sh\necho 'cannot read page' >&2\nexit 4\n",
        );

        comic_san(temp_dir.path())
            .args(["run", "--yes", "--quiet", "--skip-tool-check", "--config"])
            .arg(&config_path)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Panel extraction failed"));
    }
}
