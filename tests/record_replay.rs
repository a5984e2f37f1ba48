//! Cassette replay integration tests — zero network I/O.
//!
//! All tests set `PRODUCT_SCENE_REPLAY` to a cassette file path so that the
//! binary never contacts the live API and needs no credential.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use base64::Engine;
use predicates::prelude::*;
use tempfile::TempDir;

const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
const FIXTURE_PNG: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

fn cmd(cassette: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("product-scene");
    cmd.env("PRODUCT_SCENE_REPLAY", cassette)
        .env_remove("API_KEY")
        .env_remove("GEMINI_API_KEY")
        .env_remove("PRODUCT_SCENE_REC")
        .env("PRODUCT_SCENE_CONFIG", "/nonexistent/product-scene.toml")
        .env_remove("RUST_LOG");
    cmd
}

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

/// A temp dir holding `mug.png` and `anna.png`.
fn inputs() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("mug.png"), PNG_HEADER).unwrap();
    std::fs::write(dir.path().join("anna.png"), PNG_HEADER).unwrap();
    dir
}

/// Write a one-interaction cassette whose output is `output_yaml`
/// (indented to sit under `output:`).
fn write_cassette(dir: &Path, output_yaml: &str) -> PathBuf {
    let path = dir.join("inline.cassette.yaml");
    let content = format!(
        "name: inline\nrecorded_at: \"2026-02-01T00:00:00Z\"\ncommit: test\ninteractions:\n  - seq: 0\n    port: image_generator\n    method: generate\n    input: {{}}\n    output:\n{output_yaml}"
    );
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn happy_path_writes_returned_image() {
    let dir = inputs();
    let out = dir.path().join("scene.png");

    cmd(&fixtures_dir().join("mug_scene.cassette.yaml"))
        .current_dir(dir.path())
        .args(["--output", out.to_str().unwrap(), "mug.png", "anna.png"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Saved:"));

    let expected = base64::engine::general_purpose::STANDARD.decode(FIXTURE_PNG).unwrap();
    assert_eq!(std::fs::read(&out).unwrap(), expected);
}

#[test]
fn config_file_key_and_defaults_are_accepted() {
    let dir = inputs();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[keys]\ngemini = \"from-file\"\n\n[defaults]\nmodel = \"nano-banana-pro\"\n")
        .unwrap();

    cmd(&fixtures_dir().join("mug_scene.cassette.yaml"))
        .current_dir(dir.path())
        .args(["--config", config.to_str().unwrap(), "--output", "scene.png", "mug.png", "anna.png"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No API key").not());

    assert!(dir.path().join("scene.png").exists());
}

#[test]
fn print_data_url_echoes_result() {
    let dir = inputs();

    cmd(&fixtures_dir().join("mug_scene.cassette.yaml"))
        .current_dir(dir.path())
        .args(["--print-data-url", "mug.png", "anna.png"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("data:image/png;base64,{FIXTURE_PNG}\n")));
}

#[test]
fn auto_filename_uses_product_stem_and_returned_type() {
    let dir = inputs();

    cmd(&fixtures_dir().join("mug_scene.cassette.yaml"))
        .current_dir(dir.path())
        .args(["mug.png", "anna.png"])
        .assert()
        .success();

    let created: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .flatten()
        .map(|e| e.file_name().to_string_lossy().into_owned())
        .filter(|name| name.starts_with("mug-scene-"))
        .collect();
    assert_eq!(created.len(), 1, "exactly one scene file expected, got {created:?}");
    assert!(created[0].ends_with(".png"), "got {}", created[0]);
}

#[test]
fn response_without_image_reports_no_image() {
    let dir = inputs();
    let cassette = write_cassette(
        dir.path(),
        "      Ok:\n        parts:\n          - kind: text\n            text: I cannot help with that.\n",
    );

    cmd(&cassette)
        .current_dir(dir.path())
        .args(["mug.png", "anna.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No image was generated in the response."));
}

#[test]
fn recorded_failure_is_reported_generically() {
    let dir = inputs();
    let cassette = write_cassette(
        dir.path(),
        "      Err: \"API error (429): quota exceeded for project 1234\"\n",
    );

    cmd(&cassette)
        .current_dir(dir.path())
        .args(["mug.png", "anna.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Failed to generate image."));
}

#[test]
fn format_jpeg_converts_png_result() {
    let png_bytes = {
        let img = image::DynamicImage::new_rgb8(2, 2);
        let mut buf = std::io::Cursor::new(Vec::<u8>::new());
        img.write_to(&mut buf, image::ImageFormat::Png).unwrap();
        buf.into_inner()
    };
    let b64 = base64::engine::general_purpose::STANDARD.encode(&png_bytes);

    let dir = inputs();
    let cassette = write_cassette(
        dir.path(),
        &format!(
            "      Ok:\n        parts:\n          - kind: image\n            mime_type: image/png\n            data: {b64}\n"
        ),
    );
    let out = dir.path().join("scene.jpg");

    cmd(&cassette)
        .current_dir(dir.path())
        .args(["--format", "jpeg", "--output", out.to_str().unwrap(), "mug.png", "anna.png"])
        .assert()
        .success();

    let data = std::fs::read(&out).unwrap();
    assert_eq!(&data[..3], &[0xFF, 0xD8, 0xFF], "output should be a JPEG");
}

#[test]
fn missing_cassette_is_config_error() {
    let dir = inputs();

    cmd(&dir.path().join("absent.cassette.yaml"))
        .current_dir(dir.path())
        .args(["mug.png", "anna.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load cassette"));
}
