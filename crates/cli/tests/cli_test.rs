//! # CLI Command Tests
//!
//! Runs the `spotter` binary against an `httpmock` server standing in for
//! `spotter-server`.

use assert_cmd::prelude::*;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// A `spotter` command running in `dir` so its log file stays out of the tree.
fn spotter(dir: &std::path::Path, server: &MockServer) -> Command {
    let mut cmd = Command::cargo_bin("spotter").unwrap();
    cmd.current_dir(dir)
        .env_remove("SPOTTER_SERVER_URL")
        .arg("--server")
        .arg(server.base_url());
    cmd
}

#[test]
fn test_models_command_prints_models_and_warning() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/models");
        then.status(200).json_body(json!({
            "models": ["llava:latest"],
            "warning": "Ollama reported no models. Using default."
        }));
    });

    // Act & Assert
    spotter(temp_dir.path(), &server)
        .arg("models")
        .assert()
        .success()
        .stdout(predicate::eq("llava:latest\n"))
        .stderr(predicate::str::contains(
            "Warning: Ollama reported no models. Using default.",
        ));
}

#[test]
fn test_models_command_fails_on_service_error() {
    let temp_dir = tempdir().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/models");
        then.status(503).json_body(json!({
            "error": "Could not connect to Ollama to list models (ConnectionError). Using default.",
            "models": ["llava:latest"]
        }));
    });

    spotter(temp_dir.path(), &server)
        .arg("models")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Error fetching models: Could not connect to Ollama",
        ));
}

#[test]
fn test_analyze_command_uploads_analyzes_and_renders() {
    // Arrange
    let temp_dir = tempdir().unwrap();
    let image = temp_dir.path().join("pets.png");
    fs::write(&image, b"\x89PNG\r\n\x1a\n").unwrap();

    let server = MockServer::start();
    let upload_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/upload")
            .body_contains(r#"filename="pets.png""#);
        then.status(200).json_body(json!({
            "message": "Image uploaded successfully",
            "filepath": "static/uploads/pets.png"
        }));
    });
    let analyze_mock = server.mock(|when, then| {
        when.method(POST).path("/analyze").json_body(json!({
            "image_path": "static/uploads/pets.png",
            "model": "llava:13b",
            "custom_items": ["cat", "dog", "bird", "fish"],
            "thresholds": { "found_low": 0.7, "maybe_low": 0.4 }
        }));
        then.status(200).json_body(json!({
            "raw_output": "model text",
            "queried_items_echoed": [
                { "item": "cat" }, { "item": "dog" }, { "item": "bird" }, { "item": "fish" }
            ],
            "found": [{ "item": "cat", "confidence": 0.9 }],
            "maybe_found": [{ "item": "dog", "confidence": 0.5 }],
            "not_found": [{ "item": "bird", "confidence": 0.1 }, { "item": "fish" }]
        }));
    });

    // Act & Assert
    spotter(temp_dir.path(), &server)
        .args(["analyze", "--image"])
        .arg(&image)
        .args(["--model", "llava:13b", "--items", "cat, dog,, bird, fish"])
        .args(["--found-low", "0.7", "--maybe-low", "0.4"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Image uploaded successfully: static/uploads/pets.png",
        ))
        .stdout(predicate::str::contains("Found Items:\n  * cat\n"))
        .stdout(predicate::str::contains("Maybe Found Items:\n  * dog\n"))
        .stdout(predicate::str::contains("Not Found Items:\n  * bird\n"))
        .stdout(predicate::str::contains("Unparsed / Other:\n  * fish\n"))
        .stdout(predicate::str::contains("Raw Output:\nmodel text\n"));

    upload_mock.assert();
    analyze_mock.assert();
    assert!(temp_dir.path().join("spotter-cli.log").exists());
}

#[test]
fn test_analyze_command_reports_service_error_verbatim() {
    let temp_dir = tempdir().unwrap();
    let image = temp_dir.path().join("pets.png");
    fs::write(&image, b"png").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/upload");
        then.status(200).json_body(json!({
            "message": "Image uploaded successfully",
            "filepath": "static/uploads/pets.png"
        }));
    });
    server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(500).json_body(json!({
            "error": "Failed to connect to Ollama or process image: connection refused"
        }));
    });

    spotter(temp_dir.path(), &server)
        .args(["analyze", "--model", "llava:latest", "--image"])
        .arg(&image)
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Analysis failed: Failed to connect to Ollama or process image: connection refused",
        ));
}

#[test]
fn test_analyze_command_stops_when_upload_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let image = temp_dir.path().join("notes.txt");
    fs::write(&image, b"hello").unwrap();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/upload");
        then.status(400)
            .json_body(json!({ "error": "File type not allowed" }));
    });
    let analyze_mock = server.mock(|when, then| {
        when.method(POST).path("/analyze");
        then.status(200).json_body(json!({}));
    });

    spotter(temp_dir.path(), &server)
        .args(["analyze", "--model", "llava:latest", "--image"])
        .arg(&image)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Upload failed: File type not allowed"));

    analyze_mock.assert_hits(0);
}

#[test]
fn test_analyze_command_without_image_file_fails() {
    let temp_dir = tempdir().unwrap();
    let server = MockServer::start();

    spotter(temp_dir.path(), &server)
        .args(["analyze", "--image", "does-not-exist.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read image"));
}
