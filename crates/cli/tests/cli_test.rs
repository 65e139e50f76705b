use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const JAVA_SAMPLE: &str = "\
package com.example;
import java.util.List;

public class Orders {
    public void place(String id) {
        submit(id);
    }

    public void cancel(String id) {
        revoke(id);
    }
}
";

fn codesweep() -> Command {
    Command::cargo_bin("codesweep").expect("binary built")
}

#[test]
fn chunks_prints_layout_table() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Orders.java");
    std::fs::write(&file, JAVA_SAMPLE).unwrap();

    codesweep()
        .arg("chunks")
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("method(Orders.place)"))
        .stdout(predicate::str::contains("method(Orders.cancel)"));
}

#[test]
fn chunks_json_output_parses() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("Orders.java");
    std::fs::write(&file, JAVA_SAMPLE).unwrap();

    let output = codesweep()
        .arg("chunks")
        .arg("--json")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let documents = parsed.as_array().unwrap();
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0]["language"], "java");
    assert!(!documents[0]["chunks"].as_array().unwrap().is_empty());
}

#[test]
fn plan_reports_totals_for_a_tree() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Orders.java"), JAVA_SAMPLE).unwrap();
    std::fs::write(
        dir.path().join("index.php"),
        "<?php\nfunction run() {\n    return 1;\n}\n",
    )
    .unwrap();
    std::fs::write(dir.path().join("notes.png"), [0u8, 1, 2]).unwrap();

    codesweep()
        .arg("plan")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Orders.java"))
        .stdout(predicate::str::contains("index.php"))
        .stdout(predicate::str::contains("Total:"))
        .stdout(predicate::str::contains("notes.png").not());
}

#[test]
fn missing_path_fails_cleanly() {
    codesweep()
        .arg("chunks")
        .arg("definitely/not/here.java")
        .assert()
        .failure();
}

#[test]
fn custom_config_is_honored() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("chunker.toml");
    std::fs::write(
        &config,
        "window_lines = 2\nlookahead_lines = 20\nmerge_small_chunks = true\n",
    )
    .unwrap();

    let file = dir.path().join("data.py");
    std::fs::write(&file, "a = 1\nb = 2\nc = 3\nd = 4\n").unwrap();

    let output = codesweep()
        .arg("--config")
        .arg(&config)
        .arg("chunks")
        .arg("--json")
        .arg(&file)
        .output()
        .unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let chunks = parsed[0]["chunks"].as_array().unwrap();
    // 4 lines with a 2-line window -> 2 chunks
    assert_eq!(chunks.len(), 2);
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("bad.toml");
    std::fs::write(&config, "window_lines = 0\nlookahead_lines = 20\nmerge_small_chunks = true\n")
        .unwrap();

    codesweep()
        .arg("--config")
        .arg(&config)
        .arg("plan")
        .arg(".")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}
