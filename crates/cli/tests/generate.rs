use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

const CAT_TEXT: &str = "The cat sat on the mat. The cat likes the mat.";

#[allow(deprecated)]
fn mindmap() -> Command {
    Command::cargo_bin("mindmap").expect("binary")
}

fn stdout_json(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("valid json")
}

fn node<'a>(body: &'a Value, word: &str) -> &'a Value {
    body["nodes"]
        .as_array()
        .expect("nodes array")
        .iter()
        .find(|node| node["word"] == word)
        .unwrap_or_else(|| panic!("missing node {word}: {body}"))
}

#[test]
fn generate_reads_stdin_and_prints_json() {
    let output = mindmap()
        .args(["--quiet", "generate", "--lang", "en"])
        .write_stdin(CAT_TEXT)
        .output()
        .expect("command run");
    let body = stdout_json(&output);

    assert_eq!(body["language"], "en");
    assert_eq!(body["layout"]["algorithm"], "spring");
    assert_eq!(node(&body, "cat")["category"], "unknown");
    assert!(node(&body, "mat")["x"].is_number());

    let edges = body["edges"].as_array().expect("edges array");
    assert_eq!(edges.len(), 6);
    assert!(edges.iter().any(|edge| {
        edge["source"] == "cat" && edge["target"] == "mat"
    }));
}

#[test]
fn generate_applies_flag_overrides() {
    let temp = tempdir().unwrap();
    let input = temp.path().join("input.txt");
    fs::write(&input, CAT_TEXT).unwrap();

    let output = mindmap()
        .arg("generate")
        .arg("--input")
        .arg(&input)
        .args(["--max-edges", "2", "--layout", "partitioned", "--pretty"])
        .output()
        .expect("command run");
    let body = stdout_json(&output);

    assert_eq!(body["edges"].as_array().unwrap().len(), 2);
    assert_eq!(body["layout"]["algorithm"], "partitioned");
    assert!(String::from_utf8_lossy(&output.stdout).contains("\n  \"nodes\""));
}

#[test]
fn generate_with_taxonomy_fills_categories_and_cache() {
    let temp = tempdir().unwrap();
    let taxonomy = temp.path().join("taxonomy.json");
    fs::write(
        &taxonomy,
        r#"{"en": {"cat": "animal", "mat": "furniture"}}"#,
    )
    .unwrap();
    let cache_dir = temp.path().join("cache");

    let output = mindmap()
        .arg("generate")
        .arg("--taxonomy")
        .arg(&taxonomy)
        .args(["--max-distance", "0"])
        .arg("--cache-dir")
        .arg(&cache_dir)
        .write_stdin(CAT_TEXT)
        .output()
        .expect("command run");
    let body = stdout_json(&output);

    assert_eq!(node(&body, "cat")["category"], "animal");
    assert_eq!(node(&body, "mat")["category"], "furniture");
    assert_eq!(node(&body, "likes")["category"], "unknown");

    let cache: Value =
        serde_json::from_str(&fs::read_to_string(cache_dir.join("en.json")).unwrap()).unwrap();
    assert_eq!(cache["cat"]["category"], "animal");
}

#[test]
fn empty_input_gives_empty_map() {
    let output = mindmap()
        .arg("generate")
        .write_stdin("")
        .output()
        .expect("command run");
    let body = stdout_json(&output);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 0);
    assert_eq!(body["edges"].as_array().unwrap().len(), 0);
}

#[test]
fn unsupported_language_fails() {
    mindmap()
        .args(["generate", "--lang", "fr"])
        .write_stdin(CAT_TEXT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported language: fr"));
}

#[test]
fn invalid_config_file_fails() {
    let temp = tempdir().unwrap();
    let config = temp.path().join("mindmap.toml");
    fs::write(&config, "[graph]\nmax_edges = 0\n").unwrap();

    mindmap()
        .arg("generate")
        .arg("--config")
        .arg(&config)
        .write_stdin(CAT_TEXT)
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_edges"));
}

#[test]
fn cache_migrate_upgrades_legacy_entries() {
    let temp = tempdir().unwrap();
    fs::write(
        temp.path().join("de.json"),
        r#"{"katze": "tier", "hund": {"category": "tier", "cachetime": "2024-01-02 03:04:05"}}"#,
    )
    .unwrap();

    let output = mindmap()
        .args(["cache", "migrate", "--lang", "de", "--cache-dir"])
        .arg(temp.path())
        .output()
        .expect("command run");
    let report = stdout_json(&output);
    assert_eq!(report["language"], "de");
    assert_eq!(report["entries"], 2);
    assert_eq!(report["migrated"], 1);
    assert_eq!(report["written"], true);

    let cache: Value =
        serde_json::from_str(&fs::read_to_string(temp.path().join("de.json")).unwrap()).unwrap();
    assert_eq!(cache["katze"]["category"], "tier");
    assert!(cache["katze"]["cachetime"].is_string());
    assert_eq!(cache["hund"]["cachetime"], "2024-01-02 03:04:05");
}
