//! Tests for the `blobkit` binary.

use assert_cmd::Command;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn blobkit() -> Command {
    let mut cmd = Command::cargo_bin("blobkit").unwrap();
    cmd.env("BLOBKIT_LOG_LEVEL", "off");
    cmd
}

#[test]
fn test_code_from_stdin_with_custom_markers() {
    blobkit()
        .args(["code", "--open", "<code>", "--close", "</code>"])
        .write_stdin("Thought: easy\n<code>\nprint(1)\n</code>\n<code>print(2)</code>")
        .assert()
        .success()
        .stdout("print(1)\n\nprint(2)\n");
}

#[test]
fn test_code_default_python_fence_from_file() {
    let input = NamedTempFile::new().unwrap();
    std::fs::write(input.path(), "```python\nx = 42\n```").unwrap();

    blobkit()
        .arg("code")
        .arg(input.path())
        .assert()
        .success()
        .stdout("x = 42\n");
}

#[test]
fn test_code_failure_reports_pattern() {
    let assert = blobkit()
        .args(["code", "--open", "<code>", "--close", "</code>", "-"])
        .write_stdin("Wrong blob!")
        .assert()
        .failure();

    let stderr = String::from_utf8_lossy(&assert.get_output().stderr).to_string();
    assert!(stderr.contains("<code>(.*?)</code>"));
    assert!(assert.get_output().stdout.is_empty());
}

#[test]
fn test_code_raw_fallback_flag() {
    blobkit()
        .args(["code", "--raw-fallback"])
        .write_stdin("import numpy as np\n")
        .assert()
        .success()
        .stdout("import numpy as np\n");
}

#[test]
fn test_code_with_config_file() {
    let config = NamedTempFile::with_suffix(".toml").unwrap();
    std::fs::write(
        config.path(),
        "[extraction]\nopen_tag = \"<py>\"\nclose_tag = \"</py>\"\n",
    )
    .unwrap();

    blobkit()
        .arg("--config")
        .arg(config.path())
        .arg("code")
        .write_stdin("<py> y = 2 </py>")
        .assert()
        .success()
        .stdout("y = 2\n");
}

#[test]
fn test_json_prints_prefix_and_value() {
    let assert = blobkit()
        .arg("json")
        .write_stdin("With text before{\"simple\": \"json\"}And text after")
        .assert()
        .success();

    let output: Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
    assert_eq!(
        output,
        json!({"prefix": "With text before", "value": {"simple": "json"}})
    );
}

#[test]
fn test_json_failure() {
    blobkit()
        .arg("json")
        .write_stdin("{\"simple\": \"json\"With text after")
        .assert()
        .failure();
}

#[test]
fn test_name_validation() {
    blobkit()
        .args(["name", "valid_name", "_private"])
        .assert()
        .success()
        .stdout("valid_name: valid\n_private: valid\n");

    let assert = blobkit()
        .args(["name", "valid_name", "class", "123invalid"])
        .assert()
        .code(1);

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).to_string();
    assert!(stdout.contains("valid_name: valid"));
    assert!(stdout.contains("class: invalid"));
    assert!(stdout.contains("123invalid: invalid"));
}
