use assert_cmd::Command;
use manual_test_support::{write_fixture, SAMPLE_DOCS_JSON};
use predicates::prelude::*;
use tempfile::TempDir;

fn doc_manual(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("doc-manual").expect("binary");
    cmd.current_dir(dir.path()).env("TZ", "UTC").env_remove("RUST_LOG");
    cmd
}

fn with_export() -> TempDir {
    let temp = TempDir::new().expect("tempdir");
    write_fixture(temp.path(), "data/docs.json", SAMPLE_DOCS_JSON);
    temp
}

#[test]
fn renders_stdin_by_default() {
    let temp = TempDir::new().expect("tempdir");
    doc_manual(&temp)
        .arg("render")
        .write_stdin("# Title\n\nSome *text* & more")
        .assert()
        .success()
        .stdout("<h1>Title</h1>\n<p>Some <em>text</em> &amp; more</p>\n");
}

#[test]
fn renders_a_file() {
    let temp = TempDir::new().expect("tempdir");
    let path = write_fixture(temp.path(), "page.md", "- a\n- b\n\n![x](y.png)\n");
    doc_manual(&temp)
        .arg("render")
        .arg(&path)
        .assert()
        .success()
        .stdout(
            "<ul><li>a</li>\n<li>b</li></ul>\n<img src=\"y.png\" alt=\"x\" class=\"md-image\">\n",
        );
}

#[test]
fn render_respects_config_file() {
    let temp = TempDir::new().expect("tempdir");
    write_fixture(
        temp.path(),
        ".doc-manual.toml",
        "[render]\nlink_target = \"\"\n",
    );
    doc_manual(&temp)
        .arg("render")
        .write_stdin("[home](/)")
        .assert()
        .success()
        .stdout("<p><a href=\"/\">home</a></p>\n");
}

#[test]
fn missing_override_config_fails() {
    let temp = TempDir::new().expect("tempdir");
    doc_manual(&temp)
        .args(["--config", "nope.toml", "render"])
        .write_stdin("x")
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}

#[test]
fn lists_newest_first_from_default_export() {
    let temp = with_export();
    doc_manual(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout(
            "3\tUploading images\tGuides\t2024/01/03 09:00\n\
             1\tWelcome\tHome\t2024/01/02 09:00\n\
             2\tGetting started\tGuides\t2024/01/01 09:00\n",
        );
}

#[test]
fn plain_rows_stay_on_one_line() {
    let temp = TempDir::new().expect("tempdir");
    write_fixture(
        temp.path(),
        "data/docs.json",
        r#"[{"id": 9, "title": "Tabs\tand\nbreaks", "category": "Odd\r\nName",
            "createdAt": "2024-01-05T09:00:00Z"}]"#,
    );
    doc_manual(&temp)
        .arg("list")
        .assert()
        .success()
        .stdout("9\tTabs and breaks\tOdd  Name\t2024/01/05 09:00\n");
}

#[test]
fn lists_one_category_as_json() {
    let temp = with_export();
    let output = doc_manual(&temp)
        .args(["list", "--category", "Home", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&output).expect("json output");
    let items = value.as_array().expect("array");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["title"], "Welcome");
    assert_eq!(items[0]["createdAt"], "2024-01-02T09:00:00Z");
    assert!(items[0].get("content").is_none());
}

#[test]
fn show_prints_rendered_document() {
    let temp = with_export();
    doc_manual(&temp)
        .args(["show", "2"])
        .assert()
        .success()
        .stdout("<h1>Getting started</h1>\n<p>Read the <strong>guide</strong> first.</p>\n");
}

#[test]
fn show_unknown_id_exits_with_one() {
    let temp = with_export();
    doc_manual(&temp)
        .args(["show", "42"])
        .assert()
        .code(1)
        .stdout("")
        .stderr(predicate::str::contains("document 42 not found"));
}

#[test]
fn categories_use_explicit_export_path() {
    let temp = TempDir::new().expect("tempdir");
    let export = write_fixture(temp.path(), "elsewhere/export.json", SAMPLE_DOCS_JSON);
    doc_manual(&temp)
        .arg("categories")
        .arg("--docs")
        .arg(&export)
        .assert()
        .success()
        .stdout("Home\nGuides\n");
}

#[test]
fn missing_export_is_an_error() {
    let temp = TempDir::new().expect("tempdir");
    doc_manual(&temp)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read documents"));
}
