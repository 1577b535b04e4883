use assert_cmd::cargo::cargo_bin;
use std::process::{Command, Stdio};

use manual_test_support::write_fixture;
use tempfile::TempDir;

#[test]
fn exits_successfully_when_downstream_pipe_closes() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let page = "Paragraph with **bold** text.\n\n".repeat(20_000);
    let path = write_fixture(temp.path(), "long.md", &page);

    let mut cmd = Command::new(cargo_bin("doc-manual"));
    cmd.current_dir(temp.path())
        .arg("render")
        .arg(path)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = cmd.spawn()?;
    drop(child.stdout.take());

    let output = child.wait_with_output()?;
    assert!(
        output.status.success(),
        "expected success, got status: {status:?}",
        status = output.status
    );
    assert!(
        output.stderr.is_empty(),
        "expected stderr to be empty, got: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(())
}
