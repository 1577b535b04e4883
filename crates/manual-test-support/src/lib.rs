//! Shared test harness utilities for doc-manual crates.

use std::fs;
use std::path::{Path, PathBuf};

use manual_config::Config;

/// Store export with three documents in two categories. In store order the
/// ids are 1, 2, 3; newest first they are 3, 1, 2.
pub const SAMPLE_DOCS_JSON: &str = r##"[
  {
    "id": 1,
    "title": "Welcome",
    "content": "# Welcome to the manual\n\nThis is your first page.\n\n## Features\n\n- Browse documents\n- Edit as admin\n- Markdown support",
    "category": "Home",
    "createdAt": "2024-01-02T09:00:00.000Z"
  },
  {
    "id": 2,
    "title": "Getting started",
    "content": "# Getting started\n\nRead the **guide** first.",
    "category": "Guides",
    "createdAt": "2024-01-01T09:00:00.000Z",
    "updatedAt": "2024-02-01T09:00:00.000Z"
  },
  {
    "id": 3,
    "title": "Uploading images",
    "content": "Paste an image:\n\n![screenshot](/uploads/shot.png)",
    "category": "Guides",
    "createdAt": "2024-01-03T09:00:00.000Z"
  }
]"##;

/// Returns a baseline configuration for tests.
pub fn test_config() -> Config {
    Config::defaults(".")
}

/// Writes `contents` to `dir/relative`, creating parent directories.
pub fn write_fixture(dir: &Path, relative: &str, contents: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directory");
    }
    fs::write(&path, contents).expect("write fixture");
    path
}
