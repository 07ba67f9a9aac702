//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Absolute path of a file under `tests/fixtures`, independent of the
/// working directory the test runner uses.
pub fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

pub fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to load fixture '{}' from {:?}: {}", name, path, e))
}

/// A scratch directory holding specification files written by a test.
pub struct SpecDir {
    pub dir: TempDir,
}

impl SpecDir {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write `content` to `name` inside the directory and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create fixture dir");
        }
        fs::write(&path, content).expect("Failed to write spec file");
        path
    }

    /// Copy a fixture into the directory under the same name.
    pub fn copy_fixture(&self, name: &str) -> PathBuf {
        self.write(name, &load_fixture(name))
    }
}

pub const MINIMAL_OPENAPI: &str = r#"openapi: "3.0.0"
info:
  title: t
  version: "1"
paths: {}
"#;
