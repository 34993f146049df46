//! Shared test utilities for integration tests

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary directory holding a template and a target file.
pub struct Fixture {
    pub dir: TempDir,
    pub template: PathBuf,
    pub target: PathBuf,
}

impl Fixture {
    pub fn new(template: &str, target: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let template_path = dir.path().join("template.yml");
        let target_path = dir.path().join("config.yml");
        std::fs::write(&template_path, template).unwrap();
        std::fs::write(&target_path, target).unwrap();
        Self {
            dir,
            template: template_path,
            target: target_path,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn target_text(&self) -> String {
        std::fs::read_to_string(&self.target).unwrap()
    }
}

pub const NO_IGNORED: &[&str] = &[];
