use std::fs::File;
use std::io::Read;
use std::path::PathBuf;

use serde::Deserialize;
use tokio::process::Command;
use tracing::debug;
use walkdir::WalkDir;

use crate::config::SourceConfig;
use crate::error::{MockforgeError, Result};

/// A readable collection of source files scoped to one acquired tree.
///
/// Lifecycle is acquire, use, release; trees release whatever they hold when
/// dropped, so release happens even when the pipeline fails midway.
pub trait SourceTree {
    /// File names matching a `*.<ext>` pattern, in sorted order.
    fn list(&self, pattern: &str) -> Result<Vec<String>>;

    /// Opens one file for reading.
    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>>;
}

/// A plain directory on disk. Only the top level is scanned; a Go package
/// never spans subdirectories.
pub struct DirTree {
    root: PathBuf,
}

impl DirTree {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl SourceTree for DirTree {
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        let suffix = pattern.trim_start_matches('*');

        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| MockforgeError::Acquisition(e.to_string()))?;
            if !entry.file_type().is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(suffix) {
                names.push(name);
            }
        }

        names.sort();
        Ok(names)
    }

    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>> {
        Ok(Box::new(File::open(self.root.join(name))?))
    }
}

#[derive(Deserialize)]
struct PackageMeta {
    #[serde(rename = "Dir")]
    dir: PathBuf,
}

/// A package tree fetched through the Go toolchain: `go get` downloads the
/// module, `go list -json` reports the directory holding the package source.
pub struct GoModuleTree {
    inner: DirTree,
}

impl GoModuleTree {
    pub async fn acquire(module: &str, config: &SourceConfig) -> Result<Self> {
        let get = Command::new(&config.go_binary)
            .args(["get", module])
            .output()
            .await
            .map_err(|e| {
                MockforgeError::Acquisition(format!("failed to run '{} get': {e}", config.go_binary))
            })?;

        if !get.status.success() {
            return Err(MockforgeError::Acquisition(format!(
                "failed to go get '{module}': {}",
                String::from_utf8_lossy(&get.stderr).trim()
            )));
        }

        let list = Command::new(&config.go_binary)
            .args(["list", "-json", module])
            .output()
            .await
            .map_err(|e| {
                MockforgeError::Acquisition(format!(
                    "failed to run '{} list': {e}",
                    config.go_binary
                ))
            })?;

        if !list.status.success() {
            return Err(MockforgeError::Acquisition(format!(
                "failed to locate '{module}': {}",
                String::from_utf8_lossy(&list.stderr).trim()
            )));
        }

        let meta: PackageMeta = serde_json::from_slice(&list.stdout).map_err(|e| {
            MockforgeError::Acquisition(format!("failed to decode package metadata: {e}"))
        })?;

        debug!(dir = %meta.dir.display(), module, "acquired module source");

        Ok(Self {
            inner: DirTree::new(meta.dir),
        })
    }
}

impl SourceTree for GoModuleTree {
    fn list(&self, pattern: &str) -> Result<Vec<String>> {
        self.inner.list(pattern)
    }

    fn open(&self, name: &str) -> std::io::Result<Box<dyn Read>> {
        self.inner.open(name)
    }
}
