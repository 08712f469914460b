//! Per-call scratch directories
//!
//! Every proof runs in its own directory so concurrent operations never
//! share witness or proof files. The directory is removed when the
//! workspace is dropped, whether the proof succeeded or not.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::Result;

#[derive(Debug)]
pub struct ProofWorkspace {
    dir: TempDir,
}

impl ProofWorkspace {
    /// Create a workspace labelled with `label` (usually a commitment) under
    /// `parent`, or under the system temp dir when `parent` is `None`.
    pub fn create(parent: Option<&Path>, label: &str) -> Result<Self> {
        let prefix = format!("{}-", sanitize(label));
        let mut builder = tempfile::Builder::new();
        builder.prefix(&prefix);
        let dir = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };
        log::debug!("Created proof workspace {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the directory now and report failures
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        log::debug!("Removed proof workspace {}", path.display());
        Ok(())
    }
}

fn sanitize(label: &str) -> String {
    let cleaned: String = label
        .trim_start_matches("0x")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(16)
        .collect();
    if cleaned.is_empty() {
        "proof".into()
    } else {
        cleaned
    }
}
