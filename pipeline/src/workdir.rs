//! Working directory for pipeline intermediates.
//!
//! One pipeline run owns one working directory holding the fetched package,
//! the raw and re-encoded disks, and the container build context. The
//! default is a fresh temporary directory removed when the run ends; an
//! operator-named directory is created if missing and everything written
//! into it is preserved. Concurrent runs sharing a named directory are
//! unsupported.

use std::path::{Path, PathBuf};

use tempfile::TempDir;

use vmship_core::error::Result;

/// Fetched package file name.
pub const PACKAGE_FILE: &str = "vmnetx-package.zip";
/// Raw disk payload extracted from the package.
pub const RAW_DISK_FILE: &str = "disk.img";
/// Re-encoded disk image.
pub const ENCODED_DISK_FILE: &str = "disk.qcow2";
/// Container build instructions.
pub const DOCKERFILE: &str = "Dockerfile";
/// Build context ignore rules.
pub const DOCKERIGNORE: &str = ".dockerignore";

/// Parent directory for ephemeral working directories; disk images are too
/// large for a tmpfs-backed /tmp.
const EPHEMERAL_PARENT: &str = "/var/tmp";

/// Working directory owned by a single pipeline run.
#[derive(Debug)]
pub enum WorkDir {
    /// Freshly created temporary directory, removed on drop.
    Ephemeral(TempDir),
    /// Operator-named directory, fully preserved.
    Persistent(PathBuf),
}

impl WorkDir {
    /// Create the working directory for a run.
    pub fn prepare(named: Option<PathBuf>) -> Result<Self> {
        match named {
            Some(dir) => {
                std::fs::create_dir_all(&dir)?;
                Ok(WorkDir::Persistent(dir))
            }
            None => Ok(WorkDir::Ephemeral(TempDir::new_in(EPHEMERAL_PARENT)?)),
        }
    }

    /// Path of the working directory.
    pub fn path(&self) -> &Path {
        match self {
            WorkDir::Ephemeral(dir) => dir.path(),
            WorkDir::Persistent(dir) => dir,
        }
    }

    /// Whether intermediate files are kept after their consuming stage.
    pub fn preserved(&self) -> bool {
        matches!(self, WorkDir::Persistent(_))
    }

    /// Remove an intermediate file once its consuming stage is done.
    ///
    /// No-op for preserved directories; a missing file is ignored.
    pub fn discard(&self, name: &str) {
        if !self.preserved() {
            let _ = std::fs::remove_file(self.path().join(name));
        }
    }
}
