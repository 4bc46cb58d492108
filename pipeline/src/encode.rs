//! Disk re-encoding.
//!
//! Shells out to qemu-img to re-encode the raw disk payload into a
//! compressed qcow2 image. Re-encoding is deterministic for identical
//! input, so a failed run is recovered by re-running the pipeline; there is
//! no retry here.

use std::path::{Path, PathBuf};
use std::process::Command;

use vmship_core::error::{Result, ShipError};

use crate::tool;

/// External re-encoding tool.
const ENCODER: &str = "qemu-img";
/// Target disk format.
const TARGET_FORMAT: &str = "qcow2";

/// An encoded disk image plus the byte sizes needed for savings reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskArtifact {
    /// Path of the encoded image.
    pub path: PathBuf,
    /// Byte size of the pre-encoding payload.
    pub raw_bytes: u64,
    /// Byte size of the encoded image.
    pub encoded_bytes: u64,
}

impl DiskArtifact {
    /// Size reduction as an integer percentage, truncated toward zero.
    ///
    /// Negative when the encoded image ended up larger than the raw payload.
    pub fn savings_percent(&self) -> i64 {
        if self.raw_bytes == 0 {
            return 0;
        }
        100 - (100 * self.encoded_bytes / self.raw_bytes) as i64
    }
}

/// Re-encode `raw` into a compressed qcow2 image at `target`.
pub fn encode(raw: &Path, target: &Path) -> Result<DiskArtifact> {
    println!("Recompressing disk image");
    tool::run(
        ENCODER,
        Command::new(ENCODER)
            .args(["convert", "-c", "-p", "-O", TARGET_FORMAT])
            .arg(raw)
            .arg(target),
    )?;

    let raw_bytes = size_of(raw)?;
    let encoded_bytes = size_of(target)?;
    let artifact = DiskArtifact {
        path: target.to_path_buf(),
        raw_bytes,
        encoded_bytes,
    };
    let savings = artifact.savings_percent();
    if savings != 0 {
        println!("compression savings {savings}%");
    }
    tracing::debug!(raw_bytes, encoded_bytes, savings, "disk re-encoded");
    Ok(artifact)
}

fn size_of(path: &Path) -> Result<u64> {
    Ok(std::fs::metadata(path)
        .map_err(|e| ShipError::ExternalTool {
            tool: ENCODER.to_string(),
            message: format!("missing output {}: {e}", path.display()),
        })?
        .len())
}
