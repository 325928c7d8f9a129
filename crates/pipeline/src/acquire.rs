use pqc_scan_core::{AcquirerConfig, Result, ScanError};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{info, warn};

/// A local directory the pipeline operates on. Only copies the acquirer
/// created itself (`owned`) are deleted at the end of a scan; a
/// caller-supplied local path must survive untouched.
#[derive(Debug)]
pub struct WorkingCopy {
    pub path: PathBuf,
    pub owned: bool,
}

impl WorkingCopy {
    /// Remove the directory from disk iff this copy is owned.
    pub fn cleanup(&self) {
        if !self.owned {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            warn!(path = %self.path.display(), error = %e, "working copy cleanup failed");
        }
    }
}

/// Materialize a working copy for a target string: an existing local
/// directory (or `file://` URI) is borrowed as-is, anything else is
/// shallow-cloned into a fresh temporary directory.
pub async fn acquire(target: &str, config: &AcquirerConfig) -> Result<WorkingCopy> {
    let local = target.strip_prefix("file://").unwrap_or(target);
    let local_path = Path::new(local);
    if local_path.is_dir() {
        info!(path = local, "local directory detected, skipping clone");
        let path = std::fs::canonicalize(local_path).unwrap_or_else(|_| local_path.to_path_buf());
        return Ok(WorkingCopy { path, owned: false });
    }

    let temp_dir = tempfile::Builder::new()
        .prefix("pqc_scan_")
        .tempdir()
        .map_err(|e| ScanError::Acquire {
            message: format!("Failed to create temp directory: {}", e),
        })?
        .keep();

    match clone_into(target, &temp_dir, config.clone_timeout_secs).await {
        Ok(()) => Ok(WorkingCopy {
            path: temp_dir,
            owned: true,
        }),
        Err(e) => {
            // Unwind the temp dir before surfacing the failure.
            let _ = std::fs::remove_dir_all(&temp_dir);
            Err(e)
        }
    }
}

async fn clone_into(url: &str, dir: &Path, timeout_secs: u64) -> Result<()> {
    info!(url, dir = %dir.display(), "cloning repository");

    let output = Command::new("git")
        .args(["clone", "--depth", "1", url])
        .arg(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output();

    let output = tokio::time::timeout(Duration::from_secs(timeout_secs), output)
        .await
        .map_err(|_| ScanError::Acquire {
            message: format!("Git clone timeout ({} seconds)", timeout_secs),
        })?
        .map_err(|e| ScanError::Acquire {
            message: format!("Failed to run git: {}", e),
        })?;

    if !output.status.success() {
        return Err(ScanError::Acquire {
            message: format!(
                "Git clone failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(())
}
