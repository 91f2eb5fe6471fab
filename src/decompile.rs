//! CHM decompilation via the Windows HTML Help viewer (`hh.exe`).
//!
//! ## Why shell out instead of parsing the archive?
//!
//! The CHM container is a proprietary ITSS storage; the only universally
//! reliable extractor is the viewer that ships with Windows, which exposes a
//! `-decompile` mode. This module is a thin subprocess wrapper around it —
//! the conversion pipeline never depends on it and runs anywhere once an
//! HTML tree exists.
//!
//! The viewer lookup and invocation compile on every platform so the logic
//! stays testable; on non-Windows hosts the lookup simply finds nothing and
//! the caller gets [`Chm2MdError::ViewerNotFound`].

use crate::error::Chm2MdError;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

/// Locate `hh.exe`: first on `PATH`, then in `%SystemRoot%` and
/// `%SystemRoot%\system32`.
pub fn find_help_viewer() -> Option<PathBuf> {
    for name in ["hh.exe", "HH.EXE"] {
        if let Some(paths) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&paths) {
                let candidate = dir.join(name);
                if candidate.is_file() {
                    return Some(candidate);
                }
            }
        }
    }

    let system_root = std::env::var_os("SystemRoot")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(r"C:\Windows"));
    [
        system_root.join("hh.exe"),
        system_root.join("system32").join("hh.exe"),
    ]
    .into_iter()
    .find(|candidate| candidate.is_file())
}

/// Unpack a CHM archive into a directory of HTML pages.
///
/// Runs `hh.exe -decompile <out_dir> <chm>` and waits for it to finish.
/// The viewer's console output is decoded as GBK (what it emits on the
/// Chinese-locale Windows installs this corpus comes from) and forwarded to
/// the logs.
///
/// # Errors
/// * [`Chm2MdError::ChmNotFound`] — the archive path is not a file
/// * [`Chm2MdError::ViewerNotFound`] — no `hh.exe` on this host
/// * [`Chm2MdError::OutputDirFailed`] — could not create `out_dir`
/// * [`Chm2MdError::DecompileFailed`] — the viewer failed to run or exited
///   non-zero
pub fn decompile_chm(chm: &Path, out_dir: &Path) -> Result<(), Chm2MdError> {
    if !chm.is_file() {
        return Err(Chm2MdError::ChmNotFound {
            path: chm.to_path_buf(),
        });
    }

    let viewer = find_help_viewer().ok_or(Chm2MdError::ViewerNotFound)?;

    std::fs::create_dir_all(out_dir).map_err(|e| Chm2MdError::OutputDirFailed {
        path: out_dir.to_path_buf(),
        source: e,
    })?;

    info!(
        "Decompiling {} → {} using {}",
        chm.display(),
        out_dir.display(),
        viewer.display()
    );

    let output = Command::new(&viewer)
        .arg("-decompile")
        .arg(out_dir)
        .arg(chm)
        .output()
        .map_err(|e| Chm2MdError::DecompileFailed {
            detail: format!("failed to run {}: {}", viewer.display(), e),
        })?;

    log_viewer_output(&output.stdout, false);
    log_viewer_output(&output.stderr, true);

    if !output.status.success() {
        return Err(Chm2MdError::DecompileFailed {
            detail: format!("hh.exe exited with {}", output.status),
        });
    }

    info!("Decompilation complete");
    Ok(())
}

/// Forward the viewer's console bytes to the logs, decoded lossily as GBK.
fn log_viewer_output(bytes: &[u8], is_stderr: bool) {
    if bytes.is_empty() {
        return;
    }
    let (text, _, _) = encoding_rs::GBK.decode(bytes);
    for line in text.lines().filter(|l| !l.trim().is_empty()) {
        if is_stderr {
            warn!("hh.exe: {}", line);
        } else {
            debug!("hh.exe: {}", line);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_archive_is_reported_before_viewer_lookup() {
        // Checked first so the error is meaningful even on hosts with no
        // help viewer installed.
        let err = decompile_chm(
            Path::new("/definitely/not/a/manual.chm"),
            Path::new("/tmp/chm2md-test-out"),
        )
        .unwrap_err();
        assert!(matches!(err, Chm2MdError::ChmNotFound { .. }));
    }

    #[cfg(not(windows))]
    #[test]
    fn viewer_lookup_fails_cleanly_off_windows() {
        // PATH on a Unix host should not contain hh.exe.
        if find_help_viewer().is_none() {
            let dir = tempfile::tempdir().unwrap();
            let chm = dir.path().join("manual.chm");
            std::fs::write(&chm, b"ITSF").unwrap();
            let err = decompile_chm(&chm, &dir.path().join("html")).unwrap_err();
            assert!(matches!(err, Chm2MdError::ViewerNotFound));
        }
    }
}
