//! Best-effort "open the result" after encoding.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

#[cfg(target_os = "windows")]
const VIEWERS: &[&str] = &[];

#[cfg(target_os = "macos")]
const VIEWERS: &[&str] = &["open"];

#[cfg(not(any(target_os = "windows", target_os = "macos")))]
const VIEWERS: &[&str] = &["xdg-open", "display", "eog", "open"];

/// Opens `path` in the platform image viewer without waiting for it.
///
/// Failures are logged and otherwise ignored.
pub fn open(path: &Path) {
    if cfg!(target_os = "windows") {
        let spawned = Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(path)
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        if let Err(e) = spawned {
            debug!(error = %e, "could not start viewer");
        }
        return;
    }

    for &viewer in VIEWERS {
        match Command::new(viewer)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(_) => {
                debug!(viewer, path = %path.display(), "opened viewer");
                return;
            }
            Err(e) => debug!(viewer, error = %e, "viewer unavailable"),
        }
    }
    debug!("no image viewer found");
}
