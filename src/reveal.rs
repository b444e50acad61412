//! Reveal a result in the OS file manager.
//!
//! Fire-and-forget: the file manager is spawned detached and never joined.
//! Spawn failures are reported to the caller but touch no orchestration
//! state.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Open the platform file manager at `path` (selecting it where the
/// platform supports selection).
pub fn reveal_in_file_manager(path: &Path) -> std::io::Result<()> {
    let mut cmd = reveal_command(path);
    let child = cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    debug!(pid = child.id(), path = %path.display(), "spawned file manager");
    Ok(())
}

#[cfg(target_os = "macos")]
fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg("-R").arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn reveal_command(path: &Path) -> Command {
    let mut cmd = Command::new("explorer");
    cmd.arg(format!("/select,{}", path.display()));
    cmd
}

#[cfg(all(unix, not(target_os = "macos")))]
fn reveal_command(path: &Path) -> Command {
    // No portable selection on Linux; open the containing directory.
    let target = if path.is_dir() {
        path.to_path_buf()
    } else {
        path.parent().unwrap_or(path).to_path_buf()
    };
    let mut cmd = Command::new("xdg-open");
    cmd.arg(target);
    cmd
}
