//! Best-effort presentation of a saved image in the desktop viewer.

use log::{info, warn};
use std::path::Path;
use std::process::{Command, Stdio};

/// Open `path` in the platform's default viewer.
///
/// Never fails the run: without a display, or when no viewer can be
/// launched, this only logs.
pub fn present(path: &Path) {
    if !display_available() {
        info!("No display available, not opening {}", path.display());
        return;
    }

    let mut cmd = viewer_command(path);
    match cmd
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
    {
        Ok(_) => info!("Opened {} in viewer", path.display()),
        Err(e) => warn!("Could not open viewer for {}: {}", path.display(), e),
    }
}

#[cfg(target_os = "macos")]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(path);
    cmd
}

#[cfg(target_os = "windows")]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", ""]).arg(path);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn viewer_command(path: &Path) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(path);
    cmd
}

#[cfg(any(target_os = "macos", target_os = "windows"))]
fn display_available() -> bool {
    true
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn display_available() -> bool {
    has_display(
        std::env::var_os("DISPLAY").as_deref(),
        std::env::var_os("WAYLAND_DISPLAY").as_deref(),
    )
}

#[cfg_attr(any(target_os = "macos", target_os = "windows"), allow(dead_code))]
fn has_display(x11: Option<&std::ffi::OsStr>, wayland: Option<&std::ffi::OsStr>) -> bool {
    let set = |v: Option<&std::ffi::OsStr>| v.is_some_and(|v| !v.is_empty());
    set(x11) || set(wayland)
}
