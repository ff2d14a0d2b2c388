//! External link opening via the platform launcher

use anyhow::{Context, Result};
use std::process::{Command, Stdio};

#[cfg(target_os = "macos")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("open");
    cmd.arg(url);
    cmd
}

#[cfg(target_os = "windows")]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("cmd");
    cmd.args(["/C", "start", "", url]);
    cmd
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn launcher(url: &str) -> Command {
    let mut cmd = Command::new("xdg-open");
    cmd.arg(url);
    cmd
}

/// Open a URL in the default browser, detached from the TUI
pub fn open_external(url: &str) -> Result<()> {
    launcher(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .with_context(|| format!("Failed to open {}", url))?;
    Ok(())
}
