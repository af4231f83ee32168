use std::process::Stdio;

use tokio::process::Command;

#[cfg(target_os = "macos")]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(windows)]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("cmd");
    // The empty argument is the window title `start` would otherwise take
    // from the URL.
    command.args(["/C", "start", "", url]);
    command
}

#[cfg(not(any(target_os = "macos", windows)))]
fn opener_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}

/// Ask the desktop to show `url` in a new browser tab.  This is best effort:
/// if no opener is available the user can still follow the URL printed at
/// startup, so failures are only logged.
pub fn open(url: &str) {
    let spawned = opener_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();
    match spawned {
        Ok(_child) => debug!(url, "asked the desktop to open a browser"),
        Err(err) => warn!(url, %err, "could not open a browser"),
    }
}
