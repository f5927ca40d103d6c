use anyhow::Result;
use arboard::Clipboard;
#[cfg(target_os = "linux")]
use arboard::SetExtLinux;
use tracing::{debug, warn};

pub const DAEMON_FLAG: &str = "__clipboard_daemon";

// On Linux the clipboard contents vanish with the owning process, so a detached
// copy of ourselves holds them until another program takes ownership.
#[cfg(target_os = "linux")]
fn run_daemon_mode() -> Result<()> {
    let text = std::io::read_to_string(std::io::stdin())?;

    let mut clipboard = Clipboard::new()?;
    // Blocks until another owner replaces the selection.
    clipboard.set().wait().text(text)?;
    Ok(())
}

/// Checks if the DAEMON_FLAG is present in args. If so, runs in daemon mode.
/// Returns Ok(true) if daemon mode was run, Ok(false) otherwise.
pub fn check_and_run_daemon_if_requested() -> Result<bool> {
    if std::env::args().any(|a| a == DAEMON_FLAG) {
        #[cfg(target_os = "linux")]
        {
            run_daemon_mode()?;
            return Ok(true);
        }
        #[cfg(not(target_os = "linux"))]
        {
            warn!("{DAEMON_FLAG} flag used on non-Linux system. Ignoring.");
            return Ok(true);
        }
    }
    Ok(false)
}

/// Copy a preview URL so it can be pasted into a browser.
pub fn copy_text_to_clipboard(text: String) -> Result<()> {
    debug!(len = text.len(), "copying to clipboard");

    #[cfg(not(target_os = "linux"))]
    {
        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(text)?;
    }

    #[cfg(target_os = "linux")]
    {
        use std::io::Write;
        use std::process::{Command, Stdio};

        let mut child = Command::new(std::env::current_exe()?)
            .arg(DAEMON_FLAG)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .current_dir("/")
            .spawn()?;

        match child.stdin.take() {
            Some(mut stdin) => {
                stdin.write_all(text.as_bytes())?;
                stdin.flush()?;
            }
            None => {
                warn!("clipboard daemon has no stdin");
                let _ = child.kill();
                reap_in_background(child);
                return Err(anyhow::anyhow!("Failed to get stdin for clipboard daemon"));
            }
        }
        reap_in_background(child);
    }
    Ok(())
}

// The daemon lives until another program owns the clipboard, so it is waited
// on from a side thread instead of the UI loop.
#[cfg(target_os = "linux")]
fn reap_in_background(
    mut child: std::process::Child,
) -> std::thread::JoinHandle<Option<std::process::ExitStatus>> {
    std::thread::spawn(move || match child.wait() {
        Ok(status) => {
            debug!(%status, "clipboard daemon exited");
            Some(status)
        }
        Err(e) => {
            warn!(error = %e, "could not wait on clipboard daemon");
            None
        }
    })
}
