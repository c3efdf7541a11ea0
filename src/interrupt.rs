//! Ctrl-C handling while an install root exists.
//!
//! Cleanup on normal exit goes through `Session::close`. A SIGINT outside the line
//! editor (during the startup installs or a long evaluation) would otherwise end
//! the process without running destructors, so the root would be left behind.

use log::{debug, warn};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;

/// Exit status after an interrupt, as a shell reports SIGINT.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Watches for Ctrl-C until dropped.
///
/// On interrupt the node process is killed, the root is removed and the
/// process exits with status 130.
pub struct InterruptGuard {
    handler: JoinHandle<()>,
}

impl InterruptGuard {
    pub fn watch(root: PathBuf, node_pid: Option<u32>) -> Self {
        let handler = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                eprintln!("\nInterrupted, cleaning up...");
                if let Some(pid) = node_pid {
                    kill_process(pid);
                }
                remove_root(&root);
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        });
        Self { handler }
    }
}

impl Drop for InterruptGuard {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

pub(crate) fn remove_root(root: &Path) {
    if !root.exists() {
        return;
    }
    match std::fs::remove_dir_all(root) {
        Ok(()) => debug!("Removed install root {:?}", root),
        Err(e) => warn!("Failed to remove {:?}: {}", root, e),
    }
}

#[cfg(unix)]
fn kill_process(pid: u32) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let Ok(raw) = i32::try_from(pid) else {
        return;
    };
    if let Err(e) = kill(Pid::from_raw(raw), Signal::SIGKILL) {
        debug!("Failed to kill node (pid {}): {}", pid, e);
    }
}

// The child's stdin closes when this process exits, which ends the driver.
#[cfg(not(unix))]
fn kill_process(_pid: u32) {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_remove_root_deletes_installed_tree() {
        let dir = tempdir().unwrap();
        let root = dir.path().join("pkgshell-abc");
        let module = root.join("pkgshell-0/node_modules/pkgshell-0");
        std::fs::create_dir_all(&module).unwrap();
        std::fs::write(module.join("index.js"), "module.exports = 1;").unwrap();

        remove_root(&root);

        assert!(!root.exists());
        assert!(dir.path().exists());
    }

    #[test]
    fn test_remove_root_missing_is_ignored() {
        let dir = tempdir().unwrap();
        remove_root(&dir.path().join("gone"));
    }

    #[tokio::test]
    async fn test_dropping_guard_stops_watching() {
        let dir = tempdir().unwrap();
        let guard = InterruptGuard::watch(dir.path().to_path_buf(), None);
        let handler = guard.handler.abort_handle();
        drop(guard);
        for _ in 0..100 {
            if handler.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(handler.is_finished());
        assert!(dir.path().exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_kill_process_stops_child() {
        let mut child = std::process::Command::new("sleep").arg("30").spawn().unwrap();
        kill_process(child.id());
        let status = child.wait().unwrap();
        assert!(!status.success());
    }
}
