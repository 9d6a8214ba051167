//! Stopping the wrapped command.
//!
//! The child is asked to exit with SIGTERM first and only killed once the
//! grace period runs out. Platforms without signals go straight to kill.

use std::io;
use std::process::ExitStatus;
use std::time::Duration;

use tokio::process::Child;

/// How long the child gets to exit after SIGTERM.
pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_secs(5);

/// Stop `child`, waiting up to `grace` for it to exit on its own.
pub async fn terminate(child: &mut Child, grace: Duration) -> io::Result<ExitStatus> {
    if let Some(status) = child.try_wait()? {
        return Ok(status);
    }

    if request_exit(child) {
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(status) => return status,
            Err(_) => {
                tracing::warn!(grace = ?grace, "Command ignored SIGTERM, killing it");
            }
        }
    }

    child.start_kill()?;
    child.wait().await
}

#[cfg(unix)]
fn request_exit(child: &Child) -> bool {
    let Some(pid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) else {
        return false;
    };

    // SAFETY: kill(2) has no memory effects; the pid belongs to a child we
    // have not reaped yet, so it cannot have been recycled.
    let rc = unsafe { libc::kill(pid, libc::SIGTERM) };
    if rc != 0 {
        tracing::debug!(pid, error = %io::Error::last_os_error(), "Failed to send SIGTERM");
        return false;
    }
    true
}

#[cfg(not(unix))]
fn request_exit(_child: &Child) -> bool {
    false
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::process::ExitStatusExt;
    use std::time::Instant;
    use tokio::process::Command;

    #[tokio::test]
    async fn test_terminate_sends_sigterm() {
        let mut child = Command::new("sleep").arg("30").spawn().unwrap();

        let start = Instant::now();
        let status = terminate(&mut child, Duration::from_secs(5)).await.unwrap();

        assert_eq!(status.signal(), Some(libc::SIGTERM));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_terminate_kills_after_grace_period() {
        let mut child = Command::new("sh")
            .args(["-c", "trap '' TERM; while true; do sleep 1; done"])
            .spawn()
            .unwrap();
        // Let the shell install its trap
        tokio::time::sleep(Duration::from_millis(200)).await;

        let status = terminate(&mut child, Duration::from_millis(300)).await.unwrap();
        assert_eq!(status.signal(), Some(libc::SIGKILL));
    }

    #[tokio::test]
    async fn test_terminate_exited_child() {
        let mut child = Command::new("true").spawn().unwrap();
        child.wait().await.unwrap();

        let status = terminate(&mut child, Duration::from_secs(1)).await.unwrap();
        assert!(status.success());
    }
}
