use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Connect timeout for artifact downloads. Reads are not bounded.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of replacing the installed executable.
///
/// `restored_ok` is `None` when no restore was attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyOutcome {
    pub applied_ok: bool,
    pub restored_ok: Option<bool>,
}

impl ApplyOutcome {
    fn applied() -> Self {
        Self {
            applied_ok: true,
            restored_ok: None,
        }
    }

    fn failed(restored_ok: Option<bool>) -> Self {
        Self {
            applied_ok: false,
            restored_ok,
        }
    }

    /// True when the update failed and the original could not be put back
    pub fn is_double_failure(&self) -> bool {
        !self.applied_ok && self.restored_ok == Some(false)
    }
}

/// Path of the copy kept while an update is being installed
pub fn backup_path(target: &Path) -> PathBuf {
    with_suffix(target, ".backup")
}

fn staging_path(target: &Path) -> PathBuf {
    with_suffix(target, ".new")
}

fn with_suffix(target: &Path, suffix: &str) -> PathBuf {
    let mut name = target.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Downloads update artifacts and swaps them in for the running executable.
#[derive(Debug, Clone)]
pub struct UpdateApplier {
    connect_timeout: Duration,
}

impl Default for UpdateApplier {
    fn default() -> Self {
        Self::new()
    }
}

impl UpdateApplier {
    pub fn new() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Download `url` into a fresh temporary file and return its path.
    /// The caller owns the file afterwards.
    pub fn download(&self, url: &str) -> Option<PathBuf> {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(self.connect_timeout)
            .build();

        tracing::info!("Downloading update from {}", url);
        let response = match agent.get(url).call() {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Update download failed: {}", e);
                return None;
            }
        };

        let mut file = match tempfile::Builder::new()
            .prefix("proflaunch-update-")
            .tempfile()
        {
            Ok(file) => file,
            Err(e) => {
                tracing::error!("Failed to create download file: {}", e);
                return None;
            }
        };

        // The temporary file is removed on drop if anything below fails
        if let Err(e) = io::copy(&mut response.into_reader(), file.as_file_mut()) {
            tracing::error!("Update download interrupted: {}", e);
            return None;
        }

        match file.into_temp_path().keep() {
            Ok(path) => {
                tracing::debug!("Update downloaded to {}", path.display());
                Some(path)
            }
            Err(e) => {
                tracing::error!("Failed to keep downloaded update: {}", e);
                None
            }
        }
    }

    /// Replace `target` with `downloaded`.
    ///
    /// An existing target is copied to `<target>.backup` first. The new file
    /// is staged next to the target and renamed over it, so a running
    /// executable can be replaced. On failure the backup made by this call
    /// is put back.
    pub fn apply(&self, downloaded: &Path, target: &Path) -> ApplyOutcome {
        let backup = backup_path(target);
        let backed_up = if target.exists() {
            if let Err(e) = fs::copy(target, &backup) {
                tracing::error!("Failed to back up {}: {}", target.display(), e);
                return ApplyOutcome::failed(None);
            }
            true
        } else {
            false
        };

        match stage_and_swap(downloaded, target, true) {
            Ok(()) => {
                tracing::info!("Update installed to {}", target.display());
                ApplyOutcome::applied()
            }
            Err(e) => {
                tracing::error!("Failed to install update to {}: {}", target.display(), e);
                let restored = backed_up.then(|| restore(&backup, target));
                ApplyOutcome::failed(restored)
            }
        }
    }
}

fn restore(backup: &Path, target: &Path) -> bool {
    match stage_and_swap(backup, target, false) {
        Ok(()) => {
            tracing::info!("Restored {} from backup", target.display());
            true
        }
        Err(e) => {
            tracing::error!(
                "Failed to restore {} from {}: {}",
                target.display(),
                backup.display(),
                e
            );
            false
        }
    }
}

fn stage_and_swap(source: &Path, target: &Path, executable: bool) -> io::Result<()> {
    let staging = staging_path(target);
    let result = fs::copy(source, &staging)
        .and_then(|_| {
            if executable {
                make_executable(&staging)
            } else {
                Ok(())
            }
        })
        .and_then(|_| fs::rename(&staging, target));

    if result.is_err() {
        let _ = fs::remove_file(&staging);
    }
    result
}

#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn write(path: &Path, contents: &str) {
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_apply_replaces_and_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        let downloaded = dir.path().join("download.bin");
        write(&target, "old build");
        write(&downloaded, "new build");

        let outcome = UpdateApplier::new().apply(&downloaded, &target);

        assert_eq!(
            outcome,
            ApplyOutcome {
                applied_ok: true,
                restored_ok: None
            }
        );
        assert_eq!(fs::read_to_string(&target).unwrap(), "new build");
        assert_eq!(fs::read_to_string(backup_path(&target)).unwrap(), "old build");
        assert!(!staging_path(&target).exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_apply_marks_target_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        let downloaded = dir.path().join("download.bin");
        write(&target, "old");
        write(&downloaded, "new");

        assert!(UpdateApplier::new().apply(&downloaded, &target).applied_ok);

        let mode = fs::metadata(&target).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn test_apply_without_existing_target() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        let downloaded = dir.path().join("download.bin");
        write(&downloaded, "fresh");

        let outcome = UpdateApplier::new().apply(&downloaded, &target);

        assert!(outcome.applied_ok);
        assert_eq!(fs::read_to_string(&target).unwrap(), "fresh");
        assert!(!backup_path(&target).exists());
    }

    #[test]
    fn test_failed_apply_restores_original() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        write(&target, "old build");

        let missing = dir.path().join("missing.bin");
        let outcome = UpdateApplier::new().apply(&missing, &target);

        assert_eq!(
            outcome,
            ApplyOutcome {
                applied_ok: false,
                restored_ok: Some(true)
            }
        );
        assert!(!outcome.is_double_failure());
        assert_eq!(fs::read_to_string(&target).unwrap(), "old build");
    }

    #[test]
    fn test_failed_apply_without_backup_skips_restore() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        let missing = dir.path().join("missing.bin");

        let outcome = UpdateApplier::new().apply(&missing, &target);

        assert_eq!(outcome, ApplyOutcome::failed(None));
        assert!(!target.exists());
    }

    #[test]
    fn test_double_failure() {
        assert!(ApplyOutcome::failed(Some(false)).is_double_failure());
        assert!(!ApplyOutcome::failed(None).is_double_failure());
        assert!(!ApplyOutcome::applied().is_double_failure());
    }

    #[tokio::test]
    async fn test_download_writes_body_to_temp_file() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proflaunch"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"binary payload".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/proflaunch", server.uri());
        let downloaded = tokio::task::spawn_blocking(move || UpdateApplier::new().download(&url))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(fs::read(&downloaded).unwrap(), b"binary payload");
        fs::remove_file(downloaded).unwrap();
    }

    #[tokio::test]
    async fn test_download_http_error_is_absent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/proflaunch", server.uri());
        let downloaded = tokio::task::spawn_blocking(move || UpdateApplier::new().download(&url))
            .await
            .unwrap();

        assert!(downloaded.is_none());
    }
}
