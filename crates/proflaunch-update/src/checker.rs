use crate::manifest::UpdateManifest;
use crate::version::is_newer;
use std::time::Duration;
use url::Url;

/// Timeout applied to the whole manifest request
pub const DEFAULT_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Fetches the update manifest and decides whether it offers a newer version.
///
/// Every failure is absorbed: a check either yields an offer or nothing.
#[derive(Debug, Clone)]
pub struct UpdateChecker {
    current_version: String,
    manifest_url: String,
    fallback_download_url: String,
    timeout: Duration,
}

impl UpdateChecker {
    pub fn new(current_version: impl Into<String>, manifest_url: impl Into<String>) -> Self {
        Self {
            current_version: current_version.into(),
            manifest_url: manifest_url.into(),
            fallback_download_url: String::new(),
            timeout: DEFAULT_CHECK_TIMEOUT,
        }
    }

    /// Artifact URL used when the manifest names none
    pub fn with_download_url(mut self, url: impl Into<String>) -> Self {
        self.fallback_download_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn current_version(&self) -> &str {
        &self.current_version
    }

    /// A blank manifest URL turns update checking off
    pub fn is_enabled(&self) -> bool {
        !self.manifest_url.trim().is_empty()
    }

    /// Fetch the manifest and return it when it is strictly newer than the
    /// running version.
    pub fn check(&self) -> Option<UpdateManifest> {
        if !self.is_enabled() {
            tracing::debug!("Update checking disabled: no manifest URL configured");
            return None;
        }

        let body = self.fetch()?;
        let manifest = UpdateManifest::parse(&body, &self.fallback_download_url)?;

        if is_newer(&manifest.version, &self.current_version) {
            tracing::info!(
                "Update available: {} (running {})",
                manifest.version,
                self.current_version
            );
            Some(manifest)
        } else {
            tracing::debug!(
                "No update: manifest version {} is not newer than {}",
                manifest.version,
                self.current_version
            );
            None
        }
    }

    fn fetch(&self) -> Option<String> {
        let url = self.manifest_url.trim();
        if let Err(e) = Url::parse(url) {
            tracing::debug!("Invalid update manifest URL {}: {}", url, e);
            return None;
        }

        tracing::debug!("Checking for updates at {}", url);
        let agent = ureq::AgentBuilder::new().timeout(self.timeout).build();

        let response = match agent.get(url).call() {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!("Update check failed: {}", e);
                return None;
            }
        };

        match response.into_string() {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::debug!("Failed to read update manifest: {}", e);
                None
            }
        }
    }
}

/// Warning to show whenever self-update is configured: artifacts are
/// installed without any signature or checksum verification.
pub fn integrity_warning(manifest_url: &str) -> Option<String> {
    let manifest_url = manifest_url.trim();
    if manifest_url.is_empty() {
        return None;
    }

    let mut warning = format!(
        "Updates from {} are installed without signature or checksum verification",
        manifest_url
    );
    if Url::parse(manifest_url).is_ok_and(|url| url.scheme() == "http") {
        warning.push_str(" and are fetched over plain HTTP");
    }
    Some(warning)
}
