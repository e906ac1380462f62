//! Update lifecycle state machine.

use crate::applier::{ApplyOutcome, UpdateApplier};
use crate::checker::UpdateChecker;
use crate::error::{Error, Result};
use crate::manifest::UpdateManifest;
use std::fmt;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePhase {
    #[default]
    Idle,
    Checking,
    NoUpdateFound,
    UpdateOffered,
    Downloading,
    Installing,
    /// The new executable is in place; the process should exit
    Restarted,
    Failed,
}

impl fmt::Display for UpdatePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpdatePhase::Idle => "idle",
            UpdatePhase::Checking => "checking",
            UpdatePhase::NoUpdateFound => "no-update-found",
            UpdatePhase::UpdateOffered => "update-offered",
            UpdatePhase::Downloading => "downloading",
            UpdatePhase::Installing => "installing",
            UpdatePhase::Restarted => "restarted",
            UpdatePhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// Drives one check → offer → download → install pass.
#[derive(Debug, Default)]
pub struct UpdateCycle {
    phase: UpdatePhase,
    offer: Option<UpdateManifest>,
    outcome: Option<ApplyOutcome>,
    failure: Option<String>,
}

impl UpdateCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> UpdatePhase {
        self.phase
    }

    /// Manifest currently on offer, if any
    pub fn offer(&self) -> Option<&UpdateManifest> {
        self.offer.as_ref()
    }

    pub fn outcome(&self) -> Option<ApplyOutcome> {
        self.outcome
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn can_transition(&self, to: UpdatePhase) -> bool {
        use UpdatePhase::*;
        matches!(
            (self.phase, to),
            (Idle, Checking)
                | (Checking, NoUpdateFound)
                | (Checking, UpdateOffered)
                | (UpdateOffered, Downloading)
                | (UpdateOffered, Idle)
                | (Downloading, Installing)
                | (Downloading, Failed)
                | (Installing, Restarted)
                | (Installing, Failed)
                | (NoUpdateFound, Idle)
                | (Failed, Idle)
        )
    }

    fn transition(&mut self, to: UpdatePhase) -> Result<()> {
        if !self.can_transition(to) {
            return Err(Error::InvalidTransition {
                from: self.phase,
                to,
            });
        }
        tracing::debug!("Update phase: {} -> {}", self.phase, to);
        self.phase = to;
        Ok(())
    }

    /// Run the checker. Ends in `UpdateOffered` or `NoUpdateFound`.
    pub fn check(&mut self, checker: &UpdateChecker) -> Result<Option<&UpdateManifest>> {
        self.transition(UpdatePhase::Checking)?;

        match checker.check() {
            Some(manifest) => {
                self.transition(UpdatePhase::UpdateOffered)?;
                self.offer = Some(manifest);
            }
            None => self.transition(UpdatePhase::NoUpdateFound)?,
        }
        Ok(self.offer.as_ref())
    }

    /// Turn down the offered update
    pub fn decline(&mut self) -> Result<()> {
        self.transition(UpdatePhase::Idle)?;
        self.offer = None;
        Ok(())
    }

    /// Download the offered artifact and install it over `target`.
    /// Returns the phase the cycle ends in: `Restarted` or `Failed`.
    pub fn install(&mut self, applier: &UpdateApplier, target: &Path) -> Result<UpdatePhase> {
        self.transition(UpdatePhase::Downloading)?;

        let url = self
            .offer
            .as_ref()
            .map(|manifest| manifest.download_url.trim().to_string())
            .unwrap_or_default();
        if url.is_empty() {
            return self.fail("No download URL for this update");
        }

        let Some(downloaded) = applier.download(&url) else {
            return self.fail("Update download failed");
        };

        self.transition(UpdatePhase::Installing)?;
        let outcome = applier.apply(&downloaded, target);
        self.outcome = Some(outcome);

        if let Err(e) = fs::remove_file(&downloaded) {
            tracing::debug!(
                "Failed to remove downloaded update {}: {}",
                downloaded.display(),
                e
            );
        }

        if outcome.applied_ok {
            self.transition(UpdatePhase::Restarted)?;
            Ok(self.phase)
        } else if outcome.is_double_failure() {
            self.fail("Update failed and the original executable could not be restored")
        } else {
            self.fail("Update failed; the original executable is unchanged")
        }
    }

    /// Return to `Idle` after a finished or failed pass
    pub fn reset(&mut self) -> Result<()> {
        self.transition(UpdatePhase::Idle)?;
        self.offer = None;
        self.outcome = None;
        self.failure = None;
        Ok(())
    }

    fn fail(&mut self, reason: &str) -> Result<UpdatePhase> {
        self.transition(UpdatePhase::Failed)?;
        self.failure = Some(reason.to_string());
        Ok(self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn offered(download_url: &str) -> UpdateCycle {
        UpdateCycle {
            phase: UpdatePhase::UpdateOffered,
            offer: Some(UpdateManifest {
                version: "2.4.0".to_string(),
                changelog: vec![],
                download_url: download_url.to_string(),
                required: false,
            }),
            outcome: None,
            failure: None,
        }
    }

    #[test]
    fn test_valid_transitions() {
        let mut cycle = UpdateCycle::new();
        assert_eq!(cycle.phase(), UpdatePhase::Idle);
        assert!(cycle.can_transition(UpdatePhase::Checking));
        assert!(!cycle.can_transition(UpdatePhase::Downloading));
        assert!(!cycle.can_transition(UpdatePhase::Restarted));

        cycle.transition(UpdatePhase::Checking).unwrap();
        cycle.transition(UpdatePhase::NoUpdateFound).unwrap();
        cycle.transition(UpdatePhase::Idle).unwrap();
    }

    #[test]
    fn test_invalid_transition_is_rejected() {
        let mut cycle = UpdateCycle::new();
        let err = cycle.transition(UpdatePhase::Installing).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidTransition {
                from: UpdatePhase::Idle,
                to: UpdatePhase::Installing
            }
        ));
        assert_eq!(err.to_string(), "Invalid update transition: idle -> installing");
        assert_eq!(cycle.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_disabled_checker_finds_nothing() {
        let mut cycle = UpdateCycle::new();
        let checker = UpdateChecker::new("2.3.0", "");

        assert!(cycle.check(&checker).unwrap().is_none());
        assert_eq!(cycle.phase(), UpdatePhase::NoUpdateFound);

        // A second check needs a reset first
        assert!(cycle.check(&checker).is_err());
        cycle.reset().unwrap();
        assert_eq!(cycle.phase(), UpdatePhase::Idle);
    }

    #[test]
    fn test_decline_returns_to_idle() {
        let mut cycle = offered("https://example.com/proflaunch");
        cycle.decline().unwrap();
        assert_eq!(cycle.phase(), UpdatePhase::Idle);
        assert!(cycle.offer().is_none());
    }

    #[test]
    fn test_install_without_download_url_fails() {
        let dir = TempDir::new().unwrap();
        let mut cycle = offered("");

        let phase = cycle
            .install(&UpdateApplier::new(), &dir.path().join("proflaunch"))
            .unwrap();

        assert_eq!(phase, UpdatePhase::Failed);
        assert!(cycle.failure().unwrap().contains("No download URL"));
        cycle.reset().unwrap();
    }

    #[tokio::test]
    async fn test_full_cycle_installs_update() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/version.json"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!(
                r#"{{"version": "2.4.0", "download_url": "{}/proflaunch"}}"#,
                server.uri()
            )))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/proflaunch"))
            .respond_with(ResponseTemplate::new(200).set_body_string("new build"))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        fs::write(&target, "old build").unwrap();

        let manifest_url = format!("{}/version.json", server.uri());
        let install_target = target.clone();
        let (phase, offered_version) = tokio::task::spawn_blocking(move || {
            let mut cycle = UpdateCycle::new();
            let checker = UpdateChecker::new("2.3.0", manifest_url);
            let version = cycle
                .check(&checker)
                .unwrap()
                .map(|manifest| manifest.version.clone());
            let phase = cycle
                .install(&UpdateApplier::new(), &install_target)
                .unwrap();
            (phase, version)
        })
        .await
        .unwrap();

        assert_eq!(offered_version.as_deref(), Some("2.4.0"));
        assert_eq!(phase, UpdatePhase::Restarted);
        assert_eq!(fs::read_to_string(&target).unwrap(), "new build");
    }

    #[tokio::test]
    async fn test_failed_download_ends_in_failed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let target = dir.path().join("proflaunch");
        fs::write(&target, "old build").unwrap();

        let mut cycle = offered(&format!("{}/proflaunch", server.uri()));
        let install_target = target.clone();
        let (phase, failure) = tokio::task::spawn_blocking(move || {
            let phase = cycle
                .install(&UpdateApplier::new(), &install_target)
                .unwrap();
            (phase, cycle.failure().map(str::to_string))
        })
        .await
        .unwrap();

        assert_eq!(phase, UpdatePhase::Failed);
        assert_eq!(failure.as_deref(), Some("Update download failed"));
        assert_eq!(fs::read_to_string(&target).unwrap(), "old build");
    }
}
