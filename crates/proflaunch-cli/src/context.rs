//! Paths and settings shared by every command.

use anyhow::{Context, Result, anyhow};
use proflaunch_browser::LocalState;
use proflaunch_core::Settings;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "proflaunch.cfg";
pub const LOG_FILE_NAME: &str = "proflaunch.log";

/// `<config dir>/proflaunch/proflaunch.cfg`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("proflaunch")
        .join(CONFIG_FILE_NAME)
}

/// The activity log lives next to the settings file
pub fn log_path_for(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|dir| dir.join(LOG_FILE_NAME))
        .unwrap_or_else(|| PathBuf::from(LOG_FILE_NAME))
}

pub struct AppContext {
    pub config_path: PathBuf,
    pub local_state_path: Option<PathBuf>,
    pub settings: Settings,
}

impl AppContext {
    pub fn load(config: Option<PathBuf>, local_state: Option<PathBuf>) -> Result<Self> {
        let config_path = config.unwrap_or_else(default_config_path);
        let settings = Settings::load(&config_path)
            .with_context(|| format!("Failed to read settings from {}", config_path.display()))?;

        Ok(Self {
            config_path,
            local_state_path: local_state.or_else(LocalState::default_path),
            settings,
        })
    }

    /// Persist settings after a mutation. Failures are logged, not returned.
    pub fn save(&self) {
        if let Err(e) = self.settings.save(&self.config_path) {
            tracing::warn!(
                "Failed to save settings to {}: {}",
                self.config_path.display(),
                e
            );
        }
    }

    /// Re-read Local State. Every call reads the file again.
    pub fn local_state(&self) -> Option<LocalState> {
        self.local_state_path.as_deref().and_then(LocalState::read)
    }

    /// Like [`local_state`](Self::local_state), but an absent file is an error
    pub fn require_local_state(&self) -> Result<LocalState> {
        self.local_state().ok_or_else(|| match &self.local_state_path {
            Some(path) => anyhow!(
                "Chrome Local State not found or unreadable at {}",
                path.display()
            ),
            None => anyhow!("Could not determine the Chrome Local State location"),
        })
    }

    /// Known profile emails, empty when Local State is unavailable
    pub fn emails(&self) -> Vec<String> {
        self.local_state()
            .map(|state| state.emails())
            .unwrap_or_default()
    }
}
