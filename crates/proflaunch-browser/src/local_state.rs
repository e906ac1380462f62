//! Profile discovery from Chrome's `Local State` file.
//!
//! Chrome keeps one entry per profile directory under
//! `profile.info_cache`. Each entry may carry the signed-in Google account
//! (`gaia_info.email`) and a plain `user_name`; either one identifies the
//! profile by email.

use proflaunch_core::rank_key;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// One launchable profile, identified by email
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileRecord {
    pub directory_name: String,
    pub email: String,
    pub display_name: String,
}

/// Details shown for a single profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProfileInfo {
    pub email: String,
    pub name: String,
    pub profile_dir: String,
    pub user_name: String,
    pub gaia_name: String,
}

/// Typed view of one `info_cache` entry. Every field is optional because
/// Chrome omits fields freely across versions.
#[derive(Debug, Clone, Default)]
struct CachedProfile {
    directory: String,
    name: Option<String>,
    user_name: Option<String>,
    gaia_email: Option<String>,
    gaia_given_name: Option<String>,
}

impl CachedProfile {
    fn from_value(directory: &str, value: &Value) -> Self {
        let gaia = value.get("gaia_info");
        Self {
            directory: directory.to_string(),
            name: string_field(Some(value), "name"),
            user_name: string_field(Some(value), "user_name"),
            gaia_email: string_field(gaia, "email"),
            gaia_given_name: string_field(gaia, "given_name"),
        }
    }

    /// Account email, falling back to the plain user name
    fn email(&self) -> Option<&str> {
        self.gaia_email.as_deref().or(self.user_name.as_deref())
    }

    fn matches(&self, email: &str) -> bool {
        self.gaia_email.as_deref() == Some(email) || self.user_name.as_deref() == Some(email)
    }

    fn display_name(&self) -> String {
        self.name
            .clone()
            .or_else(|| self.gaia_given_name.clone())
            .unwrap_or_default()
    }
}

/// Non-empty string at `key` of an optional JSON object
fn string_field(object: Option<&Value>, key: &str) -> Option<String> {
    object
        .and_then(|o| o.get(key))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parsed `Local State` profile cache, in the file's own order
#[derive(Debug, Clone, Default)]
pub struct LocalState {
    profiles: Vec<CachedProfile>,
}

impl LocalState {
    /// Default `Local State` location for the Stable channel
    pub fn default_path() -> Option<PathBuf> {
        #[cfg(target_os = "windows")]
        return dirs::data_local_dir().map(|dir| {
            dir.join("Google")
                .join("Chrome")
                .join("User Data")
                .join("Local State")
        });

        #[cfg(target_os = "macos")]
        return dirs::home_dir().map(|home| {
            home.join("Library")
                .join("Application Support")
                .join("Google")
                .join("Chrome")
                .join("Local State")
        });

        #[cfg(not(any(target_os = "windows", target_os = "macos")))]
        return dirs::home_dir().map(|home| {
            home.join(".config")
                .join("google-chrome")
                .join("Local State")
        });
    }

    /// Read and parse the file at `path`.
    ///
    /// Returns `None` when the file is missing or is not valid JSON; the
    /// reason is logged as a warning and never propagated.
    pub fn read(path: &Path) -> Option<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("Local State not found at {}: {}", path.display(), e);
                return None;
            }
        };

        let state = Self::from_json(&content);
        if state.is_none() {
            tracing::warn!("Local State at {} is not valid JSON", path.display());
        }
        state
    }

    /// Parse `Local State` JSON content
    pub fn from_json(content: &str) -> Option<Self> {
        serde_json::from_str::<Value>(content)
            .ok()
            .map(|value| Self::from_value(&value))
    }

    /// Extract the profile cache from an already parsed document
    pub fn from_value(value: &Value) -> Self {
        let profiles = value
            .get("profile")
            .and_then(|p| p.get("info_cache"))
            .and_then(Value::as_object)
            .map(|cache| {
                cache
                    .iter()
                    .map(|(dir, info)| CachedProfile::from_value(dir, info))
                    .collect()
            })
            .unwrap_or_default();

        Self { profiles }
    }

    /// One record per distinct email, ordered by number.
    ///
    /// Directories without any email are skipped. When several directories
    /// share an email the last one in file order wins.
    pub fn records(&self) -> Vec<ProfileRecord> {
        let mut records: Vec<ProfileRecord> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();

        for profile in &self.profiles {
            let Some(email) = profile.email().filter(|e| e.contains('@')) else {
                continue;
            };

            let record = ProfileRecord {
                directory_name: profile.directory.clone(),
                email: email.to_string(),
                display_name: profile.display_name(),
            };

            match index.get(email) {
                Some(&pos) => records[pos] = record,
                None => {
                    index.insert(email.to_string(), records.len());
                    records.push(record);
                }
            }
        }

        records.sort_by_key(|record| rank_key(&record.email));
        records
    }

    /// Distinct profile emails, ordered by number
    pub fn emails(&self) -> Vec<String> {
        self.records().into_iter().map(|r| r.email).collect()
    }

    /// First directory, in file order, whose account email or user name is
    /// `email`
    pub fn profile_directory_for(&self, email: &str) -> Option<&str> {
        self.profiles
            .iter()
            .find(|profile| profile.matches(email))
            .map(|profile| profile.directory.as_str())
    }

    /// Details of the first directory matching `email`
    pub fn profile_info(&self, email: &str) -> Option<ProfileInfo> {
        self.profiles
            .iter()
            .find(|profile| profile.matches(email))
            .map(|profile| ProfileInfo {
                email: email.to_string(),
                name: profile.name.clone().unwrap_or_default(),
                profile_dir: profile.directory.clone(),
                user_name: profile.user_name.clone().unwrap_or_default(),
                gaia_name: profile.gaia_given_name.clone().unwrap_or_default(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
