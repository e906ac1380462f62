//! Flat `KEY=value` settings file.
//!
//! The file is read once at startup into [`Settings`] and written back in
//! full after every mutation. Lines that do not parse are ignored, so a file
//! written by an older release still loads.

use crate::rank::sort_by_number;
use crate::{Error, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Maximum number of remembered search queries.
pub const SEARCH_HISTORY_LIMIT: usize = 20;
/// Maximum number of recently launched emails.
pub const RECENTS_LIMIT: usize = 10;
/// Number of most-used profiles offered for quick launch.
pub const QUICK_LAUNCH_LIMIT: usize = 5;

const SCALAR_KEYS: [&str; 14] = [
    "URL_CHOICE",
    "LAST_EMAIL",
    "CHANNEL",
    "USE_PERURL",
    "THEME",
    "CUSTOM_CHROME",
    "AUTO_UPDATE_CHECK",
    "LAST_UPDATE_CHECK",
    "UPDATE_URL",
    "DOWNLOAD_URL",
    "FAVORITES",
    "RECENTS",
    "SEARCH_HISTORY",
    "QUICK_LAUNCH",
];

const NUMERIC_KEYS: [&str; 3] = ["URL_CHOICE", "USE_PERURL", "AUTO_UPDATE_CHECK"];

const NON_EMPTY_KEYS: [&str; 4] = ["LAST_EMAIL", "CHANNEL", "THEME", "LAST_UPDATE_CHECK"];

const KEYED_PREFIXES: [&str; 3] = ["PER_URL_", "USAGE_", "CUSTOM_URL_"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Preset key of the default target URL
    pub url_choice: String,
    pub last_email: String,
    /// Preferred release channel name (Stable, Beta, Dev, Canary)
    pub channel: String,
    /// Whether per-email URL choices override `url_choice`
    pub use_per_email_url: bool,
    pub theme: String,
    /// User-selected browser executable, empty when unset
    pub custom_chrome: String,
    pub auto_update_check: bool,
    pub last_update_check: String,
    /// Update manifest URL; blank disables update checks
    pub update_url: String,
    /// Artifact URL used when a manifest names none
    pub download_url: String,
    pub favorites: Vec<String>,
    pub recents: Vec<String>,
    pub search_history: Vec<String>,
    pub quick_launch: Vec<String>,
    pub per_email_url: BTreeMap<String, String>,
    pub usage: BTreeMap<String, u64>,
    pub custom_urls: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            url_choice: "1".to_string(),
            last_email: String::new(),
            channel: "Stable".to_string(),
            use_per_email_url: true,
            theme: "Dark".to_string(),
            custom_chrome: String::new(),
            auto_update_check: true,
            last_update_check: String::new(),
            update_url: String::new(),
            download_url: String::new(),
            favorites: Vec::new(),
            recents: Vec::new(),
            search_history: Vec::new(),
            quick_launch: Vec::new(),
            per_email_url: BTreeMap::new(),
            usage: BTreeMap::new(),
            custom_urls: BTreeMap::new(),
        }
    }
}

impl Settings {
    /// Load settings from `path`, falling back to defaults when the file does
    /// not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No settings file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        Ok(Self::parse(&content))
    }

    /// Parse settings from file content
    pub fn parse(content: &str) -> Self {
        let mut settings = Self::default();

        for line in content.lines() {
            let line = line.trim();
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            settings.apply_line(key, value);
        }

        settings
    }

    fn apply_line(&mut self, key: &str, value: &str) {
        let trimmed = value.trim();

        match key {
            "URL_CHOICE" => {
                if is_digits(trimmed) {
                    self.url_choice = trimmed.to_string();
                }
            }
            "LAST_EMAIL" => set_non_empty(&mut self.last_email, trimmed),
            "CHANNEL" => set_non_empty(&mut self.channel, trimmed),
            "THEME" => set_non_empty(&mut self.theme, trimmed),
            "LAST_UPDATE_CHECK" => set_non_empty(&mut self.last_update_check, trimmed),
            "CUSTOM_CHROME" => self.custom_chrome = trimmed.to_string(),
            "UPDATE_URL" => self.update_url = trimmed.to_string(),
            "DOWNLOAD_URL" => self.download_url = trimmed.to_string(),
            "USE_PERURL" => {
                if is_digits(trimmed) {
                    self.use_per_email_url = trimmed == "1";
                }
            }
            "AUTO_UPDATE_CHECK" => {
                if is_digits(trimmed) {
                    self.auto_update_check = trimmed == "1";
                }
            }
            "FAVORITES" => self.favorites = email_list(value),
            "RECENTS" => self.recents = email_list(value),
            "QUICK_LAUNCH" => self.quick_launch = email_list(value),
            "SEARCH_HISTORY" => {
                self.search_history = value
                    .split('|')
                    .filter(|entry| !entry.is_empty())
                    .map(str::to_string)
                    .collect();
            }
            _ => self.apply_keyed_line(key, value),
        }
    }

    fn apply_keyed_line(&mut self, key: &str, value: &str) {
        if value.is_empty() {
            return;
        }

        if let Some(email) = key.strip_prefix("PER_URL_").filter(|k| !k.is_empty()) {
            self.per_email_url.insert(email.to_string(), value.to_string());
        } else if let Some(email) = key.strip_prefix("USAGE_").filter(|k| !k.is_empty()) {
            match value.trim().parse::<u64>() {
                Ok(count) => {
                    self.usage.insert(email.to_string(), count);
                }
                Err(_) => tracing::debug!("Skipping malformed usage count for {}", email),
            }
        } else if let Some(name) = key.strip_prefix("CUSTOM_URL_").filter(|k| !k.is_empty()) {
            self.custom_urls.insert(name.to_string(), value.to_string());
        }
    }

    /// Set one key as a settings file line would, rejecting unknown keys and
    /// malformed numbers. An empty value removes a keyed entry.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();

        if SCALAR_KEYS.contains(&key) {
            if NUMERIC_KEYS.contains(&key) && !is_digits(value) {
                return Err(Error::Settings(format!("{} expects a number, got '{}'", key, value)));
            }
            if NON_EMPTY_KEYS.contains(&key) && value.is_empty() {
                return Err(Error::Settings(format!("{} cannot be empty", key)));
            }
            self.apply_line(key, value);
            return Ok(());
        }

        let Some(prefix) = KEYED_PREFIXES
            .iter()
            .find(|prefix| key.len() > prefix.len() && key.starts_with(*prefix))
        else {
            return Err(Error::Settings(format!("Unknown setting: {}", key)));
        };

        if value.is_empty() {
            let entry = &key[prefix.len()..];
            match *prefix {
                "PER_URL_" => {
                    self.per_email_url.remove(entry);
                }
                "USAGE_" => {
                    self.usage.remove(entry);
                }
                _ => {
                    self.custom_urls.remove(entry);
                }
            }
            return Ok(());
        }

        if *prefix == "USAGE_" && value.parse::<u64>().is_err() {
            return Err(Error::Settings(format!("{} expects a number, got '{}'", key, value)));
        }
        self.apply_keyed_line(key, value);
        Ok(())
    }

    /// Render the settings file content
    pub fn render(&self) -> String {
        let history: Vec<&str> = self
            .search_history
            .iter()
            .take(SEARCH_HISTORY_LIMIT)
            .map(String::as_str)
            .collect();

        let mut lines = vec![
            format!("URL_CHOICE={}", self.url_choice),
            format!("LAST_EMAIL={}", self.last_email),
            format!("CHANNEL={}", self.channel),
            format!("USE_PERURL={}", flag(self.use_per_email_url)),
            format!("THEME={}", self.theme),
            format!("CUSTOM_CHROME={}", self.custom_chrome),
            format!("AUTO_UPDATE_CHECK={}", flag(self.auto_update_check)),
            format!("LAST_UPDATE_CHECK={}", self.last_update_check),
            format!("UPDATE_URL={}", self.update_url),
            format!("DOWNLOAD_URL={}", self.download_url),
            format!("FAVORITES={}", self.favorites.join(",")),
            format!("RECENTS={}", self.recents.join(",")),
            format!("SEARCH_HISTORY={}", history.join("|")),
            format!("QUICK_LAUNCH={}", self.quick_launch.join(",")),
        ];

        for (email, choice) in &self.per_email_url {
            lines.push(format!("PER_URL_{}={}", email, choice));
        }
        for (email, count) in &self.usage {
            lines.push(format!("USAGE_{}={}", email, count));
        }
        for (name, url) in &self.custom_urls {
            lines.push(format!("CUSTOM_URL_{}={}", name, url));
        }

        let mut content = lines.join("\n");
        content.push('\n');
        content
    }

    /// Write the settings to `path`, creating parent directories as needed
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.render())?;
        tracing::debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Write a copy of the current settings to `dest`
    pub fn export_to(&self, dest: &Path) -> Result<()> {
        self.save(dest)
    }

    /// Read settings from `src` and make them the settings stored at
    /// `config_path`.
    pub fn import_from(src: &Path, config_path: &Path) -> Result<Self> {
        if !src.is_file() {
            return Err(Error::Settings(format!(
                "Cannot import settings: {} is not a file",
                src.display()
            )));
        }

        let settings = Self::parse(&fs::read_to_string(src)?);
        settings.save(config_path)?;
        Ok(settings)
    }

    /// Bookkeeping after a successful launch for `email`
    pub fn record_launch(&mut self, email: &str) {
        self.last_email = email.to_string();
        self.add_recent(email);
        self.bump_usage(email);
    }

    /// Move `email` to the front of the recents list
    pub fn add_recent(&mut self, email: &str) {
        if email.is_empty() {
            return;
        }
        self.recents.retain(|recent| recent != email);
        self.recents.insert(0, email.to_string());
        self.recents.truncate(RECENTS_LIMIT);
    }

    /// Increment the launch counter for `email` and return the new count
    pub fn bump_usage(&mut self, email: &str) -> u64 {
        let count = self.usage.entry(email.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn usage_count(&self, email: &str) -> u64 {
        self.usage.get(email).copied().unwrap_or(0)
    }

    /// Toggle `email` in favorites; returns `true` when it is now a favorite.
    pub fn toggle_favorite(&mut self, email: &str) -> bool {
        if self.favorites.iter().any(|fav| fav == email) {
            self.favorites.retain(|fav| fav != email);
            false
        } else {
            self.favorites.push(email.to_string());
            true
        }
    }

    pub fn is_favorite(&self, email: &str) -> bool {
        self.favorites.iter().any(|fav| fav == email)
    }

    /// Favorites without duplicates, ordered by number
    pub fn sorted_favorites(&self) -> Vec<String> {
        let mut favorites: Vec<String> = Vec::new();
        for fav in &self.favorites {
            if !favorites.contains(fav) {
                favorites.push(fav.clone());
            }
        }
        sort_by_number(favorites)
    }

    /// Recents that are not favorites, ordered by number
    pub fn sorted_recents(&self) -> Vec<String> {
        let recents = self
            .recents
            .iter()
            .filter(|recent| !self.is_favorite(recent))
            .cloned()
            .collect();
        sort_by_number(recents)
    }

    /// Most-used emails among `known`, highest count first
    pub fn top_used(&self, known: &[String], limit: usize) -> Vec<(String, u64)> {
        let mut used: Vec<(String, u64)> = self
            .usage
            .iter()
            .filter(|(email, _)| known.contains(email))
            .map(|(email, count)| (email.clone(), *count))
            .collect();
        used.sort_by(|a, b| b.1.cmp(&a.1));
        used.truncate(limit);
        used
    }

    /// Remember a search query unless it is empty or already known
    pub fn add_search_history(&mut self, query: &str) {
        if query.is_empty() || self.search_history.iter().any(|q| q == query) {
            return;
        }
        self.search_history.insert(0, query.to_string());
        self.search_history.truncate(SEARCH_HISTORY_LIMIT);
    }

    pub fn clear_search_history(&mut self) {
        self.search_history.clear();
    }

    /// Whether an automatic update check should run
    pub fn update_check_enabled(&self) -> bool {
        self.auto_update_check && !self.update_url.trim().is_empty()
    }

    /// Stamp the time of the latest update check
    pub fn mark_update_checked(&mut self) {
        self.last_update_check = chrono::Local::now()
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string();
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_digit())
}

fn set_non_empty(field: &mut String, value: &str) {
    if !value.is_empty() {
        *field = value.to_string();
    }
}

fn email_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|entry| entry.contains('@'))
        .map(str::to_string)
        .collect()
}

fn flag(value: bool) -> &'static str {
    if value { "1" } else { "0" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = "\
URL_CHOICE=3
LAST_EMAIL=user5@x.com
CHANNEL=Beta
USE_PERURL=0
THEME=Light
CUSTOM_CHROME=/opt/chrome/chrome
AUTO_UPDATE_CHECK=0
FAVORITES=user10@x.com,not-an-email,user2@x.com
RECENTS=user5@x.com,,user2@x.com
SEARCH_HISTORY=12||user@
PER_URL_user5@x.com=4
USAGE_user5@x.com=7
USAGE_user2@x.com=many
CUSTOM_URL_billing=https://pay.example.com/?tab=a=b
GARBAGE LINE
";

    #[test]
    fn test_parse_sample() {
        let settings = Settings::parse(SAMPLE);

        assert_eq!(settings.url_choice, "3");
        assert_eq!(settings.last_email, "user5@x.com");
        assert_eq!(settings.channel, "Beta");
        assert!(!settings.use_per_email_url);
        assert_eq!(settings.theme, "Light");
        assert_eq!(settings.custom_chrome, "/opt/chrome/chrome");
        assert!(!settings.auto_update_check);
        assert_eq!(settings.favorites, vec!["user10@x.com", "user2@x.com"]);
        assert_eq!(settings.recents, vec!["user5@x.com", "user2@x.com"]);
        assert_eq!(settings.search_history, vec!["12", "user@"]);
        assert_eq!(settings.per_email_url["user5@x.com"], "4");
        assert_eq!(settings.usage_count("user5@x.com"), 7);
        assert_eq!(settings.usage_count("user2@x.com"), 0);
        assert_eq!(
            settings.custom_urls["billing"],
            "https://pay.example.com/?tab=a=b"
        );
    }

    #[test]
    fn test_blank_scalars_keep_defaults() {
        let settings = Settings::parse("CHANNEL=\nURL_CHOICE=x\nTHEME=  \n");
        assert_eq!(settings.channel, "Stable");
        assert_eq!(settings.url_choice, "1");
        assert_eq!(settings.theme, "Dark");
    }

    #[test]
    fn test_render_then_parse_preserves_settings() {
        let settings = Settings::parse(SAMPLE);
        let reparsed = Settings::parse(&settings.render());
        assert_eq!(settings, reparsed);
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Settings::load(&temp_dir.path().join("missing.cfg")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("proflaunch.cfg");

        let mut settings = Settings::default();
        settings.record_launch("user1@x.com");
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded.last_email, "user1@x.com");
        assert_eq!(loaded.usage_count("user1@x.com"), 1);
    }

    #[test]
    fn test_import_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = Settings::import_from(
            &temp_dir.path().join("nope.cfg"),
            &temp_dir.path().join("proflaunch.cfg"),
        );
        assert!(matches!(result, Err(Error::Settings(_))));
    }

    #[test]
    fn test_import_replaces_stored_settings() {
        let temp_dir = TempDir::new().unwrap();
        let src = temp_dir.path().join("backup.cfg");
        let config = temp_dir.path().join("proflaunch.cfg");
        std::fs::write(&src, SAMPLE).unwrap();

        let imported = Settings::import_from(&src, &config).unwrap();
        assert_eq!(imported.channel, "Beta");
        assert_eq!(Settings::load(&config).unwrap(), imported);
    }

    #[test]
    fn test_recents_capped_and_deduplicated() {
        let mut settings = Settings::default();
        for i in 0..12 {
            settings.add_recent(&format!("user{}@x.com", i));
        }
        settings.add_recent("user5@x.com");

        assert_eq!(settings.recents.len(), RECENTS_LIMIT);
        assert_eq!(settings.recents[0], "user5@x.com");
        assert_eq!(
            settings.recents.iter().filter(|r| *r == "user5@x.com").count(),
            1
        );
    }

    #[test]
    fn test_search_history_capped_without_duplicates() {
        let mut settings = Settings::default();
        for i in 0..25 {
            settings.add_search_history(&i.to_string());
        }
        settings.add_search_history("24");
        settings.add_search_history("");

        assert_eq!(settings.search_history.len(), SEARCH_HISTORY_LIMIT);
        assert_eq!(settings.search_history[0], "24");
    }

    #[test]
    fn test_toggle_favorite() {
        let mut settings = Settings::default();
        assert!(settings.toggle_favorite("a1@x.com"));
        assert!(settings.is_favorite("a1@x.com"));
        assert!(!settings.toggle_favorite("a1@x.com"));
        assert!(settings.favorites.is_empty());
    }

    #[test]
    fn test_sorted_recents_skip_favorites() {
        let mut settings = Settings::default();
        settings.favorites = vec!["user3@x.com".to_string()];
        settings.recents = vec![
            "user9@x.com".to_string(),
            "user3@x.com".to_string(),
            "user1@x.com".to_string(),
        ];
        assert_eq!(settings.sorted_recents(), vec!["user1@x.com", "user9@x.com"]);
    }

    #[test]
    fn test_top_used_only_known_profiles() {
        let mut settings = Settings::default();
        settings.usage.insert("a1@x.com".to_string(), 3);
        settings.usage.insert("b2@x.com".to_string(), 9);
        settings.usage.insert("gone@x.com".to_string(), 50);

        let known = vec!["a1@x.com".to_string(), "b2@x.com".to_string()];
        let top = settings.top_used(&known, QUICK_LAUNCH_LIMIT);
        assert_eq!(
            top,
            vec![("b2@x.com".to_string(), 9), ("a1@x.com".to_string(), 3)]
        );
    }

    #[test]
    fn test_set_known_keys() {
        let mut settings = Settings::default();
        settings.set("CHANNEL", "Canary").unwrap();
        settings.set("URL_CHOICE", " 4 ").unwrap();
        settings.set("CUSTOM_URL_billing", "https://pay.example.com").unwrap();
        settings.set("USAGE_user1@x.com", "3").unwrap();

        assert_eq!(settings.channel, "Canary");
        assert_eq!(settings.url_choice, "4");
        assert_eq!(settings.custom_urls["billing"], "https://pay.example.com");
        assert_eq!(settings.usage_count("user1@x.com"), 3);

        settings.set("CUSTOM_URL_billing", "").unwrap();
        assert!(settings.custom_urls.is_empty());
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut settings = Settings::default();
        assert!(settings.set("NOPE", "1").is_err());
        assert!(settings.set("PER_URL_", "1").is_err());
        assert!(settings.set("USE_PERURL", "yes").is_err());
        assert!(settings.set("USAGE_user1@x.com", "many").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_set_rejects_empty_required_value() {
        let mut settings = Settings::default();
        settings.set("LAST_EMAIL", "user1@x.com").unwrap();

        for key in ["LAST_EMAIL", "CHANNEL", "THEME", "LAST_UPDATE_CHECK"] {
            let err = settings.set(key, "  ").unwrap_err();
            assert!(err.to_string().contains("cannot be empty"), "{}", err);
        }
        assert_eq!(settings.last_email, "user1@x.com");
    }

    #[test]
    fn test_usage_count_saturates() {
        let mut settings = Settings::parse("USAGE_user1@x.com=18446744073709551615\n");
        settings.record_launch("user1@x.com");
        assert_eq!(settings.usage_count("user1@x.com"), u64::MAX);
    }

    #[test]
    fn test_update_check_requires_url() {
        let mut settings = Settings::default();
        assert!(!settings.update_check_enabled());
        settings.update_url = "https://example.com/version.json".to_string();
        assert!(settings.update_check_enabled());
        settings.auto_update_check = false;
        assert!(!settings.update_check_enabled());
    }
}
