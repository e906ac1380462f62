//! Target URL presets and resolution.

use crate::settings::Settings;
use std::collections::BTreeMap;

/// Preset key used when no other choice resolves.
pub const FALLBACK_CHOICE: &str = "1";

const PRESETS: [(&str, &str, &str); 7] = [
    ("1", "YouTube Premium", "https://www.youtube.com/paid_memberships?ybp=mAEK"),
    ("2", "YouTube Family", "https://myaccount.google.com/family/details"),
    ("3", "Netflix", "https://www.netflix.com/account"),
    ("4", "Gmail", "https://mail.google.com/mail/u/0/?tab=rm&ogbl#inbox"),
    ("5", "Disney+", "https://www.apps.disneyplus.com/th/home"),
    ("6", "Prime Video", "primevideo.com/-/th/signup"),
    ("7", "HBO Max", "https://auth.hbomax.com/login"),
];

/// A built-in target URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preset {
    pub key: &'static str,
    pub label: &'static str,
    pub url: &'static str,
}

/// Built-in presets plus the user's named custom URLs.
#[derive(Debug, Clone, Default)]
pub struct UrlCatalog {
    custom: BTreeMap<String, String>,
}

impl UrlCatalog {
    pub fn new(custom: BTreeMap<String, String>) -> Self {
        Self { custom }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.custom_urls.clone())
    }

    pub fn presets() -> Vec<Preset> {
        PRESETS
            .iter()
            .map(|&(key, label, url)| Preset { key, label, url })
            .collect()
    }

    pub fn preset(key: &str) -> Option<&'static str> {
        PRESETS
            .iter()
            .find(|(preset_key, _, _)| *preset_key == key)
            .map(|(_, _, url)| *url)
    }

    pub fn custom(&self) -> &BTreeMap<String, String> {
        &self.custom
    }

    /// Resolve a user-supplied URL token: a preset key, then a custom URL
    /// name, otherwise the token itself.
    pub fn resolve(&self, token: &str) -> String {
        if let Some(url) = Self::preset(token) {
            return url.to_string();
        }
        if let Some(url) = self.custom.get(token) {
            return url.clone();
        }
        token.to_string()
    }

    /// Target URL for `email` when none was supplied: the per-email choice
    /// (when enabled), then the global choice, then the fallback preset.
    pub fn default_target(email: &str, settings: &Settings) -> String {
        let per_email = settings
            .per_email_url
            .get(email)
            .filter(|_| settings.use_per_email_url);
        let choice = per_email.unwrap_or(&settings.url_choice);

        Self::preset(choice)
            .or_else(|| Self::preset(FALLBACK_CHOICE))
            .unwrap_or_default()
            .to_string()
    }
}
