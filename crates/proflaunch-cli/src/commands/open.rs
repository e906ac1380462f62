//! Launching Chrome for a profile email.
//!
//! Both `proflaunch open` and the top-level `--email` shortcut end up in
//! [`launch`], which resolves the profile, executable and target URLs, spawns
//! one process per URL and records the launch in the settings.

use crate::context::AppContext;
use anyhow::{Result, bail};
use proflaunch_browser::{
    Channel, ChromeFinder, ChromeLauncher, Error as BrowserError, LaunchRequest, Launched,
    ProcessSpawner, SystemSpawner,
};
use proflaunch_core::UrlCatalog;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct OpenOptions {
    /// Preset numbers, custom URL names or literal URLs
    pub urls: Vec<String>,
    pub incognito: bool,
    /// Overrides the configured channel for this launch
    pub channel: Option<Channel>,
}

pub fn execute(
    ctx: &mut AppContext,
    email: Option<&str>,
    last: bool,
    options: &OpenOptions,
) -> Result<()> {
    let email = if last {
        if ctx.settings.last_email.is_empty() {
            bail!("No last email recorded yet.");
        }
        ctx.settings.last_email.clone()
    } else {
        match email.map(str::trim).filter(|e| !e.is_empty()) {
            Some(email) => email.to_string(),
            None => bail!("Select an email first."),
        }
    };

    let launched = launch(ctx, &email, options, SystemSpawner)?;

    let mode = if options.incognito { " (Incognito)" } else { "" };
    println!(
        "Opened {} tab(s) for {}{}.",
        launched.invocations, launched.email, mode
    );
    Ok(())
}

/// Launch `email` through `spawner` and record the launch
pub fn launch<S: ProcessSpawner>(
    ctx: &mut AppContext,
    email: &str,
    options: &OpenOptions,
    spawner: S,
) -> Result<Launched> {
    let state = ctx.require_local_state()?;
    if !state.emails().iter().any(|known| known == email) {
        bail!("Profile '{}' not found", email);
    }

    let channel = options
        .channel
        .unwrap_or_else(|| preferred_channel(&ctx.settings.channel));
    let custom = Some(ctx.settings.custom_chrome.trim())
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    let executable = ChromeFinder::new(custom, channel).find()?;

    let profile_directory = state
        .profile_directory_for(email)
        .ok_or_else(|| BrowserError::ProfileNotFound(email.to_string()))?
        .to_string();

    let target_urls = if options.urls.is_empty() {
        vec![UrlCatalog::default_target(email, &ctx.settings)]
    } else {
        let catalog = UrlCatalog::from_settings(&ctx.settings);
        options.urls.iter().map(|token| catalog.resolve(token)).collect()
    };

    let request = LaunchRequest {
        email: email.to_string(),
        profile_directory,
        channel,
        incognito: options.incognito,
        target_urls,
    };
    let launched = ChromeLauncher::with_spawner(executable, spawner).launch(&request)?;

    ctx.settings.record_launch(email);
    ctx.save();

    Ok(launched)
}

fn preferred_channel(name: &str) -> Channel {
    name.parse().unwrap_or_else(|e| {
        tracing::warn!("{}; using Stable", e);
        Channel::Stable
    })
}
