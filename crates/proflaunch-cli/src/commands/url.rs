use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::{Result, bail};
use console::style;
use proflaunch_core::UrlCatalog;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Serialize)]
struct PresetEntry {
    key: &'static str,
    label: &'static str,
    url: &'static str,
    default: bool,
}

#[derive(Debug, Serialize)]
struct Catalog<'a> {
    presets: Vec<PresetEntry>,
    custom: &'a BTreeMap<String, String>,
    per_email_enabled: bool,
    per_email: &'a BTreeMap<String, String>,
}

pub fn list(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let settings = &ctx.settings;
    let catalog = Catalog {
        presets: UrlCatalog::presets()
            .into_iter()
            .map(|preset| PresetEntry {
                default: preset.key == settings.url_choice,
                key: preset.key,
                label: preset.label,
                url: preset.url,
            })
            .collect(),
        custom: &settings.custom_urls,
        per_email_enabled: settings.use_per_email_url,
        per_email: &settings.per_email_url,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&catalog)?),
        OutputFormat::Table => {
            println!("Kind,Key,Target");
            for preset in &catalog.presets {
                println!("preset,{},{}", preset.key, preset.url);
            }
            for (name, url) in catalog.custom {
                println!("custom,{},{}", name, url);
            }
            for (email, choice) in catalog.per_email {
                println!("per-email,{},{}", email, choice);
            }
        }
        OutputFormat::Pretty => output_pretty(&catalog),
    }

    Ok(())
}

fn output_pretty(catalog: &Catalog<'_>) {
    println!("\n{}", style("Preset URLs").bold().cyan());
    for preset in &catalog.presets {
        let marker = if preset.default { "*" } else { " " };
        println!(
            "{} {}. {:<16} {}",
            style(marker).green(),
            preset.key,
            preset.label,
            style(preset.url).dim()
        );
    }

    if !catalog.custom.is_empty() {
        println!("\n{}", style("Custom URLs").bold().cyan());
        for (name, url) in catalog.custom {
            println!("  {:<18} {}", name, style(url).dim());
        }
    }

    let state = if catalog.per_email_enabled { "on" } else { "off" };
    println!("\n{} ({})", style("Per-email choices").bold().cyan(), state);
    if catalog.per_email.is_empty() {
        println!("  {}", style("None assigned.").dim());
    }
    for (email, choice) in catalog.per_email {
        println!("  {:<32} {}", email, choice);
    }
    println!();
}

fn require_preset(choice: &str) -> Result<()> {
    if UrlCatalog::preset(choice).is_none() {
        bail!("Unknown URL preset '{}'. Expected 1-7", choice);
    }
    Ok(())
}

pub fn add(ctx: &mut AppContext, name: &str, url: &str) -> Result<()> {
    let (name, url) = (name.trim(), url.trim());
    if name.is_empty() || url.is_empty() {
        bail!("Both name and URL are required");
    }
    if name.contains('=') || name.chars().any(char::is_whitespace) {
        bail!("URL name '{}' may not contain '=' or whitespace", name);
    }
    if UrlCatalog::preset(name).is_some() {
        bail!("'{}' is a preset number; choose another name", name);
    }

    ctx.settings
        .custom_urls
        .insert(name.to_string(), url.to_string());
    ctx.save();
    println!("Saved custom URL '{}' -> {}", name, url);
    Ok(())
}

pub fn remove(ctx: &mut AppContext, name: &str) -> Result<()> {
    if ctx.settings.custom_urls.remove(name).is_none() {
        bail!("Custom URL '{}' not found", name);
    }
    ctx.save();
    println!("Removed custom URL '{}'", name);
    Ok(())
}

pub fn set_default(ctx: &mut AppContext, choice: &str) -> Result<()> {
    require_preset(choice)?;
    ctx.settings.url_choice = choice.to_string();
    ctx.save();
    println!("Default URL set to preset {}", choice);
    Ok(())
}

pub fn assign(ctx: &mut AppContext, email: &str, choice: &str) -> Result<()> {
    require_preset(choice)?;
    ctx.settings
        .per_email_url
        .insert(email.to_string(), choice.to_string());
    ctx.save();
    println!("{} now opens preset {}", email, choice);
    if !ctx.settings.use_per_email_url {
        println!("Per-email URLs are off; enable them with `proflaunch url per-email on`.");
    }
    Ok(())
}

pub fn unassign(ctx: &mut AppContext, email: &str) -> Result<()> {
    if ctx.settings.per_email_url.remove(email).is_none() {
        bail!("No URL assigned to {}", email);
    }
    ctx.save();
    println!("{} now opens the default URL", email);
    Ok(())
}

pub fn per_email(ctx: &mut AppContext, enabled: bool) -> Result<()> {
    ctx.settings.use_per_email_url = enabled;
    ctx.save();
    println!(
        "Per-email URLs {}",
        if enabled { "enabled" } else { "disabled" }
    );
    Ok(())
}
