use crate::context::{AppContext, log_path_for};
use anyhow::{Context, Result};
use proflaunch_core::Settings;
use proflaunch_update::integrity_warning;
use std::path::Path;

pub fn show(ctx: &AppContext) -> Result<()> {
    print!("{}", ctx.settings.render());
    Ok(())
}

pub fn path(ctx: &AppContext) -> Result<()> {
    println!("Settings:    {}", ctx.config_path.display());
    println!("Log:         {}", log_path_for(&ctx.config_path).display());
    match &ctx.local_state_path {
        Some(path) => println!("Local State: {}", path.display()),
        None => println!("Local State: (unknown)"),
    }
    Ok(())
}

/// Set one key. Unlike implicit saves, a failed write is reported.
pub fn set(ctx: &mut AppContext, key: &str, value: &str) -> Result<()> {
    ctx.settings.set(key, value)?;
    ctx.settings
        .save(&ctx.config_path)
        .with_context(|| format!("Failed to save settings to {}", ctx.config_path.display()))?;

    println!("{}={}", key, value.trim());
    if key == "UPDATE_URL" {
        if let Some(warning) = integrity_warning(value) {
            println!("Warning: {}", warning);
        }
    }
    Ok(())
}

pub fn export(ctx: &AppContext, dest: &Path) -> Result<()> {
    ctx.settings
        .export_to(dest)
        .with_context(|| format!("Failed to export settings to {}", dest.display()))?;
    println!("Exported settings to {}", dest.display());
    Ok(())
}

pub fn import(ctx: &mut AppContext, src: &Path) -> Result<()> {
    ctx.settings = Settings::import_from(src, &ctx.config_path)
        .with_context(|| format!("Failed to import settings from {}", src.display()))?;
    println!("Imported settings from {}", src.display());
    Ok(())
}
