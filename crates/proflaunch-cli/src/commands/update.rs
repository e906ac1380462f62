use crate::context::AppContext;
use anyhow::{Context, Result, bail};
use console::style;
use proflaunch_core::Settings;
use proflaunch_update::{
    UpdateApplier, UpdateChecker, UpdateCycle, UpdateManifest, UpdatePhase, backup_path,
    integrity_warning,
};
use std::io::{self, Write};

pub const CURRENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Checker configured from settings. Warns about unverified updates.
pub fn checker(settings: &Settings) -> UpdateChecker {
    if let Some(warning) = integrity_warning(&settings.update_url) {
        tracing::warn!("{}", warning);
    }
    UpdateChecker::new(CURRENT_VERSION, settings.update_url.clone())
        .with_download_url(settings.download_url.clone())
}

/// Background check for the overview. Never fails; returns the offer if any.
pub fn auto_check(ctx: &mut AppContext) -> Option<UpdateManifest> {
    if !ctx.settings.update_check_enabled() {
        return None;
    }

    let manifest = checker(&ctx.settings).check();
    ctx.settings.mark_update_checked();
    ctx.save();
    manifest
}

fn run_check(ctx: &mut AppContext, cycle: &mut UpdateCycle) -> Result<Option<UpdateManifest>> {
    if ctx.settings.update_url.trim().is_empty() {
        bail!(
            "Update checking is disabled. Set a manifest URL with `proflaunch config set UPDATE_URL <URL>`"
        );
    }

    println!("Checking for updates...");
    let offer = cycle.check(&checker(&ctx.settings))?.cloned();
    ctx.settings.mark_update_checked();
    ctx.save();
    Ok(offer)
}

pub fn check(ctx: &mut AppContext) -> Result<()> {
    let mut cycle = UpdateCycle::new();
    match run_check(ctx, &mut cycle)? {
        Some(manifest) => {
            print_offer(&manifest);
            println!("Run `proflaunch update install` to install it.");
        }
        None => println!("You are running the latest version (v{})", CURRENT_VERSION),
    }
    Ok(())
}

pub fn install(ctx: &mut AppContext, yes: bool) -> Result<()> {
    let mut cycle = UpdateCycle::new();
    let Some(manifest) = run_check(ctx, &mut cycle)? else {
        println!("You are running the latest version (v{})", CURRENT_VERSION);
        return Ok(());
    };

    print_offer(&manifest);
    if !yes && !confirm(&format!("Install version {}?", manifest.version))? {
        cycle.decline()?;
        println!("Update postponed.");
        return Ok(());
    }

    let target = std::env::current_exe().context("Cannot locate the running executable")?;
    println!("Downloading update...");

    match cycle.install(&UpdateApplier::new(), &target)? {
        UpdatePhase::Restarted => {
            println!(
                "{} Updated to v{}. Please restart proflaunch.",
                style("✓").green(),
                manifest.version
            );
            Ok(())
        }
        _ => {
            if cycle.outcome().is_some_and(|outcome| outcome.is_double_failure()) {
                eprintln!(
                    "The previous executable is kept at {}",
                    backup_path(&target).display()
                );
            }
            bail!(
                "{}",
                cycle.failure().unwrap_or("Failed to install update")
            )
        }
    }
}

fn print_offer(manifest: &UpdateManifest) {
    println!(
        "\n{} v{} (running v{})",
        style("Update available:").bold().cyan(),
        manifest.version,
        CURRENT_VERSION
    );
    if manifest.required {
        println!("{}", style("This update is required.").red().bold());
    }
    if !manifest.changelog.is_empty() {
        println!("\n{}", style("What's new:").bold());
        for entry in &manifest.changelog {
            println!("  • {}", entry);
        }
    }
    println!();
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N]: ", question);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
