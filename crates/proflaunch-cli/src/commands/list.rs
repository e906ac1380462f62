use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::Result;
use serde::Serialize;

/// A profile as shown by `list`
#[derive(Debug, Clone, Serialize)]
pub struct ListedProfile {
    pub email: String,
    pub directory_name: String,
    pub display_name: String,
    pub favorite: bool,
    pub launches: u64,
}

/// Profiles from Local State with favorite and usage annotations
pub fn collect(ctx: &AppContext) -> Result<Vec<ListedProfile>> {
    let state = ctx.require_local_state()?;

    Ok(state
        .records()
        .into_iter()
        .map(|record| ListedProfile {
            favorite: ctx.settings.is_favorite(&record.email),
            launches: ctx.settings.usage_count(&record.email),
            email: record.email,
            directory_name: record.directory_name,
            display_name: record.display_name,
        })
        .collect())
}

pub fn execute(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let profiles = collect(ctx)?;
    tracing::debug!("Found {} profiles", profiles.len());

    match format {
        OutputFormat::Json => output_json(&profiles)?,
        OutputFormat::Table => output_table(&profiles),
        OutputFormat::Pretty => output_pretty(&profiles),
    }

    Ok(())
}

fn output_pretty(profiles: &[ListedProfile]) {
    use console::style;

    if profiles.is_empty() {
        println!("No profiles with an email found in Local State.");
        return;
    }

    println!("\n{}", style("Chrome Profiles").bold().cyan());
    println!("{}", style("===============").cyan());
    println!();

    for profile in profiles {
        let marker = if profile.favorite { "★ " } else { "  " };
        let launches = if profile.launches > 0 {
            format!(" (x{})", profile.launches)
        } else {
            String::new()
        };
        println!(
            "{}{:<32} {:<14} {}{}",
            style(marker).yellow(),
            profile.email,
            profile.directory_name,
            style(&profile.display_name).dim(),
            launches
        );
    }

    println!();
    println!("{} profiles", profiles.len());
}

fn output_json(profiles: &[ListedProfile]) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(profiles)?);
    Ok(())
}

fn output_table(profiles: &[ListedProfile]) {
    println!("Email,Profile,Name,Favorite,Launches");
    for profile in profiles {
        println!(
            "{},{},{},{},{}",
            profile.email,
            profile.directory_name,
            profile.display_name,
            profile.favorite,
            profile.launches
        );
    }
}
