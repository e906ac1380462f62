use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::{Result, anyhow};
use proflaunch_browser::ProfileInfo;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct InfoReport {
    #[serde(flatten)]
    info: ProfileInfo,
    favorite: bool,
    launches: u64,
    per_email_url: Option<String>,
}

/// Show what Local State knows about the profile for `email`
pub fn execute(ctx: &AppContext, email: &str, format: OutputFormat) -> Result<()> {
    let state = ctx.require_local_state()?;
    let info = state
        .profile_info(email)
        .ok_or_else(|| anyhow!("Profile '{}' not found in Local State", email))?;

    let report = InfoReport {
        info,
        favorite: ctx.settings.is_favorite(email),
        launches: ctx.settings.usage_count(email),
        per_email_url: ctx.settings.per_email_url.get(email).cloned(),
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("Field,Value");
            println!("Email,{}", report.info.email);
            println!("Name,{}", report.info.name);
            println!("Profile,{}", report.info.profile_dir);
            println!("User Name,{}", report.info.user_name);
            println!("Given Name,{}", report.info.gaia_name);
            println!("Favorite,{}", report.favorite);
            println!("Launches,{}", report.launches);
        }
        OutputFormat::Pretty => output_pretty(&report),
    }

    Ok(())
}

fn output_pretty(report: &InfoReport) {
    use console::style;

    let or_dash = |value: &str| {
        if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    };

    println!("\n{}", style("Profile Information").bold().cyan());
    println!("{}", style("===================").cyan());
    println!("  Email:       {}", report.info.email);
    println!("  Name:        {}", or_dash(&report.info.name));
    println!("  Profile:     {}", report.info.profile_dir);
    println!("  User Name:   {}", or_dash(&report.info.user_name));
    println!("  Given Name:  {}", or_dash(&report.info.gaia_name));
    println!("  Favorite:    {}", if report.favorite { "yes" } else { "no" });
    println!("  Launches:    {}", report.launches);
    if let Some(choice) = &report.per_email_url {
        println!("  URL choice:  {}", choice);
    }
    println!();
}
