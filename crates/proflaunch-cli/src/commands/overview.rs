use super::update;
use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::Result;
use console::style;
use proflaunch_core::settings::QUICK_LAUNCH_LIMIT;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Entry {
    email: String,
    launches: u64,
}

#[derive(Debug, Serialize)]
struct Overview {
    last_email: Option<String>,
    favorites: Vec<Entry>,
    recents: Vec<Entry>,
    quick_launch: Vec<Entry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    update_available: Option<String>,
}

/// Favorites, recents and quick launch. Runs the automatic update check when
/// it is enabled.
pub fn execute(ctx: &mut AppContext, format: OutputFormat) -> Result<()> {
    let settings = &ctx.settings;
    let entry = |email: String| Entry {
        launches: settings.usage_count(&email),
        email,
    };

    let known = ctx.emails();
    let mut overview = Overview {
        last_email: Some(settings.last_email.clone()).filter(|e| !e.is_empty()),
        favorites: settings.sorted_favorites().into_iter().map(entry).collect(),
        recents: settings.sorted_recents().into_iter().map(entry).collect(),
        quick_launch: settings
            .top_used(&known, QUICK_LAUNCH_LIMIT)
            .into_iter()
            .map(|(email, launches)| Entry { email, launches })
            .collect(),
        update_available: None,
    };

    let offer = update::auto_check(ctx);
    overview.update_available = offer.map(|manifest| manifest.version);

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&overview)?),
        OutputFormat::Table => output_table(&overview),
        OutputFormat::Pretty => output_pretty(&overview),
    }

    Ok(())
}

fn print_entries(entries: &[Entry], empty: &str) {
    if entries.is_empty() {
        println!("  {}", style(empty).dim());
    }
    for entry in entries {
        println!("  {} (x{})", entry.email, entry.launches);
    }
}

fn output_pretty(overview: &Overview) {
    println!("\n{}", style("Favorites").bold().yellow());
    print_entries(&overview.favorites, "No favorites yet.");

    println!("\n{}", style("Recent").bold());
    print_entries(&overview.recents, "Nothing opened recently.");

    println!("\n{}", style("Quick Launch").bold().cyan());
    print_entries(
        &overview.quick_launch,
        "No profiles used yet. Start using profiles to see them here.",
    );

    if let Some(last) = &overview.last_email {
        println!("\nLast opened: {}", last);
    }

    if let Some(version) = &overview.update_available {
        println!(
            "\n{} v{} is available. Run `proflaunch update install`.",
            style("Update:").bold().green(),
            version
        );
    }
    println!();
}

fn output_table(overview: &Overview) {
    println!("Section,Email,Launches");
    let sections = [
        ("favorite", &overview.favorites),
        ("recent", &overview.recents),
        ("quick-launch", &overview.quick_launch),
    ];
    for (section, entries) in sections {
        for entry in entries.iter() {
            println!("{},{},{}", section, entry.email, entry.launches);
        }
    }
}
