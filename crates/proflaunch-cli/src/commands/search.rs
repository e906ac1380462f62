use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::Result;
use proflaunch_core::{SearchMode, SearchOutcome};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    query: &'a str,
    mode: &'static str,
    matches: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<&'a str>,
}

fn mode_name(mode: SearchMode) -> &'static str {
    match mode {
        SearchMode::Regex => "regex",
        SearchMode::EmailSubstring => "email",
        SearchMode::Numeric => "numeric",
    }
}

/// Match `query` against the profile emails and remember the query.
///
/// A bad regex is an error; finding nothing is not.
pub fn execute(
    ctx: &mut AppContext,
    query: &str,
    regex: bool,
    format: OutputFormat,
) -> Result<()> {
    let emails = ctx.require_local_state()?.emails();

    ctx.settings.add_search_history(query.trim());
    ctx.save();

    let outcome = proflaunch_core::search(query, &emails, regex)?;

    let status = match &outcome {
        SearchOutcome::Matches(_) => None,
        SearchOutcome::NoMatch(message) => Some(message.as_str()),
    };
    let report = SearchReport {
        query: query.trim(),
        mode: mode_name(SearchMode::select(query.trim(), regex)),
        matches: outcome.matches(),
        status,
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Table => {
            println!("Email,Launches");
            for email in report.matches {
                println!("{},{}", email, ctx.settings.usage_count(email));
            }
        }
        OutputFormat::Pretty => output_pretty(ctx, &report),
    }

    Ok(())
}

fn output_pretty(ctx: &AppContext, report: &SearchReport<'_>) {
    use console::style;

    if let Some(status) = report.status {
        println!("{}", style(status).yellow());
        return;
    }

    println!(
        "{} {} ({} mode)",
        style(report.matches.len()).bold(),
        if report.matches.len() == 1 { "match" } else { "matches" },
        report.mode
    );
    for email in report.matches {
        let marker = if ctx.settings.is_favorite(email) { "★ " } else { "  " };
        println!("{}{}", style(marker).yellow(), email);
    }
}
