use crate::OutputFormat;
use crate::context::AppContext;
use anyhow::Result;

pub fn list(ctx: &AppContext, format: OutputFormat) -> Result<()> {
    let history = &ctx.settings.search_history;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(history)?),
        OutputFormat::Table => {
            println!("Position,Query");
            for (i, query) in history.iter().enumerate() {
                println!("{},{}", i + 1, query);
            }
        }
        OutputFormat::Pretty => {
            if history.is_empty() {
                println!("No search history.");
            }
            for (i, query) in history.iter().enumerate() {
                println!("{:>3}. {}", i + 1, query);
            }
        }
    }

    Ok(())
}

pub fn clear(ctx: &mut AppContext) -> Result<()> {
    ctx.settings.clear_search_history();
    ctx.save();
    println!("Search history cleared.");
    Ok(())
}
