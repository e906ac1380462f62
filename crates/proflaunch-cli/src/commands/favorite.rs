use crate::context::AppContext;
use anyhow::{Result, bail};
use console::style;

/// Add `email` to favorites, or remove it when it already is one
pub fn execute(ctx: &mut AppContext, email: &str) -> Result<()> {
    let email = email.trim();
    if !email.contains('@') {
        bail!("'{}' is not an email address", email);
    }

    if ctx.settings.toggle_favorite(email) {
        println!("{} Added {} to favorites", style("★").yellow(), email);
    } else {
        println!("Removed {} from favorites", email);
    }
    ctx.save();

    Ok(())
}
