use colored::Colorize;

use super::{Context, resolve};

pub fn run(ctx: &Context, id: &str, text: &str) -> Result<(), String> {
    let repo = ctx.repository()?;
    let spread = resolve(&repo, id)?;

    repo.update_journal(spread.id, text).map_err(|e| e.to_string())?;

    let verb = if text.trim().is_empty() {
        "Cleared"
    } else {
        "Updated"
    };
    println!("  {} journal for {}", verb.green(), spread.id.short());
    Ok(())
}
