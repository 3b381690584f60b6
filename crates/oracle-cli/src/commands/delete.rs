use colored::Colorize;

use super::{Context, resolve};

pub fn run(ctx: &Context, id: &str) -> Result<(), String> {
    let repo = ctx.repository()?;
    let spread = resolve(&repo, id)?;

    repo.delete(spread.id).map_err(|e| e.to_string())?;
    println!(
        "  {} {} spread {}",
        "Deleted".red(),
        spread.spread_type.label(),
        spread.id.short()
    );
    Ok(())
}
