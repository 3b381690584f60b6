use oracle_spread::export::{export_markdown, export_text};

use super::{Context, resolve};

pub fn run(ctx: &Context, id: &str, format: &str) -> Result<(), String> {
    let spread = resolve(&ctx.repository()?, id)?;

    let rendered = match format.to_lowercase().as_str() {
        "text" | "txt" => export_text(&spread),
        "md" | "markdown" => export_markdown(&spread),
        other => return Err(format!("unknown format '{other}' (expected: text, md)")),
    };
    print!("{rendered}");
    Ok(())
}
