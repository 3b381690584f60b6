//! Markdown and plain-text rendering of saved spreads.

use crate::repository::SavedSpread;

/// Render a saved spread as markdown.
pub fn export_markdown(spread: &SavedSpread) -> String {
    let mut out = format!("# {} Spread\n\n", spread.spread_type);
    out.push_str(&format!(
        "*Saved {}* · `{}`\n\n",
        spread.saved_at.format("%Y-%m-%d %H:%M UTC"),
        spread.id.short()
    ));

    for drawn in &spread.cards {
        out.push_str(&format!("## {}: {}\n\n", drawn.position, drawn.card.title));
        if !drawn.card.description.is_empty() {
            out.push_str(&format!("{}\n\n", drawn.card.description));
        }
        for prompt in &drawn.card.prompts {
            out.push_str(&format!("- {prompt}\n"));
        }
        if !drawn.card.prompts.is_empty() {
            out.push('\n');
        }
        if !drawn.card.action.is_empty() {
            out.push_str(&format!("**Action**: {}\n\n", drawn.card.action));
        }
    }

    out.push_str("## Interpretation\n\n");
    out.push_str(&format!("{}\n\n", spread.interpretation));

    if let Some(journal) = &spread.journal_entry {
        out.push_str("## Journal\n\n");
        for line in journal.lines() {
            out.push_str(&format!("> {line}\n"));
        }
        out.push('\n');
    }
    out
}

/// Render a saved spread as plain text.
pub fn export_text(spread: &SavedSpread) -> String {
    let title = format!("{} Spread", spread.spread_type);
    let mut out = format!("{title}\n{}\n", "=".repeat(title.chars().count()));
    out.push_str(&format!(
        "Saved {} ({})\n\n",
        spread.saved_at.format("%Y-%m-%d %H:%M UTC"),
        spread.id.short()
    ));

    for drawn in &spread.cards {
        out.push_str(&format!("[{}] {}\n", drawn.position, drawn.card.title));
        if !drawn.card.action.is_empty() {
            out.push_str(&format!("  Action: {}\n", drawn.card.action));
        }
    }
    out.push('\n');

    out.push_str(&format!("Interpretation:\n{}\n", spread.interpretation));
    if let Some(journal) = &spread.journal_entry {
        out.push_str(&format!("\nJournal:\n{journal}\n"));
    }
    out
}
