use comfy_table::{ContentArrangement, Table};

use super::Context;

pub fn run(ctx: &Context) -> Result<(), String> {
    let spreads = ctx.repository()?.list().map_err(|e| e.to_string())?;

    if spreads.is_empty() {
        println!("  No saved spreads.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Id", "Spread", "Saved", "Cards", "Journal"]);

    for spread in &spreads {
        let cards = spread
            .cards
            .iter()
            .map(|d| d.card.title.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let journal = match &spread.journal_entry {
            Some(text) if text.chars().count() > 40 => {
                format!("{}...", text.chars().take(37).collect::<String>())
            }
            Some(text) => text.clone(),
            None => "-".to_string(),
        };

        table.add_row(vec![
            spread.id.short(),
            spread.spread_type.label().to_string(),
            spread.saved_at.format("%Y-%m-%d %H:%M").to_string(),
            cards,
            journal,
        ]);
    }

    println!("{table}");
    println!();
    println!("  {} spreads", spreads.len());

    Ok(())
}
