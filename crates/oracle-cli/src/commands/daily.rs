use std::io;

use colored::Colorize;

use oracle_core::{Position, SpreadType};
use oracle_spread::{DrawSource, SpreadSession};

use super::Context;
use super::draw::{fill, print_card, print_interpretation, print_saved};

pub async fn run(ctx: &Context, onboarding: bool) -> Result<(), String> {
    let gate = ctx.gate()?;
    let deck = ctx.deck()?;

    if let Some(record) = gate.todays_draw().map_err(|e| e.to_string())? {
        println!("  {}", "You have already drawn today's card.".yellow());
        match deck.get(&record.card_id) {
            Some(card) => print_card(Position::Today.label(), card),
            None => println!("  (card '{}' is not in this deck)", record.card_id),
        }
        return Ok(());
    }

    let repo = ctx.repository()?;
    let requester = ctx.requester()?;
    let mut session = SpreadSession::new(deck, ctx.engine_config());
    session.begin(SpreadType::Daily).map_err(|e| e.to_string())?;
    println!("  {} today's card\n", "Drawing".bold());

    let stdin = io::stdin();
    fill(&mut session, &mut stdin.lock())?;

    let card_id = session
        .drawn()
        .first()
        .map(|d| d.card.id.clone())
        .ok_or("no card was drawn")?;
    let interpretation = session
        .interpret(&requester, None)
        .await
        .map_err(|e| e.to_string())?
        .clone();
    print_interpretation(&interpretation);

    let saved = repo
        .save(session.finished().map_err(|e| e.to_string())?)
        .map_err(|e| format!("reading complete but not saved: {e}"))?;
    let source = if onboarding {
        DrawSource::Onboarding
    } else {
        DrawSource::Daily
    };
    gate.record_draw(card_id, source).map_err(|e| e.to_string())?;
    print_saved(&saved);
    Ok(())
}
