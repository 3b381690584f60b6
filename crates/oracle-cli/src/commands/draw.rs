use std::io::{self, BufRead, Write};

use colored::Colorize;

use oracle_core::{Card, SpreadType};
use oracle_spread::{Advance, Interpretation, SavedSpread, SpreadSession};

use super::Context;

pub async fn run(ctx: &Context, spread: &str, context: Option<&str>) -> Result<(), String> {
    let spread_type = spread.parse::<SpreadType>().map_err(|e| e.to_string())?;
    if spread_type == SpreadType::Daily {
        return super::daily::run(ctx, false).await;
    }
    if spread_type.requires_premium() && !ctx.premium {
        return Err(format!(
            "the {} spread is a premium spread (pass --premium to unlock it)",
            spread_type.label()
        ));
    }

    let repo = ctx.repository()?;
    let requester = ctx.requester()?;
    let mut session = SpreadSession::new(ctx.deck()?, ctx.engine_config());

    session.begin(spread_type).map_err(|e| e.to_string())?;
    println!("  {} {} Spread", "Drawing".bold(), spread_type.label());
    if !requester.is_authenticated() {
        println!(
            "  {}",
            "Not signed in: the reading will use a local interpretation.".dimmed()
        );
    }
    println!();

    let stdin = io::stdin();
    fill(&mut session, &mut stdin.lock())?;

    let interpretation = session
        .interpret(&requester, context)
        .await
        .map_err(|e| e.to_string())?
        .clone();
    print_interpretation(&interpretation);

    let saved = repo
        .save(session.finished().map_err(|e| e.to_string())?)
        .map_err(|e| format!("reading complete but not saved: {e}"))?;
    print_saved(&saved);
    Ok(())
}

/// Deal, prompt, and select until every position of the spread is filled.
pub(super) fn fill(session: &mut SpreadSession, input: &mut impl BufRead) -> Result<(), String> {
    loop {
        let Some(position) = session.next_position() else {
            return Ok(());
        };
        let choices = session.present_choices().map_err(|e| e.to_string())?.to_vec();

        println!(
            "  {} choose a card from the {} face down (1-{}):",
            position.to_string().bold(),
            choices.len(),
            choices.len()
        );
        let pick = prompt_pick(input, choices.len())?;
        let card = &choices[pick];

        let advance = session.select(&card.id).map_err(|e| e.to_string())?;
        print_card(&position.to_string(), card);
        if advance == Advance::ReadyToInterpret {
            return Ok(());
        }
    }
}

/// Read a 1-based choice, re-prompting on bad input. Returns a 0-based index.
fn prompt_pick(input: &mut impl BufRead, count: usize) -> Result<usize, String> {
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush().map_err(|e| e.to_string())?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => return Err("input closed before the spread was complete".into()),
            Err(e) => return Err(e.to_string()),
            _ => {}
        }

        match line.trim().parse::<usize>() {
            Ok(n) if (1..=count).contains(&n) => return Ok(n - 1),
            _ => println!("{}", format!("  Enter a number from 1 to {count}.").yellow()),
        }
    }
}

pub(super) fn print_card(position: &str, card: &Card) {
    println!();
    println!("  {} {}", format!("[{position}]").cyan(), card.title.bold());
    if !card.description.is_empty() {
        println!("  {}", card.description);
    }
    for prompt in &card.prompts {
        println!("    - {}", prompt.italic());
    }
    if !card.action.is_empty() {
        println!("  {} {}", "Action:".green(), card.action);
    }
    println!();
}

pub(super) fn print_interpretation(interpretation: &Interpretation) {
    println!("  {}", "Interpretation".bold().underline());
    println!("  {}", interpretation.text());
    if let Interpretation::Fallback { reason, .. } = interpretation {
        tracing::debug!(%reason, "fallback interpretation shown");
        println!("  {}", format!("({reason})").dimmed());
    }
    println!();
}

pub(super) fn print_saved(saved: &SavedSpread) {
    println!("  {} as {}", "Saved".green().bold(), saved.id.short());
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use oracle_core::Deck;
    use oracle_spread::{EngineConfig, Stage};

    use super::*;

    #[test]
    fn prompt_skips_bad_input() {
        let mut input = Cursor::new("abc\n0\n9\n2\n");
        assert_eq!(prompt_pick(&mut input, 3).unwrap(), 1);
    }

    #[test]
    fn prompt_fails_on_eof() {
        let mut input = Cursor::new("");
        assert!(prompt_pick(&mut input, 3).is_err());
    }

    #[test]
    fn fill_completes_three_card_spread() {
        let deck = Deck::new(vec![
            Card::new("a", "A", ""),
            Card::new("b", "B", ""),
            Card::new("c", "C", ""),
            Card::new("d", "D", ""),
        ])
        .unwrap();
        let mut session = SpreadSession::new(deck, EngineConfig::default().with_seed(9));
        session.begin(SpreadType::ThreeCard).unwrap();

        fill(&mut session, &mut Cursor::new("1\n1\n1\n")).unwrap();
        assert_eq!(session.stage(), &Stage::Interpreting);
        assert_eq!(session.drawn().len(), 3);
    }
}
