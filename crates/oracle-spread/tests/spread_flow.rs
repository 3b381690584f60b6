//! End-to-end runs of the spread engine against in-memory collaborators.

use std::sync::Mutex;

use chrono::DateTime;

use oracle_core::{Card, Deck, DrawnCard, Position, SpreadType};
use oracle_spread::interpretation::{InterpretationRequest, SIGN_IN_FALLBACK, TransportError};
use oracle_spread::{
    Advance, DailyDrawGate, DrawSource, EngineConfig, FallbackReason, FixedClock, Interpretation,
    InterpretationRequester, InterpretationTransport, MemoryStore, SpreadError, SpreadRepository,
    SpreadSession, Stage,
};

/// Records every request it receives.
#[derive(Default)]
struct RecordingTransport {
    requests: Mutex<Vec<InterpretationRequest>>,
}

impl RecordingTransport {
    fn requests(&self) -> Vec<InterpretationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl InterpretationTransport for RecordingTransport {
    async fn send(
        &self,
        request: &InterpretationRequest,
        _token: &str,
    ) -> Result<String, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        Ok("The river remembers its source.".to_string())
    }
}

fn abc_deck() -> Deck {
    Deck::new(vec![
        Card::new("A", "The Acorn", "Small beginnings."),
        Card::new("B", "The Bridge", "Crossing over."),
        Card::new("C", "The Crown", "Arrival."),
    ])
    .unwrap()
}

fn clock() -> FixedClock {
    FixedClock::new(DateTime::parse_from_rfc3339("2026-09-21T07:15:00+02:00").unwrap())
}

fn draw(session: &mut SpreadSession, id: &str) -> Advance {
    session.present_choices().unwrap();
    session.select(id).unwrap()
}

#[tokio::test]
async fn three_card_reading_end_to_end() {
    let mut session = SpreadSession::new(abc_deck(), EngineConfig::default().with_seed(1));
    let requester =
        InterpretationRequester::new(RecordingTransport::default()).with_token(Some("tok".into()));
    let repo = SpreadRepository::new(MemoryStore::new(), clock());

    session.begin(SpreadType::ThreeCard).unwrap();
    assert_eq!(draw(&mut session, "A"), Advance::Next(Position::Present));
    assert_eq!(draw(&mut session, "B"), Advance::Next(Position::Future));
    assert_eq!(draw(&mut session, "C"), Advance::ReadyToInterpret);

    let ids_and_positions: Vec<_> = session
        .drawn()
        .iter()
        .map(|d| (d.card.id.as_str(), d.position))
        .collect();
    assert_eq!(
        ids_and_positions,
        vec![
            ("A", Position::Past),
            ("B", Position::Present),
            ("C", Position::Future),
        ]
    );

    let interpretation = session.interpret(&requester, None).await.unwrap().clone();
    assert_eq!(
        interpretation,
        Interpretation::Generated("The river remembers its source.".to_string())
    );

    let requests = requester.transport().requests();
    assert_eq!(requests.len(), 1);
    let sent: Vec<DrawnCard> = requests[0]
        .cards
        .iter()
        .map(|w| DrawnCard {
            card: w.card.clone(),
            position: w.position,
        })
        .collect();
    assert_eq!(sent, session.drawn());
    assert_eq!(requests[0].spread_type, "three_card");

    let saved = repo.save(session.finished().unwrap()).unwrap();
    assert_eq!(saved.cards.len(), 3);
    assert_eq!(saved.interpretation, "The river remembers its source.");
    assert_eq!(repo.get_by_id(saved.id).unwrap().unwrap(), saved);
}

#[tokio::test]
async fn signed_out_reading_still_completes() {
    let mut session = SpreadSession::new(abc_deck(), EngineConfig::default().with_seed(2));
    let requester = InterpretationRequester::new(RecordingTransport::default());

    session.begin(SpreadType::ThreeCard).unwrap();
    draw(&mut session, "C");
    draw(&mut session, "A");
    draw(&mut session, "B");

    let interpretation = session.interpret(&requester, None).await.unwrap().clone();
    assert_eq!(
        interpretation,
        Interpretation::Fallback {
            text: SIGN_IN_FALLBACK.to_string(),
            reason: FallbackReason::SignedOut,
        }
    );
    assert!(requester.transport().requests().is_empty());
    assert!(session.is_complete());
    assert_eq!(session.finished().unwrap().interpretation, SIGN_IN_FALLBACK);
}

#[tokio::test]
async fn failed_save_can_be_retried_without_redrawing() {
    let store = MemoryStore::new();
    let repo = SpreadRepository::new(&store, clock());
    let requester =
        InterpretationRequester::new(RecordingTransport::default()).with_token(Some("tok".into()));
    let mut session = SpreadSession::new(abc_deck(), EngineConfig::default().with_seed(3));

    session.begin(SpreadType::ThreeCard).unwrap();
    for id in ["B", "C", "A"] {
        draw(&mut session, id);
    }
    session.interpret(&requester, None).await.unwrap();

    store.set_read_only(true);
    assert!(matches!(
        repo.save(session.finished().unwrap()),
        Err(SpreadError::Storage(_))
    ));
    assert!(session.is_complete());
    assert_eq!(session.drawn().len(), 3);

    store.set_read_only(false);
    let saved = repo.save(session.finished().unwrap()).unwrap();
    let order: Vec<_> = saved.cards.iter().map(|d| d.card.id.as_str()).collect();
    assert_eq!(order, vec!["B", "C", "A"]);
    assert_eq!(requester.transport().requests().len(), 1);
}

#[tokio::test]
async fn daily_draw_is_gated_per_day() {
    let store = MemoryStore::new();
    let clock = clock();
    let gate = DailyDrawGate::new(&store, clock.clone());
    let repo = SpreadRepository::new(&store, clock.clone());
    let requester =
        InterpretationRequester::new(RecordingTransport::default()).with_token(Some("tok".into()));

    assert!(gate.can_draw_today().unwrap());

    let mut session = SpreadSession::new(abc_deck(), EngineConfig::default().with_seed(4));
    session.begin(SpreadType::Daily).unwrap();
    assert_eq!(draw(&mut session, "B"), Advance::ReadyToInterpret);
    let interpretation = session.interpret(&requester, None).await.unwrap().clone();
    // The backend has no daily spread; the local text is used without a call.
    assert!(matches!(
        interpretation,
        Interpretation::Fallback {
            reason: FallbackReason::Unsupported,
            ..
        }
    ));
    assert!(requester.transport().requests().is_empty());

    repo.save(session.finished().unwrap()).unwrap();
    gate.record_draw("B", DrawSource::Daily).unwrap();
    assert!(!gate.can_draw_today().unwrap());
    assert_eq!(gate.todays_draw().unwrap().unwrap().card_id, "B");

    clock.advance(chrono::Duration::days(1));
    assert!(gate.can_draw_today().unwrap());
    // The saved reading outlives the gate record.
    assert_eq!(repo.list().unwrap().len(), 1);
}

#[tokio::test]
async fn session_can_be_reused_after_reset() {
    let mut session = SpreadSession::new(abc_deck(), EngineConfig::default().with_seed(5));
    let requester = InterpretationRequester::new(RecordingTransport::default());

    session.begin(SpreadType::Daily).unwrap();
    draw(&mut session, "A");
    session.interpret(&requester, None).await.unwrap();
    assert!(matches!(
        session.begin(SpreadType::ThreeCard),
        Err(SpreadError::AlreadyInProgress("complete"))
    ));

    session.reset();
    session.begin(SpreadType::ThreeCard).unwrap();
    assert_eq!(session.stage(), &Stage::Shuffling);
    assert!(session.drawn().is_empty());
}
