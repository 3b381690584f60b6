//! Interpretation of completed spreads.
//!
//! [`InterpretationRequester`] makes at most one backend call per spread and
//! never fails: every problem is turned into an [`Interpretation::Fallback`]
//! carrying a fixed local text and the reason it was used. The network itself
//! sits behind [`InterpretationTransport`] so tests can substitute it.

pub mod fallback;
pub mod http;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use oracle_core::{Card, DrawnCard, Position, SpreadType};

pub use fallback::{SIGN_IN_FALLBACK, fallback_text};
pub use http::HttpTransport;

/// The outcome of interpreting a spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Interpretation {
    /// Text produced by the backend.
    Generated(String),
    /// A local substitute.
    Fallback {
        /// The substitute text.
        text: String,
        /// Why the backend text is missing.
        reason: FallbackReason,
    },
}

impl Interpretation {
    /// The text to show, whichever way it was obtained.
    pub fn text(&self) -> &str {
        match self {
            Self::Generated(text) | Self::Fallback { text, .. } => text,
        }
    }

    /// Whether this is a local substitute.
    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    fn fallback(spread_type: SpreadType, reason: FallbackReason) -> Self {
        let text = match reason {
            FallbackReason::SignedOut => SIGN_IN_FALLBACK,
            _ => fallback_text(spread_type),
        };
        Self::Fallback {
            text: text.to_string(),
            reason,
        }
    }
}

/// Why a fallback text was used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// No auth token; the backend was not contacted.
    SignedOut,
    /// The backend has no interpretation for this spread type.
    Unsupported,
    /// The request did not finish in time.
    Timeout,
    /// The request could not be delivered.
    Network,
    /// The backend answered with a non-success status.
    Status(u16),
    /// The backend's answer was not understood.
    Decode,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SignedOut => write!(f, "signed out"),
            Self::Unsupported => write!(f, "unsupported spread"),
            Self::Timeout => write!(f, "timed out"),
            Self::Network => write!(f, "network error"),
            Self::Status(code) => write!(f, "HTTP {code}"),
            Self::Decode => write!(f, "unreadable response"),
        }
    }
}

/// A card as sent to the backend, flattened with its position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireCard {
    /// The card fields.
    #[serde(flatten)]
    pub card: Card,
    /// The slot the card was drawn for.
    pub position: Position,
}

/// Request body for the interpretation backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpretationRequest {
    /// Drawn cards in position order.
    pub cards: Vec<WireCard>,
    /// Backend name of the spread type.
    pub spread_type: String,
    /// Optional astrological context supplied by the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub astrology_context: Option<String>,
}

/// Successful response body from the interpretation backend.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretationResponse {
    /// The generated text.
    pub interpretation: String,
}

/// Errors a transport reports. The requester maps each to a fallback.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The round trip exceeded the configured timeout.
    #[error("request timed out")]
    Timeout,
    /// The request could not be sent or the connection failed.
    #[error("network error: {0}")]
    Network(String),
    /// The backend returned a non-success status.
    #[error("backend returned HTTP {0}")]
    Status(u16),
    /// The response body did not match the expected shape.
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<&TransportError> for FallbackReason {
    fn from(err: &TransportError) -> Self {
        match err {
            TransportError::Timeout => Self::Timeout,
            TransportError::Network(_) => Self::Network,
            TransportError::Status(code) => Self::Status(*code),
            TransportError::Decode(_) => Self::Decode,
        }
    }
}

/// Delivers one interpretation request to a backend.
pub trait InterpretationTransport {
    /// Send `request` authenticated with `token` and return the generated text.
    fn send(
        &self,
        request: &InterpretationRequest,
        token: &str,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// Turns a completed spread into an [`Interpretation`].
#[derive(Debug, Clone)]
pub struct InterpretationRequester<T> {
    transport: T,
    token: Option<String>,
}

impl<T: InterpretationTransport> InterpretationRequester<T> {
    /// Create a requester with no auth token.
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            token: None,
        }
    }

    /// Set or clear the auth token. Blank tokens count as signed out.
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.trim().is_empty());
        self
    }

    /// Whether a token is present.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Interpret a completed spread. Makes at most one backend call.
    pub async fn request(
        &self,
        cards: &[DrawnCard],
        spread_type: SpreadType,
        context: Option<&str>,
    ) -> Interpretation {
        let Some(token) = self.token.as_deref() else {
            tracing::info!(spread = %spread_type, "not signed in, skipping interpretation");
            return Interpretation::fallback(spread_type, FallbackReason::SignedOut);
        };
        let Some(request) = build_request(cards, spread_type, context) else {
            tracing::debug!(spread = %spread_type, "no backend interpretation for this spread");
            return Interpretation::fallback(spread_type, FallbackReason::Unsupported);
        };

        match self.transport.send(&request, token).await {
            Ok(text) => {
                tracing::debug!(spread = %spread_type, chars = text.len(), "interpretation received");
                Interpretation::Generated(text)
            }
            Err(err) => {
                let reason = FallbackReason::from(&err);
                tracing::warn!(spread = %spread_type, %err, "interpretation failed, using fallback");
                Interpretation::fallback(spread_type, reason)
            }
        }
    }
}

/// Build the backend request body, or `None` if the backend has no name for
/// this spread type.
pub fn build_request(
    cards: &[DrawnCard],
    spread_type: SpreadType,
    context: Option<&str>,
) -> Option<InterpretationRequest> {
    let spread_name = spread_type.wire_name()?;
    Some(InterpretationRequest {
        cards: cards
            .iter()
            .map(|d| WireCard {
                card: d.card.clone(),
                position: d.position,
            })
            .collect(),
        spread_type: spread_name.to_string(),
        astrology_context: context
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every request and replies with a canned result.
    struct StubTransport {
        reply: Result<String, fn() -> TransportError>,
        seen: Mutex<Vec<(InterpretationRequest, String)>>,
    }

    impl StubTransport {
        fn ok(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing(err: fn() -> TransportError) -> Self {
            Self {
                reply: Err(err),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.seen.lock().unwrap().len()
        }
    }

    impl InterpretationTransport for StubTransport {
        async fn send(
            &self,
            request: &InterpretationRequest,
            token: &str,
        ) -> Result<String, TransportError> {
            self.seen
                .lock()
                .unwrap()
                .push((request.clone(), token.to_string()));
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(make) => Err(make()),
            }
        }
    }

    fn three_cards() -> Vec<DrawnCard> {
        [Position::Past, Position::Present, Position::Future]
            .into_iter()
            .enumerate()
            .map(|(i, position)| DrawnCard {
                card: Card::new(format!("c{i}"), format!("Card {i}"), "desc"),
                position,
            })
            .collect()
    }

    #[tokio::test]
    async fn generated_on_success() {
        let req = InterpretationRequester::new(StubTransport::ok("A clear path."))
            .with_token(Some("tok".into()));
        let out = req
            .request(&three_cards(), SpreadType::ThreeCard, Some("Moon in Leo"))
            .await;
        assert_eq!(out, Interpretation::Generated("A clear path.".into()));
        assert!(!out.is_fallback());

        let seen = req.transport().seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let (body, token) = &seen[0];
        assert_eq!(token, "tok");
        assert_eq!(body.spread_type, "three_card");
        assert_eq!(body.cards.len(), 3);
        assert_eq!(body.cards[2].position, Position::Future);
        assert_eq!(body.astrology_context.as_deref(), Some("Moon in Leo"));
    }

    #[tokio::test]
    async fn signed_out_skips_network() {
        let req = InterpretationRequester::new(StubTransport::ok("unused"));
        assert!(!req.is_authenticated());
        let out = req.request(&three_cards(), SpreadType::ThreeCard, None).await;
        assert_eq!(
            out,
            Interpretation::Fallback {
                text: SIGN_IN_FALLBACK.to_string(),
                reason: FallbackReason::SignedOut,
            }
        );
        assert_eq!(req.transport().calls(), 0);
    }

    #[tokio::test]
    async fn blank_token_is_signed_out() {
        let req =
            InterpretationRequester::new(StubTransport::ok("unused")).with_token(Some("  ".into()));
        assert!(!req.is_authenticated());
        let out = req.request(&three_cards(), SpreadType::ThreeCard, None).await;
        assert_eq!(out.text(), SIGN_IN_FALLBACK);
    }

    #[tokio::test]
    async fn daily_is_not_sent() {
        let req = InterpretationRequester::new(StubTransport::ok("unused"))
            .with_token(Some("tok".into()));
        let cards = vec![DrawnCard {
            card: Card::new("c0", "Card", ""),
            position: Position::Today,
        }];
        let out = req.request(&cards, SpreadType::Daily, None).await;
        assert_eq!(out.text(), fallback_text(SpreadType::Daily));
        assert!(matches!(
            out,
            Interpretation::Fallback {
                reason: FallbackReason::Unsupported,
                ..
            }
        ));
        assert_eq!(req.transport().calls(), 0);
    }

    #[tokio::test]
    async fn failures_become_fallbacks() {
        let cases: [(fn() -> TransportError, FallbackReason); 4] = [
            (|| TransportError::Timeout, FallbackReason::Timeout),
            (
                || TransportError::Network("refused".into()),
                FallbackReason::Network,
            ),
            (|| TransportError::Status(503), FallbackReason::Status(503)),
            (
                || TransportError::Decode("eof".into()),
                FallbackReason::Decode,
            ),
        ];
        for (make, expected) in cases {
            let req = InterpretationRequester::new(StubTransport::failing(make))
                .with_token(Some("tok".into()));
            let out = req.request(&three_cards(), SpreadType::ThreeCard, None).await;
            assert_eq!(
                out,
                Interpretation::Fallback {
                    text: fallback_text(SpreadType::ThreeCard).to_string(),
                    reason: expected,
                }
            );
            assert_eq!(req.transport().calls(), 1, "no retry for {expected}");
        }
    }

    #[test]
    fn request_body_shape() {
        let body = build_request(&three_cards(), SpreadType::ThreeCard, Some("  ")).unwrap();
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["spread_type"], "three_card");
        assert_eq!(json["cards"][0]["id"], "c0");
        assert_eq!(json["cards"][0]["position"], "past");
        assert_eq!(json["cards"][0]["isPremium"], false);
        assert!(json.get("astrology_context").is_none());
    }

    #[test]
    fn no_request_for_daily() {
        assert!(build_request(&[], SpreadType::Daily, None).is_none());
    }
}
