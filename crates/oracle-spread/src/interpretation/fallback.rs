//! Fixed local texts used when no generated interpretation is available.

use oracle_core::SpreadType;

/// Returned without any network call when the caller is not signed in.
pub const SIGN_IN_FALLBACK: &str = "Sign in to receive a personalised interpretation of your \
spread. Until then, sit with each card and notice which one speaks loudest.";

/// The per-type text substituted when the backend cannot be reached.
pub fn fallback_text(spread_type: SpreadType) -> &'static str {
    match spread_type {
        SpreadType::Daily => {
            "Your card for today is an invitation, not a verdict. Read its prompt \
slowly and carry its action with you."
        }
        SpreadType::ThreeCard => {
            "Your past, present, and future cards form one story. Notice what carries \
over from one to the next and what changes."
        }
        SpreadType::Seasonal => {
            "Each season asks something different of you. Let the essence card guide \
how you move through the year."
        }
        SpreadType::Growth => {
            "Growth begins at the roots and ends in integration. Take the action card as \
your first step and return to the others as you go."
        }
    }
}
