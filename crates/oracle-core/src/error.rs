/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while loading or querying reference data.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The deck source could not be parsed.
    #[error("invalid deck: {0}")]
    InvalidDeck(#[from] serde_json::Error),

    /// Two cards in one deck share an id.
    #[error("duplicate card id: \"{0}\"")]
    DuplicateCard(String),

    /// A spread type name did not match any known shape.
    #[error("unknown spread type: \"{0}\"")]
    UnknownSpreadType(String),

    /// A saved-spread id could not be parsed.
    #[error("invalid spread id: \"{0}\"")]
    InvalidSpreadId(String),
}
