//! Configuration for spread sessions and the interpretation client.

use std::time::Duration;

/// Number of face-down cards offered for each pick.
pub const DEFAULT_CHOICE_COUNT: usize = 24;

/// Whether a card may appear in more than one position of the same spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RepeatPolicy {
    /// Cards already drawn in this spread are left out of later choices.
    #[default]
    Exclude,
    /// Every position samples the full deck.
    Independent,
}

/// Configuration for a spread session.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// RNG seed for reproducible draws. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Cards offered per pick.
    pub choice_count: usize,
    /// Repeat policy across positions.
    pub repeat_policy: RepeatPolicy,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            choice_count: DEFAULT_CHOICE_COUNT,
            repeat_policy: RepeatPolicy::default(),
        }
    }
}

impl EngineConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of cards offered per pick (at least 1).
    pub fn with_choice_count(mut self, count: usize) -> Self {
        self.choice_count = count.max(1);
        self
    }

    /// Set the repeat policy.
    pub fn with_repeat_policy(mut self, policy: RepeatPolicy) -> Self {
        self.repeat_policy = policy;
        self
    }
}

/// Default backend endpoint for interpretations.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8787/api/interpret";

/// Configuration for the HTTP interpretation transport.
#[derive(Debug, Clone)]
pub struct InterpretationConfig {
    /// Full URL the request is POSTed to.
    pub endpoint: String,
    /// Upper bound on one round trip.
    pub timeout: Duration,
    /// User agent sent with each request.
    pub user_agent: String,
}

impl Default for InterpretationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(20),
            user_agent: concat!("oracle-spread/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl InterpretationConfig {
    /// Set the endpoint URL.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
