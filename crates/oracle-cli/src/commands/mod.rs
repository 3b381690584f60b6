pub mod daily;
pub mod delete;
pub mod draw;
pub mod journal;
pub mod list;
pub mod show;

use std::path::PathBuf;

use oracle_core::Deck;
use oracle_spread::{
    DailyDrawGate, EngineConfig, FileStore, HttpTransport, InterpretationConfig,
    InterpretationRequester, SavedSpread, SpreadRepository, SystemClock,
};

/// The deck shipped with the binary.
const BUILTIN_DECK: &str = include_str!("../../assets/deck.json");

/// Settings shared by every command, taken from the global flags.
pub struct Context {
    pub data_dir: PathBuf,
    pub deck: Option<PathBuf>,
    pub premium: bool,
    pub token: Option<String>,
    pub endpoint: String,
    pub seed: Option<u64>,
}

impl Context {
    /// Load the deck, keeping only the cards this user may draw.
    pub fn deck(&self) -> Result<Deck, String> {
        let deck = match &self.deck {
            Some(path) => {
                let json = std::fs::read_to_string(path)
                    .map_err(|e| format!("cannot read deck {}: {e}", path.display()))?;
                Deck::from_json(&json).map_err(|e| format!("{}: {e}", path.display()))?
            }
            None => Deck::from_json(BUILTIN_DECK).map_err(|e| format!("built-in deck: {e}"))?,
        };
        Ok(deck.accessible(self.premium))
    }

    pub fn engine_config(&self) -> EngineConfig {
        let config = EngineConfig::default();
        match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        }
    }

    pub fn repository(&self) -> Result<SpreadRepository<FileStore, SystemClock>, String> {
        Ok(SpreadRepository::new(self.store()?, SystemClock))
    }

    pub fn gate(&self) -> Result<DailyDrawGate<FileStore, SystemClock>, String> {
        Ok(DailyDrawGate::new(self.store()?, SystemClock))
    }

    pub fn requester(&self) -> Result<InterpretationRequester<HttpTransport>, String> {
        let config = InterpretationConfig::default().with_endpoint(self.endpoint.as_str());
        let transport = HttpTransport::new(&config)
            .map_err(|e| format!("cannot set up the interpretation client: {e}"))?;
        tracing::debug!(
            endpoint = transport.endpoint(),
            signed_in = self.token.is_some(),
            "interpretation client ready"
        );
        Ok(InterpretationRequester::new(transport).with_token(self.token.clone()))
    }

    fn store(&self) -> Result<FileStore, String> {
        FileStore::open(&self.data_dir)
            .map_err(|e| format!("cannot open data dir {}: {e}", self.data_dir.display()))
    }
}

/// Find a saved spread by full id or unique prefix.
pub fn resolve(
    repo: &SpreadRepository<FileStore, SystemClock>,
    id: &str,
) -> Result<SavedSpread, String> {
    repo.find_by_prefix(id)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| format!("no saved spread matches '{id}'"))
}
