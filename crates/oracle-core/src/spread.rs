use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::card::Card;
use crate::error::CoreError;

/// A named slot within a spread that gives a drawn card its meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// The single card of a daily draw.
    Today,
    /// What led here.
    Past,
    /// Where things stand.
    Present,
    /// Where things are heading.
    Future,
    /// What to rest and release.
    Winter,
    /// What is waking up.
    Spring,
    /// What is in full bloom.
    Summer,
    /// What is ready for harvest.
    Autumn,
    /// The thread running through the whole year.
    Essence,
    /// Foundations and origins.
    Roots,
    /// Obstacles to growth.
    Challenges,
    /// Strengths to lean on.
    Gifts,
    /// What is hidden or avoided.
    Shadow,
    /// The next concrete step.
    Action,
    /// The longer horizon.
    Vision,
    /// How it all fits together.
    Integration,
}

impl Position {
    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::Past => "Past",
            Self::Present => "Present",
            Self::Future => "Future",
            Self::Winter => "Winter",
            Self::Spring => "Spring",
            Self::Summer => "Summer",
            Self::Autumn => "Autumn",
            Self::Essence => "Essence",
            Self::Roots => "Roots",
            Self::Challenges => "Challenges",
            Self::Gifts => "Gifts",
            Self::Shadow => "Shadow",
            Self::Action => "Action",
            Self::Vision => "Vision",
            Self::Integration => "Integration",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const DAILY: &[Position] = &[Position::Today];
const THREE_CARD: &[Position] = &[Position::Past, Position::Present, Position::Future];
const SEASONAL: &[Position] = &[
    Position::Winter,
    Position::Spring,
    Position::Summer,
    Position::Autumn,
    Position::Essence,
];
const GROWTH: &[Position] = &[
    Position::Roots,
    Position::Challenges,
    Position::Gifts,
    Position::Shadow,
    Position::Action,
    Position::Vision,
    Position::Integration,
];

/// The fixed set of spread shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadType {
    /// One card, once per calendar day.
    Daily,
    /// Past, present, future.
    #[serde(rename = "three", alias = "three_card")]
    ThreeCard,
    /// Five cards through the seasons.
    Seasonal,
    /// Seven cards on personal growth.
    Growth,
}

impl SpreadType {
    /// All spread types, smallest first.
    pub fn all() -> &'static [Self] {
        &[Self::Daily, Self::ThreeCard, Self::Seasonal, Self::Growth]
    }

    /// The ordered positions of this spread. Never changes at runtime.
    pub fn positions(self) -> &'static [Position] {
        match self {
            Self::Daily => DAILY,
            Self::ThreeCard => THREE_CARD,
            Self::Seasonal => SEASONAL,
            Self::Growth => GROWTH,
        }
    }

    /// Number of cards a complete spread holds.
    pub fn card_count(self) -> usize {
        self.positions().len()
    }

    /// Name understood by the interpretation backend, if it accepts this shape.
    pub fn wire_name(self) -> Option<&'static str> {
        match self {
            Self::Daily => None,
            Self::ThreeCard => Some("three_card"),
            Self::Seasonal => Some("seasonal"),
            Self::Growth => Some("growth"),
        }
    }

    /// Whether only subscribers may start this spread.
    pub fn requires_premium(self) -> bool {
        matches!(self, Self::Seasonal | Self::Growth)
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Daily => "Daily Draw",
            Self::ThreeCard => "Three Card",
            Self::Seasonal => "Seasonal",
            Self::Growth => "Growth",
        }
    }
}

impl fmt::Display for SpreadType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpreadType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['-', ' '], "_").as_str() {
            "daily" | "one" | "1" => Ok(Self::Daily),
            "three" | "three_card" | "3" => Ok(Self::ThreeCard),
            "seasonal" | "five" | "5" => Ok(Self::Seasonal),
            "growth" | "seven" | "7" => Ok(Self::Growth),
            _ => Err(CoreError::UnknownSpreadType(s.to_string())),
        }
    }
}

/// A card bound to the position it was drawn for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawnCard {
    /// The card that was drawn.
    pub card: Card,
    /// The slot it fills.
    pub position: Position,
}

/// Unique identifier of a saved spread, assigned at save time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpreadId(pub Uuid);

impl SpreadId {
    /// Generate a new random spread ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// The short form used for display and prefix lookup.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for SpreadId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SpreadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SpreadId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| CoreError::InvalidSpreadId(s.to_string()))
    }
}
