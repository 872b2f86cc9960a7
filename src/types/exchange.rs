// src/types/exchange.rs - venue and instrument state types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Venue (instrument type) an instrument is listed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VenueType {
    Spot,
    Margin,
    Swap,
    Futures,
}

impl VenueType {
    /// Value used in the `instType` query parameter
    pub fn to_api_string(&self) -> &'static str {
        match self {
            VenueType::Spot => "SPOT",
            VenueType::Margin => "MARGIN",
            VenueType::Swap => "SWAP",
            VenueType::Futures => "FUTURES",
        }
    }

    pub fn from_api_string(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "SPOT" => Some(VenueType::Spot),
            "MARGIN" => Some(VenueType::Margin),
            "SWAP" => Some(VenueType::Swap),
            "FUTURES" => Some(VenueType::Futures),
            _ => None,
        }
    }

    /// Whether this venue settles through a perpetual/dated derivative
    pub fn is_derivative(&self) -> bool {
        matches!(self, VenueType::Swap | VenueType::Futures)
    }
}

impl fmt::Display for VenueType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_api_string())
    }
}

impl FromStr for VenueType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VenueType::from_api_string(s).ok_or_else(|| format!("unknown venue type: {}", s))
    }
}

/// Trading state reported for an instrument
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstrumentState {
    Live,
    Suspend,
    Preopen,
    Test,
    Other(String),
}

impl InstrumentState {
    pub fn from_api_string(s: &str) -> Self {
        match s {
            "live" => InstrumentState::Live,
            "suspend" => InstrumentState::Suspend,
            "preopen" => InstrumentState::Preopen,
            "test" => InstrumentState::Test,
            other => InstrumentState::Other(other.to_string()),
        }
    }

    pub fn is_live(&self) -> bool {
        matches!(self, InstrumentState::Live)
    }
}

impl fmt::Display for InstrumentState {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InstrumentState::Live => write!(f, "live"),
            InstrumentState::Suspend => write!(f, "suspend"),
            InstrumentState::Preopen => write!(f, "preopen"),
            InstrumentState::Test => write!(f, "test"),
            InstrumentState::Other(s) => write!(f, "{}", s),
        }
    }
}
