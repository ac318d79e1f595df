//! Players and their statuses.
//!
//! A player is identified by a unique codename and carries the only
//! economic resource of the game: influence points (IP), always kept
//! within [`MIN_INFLUENCE`, `MAX_INFLUENCE`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::alliance::AllianceId;
use crate::error::ParseError;
use crate::plan::PlanId;

/// Lowest influence a player can hold.
pub const MIN_INFLUENCE: i32 = -10;
/// Highest influence a player can hold.
pub const MAX_INFLUENCE: i32 = 50;

/// Clamps an influence value into the legal range.
pub fn clamp_influence(value: i32) -> i32 {
    value.clamp(MIN_INFLUENCE, MAX_INFLUENCE)
}

/// The operational status of a spy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Active,
    Compromised,
    Burned,
    Captured,
    Eliminated,
    Exposed,
}

pub const ALL_STATUSES: [Status; 6] = [
    Status::Active,
    Status::Compromised,
    Status::Burned,
    Status::Captured,
    Status::Eliminated,
    Status::Exposed,
];

impl Status {
    /// Captured and eliminated spies take no further part in resolution.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Status::Captured | Status::Eliminated)
    }

    /// Active, compromised or burned: the statuses that may still run
    /// operations and count as opponents for plan objectives.
    pub const fn is_operational(self) -> bool {
        matches!(self, Status::Active | Status::Compromised | Status::Burned)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Active => "active",
            Status::Compromised => "compromised",
            Status::Burned => "burned",
            Status::Captured => "captured",
            Status::Eliminated => "eliminated",
            Status::Exposed => "exposed",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_STATUSES
            .iter()
            .copied()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ParseError::UnknownStatus(s.to_string()))
    }
}

/// A spy taking part in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub codename: String,
    pub status: Status,
    pub influence: i32,
    /// Gadget ids, oldest acquisition first.
    pub gadgets: Vec<String>,
    /// Intel card ids; only ever appended to during resolution.
    pub intel: Vec<String>,
    pub master_plan: Option<PlanId>,
    pub alliance_ids: Vec<AllianceId>,
}

impl Player {
    /// Creates an active player with the given starting influence.
    pub fn new(codename: impl Into<String>, influence: i32) -> Self {
        Player {
            codename: codename.into(),
            status: Status::Active,
            influence: clamp_influence(influence),
            gadgets: Vec::new(),
            intel: Vec::new(),
            master_plan: None,
            alliance_ids: Vec::new(),
        }
    }

    /// Adds `delta` to influence, clamping, and returns the new value.
    pub fn adjust_influence(&mut self, delta: i32) -> i32 {
        self.influence = clamp_influence(self.influence.saturating_add(delta));
        self.influence
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_roundtrip() {
        for status in ALL_STATUSES {
            assert_eq!(status.as_str().parse::<Status>(), Ok(status));
        }
        assert_eq!(
            "vaporized".parse::<Status>(),
            Err(ParseError::UnknownStatus("vaporized".to_string()))
        );
    }

    #[test]
    fn terminal_and_operational_partition() {
        assert!(Status::Captured.is_terminal());
        assert!(Status::Eliminated.is_terminal());
        assert!(!Status::Exposed.is_terminal());
        assert!(!Status::Exposed.is_operational());
        assert!(Status::Burned.is_operational());
    }

    #[test]
    fn influence_is_clamped_both_ways() {
        let mut p = Player::new("Falcon", 48);
        assert_eq!(p.adjust_influence(5), MAX_INFLUENCE);
        assert_eq!(p.adjust_influence(-100), MIN_INFLUENCE);
        assert_eq!(Player::new("Owl", 99).influence, MAX_INFLUENCE);
    }

    #[test]
    fn status_serializes_snake_case() {
        let json = serde_json::to_string(&Status::Compromised).unwrap();
        assert_eq!(json, "\"compromised\"");
    }
}
