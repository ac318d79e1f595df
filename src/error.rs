//! Error types.
//!
//! Caller-contract violations surface as [`EngineError`]; unknown wire
//! strings are rejected with [`ParseError`]; bad configuration is reported
//! as [`ConfigError`].

use thiserror::Error;

/// A violated caller contract or engine invariant.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("duplicate codename '{0}'")]
    DuplicateCodename(String),

    #[error("unknown codename '{0}'")]
    UnknownCodename(String),

    #[error("influence {influence} for '{codename}' is outside [{min}, {max}]")]
    InfluenceOutOfBounds {
        codename: String,
        influence: i32,
        min: i32,
        max: i32,
    },

    #[error("'{codename}' spends {spend} IP but holds only {influence}")]
    SpendExceedsInfluence {
        codename: String,
        spend: u32,
        influence: i32,
    },

    #[error("'{codename}' is a member of {count} alliances")]
    CorruptAllianceMembership { codename: String, count: usize },

    #[error("alliance members must be distinct, got '{0}' twice")]
    SelfAlliance(String),

    #[error("alliance refused: {0}")]
    AllianceRefused(#[from] FormationRefusal),

    #[error("unknown alliance '{0}'")]
    UnknownAlliance(String),

    #[error("final showdown requires exactly 2 distinct participants, got {0:?}")]
    ShowdownParticipants(Vec<String>),

    #[error("a final showdown is already in progress")]
    ShowdownInProgress,

    #[error("no final showdown in progress")]
    NoShowdown,

    #[error("action not allowed while the game is {0}")]
    WrongPhase(&'static str),

    #[error("game needs between 2 and 6 players, got {0}")]
    PlayerCount(usize),

    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Why two players cannot form an alliance right now.
///
/// Returned as data by `AllianceEngine::can_form`; only `create` turns it
/// into an [`EngineError`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormationRefusal {
    #[error("players are already allied")]
    AlreadyAllied,

    #[error("{0} is already in an alliance")]
    AlreadyInAlliance(String),

    #[error("{codename} cannot form alliances for {rounds} more round(s)")]
    Cooldown { codename: String, rounds: u32 },

    #[error("a player cannot ally with themselves")]
    SamePlayer,
}

/// An unknown identifier was submitted at the boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown offense '{0}'")]
    UnknownOffense(String),

    #[error("unknown defense '{0}'")]
    UnknownDefense(String),

    #[error("unknown status '{0}'")]
    UnknownStatus(String),

    #[error("unknown strategic asset '{0}'")]
    UnknownAsset(String),

    #[error("unknown alliance type '{0}'")]
    UnknownAllianceKind(String),

    #[error("unknown showdown action '{0}'")]
    UnknownShowdownMove(String),

    #[error("unknown master plan '{0}'")]
    UnknownPlan(String),
}

/// Configuration could not be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{field} must be a probability in [0, 1], got {value}")]
    Probability { field: &'static str, value: f64 },

    #[error("{field} must be at least {min}, got {value}")]
    TooSmall {
        field: &'static str,
        min: i64,
        value: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_converts_into_engine_error() {
        let err: EngineError = FormationRefusal::AlreadyAllied.into();
        assert_eq!(err.to_string(), "alliance refused: players are already allied");
    }

    #[test]
    fn messages_name_the_offender() {
        let err = EngineError::SpendExceedsInfluence {
            codename: "Falcon".to_string(),
            spend: 7,
            influence: 3,
        };
        assert_eq!(err.to_string(), "'Falcon' spends 7 IP but holds only 3");
        let refusal = FormationRefusal::AlreadyInAlliance("Viper".to_string());
        assert_eq!(refusal.to_string(), "Viper is already in an alliance");
    }
}
