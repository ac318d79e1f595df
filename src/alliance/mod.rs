//! Alliances and the final showdown.
//!
//! Two players may pact for a few rounds. Coordinated operations that wipe
//! out every outsider or monopolize the strategic assets send both members
//! into a final showdown that decides the single winner.

pub mod registry;
pub mod showdown;

pub use registry::{
    Alliance, AllianceCondition, AllianceEngine, AllianceId, AllianceKind, AllianceSummary,
    AllianceVictory, BetrayalPenalty, BreakResult, ShowdownSummary,
};
pub use showdown::{
    FinalShowdown, ParticipantRoll, ShowdownInit, ShowdownMove, ShowdownPhase, ShowdownResult,
    SHOWDOWN_MOVES,
};
