//! Round resolution.
//!
//! Turns one round of simultaneous submissions into per-player results,
//! then applies the end-of-round economy and status recovery.

pub mod round_end;
pub mod turn;

pub use round_end::{apply_round_end_effects, RoundEndReport, StatusChange, UpkeepCharge};
pub use turn::{resolve_round, targeted_players, ResultKind, RoundResult};
