//! Interaction resolution.
//!
//! Crosses one offense with one defense through the outcome table and
//! layers IP spend on top.

pub mod outcome;
pub mod table;

pub use outcome::{
    available_defenses, available_offenses, default_outcome, resolve_interaction, AudioCue,
    Outcome,
};
pub use table::lookup;
