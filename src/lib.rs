//! Dossier engine library.
//!
//! Turn resolution and victory evaluation for a multiplayer espionage party
//! game: the interaction table, round resolution, master plans, alliances
//! with their final showdown, and the per-game session that sequences them.

pub mod alliance;
pub mod config;
pub mod error;
pub mod game;
pub mod interaction;
pub mod plan;
pub mod resolve;
pub mod selfplay;
pub mod session;
pub mod victory;
