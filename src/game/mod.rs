//! Game-state types.
//!
//! Contains the core records the engine mutates: players and their
//! statuses, submitted actions, the roster index, and strategic assets.

pub mod action;
pub mod asset;
pub mod player;
pub mod roster;

pub use action::{Action, Defense, Offense, ALL_DEFENSES, ALL_OFFENSES};
pub use asset::{AssetLedger, StrategicAsset, ALL_ASSETS, ASSET_COUNT};
pub use player::{clamp_influence, Player, Status, ALL_STATUSES, MAX_INFLUENCE, MIN_INFLUENCE};
pub use roster::Roster;
