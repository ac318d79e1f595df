//! Tunable rule constants.
//!
//! Every number the engine applies during a round lives here with its
//! default. Configs load from JSON with any subset of fields present;
//! omitted fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Influence every player starts the game with.
    pub starting_influence: i32,
    pub turn: TurnConfig,
    pub round_end: RoundEndConfig,
    pub victory: VictoryConfig,
    pub showdown: ShowdownConfig,
    pub alliance: AllianceConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            starting_influence: 10,
            turn: TurnConfig::default(),
            round_end: RoundEndConfig::default(),
            victory: VictoryConfig::default(),
            showdown: ShowdownConfig::default(),
            alliance: AllianceConfig::default(),
        }
    }
}

/// Constants applied by the round resolver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    /// IP gained by a player who takes no offensive action.
    pub safe_turn_gain: i32,
    /// A banner distracts attackers only if its upper-cased text contains this.
    pub banner_keyword: String,
    /// Banner text used when a broadcaster supplies none.
    pub default_banner: String,
    /// Chance that a distracted attacker's success is degraded.
    pub banner_penalty_chance: f64,
    /// Flat IP bonus for capturing a strategic asset.
    pub capture_bonus: i32,
}

impl Default for TurnConfig {
    fn default() -> Self {
        TurnConfig {
            safe_turn_gain: 1,
            banner_keyword: "ACME".to_string(),
            default_banner: "ACME RULES!".to_string(),
            banner_penalty_chance: 0.5,
            capture_bonus: 3,
        }
    }
}

/// Probabilities and thresholds for status recovery at round end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRecovery {
    pub captured_to_burned: f64,
    pub burned_to_compromised: f64,
    /// Compromised players at or above this influence return to active.
    pub compromised_recovery_ip: i32,
}

impl Default for StatusRecovery {
    fn default() -> Self {
        StatusRecovery {
            captured_to_burned: 0.4,
            burned_to_compromised: 0.3,
            compromised_recovery_ip: 15,
        }
    }
}

/// Constants applied by the round-end pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundEndConfig {
    /// IP per controlled asset.
    pub asset_yield: i32,
    /// IP per held gadget.
    pub gadget_upkeep: i32,
    pub recovery: StatusRecovery,
    /// Chance that each alliance tag on a player is dropped.
    pub alliance_tag_decay: f64,
    /// Survival bonus applies once this many or fewer players stand.
    pub late_game_threshold: usize,
    pub late_game_bonus: i32,
}

impl Default for RoundEndConfig {
    fn default() -> Self {
        RoundEndConfig {
            asset_yield: 2,
            gadget_upkeep: 1,
            recovery: StatusRecovery::default(),
            alliance_tag_decay: 0.1,
            late_game_threshold: 2,
            late_game_bonus: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VictoryConfig {
    /// Assets one player must hold for a network-control win.
    pub network_control_assets: usize,
    /// Intel multiple over every other standing player for supremacy.
    pub intel_supremacy_ratio: usize,
}

impl Default for VictoryConfig {
    fn default() -> Self {
        VictoryConfig {
            network_control_assets: 3,
            intel_supremacy_ratio: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowdownConfig {
    pub die_sides: u32,
    /// Added to the roll of a participant choosing assassination.
    pub assassination_bonus: u32,
    /// IP granted to both participants when a showdown starts.
    pub ip_bonus: i32,
}

impl Default for ShowdownConfig {
    fn default() -> Self {
        ShowdownConfig {
            die_sides: 10,
            assassination_bonus: 1,
            ip_bonus: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllianceConfig {
    pub betrayal_ip_loss: i32,
    /// Rounds a betrayer must wait before joining another alliance.
    pub cooldown_rounds: u32,
}

impl Default for AllianceConfig {
    fn default() -> Self {
        AllianceConfig {
            betrayal_ip_loss: 2,
            cooldown_rounds: 3,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config and validates it.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks probabilities and minimum values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("turn.banner_penalty_chance", self.turn.banner_penalty_chance),
            (
                "round_end.recovery.captured_to_burned",
                self.round_end.recovery.captured_to_burned,
            ),
            (
                "round_end.recovery.burned_to_compromised",
                self.round_end.recovery.burned_to_compromised,
            ),
            ("round_end.alliance_tag_decay", self.round_end.alliance_tag_decay),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Probability { field, value });
            }
        }

        let minimums = [
            ("showdown.die_sides", 1, self.showdown.die_sides as i64),
            (
                "victory.network_control_assets",
                1,
                self.victory.network_control_assets as i64,
            ),
            (
                "victory.intel_supremacy_ratio",
                1,
                self.victory.intel_supremacy_ratio as i64,
            ),
            ("round_end.gadget_upkeep", 0, self.round_end.gadget_upkeep as i64),
            ("round_end.asset_yield", 0, self.round_end.asset_yield as i64),
        ];
        for (field, min, value) in minimums {
            if value < min {
                return Err(ConfigError::TooSmall { field, min, value });
            }
        }
        Ok(())
    }
}
