//! Master plan definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::victory::VictoryCondition;

/// Identifier of a master plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanId {
    ExposeAll,
    ControlAllAssets,
    AnvilCarnage,
    MisinformationMaster,
    SaboteurSupreme,
    GhostOperative,
    AllianceBreaker,
    IntelCollector,
    CoordinatedElimination,
    AssetMonopoly,
}

/// Plans available in every game.
pub const BASE_PLANS: [PlanId; 8] = [
    PlanId::ExposeAll,
    PlanId::ControlAllAssets,
    PlanId::AnvilCarnage,
    PlanId::MisinformationMaster,
    PlanId::SaboteurSupreme,
    PlanId::GhostOperative,
    PlanId::AllianceBreaker,
    PlanId::IntelCollector,
];

/// Plans only dealt in six-player games.
pub const ALLIANCE_PLANS: [PlanId; 2] = [PlanId::CoordinatedElimination, PlanId::AssetMonopoly];

impl PlanId {
    pub const fn as_str(self) -> &'static str {
        match self {
            PlanId::ExposeAll => "expose_all",
            PlanId::ControlAllAssets => "control_all_assets",
            PlanId::AnvilCarnage => "anvil_carnage",
            PlanId::MisinformationMaster => "misinformation_master",
            PlanId::SaboteurSupreme => "saboteur_supreme",
            PlanId::GhostOperative => "ghost_operative",
            PlanId::AllianceBreaker => "alliance_breaker",
            PlanId::IntelCollector => "intel_collector",
            PlanId::CoordinatedElimination => "coordinated_elimination",
            PlanId::AssetMonopoly => "asset_monopoly",
        }
    }

    /// The plan's static definition.
    pub fn definition(self) -> &'static MasterPlan {
        // CATALOG is declared in PlanId order.
        &CATALOG[self as usize]
    }

    /// Plans that only make sense with several alliance-capable opponents.
    pub const fn needs_alliances(self) -> bool {
        matches!(
            self,
            PlanId::AllianceBreaker | PlanId::CoordinatedElimination | PlanId::AssetMonopoly
        )
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CATALOG
            .iter()
            .map(|p| p.id)
            .find(|id| id.as_str() == s)
            .ok_or_else(|| ParseError::UnknownPlan(s.to_string()))
    }
}

/// How progress towards a plan is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionType {
    SingleRound,
    AssetControl,
    ConsecutiveRounds,
    Survival,
    Cumulative,
    Race,
    AllianceVictory,
}

/// Side effect of a special reward, applied by the game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialEffect {
    /// One compromised opponent is eliminated.
    EliminateCompromised,
    /// The last sabotaged asset holder loses every asset it controls.
    StripSabotagedAssets,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum Reward {
    InstantWin { condition: VictoryCondition },
    IpBonus { amount: i32 },
    Special { ip_bonus: i32, effect: SpecialEffect },
    /// The player's alliance goes to a final showdown.
    AllianceWin,
}

/// Immutable definition of a master plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MasterPlan {
    pub id: PlanId,
    pub name: &'static str,
    pub description: &'static str,
    pub completion: CompletionType,
    pub reward: Reward,
}

pub const CATALOG: [MasterPlan; 10] = [
    MasterPlan {
        id: PlanId::ExposeAll,
        name: "Expose All Agents",
        description: "Use Exposure successfully on every active opponent in a single round",
        completion: CompletionType::SingleRound,
        reward: Reward::InstantWin {
            condition: VictoryCondition::IntelligenceSupremacy,
        },
    },
    MasterPlan {
        id: PlanId::ControlAllAssets,
        name: "Network Dominance",
        description: "Control all five Strategic Assets at the start of your turn",
        completion: CompletionType::AssetControl,
        reward: Reward::InstantWin {
            condition: VictoryCondition::NetworkControl,
        },
    },
    MasterPlan {
        id: PlanId::AnvilCarnage,
        name: "Anvil Carnage",
        description: "Land successful Assassination using Spring-Loaded Anvil on three different opponents in consecutive rounds",
        completion: CompletionType::ConsecutiveRounds,
        reward: Reward::Special {
            ip_bonus: 3,
            effect: SpecialEffect::EliminateCompromised,
        },
    },
    MasterPlan {
        id: PlanId::MisinformationMaster,
        name: "Mastermind of Misinformation",
        description: "Successfully trick three different opponents with Misinformation in a single round",
        completion: CompletionType::SingleRound,
        reward: Reward::IpBonus { amount: 4 },
    },
    MasterPlan {
        id: PlanId::SaboteurSupreme,
        name: "Saboteur Supreme",
        description: "Perform successful Sabotage on Strategic Assets three times in a row",
        completion: CompletionType::ConsecutiveRounds,
        reward: Reward::Special {
            ip_bonus: 5,
            effect: SpecialEffect::StripSabotagedAssets,
        },
    },
    MasterPlan {
        id: PlanId::GhostOperative,
        name: "Ghost Operative",
        description: "Complete 5 rounds without being targeted by any opponent",
        completion: CompletionType::Survival,
        reward: Reward::IpBonus { amount: 6 },
    },
    MasterPlan {
        id: PlanId::AllianceBreaker,
        name: "Alliance Breaker",
        description: "Successfully break 3 different alliances using Alliance Disruption",
        completion: CompletionType::Cumulative,
        reward: Reward::IpBonus { amount: 5 },
    },
    MasterPlan {
        id: PlanId::IntelCollector,
        name: "Intel Supremacist",
        description: "Collect 10 Intel Cards before any opponent reaches 8",
        completion: CompletionType::Race,
        reward: Reward::InstantWin {
            condition: VictoryCondition::IntelligenceSupremacy,
        },
    },
    MasterPlan {
        id: PlanId::CoordinatedElimination,
        name: "Coordinated Elimination",
        description: "Together with an ally, eliminate all non-allied agents in one round",
        completion: CompletionType::AllianceVictory,
        reward: Reward::AllianceWin,
    },
    MasterPlan {
        id: PlanId::AssetMonopoly,
        name: "Asset Monopoly",
        description: "Together with an ally, control all 5 Strategic Assets",
        completion: CompletionType::AllianceVictory,
        reward: Reward::AllianceWin,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_indexed_by_plan_id() {
        for (i, plan) in CATALOG.iter().enumerate() {
            assert_eq!(plan.id as usize, i);
            assert_eq!(plan.id.definition().id, plan.id);
        }
    }

    #[test]
    fn plan_ids_parse() {
        assert_eq!("ghost_operative".parse::<PlanId>(), Ok(PlanId::GhostOperative));
        assert_eq!(
            "world_domination".parse::<PlanId>(),
            Err(ParseError::UnknownPlan("world_domination".to_string()))
        );
    }

    #[test]
    fn alliance_plans_win_through_showdown() {
        for id in ALLIANCE_PLANS {
            assert_eq!(id.definition().reward, Reward::AllianceWin);
            assert_eq!(id.definition().completion, CompletionType::AllianceVictory);
        }
    }
}
