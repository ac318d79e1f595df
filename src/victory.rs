//! Victory conditions.
//!
//! Evaluated once per round, after resolution and round-end effects.
//! Master-plan instant wins short-circuit everything; then the last spy
//! standing, network control and intelligence supremacy are checked in that
//! order; finally a qualifying alliance triggers a final showdown.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::alliance::{AllianceEngine, AllianceVictory};
use crate::config::VictoryConfig;
use crate::game::{AssetLedger, Roster};
use crate::plan::{CompletionResult, PlanId, Reward};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VictoryCondition {
    LastSpyStanding,
    MutualElimination,
    NetworkControl,
    IntelligenceSupremacy,
    MissionCompletion,
    FinalShowdown,
}

impl VictoryCondition {
    pub const fn title(self) -> &'static str {
        match self {
            VictoryCondition::LastSpyStanding => "Last Spy Standing",
            VictoryCondition::MutualElimination => "Mutual Elimination",
            VictoryCondition::NetworkControl => "Network Control",
            VictoryCondition::IntelligenceSupremacy => "Intelligence Supremacy",
            VictoryCondition::MissionCompletion => "Mission Completion",
            VictoryCondition::FinalShowdown => "Final Showdown",
        }
    }
}

/// How a game ended. `winners` is empty for mutual elimination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VictoryResult {
    pub winners: Vec<String>,
    pub condition: VictoryCondition,
    /// Set for mission completions.
    pub plan: Option<PlanId>,
    pub description: String,
}

impl VictoryResult {
    fn single(winner: &str, condition: VictoryCondition, description: String) -> Self {
        VictoryResult {
            winners: vec![winner.to_string()],
            condition,
            plan: None,
            description,
        }
    }
}

/// Checks last spy standing, network control and intelligence supremacy.
pub fn check_victory_conditions(
    roster: &Roster,
    assets: &AssetLedger,
    config: &VictoryConfig,
) -> Option<VictoryResult> {
    let standing: Vec<_> = roster.standing().collect();
    match standing.as_slice() {
        [] => {
            return Some(VictoryResult {
                winners: Vec::new(),
                condition: VictoryCondition::MutualElimination,
                plan: None,
                description: "All spies have been eliminated - no winner!".to_string(),
            })
        }
        [last] => {
            return Some(VictoryResult::single(
                &last.codename,
                VictoryCondition::LastSpyStanding,
                format!("{} is the last spy standing!", last.codename),
            ))
        }
        _ => {}
    }

    for player in roster {
        let held = assets.count_held_by(&player.codename);
        if held >= config.network_control_assets {
            return Some(VictoryResult::single(
                &player.codename,
                VictoryCondition::NetworkControl,
                format!(
                    "{} controls {} strategic assets and wins by Network Control!",
                    player.codename, held
                ),
            ));
        }
    }

    let others = standing.len() - 1;
    for player in &standing {
        if player.intel.len() >= others * config.intel_supremacy_ratio {
            return Some(VictoryResult::single(
                &player.codename,
                VictoryCondition::IntelligenceSupremacy,
                format!(
                    "{} has gathered comprehensive intelligence and wins by Intelligence Supremacy!",
                    player.codename
                ),
            ));
        }
    }
    None
}

/// What the round's evaluation decided.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "verdict")]
pub enum Verdict {
    Continue,
    Victory(VictoryResult),
    Showdown(AllianceVictory),
}

/// Applies the full priority order for one round.
#[derive(Debug, Clone, Default)]
pub struct VictoryEvaluator {
    config: VictoryConfig,
}

impl VictoryEvaluator {
    pub fn new(config: VictoryConfig) -> Self {
        VictoryEvaluator { config }
    }

    /// The first master-plan completion this round that wins outright.
    pub fn instant_win(completions: &[CompletionResult]) -> Option<VictoryResult> {
        completions.iter().find_map(|c| match c.reward {
            Reward::InstantWin { condition } => Some(VictoryResult {
                winners: vec![c.codename.clone()],
                condition: VictoryCondition::MissionCompletion,
                plan: Some(c.plan),
                description: format!(
                    "{} completed {} and wins by {}!",
                    c.codename,
                    c.plan_name,
                    condition.title()
                ),
            }),
            _ => None,
        })
    }

    pub fn evaluate(
        &self,
        completions: &[CompletionResult],
        roster: &Roster,
        assets: &AssetLedger,
        alliances: &AllianceEngine,
    ) -> Verdict {
        let verdict = if let Some(win) = Self::instant_win(completions) {
            Verdict::Victory(win)
        } else if let Some(win) = check_victory_conditions(roster, assets, &self.config) {
            Verdict::Victory(win)
        } else if let Some(alliance_win) = alliances.check_alliance_victory(roster, assets) {
            Verdict::Showdown(alliance_win)
        } else {
            Verdict::Continue
        };
        if let Verdict::Victory(win) = &verdict {
            info!(condition = win.condition.title(), winners = ?win.winners, "victory");
        }
        verdict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alliance::AllianceKind;
    use crate::config::{AllianceConfig, ShowdownConfig};
    use crate::game::{Status, StrategicAsset, ALL_ASSETS};

    fn roster(names: &[&str]) -> Roster {
        Roster::with_codenames(names, 10).unwrap()
    }

    #[test]
    fn quiet_board_has_no_winner() {
        let r = roster(&["A", "B", "C"]);
        assert!(check_victory_conditions(&r, &AssetLedger::new(), &VictoryConfig::default()).is_none());
    }

    #[test]
    fn last_spy_standing() {
        let mut r = roster(&["A", "B", "C"]);
        r.get_mut("A").unwrap().status = Status::Captured;
        r.get_mut("C").unwrap().status = Status::Eliminated;
        let v = check_victory_conditions(&r, &AssetLedger::new(), &VictoryConfig::default()).unwrap();
        assert_eq!(v.condition, VictoryCondition::LastSpyStanding);
        assert_eq!(v.winners, vec!["B"]);
    }

    #[test]
    fn everyone_down_is_mutual_elimination() {
        let mut r = roster(&["A", "B"]);
        r.get_mut("A").unwrap().status = Status::Captured;
        r.get_mut("B").unwrap().status = Status::Eliminated;
        let v = check_victory_conditions(&r, &AssetLedger::new(), &VictoryConfig::default()).unwrap();
        assert_eq!(v.condition, VictoryCondition::MutualElimination);
        assert!(v.winners.is_empty());
    }

    #[test]
    fn last_spy_standing_beats_network_control() {
        let mut r = roster(&["A", "B"]);
        r.get_mut("B").unwrap().status = Status::Captured;
        let mut assets = AssetLedger::new();
        for asset in &ALL_ASSETS[..3] {
            assets.set_controller(*asset, Some("B".to_string()));
        }
        let v = check_victory_conditions(&r, &assets, &VictoryConfig::default()).unwrap();
        assert_eq!(v.condition, VictoryCondition::LastSpyStanding);
        assert_eq!(v.winners, vec!["A"]);
    }

    #[test]
    fn network_control_at_three_assets() {
        let r = roster(&["A", "B", "C"]);
        let mut assets = AssetLedger::new();
        assets.set_controller(StrategicAsset::CommTower, Some("C".to_string()));
        assets.set_controller(StrategicAsset::DataVault, Some("C".to_string()));
        assert!(check_victory_conditions(&r, &assets, &VictoryConfig::default()).is_none());
        assets.set_controller(StrategicAsset::CentralServer, Some("C".to_string()));
        let v = check_victory_conditions(&r, &assets, &VictoryConfig::default()).unwrap();
        assert_eq!(v.condition, VictoryCondition::NetworkControl);
        assert_eq!(v.winners, vec!["C"]);
    }

    #[test]
    fn intelligence_supremacy_scales_with_opponents() {
        let mut r = roster(&["A", "B", "C", "D"]);
        r.get_mut("D").unwrap().status = Status::Captured;
        r.get_mut("B").unwrap().intel = vec!["x".to_string(); 5];
        assert!(check_victory_conditions(&r, &AssetLedger::new(), &VictoryConfig::default()).is_none());
        r.get_mut("B").unwrap().intel.push("y".to_string());
        let v = check_victory_conditions(&r, &AssetLedger::new(), &VictoryConfig::default()).unwrap();
        assert_eq!(v.condition, VictoryCondition::IntelligenceSupremacy);
        assert_eq!(v.winners, vec!["B"]);
    }

    #[test]
    fn mission_completion_short_circuits() {
        let mut r = roster(&["A", "B"]);
        r.get_mut("B").unwrap().status = Status::Captured;
        let completion = CompletionResult {
            codename: "B".to_string(),
            plan: PlanId::IntelCollector,
            plan_name: "Intel Supremacist",
            reward: Reward::InstantWin {
                condition: VictoryCondition::IntelligenceSupremacy,
            },
            round: 3,
            targets: Vec::new(),
        };
        let alliances = AllianceEngine::new(AllianceConfig::default(), ShowdownConfig::default());
        let verdict = VictoryEvaluator::default().evaluate(
            &[completion],
            &r,
            &AssetLedger::new(),
            &alliances,
        );
        match verdict {
            Verdict::Victory(v) => {
                assert_eq!(v.condition, VictoryCondition::MissionCompletion);
                assert_eq!(v.plan, Some(PlanId::IntelCollector));
                assert_eq!(v.winners, vec!["B"]);
            }
            other => panic!("expected victory, got {:?}", other),
        }
    }

    #[test]
    fn alliance_victory_triggers_showdown() {
        let mut r = roster(&["A", "B", "C"]);
        r.get_mut("C").unwrap().status = Status::Captured;
        let mut alliances =
            AllianceEngine::new(AllianceConfig::default(), ShowdownConfig::default());
        alliances
            .create("A", "B", AllianceKind::CoordinatedOperation, 1)
            .unwrap();
        let verdict =
            VictoryEvaluator::default().evaluate(&[], &r, &AssetLedger::new(), &alliances);
        assert!(matches!(verdict, Verdict::Showdown(_)));
    }
}
