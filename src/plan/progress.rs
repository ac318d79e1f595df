//! Per-player plan progress and the events that advance it.

use serde::{Deserialize, Serialize};

use super::catalog::{CompletionType, PlanId};
use crate::alliance::{AllianceCondition, AllianceId};
use crate::game::{Offense, Roster};

/// Anvil kills needed for Anvil Carnage.
pub const ANVIL_KILLS: u32 = 3;
/// Gadget that qualifies an assassination for Anvil Carnage.
pub const SPRING_ANVIL: &str = "spring_anvil";
pub const MISINFORMATION_TARGETS: usize = 3;
pub const SABOTAGE_STREAK: u32 = 3;
pub const GHOST_ROUNDS: u32 = 5;
pub const ALLIANCES_TO_BREAK: usize = 3;
pub const INTEL_TARGET: usize = 10;
/// An opponent reaching this many intel cards first loses the race.
pub const INTEL_RIVAL_LIMIT: usize = 8;
pub const MONOPOLY_ASSETS: usize = 5;

/// Something that happened to a player this round that plans care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum PlanEvent {
    OffenseSucceeded {
        offense: Offense,
        target: String,
        gadget: Option<String>,
        /// The target controlled at least one asset when the round began.
        target_holds_asset: bool,
    },
    AssetsControlled {
        count: usize,
    },
    RoundSurvived {
        targeted: bool,
    },
    AllianceDisrupted {
        alliance: AllianceId,
    },
    /// Re-check intel counts across the roster.
    IntelCheck,
    AllianceVictory {
        condition: AllianceCondition,
    },
}

/// Tracking state, shaped by the plan's completion type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Progress {
    SingleRound {
        round: u32,
        targets: Vec<String>,
    },
    AssetControl {
        controlled: usize,
    },
    Streak {
        count: u32,
        last_round: u32,
        targets: Vec<String>,
    },
    Survival {
        streak: u32,
        last_round: u32,
    },
    Cumulative {
        alliances: Vec<AllianceId>,
    },
    Race {
        intel: usize,
        lost: bool,
    },
    AllianceVictory {
        achieved: Option<AllianceCondition>,
    },
}

impl Progress {
    /// Fresh progress for a plan.
    pub fn new(plan: PlanId) -> Self {
        match plan.definition().completion {
            CompletionType::SingleRound => Progress::SingleRound {
                round: 0,
                targets: Vec::new(),
            },
            CompletionType::AssetControl => Progress::AssetControl { controlled: 0 },
            CompletionType::ConsecutiveRounds => Progress::Streak {
                count: 0,
                last_round: 0,
                targets: Vec::new(),
            },
            CompletionType::Survival => Progress::Survival {
                streak: 0,
                last_round: 0,
            },
            CompletionType::Cumulative => Progress::Cumulative {
                alliances: Vec::new(),
            },
            CompletionType::Race => Progress::Race {
                intel: 0,
                lost: false,
            },
            CompletionType::AllianceVictory => Progress::AllianceVictory { achieved: None },
        }
    }
}

/// Outcome of feeding one event into a plan's progress.
pub(crate) enum Step {
    Pending,
    /// Completed; carries the targets that counted towards it.
    Complete(Vec<String>),
}

/// Advances `progress` for `plan` and reports whether it just completed.
pub(crate) fn advance(
    plan: PlanId,
    progress: &mut Progress,
    codename: &str,
    event: &PlanEvent,
    round: u32,
    roster: &Roster,
) -> Step {
    match (plan, progress) {
        (PlanId::ExposeAll, Progress::SingleRound { round: r, targets }) => {
            reset_on_new_round(r, targets, round);
            if let PlanEvent::OffenseSucceeded {
                offense: Offense::Exposure,
                target,
                ..
            } = event
            {
                add_distinct(targets, target);
            }
            // Exposed targets stop being operational, so count them explicitly.
            let uncovered = roster
                .iter()
                .filter(|p| p.codename != codename && p.status.is_operational())
                .any(|p| !targets.contains(&p.codename));
            if !targets.is_empty() && !uncovered {
                Step::Complete(targets.clone())
            } else {
                Step::Pending
            }
        }
        (PlanId::MisinformationMaster, Progress::SingleRound { round: r, targets }) => {
            reset_on_new_round(r, targets, round);
            if let PlanEvent::OffenseSucceeded {
                offense: Offense::Misinformation,
                target,
                ..
            } = event
            {
                add_distinct(targets, target);
            }
            if targets.len() >= MISINFORMATION_TARGETS {
                Step::Complete(targets.clone())
            } else {
                Step::Pending
            }
        }
        (PlanId::ControlAllAssets, Progress::AssetControl { controlled }) => {
            if let PlanEvent::AssetsControlled { count } = event {
                *controlled = *count;
            }
            if *controlled >= MONOPOLY_ASSETS {
                Step::Complete(Vec::new())
            } else {
                Step::Pending
            }
        }
        (
            PlanId::AnvilCarnage,
            Progress::Streak {
                count,
                last_round,
                targets,
            },
        ) => match event {
            PlanEvent::OffenseSucceeded {
                offense: Offense::Assassination,
                target,
                gadget: Some(gadget),
                ..
            } if gadget == SPRING_ANVIL => {
                let repeat = targets.contains(target);
                if *count == 0 || *last_round + 1 == round {
                    if repeat {
                        return Step::Pending;
                    }
                    *count += 1;
                    *last_round = round;
                    targets.push(target.clone());
                } else if repeat {
                    *count = 0;
                    *last_round = round;
                    targets.clear();
                } else {
                    *count = 1;
                    *last_round = round;
                    targets.clear();
                    targets.push(target.clone());
                }
                if *count >= ANVIL_KILLS {
                    Step::Complete(targets.clone())
                } else {
                    Step::Pending
                }
            }
            _ => Step::Pending,
        },
        (
            PlanId::SaboteurSupreme,
            Progress::Streak {
                count,
                last_round,
                targets,
            },
        ) => match event {
            PlanEvent::OffenseSucceeded {
                offense: Offense::Sabotage,
                target,
                target_holds_asset: true,
                ..
            } => {
                if *count > 0 && *last_round == round {
                    return Step::Pending;
                }
                if *count == 0 || *last_round + 1 == round {
                    *count += 1;
                } else {
                    *count = 1;
                    targets.clear();
                }
                *last_round = round;
                targets.push(target.clone());
                if *count >= SABOTAGE_STREAK {
                    Step::Complete(targets.clone())
                } else {
                    Step::Pending
                }
            }
            _ => Step::Pending,
        },
        (PlanId::GhostOperative, Progress::Survival { streak, last_round }) => match event {
            PlanEvent::RoundSurvived { targeted } => {
                if *targeted {
                    *streak = 0;
                } else if *last_round != round {
                    *streak += 1;
                }
                *last_round = round;
                if *streak >= GHOST_ROUNDS {
                    Step::Complete(Vec::new())
                } else {
                    Step::Pending
                }
            }
            _ => Step::Pending,
        },
        (PlanId::AllianceBreaker, Progress::Cumulative { alliances }) => match event {
            PlanEvent::AllianceDisrupted { alliance } => {
                if !alliances.contains(alliance) {
                    alliances.push(*alliance);
                }
                if alliances.len() >= ALLIANCES_TO_BREAK {
                    Step::Complete(Vec::new())
                } else {
                    Step::Pending
                }
            }
            _ => Step::Pending,
        },
        (PlanId::IntelCollector, Progress::Race { intel, lost }) => {
            if *lost {
                return Step::Pending;
            }
            *intel = roster.get(codename).map_or(0, |p| p.intel.len());
            let rival_best = roster
                .iter()
                .filter(|p| p.codename != codename)
                .map(|p| p.intel.len())
                .max()
                .unwrap_or(0);
            if rival_best >= INTEL_RIVAL_LIMIT {
                *lost = true;
                Step::Pending
            } else if *intel >= INTEL_TARGET {
                Step::Complete(Vec::new())
            } else {
                Step::Pending
            }
        }
        (
            PlanId::CoordinatedElimination | PlanId::AssetMonopoly,
            Progress::AllianceVictory { achieved },
        ) => match event {
            PlanEvent::AllianceVictory { condition } if condition_matches(plan, *condition) => {
                *achieved = Some(*condition);
                Step::Complete(Vec::new())
            }
            _ => Step::Pending,
        },
        _ => Step::Pending,
    }
}

fn condition_matches(plan: PlanId, condition: AllianceCondition) -> bool {
    matches!(
        (plan, condition),
        (PlanId::CoordinatedElimination, AllianceCondition::CoordinatedElimination)
            | (PlanId::AssetMonopoly, AllianceCondition::AssetMonopoly)
    )
}

fn reset_on_new_round(current: &mut u32, targets: &mut Vec<String>, round: u32) {
    if *current != round {
        *current = round;
        targets.clear();
    }
}

fn add_distinct(targets: &mut Vec<String>, target: &str) {
    if !targets.iter().any(|t| t == target) {
        targets.push(target.to_string());
    }
}
