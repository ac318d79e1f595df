//! Plan assignment and progress tracking for one game.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use super::catalog::{MasterPlan, PlanId, Reward, ALLIANCE_PLANS, BASE_PLANS};
use super::progress::{advance, PlanEvent, Progress, Step};
use crate::game::Roster;

/// A player's assigned plan and how far along it is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerPlan {
    pub plan: PlanId,
    pub progress: Progress,
    pub completed: bool,
}

/// Reported once when a plan completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub codename: String,
    pub plan: PlanId,
    pub plan_name: &'static str,
    pub reward: Reward,
    pub round: u32,
    /// Opponents whose defeat counted towards the plan, oldest first.
    pub targets: Vec<String>,
}

/// A plan definition together with a player's progress on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanInfo {
    pub definition: MasterPlan,
    pub progress: Progress,
    pub completed: bool,
}

/// Tracks master plans for every player in one game.
#[derive(Debug, Clone, Default)]
pub struct MasterPlanEngine {
    plans: HashMap<String, PlayerPlan>,
    completed: Vec<CompletionResult>,
}

/// The plans that may be dealt in a game of `player_count`.
pub fn eligible_plans(player_count: usize) -> Vec<PlanId> {
    let mut pool = BASE_PLANS.to_vec();
    if player_count == 6 {
        pool.extend_from_slice(&ALLIANCE_PLANS);
    }
    if player_count == 2 {
        pool.retain(|p| !p.needs_alliances());
    }
    pool
}

impl MasterPlanEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deals one plan per codename without duplicates while the eligible
    /// pool lasts; later players draw from the base pool with replacement.
    pub fn assign_master_plans<S, R>(
        &mut self,
        codenames: &[S],
        player_count: usize,
        rng: &mut R,
    ) -> HashMap<String, PlanId>
    where
        S: AsRef<str>,
        R: Rng + ?Sized,
    {
        let mut pool = eligible_plans(player_count);
        pool.shuffle(rng);
        let fallback: Vec<PlanId> = BASE_PLANS
            .iter()
            .copied()
            .filter(|p| player_count != 2 || !p.needs_alliances())
            .collect();

        let mut assignments = HashMap::with_capacity(codenames.len());
        for (i, codename) in codenames.iter().enumerate() {
            let plan = match pool.get(i) {
                Some(&p) => p,
                None => *fallback.choose(rng).unwrap_or(&PlanId::GhostOperative),
            };
            let codename = codename.as_ref().to_string();
            debug!(codename = %codename, %plan, "master plan assigned");
            self.plans.insert(
                codename.clone(),
                PlayerPlan {
                    plan,
                    progress: Progress::new(plan),
                    completed: false,
                },
            );
            assignments.insert(codename, plan);
        }
        assignments
    }

    /// Feeds an event into `codename`'s plan.
    ///
    /// Returns the completion exactly once; afterwards the plan is frozen and
    /// further updates are ignored.
    pub fn update_progress(
        &mut self,
        codename: &str,
        event: &PlanEvent,
        round: u32,
        roster: &Roster,
    ) -> Option<CompletionResult> {
        let entry = self.plans.get_mut(codename)?;
        if entry.completed {
            return None;
        }
        let targets = match advance(entry.plan, &mut entry.progress, codename, event, round, roster) {
            Step::Pending => return None,
            Step::Complete(targets) => targets,
        };
        entry.completed = true;

        let definition = entry.plan.definition();
        let result = CompletionResult {
            codename: codename.to_string(),
            plan: entry.plan,
            plan_name: definition.name,
            reward: definition.reward,
            round,
            targets,
        };
        info!(codename, plan = %result.plan, round, "master plan completed");
        self.completed.push(result.clone());
        Some(result)
    }

    pub fn plan_of(&self, codename: &str) -> Option<PlanId> {
        self.plans.get(codename).map(|p| p.plan)
    }

    /// Definition and progress of `codename`'s plan.
    pub fn plan_info(&self, codename: &str) -> Option<PlanInfo> {
        self.plans.get(codename).map(|p| PlanInfo {
            definition: *p.plan.definition(),
            progress: p.progress.clone(),
            completed: p.completed,
        })
    }

    /// Every completion so far, in order.
    pub fn completions(&self) -> &[CompletionResult] {
        &self.completed
    }
}
