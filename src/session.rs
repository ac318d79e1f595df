//! Game session.
//!
//! Holds the mutable state of one game between rounds and sequences the
//! engine components: resolution, master-plan events and rewards, round-end
//! effects, alliance expiry, victory evaluation and the final showdown.

use std::collections::{HashMap, HashSet};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info};

use crate::alliance::{
    AllianceEngine, AllianceId, AllianceKind, AllianceSummary, BreakResult, ShowdownInit,
    ShowdownMove, ShowdownResult,
};
use crate::config::EngineConfig;
use crate::error::{EngineError, FormationRefusal};
use crate::game::{Action, AssetLedger, Defense, Offense, Roster, Status};
use crate::plan::{
    CompletionResult, MasterPlanEngine, PlanEvent, PlanId, PlanInfo, Reward, SpecialEffect,
};
use crate::resolve::{
    apply_round_end_effects, resolve_round, targeted_players, RoundEndReport, RoundResult,
};
use crate::victory::{Verdict, VictoryCondition, VictoryEvaluator, VictoryResult};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    Planning,
    FinalShowdown,
    GameOver,
}

impl GamePhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            GamePhase::Planning => "planning",
            GamePhase::FinalShowdown => "final_showdown",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Everything that happened while playing one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub round: u32,
    pub results: Vec<RoundResult>,
    pub completions: Vec<CompletionResult>,
    /// Alliances broken by successful alliance disruption.
    pub disrupted: Vec<BreakResult>,
    /// Absent when a master plan ended the game mid-round.
    pub round_end: Option<RoundEndReport>,
    pub expired_alliances: Vec<AllianceId>,
    pub verdict: Verdict,
    pub showdown: Option<ShowdownInit>,
}

/// One game of up to six spies.
pub struct Game<R: Rng = SmallRng> {
    round: u32,
    phase: GamePhase,
    roster: Roster,
    assets: AssetLedger,
    plans: MasterPlanEngine,
    alliances: AllianceEngine,
    evaluator: VictoryEvaluator,
    config: EngineConfig,
    /// First round in which a betrayer may ally again.
    cooldowns: HashMap<String, u32>,
    outcome: Option<VictoryResult>,
    rng: R,
}

impl Game<SmallRng> {
    /// Creates a game seeded from `seed` (0 uses entropy).
    pub fn new<S: AsRef<str>>(
        codenames: &[S],
        config: EngineConfig,
        seed: u64,
    ) -> Result<Self, EngineError> {
        let rng = if seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(seed)
        };
        Game::with_rng(codenames, config, rng)
    }
}

impl<R: Rng> Game<R> {
    /// Creates a game, dealing master plans and starting influence.
    pub fn with_rng<S: AsRef<str>>(
        codenames: &[S],
        config: EngineConfig,
        mut rng: R,
    ) -> Result<Self, EngineError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&codenames.len()) {
            return Err(EngineError::PlayerCount(codenames.len()));
        }
        config
            .validate()
            .map_err(|err| EngineError::InvalidConfig(err.to_string()))?;
        let mut roster = Roster::with_codenames(codenames, config.starting_influence)?;
        let mut plans = MasterPlanEngine::new();
        let assignments = plans.assign_master_plans(codenames, codenames.len(), &mut rng);
        for player in roster.iter_mut() {
            player.master_plan = assignments.get(&player.codename).copied();
        }
        info!(players = roster.len(), "game created");

        Ok(Game {
            round: 1,
            phase: GamePhase::Planning,
            roster,
            assets: AssetLedger::new(),
            plans,
            alliances: AllianceEngine::new(config.alliance.clone(), config.showdown.clone()),
            evaluator: VictoryEvaluator::new(config.victory.clone()),
            config,
            cooldowns: HashMap::new(),
            outcome: None,
            rng,
        })
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn assets(&self) -> &AssetLedger {
        &self.assets
    }

    pub fn alliances(&self) -> &AllianceEngine {
        &self.alliances
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// How the game ended, once it has.
    pub fn outcome(&self) -> Option<&VictoryResult> {
        self.outcome.as_ref()
    }

    pub fn plan_info(&self, codename: &str) -> Option<PlanInfo> {
        self.plans.plan_info(codename)
    }

    pub fn plan_of(&self, codename: &str) -> Option<PlanId> {
        self.plans.plan_of(codename)
    }

    pub fn alliance_summary(&self) -> AllianceSummary {
        self.alliances.summary()
    }

    /// Rounds before `codename` may ally again after a betrayal.
    pub fn cooldown_remaining(&self, codename: &str) -> u32 {
        self.cooldowns
            .get(codename)
            .map_or(0, |&until| until.saturating_sub(self.round))
    }

    fn require_phase(&self, phase: GamePhase) -> Result<(), EngineError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(EngineError::WrongPhase(self.phase.as_str()))
        }
    }

    /// Forms an alliance between two players, honoring betrayal cooldowns.
    pub fn propose_alliance(
        &mut self,
        initiator: &str,
        partner: &str,
        kind: AllianceKind,
    ) -> Result<AllianceId, EngineError> {
        self.require_phase(GamePhase::Planning)?;
        self.roster.require(initiator)?;
        self.roster.require(partner)?;
        for codename in [initiator, partner] {
            let rounds = self.cooldown_remaining(codename);
            if rounds > 0 {
                return Err(FormationRefusal::Cooldown {
                    codename: codename.to_string(),
                    rounds,
                }
                .into());
            }
        }

        let id = self.alliances.create(initiator, partner, kind, self.round)?;
        for codename in [initiator, partner] {
            self.roster.require_mut(codename)?.alliance_ids.push(id);
        }
        Ok(id)
    }

    /// `betrayer` walks out of alliance `id` and pays the betrayal penalty.
    pub fn betray(&mut self, id: AllianceId, betrayer: &str) -> Result<BreakResult, EngineError> {
        self.require_phase(GamePhase::Planning)?;
        match self.alliances.get(id) {
            Some(a) if a.is_member(betrayer) => {}
            _ => return Err(EngineError::UnknownAlliance(id.to_string())),
        }
        let result = self.alliances.break_alliance(id, Some(betrayer))?;
        if let Some(penalty) = &result.betrayal {
            let player = self.roster.require_mut(betrayer)?;
            player.adjust_influence(-penalty.ip_loss);
            player.status = penalty.status;
            self.cooldowns
                .insert(betrayer.to_string(), self.round + penalty.cooldown_rounds);
            info!(betrayer, %id, "alliance betrayed");
        }
        self.sync_alliance_tags();
        Ok(result)
    }

    /// Drops player alliance tags for alliances that no longer exist.
    fn sync_alliance_tags(&mut self) {
        let alliances = &self.alliances;
        for player in self.roster.iter_mut() {
            player.alliance_ids.retain(|id| alliances.get(*id).is_some());
        }
    }

    /// Default submission for an operational player who did not act.
    fn default_action() -> Action {
        Action {
            offense: Some(Offense::Surveillance),
            defense: Some(Defense::SafeHouse),
            ..Action::default()
        }
    }

    /// Plays one full round.
    ///
    /// Operational players missing from `actions` get a default submission
    /// with no target.
    pub fn play_round(
        &mut self,
        mut actions: HashMap<String, Action>,
    ) -> Result<RoundReport, EngineError> {
        self.require_phase(GamePhase::Planning)?;
        for player in self.roster.iter() {
            if player.status.is_operational() && !actions.contains_key(&player.codename) {
                actions.insert(player.codename.clone(), Self::default_action());
            }
        }

        let round = self.round;
        let holders: HashSet<String> = self
            .roster
            .iter()
            .filter(|p| self.assets.count_held_by(&p.codename) > 0)
            .map(|p| p.codename.clone())
            .collect();
        let targeted = targeted_players(&self.roster, &actions);

        let results = resolve_round(
            &mut self.roster,
            &actions,
            round,
            &mut self.assets,
            &self.config.turn,
            &mut self.rng,
        )?;

        let (completions, disrupted) = self.feed_plan_events(&results, &actions, &holders, &targeted, round);

        if let Some(win) = VictoryEvaluator::instant_win(&completions) {
            info!(winner = ?win.winners, "master plan ends the game");
            self.finish(win.clone());
            return Ok(RoundReport {
                round,
                results,
                completions,
                disrupted,
                round_end: None,
                expired_alliances: Vec::new(),
                verdict: Verdict::Victory(win),
                showdown: None,
            });
        }
        for completion in &completions {
            self.apply_reward(completion);
        }

        let round_end = apply_round_end_effects(
            &mut self.roster,
            &self.assets,
            &self.config.round_end,
            &mut self.rng,
        );
        let expired_alliances = self.alliances.process_round_end(round);
        self.sync_alliance_tags();

        let verdict = self
            .evaluator
            .evaluate(&[], &self.roster, &self.assets, &self.alliances);
        let mut completions = completions;
        let mut showdown = None;
        match &verdict {
            Verdict::Continue => self.round += 1,
            Verdict::Victory(win) => self.finish(win.clone()),
            Verdict::Showdown(alliance_win) => {
                let event = PlanEvent::AllianceVictory {
                    condition: alliance_win.condition,
                };
                for member in &alliance_win.members {
                    if let Some(done) = self.plans.update_progress(member, &event, round, &self.roster)
                    {
                        completions.push(done);
                    }
                }
                let init = self.alliances.start_final_showdown(&alliance_win.members)?;
                for member in &alliance_win.members {
                    self.roster.require_mut(member)?.adjust_influence(init.ip_bonus);
                }
                self.phase = GamePhase::FinalShowdown;
                showdown = Some(init);
            }
        }

        Ok(RoundReport {
            round,
            results,
            completions,
            disrupted,
            round_end: Some(round_end),
            expired_alliances,
            verdict,
            showdown,
        })
    }

    /// Turns resolved results into plan events and collects completions.
    fn feed_plan_events(
        &mut self,
        results: &[RoundResult],
        actions: &HashMap<String, Action>,
        holders: &HashSet<String>,
        targeted: &HashSet<String>,
        round: u32,
    ) -> (Vec<CompletionResult>, Vec<BreakResult>) {
        let mut completions = Vec::new();
        let mut disrupted = Vec::new();

        for result in results.iter().filter(|r| r.is_successful_attack()) {
            let (Some(offense), Some(target)) = (result.offense, result.counterpart.as_deref())
            else {
                continue;
            };
            let event = PlanEvent::OffenseSucceeded {
                offense,
                target: target.to_string(),
                gadget: actions.get(&result.codename).and_then(|a| a.gadget.clone()),
                target_holds_asset: holders.contains(target),
            };
            completions.extend(
                self.plans
                    .update_progress(&result.codename, &event, round, &self.roster),
            );

            if offense == Offense::AllianceDisruption {
                if let Some(id) = self.alliances.alliance_of(target).map(|a| a.id) {
                    if let Ok(broken) = self.alliances.break_alliance(id, None) {
                        debug!(attacker = %result.codename, %id, "alliance disrupted");
                        let event = PlanEvent::AllianceDisrupted { alliance: id };
                        completions.extend(self.plans.update_progress(
                            &result.codename,
                            &event,
                            round,
                            &self.roster,
                        ));
                        disrupted.push(broken);
                    }
                }
            }
        }
        if !disrupted.is_empty() {
            self.sync_alliance_tags();
        }

        for codename in self.roster.codenames() {
            let events = [
                PlanEvent::RoundSurvived {
                    targeted: targeted.contains(&codename),
                },
                PlanEvent::AssetsControlled {
                    count: self.assets.count_held_by(&codename),
                },
                PlanEvent::IntelCheck,
            ];
            for event in &events {
                completions.extend(self.plans.update_progress(&codename, event, round, &self.roster));
            }
        }
        (completions, disrupted)
    }

    /// Pays out non-winning plan rewards.
    fn apply_reward(&mut self, completion: &CompletionResult) {
        let (ip_bonus, effect) = match completion.reward {
            Reward::IpBonus { amount } => (amount, None),
            Reward::Special { ip_bonus, effect } => (ip_bonus, Some(effect)),
            Reward::InstantWin { .. } | Reward::AllianceWin => return,
        };
        if let Some(player) = self.roster.get_mut(&completion.codename) {
            player.adjust_influence(ip_bonus);
        }

        match effect {
            Some(SpecialEffect::EliminateCompromised) => {
                let candidates: Vec<String> = self
                    .roster
                    .iter()
                    .filter(|p| p.codename != completion.codename && p.status == Status::Compromised)
                    .map(|p| p.codename.clone())
                    .collect();
                if let Some(victim) = candidates.choose(&mut self.rng) {
                    if let Some(p) = self.roster.get_mut(victim) {
                        p.status = Status::Eliminated;
                        info!(victim = %victim, "eliminated by master plan reward");
                    }
                }
            }
            Some(SpecialEffect::StripSabotagedAssets) => {
                if let Some(target) = completion.targets.last() {
                    let released = self.assets.release_all(target);
                    info!(target = %target, released = released.len(), "assets stripped by master plan reward");
                }
            }
            None => {}
        }
    }

    fn finish(&mut self, result: VictoryResult) {
        info!(condition = result.condition.title(), winners = ?result.winners, "game over");
        self.outcome = Some(result);
        self.phase = GamePhase::GameOver;
    }

    /// Records a showdown move. Returns false for non-participants.
    pub fn submit_showdown_action(
        &mut self,
        codename: &str,
        chosen: ShowdownMove,
    ) -> Result<bool, EngineError> {
        self.require_phase(GamePhase::FinalShowdown)?;
        Ok(self.alliances.submit_showdown_action(codename, chosen))
    }

    /// True once both participants have chosen a move.
    pub fn showdown_ready(&self) -> bool {
        let showdown = self.alliances.showdown();
        showdown
            .participants()
            .map_or(false, |pair| pair.iter().all(|p| showdown.has_submitted(p)))
    }

    /// Resolves the showdown and ends the game.
    pub fn resolve_showdown(&mut self) -> Result<ShowdownResult, EngineError> {
        self.require_phase(GamePhase::FinalShowdown)?;
        let result = self
            .alliances
            .resolve_final_showdown(&self.roster, &mut self.rng)?;
        self.finish(VictoryResult {
            winners: vec![result.winner.clone()],
            condition: VictoryCondition::FinalShowdown,
            plan: None,
            description: result.description.clone(),
        });
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::StrategicAsset;
    use crate::plan::Progress;

    /// No random recovery or tag decay.
    fn quiet() -> EngineConfig {
        let mut config = EngineConfig::default();
        config.round_end.alliance_tag_decay = 0.0;
        config.round_end.recovery.captured_to_burned = 0.0;
        config.round_end.recovery.burned_to_compromised = 0.0;
        config
    }

    fn game(names: &[&str]) -> Game {
        Game::new(names, quiet(), 42).unwrap()
    }

    fn safe_all(g: &Game) -> HashMap<String, Action> {
        g.roster()
            .iter()
            .map(|p| (p.codename.clone(), Action::safe(Defense::SafeHouse)))
            .collect()
    }

    #[test]
    fn player_count_is_checked() {
        assert_eq!(
            Game::new(&["Solo"], EngineConfig::default(), 1).err(),
            Some(EngineError::PlayerCount(1))
        );
        let seven = ["A", "B", "C", "D", "E", "F", "G"];
        assert_eq!(
            Game::new(&seven, EngineConfig::default(), 1).err(),
            Some(EngineError::PlayerCount(7))
        );
    }

    #[test]
    fn out_of_range_probability_is_rejected() {
        let mut config = EngineConfig::default();
        config.turn.banner_penalty_chance = 1.5;
        assert!(matches!(
            Game::new(&["Falcon", "Owl"], config, 1).err(),
            Some(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn construction_deals_plans_and_starting_ip() {
        let g = game(&["Falcon", "Owl", "Raven"]);
        assert_eq!(g.round(), 1);
        assert_eq!(g.phase(), GamePhase::Planning);
        for p in g.roster() {
            assert_eq!(p.influence, 10);
            assert!(p.master_plan.is_some());
            assert_eq!(p.master_plan, g.plan_of(&p.codename));
        }
    }

    #[test]
    fn safe_round_advances() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        let report = g.play_round(safe_all(&g)).unwrap();
        assert_eq!(report.round, 1);
        assert_eq!(report.verdict, Verdict::Continue);
        assert_eq!(g.round(), 2);
        assert!(g.roster().iter().all(|p| p.influence == 11));
    }

    #[test]
    fn missing_players_get_default_surveillance() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        let report = g.play_round(HashMap::new()).unwrap();
        // Surveillance with no target produces no results and no safe turn.
        assert!(report.results.is_empty());
        assert!(g.roster().iter().all(|p| p.influence == 10));
    }

    #[test]
    fn betrayal_applies_penalty_and_cooldown() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        let id = g
            .propose_alliance("Falcon", "Owl", AllianceKind::NonAggression)
            .unwrap();
        assert_eq!(g.roster().get("Owl").unwrap().alliance_ids, vec![id]);

        let result = g.betray(id, "Falcon").unwrap();
        assert!(result.alliance.betrayed);
        let falcon = g.roster().get("Falcon").unwrap();
        assert_eq!(falcon.influence, 8);
        assert_eq!(falcon.status, Status::Compromised);
        assert!(g.roster().get("Owl").unwrap().alliance_ids.is_empty());

        assert_eq!(g.cooldown_remaining("Falcon"), 3);
        assert!(matches!(
            g.propose_alliance("Falcon", "Raven", AllianceKind::NonAggression),
            Err(EngineError::AllianceRefused(FormationRefusal::Cooldown { rounds: 3, .. }))
        ));
        assert!(g
            .propose_alliance("Owl", "Raven", AllianceKind::NonAggression)
            .is_ok());
    }

    #[test]
    fn cooldown_elapses_with_rounds() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        let id = g
            .propose_alliance("Falcon", "Owl", AllianceKind::NonAggression)
            .unwrap();
        g.betray(id, "Falcon").unwrap();
        for _ in 0..3 {
            let acts = safe_all(&g);
            g.play_round(acts).unwrap();
        }
        assert_eq!(g.cooldown_remaining("Falcon"), 0);
        assert!(g
            .propose_alliance("Falcon", "Raven", AllianceKind::NonAggression)
            .is_ok());
    }

    #[test]
    fn outsiders_cannot_betray() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        let id = g
            .propose_alliance("Falcon", "Owl", AllianceKind::NonAggression)
            .unwrap();
        assert_eq!(
            g.betray(id, "Raven").unwrap_err(),
            EngineError::UnknownAlliance(id.to_string())
        );
    }

    #[test]
    fn coordinated_elimination_leads_to_showdown_and_game_over() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        g.roster.get_mut("Raven").unwrap().status = Status::Captured;
        g.propose_alliance("Falcon", "Owl", AllianceKind::CoordinatedOperation)
            .unwrap();

        let report = g.play_round(safe_all(&g)).unwrap();
        assert!(matches!(report.verdict, Verdict::Showdown(_)));
        assert_eq!(g.phase(), GamePhase::FinalShowdown);
        let init = report.showdown.unwrap();
        assert_eq!(init.ip_bonus, 3);
        // safe turn, late-game survival and showdown bonus
        assert_eq!(g.roster().get("Falcon").unwrap().influence, 15);

        assert!(g.play_round(HashMap::new()).is_err());
        assert!(g.submit_showdown_action("Falcon", ShowdownMove::Sabotage).unwrap());
        assert!(!g.submit_showdown_action("Raven", ShowdownMove::Sabotage).unwrap());
        assert!(!g.showdown_ready());
        assert!(g.submit_showdown_action("Owl", ShowdownMove::Assassination).unwrap());
        assert!(g.showdown_ready());

        let result = g.resolve_showdown().unwrap();
        assert_eq!(g.phase(), GamePhase::GameOver);
        let outcome = g.outcome().unwrap();
        assert_eq!(outcome.condition, VictoryCondition::FinalShowdown);
        assert_eq!(outcome.winners, vec![result.winner]);
    }

    #[test]
    fn network_control_ends_the_game() {
        let mut g = game(&["Falcon", "Owl", "Raven"]);
        for asset in [
            StrategicAsset::CentralServer,
            StrategicAsset::CommTower,
            StrategicAsset::DataVault,
        ] {
            g.assets.set_controller(asset, Some("Raven".to_string()));
        }
        let report = g.play_round(safe_all(&g)).unwrap();
        match report.verdict {
            Verdict::Victory(v) => {
                assert_eq!(v.condition, VictoryCondition::NetworkControl);
                assert_eq!(v.winners, vec!["Raven"]);
            }
            other => panic!("expected victory, got {:?}", other),
        }
        assert_eq!(g.phase(), GamePhase::GameOver);
        assert_eq!(
            g.play_round(HashMap::new()).unwrap_err(),
            EngineError::WrongPhase("game_over")
        );
    }

    #[test]
    fn alliance_disruption_breaks_target_alliance() {
        let mut g = game(&["Falcon", "Owl", "Raven", "Crow"]);
        let id = g
            .propose_alliance("Owl", "Raven", AllianceKind::NonAggression)
            .unwrap();
        let mut acts = safe_all(&g);
        acts.insert(
            "Falcon".to_string(),
            Action::attack(Offense::AllianceDisruption, "Owl").with_defense(Defense::SafeHouse),
        );
        acts.insert("Owl".to_string(), Action::safe(Defense::AllianceBuilding));

        let report = g.play_round(acts).unwrap();
        assert_eq!(report.disrupted.len(), 1);
        assert_eq!(report.disrupted[0].alliance.id, id);
        assert!(g.alliances().get(id).is_none());
        assert!(g.roster().get("Raven").unwrap().alliance_ids.is_empty());
    }

    #[test]
    fn ignored_attacks_do_not_break_a_ghost_streak() {
        let names = ["Falcon", "Owl", "Raven"];
        let mut g = (1..1000u64)
            .map(|seed| Game::new(&names, quiet(), seed).unwrap())
            .find(|g| g.plan_of("Falcon") == Some(PlanId::GhostOperative))
            .expect("some seed deals ghost_operative");
        g.roster.get_mut("Raven").unwrap().status = Status::Eliminated;

        let mut acts = safe_all(&g);
        acts.insert(
            "Falcon".to_string(),
            Action::attack(Offense::Surveillance, "Falcon"),
        );
        acts.insert(
            "Raven".to_string(),
            Action::attack(Offense::Assassination, "Falcon"),
        );
        g.play_round(acts).unwrap();

        match g.plan_info("Falcon").unwrap().progress {
            Progress::Survival { streak, .. } => assert_eq!(streak, 1),
            other => panic!("unexpected progress {:?}", other),
        }
    }
}
