//! Round resolution.
//!
//! Applies one round of simultaneous actions to the roster. Phases run in
//! a fixed order: banners, safe turns, then offenses grouped by target.
//! Within a target, attackers resolve by IP spend (highest first) and then
//! by codename, so the outcome depends only on the submissions and the
//! injected generator.

use std::collections::{HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::TurnConfig;
use crate::error::EngineError;
use crate::game::{Action, AssetLedger, Defense, Offense, Roster, Status, StrategicAsset};
use crate::interaction::{default_outcome, resolve_interaction, AudioCue, Outcome};

/// What produced a [`RoundResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultKind {
    Banner,
    SafeTurn,
    FailedAttack,
    Attack,
    Defense,
}

/// One line of the round report, addressed to `codename`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundResult {
    pub codename: String,
    pub kind: ResultKind,
    /// Target of an attack, or attacker of a defense.
    pub counterpart: Option<String>,
    pub offense: Option<Offense>,
    pub defense: Option<Defense>,
    /// For attacks: the offense landed. For defenses: the defense held.
    pub success: Option<bool>,
    pub ip_delta: i32,
    pub new_ip: i32,
    pub new_status: Status,
    pub intel_gained: Vec<String>,
    pub audio: Option<AudioCue>,
    pub captured_asset: Option<StrategicAsset>,
    pub description: String,
}

impl RoundResult {
    fn plain(codename: &str, kind: ResultKind, roster: &Roster, delta: i32, description: String) -> Self {
        let (new_ip, new_status) = match roster.get(codename) {
            Some(p) => (p.influence, p.status),
            None => (0, Status::Active),
        };
        RoundResult {
            codename: codename.to_string(),
            kind,
            counterpart: None,
            offense: None,
            defense: None,
            success: None,
            ip_delta: delta,
            new_ip,
            new_status,
            intel_gained: Vec::new(),
            audio: None,
            captured_asset: None,
            description,
        }
    }

    /// True for an attack result whose offense landed.
    pub fn is_successful_attack(&self) -> bool {
        self.kind == ResultKind::Attack && self.success == Some(true)
    }
}

/// Rejects action maps that break caller contracts before anything mutates.
fn validate_actions(roster: &Roster, actions: &HashMap<String, Action>) -> Result<(), EngineError> {
    for (codename, action) in actions {
        let player = roster.require(codename)?;
        if action.spend() > player.influence.max(0) {
            return Err(EngineError::SpendExceedsInfluence {
                codename: codename.clone(),
                spend: action.ip_spend,
                influence: player.influence,
            });
        }
    }
    Ok(())
}

/// Submissions in roster order. Players without an action are skipped.
fn ordered_actions<'a>(
    roster: &Roster,
    actions: &'a HashMap<String, Action>,
) -> Vec<(&'a str, &'a Action)> {
    roster
        .iter()
        .filter_map(|p| {
            actions
                .get_key_value(&p.codename)
                .map(|(k, a)| (k.as_str(), a))
        })
        .collect()
}

/// Target of a submission that resolves as an attack. Self-targets and
/// unknown targets are dropped.
fn attack_target<'a>(roster: &Roster, codename: &str, action: &'a Action) -> Option<&'a str> {
    match (action.offense, action.target.as_deref()) {
        (Some(_), Some(t)) if t != codename && roster.contains(t) => Some(t),
        _ => None,
    }
}

/// Players facing at least one attack from a player still in the game.
pub fn targeted_players(roster: &Roster, actions: &HashMap<String, Action>) -> HashSet<String> {
    ordered_actions(roster, actions)
        .into_iter()
        .filter(|(codename, _)| roster.get(codename).is_some_and(|p| !p.is_terminal()))
        .filter_map(|(codename, action)| attack_target(roster, codename, action))
        .map(str::to_string)
        .collect()
}

/// Flags attackers of information-warfare broadcasters as distracted.
///
/// A banner is emitted for every broadcaster with at least one attacker;
/// only banners whose text contains the configured keyword distract.
fn banner_phase(
    roster: &Roster,
    submissions: &[(&str, &Action)],
    config: &TurnConfig,
    results: &mut Vec<RoundResult>,
) -> HashSet<String> {
    let mut distracted = HashSet::new();
    let keyword = config.banner_keyword.to_uppercase();

    for &(broadcaster, action) in submissions {
        if action.effective_defense() != Defense::InformationWarfare {
            continue;
        }
        let message = action
            .banner_message
            .as_deref()
            .unwrap_or(&config.default_banner);

        let affected: Vec<&str> = submissions
            .iter()
            .filter(|&&(c, a)| attack_target(roster, c, a) == Some(broadcaster))
            .map(|&(c, _)| c)
            .collect();
        if affected.is_empty() {
            continue;
        }

        if message.to_uppercase().contains(&keyword) {
            distracted.extend(affected.iter().map(|c| c.to_string()));
        }
        debug!(broadcaster, message, affected = affected.len(), "banner displayed");
        results.push(RoundResult::plain(
            broadcaster,
            ResultKind::Banner,
            roster,
            0,
            format!(
                "Banner displayed: \"{}\" - affected {} attackers",
                message,
                affected.len()
            ),
        ));
    }
    distracted
}

/// Gives a random unowned asset to `codename` along with the capture bonus.
fn capture_asset<R: Rng + ?Sized>(
    codename: &str,
    roster: &mut Roster,
    assets: &mut AssetLedger,
    bonus: i32,
    rng: &mut R,
) -> Option<StrategicAsset> {
    let asset = *assets.unowned().choose(rng)?;
    assets.set_controller(asset, Some(codename.to_string()));
    if let Some(player) = roster.get_mut(codename) {
        player.adjust_influence(bonus);
    }
    debug!(codename, %asset, "strategic asset captured");
    Some(asset)
}

/// Resolves one round of actions against the roster and asset ledger.
///
/// Mutates players and assets in place and returns the ordered results.
/// Fails without mutating anything when an action belongs to an unknown
/// player or spends more IP than its submitter holds.
pub fn resolve_round<R: Rng + ?Sized>(
    roster: &mut Roster,
    actions: &HashMap<String, Action>,
    round: u32,
    assets: &mut AssetLedger,
    config: &TurnConfig,
    rng: &mut R,
) -> Result<Vec<RoundResult>, EngineError> {
    validate_actions(roster, actions)?;
    let submissions = ordered_actions(roster, actions);
    let mut results = Vec::new();

    let distracted = banner_phase(roster, &submissions, config, &mut results);

    for &(codename, action) in &submissions {
        if action.offense.is_some() {
            continue;
        }
        let player = roster.require_mut(codename)?;
        player.adjust_influence(config.safe_turn_gain);
        results.push(RoundResult::plain(
            codename,
            ResultKind::SafeTurn,
            roster,
            config.safe_turn_gain,
            format!("Safe turn - gained {} IP", config.safe_turn_gain),
        ));
    }

    // Group by target in first-seen order.
    let mut groups: Vec<(&str, Vec<(&str, &Action)>)> = Vec::new();
    for &(codename, action) in &submissions {
        let Some(target) = attack_target(roster, codename, action) else {
            continue;
        };
        match groups.iter_mut().find(|(t, _)| *t == target) {
            Some((_, attackers)) => attackers.push((codename, action)),
            None => groups.push((target, vec![(codename, action)])),
        }
    }

    for (target, mut attackers) in groups {
        attackers.sort_by(|a, b| b.1.ip_spend.cmp(&a.1.ip_spend).then_with(|| a.0.cmp(b.0)));

        let target_status = roster.require(target)?.status;
        if target_status.is_terminal() {
            for &(attacker, _) in &attackers {
                results.push(RoundResult::plain(
                    attacker,
                    ResultKind::FailedAttack,
                    roster,
                    0,
                    format!("Cannot attack {} - {}", target, target_status),
                ));
            }
            continue;
        }

        let target_action = actions.get(target);
        let defense = target_action.map(Action::effective_defense).unwrap_or_default();
        let defender_spend = target_action.map(Action::spend).unwrap_or(0);
        let mut paired = false;

        for &(attacker, action) in &attackers {
            if roster.require(attacker)?.is_terminal() {
                continue;
            }
            let offense = match action.offense {
                Some(o) => o,
                None => continue,
            };

            let mut outcome: Outcome =
                resolve_interaction(offense, defense, action.spend(), defender_spend);
            if outcome.succeeds
                && distracted.contains(attacker)
                && rng.gen_bool(config.banner_penalty_chance)
            {
                outcome = default_outcome(offense, "Default");
                outcome.description.push_str(" (Distracted by banner!)");
            }

            let attacker_ip = {
                let p = roster.require_mut(attacker)?;
                p.adjust_influence(outcome.attacker_delta);
                if let Some(status) = outcome.attacker_status {
                    p.status = status;
                }
                p.intel.extend(outcome.attacker_intel.iter().cloned());
                p.influence
            };
            {
                let t = roster.require_mut(target)?;
                t.adjust_influence(outcome.defender_delta);
                if let Some(status) = outcome.defender_status {
                    t.status = status;
                }
                t.intel.extend(outcome.defender_intel.iter().cloned());
            }

            let mut ip_delta = outcome.attacker_delta;
            let mut captured = None;
            if offense == Offense::NetworkAttack && outcome.succeeds {
                captured = capture_asset(attacker, roster, assets, config.capture_bonus, rng);
                if let Some(asset) = captured {
                    ip_delta += config.capture_bonus;
                    outcome.description.push_str(&format!(" Captured {}!", asset));
                }
            }
            debug!(
                round,
                attacker,
                target,
                %offense,
                %defense,
                succeeds = outcome.succeeds,
                attacker_ip,
                "attack resolved"
            );

            let attacker_state = roster.require(attacker)?;
            results.push(RoundResult {
                codename: attacker.to_string(),
                kind: ResultKind::Attack,
                counterpart: Some(target.to_string()),
                offense: Some(offense),
                defense: Some(defense),
                success: Some(outcome.succeeds),
                ip_delta,
                new_ip: attacker_state.influence,
                new_status: attacker_state.status,
                intel_gained: outcome.attacker_intel.clone(),
                audio: outcome.audio,
                captured_asset: captured,
                description: outcome.description.clone(),
            });

            if !paired {
                paired = true;
                let target_state = roster.require(target)?;
                results.push(RoundResult {
                    codename: target.to_string(),
                    kind: ResultKind::Defense,
                    counterpart: Some(attacker.to_string()),
                    offense: Some(offense),
                    defense: Some(defense),
                    success: Some(!outcome.succeeds),
                    ip_delta: outcome.defender_delta,
                    new_ip: target_state.influence,
                    new_status: target_state.status,
                    intel_gained: outcome.defender_intel,
                    audio: None,
                    captured_asset: None,
                    description: format!("Defended against {} with {}", offense, defense),
                });
            }
        }
    }

    Ok(results)
}
