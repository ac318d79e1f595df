//! End-of-round effects.
//!
//! Runs after every resolved round: asset yields, gadget upkeep, status
//! recovery, alliance-tag decay and the late-game survival bonus, in that
//! order.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::alliance::AllianceId;
use crate::config::RoundEndConfig;
use crate::game::{AssetLedger, Roster, Status};

/// Gadget upkeep charged to one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpkeepCharge {
    pub codename: String,
    pub paid: i32,
    /// Gadgets dropped because the player could not cover their upkeep.
    pub evicted: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub codename: String,
    pub from: Status,
    pub to: Status,
}

/// Everything the round-end pass changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundEndReport {
    pub asset_yields: Vec<(String, i32)>,
    pub upkeep: Vec<UpkeepCharge>,
    pub status_changes: Vec<StatusChange>,
    pub dropped_alliance_tags: Vec<(String, AllianceId)>,
    pub survival_bonus: Vec<String>,
}

/// Applies round-end effects to the roster in place.
pub fn apply_round_end_effects<R: Rng + ?Sized>(
    roster: &mut Roster,
    assets: &AssetLedger,
    config: &RoundEndConfig,
    rng: &mut R,
) -> RoundEndReport {
    let mut report = RoundEndReport::default();

    for (_, controller) in assets.iter() {
        let Some(codename) = controller else { continue };
        if let Some(player) = roster.get_mut(codename) {
            if player.is_terminal() {
                continue;
            }
            player.adjust_influence(config.asset_yield);
            match report.asset_yields.iter_mut().find(|(c, _)| c == codename) {
                Some((_, total)) => *total += config.asset_yield,
                None => report
                    .asset_yields
                    .push((codename.to_string(), config.asset_yield)),
            }
        }
    }

    if config.gadget_upkeep > 0 {
        for player in roster.iter_mut() {
            if player.gadgets.is_empty() {
                continue;
            }
            let cost = player.gadgets.len() as i32 * config.gadget_upkeep;
            let charge = if player.influence >= cost {
                player.adjust_influence(-cost);
                UpkeepCharge {
                    codename: player.codename.clone(),
                    paid: cost,
                    evicted: Vec::new(),
                }
            } else {
                // Keep the newest gadgets the player can still afford.
                let affordable = (player.influence.max(0) / config.gadget_upkeep) as usize;
                let evict = player.gadgets.len() - affordable;
                let evicted: Vec<String> = player.gadgets.drain(..evict).collect();
                let paid = affordable as i32 * config.gadget_upkeep;
                player.adjust_influence(-paid);
                UpkeepCharge {
                    codename: player.codename.clone(),
                    paid,
                    evicted,
                }
            };
            debug!(codename = %charge.codename, paid = charge.paid, evicted = charge.evicted.len(), "gadget upkeep");
            report.upkeep.push(charge);
        }
    }

    let recovery = &config.recovery;
    for player in roster.iter_mut() {
        let from = player.status;
        let to = match from {
            Status::Captured if rng.gen_bool(recovery.captured_to_burned) => Status::Burned,
            Status::Burned if rng.gen_bool(recovery.burned_to_compromised) => Status::Compromised,
            Status::Compromised if player.influence >= recovery.compromised_recovery_ip => {
                Status::Active
            }
            _ => continue,
        };
        player.status = to;
        report.status_changes.push(StatusChange {
            codename: player.codename.clone(),
            from,
            to,
        });
    }

    for player in roster.iter_mut() {
        let codename = player.codename.clone();
        player.alliance_ids.retain(|id| {
            let dropped = rng.gen_bool(config.alliance_tag_decay);
            if dropped {
                report.dropped_alliance_tags.push((codename.clone(), *id));
            }
            !dropped
        });
    }

    if roster.standing_count() <= config.late_game_threshold {
        for player in roster.iter_mut().filter(|p| !p.is_terminal()) {
            player.adjust_influence(config.late_game_bonus);
            report.survival_bonus.push(player.codename.clone());
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Player, StrategicAsset};
    use rand::rngs::mock::StepRng;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quiet() -> RoundEndConfig {
        RoundEndConfig {
            alliance_tag_decay: 0.0,
            late_game_threshold: 0,
            ..RoundEndConfig::default()
        }
    }

    fn roster(names: &[&str]) -> Roster {
        Roster::with_codenames(names, 10).unwrap()
    }

    #[test]
    fn assets_yield_to_standing_controllers_only() {
        let mut r = roster(&["Falcon", "Owl", "Raven"]);
        r.get_mut("Owl").unwrap().status = Status::Captured;
        let mut assets = AssetLedger::new();
        assets.set_controller(StrategicAsset::CommTower, Some("Falcon".to_string()));
        assets.set_controller(StrategicAsset::DataVault, Some("Falcon".to_string()));
        assets.set_controller(StrategicAsset::CentralServer, Some("Owl".to_string()));

        let config = RoundEndConfig {
            recovery: crate::config::StatusRecovery {
                captured_to_burned: 0.0,
                ..Default::default()
            },
            ..quiet()
        };
        let report =
            apply_round_end_effects(&mut r, &assets, &config, &mut SmallRng::seed_from_u64(1));
        assert_eq!(r.get("Falcon").unwrap().influence, 14);
        assert_eq!(r.get("Owl").unwrap().influence, 10);
        assert_eq!(report.asset_yields, vec![("Falcon".to_string(), 4)]);
    }

    #[test]
    fn upkeep_evicts_oldest_gadgets_when_short() {
        let mut p = Player::new("Falcon", 2);
        p.gadgets = vec!["a".into(), "b".into(), "c".into()];
        let mut r = Roster::new(vec![p]).unwrap();
        let report = apply_round_end_effects(
            &mut r,
            &AssetLedger::new(),
            &quiet(),
            &mut SmallRng::seed_from_u64(1),
        );
        let falcon = r.get("Falcon").unwrap();
        assert_eq!(falcon.influence, 0);
        assert_eq!(falcon.gadgets, vec!["b".to_string(), "c".to_string()]);
        assert_eq!(report.upkeep[0].evicted, vec!["a".to_string()]);
    }

    #[test]
    fn upkeep_never_drives_influence_negative() {
        let mut p = Player::new("Falcon", -3);
        p.gadgets = vec!["a".into(), "b".into()];
        let mut r = Roster::new(vec![p]).unwrap();
        apply_round_end_effects(
            &mut r,
            &AssetLedger::new(),
            &quiet(),
            &mut SmallRng::seed_from_u64(1),
        );
        let falcon = r.get("Falcon").unwrap();
        assert_eq!(falcon.influence, -3);
        assert!(falcon.gadgets.is_empty());
    }

    #[test]
    fn affordable_upkeep_is_paid_in_full() {
        let mut p = Player::new("Falcon", 10);
        p.gadgets = vec!["a".into(), "b".into()];
        let mut r = Roster::new(vec![p]).unwrap();
        apply_round_end_effects(
            &mut r,
            &AssetLedger::new(),
            &quiet(),
            &mut SmallRng::seed_from_u64(1),
        );
        assert_eq!(r.get("Falcon").unwrap().influence, 8);
        assert_eq!(r.get("Falcon").unwrap().gadgets.len(), 2);
    }

    #[test]
    fn status_recovery_steps_once_per_round() {
        let mut r = roster(&["A", "B", "C", "D"]);
        r.get_mut("A").unwrap().status = Status::Captured;
        r.get_mut("B").unwrap().status = Status::Burned;
        r.get_mut("C").unwrap().status = Status::Compromised;
        r.get_mut("C").unwrap().influence = 15;
        r.get_mut("D").unwrap().status = Status::Compromised;

        // StepRng(0, 0) makes every non-zero probability fire.
        let report =
            apply_round_end_effects(&mut r, &AssetLedger::new(), &quiet(), &mut StepRng::new(0, 0));
        assert_eq!(r.status_of("A"), Some(Status::Burned));
        assert_eq!(r.status_of("B"), Some(Status::Compromised));
        assert_eq!(r.status_of("C"), Some(Status::Active));
        assert_eq!(r.status_of("D"), Some(Status::Compromised));
        assert_eq!(report.status_changes.len(), 3);
    }

    #[test]
    fn alliance_tags_decay() {
        let mut r = roster(&["A"]);
        r.get_mut("A").unwrap().alliance_ids.push(AllianceId(1));
        let config = RoundEndConfig {
            alliance_tag_decay: 1.0,
            ..quiet()
        };
        let report =
            apply_round_end_effects(&mut r, &AssetLedger::new(), &config, &mut StepRng::new(0, 0));
        assert!(r.get("A").unwrap().alliance_ids.is_empty());
        assert_eq!(report.dropped_alliance_tags, vec![("A".to_string(), AllianceId(1))]);
    }

    #[test]
    fn survival_bonus_in_late_game() {
        let mut r = roster(&["A", "B", "C"]);
        r.get_mut("C").unwrap().status = Status::Eliminated;
        let config = RoundEndConfig {
            alliance_tag_decay: 0.0,
            ..RoundEndConfig::default()
        };
        let report =
            apply_round_end_effects(&mut r, &AssetLedger::new(), &config, &mut SmallRng::seed_from_u64(2));
        assert_eq!(r.get("A").unwrap().influence, 11);
        assert_eq!(r.get("C").unwrap().influence, 10);
        assert_eq!(report.survival_bonus, vec!["A".to_string(), "B".to_string()]);
    }
}
