//! Resolving one offense against one defense.

use serde::{Deserialize, Serialize};

use super::table::{lookup, Entry};
use crate::game::{Defense, Offense, Status, ALL_DEFENSES, ALL_OFFENSES};

/// Sound effect cue attached to an outcome. Opaque to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudioCue {
    AnvilDrop,
    PianoLaunch,
    ExplosionSizzle,
}

/// The full effect of an offense meeting a defense.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub succeeds: bool,
    pub attacker_delta: i32,
    pub defender_delta: i32,
    pub attacker_status: Option<Status>,
    pub defender_status: Option<Status>,
    pub attacker_intel: Vec<String>,
    pub defender_intel: Vec<String>,
    pub audio: Option<AudioCue>,
    pub description: String,
}

impl Outcome {
    fn from_entry(entry: &Entry) -> Self {
        Outcome {
            succeeds: entry.succeeds,
            attacker_delta: entry.attacker_delta,
            defender_delta: entry.defender_delta,
            attacker_status: entry.attacker_status,
            defender_status: entry.defender_status,
            attacker_intel: entry.attacker_intel.iter().map(|s| s.to_string()).collect(),
            defender_intel: entry.defender_intel.iter().map(|s| s.to_string()).collect(),
            audio: entry.audio,
            description: entry.description.to_string(),
        }
    }
}

/// Resolves an offense against a defense, adding IP spend on top.
///
/// Pairs missing from the table fall back to [`default_outcome`], which
/// ignores spend.
pub fn resolve_interaction(
    offense: Offense,
    defense: Defense,
    attacker_spend: i32,
    defender_spend: i32,
) -> Outcome {
    let entry = match lookup(offense, defense) {
        Some(e) => e,
        None => return default_outcome(offense, &defense.title()),
    };

    let mut outcome = Outcome::from_entry(entry);
    if attacker_spend > 0 {
        outcome.attacker_delta += attacker_spend;
        outcome
            .description
            .push_str(&format!(" (Attacker spent {} IP)", attacker_spend));
    }
    if defender_spend > 0 {
        outcome.defender_delta += defender_spend;
        outcome
            .description
            .push_str(&format!(" (Defender spent {} IP)", defender_spend));
    }
    outcome
}

/// The outcome used whenever no specific pairing applies: the defense
/// holds, the attacker gains nothing and the defender earns 1 IP.
pub fn default_outcome(offense: Offense, defense_label: &str) -> Outcome {
    Outcome {
        succeeds: false,
        attacker_delta: 0,
        defender_delta: 1,
        attacker_status: None,
        defender_status: None,
        attacker_intel: Vec::new(),
        defender_intel: Vec::new(),
        audio: None,
        description: format!("{} vs {}: Defense holds.", offense.title(), defense_label),
    }
}

/// Offenses offered to players in a game of `player_count`.
pub fn available_offenses(player_count: usize) -> Vec<Offense> {
    ALL_OFFENSES
        .iter()
        .copied()
        .filter(|o| player_count != 2 || !o.is_alliance_flavored())
        .collect()
}

/// Defenses offered to players in a game of `player_count`.
pub fn available_defenses(player_count: usize) -> Vec<Defense> {
    ALL_DEFENSES
        .iter()
        .copied()
        .filter(|d| player_count != 2 || !d.is_alliance_flavored())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assassination_into_safe_house() {
        let o = resolve_interaction(Offense::Assassination, Defense::SafeHouse, 0, 0);
        assert!(!o.succeeds);
        assert_eq!(o.attacker_delta, -1);
        assert_eq!(o.defender_delta, 1);
        assert_eq!(o.attacker_status, Some(Status::Exposed));
        assert_eq!(o.defender_status, None);
        assert!(o.attacker_intel.is_empty());
        assert_eq!(o.defender_intel, vec!["attacker_codename".to_string()]);
        assert_eq!(o.audio, Some(AudioCue::AnvilDrop));
    }

    #[test]
    fn spend_is_additive_and_described() {
        let base = resolve_interaction(Offense::Assassination, Defense::SafeHouse, 0, 0);
        let spent = resolve_interaction(Offense::Assassination, Defense::SafeHouse, 3, 2);
        assert_eq!(spent.attacker_delta, base.attacker_delta + 3);
        assert_eq!(spent.defender_delta, base.defender_delta + 2);
        assert_eq!(spent.succeeds, base.succeeds);
        assert_eq!(spent.attacker_status, base.attacker_status);
        assert!(spent.description.ends_with("(Attacker spent 3 IP) (Defender spent 2 IP)"));
    }

    #[test]
    fn resolution_is_pure() {
        for &o in &ALL_OFFENSES {
            for &d in &ALL_DEFENSES {
                assert_eq!(resolve_interaction(o, d, 2, 1), resolve_interaction(o, d, 2, 1));
            }
        }
    }

    #[test]
    fn default_outcome_shape() {
        let o = default_outcome(Offense::NetworkAttack, "Default");
        assert!(!o.succeeds);
        assert_eq!(o.attacker_delta, 0);
        assert_eq!(o.defender_delta, 1);
        assert_eq!(o.attacker_status, None);
        assert_eq!(o.description, "Network Attack vs Default: Defense holds.");
    }

    #[test]
    fn two_player_games_drop_alliance_options() {
        let offenses = available_offenses(2);
        assert_eq!(offenses.len(), 10);
        assert!(!offenses.contains(&Offense::AllianceDisruption));
        let defenses = available_defenses(2);
        assert_eq!(defenses.len(), 11);
        assert!(!defenses.contains(&Defense::AllianceBuilding));

        assert_eq!(available_offenses(6).len(), 11);
        assert_eq!(available_defenses(4).len(), 12);
    }
}
