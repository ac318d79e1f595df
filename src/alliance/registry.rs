//! Alliance lifecycle and alliance victory detection.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::showdown::{FinalShowdown, ShowdownInit, ShowdownMove, ShowdownPhase, ShowdownResult};
use crate::config::{AllianceConfig, ShowdownConfig};
use crate::error::{EngineError, FormationRefusal, ParseError};
use crate::game::{AssetLedger, Roster, Status, ASSET_COUNT};

/// Identifier of an alliance, unique within one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AllianceId(pub u32);

impl fmt::Display for AllianceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "alliance_{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceKind {
    NonAggression,
    CoordinatedOperation,
}

impl AllianceKind {
    /// Rounds the alliance lasts after the round it was formed in.
    pub const fn duration(self) -> u32 {
        match self {
            AllianceKind::NonAggression => 2,
            AllianceKind::CoordinatedOperation => 1,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AllianceKind::NonAggression => "non_aggression",
            AllianceKind::CoordinatedOperation => "coordinated_operation",
        }
    }
}

impl fmt::Display for AllianceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllianceKind {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "non_aggression" => Ok(AllianceKind::NonAggression),
            "coordinated_operation" => Ok(AllianceKind::CoordinatedOperation),
            _ => Err(ParseError::UnknownAllianceKind(s.to_string())),
        }
    }
}

/// A pairwise pact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alliance {
    pub id: AllianceId,
    pub members: [String; 2],
    pub kind: AllianceKind,
    pub remaining: u32,
    pub betrayed: bool,
    pub created_round: u32,
}

impl Alliance {
    pub fn is_member(&self, codename: &str) -> bool {
        self.members.iter().any(|m| m == codename)
    }

    pub fn partner(&self, codename: &str) -> Option<&str> {
        match &self.members {
            [a, b] if a == codename => Some(b.as_str()),
            [a, b] if b == codename => Some(a.as_str()),
            _ => None,
        }
    }
}

/// Which alliance-level objective was achieved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllianceCondition {
    CoordinatedElimination,
    AssetMonopoly,
}

impl AllianceCondition {
    pub const fn title(self) -> &'static str {
        match self {
            AllianceCondition::CoordinatedElimination => "Coordinated Elimination",
            AllianceCondition::AssetMonopoly => "Asset Monopoly",
        }
    }
}

/// An alliance met its objective; its members go to a final showdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllianceVictory {
    pub alliance: AllianceId,
    pub condition: AllianceCondition,
    pub members: [String; 2],
    pub description: String,
}

/// Penalty the caller applies to a betrayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BetrayalPenalty {
    pub betrayer: String,
    pub ip_loss: i32,
    pub status: Status,
    pub cooldown_rounds: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakResult {
    pub alliance: Alliance,
    pub betrayal: Option<BetrayalPenalty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowdownSummary {
    pub phase: ShowdownPhase,
    pub participants: Vec<String>,
}

/// Snapshot of every alliance and the showdown state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllianceSummary {
    pub total: usize,
    pub alliances: Vec<Alliance>,
    pub showdown: ShowdownSummary,
}

/// Owns the alliances of one game and its final showdown.
#[derive(Debug, Clone, Default)]
pub struct AllianceEngine {
    alliances: BTreeMap<AllianceId, Alliance>,
    next_id: u32,
    config: AllianceConfig,
    showdown_config: ShowdownConfig,
    showdown: FinalShowdown,
}

impl AllianceEngine {
    pub fn new(config: AllianceConfig, showdown_config: ShowdownConfig) -> Self {
        AllianceEngine {
            config,
            showdown_config,
            ..Default::default()
        }
    }

    pub fn get(&self, id: AllianceId) -> Option<&Alliance> {
        self.alliances.get(&id)
    }

    /// The alliance `codename` belongs to, if any.
    pub fn alliance_of(&self, codename: &str) -> Option<&Alliance> {
        self.alliances.values().find(|a| a.is_member(codename))
    }

    pub fn alliances_of(&self, codename: &str) -> Vec<&Alliance> {
        self.alliances.values().filter(|a| a.is_member(codename)).collect()
    }

    pub fn len(&self) -> usize {
        self.alliances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alliances.is_empty()
    }

    /// Checks whether `a` and `b` may ally right now.
    pub fn can_form(&self, a: &str, b: &str) -> Result<(), FormationRefusal> {
        if a == b {
            return Err(FormationRefusal::SamePlayer);
        }
        if self
            .alliances
            .values()
            .any(|al| al.is_member(a) && al.is_member(b))
        {
            return Err(FormationRefusal::AlreadyAllied);
        }
        for codename in [a, b] {
            if self.alliance_of(codename).is_some() {
                return Err(FormationRefusal::AlreadyInAlliance(codename.to_string()));
            }
        }
        Ok(())
    }

    /// Forms an alliance between two players who are free to ally.
    pub fn create(
        &mut self,
        a: &str,
        b: &str,
        kind: AllianceKind,
        round: u32,
    ) -> Result<AllianceId, EngineError> {
        if a == b {
            return Err(EngineError::SelfAlliance(a.to_string()));
        }
        self.can_form(a, b)?;

        let id = AllianceId(self.next_id);
        self.next_id += 1;
        self.alliances.insert(
            id,
            Alliance {
                id,
                members: [a.to_string(), b.to_string()],
                kind,
                remaining: kind.duration(),
                betrayed: false,
                created_round: round,
            },
        );
        info!(%id, a, b, %kind, round, "alliance formed");
        Ok(id)
    }

    /// Dissolves an alliance. When `betrayer` is one of its members the
    /// penalty to apply is reported alongside.
    pub fn break_alliance(
        &mut self,
        id: AllianceId,
        betrayer: Option<&str>,
    ) -> Result<BreakResult, EngineError> {
        let mut alliance = self
            .alliances
            .remove(&id)
            .ok_or_else(|| EngineError::UnknownAlliance(id.to_string()))?;

        let betrayal = match betrayer {
            Some(b) if alliance.is_member(b) => {
                alliance.betrayed = true;
                Some(BetrayalPenalty {
                    betrayer: b.to_string(),
                    ip_loss: self.config.betrayal_ip_loss,
                    status: Status::Compromised,
                    cooldown_rounds: self.config.cooldown_rounds,
                })
            }
            _ => None,
        };
        info!(%id, betrayed = alliance.betrayed, "alliance broken");
        Ok(BreakResult { alliance, betrayal })
    }

    /// Ages alliances formed before `round` and removes the expired ones.
    pub fn process_round_end(&mut self, round: u32) -> Vec<AllianceId> {
        let mut expired = Vec::new();
        for alliance in self.alliances.values_mut() {
            if alliance.created_round >= round {
                continue;
            }
            alliance.remaining = alliance.remaining.saturating_sub(1);
            if alliance.remaining == 0 {
                expired.push(alliance.id);
            }
        }
        for id in &expired {
            self.alliances.remove(id);
            info!(%id, round, "alliance expired");
        }
        expired
    }

    /// First coordinated operation, in formation order, that has eliminated
    /// every outsider or jointly holds every asset.
    pub fn check_alliance_victory(
        &self,
        roster: &Roster,
        assets: &AssetLedger,
    ) -> Option<AllianceVictory> {
        for alliance in self.alliances.values() {
            if alliance.kind != AllianceKind::CoordinatedOperation {
                continue;
            }
            let outsiders_standing = roster
                .iter()
                .any(|p| !alliance.is_member(&p.codename) && !p.is_terminal());
            let condition = if !outsiders_standing {
                AllianceCondition::CoordinatedElimination
            } else if alliance
                .members
                .iter()
                .map(|m| assets.count_held_by(m))
                .sum::<usize>()
                >= ASSET_COUNT
            {
                AllianceCondition::AssetMonopoly
            } else {
                continue;
            };

            let [a, b] = &alliance.members;
            let description = match condition {
                AllianceCondition::CoordinatedElimination => format!(
                    "{} and {} eliminated all opposition and must face each other!",
                    a, b
                ),
                AllianceCondition::AssetMonopoly => format!(
                    "{} and {} control all strategic assets and must determine the ultimate victor!",
                    a, b
                ),
            };
            return Some(AllianceVictory {
                alliance: alliance.id,
                condition,
                members: alliance.members.clone(),
                description,
            });
        }
        None
    }

    pub fn showdown(&self) -> &FinalShowdown {
        &self.showdown
    }

    pub fn start_final_showdown<S: AsRef<str>>(
        &mut self,
        participants: &[S],
    ) -> Result<ShowdownInit, EngineError> {
        self.showdown.start(participants, &self.showdown_config)
    }

    pub fn submit_showdown_action(&mut self, codename: &str, chosen: ShowdownMove) -> bool {
        self.showdown.submit(codename, chosen)
    }

    pub fn resolve_final_showdown<R: Rng + ?Sized>(
        &mut self,
        roster: &Roster,
        rng: &mut R,
    ) -> Result<ShowdownResult, EngineError> {
        self.showdown.resolve(roster, &self.showdown_config, rng)
    }

    pub fn summary(&self) -> AllianceSummary {
        AllianceSummary {
            total: self.alliances.len(),
            alliances: self.alliances.values().cloned().collect(),
            showdown: ShowdownSummary {
                phase: self.showdown.phase(),
                participants: if self.showdown.is_active() {
                    self.showdown
                        .participants()
                        .map(|p| p.to_vec())
                        .unwrap_or_default()
                } else {
                    Vec::new()
                },
            },
        }
    }
}
