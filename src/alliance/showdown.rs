//! The final showdown between two alliance partners.
//!
//! A single-round dice duel: each participant secretly picks a move, rolls
//! a die (assassination adds a bonus) and the higher score wins. Ties fall
//! to the participant with more IP, then to a coin flip.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::ShowdownConfig;
use crate::error::{EngineError, ParseError};
use crate::game::Roster;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowdownMove {
    Assassination,
    Sabotage,
}

pub const SHOWDOWN_MOVES: [ShowdownMove; 2] = [ShowdownMove::Assassination, ShowdownMove::Sabotage];

impl ShowdownMove {
    pub const fn as_str(self) -> &'static str {
        match self {
            ShowdownMove::Assassination => "assassination",
            ShowdownMove::Sabotage => "sabotage",
        }
    }
}

impl fmt::Display for ShowdownMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShowdownMove {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SHOWDOWN_MOVES
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| ParseError::UnknownShowdownMove(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShowdownPhase {
    #[default]
    Inactive,
    ActionSelection,
    Resolved,
}

/// Returned when a showdown begins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowdownInit {
    pub participants: [String; 2],
    pub phase: ShowdownPhase,
    pub available_moves: Vec<ShowdownMove>,
    /// IP granted to each participant by the caller.
    pub ip_bonus: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Submission {
    chosen: ShowdownMove,
    sequence: u64,
}

/// One participant's roll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantRoll {
    pub codename: String,
    pub chosen: ShowdownMove,
    /// Submitted by the resolver because the participant never chose.
    pub auto_filled: bool,
    /// Submission order across the showdown, if the participant submitted.
    pub sequence: Option<u64>,
    pub roll: u32,
    pub final_score: u32,
    pub ip: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShowdownResult {
    pub winner: String,
    pub runner_up: String,
    pub rolls: Vec<ParticipantRoll>,
    pub final_rankings: Vec<String>,
    pub description: String,
}

/// State of the (at most one) showdown in a game.
#[derive(Debug, Clone, Default)]
pub struct FinalShowdown {
    participants: Option<[String; 2]>,
    submissions: HashMap<String, Submission>,
    next_sequence: u64,
    phase: ShowdownPhase,
}

impl FinalShowdown {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> ShowdownPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == ShowdownPhase::ActionSelection
    }

    pub fn participants(&self) -> Option<&[String; 2]> {
        self.participants.as_ref()
    }

    /// Starts a showdown between exactly two distinct players.
    pub fn start<S: AsRef<str>>(
        &mut self,
        participants: &[S],
        config: &ShowdownConfig,
    ) -> Result<ShowdownInit, EngineError> {
        if self.is_active() {
            return Err(EngineError::ShowdownInProgress);
        }
        let names: Vec<String> = participants.iter().map(|p| p.as_ref().to_string()).collect();
        let pair = match names.as_slice() {
            [a, b] if a != b => [a.clone(), b.clone()],
            _ => return Err(EngineError::ShowdownParticipants(names)),
        };

        info!(first = %pair[0], second = %pair[1], "final showdown started");
        self.participants = Some(pair.clone());
        self.submissions.clear();
        self.phase = ShowdownPhase::ActionSelection;
        Ok(ShowdownInit {
            participants: pair,
            phase: self.phase,
            available_moves: SHOWDOWN_MOVES.to_vec(),
            ip_bonus: config.ip_bonus,
        })
    }

    /// Records a participant's move. Later submissions replace earlier ones.
    ///
    /// Returns false when no showdown is running or `codename` is not in it.
    pub fn submit(&mut self, codename: &str, chosen: ShowdownMove) -> bool {
        if !self.is_active() {
            return false;
        }
        let Some(pair) = &self.participants else {
            return false;
        };
        if !pair.iter().any(|p| p == codename) {
            return false;
        }
        self.next_sequence += 1;
        self.submissions.insert(
            codename.to_string(),
            Submission {
                chosen,
                sequence: self.next_sequence,
            },
        );
        true
    }

    pub fn has_submitted(&self, codename: &str) -> bool {
        self.submissions.contains_key(codename)
    }

    /// Resolves the duel and clears the showdown state.
    ///
    /// Participants without a submission default to assassination.
    pub fn resolve<R: Rng + ?Sized>(
        &mut self,
        roster: &Roster,
        config: &ShowdownConfig,
        rng: &mut R,
    ) -> Result<ShowdownResult, EngineError> {
        if !self.is_active() {
            return Err(EngineError::NoShowdown);
        }
        let pair = self.participants.take().ok_or(EngineError::NoShowdown)?;

        let mut rolls = Vec::with_capacity(2);
        for codename in &pair {
            let submission = self.submissions.get(codename);
            let chosen = submission.map_or(ShowdownMove::Assassination, |s| s.chosen);
            let roll = rng.gen_range(1..=config.die_sides.max(1));
            let bonus = match chosen {
                ShowdownMove::Assassination => config.assassination_bonus,
                ShowdownMove::Sabotage => 0,
            };
            rolls.push(ParticipantRoll {
                codename: codename.clone(),
                chosen,
                auto_filled: submission.is_none(),
                sequence: submission.map(|s| s.sequence),
                roll,
                final_score: roll + bonus,
                ip: roster.get(codename).map_or(0, |p| p.influence),
            });
        }

        let first_wins = match rolls[0].final_score.cmp(&rolls[1].final_score) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => match rolls[0].ip.cmp(&rolls[1].ip) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => rng.gen_bool(0.5),
            },
        };
        let [first, second] = pair;
        let (winner, runner_up) = if first_wins {
            (first, second)
        } else {
            (second, first)
        };

        self.submissions.clear();
        self.phase = ShowdownPhase::Resolved;
        info!(winner = %winner, runner_up = %runner_up, "final showdown resolved");

        Ok(ShowdownResult {
            description: format!(
                "{} emerges victorious in the Final Showdown! {} is the runner-up.",
                winner, runner_up
            ),
            final_rankings: vec![winner.clone(), runner_up.clone()],
            winner,
            runner_up,
            rolls,
        })
    }
}
