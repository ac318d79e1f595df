//! The registry of players in one game.
//!
//! Players keep their join order for deterministic iteration, and a
//! codename index is maintained alongside so lookups never scan.

use std::collections::HashMap;

use serde::Serialize;

use super::player::{Player, Status, MAX_INFLUENCE, MIN_INFLUENCE};
use crate::error::EngineError;

/// All players of a game, indexed by codename.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Roster {
    players: Vec<Player>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl Roster {
    /// Builds a roster, rejecting duplicate codenames and out-of-range influence.
    pub fn new(players: Vec<Player>) -> Result<Self, EngineError> {
        let mut roster = Roster {
            players: Vec::with_capacity(players.len()),
            index: HashMap::with_capacity(players.len()),
        };
        for player in players {
            roster.insert(player)?;
        }
        Ok(roster)
    }

    /// Creates active players with the same starting influence.
    pub fn with_codenames<S: AsRef<str>>(
        codenames: &[S],
        starting_influence: i32,
    ) -> Result<Self, EngineError> {
        Roster::new(
            codenames
                .iter()
                .map(|c| Player::new(c.as_ref(), starting_influence))
                .collect(),
        )
    }

    /// Adds a player; the codename must not already be registered.
    pub fn insert(&mut self, player: Player) -> Result<(), EngineError> {
        if self.index.contains_key(&player.codename) {
            return Err(EngineError::DuplicateCodename(player.codename));
        }
        if !(MIN_INFLUENCE..=MAX_INFLUENCE).contains(&player.influence) {
            return Err(EngineError::InfluenceOutOfBounds {
                codename: player.codename,
                influence: player.influence,
                min: MIN_INFLUENCE,
                max: MAX_INFLUENCE,
            });
        }
        if player.alliance_ids.len() > 1 {
            return Err(EngineError::CorruptAllianceMembership {
                codename: player.codename,
                count: player.alliance_ids.len(),
            });
        }
        self.index.insert(player.codename.clone(), self.players.len());
        self.players.push(player);
        Ok(())
    }

    pub fn get(&self, codename: &str) -> Option<&Player> {
        self.index.get(codename).map(|&i| &self.players[i])
    }

    pub fn get_mut(&mut self, codename: &str) -> Option<&mut Player> {
        match self.index.get(codename) {
            Some(&i) => Some(&mut self.players[i]),
            None => None,
        }
    }

    /// Like [`Roster::get_mut`] but reports an unknown codename as an error.
    pub fn require_mut(&mut self, codename: &str) -> Result<&mut Player, EngineError> {
        self.get_mut(codename)
            .ok_or_else(|| EngineError::UnknownCodename(codename.to_string()))
    }

    pub fn require(&self, codename: &str) -> Result<&Player, EngineError> {
        self.get(codename)
            .ok_or_else(|| EngineError::UnknownCodename(codename.to_string()))
    }

    pub fn contains(&self, codename: &str) -> bool {
        self.index.contains_key(codename)
    }

    pub fn status_of(&self, codename: &str) -> Option<Status> {
        self.get(codename).map(|p| p.status)
    }

    /// Players in join order.
    pub fn iter(&self) -> std::slice::Iter<'_, Player> {
        self.players.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Player> {
        self.players.iter_mut()
    }

    pub fn codenames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.codename.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players that are neither captured nor eliminated.
    pub fn standing(&self) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(|p| !p.is_terminal())
    }

    pub fn standing_count(&self) -> usize {
        self.standing().count()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Player;
    type IntoIter = std::slice::Iter<'a, Player>;

    fn into_iter(self) -> Self::IntoIter {
        self.players.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_codename() {
        let roster = Roster::with_codenames(&["Falcon", "Owl"], 10).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("Owl").unwrap().influence, 10);
        assert!(roster.get("Raven").is_none());
        assert_eq!(roster.codenames(), vec!["Falcon", "Owl"]);
    }

    #[test]
    fn duplicate_codename_is_rejected() {
        let err = Roster::with_codenames(&["Falcon", "Falcon"], 10).unwrap_err();
        assert_eq!(err, EngineError::DuplicateCodename("Falcon".to_string()));
    }

    #[test]
    fn out_of_range_influence_is_rejected() {
        let mut player = Player::new("Falcon", 0);
        player.influence = 51;
        let err = Roster::new(vec![player]).unwrap_err();
        assert!(matches!(err, EngineError::InfluenceOutOfBounds { influence: 51, .. }));
    }

    #[test]
    fn standing_excludes_terminal_statuses() {
        let mut roster = Roster::with_codenames(&["Falcon", "Owl", "Raven"], 10).unwrap();
        roster.get_mut("Owl").unwrap().status = Status::Captured;
        roster.get_mut("Raven").unwrap().status = Status::Exposed;
        let standing: Vec<_> = roster.standing().map(|p| p.codename.as_str()).collect();
        assert_eq!(standing, vec!["Falcon", "Raven"]);
    }

    #[test]
    fn require_mut_reports_unknown_codename() {
        let mut roster = Roster::with_codenames(&["Falcon"], 10).unwrap();
        assert_eq!(
            roster.require_mut("Ghost").unwrap_err(),
            EngineError::UnknownCodename("Ghost".to_string())
        );
    }
}
