//! Offense and defense choices, and the per-round action a player submits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The offensive operation a spy runs against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Offense {
    Assassination,
    Sabotage,
    Exposure,
    Surveillance,
    Infiltration,
    AssetTheft,
    Misinformation,
    NetworkAttack,
    ResourceDenial,
    AllianceDisruption,
    FalseFlag,
}

pub const ALL_OFFENSES: [Offense; 11] = [
    Offense::Assassination,
    Offense::Sabotage,
    Offense::Exposure,
    Offense::Surveillance,
    Offense::Infiltration,
    Offense::AssetTheft,
    Offense::Misinformation,
    Offense::NetworkAttack,
    Offense::ResourceDenial,
    Offense::AllianceDisruption,
    Offense::FalseFlag,
];

impl Offense {
    pub const fn as_str(self) -> &'static str {
        match self {
            Offense::Assassination => "assassination",
            Offense::Sabotage => "sabotage",
            Offense::Exposure => "exposure",
            Offense::Surveillance => "surveillance",
            Offense::Infiltration => "infiltration",
            Offense::AssetTheft => "asset_theft",
            Offense::Misinformation => "misinformation",
            Offense::NetworkAttack => "network_attack",
            Offense::ResourceDenial => "resource_denial",
            Offense::AllianceDisruption => "alliance_disruption",
            Offense::FalseFlag => "false_flag",
        }
    }

    /// Human-readable label, e.g. `Network Attack`.
    pub fn title(self) -> String {
        title_case(self.as_str())
    }

    /// Alliance-flavored options are withdrawn from two-player games.
    pub const fn is_alliance_flavored(self) -> bool {
        matches!(self, Offense::AllianceDisruption)
    }
}

/// The defensive posture a spy adopts for the round.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Defense {
    #[default]
    SafeHouse,
    BodyguardDetail,
    MobileOperations,
    Underground,
    SweepClear,
    FalseIdentity,
    CounterSurveillance,
    Disinformation,
    PreemptiveStrike,
    AllianceBuilding,
    HoneypotOperations,
    InformationWarfare,
}

pub const ALL_DEFENSES: [Defense; 12] = [
    Defense::SafeHouse,
    Defense::BodyguardDetail,
    Defense::MobileOperations,
    Defense::Underground,
    Defense::SweepClear,
    Defense::FalseIdentity,
    Defense::CounterSurveillance,
    Defense::Disinformation,
    Defense::PreemptiveStrike,
    Defense::AllianceBuilding,
    Defense::HoneypotOperations,
    Defense::InformationWarfare,
];

impl Defense {
    pub const fn as_str(self) -> &'static str {
        match self {
            Defense::SafeHouse => "safe_house",
            Defense::BodyguardDetail => "bodyguard_detail",
            Defense::MobileOperations => "mobile_operations",
            Defense::Underground => "underground",
            Defense::SweepClear => "sweep_clear",
            Defense::FalseIdentity => "false_identity",
            Defense::CounterSurveillance => "counter_surveillance",
            Defense::Disinformation => "disinformation",
            Defense::PreemptiveStrike => "preemptive_strike",
            Defense::AllianceBuilding => "alliance_building",
            Defense::HoneypotOperations => "honeypot_operations",
            Defense::InformationWarfare => "information_warfare",
        }
    }

    pub fn title(self) -> String {
        title_case(self.as_str())
    }

    pub const fn is_alliance_flavored(self) -> bool {
        matches!(self, Defense::AllianceBuilding)
    }
}

impl fmt::Display for Offense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Defense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Offense {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_OFFENSES
            .iter()
            .copied()
            .find(|o| o.as_str() == s)
            .ok_or_else(|| ParseError::UnknownOffense(s.to_string()))
    }
}

impl FromStr for Defense {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_DEFENSES
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| ParseError::UnknownDefense(s.to_string()))
    }
}

fn title_case(snake: &str) -> String {
    snake
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// One player's submission for a round.
///
/// A missing offense is a safe turn. A missing defense resolves as
/// [`Defense::SafeHouse`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Action {
    pub offense: Option<Offense>,
    pub defense: Option<Defense>,
    pub target: Option<String>,
    pub ip_spend: u32,
    pub banner_message: Option<String>,
    /// Gadget used to carry out the offense, if any.
    pub gadget: Option<String>,
}

impl Action {
    /// A safe turn holding the given defense.
    pub fn safe(defense: Defense) -> Self {
        Action {
            defense: Some(defense),
            ..Action::default()
        }
    }

    /// An offense against `target`, defending with the default posture.
    pub fn attack(offense: Offense, target: impl Into<String>) -> Self {
        Action {
            offense: Some(offense),
            target: Some(target.into()),
            ..Action::default()
        }
    }

    pub fn with_defense(mut self, defense: Defense) -> Self {
        self.defense = Some(defense);
        self
    }

    pub fn with_spend(mut self, ip_spend: u32) -> Self {
        self.ip_spend = ip_spend;
        self
    }

    pub fn with_banner(mut self, message: impl Into<String>) -> Self {
        self.banner_message = Some(message.into());
        self
    }

    pub fn with_gadget(mut self, gadget: impl Into<String>) -> Self {
        self.gadget = Some(gadget.into());
        self
    }

    pub fn is_safe_turn(&self) -> bool {
        self.offense.is_none()
    }

    /// The defense this action resolves with.
    pub fn effective_defense(&self) -> Defense {
        self.defense.unwrap_or_default()
    }

    /// Spend as a signed IP delta.
    pub fn spend(&self) -> i32 {
        i32::try_from(self.ip_spend).unwrap_or(i32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offense_and_defense_parse_from_wire_names() {
        for o in ALL_OFFENSES {
            assert_eq!(o.as_str().parse::<Offense>(), Ok(o));
        }
        for d in ALL_DEFENSES {
            assert_eq!(d.as_str().parse::<Defense>(), Ok(d));
        }
        assert!("karate_chop".parse::<Offense>().is_err());
        assert!("".parse::<Defense>().is_err());
    }

    #[test]
    fn titles_are_human_readable() {
        assert_eq!(Offense::NetworkAttack.title(), "Network Attack");
        assert_eq!(Defense::SafeHouse.title(), "Safe House");
    }

    #[test]
    fn missing_defense_defaults_to_safe_house() {
        let action = Action::attack(Offense::Exposure, "Owl");
        assert_eq!(action.effective_defense(), Defense::SafeHouse);
        assert!(!action.is_safe_turn());
        assert!(Action::default().is_safe_turn());
    }

    #[test]
    fn action_deserializes_with_defaults() {
        let action: Action =
            serde_json::from_str(r#"{"offense":"network_attack","target":"Owl"}"#).unwrap();
        assert_eq!(action.offense, Some(Offense::NetworkAttack));
        assert_eq!(action.ip_spend, 0);
        assert_eq!(action.defense, None);
    }

    #[test]
    fn invalid_enum_value_is_rejected_at_the_boundary() {
        let parsed: Result<Action, _> = serde_json::from_str(r#"{"offense":"teleport"}"#);
        assert!(parsed.is_err());
    }
}
