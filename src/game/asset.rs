//! Strategic assets and their controllers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// One of the five capturable, yield-producing resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategicAsset {
    CentralServer,
    CommTower,
    DataVault,
    OperationsCenter,
    SafeHouseNetwork,
}

pub const ASSET_COUNT: usize = 5;

pub const ALL_ASSETS: [StrategicAsset; ASSET_COUNT] = [
    StrategicAsset::CentralServer,
    StrategicAsset::CommTower,
    StrategicAsset::DataVault,
    StrategicAsset::OperationsCenter,
    StrategicAsset::SafeHouseNetwork,
];

impl StrategicAsset {
    pub const fn as_str(self) -> &'static str {
        match self {
            StrategicAsset::CentralServer => "central_server",
            StrategicAsset::CommTower => "comm_tower",
            StrategicAsset::DataVault => "data_vault",
            StrategicAsset::OperationsCenter => "operations_center",
            StrategicAsset::SafeHouseNetwork => "safe_house_network",
        }
    }
}

impl fmt::Display for StrategicAsset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StrategicAsset {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_ASSETS
            .iter()
            .copied()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ParseError::UnknownAsset(s.to_string()))
    }
}

/// Controller of every strategic asset, indexed by `StrategicAsset as usize`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLedger {
    controllers: [Option<String>; ASSET_COUNT],
}

impl AssetLedger {
    /// A ledger with every asset unowned.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn controller(&self, asset: StrategicAsset) -> Option<&str> {
        self.controllers[asset as usize].as_deref()
    }

    pub fn set_controller(&mut self, asset: StrategicAsset, controller: Option<String>) {
        self.controllers[asset as usize] = controller;
    }

    /// Iterates `(asset, controller)` in fixed asset order.
    pub fn iter(&self) -> impl Iterator<Item = (StrategicAsset, Option<&str>)> + '_ {
        ALL_ASSETS
            .iter()
            .map(move |&asset| (asset, self.controller(asset)))
    }

    /// Unowned assets in fixed asset order.
    pub fn unowned(&self) -> Vec<StrategicAsset> {
        self.iter()
            .filter(|(_, controller)| controller.is_none())
            .map(|(asset, _)| asset)
            .collect()
    }

    /// Assets held by `codename`, in fixed asset order.
    pub fn held_by(&self, codename: &str) -> Vec<StrategicAsset> {
        self.iter()
            .filter(|(_, controller)| *controller == Some(codename))
            .map(|(asset, _)| asset)
            .collect()
    }

    pub fn count_held_by(&self, codename: &str) -> usize {
        self.iter()
            .filter(|(_, controller)| *controller == Some(codename))
            .count()
    }

    /// Makes every asset held by `codename` unowned again; returns them.
    pub fn release_all(&mut self, codename: &str) -> Vec<StrategicAsset> {
        let released = self.held_by(codename);
        for &asset in &released {
            self.controllers[asset as usize] = None;
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_ledger_is_fully_unowned() {
        let ledger = AssetLedger::new();
        assert_eq!(ledger.unowned(), ALL_ASSETS.to_vec());
        assert!(ledger.iter().all(|(_, c)| c.is_none()));
    }

    #[test]
    fn held_by_counts_only_the_controller() {
        let mut ledger = AssetLedger::new();
        ledger.set_controller(StrategicAsset::CommTower, Some("Falcon".to_string()));
        ledger.set_controller(StrategicAsset::DataVault, Some("Falcon".to_string()));
        ledger.set_controller(StrategicAsset::CentralServer, Some("Owl".to_string()));

        assert_eq!(ledger.count_held_by("Falcon"), 2);
        assert_eq!(
            ledger.held_by("Falcon"),
            vec![StrategicAsset::CommTower, StrategicAsset::DataVault]
        );
        assert_eq!(ledger.unowned().len(), 2);
    }

    #[test]
    fn release_all_clears_only_that_controller() {
        let mut ledger = AssetLedger::new();
        ledger.set_controller(StrategicAsset::CommTower, Some("Falcon".to_string()));
        ledger.set_controller(StrategicAsset::CentralServer, Some("Owl".to_string()));

        assert_eq!(ledger.release_all("Falcon"), vec![StrategicAsset::CommTower]);
        assert_eq!(ledger.controller(StrategicAsset::CommTower), None);
        assert_eq!(ledger.controller(StrategicAsset::CentralServer), Some("Owl"));
    }

    #[test]
    fn asset_names_parse() {
        for asset in ALL_ASSETS {
            assert_eq!(asset.as_str().parse::<StrategicAsset>(), Ok(asset));
        }
        assert!("moon_base".parse::<StrategicAsset>().is_err());
    }
}
