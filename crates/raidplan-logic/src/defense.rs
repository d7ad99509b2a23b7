//! Planetary defense units.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum DefenseType {
    RocketLauncher = 0,
    LightLaser = 1,
    HeavyLaser = 2,
    GaussCannon = 3,
    IonCannon = 4,
    PlasmaTurret = 5,
    SmallShieldDome = 6,
    LargeShieldDome = 7,
    AntiBallisticMissile = 8,
    InterplanetaryMissile = 9,
}

impl DefenseType {
    pub const COUNT: usize = 10;

    pub const ALL: [DefenseType; Self::COUNT] = [
        Self::RocketLauncher,
        Self::LightLaser,
        Self::HeavyLaser,
        Self::GaussCannon,
        Self::IonCannon,
        Self::PlasmaTurret,
        Self::SmallShieldDome,
        Self::LargeShieldDome,
        Self::AntiBallisticMissile,
        Self::InterplanetaryMissile,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Missiles sit in the silo and never take part in a fleet battle.
    pub fn is_missile(self) -> bool {
        matches!(self, Self::AntiBallisticMissile | Self::InterplanetaryMissile)
    }
}

/// Defense counts indexed by [`DefenseType`]; serialized as a partial map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<DefenseType, u64>", into = "BTreeMap<DefenseType, u64>")]
pub struct Defense {
    counts: [u64; DefenseType::COUNT],
}

impl Defense {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, kind: DefenseType) -> u64 {
        self.counts[kind.index()]
    }

    pub fn set(&mut self, kind: DefenseType, count: u64) {
        self.counts[kind.index()] = count;
    }

    pub fn with(mut self, kind: DefenseType, count: u64) -> Self {
        self.set(kind, count);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (DefenseType, u64)> + '_ {
        DefenseType::ALL
            .iter()
            .map(|d| (*d, self.get(*d)))
            .filter(|(_, count)| *count > 0)
    }

    /// True when anything other than missiles is built.
    pub fn has_active_defense(&self) -> bool {
        self.iter().any(|(kind, _)| !kind.is_missile())
    }
}

impl From<BTreeMap<DefenseType, u64>> for Defense {
    fn from(partial: BTreeMap<DefenseType, u64>) -> Self {
        let mut defense = Defense::new();
        for (kind, count) in partial {
            defense.set(kind, count);
        }
        defense
    }
}

impl From<Defense> for BTreeMap<DefenseType, u64> {
    fn from(defense: Defense) -> Self {
        defense.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missiles_are_not_active_defense() {
        let silo = Defense::new()
            .with(DefenseType::AntiBallisticMissile, 10)
            .with(DefenseType::InterplanetaryMissile, 4);
        assert!(!silo.has_active_defense());

        let guarded = silo.with(DefenseType::RocketLauncher, 1);
        assert!(guarded.has_active_defense());
    }

    #[test]
    fn test_zero_counts_are_inactive() {
        let d: Defense = serde_json::from_str(r#"{"plasma_turret":0}"#).unwrap();
        assert!(!d.has_active_defense());
        assert_eq!(serde_json::to_string(&d).unwrap(), "{}");
    }
}
