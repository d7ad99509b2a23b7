//! Universe topology and speed settings.

use serde::{Deserialize, Serialize};

use crate::mission::{MissionType, SpeedCategory};

/// Per-universe constants the flight and production formulas depend on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseSettings {
    pub galaxies: u32,
    pub systems: u32,
    /// Galaxy 1 and the last galaxy are neighbours.
    pub donut_galaxy: bool,
    /// System 1 and the last system are neighbours.
    pub donut_system: bool,
    /// Resource production multiplier.
    pub economy_speed: f64,
    pub fleet_speed_war: f64,
    pub fleet_speed_peaceful: f64,
    pub fleet_speed_holding: f64,
}

impl Default for UniverseSettings {
    fn default() -> Self {
        Self {
            galaxies: 9,
            systems: 499,
            donut_galaxy: true,
            donut_system: true,
            economy_speed: 1.0,
            fleet_speed_war: 1.0,
            fleet_speed_peaceful: 1.0,
            fleet_speed_holding: 1.0,
        }
    }
}

impl UniverseSettings {
    /// Fleet speed multiplier that applies to `mission`.
    pub fn speed_multiplier(&self, mission: MissionType) -> f64 {
        match mission.speed_category() {
            SpeedCategory::War => self.fleet_speed_war,
            SpeedCategory::Peaceful => self.fleet_speed_peaceful,
            SpeedCategory::Holding => self.fleet_speed_holding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplier_by_category() {
        let u = UniverseSettings {
            fleet_speed_war: 2.0,
            fleet_speed_peaceful: 3.0,
            fleet_speed_holding: 1.5,
            ..UniverseSettings::default()
        };
        assert_eq!(u.speed_multiplier(MissionType::Attack), 2.0);
        assert_eq!(u.speed_multiplier(MissionType::Transport), 3.0);
        assert_eq!(u.speed_multiplier(MissionType::AcsDefend), 1.5);
    }
}
