//! Building definitions and per-planet building levels.

use serde::{Deserialize, Serialize};

use crate::resources::Resources;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Building {
    MetalMine,
    CrystalMine,
    DeuteriumSynthesizer,
    SolarPlant,
    FusionReactor,
    MetalStorage,
    CrystalStorage,
    DeuteriumTank,
    RoboticsFactory,
    Shipyard,
    ResearchLab,
    AllianceDepot,
    MissileSilo,
    NaniteFactory,
    Terraformer,
    SpaceDock,
}

/// Static cost data: level-1 price and the per-level growth factor.
#[derive(Debug, Clone, Copy)]
pub struct BuildingSpec {
    pub name: &'static str,
    pub base_cost: Resources,
    pub growth: f64,
}

impl Building {
    pub const ALL: [Building; 16] = [
        Building::MetalMine,
        Building::CrystalMine,
        Building::DeuteriumSynthesizer,
        Building::SolarPlant,
        Building::FusionReactor,
        Building::MetalStorage,
        Building::CrystalStorage,
        Building::DeuteriumTank,
        Building::RoboticsFactory,
        Building::Shipyard,
        Building::ResearchLab,
        Building::AllianceDepot,
        Building::MissileSilo,
        Building::NaniteFactory,
        Building::Terraformer,
        Building::SpaceDock,
    ];

    pub fn spec(self) -> BuildingSpec {
        let (name, base_cost, growth) = match self {
            Self::MetalMine => ("Metal Mine", Resources::new(60.0, 15.0, 0.0), 1.5),
            Self::CrystalMine => ("Crystal Mine", Resources::new(48.0, 24.0, 0.0), 1.6),
            Self::DeuteriumSynthesizer => {
                ("Deuterium Synthesizer", Resources::new(225.0, 75.0, 0.0), 1.5)
            }
            Self::SolarPlant => ("Solar Plant", Resources::new(75.0, 30.0, 0.0), 1.5),
            Self::FusionReactor => ("Fusion Reactor", Resources::new(900.0, 360.0, 180.0), 1.8),
            Self::MetalStorage => ("Metal Storage", Resources::new(1_000.0, 0.0, 0.0), 2.0),
            Self::CrystalStorage => ("Crystal Storage", Resources::new(1_000.0, 500.0, 0.0), 2.0),
            Self::DeuteriumTank => ("Deuterium Tank", Resources::new(1_000.0, 1_000.0, 0.0), 2.0),
            Self::RoboticsFactory => {
                ("Robotics Factory", Resources::new(400.0, 120.0, 200.0), 2.0)
            }
            Self::Shipyard => ("Shipyard", Resources::new(400.0, 200.0, 100.0), 2.0),
            Self::ResearchLab => ("Research Lab", Resources::new(200.0, 400.0, 200.0), 2.0),
            Self::AllianceDepot => ("Alliance Depot", Resources::new(20_000.0, 40_000.0, 0.0), 2.0),
            Self::MissileSilo => ("Missile Silo", Resources::new(20_000.0, 20_000.0, 1_000.0), 2.0),
            Self::NaniteFactory => {
                ("Nanite Factory", Resources::new(1_000_000.0, 500_000.0, 100_000.0), 2.0)
            }
            Self::Terraformer => ("Terraformer", Resources::new(0.0, 50_000.0, 100_000.0), 2.0),
            Self::SpaceDock => ("Space Dock", Resources::new(200.0, 0.0, 50.0), 5.0),
        };
        BuildingSpec {
            name,
            base_cost,
            growth,
        }
    }
}

/// Building levels of one planet. Missing keys read as level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Buildings {
    pub metal_mine: u32,
    pub crystal_mine: u32,
    pub deuterium_synthesizer: u32,
    pub solar_plant: u32,
    pub fusion_reactor: u32,
    pub metal_storage: u32,
    pub crystal_storage: u32,
    pub deuterium_tank: u32,
    pub robotics_factory: u32,
    pub shipyard: u32,
    pub research_lab: u32,
    pub alliance_depot: u32,
    pub missile_silo: u32,
    pub nanite_factory: u32,
    pub terraformer: u32,
    pub space_dock: u32,
}

impl Buildings {
    pub fn level(&self, building: Building) -> u32 {
        match building {
            Building::MetalMine => self.metal_mine,
            Building::CrystalMine => self.crystal_mine,
            Building::DeuteriumSynthesizer => self.deuterium_synthesizer,
            Building::SolarPlant => self.solar_plant,
            Building::FusionReactor => self.fusion_reactor,
            Building::MetalStorage => self.metal_storage,
            Building::CrystalStorage => self.crystal_storage,
            Building::DeuteriumTank => self.deuterium_tank,
            Building::RoboticsFactory => self.robotics_factory,
            Building::Shipyard => self.shipyard,
            Building::ResearchLab => self.research_lab,
            Building::AllianceDepot => self.alliance_depot,
            Building::MissileSilo => self.missile_silo,
            Building::NaniteFactory => self.nanite_factory,
            Building::Terraformer => self.terraformer,
            Building::SpaceDock => self.space_dock,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_specs_are_sane() {
        for building in Building::ALL {
            let spec = building.spec();
            assert!(spec.growth > 1.0, "{} must get pricier", spec.name);
            assert!(spec.base_cost.total() > 0.0, "{} must cost something", spec.name);
        }
    }

    #[test]
    fn test_levels_from_partial_json() {
        let b: Buildings = serde_json::from_str(r#"{"metal_mine": 20, "solar_plant": 18}"#).unwrap();
        assert_eq!(b.level(Building::MetalMine), 20);
        assert_eq!(b.level(Building::SolarPlant), 18);
        assert_eq!(b.level(Building::FusionReactor), 0);
    }
}
