//! Researched technologies.

use serde::{Deserialize, Serialize};

/// Every research the engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Research {
    Energy,
    Laser,
    Ion,
    Hyperspace,
    Plasma,
    CombustionDrive,
    ImpulseDrive,
    HyperspaceDrive,
    Espionage,
    Computer,
    Astrophysics,
    IntergalacticResearchNetwork,
    Graviton,
    Weapons,
    Shielding,
    Armour,
}

impl Research {
    pub const ALL: [Research; 16] = [
        Research::Energy,
        Research::Laser,
        Research::Ion,
        Research::Hyperspace,
        Research::Plasma,
        Research::CombustionDrive,
        Research::ImpulseDrive,
        Research::HyperspaceDrive,
        Research::Espionage,
        Research::Computer,
        Research::Astrophysics,
        Research::IntergalacticResearchNetwork,
        Research::Graviton,
        Research::Weapons,
        Research::Shielding,
        Research::Armour,
    ];
}

/// Tech levels. Keys missing from serialized input read as level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Researches {
    pub energy: u32,
    pub laser: u32,
    pub ion: u32,
    pub hyperspace: u32,
    pub plasma: u32,
    pub combustion_drive: u32,
    pub impulse_drive: u32,
    pub hyperspace_drive: u32,
    pub espionage: u32,
    pub computer: u32,
    pub astrophysics: u32,
    pub intergalactic_research_network: u32,
    pub graviton: u32,
    pub weapons: u32,
    pub shielding: u32,
    pub armour: u32,
}

impl Researches {
    pub fn level(&self, research: Research) -> u32 {
        match research {
            Research::Energy => self.energy,
            Research::Laser => self.laser,
            Research::Ion => self.ion,
            Research::Hyperspace => self.hyperspace,
            Research::Plasma => self.plasma,
            Research::CombustionDrive => self.combustion_drive,
            Research::ImpulseDrive => self.impulse_drive,
            Research::HyperspaceDrive => self.hyperspace_drive,
            Research::Espionage => self.espionage,
            Research::Computer => self.computer,
            Research::Astrophysics => self.astrophysics,
            Research::IntergalacticResearchNetwork => self.intergalactic_research_network,
            Research::Graviton => self.graviton,
            Research::Weapons => self.weapons,
            Research::Shielding => self.shielding,
            Research::Armour => self.armour,
        }
    }

    fn level_mut(&mut self, research: Research) -> &mut u32 {
        match research {
            Research::Energy => &mut self.energy,
            Research::Laser => &mut self.laser,
            Research::Ion => &mut self.ion,
            Research::Hyperspace => &mut self.hyperspace,
            Research::Plasma => &mut self.plasma,
            Research::CombustionDrive => &mut self.combustion_drive,
            Research::ImpulseDrive => &mut self.impulse_drive,
            Research::HyperspaceDrive => &mut self.hyperspace_drive,
            Research::Espionage => &mut self.espionage,
            Research::Computer => &mut self.computer,
            Research::Astrophysics => &mut self.astrophysics,
            Research::IntergalacticResearchNetwork => &mut self.intergalactic_research_network,
            Research::Graviton => &mut self.graviton,
            Research::Weapons => &mut self.weapons,
            Research::Shielding => &mut self.shielding,
            Research::Armour => &mut self.armour,
        }
    }

    pub fn set(&mut self, research: Research, level: u32) {
        *self.level_mut(research) = level;
    }

    /// Builder-style setter.
    pub fn with(mut self, research: Research, level: u32) -> Self {
        self.set(research, level);
        self
    }
}
