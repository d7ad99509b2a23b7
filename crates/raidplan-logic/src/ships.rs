//! Ship definitions, drives and fleet compositions.
//!
//! Each ship type carries a static [`ShipSpec`]: cargo hold and the drives it
//! can be fitted with. A ship flies on the highest drive tier whose research
//! requirement is met; the drive decides both its speed and its fuel burn.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::research::{Research, Researches};

// ============================================================================
// DRIVES
// ============================================================================

/// Propulsion technology a ship's engine is built on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Drive {
    Combustion,
    Impulse,
    Hyperspace,
}

impl Drive {
    pub fn research(self) -> Research {
        match self {
            Self::Combustion => Research::CombustionDrive,
            Self::Impulse => Research::ImpulseDrive,
            Self::Hyperspace => Research::HyperspaceDrive,
        }
    }

    /// Speed bonus per research level.
    pub fn improvement_factor(self) -> f64 {
        match self {
            Self::Combustion => 0.1,
            Self::Impulse => 0.2,
            Self::Hyperspace => 0.3,
        }
    }
}

/// One drive option for a ship type.
#[derive(Debug, Clone, Copy)]
pub struct DriveSpec {
    pub drive: Drive,
    /// Research level at which this drive becomes usable.
    pub min_level: u32,
    pub base_speed: u64,
    pub base_consumption: u64,
}

const fn drive(drive: Drive, min_level: u32, base_speed: u64, base_consumption: u64) -> DriveSpec {
    DriveSpec {
        drive,
        min_level,
        base_speed,
        base_consumption,
    }
}

const SMALL_CARGO_DRIVES: &[DriveSpec] = &[
    drive(Drive::Combustion, 2, 5_000, 10),
    drive(Drive::Impulse, 5, 10_000, 20),
];
const LARGE_CARGO_DRIVES: &[DriveSpec] = &[drive(Drive::Combustion, 6, 7_500, 50)];
const LIGHT_FIGHTER_DRIVES: &[DriveSpec] = &[drive(Drive::Combustion, 1, 12_500, 20)];
const HEAVY_FIGHTER_DRIVES: &[DriveSpec] = &[drive(Drive::Impulse, 2, 10_000, 75)];
const CRUISER_DRIVES: &[DriveSpec] = &[drive(Drive::Impulse, 4, 15_000, 300)];
const BATTLESHIP_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 4, 10_000, 500)];
const COLONY_SHIP_DRIVES: &[DriveSpec] = &[drive(Drive::Impulse, 3, 2_500, 1_000)];
const RECYCLER_DRIVES: &[DriveSpec] = &[
    drive(Drive::Combustion, 6, 2_000, 300),
    drive(Drive::Impulse, 17, 4_000, 600),
    drive(Drive::Hyperspace, 15, 6_000, 900),
];
const PROBE_DRIVES: &[DriveSpec] = &[drive(Drive::Combustion, 3, 100_000_000, 1)];
const BOMBER_DRIVES: &[DriveSpec] = &[
    drive(Drive::Impulse, 6, 4_000, 700),
    drive(Drive::Hyperspace, 8, 5_000, 1_000),
];
const DESTROYER_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 6, 5_000, 1_000)];
const DEATHSTAR_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 7, 100, 1)];
const BATTLECRUISER_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 5, 10_000, 250)];
const REAPER_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 7, 7_000, 1_100)];
const PATHFINDER_DRIVES: &[DriveSpec] = &[drive(Drive::Hyperspace, 2, 12_000, 300)];

// ============================================================================
// SHIPS
// ============================================================================

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ShipType {
    SmallCargo = 0,
    LargeCargo = 1,
    LightFighter = 2,
    HeavyFighter = 3,
    Cruiser = 4,
    Battleship = 5,
    ColonyShip = 6,
    Recycler = 7,
    EspionageProbe = 8,
    Bomber = 9,
    SolarSatellite = 10,
    Destroyer = 11,
    Deathstar = 12,
    Battlecruiser = 13,
    Crawler = 14,
    Reaper = 15,
    Pathfinder = 16,
}

/// Static ship data.
#[derive(Debug, Clone, Copy)]
pub struct ShipSpec {
    pub name: &'static str,
    pub base_cargo: u64,
    /// Drive tiers, lowest first. Empty for stationary units.
    pub drives: &'static [DriveSpec],
}

impl ShipType {
    pub const COUNT: usize = 17;

    pub const ALL: [ShipType; Self::COUNT] = [
        Self::SmallCargo,
        Self::LargeCargo,
        Self::LightFighter,
        Self::HeavyFighter,
        Self::Cruiser,
        Self::Battleship,
        Self::ColonyShip,
        Self::Recycler,
        Self::EspionageProbe,
        Self::Bomber,
        Self::SolarSatellite,
        Self::Destroyer,
        Self::Deathstar,
        Self::Battlecruiser,
        Self::Crawler,
        Self::Reaper,
        Self::Pathfinder,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> ShipSpec {
        match self {
            Self::SmallCargo => ShipSpec {
                name: "Small Cargo",
                base_cargo: 5_000,
                drives: SMALL_CARGO_DRIVES,
            },
            Self::LargeCargo => ShipSpec {
                name: "Large Cargo",
                base_cargo: 25_000,
                drives: LARGE_CARGO_DRIVES,
            },
            Self::LightFighter => ShipSpec {
                name: "Light Fighter",
                base_cargo: 50,
                drives: LIGHT_FIGHTER_DRIVES,
            },
            Self::HeavyFighter => ShipSpec {
                name: "Heavy Fighter",
                base_cargo: 100,
                drives: HEAVY_FIGHTER_DRIVES,
            },
            Self::Cruiser => ShipSpec {
                name: "Cruiser",
                base_cargo: 800,
                drives: CRUISER_DRIVES,
            },
            Self::Battleship => ShipSpec {
                name: "Battleship",
                base_cargo: 1_500,
                drives: BATTLESHIP_DRIVES,
            },
            Self::ColonyShip => ShipSpec {
                name: "Colony Ship",
                base_cargo: 7_500,
                drives: COLONY_SHIP_DRIVES,
            },
            Self::Recycler => ShipSpec {
                name: "Recycler",
                base_cargo: 20_000,
                drives: RECYCLER_DRIVES,
            },
            Self::EspionageProbe => ShipSpec {
                name: "Espionage Probe",
                base_cargo: 0,
                drives: PROBE_DRIVES,
            },
            Self::Bomber => ShipSpec {
                name: "Bomber",
                base_cargo: 500,
                drives: BOMBER_DRIVES,
            },
            Self::SolarSatellite => ShipSpec {
                name: "Solar Satellite",
                base_cargo: 0,
                drives: &[],
            },
            Self::Destroyer => ShipSpec {
                name: "Destroyer",
                base_cargo: 2_000,
                drives: DESTROYER_DRIVES,
            },
            Self::Deathstar => ShipSpec {
                name: "Deathstar",
                base_cargo: 1_000_000,
                drives: DEATHSTAR_DRIVES,
            },
            Self::Battlecruiser => ShipSpec {
                name: "Battlecruiser",
                base_cargo: 750,
                drives: BATTLECRUISER_DRIVES,
            },
            Self::Crawler => ShipSpec {
                name: "Crawler",
                base_cargo: 0,
                drives: &[],
            },
            Self::Reaper => ShipSpec {
                name: "Reaper",
                base_cargo: 10_000,
                drives: REAPER_DRIVES,
            },
            Self::Pathfinder => ShipSpec {
                name: "Pathfinder",
                base_cargo: 10_000,
                drives: PATHFINDER_DRIVES,
            },
        }
    }

    /// Civil ships do not count as a defending force when judging targets.
    pub fn is_offensive(self) -> bool {
        !matches!(
            self,
            Self::SmallCargo
                | Self::LargeCargo
                | Self::ColonyShip
                | Self::Recycler
                | Self::EspionageProbe
                | Self::SolarSatellite
                | Self::Crawler
        )
    }

    /// Highest drive tier whose research requirement `researches` meets.
    pub fn usable_drive(self, researches: &Researches) -> Option<DriveSpec> {
        self.spec()
            .drives
            .iter()
            .rev()
            .find(|d| researches.level(d.drive.research()) >= d.min_level)
            .copied()
    }

    /// Speed with the usable drive and its research bonus, or `None` when the
    /// ship cannot fly with the given researches.
    pub fn speed(self, researches: &Researches) -> Option<u64> {
        self.usable_drive(researches).map(|d| {
            let level = researches.level(d.drive.research()) as f64;
            (d.base_speed as f64 * (1.0 + level * d.drive.improvement_factor())).floor() as u64
        })
    }
}

// ============================================================================
// FLEETS
// ============================================================================

/// Serialized shape of a fleet: only non-zero counts need to be present.
pub type FleetPartial = BTreeMap<ShipType, u64>;

/// Ship counts indexed by [`ShipType`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "FleetPartial", into = "FleetPartial")]
pub struct Fleet {
    counts: [u64; ShipType::COUNT],
}

impl Fleet {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fleet made of a single ship type.
    pub fn of(ship: ShipType, count: u64) -> Self {
        Self::new().with(ship, count)
    }

    pub fn get(&self, ship: ShipType) -> u64 {
        self.counts[ship.index()]
    }

    pub fn set(&mut self, ship: ShipType, count: u64) {
        self.counts[ship.index()] = count;
    }

    pub fn with(mut self, ship: ShipType, count: u64) -> Self {
        self.set(ship, count);
        self
    }

    /// Ship types with a non-zero count.
    pub fn iter(&self) -> impl Iterator<Item = (ShipType, u64)> + '_ {
        ShipType::ALL
            .iter()
            .map(|s| (*s, self.get(*s)))
            .filter(|(_, count)| *count > 0)
    }

    pub fn is_empty(&self) -> bool {
        self.counts.iter().all(|c| *c == 0)
    }

    pub fn total_ships(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn has_offensive_ships(&self) -> bool {
        self.iter().any(|(ship, _)| ship.is_offensive())
    }
}

impl From<FleetPartial> for Fleet {
    fn from(partial: FleetPartial) -> Self {
        let mut fleet = Fleet::new();
        for (ship, count) in partial {
            fleet.set(ship, count);
        }
        fleet
    }
}

impl From<Fleet> for FleetPartial {
    fn from(fleet: Fleet) -> Self {
        fleet.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_covers_every_index() {
        for (i, ship) in ShipType::ALL.iter().enumerate() {
            assert_eq!(ship.index(), i);
        }
    }

    #[test]
    fn test_drive_tiers_upgrade() {
        let base = Researches::default().with(Research::CombustionDrive, 6);
        let drive = ShipType::SmallCargo.usable_drive(&base).unwrap();
        assert_eq!(drive.drive, Drive::Combustion);
        assert_eq!(ShipType::SmallCargo.speed(&base), Some(8_000));

        let upgraded = base.with(Research::ImpulseDrive, 5);
        let drive = ShipType::SmallCargo.usable_drive(&upgraded).unwrap();
        assert_eq!(drive.drive, Drive::Impulse);
        assert_eq!(drive.base_consumption, 20);
        assert_eq!(ShipType::SmallCargo.speed(&upgraded), Some(20_000));
    }

    #[test]
    fn test_no_usable_drive() {
        let none = Researches::default();
        assert!(ShipType::LargeCargo.speed(&none).is_none());
        assert!(ShipType::SolarSatellite
            .speed(&none.clone().with(Research::HyperspaceDrive, 20))
            .is_none());
    }

    #[test]
    fn test_offensive_classification() {
        assert!(ShipType::LightFighter.is_offensive());
        assert!(ShipType::Deathstar.is_offensive());
        assert!(!ShipType::SolarSatellite.is_offensive());
        assert!(!ShipType::LargeCargo.is_offensive());
    }

    #[test]
    fn test_fleet_partial_serialization() {
        let fleet = Fleet::of(ShipType::LargeCargo, 12).with(ShipType::Recycler, 0);
        let json = serde_json::to_string(&fleet).unwrap();
        assert_eq!(json, r#"{"large_cargo":12}"#);

        let parsed: Fleet = serde_json::from_str(r#"{"cruiser":3,"small_cargo":0}"#).unwrap();
        assert_eq!(parsed.get(ShipType::Cruiser), 3);
        assert_eq!(parsed.get(ShipType::SmallCargo), 0);
        assert!(parsed.has_offensive_ships());
    }

    #[test]
    fn test_fleet_iter_skips_zero() {
        let fleet = Fleet::of(ShipType::SmallCargo, 2).with(ShipType::Cruiser, 0);
        let present: Vec<_> = fleet.iter().collect();
        assert_eq!(present, vec![(ShipType::SmallCargo, 2)]);
        assert_eq!(fleet.total_ships(), 2);
        assert!(!fleet.is_empty());
        assert!(Fleet::new().is_empty());
    }
}
