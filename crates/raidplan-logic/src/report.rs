//! Espionage reports, and how shards of increasing detail merge into one.
//!
//! A scout sent with few probes sees only resources; more probes (or a
//! better espionage tech) reveal fleet, defense, buildings and finally
//! researches. The scraper hands over one [`EspionageReport`] per scouting
//! run; [`ShardedEspionageReport::from_shards`] stitches runs of increasing
//! [`InfoLevel`] into one view of the target.

use serde::{Deserialize, Serialize};

use crate::buildings::Buildings;
use crate::coordinates::Coordinates;
use crate::defense::Defense;
use crate::error::ReportError;
use crate::production::typical_max_temperature;
use crate::research::Researches;
use crate::resources::Resources;
use crate::ships::{Fleet, ShipType};

/// Share of the stock a raid may take when the report does not say.
pub const DEFAULT_LOOT_FRACTION: f64 = 0.75;

/// How much of the target a report reveals. Each level includes the ones
/// below it.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum InfoLevel {
    Resources = 0,
    Fleet = 1,
    Defense = 2,
    Buildings = 3,
    Researches = 4,
}

impl InfoLevel {
    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            0 => Some(Self::Resources),
            1 => Some(Self::Fleet),
            2 => Some(Self::Defense),
            3 => Some(Self::Buildings),
            4 => Some(Self::Researches),
            _ => None,
        }
    }
}

/// Header of one scouting run that went into a merged report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportShard {
    pub id: u64,
    /// Capture time, Unix milliseconds.
    pub timestamp: i64,
    pub info_level: InfoLevel,
}

/// A single scouting result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EspionageReport {
    pub id: u64,
    pub timestamp: i64,
    pub coordinates: Coordinates,
    pub info_level: InfoLevel,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub fleet: Option<Fleet>,
    #[serde(default)]
    pub defense: Option<Defense>,
    #[serde(default)]
    pub buildings: Option<Buildings>,
    #[serde(default)]
    pub researches: Option<Researches>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    #[serde(default)]
    pub loot_fraction: Option<f64>,
}

impl EspionageReport {
    fn shard(&self) -> ReportShard {
        ReportShard {
            id: self.id,
            timestamp: self.timestamp,
            info_level: self.info_level,
        }
    }

    /// A report must carry every section its info level unlocks.
    fn check_sections(&self) -> Result<(), ReportError> {
        let sections = [
            (InfoLevel::Fleet, "fleet", self.fleet.is_some()),
            (InfoLevel::Defense, "defense", self.defense.is_some()),
            (InfoLevel::Buildings, "buildings", self.buildings.is_some()),
            (InfoLevel::Researches, "researches", self.researches.is_some()),
        ];
        for (unlocked_at, section, present) in sections {
            if self.info_level >= unlocked_at && !present {
                return Err(ReportError::MissingSection {
                    level: self.info_level,
                    section,
                });
            }
        }
        Ok(())
    }
}

/// One logical report over a target, merged from shards of strictly
/// increasing info level. `source[0]` is the oldest shard and its timestamp
/// is the one used for aging.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShardedEspionageReport {
    pub source: Vec<ReportShard>,
    pub coordinates: Coordinates,
    pub info_level: InfoLevel,
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub fleet: Option<Fleet>,
    #[serde(default)]
    pub defense: Option<Defense>,
    #[serde(default)]
    pub buildings: Option<Buildings>,
    #[serde(default)]
    pub researches: Option<Researches>,
    #[serde(default)]
    pub max_temperature: Option<f64>,
    #[serde(default)]
    pub loot_fraction: Option<f64>,
}

impl ShardedEspionageReport {
    /// Merge scouting runs, oldest and least detailed first.
    ///
    /// Resources, temperature and loot fraction come from the oldest shard,
    /// which also anchors the report's age. Every other section comes from
    /// the first shard whose level unlocks it.
    pub fn from_shards(shards: Vec<EspionageReport>) -> Result<Self, ReportError> {
        let first = shards.first().ok_or(ReportError::Empty)?;
        for pair in shards.windows(2) {
            if pair[1].info_level <= pair[0].info_level {
                return Err(ReportError::InfoLevelNotIncreasing {
                    previous: pair[0].info_level,
                    next: pair[1].info_level,
                });
            }
        }
        for shard in &shards {
            if shard.coordinates != first.coordinates {
                return Err(ReportError::CoordinatesMismatch {
                    expected: first.coordinates,
                    found: shard.coordinates,
                });
            }
            shard.check_sections()?;
        }

        let mut merged = ShardedEspionageReport {
            source: shards.iter().map(EspionageReport::shard).collect(),
            coordinates: first.coordinates,
            info_level: first.info_level,
            resources: first.resources,
            fleet: None,
            defense: None,
            buildings: None,
            researches: None,
            max_temperature: first.max_temperature,
            loot_fraction: None,
        };
        for shard in shards {
            merged.info_level = shard.info_level;
            merged.fleet = merged.fleet.or(shard.fleet);
            merged.defense = merged.defense.or(shard.defense);
            merged.buildings = merged.buildings.or(shard.buildings);
            merged.researches = merged.researches.or(shard.researches);
            merged.max_temperature = merged.max_temperature.or(shard.max_temperature);
            merged.loot_fraction = merged.loot_fraction.or(shard.loot_fraction);
        }
        Ok(merged)
    }

    /// Capture time of the oldest shard.
    pub fn captured_at(&self) -> i64 {
        self.source.first().map_or(0, |s| s.timestamp)
    }

    /// Safe to raid without losses: the report shows both fleet and defense,
    /// no combat ships are parked there and nothing but missiles guards it.
    /// A report that does not reach the defense level is never clean.
    pub fn is_clean(&self) -> bool {
        match (&self.fleet, &self.defense) {
            (Some(fleet), Some(defense)) => {
                !fleet.has_offensive_ships() && !defense.has_active_defense()
            }
            _ => false,
        }
    }

    pub fn max_temperature(&self) -> f64 {
        self.max_temperature
            .unwrap_or_else(|| typical_max_temperature(self.coordinates.position))
    }

    pub fn loot_fraction(&self) -> f64 {
        self.loot_fraction.unwrap_or(DEFAULT_LOOT_FRACTION)
    }

    pub fn solar_satellites(&self) -> u64 {
        self.fleet
            .as_ref()
            .map_or(0, |f| f.get(ShipType::SolarSatellite))
    }
}
