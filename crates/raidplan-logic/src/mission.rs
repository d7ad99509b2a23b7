//! Mission orders: what the planner hands to the launch side.

use serde::{Deserialize, Serialize};

use crate::coordinates::{BodyId, Coordinates};
use crate::resources::Resources;
use crate::ships::{Fleet, ShipType};

// ============================================================================
// MISSION TYPES
// ============================================================================

/// Fleet mission kinds, numbered the way the game numbers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum MissionType {
    Attack = 1,
    AcsAttack = 2,
    Transport = 3,
    Deploy = 4,
    AcsDefend = 5,
    Espionage = 6,
    Colonize = 7,
    Recycle = 8,
    Destroy = 9,
    MissileAttack = 10,
    Expedition = 15,
}

/// Which universe fleet-speed setting a mission flies under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeedCategory {
    War,
    Peaceful,
    Holding,
}

impl MissionType {
    pub fn speed_category(self) -> SpeedCategory {
        match self {
            Self::Attack
            | Self::AcsAttack
            | Self::Espionage
            | Self::Destroy
            | Self::MissileAttack => SpeedCategory::War,
            Self::AcsDefend => SpeedCategory::Holding,
            Self::Transport
            | Self::Deploy
            | Self::Colonize
            | Self::Recycle
            | Self::Expedition => SpeedCategory::Peaceful,
        }
    }

    pub fn from_u8(val: u8) -> Option<Self> {
        match val {
            1 => Some(Self::Attack),
            2 => Some(Self::AcsAttack),
            3 => Some(Self::Transport),
            4 => Some(Self::Deploy),
            5 => Some(Self::AcsDefend),
            6 => Some(Self::Espionage),
            7 => Some(Self::Colonize),
            8 => Some(Self::Recycle),
            9 => Some(Self::Destroy),
            10 => Some(Self::MissileAttack),
            15 => Some(Self::Expedition),
            _ => None,
        }
    }
}

// ============================================================================
// MISSIONS
// ============================================================================

/// Expected outcome of a raid, attached to attack missions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RaidEstimate {
    /// Resources the sent cargo hold is expected to bring home.
    pub plunder: Resources,
    pub flight_time: u64,
    pub fuel: u64,
    pub efficiency: f64,
}

/// A dispatch order. Ownership passes to whoever launches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mission {
    pub origin: BodyId,
    pub destination: Coordinates,
    pub fleet: Fleet,
    pub mission_type: MissionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimate: Option<RaidEstimate>,
}

impl Mission {
    pub fn attack(
        origin: BodyId,
        destination: Coordinates,
        fleet: Fleet,
        estimate: RaidEstimate,
    ) -> Self {
        Self {
            origin,
            destination,
            fleet,
            mission_type: MissionType::Attack,
            estimate: Some(estimate),
        }
    }

    pub fn espionage(origin: BodyId, destination: Coordinates, probes: u64) -> Self {
        Self {
            origin,
            destination,
            fleet: Fleet::of(ShipType::EspionageProbe, probes),
            mission_type: MissionType::Espionage,
            estimate: None,
        }
    }
}
