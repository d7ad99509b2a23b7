//! Planner configuration.
//!
//! Every field has a default, so a settings file only needs to name what it
//! changes. Load with [`PlannerSettings::from_json_str`] or
//! [`PlannerSettings::from_path`]; both validate before returning.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::cargo::cargo_capacity;
use crate::error::SettingsError;
use crate::research::Researches;
use crate::resources::{ResourceOrder, Resources};
use crate::ships::ShipType;
use crate::universe::UniverseSettings;

/// Half an hour, in milliseconds.
pub const DEFAULT_MAX_REPORT_AGE_MS: i64 = 30 * 60 * 1000;

/// Market value of each resource relative to metal.
pub const DEFAULT_PRICE_WEIGHTS: Resources = Resources::new(1.0, 1.5, 3.0);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub universe: UniverseSettings,
    /// Local clock minus server clock, in milliseconds.
    pub time_shift_ms: i64,
    pub price_weights: Resources,
    /// Reports older than this are re-scouted before raiding.
    pub max_report_age_ms: i64,
    /// Raids needing fewer transports are not worth a slot.
    pub min_raid_size: u64,
    /// Mission slots this pass may fill.
    pub max_missions: usize,
    /// Overrides the loot fraction carried by reports.
    pub loot_fraction: Option<f64>,
    /// Cargo ship used for raids.
    pub transport: ShipType,
    /// 1..=10, tenths of full speed.
    pub speed_percent: u8,
    pub probes_per_mission: u64,
    /// Loading priority for the cargo hold.
    pub resource_order: ResourceOrder,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            universe: UniverseSettings::default(),
            time_shift_ms: 0,
            price_weights: DEFAULT_PRICE_WEIGHTS,
            max_report_age_ms: DEFAULT_MAX_REPORT_AGE_MS,
            min_raid_size: 1,
            max_missions: 10,
            loot_fraction: None,
            transport: ShipType::SmallCargo,
            speed_percent: 10,
            probes_per_mission: 1,
            resource_order: ResourceOrder::default(),
        }
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<(), SettingsError> {
    // Written so NaN fails too.
    if value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("must be positive, got {value}")))
    }
}

impl PlannerSettings {
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: PlannerSettings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Reject settings the planner cannot work with.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(1..=10).contains(&self.speed_percent) {
            return Err(invalid(
                "speed_percent",
                format!("must be within 1..=10, got {}", self.speed_percent),
            ));
        }

        let universe = &self.universe;
        if universe.galaxies == 0 {
            return Err(invalid("universe.galaxies", "universe has no galaxies"));
        }
        if universe.systems == 0 {
            return Err(invalid("universe.systems", "galaxies have no systems"));
        }
        require_positive("universe.economy_speed", universe.economy_speed)?;
        require_positive("universe.fleet_speed_war", universe.fleet_speed_war)?;
        require_positive("universe.fleet_speed_peaceful", universe.fleet_speed_peaceful)?;
        require_positive("universe.fleet_speed_holding", universe.fleet_speed_holding)?;

        if let Some(fraction) = self.loot_fraction {
            if !(0.0..=1.0).contains(&fraction) {
                return Err(invalid(
                    "loot_fraction",
                    format!("must be within 0..=1, got {fraction}"),
                ));
            }
        }
        if cargo_capacity(self.transport, &Researches::default()) == 0 {
            return Err(invalid(
                "transport",
                format!("{} has no cargo hold", self.transport.spec().name),
            ));
        }
        if !self.resource_order.is_permutation() {
            return Err(invalid(
                "resource_order",
                "must name every resource exactly once",
            ));
        }
        Ok(())
    }
}
