//! Building cost, mine output, energy balance and storage capacity.
//!
//! The formulas are exponential in the building level and get evaluated for
//! every report on every planning pass, so [`ProductionCalculator`] keeps
//! append-only caches keyed by (entity, level). The caches are mutated
//! through `&mut self`; one calculator belongs to one planner.

use std::collections::HashMap;

use crate::buildings::{Building, Buildings};
use crate::research::Researches;
use crate::resources::{Resource, Resources};

/// Output of a planet with no mines at all, per hour.
pub const NATURAL_PRODUCTION: Resources = Resources::new(30.0, 15.0, 0.0);

/// Mines run at full throttle unless told otherwise.
pub const FULL_THROTTLE: f64 = 1.0;

const PRODUCTION_GROWTH: f64 = 1.1;
const SOLAR_ENERGY_BASE: f64 = 20.0;
const FUSION_ENERGY_BASE: f64 = 30.0;
const FUSION_DEUTERIUM_BASE: f64 = 10.0;

fn base_production(resource: Resource) -> f64 {
    match resource {
        Resource::Metal => 30.0,
        Resource::Crystal => 20.0,
        Resource::Deuterium => 10.0,
    }
}

fn base_energy_consumption(mine: Resource) -> f64 {
    match mine {
        Resource::Metal => 10.0,
        Resource::Crystal => 10.0,
        Resource::Deuterium => 20.0,
    }
}

fn plasma_bonus_per_level(resource: Resource) -> f64 {
    match resource {
        Resource::Metal => 0.01,
        Resource::Crystal => 0.0066,
        Resource::Deuterium => 0.0033,
    }
}

fn mine_for(resource: Resource) -> Building {
    match resource {
        Resource::Metal => Building::MetalMine,
        Resource::Crystal => Building::CrystalMine,
        Resource::Deuterium => Building::DeuteriumSynthesizer,
    }
}

fn storage_for(resource: Resource) -> Building {
    match resource {
        Resource::Metal => Building::MetalStorage,
        Resource::Crystal => Building::CrystalStorage,
        Resource::Deuterium => Building::DeuteriumTank,
    }
}

// ============================================================================
// POSITION & TEMPERATURE
// ============================================================================

/// Metal bonus of the middle positions.
pub fn metal_position_bonus(position: u32) -> f64 {
    match position {
        8 => 0.35,
        7 | 9 => 0.23,
        6 | 10 => 0.17,
        _ => 0.0,
    }
}

/// Crystal bonus of the positions closest to the sun.
pub fn crystal_position_bonus(position: u32) -> f64 {
    match position {
        1 => 0.40,
        2 => 0.30,
        3 => 0.20,
        _ => 0.0,
    }
}

/// Deuterium yield drops linearly as planets get hotter.
pub fn deuterium_temperature_multiplier(max_temperature: f64) -> f64 {
    1.44 - 0.004 * max_temperature
}

/// Mine output multipliers for a planet slot.
pub fn resource_multipliers(position: u32, max_temperature: f64) -> Resources {
    Resources::new(
        1.0 + metal_position_bonus(position),
        1.0 + crystal_position_bonus(position),
        deuterium_temperature_multiplier(max_temperature),
    )
}

/// Middle of the usual maximum-temperature band for a position, used when a
/// report does not say how hot the planet is.
pub fn typical_max_temperature(position: u32) -> f64 {
    const BY_POSITION: [f64; 15] = [
        240.0, 190.0, 140.0, 90.0, 80.0, 70.0, 60.0, 50.0, 40.0, 30.0, 20.0, 10.0, -30.0, -70.0,
        -110.0,
    ];
    let index = position.clamp(1, BY_POSITION.len() as u32) as usize - 1;
    BY_POSITION[index]
}

/// Energy one solar satellite yields on a planet this hot.
pub fn solar_satellite_energy(max_temperature: f64) -> f64 {
    ((max_temperature + 140.0) / 6.0).floor().max(0.0)
}

// ============================================================================
// CALCULATOR
// ============================================================================

/// What the production estimate needs to know about one planet.
#[derive(Debug, Clone, Copy)]
pub struct PlanetEconomy<'a> {
    pub position: u32,
    pub max_temperature: f64,
    /// `None` when no scout has seen the buildings yet.
    pub buildings: Option<&'a Buildings>,
    pub researches: Option<&'a Researches>,
    pub solar_satellites: u64,
}

#[derive(Debug, Default)]
pub struct ProductionCalculator {
    costs: HashMap<(Building, u32), Resources>,
    /// Prefix sums of level costs, keyed by the starting level.
    cumulative: HashMap<(Building, u32), Vec<Resources>>,
    production: HashMap<(Resource, u32), f64>,
    storage: HashMap<u32, f64>,
}

impl ProductionCalculator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Price of building `level`. Level 0 costs nothing.
    pub fn cost(&mut self, building: Building, level: u32) -> Resources {
        if level == 0 {
            return Resources::ZERO;
        }
        *self.costs.entry((building, level)).or_insert_with(|| {
            let spec = building.spec();
            (spec.base_cost * spec.growth.powi(level as i32 - 1)).floor()
        })
    }

    /// Total price of upgrading from level `from` to level `to`.
    pub fn accumulative_cost(&mut self, building: Building, from: u32, to: u32) -> Resources {
        if to <= from {
            return Resources::ZERO;
        }
        let needed = (to - from) as usize;
        let key = (building, from);
        let (have, mut running) = self
            .cumulative
            .get(&key)
            .map_or((0, Resources::ZERO), |sums| {
                (sums.len(), sums.last().copied().unwrap_or(Resources::ZERO))
            });

        if have < needed {
            let mut extra = Vec::with_capacity(needed - have);
            for level in (from + have as u32 + 1)..=to {
                running += self.cost(building, level);
                extra.push(running);
            }
            self.cumulative.entry(key).or_default().extend(extra);
        }

        self.cumulative
            .get(&key)
            .and_then(|sums| sums.get(needed - 1))
            .copied()
            .unwrap_or(Resources::ZERO)
    }

    /// Hourly mine output before multipliers, energy and universe speed.
    pub fn production(&mut self, resource: Resource, level: u32) -> f64 {
        if level == 0 {
            return 0.0;
        }
        *self.production.entry((resource, level)).or_insert_with(|| {
            let l = f64::from(level);
            l * PRODUCTION_GROWTH.powf(l) * base_production(resource)
        })
    }

    /// Energy a mine draws at full throttle. Left unrounded: the game rounds
    /// only after scaling by the throttle.
    pub fn energy_consumption(&self, mine: Resource, level: u32) -> f64 {
        let l = f64::from(level);
        base_energy_consumption(mine) * l * PRODUCTION_GROWTH.powf(l)
    }

    /// Energy a mine draws at `throttle` (0.0 to 1.0), rounded.
    pub fn throttled_energy_consumption(&self, mine: Resource, level: u32, throttle: f64) -> f64 {
        (self.energy_consumption(mine, level) * throttle).round()
    }

    /// Solar plant output. Never throttled, so rounded right away.
    pub fn energy_production(&self, level: u32) -> f64 {
        let l = f64::from(level);
        (SOLAR_ENERGY_BASE * l * PRODUCTION_GROWTH.powf(l)).floor()
    }

    pub fn fusion_energy_production(&self, level: u32, energy_tech: u32) -> f64 {
        let l = f64::from(level);
        let growth = 1.05 + 0.01 * f64::from(energy_tech);
        (FUSION_ENERGY_BASE * l * growth.powf(l)).floor()
    }

    /// Hourly deuterium burned by a fusion reactor.
    pub fn fusion_deuterium_consumption(&self, level: u32) -> f64 {
        let l = f64::from(level);
        FUSION_DEUTERIUM_BASE * l * PRODUCTION_GROWTH.powf(l)
    }

    /// Capacity of a storage building (or tank) at `level`.
    pub fn storage_capacity(&mut self, level: u32) -> f64 {
        *self.storage.entry(level).or_insert_with(|| {
            5_000.0 * (2.5 * (20.0 * f64::from(level) / 33.0).exp()).floor()
        })
    }

    /// Estimated hourly output of a planet, universe speed included.
    ///
    /// Without building data only the natural trickle is counted.
    pub fn hourly_production(
        &mut self,
        planet: &PlanetEconomy<'_>,
        economy_speed: f64,
    ) -> Resources {
        let Some(buildings) = planet.buildings else {
            return NATURAL_PRODUCTION * economy_speed;
        };
        let plasma = planet.researches.map_or(0, |r| r.plasma);
        let energy_tech = planet.researches.map_or(0, |r| r.energy);

        let produced = self.energy_production(buildings.solar_plant)
            + self.fusion_energy_production(buildings.fusion_reactor, energy_tech)
            + solar_satellite_energy(planet.max_temperature) * planet.solar_satellites as f64;
        let required: f64 = Resource::ALL
            .iter()
            .map(|r| {
                self.throttled_energy_consumption(
                    *r,
                    buildings.level(mine_for(*r)),
                    FULL_THROTTLE,
                )
            })
            .sum();
        let energy_factor = if required > 0.0 {
            (produced / required).min(1.0)
        } else {
            1.0
        };

        let multipliers = resource_multipliers(planet.position, planet.max_temperature);
        let mut output = NATURAL_PRODUCTION;
        for resource in Resource::ALL {
            let mine = self.production(resource, buildings.level(mine_for(resource)));
            let bonus = multipliers.get(resource)
                + plasma_bonus_per_level(resource) * f64::from(plasma);
            output.set(resource, output.get(resource) + mine * bonus * energy_factor);
        }
        output.deuterium -= self.fusion_deuterium_consumption(buildings.fusion_reactor);

        output * economy_speed
    }

    /// Storage capacity per resource; unknown buildings mean empty storage
    /// levels.
    pub fn production_limit(&mut self, buildings: Option<&Buildings>) -> Resources {
        let mut limit = Resources::ZERO;
        for resource in Resource::ALL {
            let level = buildings.map_or(0, |b| b.level(storage_for(resource)));
            limit.set(resource, self.storage_capacity(level));
        }
        limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cost_levels() {
        let mut calc = ProductionCalculator::new();
        assert_eq!(calc.cost(Building::MetalMine, 0), Resources::ZERO);
        assert_eq!(calc.cost(Building::MetalMine, 1), Resources::new(60.0, 15.0, 0.0));
        // 15 * 1.5 = 22.5, floored.
        assert_eq!(calc.cost(Building::MetalMine, 2), Resources::new(90.0, 22.0, 0.0));
        assert_eq!(
            calc.cost(Building::RoboticsFactory, 3),
            Resources::new(1_600.0, 480.0, 800.0)
        );
        // Cached value comes back unchanged.
        assert_eq!(calc.cost(Building::MetalMine, 2), Resources::new(90.0, 22.0, 0.0));
    }

    #[test]
    fn test_accumulative_cost() {
        let mut calc = ProductionCalculator::new();
        assert_eq!(calc.accumulative_cost(Building::Shipyard, 4, 4), Resources::ZERO);
        assert_eq!(calc.accumulative_cost(Building::Shipyard, 5, 2), Resources::ZERO);

        let one_step = calc.accumulative_cost(Building::Shipyard, 0, 1);
        assert_eq!(one_step, Resources::new(400.0, 200.0, 100.0));

        // 400 + 800 + 1600
        let three = calc.accumulative_cost(Building::Shipyard, 0, 3);
        assert_eq!(three.metal, 2_800.0);
        // Shorter query after a longer one reuses the prefix sums.
        let two = calc.accumulative_cost(Building::Shipyard, 0, 2);
        assert_eq!(two.metal, 1_200.0);
        // Longer query extends them.
        let five = calc.accumulative_cost(Building::Shipyard, 0, 5);
        assert_eq!(five.metal, 400.0 * 31.0);
    }

    #[test]
    fn test_accumulative_matches_sum_of_costs() {
        let mut calc = ProductionCalculator::new();
        let mut expected = Resources::ZERO;
        for level in 11..=20 {
            expected += calc.cost(Building::CrystalMine, level);
        }
        assert_eq!(calc.accumulative_cost(Building::CrystalMine, 10, 20), expected);
    }

    #[test]
    fn test_mine_production() {
        let mut calc = ProductionCalculator::new();
        assert_eq!(calc.production(Resource::Metal, 0), 0.0);
        assert!((calc.production(Resource::Metal, 1) - 33.0).abs() < 1e-9);
        assert!((calc.production(Resource::Crystal, 1) - 22.0).abs() < 1e-9);
        // 10 * 10 * 1.1^10 ≈ 259.37
        assert!((calc.production(Resource::Deuterium, 10) - 259.374).abs() < 0.01);
    }

    #[test]
    fn test_energy() {
        let calc = ProductionCalculator::new();
        assert_eq!(calc.energy_production(1), 22.0);
        assert_eq!(calc.energy_production(0), 0.0);
        // 10 * 2 * 1.1^2 = 24.2 before rounding
        assert!((calc.energy_consumption(Resource::Metal, 2) - 24.2).abs() < 1e-9);
        assert_eq!(calc.throttled_energy_consumption(Resource::Metal, 2, 1.0), 24.0);
        assert_eq!(calc.throttled_energy_consumption(Resource::Metal, 2, 0.5), 12.0);
        assert_eq!(calc.fusion_energy_production(1, 0), 31.0);
    }

    #[test]
    fn test_storage_capacity() {
        let mut calc = ProductionCalculator::new();
        assert_eq!(calc.storage_capacity(0), 10_000.0);
        assert_eq!(calc.storage_capacity(1), 20_000.0);
        assert_eq!(calc.storage_capacity(2), 40_000.0);
        assert_eq!(calc.storage_capacity(5), 255_000.0);
    }

    #[test]
    fn test_multipliers() {
        let m = resource_multipliers(8, 40.0);
        assert!((m.metal - 1.35).abs() < 1e-9);
        assert_eq!(m.crystal, 1.0);
        assert!((m.deuterium - 1.28).abs() < 1e-9);

        let hot = resource_multipliers(1, 240.0);
        assert_eq!(hot.metal, 1.0);
        assert!((hot.crystal - 1.4).abs() < 1e-9);
        assert!(hot.deuterium < m.deuterium);
    }

    #[test]
    fn test_natural_production_without_buildings() {
        let mut calc = ProductionCalculator::new();
        let planet = PlanetEconomy {
            position: 8,
            max_temperature: 40.0,
            buildings: None,
            researches: None,
            solar_satellites: 0,
        };
        assert_eq!(calc.hourly_production(&planet, 2.0), Resources::new(60.0, 30.0, 0.0));
    }

    fn planet_with(buildings: &Buildings) -> PlanetEconomy<'_> {
        PlanetEconomy {
            position: 5,
            max_temperature: 60.0,
            buildings: Some(buildings),
            researches: None,
            solar_satellites: 0,
        }
    }

    #[test]
    fn test_energy_shortage_throttles_mines() {
        let mut calc = ProductionCalculator::new();
        let powered = Buildings {
            metal_mine: 10,
            crystal_mine: 8,
            deuterium_synthesizer: 5,
            solar_plant: 15,
            ..Buildings::default()
        };
        let starved = Buildings {
            solar_plant: 1,
            ..powered.clone()
        };
        let full = calc.hourly_production(&planet_with(&powered), 1.0);
        let weak = calc.hourly_production(&planet_with(&starved), 1.0);
        assert!(weak.metal < full.metal);
        assert!(weak.metal > NATURAL_PRODUCTION.metal);
        // 30 + 10 * 30 * 1.1^10 at full power.
        assert!((full.metal - (30.0 + 300.0 * 1.1f64.powi(10))).abs() < 0.01);
    }

    #[test]
    fn test_energy_factor_sums_rounded_mine_draws() {
        let mut calc = ProductionCalculator::new();
        // Each mine at level 2 draws 24.2, 24.2 and 48.4: rounded per mine
        // that is 96, rounding the total would give 97.
        let b = Buildings {
            metal_mine: 2,
            crystal_mine: 2,
            deuterium_synthesizer: 2,
            solar_plant: 1,
            ..Buildings::default()
        };
        let out = calc.hourly_production(&planet_with(&b), 1.0);
        let mine = calc.production(Resource::Metal, 2);
        assert!((out.metal - (30.0 + mine * 22.0 / 96.0)).abs() < 1e-9);
    }

    #[test]
    fn test_production_limit() {
        let mut calc = ProductionCalculator::new();
        assert_eq!(calc.production_limit(None), Resources::splat(10_000.0));
        let b = Buildings {
            metal_storage: 2,
            deuterium_tank: 1,
            ..Buildings::default()
        };
        assert_eq!(
            calc.production_limit(Some(&b)),
            Resources::new(40_000.0, 10_000.0, 20_000.0)
        );
    }

    #[test]
    fn test_typical_temperature_clamps_position() {
        assert_eq!(typical_max_temperature(1), 240.0);
        assert_eq!(typical_max_temperature(16), -110.0);
        assert_eq!(typical_max_temperature(0), 240.0);
    }
}
