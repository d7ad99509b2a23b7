//! Greedy raid planner.
//!
//! One call to [`Planner::plan`] turns a snapshot of espionage reports,
//! owned bodies and per-body transport counts into an ordered mission list.
//!
//! # Pass outline
//!
//! 1. Every report becomes a [`ProcessingItem`]: its age, the target's
//!    production and storage limit, and the nearest owned body.
//! 2. Against that origin the item gets a flight time, the resources expected
//!    on arrival, the plunder they allow, the transports needed to carry it,
//!    the fuel bill and an efficiency (rated plunder per second of flight).
//! 3. Items are sorted by efficiency and the best one is popped until the
//!    pool is empty or every mission slot is used:
//!    - targets that are not clean are dropped;
//!    - stale reports spend the slot on scouting, preferably an unexplored
//!      target, in which case the stale item goes back into the pool;
//!    - fresh reports become attacks when the origin has enough transports,
//!      otherwise the origin is excluded and the item is re-targeted.
//!
//! Decisions are never revisited, and only re-targeted items get a new
//! efficiency. Every re-target excludes one more body, so an item with `N`
//! candidate origins is re-evaluated at most `N - 1` times.

use std::collections::HashMap;

use serde::Serialize;

use crate::cargo::{capacity_for, cargo_capacity, plunder_with};
use crate::coordinates::{BodyId, Coordinates, SpaceBody};
use crate::flight::{distance, flight_time, fuel_consumption};
use crate::mission::{Mission, MissionType, RaidEstimate};
use crate::production::{PlanetEconomy, ProductionCalculator};
use crate::report::ShardedEspionageReport;
use crate::research::Researches;
use crate::resources::{Resource, Resources};
use crate::settings::PlannerSettings;
use crate::ships::Fleet;
use crate::universe::UniverseSettings;

/// Transports still available per owned body. The planner debits it for
/// every attack it emits.
pub type FleetBudget = HashMap<BodyId, u64>;

/// Snapshot the planner works on. Nothing in it is mutated.
#[derive(Debug, Clone, Copy)]
pub struct PlanningInput<'a> {
    /// Unix milliseconds, local clock.
    pub now_ms: i64,
    /// Targets nobody has scouted yet.
    pub unexplored_targets: &'a [Coordinates],
    pub reports: &'a [ShardedEspionageReport],
    /// Candidate launch bodies.
    pub bodies: &'a [SpaceBody],
    pub researches: &'a Researches,
}

/// Working state for one report during a pass.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingItem<'r> {
    pub report: &'r ShardedEspionageReport,
    pub age_ms: i64,
    pub loot_fraction: f64,
    pub production: Resources,
    pub production_limit: Resources,
    pub origin: SpaceBody,
    pub distance: u64,
    pub flight_time: u64,
    pub expected_resources: Resources,
    pub max_plunder: Resources,
    pub required_transports: u64,
    pub fuel: u64,
    pub rated_value: f64,
    pub efficiency: f64,
    /// Bodies that turned out not to have enough transports.
    pub excluded_origins: Vec<BodyId>,
}

impl ProcessingItem<'_> {
    pub fn target(&self) -> Coordinates {
        self.report.coordinates
    }
}

/// Why an item left the pool without a mission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// Fleet or defense on the target, or the report does not show them.
    NotClean,
    /// Fewer transports needed than the configured minimum raid size.
    TooSmall,
    /// No remaining origin has enough transports.
    NoOrigin,
}

/// Outcome of a planning pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Plan<'r> {
    /// In emission order.
    pub missions: Vec<Mission>,
    /// Items still in the pool when the mission slots ran out.
    pub pending: Vec<ProcessingItem<'r>>,
    pub dropped: Vec<(ProcessingItem<'r>, DropReason)>,
}

/// Closest body to `target` that is not in `excluded`, with its distance.
/// Ties go to the body listed first.
pub fn nearest_body(
    target: &Coordinates,
    bodies: &[SpaceBody],
    excluded: &[BodyId],
    universe: &UniverseSettings,
) -> Option<(SpaceBody, u64)> {
    bodies
        .iter()
        .filter(|b| !excluded.contains(&b.id))
        .map(|b| (*b, distance(&b.coordinates, target, universe)))
        .min_by_key(|(_, d)| *d)
}

/// Stock on arrival after `hours` of production. Storage stops production
/// but never destroys stock already above it.
pub fn expected_resources(
    current: &Resources,
    production: &Resources,
    limit: &Resources,
    hours: f64,
) -> Resources {
    let mut expected = *current;
    for resource in Resource::ALL {
        let now = current.get(resource);
        let cap = limit.get(resource);
        if now < cap {
            let grown = now + production.get(resource) * hours;
            expected.set(resource, grown.clamp(0.0, cap));
        }
    }
    expected
}

/// Orders the pool ascending so the best item sits at the end. Equal
/// efficiency puts the lowest coordinates last.
fn by_efficiency(a: &ProcessingItem<'_>, b: &ProcessingItem<'_>) -> std::cmp::Ordering {
    a.efficiency
        .total_cmp(&b.efficiency)
        .then_with(|| b.target().cmp(&a.target()))
}

#[derive(Debug)]
pub struct Planner {
    settings: PlannerSettings,
    production: ProductionCalculator,
}

impl Planner {
    pub fn new(settings: PlannerSettings) -> Self {
        Self {
            settings,
            production: ProductionCalculator::new(),
        }
    }

    pub fn settings(&self) -> &PlannerSettings {
        &self.settings
    }

    /// Missions for this pass, best first.
    pub fn suggest_missions(
        &mut self,
        input: &PlanningInput<'_>,
        budget: &mut FleetBudget,
    ) -> Vec<Mission> {
        self.plan(input, budget).missions
    }

    /// Run one planning pass. `budget` is debited for every attack emitted.
    pub fn plan<'r>(&mut self, input: &PlanningInput<'r>, budget: &mut FleetBudget) -> Plan<'r> {
        let mut plan = Plan::default();
        if input.bodies.is_empty() {
            log::warn!("No launch bodies, nothing to plan");
            return plan;
        }
        if self.settings.transport.speed(input.researches).unwrap_or(0) == 0 {
            log::warn!(
                "{} cannot fly with current researches, raids will never arrive",
                self.settings.transport.spec().name
            );
        }

        let mut pool: Vec<ProcessingItem<'r>> = Vec::with_capacity(input.reports.len());
        for report in input.reports {
            let mut item = self.prepare(report, input);
            if self.assign_origin(&mut item, input) {
                pool.push(item);
            }
        }
        let mut unexplored = input.unexplored_targets.iter();
        let universe = &self.settings.universe;

        while plan.missions.len() < self.settings.max_missions {
            pool.sort_by(by_efficiency);
            let Some(mut item) = pool.pop() else {
                break;
            };
            let target = item.target();

            if !item.report.is_clean() {
                log::debug!("{target}: not clean, skipped");
                plan.dropped.push((item, DropReason::NotClean));
                continue;
            }

            if item.age_ms > self.settings.max_report_age_ms {
                let probes = self.settings.probes_per_mission;
                let fresh_target = unexplored.next().and_then(|coords| {
                    nearest_body(coords, input.bodies, &[], universe).map(|(b, _)| (b, *coords))
                });
                match fresh_target {
                    Some((body, coords)) => {
                        log::debug!(
                            "{target}: report {}s old, scouting unexplored {coords} instead",
                            item.age_ms / 1000
                        );
                        plan.missions.push(Mission::espionage(body.id, coords, probes));
                        pool.push(item);
                    }
                    None => {
                        log::debug!("{target}: report {}s old, re-scouting", item.age_ms / 1000);
                        plan.missions
                            .push(Mission::espionage(item.origin.id, target, probes));
                    }
                }
                continue;
            }

            // Nothing to carry means nothing to send, whatever the minimum.
            if item.required_transports == 0
                || item.required_transports < self.settings.min_raid_size
            {
                log::debug!(
                    "{target}: {} transports below minimum raid size",
                    item.required_transports
                );
                plan.dropped.push((item, DropReason::TooSmall));
                continue;
            }

            let available = budget.get(&item.origin.id).copied().unwrap_or(0);
            if available >= item.required_transports {
                budget.insert(item.origin.id, available - item.required_transports);
                log::debug!(
                    "{target}: attack from body {} with {} transports, efficiency {:.3}",
                    item.origin.id,
                    item.required_transports,
                    item.efficiency
                );
                let estimate = self.estimate(&item, input.researches);
                let fleet = Fleet::of(self.settings.transport, item.required_transports);
                plan.missions
                    .push(Mission::attack(item.origin.id, target, fleet, estimate));
                continue;
            }

            log::debug!(
                "{target}: body {} has {available} of {} transports",
                item.origin.id,
                item.required_transports
            );
            item.excluded_origins.push(item.origin.id);
            if self.assign_origin(&mut item, input) {
                log::debug!("{target}: re-targeted to body {}", item.origin.id);
                pool.push(item);
            } else {
                plan.dropped.push((item, DropReason::NoOrigin));
            }
        }

        plan.pending = pool;
        log::info!(
            "Planned {} missions ({} pending, {} dropped) from {} reports",
            plan.missions.len(),
            plan.pending.len(),
            plan.dropped.len(),
            input.reports.len()
        );
        plan
    }

    /// Origin-independent part of an item. Origin fields stay blank until
    /// [`Self::assign_origin`] runs.
    fn prepare<'r>(
        &mut self,
        report: &'r ShardedEspionageReport,
        input: &PlanningInput<'_>,
    ) -> ProcessingItem<'r> {
        let economy = PlanetEconomy {
            position: report.coordinates.position,
            max_temperature: report.max_temperature(),
            buildings: report.buildings.as_ref(),
            researches: report.researches.as_ref(),
            solar_satellites: report.solar_satellites(),
        };
        let production = self
            .production
            .hourly_production(&economy, self.settings.universe.economy_speed);
        let production_limit = self.production.production_limit(report.buildings.as_ref());
        let age_ms = (input.now_ms - report.captured_at() - self.settings.time_shift_ms).max(0);

        ProcessingItem {
            report,
            age_ms,
            loot_fraction: self
                .settings
                .loot_fraction
                .unwrap_or_else(|| report.loot_fraction()),
            production,
            production_limit,
            origin: SpaceBody {
                id: 0,
                coordinates: report.coordinates,
            },
            distance: 0,
            flight_time: 0,
            expected_resources: report.resources,
            max_plunder: Resources::ZERO,
            required_transports: 0,
            fuel: 0,
            rated_value: 0.0,
            efficiency: 0.0,
            excluded_origins: Vec::new(),
        }
    }

    /// Point `item` at its nearest non-excluded body and recompute everything
    /// that depends on the origin. False when no body is left.
    fn assign_origin(&self, item: &mut ProcessingItem<'_>, input: &PlanningInput<'_>) -> bool {
        let settings = &self.settings;
        let universe = &settings.universe;
        let Some((origin, distance)) = nearest_body(
            &item.report.coordinates,
            input.bodies,
            &item.excluded_origins,
            universe,
        ) else {
            return false;
        };

        let speed = settings.transport.speed(input.researches).unwrap_or(0);
        let flight = flight_time(
            distance,
            speed,
            settings.speed_percent,
            MissionType::Attack,
            universe,
        );
        let hours = (item.age_ms as f64 / 1000.0 + flight as f64) / 3600.0;
        let expected = expected_resources(
            &item.report.resources,
            &item.production,
            &item.production_limit,
            hours,
        );
        let max_plunder = (expected * item.loot_fraction).floor();
        let per_ship = cargo_capacity(settings.transport, input.researches).max(1);
        let transports = capacity_for(&max_plunder, &settings.resource_order).div_ceil(per_ship);
        let fuel = fuel_consumption(
            distance,
            &Fleet::of(settings.transport, transports),
            input.researches,
            flight,
            0,
            MissionType::Attack,
            universe,
        );
        let rated_value = max_plunder.dot(&settings.price_weights);

        item.origin = origin;
        item.distance = distance;
        item.flight_time = flight;
        item.expected_resources = expected;
        item.max_plunder = max_plunder;
        item.required_transports = transports;
        item.fuel = fuel;
        item.rated_value = rated_value;
        item.efficiency = rated_value / flight as f64;
        true
    }

    /// What the sent hold actually carries home.
    fn estimate(&self, item: &ProcessingItem<'_>, researches: &Researches) -> RaidEstimate {
        let settings = &self.settings;
        let capacity = item.required_transports * cargo_capacity(settings.transport, researches);
        RaidEstimate {
            plunder: plunder_with(
                &item.expected_resources,
                capacity,
                item.loot_fraction,
                &settings.resource_order,
            ),
            flight_time: item.flight_time,
            fuel: item.fuel,
            efficiency: item.efficiency,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defense::Defense;
    use crate::report::{InfoLevel, ReportShard};
    use crate::research::Research;
    use crate::ships::ShipType;

    const NOW: i64 = 1_700_000_000_000;

    fn clean_report(coordinates: Coordinates, captured_at: i64, stock: f64) -> ShardedEspionageReport {
        ShardedEspionageReport {
            source: vec![ReportShard {
                id: 1,
                timestamp: captured_at,
                info_level: InfoLevel::Defense,
            }],
            coordinates,
            info_level: InfoLevel::Defense,
            resources: Resources::splat(stock),
            fleet: Some(Fleet::new()),
            defense: Some(Defense::new()),
            buildings: None,
            researches: None,
            max_temperature: None,
            loot_fraction: None,
        }
    }

    fn body(id: BodyId, galaxy: u32, system: u32, position: u32) -> SpaceBody {
        SpaceBody {
            id,
            coordinates: Coordinates::new(galaxy, system, position),
        }
    }

    fn researches() -> Researches {
        Researches::default().with(Research::CombustionDrive, 6)
    }

    fn run(
        settings: PlannerSettings,
        reports: &[ShardedEspionageReport],
        bodies: &[SpaceBody],
        unexplored: &[Coordinates],
        budget: &mut FleetBudget,
    ) -> Vec<Mission> {
        let researches = researches();
        let input = PlanningInput {
            now_ms: NOW,
            unexplored_targets: unexplored,
            reports,
            bodies,
            researches: &researches,
        };
        Planner::new(settings).suggest_missions(&input, budget)
    }

    #[test]
    fn test_nearest_body_tie_and_exclusion() {
        let u = UniverseSettings::default();
        let target = Coordinates::new(1, 100, 8);
        let bodies = [body(1, 1, 100, 6), body(2, 1, 100, 10), body(3, 2, 100, 8)];
        let (first, d) = nearest_body(&target, &bodies, &[], &u).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(d, 1010);
        let (next, _) = nearest_body(&target, &bodies, &[1], &u).unwrap();
        assert_eq!(next.id, 2);
        let (last, _) = nearest_body(&target, &bodies, &[1, 2], &u).unwrap();
        assert_eq!(last.id, 3);
        assert!(nearest_body(&target, &bodies, &[1, 2, 3], &u).is_none());
    }

    #[test]
    fn test_expected_resources_respects_storage() {
        let current = Resources::new(5_000.0, 20_000.0, 0.0);
        let production = Resources::new(1_000.0, 1_000.0, -50.0);
        let limit = Resources::splat(10_000.0);
        let expected = expected_resources(&current, &production, &limit, 10.0);
        assert_eq!(expected.metal, 10_000.0);
        // Already above storage: kept as is.
        assert_eq!(expected.crystal, 20_000.0);
        // Negative balance never drives stock below zero.
        assert_eq!(expected.deuterium, 0.0);

        let short = expected_resources(&current, &production, &limit, 2.0);
        assert_eq!(short.metal, 7_000.0);
    }

    #[test]
    fn test_attack_debits_budget() {
        let settings = PlannerSettings {
            transport: ShipType::LargeCargo,
            ..PlannerSettings::default()
        };
        let reports = [clean_report(Coordinates::new(1, 100, 9), NOW, 100_000.0)];
        let bodies = [body(7, 1, 100, 8)];
        let mut budget = FleetBudget::from([(7, 100)]);

        let missions = run(settings, &reports, &bodies, &[], &mut budget);
        assert_eq!(missions.len(), 1);
        let mission = &missions[0];
        assert_eq!(mission.mission_type, MissionType::Attack);
        assert_eq!(mission.origin, 7);
        // 75 000 of each resource fits in 9 large cargos.
        assert_eq!(mission.fleet.get(ShipType::LargeCargo), 9);
        assert_eq!(budget[&7], 91);
        let estimate = mission.estimate.as_ref().unwrap();
        assert_eq!(estimate.plunder, Resources::splat(75_000.0));
        assert!(estimate.efficiency > 0.0);
    }

    #[test]
    fn test_unclean_target_is_dropped() {
        let mut guarded = clean_report(Coordinates::new(1, 100, 9), NOW, 100_000.0);
        guarded.fleet = Some(Fleet::of(ShipType::LightFighter, 1));
        let mut blind = clean_report(Coordinates::new(1, 100, 10), NOW, 100_000.0);
        blind.defense = None;
        let reports = [guarded, blind];
        let bodies = [body(1, 1, 100, 8)];
        let mut budget = FleetBudget::from([(1, 1_000)]);

        let researches = researches();
        let input = PlanningInput {
            now_ms: NOW,
            unexplored_targets: &[],
            reports: &reports,
            bodies: &bodies,
            researches: &researches,
        };
        let plan = Planner::new(PlannerSettings::default()).plan(&input, &mut budget);
        assert!(plan.missions.is_empty());
        assert_eq!(plan.dropped.len(), 2);
        assert!(plan.dropped.iter().all(|(_, r)| *r == DropReason::NotClean));
        assert_eq!(budget[&1], 1_000);
    }

    #[test]
    fn test_small_raid_is_dropped() {
        let settings = PlannerSettings {
            min_raid_size: 5,
            ..PlannerSettings::default()
        };
        let reports = [clean_report(Coordinates::new(1, 100, 9), NOW, 1_000.0)];
        let bodies = [body(1, 1, 100, 8)];
        let mut budget = FleetBudget::from([(1, 100)]);
        assert!(run(settings, &reports, &bodies, &[], &mut budget).is_empty());
    }

    #[test]
    fn test_empty_raid_is_dropped_without_minimum() {
        let settings = PlannerSettings {
            min_raid_size: 0,
            loot_fraction: Some(0.0),
            ..PlannerSettings::default()
        };
        let reports = [clean_report(Coordinates::new(1, 100, 9), NOW, 100_000.0)];
        let bodies = [body(1, 1, 100, 8)];
        let mut budget = FleetBudget::from([(1, 10)]);
        let researches = researches();
        let input = PlanningInput {
            now_ms: NOW,
            unexplored_targets: &[],
            reports: &reports,
            bodies: &bodies,
            researches: &researches,
        };
        let plan = Planner::new(settings).plan(&input, &mut budget);
        assert!(plan.missions.is_empty());
        assert_eq!(plan.dropped.len(), 1);
        assert_eq!(plan.dropped[0].0.required_transports, 0);
        assert_eq!(plan.dropped[0].1, DropReason::TooSmall);
        assert_eq!(budget[&1], 10);
    }

    #[test]
    fn test_stale_report_without_unexplored_is_rescouted() {
        let settings = PlannerSettings {
            probes_per_mission: 3,
            ..PlannerSettings::default()
        };
        let target = Coordinates::new(1, 100, 9);
        let reports = [clean_report(target, NOW - 3_600_000, 100_000.0)];
        let bodies = [body(4, 1, 100, 8)];
        let mut budget = FleetBudget::from([(4, 100)]);

        let missions = run(settings, &reports, &bodies, &[], &mut budget);
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].mission_type, MissionType::Espionage);
        assert_eq!(missions[0].destination, target);
        assert_eq!(missions[0].fleet.get(ShipType::EspionageProbe), 3);
        assert_eq!(budget[&4], 100);
    }

    #[test]
    fn test_time_shift_reduces_age() {
        // Captured an hour ago by the local clock, but the server runs an hour
        // behind, so the report is fresh.
        let settings = PlannerSettings {
            time_shift_ms: 3_600_000,
            ..PlannerSettings::default()
        };
        let reports = [clean_report(Coordinates::new(1, 100, 9), NOW - 3_600_000, 100_000.0)];
        let bodies = [body(1, 1, 100, 8)];
        let mut budget = FleetBudget::from([(1, 1_000)]);
        let missions = run(settings, &reports, &bodies, &[], &mut budget);
        assert_eq!(missions[0].mission_type, MissionType::Attack);
    }

    #[test]
    fn test_equal_efficiency_prefers_lowest_coordinates() {
        let settings = PlannerSettings {
            max_missions: 1,
            ..PlannerSettings::default()
        };
        let low = Coordinates::new(1, 100, 5);
        let high = Coordinates::new(1, 100, 7);
        let reports = [clean_report(high, NOW, 50_000.0), clean_report(low, NOW, 50_000.0)];
        let bodies = [body(1, 1, 100, 6)];
        let mut budget = FleetBudget::from([(1, 1_000)]);
        let missions = run(settings, &reports, &bodies, &[], &mut budget);
        assert_eq!(missions.len(), 1);
        assert_eq!(missions[0].destination, low);
    }

    #[test]
    fn test_no_bodies_plans_nothing() {
        let reports = [clean_report(Coordinates::new(1, 100, 9), NOW, 100_000.0)];
        let mut budget = FleetBudget::new();
        assert!(run(PlannerSettings::default(), &reports, &[], &[], &mut budget).is_empty());
    }

    #[test]
    fn test_mission_slots_bound_the_pass() {
        let settings = PlannerSettings {
            max_missions: 2,
            ..PlannerSettings::default()
        };
        let reports: Vec<_> = (1..=5)
            .map(|p| clean_report(Coordinates::new(1, 200, p), NOW, 10_000.0 * p as f64))
            .collect();
        let bodies = [body(1, 1, 200, 16)];
        let mut budget = FleetBudget::from([(1, 10_000)]);
        let missions = run(settings, &reports, &bodies, &[], &mut budget);
        assert_eq!(missions.len(), 2);
    }
}
