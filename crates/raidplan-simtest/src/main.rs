//! RaidPlan Headless Harness
//!
//! Validates the flight, cargo and production models and runs the planner
//! over a sample snapshot. Everything runs in-process against embedded data.
//!
//! Usage:
//!   cargo run -p raidplan-simtest
//!   cargo run -p raidplan-simtest -- --verbose
//!
//! `RUST_LOG` controls planner logging; `--verbose` defaults it to debug.

use std::collections::HashMap;

use raidplan_logic::buildings::{Building, Buildings};
use raidplan_logic::cargo::{capacity_for, plunder_with};
use raidplan_logic::coordinates::{BodyId, Coordinates, SpaceBody};
use raidplan_logic::flight::{distance, flight_time, fleet_speed, fuel_consumption};
use raidplan_logic::mission::{Mission, MissionType};
use raidplan_logic::planner::{FleetBudget, Planner, PlanningInput};
use raidplan_logic::production::{PlanetEconomy, ProductionCalculator};
use raidplan_logic::report::{EspionageReport, InfoLevel, ShardedEspionageReport};
use raidplan_logic::research::{Research, Researches};
use raidplan_logic::resources::{Resource, ResourceOrder, Resources};
use raidplan_logic::settings::PlannerSettings;
use raidplan_logic::ships::{Fleet, ShipType};
use raidplan_logic::universe::UniverseSettings;
use serde::Deserialize;

// ── Sample data ─────────────────────────────────────────────────────────
const SNAPSHOT_JSON: &str = include_str!("../../../data/sample_snapshot.json");
const SETTINGS_JSON: &str = include_str!("../../../data/default_settings.json");

/// What the scraper hands over before a planning pass.
#[derive(Debug, Deserialize)]
struct Snapshot {
    now_ms: i64,
    researches: Researches,
    bodies: Vec<SpaceBody>,
    transports: HashMap<BodyId, u64>,
    unexplored_targets: Vec<Coordinates>,
    /// Shards per target, oldest first.
    reports: Vec<Vec<EspionageReport>>,
}

// ── Test harness ────────────────────────────────────────────────────────

struct Check {
    name: String,
    passed: bool,
    detail: String,
}

type Section = (&'static str, fn(bool) -> Vec<Check>);

const SECTIONS: [Section; 5] = [
    ("Flight Model", validate_flight_model),
    ("Cargo Model", validate_cargo_model),
    ("Production Model", validate_production_model),
    ("Planner Scenarios", validate_planner_scenarios),
    ("Snapshot Plan", validate_snapshot_plan),
];

fn main() {
    let verbose = std::env::args().any(|a| a == "--verbose");
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    println!("=== RaidPlan Harness ===\n");

    let mut checks = Vec::new();
    for (title, section) in SECTIONS {
        println!("--- {title} ---");
        checks.extend(section(verbose));
    }

    if print_summary(&checks, verbose) > 0 {
        std::process::exit(1);
    }
}

/// Prints failing checks (all of them with `verbose`) and returns the failure count.
fn print_summary(checks: &[Check], verbose: bool) -> usize {
    println!();
    let failures: Vec<&Check> = checks.iter().filter(|c| !c.passed).collect();
    for c in checks.iter().filter(|c| verbose || !c.passed) {
        let mark = if c.passed { "ok  " } else { "FAIL" };
        println!("  [{mark}] {}: {}", c.name, c.detail);
    }
    println!(
        "\n=== {} checks, {} failing ===",
        checks.len(),
        failures.len()
    );
    failures.len()
}

fn check(name: &str, passed: bool, detail: String) -> Check {
    Check {
        name: name.into(),
        passed,
        detail,
    }
}

// ── 1. Flight Model ─────────────────────────────────────────────────────

fn validate_flight_model(verbose: bool) -> Vec<Check> {
    let mut results = Vec::new();
    let universe = UniverseSettings::default();

    // Symmetry over a coarse grid of the universe
    let grid: Vec<Coordinates> = (1..=universe.galaxies)
        .step_by(2)
        .flat_map(|g| {
            [1, 37, 250, 498, 499]
                .into_iter()
                .flat_map(move |s| [1, 8, 16].into_iter().map(move |p| Coordinates::new(g, s, p)))
        })
        .collect();
    let mut asymmetric = 0;
    for a in &grid {
        for b in &grid {
            if distance(a, b, &universe) != distance(b, a, &universe) {
                asymmetric += 1;
            }
        }
    }
    results.push(check(
        "flight_distance_symmetric",
        asymmetric == 0,
        format!("{} pairs, {} asymmetric", grid.len() * grid.len(), asymmetric),
    ));

    // Donut wrap: first and last galaxy/system are neighbours
    let g_wrap = distance(
        &Coordinates::new(1, 1, 1),
        &Coordinates::new(universe.galaxies, 1, 1),
        &universe,
    );
    let s_wrap = distance(
        &Coordinates::new(1, 1, 1),
        &Coordinates::new(1, universe.systems, 1),
        &universe,
    );
    results.push(check(
        "flight_donut_wrap",
        g_wrap == 20_000 && s_wrap == 2_795,
        format!("galaxy wrap {}, system wrap {}", g_wrap, s_wrap),
    ));

    // Flight time never grows with speed
    let mut monotone = true;
    for d in [5, 1_005, 2_795, 20_000, 80_000] {
        let times: Vec<u64> = [1_000, 5_000, 12_000, 40_000]
            .into_iter()
            .map(|v| flight_time(d, v, 10, MissionType::Attack, &universe))
            .collect();
        monotone &= times.windows(2).all(|w| w[1] <= w[0]);
    }
    results.push(check(
        "flight_time_monotone",
        monotone,
        "faster fleets arrive no later".into(),
    ));

    // Mixed fleets fly at the pace of the slowest ship
    let researches = Researches::default()
        .with(Research::CombustionDrive, 6)
        .with(Research::ImpulseDrive, 4);
    let lc = ShipType::LargeCargo.speed(&researches).unwrap_or(0);
    let cruiser = ShipType::Cruiser.speed(&researches).unwrap_or(0);
    let mixed = fleet_speed(
        &Fleet::of(ShipType::LargeCargo, 10).with(ShipType::Cruiser, 5),
        &researches,
    );
    results.push(check(
        "flight_fleet_speed_bottleneck",
        mixed == lc.min(cruiser) && mixed > 0,
        format!("large cargo {}, cruiser {}, mixed {}", lc, cruiser, mixed),
    ));

    // Fuel grows with the number of ships
    let flight = flight_time(2_795, lc, 10, MissionType::Attack, &universe);
    let fuel_10 = fuel_consumption(
        2_795,
        &Fleet::of(ShipType::LargeCargo, 10),
        &researches,
        flight,
        0,
        MissionType::Attack,
        &universe,
    );
    let fuel_20 = fuel_consumption(
        2_795,
        &Fleet::of(ShipType::LargeCargo, 20),
        &researches,
        flight,
        0,
        MissionType::Attack,
        &universe,
    );
    results.push(check(
        "flight_fuel_scales",
        fuel_10 > 0 && fuel_20 > fuel_10,
        format!("10 LC: {} deut, 20 LC: {} deut", fuel_10, fuel_20),
    ));

    if verbose {
        println!("  Large cargo flight times at 100% (s):");
        for d in [1_005, 2_795, 20_000] {
            println!(
                "    {:>6} → {}",
                d,
                flight_time(d, lc, 10, MissionType::Attack, &universe)
            );
        }
    }

    results
}

// ── 2. Cargo Model ──────────────────────────────────────────────────────

fn validate_cargo_model(_verbose: bool) -> Vec<Check> {
    let mut results = Vec::new();
    let order = ResourceOrder::default();

    let boundary_ok = [0.0, 1.0, 999.0, 250_000.0].iter().all(|&x| {
        capacity_for(&Resources::new(x, 0.0, 0.0), &order) == x as u64
            && capacity_for(&Resources::splat(x), &order) == 3 * x as u64
    });
    results.push(check(
        "cargo_capacity_boundaries",
        boundary_ok,
        "capacity_for(m,0,0) = m, capacity_for(x,x,x) = 3x".into(),
    ));

    // Deterministic sweep over uneven triplets and hold sizes
    let amounts = [0.0, 7.0, 1_000.0, 33_333.0, 120_000.0, 999_999.0];
    let mut over_capacity = 0;
    let mut over_available = 0;
    let mut short_loads = 0;
    let mut cases = 0;
    for &m in &amounts {
        for &c in &amounts {
            for &d in &amounts {
                let stock = Resources::new(m, c, d);
                let loot = (stock * 0.5).floor();
                let needed = capacity_for(&loot, &order);
                for capacity in [0, 1, 5_000, 100_000, 1_500_000, needed] {
                    cases += 1;
                    let taken = plunder_with(&stock, capacity, 0.5, &order);
                    if taken.total() > capacity as f64 {
                        over_capacity += 1;
                    }
                    if Resource::ALL
                        .iter()
                        .any(|r| taken.get(*r) > loot.get(*r))
                    {
                        over_available += 1;
                    }
                }
                if plunder_with(&stock, needed, 0.5, &order) != loot {
                    short_loads += 1;
                }
            }
        }
    }
    results.push(check(
        "cargo_plunder_conserved",
        over_capacity == 0 && over_available == 0,
        format!(
            "{} loads, {} over capacity, {} over available",
            cases, over_capacity, over_available
        ),
    ));
    results.push(check(
        "cargo_capacity_sufficient",
        short_loads == 0,
        format!("{} triplets left behind with capacity_for", short_loads),
    ));

    results
}

// ── 3. Production Model ─────────────────────────────────────────────────

fn validate_production_model(verbose: bool) -> Vec<Check> {
    let mut results = Vec::new();
    let mut calc = ProductionCalculator::new();

    let costs_grow = (1..30).all(|l| {
        let a = calc.cost(Building::MetalMine, l);
        let b = calc.cost(Building::MetalMine, l + 1);
        b.total() > a.total()
    });
    let stepped = calc.accumulative_cost(Building::CrystalMine, 10, 15);
    let summed = (11..=15).fold(Resources::ZERO, |acc, l| {
        acc + calc.cost(Building::CrystalMine, l)
    });
    results.push(check(
        "production_costs",
        costs_grow && stepped == summed,
        format!("crystal mine 10→15 costs {:.0}", stepped.total()),
    ));

    let storage_grows = (0..20).all(|l| calc.storage_capacity(l + 1) > calc.storage_capacity(l));
    results.push(check(
        "production_storage_grows",
        storage_grows && calc.storage_capacity(0) == 10_000.0,
        format!("level 0 storage {:.0}", calc.storage_capacity(0)),
    ));

    // Without power the mines idle and only natural production remains
    let mines_only = Buildings {
        metal_mine: 20,
        crystal_mine: 15,
        deuterium_synthesizer: 10,
        ..Buildings::default()
    };
    let powered = Buildings {
        solar_plant: 22,
        ..mines_only.clone()
    };
    let unpowered = calc_hourly(&mut calc, Some(&mines_only));
    let full = calc_hourly(&mut calc, Some(&powered));
    let unknown = calc_hourly(&mut calc, None);
    results.push(check(
        "production_energy_factor",
        unpowered.metal < full.metal && unknown == Resources::new(30.0, 15.0, 0.0),
        format!(
            "metal/h unpowered {:.0}, powered {:.0}, unknown {:.0}",
            unpowered.metal, full.metal, unknown.metal
        ),
    ));

    if verbose {
        println!(
            "  Powered planet: {:.0} / {:.0} / {:.0} per hour",
            full.metal, full.crystal, full.deuterium
        );
    }

    results
}

fn calc_hourly(calc: &mut ProductionCalculator, buildings: Option<&Buildings>) -> Resources {
    let economy = PlanetEconomy {
        position: 8,
        max_temperature: 40.0,
        buildings,
        researches: None,
        solar_satellites: 0,
    };
    calc.hourly_production(&economy, 1.0)
}

// ── 4. Planner Scenarios ────────────────────────────────────────────────

fn validate_planner_scenarios(_verbose: bool) -> Vec<Check> {
    let mut results = Vec::new();
    let now = 1_700_000_000_000;
    let researches = Researches::default().with(Research::CombustionDrive, 6);
    let settings = PlannerSettings {
        transport: ShipType::LargeCargo,
        ..PlannerSettings::default()
    };

    let target = Coordinates::new(1, 100, 8);
    let shard = EspionageReport {
        id: 1,
        timestamp: now,
        coordinates: target,
        info_level: InfoLevel::Defense,
        resources: Resources::splat(833_333.0),
        fleet: Some(Fleet::new()),
        defense: Some(Default::default()),
        buildings: None,
        researches: None,
        max_temperature: None,
        loot_fraction: Some(0.5),
    };
    let reports = match ShardedEspionageReport::from_shards(vec![shard]) {
        Ok(report) => vec![report],
        Err(e) => {
            results.push(check("planner_report_merge", false, e.to_string()));
            return results;
        }
    };
    let bodies = [
        SpaceBody {
            id: 1,
            coordinates: Coordinates::new(1, 100, 9),
        },
        SpaceBody {
            id: 2,
            coordinates: Coordinates::new(1, 124, 8),
        },
    ];
    let input = PlanningInput {
        now_ms: now,
        unexplored_targets: &[],
        reports: &reports,
        bodies: &bodies,
        researches: &researches,
    };
    let mut budget = FleetBudget::from([(1, 10), (2, 100)]);
    let missions = Planner::new(settings).suggest_missions(&input, &mut budget);
    let from_b = missions.len() == 1
        && missions[0].origin == 2
        && missions[0].fleet.get(ShipType::LargeCargo) == 50;
    results.push(check(
        "planner_retarget_origin",
        from_b,
        format!("{:?}", missions.iter().map(describe).collect::<Vec<_>>()),
    ));

    results
}

// ── 5. Snapshot Plan ────────────────────────────────────────────────────

fn validate_snapshot_plan(verbose: bool) -> Vec<Check> {
    let mut results = Vec::new();

    let settings = match PlannerSettings::from_json_str(SETTINGS_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(check("snapshot_settings", false, e.to_string()));
            return results;
        }
    };
    let snapshot: Snapshot = match serde_json::from_str(SNAPSHOT_JSON) {
        Ok(s) => s,
        Err(e) => {
            results.push(check(
                "snapshot_parse",
                false,
                format!("JSON parse error: {}", e),
            ));
            return results;
        }
    };

    let shard_groups = snapshot.reports.len();
    let mut reports = Vec::new();
    let mut merge_errors = Vec::new();
    for shards in snapshot.reports {
        match ShardedEspionageReport::from_shards(shards) {
            Ok(report) => reports.push(report),
            Err(e) => merge_errors.push(e.to_string()),
        }
    }
    results.push(check(
        "snapshot_reports_merge",
        merge_errors.is_empty(),
        format!(
            "{}/{} merged {}",
            reports.len(),
            shard_groups,
            merge_errors.join("; ")
        ),
    ));

    log::info!(
        "Planning over {} reports from {} bodies",
        reports.len(),
        snapshot.bodies.len()
    );
    let input = PlanningInput {
        now_ms: snapshot.now_ms,
        unexplored_targets: &snapshot.unexplored_targets,
        reports: &reports,
        bodies: &snapshot.bodies,
        researches: &snapshot.researches,
    };
    let initial = snapshot.transports;
    let mut budget: FleetBudget = initial.clone();
    let mut planner = Planner::new(settings);
    let plan = planner.plan(&input, &mut budget);

    let attacks: Vec<&Mission> = plan
        .missions
        .iter()
        .filter(|m| m.mission_type == MissionType::Attack)
        .collect();
    results.push(check(
        "snapshot_has_attacks",
        !attacks.is_empty(),
        format!("{} missions, {} attacks", plan.missions.len(), attacks.len()),
    ));

    let unclean: Vec<Coordinates> = reports
        .iter()
        .filter(|r| !r.is_clean())
        .map(|r| r.coordinates)
        .collect();
    let raided_unclean = attacks
        .iter()
        .filter(|m| unclean.contains(&m.destination))
        .count();
    results.push(check(
        "snapshot_clean_only",
        raided_unclean == 0,
        format!("{} unclean targets, {} attacked", unclean.len(), raided_unclean),
    ));

    let scouted_unexplored = plan.missions.iter().any(|m| {
        m.mission_type == MissionType::Espionage
            && snapshot.unexplored_targets.contains(&m.destination)
    });
    results.push(check(
        "snapshot_unexplored_scouted",
        scouted_unexplored,
        "stale report yields its slot to an unexplored target".into(),
    ));

    let sent: u64 = attacks
        .iter()
        .map(|m| m.fleet.get(planner.settings().transport))
        .sum();
    let debited: u64 = initial
        .iter()
        .map(|(id, before)| before - budget.get(id).copied().unwrap_or(0))
        .sum();
    results.push(check(
        "snapshot_budget_consistent",
        sent == debited,
        format!("{} transports sent, {} debited", sent, debited),
    ));

    results.push(check(
        "snapshot_slot_bound",
        plan.missions.len() <= planner.settings().max_missions,
        format!(
            "{} of {} slots",
            plan.missions.len(),
            planner.settings().max_missions
        ),
    ));

    if verbose {
        println!("  Planned missions:");
        for m in &plan.missions {
            println!("    {}", describe(m));
        }
        match serde_json::to_string_pretty(&plan.missions) {
            Ok(json) => println!("{}", json),
            Err(e) => println!("  (could not serialize plan: {})", e),
        }
    }

    results
}

fn describe(mission: &Mission) -> String {
    let ships: Vec<String> = mission
        .fleet
        .iter()
        .map(|(ship, n)| format!("{} {}", n, ship.spec().name))
        .collect();
    format!(
        "{:?} {} from body {} with {}",
        mission.mission_type,
        mission.destination,
        mission.origin,
        ships.join(", ")
    )
}
