//! Distance, flight duration, fleet speed and fuel burn.
//!
//! All functions are pure. Distances are in game units, durations in
//! seconds, fuel in deuterium.

use crate::coordinates::Coordinates;
use crate::mission::MissionType;
use crate::research::Researches;
use crate::ships::Fleet;
use crate::universe::UniverseSettings;

/// Distance units per galaxy hop.
const GALAXY_DISTANCE: u64 = 20_000;
/// Distance units per system hop, plus the fixed cost of leaving a system.
const SYSTEM_DISTANCE: u64 = 95;
const SYSTEM_BASE: u64 = 2_700;
/// Distance units per position inside a system, plus the in-system base.
const POSITION_DISTANCE: u64 = 5;
const POSITION_BASE: u64 = 1_000;
/// Distance between two bodies in the same slot (planet and its moon).
const SAME_SLOT: u64 = 5;

/// Gap between two indices on an axis of `length`, optionally wrapped.
pub fn axis_gap(a: u32, b: u32, length: u32, wrap: bool) -> u64 {
    let direct = a.abs_diff(b);
    if wrap && direct < length {
        u64::from(direct.min(length - direct))
    } else {
        u64::from(direct)
    }
}

/// Travel distance between two slots.
pub fn distance(a: &Coordinates, b: &Coordinates, universe: &UniverseSettings) -> u64 {
    if a.galaxy != b.galaxy {
        axis_gap(a.galaxy, b.galaxy, universe.galaxies, universe.donut_galaxy) * GALAXY_DISTANCE
    } else if a.system != b.system {
        axis_gap(a.system, b.system, universe.systems, universe.donut_system) * SYSTEM_DISTANCE
            + SYSTEM_BASE
    } else if a.position != b.position {
        POSITION_BASE + POSITION_DISTANCE * u64::from(a.position.abs_diff(b.position))
    } else {
        SAME_SLOT
    }
}

/// Flight duration in seconds.
///
/// `speed_percent` is the game's 10 to 100 % slider in steps of ten (1..=10);
/// values outside that range are clamped. A fleet with `max_speed == 0`
/// never arrives and gets `u64::MAX`.
pub fn flight_time(
    distance: u64,
    max_speed: u64,
    speed_percent: u8,
    mission: MissionType,
    universe: &UniverseSettings,
) -> u64 {
    if max_speed == 0 {
        return u64::MAX;
    }
    let percent = f64::from(speed_percent.clamp(1, 10));
    let base = 10.0 + 35_000.0 / percent * (10.0 * distance as f64 / max_speed as f64).sqrt();
    let seconds = (base / universe.speed_multiplier(mission)).round();
    (seconds as u64).max(1)
}

/// Speed of a mixed fleet: the slowest ship that can fly sets the pace.
///
/// Ship types without a usable drive are ignored; 0 when nothing can fly.
pub fn fleet_speed(fleet: &Fleet, researches: &Researches) -> u64 {
    fleet
        .iter()
        .filter_map(|(ship, _)| ship.speed(researches))
        .min()
        .unwrap_or(0)
}

/// Deuterium burned by `fleet` flying `distance` in `flight_time` seconds,
/// plus the upkeep for `holding_hours` parked at the destination.
pub fn fuel_consumption(
    distance: u64,
    fleet: &Fleet,
    researches: &Researches,
    flight_time: u64,
    holding_hours: u64,
    mission: MissionType,
    universe: &UniverseSettings,
) -> u64 {
    let distance = distance as f64;
    let realized = (flight_time as f64 * universe.speed_multiplier(mission) - 10.0).max(1.0);

    let mut consumption = 0.0;
    let mut holding_base = 0.0;
    for (ship, count) in fleet.iter() {
        let (Some(drive), Some(speed)) = (ship.usable_drive(researches), ship.speed(researches))
        else {
            continue;
        };
        if speed == 0 {
            continue;
        }
        // How hard this ship runs its engine to keep pace with the fleet.
        let slowdown = 35_000.0 / realized * (10.0 * distance / speed as f64).sqrt();
        let base = drive.base_consumption as f64 * count as f64;
        consumption += (base * distance / 35_000.0 * (slowdown / 10.0 + 1.0).powi(2)).max(1.0);
        holding_base += base;
    }

    let mut total = consumption.round() as u64;
    if holding_hours > 0 {
        total += ((holding_base * holding_hours as f64 / 10.0).floor() as u64).max(1);
    }
    total
}
