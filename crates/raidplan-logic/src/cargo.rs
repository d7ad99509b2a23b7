//! Cargo capacity and the plunder loading rule.
//!
//! # Loading rule
//!
//! A raiding fleet loads resources in two phases, walking a
//! [`ResourceOrder`]:
//!
//! 1. Each resource in turn takes an even share of what is left of the hold
//!    (`ceil(left / resources_still_to_load)`), capped by what is available.
//! 2. If the hold still has room, the first two resources split it again the
//!    same way, skipping any that are already exhausted.
//!
//! [`capacity_for`] is the inverse: the smallest hold that lets the rule
//! take a whole triplet.

use crate::research::{Research, Researches};
use crate::resources::{ResourceOrder, Resources};
use crate::ships::{Fleet, ShipType};

/// Default share of a planet's stock a raid can carry off.
pub const DEFAULT_PLUNDER_FACTOR: f64 = 0.5;

/// Cargo bonus per hyperspace technology level.
const HYPERSPACE_CARGO_BONUS: f64 = 0.05;

/// Hold size of one ship, including the hyperspace technology bonus.
pub fn cargo_capacity(ship: ShipType, researches: &Researches) -> u64 {
    let level = f64::from(researches.level(Research::Hyperspace));
    (ship.spec().base_cargo as f64 * (1.0 + level * HYPERSPACE_CARGO_BONUS)).floor() as u64
}

/// Combined hold of a fleet.
pub fn fleet_capacity(fleet: &Fleet, researches: &Researches) -> u64 {
    fleet
        .iter()
        .map(|(ship, count)| cargo_capacity(ship, researches) * count)
        .sum()
}

fn whole_units(value: f64) -> u64 {
    // NaN and negatives clamp to zero.
    value.floor().max(0.0) as u64
}

fn even_share(left: u64, slots: u64) -> u64 {
    left.div_ceil(slots)
}

/// Capacity needed to carry `resources` home in full under `order`.
///
/// With `(m, c, d)` the floored amounts in priority order, a balanced
/// triplet (`m <= c` or `2m <= c + d`) fits in `m + c + d`. Otherwise the
/// first phase leaves the leading resource short and the hold must grow to
/// `min(3c, 2m + d)`.
pub fn capacity_for(resources: &Resources, order: &ResourceOrder) -> u64 {
    let [m, c, d] = order.arrange(resources).map(whole_units);
    // Saturating so absurd report values cannot overflow.
    let rest = c.saturating_add(d);
    let sum = m.saturating_add(rest);
    let twice_m = m.saturating_mul(2);
    if m <= c || twice_m <= rest {
        sum
    } else {
        sum.max(c.saturating_mul(3).min(twice_m.saturating_add(d)))
    }
}

/// Resources a hold of `capacity` carries off from a planet holding
/// `resources`, when `plunder_factor` of the stock is up for grabs.
pub fn plunder_with(
    resources: &Resources,
    capacity: u64,
    plunder_factor: f64,
    order: &ResourceOrder,
) -> Resources {
    let available = order
        .arrange(resources)
        .map(|v| whole_units(v * plunder_factor));
    let mut taken = [0u64; 3];
    let mut left = capacity;

    for (i, amount) in available.iter().enumerate() {
        let share = even_share(left, (available.len() - i) as u64);
        taken[i] = share.min(*amount);
        left -= taken[i];
    }

    if left > 0 {
        let open: Vec<usize> = (0..2).filter(|&i| taken[i] < available[i]).collect();
        for (n, &i) in open.iter().enumerate() {
            let share = even_share(left, (open.len() - n) as u64);
            let extra = share.min(available[i] - taken[i]);
            taken[i] += extra;
            left -= extra;
        }
    }

    order.scatter(taken.map(|v| v as f64))
}
