//! Resource kinds and the metal/crystal/deuterium triplet shared by the
//! cost, production and plunder formulas.

use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// The three stockpiled resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Metal,
    Crystal,
    Deuterium,
}

impl Resource {
    /// All resources in canonical order.
    pub const ALL: [Resource; 3] = [Resource::Metal, Resource::Crystal, Resource::Deuterium];

    pub fn index(self) -> usize {
        self as usize
    }
}

/// A metal/crystal/deuterium amount (or rate, or weight).
///
/// Values are kept as `f64` so production rates can accumulate fractional
/// output; the formulas that need whole units floor explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub metal: f64,
    pub crystal: f64,
    pub deuterium: f64,
}

impl Resources {
    pub const ZERO: Resources = Resources {
        metal: 0.0,
        crystal: 0.0,
        deuterium: 0.0,
    };

    pub const fn new(metal: f64, crystal: f64, deuterium: f64) -> Self {
        Self {
            metal,
            crystal,
            deuterium,
        }
    }

    pub fn splat(value: f64) -> Self {
        Self::new(value, value, value)
    }

    pub fn get(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Metal => self.metal,
            Resource::Crystal => self.crystal,
            Resource::Deuterium => self.deuterium,
        }
    }

    pub fn set(&mut self, resource: Resource, value: f64) {
        match resource {
            Resource::Metal => self.metal = value,
            Resource::Crystal => self.crystal = value,
            Resource::Deuterium => self.deuterium = value,
        }
    }

    /// Apply `f` to each component.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self::new(f(self.metal), f(self.crystal), f(self.deuterium))
    }

    /// Combine two triplets component-wise.
    pub fn zip_with(self, other: Resources, f: impl Fn(f64, f64) -> f64) -> Self {
        Self::new(
            f(self.metal, other.metal),
            f(self.crystal, other.crystal),
            f(self.deuterium, other.deuterium),
        )
    }

    pub fn floor(self) -> Self {
        self.map(f64::floor)
    }

    pub fn total(&self) -> f64 {
        self.metal + self.crystal + self.deuterium
    }

    /// Weighted sum, e.g. plunder valued in metal-equivalent units.
    pub fn dot(&self, weights: &Resources) -> f64 {
        self.metal * weights.metal
            + self.crystal * weights.crystal
            + self.deuterium * weights.deuterium
    }
}

impl Add for Resources {
    type Output = Resources;

    fn add(self, rhs: Resources) -> Resources {
        self.zip_with(rhs, |a, b| a + b)
    }
}

impl AddAssign for Resources {
    fn add_assign(&mut self, rhs: Resources) {
        *self = *self + rhs;
    }
}

impl Sub for Resources {
    type Output = Resources;

    fn sub(self, rhs: Resources) -> Resources {
        self.zip_with(rhs, |a, b| a - b)
    }
}

impl Mul<f64> for Resources {
    type Output = Resources;

    fn mul(self, rhs: f64) -> Resources {
        self.map(|v| v * rhs)
    }
}

/// Cargo loading priority: the order in which resources are packed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceOrder(pub [Resource; 3]);

impl Default for ResourceOrder {
    fn default() -> Self {
        Self(Resource::ALL)
    }
}

impl ResourceOrder {
    /// True when every resource appears exactly once.
    pub fn is_permutation(&self) -> bool {
        Resource::ALL
            .iter()
            .all(|r| self.0.iter().filter(|o| *o == r).count() == 1)
    }

    /// Pick the components of `resources` in priority order.
    pub fn arrange(&self, resources: &Resources) -> [f64; 3] {
        self.0.map(|r| resources.get(r))
    }

    /// Inverse of [`ResourceOrder::arrange`].
    pub fn scatter(&self, values: [f64; 3]) -> Resources {
        let mut out = Resources::ZERO;
        for (resource, value) in self.0.iter().zip(values) {
            out.set(*resource, value);
        }
        out
    }
}
