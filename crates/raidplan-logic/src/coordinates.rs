//! Galaxy coordinates and owned launch bodies.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Number of positions in every solar system.
pub const POSITIONS_PER_SYSTEM: u32 = 16;

/// What sits at a coordinate slot.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BodyType {
    #[default]
    Planet,
    Moon,
    Debris,
}

/// A slot in the universe: galaxy, system, position and optional body type.
///
/// A missing body type means "planet" for equality, hashing and ordering, so
/// `[1:2:3]` and `[1:2:3 planet]` are the same key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Coordinates {
    pub galaxy: u32,
    pub system: u32,
    pub position: u32,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub body_type: Option<BodyType>,
}

impl Coordinates {
    pub fn new(galaxy: u32, system: u32, position: u32) -> Self {
        Self {
            galaxy,
            system,
            position,
            body_type: None,
        }
    }

    pub fn with_type(mut self, body_type: BodyType) -> Self {
        self.body_type = Some(body_type);
        self
    }

    pub fn resolved_type(&self) -> BodyType {
        self.body_type.unwrap_or_default()
    }

    fn key(&self) -> (u32, u32, u32, BodyType) {
        (self.galaxy, self.system, self.position, self.resolved_type())
    }
}

impl PartialEq for Coordinates {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Coordinates {}

impl Hash for Coordinates {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Coordinates {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Coordinates {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}:{}]", self.galaxy, self.system, self.position)?;
        match self.resolved_type() {
            BodyType::Planet => Ok(()),
            BodyType::Moon => write!(f, " (moon)"),
            BodyType::Debris => write!(f, " (debris)"),
        }
    }
}

/// Identifier the game assigns to an owned planet or moon.
pub type BodyId = u64;

/// An owned planet or moon, used as a candidate launch origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceBody {
    pub id: BodyId,
    pub coordinates: Coordinates,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_missing_type_equals_planet() {
        let bare = Coordinates::new(1, 2, 3);
        let planet = Coordinates::new(1, 2, 3).with_type(BodyType::Planet);
        let moon = Coordinates::new(1, 2, 3).with_type(BodyType::Moon);
        assert_eq!(bare, planet);
        assert_ne!(bare, moon);
        assert_eq!(bare.cmp(&planet), Ordering::Equal);

        let set: HashSet<Coordinates> = [bare, planet, moon].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_ordering_is_lexicographic() {
        let mut coords = vec![
            Coordinates::new(2, 1, 1),
            Coordinates::new(1, 5, 9).with_type(BodyType::Moon),
            Coordinates::new(1, 5, 9),
            Coordinates::new(1, 3, 15),
        ];
        coords.sort();
        assert_eq!(coords[0], Coordinates::new(1, 3, 15));
        assert_eq!(coords[1], Coordinates::new(1, 5, 9));
        assert_eq!(coords[2].resolved_type(), BodyType::Moon);
        assert_eq!(coords[3].galaxy, 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Coordinates::new(4, 120, 8).to_string(), "[4:120:8]");
        let moon = Coordinates::new(4, 120, 8).with_type(BodyType::Moon);
        assert_eq!(moon.to_string(), "[4:120:8] (moon)");
    }

    #[test]
    fn test_type_field_is_optional_in_json() {
        let c: Coordinates =
            serde_json::from_str(r#"{"galaxy":1,"system":2,"position":3}"#).unwrap();
        assert_eq!(c.body_type, None);
        let m: Coordinates =
            serde_json::from_str(r#"{"galaxy":1,"system":2,"position":3,"type":"moon"}"#)
                .unwrap();
        assert_eq!(m.resolved_type(), BodyType::Moon);
    }
}
