//! Raid planning logic for OGame-style universes.
//!
//! Everything here is pure computation over plain data: no network, no
//! storage, no clock. Callers hand over a snapshot (espionage reports, owned
//! bodies, researches, transports per body) and get back missions to launch,
//! which keeps the whole crate unit-testable and usable from any runtime.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`buildings`] | Building kinds, cost tables and level snapshots |
//! | [`cargo`] | Cargo capacity and the two-phase plunder loader |
//! | [`coordinates`] | Galaxy coordinates, body types, owned bodies |
//! | [`defense`] | Defense units and the "active defense" check |
//! | [`error`] | Settings and report-merge errors |
//! | [`flight`] | Distance, flight time, fleet speed, fuel |
//! | [`mission`] | Mission types, speed categories, emitted missions |
//! | [`planner`] | Greedy raid planner over processing items |
//! | [`production`] | Mine output, energy, storage, cached cost curves |
//! | [`report`] | Espionage reports and shard merging |
//! | [`research`] | Research kinds and level snapshots |
//! | [`resources`] | Metal/crystal/deuterium triplets and loading order |
//! | [`settings`] | Planner configuration, JSON loading, validation |
//! | [`ships`] | Ship specs, drives, fleets |
//! | [`universe`] | Universe topology and speed multipliers |

pub mod buildings;
pub mod cargo;
pub mod coordinates;
pub mod defense;
pub mod error;
pub mod flight;
pub mod mission;
pub mod planner;
pub mod production;
pub mod report;
pub mod research;
pub mod resources;
pub mod settings;
pub mod ships;
pub mod universe;
