//! Shared lattice types, per-tick intent and configuration for the blockwalk engine.
//!
//! # Invariants
//! - Cells are unit cubes centred on integer lattice positions.
//! - Lattice directions are exact unit vectors, never float approximations.
//! - Held controls and pressed edges are distinct fields of an intent.

pub mod config;
pub mod intent;
pub mod lattice;

pub use config::{ConfigError, PlayerConfig};
pub use intent::{InputIntent, ViewAngles};
pub use lattice::{CELL_HALF_EXTENT, cell_center, lattice_direction, lattice_of};
