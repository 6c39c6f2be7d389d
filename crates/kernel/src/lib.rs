//! World Kernel: the voxel set, player collision, player stepping and ray targeting.
//!
//! # Invariants
//! - At most one cell per lattice position.
//! - Every effective voxel mutation produces an event record.
//! - Collision results match a linear scan in insertion order.
//! - After a tick the player is never left inside a cell's blocking band.

pub mod body;
pub mod collision;
pub mod targeting;
pub mod world;

pub use body::{JumpOutcome, MotionState, PlayerBody, StepReport};
pub use collision::{CollisionResolver, VerticalResolution};
pub use targeting::{RayHit, cast_ray};
pub use world::{VoxelWorld, WorldEvent};
