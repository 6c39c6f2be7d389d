//! Input boundary: host key state mapped to per-tick intents and discrete actions.
//!
//! # Invariants
//! - Movement controls are level-triggered; jump is edge-triggered.
//! - The kernel and authoring layer consume intents and actions, never raw key events.

pub mod action;
pub mod sampler;

pub use action::Action;
pub use sampler::{ButtonEdge, IntentSampler, RawInput};
