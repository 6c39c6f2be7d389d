//! Session: the per-frame loop a host drives.
//!
//! # Invariants
//! - Exactly one player step per frame, before that frame's actions.
//! - Actions are applied one at a time, in the order given.
//! - An edit is visible to the very next player step.

mod session;

pub use session::{ActionOutcome, FrameReport, FrameView, Session};
