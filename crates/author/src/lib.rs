//! In-World Authoring: ray-targeted removal and placement of cells, undo/redo.
//!
//! # Invariants
//! - All edits are reversible.
//! - A rejected edit leaves the world untouched.
//! - Cells are never placed within the clearance radius of the player.

pub mod editor;

pub use editor::{EditCommand, EditError, Editor};
