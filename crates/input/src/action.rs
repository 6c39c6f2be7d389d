use serde::{Deserialize, Serialize};

/// A discrete interaction requested by the host for this frame.
///
/// Actions are applied strictly one at a time, in the order received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Remove the targeted cell (primary interact).
    RemoveTarget,
    /// Place a cell against the targeted face (secondary interact).
    PlaceTarget,
    /// Undo the last successful edit.
    Undo,
    /// Redo the last undone edit.
    Redo,
}
