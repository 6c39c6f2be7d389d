use blockwalk_common::cell_center;
use blockwalk_kernel::{PlayerBody, RayHit, VoxelWorld, cast_ray};
use glam::{IVec3, Vec3};

/// An edit that can be applied to the world and reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    /// A cell was placed. Undo = remove it.
    Insert { pos: IVec3 },
    /// A cell was removed. Undo = place it back.
    Remove { pos: IVec3 },
}

impl EditCommand {
    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match *self {
            Self::Insert { pos } => Self::Remove { pos },
            Self::Remove { pos } => Self::Insert { pos },
        }
    }

    pub fn pos(&self) -> IVec3 {
        match *self {
            Self::Insert { pos } | Self::Remove { pos } => pos,
        }
    }
}

/// Reasons an edit was rejected. The world is unchanged in every case.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EditError {
    #[error("no cell within reach")]
    NoTarget,
    #[error("cell {pos} is {distance:.2} from the player, inside the placement clearance")]
    TooClose { pos: IVec3, distance: f32 },
    #[error("cell {0} is already occupied")]
    Occupied(IVec3),
}

/// Ray-targeted editing with undo/redo.
///
/// Every successful remove or place is recorded and can be reversed with
/// [`Editor::undo`] and re-applied with [`Editor::redo`].
#[derive(Debug, Default)]
pub struct Editor {
    undo_stack: Vec<EditCommand>,
    redo_stack: Vec<EditCommand>,
}

impl Editor {
    /// Create a new editor.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cell the player is looking at, if any is within reach.
    pub fn target(world: &VoxelWorld, body: &PlayerBody, direction: Vec3) -> Option<RayHit> {
        cast_ray(world, body.eye(), direction, body.config().interaction_range)
    }

    /// Remove the targeted cell.
    pub fn remove_target(
        &mut self,
        world: &mut VoxelWorld,
        body: &PlayerBody,
        direction: Vec3,
    ) -> Result<EditCommand, EditError> {
        let hit = Self::target(world, body, direction).ok_or(EditError::NoTarget)?;
        world.remove(hit.cell);
        tracing::debug!(cell = ?hit.cell, distance = hit.distance, "removed cell");
        Ok(self.record(EditCommand::Remove { pos: hit.cell }))
    }

    /// Place a cell against the targeted face.
    pub fn place_target(
        &mut self,
        world: &mut VoxelWorld,
        body: &PlayerBody,
        direction: Vec3,
    ) -> Result<EditCommand, EditError> {
        let hit = Self::target(world, body, direction).ok_or(EditError::NoTarget)?;
        let pos = hit.adjacent();
        check_clearance(body, pos)?;
        if !world.insert(pos) {
            return Err(EditError::Occupied(pos));
        }
        tracing::debug!(cell = ?pos, against = ?hit.cell, "placed cell");
        Ok(self.record(EditCommand::Insert { pos }))
    }

    /// Undo the last edit. Returns true if an operation was undone.
    ///
    /// Restoring a removed cell is refused while the player stands within
    /// the placement clearance of it.
    pub fn undo(&mut self, world: &mut VoxelWorld, body: &PlayerBody) -> bool {
        let Some(&cmd) = self.undo_stack.last() else {
            return false;
        };
        if !apply_command(world, body, &cmd.inverse()) {
            return false;
        }
        self.undo_stack.pop();
        self.redo_stack.push(cmd);
        true
    }

    /// Redo the last undone edit. Returns true if an operation was redone.
    pub fn redo(&mut self, world: &mut VoxelWorld, body: &PlayerBody) -> bool {
        let Some(&cmd) = self.redo_stack.last() else {
            return false;
        };
        if !apply_command(world, body, &cmd) {
            return false;
        }
        self.redo_stack.pop();
        self.undo_stack.push(cmd);
        true
    }

    /// Number of operations on the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Number of operations on the redo stack.
    pub fn redo_count(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    fn record(&mut self, cmd: EditCommand) -> EditCommand {
        self.undo_stack.push(cmd);
        self.redo_stack.clear();
        cmd
    }
}

fn check_clearance(body: &PlayerBody, pos: IVec3) -> Result<(), EditError> {
    let distance = cell_center(pos).distance(body.position());
    if distance < body.config().place_clearance {
        return Err(EditError::TooClose { pos, distance });
    }
    Ok(())
}

fn apply_command(world: &mut VoxelWorld, body: &PlayerBody, cmd: &EditCommand) -> bool {
    match *cmd {
        EditCommand::Insert { pos } => {
            if check_clearance(body, pos).is_err() {
                tracing::debug!(cell = ?pos, "restore refused, player too close");
                return false;
            }
            world.insert(pos);
        }
        EditCommand::Remove { pos } => {
            world.remove(pos);
        }
    }
    true
}
