use blockwalk_common::lattice_of;
use blockwalk_kernel::MotionState;
use blockwalk_session::Session;
use glam::{IVec3, Vec3};

/// Read-only queries against a session for debugging and overlays.
pub struct SessionInspector;

impl SessionInspector {
    /// Produce a summary of the session state.
    pub fn summary(session: &Session) -> SessionSummary {
        let view = session.view();
        SessionSummary {
            tick: view.tick,
            position: view.position,
            vertical_velocity: session.body().vertical_velocity(),
            state: view.state,
            cell_count: session.world().len(),
            pending_events: session.world().events().len(),
            undo_depth: session.editor().undo_count(),
            target: view.target.map(|hit| hit.cell),
        }
    }

    /// Occupied cells within `radius` (Chebyshev) of the player's cell,
    /// in insertion order.
    pub fn cells_near(session: &Session, radius: i32) -> Vec<IVec3> {
        let center = lattice_of(session.body().position());
        session
            .cells()
            .filter(|c| (*c - center).abs().max_element() <= radius)
            .collect()
    }
}

/// Summary of session state for the inspector.
#[derive(Debug, Clone)]
pub struct SessionSummary {
    pub tick: u64,
    pub position: Vec3,
    pub vertical_velocity: f32,
    pub state: MotionState,
    pub cell_count: usize,
    pub pending_events: usize,
    pub undo_depth: usize,
    pub target: Option<IVec3>,
}

impl std::fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Session: tick={} pos=({:.2}, {:.2}, {:.2}) vy={:.3} state={:?} cells={} pending_events={} undo={}",
            self.tick,
            self.position.x,
            self.position.y,
            self.position.z,
            self.vertical_velocity,
            self.state,
            self.cell_count,
            self.pending_events,
            self.undo_depth,
        )?;
        match self.target {
            Some(c) => write!(f, " target=({}, {}, {})", c.x, c.y, c.z),
            None => write!(f, " target=none"),
        }
    }
}
