use blockwalk_author::{EditCommand, EditError, Editor};
use blockwalk_common::{ConfigError, InputIntent, PlayerConfig, ViewAngles};
use blockwalk_input::{Action, IntentSampler, RawInput};
use blockwalk_kernel::{MotionState, PlayerBody, RayHit, StepReport, VoxelWorld, WorldEvent};
use glam::{IVec3, Vec3};
use std::time::Duration;

/// Result of one action within a frame.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Edited(EditCommand),
    Rejected(EditError),
    Undone(bool),
    Redone(bool),
}

/// Everything that happened during one [`Session::frame`].
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub step: StepReport,
    pub actions: Vec<(Action, ActionOutcome)>,
}

/// Player state a renderer needs after a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameView {
    pub tick: u64,
    pub position: Vec3,
    pub flying: bool,
    pub state: MotionState,
    pub view: ViewAngles,
    /// The cell currently under the crosshair.
    pub target: Option<RayHit>,
}

/// A running session: the voxel world, the player and the editor.
pub struct Session {
    world: VoxelWorld,
    body: PlayerBody,
    editor: Editor,
    sampler: IntentSampler,
    view: ViewAngles,
    tick: u64,
}

impl Session {
    /// Start a session on a flat ground plane of `config.ground_width`.
    pub fn new(config: PlayerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let world = VoxelWorld::flat_ground(config.ground_width);
        Self::with_world(config, world)
    }

    /// Start a session in a prepared world.
    pub fn with_world(config: PlayerConfig, world: VoxelWorld) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(spawn = ?config.spawn, cells = world.len(), "session started");
        Ok(Self {
            world,
            body: PlayerBody::new(config),
            editor: Editor::new(),
            sampler: IntentSampler::new(),
            view: ViewAngles::default(),
            tick: 0,
        })
    }

    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    pub fn body(&self) -> &PlayerBody {
        &self.body
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Occupied cells in insertion order, for a full mesh rebuild.
    pub fn cells(&self) -> impl Iterator<Item = IVec3> + '_ {
        self.world.cells()
    }

    /// Voxel changes since the last drain, for incremental mesh sync.
    pub fn drain_world_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }

    /// Run one frame: sample input, step the player, then apply `actions`
    /// in order.
    pub fn frame(&mut self, raw: &RawInput, actions: &[Action], now: Duration) -> FrameReport {
        let intent = self.sampler.sample(raw, now);
        let step = self.step(&intent);
        let actions = actions
            .iter()
            .map(|&action| (action, self.apply_action(action)))
            .collect();
        FrameReport { step, actions }
    }

    /// Advance the player one tick with an already-sampled intent.
    pub fn step(&mut self, intent: &InputIntent) -> StepReport {
        self.tick += 1;
        let _span = tracing::info_span!("frame", tick = self.tick).entered();
        self.view = intent.view;
        self.body.step(&self.world, intent)
    }

    /// Apply one discrete action using the current view direction.
    pub fn apply_action(&mut self, action: Action) -> ActionOutcome {
        let direction = self.view.direction();
        let edit = match action {
            Action::RemoveTarget => self
                .editor
                .remove_target(&mut self.world, &self.body, direction),
            Action::PlaceTarget => self
                .editor
                .place_target(&mut self.world, &self.body, direction),
            Action::Undo => {
                return ActionOutcome::Undone(self.editor.undo(&mut self.world, &self.body));
            }
            Action::Redo => {
                return ActionOutcome::Redone(self.editor.redo(&mut self.world, &self.body));
            }
        };
        match edit {
            Ok(cmd) => ActionOutcome::Edited(cmd),
            Err(err) => {
                tracing::debug!(?action, %err, "edit rejected");
                ActionOutcome::Rejected(err)
            }
        }
    }

    /// Snapshot of the player for rendering.
    pub fn view(&self) -> FrameView {
        FrameView {
            tick: self.tick,
            position: self.body.position(),
            flying: self.body.is_flying(),
            state: self.body.state(),
            view: self.view,
            target: Editor::target(&self.world, &self.body, self.view.direction()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    const FRAME: Duration = Duration::from_millis(16);

    fn idle() -> RawInput {
        RawInput::default()
    }

    fn looking_down() -> RawInput {
        RawInput {
            pitch: -FRAC_PI_2,
            ..RawInput::default()
        }
    }

    /// Run idle frames until grounded; returns the number of ticks taken.
    fn settle(session: &mut Session) -> u64 {
        let mut ticks = 0;
        while !session.body().is_grounded() {
            ticks += 1;
            session.frame(&idle(), &[], FRAME * ticks as u32);
            assert!(ticks < 1000, "never landed");
        }
        ticks
    }

    /// Smallest n with |g|·n(n+1)/2 ≥ drop: velocity after k ticks is k·g,
    /// so the fall after n ticks is the triangular sum.
    fn closed_form_fall_ticks(config: &PlayerConfig) -> u64 {
        let drop = config.spawn.y - config.height;
        let g = -config.gravity;
        (1..)
            .find(|&n: &u64| g * (n * (n + 1)) as f32 / 2.0 >= drop - 1e-6)
            .unwrap()
    }

    #[test]
    fn spawn_falls_to_ground_in_closed_form_ticks() {
        let config = PlayerConfig::default();
        let expected = closed_form_fall_ticks(&config);
        let mut session = Session::new(config).unwrap();

        let ticks = settle(&mut session);
        assert_eq!(ticks, expected);
        assert_eq!(ticks, 6);
        assert_eq!(session.view().state, MotionState::Grounded);
        assert!((session.body().position().y - 1.8).abs() < 1e-6);
    }

    #[test]
    fn removing_cell_below_starts_fall_next_tick() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        settle(&mut session);

        let report = session.frame(&looking_down(), &[Action::RemoveTarget], FRAME * 100);
        assert_eq!(report.step.state, MotionState::Grounded);
        assert_eq!(
            report.actions,
            vec![(
                Action::RemoveTarget,
                ActionOutcome::Edited(EditCommand::Remove { pos: IVec3::ZERO })
            )]
        );
        assert!(!session.world().contains(IVec3::ZERO));

        let report = session.frame(&looking_down(), &[], FRAME * 101);
        assert_eq!(report.step.previous, MotionState::Grounded);
        assert_eq!(report.step.state, MotionState::Airborne);
    }

    #[test]
    fn double_tap_through_raw_input_toggles_flight() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        settle(&mut session);

        let jump = RawInput {
            jump_held: true,
            ..RawInput::default()
        };
        let t0 = Duration::from_secs(5);
        session.frame(&jump, &[], t0);
        session.frame(&idle(), &[], t0 + FRAME);
        let report = session.frame(&jump, &[], t0 + FRAME * 8);
        assert_eq!(report.step.state, MotionState::Flying);
        assert!(session.view().flying);

        // holding the key does not produce further presses
        for i in 9..40 {
            session.frame(&jump, &[], t0 + FRAME * i);
        }
        assert!(session.view().flying);
    }

    #[test]
    fn held_jump_only_launches_once() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        settle(&mut session);
        let jump = RawInput {
            jump_held: true,
            ..RawInput::default()
        };
        let mut launches = 0;
        for i in 0..120 {
            let report = session.frame(&jump, &[], FRAME * (100 + i));
            if report.step.jump == Some(blockwalk_kernel::JumpOutcome::Jumped) {
                launches += 1;
            }
        }
        assert_eq!(launches, 1);
        assert!(session.body().is_grounded());
    }

    #[test]
    fn placed_cell_blocks_next_step() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        settle(&mut session);

        // Aim at the ground two cells ahead and place a cell on it.
        let aim = RawInput {
            pitch: -(1.3_f32 / 2.2).atan(),
            ..RawInput::default()
        };
        let report = session.frame(&aim, &[Action::PlaceTarget], FRAME * 50);
        let placed = IVec3::new(0, 1, -2);
        assert_eq!(
            report.actions[0].1,
            ActionOutcome::Edited(EditCommand::Insert { pos: placed })
        );

        let walk = RawInput {
            forward: true,
            ..RawInput::default()
        };
        for i in 0..30 {
            session.frame(&walk, &[], FRAME * (51 + i));
        }
        let z = session.body().position().z;
        assert!(z > -2.0 + 0.8 - 1e-4, "walked into placed cell: z={z}");
        assert!(z < -1.0);
    }

    #[test]
    fn undo_and_redo_actions() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        settle(&mut session);
        let actions = [Action::RemoveTarget, Action::Undo, Action::Redo, Action::Redo];

        let report = session.frame(&looking_down(), &actions, FRAME * 20);
        let outcomes: Vec<_> = report.actions.into_iter().map(|(_, o)| o).collect();
        assert_eq!(
            outcomes,
            vec![
                ActionOutcome::Edited(EditCommand::Remove { pos: IVec3::ZERO }),
                ActionOutcome::Undone(true),
                ActionOutcome::Redone(true),
                ActionOutcome::Redone(false),
            ]
        );
    }

    #[test]
    fn actions_apply_in_order_within_a_frame() {
        // High above the plane: remove, restore, remove again.
        let config = PlayerConfig {
            spawn: Vec3::new(0.0, 4.0, 0.0),
            ..PlayerConfig::default()
        };
        let mut session = Session::new(config).unwrap();
        let report = session.frame(
            &looking_down(),
            &[Action::RemoveTarget, Action::Undo, Action::RemoveTarget],
            FRAME,
        );
        assert_eq!(report.actions.len(), 3);
        assert_eq!(report.actions[1].1, ActionOutcome::Undone(true));
        assert!(!session.world().contains(IVec3::ZERO));
        assert_eq!(session.editor().undo_count(), 1);
    }

    #[test]
    fn frame_view_reports_target_and_events() {
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        assert_eq!(session.drain_world_events().len(), 400);
        settle(&mut session);
        session.frame(&looking_down(), &[], FRAME * 30);

        let view = session.view();
        assert_eq!(view.target.map(|hit| hit.cell), Some(IVec3::ZERO));
        assert_eq!(view.tick, session.tick());

        session.frame(&looking_down(), &[Action::RemoveTarget], FRAME * 31);
        assert_eq!(
            session.drain_world_events(),
            vec![WorldEvent::CellRemoved { pos: IVec3::ZERO }]
        );
        assert_eq!(session.cells().count(), 399);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let config = PlayerConfig {
            gravity: 0.0,
            ..PlayerConfig::default()
        };
        assert!(Session::new(config).is_err());
    }

    #[test]
    fn oversized_ground_is_rejected_before_generation() {
        let config = PlayerConfig {
            ground_width: u32::MAX,
            ..PlayerConfig::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::Invalid {
                field: "ground_width",
                ..
            })
        ));
    }

    #[test]
    fn far_spawn_is_rejected() {
        let config = PlayerConfig {
            spawn: Vec3::new(3.0e9, 2.0, 0.0),
            ..PlayerConfig::default()
        };
        assert!(matches!(
            Session::new(config),
            Err(ConfigError::Invalid { field: "spawn", .. })
        ));
    }
}
