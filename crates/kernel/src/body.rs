use blockwalk_common::{InputIntent, PlayerConfig};
use glam::Vec3;
use std::time::Duration;

use crate::collision::CollisionResolver;
use crate::world::VoxelWorld;

/// Movement mode of the player after the most recent tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MotionState {
    Grounded,
    Airborne,
    Flying,
}

/// What a single jump press did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOutcome {
    /// Launched from the ground.
    Jumped,
    /// Not grounded (or flying), nothing happened.
    Ignored,
    /// Second press of a double-tap; flight is now `flying`.
    FlightToggled { flying: bool },
}

/// Summary of one [`PlayerBody::step`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepReport {
    pub previous: MotionState,
    pub state: MotionState,
    pub jump: Option<JumpOutcome>,
    pub landed: bool,
    pub head_hit: bool,
}

/// The player: position, vertical velocity and movement mode, advanced one
/// tick at a time against a [`VoxelWorld`].
///
/// `position` is the reference point the collision bands are measured
/// from; the eye sits `eye_offset` above it.
#[derive(Debug, Clone)]
pub struct PlayerBody {
    config: PlayerConfig,
    resolver: CollisionResolver,
    position: Vec3,
    vertical_velocity: f32,
    grounded: bool,
    flying: bool,
    last_jump_input: Option<Duration>,
}

impl PlayerBody {
    /// Spawn at `config.spawn`, airborne until the first tick finds support.
    pub fn new(config: PlayerConfig) -> Self {
        Self {
            resolver: CollisionResolver::from_config(&config),
            position: config.spawn,
            vertical_velocity: 0.0,
            grounded: false,
            flying: false,
            last_jump_input: None,
            config,
        }
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Teleport without collision checks.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Origin of targeting rays.
    pub fn eye(&self) -> Vec3 {
        self.position + Vec3::Y * self.config.eye_offset
    }

    pub fn vertical_velocity(&self) -> f32 {
        self.vertical_velocity
    }

    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    pub fn is_flying(&self) -> bool {
        self.flying
    }

    pub fn state(&self) -> MotionState {
        if self.flying {
            MotionState::Flying
        } else if self.grounded {
            MotionState::Grounded
        } else {
            MotionState::Airborne
        }
    }

    /// Launch upwards if standing on something. Returns whether it did.
    pub fn jump(&mut self) -> bool {
        if !self.grounded || self.flying {
            return false;
        }
        self.vertical_velocity = self.config.jump_speed;
        self.grounded = false;
        true
    }

    /// Handle one jump-press edge at session time `now`.
    ///
    /// A press within the double-tap window of the previously recorded
    /// press toggles flight instead of jumping, and forgets the recorded
    /// press so a third quick press starts a new pair. A clock that went
    /// backwards never counts as a double-tap.
    pub fn press_jump(&mut self, now: Duration) -> JumpOutcome {
        let window = self.config.double_tap_window();
        let double_tap = self
            .last_jump_input
            .and_then(|prev| now.checked_sub(prev))
            .is_some_and(|elapsed| elapsed < window);

        if double_tap {
            self.last_jump_input = None;
            self.set_flying(!self.flying);
            return JumpOutcome::FlightToggled {
                flying: self.flying,
            };
        }

        self.last_jump_input = Some(now);
        if self.jump() {
            JumpOutcome::Jumped
        } else {
            JumpOutcome::Ignored
        }
    }

    /// Enter or leave flight. Vertical velocity resets either way.
    pub fn set_flying(&mut self, flying: bool) {
        if self.flying == flying {
            return;
        }
        self.flying = flying;
        self.vertical_velocity = 0.0;
        self.grounded = false;
        tracing::debug!(flying, "flight toggled");
    }

    /// Advance one tick.
    pub fn step(&mut self, world: &VoxelWorld, intent: &InputIntent) -> StepReport {
        let previous = self.state();
        let jump = intent
            .jump_pressed
            .then(|| self.press_jump(intent.time));

        // Gravity resumes on the tick after flight is switched off.
        let left_flight = jump == Some(JumpOutcome::FlightToggled { flying: false });
        let (landed, head_hit) = if self.flying {
            self.step_flying(world, intent);
            (false, false)
        } else {
            self.step_walking(world, intent, !left_flight)
        };

        let state = self.state();
        if state != previous {
            tracing::debug!(?previous, ?state, position = ?self.position, "motion state changed");
        }
        tracing::trace!(position = ?self.position, velocity = self.vertical_velocity, "player step");

        StepReport {
            previous,
            state,
            jump,
            landed,
            head_hit,
        }
    }

    fn step_walking(
        &mut self,
        world: &VoxelWorld,
        intent: &InputIntent,
        gravity: bool,
    ) -> (bool, bool) {
        if gravity {
            self.vertical_velocity += self.config.gravity;
        }
        let mut next = self.position;
        next.y += self.vertical_velocity;

        let vertical = self
            .resolver
            .resolve_vertical(world, next, self.vertical_velocity);
        self.position.y = vertical.clamped_y;
        self.vertical_velocity = vertical.velocity;
        self.grounded = vertical.landed;

        let speed = self.config.move_speed;
        let forward_step = intent.view.flat_forward() * intent.forward_axis() * speed;
        let right_step = intent.view.flat_right() * intent.strafe_axis() * speed;

        // Each axis is tried on its own so a wall on one still lets the
        // other slide.
        for step in [forward_step, right_step] {
            if step == Vec3::ZERO {
                continue;
            }
            let candidate = self.position + step;
            if !self.resolver.overlaps(world, candidate) {
                self.position = candidate;
            }
        }

        (vertical.landed, vertical.head_hit)
    }

    fn step_flying(&mut self, world: &VoxelWorld, intent: &InputIntent) {
        let horizontal = intent.view.flat_forward() * intent.forward_axis()
            + intent.view.flat_right() * intent.strafe_axis();
        let displacement =
            (horizontal + Vec3::Y * intent.vertical_axis()) * self.config.flight_speed;
        if displacement == Vec3::ZERO {
            return;
        }
        let candidate = self.position + displacement;
        if !self.resolver.overlaps(world, candidate) {
            self.position = candidate;
        }
    }
}
