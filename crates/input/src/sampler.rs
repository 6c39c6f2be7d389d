use blockwalk_common::{InputIntent, ViewAngles};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Level state of the host's controls for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInput {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub ascend: bool,
    pub descend: bool,
    /// Whether the jump control is currently held down.
    pub jump_held: bool,
    /// View yaw in radians.
    pub yaw: f32,
    /// View pitch in radians.
    pub pitch: f32,
}

/// Turns a held/released level into a one-frame press edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonEdge {
    held: bool,
}

impl ButtonEdge {
    /// Feed the current level; returns true only on the released → held transition.
    pub fn update(&mut self, held: bool) -> bool {
        let pressed = held && !self.held;
        self.held = held;
        pressed
    }
}

/// Samples host level state into [`InputIntent`]s, one per tick.
#[derive(Debug, Clone, Default)]
pub struct IntentSampler {
    jump: ButtonEdge,
}

impl IntentSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build this tick's intent from the raw controls sampled at `now`.
    pub fn sample(&mut self, raw: &RawInput, now: Duration) -> InputIntent {
        let jump_pressed = self.jump.update(raw.jump_held);
        if jump_pressed {
            tracing::trace!(?now, "jump pressed");
        }
        InputIntent {
            forward: raw.forward,
            backward: raw.backward,
            left: raw.left,
            right: raw.right,
            ascend: raw.ascend,
            descend: raw.descend,
            jump_pressed,
            view: ViewAngles::new(raw.yaw, raw.pitch),
            time: now,
        }
    }
}
