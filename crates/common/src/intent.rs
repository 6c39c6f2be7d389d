use glam::Vec3;
use std::time::Duration;

/// Camera orientation in radians.
///
/// `yaw = 0, pitch = 0` looks down `-Z`; positive yaw turns left (towards
/// `-X`), positive pitch looks up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewAngles {
    pub yaw: f32,
    pub pitch: f32,
}

impl ViewAngles {
    pub fn new(yaw: f32, pitch: f32) -> Self {
        Self {
            yaw,
            pitch: pitch.clamp(-std::f32::consts::FRAC_PI_2, std::f32::consts::FRAC_PI_2),
        }
    }

    /// Unit view direction including pitch.
    pub fn direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        Vec3::new(-sy * cp, sp, -cy * cp)
    }

    /// Horizontal forward unit vector. Ignores pitch so looking up or down
    /// does not change walking speed.
    pub fn flat_forward(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        Vec3::new(-sy, 0.0, -cy)
    }

    /// Horizontal right unit vector, `flat_forward × Y`.
    pub fn flat_right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y)
    }
}

/// One tick of movement intent as consumed by the player body.
///
/// Directional fields are level-triggered (held); `jump_pressed` is
/// edge-triggered and true only on the tick the jump control went down.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InputIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub ascend: bool,
    pub descend: bool,
    pub jump_pressed: bool,
    pub view: ViewAngles,
    /// Session clock at sampling time, used for double-tap detection.
    pub time: Duration,
}

impl InputIntent {
    /// +1 forward, -1 backward, 0 when neither or both are held.
    pub fn forward_axis(&self) -> f32 {
        axis(self.forward, self.backward)
    }

    /// +1 right, -1 left.
    pub fn strafe_axis(&self) -> f32 {
        axis(self.right, self.left)
    }

    /// +1 ascend, -1 descend.
    pub fn vertical_axis(&self) -> f32 {
        axis(self.ascend, self.descend)
    }
}

fn axis(positive: bool, negative: bool) -> f32 {
    match (positive, negative) {
        (true, false) => 1.0,
        (false, true) => -1.0,
        _ => 0.0,
    }
}
