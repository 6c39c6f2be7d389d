//! JSON input scripts: a list of frame blocks replayed through a session.
//!
//! ```json
//! {
//!   "frame_ms": 16,
//!   "blocks": [
//!     { "repeat": 30 },
//!     { "input": { "forward": true }, "repeat": 10 },
//!     { "input": { "pitch": -1.57 }, "actions": ["remove_target"] }
//!   ]
//! }
//! ```

use anyhow::Context;
use blockwalk_input::{Action, RawInput};
use blockwalk_session::{ActionOutcome, Session};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Script {
    #[serde(default = "default_frame_ms")]
    pub frame_ms: u64,
    pub blocks: Vec<Block>,
}

fn default_frame_ms() -> u64 {
    16
}

/// `repeat` frames of the same raw input. Actions fire on the first frame only.
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub input: RawInput,
    #[serde(default)]
    pub actions: Vec<Action>,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_repeat() -> u32 {
    1
}

/// Session clock at `tick` for a fixed frame length. Saturates instead of
/// wrapping, so the clock never runs backwards.
pub fn frame_time(frame_ms: u64, tick: u64) -> Duration {
    Duration::from_millis(frame_ms.saturating_mul(tick))
}

/// Totals from replaying a script.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub frames: u64,
    pub edits: usize,
    pub rejected: usize,
}

impl RunStats {
    pub fn absorb(&mut self, other: RunStats) {
        self.frames += other.frames;
        self.edits += other.edits;
        self.rejected += other.rejected;
    }
}

impl Script {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing script {}", path.display()))
    }

    /// Replay every block through `session`.
    pub fn run(&self, session: &mut Session) -> RunStats {
        let mut stats = RunStats::default();
        for block in &self.blocks {
            for i in 0..block.repeat {
                let actions: &[Action] = if i == 0 { &block.actions } else { &[] };
                let now = frame_time(self.frame_ms, session.tick() + 1);
                let report = session.frame(&block.input, actions, now);
                stats.frames += 1;
                for (action, outcome) in &report.actions {
                    match outcome {
                        ActionOutcome::Rejected(err) => {
                            tracing::info!(?action, %err, "action rejected");
                            stats.rejected += 1;
                        }
                        ActionOutcome::Edited(cmd) => {
                            tracing::info!(?cmd, "edit applied");
                            stats.edits += 1;
                        }
                        ActionOutcome::Undone(done) | ActionOutcome::Redone(done) => {
                            tracing::info!(?action, done, "history");
                        }
                    }
                }
            }
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockwalk_common::PlayerConfig;
    use blockwalk_kernel::MotionState;

    #[test]
    fn parse_and_run_minimal_script() {
        let script: Script = serde_json::from_str(
            r#"{
                "blocks": [
                    { "repeat": 10 },
                    { "input": { "pitch": -1.5707964 }, "actions": ["remove_target"] },
                    { "input": { "pitch": -1.5707964 } }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(script.frame_ms, 16);

        let mut session = Session::new(PlayerConfig::default()).unwrap();
        let stats = script.run(&mut session);
        assert_eq!(stats.frames, 12);
        assert_eq!(stats.edits, 1);
        assert_eq!(stats.rejected, 0);
        assert_eq!(session.view().state, MotionState::Airborne);
    }

    #[test]
    fn rejected_actions_are_counted() {
        let script: Script = serde_json::from_str(
            r#"{ "blocks": [ { "input": { "pitch": 1.5 }, "actions": ["remove_target", "place_target"] } ] }"#,
        )
        .unwrap();
        let mut session = Session::new(PlayerConfig::default()).unwrap();
        let stats = script.run(&mut session);
        assert_eq!(stats.rejected, 2);
        assert_eq!(stats.edits, 0);
    }

    #[test]
    fn frame_time_is_monotonic_past_u32_ticks() {
        let wrap = u64::from(u32::MAX) + 1;
        assert!(frame_time(16, wrap + 1) > frame_time(16, wrap - 1));
        assert_eq!(frame_time(16, 3), Duration::from_millis(48));
        assert_eq!(frame_time(16, u64::MAX), frame_time(16, u64::MAX - 1));
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("walk.json");
        std::fs::write(&path, r#"{ "frame_ms": 10, "blocks": [ { "repeat": 3 } ] }"#).unwrap();
        let script = Script::load(&path).unwrap();
        assert_eq!(script.frame_ms, 10);
        assert_eq!(script.blocks[0].repeat, 3);
        assert!(script.blocks[0].actions.is_empty());
    }

    #[test]
    fn load_missing_file_errors() {
        assert!(Script::load(Path::new("/nonexistent/script.json")).is_err());
    }
}
