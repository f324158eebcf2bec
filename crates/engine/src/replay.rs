//! Recorded input scripts and deterministic replay.
//!
//! A script is the run seed, its settings, and the exact per-frame inputs and
//! deltas. Feeding it back through [`step`](crate::core::step) reproduces the run.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::{FrameInput, GameState, ModeSettings, RulesConfig};
use crate::types::ActionCode;

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to access replay file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid replay JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recorded frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptFrame {
    pub delta_ms: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pressed: Vec<ActionCode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub held: Vec<ActionCode>,
}

impl ScriptFrame {
    pub fn from_input(input: &FrameInput, delta_ms: u32) -> Self {
        Self {
            delta_ms,
            pressed: input.presses().collect(),
            held: input.held_codes().collect(),
        }
    }

    pub fn to_input(&self) -> FrameInput {
        let frame = self
            .pressed
            .iter()
            .fold(FrameInput::idle(), |f, &code| f.with_press(code));
        self.held.iter().fold(frame, |f, &code| f.with_held(code))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputScript {
    pub seed: u32,
    pub settings: ModeSettings,
    #[serde(default)]
    pub config: RulesConfig,
    pub frames: Vec<ScriptFrame>,
}

impl InputScript {
    pub fn new(seed: u32, settings: ModeSettings, config: RulesConfig) -> Self {
        Self {
            seed,
            settings,
            config,
            frames: Vec::new(),
        }
    }

    /// Script header matching a state's run
    pub fn for_state(state: &GameState) -> Self {
        Self::new(state.seed(), *state.settings(), *state.config())
    }

    pub fn push(&mut self, input: &FrameInput, delta_ms: u32) {
        self.frames.push(ScriptFrame::from_input(input, delta_ms));
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn from_json_str(text: &str) -> Result<Self, ReplayError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn to_json_string(&self) -> Result<String, ReplayError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplayError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ReplayError> {
        let path = path.as_ref();
        let text = self.to_json_string()?;
        std::fs::write(path, text).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fresh state for this script
    pub fn initial_state(&self) -> GameState {
        GameState::with_settings(self.seed, self.settings, self.config)
    }

    /// Run every frame and return the final state
    pub fn replay(&self) -> GameState {
        let mut state = self.initial_state();
        for frame in &self.frames {
            state.advance(&frame.to_input(), frame.delta_ms);
        }
        debug!(
            frames = self.frames.len(),
            score = state.score(),
            "replay finished"
        );
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::GameMode;

    fn sample_script() -> InputScript {
        let mut script = InputScript::new(7, ModeSettings::new(GameMode::Marathon), RulesConfig::default());
        script.push(&FrameInput::idle().with_press(ActionCode::MoveLeft), 16);
        script.push(
            &FrameInput::idle()
                .with_press(ActionCode::Flip)
                .with_held(ActionCode::SoftDrop),
            16,
        );
        script.push(&FrameInput::idle().with_press(ActionCode::HardDrop), 16);
        script
    }

    #[test]
    fn test_frames_keep_presses_and_holds() {
        let input = FrameInput::idle()
            .with_press(ActionCode::RotateCw)
            .with_held(ActionCode::MoveRight);
        let frame = ScriptFrame::from_input(&input, 16);
        assert_eq!(frame.pressed, vec![ActionCode::RotateCw]);
        assert_eq!(frame.to_input(), input);
    }

    #[test]
    fn test_idle_frame_json_is_compact() {
        let frame = ScriptFrame {
            delta_ms: 16,
            ..ScriptFrame::default()
        };
        assert_eq!(serde_json::to_string(&frame).unwrap(), r#"{"delta_ms":16}"#);
    }

    #[test]
    fn test_replay_is_deterministic() {
        let script = sample_script();
        let a = script.replay();
        let b = script.replay();
        assert_eq!(a.snapshot(), b.snapshot());
        assert!(a.score() > 0);
    }

    #[test]
    fn test_json_survives_and_replays_identically() {
        let script = sample_script();
        let text = script.to_json_string().unwrap();
        let back = InputScript::from_json_str(&text).unwrap();
        assert_eq!(back, script);
        assert_eq!(back.replay().snapshot(), script.replay().snapshot());
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let text = r#"{"seed":3,"settings":{"mode":"Chillax","starting_level":2,"garbage_height":1,"lives":3},"frames":[]}"#;
        let script = InputScript::from_json_str(text).unwrap();
        assert_eq!(script.config, RulesConfig::default());
        assert_eq!(script.replay().level(), 2);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        let err = InputScript::from_json_str("[").unwrap_err();
        assert!(matches!(err, ReplayError::Json(_)));
    }
}
