//! Run driver: one input sample, one step, then collaborator notifications.

use tracing::info;

use crate::core::{FrameInput, GameEvent, GameState, InputSource};
use crate::hooks::{AudioHook, ScoreEntry, ScoreStore};
use crate::replay::InputScript;

/// Owns a run and the collaborators that observe it
#[derive(Debug)]
pub struct Engine<A, S> {
    state: GameState,
    audio: A,
    store: S,
    recorded: bool,
    frames: u64,
    recording: Option<InputScript>,
}

impl<A: AudioHook, S: ScoreStore> Engine<A, S> {
    pub fn new(state: GameState, audio: A, store: S) -> Self {
        Self {
            state,
            audio,
            store,
            recorded: false,
            frames: 0,
            recording: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Mutable access for menu setters (mode, level, garbage height, lives)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Frames stepped since the current run started
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Sample the source once and advance one frame
    pub fn frame<I: InputSource + ?Sized>(&mut self, source: &mut I, delta_ms: u32) -> &[GameEvent] {
        let input = FrameInput::sample(source);
        self.step_input(&input, delta_ms)
    }

    /// Advance one frame with an already sampled input
    pub fn step_input(&mut self, input: &FrameInput, delta_ms: u32) -> &[GameEvent] {
        if let Some(script) = self.recording.as_mut() {
            script.push(input, delta_ms);
        }
        self.state.advance(input, delta_ms);
        self.frames += 1;

        for &event in self.state.events() {
            dispatch_audio(&mut self.audio, event);
        }

        if self.state.phase().is_finished() && !self.recorded {
            let entry = ScoreEntry::from_state(&self.state.score_state(), self.state.seed());
            info!(
                mode = entry.mode.as_str(),
                score = entry.score,
                won = entry.won,
                frames = self.frames,
                "run recorded"
            );
            self.store.record(entry);
            self.recorded = true;
        }

        self.state.events()
    }

    /// Start a new run with the current settings
    pub fn restart(&mut self) {
        self.state.reset();
        self.recorded = false;
        self.frames = 0;
        if self.recording.is_some() {
            self.recording = Some(InputScript::for_state(&self.state));
        }
    }

    /// Record every following frame of the current run
    pub fn start_recording(&mut self) {
        self.recording = Some(InputScript::for_state(&self.state));
    }

    pub fn take_recording(&mut self) -> Option<InputScript> {
        self.recording.take()
    }

    pub fn into_parts(self) -> (GameState, A, S) {
        (self.state, self.audio, self.store)
    }
}

fn dispatch_audio<A: AudioHook>(audio: &mut A, event: GameEvent) {
    match event {
        GameEvent::Locked { .. } => audio.play_lock(),
        GameEvent::LinesCleared { count, .. } if count < 4 => audio.play_clear(),
        GameEvent::Tetris { .. } => audio.play_tetris(),
        GameEvent::Flipped => audio.play_flip(),
        GameEvent::Rotated { .. } => audio.play_rotate(),
        GameEvent::HardDropped { .. } => audio.play_hard_drop(),
        GameEvent::LifeLost { .. } => audio.play_life_loss(),
        GameEvent::LevelUp { .. } => audio.play_level_up(),
        GameEvent::GameOver => audio.play_game_over(),
        GameEvent::Victory => audio.play_victory(),
        _ => {}
    }
}
