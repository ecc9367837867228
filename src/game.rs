//! Simulation wired to its collaborators
//!
//! [`Game`] owns a [`GameState`] together with the animation provider, the
//! audio sink and the progression store, all supplied at construction.

use crate::audio::{AudioMixer, AudioSink, SilentAudio};
use crate::consts::*;
use crate::progression::{ProgressionStore, RunHistory, RunSummary};
use crate::sim::animation::{AnimationProvider, SolidMasks};
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::tuning::Tuning;

/// Game instance holding the run and its collaborators
pub struct Game {
    state: GameState,
    animations: Box<dyn AnimationProvider>,
    audio: AudioMixer,
    progression: Box<dyn ProgressionStore>,
    accumulator: f32,
    /// Events of every substep since the last `advance`
    events: Vec<GameEvent>,
    /// Set once the current run was handed to the progression store
    reported: bool,
}

impl Game {
    pub fn new(
        seed: u64,
        tuning: Tuning,
        animations: Box<dyn AnimationProvider>,
        audio: Box<dyn AudioSink>,
        progression: Box<dyn ProgressionStore>,
    ) -> Self {
        let mut state = GameState::new(seed, tuning);
        state.skin = Some(progression.collectible_skin().to_string());
        Self {
            state,
            animations,
            audio: AudioMixer::new(audio),
            progression,
            accumulator: 0.0,
            events: Vec::new(),
            reported: false,
        }
    }

    /// Solid hitboxes, no sound and an in-memory history
    pub fn headless(seed: u64, tuning: Tuning) -> Self {
        Self::new(
            seed,
            tuning,
            Box::new(SolidMasks::new()),
            Box::new(SilentAudio),
            Box::new(RunHistory::new()),
        )
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn audio_mut(&mut self) -> &mut AudioMixer {
        &mut self.audio
    }

    pub fn progression(&self) -> &dyn ProgressionStore {
        self.progression.as_ref()
    }

    /// Events produced by the last `step` or `advance`
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Run exactly one fixed-step frame
    pub fn step(&mut self, input: &TickInput) {
        self.events.clear();
        self.run_frame(input);
    }

    /// Feed a wall-clock delta; runs as many fixed frames as fit.
    /// One-shot inputs only apply to the first substep.
    /// Returns the number of frames run.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> u32 {
        self.events.clear();
        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        let mut input = input.clone();
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.run_frame(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;

            input = TickInput::default();
        }
        substeps
    }

    /// Start a new run in place
    pub fn restart(&mut self, seed: u64) {
        self.state.reset_with_seed(seed);
        self.state.skin = Some(self.progression.collectible_skin().to_string());
        self.accumulator = 0.0;
        self.events.clear();
        self.reported = false;
    }

    fn run_frame(&mut self, input: &TickInput) {
        tick(&mut self.state, input, SIM_DT, self.animations.as_ref());
        self.audio.play_events(&self.state.events);

        let finished = self
            .state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::RunFinished(_)));
        if finished && !self.reported {
            self.reported = true;
            let summary: RunSummary = self.state.run_summary();
            self.progression.record_run(&summary);
        }
        self.events.extend_from_slice(&self.state.events);
    }
}
