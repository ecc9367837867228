//! Reset/step boundary for external training harnesses
//!
//! One `step` is one fixed-step frame driven by a discrete [`Action`]. The
//! reward shaping favors staying grounded, progress and pickups, and punishes
//! wasted jumps, damage and death.

use serde::Serialize;

use crate::consts::*;
use crate::sim::animation::{AnimationProvider, SolidMasks};
use crate::sim::observe::{Observation, observation};
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{Action, TickInput, tick};
use crate::tuning::Tuning;

/// Reward constants
mod reward {
    pub const TIME_COST: f32 = 0.01;
    pub const JUMP_COST: f32 = 5.0;
    pub const AIR_JUMP: f32 = -20.0;
    pub const GROUND_FAST_FALL: f32 = -1.0;
    pub const GROUNDED: f32 = 5.2;
    pub const DIVE: f32 = 0.5;
    pub const CHECKPOINT: f32 = 1000.0;
    pub const CHECKPOINT_SPACING: f32 = 5000.0;
    pub const STAGNATION: f32 = -0.1;
    pub const STAGNATION_GRACE: u32 = 30;
    pub const PICKUP: f32 = 50.0;
    pub const DAMAGE: f32 = -200.0;
    pub const DEATH: f32 = -1000.0;
    pub const TRUNCATION: f32 = -10.0;
    /// Frames without progress before the episode is cut
    pub const STAGNATION_LIMIT: u32 = 600;
}

/// Side information for one step
#[derive(Debug, Clone, Serialize)]
pub struct StepInfo {
    pub events: Vec<GameEvent>,
    pub distance: u64,
    pub score: u64,
    pub reward: f32,
    /// Cut for lack of progress rather than ended by death
    pub truncated: bool,
}

/// Result of one step
#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub observation: Observation,
    pub terminal: bool,
    pub info: StepInfo,
}

/// A single run exposed as an episodic environment
pub struct RunnerEnv {
    state: GameState,
    animations: Box<dyn AnimationProvider>,
    base_seed: u64,
    episode: u64,
    last_action: Action,
    best_x: f32,
    last_checkpoint: f32,
    stagnation: u32,
}

impl RunnerEnv {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let state = GameState::new(seed, tuning);
        let best_x = state.player.body.rect.x;
        Self {
            state,
            animations: Box::new(SolidMasks::new()),
            base_seed: seed,
            episode: 0,
            last_action: Action::Noop,
            best_x,
            last_checkpoint: 0.0,
            stagnation: 0,
        }
    }

    pub fn with_animations(mut self, animations: Box<dyn AnimationProvider>) -> Self {
        self.animations = animations;
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Start the next episode; each episode gets its own seed
    pub fn reset(&mut self) -> Observation {
        let seed = self.base_seed.wrapping_add(self.episode);
        self.episode += 1;
        self.reset_with_seed(seed)
    }

    pub fn reset_with_seed(&mut self, seed: u64) -> Observation {
        self.state.reset_with_seed(seed);
        self.last_action = Action::Noop;
        self.best_x = self.state.player.body.rect.x;
        self.last_checkpoint = 0.0;
        self.stagnation = 0;
        observation(&self.state, self.last_action)
    }

    pub fn step(&mut self, action: Action) -> Step {
        if self.state.death_triggered || self.state.is_over() {
            return Step {
                observation: observation(&self.state, self.last_action),
                terminal: true,
                info: self.info(Vec::new(), 0.0, false),
            };
        }

        let was_grounded = self.state.player.body.grounded;
        tick(&mut self.state, &TickInput::action(action), SIM_DT, self.animations.as_ref());
        let events = self.state.events.clone();

        let mut r = -reward::TIME_COST * (1.0 + self.stagnation as f32 / 60.0);
        let grounded = self.state.player.body.grounded;
        match action {
            Action::Jump => {
                r -= reward::JUMP_COST;
                if !was_grounded {
                    r += reward::AIR_JUMP;
                }
            }
            Action::FastFall if grounded => r += reward::GROUND_FAST_FALL,
            Action::FastFall => r += reward::DIVE,
            Action::Noop => {}
        }
        if grounded {
            r += reward::GROUNDED;
        }

        let x = self.state.player.body.rect.x;
        if x > self.best_x {
            self.best_x = x;
            self.stagnation = 0;
            if x > self.last_checkpoint + reward::CHECKPOINT_SPACING {
                self.last_checkpoint = x;
                r += reward::CHECKPOINT;
            }
        } else {
            self.stagnation += 1;
            if self.stagnation > reward::STAGNATION_GRACE {
                r += reward::STAGNATION;
            }
        }

        for event in &events {
            match event {
                GameEvent::Collected(_) => r += reward::PICKUP,
                GameEvent::Damaged(_) => r += reward::DAMAGE,
                _ => {}
            }
        }

        let terminal = self.state.death_triggered || self.state.is_over();
        if terminal {
            r += reward::DEATH;
        }
        let truncated = !terminal && self.stagnation > reward::STAGNATION_LIMIT;
        if truncated {
            r += reward::TRUNCATION;
            log::debug!("Episode truncated after {} frames without progress", self.stagnation);
        }

        self.last_action = action;
        Step {
            observation: observation(&self.state, action),
            terminal: terminal || truncated,
            info: self.info(events, r, truncated),
        }
    }

    fn info(&self, events: Vec<GameEvent>, reward: f32, truncated: bool) -> StepInfo {
        StepInfo {
            events,
            distance: self.state.distance,
            score: self.state.score(),
            reward,
            truncated,
        }
    }
}
