//! Street Runner - simulation core of a side-scrolling endless runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, generation, adversaries, interactions)
//! - `tuning`: Data-driven game balance
//! - `audio`: Audio cue sink contract
//! - `progression`: Run summary and progression store contract
//! - `game`: Simulation wired to its collaborators
//! - `env`: Reset/step boundary for external training harnesses

pub mod audio;
pub mod env;
pub mod game;
pub mod progression;
pub mod sim;
pub mod tuning;

pub use game::Game;
pub use progression::{ProgressionStore, RunHistory, RunSummary, SavedHistory};
pub use tuning::{DifficultyPreset, Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock frame delta fed to the accumulator
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Reference frame rate that per-frame gains are expressed in
    pub const REFERENCE_FPS: f32 = 60.0;

    /// Viewport dimensions
    pub const SCREEN_WIDTH: f32 = 1280.0;
    pub const SCREEN_HEIGHT: f32 = 720.0;

    /// Physics (y grows downward)
    pub const GRAVITY: f32 = 2000.0;
    pub const JUMP_FORCE: f32 = -1150.0;
    /// Upward impulse after stomping a mob
    pub const BOUNCE_FORCE: f32 = -600.0;
    pub const FAST_FALL_FORCE: f32 = 900.0;
    /// Lift applied on jump so the body leaves the ground immediately
    pub const JUMP_LIFTOFF: f32 = 5.0;

    /// World layout
    pub const FLOOR_Y: f32 = 650.0;
    pub const DEATH_Y: f32 = SCREEN_HEIGHT + 200.0;
    pub const GROUND_THICKNESS: f32 = 200.0;
    pub const PLATFORM_HEIGHT: f32 = 180.0;
    pub const PLATFORM_THICKNESS: f32 = 40.0;
    /// Pixels per distance unit
    pub const PX_PER_UNIT: f32 = 100.0;
    /// Entities this far behind the camera are culled
    pub const CULL_BEHIND: f32 = 400.0;
    /// Entities whose top passes this line are culled
    pub const CULL_BELOW: f32 = SCREEN_HEIGHT + 400.0;

    /// Player hitbox
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 100.0;
    pub const PLAYER_START_X: f32 = 100.0;

    /// Effect durations (seconds)
    pub const INVINCIBILITY_DURATION: f32 = 1.0;
    pub const SPAWN_INVINCIBILITY: f32 = 2.0;
    pub const SHIELD_SAVE_INVINCIBILITY: f32 = 1.0;
    pub const HURT_DURATION: f32 = 20.0 / 60.0;
    pub const SLOW_DURATION: f32 = 5.0;
    pub const POWERUP_DURATION: f32 = 20.0;
    /// Shield starts flashing when this much time is left
    pub const SHIELD_WARNING: f32 = 3.0;

    /// Speed multiplier while slowed by a hazard
    pub const SLOW_FACTOR: f32 = 0.5;
    /// Withdrawal ratio above which the speed penalty starts
    pub const WITHDRAWAL_PENALTY_START: f32 = 0.5;
    /// Penalty slope; at full withdrawal the factor bottoms out at 0.6
    pub const WITHDRAWAL_PENALTY_SLOPE: f32 = 0.8;
    /// Camera travel that yields the full distance speed bonus, per unit of bonus
    pub const DIFFICULTY_RAMP_DISTANCE: f32 = 50_000.0;

    /// Magnet reach and pull speed
    pub const MAGNET_RADIUS: f32 = 400.0;
    pub const MAGNET_PULL_SPEED: f32 = 600.0;
    /// Collection margin added around the player box on every side
    pub const COLLECT_MARGIN: f32 = 30.0;
    /// Shrink applied to the player box for aerial contact checks
    pub const AERIAL_CONTACT_INSET: f32 = 10.0;
    /// Bonus score for a mob destroyed by the shield
    pub const SHIELD_KILL_SCORE: u64 = 10;
}

/// Per-frame smoothing gain scaled to an arbitrary dt.
///
/// `per_frame` is the fraction of the remaining distance closed in one
/// reference frame; at `dt == SIM_DT` this returns `per_frame` unchanged.
#[inline]
pub fn smoothing_gain(per_frame: f32, dt: f32) -> f32 {
    let frames = dt * consts::REFERENCE_FPS;
    1.0 - (1.0 - per_frame.clamp(0.0, 1.0)).powf(frames)
}

/// Move `current` toward `target` by an exponential smoothing step
#[inline]
pub fn approach(current: f32, target: f32, per_frame: f32, dt: f32) -> f32 {
    current + (target - current) * smoothing_gain(per_frame, dt)
}
