//! Game state and run bookkeeping
//!
//! Everything a run needs for determinism lives here, including the RNG, so a
//! state can be snapshotted and compared as JSON.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::adversary::{Pursuer, Species};
use super::player::PlayerController;
use super::track::{Biome, TrackGenerator};
use super::world::{CollectibleKind, Segment, SegmentKind, World};
use crate::consts::*;
use crate::progression::RunSummary;
use crate::tuning::Tuning;

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Running,
    Paused,
    /// Death finalized; the state only changes again on reset
    GameOver,
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeathCause {
    /// Health ran out
    Wasted,
    /// Withdrawal reached its maximum
    Overdose,
    /// Fell below the death plane
    Fell,
    /// Caught by the pursuer
    Arrested,
}

impl DeathCause {
    pub fn as_str(self) -> &'static str {
        match self {
            DeathCause::Wasted => "wasted",
            DeathCause::Overdose => "overdose",
            DeathCause::Fell => "fell",
            DeathCause::Arrested => "arrested",
        }
    }
}

/// Anything the player can destroy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Foe {
    Mob(Species),
    Attacker,
}

/// Things that happened during one frame, for audio and reward hooks
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Jumped,
    FastFell,
    /// Foe destroyed by landing on it
    Stomped(Foe),
    /// Foe destroyed by touching it while shielded
    ShieldKill(Foe),
    /// Player lost health; carries the remaining health
    Damaged(u8),
    /// Attacker landed a hit and is retreating
    AttackerStruck,
    /// Hazard side contact started the slow debuff
    Slowed,
    HazardSmashed,
    Collected(CollectibleKind),
    /// Shield spent to cancel a lethal trigger
    ShieldSaved,
    PursuerRepelled,
    /// Attacker destroyed by a heart pickup
    AttackerDowned,
    /// A mob left the screen behind the player untouched
    Evaded,
    DeathTriggered(DeathCause),
    RunFinished(DeathCause),
}

/// Kill counters for the run summary
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub rats: u32,
    pub birds: u32,
    pub wolves: u32,
    pub bears: u32,
    pub attackers: u32,
    pub hearts: u32,
}

impl RunStats {
    pub fn record_kill(&mut self, foe: Foe) {
        let counter = match foe {
            Foe::Mob(Species::Rat) => &mut self.rats,
            Foe::Mob(Species::Bird) => &mut self.birds,
            Foe::Mob(Species::Wolf) => &mut self.wolves,
            Foe::Mob(Species::Bear) => &mut self.bears,
            Foe::Attacker => &mut self.attackers,
        };
        *counter += 1;
    }

    pub fn kills(&self) -> u32 {
        self.rats + self.birds + self.wolves + self.bears + self.attackers
    }
}

/// Complete run state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Simulation frame counter
    pub frame: u64,
    pub camera_x: f32,
    /// Distance score in units, never decreases
    pub distance: u64,
    /// Points from shield kills
    pub bonus_score: u64,
    pub player: PlayerController,
    pub pursuer: Pursuer,
    pub world: World,
    pub generator: TrackGenerator,
    /// Set once a lethal trigger went through; only a reset clears it
    pub death_triggered: bool,
    pub death_cause: Option<DeathCause>,
    /// Frame in which a shield was spent to cancel a death
    pub shield_saved_frame: Option<u64>,
    /// Scales every frame's dt
    pub slow_motion: f32,
    pub stats: RunStats,
    /// Events of the last frame
    pub events: Vec<GameEvent>,
    /// Cosmetic weed variant
    pub skin: Option<String>,
}

impl GameState {
    /// Create a new run with the given seed
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = PlayerController::new(&tuning);
        let pursuer = Pursuer::new(&player.body.rect, tuning.base_speed);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Running,
            frame: 0,
            camera_x: 0.0,
            distance: 0,
            bonus_score: 0,
            player,
            pursuer,
            world: World::new(),
            generator: TrackGenerator::new(SCREEN_WIDTH),
            death_triggered: false,
            death_cause: None,
            shield_saved_frame: None,
            slow_motion: 1.0,
            stats: RunStats::default(),
            events: Vec::new(),
            skin: None,
        };
        state.reset_with_seed(seed);
        state
    }

    /// Restart with the same seed
    pub fn reset(&mut self) {
        self.reset_with_seed(self.seed);
    }

    /// Restart in place: the player and pursuer are reset, not recreated
    pub fn reset_with_seed(&mut self, seed: u64) {
        self.seed = seed;
        self.rng = Pcg32::seed_from_u64(seed);
        self.phase = GamePhase::Running;
        self.frame = 0;
        self.camera_x = 0.0;
        self.distance = 0;
        self.bonus_score = 0;
        self.player.reset(&self.tuning);
        self.pursuer.reset(&self.player.body.rect, self.tuning.base_speed);
        self.world.clear();
        self.generator.reset(SCREEN_WIDTH);
        self.death_triggered = false;
        self.death_cause = None;
        self.shield_saved_frame = None;
        self.stats = RunStats::default();
        self.events.clear();

        let id = self.world.next_entity_id();
        self.world.segments.push(Segment::new(
            id,
            SegmentKind::Ground,
            -SCREEN_WIDTH,
            FLOOR_Y,
            SCREEN_WIDTH * 2.0,
            GROUND_THICKNESS,
            Biome::Street,
        ));
        log::info!("Run started (seed {seed}, {})", self.tuning.difficulty.as_str());
    }

    /// World speed multiplier growing with camera travel
    pub fn difficulty_multiplier(&self) -> f32 {
        let cap = self.tuning.difficulty.speed_bonus_cap();
        1.0 + (self.camera_x / DIFFICULTY_RAMP_DISTANCE).min(cap)
    }

    /// Distance units plus shield-kill bonus
    pub fn score(&self) -> u64 {
        self.distance + self.bonus_score
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Summary of the run so far
    pub fn run_summary(&self) -> RunSummary {
        RunSummary {
            seed: self.seed,
            distance: self.distance,
            score: self.score(),
            frames: self.frame,
            cause: self.death_cause,
            weed: self.player.weed_count,
            best_combo: self.player.best_combo,
            shield_activations: self.player.shield_activations,
            magnet_activations: self.player.magnet_activations,
            stats: self.stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_run_layout() {
        let state = GameState::new(42, Tuning::default());
        assert_eq!(state.world.segments.len(), 1);
        let ground = &state.world.segments[0].rect;
        assert_eq!(ground.left(), -SCREEN_WIDTH);
        assert_eq!(ground.top(), FLOOR_Y);
        assert_eq!(state.generator.cursor, SCREEN_WIDTH);
        assert_eq!(state.player.body.rect.bottom(), FLOOR_Y);
        assert!(state.pursuer.body.rect.center_x() < state.player.body.rect.center_x());
        assert!(state.player.is_invincible());
    }

    #[test]
    fn test_reset_clears_run() {
        let mut state = GameState::new(7, Tuning::default());
        state.camera_x = 9000.0;
        state.distance = 90;
        state.death_triggered = true;
        state.death_cause = Some(DeathCause::Fell);
        state.stats.record_kill(Foe::Attacker);
        state.reset();
        assert_eq!(state.distance, 0);
        assert!(!state.death_triggered);
        assert_eq!(state.death_cause, None);
        assert_eq!(state.stats.kills(), 0);
        assert_eq!(state.world.entity_count(), 1);
    }

    #[test]
    fn test_difficulty_multiplier_capped() {
        let mut state = GameState::new(1, Tuning::default());
        assert_eq!(state.difficulty_multiplier(), 1.0);
        state.camera_x = 25_000.0;
        assert!((state.difficulty_multiplier() - 1.5).abs() < 1e-6);
        state.camera_x = 1_000_000.0;
        assert!((state.difficulty_multiplier() - 1.6).abs() < 1e-6);
    }

    #[test]
    fn test_record_kill_by_foe() {
        let mut stats = RunStats::default();
        stats.record_kill(Foe::Mob(Species::Rat));
        stats.record_kill(Foe::Mob(Species::Rat));
        stats.record_kill(Foe::Mob(Species::Bear));
        stats.record_kill(Foe::Attacker);
        assert_eq!(stats.rats, 2);
        assert_eq!(stats.bears, 1);
        assert_eq!(stats.kills(), 4);
    }
}
