//! Per-frame simulation driver
//!
//! Frame order is fixed: action intake, player resources and physics,
//! adversaries, camera and world generation/culling, interactions, then status
//! and animation derivation.

use serde::{Deserialize, Serialize};

use super::animation::{AnimationProvider, Category};
use super::geometry::Rect;
use super::interaction::resolve_interactions;
use super::player::{ActionOutcome, PlayerStatus};
use super::state::{DeathCause, GameEvent, GamePhase, GameState};
use super::track::SpawnContext;
use crate::consts::*;

/// Discrete control action, from a local input device or an external agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Action {
    #[default]
    Noop,
    Jump,
    FastFall,
}

impl Action {
    pub const COUNT: usize = 3;

    /// Map an agent's action index
    pub fn from_index(index: usize) -> Option<Action> {
        match index {
            0 => Some(Action::Noop),
            1 => Some(Action::Jump),
            2 => Some(Action::FastFall),
            _ => None,
        }
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub action: Action,
    /// Pause toggle
    pub pause: bool,
    /// Debug invulnerability toggle
    pub toggle_god_mode: bool,
}

impl TickInput {
    pub fn action(action: Action) -> Self {
        Self {
            action,
            ..Default::default()
        }
    }
}

/// Advance the game state by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32, animations: &dyn AnimationProvider) {
    state.events.clear();

    if input.toggle_god_mode && !state.is_over() {
        state.player.god_mode = !state.player.god_mode;
        log::info!("God mode {}", if state.player.god_mode { "on" } else { "off" });
    }

    // Pausing is locked out once the run is dying
    if input.pause && !state.death_triggered {
        match state.phase {
            GamePhase::Running => state.phase = GamePhase::Paused,
            GamePhase::Paused => state.phase = GamePhase::Running,
            GamePhase::GameOver => {}
        }
    }
    if state.phase != GamePhase::Running {
        return;
    }

    state.frame += 1;
    let dt = dt * state.slow_motion.max(0.0);

    if state.death_triggered {
        finalize(state);
        return;
    }

    // === Action intake ===
    match state.player.apply_action(input.action) {
        ActionOutcome::Jumped => state.events.push(GameEvent::Jumped),
        ActionOutcome::FastFell => state.events.push(GameEvent::FastFell),
        ActionOutcome::None => {}
    }

    // === Player ===
    state.player.update_resources(dt, &state.tuning);
    let difficulty = state.difficulty_multiplier();
    if !state.player.is_defeated() {
        let speed = state.player.speed(&state.tuning, difficulty);
        let segments: Vec<&Rect> = state.world.segments.iter().map(|s| &s.rect).collect();
        let hazards: Vec<&Rect> = state.world.hazard_rects().collect();
        state.player.move_and_collide(dt, speed, &segments, &hazards);
    }
    state.player.magnet_pull(dt, &mut state.world.collectibles);

    // === Adversaries ===
    update_adversaries(state, dt, difficulty);

    // === Camera, generation, culling ===
    state.camera_x = (state.player.body.rect.center_x() - SCREEN_WIDTH / 2.0).max(0.0);
    state.distance = state.distance.max((state.camera_x / PX_PER_UNIT) as u64);

    state.generator.tick_cooldown(dt);
    let ctx = SpawnContext {
        camera_x: state.camera_x,
        distance: state.distance,
        player_health: state.player.health,
        skin: state.skin.as_deref(),
    };
    state
        .generator
        .advance(&ctx, &state.tuning, &mut state.world, &mut state.rng);
    state
        .generator
        .maybe_spawn_aerial(state.camera_x, &state.tuning, &mut state.world, &mut state.rng);

    let behind = state.camera_x - CULL_BEHIND;
    let evaded = state
        .world
        .mobs
        .iter()
        .filter(|m| m.alive && m.body.rect.right() < behind)
        .count();
    state.events.extend(std::iter::repeat_n(GameEvent::Evaded, evaded));
    state.world.cull(state.camera_x);

    // === Interactions ===
    resolve_interactions(state, animations);
    state.world.purge_dead();
    state.world.normalize_order();

    // === Status and animation ===
    derive_animation(state, animations);
}

fn update_adversaries(state: &mut GameState, dt: f32, difficulty: f32) {
    let player_rect = state.player.body.rect;
    let world = &mut state.world;
    let segments: Vec<&Rect> = world.segments.iter().map(|s| &s.rect).collect();
    let hazards: Vec<&Rect> = world.hazards.iter().filter(|h| h.alive).map(|h| &h.rect).collect();

    state.pursuer.update(
        dt,
        &player_rect,
        state.tuning.base_speed,
        difficulty,
        segments.iter().copied(),
        hazards.iter().copied(),
    );
    state.pursuer.recover(state.camera_x);

    for mob in world.mobs.iter_mut().filter(|m| m.alive) {
        mob.update(dt, segments.iter().copied());
    }
    for attacker in world.attackers.iter_mut().filter(|a| a.alive) {
        attacker.update(dt, &player_rect);
    }
}

/// Close out a run the frame after its death was triggered
fn finalize(state: &mut GameState) {
    let cause = state.death_cause.unwrap_or(DeathCause::Wasted);
    state.phase = GamePhase::GameOver;
    state.events.push(GameEvent::RunFinished(cause));
    log::info!(
        "Run finished: {} after {} units, score {}",
        cause.as_str(),
        state.distance,
        state.score()
    );
}

fn derive_animation(state: &mut GameState, animations: &dyn AnimationProvider) {
    let player = &mut state.player;
    player.status = player.derive_status();
    let status = player.status.as_str();
    let frames = animations.frames(Category::Player, status);
    match player.status {
        PlayerStatus::Jump => {
            let index = player.jump_frame(frames.len());
            player.body.animator.set_frame(status, index);
        }
        other => {
            let mut rate = animations.rate(Category::Player, status);
            if other == PlayerStatus::Walk {
                rate *= 0.5;
            }
            player
                .body
                .animator
                .advance(status, frames.len(), rate, other == PlayerStatus::Dead);
        }
    }

    let pursuer = &mut state.pursuer;
    pursuer.status = pursuer.derive_status();
    let status = pursuer.status.as_str();
    let len = animations.frames(Category::Pursuer, status).len();
    let rate = animations.rate(Category::Pursuer, status);
    pursuer.body.animator.advance(status, len, rate, false);

    for mob in state.world.mobs.iter_mut() {
        let category = Category::Mob(mob.species);
        let status = mob.status().as_str();
        let len = animations.frames(category, status).len();
        let rate = animations.rate(category, status);
        mob.body.animator.advance(status, len, rate, false);
    }
    for attacker in state.world.attackers.iter_mut() {
        let category = Category::Attacker {
            variant: attacker.variant,
        };
        let status = attacker.status.as_str();
        let len = animations.frames(category, status).len();
        let rate = animations.rate(category, status);
        attacker.body.animator.advance(status, len, rate, false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::animation::SolidMasks;
    use crate::tuning::Tuning;

    fn scripted_input(frame: usize) -> TickInput {
        let action = match frame % 90 {
            0 => Action::Jump,
            45 => Action::FastFall,
            _ => Action::Noop,
        };
        TickInput::action(action)
    }

    #[test]
    fn test_determinism() {
        let provider = SolidMasks::new();
        let mut a = GameState::new(12345, Tuning::default());
        let mut b = GameState::new(12345, Tuning::default());
        for frame in 0..900 {
            let input = scripted_input(frame);
            tick(&mut a, &input, SIM_DT, &provider);
            tick(&mut b, &input, SIM_DT, &provider);
        }
        let snap_a = serde_json::to_string(&a).expect("serialize a");
        let snap_b = serde_json::to_string(&b).expect("serialize b");
        assert_eq!(snap_a, snap_b);
    }

    #[test]
    fn test_one_second_at_base_speed() {
        let provider = SolidMasks::new();
        let tuning = Tuning {
            speed_ramp_rate: 0.0,
            ..Tuning::default()
        };
        assert_eq!(tuning.base_speed, 350.0);
        let mut state = GameState::new(8, tuning);
        let start = state.player.body.rect.x;
        for _ in 0..60 {
            tick(&mut state, &TickInput::default(), SIM_DT, &provider);
        }
        let moved = state.player.body.rect.x - start;
        assert!((moved - 350.0).abs() <= 1.0, "moved {moved}");
        assert!(state.player.body.grounded);
        assert!(!state.death_triggered);
        assert_eq!(state.player.withdrawal_penalty(), 1.0);
    }

    #[test]
    fn test_different_seeds_diverge() {
        let provider = SolidMasks::new();
        let mut a = GameState::new(1, Tuning::default());
        let mut b = GameState::new(2, Tuning::default());
        for _ in 0..120 {
            tick(&mut a, &TickInput::default(), SIM_DT, &provider);
            tick(&mut b, &TickInput::default(), SIM_DT, &provider);
        }
        let widths = |s: &GameState| s.world.segments.iter().map(|seg| seg.rect.w).collect::<Vec<_>>();
        assert_ne!(widths(&a), widths(&b));
    }

    #[test]
    fn test_snapshot_resumes_identically() {
        let provider = SolidMasks::new();
        let mut state = GameState::new(99, Tuning::default());
        for frame in 0..300 {
            tick(&mut state, &scripted_input(frame), SIM_DT, &provider);
        }
        let json = serde_json::to_string(&state).expect("serialize");
        let mut restored: GameState = serde_json::from_str(&json).expect("deserialize");
        for frame in 300..600 {
            tick(&mut state, &scripted_input(frame), SIM_DT, &provider);
            tick(&mut restored, &scripted_input(frame), SIM_DT, &provider);
        }
        assert_eq!(state.player.body.rect, restored.player.body.rect);
        assert_eq!(state.distance, restored.distance);
        assert_eq!(
            serde_json::to_string(&state).expect("serialize"),
            serde_json::to_string(&restored).expect("serialize")
        );
    }

    #[test]
    fn test_pause_toggle() {
        let provider = SolidMasks::new();
        let mut state = GameState::new(5, Tuning::default());
        tick(&mut state, &TickInput::default(), SIM_DT, &provider);
        let x = state.player.body.rect.x;
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, &provider);
        assert_eq!(state.phase, GamePhase::Paused);
        tick(&mut state, &TickInput::default(), SIM_DT, &provider);
        assert_eq!(state.player.body.rect.x, x);
        assert_eq!(state.frame, 1);
        tick(&mut state, &pause, SIM_DT, &provider);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player.body.rect.x > x);
    }

    #[test]
    fn test_death_finalized_next_frame_once() {
        let provider = SolidMasks::new();
        let mut state = GameState::new(5, Tuning::default());
        state.player.withdrawal = state.player.max_withdrawal;
        tick(&mut state, &TickInput::default(), SIM_DT, &provider);
        assert!(state.death_triggered);
        assert!(state.events.contains(&GameEvent::DeathTriggered(DeathCause::Overdose)));
        assert_eq!(state.player.status, PlayerStatus::Dead);
        assert_eq!(state.phase, GamePhase::Running);

        // Pausing is locked out while dying
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        tick(&mut state, &pause, SIM_DT, &provider);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.events, vec![GameEvent::RunFinished(DeathCause::Overdose)]);

        tick(&mut state, &TickInput::default(), SIM_DT, &provider);
        assert!(state.events.is_empty());
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_generation_stays_ahead_of_camera() {
        let provider = SolidMasks::new();
        let mut state = GameState::new(8, Tuning::default());
        state.player.god_mode = true;
        for _ in 0..1200 {
            tick(&mut state, &TickInput::default(), SIM_DT, &provider);
            assert!(state.generator.cursor >= state.camera_x + SCREEN_WIDTH * 1.5);
        }
        assert!(state.camera_x > 0.0);
        assert!(state.world.segments.iter().all(|s| s.rect.right() >= state.camera_x - CULL_BEHIND));
    }

    #[test]
    fn test_slow_motion_scales_movement() {
        let provider = SolidMasks::new();
        let mut normal = GameState::new(3, Tuning::default());
        let mut slow = GameState::new(3, Tuning::default());
        slow.slow_motion = 0.5;
        let x0 = normal.player.body.rect.x;
        tick(&mut normal, &TickInput::default(), SIM_DT, &provider);
        tick(&mut slow, &TickInput::default(), SIM_DT, &provider);
        let full = normal.player.body.rect.x - x0;
        let half = slow.player.body.rect.x - x0;
        assert!((half / full - 0.5).abs() < 1e-3);
    }

    #[test]
    fn test_jump_event_and_airborne_status() {
        let provider = SolidMasks::new();
        let mut state = GameState::new(4, Tuning::default());
        tick(&mut state, &TickInput::action(Action::Jump), SIM_DT, &provider);
        assert!(state.events.contains(&GameEvent::Jumped));
        assert_eq!(state.player.status, PlayerStatus::Jump);
        assert_eq!(state.player.body.animator.status(), Some("jump"));
    }

    #[test]
    fn test_action_from_index() {
        assert_eq!(Action::from_index(0), Some(Action::Noop));
        assert_eq!(Action::from_index(2), Some(Action::FastFall));
        assert_eq!(Action::from_index(Action::COUNT), None);
    }
}
