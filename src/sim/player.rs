//! Player controller: survival resources, timed effects and movement
//!
//! Speed is never stored. It is derived every frame from the base speed, the
//! speed ramp, the withdrawal penalty, the slow debuff and the world
//! difficulty multiplier.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use super::effects::{Effect, EffectTimers};
use super::geometry::Rect;
use super::state::DeathCause;
use super::tick::Action;
use super::world::{Collectible, CollectibleKind};
use crate::consts::*;
use crate::tuning::Tuning;

/// God-mode vertical nudge per action
const GOD_MODE_STEP: f32 = 10.0;
/// Withdrawal ratio a shield rescue leaves the player at, at most
const SHIELD_RESCUE_WITHDRAWAL: f32 = 0.9;
/// Falling frame of the jump sequence
const JUMP_FALL_FRAME: usize = 7;

/// Animation status, derived from state each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlayerStatus {
    #[default]
    Idle,
    Run,
    Walk,
    Jump,
    Hurt,
    Dead,
}

impl PlayerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PlayerStatus::Idle => "idle",
            PlayerStatus::Run => "run",
            PlayerStatus::Walk => "walk",
            PlayerStatus::Jump => "jump",
            PlayerStatus::Hurt => "hurt",
            PlayerStatus::Dead => "dead",
        }
    }
}

/// What an action actually did this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    None,
    Jumped,
    FastFell,
}

/// The runner: body, resources and effect timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerController {
    pub body: KinematicBody,
    pub health: u8,
    pub max_health: u8,
    pub withdrawal: f32,
    pub max_withdrawal: f32,
    /// Speed-ramp accumulator (px/s added to the base speed)
    pub speed_ramp: f32,
    pub combo: u32,
    pub timers: EffectTimers,
    /// Debug toggle: no gravity, no withdrawal, no damage, no death
    pub god_mode: bool,
    pub status: PlayerStatus,

    // Run statistics
    pub weed_count: u32,
    pub best_combo: u32,
    pub shield_activations: u32,
    pub magnet_activations: u32,
}

impl PlayerController {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            body: KinematicBody::new(Rect::default()),
            health: 0,
            max_health: 0,
            withdrawal: 0.0,
            max_withdrawal: 0.0,
            speed_ramp: 0.0,
            combo: 0,
            timers: EffectTimers::default(),
            god_mode: false,
            status: PlayerStatus::Idle,
            weed_count: 0,
            best_combo: 0,
            shield_activations: 0,
            magnet_activations: 0,
        };
        player.reset(tuning);
        player
    }

    /// Reset for a new run without reallocating
    pub fn reset(&mut self, tuning: &Tuning) {
        let start = Vec2::new(PLAYER_START_X, FLOOR_Y);
        self.body = KinematicBody::new(Rect::from_midbottom(start, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT)));
        self.body.set_direction(1);
        self.body.grounded = true;
        self.max_health = tuning.max_health.max(1);
        self.health = self.max_health;
        self.max_withdrawal = tuning.max_withdrawal.max(f32::EPSILON);
        self.withdrawal = 0.0;
        self.speed_ramp = 0.0;
        self.combo = 0;
        self.timers.clear_all();
        self.timers.set(Effect::Invincible, SPAWN_INVINCIBILITY);
        self.god_mode = false;
        self.status = PlayerStatus::Idle;
        self.weed_count = 0;
        self.best_combo = 0;
        self.shield_activations = 0;
        self.magnet_activations = 0;
    }

    // === Derived state ===

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.timers.active(Effect::Invincible)
    }

    #[inline]
    pub fn has_shield(&self) -> bool {
        self.timers.active(Effect::Shield)
    }

    #[inline]
    pub fn has_magnet(&self) -> bool {
        self.timers.active(Effect::Magnet)
    }

    #[inline]
    pub fn is_slowed(&self) -> bool {
        self.timers.active(Effect::Slow)
    }

    /// Shield about to run out
    pub fn shield_flashing(&self) -> bool {
        self.has_shield() && self.timers.remaining(Effect::Shield) < SHIELD_WARNING
    }

    pub fn withdrawal_ratio(&self) -> f32 {
        self.withdrawal / self.max_withdrawal
    }

    /// 1.0 up to half withdrawal, then a linear decay
    pub fn withdrawal_penalty(&self) -> f32 {
        let ratio = self.withdrawal_ratio();
        if ratio > WITHDRAWAL_PENALTY_START {
            1.0 - (ratio - WITHDRAWAL_PENALTY_START) * WITHDRAWAL_PENALTY_SLOPE
        } else {
            1.0
        }
    }

    /// Current horizontal speed (px/s)
    pub fn speed(&self, tuning: &Tuning, difficulty: f32) -> f32 {
        let slow = if self.is_slowed() { SLOW_FACTOR } else { 1.0 };
        (tuning.base_speed + self.speed_ramp) * self.withdrawal_penalty() * slow * difficulty
    }

    /// Any terminal condition holds (god mode ignored)
    pub fn is_defeated(&self) -> bool {
        self.health == 0 || self.withdrawal >= self.max_withdrawal || self.body.rect.top() > DEATH_Y
    }

    /// Terminal condition that ends the run, if any
    pub fn death_cause(&self) -> Option<DeathCause> {
        if self.god_mode {
            None
        } else if self.health == 0 {
            Some(DeathCause::Wasted)
        } else if self.withdrawal >= self.max_withdrawal {
            Some(DeathCause::Overdose)
        } else if self.body.rect.top() > DEATH_Y {
            Some(DeathCause::Fell)
        } else {
            None
        }
    }

    pub fn derive_status(&self) -> PlayerStatus {
        if self.is_defeated() {
            PlayerStatus::Dead
        } else if self.timers.active(Effect::Hurt) {
            PlayerStatus::Hurt
        } else if !self.body.grounded {
            PlayerStatus::Jump
        } else if self.body.direction != 0 {
            if self.withdrawal > self.max_withdrawal * 0.5 {
                PlayerStatus::Walk
            } else {
                PlayerStatus::Run
            }
        } else {
            PlayerStatus::Idle
        }
    }

    /// Jump frame picked from vertical velocity: the first half of the
    /// sequence while rising, a fixed frame while falling
    pub fn jump_frame(&self, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let half = total / 2;
        let idx = if self.body.velocity_y < 0.0 {
            let param = (self.body.velocity_y.abs() / JUMP_FORCE.abs()).clamp(0.0, 1.0);
            let idx = ((1.0 - param) * half as f32) as usize;
            idx.min(half.saturating_sub(1))
        } else {
            JUMP_FALL_FRAME
        };
        idx.min(total - 1)
    }

    // === Per-frame update ===

    /// Speed ramp, withdrawal gain, then timers
    pub fn update_resources(&mut self, dt: f32, tuning: &Tuning) {
        if self.is_defeated() {
            return;
        }
        self.speed_ramp = (self.speed_ramp + tuning.speed_ramp_rate * dt)
            .min(tuning.max_speed_boost)
            .max(0.0);
        if !self.god_mode {
            self.withdrawal =
                (self.withdrawal + tuning.effective_withdrawal_rate() * dt).clamp(0.0, self.max_withdrawal);
        }
        self.timers.tick(dt);
    }

    /// Consume the frame's control action
    pub fn apply_action(&mut self, action: Action) -> ActionOutcome {
        if self.is_defeated() {
            self.body.set_direction(0);
            return ActionOutcome::None;
        }
        self.body.set_direction(1);

        if self.god_mode {
            match action {
                Action::Jump => {
                    self.body.rect.y -= GOD_MODE_STEP;
                    self.body.velocity_y = 0.0;
                }
                Action::FastFall => {
                    self.body.rect.y += GOD_MODE_STEP;
                    self.body.velocity_y = 0.0;
                }
                Action::Noop => {}
            }
            return ActionOutcome::None;
        }

        match action {
            Action::Jump if self.body.grounded => {
                self.jump();
                ActionOutcome::Jumped
            }
            Action::FastFall if !self.body.grounded => {
                self.fast_fall();
                ActionOutcome::FastFell
            }
            _ => ActionOutcome::None,
        }
    }

    /// Horizontal move, segment sides, gravity, landing on segments and hazards
    pub fn move_and_collide(&mut self, dt: f32, speed: f32, segments: &[&Rect], hazards: &[&Rect]) {
        self.body.rect.x += self.body.dir() * speed * dt;
        if self.body.rect.left() < 0.0 {
            self.body.rect.set_left(0.0);
        }
        self.body.resolve_horizontal(segments.iter().copied());

        if self.god_mode {
            self.body.velocity_y = 0.0;
        } else {
            self.body.apply_gravity(dt);
        }
        self.body.grounded = false;
        self.body.resolve_vertical(segments.iter().copied());

        if self.body.velocity_y > 0.0 {
            for hazard in hazards {
                if self.body.rect.overlaps(hazard) && self.body.rect.bottom() <= hazard.bottom() {
                    self.body.rect.set_bottom(hazard.top());
                    self.body.velocity_y = 0.0;
                    self.body.grounded = true;
                }
            }
        }
    }

    pub fn jump(&mut self) {
        self.body.velocity_y = JUMP_FORCE;
        self.body.grounded = false;
        self.body.rect.y -= JUMP_LIFTOFF;
    }

    /// Rebound off a stomped mob
    pub fn bounce(&mut self) {
        self.body.velocity_y = BOUNCE_FORCE;
        self.body.grounded = false;
        self.combo += 1;
        self.best_combo = self.best_combo.max(self.combo);
    }

    pub fn fast_fall(&mut self) {
        self.body.velocity_y = self.body.velocity_y.max(FAST_FALL_FORCE);
    }

    /// Returns whether health reached zero. No-op while invincible or for zero damage.
    pub fn take_damage(&mut self, amount: u8) -> bool {
        if amount == 0 || self.god_mode || self.is_invincible() {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        self.timers.set(Effect::Hurt, HURT_DURATION);
        self.timers.set(Effect::Invincible, INVINCIBILITY_DURATION);
        self.combo = 0;
        self.speed_ramp = 0.0;
        self.health == 0
    }

    /// Hazard side contact. Returns whether the player was not slowed before.
    pub fn apply_slow(&mut self) -> bool {
        let fresh = !self.is_slowed();
        self.timers.set(Effect::Slow, SLOW_DURATION);
        self.combo = 0;
        fresh
    }

    pub fn activate_powerup(&mut self, kind: CollectibleKind) {
        match kind {
            CollectibleKind::Shield => {
                self.timers.set(Effect::Shield, POWERUP_DURATION);
                self.shield_activations += 1;
            }
            CollectibleKind::Magnet => {
                self.timers.set(Effect::Magnet, POWERUP_DURATION);
                self.magnet_activations += 1;
            }
            CollectibleKind::Heart => self.heal(),
            CollectibleKind::Weed => {}
        }
    }

    /// Restore one health point up to the maximum
    pub fn heal(&mut self) {
        self.health = self.health.saturating_add(1).min(self.max_health);
    }

    pub fn collect_weed(&mut self, relief: f32) {
        self.weed_count += 1;
        self.withdrawal = (self.withdrawal - relief).clamp(0.0, self.max_withdrawal);
    }

    /// Spend the shield to survive a lethal trigger. Returns whether a shield was available.
    pub fn consume_shield(&mut self) -> bool {
        if !self.has_shield() {
            return false;
        }
        self.timers.clear(Effect::Shield);
        self.timers.set(Effect::Invincible, SHIELD_SAVE_INVINCIBILITY);
        true
    }

    /// Back away from a resource death a shield just cancelled
    pub fn shield_rescue(&mut self) {
        self.health = self.health.max(1);
        self.withdrawal = self.withdrawal.min(self.max_withdrawal * SHIELD_RESCUE_WITHDRAWAL);
    }

    /// Drag nearby weed toward the player while the magnet is active
    pub fn magnet_pull(&self, dt: f32, collectibles: &mut [Collectible]) {
        if !self.has_magnet() {
            return;
        }
        let center = self.body.rect.center();
        for item in collectibles.iter_mut() {
            if item.kind != CollectibleKind::Weed || !item.alive {
                continue;
            }
            let to_player = center - item.rect.center();
            let dist = to_player.length();
            if dist > 0.0 && dist < MAGNET_RADIUS {
                item.rect.translate(to_player / dist * MAGNET_PULL_SPEED * dt);
            }
        }
    }
}
