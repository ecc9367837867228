//! Adversaries: the pursuing authority figure, the aerial attacker and
//! roaming mobs
//!
//! Roaming mobs share one locomotion routine driven by a per-species
//! descriptor. Only the pursuer and the attacker have their own control laws.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::KinematicBody;
use super::geometry::Rect;
use crate::approach;
use crate::consts::{DEATH_Y, FLOOR_Y};

/// Status strings shared by mobs and the attacker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MobStatus {
    Idle,
    Walk,
    Run,
}

impl MobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MobStatus::Idle => "idle",
            MobStatus::Walk => "walk",
            MobStatus::Run => "run",
        }
    }
}

/// Roaming mob species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    Rat,
    Wolf,
    Bear,
    Bird,
}

/// Per-species behavior table entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesInfo {
    /// Asset key for the animation layer
    pub key: &'static str,
    /// Hitbox size
    pub size: Vec2,
    /// Inclusive speed range (px/s), drawn once at spawn
    pub speed_range: (u32, u32),
    /// Flies in a straight line instead of walking on segments
    pub aerial: bool,
    /// How far below the mob's vertical center a stomping player's bottom
    /// edge may reach. Tuned by hand against the sprite sizes.
    pub stomp_tolerance: f32,
    pub status: MobStatus,
}

const GROUND_STOMP_TOLERANCE: f32 = 10.0;
const AERIAL_STOMP_TOLERANCE: f32 = 40.0;

static RAT: SpeciesInfo = SpeciesInfo {
    key: "rat",
    size: Vec2::new(40.0, 30.0),
    speed_range: (50, 120),
    aerial: false,
    stomp_tolerance: GROUND_STOMP_TOLERANCE,
    status: MobStatus::Walk,
};

static WOLF: SpeciesInfo = SpeciesInfo {
    key: "loup",
    size: Vec2::new(80.0, 100.0),
    speed_range: (200, 300),
    aerial: false,
    stomp_tolerance: GROUND_STOMP_TOLERANCE,
    status: MobStatus::Run,
};

static BEAR: SpeciesInfo = SpeciesInfo {
    key: "ours",
    size: Vec2::new(100.0, 150.0),
    speed_range: (100, 180),
    aerial: false,
    stomp_tolerance: GROUND_STOMP_TOLERANCE,
    status: MobStatus::Run,
};

static BIRD: SpeciesInfo = SpeciesInfo {
    key: "bird",
    size: Vec2::new(48.0, 48.0),
    speed_range: (150, 250),
    aerial: true,
    stomp_tolerance: AERIAL_STOMP_TOLERANCE,
    status: MobStatus::Walk,
};

impl Species {
    pub const ALL: [Species; 4] = [Species::Rat, Species::Wolf, Species::Bear, Species::Bird];

    pub fn info(self) -> &'static SpeciesInfo {
        match self {
            Species::Rat => &RAT,
            Species::Wolf => &WOLF,
            Species::Bear => &BEAR,
            Species::Bird => &BIRD,
        }
    }
}

/// A mob moving at a fixed signed speed; no target seeking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoamingMob {
    pub id: u32,
    pub species: Species,
    pub body: KinematicBody,
    /// Unsigned speed; direction lives on the body
    pub speed: f32,
    pub alive: bool,
}

impl RoamingMob {
    /// Spawn a mob. Ground species stand on `(x, y)`, aerial ones are centered on it.
    pub fn spawn<R: Rng + ?Sized>(
        id: u32,
        species: Species,
        x: f32,
        y: f32,
        direction: i8,
        rng: &mut R,
    ) -> Self {
        let info = species.info();
        let rect = if info.aerial {
            Rect::from_center(Vec2::new(x, y), info.size)
        } else {
            Rect::from_midbottom(Vec2::new(x, y), info.size)
        };
        let mut body = KinematicBody::new(rect);
        body.set_direction(direction);
        let (lo, hi) = info.speed_range;
        let speed = rng.random_range(lo..=hi.max(lo)) as f32;
        Self {
            id,
            species,
            body,
            speed,
            alive: true,
        }
    }

    pub fn is_aerial(&self) -> bool {
        self.species.info().aerial
    }

    pub fn velocity_x(&self) -> f32 {
        self.body.dir() * self.speed
    }

    pub fn status(&self) -> MobStatus {
        self.species.info().status
    }

    /// Player bottom edges above this line count as a stomp
    pub fn stomp_line(&self) -> f32 {
        self.body.rect.center_y() + self.species.info().stomp_tolerance
    }

    pub fn update<'a>(&mut self, dt: f32, solids: impl IntoIterator<Item = &'a Rect>) {
        if self.is_aerial() {
            self.body.rect.x += self.velocity_x() * dt;
            return;
        }
        self.body.apply_gravity(dt);
        self.body.rect.x += self.velocity_x() * dt;
        self.body.grounded = false;
        self.body.resolve_vertical(solids);
    }
}

/// Pursuer hitbox
pub const PURSUER_SIZE: Vec2 = Vec2::new(60.0, 120.0);
/// Spawn distance behind the player
pub const PURSUER_START_OFFSET: f32 = 200.0;
/// Initial speed as a fraction of the base speed
const PURSUER_START_RATIO: f32 = 0.8;
/// Fraction of the speed error closed per reference frame
pub const PURSUER_SPEED_GAIN: f32 = 0.1;
/// Beyond this distance the pursuer speeds up
pub const PURSUER_FAR_BAND: f32 = 600.0;
/// Inside this distance the pursuer eases off
pub const PURSUER_NEAR_BAND: f32 = 150.0;
pub const PURSUER_CATCH_UP: f32 = 1.2;
pub const PURSUER_EASE_OFF: f32 = 0.8;
/// Shield knockback distance
pub const PURSUER_KNOCKBACK: f32 = 400.0;
/// Above this speed the pursuer shows its run animation
const PURSUER_RUN_THRESHOLD: f32 = 50.0;
/// Re-entry point behind the camera after falling out of the world
const PURSUER_RECOVERY_LAG: f32 = 100.0;

/// Pursuer status strings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PursuerStatus {
    Idle,
    Run,
    Jump,
    Attack,
}

impl PursuerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PursuerStatus::Idle => "idle",
            PursuerStatus::Run => "run",
            PursuerStatus::Jump => "jump",
            PursuerStatus::Attack => "attack",
        }
    }
}

/// The authority figure chasing the player; created once per run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pursuer {
    pub body: KinematicBody,
    pub speed: f32,
    /// Speed the smoothing is currently heading toward
    pub target_speed: f32,
    pub status: PursuerStatus,
    /// Set once the player is caught
    pub captured: bool,
    /// Set when the run ends without a capture
    pub halted: bool,
}

impl Pursuer {
    pub fn new(player: &Rect, base_speed: f32) -> Self {
        let mut pursuer = Self {
            body: KinematicBody::new(Rect::default()),
            speed: 0.0,
            target_speed: 0.0,
            status: PursuerStatus::Run,
            captured: false,
            halted: false,
        };
        pursuer.reset(player, base_speed);
        pursuer
    }

    /// Put the pursuer back behind the player for a new run
    pub fn reset(&mut self, player: &Rect, base_speed: f32) {
        let start = Vec2::new(player.center_x() - PURSUER_START_OFFSET, FLOOR_Y);
        self.body = KinematicBody::new(Rect::from_midbottom(start, PURSUER_SIZE));
        self.body.set_direction(1);
        self.body.grounded = true;
        self.speed = base_speed * PURSUER_START_RATIO;
        self.target_speed = self.speed;
        self.status = PursuerStatus::Run;
        self.captured = false;
        self.halted = false;
    }

    /// Desired speed given the gap to the player.
    ///
    /// `reference_speed` is the player's unpenalized run speed, so debuffs on
    /// the player let the pursuer close in.
    pub fn target_speed_for(&self, player_center_x: f32, reference_speed: f32, difficulty: f32) -> f32 {
        let wanted = reference_speed * difficulty;
        let dist = player_center_x - self.body.rect.center_x();
        if dist > PURSUER_FAR_BAND {
            wanted * PURSUER_CATCH_UP
        } else if dist < PURSUER_NEAR_BAND {
            wanted * PURSUER_EASE_OFF
        } else {
            wanted
        }
    }

    pub fn update<'a>(
        &mut self,
        dt: f32,
        player: &Rect,
        reference_speed: f32,
        difficulty: f32,
        solids: impl IntoIterator<Item = &'a Rect>,
        hazards: impl IntoIterator<Item = &'a Rect>,
    ) {
        if self.captured || self.halted {
            self.speed = 0.0;
            self.target_speed = 0.0;
        } else {
            self.target_speed = self.target_speed_for(player.center_x(), reference_speed, difficulty);
            self.speed = approach(self.speed, self.target_speed, PURSUER_SPEED_GAIN, dt);
        }

        self.body.apply_gravity(dt);
        self.body.rect.x += self.speed * dt;
        self.body.grounded = false;
        self.body.resolve_vertical(solids);

        let probe = self.body.rect;
        if hazards.into_iter().any(|h| probe.overlaps(h)) {
            self.speed = 0.0;
        }
    }

    /// Shielded contact: shove back and stun
    pub fn knock_back(&mut self) {
        self.body.rect.x -= PURSUER_KNOCKBACK;
        self.speed = 0.0;
    }

    pub fn capture(&mut self) {
        self.captured = true;
        self.speed = 0.0;
    }

    /// Stop chasing (run ended some other way)
    pub fn halt(&mut self) {
        self.halted = true;
        self.speed = 0.0;
    }

    /// Re-enter from above behind the camera after falling out of the world.
    /// Returns whether a recovery happened.
    pub fn recover(&mut self, camera_x: f32) -> bool {
        if self.body.rect.top() <= DEATH_Y {
            return false;
        }
        let x = camera_x - PURSUER_RECOVERY_LAG;
        self.body.rect.set_midbottom(Vec2::new(x, 0.0));
        self.body.velocity_y = 0.0;
        self.body.grounded = false;
        log::debug!("Pursuer re-entering at x={x:.0}");
        true
    }

    pub fn derive_status(&self) -> PursuerStatus {
        if self.captured {
            PursuerStatus::Attack
        } else if self.halted {
            PursuerStatus::Idle
        } else if !self.body.grounded {
            PursuerStatus::Jump
        } else if self.speed > PURSUER_RUN_THRESHOLD {
            PursuerStatus::Run
        } else {
            PursuerStatus::Idle
        }
    }
}

/// Attacker hitbox
pub const ATTACKER_SIZE: Vec2 = Vec2::new(64.0, 64.0);
/// Number of attacker visual variants
pub const ATTACKER_VARIANTS: u8 = 6;
/// Hover point relative to the player's center
const ATTACKER_LEAD: f32 = 50.0;
const ATTACKER_HOVER: f32 = -180.0;
const WOBBLE_RATE: f32 = 4.0;
const WOBBLE_AMPLITUDE: f32 = 40.0;
/// Horizontal range inside which the attacker dives
const DIVE_RANGE: f32 = 150.0;
const DIVE_DEPTH: f32 = 150.0;
const GAIN_X: f32 = 0.12;
const DIVE_GAIN_X: f32 = 0.15;
const GAIN_Y: f32 = 0.08;
/// Seconds the attacker flashes after landing a hit
pub const ATTACK_COOLDOWN: f32 = 2.0;
/// Flight velocity while retreating (px/s)
const RETREAT_VELOCITY: Vec2 = Vec2::new(300.0, -600.0);
/// Once the bottom edge passes this line the attacker is gone
pub const DEPARTURE_LINE: f32 = -100.0;
/// Horizontal slack before the attacker counts as moving
const SETTLE_DISTANCE: f32 = 2.0;

/// Aerial attacker with pursue and retreat phases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attacker {
    pub id: u32,
    /// Visual variant (1..=ATTACKER_VARIANTS)
    pub variant: u8,
    pub body: KinematicBody,
    /// Wobble phase (radians)
    pub wobble: f32,
    /// Current horizontal smoothing gain
    pub gain_x: f32,
    pub attack_cooldown: f32,
    /// Terminal: flies away and is removed once above the world
    pub retreating: bool,
    pub alive: bool,
    pub status: MobStatus,
}

impl Attacker {
    pub fn spawn(id: u32, x: f32, y: f32, variant: u8) -> Self {
        Self {
            id,
            variant: variant.clamp(1, ATTACKER_VARIANTS),
            body: KinematicBody::new(Rect::from_center(Vec2::new(x, y), ATTACKER_SIZE)),
            wobble: 0.0,
            gain_x: GAIN_X,
            attack_cooldown: 0.0,
            retreating: false,
            alive: true,
            status: MobStatus::Idle,
        }
    }

    /// Hover target above and ahead of the player; dives when close
    pub fn target(&self, player: &Rect) -> (Vec2, f32) {
        let mut target = Vec2::new(
            player.center_x() + ATTACKER_LEAD,
            player.center_y() + ATTACKER_HOVER + self.wobble.sin() * WOBBLE_AMPLITUDE,
        );
        let dx = (self.body.rect.center_x() - player.center_x()).abs();
        if dx < DIVE_RANGE {
            target.y += DIVE_DEPTH;
            (target, DIVE_GAIN_X)
        } else {
            (target, GAIN_X)
        }
    }

    pub fn update(&mut self, dt: f32, player: &Rect) {
        self.wobble += dt * WOBBLE_RATE;
        if self.attack_cooldown > 0.0 {
            self.attack_cooldown = (self.attack_cooldown - dt).max(0.0);
        }

        if self.retreating {
            self.body.rect.translate(RETREAT_VELOCITY * dt);
            self.status = MobStatus::Walk;
            return;
        }

        let (target, gain_x) = self.target(player);
        self.gain_x = gain_x;
        let center = self.body.rect.center();
        let next = Vec2::new(
            approach(center.x, target.x, gain_x, dt),
            approach(center.y, target.y, GAIN_Y, dt),
        );
        self.body.rect.set_center(next);
        self.body.set_direction(if target.x >= next.x { 1 } else { -1 });

        self.status = if (target.x - next.x).abs() > SETTLE_DISTANCE {
            MobStatus::Walk
        } else {
            MobStatus::Idle
        };
    }

    /// Flashing attackers cannot be stomped and cannot strike again
    pub fn is_flashing(&self) -> bool {
        self.attack_cooldown > 0.0
    }

    pub fn can_engage(&self) -> bool {
        self.alive && !self.retreating && !self.is_flashing()
    }

    /// Landed a hit: start the cooldown and fly off
    pub fn strike(&mut self) {
        self.retreating = true;
        self.attack_cooldown = ATTACK_COOLDOWN;
    }

    pub fn stomp_line(&self) -> f32 {
        self.body.rect.center_y() + AERIAL_STOMP_TOLERANCE
    }

    /// Fully above the world after retreating
    pub fn departed(&self) -> bool {
        self.body.rect.bottom() < DEPARTURE_LINE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player_at(x: f32) -> Rect {
        Rect::from_midbottom(Vec2::new(x, FLOOR_Y), Vec2::new(50.0, 100.0))
    }

    fn floor() -> Rect {
        Rect::new(-10_000.0, FLOOR_Y, 100_000.0, 200.0)
    }

    #[test]
    fn test_spawn_speed_within_species_range() {
        let mut rng = Pcg32::seed_from_u64(7);
        for species in Species::ALL {
            for _ in 0..50 {
                let mob = RoamingMob::spawn(1, species, 500.0, FLOOR_Y, -1, &mut rng);
                let (lo, hi) = species.info().speed_range;
                assert!(mob.speed >= lo as f32 && mob.speed <= hi as f32);
                assert!(mob.velocity_x() < 0.0);
            }
        }
    }

    #[test]
    fn test_ground_mob_walks_on_floor() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut mob = RoamingMob::spawn(1, Species::Wolf, 500.0, FLOOR_Y, -1, &mut rng);
        let start = mob.body.rect.x;
        let solids = [floor()];
        for _ in 0..60 {
            mob.update(SIM_DT, &solids);
        }
        assert!(mob.body.grounded);
        assert_eq!(mob.body.rect.bottom(), FLOOR_Y);
        let travelled = start - mob.body.rect.x;
        assert!((travelled - mob.speed).abs() < 0.5);
    }

    #[test]
    fn test_bird_ignores_gravity() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut bird = RoamingMob::spawn(1, Species::Bird, 500.0, 200.0, -1, &mut rng);
        for _ in 0..60 {
            bird.update(SIM_DT, std::iter::empty());
        }
        assert_eq!(bird.body.rect.center_y(), 200.0);
        assert!(bird.stomp_line() > bird.body.rect.center_y() + 30.0);
    }

    #[test]
    fn test_pursuer_target_bands() {
        let player = player_at(1000.0);
        let mut pursuer = Pursuer::new(&player, 350.0);

        pursuer.body.rect.set_midbottom(Vec2::new(300.0, FLOOR_Y));
        let far = pursuer.target_speed_for(player.center_x(), 350.0, 1.0);
        assert!((far - 420.0).abs() < 1e-3);

        pursuer.body.rect.set_midbottom(Vec2::new(900.0, FLOOR_Y));
        let near = pursuer.target_speed_for(player.center_x(), 350.0, 1.0);
        assert!((near - 280.0).abs() < 1e-3);

        pursuer.body.rect.set_midbottom(Vec2::new(700.0, FLOOR_Y));
        let cruise = pursuer.target_speed_for(player.center_x(), 350.0, 1.2);
        assert!((cruise - 420.0).abs() < 1e-3);
    }

    #[test]
    fn test_pursuer_converges_without_overshoot() {
        let player = player_at(100_000.0);
        let mut pursuer = Pursuer::new(&player, 350.0);
        pursuer.body.rect.set_midbottom(Vec2::new(0.0, FLOOR_Y));
        let solids = [floor()];
        let target = 350.0 * PURSUER_CATCH_UP;
        let mut prev_error = target - pursuer.speed;
        for _ in 0..120 {
            pursuer.update(SIM_DT, &player, 350.0, 1.0, &solids, std::iter::empty());
            let error = target - pursuer.speed;
            assert!(error >= -1e-3, "overshot target: {}", pursuer.speed);
            assert!(error <= prev_error * 0.9 + 1e-3);
            prev_error = error;
        }
        assert!((pursuer.speed - target).abs() < 0.1);
    }

    #[test]
    fn test_pursuer_halts_on_hazard() {
        let player = player_at(2000.0);
        let mut pursuer = Pursuer::new(&player, 350.0);
        let hazard = pursuer.body.rect;
        pursuer.update(SIM_DT, &player, 350.0, 1.0, &[floor()], &[hazard]);
        assert_eq!(pursuer.speed, 0.0);
    }

    #[test]
    fn test_pursuer_recovers_from_fall() {
        let player = player_at(2000.0);
        let mut pursuer = Pursuer::new(&player, 350.0);
        assert!(!pursuer.recover(1000.0));
        pursuer.body.rect.set_top(DEATH_Y + 10.0);
        assert!(pursuer.recover(1000.0));
        assert!(pursuer.body.rect.bottom() <= 0.0);
        assert!(pursuer.body.rect.center_x() < 1000.0);
    }

    #[test]
    fn test_attacker_dives_when_close() {
        let player = player_at(500.0);
        let far = Attacker::spawn(1, 1200.0, 200.0, 1);
        let (_, gain) = far.target(&player);
        assert_eq!(gain, GAIN_X);
        let close = Attacker::spawn(2, 520.0, 200.0, 1);
        let (target, gain) = close.target(&player);
        assert_eq!(gain, DIVE_GAIN_X);
        assert!(target.y > player.center_y() + ATTACKER_HOVER);
    }

    #[test]
    fn test_attacker_retreats_and_departs() {
        let player = player_at(500.0);
        let mut attacker = Attacker::spawn(1, 500.0, 400.0, 3);
        attacker.strike();
        assert!(attacker.is_flashing());
        assert!(!attacker.can_engage());
        let mut last_y = attacker.body.rect.y;
        let mut frames = 0;
        while !attacker.departed() {
            attacker.update(SIM_DT, &player);
            assert!(attacker.body.rect.y < last_y);
            last_y = attacker.body.rect.y;
            frames += 1;
            assert!(frames < 600);
        }
    }
}
