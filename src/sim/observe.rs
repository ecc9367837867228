//! Surroundings scan and the fixed-size observation vector
//!
//! Read-only views of a [`GameState`] for agents driving the simulation.

use super::geometry::Rect;
use super::state::GameState;
use super::tick::Action;
use crate::consts::SCREEN_HEIGHT;

/// Reported distance when nothing is in range
pub const SCAN_RANGE: f32 = 1500.0;
/// Segments whose top is this close to the player's feet count as the same floor
const SAME_FLOOR_TOLERANCE: f32 = 50.0;
/// Segments ending this far behind the player are ignored
const SCAN_BEHIND: f32 = 100.0;
/// Max seam between two segments of one continuous floor
const FLOOR_SEAM: f32 = 20.0;
/// Lookahead for the first floor segment
const FLOOR_REACH: f32 = 50.0;

pub const OBSERVATION_SIZE: usize = 16;
pub type Observation = [f32; OBSERVATION_SIZE];
const OBSERVATION_CLIP: f32 = 5.0;

/// What lies ahead of the player
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surroundings {
    /// Distance to the end of the floor under the player
    pub next_gap_dist: f32,
    pub next_enemy_dist: f32,
    /// 0 none, 0.5 ground enemy, 1 aerial enemy
    pub next_enemy_type: f32,
    /// Vertical offset of the next enemy, in screen heights
    pub enemy_y_delta: f32,
    /// Height of the next segment's top over the player's feet, in screen heights
    pub next_platform_y_delta: f32,
    pub next_platform_x_dist: f32,
    pub next_platform_width: f32,
    /// Gap between the current floor and the next segment
    pub gap_size: f32,
    pub next_weed_dist: f32,
    pub next_hazard_dist: f32,
}

impl Default for Surroundings {
    fn default() -> Self {
        Self {
            next_gap_dist: 0.0,
            next_enemy_dist: SCAN_RANGE,
            next_enemy_type: 0.0,
            enemy_y_delta: 0.0,
            next_platform_y_delta: 0.0,
            next_platform_x_dist: SCAN_RANGE,
            next_platform_width: 0.0,
            gap_size: 0.0,
            next_weed_dist: SCAN_RANGE,
            next_hazard_dist: SCAN_RANGE,
        }
    }
}

/// Closest rect starting ahead of `front`, by left edge
fn nearest_ahead<'a>(front: f32, rects: impl IntoIterator<Item = &'a Rect>) -> Option<(f32, &'a Rect)> {
    rects
        .into_iter()
        .map(|r| (r.left() - front, r))
        .filter(|(dx, _)| *dx > 0.0 && *dx < SCAN_RANGE)
        .min_by(|a, b| a.0.total_cmp(&b.0))
}

pub fn scan_surroundings(state: &GameState) -> Surroundings {
    let mut scan = Surroundings::default();
    let player = &state.player.body.rect;
    let (front, feet) = (player.right(), player.bottom());

    let mut floor_end: Option<f32> = None;
    let mut next: Option<&Rect> = None;
    let mut best = f32::INFINITY;
    for seg in &state.world.segments {
        let r = &seg.rect;
        if r.right() < player.left() - SCAN_BEHIND {
            continue;
        }
        let same_floor = (r.top() - feet).abs() < SAME_FLOOR_TOLERANCE;
        let continues = match floor_end {
            Some(end) => r.left() <= end + FLOOR_SEAM,
            None => r.left() <= front + FLOOR_REACH,
        };
        if continues && same_floor {
            floor_end = Some(floor_end.map_or(r.right(), |end| end.max(r.right())));
        }
        if r.left() > front && r.left() - front < best {
            best = r.left() - front;
            next = Some(r);
        }
    }

    if let Some(end) = floor_end {
        scan.next_gap_dist = (end - front).max(0.0);
    }
    if let Some(r) = next {
        scan.next_platform_y_delta = (r.top() - feet) / SCREEN_HEIGHT;
        scan.next_platform_x_dist = (r.left() - front).max(0.0);
        scan.next_platform_width = r.w;
        if let Some(end) = floor_end {
            scan.gap_size = (r.left() - end).max(0.0);
        }
    }

    let mut enemies: Vec<(&Rect, bool)> = state
        .world
        .mobs
        .iter()
        .filter(|m| m.alive)
        .map(|m| (&m.body.rect, m.is_aerial()))
        .chain(
            state
                .world
                .attackers
                .iter()
                .filter(|a| a.alive)
                .map(|a| (&a.body.rect, true)),
        )
        .collect();
    let pursuer = &state.pursuer.body.rect;
    if pursuer.center_x() > player.center_x() {
        enemies.push((pursuer, false));
    }
    let nearest_enemy = enemies
        .iter()
        .map(|(r, aerial)| (r.left() - front, *r, *aerial))
        .filter(|(dx, _, _)| *dx > 0.0 && *dx < SCAN_RANGE)
        .min_by(|a, b| a.0.total_cmp(&b.0));
    if let Some((dx, r, aerial)) = nearest_enemy {
        scan.next_enemy_dist = dx;
        scan.next_enemy_type = if aerial { 1.0 } else { 0.5 };
        scan.enemy_y_delta = (r.center_y() - player.center_y()) / SCREEN_HEIGHT;
    }

    let weeds = state
        .world
        .collectibles
        .iter()
        .filter(|c| c.alive && !c.kind.is_powerup())
        .map(|c| &c.rect);
    if let Some((dx, _)) = nearest_ahead(front, weeds) {
        scan.next_weed_dist = dx;
    }
    if let Some((dx, _)) = nearest_ahead(front, state.world.hazard_rects()) {
        scan.next_hazard_dist = dx;
    }
    scan
}

/// Fixed-size feature vector, clipped to a symmetric range
pub fn observation(state: &GameState, last_action: Action) -> Observation {
    let scan = scan_surroundings(state);
    let player = &state.player;
    let speed = player.speed(&state.tuning, state.difficulty_multiplier());
    let flag = |b: bool| if b { 1.0 } else { 0.0 };
    let last_action = match last_action {
        Action::Noop => 0.0,
        Action::Jump => 0.5,
        Action::FastFall => 1.0,
    };

    let obs = [
        player.body.rect.center_y() / SCREEN_HEIGHT,
        player.body.velocity_y / 1000.0,
        scan.next_gap_dist / 500.0,
        scan.next_enemy_dist / 500.0,
        scan.next_enemy_type,
        flag(player.body.grounded),
        speed / 500.0,
        scan.next_platform_y_delta,
        scan.enemy_y_delta,
        scan.next_platform_x_dist / 500.0,
        scan.next_platform_width / 500.0,
        scan.gap_size / 300.0,
        scan.next_weed_dist / 500.0,
        scan.next_hazard_dist / 500.0,
        last_action,
        flag(player.has_shield()),
    ];
    obs.map(|v| v.clamp(-OBSERVATION_CLIP, OBSERVATION_CLIP))
}
