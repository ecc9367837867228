//! Procedural track generation
//!
//! The generator keeps a cursor ahead of the camera and fills the space up to
//! one and a half viewports ahead with chunks: flat ground, gaps, or ground
//! with an elevated platform. Each chunk is populated with pickups, props and
//! mobs according to the biome at the cursor.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::adversary::{ATTACKER_VARIANTS, Attacker, RoamingMob, Species};
use super::world::{
    Collectible, CollectibleKind, DecorKind, Decoration, Hazard, HazardKind, Segment, SegmentKind, World,
};
use crate::consts::{FLOOR_Y, GROUND_THICKNESS, PLATFORM_HEIGHT, PLATFORM_THICKNESS, PX_PER_UNIT, SCREEN_WIDTH};
use crate::tuning::Tuning;

/// Distance units per biome
pub const BIOME_LENGTH: i64 = 400;
/// How far past the camera the track is kept generated, in viewports
const LOOKAHEAD_SCREENS: f32 = 1.5;

const FLAT_WIDTH: (i32, i32) = (400, 1000);
const PLATFORM_GROUND_WIDTH: (i32, i32) = (400, 800);
const PLATFORM_WIDTH: (i32, i32) = (150, 300);
/// Minimum clearance between an elevated platform and its ground's edges
const PLATFORM_MARGIN: i32 = 50;

const GAP_PICKUP_CHANCE: f64 = 0.5;
/// Gap pickups float this far above the floor line
const GAP_PICKUP_LIFT: f32 = 100.0;
const PLATFORM_POWERUP_CHANCE: f64 = 0.2;
const PROP_CHANCE: f64 = 0.3;
const HEART_CHANCE: f64 = 0.15;
const MAX_GROUND_PICKUPS: u32 = 2;
const MOB_CHANCE: f64 = 0.7;
const STREET_HAZARD_ROLL: f32 = 0.5;
const STREET_LAMP_ROLL: f32 = 0.8;

/// Attacker entry point past the right edge of the viewport
const OFFSCREEN_SPAWN: f32 = 100.0;
const ATTACKER_SPAWN_Y: f32 = 200.0;
const AERIAL_SPAWN_Y: (i32, i32) = (50, 400);
const AERIAL_CHANCE: f64 = 0.005;
const AERIAL_CHANCE_FOREST: f64 = 0.04;

/// World themes, cycling with distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Biome {
    #[default]
    Street,
    Park,
    Forest,
    Rooftop,
}

impl Biome {
    pub const CYCLE: [Biome; 4] = [Biome::Street, Biome::Park, Biome::Forest, Biome::Rooftop];

    pub fn as_str(self) -> &'static str {
        match self {
            Biome::Street => "street",
            Biome::Park => "park",
            Biome::Forest => "forest",
            Biome::Rooftop => "rooftop",
        }
    }

    /// Extra height of elevated platforms
    pub fn platform_lift(self) -> f32 {
        match self {
            Biome::Street => 0.0,
            Biome::Park | Biome::Forest => 80.0,
            Biome::Rooftop => 40.0,
        }
    }

    /// Vegetation biomes spawn wildlife and forest props
    pub fn is_wild(self) -> bool {
        matches!(self, Biome::Park | Biome::Forest)
    }
}

/// Biome at a world x-coordinate
pub fn biome_at(x: f32) -> Biome {
    let units = (x / PX_PER_UNIT).floor() as i64;
    let index = units.div_euclid(BIOME_LENGTH).rem_euclid(Biome::CYCLE.len() as i64);
    Biome::CYCLE[index as usize]
}

/// Chunk patterns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pattern {
    Flat,
    Gap,
    Platform,
}

/// Record of one generated chunk
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub pattern: Pattern,
    pub start: f32,
    pub width: f32,
    pub biome: Biome,
}

/// Per-frame inputs the generator reads from the rest of the game
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext<'a> {
    pub camera_x: f32,
    /// Distance score in units
    pub distance: u64,
    pub player_health: u8,
    /// Active cosmetic variant for weed pickups
    pub skin: Option<&'a str>,
}

/// Uniform integer in `[lo, hi]` as a coordinate, or `None` if the span is empty
fn rand_span<R: Rng + ?Sized>(rng: &mut R, lo: i32, hi: i32) -> Option<f32> {
    if lo > hi {
        None
    } else {
        Some(rng.random_range(lo..=hi) as f32)
    }
}

/// Offset inside `[margin, width - margin]` from `start`
fn place_within<R: Rng + ?Sized>(rng: &mut R, start: f32, width: f32, margin: i32) -> Option<f32> {
    rand_span(rng, margin, width as i32 - margin).map(|dx| start + dx)
}

/// Chunk generator state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackGenerator {
    /// x of the next ungenerated position
    pub cursor: f32,
    pub last_pattern: Option<Pattern>,
    /// Biome at the cursor
    pub biome: Biome,
    /// Seconds until the next attacker spawn attempt
    pub attacker_cooldown: f32,
}

impl TrackGenerator {
    pub fn new(cursor: f32) -> Self {
        Self {
            cursor,
            last_pattern: None,
            biome: biome_at(cursor),
            attacker_cooldown: 0.0,
        }
    }

    pub fn reset(&mut self, cursor: f32) {
        *self = Self::new(cursor);
    }

    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.attacker_cooldown > 0.0 {
            self.attacker_cooldown -= dt;
        }
    }

    /// Weighted pattern draw with the gap-free start and anti-repetition rules
    pub fn choose_pattern<R: Rng + ?Sized>(&self, tuning: &Tuning, distance: u64, rng: &mut R) -> Pattern {
        let weights = &tuning.pattern_weights;
        let total = weights.total().max(1);
        let roll = rng.random_range(0..total);
        let mut pattern = if roll < weights.flat {
            Pattern::Flat
        } else if roll < weights.flat.saturating_add(weights.gap) {
            Pattern::Gap
        } else {
            Pattern::Platform
        };

        if pattern == Pattern::Gap && distance < u64::from(tuning.gap_free_distance) {
            pattern = Pattern::Flat;
        }
        if pattern == Pattern::Gap && self.last_pattern == Some(Pattern::Gap) {
            pattern = Pattern::Platform;
        }
        pattern
    }

    /// Generate chunks until the cursor is far enough past the camera
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        ctx: &SpawnContext<'_>,
        tuning: &Tuning,
        world: &mut World,
        rng: &mut R,
    ) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let horizon = ctx.camera_x + SCREEN_WIDTH * LOOKAHEAD_SCREENS;

        while self.cursor < horizon {
            let biome = biome_at(self.cursor);
            if biome != self.biome {
                log::info!("Track entering {} at x={:.0}", biome.as_str(), self.cursor);
                self.biome = biome;
            }

            let pattern = self.choose_pattern(tuning, ctx.distance, rng);
            self.last_pattern = Some(pattern);
            let start = self.cursor;

            let width = match pattern {
                Pattern::Gap => self.emit_gap(ctx, tuning, world, rng),
                Pattern::Platform => self.emit_platform(ctx, world, rng),
                Pattern::Flat => self.emit_flat(ctx, tuning, world, rng),
            };
            self.cursor += width;

            chunks.push(Chunk {
                pattern,
                start,
                width,
                biome,
            });
        }
        chunks
    }

    fn emit_gap<R: Rng + ?Sized>(
        &mut self,
        ctx: &SpawnContext<'_>,
        tuning: &Tuning,
        world: &mut World,
        rng: &mut R,
    ) -> f32 {
        let lo = tuning.gap_min.min(tuning.gap_max);
        let width = rng.random_range(lo..=tuning.gap_max) as f32;
        if rng.random_bool(GAP_PICKUP_CHANCE) {
            spawn_weed(ctx, world, self.cursor + width / 2.0, FLOOR_Y - GAP_PICKUP_LIFT);
        }
        width
    }

    fn emit_platform<R: Rng + ?Sized>(&mut self, ctx: &SpawnContext<'_>, world: &mut World, rng: &mut R) -> f32 {
        let (lo, hi) = PLATFORM_GROUND_WIDTH;
        let width = rng.random_range(lo..=hi) as f32;
        let id = world.next_entity_id();
        world.segments.push(Segment::new(
            id,
            SegmentKind::Ground,
            self.cursor,
            FLOOR_Y,
            width,
            GROUND_THICKNESS,
            self.biome,
        ));

        let (lo, hi) = PLATFORM_WIDTH;
        let platform_w = rng.random_range(lo..=hi) as f32;
        let slack = width as i32 - platform_w as i32 - PLATFORM_MARGIN;
        if let Some(dx) = rand_span(rng, PLATFORM_MARGIN, slack) {
            let px = self.cursor + dx;
            let py = FLOOR_Y - PLATFORM_HEIGHT - self.biome.platform_lift();
            let id = world.next_entity_id();
            world.segments.push(Segment::new(
                id,
                SegmentKind::Platform,
                px,
                py,
                platform_w,
                PLATFORM_THICKNESS,
                self.biome,
            ));

            let center = px + platform_w / 2.0;
            spawn_weed(ctx, world, center, py);
            if rng.random_bool(PLATFORM_POWERUP_CHANCE) {
                let kind = if rng.random_bool(0.5) {
                    CollectibleKind::Magnet
                } else {
                    CollectibleKind::Shield
                };
                let id = world.next_entity_id();
                world.collectibles.push(Collectible::new(id, kind, center, py));
            }
        }

        self.spawn_decor(ctx, world, rng, width);
        width
    }

    fn emit_flat<R: Rng + ?Sized>(
        &mut self,
        ctx: &SpawnContext<'_>,
        tuning: &Tuning,
        world: &mut World,
        rng: &mut R,
    ) -> f32 {
        let (lo, hi) = FLAT_WIDTH;
        let width = rng.random_range(lo..=hi) as f32;
        let id = world.next_entity_id();
        world.segments.push(Segment::new(
            id,
            SegmentKind::Ground,
            self.cursor,
            FLOOR_Y,
            width,
            GROUND_THICKNESS,
            self.biome,
        ));

        self.spawn_decor(ctx, world, rng, width);
        if rng.random_bool(MOB_CHANCE) {
            self.spawn_ground_mob(world, rng, width);
        }
        self.maybe_spawn_attacker(ctx, tuning, world, rng);
        width
    }

    /// Props, ground pickups and the occasional heart along a ground run
    fn spawn_decor<R: Rng + ?Sized>(&self, ctx: &SpawnContext<'_>, world: &mut World, rng: &mut R, width: f32) {
        if rng.random_bool(PROP_CHANCE) {
            self.spawn_prop(world, rng, width);
        }
        let count = rng.random_range(0..=MAX_GROUND_PICKUPS);
        for _ in 0..count {
            if let Some(x) = place_within(rng, self.cursor, width, 20) {
                spawn_weed(ctx, world, x, FLOOR_Y);
            }
        }
        if rng.random_bool(HEART_CHANCE) {
            if let Some(x) = place_within(rng, self.cursor, width, 50) {
                let id = world.next_entity_id();
                world
                    .collectibles
                    .push(Collectible::new(id, CollectibleKind::Heart, x, FLOOR_Y));
            }
        }
    }

    fn spawn_prop<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R, width: f32) {
        let roll: f32 = rng.random();
        let Some(x) = place_within(rng, self.cursor, width, 50) else {
            return;
        };

        if self.biome.is_wild() {
            let id = world.next_entity_id();
            match rng.random_range(0..3) {
                0 => world.hazards.push(Hazard::new(id, HazardKind::Log, x, FLOOR_Y)),
                1 => world.hazards.push(Hazard::new(id, HazardKind::Rock, x, FLOOR_Y)),
                _ => world
                    .decorations
                    .push(Decoration::new(id, DecorKind::Bush, x, FLOOR_Y)),
            }
        } else if roll < STREET_HAZARD_ROLL {
            let kind = HazardKind::STREET[rng.random_range(0..HazardKind::STREET.len())];
            let id = world.next_entity_id();
            world.hazards.push(Hazard::new(id, kind, x, FLOOR_Y));
        } else if roll < STREET_LAMP_ROLL {
            let kind = if rng.random_bool(0.5) {
                DecorKind::Lamppost
            } else {
                DecorKind::TrafficLight
            };
            let id = world.next_entity_id();
            world.decorations.push(Decoration::new(id, kind, x, FLOOR_Y));
        }
    }

    fn spawn_ground_mob<R: Rng + ?Sized>(&self, world: &mut World, rng: &mut R, width: f32) {
        let Some(x) = place_within(rng, self.cursor, width, 100) else {
            return;
        };
        let species = if self.biome.is_wild() {
            if rng.random_bool(0.5) { Species::Wolf } else { Species::Bear }
        } else {
            Species::Rat
        };
        let id = world.next_entity_id();
        world.mobs.push(RoamingMob::spawn(id, species, x, FLOOR_Y, -1, rng));
    }

    /// Attacker spawn attempt; gated by distance, health, cooldown and biome
    fn maybe_spawn_attacker<R: Rng + ?Sized>(
        &mut self,
        ctx: &SpawnContext<'_>,
        tuning: &Tuning,
        world: &mut World,
        rng: &mut R,
    ) {
        if ctx.camera_x <= tuning.aerial_distance || ctx.player_health <= 1 || self.attacker_cooldown > 0.0 {
            return;
        }
        self.attacker_cooldown = tuning.attacker_cooldown;
        if self.biome == Biome::Forest || !rng.random_bool(tuning.attacker_chance.clamp(0.0, 1.0)) {
            return;
        }
        let variant = rng.random_range(1..=ATTACKER_VARIANTS);
        let id = world.next_entity_id();
        let x = ctx.camera_x + SCREEN_WIDTH + OFFSCREEN_SPAWN;
        world.attackers.push(Attacker::spawn(id, x, ATTACKER_SPAWN_Y, variant));
        log::debug!("Attacker {id} (variant {variant}) spawned at x={x:.0}");
    }

    /// Ambient bird spawn, rolled once per frame
    pub fn maybe_spawn_aerial<R: Rng + ?Sized>(
        &self,
        camera_x: f32,
        tuning: &Tuning,
        world: &mut World,
        rng: &mut R,
    ) -> bool {
        if camera_x <= tuning.aerial_distance {
            return false;
        }
        let chance = if biome_at(camera_x + SCREEN_WIDTH) == Biome::Forest {
            AERIAL_CHANCE_FOREST
        } else {
            AERIAL_CHANCE
        };
        if !rng.random_bool(chance) {
            return false;
        }
        let (lo, hi) = AERIAL_SPAWN_Y;
        let y = rng.random_range(lo..=hi) as f32;
        let id = world.next_entity_id();
        let x = camera_x + SCREEN_WIDTH + OFFSCREEN_SPAWN;
        world.mobs.push(RoamingMob::spawn(id, Species::Bird, x, y, -1, rng));
        true
    }
}

fn spawn_weed(ctx: &SpawnContext<'_>, world: &mut World, x: f32, y: f32) {
    let id = world.next_entity_id();
    let weed = Collectible::new(id, CollectibleKind::Weed, x, y);
    world.collectibles.push(match ctx.skin {
        Some(skin) => weed.with_skin(skin),
        None => weed,
    });
}
