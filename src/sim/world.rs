//! Static geometry and spawned entities
//!
//! Everything the generator creates lives in [`World`]. Vectors are kept in
//! ascending id order so iteration is stable across runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::adversary::{Attacker, RoamingMob};
use super::geometry::Rect;
use super::track::Biome;
use crate::consts::{CULL_BEHIND, CULL_BELOW};

/// Static segment kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SegmentKind {
    Ground,
    Platform,
}

/// A static, solid tile run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub id: u32,
    pub kind: SegmentKind,
    pub rect: Rect,
    pub biome: Biome,
}

impl Segment {
    /// Zero or negative sizes are widened to a 1 px tile
    pub fn new(id: u32, kind: SegmentKind, x: f32, y: f32, w: f32, h: f32, biome: Biome) -> Self {
        Self {
            id,
            kind,
            rect: Rect::new(x, y, w.max(1.0), h.max(1.0)),
            biome,
        }
    }
}

/// Collectible and power-up kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    /// Lowers withdrawal
    Weed,
    /// Restores one health point
    Heart,
    Shield,
    Magnet,
}

impl CollectibleKind {
    pub fn is_powerup(self) -> bool {
        !matches!(self, CollectibleKind::Weed)
    }

    pub fn size(self) -> Vec2 {
        match self {
            CollectibleKind::Weed => Vec2::splat(32.0),
            _ => Vec2::splat(40.0),
        }
    }

    /// Height the item floats above its anchor point
    fn hover(self) -> f32 {
        match self {
            CollectibleKind::Weed => 50.0,
            _ => 60.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CollectibleKind::Weed => "weed",
            CollectibleKind::Heart => "heart",
            CollectibleKind::Shield => "shield",
            CollectibleKind::Magnet => "magnet",
        }
    }
}

/// A pickup floating above the track
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    pub kind: CollectibleKind,
    pub rect: Rect,
    /// Cosmetic variant from the progression store (weed only)
    pub skin: Option<String>,
    pub alive: bool,
}

impl Collectible {
    /// Place a collectible hovering above the anchor `(x, y)`
    pub fn new(id: u32, kind: CollectibleKind, x: f32, y: f32) -> Self {
        let anchor = Vec2::new(x, y - kind.hover());
        Self {
            id,
            kind,
            rect: Rect::from_midbottom(anchor, kind.size()),
            skin: None,
            alive: true,
        }
    }

    pub fn with_skin(mut self, skin: &str) -> Self {
        self.skin = Some(skin.to_owned());
        self
    }
}

/// Ground obstacles that slow the player on side contact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    TrashBag,
    TrashBags,
    Bin,
    Dumpster,
    Log,
    Rock,
}

impl HazardKind {
    pub const STREET: [HazardKind; 4] = [
        HazardKind::TrashBag,
        HazardKind::TrashBags,
        HazardKind::Bin,
        HazardKind::Dumpster,
    ];

    /// Visible bounding box of the prop
    pub fn footprint(self) -> Vec2 {
        match self {
            HazardKind::TrashBag => Vec2::new(48.0, 44.0),
            HazardKind::TrashBags => Vec2::new(80.0, 48.0),
            HazardKind::Bin => Vec2::new(44.0, 64.0),
            HazardKind::Dumpster => Vec2::new(120.0, 80.0),
            HazardKind::Log => Vec2::new(96.0, 36.0),
            HazardKind::Rock => Vec2::new(64.0, 48.0),
        }
    }
}

/// Hitbox width as a fraction of the visible footprint
const HAZARD_HITBOX_RATIO: f32 = 0.5;
/// Horizontal nudge of the hazard hitbox
const HAZARD_HITBOX_SHIFT: f32 = 10.0;

/// A static obstacle standing on the floor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    pub id: u32,
    pub kind: HazardKind,
    pub rect: Rect,
    pub alive: bool,
}

impl Hazard {
    pub fn new(id: u32, kind: HazardKind, x: f32, floor: f32) -> Self {
        let footprint = kind.footprint();
        let size = Vec2::new((footprint.x * HAZARD_HITBOX_RATIO).floor(), footprint.y);
        let mut rect = Rect::from_midbottom(Vec2::new(x, floor), size);
        rect.x += HAZARD_HITBOX_SHIFT;
        Self {
            id,
            kind,
            rect,
            alive: true,
        }
    }
}

/// Non-colliding decoration kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorKind {
    Lamppost,
    TrafficLight,
    Bush,
}

impl DecorKind {
    pub fn size(self) -> Vec2 {
        match self {
            DecorKind::Lamppost => Vec2::new(40.0, 220.0),
            DecorKind::TrafficLight => Vec2::new(40.0, 180.0),
            DecorKind::Bush => Vec2::new(90.0, 50.0),
        }
    }
}

/// Ambient decoration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decoration {
    pub id: u32,
    pub kind: DecorKind,
    pub rect: Rect,
}

impl Decoration {
    pub fn new(id: u32, kind: DecorKind, x: f32, floor: f32) -> Self {
        Self {
            id,
            kind,
            rect: Rect::from_midbottom(Vec2::new(x, floor), kind.size()),
        }
    }
}

/// All generated entities
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    pub segments: Vec<Segment>,
    pub collectibles: Vec<Collectible>,
    pub hazards: Vec<Hazard>,
    pub decorations: Vec<Decoration>,
    pub mobs: Vec<RoamingMob>,
    pub attackers: Vec<Attacker>,
    next_id: u32,
}

impl World {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Default::default()
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop every entity, keeping allocations for the next run
    pub fn clear(&mut self) {
        self.segments.clear();
        self.collectibles.clear();
        self.hazards.clear();
        self.decorations.clear();
        self.mobs.clear();
        self.attackers.clear();
        self.next_id = 1;
    }

    pub fn segment_rects(&self) -> impl Iterator<Item = &Rect> {
        self.segments.iter().map(|s| &s.rect)
    }

    pub fn hazard_rects(&self) -> impl Iterator<Item = &Rect> {
        self.hazards.iter().filter(|h| h.alive).map(|h| &h.rect)
    }

    /// Remove entities that fell behind the camera or below the world
    pub fn cull(&mut self, camera_x: f32) {
        let keep = |rect: &Rect| rect.right() >= camera_x - CULL_BEHIND && rect.top() <= CULL_BELOW;
        self.segments.retain(|s| keep(&s.rect));
        self.collectibles.retain(|c| keep(&c.rect));
        self.hazards.retain(|h| keep(&h.rect));
        self.decorations.retain(|d| keep(&d.rect));
        self.mobs.retain(|m| keep(&m.body.rect));
        self.attackers
            .retain(|a| keep(&a.body.rect) && !a.departed());
    }

    /// Remove entities destroyed during interaction resolution
    pub fn purge_dead(&mut self) {
        self.collectibles.retain(|c| c.alive);
        self.hazards.retain(|h| h.alive);
        self.mobs.retain(|m| m.alive);
        self.attackers.retain(|a| a.alive);
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.segments.sort_by_key(|s| s.id);
        self.collectibles.sort_by_key(|c| c.id);
        self.hazards.sort_by_key(|h| h.id);
        self.decorations.sort_by_key(|d| d.id);
        self.mobs.sort_by_key(|m| m.id);
        self.attackers.sort_by_key(|a| a.id);
    }

    pub fn entity_count(&self) -> usize {
        self.segments.len()
            + self.collectibles.len()
            + self.hazards.len()
            + self.decorations.len()
            + self.mobs.len()
            + self.attackers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FLOOR_Y;

    #[test]
    fn test_zero_width_segment_gets_safe_default() {
        let seg = Segment::new(1, SegmentKind::Ground, 0.0, FLOOR_Y, 0.0, 200.0, Biome::Street);
        assert_eq!(seg.rect.w, 1.0);
    }

    #[test]
    fn test_collectible_hovers_above_anchor() {
        let weed = Collectible::new(1, CollectibleKind::Weed, 500.0, FLOOR_Y);
        assert_eq!(weed.rect.bottom(), FLOOR_Y - 50.0);
        assert_eq!(weed.rect.center_x(), 500.0);
        let heart = Collectible::new(2, CollectibleKind::Heart, 500.0, FLOOR_Y);
        assert_eq!(heart.rect.bottom(), FLOOR_Y - 60.0);
    }

    #[test]
    fn test_hazard_hitbox_is_narrow() {
        let hazard = Hazard::new(1, HazardKind::Dumpster, 300.0, FLOOR_Y);
        assert_eq!(hazard.rect.w, 60.0);
        assert_eq!(hazard.rect.bottom(), FLOOR_Y);
    }

    #[test]
    fn test_cull_behind_and_below() {
        let mut world = World::new();
        let id = world.next_entity_id();
        world
            .segments
            .push(Segment::new(id, SegmentKind::Ground, 0.0, FLOOR_Y, 100.0, 200.0, Biome::Street));
        let id = world.next_entity_id();
        world
            .collectibles
            .push(Collectible::new(id, CollectibleKind::Weed, 2000.0, FLOOR_Y));
        let id = world.next_entity_id();
        let mut sunk = Collectible::new(id, CollectibleKind::Weed, 2100.0, FLOOR_Y);
        sunk.rect.y = CULL_BELOW + 1.0;
        world.collectibles.push(sunk);

        world.cull(1000.0);
        assert!(world.segments.is_empty());
        assert_eq!(world.collectibles.len(), 1);
        assert_eq!(world.collectibles[0].rect.center_x(), 2000.0);
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut world = World::new();
        world.next_entity_id();
        world.next_entity_id();
        world.clear();
        assert_eq!(world.next_entity_id(), 1);
        assert_eq!(world.entity_count(), 0);
    }
}
