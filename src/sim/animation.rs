//! Animation provider contract and frame cursor
//!
//! The simulation never loads assets. It asks an [`AnimationProvider`] for the
//! frames of an entity's (category, status) pair and keeps a fractional frame
//! cursor per entity. The current frame's mask feeds pixel collisions.

use std::collections::HashMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::adversary::{ATTACKER_SIZE, ATTACKER_VARIANTS, PURSUER_SIZE, Species};
use super::mask::CollisionMask;
use crate::consts::{PLAYER_HEIGHT, PLAYER_WIDTH};

/// Default frames advanced per tick
pub const DEFAULT_ANIMATION_RATE: f32 = 0.15;

/// Which sprite family an entity draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Player,
    Pursuer,
    Attacker { variant: u8 },
    Mob(Species),
}

/// One drawable frame as seen by the simulation
#[derive(Debug, Clone)]
pub struct Frame {
    /// Solid pixels of the drawn image
    pub mask: CollisionMask,
    /// Shift of the drawn image relative to the hitbox midbottom
    pub offset: Vec2,
}

/// Supplies animation frames; implemented by the asset layer
pub trait AnimationProvider {
    /// Ordered frames for a status. Empty means "not available", in which
    /// case collisions fall back to the hitbox.
    fn frames(&self, category: Category, status: &str) -> &[Frame];

    /// Frames advanced per tick for a status
    fn rate(&self, _category: Category, _status: &str) -> f32 {
        DEFAULT_ANIMATION_RATE
    }
}

/// Fractional frame cursor for one entity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Animator {
    pub frame_index: f32,
    status: Option<String>,
}

impl Animator {
    /// Advance the cursor. A status change restarts from frame 0; reaching the
    /// end wraps, or holds the last frame when `hold_last` is set.
    pub fn advance(&mut self, status: &str, len: usize, rate: f32, hold_last: bool) {
        if self.status.as_deref() != Some(status) {
            self.status = Some(status.to_owned());
            self.frame_index = 0.0;
        }
        if len == 0 {
            return;
        }
        self.frame_index += rate;
        if self.frame_index >= len as f32 {
            self.frame_index = if hold_last { (len - 1) as f32 } else { 0.0 };
        }
    }

    /// Pin the cursor to a specific frame (velocity-driven animations)
    pub fn set_frame(&mut self, status: &str, index: usize) {
        if self.status.as_deref() != Some(status) {
            self.status = Some(status.to_owned());
        }
        self.frame_index = index as f32;
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Current frame index for a sequence of `len` frames; wraps instead of faulting
    pub fn frame(&self, len: usize) -> Option<usize> {
        if len == 0 {
            None
        } else {
            Some(self.frame_index.max(0.0) as usize % len)
        }
    }

    /// Current frame out of a provider's sequence
    pub fn current<'a>(&self, frames: &'a [Frame]) -> Option<&'a Frame> {
        self.frame(frames.len()).map(|i| &frames[i])
    }
}

/// Provider that returns one solid, hitbox-sized frame per category.
///
/// Used headless (tests, training, the demo binary) where pixel masks reduce
/// to box checks.
#[derive(Debug, Clone)]
pub struct SolidMasks {
    frames: HashMap<Category, Vec<Frame>>,
}

impl Default for SolidMasks {
    fn default() -> Self {
        Self::new()
    }
}

impl SolidMasks {
    pub fn new() -> Self {
        let mut frames = HashMap::new();
        let mut insert = |category: Category, size: Vec2| {
            let frame = Frame {
                mask: CollisionMask::solid(size.x as u32, size.y as u32),
                offset: Vec2::ZERO,
            };
            frames.insert(category, vec![frame]);
        };
        insert(Category::Player, Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT));
        insert(Category::Pursuer, PURSUER_SIZE);
        for variant in 1..=ATTACKER_VARIANTS {
            insert(Category::Attacker { variant }, ATTACKER_SIZE);
        }
        for species in Species::ALL {
            insert(Category::Mob(species), species.info().size);
        }
        Self { frames }
    }
}

impl AnimationProvider for SolidMasks {
    fn frames(&self, category: Category, _status: &str) -> &[Frame] {
        self.frames.get(&category).map(Vec::as_slice).unwrap_or(&[])
    }
}
