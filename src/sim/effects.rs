//! Named countdown timers for timed player effects
//!
//! An effect is active iff its timer is above zero. All timers are advanced
//! together once per frame.

use serde::{Deserialize, Serialize};

/// Timed effects carried by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    Invincible,
    Hurt,
    Slow,
    Shield,
    Magnet,
}

impl Effect {
    pub const ALL: [Effect; 5] = [
        Effect::Invincible,
        Effect::Hurt,
        Effect::Slow,
        Effect::Shield,
        Effect::Magnet,
    ];

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

/// Remaining seconds per effect
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectTimers {
    remaining: [f32; 5],
}

impl EffectTimers {
    #[inline]
    pub fn active(&self, effect: Effect) -> bool {
        self.remaining[effect.index()] > 0.0
    }

    #[inline]
    pub fn remaining(&self, effect: Effect) -> f32 {
        self.remaining[effect.index()]
    }

    /// Start (or restart) an effect
    pub fn set(&mut self, effect: Effect, seconds: f32) {
        self.remaining[effect.index()] = seconds.max(0.0);
    }

    pub fn clear(&mut self, effect: Effect) {
        self.remaining[effect.index()] = 0.0;
    }

    pub fn clear_all(&mut self) {
        self.remaining = [0.0; 5];
    }

    /// Count every timer down; expired timers settle at exactly zero
    pub fn tick(&mut self, dt: f32) {
        for t in &mut self.remaining {
            if *t > 0.0 {
                *t = (*t - dt).max(0.0);
            }
        }
    }
}
