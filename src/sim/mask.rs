//! Per-pixel collision masks
//!
//! A mask is a row-major bitmap of solid pixels taken from an animation
//! frame. Two masks collide when any solid pixel overlaps once both are
//! placed at their world positions.

use glam::Vec2;

use super::geometry::Rect;

/// Solid-pixel bitmap for one animation frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollisionMask {
    width: u32,
    height: u32,
    bits: Vec<bool>,
}

impl CollisionMask {
    /// Empty mask (no solid pixels)
    pub fn empty(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![false; (width * height) as usize],
        }
    }

    /// Fully solid mask
    pub fn solid(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: vec![true; (width * height) as usize],
        }
    }

    /// Build a mask from an alpha channel; pixels above `threshold` are solid
    pub fn from_alpha(width: u32, height: u32, alpha: &[u8], threshold: u8) -> Self {
        let len = (width * height) as usize;
        let mut bits = vec![false; len];
        for (bit, &a) in bits.iter_mut().zip(alpha.iter().take(len)) {
            *bit = a > threshold;
        }
        Self {
            width,
            height,
            bits,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width as f32, self.height as f32)
    }

    /// Solid pixel lookup; out-of-bounds reads are empty
    #[inline]
    pub fn get(&self, x: i32, y: i32) -> bool {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return false;
        }
        self.bits[(y as u32 * self.width + x as u32) as usize]
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            self.bits[(y * self.width + x) as usize] = solid;
        }
    }

    /// Number of solid pixels
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|b| **b).count()
    }

    /// Whether `other`, placed at `offset` relative to this mask's top-left,
    /// shares any solid pixel with this mask
    pub fn overlap(&self, other: &CollisionMask, offset: (i32, i32)) -> bool {
        let (ox, oy) = offset;
        let x0 = ox.max(0);
        let y0 = oy.max(0);
        let x1 = (self.width as i32).min(ox + other.width as i32);
        let y1 = (self.height as i32).min(oy + other.height as i32);
        if x0 >= x1 || y0 >= y1 {
            return false;
        }
        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x, y) && other.get(x - ox, y - oy) {
                    return true;
                }
            }
        }
        false
    }
}

/// Place a mask in the world: centered on the body's bottom edge, shifted by
/// the frame's visual offset
pub fn placed_rect(body: &Rect, mask: &CollisionMask, offset: Vec2) -> Rect {
    Rect::from_midbottom(body.midbottom() + offset, mask.size())
}

/// Pixel-accurate overlap of two placed masks
pub fn masks_collide(a_rect: &Rect, a: &CollisionMask, b_rect: &Rect, b: &CollisionMask) -> bool {
    if !a_rect.overlaps(b_rect) {
        return false;
    }
    let offset = (
        (b_rect.x - a_rect.x).round() as i32,
        (b_rect.y - a_rect.y).round() as i32,
    );
    a.overlap(b, offset)
}
