//! Rigid body integration for the hero
//!
//! Only what the game needs: gravity, impulses, an optional spin and a flag
//! that takes the body out of contact detection.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// A dynamic body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    /// Centre position (scene space)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision box size
    pub size: Vec2,
    pub mass: f32,
    /// Rotation in radians (counter-clockwise)
    pub rotation: f32,
    pub angular_velocity: f32,
    pub allows_rotation: bool,
    /// When false the body is skipped by contact detection
    pub collides: bool,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2, mass: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            size,
            mass,
            rotation: 0.0,
            angular_velocity: 0.0,
            allows_rotation: true,
            collides: true,
        }
    }

    /// Instant change of momentum
    pub fn apply_impulse(&mut self, impulse: Vec2) {
        self.vel += impulse / self.mass;
    }

    /// Semi-implicit Euler step
    pub fn integrate(&mut self, gravity: Vec2, dt: f32) {
        self.vel += gravity * dt;
        self.pos += self.vel * dt;
        if self.allows_rotation {
            self.rotation += self.angular_velocity * dt;
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}
