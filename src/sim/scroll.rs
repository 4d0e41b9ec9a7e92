//! Endless horizontal scrolling by tile wrap-around
//!
//! A layer is a row of tiles. Each tick every tile moves left; a tile whose
//! right edge has crossed the scene's left edge jumps back in past the right
//! edge. Nothing is created or destroyed.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Rect;

/// One repeating sprite in a scroll layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tile {
    /// Centre position (scene space)
    pub pos: Vec2,
    pub size: Vec2,
    /// Solid tiles take part in contact detection (ground)
    #[serde(default)]
    pub solid: bool,
}

impl Tile {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            solid: false,
        }
    }

    pub fn solid(pos: Vec2, size: Vec2) -> Self {
        Self {
            pos,
            size,
            solid: true,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// A named band of wrapping tiles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrollLayer {
    pub name: String,
    pub tiles: Vec<Tile>,
}

impl ScrollLayer {
    pub fn new(name: impl Into<String>, tiles: Vec<Tile>) -> Self {
        Self {
            name: name.into(),
            tiles,
        }
    }

    /// Shift every tile left by `speed * dt`, wrapping tiles that left the scene
    pub fn advance(&mut self, speed: f32, dt: f32, scene_width: f32) {
        let shift = speed * dt;
        for tile in &mut self.tiles {
            tile.pos.x -= shift;

            let half = tile.size.x / 2.0;
            if tile.pos.x <= -half {
                // Carry the overshoot so neighbouring tiles stay flush
                let overshoot = tile.pos.x + half;
                tile.pos.x = (scene_width / 2.0 + tile.size.x + overshoot).max(-half);
            }
        }
    }

    /// Bounds of every solid tile, paired with its index
    pub fn solid_bounds(&self) -> impl Iterator<Item = (u32, Rect)> + '_ {
        self.tiles
            .iter()
            .enumerate()
            .filter(|(_, t)| t.solid)
            .map(|(i, t)| (i as u32, t.bounds()))
    }
}
