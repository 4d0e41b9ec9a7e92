//! Obstacle spawning, scrolling and retirement
//!
//! Obstacles come from a template (two pipes and a goal region around a gap
//! centre). Retired obstacles go back into a pool and are handed out again
//! with a new id, so the per-tick loop does not allocate in steady state.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Rect;
use crate::tuning::TierTuning;

/// Body layout of an obstacle, relative to its gap centre
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObstacleTemplate {
    pub top_pipe: Rect,
    pub bottom_pipe: Rect,
    /// Region that scores when the hero enters it
    pub goal: Rect,
}

/// A live obstacle pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Gap centre (scene space)
    pub pos: Vec2,
    pub layout: ObstacleTemplate,
}

impl Obstacle {
    pub fn top_pipe(&self) -> Rect {
        self.layout.top_pipe.translated(self.pos)
    }

    pub fn bottom_pipe(&self) -> Rect {
        self.layout.bottom_pipe.translated(self.pos)
    }

    pub fn goal(&self) -> Rect {
        self.layout.goal.translated(self.pos)
    }
}

/// Spawn timer plus the live and pooled obstacles
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    template: ObstacleTemplate,
    /// Seconds since the last spawn
    pub timer: f32,
    /// Live obstacles, oldest first
    pub obstacles: Vec<Obstacle>,
    pool: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleSpawner {
    pub fn new(template: ObstacleTemplate) -> Self {
        Self {
            template,
            timer: 0.0,
            obstacles: Vec::new(),
            pool: Vec::new(),
            next_id: 1,
        }
    }

    /// Advance the timer and spawn at most one obstacle.
    ///
    /// Returns the spawned obstacle's id. The timer restarts at zero on spawn,
    /// so a long `dt` never produces a burst.
    pub fn advance(
        &mut self,
        dt: f32,
        tier: &TierTuning,
        spawn_x: f32,
        rng: &mut Pcg32,
    ) -> Option<u32> {
        self.timer += dt;
        if self.timer < tier.spawn_interval {
            return None;
        }
        self.timer = 0.0;

        let gap_y = if tier.gap_min < tier.gap_max {
            rng.random_range(tier.gap_min..=tier.gap_max)
        } else {
            tier.gap_min
        };
        Some(self.spawn(Vec2::new(spawn_x, gap_y)))
    }

    /// Place an obstacle, reusing a pooled one when available
    pub fn spawn(&mut self, pos: Vec2) -> u32 {
        let id = self.next_id;
        self.next_id += 1;

        let obstacle = match self.pool.pop() {
            Some(mut recycled) => {
                recycled.id = id;
                recycled.pos = pos;
                recycled
            }
            None => Obstacle {
                id,
                pos,
                layout: self.template.clone(),
            },
        };
        self.obstacles.push(obstacle);
        id
    }

    /// Move every live obstacle left by `shift`
    pub fn scroll(&mut self, shift: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.pos.x -= shift;
        }
    }

    /// Retire obstacles at or left of `retire_x`; returns how many were retired
    pub fn retire(&mut self, retire_x: f32) -> usize {
        let before = self.obstacles.len();
        let mut i = 0;
        while i < self.obstacles.len() {
            if self.obstacles[i].pos.x <= retire_x {
                // Preserve spawn order of the survivors
                let gone = self.obstacles.remove(i);
                self.pool.push(gone);
            } else {
                i += 1;
            }
        }
        before - self.obstacles.len()
    }

    pub fn pooled(&self) -> usize {
        self.pool.len()
    }

    pub fn get(&self, id: u32) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| o.id == id)
    }
}
