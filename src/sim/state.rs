//! Game state and core simulation types
//!
//! Everything a GameScene run mutates lives in `GameState`, owned by exactly
//! one scene instance.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::collision::ContactTracker;
use super::scroll::ScrollLayer;
use super::spawner::{ObstacleSpawner, ObstacleTemplate};
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting on the menu
    Start,
    /// Active gameplay
    Active,
    /// Run ended; only a restart leaves this phase
    GameOver,
}

/// Difficulty tier, driven by score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Tier for a score: Hard above `hard_score`, Medium from `medium_score`
    pub fn for_score(score: u32, tuning: &Tuning) -> Self {
        if score > tuning.hard_score {
            Difficulty::Hard
        } else if score >= tuning.medium_score {
            Difficulty::Medium
        } else {
            Difficulty::Easy
        }
    }

    /// Seconds between obstacle spawns in this tier
    pub fn spawn_interval(&self, tuning: &Tuning) -> f32 {
        tuning.tier(*self).spawn_interval
    }
}

/// Hero pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeroPose {
    Flying,
    /// Face down in the dirt
    Impact,
}

/// Looping flap animation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlapAnimation {
    pub frame: u8,
    pub frame_count: u8,
    /// Seconds per frame
    pub frame_time: f32,
    pub elapsed: f32,
}

impl Default for FlapAnimation {
    fn default() -> Self {
        Self {
            frame: 0,
            frame_count: 3,
            frame_time: 0.1,
            elapsed: 0.0,
        }
    }
}

impl FlapAnimation {
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        while self.elapsed >= self.frame_time {
            self.elapsed -= self.frame_time;
            self.frame = (self.frame + 1) % self.frame_count;
        }
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hero {
    pub body: Body,
    /// Running animation, if any
    pub animation: Option<FlapAnimation>,
    pub pose: HeroPose,
}

impl Hero {
    pub fn new(pos: Vec2, mass: f32) -> Self {
        Self {
            body: Body::new(pos, Vec2::new(HERO_WIDTH, HERO_HEIGHT), mass),
            animation: Some(FlapAnimation::default()),
            pose: HeroPose::Flying,
        }
    }
}

/// Events emitted by the simulation for the presentation layer
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Flapped,
    Spawned { id: u32, gap_y: f32 },
    Retired { count: usize },
    Scored { score: u32 },
    DifficultyChanged { from: Difficulty, to: Difficulty },
    GameOver { score: u32 },
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub difficulty: Difficulty,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub hero: Hero,
    /// Ground tiles (solid)
    pub ground: ScrollLayer,
    /// Parallax cloud tiles
    pub clouds: ScrollLayer,
    pub spawner: ObstacleSpawner,
    pub contacts: ContactTracker,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new run. The scene begins Active.
    pub fn new(
        seed: u64,
        tuning: Tuning,
        ground: ScrollLayer,
        clouds: ScrollLayer,
        template: ObstacleTemplate,
    ) -> Self {
        let hero = Hero::new(Vec2::new(HERO_START_X, HERO_START_Y), tuning.hero_mass);
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            phase: GamePhase::Active,
            difficulty: Difficulty::Easy,
            score: 0,
            time_ticks: 0,
            hero,
            ground,
            clouds,
            spawner: ObstacleSpawner::new(template),
            contacts: ContactTracker::new(),
            events: Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.phase == GamePhase::Active
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
