//! Hoppy Bunny - A flap-to-dodge side scroller
//!
//! Core modules:
//! - `sim`: Deterministic simulation (hero body, scrolling, obstacles, contacts)
//! - `scene`: Start/Game scenes and the scene manager that swaps them
//! - `persistence`: Durable key/value settings store (file, LocalStorage, memory)
//! - `platform`: Fixed-step clock and the browser binding
//! - `tuning`: Data-driven game balance

pub mod assets;
pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod scene;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use highscores::{HighScore, HighScoreOutcome};
pub use scene::{SceneId, SceneManager};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz logical rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the clock will try to catch up on (seconds)
    pub const MAX_FRAME_TIME: f32 = 0.1;

    /// Scene dimensions (portrait, origin bottom-left)
    pub const SCENE_WIDTH: f32 = 320.0;
    pub const SCENE_HEIGHT: f32 = 568.0;

    /// Ground strip
    pub const GROUND_HEIGHT: f32 = 96.0;

    /// Hero defaults
    pub const HERO_START_X: f32 = 80.0;
    pub const HERO_START_Y: f32 = 320.0;
    pub const HERO_WIDTH: f32 = 28.0;
    pub const HERO_HEIGHT: f32 = 24.0;

    /// Settings store key for the best score
    pub const HIGHSCORE_KEY: &str = "highscore";
}

/// Axis-aligned rectangle in scene space, stored as centre + size
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.size * 0.5
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.size * 0.5
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x < b_max.x && a_max.x > b_min.x && a_min.y < b_max.y && a_max.y > b_min.y
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let (min, max) = (self.min(), self.max());
        point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
    }

    /// Same rectangle moved by `delta`
    #[inline]
    pub fn translated(&self, delta: Vec2) -> Self {
        Self::new(self.center + delta, self.size)
    }
}
