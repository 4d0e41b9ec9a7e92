//! Data-driven game balance
//!
//! Every gameplay constant lives here so a run can be re-balanced from a JSON
//! file without touching the simulation. `Tuning::default()` is the shipped
//! balance.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::sim::Difficulty;

/// Spawn cadence and gap spread for one difficulty tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierTuning {
    /// Seconds between obstacle spawns
    pub spawn_interval: f32,
    /// Lowest gap-centre y (scene space)
    pub gap_min: f32,
    /// Highest gap-centre y (scene space)
    pub gap_max: f32,
}

/// Full balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub scene_width: f32,
    pub scene_height: f32,

    /// Ground and obstacle scroll speed (units/s)
    pub scroll_speed: f32,
    /// Cloud layer scrolls at `scroll_speed / parallax_divisor`
    pub parallax_divisor: f32,
    /// Cloud speed on the start screen (units/s)
    pub start_scroll_speed: f32,

    /// Vertical gravity (units/s², negative is down)
    pub gravity: f32,
    pub hero_mass: f32,
    /// Upward impulse applied per flap
    pub flap_impulse: f32,
    /// Upper bound on the hero's vertical velocity
    pub max_rise_velocity: f32,

    /// Score at which Medium starts
    pub medium_score: u32,
    /// Hard starts once score exceeds this
    pub hard_score: u32,

    /// Obstacle spawn x (scene space, just past the right edge)
    pub spawn_x: f32,
    /// Obstacles at or left of this x are retired
    pub retire_x: f32,

    pub easy: TierTuning,
    pub medium: TierTuning,
    pub hard: TierTuning,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            scene_width: SCENE_WIDTH,
            scene_height: SCENE_HEIGHT,

            scroll_speed: 160.0,
            parallax_divisor: 4.0,
            start_scroll_speed: 40.0,

            // 9.8 m/s² at 150 units per metre
            gravity: -1470.0,
            hero_mass: 0.5,
            flap_impulse: 250.0,
            max_rise_velocity: 400.0,

            medium_score: 5,
            hard_score: 45,

            spawn_x: 352.0,
            retire_x: 0.0,

            easy: TierTuning {
                spawn_interval: 2.0,
                gap_min: 290.0,
                gap_max: 330.0,
            },
            medium: TierTuning {
                spawn_interval: 1.5,
                gap_min: 250.0,
                gap_max: 360.0,
            },
            hard: TierTuning {
                spawn_interval: 0.8,
                gap_min: 234.0,
                gap_max: 382.0,
            },
        }
    }
}

/// Errors from loading a tuning table
#[derive(Debug)]
pub enum TuningError {
    Parse(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for TuningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "tuning parse error: {}", e),
            Self::Invalid(msg) => write!(f, "invalid tuning: {}", msg),
        }
    }
}

impl std::error::Error for TuningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON table; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject tables the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        let invalid = |msg: String| Err(TuningError::Invalid(msg));

        if self.scene_width <= 0.0 || self.scene_height <= 0.0 {
            return invalid(format!(
                "scene size must be positive, got {}x{}",
                self.scene_width, self.scene_height
            ));
        }
        if self.scroll_speed < 0.0 || self.start_scroll_speed < 0.0 {
            return invalid("scroll speeds must not be negative".into());
        }
        if self.parallax_divisor <= 0.0 {
            return invalid(format!(
                "parallax_divisor must be positive, got {}",
                self.parallax_divisor
            ));
        }
        if self.hero_mass <= 0.0 {
            return invalid(format!("hero_mass must be positive, got {}", self.hero_mass));
        }
        if self.medium_score > self.hard_score {
            return invalid(format!(
                "medium_score ({}) exceeds hard_score ({})",
                self.medium_score, self.hard_score
            ));
        }
        for difficulty in Difficulty::ALL {
            let tier = self.tier(difficulty);
            if tier.spawn_interval <= 0.0 {
                return invalid(format!("{:?} spawn_interval must be positive", difficulty));
            }
            if tier.gap_min > tier.gap_max {
                return invalid(format!(
                    "{:?} gap range is inverted ({} > {})",
                    difficulty, tier.gap_min, tier.gap_max
                ));
            }
        }
        Ok(())
    }

    /// Balance row for a tier
    pub fn tier(&self, difficulty: Difficulty) -> &TierTuning {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// Cloud speed inside the game scene
    pub fn parallax_speed(&self) -> f32 {
        self.scroll_speed / self.parallax_divisor
    }
}
