//! Platform layer
//!
//! Turns host frames of arbitrary length into fixed simulation ticks and
//! hosts the browser binding. Hosts own the frame clock and input; they hand
//! both to a `GameLoop` and draw whatever `snapshot()` returns.

use glam::Vec2;

use crate::assets::AssetError;
use crate::consts::{MAX_FRAME_TIME, MAX_SUBSTEPS, SIM_DT};
use crate::scene::{SceneManager, SceneSnapshot};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebGame;

/// Fixed timestep accumulator
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    step: f32,
    max_substeps: u32,
    max_frame_time: f32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(SIM_DT)
    }
}

impl FixedStep {
    /// Clock ticking every `step` seconds. The frame cap is never shorter
    /// than one step.
    pub fn new(step: f32) -> Self {
        Self {
            accumulator: 0.0,
            step,
            max_substeps: MAX_SUBSTEPS,
            max_frame_time: MAX_FRAME_TIME.max(step),
        }
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Feed one frame's elapsed time; returns how many ticks to run now.
    ///
    /// Long frames (tab switches, breakpoints) are clamped so the sim never
    /// tries to catch up on more than `max_frame_time`.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, self.max_frame_time);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of a tick left over, for render interpolation
    pub fn alpha(&self) -> f32 {
        (self.accumulator / self.step).clamp(0.0, 1.0)
    }

}

/// A scene manager driven by a fixed-step clock
pub struct GameLoop {
    clock: FixedStep,
    manager: SceneManager,
}

impl GameLoop {
    pub fn new(manager: SceneManager) -> Self {
        Self {
            clock: FixedStep::default(),
            manager,
        }
    }

    /// Advance by one host frame; returns the number of ticks run
    pub fn frame(&mut self, frame_dt: f32) -> Result<u32, AssetError> {
        let ticks = self.clock.advance(frame_dt);
        let dt = self.clock.step();
        for _ in 0..ticks {
            self.manager.tick(dt)?;
        }
        Ok(ticks)
    }

    /// Deliver a press in scene coordinates
    pub fn press(&mut self, point: Vec2) -> Result<(), AssetError> {
        self.manager.press(point)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.manager.snapshot()
    }

    pub fn manager(&self) -> &SceneManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut SceneManager {
        &mut self.manager
    }
}
