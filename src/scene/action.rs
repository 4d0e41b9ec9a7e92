//! Declarative node actions
//!
//! An action is a timeline of offsets. Running it on a node moves the node by
//! the change in offset each tick, so actions compose with whatever else moves
//! the node.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// A named, reusable effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Linear move by `delta` over `duration` seconds
    MoveBy { delta: Vec2, duration: f32 },
    /// Children one after another
    Sequence(Vec<Action>),
}

impl Action {
    /// Total length in seconds
    pub fn duration(&self) -> f32 {
        match self {
            Action::MoveBy { duration, .. } => duration.max(0.0),
            Action::Sequence(steps) => steps.iter().map(Action::duration).sum(),
        }
    }

    /// Accumulated offset `t` seconds in
    pub fn offset_at(&self, t: f32) -> Vec2 {
        match self {
            Action::MoveBy { delta, duration } => {
                if *duration <= 0.0 {
                    *delta
                } else {
                    *delta * (t / duration).clamp(0.0, 1.0)
                }
            }
            Action::Sequence(steps) => {
                let mut start = 0.0;
                let mut offset = Vec2::ZERO;
                for step in steps {
                    let len = step.duration();
                    offset += step.offset_at((t - start).clamp(0.0, len));
                    start += len;
                }
                offset
            }
        }
    }
}

/// An action in progress
#[derive(Debug, Clone)]
pub struct RunningAction {
    action: Action,
    elapsed: f32,
    /// Offset handed out so far
    applied: Vec2,
    stepped: bool,
}

impl RunningAction {
    pub fn new(action: Action) -> Self {
        Self {
            action,
            elapsed: 0.0,
            applied: Vec2::ZERO,
            stepped: false,
        }
    }

    /// Advance by `dt`; returns how far the node moves this step
    pub fn step(&mut self, dt: f32) -> Vec2 {
        self.stepped = true;
        self.elapsed = (self.elapsed + dt).min(self.action.duration());
        let target = self.action.offset_at(self.elapsed);
        let delta = target - self.applied;
        self.applied = target;
        delta
    }

    pub fn is_finished(&self) -> bool {
        self.stepped && self.elapsed >= self.action.duration()
    }
}
