//! Top-level scene nodes, buttons and labels

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::action::{Action, RunningAction};
use crate::Rect;

/// A named top-level node. Its offset displaces everything drawn under it.
#[derive(Debug, Clone)]
pub struct Node {
    pub name: &'static str,
    pub offset: Vec2,
    actions: Vec<RunningAction>,
}

impl Node {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            offset: Vec2::ZERO,
            actions: Vec::new(),
        }
    }

    pub fn run(&mut self, action: Action) {
        self.actions.push(RunningAction::new(action));
    }

    pub fn remove_all_actions(&mut self) {
        self.actions.clear();
    }

    pub fn has_actions(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Step running actions and drop finished ones
    pub fn advance(&mut self, dt: f32) {
        for action in &mut self.actions {
            self.offset += action.step(dt);
        }
        self.actions.retain(|a| !a.is_finished());
    }
}

/// Button visibility/interactivity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    Active,
    Hidden,
}

/// A pressable button
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Button {
    pub name: String,
    pub frame: Rect,
    pub state: ButtonState,
}

impl Button {
    pub fn new(name: impl Into<String>, frame: Rect, state: ButtonState) -> Self {
        Self {
            name: name.into(),
            frame,
            state,
        }
    }

    /// Active and under the press
    pub fn hit(&self, point: Vec2) -> bool {
        self.state == ButtonState::Active && self.frame.contains(point)
    }

    /// Copy drawn under a node displaced by `offset`
    pub fn displaced(&self, offset: Vec2) -> Self {
        Self {
            frame: self.frame.translated(offset),
            ..self.clone()
        }
    }
}

/// A text label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    /// Text anchor (centre)
    pub pos: Vec2,
    pub text: String,
    pub hidden: bool,
}

impl Label {
    pub fn new(name: impl Into<String>, pos: Vec2, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pos,
            text: text.into(),
            hidden: false,
        }
    }

    /// Copy drawn under a node displaced by `offset`
    pub fn displaced(&self, offset: Vec2) -> Self {
        Self {
            pos: self.pos + offset,
            ..self.clone()
        }
    }
}
