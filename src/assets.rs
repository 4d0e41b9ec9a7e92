//! Authored scene content
//!
//! Layer layouts, the obstacle template, named actions and button frames,
//! looked up by name. A missing entry is a content bug: lookups return
//! `AssetError` and scene construction propagates it instead of limping on.

use std::collections::BTreeMap;
use std::fmt;

use glam::Vec2;

use crate::Rect;
use crate::consts::*;
use crate::scene::Action;
use crate::sim::{ObstacleTemplate, ScrollLayer, Tile};

/// Kind of asset a lookup was for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Layer,
    Obstacle,
    Action,
    Button,
    Label,
}

/// Content lookup failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetError {
    Missing { kind: AssetKind, name: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { kind, name } => write!(f, "missing {:?} asset '{}'", kind, name),
        }
    }
}

impl std::error::Error for AssetError {}

/// Named content catalog
#[derive(Debug, Clone, Default)]
pub struct Assets {
    layers: BTreeMap<String, ScrollLayer>,
    obstacles: BTreeMap<String, ObstacleTemplate>,
    actions: BTreeMap<String, Action>,
    buttons: BTreeMap<String, Rect>,
    labels: BTreeMap<String, Vec2>,
}

fn missing(kind: AssetKind, name: &str) -> AssetError {
    AssetError::Missing {
        kind,
        name: name.to_owned(),
    }
}

impl Assets {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// The shipped content
    pub fn builtin() -> Self {
        let mut assets = Self::new();

        // Two scene-wide strips per layer; the wrap rule relies on that width
        let strip = |name: &str, y: f32, height: f32, solid: bool| {
            let size = Vec2::new(SCENE_WIDTH, height);
            let tiles = (0..2)
                .map(|i| {
                    let pos = Vec2::new(SCENE_WIDTH * (i as f32 + 0.5), y);
                    if solid {
                        Tile::solid(pos, size)
                    } else {
                        Tile::new(pos, size)
                    }
                })
                .collect();
            ScrollLayer::new(name, tiles)
        };
        assets.add_layer(strip("scrollLayer", GROUND_HEIGHT / 2.0, GROUND_HEIGHT, true));
        assets.add_layer(strip("parallaxScrollLayer", 460.0, 120.0, false));
        assets.add_layer(strip("startScrollLayer", 420.0, 160.0, false));

        // 120-unit gap around the origin, 52-wide pipes
        assets.add_obstacle(
            "Obstacle",
            ObstacleTemplate {
                top_pipe: Rect::new(Vec2::new(0.0, 260.0), Vec2::new(52.0, 400.0)),
                bottom_pipe: Rect::new(Vec2::new(0.0, -260.0), Vec2::new(52.0, 400.0)),
                goal: Rect::new(Vec2::ZERO, Vec2::new(8.0, 120.0)),
            },
        );

        let step = |dx: f32, dy: f32| Action::MoveBy {
            delta: Vec2::new(dx, dy),
            duration: 0.04,
        };
        assets.add_action(
            "Shake",
            Action::Sequence(vec![
                step(6.0, 2.0),
                step(-12.0, -4.0),
                step(10.0, 4.0),
                step(-8.0, -3.0),
                step(4.0, 1.0),
            ]),
        );

        let button_size = Vec2::new(128.0, 56.0);
        assets.add_button("playButton", Rect::new(Vec2::new(160.0, 220.0), button_size));
        assets.add_button("restartButton", Rect::new(Vec2::new(160.0, 284.0), button_size));

        assets.add_label("scoreLabel", Vec2::new(SCENE_WIDTH / 2.0, 500.0));
        assets.add_label("highScoreLabel", Vec2::new(SCENE_WIDTH / 2.0, 360.0));

        assets
    }

    pub fn add_layer(&mut self, layer: ScrollLayer) {
        self.layers.insert(layer.name.clone(), layer);
    }

    pub fn add_obstacle(&mut self, name: &str, template: ObstacleTemplate) {
        self.obstacles.insert(name.to_owned(), template);
    }

    pub fn add_action(&mut self, name: &str, action: Action) {
        self.actions.insert(name.to_owned(), action);
    }

    pub fn add_button(&mut self, name: &str, frame: Rect) {
        self.buttons.insert(name.to_owned(), frame);
    }

    pub fn add_label(&mut self, name: &str, pos: Vec2) {
        self.labels.insert(name.to_owned(), pos);
    }

    /// Fresh copy of a scroll layer
    pub fn layer(&self, name: &str) -> Result<ScrollLayer, AssetError> {
        self.layers
            .get(name)
            .cloned()
            .ok_or_else(|| missing(AssetKind::Layer, name))
    }

    pub fn obstacle_template(&self, name: &str) -> Result<ObstacleTemplate, AssetError> {
        self.obstacles
            .get(name)
            .cloned()
            .ok_or_else(|| missing(AssetKind::Obstacle, name))
    }

    pub fn action(&self, name: &str) -> Result<Action, AssetError> {
        self.actions
            .get(name)
            .cloned()
            .ok_or_else(|| missing(AssetKind::Action, name))
    }

    pub fn button_frame(&self, name: &str) -> Result<Rect, AssetError> {
        self.buttons
            .get(name)
            .copied()
            .ok_or_else(|| missing(AssetKind::Button, name))
    }

    pub fn label_anchor(&self, name: &str) -> Result<Vec2, AssetError> {
        self.labels
            .get(name)
            .copied()
            .ok_or_else(|| missing(AssetKind::Label, name))
    }

    /// Drop an entry (used to simulate broken content)
    pub fn remove(&mut self, name: &str) {
        self.layers.remove(name);
        self.obstacles.remove(name);
        self.actions.remove(name);
        self.buttons.remove(name);
        self.labels.remove(name);
    }
}
