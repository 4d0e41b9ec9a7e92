//! Menu scene: drifting clouds and a play button

use glam::Vec2;

use super::node::{Button, ButtonState};
use super::{
    Scene, SceneContext, SceneId, SceneSnapshot, SceneTransition, SpriteKind, SpriteView,
};
use crate::assets::{AssetError, Assets};
use crate::sim::{GamePhase, ScrollLayer};

pub struct StartScene {
    clouds: ScrollLayer,
    play_button: Button,
}

impl StartScene {
    pub fn new(assets: &Assets) -> Result<Self, AssetError> {
        Ok(Self {
            clouds: assets.layer("startScrollLayer")?,
            play_button: Button::new(
                "playButton",
                assets.button_frame("playButton")?,
                ButtonState::Active,
            ),
        })
    }

    pub fn clouds(&self) -> &ScrollLayer {
        &self.clouds
    }
}

impl Scene for StartScene {
    fn id(&self) -> SceneId {
        SceneId::Start
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> SceneTransition {
        self.clouds
            .advance(ctx.tuning.start_scroll_speed, dt, ctx.tuning.scene_width);
        SceneTransition::None
    }

    fn press(&mut self, _ctx: &mut SceneContext<'_>, point: Vec2) -> SceneTransition {
        if self.play_button.hit(point) {
            SceneTransition::To(SceneId::Game)
        } else {
            SceneTransition::None
        }
    }

    fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            scene: SceneId::Start,
            phase: GamePhase::Start,
            sprites: self
                .clouds
                .tiles
                .iter()
                .map(|tile| SpriteView {
                    kind: SpriteKind::Cloud,
                    pos: tile.pos,
                    size: tile.size,
                    rotation: 0.0,
                    frame: 0,
                })
                .collect(),
            labels: Vec::new(),
            buttons: vec![self.play_button.clone()],
        }
    }
}
