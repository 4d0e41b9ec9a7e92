//! Scene system
//!
//! A `SceneManager` owns the one active scene plus the services every scene
//! shares (settings store, sound, settings, tuning, content). Scenes never
//! build or present each other: they return a `SceneTransition` and the
//! manager swaps in a freshly constructed scene.

use glam::Vec2;
use rand::{RngCore, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::assets::{AssetError, Assets};
use crate::audio::SoundPlayer;
use crate::persistence::KeyValueStore;
use crate::settings::Settings;
use crate::sim::GamePhase;
use crate::tuning::Tuning;

mod action;
mod game;
mod node;
mod start;

pub use action::{Action, RunningAction};
pub use game::GameScene;
pub use node::{Button, ButtonState, Label, Node};
pub use start::StartScene;

/// Scene identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SceneId {
    Start,
    Game,
}

/// What a scene asks the manager to do after a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SceneTransition {
    #[default]
    None,
    /// Discard this scene and present a new one
    To(SceneId),
}

/// Borrowed services handed to scene callbacks
pub struct SceneContext<'a> {
    pub store: &'a mut dyn KeyValueStore,
    pub audio: &'a mut dyn SoundPlayer,
    pub settings: &'a Settings,
    pub tuning: &'a Tuning,
    pub assets: &'a Assets,
}

/// Scene behaviour driven by the manager
pub trait Scene {
    fn id(&self) -> SceneId;

    /// Called once per fixed tick
    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> SceneTransition;

    /// Called for each press, in scene coordinates
    fn press(&mut self, ctx: &mut SceneContext<'_>, point: Vec2) -> SceneTransition;

    /// Everything a renderer needs for this frame
    fn snapshot(&self) -> SceneSnapshot;

    fn as_game(&self) -> Option<&GameScene> {
        None
    }
}

/// Sprite category, for picking artwork
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SpriteKind {
    Ground,
    Cloud,
    Pipe,
    Hero,
}

/// One drawable rectangle
#[derive(Debug, Clone, Serialize)]
pub struct SpriteView {
    pub kind: SpriteKind,
    /// Centre (scene space, node offset applied)
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    /// Animation frame
    pub frame: u8,
}

/// Render-ready view of a scene
#[derive(Debug, Clone, Serialize)]
pub struct SceneSnapshot {
    pub scene: SceneId,
    pub phase: GamePhase,
    pub sprites: Vec<SpriteView>,
    pub labels: Vec<Label>,
    pub buttons: Vec<Button>,
}

/// Shared services owned by the manager
pub struct Services {
    pub store: Box<dyn KeyValueStore>,
    pub audio: Box<dyn SoundPlayer>,
    pub settings: Settings,
    pub tuning: Tuning,
    pub assets: Assets,
    /// Hands out one seed per game run
    seeds: Pcg32,
}

impl Services {
    /// Bundle services; settings are read from the store
    pub fn new(
        store: Box<dyn KeyValueStore>,
        audio: Box<dyn SoundPlayer>,
        tuning: Tuning,
        assets: Assets,
        seed: u64,
    ) -> Self {
        let settings = Settings::load(&*store);
        Self {
            store,
            audio,
            settings,
            tuning,
            assets,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn context(&mut self) -> SceneContext<'_> {
        SceneContext {
            store: &mut *self.store,
            audio: &mut *self.audio,
            settings: &self.settings,
            tuning: &self.tuning,
            assets: &self.assets,
        }
    }

    fn next_seed(&mut self) -> u64 {
        self.seeds.next_u64()
    }
}

/// Owns the active scene and swaps it on request
pub struct SceneManager {
    active: Box<dyn Scene>,
    services: Services,
}

impl SceneManager {
    /// Start on the menu scene
    pub fn new(mut services: Services) -> Result<Self, AssetError> {
        let active = build_scene(SceneId::Start, &mut services)?;
        log::info!("Presenting {:?}", SceneId::Start);
        Ok(Self { active, services })
    }

    /// Replace the active scene with a fresh instance of `id`.
    ///
    /// On error the current scene stays active.
    pub fn transition_to(&mut self, id: SceneId) -> Result<(), AssetError> {
        let next = build_scene(id, &mut self.services)?;
        log::info!("Scene {:?} -> {:?}", self.active.id(), id);
        self.active = next;
        Ok(())
    }

    /// One fixed tick of the active scene
    pub fn tick(&mut self, dt: f32) -> Result<(), AssetError> {
        let transition = self.active.update(&mut self.services.context(), dt);
        self.apply(transition)
    }

    /// Deliver a press to the active scene
    pub fn press(&mut self, point: Vec2) -> Result<(), AssetError> {
        let transition = self.active.press(&mut self.services.context(), point);
        self.apply(transition)
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        self.active.snapshot()
    }

    pub fn active_id(&self) -> SceneId {
        self.active.id()
    }

    /// The running game, if the game scene is active
    pub fn game(&self) -> Option<&GameScene> {
        self.active.as_game()
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    fn apply(&mut self, transition: SceneTransition) -> Result<(), AssetError> {
        match transition {
            SceneTransition::None => Ok(()),
            SceneTransition::To(id) => self.transition_to(id),
        }
    }
}

fn build_scene(id: SceneId, services: &mut Services) -> Result<Box<dyn Scene>, AssetError> {
    let scene: Box<dyn Scene> = match id {
        SceneId::Start => Box::new(StartScene::new(&services.assets)?),
        SceneId::Game => {
            let seed = services.next_seed();
            Box::new(GameScene::new(&services.assets, &services.tuning, seed)?)
        }
    };
    Ok(scene)
}
