//! Browser binding
//!
//! The page owns the canvas and the requestAnimationFrame loop. It calls
//! `frame(dt)` once per animation frame, forwards taps through
//! `press(x, y)` in scene coordinates (origin bottom-left), and draws the JSON
//! from `snapshot_json()`.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use super::GameLoop;
use crate::assets::Assets;
use crate::audio::AudioManager;
use crate::persistence::{KeyValueStore, LocalStorageStore, MemoryStore};
use crate::scene::{SceneManager, Services};
use crate::settings::Settings;
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Already initialised by an earlier module instance
        return;
    }
    log::info!("Hoppy Bunny (web) starting...");
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// One game instance for the page
#[wasm_bindgen]
pub struct WebGame {
    game: GameLoop,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64) -> Result<WebGame, JsValue> {
        let store: Box<dyn KeyValueStore> = match LocalStorageStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("LocalStorage unavailable ({}), scores will not persist", e);
                Box::new(MemoryStore::new())
            }
        };
        let audio = AudioManager::with_settings(&Settings::load(&*store));

        let services = Services::new(
            store,
            Box::new(audio),
            Tuning::default(),
            Assets::builtin(),
            seed,
        );
        let manager = SceneManager::new(services).map_err(js_error)?;
        Ok(WebGame {
            game: GameLoop::new(manager),
        })
    }

    /// Advance by one animation frame (`dt` in seconds)
    pub fn frame(&mut self, dt: f32) -> Result<u32, JsValue> {
        self.game.frame(dt).map_err(js_error)
    }

    pub fn press(&mut self, x: f32, y: f32) -> Result<(), JsValue> {
        self.game.press(Vec2::new(x, y)).map_err(js_error)
    }

    /// Current scene as JSON for the page renderer
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.game.snapshot()).map_err(js_error)
    }
}
