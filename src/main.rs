//! Hoppy Bunny - native entry point
//!
//! There is no native window; this binary plays one run headlessly with a
//! simple autopilot, records the high score in the settings store and logs
//! the result. The browser build is driven through `platform::WebGame`.
//!
//! Environment:
//! - `HOPPY_DATA_DIR`: directory holding `settings.json`
//! - `HOPPY_SEED`: run seed (defaults to the clock)
//! - `HOPPY_TUNING`: path to a JSON tuning override
//! - `RUST_LOG`: log filter (env_logger)

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::path::{Path, PathBuf};
    use std::time::{SystemTime, UNIX_EPOCH};
    use std::{env, fs};

    use anyhow::{Context, Result, anyhow, bail};
    use glam::Vec2;
    use hoppy_bunny::assets::Assets;
    use hoppy_bunny::audio::AudioManager;
    use hoppy_bunny::consts::SIM_DT;
    use hoppy_bunny::persistence::JsonFileStore;
    use hoppy_bunny::platform::GameLoop;
    use hoppy_bunny::scene::Services;
    use hoppy_bunny::sim::{GamePhase, GameState};
    use hoppy_bunny::{HighScore, SceneId, SceneManager, Settings, Tuning};

    /// Give up on a run that is still going after this long (simulated)
    const MAX_RUN_SECONDS: f32 = 300.0;

    /// Somewhere off every button, for flaps
    const TAP_POINT: Vec2 = Vec2::new(40.0, 520.0);

    fn store_path() -> Result<PathBuf> {
        if let Ok(dir) = env::var("HOPPY_DATA_DIR") {
            return Ok(PathBuf::from(dir).join("settings.json"));
        }
        JsonFileStore::default_path()
            .ok_or_else(|| anyhow!("no platform config directory; set HOPPY_DATA_DIR"))
    }

    fn seed() -> Result<u64> {
        match env::var("HOPPY_SEED") {
            Ok(s) => s
                .trim()
                .parse()
                .with_context(|| format!("HOPPY_SEED '{}' is not a u64", s)),
            Err(_) => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .context("system clock before UNIX epoch")?;
                Ok(now.as_nanos() as u64)
            }
        }
    }

    fn tuning() -> Result<Tuning> {
        match env::var("HOPPY_TUNING") {
            Ok(path) => load_tuning(Path::new(&path)),
            Err(_) => Ok(Tuning::default()),
        }
    }

    fn load_tuning(path: &Path) -> Result<Tuning> {
        log::info!("Loading tuning from {}", path.display());
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed reading tuning file {}", path.display()))?;
        Tuning::from_json(&json)
            .with_context(|| format!("invalid tuning file {}", path.display()))
    }

    /// Flap when the hero sinks below the next gap while falling
    fn wants_flap(state: &GameState) -> bool {
        let hero = &state.hero.body;
        let target = state
            .spawner
            .obstacles
            .iter()
            .filter(|o| o.top_pipe().max().x >= hero.bounds().min().x)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|o| o.pos.y - 20.0)
            .unwrap_or(state.tuning.scene_height * 0.5);
        hero.pos.y < target && hero.vel.y <= 0.0
    }

    pub fn run() -> Result<()> {
        let path = store_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed creating data dir {}", dir.display()))?;
        }
        let store = JsonFileStore::open(&path)
            .with_context(|| format!("failed opening settings store {}", path.display()))?;
        log::info!("Using settings store {}", store.path().display());
        let best_before = HighScore::load(&store);
        let audio = AudioManager::with_settings(&Settings::load(&store));

        let seed = seed()?;
        let assets = Assets::builtin();
        let play = assets.button_frame("playButton")?.center;
        let services = Services::new(
            Box::new(store),
            Box::new(audio),
            tuning()?,
            assets,
            seed,
        );
        let mut game = GameLoop::new(SceneManager::new(services)?);

        game.press(play)
            .with_context(|| format!("failed starting run with seed {}", seed))?;
        if game.manager().active_id() != SceneId::Game {
            bail!("play button did not start a run");
        }

        let max_frames = (MAX_RUN_SECONDS / SIM_DT) as u32;
        for _ in 0..max_frames {
            let flap = match game.manager().game() {
                Some(scene) if scene.state().phase == GamePhase::GameOver => break,
                Some(scene) => wants_flap(scene.state()),
                None => break,
            };
            if flap {
                game.press(TAP_POINT)?;
            }
            game.frame(SIM_DT)
                .with_context(|| format!("run with seed {} failed", seed))?;
        }

        let Some(scene) = game.manager().game() else {
            bail!("game scene went away during run with seed {}", seed);
        };
        let state = scene.state();
        let best = HighScore::load(&*game.manager().services().store);
        log::info!(
            "Run seed {} ended {:?} after {:.1}s: score {} ({:?}), best {} (was {})",
            seed,
            state.phase,
            state.time_ticks as f32 * SIM_DT,
            state.score,
            state.difficulty,
            best,
            best_before
        );
        println!("score {} / {}", state.score, HighScore::label(best));
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn scratch_file(name: &str, contents: &str) -> PathBuf {
            let dir = env::temp_dir().join(format!("hoppy_main_test_{}", std::process::id()));
            fs::create_dir_all(&dir).unwrap();
            let path = dir.join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        #[test]
        fn test_missing_tuning_file_is_named() {
            let path = env::temp_dir().join("hoppy_no_such_tuning.json");
            let err = load_tuning(&path).unwrap_err();
            let message = format!("{:#}", err);
            assert!(message.contains("hoppy_no_such_tuning.json"), "{}", message);
        }

        #[test]
        fn test_invalid_tuning_file_is_named() {
            let path = scratch_file("broken_tuning.json", "{ not json");
            let message = format!("{:#}", load_tuning(&path).unwrap_err());
            assert!(message.contains("invalid tuning file"), "{}", message);
            assert!(message.contains("broken_tuning.json"), "{}", message);
        }

        #[test]
        fn test_tuning_file_overrides_defaults() {
            let path = scratch_file("fast_tuning.json", r#"{ "scroll_speed": 200.0 }"#);
            let tuning = load_tuning(&path).unwrap();
            assert_eq!(tuning.scroll_speed, 200.0);
            assert_eq!(tuning.flap_impulse, Tuning::default().flap_impulse);
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Hoppy Bunny (headless) starting...");
    if let Err(e) = headless::run() {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::WebGame, this is just to satisfy the compiler
}
