//! Game scene: the run itself plus its presentation
//!
//! The simulation decides what happens; this scene turns the resulting
//! events into sounds, labels, the impact shake and the high-score write.

use glam::Vec2;

use super::action::Action;
use super::node::{Button, ButtonState, Label, Node};
use super::{
    Scene, SceneContext, SceneId, SceneSnapshot, SceneTransition, SpriteKind, SpriteView,
};
use crate::assets::{AssetError, Assets};
use crate::audio::SoundEffect;
use crate::highscores::HighScore;
use crate::sim::{self, GameEvent, GameState, TickInput};
use crate::tuning::Tuning;

/// Top-level node names; the shake runs on all of them
const NODE_NAMES: [&str; 7] = [
    "scrollLayer",
    "parallaxScrollLayer",
    "obstacleLayer",
    "hero",
    "scoreLabel",
    "highScoreLabel",
    "restartButton",
];

pub struct GameScene {
    state: GameState,
    /// Presses waiting for the next tick
    input: TickInput,
    nodes: Vec<Node>,
    shake: Action,
    score_label: Label,
    high_score_label: Label,
    restart_button: Button,
}

impl GameScene {
    /// Build a run. Fails if any authored content is missing.
    pub fn new(assets: &Assets, tuning: &Tuning, seed: u64) -> Result<Self, AssetError> {
        let state = GameState::new(
            seed,
            tuning.clone(),
            assets.layer("scrollLayer")?,
            assets.layer("parallaxScrollLayer")?,
            assets.obstacle_template("Obstacle")?,
        );

        let score_anchor = assets.label_anchor("scoreLabel")?;
        let high_score_anchor = assets.label_anchor("highScoreLabel")?;
        let mut high_score_label = Label::new("highScoreLabel", high_score_anchor, "");
        high_score_label.hidden = true;

        log::info!("New run with seed {}", seed);
        Ok(Self {
            state,
            input: TickInput::default(),
            nodes: NODE_NAMES.into_iter().map(Node::new).collect(),
            shake: assets.action("Shake")?,
            score_label: Label::new("scoreLabel", score_anchor, "0"),
            high_score_label,
            restart_button: Button::new(
                "restartButton",
                assets.button_frame("restartButton")?,
                ButtonState::Hidden,
            ),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn score_label(&self) -> &Label {
        &self.score_label
    }

    pub fn high_score_label(&self) -> &Label {
        &self.high_score_label
    }

    pub fn restart_button(&self) -> &Button {
        &self.restart_button
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    fn node_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.nodes.iter_mut().find(|n| n.name == name)
    }

    fn node_offset(&self, name: &str) -> Vec2 {
        self.node(name).map(|n| n.offset).unwrap_or(Vec2::ZERO)
    }

    fn dispatch_events(&mut self, ctx: &mut SceneContext<'_>) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::Flapped => ctx.audio.play(SoundEffect::Flap),
                GameEvent::Scored { score } => {
                    self.score_label.text = score.to_string();
                    ctx.audio.play(SoundEffect::Goal);
                }
                GameEvent::GameOver { score } => self.on_game_over(ctx, score),
                GameEvent::DifficultyChanged { from, to } => {
                    log::info!("Difficulty {:?} -> {:?}", from, to);
                }
                GameEvent::Spawned { .. } | GameEvent::Retired { .. } => {}
            }
        }
    }

    fn on_game_over(&mut self, ctx: &mut SceneContext<'_>, score: u32) {
        if let Some(hero) = self.node_mut("hero") {
            hero.remove_all_actions();
        }
        if ctx.settings.effective_screen_shake() {
            for node in &mut self.nodes {
                node.run(self.shake.clone());
            }
        }

        let high_score = match HighScore::record(ctx.store, score) {
            Ok(outcome) => outcome.high_score,
            Err(e) => {
                log::error!("Failed to save high score {}: {}", score, e);
                HighScore::load(ctx.store).max(score)
            }
        };

        self.high_score_label.text = HighScore::label(high_score);
        self.high_score_label.hidden = false;
        self.restart_button.state = ButtonState::Active;
    }
}

impl Scene for GameScene {
    fn id(&self) -> SceneId {
        SceneId::Game
    }

    fn update(&mut self, ctx: &mut SceneContext<'_>, dt: f32) -> SceneTransition {
        // Node actions keep running after game over
        for node in &mut self.nodes {
            node.advance(dt);
        }

        let input = std::mem::take(&mut self.input);
        sim::tick(&mut self.state, &input, dt);
        self.dispatch_events(ctx);
        SceneTransition::None
    }

    fn press(&mut self, _ctx: &mut SceneContext<'_>, point: Vec2) -> SceneTransition {
        if self.restart_button.hit(point) {
            return SceneTransition::To(SceneId::Game);
        }
        // Applied at the start of the next tick; ignored there unless Active
        if self.state.is_active() {
            self.input.flap = true;
        }
        SceneTransition::None
    }

    fn snapshot(&self) -> SceneSnapshot {
        let state = &self.state;
        let mut sprites = Vec::new();

        let clouds = self.node_offset("parallaxScrollLayer");
        sprites.extend(state.clouds.tiles.iter().map(|t| SpriteView {
            kind: SpriteKind::Cloud,
            pos: t.pos + clouds,
            size: t.size,
            rotation: 0.0,
            frame: 0,
        }));

        let obstacles = self.node_offset("obstacleLayer");
        for o in &state.spawner.obstacles {
            for pipe in [o.top_pipe(), o.bottom_pipe()] {
                sprites.push(SpriteView {
                    kind: SpriteKind::Pipe,
                    pos: pipe.center + obstacles,
                    size: pipe.size,
                    rotation: 0.0,
                    frame: 0,
                });
            }
        }

        let ground = self.node_offset("scrollLayer");
        sprites.extend(state.ground.tiles.iter().map(|t| SpriteView {
            kind: SpriteKind::Ground,
            pos: t.pos + ground,
            size: t.size,
            rotation: 0.0,
            frame: 0,
        }));

        let hero = &state.hero;
        sprites.push(SpriteView {
            kind: SpriteKind::Hero,
            pos: hero.body.pos + self.node_offset("hero"),
            size: hero.body.size,
            rotation: hero.body.rotation,
            frame: hero.animation.map(|a| a.frame).unwrap_or(0),
        });

        SceneSnapshot {
            scene: SceneId::Game,
            phase: state.phase,
            sprites,
            labels: vec![
                self.score_label.displaced(self.node_offset("scoreLabel")),
                self.high_score_label.displaced(self.node_offset("highScoreLabel")),
            ],
            buttons: vec![
                self.restart_button
                    .displaced(self.node_offset("restartButton")),
            ],
        }
    }

    fn as_game(&self) -> Option<&GameScene> {
        Some(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HIGHSCORE_KEY, SIM_DT};
    use crate::persistence::KeyValueStore;
    use crate::scene::testing::Harness;
    use crate::sim::{BodyRef, Contact, GamePhase, HeroPose, PipeSide};

    fn scene(h: &Harness) -> GameScene {
        GameScene::new(&h.assets, &h.tuning, 77).unwrap()
    }

    fn goal() -> Contact {
        Contact {
            a: BodyRef::Hero,
            b: BodyRef::Goal { obstacle: 1 },
        }
    }

    fn pipe() -> Contact {
        Contact {
            a: BodyRef::Pipe {
                obstacle: 1,
                side: PipeSide::Bottom,
            },
            b: BodyRef::Hero,
        }
    }

    /// Feed a contact the way the tick would, then let the scene react
    fn contact(scene: &mut GameScene, h: &mut Harness, c: Contact) {
        sim::handle_contact(&mut scene.state, c);
        scene.dispatch_events(&mut h.ctx());
    }

    #[test]
    fn test_initial_presentation() {
        let h = Harness::new();
        let scene = scene(&h);
        assert_eq!(scene.state().phase, GamePhase::Active);
        assert_eq!(scene.score_label().text, "0");
        assert!(scene.high_score_label().hidden);
        assert_eq!(scene.restart_button().state, ButtonState::Hidden);
    }

    #[test]
    fn test_press_flaps_and_plays_sound() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        let t = scene.press(&mut h.ctx(), Vec2::new(100.0, 400.0));
        assert_eq!(t, SceneTransition::None);
        // Nothing happens until the next tick
        assert!(h.audio.played.is_empty());

        scene.update(&mut h.ctx(), SIM_DT);
        // 500 from the impulse, capped to 400 in the same tick
        assert_eq!(scene.state().hero.body.vel.y, 400.0);
        assert_eq!(h.audio.played, vec![SoundEffect::Flap]);

        // One press, one flap
        scene.update(&mut h.ctx(), SIM_DT);
        assert_eq!(h.audio.played.len(), 1);
    }

    #[test]
    fn test_goal_updates_label_and_sound() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, goal());
        contact(&mut scene, &mut h, goal());
        assert_eq!(scene.score_label().text, "2");
        assert_eq!(h.audio.played, vec![SoundEffect::Goal, SoundEffect::Goal]);
        assert_eq!(scene.restart_button().state, ButtonState::Hidden);
    }

    #[test]
    fn test_game_over_presentation() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        for _ in 0..3 {
            contact(&mut scene, &mut h, goal());
        }
        contact(&mut scene, &mut h, pipe());

        assert_eq!(scene.state().phase, GamePhase::GameOver);
        assert_eq!(scene.state().hero.pose, HeroPose::Impact);
        assert_eq!(h.store.get_int(HIGHSCORE_KEY), 3);
        assert_eq!(h.store.flushes(), 1);
        assert_eq!(scene.high_score_label().text, "High Score: 3");
        assert!(!scene.high_score_label().hidden);
        assert_eq!(scene.restart_button().state, ButtonState::Active);
        assert!(scene.nodes.iter().all(|n| n.has_actions()));
    }

    #[test]
    fn test_lower_score_keeps_stored_record() {
        let mut h = Harness::new();
        h.store.set_int(HIGHSCORE_KEY, 20);
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, goal());
        contact(&mut scene, &mut h, pipe());

        assert_eq!(h.store.get_int(HIGHSCORE_KEY), 20);
        assert_eq!(h.store.flushes(), 0);
        assert_eq!(scene.high_score_label().text, "High Score: 20");
    }

    #[test]
    fn test_flush_failure_still_reports_new_best() {
        let mut h = Harness::new();
        h.store.set_fail_flush(true);
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, goal());
        contact(&mut scene, &mut h, pipe());

        assert_eq!(scene.high_score_label().text, "High Score: 1");
        assert_eq!(scene.restart_button().state, ButtonState::Active);
    }

    #[test]
    fn test_reduced_motion_skips_shake() {
        let mut h = Harness::new();
        h.settings.reduced_motion = true;
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, pipe());
        assert!(scene.nodes.iter().all(|n| !n.has_actions()));
    }

    #[test]
    fn test_shake_settles_after_game_over() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, pipe());

        scene.update(&mut h.ctx(), SIM_DT);
        assert_ne!(scene.node("scrollLayer").unwrap().offset, Vec2::ZERO);

        for _ in 0..60 {
            scene.update(&mut h.ctx(), SIM_DT);
        }
        for node in &scene.nodes {
            assert!(!node.has_actions());
            assert!(node.offset.length() < 1e-3, "{} at {:?}", node.name, node.offset);
        }
    }

    #[test]
    fn test_presses_after_game_over() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, pipe());
        h.audio.played.clear();

        // Away from the button: ignored
        let away = Vec2::new(10.0, 500.0);
        assert_eq!(scene.press(&mut h.ctx(), away), SceneTransition::None);
        let vel = scene.state().hero.body.vel.y;
        scene.update(&mut h.ctx(), SIM_DT);
        assert!(h.audio.played.is_empty());
        assert!(scene.state().hero.body.vel.y < vel);

        let restart = scene.restart_button().frame.center;
        let t = scene.press(&mut h.ctx(), restart);
        assert_eq!(t, SceneTransition::To(SceneId::Game));
    }

    #[test]
    fn test_shake_moves_labels_and_button_in_snapshot() {
        let mut h = Harness::new();
        let mut scene = scene(&h);
        contact(&mut scene, &mut h, pipe());
        scene.update(&mut h.ctx(), SIM_DT);

        let snap = scene.snapshot();
        let score_offset = scene.node("scoreLabel").unwrap().offset;
        assert_ne!(score_offset, Vec2::ZERO);
        assert_eq!(snap.labels[0].pos, scene.score_label().pos + score_offset);

        let button_offset = scene.node("restartButton").unwrap().offset;
        assert_ne!(button_offset, Vec2::ZERO);
        let drawn = snap.buttons[0].frame.center;
        assert_eq!(drawn, scene.restart_button().frame.center + button_offset);

        let json = serde_json::to_string(&snap.labels[0]).unwrap();
        assert!(json.contains("\"pos\""));
    }

    #[test]
    fn test_snapshot_contents() {
        let h = Harness::new();
        let mut scene = scene(&h);
        scene.state.spawner.spawn(Vec2::new(300.0, 300.0));
        let snap = scene.snapshot();

        let count = |kind| snap.sprites.iter().filter(|s| s.kind == kind).count();
        assert_eq!(count(SpriteKind::Cloud), 2);
        assert_eq!(count(SpriteKind::Pipe), 2);
        assert_eq!(count(SpriteKind::Ground), 2);
        assert_eq!(count(SpriteKind::Hero), 1);
        assert_eq!(snap.labels.len(), 2);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(json.contains("\"restartButton\""));
    }
}
