//! Fixed timestep simulation tick
//!
//! Order within a tick:
//! 1. Flap input (Active only)
//! 2. Body integration (every phase; a dead hero keeps falling)
//! 3. Velocity cap, scrolling, obstacles, contacts (Active only)

use glam::Vec2;

use super::collision::{Contact, ContactOutcome, overlapping_bodies};
use super::state::{Difficulty, GameEvent, GamePhase, GameState, HeroPose};

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Press/tap since the last tick
    pub flap: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.flap {
        flap(state);
    }

    state.time_ticks += 1;

    let gravity = Vec2::new(0.0, state.tuning.gravity);
    state.hero.body.integrate(gravity, dt);
    if let Some(animation) = state.hero.animation.as_mut() {
        animation.advance(dt);
    }

    if state.phase != GamePhase::Active {
        return;
    }

    cap_velocity(state);
    scroll_world(state, dt);
    update_obstacles(state, dt);
    resolve_contacts(state);
}

/// Zero the hero's velocity and kick it upward. Ignored unless Active.
pub fn flap(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Active {
        return false;
    }
    let body = &mut state.hero.body;
    body.vel = Vec2::ZERO;
    body.apply_impulse(Vec2::new(0.0, state.tuning.flap_impulse));
    state.events.push(GameEvent::Flapped);
    true
}

/// Clamp upward speed; falling is unbounded
fn cap_velocity(state: &mut GameState) {
    let cap = state.tuning.max_rise_velocity;
    let vel = &mut state.hero.body.vel;
    if vel.y > cap {
        vel.y = cap;
    }
}

fn scroll_world(state: &mut GameState, dt: f32) {
    let width = state.tuning.scene_width;
    state.ground.advance(state.tuning.scroll_speed, dt, width);
    state.clouds.advance(state.tuning.parallax_speed(), dt, width);
}

fn update_obstacles(state: &mut GameState, dt: f32) {
    state.spawner.scroll(state.tuning.scroll_speed * dt);

    let retired = state.spawner.retire(state.tuning.retire_x);
    if retired > 0 {
        state.events.push(GameEvent::Retired { count: retired });
    }

    let tier = *state.tuning.tier(state.difficulty);
    let spawn_x = state.tuning.spawn_x;
    if let Some(id) = state.spawner.advance(dt, &tier, spawn_x, &mut state.rng) {
        let gap_y = state.spawner.get(id).map_or(0.0, |o| o.pos.y);
        log::debug!(
            "Spawned obstacle {} at gap y {:.1} ({:?})",
            id,
            gap_y,
            state.difficulty
        );
        state.events.push(GameEvent::Spawned { id, gap_y });
    }
}

fn resolve_contacts(state: &mut GameState) {
    if !state.hero.body.collides {
        state.contacts.clear();
        return;
    }

    let hero = state.hero.body.bounds();
    let overlaps = overlapping_bodies(&hero, &state.ground, &state.spawner.obstacles);
    for contact in state.contacts.update(overlaps) {
        handle_contact(state, contact);
    }
}

/// Apply a begin-contact to the run. No-op unless Active.
pub fn handle_contact(state: &mut GameState, contact: Contact) {
    if state.phase != GamePhase::Active {
        return;
    }

    match contact.outcome() {
        ContactOutcome::Score => {
            state.score += 1;
            state.events.push(GameEvent::Scored { score: state.score });

            let tier = Difficulty::for_score(state.score, &state.tuning);
            let next = tier.max(state.difficulty);
            if next != state.difficulty {
                log::debug!(
                    "Difficulty {:?} -> {:?} at score {}",
                    state.difficulty,
                    next,
                    state.score
                );
                state.events.push(GameEvent::DifficultyChanged {
                    from: state.difficulty,
                    to: next,
                });
                state.difficulty = next;
            }
        }
        ContactOutcome::Fatal => {
            log::debug!(
                "Fatal contact {} / {}",
                contact.a.tag().name(),
                contact.b.tag().name()
            );
            game_over(state);
        }
    }
}

fn game_over(state: &mut GameState) {
    state.phase = GamePhase::GameOver;

    let hero = &mut state.hero;
    hero.body.allows_rotation = false;
    hero.body.angular_velocity = 0.0;
    hero.animation = None;
    hero.pose = HeroPose::Impact;
    hero.body.rotation = -std::f32::consts::FRAC_PI_2;
    hero.body.collides = false;
    state.contacts.clear();

    log::info!("Game over at score {}", state.score);
    state.events.push(GameEvent::GameOver { score: state.score });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Assets;
    use crate::consts::SIM_DT;
    use crate::sim::collision::{BodyRef, PipeSide};
    use crate::sim::state::Difficulty;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    fn new_state(seed: u64) -> GameState {
        let assets = Assets::builtin();
        GameState::new(
            seed,
            Tuning::default(),
            assets.layer("scrollLayer").unwrap(),
            assets.layer("parallaxScrollLayer").unwrap(),
            assets.obstacle_template("Obstacle").unwrap(),
        )
    }

    fn goal(id: u32) -> Contact {
        Contact {
            a: BodyRef::Hero,
            b: BodyRef::Goal { obstacle: id },
        }
    }

    fn pipe(id: u32) -> Contact {
        Contact {
            a: BodyRef::Hero,
            b: BodyRef::Pipe {
                obstacle: id,
                side: PipeSide::Top,
            },
        }
    }

    #[test]
    fn test_velocity_capped_after_one_tick() {
        let mut state = new_state(1);
        state.hero.body.vel.y = 500.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.hero.body.vel.y, 400.0);
    }

    #[test]
    fn test_no_lower_velocity_bound() {
        let mut state = new_state(1);
        state.hero.body.pos.y = 5000.0;
        state.hero.body.vel.y = -3000.0;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert!(state.hero.body.vel.y < -3000.0);
    }

    #[test]
    fn test_flap_zeroes_then_kicks() {
        let mut state = new_state(1);
        state.hero.body.vel = Vec2::new(12.0, -800.0);
        assert!(flap(&mut state));
        assert_eq!(state.hero.body.vel, Vec2::new(0.0, 500.0));
        assert_eq!(state.drain_events(), vec![GameEvent::Flapped]);
    }

    #[test]
    fn test_flap_ignored_after_game_over() {
        let mut state = new_state(1);
        handle_contact(&mut state, pipe(1));
        state.hero.body.vel.y = -100.0;
        assert!(!flap(&mut state));
        assert_eq!(state.hero.body.vel.y, -100.0);
    }

    #[test]
    fn test_goal_contact_scores_without_state_change() {
        let mut state = new_state(1);
        handle_contact(&mut state, goal(1));
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.drain_events(), vec![GameEvent::Scored { score: 1 }]);
    }

    #[test]
    fn test_fatal_contact_side_effects() {
        let mut state = new_state(1);
        state.hero.body.angular_velocity = 3.0;
        handle_contact(&mut state, pipe(4));

        assert_eq!(state.phase, GamePhase::GameOver);
        let hero = &state.hero;
        assert!(!hero.body.allows_rotation);
        assert_eq!(hero.body.angular_velocity, 0.0);
        assert!(hero.animation.is_none());
        assert_eq!(hero.pose, HeroPose::Impact);
        assert!(!hero.body.collides);
        assert!((hero.body.rotation + std::f32::consts::FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_game_over_happens_once() {
        let mut state = new_state(1);
        handle_contact(&mut state, pipe(1));
        handle_contact(&mut state, pipe(2));
        handle_contact(&mut state, goal(3));

        let events = state.drain_events();
        let game_overs = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameOver { .. }))
            .count();
        assert_eq!(game_overs, 1);
        // Goal after death does not score
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_scoring_scenario_reaches_medium_then_hard() {
        let mut state = new_state(1);
        assert_eq!(state.difficulty, Difficulty::Easy);

        for i in 0..6 {
            handle_contact(&mut state, goal(i));
        }
        assert_eq!(state.score, 6);
        assert_eq!(state.difficulty, Difficulty::Medium);

        for i in 6..46 {
            handle_contact(&mut state, goal(i));
        }
        assert_eq!(state.score, 46);
        assert_eq!(state.difficulty, Difficulty::Hard);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_updates_frozen_after_game_over() {
        let mut state = new_state(1);
        handle_contact(&mut state, pipe(1));
        let ground_x = state.ground.tiles[0].pos.x;
        let timer = state.spawner.timer;

        for _ in 0..600 {
            tick(&mut state, &TickInput { flap: true }, SIM_DT);
        }
        assert_eq!(state.ground.tiles[0].pos.x, ground_x);
        assert_eq!(state.spawner.timer, timer);
        assert!(state.spawner.obstacles.is_empty());
        // Physics still runs: the hero keeps falling
        assert!(state.hero.body.vel.y < 0.0);
    }

    #[test]
    fn test_falling_hero_hits_ground() {
        let mut state = new_state(7);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(state.score, 0);
    }

    #[test]
    fn test_passing_through_goal_scores() {
        let mut state = new_state(3);
        let hero_pos = state.hero.body.pos;
        state.spawner.spawn(hero_pos);

        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
        assert_eq!(state.phase, GamePhase::Active);

        // Still inside the goal next tick: no second point
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_first_spawn_after_easy_interval() {
        let mut state = new_state(11);
        // Keep the hero airborne and out of the way
        state.hero.body.collides = false;

        let mut spawned_at = None;
        for t in 1..=200u32 {
            state.hero.body.pos.y = 320.0;
            state.hero.body.vel.y = 0.0;
            tick(&mut state, &TickInput::default(), SIM_DT);
            let events = state.drain_events();
            if events.iter().any(|e| matches!(e, GameEvent::Spawned { .. })) {
                spawned_at = Some(t);
                break;
            }
        }
        let t = spawned_at.expect("no obstacle spawned");
        // 2 s at 60 Hz, allowing for float accumulation
        assert!((119..=121).contains(&t), "spawned at tick {}", t);
        assert_eq!(state.spawner.timer, 0.0);
        let o = &state.spawner.obstacles[0];
        assert!(o.pos.y >= 290.0 && o.pos.y <= 330.0);
    }

    #[test]
    fn test_layers_scroll_at_their_speeds() {
        let mut state = new_state(3);
        let ground_x = state.ground.tiles[0].pos.x;
        let cloud_x = state.clouds.tiles[0].pos.x;

        tick(&mut state, &TickInput::default(), SIM_DT);

        let ground_moved = ground_x - state.ground.tiles[0].pos.x;
        let cloud_moved = cloud_x - state.clouds.tiles[0].pos.x;
        assert!((ground_moved - 160.0 * SIM_DT).abs() < 1e-3, "ground {}", ground_moved);
        assert!((cloud_moved - 40.0 * SIM_DT).abs() < 1e-3, "clouds {}", cloud_moved);
    }

    #[test]
    fn test_tick_retires_obstacle_past_left_edge() {
        let mut state = new_state(3);
        let id = state.spawner.spawn(Vec2::new(2.0, 300.0));

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.spawner.get(id).is_none());
        assert!(state.spawner.obstacles.is_empty());
        assert_eq!(state.spawner.pooled(), 1);
        assert!(state.events.contains(&GameEvent::Retired { count: 1 }));
    }

    #[test]
    fn test_determinism() {
        let mut a = new_state(99999);
        let mut b = new_state(99999);
        for s in [&mut a, &mut b] {
            s.hero.body.collides = false;
        }
        for i in 0..600 {
            let input = TickInput { flap: i % 20 == 0 };
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }
        assert_eq!(a.spawner.obstacles.len(), b.spawner.obstacles.len());
        for (x, y) in a.spawner.obstacles.iter().zip(&b.spawner.obstacles) {
            assert_eq!(x.pos, y.pos);
        }
        assert_eq!(a.hero.body.pos, b.hero.body.pos);
    }

    proptest! {
        #[test]
        fn prop_contact_routing(goal_contacts in proptest::collection::vec(any::<bool>(), 1..60)) {
            let mut state = new_state(5);
            let mut expected_score = 0;
            let mut dead = false;
            for (i, is_goal) in goal_contacts.iter().enumerate() {
                let before = state.phase;
                if *is_goal {
                    handle_contact(&mut state, goal(i as u32));
                    if !dead {
                        expected_score += 1;
                        prop_assert_eq!(state.phase, before);
                    }
                } else {
                    handle_contact(&mut state, pipe(i as u32));
                    dead = true;
                    prop_assert_eq!(state.phase, GamePhase::GameOver);
                }
                prop_assert_eq!(state.score, expected_score);
            }
            let game_overs = state
                .drain_events()
                .iter()
                .filter(|e| matches!(e, GameEvent::GameOver { .. }))
                .count();
            prop_assert_eq!(game_overs, usize::from(dead));
        }
    }
}
