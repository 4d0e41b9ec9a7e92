//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (obstacles by spawn order, contacts by body)
//! - No rendering, audio or storage dependencies

pub mod body;
pub mod collision;
pub mod scroll;
pub mod spawner;
pub mod state;
pub mod tick;

pub use body::Body;
pub use collision::{
    BodyRef, BodyTag, Contact, ContactOutcome, ContactTracker, PipeSide, route_contact,
};
pub use scroll::{ScrollLayer, Tile};
pub use spawner::{Obstacle, ObstacleSpawner, ObstacleTemplate};
pub use state::{Difficulty, FlapAnimation, GameEvent, GamePhase, GameState, Hero, HeroPose};
pub use tick::{TickInput, flap, handle_contact, tick};
