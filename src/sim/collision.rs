//! Contact detection and routing
//!
//! The hero is the only dynamic body, so detection is hero-vs-everything with
//! axis-aligned boxes. A `ContactTracker` remembers which pairs are already
//! touching so each overlap reports a single begin-contact.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::scroll::ScrollLayer;
use super::spawner::Obstacle;
use crate::Rect;

/// Name tag carried by a body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyTag {
    Hero,
    Ground,
    Obstacle,
    /// Scoring region between two pipes
    Goal,
}

impl BodyTag {
    pub fn name(&self) -> &'static str {
        match self {
            BodyTag::Hero => "hero",
            BodyTag::Ground => "ground",
            BodyTag::Obstacle => "obstacle",
            BodyTag::Goal => "goal",
        }
    }
}

/// Which pipe of an obstacle pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PipeSide {
    Top,
    Bottom,
}

/// Handle to a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BodyRef {
    Hero,
    /// Solid tile of the ground layer, by index
    Ground(u32),
    Pipe { obstacle: u32, side: PipeSide },
    Goal { obstacle: u32 },
}

impl BodyRef {
    pub fn tag(&self) -> BodyTag {
        match self {
            BodyRef::Hero => BodyTag::Hero,
            BodyRef::Ground(_) => BodyTag::Ground,
            BodyRef::Pipe { .. } => BodyTag::Obstacle,
            BodyRef::Goal { .. } => BodyTag::Goal,
        }
    }
}

/// A begin-contact between two bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub a: BodyRef,
    pub b: BodyRef,
}

/// What a contact means for the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactOutcome {
    /// Passed through a goal region
    Score,
    /// Touched anything else
    Fatal,
}

/// Route a contact by the tags of its two participants
pub fn route_contact(a: BodyTag, b: BodyTag) -> ContactOutcome {
    if a == BodyTag::Goal || b == BodyTag::Goal {
        ContactOutcome::Score
    } else {
        ContactOutcome::Fatal
    }
}

impl Contact {
    pub fn outcome(&self) -> ContactOutcome {
        route_contact(self.a.tag(), self.b.tag())
    }
}

/// Every body the hero currently overlaps, in stable order
pub fn overlapping_bodies(
    hero: &Rect,
    ground: &ScrollLayer,
    obstacles: &[Obstacle],
) -> BTreeSet<BodyRef> {
    let mut hits = BTreeSet::new();

    for (index, tile) in ground.solid_bounds() {
        if hero.overlaps(&tile) {
            hits.insert(BodyRef::Ground(index));
        }
    }

    for obstacle in obstacles {
        if hero.overlaps(&obstacle.goal()) {
            hits.insert(BodyRef::Goal {
                obstacle: obstacle.id,
            });
        }
        if hero.overlaps(&obstacle.top_pipe()) {
            hits.insert(BodyRef::Pipe {
                obstacle: obstacle.id,
                side: PipeSide::Top,
            });
        }
        if hero.overlaps(&obstacle.bottom_pipe()) {
            hits.insert(BodyRef::Pipe {
                obstacle: obstacle.id,
                side: PipeSide::Bottom,
            });
        }
    }

    hits
}

/// Turns per-tick overlap sets into begin-contact events
#[derive(Debug, Clone, Default)]
pub struct ContactTracker {
    touching: BTreeSet<BodyRef>,
}

impl ContactTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's overlaps; returns contacts that began this tick
    pub fn update(&mut self, overlaps: BTreeSet<BodyRef>) -> Vec<Contact> {
        let began = overlaps
            .difference(&self.touching)
            .map(|&other| Contact {
                a: BodyRef::Hero,
                b: other,
            })
            .collect();
        self.touching = overlaps;
        began
    }

    /// Forget all touching pairs (hero left the world)
    pub fn clear(&mut self) {
        self.touching.clear();
    }

    pub fn is_touching(&self, body: &BodyRef) -> bool {
        self.touching.contains(body)
    }
}
