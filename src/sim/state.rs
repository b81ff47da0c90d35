//! Run state and the live entity sets
//!
//! Everything one run mutates lives here and is owned by the run loop.

use serde::{Deserialize, Serialize};

use super::entity::{Collectible, Obstacle, ObstacleKind};

/// Score and lifecycle for the current run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunState {
    /// Only increases while `alive`
    pub score: u64,
    /// Best score across runs (never decreases)
    pub high_score: u64,
    pub alive: bool,
    /// Time accrued toward the next +1 score tick (ms)
    pub since_score_tick: f64,
    /// Run clock, accumulated from frame samples (ms)
    pub clock_ms: f64,
    /// Terminal delay after Hit has elapsed; nothing steps any more
    pub over: bool,
}

impl RunState {
    pub fn new(high_score: u64) -> Self {
        Self {
            high_score,
            alive: true,
            ..Default::default()
        }
    }
}

/// Live obstacles and collectibles
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub obstacles: Vec<Obstacle>,
    pub collectibles: Vec<Collectible>,
    /// Next entity ID
    next_id: u32,
}

impl Default for World {
    fn default() -> Self {
        Self {
            obstacles: Vec::new(),
            collectibles: Vec::new(),
            next_id: 1,
        }
    }
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Rightmost obstacle x, never less than the screen's right edge
    pub fn rightmost_x(&self, screen_width: f32) -> f32 {
        self.obstacles
            .iter()
            .map(|o| o.pos.x)
            .fold(screen_width, f32::max)
    }

    /// Add an obstacle and return its ID
    pub fn push_obstacle(
        &mut self,
        kind: ObstacleKind,
        x: f32,
        screen_height: f32,
        base_speed: f32,
    ) -> u32 {
        let id = self.next_entity_id();
        self.obstacles
            .push(Obstacle::new(id, kind, x, screen_height, base_speed));
        id
    }

    /// Add a collectible and return its ID
    pub fn push_collectible(&mut self, x: f32, screen_height: f32, base_speed: f32) -> u32 {
        let id = self.next_entity_id();
        self.collectibles
            .push(Collectible::new(id, x, screen_height, base_speed));
        id
    }

    pub fn obstacle_mut(&mut self, id: u32) -> Option<&mut Obstacle> {
        self.obstacles.iter_mut().find(|o| o.id == id)
    }
}
