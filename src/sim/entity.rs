//! Scrolling entities: obstacles and collectibles
//!
//! Entities are plain data. The only thing they do on their own is scroll
//! left; flags and removal are driven by the run loop and the resolver.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::*;

/// Shared per-frame movement
pub trait Scroll {
    /// Base speed in px per reference frame
    fn base_speed(&self) -> f32;
    fn pos_mut(&mut self) -> &mut Vec2;

    /// `x -= base_speed * speed_multiplier * time_factor`
    fn advance(&mut self, speed_multiplier: f32, time_factor: f32) {
        let dx = self.base_speed() * speed_multiplier * time_factor;
        self.pos_mut().x -= dx;
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObstacleKind {
    Beetle,
    Cockroach,
    LadyBug,
    /// Flying; only ever introduced by the spawn scheduler
    Moth,
}

impl ObstacleKind {
    /// Variants the recycler chooses from
    pub const GROUND: [ObstacleKind; 3] = [
        ObstacleKind::Beetle,
        ObstacleKind::Cockroach,
        ObstacleKind::LadyBug,
    ];

    pub fn is_flying(&self) -> bool {
        matches!(self, ObstacleKind::Moth)
    }

    pub fn hitbox(&self) -> (f32, f32) {
        if self.is_flying() {
            FLYING_OBSTACLE_HITBOX
        } else {
            GROUND_OBSTACLE_HITBOX
        }
    }

    /// Bottom edge y for a screen of the given height
    pub fn baseline(&self, screen_height: f32) -> f32 {
        if self.is_flying() {
            screen_height + FLYING_OBSTACLE_Y_OFFSET
        } else {
            screen_height + GROUND_Y_OFFSET
        }
    }
}

/// Flight state after a special-mode knock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Knockback {
    /// px/s
    pub vel: Vec2,
    /// px/s², positive = down
    pub gravity: f32,
}

/// An obstacle entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    /// Bottom-center of the hitbox
    pub pos: Vec2,
    pub base_speed: f32,
    /// Jump bonus already awarded for this obstacle
    pub jumped_over: bool,
    /// Already knocked away by a special-mode player
    pub knocked_away: bool,
    pub knockback: Option<Knockback>,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, x: f32, screen_height: f32, base_speed: f32) -> Self {
        Self {
            id,
            kind,
            pos: Vec2::new(x, kind.baseline(screen_height)),
            base_speed,
            jumped_over: false,
            knocked_away: false,
            knockback: None,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_bottom_center(self.pos, self.kind.hitbox())
    }

    /// Fully left the visible area on the left
    pub fn has_exited(&self) -> bool {
        self.pos.x < EXIT_X
    }

    /// Knocked off the bottom of the screen
    pub fn has_fallen(&self, screen_height: f32) -> bool {
        self.knockback.is_some() && self.bounds().top() > screen_height
    }

    /// Start a knock-away flight. Returns false if already knocked.
    pub fn knock_away(&mut self, vel: Vec2, gravity: f32) -> bool {
        if self.knocked_away {
            return false;
        }
        self.knocked_away = true;
        self.knockback = Some(Knockback { vel, gravity });
        true
    }

    /// Integrate knock-away flight (no-op when not knocked)
    pub fn fly(&mut self, dt_secs: f32) {
        if let Some(knock) = self.knockback.as_mut() {
            self.pos += knock.vel * dt_secs;
            knock.vel.y += knock.gravity * dt_secs;
        }
    }
}

impl Scroll for Obstacle {
    fn base_speed(&self) -> f32 {
        self.base_speed
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}

/// A duck: collecting it grants special mode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: u32,
    /// Bottom-center of the hitbox
    pub pos: Vec2,
    pub base_speed: f32,
    pub collected: bool,
}

impl Collectible {
    pub fn new(id: u32, x: f32, screen_height: f32, base_speed: f32) -> Self {
        Self {
            id,
            pos: Vec2::new(x, screen_height + COLLECTIBLE_Y_OFFSET),
            base_speed,
            collected: false,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_bottom_center(self.pos, COLLECTIBLE_HITBOX)
    }

    pub fn has_exited(&self) -> bool {
        self.pos.x < EXIT_X
    }

    /// Mark collected. Returns false if it already was.
    pub fn collect(&mut self) -> bool {
        if self.collected {
            return false;
        }
        self.collected = true;
        true
    }
}

impl Scroll for Collectible {
    fn base_speed(&self) -> f32 {
        self.base_speed
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}
