//! Panda Run - An endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Frame-driven run simulation (difficulty, spawning, recycling, player FSM, collisions)
//! - `persistence`: Key-value storage backends (memory, file, LocalStorage)
//! - `highscores`: Write-through high score tracking
//! - `tuning`: Data-driven game balance
//! - `hud`: Score line formatting
//! - `demo`: Headless autopilot harness used by the binary

pub mod demo;
pub mod highscores;
pub mod hud;
pub mod persistence;
pub mod sim;
pub mod tuning;

pub use highscores::HighScore;
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Fixed geometry constants (screen coordinates, y grows downward)
pub mod consts {
    /// Default logical screen size
    pub const SCREEN_WIDTH: f32 = 1024.0;
    pub const SCREEN_HEIGHT: f32 = 768.0;

    /// Top of the floor, relative to the bottom of the screen. The player
    /// and ground obstacles stand on it.
    pub const GROUND_Y_OFFSET: f32 = -25.0;
    /// Bottom edge of collectibles, hovering just above the floor
    pub const COLLECTIBLE_Y_OFFSET: f32 = -40.0;
    /// Bottom edge of flying obstacles: exactly a crouch height above the floor
    pub const FLYING_OBSTACLE_Y_OFFSET: f32 = GROUND_Y_OFFSET - PLAYER_CROUCHING.1;

    /// Player horizontal position (fixed, the world scrolls past it)
    pub const PLAYER_X: f32 = 60.0;
    /// Standing collision footprint (w, h)
    pub const PLAYER_STANDING: (f32, f32) = (64.0, 64.0);
    /// Crouching collision footprint (w, h), anchored at the bottom edge
    pub const PLAYER_CROUCHING: (f32, f32) = (48.0, 24.0);
    /// Vertical velocity requested from physics on jump (px/s, negative = up)
    pub const JUMP_VELOCITY: f32 = -600.0;
    /// Gravity physics applies to the player (px/s²)
    pub const PLAYER_GRAVITY: f32 = 1300.0;

    /// Hitboxes (w, h)
    pub const GROUND_OBSTACLE_HITBOX: (f32, f32) = (32.0, 32.0);
    pub const FLYING_OBSTACLE_HITBOX: (f32, f32) = (40.0, 32.0);
    pub const COLLECTIBLE_HITBOX: (f32, f32) = (32.0, 32.0);

    /// Entities left of this x have fully exited the screen
    pub const EXIT_X: f32 = -50.0;

    /// Special-mode knockback: horizontal magnitude range (px/s)
    pub const KNOCKBACK_X: (u32, u32) = (200, 400);
    /// Special-mode knockback: upward magnitude range (px/s)
    pub const KNOCKBACK_Y: (u32, u32) = (300, 500);
    /// Gravity applied to knocked-away obstacles (px/s²)
    pub const KNOCKBACK_GRAVITY: f32 = 500.0;

    /// Points for clearing an obstacle mid-jump
    pub const JUMP_BONUS: u64 = 10;
    /// Slack between the player's bottom edge and an obstacle's top edge
    pub const JUMP_OVER_TOLERANCE: f32 = 20.0;

    /// Ground obstacles present at run start
    pub const INITIAL_OBSTACLES: usize = 3;
    /// Gap between the screen edge and the first obstacle
    pub const INITIAL_OBSTACLE_OFFSET: f32 = 200.0;

    /// Background clouds
    pub const CLOUD_COUNT: usize = 5;
    pub const CLOUD_WIDTH: f32 = 128.0;

    /// Running animation frame rate at speed multiplier 1.0
    pub const BASE_RUN_FRAME_RATE: f32 = 5.0;
}

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Rectangle of size `(w, h)` whose bottom edge is centered on `anchor`
    #[inline]
    pub fn from_bottom_center(anchor: Vec2, size: (f32, f32)) -> Self {
        let (w, h) = size;
        Self {
            min: Vec2::new(anchor.x - w / 2.0, anchor.y - h),
            max: Vec2::new(anchor.x + w / 2.0, anchor.y),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Open-interval horizontal overlap
    #[inline]
    pub fn overlaps_x(&self, other: &Bounds) -> bool {
        self.right() > other.left() && self.left() < other.right()
    }

    /// Full AABB overlap (used by the demo physics collaborator)
    #[inline]
    pub fn intersects(&self, other: &Bounds) -> bool {
        self.overlaps_x(other) && self.bottom() > other.top() && self.top() < other.bottom()
    }
}
