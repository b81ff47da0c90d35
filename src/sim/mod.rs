//! Run simulation module
//!
//! All gameplay logic lives here. This module has no rendering or platform
//! dependencies:
//! - Frame-time normalized motion
//! - Seeded RNG only
//! - Geometry and ground contact supplied by the physics collaborator

pub mod collision;
pub mod difficulty;
pub mod entity;
pub mod player;
pub mod recycle;
pub mod run;
pub mod scenery;
pub mod spawn;
pub mod state;
pub mod time;

pub use collision::{Collected, ObstacleOutcome, check_jump_over, resolve_collectible, resolve_obstacle};
pub use difficulty::{obstacle_spacing, speed_multiplier};
pub use entity::{Collectible, Knockback, Obstacle, ObstacleKind, Scroll};
pub use player::{CommandRejected, Player, PlayerMode, PlayerSignal, PlayerView};
pub use recycle::{Recycled, recycle};
pub use run::{Command, FrameInput, FrameReport, Overlap, RunEvent, RunLoop};
pub use scenery::{Cloud, Scenery};
pub use spawn::{FlyingGate, SpawnScheduler, Spawned};
pub use state::{RunState, World};
pub use time::TimeNormalizer;
