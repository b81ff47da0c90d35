//! Obstacle recycling
//!
//! An obstacle that leaves the screen is swapped for a fresh ground obstacle
//! placed behind the rightmost one, so the live count never changes.

use rand::Rng;
use rand::seq::IndexedRandom;

use super::entity::ObstacleKind;
use super::state::World;
use crate::tuning::Tuning;

/// Result of one recycle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Recycled {
    pub removed: u32,
    pub placed: u32,
    pub kind: ObstacleKind,
    pub x: f32,
}

/// Replace `world.obstacles[index]` with a new random ground obstacle at
/// `max(rightmost remaining x, screen width) + spacing`.
pub fn recycle<R: Rng + ?Sized>(
    world: &mut World,
    index: usize,
    spacing: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Recycled {
    let removed = world.obstacles.remove(index).id;

    let kind = *ObstacleKind::GROUND
        .choose(rng)
        .unwrap_or(&ObstacleKind::Beetle);
    let x = world.rightmost_x(tuning.screen_width) + spacing;
    let placed = world.push_obstacle(kind, x, tuning.screen_height, tuning.entity_speed);

    Recycled {
        removed,
        placed,
        kind,
        x,
    }
}

/// Whether an obstacle should go back to the pool
pub fn is_expired(world: &World, index: usize, tuning: &Tuning) -> bool {
    let obstacle = &world.obstacles[index];
    obstacle.has_exited() || obstacle.has_fallen(tuning.screen_height)
}

/// Recycle every expired obstacle, oldest first
pub fn recycle_expired<R: Rng + ?Sized>(
    world: &mut World,
    spacing: f32,
    tuning: &Tuning,
    rng: &mut R,
) -> Vec<Recycled> {
    let expired: Vec<u32> = (0..world.obstacles.len())
        .filter(|&i| is_expired(world, i, tuning))
        .map(|i| world.obstacles[i].id)
        .collect();

    let mut recycled = Vec::with_capacity(expired.len());
    for id in expired {
        if let Some(index) = world.obstacles.iter().position(|o| o.id == id) {
            let r = recycle(world, index, spacing, tuning, rng);
            log::debug!("Recycled obstacle {} -> {} ({:?}) at x={:.0}", r.removed, r.placed, r.kind, r.x);
            recycled.push(r);
        }
    }
    recycled
}
