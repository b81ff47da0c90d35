//! Flying obstacle and collectible spawning
//!
//! Two independent cooldowns, both measured on the run clock:
//! - Flying obstacles unlock at a score threshold, then each eligible frame
//!   rolls against a spawn chance. A failed roll does not leave the cooldown
//!   untouched: it rewinds `last_flying_spawn_at` to `now - interval / 2`, so
//!   the next attempt comes after half an interval.
//! - Collectibles spawn unconditionally once their interval has passed.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::ObstacleKind;
use super::state::World;
use crate::tuning::Tuning;

/// What the flying-obstacle gate decided this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlyingGate {
    /// Score below the unlock threshold
    Locked,
    /// Interval not yet elapsed
    CoolingDown,
    /// Roll succeeded; spawn now
    Spawn,
    /// Roll failed; cooldown shortened
    Retry,
}

/// Something the scheduler added this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Spawned {
    Flying { id: u32, x: f32 },
    Collectible { id: u32, x: f32 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnScheduler {
    pub last_flying_spawn_at: f64,
    pub last_collectible_spawn_at: f64,
}

impl SpawnScheduler {
    pub fn new(now: f64) -> Self {
        Self {
            last_flying_spawn_at: now,
            last_collectible_spawn_at: now,
        }
    }

    /// Restart both cooldowns at `now`
    pub fn reset(&mut self, now: f64) {
        self.last_flying_spawn_at = now;
        self.last_collectible_spawn_at = now;
    }

    /// Evaluate the flying gate. `roll` is a uniform draw in [0, 1) and is
    /// only consulted when the gate is eligible.
    pub fn flying_gate(&mut self, now: f64, score: u64, roll: f32, tuning: &Tuning) -> FlyingGate {
        if score < tuning.flying_unlock_score {
            return FlyingGate::Locked;
        }
        if now - self.last_flying_spawn_at <= tuning.flying_interval_ms {
            return FlyingGate::CoolingDown;
        }
        if roll < tuning.flying_spawn_chance {
            self.last_flying_spawn_at = now;
            FlyingGate::Spawn
        } else {
            self.last_flying_spawn_at = now - tuning.flying_interval_ms * 0.5;
            FlyingGate::Retry
        }
    }

    /// Whether a collectible is due; restarts the cooldown when it is
    pub fn collectible_due(&mut self, now: f64, tuning: &Tuning) -> bool {
        if now - self.last_collectible_spawn_at > tuning.collectible_interval_ms {
            self.last_collectible_spawn_at = now;
            true
        } else {
            false
        }
    }

    /// Run both timers for one frame, adding whatever spawns to `world`
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        score: u64,
        spacing: f32,
        world: &mut World,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Vec<Spawned> {
        let mut spawned = Vec::new();

        // Only draw when eligible so the RNG stream does not depend on frame rate
        let eligible = score >= tuning.flying_unlock_score
            && now - self.last_flying_spawn_at > tuning.flying_interval_ms;
        let roll = if eligible { rng.random::<f32>() } else { 1.0 };
        if self.flying_gate(now, score, roll, tuning) == FlyingGate::Spawn {
            let x = world.rightmost_x(tuning.screen_width) + spacing;
            let id = world.push_obstacle(
                ObstacleKind::Moth,
                x,
                tuning.screen_height,
                tuning.entity_speed,
            );
            log::debug!("Spawned moth {} at x={:.0}", id, x);
            spawned.push(Spawned::Flying { id, x });
        }

        if self.collectible_due(now, tuning) {
            let offset =
                rng.random_range(tuning.collectible_offset_min..=tuning.collectible_offset_max);
            let x = tuning.screen_width + offset as f32;
            let id = world.push_collectible(x, tuning.screen_height, tuning.entity_speed);
            log::debug!("Spawned duck {} at x={:.0}", id, x);
            spawned.push(Spawned::Collectible { id, x });
        }

        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_flying_locked_below_threshold() {
        let tuning = Tuning::default();
        let mut sched = SpawnScheduler::new(0.0);
        assert_eq!(sched.flying_gate(10_000.0, 399, 0.0, &tuning), FlyingGate::Locked);
        assert_eq!(sched.last_flying_spawn_at, 0.0);
    }

    #[test]
    fn test_flying_waits_for_interval() {
        let tuning = Tuning::default();
        let mut sched = SpawnScheduler::new(0.0);
        // Strictly greater than the interval is required
        assert_eq!(sched.flying_gate(3000.0, 400, 0.0, &tuning), FlyingGate::CoolingDown);
        assert_eq!(sched.flying_gate(3000.5, 400, 0.0, &tuning), FlyingGate::Spawn);
        assert_eq!(sched.last_flying_spawn_at, 3000.5);
    }

    #[test]
    fn test_failed_roll_shortens_cooldown() {
        let tuning = Tuning::default();
        let mut sched = SpawnScheduler::new(0.0);

        assert_eq!(sched.flying_gate(4000.0, 500, 0.3, &tuning), FlyingGate::Retry);
        assert_eq!(sched.last_flying_spawn_at, 4000.0 - 3000.0 * 0.5);

        // Next attempt comes half an interval later, not a full one
        assert_eq!(sched.flying_gate(5500.0, 500, 0.0, &tuning), FlyingGate::CoolingDown);
        assert_eq!(sched.flying_gate(5501.0, 500, 0.29, &tuning), FlyingGate::Spawn);
        assert_eq!(sched.last_flying_spawn_at, 5501.0);
    }

    #[test]
    fn test_collectible_interval() {
        let tuning = Tuning::default();
        let mut sched = SpawnScheduler::new(0.0);
        assert!(!sched.collectible_due(35_000.0, &tuning));
        assert!(sched.collectible_due(35_001.0, &tuning));
        assert!(!sched.collectible_due(35_002.0, &tuning));
        assert_eq!(sched.last_collectible_spawn_at, 35_001.0);
    }

    #[test]
    fn test_update_places_moth_after_rightmost() {
        let tuning = Tuning {
            flying_spawn_chance: 1.0,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(7);
        let mut world = World::new();
        world.push_obstacle(ObstacleKind::Beetle, 1700.0, 768.0, 2.0);
        let mut sched = SpawnScheduler::new(0.0);

        let spawned = sched.update(3001.0, 400, 600.0, &mut world, &tuning, &mut rng);
        assert_eq!(spawned.len(), 1);
        assert!(matches!(spawned[0], Spawned::Flying { x, .. } if x == 2300.0));
        assert_eq!(world.obstacles.len(), 2);
        assert!(world.obstacles[1].kind.is_flying());
    }

    #[test]
    fn test_update_collectible_offset_in_range() {
        let tuning = Tuning::default();
        let mut rng = Pcg32::seed_from_u64(8);
        let mut world = World::new();
        let mut sched = SpawnScheduler::new(0.0);
        let mut now = 0.0;

        for _ in 0..50 {
            now += tuning.collectible_interval_ms + 1.0;
            let spawned = sched.update(now, 0, 600.0, &mut world, &tuning, &mut rng);
            match spawned.as_slice() {
                [Spawned::Collectible { x, .. }] => {
                    assert!(*x >= tuning.screen_width + 300.0);
                    assert!(*x <= tuning.screen_width + 1200.0);
                }
                other => panic!("unexpected spawns {:?}", other),
            }
        }
        assert_eq!(world.collectibles.len(), 50);
        // Score 0 keeps moths locked
        assert!(world.obstacles.is_empty());
    }
}
