//! Collision outcomes
//!
//! Overlap detection itself belongs to the physics collaborator; this module
//! only decides what a reported overlap means for the current player state,
//! plus the jump-over bonus check.

use glam::Vec2;
use rand::Rng;

use super::entity::{Collectible, Obstacle};
use super::player::Player;
use crate::Bounds;
use crate::consts::{JUMP_OVER_TOLERANCE, KNOCKBACK_GRAVITY, KNOCKBACK_X, KNOCKBACK_Y};

/// What happened when the player touched an obstacle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObstacleOutcome {
    /// Special mode sent the obstacle flying; the run continues
    KnockAway { vel: Vec2 },
    /// The player was hit
    Lethal,
}

/// The player picked up a collectible
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collected {
    pub id: u32,
}

/// Random knock-away impulse: 200..=400 px/s to a random side, 300..=500 px/s up
pub fn knockback_impulse<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    let direction = if rng.random_bool(0.5) { -1.0 } else { 1.0 };
    let x = rng.random_range(KNOCKBACK_X.0..=KNOCKBACK_X.1) as f32 * direction;
    let y = -(rng.random_range(KNOCKBACK_Y.0..=KNOCKBACK_Y.1) as f32);
    Vec2::new(x, y)
}

/// Resolve a player/obstacle overlap.
///
/// `None` means the overlap has no effect: the obstacle was already knocked
/// away, or the player is already down.
pub fn resolve_obstacle<R: Rng + ?Sized>(
    player: &mut Player,
    obstacle: &mut Obstacle,
    now: f64,
    rng: &mut R,
) -> Option<ObstacleOutcome> {
    if !player.is_alive() || obstacle.knocked_away {
        return None;
    }

    if player.is_special() {
        let vel = knockback_impulse(rng);
        obstacle.knock_away(vel, KNOCKBACK_GRAVITY);
        return Some(ObstacleOutcome::KnockAway { vel });
    }

    player.hit(now);
    Some(ObstacleOutcome::Lethal)
}

/// Resolve a player/collectible overlap. `None` if it was already collected
/// or the player is down.
pub fn resolve_collectible(
    player: &mut Player,
    collectible: &mut Collectible,
    now: f64,
) -> Option<Collected> {
    if collectible.collected || !player.is_alive() {
        return None;
    }
    collectible.collect();
    player.activate_special(now);
    Some(Collected { id: collectible.id })
}

/// Whether the player is clearing `obstacle` from above right now
pub fn is_jumping_over(player_bounds: &Bounds, obstacle: &Obstacle) -> bool {
    let bounds = obstacle.bounds();
    player_bounds.overlaps_x(&bounds)
        && player_bounds.bottom() < bounds.top() + JUMP_OVER_TOLERANCE
}

/// Mark every obstacle the jumping player is currently above.
/// Returns the IDs newly marked; each obstacle is marked at most once.
/// Knocked-away obstacles are inert and never count.
pub fn check_jump_over(player: &Player, player_bottom: f32, obstacles: &mut [Obstacle]) -> Vec<u32> {
    if !player.is_jumping() {
        return Vec::new();
    }
    let player_bounds = player.bounds(player_bottom);

    let mut cleared = Vec::new();
    for obstacle in obstacles.iter_mut().filter(|o| !o.jumped_over && !o.knocked_away) {
        if is_jumping_over(&player_bounds, obstacle) {
            obstacle.jumped_over = true;
            cleared.push(obstacle.id);
        }
    }
    cleared
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_X;
    use crate::sim::entity::ObstacleKind;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn bug_at(x: f32) -> Obstacle {
        Obstacle::new(1, ObstacleKind::Beetle, x, 768.0, 2.0)
    }

    #[test]
    fn test_unprotected_hit_is_lethal() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut player = Player::new(0.0);
        let mut bug = bug_at(PLAYER_X);

        let outcome = resolve_obstacle(&mut player, &mut bug, 50.0, &mut rng);
        assert_eq!(outcome, Some(ObstacleOutcome::Lethal));
        assert!(!player.is_alive());
        assert!(!bug.knocked_away);
    }

    #[test]
    fn test_special_knocks_away_once() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut player = Player::new(0.0);
        player.activate_special(0.0);
        let mut bug = bug_at(PLAYER_X);

        let first = resolve_obstacle(&mut player, &mut bug, 10.0, &mut rng);
        let Some(ObstacleOutcome::KnockAway { vel }) = first else {
            panic!("expected knock away, got {:?}", first);
        };
        assert!(player.is_alive());
        assert!(bug.knocked_away);

        // Second overlap must not re-apply velocity
        let second = resolve_obstacle(&mut player, &mut bug, 20.0, &mut rng);
        assert_eq!(second, None);
        assert_eq!(bug.knockback.unwrap().vel, vel);
    }

    #[test]
    fn test_knocked_obstacle_harmless_after_special_ends() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut player = Player::new(0.0);
        let mut bug = bug_at(PLAYER_X);
        bug.knock_away(Vec2::new(250.0, -350.0), KNOCKBACK_GRAVITY);

        assert_eq!(resolve_obstacle(&mut player, &mut bug, 10.0, &mut rng), None);
        assert!(player.is_alive());
    }

    #[test]
    fn test_knockback_ranges() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut saw_left = false;
        let mut saw_right = false;
        for _ in 0..500 {
            let v = knockback_impulse(&mut rng);
            assert!((200.0..=400.0).contains(&v.x.abs()));
            assert!((-500.0..=-300.0).contains(&v.y));
            saw_left |= v.x < 0.0;
            saw_right |= v.x > 0.0;
        }
        assert!(saw_left && saw_right);
    }

    #[test]
    fn test_collect_activates_special_once() {
        let mut player = Player::new(0.0);
        let mut duck = Collectible::new(9, PLAYER_X, 768.0, 2.0);

        assert_eq!(resolve_collectible(&mut player, &mut duck, 5.0), Some(Collected { id: 9 }));
        assert!(player.is_special());
        assert!(duck.collected);
        assert_eq!(resolve_collectible(&mut player, &mut duck, 6.0), None);
        assert_eq!(player.special_activated_at(), 5.0);
    }

    #[test]
    fn test_jump_over_awarded_once() {
        let mut player = Player::new(0.0);
        player.request_jump(true, 0.0).unwrap();
        let mut bugs = vec![bug_at(PLAYER_X)];
        // Bug top is 743 - 32 = 711; player bottom well above it
        assert_eq!(check_jump_over(&player, 650.0, &mut bugs), vec![1]);
        assert!(bugs[0].jumped_over);
        assert!(check_jump_over(&player, 640.0, &mut bugs).is_empty());
    }

    #[test]
    fn test_jump_over_tolerance() {
        let mut player = Player::new(0.0);
        player.request_jump(true, 0.0).unwrap();
        let mut bugs = vec![bug_at(PLAYER_X)];
        // Within 20px below the bug's top still counts
        assert_eq!(check_jump_over(&player, 730.0, &mut bugs), vec![1]);

        let mut bugs = vec![bug_at(PLAYER_X)];
        assert!(check_jump_over(&player, 731.0, &mut bugs).is_empty());
    }

    #[test]
    fn test_knocked_obstacle_earns_no_jump_bonus() {
        let mut player = Player::new(0.0);
        player.request_jump(true, 0.0).unwrap();
        let mut bugs = vec![bug_at(PLAYER_X)];
        bugs[0].knock_away(Vec2::new(-250.0, -400.0), KNOCKBACK_GRAVITY);

        assert!(check_jump_over(&player, 650.0, &mut bugs).is_empty());
        assert!(!bugs[0].jumped_over);
    }

    #[test]
    fn test_jump_over_requires_horizontal_overlap_and_jump() {
        let mut player = Player::new(0.0);
        let mut bugs = vec![bug_at(PLAYER_X)];
        // Not jumping
        assert!(check_jump_over(&player, 600.0, &mut bugs).is_empty());

        player.request_jump(true, 0.0).unwrap();
        let mut far = vec![bug_at(PLAYER_X + 200.0)];
        assert!(check_jump_over(&player, 600.0, &mut far).is_empty());
        assert!(!far[0].jumped_over);
    }
}
