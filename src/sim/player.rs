//! Player state machine
//!
//! Modes: Running (initial), Jumping, Crouching, Hit, Dead. Special is an
//! overlay flag that can sit on top of any alive mode and expires on its own.
//!
//! Commands that fail their precondition return `CommandRejected` and leave
//! the mode and timers untouched. Vertical motion belongs to the physics
//! collaborator: a successful jump only asks for an impulse.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Bounds;
use crate::consts::{JUMP_VELOCITY, PLAYER_CROUCHING, PLAYER_STANDING, PLAYER_X};
use crate::tuning::Tuning;
use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerMode {
    Running,
    Jumping,
    Crouching,
    /// Struck by an obstacle; frozen until the run ends
    Hit,
    /// Terminal pose shown after the hit delay
    Dead,
}

/// Why a command was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CommandRejected {
    #[error("cannot jump while airborne")]
    Airborne,
    #[error("already jumping")]
    AlreadyJumping,
    #[error("already crouching")]
    AlreadyCrouching,
    #[error("cannot crouch while jumping")]
    WhileJumping,
    #[error("not crouching")]
    NotCrouching,
    #[error("player is down")]
    Incapacitated,
}

/// Timer-driven transitions reported by `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerSignal {
    Landed { mode: PlayerMode },
    SpecialEnded,
    DeadPose,
    RunOver,
}

/// Snapshot for the rendering collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerView {
    pub mode: PlayerMode,
    pub special: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    mode: PlayerMode,
    special_active: bool,
    mode_entered_at: f64,
    special_activated_at: f64,
    /// Crouch input is held (may outlive a jump that interrupted it)
    crouch_held: bool,
    hit_at: Option<f64>,
    run_over_signalled: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl Player {
    pub fn new(now: f64) -> Self {
        Self {
            mode: PlayerMode::Running,
            special_active: false,
            mode_entered_at: now,
            special_activated_at: now,
            crouch_held: false,
            hit_at: None,
            run_over_signalled: false,
        }
    }

    /// Back to a fresh Running player
    pub fn reset(&mut self, now: f64) {
        *self = Self::new(now);
    }

    pub fn mode(&self) -> PlayerMode {
        self.mode
    }

    pub fn mode_entered_at(&self) -> f64 {
        self.mode_entered_at
    }

    pub fn special_activated_at(&self) -> f64 {
        self.special_activated_at
    }

    pub fn is_special(&self) -> bool {
        self.special_active
    }

    pub fn is_alive(&self) -> bool {
        !matches!(self.mode, PlayerMode::Hit | PlayerMode::Dead)
    }

    pub fn is_jumping(&self) -> bool {
        self.mode == PlayerMode::Jumping
    }

    pub fn view(&self) -> PlayerView {
        PlayerView {
            mode: self.mode,
            special: self.special_active,
        }
    }

    /// Collision footprint (w, h) for the current mode
    pub fn footprint(&self) -> (f32, f32) {
        if self.mode == PlayerMode::Crouching {
            PLAYER_CROUCHING
        } else {
            PLAYER_STANDING
        }
    }

    /// On-screen bounds given the bottom edge reported by physics
    pub fn bounds(&self, bottom: f32) -> Bounds {
        Bounds::from_bottom_center(Vec2::new(PLAYER_X, bottom), self.footprint())
    }

    fn enter(&mut self, mode: PlayerMode, now: f64) {
        self.mode = mode;
        self.mode_entered_at = now;
    }

    /// Start a jump. Returns the vertical velocity physics should apply.
    pub fn request_jump(&mut self, grounded: bool, now: f64) -> Result<f32, CommandRejected> {
        match self.mode {
            PlayerMode::Hit | PlayerMode::Dead => Err(CommandRejected::Incapacitated),
            PlayerMode::Jumping => Err(CommandRejected::AlreadyJumping),
            _ if !grounded => Err(CommandRejected::Airborne),
            // From Crouching the standing footprint comes back for the jump;
            // the held crouch resumes on landing.
            PlayerMode::Running | PlayerMode::Crouching => {
                self.enter(PlayerMode::Jumping, now);
                Ok(JUMP_VELOCITY)
            }
        }
    }

    pub fn request_crouch(&mut self, now: f64) -> Result<(), CommandRejected> {
        match self.mode {
            PlayerMode::Hit | PlayerMode::Dead => Err(CommandRejected::Incapacitated),
            PlayerMode::Crouching => Err(CommandRejected::AlreadyCrouching),
            PlayerMode::Jumping => {
                self.crouch_held = true;
                Err(CommandRejected::WhileJumping)
            }
            PlayerMode::Running => {
                self.crouch_held = true;
                self.enter(PlayerMode::Crouching, now);
                Ok(())
            }
        }
    }

    pub fn release_crouch(&mut self, now: f64) -> Result<(), CommandRejected> {
        match self.mode {
            PlayerMode::Hit | PlayerMode::Dead => Err(CommandRejected::Incapacitated),
            PlayerMode::Crouching => {
                self.crouch_held = false;
                self.enter(PlayerMode::Running, now);
                Ok(())
            }
            _ if self.crouch_held => {
                self.crouch_held = false;
                Ok(())
            }
            _ => Err(CommandRejected::NotCrouching),
        }
    }

    /// Unprotected collision. Returns false if already down.
    pub fn hit(&mut self, now: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.special_active = false;
        self.crouch_held = false;
        self.hit_at = Some(now);
        self.enter(PlayerMode::Hit, now);
        true
    }

    /// Grant (or restart) special mode. Ignored once down.
    pub fn activate_special(&mut self, now: f64) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.special_active = true;
        self.special_activated_at = now;
        true
    }

    /// Advance timers. `grounded` comes from physics for this frame.
    pub fn update(&mut self, grounded: bool, now: f64, tuning: &Tuning) -> Vec<PlayerSignal> {
        let mut signals = Vec::new();

        if let Some(hit_at) = self.hit_at {
            let elapsed = now - hit_at;
            if self.mode == PlayerMode::Hit && elapsed >= tuning.dead_pose_delay_ms {
                self.enter(PlayerMode::Dead, now);
                signals.push(PlayerSignal::DeadPose);
            }
            if !self.run_over_signalled && elapsed >= tuning.run_over_delay_ms {
                self.run_over_signalled = true;
                signals.push(PlayerSignal::RunOver);
            }
            return signals;
        }

        if self.special_active && now - self.special_activated_at >= tuning.special_duration_ms {
            self.special_active = false;
            signals.push(PlayerSignal::SpecialEnded);
        }

        if self.mode == PlayerMode::Jumping
            && now - self.mode_entered_at > tuning.min_airborne_ms
            && grounded
        {
            let mode = if self.crouch_held {
                PlayerMode::Crouching
            } else {
                PlayerMode::Running
            };
            self.enter(mode, now);
            signals.push(PlayerSignal::Landed { mode });
        }

        signals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jump_from_running() {
        let mut player = Player::new(0.0);
        assert_eq!(player.request_jump(true, 10.0), Ok(JUMP_VELOCITY));
        assert_eq!(player.mode(), PlayerMode::Jumping);
        assert_eq!(player.mode_entered_at(), 10.0);
    }

    #[test]
    fn test_jump_while_jumping_rejected_without_timer_reset() {
        let mut player = Player::new(0.0);
        player.request_jump(true, 10.0).unwrap();
        assert_eq!(
            player.request_jump(true, 50.0),
            Err(CommandRejected::AlreadyJumping)
        );
        assert_eq!(player.mode(), PlayerMode::Jumping);
        assert_eq!(player.mode_entered_at(), 10.0);
    }

    #[test]
    fn test_jump_airborne_rejected() {
        let mut player = Player::new(0.0);
        assert_eq!(player.request_jump(false, 5.0), Err(CommandRejected::Airborne));
        assert_eq!(player.mode(), PlayerMode::Running);
    }

    #[test]
    fn test_landing_needs_min_airborne_time() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.request_jump(true, 0.0).unwrap();

        // Touch-and-go right after takeoff does not count
        assert!(player.update(true, 50.0, &tuning).is_empty());
        assert!(player.update(true, 100.0, &tuning).is_empty());
        assert_eq!(player.mode(), PlayerMode::Jumping);

        // Still airborne
        assert!(player.update(false, 300.0, &tuning).is_empty());

        let signals = player.update(true, 400.0, &tuning);
        assert_eq!(signals, vec![PlayerSignal::Landed { mode: PlayerMode::Running }]);
        assert_eq!(player.mode(), PlayerMode::Running);
    }

    #[test]
    fn test_crouch_changes_footprint() {
        let mut player = Player::new(0.0);
        assert_eq!(player.footprint(), PLAYER_STANDING);
        player.request_crouch(1.0).unwrap();
        assert_eq!(player.mode(), PlayerMode::Crouching);
        assert_eq!(player.footprint(), PLAYER_CROUCHING);
        assert_eq!(player.request_crouch(2.0), Err(CommandRejected::AlreadyCrouching));

        player.release_crouch(3.0).unwrap();
        assert_eq!(player.mode(), PlayerMode::Running);
        assert_eq!(player.footprint(), PLAYER_STANDING);
        assert_eq!(player.release_crouch(4.0), Err(CommandRejected::NotCrouching));
    }

    #[test]
    fn test_crouch_while_jumping_rejected_but_held() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.request_jump(true, 0.0).unwrap();
        assert_eq!(player.request_crouch(20.0), Err(CommandRejected::WhileJumping));
        assert_eq!(player.mode(), PlayerMode::Jumping);

        let signals = player.update(true, 500.0, &tuning);
        assert_eq!(signals, vec![PlayerSignal::Landed { mode: PlayerMode::Crouching }]);
        assert_eq!(player.footprint(), PLAYER_CROUCHING);
    }

    #[test]
    fn test_release_during_jump_lands_running() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.request_crouch(0.0).unwrap();
        player.request_jump(true, 10.0).unwrap();
        assert_eq!(player.footprint(), PLAYER_STANDING);
        player.release_crouch(60.0).unwrap();

        player.update(true, 500.0, &tuning);
        assert_eq!(player.mode(), PlayerMode::Running);
    }

    #[test]
    fn test_special_expires_after_duration() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        assert!(player.activate_special(1000.0));

        assert!(player.update(true, 5999.0, &tuning).is_empty());
        assert!(player.is_special());
        let signals = player.update(true, 6000.0, &tuning);
        assert_eq!(signals, vec![PlayerSignal::SpecialEnded]);
        assert!(!player.is_special());
    }

    #[test]
    fn test_special_restarts_on_recollect() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.activate_special(0.0);
        player.activate_special(4000.0);
        player.update(true, 5000.0, &tuning);
        assert!(player.is_special());
        player.update(true, 9000.0, &tuning);
        assert!(!player.is_special());
    }

    #[test]
    fn test_special_coexists_with_modes() {
        let mut player = Player::new(0.0);
        player.activate_special(0.0);
        player.request_crouch(1.0).unwrap();
        assert!(player.is_special());
        player.release_crouch(2.0).unwrap();
        player.request_jump(true, 3.0).unwrap();
        assert!(player.is_special());
    }

    #[test]
    fn test_hit_is_terminal() {
        let mut player = Player::new(0.0);
        player.activate_special(0.0);
        assert!(player.hit(100.0));
        assert!(!player.is_special());
        assert!(!player.hit(150.0));

        assert_eq!(player.request_jump(true, 200.0), Err(CommandRejected::Incapacitated));
        assert_eq!(player.request_crouch(200.0), Err(CommandRejected::Incapacitated));
        assert!(!player.activate_special(200.0));
        assert_eq!(player.mode(), PlayerMode::Hit);
    }

    #[test]
    fn test_hit_timeline() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.hit(1000.0);

        assert!(player.update(true, 1999.0, &tuning).is_empty());
        assert_eq!(player.update(true, 2000.0, &tuning), vec![PlayerSignal::DeadPose]);
        assert_eq!(player.mode(), PlayerMode::Dead);
        assert!(player.update(true, 3000.0, &tuning).is_empty());
        assert_eq!(player.update(true, 3500.0, &tuning), vec![PlayerSignal::RunOver]);
        // Reported once
        assert!(player.update(true, 9000.0, &tuning).is_empty());
    }

    #[test]
    fn test_long_stall_fires_both_hit_signals() {
        let tuning = Tuning::default();
        let mut player = Player::new(0.0);
        player.hit(0.0);
        assert_eq!(
            player.update(true, 10_000.0, &tuning),
            vec![PlayerSignal::DeadPose, PlayerSignal::RunOver]
        );
    }
}
