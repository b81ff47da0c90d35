//! Headless harness: a minimal arcade physics collaborator and an autopilot
//!
//! Used by the binary to play a run without a renderer. The physics here is
//! deliberately simple (vertical gravity for the player, AABB overlaps); a
//! real frontend would supply its engine's own.

use crate::consts::{GROUND_Y_OFFSET, PLAYER_GRAVITY};
use crate::sim::{Command, FrameInput, Overlap, PlayerMode, RunEvent, RunLoop};

/// Player vertical motion and overlap reporting
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    /// y of the player's bottom edge
    pub bottom: f32,
    /// px/s, negative = up
    pub vy: f32,
    floor: f32,
    frozen: bool,
}

impl ArcadePhysics {
    pub fn new(screen_height: f32) -> Self {
        let floor = screen_height + GROUND_Y_OFFSET;
        Self {
            bottom: floor,
            vy: 0.0,
            floor,
            frozen: false,
        }
    }

    pub fn grounded(&self) -> bool {
        self.bottom >= self.floor
    }

    /// React to events from the last step
    pub fn apply(&mut self, events: &[RunEvent]) {
        for event in events {
            match event {
                RunEvent::Jumped { velocity_y } => self.vy = *velocity_y,
                RunEvent::PlayerHit { .. } => {
                    self.vy = 0.0;
                    self.frozen = true;
                }
                RunEvent::RunStarted { .. } => {
                    self.bottom = self.floor;
                    self.vy = 0.0;
                    self.frozen = false;
                }
                _ => {}
            }
        }
    }

    pub fn integrate(&mut self, dt_secs: f32) {
        if self.frozen {
            return;
        }
        self.bottom += self.vy * dt_secs;
        self.vy += PLAYER_GRAVITY * dt_secs;
        if self.bottom >= self.floor {
            self.bottom = self.floor;
            self.vy = 0.0;
        }
    }

    /// Everything the player currently touches
    pub fn overlaps(&self, run: &RunLoop) -> Vec<Overlap> {
        let player = run.player().bounds(self.bottom);
        let obstacles = run
            .obstacles()
            .iter()
            .filter(|o| player.intersects(&o.bounds()))
            .map(|o| Overlap::Obstacle(o.id));
        let collectibles = run
            .collectibles()
            .iter()
            .filter(|c| player.intersects(&c.bounds()))
            .map(|c| Overlap::Collectible(c.id));
        obstacles.chain(collectibles).collect()
    }
}

/// Jumps ground bugs, ducks under moths
#[derive(Debug, Clone, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Reaction distance (px per unit of speed multiplier)
    const JUMP_LEAD: f32 = 30.0;
    const DUCK_LEAD: f32 = 60.0;

    pub fn commands(&mut self, run: &RunLoop) -> Vec<Command> {
        let player = run.player().bounds(run.tuning().screen_height + GROUND_Y_OFFSET);
        let speed = run.speed_multiplier();
        let mut commands = Vec::new();

        let ahead = |flying: bool| {
            run.obstacles()
                .iter()
                .filter(|o| o.kind.is_flying() == flying && !o.knocked_away)
                .map(|o| o.bounds())
                .filter(|b| b.right() > player.left())
                .map(|b| b.left() - player.right())
                .fold(f32::INFINITY, f32::min)
        };
        // Special mode plows straight through
        let special = run.player().is_special();

        let bug_gap = ahead(false);
        let moth_gap = ahead(true);
        let mode = run.player().mode();

        if !special && bug_gap <= Self::JUMP_LEAD * speed && mode != PlayerMode::Jumping {
            commands.push(Command::Jump);
        } else if !special && moth_gap <= Self::DUCK_LEAD * speed {
            if mode == PlayerMode::Running {
                commands.push(Command::Crouch);
            }
        } else if mode == PlayerMode::Crouching {
            commands.push(Command::ReleaseCrouch);
        }
        commands
    }
}

/// Outcome of a headless run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoSummary {
    pub final_score: u64,
    pub frames: u32,
    /// The run ended on its own (as opposed to hitting `max_frames`)
    pub finished: bool,
}

/// Play the current run with the autopilot at a fixed frame time
pub fn play(run: &mut RunLoop, frame_ms: f32, max_frames: u32) -> DemoSummary {
    let mut physics = ArcadePhysics::new(run.tuning().screen_height);
    let mut autopilot = Autopilot;

    for frame in 0..max_frames {
        physics.integrate(frame_ms / 1000.0);
        let input = FrameInput {
            elapsed_ms: frame_ms,
            grounded: physics.grounded(),
            player_bottom: physics.bottom,
            commands: autopilot.commands(run),
            overlaps: physics.overlaps(run),
        };
        let report = run.step(&input);
        physics.apply(&report.events);

        if let Some(final_score) = report.run_over() {
            return DemoSummary {
                final_score,
                frames: frame + 1,
                finished: true,
            };
        }
    }

    DemoSummary {
        final_score: run.state().score,
        frames: max_frames,
        finished: false,
    }
}
