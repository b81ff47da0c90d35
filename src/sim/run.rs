//! Per-frame run loop
//!
//! Frame order (alive frames):
//! 1. Advance the run clock, apply queued commands
//! 2. Move entities and scenery
//! 3. Resolve reported overlaps, then jump-over scoring
//! 4. Recycle expired obstacles, drop exited collectibles, run the spawner
//! 5. Score tick
//!
//! The player timers run afterwards on every frame, including after a hit,
//! so the death pose and run-over signal still arrive.

use glam::Vec2;
use rand::SeedableRng;
use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::collision::{ObstacleOutcome, check_jump_over, resolve_collectible, resolve_obstacle};
use super::difficulty::{obstacle_spacing, speed_multiplier};
use super::entity::{Collectible, Obstacle, ObstacleKind, Scroll};
use super::player::{CommandRejected, Player, PlayerMode, PlayerSignal, PlayerView};
use super::recycle::recycle_expired;
use super::scenery::Scenery;
use super::spawn::{SpawnScheduler, Spawned};
use super::state::{RunState, World};
use super::time::TimeNormalizer;
use crate::consts::{INITIAL_OBSTACLE_OFFSET, INITIAL_OBSTACLES, JUMP_BONUS};
use crate::highscores::HighScore;
use crate::hud;
use crate::persistence::KeyValueStore;
use crate::tuning::Tuning;

/// Player input commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Jump,
    Crouch,
    ReleaseCrouch,
}

/// Overlap reported by the physics collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlap {
    Obstacle(u32),
    Collectible(u32),
}

/// Everything the host supplies for one frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Wall time since the previous frame (ms)
    pub elapsed_ms: f32,
    /// Player is standing on the floor
    pub grounded: bool,
    /// y of the player's bottom edge
    pub player_bottom: f32,
    pub commands: Vec<Command>,
    pub overlaps: Vec<Overlap>,
}

/// Notifications for the rendering, physics and scene collaborators
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RunEvent {
    RunStarted { high_score: u64 },
    /// Physics should set the player's vertical velocity
    Jumped { velocity_y: f32 },
    Landed { mode: PlayerMode },
    CrouchStarted,
    CrouchEnded,
    CommandRejected { command: Command, reason: CommandRejected },
    SpecialStarted,
    SpecialEnded,
    /// Physics-visible flight of a knocked obstacle
    ObstacleKnocked { id: u32, vel: Vec2 },
    CollectibleCollected { id: u32 },
    JumpBonus { id: u32, points: u64 },
    PlayerHit { score: u64 },
    NewHighScore { score: u64 },
    ObstacleRecycled { removed: u32, placed: u32, kind: ObstacleKind, x: f32 },
    ObstacleSpawned { id: u32, x: f32 },
    CollectibleSpawned { id: u32, x: f32 },
    CollectibleExpired { id: u32 },
    DeadPose,
    /// Terminal: the scene collaborator should leave the run
    RunOver { final_score: u64 },
}

/// Events produced by one `step`
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub events: Vec<RunEvent>,
}

impl FrameReport {
    pub fn run_over(&self) -> Option<u64> {
        self.events.iter().find_map(|e| match e {
            RunEvent::RunOver { final_score } => Some(*final_score),
            _ => None,
        })
    }
}

/// The run orchestrator
pub struct RunLoop {
    tuning: Tuning,
    normalizer: TimeNormalizer,
    store: Box<dyn KeyValueStore>,
    high: HighScore,
    seed: u64,
    rng: Pcg32,
    state: RunState,
    world: World,
    player: Player,
    scheduler: SpawnScheduler,
    scenery: Scenery,
    /// Latest ground contact from physics, used by direct commands
    grounded: bool,
    /// Events raised between frames (direct commands, `start`)
    pending: Vec<RunEvent>,
}

impl RunLoop {
    /// Create a loop and start the first run. Invalid tuning is replaced by
    /// the defaults.
    pub fn new(seed: u64, tuning: Tuning, store: Box<dyn KeyValueStore>) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning ({}), using defaults", e);
                Tuning::default()
            }
        };
        let mut run = Self {
            normalizer: TimeNormalizer::new(tuning.reference_fps),
            tuning,
            store,
            high: HighScore::default(),
            seed,
            rng: Pcg32::seed_from_u64(seed),
            state: RunState::default(),
            world: World::new(),
            player: Player::new(0.0),
            scheduler: SpawnScheduler::new(0.0),
            scenery: Scenery::default(),
            grounded: true,
            pending: Vec::new(),
        };
        run.start();
        run
    }

    /// Reset everything for a fresh run. Reads the stored high score; a
    /// record the store failed to keep still counts for this session.
    pub fn start(&mut self) {
        let loaded = HighScore::load(self.store.as_ref());
        self.high = HighScore::new(loaded.get().max(self.high.get()));
        self.state = RunState::new(self.high.get());
        let now = self.state.clock_ms;

        self.player.reset(now);
        self.scheduler.reset(now);
        self.scenery = Scenery::new(&self.tuning, &mut self.rng);
        self.grounded = true;

        self.world = World::new();
        for i in 0..INITIAL_OBSTACLES {
            let kind = *ObstacleKind::GROUND
                .choose(&mut self.rng)
                .unwrap_or(&ObstacleKind::Beetle);
            let x = self.tuning.screen_width
                + INITIAL_OBSTACLE_OFFSET
                + i as f32 * self.tuning.initial_spacing;
            self.world.push_obstacle(
                kind,
                x,
                self.tuning.screen_height,
                self.tuning.entity_speed,
            );
        }

        self.pending.clear();
        self.pending.push(RunEvent::RunStarted {
            high_score: self.state.high_score,
        });
        log::info!(
            "Run started (seed {}, high score {})",
            self.seed,
            self.state.high_score
        );
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_view(&self) -> PlayerView {
        self.player.view()
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.world.obstacles
    }

    pub fn collectibles(&self) -> &[Collectible] {
        &self.world.collectibles
    }

    pub fn scenery(&self) -> &Scenery {
        &self.scenery
    }

    pub fn is_over(&self) -> bool {
        self.state.over
    }

    pub fn speed_multiplier(&self) -> f32 {
        speed_multiplier(self.state.score, &self.tuning)
    }

    pub fn obstacle_spacing(&self) -> f32 {
        obstacle_spacing(self.state.score, &self.tuning)
    }

    /// Animation hint for the running cycle
    pub fn running_frame_rate(&self) -> u32 {
        hud::running_frame_rate(self.speed_multiplier())
    }

    pub fn hud_text(&self) -> String {
        hud::format_score(self.state.score, self.state.high_score)
    }

    pub fn request_jump(&mut self) -> Result<(), CommandRejected> {
        let mut events = std::mem::take(&mut self.pending);
        let result = self.apply_command(Command::Jump, self.grounded, &mut events);
        self.pending = events;
        result
    }

    pub fn request_crouch(&mut self) -> Result<(), CommandRejected> {
        let mut events = std::mem::take(&mut self.pending);
        let result = self.apply_command(Command::Crouch, self.grounded, &mut events);
        self.pending = events;
        result
    }

    pub fn release_crouch(&mut self) -> Result<(), CommandRejected> {
        let mut events = std::mem::take(&mut self.pending);
        let result = self.apply_command(Command::ReleaseCrouch, self.grounded, &mut events);
        self.pending = events;
        result
    }

    fn apply_command(
        &mut self,
        command: Command,
        grounded: bool,
        events: &mut Vec<RunEvent>,
    ) -> Result<(), CommandRejected> {
        if self.state.over {
            return Err(CommandRejected::Incapacitated);
        }
        let now = self.state.clock_ms;
        let result = match command {
            Command::Jump => self
                .player
                .request_jump(grounded, now)
                .map(|velocity_y| events.push(RunEvent::Jumped { velocity_y })),
            Command::Crouch => self
                .player
                .request_crouch(now)
                .map(|()| events.push(RunEvent::CrouchStarted)),
            Command::ReleaseCrouch => {
                let was_crouching = self.player.mode() == PlayerMode::Crouching;
                self.player.release_crouch(now).map(|()| {
                    if was_crouching {
                        events.push(RunEvent::CrouchEnded);
                    }
                })
            }
        };
        if let Err(reason) = result {
            log::debug!("Rejected {:?}: {}", command, reason);
            events.push(RunEvent::CommandRejected { command, reason });
        }
        result
    }

    /// Advance the run by one frame
    pub fn step(&mut self, input: &FrameInput) -> FrameReport {
        let mut events = std::mem::take(&mut self.pending);
        if self.state.over {
            return FrameReport { events };
        }

        let elapsed_ms = if input.elapsed_ms.is_finite() {
            input.elapsed_ms.max(0.0)
        } else {
            0.0
        };
        self.state.clock_ms += f64::from(elapsed_ms);
        self.grounded = input.grounded;
        let now = self.state.clock_ms;

        for &command in &input.commands {
            // Rejections are reported as events; nothing else to do here
            let _ = self.apply_command(command, input.grounded, &mut events);
        }

        if self.state.alive {
            let factor = self.normalizer.normalize(elapsed_ms);
            self.move_entities(factor, elapsed_ms / 1000.0);
            self.resolve_overlaps(&input.overlaps, now, &mut events);

            if self.state.alive {
                for id in check_jump_over(
                    &self.player,
                    input.player_bottom,
                    &mut self.world.obstacles,
                ) {
                    self.state.score += JUMP_BONUS;
                    events.push(RunEvent::JumpBonus {
                        id,
                        points: JUMP_BONUS,
                    });
                }

                self.update_population(now, &mut events);
                self.tick_score(f64::from(elapsed_ms));
            }
        }

        for signal in self.player.update(input.grounded, now, &self.tuning) {
            match signal {
                PlayerSignal::Landed { mode } => events.push(RunEvent::Landed { mode }),
                PlayerSignal::SpecialEnded => events.push(RunEvent::SpecialEnded),
                PlayerSignal::DeadPose => events.push(RunEvent::DeadPose),
                PlayerSignal::RunOver => {
                    self.state.over = true;
                    log::info!("Run over with score {}", self.state.score);
                    events.push(RunEvent::RunOver {
                        final_score: self.state.score,
                    });
                }
            }
        }

        FrameReport { events }
    }

    fn move_entities(&mut self, factor: f32, dt_secs: f32) {
        let speed = self.speed_multiplier();
        for obstacle in &mut self.world.obstacles {
            obstacle.advance(speed, factor);
            obstacle.fly(dt_secs);
        }
        for collectible in &mut self.world.collectibles {
            collectible.advance(speed, factor);
        }
        self.scenery
            .advance(speed, factor, &self.tuning, &mut self.rng);
    }

    fn resolve_overlaps(&mut self, overlaps: &[Overlap], now: f64, events: &mut Vec<RunEvent>) {
        for overlap in overlaps {
            match *overlap {
                Overlap::Obstacle(id) => {
                    let Some(obstacle) = self.world.obstacle_mut(id) else {
                        log::debug!("Overlap with unknown obstacle {}", id);
                        continue;
                    };
                    match resolve_obstacle(&mut self.player, obstacle, now, &mut self.rng) {
                        Some(ObstacleOutcome::KnockAway { vel }) => {
                            events.push(RunEvent::ObstacleKnocked { id, vel });
                        }
                        Some(ObstacleOutcome::Lethal) => self.on_lethal_hit(events),
                        None => {}
                    }
                }
                Overlap::Collectible(id) => {
                    let Some(index) = self.world.collectibles.iter().position(|c| c.id == id)
                    else {
                        continue;
                    };
                    let collectible = &mut self.world.collectibles[index];
                    if resolve_collectible(&mut self.player, collectible, now).is_some() {
                        self.world.collectibles.remove(index);
                        events.push(RunEvent::CollectibleCollected { id });
                        events.push(RunEvent::SpecialStarted);
                    }
                }
            }
        }
    }

    fn on_lethal_hit(&mut self, events: &mut Vec<RunEvent>) {
        self.state.alive = false;
        let score = self.state.score;
        log::info!("Player hit at score {}", score);
        events.push(RunEvent::PlayerHit { score });

        if self.high.record(score, self.store.as_mut()) {
            self.state.high_score = self.high.get();
            events.push(RunEvent::NewHighScore { score });
        }
    }

    fn update_population(&mut self, now: f64, events: &mut Vec<RunEvent>) {
        // Spacing is sampled once so recycles and spawns this frame agree
        let spacing = self.obstacle_spacing();

        for r in recycle_expired(&mut self.world, spacing, &self.tuning, &mut self.rng) {
            events.push(RunEvent::ObstacleRecycled {
                removed: r.removed,
                placed: r.placed,
                kind: r.kind,
                x: r.x,
            });
        }

        self.world.collectibles.retain(|c| {
            if c.has_exited() {
                events.push(RunEvent::CollectibleExpired { id: c.id });
                false
            } else {
                true
            }
        });

        let spawned = self.scheduler.update(
            now,
            self.state.score,
            spacing,
            &mut self.world,
            &self.tuning,
            &mut self.rng,
        );
        for s in spawned {
            events.push(match s {
                Spawned::Flying { id, x } => RunEvent::ObstacleSpawned { id, x },
                Spawned::Collectible { id, x } => RunEvent::CollectibleSpawned { id, x },
            });
        }
    }

    fn tick_score(&mut self, elapsed_ms: f64) {
        self.state.since_score_tick += elapsed_ms;
        if self.state.since_score_tick > self.tuning.score_tick_ms {
            self.state.score += 1;
            self.state.since_score_tick = 0.0;
        }
    }

    /// Test hook: place the world and score directly
    #[cfg(test)]
    pub(crate) fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RunState {
        &mut self.state
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }
}
