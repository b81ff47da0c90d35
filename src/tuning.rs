//! Data-driven game balance
//!
//! Every gameplay number the simulation consults lives here. Defaults are the
//! shipped game values; a JSON override can be stored alongside the high score.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::persistence::{KeyValueStore, StoreError};

/// Tuning load/validation errors
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(&'static str),
    #[error("tuning storage error: {0}")]
    Store(#[from] StoreError),
}

/// Game balance values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Screen ===
    pub screen_width: f32,
    pub screen_height: f32,

    // === Speed curve ===
    /// Speed multiplier at score 0
    pub base_speed: f32,
    /// Multiplier added per milestone
    pub speed_increase: f32,
    /// Score points per milestone
    pub speed_milestone: u64,
    /// Obstacle/collectible scroll speed in px per reference frame
    pub entity_speed: f32,
    /// Ground strip scroll speed in px per reference frame
    pub background_speed: f32,

    // === Spacing curve ===
    pub spacing_fixed: f32,
    /// Score above which spacing starts shrinking
    pub spacing_reduction_score: u64,
    /// Pixels removed per point above the reduction score
    pub spacing_reduction_rate: f32,
    pub spacing_min: f32,
    pub spacing_max: f32,
    /// Gap between the obstacles laid out at run start
    pub initial_spacing: f32,

    // === Timing ===
    /// Frame rate the per-frame speeds are authored against
    pub reference_fps: f32,
    /// Milliseconds between +1 score ticks
    pub score_tick_ms: f64,

    // === Spawning ===
    /// Score at which flying obstacles start appearing
    pub flying_unlock_score: u64,
    pub flying_interval_ms: f64,
    /// Chance an eligible frame actually spawns a flying obstacle
    pub flying_spawn_chance: f32,
    pub collectible_interval_ms: f64,
    /// Random offset past the right edge for new collectibles (inclusive)
    pub collectible_offset_min: u32,
    pub collectible_offset_max: u32,

    // === Player ===
    pub special_duration_ms: f64,
    /// Minimum time in the air before landing is accepted
    pub min_airborne_ms: f64,
    /// Hit -> Dead pose delay
    pub dead_pose_delay_ms: f64,
    /// Hit -> run over delay
    pub run_over_delay_ms: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,

            base_speed: 1.5,
            speed_increase: 0.02,
            speed_milestone: 100,
            entity_speed: 2.0,
            background_speed: 2.0,

            spacing_fixed: 600.0,
            spacing_reduction_score: 1000,
            spacing_reduction_rate: 0.1,
            spacing_min: 300.0,
            spacing_max: 2000.0,
            initial_spacing: 600.0,

            reference_fps: 60.0,
            score_tick_ms: 100.0,

            flying_unlock_score: 400,
            flying_interval_ms: 3000.0,
            flying_spawn_chance: 0.3,
            collectible_interval_ms: 35_000.0,
            collectible_offset_min: 300,
            collectible_offset_max: 1200,

            special_duration_ms: 5000.0,
            min_airborne_ms: 100.0,
            dead_pose_delay_ms: 1000.0,
            run_over_delay_ms: 2500.0,
        }
    }
}

impl Tuning {
    /// Storage key for a tuning override
    const STORAGE_KEY: &'static str = "panda_tuning";

    /// Parse and validate a JSON override (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Reject values the curves cannot work with
    pub fn validate(&self) -> Result<(), TuningError> {
        if !(self.reference_fps > 0.0) {
            return Err(TuningError::Invalid("reference_fps must be positive"));
        }
        if self.speed_milestone == 0 {
            return Err(TuningError::Invalid("speed_milestone must be non-zero"));
        }
        if self.spacing_min > self.spacing_max {
            return Err(TuningError::Invalid("spacing_min exceeds spacing_max"));
        }
        if self.collectible_offset_min > self.collectible_offset_max {
            return Err(TuningError::Invalid(
                "collectible_offset_min exceeds collectible_offset_max",
            ));
        }
        if !(0.0..=1.0).contains(&self.flying_spawn_chance) {
            return Err(TuningError::Invalid("flying_spawn_chance must be in [0, 1]"));
        }
        Ok(())
    }

    /// Load the stored override, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning override");
                    return tuning;
                }
                Err(e) => log::warn!("Ignoring stored tuning: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Tuning storage unavailable: {}", e),
        }
        log::info!("Using default tuning");
        Self::default()
    }

    /// Store this tuning as the override
    pub fn save(&self, store: &mut dyn KeyValueStore) -> Result<(), TuningError> {
        let json = self.to_json()?;
        store.set(Self::STORAGE_KEY, &json)?;
        Ok(())
    }
}
