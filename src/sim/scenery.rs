//! Background scenery
//!
//! Purely cosmetic: clouds drift and wrap around, and the ground strip
//! offset grows with speed. Nothing here feeds back into gameplay.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::entity::Scroll;
use crate::consts::{CLOUD_COUNT, CLOUD_WIDTH};
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
    pub scale: f32,
}

impl Scroll for Cloud {
    fn base_speed(&self) -> f32 {
        self.speed
    }

    fn pos_mut(&mut self) -> &mut Vec2 {
        &mut self.pos
    }
}

impl Cloud {
    fn random_y<R: Rng + ?Sized>(rng: &mut R, screen_height: f32) -> f32 {
        let top = (screen_height / 3.0).max(51.0);
        rng.random_range(50.0..top)
    }

    /// Wrap to the right edge with a fresh height, scale and speed
    fn recycle<R: Rng + ?Sized>(&mut self, tuning: &Tuning, rng: &mut R) {
        self.pos = Vec2::new(
            tuning.screen_width + CLOUD_WIDTH,
            Self::random_y(rng, tuning.screen_height),
        );
        self.scale = 0.5 + rng.random::<f32>() * 0.5;
        self.speed = 2.0 + rng.random::<f32>() * 3.0;
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scenery {
    pub clouds: Vec<Cloud>,
    /// Horizontal texture offset of the ground strip
    pub ground_offset: f32,
}

impl Scenery {
    pub fn new<R: Rng + ?Sized>(tuning: &Tuning, rng: &mut R) -> Self {
        let right = tuning.screen_width.max(101.0);
        let clouds = (0..CLOUD_COUNT)
            .map(|_| Cloud {
                pos: Vec2::new(
                    rng.random_range(100.0..right),
                    Cloud::random_y(rng, tuning.screen_height),
                ),
                speed: 2.0,
                scale: 0.5 + rng.random::<f32>() * 0.5,
            })
            .collect();
        Self {
            clouds,
            ground_offset: 0.0,
        }
    }

    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        speed_multiplier: f32,
        time_factor: f32,
        tuning: &Tuning,
        rng: &mut R,
    ) {
        for cloud in &mut self.clouds {
            cloud.advance(speed_multiplier, time_factor);
            if cloud.pos.x < -CLOUD_WIDTH {
                cloud.recycle(tuning, rng);
            }
        }
        self.ground_offset += tuning.background_speed * speed_multiplier * time_factor;
    }
}
