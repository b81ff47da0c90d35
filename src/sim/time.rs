//! Frame-time normalization
//!
//! Per-frame speeds are authored against a reference frame rate. Scaling every
//! positional delta by `elapsed / reference_frame` keeps the simulation speed
//! independent of how often the host calls us.

/// Fallback when the configured reference rate is unusable
const FALLBACK_FPS: f32 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeNormalizer {
    frame_ms: f32,
}

impl TimeNormalizer {
    pub fn new(reference_fps: f32) -> Self {
        let fps = if reference_fps.is_finite() && reference_fps > 0.0 {
            reference_fps
        } else {
            FALLBACK_FPS
        };
        Self {
            frame_ms: 1000.0 / fps,
        }
    }

    /// Duration of one reference frame in milliseconds
    pub fn frame_ms(&self) -> f32 {
        self.frame_ms
    }

    /// Multiplier for a frame that took `elapsed_ms`
    ///
    /// 1.0 for exactly one reference frame, 0.0 for a stalled (or bogus) sample.
    pub fn normalize(&self, elapsed_ms: f32) -> f32 {
        if !elapsed_ms.is_finite() || elapsed_ms <= 0.0 {
            return 0.0;
        }
        elapsed_ms / self.frame_ms
    }
}

impl Default for TimeNormalizer {
    fn default() -> Self {
        Self::new(FALLBACK_FPS)
    }
}
