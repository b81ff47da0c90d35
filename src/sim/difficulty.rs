//! Score-driven difficulty curve
//!
//! Speed steps up every milestone; spacing between newly placed obstacles
//! shrinks linearly once the reduction score is passed. Both are pure.

use crate::tuning::Tuning;

/// Scroll speed multiplier for `score` (never below `base_speed`)
pub fn speed_multiplier(score: u64, tuning: &Tuning) -> f32 {
    let milestones = score / tuning.speed_milestone.max(1);
    tuning.base_speed + milestones as f32 * tuning.speed_increase
}

/// Horizontal gap to insert before a newly placed obstacle
pub fn obstacle_spacing(score: u64, tuning: &Tuning) -> f32 {
    if score < tuning.spacing_reduction_score {
        return tuning.spacing_fixed.clamp(tuning.spacing_min, tuning.spacing_max);
    }

    let progress = (score - tuning.spacing_reduction_score) as f32;
    let reduced = tuning.spacing_fixed - progress * tuning.spacing_reduction_rate;
    reduced
        .max(tuning.spacing_min)
        .clamp(tuning.spacing_min, tuning.spacing_max)
}
