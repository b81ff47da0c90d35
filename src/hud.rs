//! HUD text helpers

use crate::consts::BASE_RUN_FRAME_RATE;

/// Score line shown in the top-right corner, e.g. `HI 00200 00042`
pub fn format_score(score: u64, high_score: u64) -> String {
    format!("HI {:05} {:05}", high_score, score)
}

/// Running animation frame rate for the current speed multiplier
pub fn running_frame_rate(speed_multiplier: f32) -> u32 {
    (BASE_RUN_FRAME_RATE * speed_multiplier).round().max(0.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_score_pads() {
        assert_eq!(format_score(42, 200), "HI 00200 00042");
        assert_eq!(format_score(0, 0), "HI 00000 00000");
        assert_eq!(format_score(123_456, 99), "HI 00099 123456");
    }

    #[test]
    fn test_running_frame_rate() {
        assert_eq!(running_frame_rate(1.5), 8);
        assert_eq!(running_frame_rate(1.0), 5);
        assert_eq!(running_frame_rate(2.0), 10);
    }
}
