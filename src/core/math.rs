//! Small numeric helpers shared by the analysis and evaluation engines

/// Normalize `value` into [0, 1] relative to `[min, max]`, clamped.
///
/// A degenerate range (max <= min) normalizes to 0.
pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
    if max <= min {
        return 0.0;
    }
    ((value - min) / (max - min)).clamp(0.0, 1.0)
}

pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * std::f32::consts::PI / 180.0
}

/// Convert a real-time duration to a frame count.
pub fn secs_to_frames(seconds: f32, frames_per_second: f32) -> f32 {
    seconds * frames_per_second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_midpoint() {
        assert!((normalize(5.0, 0.0, 10.0) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_clamps() {
        assert_eq!(normalize(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(normalize(11.0, 0.0, 10.0), 1.0);
    }

    #[test]
    fn test_normalize_degenerate_range() {
        assert_eq!(normalize(3.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn test_deg_to_rad() {
        assert!((deg_to_rad(180.0) - std::f32::consts::PI).abs() < 1e-6);
    }

    #[test]
    fn test_secs_to_frames() {
        assert_eq!(secs_to_frames(60.0, 22.4), 1344.0);
    }
}
