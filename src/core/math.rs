// Math utilities and helper functions

use glam::Vec2;

/// Horizontal orientation (+1 right, -1 left) for a signed value.
/// Zero keeps the current orientation.
pub fn facing_from(value: f32, current: f32) -> f32 {
    if value > 0.0 {
        1.0
    } else if value < 0.0 {
        -1.0
    } else {
        current
    }
}

/// Knockback vector pushing `to` away from `from` with a fixed magnitude.
/// Coincident positions produce no knockback.
pub fn knockback(from: Vec2, to: Vec2, magnitude: f32) -> Vec2 {
    (to - from).normalize_or_zero() * magnitude
}

/// Mirror an offset authored for a right-facing character
pub fn mirror_x(offset: Vec2, facing: f32) -> Vec2 {
    Vec2::new(offset.x * facing, offset.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_facing_from() {
        assert_eq!(facing_from(0.3, -1.0), 1.0);
        assert_eq!(facing_from(-2.0, 1.0), -1.0);
        assert_eq!(facing_from(0.0, -1.0), -1.0);
    }

    #[test]
    fn test_knockback_direction_and_magnitude() {
        let kb = knockback(Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0), 5.0);
        assert_relative_eq!(kb.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(kb.y, 4.0, epsilon = 1e-5);
    }

    #[test]
    fn test_knockback_coincident_positions() {
        let kb = knockback(Vec2::ONE, Vec2::ONE, 5.0);
        assert_eq!(kb, Vec2::ZERO);
    }

    #[test]
    fn test_mirror_x() {
        let offset = Vec2::new(0.6, 0.1);
        assert_eq!(mirror_x(offset, -1.0), Vec2::new(-0.6, 0.1));
        assert_eq!(mirror_x(offset, 1.0), offset);
    }
}
