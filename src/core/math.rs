// Vector helpers shared by the collision code

use glam::Vec3;

/// Replace a vector with zero if any component is NaN or infinite
pub fn finite_or_zero(v: Vec3) -> Vec3 {
    if v.is_finite() {
        v
    } else {
        Vec3::ZERO
    }
}

/// Normalize after nudging every axis by `epsilon`
///
/// Coincident points still produce NaN once the squared length underflows,
/// so callers must check the result before storing it.
pub fn nudged_normalize(v: Vec3, epsilon: f32) -> Vec3 {
    (v + Vec3::splat(epsilon)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(Vec3::new(1.0, 2.0, 3.0)), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(finite_or_zero(Vec3::new(f32::NAN, 0.0, 0.0)), Vec3::ZERO);
        assert_eq!(finite_or_zero(Vec3::new(0.0, f32::INFINITY, 0.0)), Vec3::ZERO);
    }

    #[test]
    fn test_nudged_normalize_axis() {
        let n = nudged_normalize(Vec3::new(3.0, 0.0, 0.0), f32::MIN_POSITIVE);
        assert!((n.x - 1.0).abs() < 1e-6);
        assert!(n.y.abs() < 1e-6);
    }

    #[test]
    fn test_nudged_normalize_degenerate() {
        let n = nudged_normalize(Vec3::ZERO, f32::MIN_POSITIVE);
        assert!(!n.is_finite());
    }
}
