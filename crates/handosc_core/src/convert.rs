//! # Coordinate Converter
//!
//! Maps tracker samples (right-handed, Y-up) into renderer space (Y-down).
//!
//! ```text
//! position:     (x, y, z)     -> (x, -y, z)
//! orientation:  (w, x, y, z)  -> normalize(x, y, -z, w)
//! ```
//!
//! Position flips Y, orientation flips Z. The two flips are not the same
//! axis. This matches the receiver the tracker rigs were calibrated against,
//! so it stays as is.

use crate::math::{Quaternion, Vec3};

/// Converts a sender-space position into renderer space.
#[inline]
#[must_use]
pub fn convert_position(x: f32, y: f32, z: f32) -> Vec3 {
    Vec3::new(x, -y, z)
}

/// Converts a scalar-first `(w, x, y, z)` sender quaternion into a unit
/// renderer-space quaternion.
///
/// All-zero or non-finite input returns [`Quaternion::IDENTITY`], so the
/// result is never NaN. Any other finite input normalizes, however large or
/// small its magnitude.
#[inline]
#[must_use]
pub fn convert_orientation(w: f32, x: f32, y: f32, z: f32) -> Quaternion {
    Quaternion::new(x, y, -z, w).normalize_or_identity()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_position_flips_y_only() {
        assert_eq!(convert_position(1.0, 2.0, 3.0), Vec3::new(1.0, -2.0, 3.0));
        assert_eq!(convert_position(-4.5, -0.25, 0.0), Vec3::new(-4.5, 0.25, 0.0));
    }

    #[test]
    fn test_position_is_exact_for_random_input() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let (x, y, z): (f32, f32, f32) = (
                rng.gen_range(-1_000.0..1_000.0),
                rng.gen_range(-1_000.0..1_000.0),
                rng.gen_range(-1_000.0..1_000.0),
            );
            let p = convert_position(x, y, z);
            assert_eq!(p.to_array(), [x, -y, z]);
        }
    }

    #[test]
    fn test_identity_orientation_passes_through() {
        assert_eq!(convert_orientation(1.0, 0.0, 0.0, 0.0), Quaternion::IDENTITY);
    }

    #[test]
    fn test_orientation_flips_z_and_normalizes() {
        let q = convert_orientation(2.0, 0.0, 0.0, 2.0);
        let h = std::f32::consts::FRAC_1_SQRT_2;
        assert!((q.w - h).abs() < 1e-6);
        assert!((q.z + h).abs() < 1e-6);
        assert_eq!(q.x, 0.0);
        assert_eq!(q.y, 0.0);
    }

    #[test]
    fn test_zero_orientation_is_identity() {
        let q = convert_orientation(0.0, 0.0, 0.0, 0.0);
        assert_eq!(q, Quaternion::IDENTITY);
        assert!(q.is_finite());
    }

    #[test]
    fn test_huge_components_do_not_collapse_to_identity() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let q = convert_orientation(1e20, 1e20, 0.0, 0.0);
        assert!((q.x - h).abs() < 1e-5, "{q:?}");
        assert!((q.w - h).abs() < 1e-5, "{q:?}");
        assert_eq!(q.y, 0.0);
        assert_eq!(q.z, 0.0);
    }

    #[test]
    fn test_tiny_components_do_not_collapse_to_identity() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let q = convert_orientation(1e-7, 0.0, 0.0, 1e-7);
        assert!((q.w - h).abs() < 1e-5, "{q:?}");
        assert!((q.z + h).abs() < 1e-5, "{q:?}");

        let q = convert_orientation(1e-7, 1e-7, 0.0, 0.0);
        assert!((q.x - h).abs() < 1e-5, "{q:?}");
        assert!((q.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_random_orientations_are_unit_and_match_reference() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(42);
        for _ in 0..1_000 {
            let w: f32 = rng.gen_range(-10.0..10.0);
            let x: f32 = rng.gen_range(-10.0..10.0);
            let y: f32 = rng.gen_range(-10.0..10.0);
            let z: f32 = rng.gen_range(-10.0..10.0);
            let norm = (w * w + x * x + y * y + z * z).sqrt();
            if norm < 1e-3 {
                continue;
            }

            let q = convert_orientation(w, x, y, z);
            assert!((q.length() - 1.0).abs() < 1e-5);
            assert!((q.x - x / norm).abs() < 1e-5);
            assert!((q.y - y / norm).abs() < 1e-5);
            assert!((q.z + z / norm).abs() < 1e-5);
            assert!((q.w - w / norm).abs() < 1e-5);
        }
    }
}
