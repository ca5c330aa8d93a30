//! Mathematical types for renderer-space poses.
//!
//! These are the canonical representations stored in the pose store and
//! handed to the render side each frame.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// 3D Vector - position, scale, direction
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vec3 {
    /// Creates a new Vec3
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// All ones
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);

    /// Converts to array
    #[must_use]
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Creates from array
    #[must_use]
    pub const fn from_array(arr: [f32; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Dot product
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Length squared (avoids sqrt)
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Length
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// True if every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl std::ops::Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl std::ops::Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl std::ops::Mul<f32> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

/// Quaternion for rotations, stored vector-first `(x, y, z, w)`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Quaternion {
    /// Creates a new quaternion
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Identity rotation
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    /// Four-component dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z + self.w * other.w
    }

    /// Norm squared.
    #[must_use]
    pub fn length_squared(self) -> f32 {
        self.dot(self)
    }

    /// Norm.
    #[must_use]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// True if every component is finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// Returns the unit quaternion pointing the same way, or `None` when the
    /// input has no direction (all zero, or any component non-finite).
    ///
    /// Components are divided by the largest magnitude before squaring, so
    /// any finite nonzero input normalizes without overflow or underflow.
    #[must_use]
    pub fn try_normalize(self) -> Option<Self> {
        if !self.is_finite() {
            return None;
        }
        let max = self.x.abs().max(self.y.abs()).max(self.z.abs()).max(self.w.abs());
        if max == 0.0 {
            return None;
        }
        let scaled = Self::new(self.x / max, self.y / max, self.z / max, self.w / max);
        // Largest scaled component is exactly +-1, so the norm is in [1, 2].
        let inv = scaled.length().recip();
        Some(Self::new(scaled.x * inv, scaled.y * inv, scaled.z * inv, scaled.w * inv))
    }

    /// Normalizes, falling back to [`Quaternion::IDENTITY`] for degenerate input.
    #[must_use]
    pub fn normalize_or_identity(self) -> Self {
        self.try_normalize().unwrap_or(Self::IDENTITY)
    }

    /// Rotates a vector by this (unit) quaternion.
    #[must_use]
    pub fn rotate(self, v: Vec3) -> Vec3 {
        // v' = v + 2w(q x v) + 2(q x (q x v))
        let q = Vec3::new(self.x, self.y, self.z);
        let t = cross(q, v) * 2.0;
        v + t * self.w + cross(q, t)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn cross(a: Vec3, b: Vec3) -> Vec3 {
    Vec3::new(
        a.y * b.z - a.z * b.y,
        a.z * b.x - a.x * b.z,
        a.x * b.y - a.y * b.x,
    )
}

/// Column-major 4x4 matrix, the layout GL-style renderers consume.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Mat4 {
    /// Columns
    pub cols: [[f32; 4]; 4],
}

impl Mat4 {
    /// Identity matrix
    pub const IDENTITY: Self = Self {
        cols: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Translation matrix.
    #[must_use]
    pub const fn from_translation(t: Vec3) -> Self {
        Self {
            cols: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [t.x, t.y, t.z, 1.0],
            ],
        }
    }

    /// Non-uniform scale matrix.
    #[must_use]
    pub const fn from_scale(s: Vec3) -> Self {
        Self {
            cols: [
                [s.x, 0.0, 0.0, 0.0],
                [0.0, s.y, 0.0, 0.0],
                [0.0, 0.0, s.z, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Rotation matrix from a unit quaternion.
    #[must_use]
    pub fn from_quaternion(q: Quaternion) -> Self {
        let (x, y, z, w) = (q.x, q.y, q.z, q.w);
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, xy, xz) = (x * x2, x * y2, x * z2);
        let (yy, yz, zz) = (y * y2, y * z2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Self {
            cols: [
                [1.0 - (yy + zz), xy + wz, xz - wy, 0.0],
                [xy - wz, 1.0 - (xx + zz), yz + wx, 0.0],
                [xz + wy, yz - wx, 1.0 - (xx + yy), 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }

    /// Translation * rotation, i.e. rotate first, then move.
    #[must_use]
    pub fn from_rotation_translation(rotation: Quaternion, translation: Vec3) -> Self {
        let mut m = Self::from_quaternion(rotation);
        m.cols[3] = [translation.x, translation.y, translation.z, 1.0];
        m
    }

    /// Transforms a point (w = 1).
    #[must_use]
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let c = &self.cols;
        Vec3::new(
            c[0][0] * p.x + c[1][0] * p.y + c[2][0] * p.z + c[3][0],
            c[0][1] * p.x + c[1][1] * p.y + c[2][1] * p.z + c[3][1],
            c[0][2] * p.x + c[1][2] * p.y + c[2][2] * p.z + c[3][2],
        )
    }

    /// Translation column.
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        Vec3::new(self.cols[3][0], self.cols[3][1], self.cols[3][2])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul for Mat4 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = [[0.0f32; 4]; 4];
        for (c, col) in out.iter_mut().enumerate() {
            for (r, cell) in col.iter_mut().enumerate() {
                *cell = (0..4).map(|k| self.cols[k][r] * rhs.cols[c][k]).sum();
            }
        }
        Self { cols: out }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);

        let sum = a + b;
        assert_eq!(sum, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(a.dot(b), 32.0);
    }

    #[test]
    fn test_quaternion_normalize() {
        let q = Quaternion::new(0.0, 0.0, 3.0, 4.0).normalize_or_identity();
        assert!((q.length() - 1.0).abs() < 1e-6);
        assert!((q.z - 0.6).abs() < 1e-6);
        assert!((q.w - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_degenerate_quaternion_falls_back() {
        assert_eq!(Quaternion::new(0.0, 0.0, 0.0, 0.0).try_normalize(), None);
        assert_eq!(
            Quaternion::new(f32::NAN, 0.0, 0.0, 1.0).normalize_or_identity(),
            Quaternion::IDENTITY
        );
        assert_eq!(
            Quaternion::new(f32::INFINITY, 0.0, 0.0, 1.0).normalize_or_identity(),
            Quaternion::IDENTITY
        );
    }

    #[test]
    fn test_extreme_magnitudes_still_normalize() {
        let h = std::f32::consts::FRAC_1_SQRT_2;
        for scale in [1.0e20f32, 1.0e-7, 1.0e-30, f32::MAX, f32::MIN_POSITIVE * 0.5] {
            let q = Quaternion::new(scale, 0.0, 0.0, scale).try_normalize().unwrap();
            assert!((q.x - h).abs() < 1e-6, "scale {scale}: {q:?}");
            assert!((q.w - h).abs() < 1e-6, "scale {scale}: {q:?}");
            assert!((q.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_rotation_matrix_matches_quaternion_rotate() {
        // 90 degrees about Z
        let h = std::f32::consts::FRAC_1_SQRT_2;
        let q = Quaternion::new(0.0, 0.0, h, h);
        let p = Vec3::new(1.0, 0.0, 0.0);

        let by_quat = q.rotate(p);
        let by_mat = Mat4::from_quaternion(q).transform_point(p);

        assert!(approx(by_quat, Vec3::new(0.0, 1.0, 0.0)));
        assert!(approx(by_mat, by_quat));
    }

    #[test]
    fn test_matrix_composition_order() {
        let t = Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0));
        let s = Mat4::from_scale(Vec3::ONE * 2.0);

        // scale then translate vs translate then scale
        assert!(approx((t * s).transform_point(Vec3::ONE), Vec3::new(12.0, 2.0, 2.0)));
        assert!(approx((s * t).transform_point(Vec3::ONE), Vec3::new(22.0, 2.0, 2.0)));
        assert_eq!(Mat4::IDENTITY * t, t);
    }

    #[test]
    fn test_pod_sizes() {
        assert_eq!(bytemuck::bytes_of(&Vec3::ZERO).len(), 12);
        assert_eq!(bytemuck::bytes_of(&Quaternion::IDENTITY).len(), 16);
        assert_eq!(bytemuck::bytes_of(&Mat4::IDENTITY).len(), 64);
    }
}
