//! # Render Adapter
//!
//! Turns a [`PoseSnapshot`] into one wireframe draw call per hand. The
//! host supplies the actual drawing through [`DrawTarget`].
//!
//! ## Transform
//!
//! ```text
//! world = scene * translate(hand.position) * rotate(hand.orientation)
//! scene = scale(2) * translate(300, 300, 0)
//! ```

mod mesh;
mod targets;

pub use mesh::WireMesh;
pub use targets::{DrawCall, LogTarget, RecordingTarget};

use handosc_core::{Hand, Mat4, PoseSnapshot, Vec3};

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
}

impl Color {
    /// Creates a color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Marker color for the right hand.
pub const RIGHT_HAND_COLOR: Color = Color::rgb(100, 255, 200);
/// Marker color for the left hand.
pub const LEFT_HAND_COLOR: Color = Color::rgb(255, 100, 100);

/// Something that can draw line-list meshes.
pub trait DrawTarget {
    /// Draws every edge of `mesh` transformed by `transform`.
    fn draw_lines(&mut self, mesh: &WireMesh, transform: &Mat4, color: Color);
}

/// Draws both hand markers from a snapshot.
#[derive(Clone, Debug)]
pub struct RenderAdapter {
    mesh: WireMesh,
    scene: Mat4,
}

impl RenderAdapter {
    /// Creates an adapter whose hand cubes have edge length `mesh_scale`.
    #[must_use]
    pub fn new(mesh_scale: f32) -> Self {
        Self {
            mesh: WireMesh::cube(mesh_scale),
            scene: Self::default_scene(),
        }
    }

    /// Scale by 2, then shift by (300, 300, 0) in the scaled frame.
    ///
    /// Matrix-stack order: the shift is post-multiplied, so it is scaled
    /// too and the scene origin lands at (600, 600, 0).
    #[must_use]
    pub fn default_scene() -> Mat4 {
        Mat4::from_scale(Vec3::new(2.0, 2.0, 2.0)) * Mat4::from_translation(Vec3::new(300.0, 300.0, 0.0))
    }

    /// Replaces the scene transform.
    #[must_use]
    pub fn with_scene(mut self, scene: Mat4) -> Self {
        self.scene = scene;
        self
    }

    /// The hand marker mesh.
    #[must_use]
    pub const fn mesh(&self) -> &WireMesh {
        &self.mesh
    }

    /// World transform for one hand.
    #[must_use]
    pub fn hand_transform(&self, snapshot: &PoseSnapshot, hand: Hand) -> Mat4 {
        let pose = snapshot.get(hand);
        self.scene * Mat4::from_rotation_translation(pose.orientation, pose.position)
    }

    /// Issues one draw call per hand, right first.
    pub fn render<T: DrawTarget + ?Sized>(&self, snapshot: &PoseSnapshot, target: &mut T) {
        for (hand, color) in [(Hand::Right, RIGHT_HAND_COLOR), (Hand::Left, LEFT_HAND_COLOR)] {
            let transform = self.hand_transform(snapshot, hand);
            target.draw_lines(&self.mesh, &transform, color);
        }
    }
}

impl Default for RenderAdapter {
    fn default() -> Self {
        Self::new(100.0)
    }
}

#[cfg(test)]
mod tests {
    use handosc_core::{PoseStore, Quaternion};

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_identity_poses_land_at_scene_origin() {
        let adapter = RenderAdapter::default();
        let mut target = RecordingTarget::default();
        adapter.render(&PoseSnapshot::default(), &mut target);

        assert_eq!(target.calls.len(), 2);
        assert_eq!(target.calls[0].color, RIGHT_HAND_COLOR);
        assert_eq!(target.calls[1].color, LEFT_HAND_COLOR);
        for call in &target.calls {
            assert!(approx(call.transform.translation(), Vec3::new(600.0, 600.0, 0.0)));
            assert_eq!(call.edges, 12);
        }
    }

    #[test]
    fn test_scene_shift_is_scaled_with_the_hand() {
        let mut store = PoseStore::new();
        store.set_position(Hand::Right, Vec3::new(1.0, -2.0, 3.0));

        let adapter = RenderAdapter::default();
        let t = adapter.hand_transform(&store.snapshot(), Hand::Right);
        // 2 * ((300, 300, 0) + (1, -2, 3))
        assert!(approx(t.translation(), Vec3::new(602.0, 596.0, 6.0)));
    }

    #[test]
    fn test_default_scene_scales_before_shifting() {
        let scene = RenderAdapter::default_scene();
        assert!(approx(scene.transform_point(Vec3::ZERO), Vec3::new(600.0, 600.0, 0.0)));
        assert!(approx(scene.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(602.0, 600.0, 0.0)));
    }

    #[test]
    fn test_rotation_applies_before_translation() {
        let mut store = PoseStore::new();
        // 90 degrees about Z.
        let half = std::f32::consts::FRAC_1_SQRT_2;
        store.set_orientation(Hand::Left, Quaternion::new(0.0, 0.0, half, half));
        store.set_position(Hand::Left, Vec3::new(10.0, 0.0, 0.0));

        let adapter = RenderAdapter::new(1.0).with_scene(Mat4::IDENTITY);
        let t = adapter.hand_transform(&store.snapshot(), Hand::Left);

        assert!(approx(t.transform_point(Vec3::new(1.0, 0.0, 0.0)), Vec3::new(10.0, 1.0, 0.0)));
    }

    #[test]
    fn test_mesh_scale() {
        let adapter = RenderAdapter::new(50.0);
        assert!(adapter.mesh().vertices.iter().all(|v| v.x.abs() == 25.0));
    }
}
