//! Line-list meshes for the hand markers.

use handosc_core::Vec3;

/// Vertices plus line-list indices (two per edge).
#[derive(Clone, Debug, PartialEq)]
pub struct WireMesh {
    /// Model-space vertices.
    pub vertices: Vec<Vec3>,
    /// Pairs of vertex indices, one pair per edge.
    pub indices: Vec<u16>,
}

impl WireMesh {
    /// Axis-aligned cube of edge length `size`, centered on the origin.
    ///
    /// ```text
    ///     6────────7
    ///    /│       /│
    ///   2────────3 │
    ///   │ 4──────│─5
    ///   │/       │/
    ///   0────────1
    /// ```
    #[must_use]
    pub fn cube(size: f32) -> Self {
        let h = size * 0.5;
        let vertices = (0..8u8)
            .map(|i| {
                let pick = |bit: u8| if i & bit == 0 { -h } else { h };
                Vec3::new(pick(1), pick(2), pick(4))
            })
            .collect();

        #[rustfmt::skip]
        let indices = vec![
            // front face (z = -h)
            0, 1, 1, 3, 3, 2, 2, 0,
            // back face (z = +h)
            4, 5, 5, 7, 7, 6, 6, 4,
            // front to back
            0, 4, 1, 5, 2, 6, 3, 7,
        ];

        Self { vertices, indices }
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.indices.len() / 2
    }

    /// Iterates edges as vertex pairs.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        self.indices
            .chunks_exact(2)
            .map(|e| (self.vertices[usize::from(e[0])], self.vertices[usize::from(e[1])]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_shape() {
        let cube = WireMesh::cube(2.0);
        assert_eq!(cube.vertices.len(), 8);
        assert_eq!(cube.indices.len(), 24);
        assert_eq!(cube.edge_count(), 12);
        assert!(cube.vertices.iter().all(|v| v.x.abs() == 1.0 && v.y.abs() == 1.0 && v.z.abs() == 1.0));
    }

    #[test]
    fn test_edges_are_axis_aligned_and_full_length() {
        let cube = WireMesh::cube(3.0);
        for (a, b) in cube.edges() {
            let d = b - a;
            assert!((d.length() - 3.0).abs() < 1e-6);
            let nonzero = [d.x, d.y, d.z].iter().filter(|c| **c != 0.0).count();
            assert_eq!(nonzero, 1);
        }
    }

    #[test]
    fn test_centered() {
        let cube = WireMesh::cube(10.0);
        let sum = cube.vertices.iter().fold(Vec3::ZERO, |acc, v| acc + *v);
        assert_eq!(sum, Vec3::ZERO);
    }
}
