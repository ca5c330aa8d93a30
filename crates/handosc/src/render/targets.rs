//! Headless draw targets.

use handosc_core::{Mat4, Vec3};

use super::{Color, DrawTarget, WireMesh};

/// One recorded `draw_lines` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawCall {
    /// Transform the mesh was drawn with.
    pub transform: Mat4,
    /// Color it was drawn in.
    pub color: Color,
    /// Edges in the mesh.
    pub edges: usize,
}

/// Keeps every draw call for later inspection.
#[derive(Clone, Debug, Default)]
pub struct RecordingTarget {
    /// Calls in the order they were made.
    pub calls: Vec<DrawCall>,
}

impl RecordingTarget {
    /// Forgets recorded calls.
    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl DrawTarget for RecordingTarget {
    fn draw_lines(&mut self, mesh: &WireMesh, transform: &Mat4, color: Color) {
        self.calls.push(DrawCall {
            transform: *transform,
            color,
            edges: mesh.edge_count(),
        });
    }
}

/// Logs where each marker would be drawn, at TRACE.
///
/// Used by the headless receiver in place of a window.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogTarget {
    calls: u64,
}

impl LogTarget {
    /// Draw calls seen so far.
    #[must_use]
    pub const fn draw_calls(&self) -> u64 {
        self.calls
    }
}

impl DrawTarget for LogTarget {
    fn draw_lines(&mut self, mesh: &WireMesh, transform: &Mat4, color: Color) {
        self.calls += 1;
        let Vec3 { x, y, z } = transform.translation();
        tracing::trace!(
            "draw {} edges rgb({}, {}, {}) at ({:.1}, {:.1}, {:.1})",
            mesh.edge_count(),
            color.r,
            color.g,
            color.b,
            x,
            y,
            z
        );
    }
}
