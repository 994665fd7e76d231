//! CPU-side geometry descriptions handed to a [`Renderer`](crate::Renderer) for upload.

use glam::Vec3;

/// How the vertices of a [`Geometry`] are assembled into primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Topology {
    /// Indexed triangle list.
    Triangles,
    /// Connected polyline through every vertex in order.
    LineStrip,
    /// One point per vertex.
    Points,
}

/// Vertex positions, normals and (for triangles) indices.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub positions: Vec<[f32; 3]>,
    /// Per-vertex normals. Zero for lines and points.
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices. Empty for non-indexed topologies.
    pub indices: Vec<u32>,
    pub topology: Topology,
}

impl Geometry {
    /// UV sphere centered at the origin.
    ///
    /// `width_segments` runs around the equator, `height_segments` from pole
    /// to pole. Each is clamped to the smallest value that still encloses a
    /// volume (3 and 2).
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row_len = width_segments + 1;

        let vertex_count = (row_len * (height_segments + 1)) as usize;
        let mut positions = Vec::with_capacity(vertex_count);
        let mut normals = Vec::with_capacity(vertex_count);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let phi = v * std::f32::consts::PI;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let theta = u * std::f32::consts::TAU;
                let normal = Vec3::new(-theta.cos() * phi.sin(), phi.cos(), theta.sin() * phi.sin());
                positions.push((normal * radius).to_array());
                normals.push(normal.to_array());
            }
        }

        let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row_len + ix + 1;
                let b = iy * row_len + ix;
                let c = (iy + 1) * row_len + ix;
                let d = (iy + 1) * row_len + ix + 1;
                // Degenerate triangles at the poles are skipped.
                if iy != 0 {
                    indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        Self {
            positions,
            normals,
            indices,
            topology: Topology::Triangles,
        }
    }

    /// A point cloud with one point per position.
    pub fn points(positions: Vec<[f32; 3]>) -> Self {
        let normals = vec![[0.0; 3]; positions.len()];
        Self {
            positions,
            normals,
            indices: Vec::new(),
            topology: Topology::Points,
        }
    }

    /// A polyline visiting `points` in order.
    pub fn line_strip(points: &[Vec3]) -> Self {
        Self {
            positions: points.iter().map(|p| p.to_array()).collect(),
            normals: vec![[0.0; 3]; points.len()],
            indices: Vec::new(),
            topology: Topology::LineStrip,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of triangles, lines segments or points this geometry draws.
    pub fn primitive_count(&self) -> usize {
        match self.topology {
            Topology::Triangles => self.indices.len() / 3,
            Topology::LineStrip => self.positions.len().saturating_sub(1),
            Topology::Points => self.positions.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_lie_on_radius() {
        let sphere = Geometry::sphere(2.5, 24, 24);
        assert_eq!(sphere.vertex_count(), 25 * 25);
        for p in &sphere.positions {
            let len = Vec3::from_array(*p).length();
            assert!((len - 2.5).abs() < 1e-4, "vertex at distance {len}");
        }
    }

    #[test]
    fn test_sphere_normals_are_unit_and_outward() {
        let sphere = Geometry::sphere(3.0, 16, 12);
        for (p, n) in sphere.positions.iter().zip(&sphere.normals) {
            let n = Vec3::from_array(*n);
            assert!((n.length() - 1.0).abs() < 1e-5);
            assert!(n.dot(Vec3::from_array(*p)) > 0.0);
        }
    }

    #[test]
    fn test_sphere_triangle_count_skips_poles() {
        let sphere = Geometry::sphere(1.0, 32, 32);
        // Two triangles per quad, minus one per quad in the top and bottom rows.
        assert_eq!(sphere.primitive_count(), 32 * 32 * 2 - 2 * 32);
        let max = *sphere.indices.iter().max().unwrap() as usize;
        assert!(max < sphere.vertex_count());
    }

    #[test]
    fn test_sphere_clamps_degenerate_segments() {
        let sphere = Geometry::sphere(1.0, 0, 0);
        assert_eq!(sphere.vertex_count(), 4 * 3);
        assert!(sphere.primitive_count() > 0);
    }

    #[test]
    fn test_line_strip_segments() {
        let line = Geometry::line_strip(&[Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(line.topology, Topology::LineStrip);
        assert_eq!(line.primitive_count(), 2);
        assert!(line.indices.is_empty());
    }

    #[test]
    fn test_points_one_primitive_per_vertex() {
        let cloud = Geometry::points(vec![[0.0; 3]; 7]);
        assert_eq!(cloud.primitive_count(), 7);
        assert_eq!(cloud.normals.len(), 7);
    }
}
