//! Construction methods for MeshData.

use glam::Vec3;
use tracing::debug;

use super::MeshData;
use crate::error::{MeshError, Result};
use crate::types::{VertexId, collapse_loop};

impl MeshData {
    /// Build a mesh from a position list and polygons indexing into it.
    ///
    /// Vertex ids are assigned in position order, so index `i` becomes
    /// `VertexId(i)`. Repeated consecutive indices are collapsed; a polygon
    /// that ends up with fewer than three distinct corners is rejected.
    pub fn from_polygons(positions: &[Vec3], polygons: &[Vec<u32>]) -> Result<Self> {
        let mut mesh = Self::new();
        let ids: Vec<VertexId> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();

        for (index, polygon) in polygons.iter().enumerate() {
            let mut loop_ids = Vec::with_capacity(polygon.len());
            for &i in polygon {
                let id = ids.get(i as usize).copied().ok_or_else(|| {
                    MeshError::InvalidTopology(format!(
                        "polygon {index} references position {i} of {}",
                        positions.len()
                    ))
                })?;
                loop_ids.push(id);
            }

            let loop_ids = collapse_loop(&loop_ids);
            if loop_ids.len() < 3 {
                return Err(MeshError::DegenerateResult(format!(
                    "polygon {index} has fewer than 3 distinct corners"
                )));
            }
            // Every id is live, so add_face cannot fail here
            mesh.add_face(&loop_ids);
        }

        debug!(
            "from_polygons: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    /// Flat grid of `cols x rows` quads in the XY plane, centered on the
    /// origin and `size` units wide along X.
    ///
    /// Vertices are laid out row-major from the -X/-Y corner; faces wind
    /// counter-clockwise seen from +Z.
    pub fn plane_grid(cols: u32, rows: u32, size: f32) -> Self {
        let mut mesh = Self::new();
        let cols = cols.max(1);
        let rows = rows.max(1);
        let step = size / cols as f32;
        let origin = Vec3::new(-size * 0.5, -step * rows as f32 * 0.5, 0.0);

        let mut ids = Vec::with_capacity(((cols + 1) * (rows + 1)) as usize);
        for y in 0..=rows {
            for x in 0..=cols {
                ids.push(mesh.add_vertex(origin + Vec3::new(x as f32 * step, y as f32 * step, 0.0)));
            }
        }

        let stride = (cols + 1) as usize;
        for y in 0..rows as usize {
            for x in 0..cols as usize {
                let v0 = ids[y * stride + x];
                let v1 = ids[y * stride + x + 1];
                let v2 = ids[(y + 1) * stride + x + 1];
                let v3 = ids[(y + 1) * stride + x];
                mesh.add_face(&[v0, v1, v2, v3]);
            }
        }
        mesh
    }

    /// Axis-aligned cube of quads with outward-facing winding
    pub fn cube(half_extent: f32) -> Self {
        let h = half_extent;
        let positions = [
            Vec3::new(-h, -h, -h),
            Vec3::new(h, -h, -h),
            Vec3::new(h, h, -h),
            Vec3::new(-h, h, -h),
            Vec3::new(-h, -h, h),
            Vec3::new(h, -h, h),
            Vec3::new(h, h, h),
            Vec3::new(-h, h, h),
        ];
        const QUADS: [[usize; 4]; 6] = [
            [0, 3, 2, 1], // -Z
            [4, 5, 6, 7], // +Z
            [0, 1, 5, 4], // -Y
            [2, 3, 7, 6], // +Y
            [0, 4, 7, 3], // -X
            [1, 2, 6, 5], // +X
        ];

        let mut mesh = Self::new();
        let ids: Vec<VertexId> = positions.iter().map(|&p| mesh.add_vertex(p)).collect();
        for quad in QUADS {
            mesh.add_face(&quad.map(|i| ids[i]));
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_grid_counts() {
        let mesh = MeshData::plane_grid(3, 2, 3.0);
        assert_eq!(mesh.vertex_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        // 3 * 3 horizontal + 4 * 2 vertical
        assert_eq!(mesh.edge_count(), 17);
        assert!(mesh.validate().is_ok());
        for face in mesh.face_ids() {
            let n = mesh.face_normal(face).unwrap();
            assert!(n.z > 0.99);
        }
    }

    #[test]
    fn test_cube_is_closed_and_outward() {
        let mesh = MeshData::cube(1.0);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 12);
        assert_eq!(mesh.face_count(), 6);
        assert!(mesh.edges().all(|e| e.face_ids.len() == 2));
        for face in mesh.face_ids() {
            let n = mesh.face_normal(face).unwrap();
            let c = mesh.face_centroid(face).unwrap();
            assert!(n.dot(c) > 0.0, "face {:?} points inward", face);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_from_polygons_shares_edges() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y];
        let mesh = MeshData::from_polygons(&positions, &[vec![0, 1, 2], vec![0, 2, 3]]).unwrap();
        assert_eq!(mesh.face_count(), 2);
        assert_eq!(mesh.edge_count(), 5);
        let diagonal = mesh.edge_between(VertexId(0), VertexId(2)).unwrap();
        assert_eq!(mesh.edge(diagonal).unwrap().face_ids.len(), 2);
    }

    #[test]
    fn test_from_polygons_rejects_bad_input() {
        let positions = [Vec3::ZERO, Vec3::X, Vec3::Y];
        assert!(matches!(
            MeshData::from_polygons(&positions, &[vec![0, 1, 5]]),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            MeshData::from_polygons(&positions, &[vec![0, 1, 1, 0]]),
            Err(MeshError::DegenerateResult(_))
        ));
    }
}
