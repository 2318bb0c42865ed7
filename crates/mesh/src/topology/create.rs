//! Face and edge creation from user-picked vertex loops.

use tracing::{debug, warn};

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{EdgeOrFace, FaceId, VertexId, collapse_loop};

impl MeshData {
    /// Create a face from an ordered vertex loop.
    ///
    /// Missing ids are skipped. Fails with `InvalidTopology` when fewer than
    /// three ids name live vertices, and with `DegenerateResult` when the
    /// loop has fewer than three corners once consecutive duplicates
    /// (including across the wrap) are collapsed.
    pub fn create_face_from_vertices(&mut self, vertex_ids: &[VertexId]) -> Result<FaceId> {
        let live: Vec<VertexId> = vertex_ids
            .iter()
            .copied()
            .filter(|&v| self.contains_vertex(v))
            .collect();
        if live.len() < vertex_ids.len() {
            warn!(
                "create_face_from_vertices: skipping {} missing vertex id(s)",
                vertex_ids.len() - live.len()
            );
        }
        if live.len() < 3 {
            return Err(MeshError::InvalidTopology(format!(
                "a face needs at least 3 vertices, got {}",
                live.len()
            )));
        }

        let loop_ids = collapse_loop(&live);
        if loop_ids.len() < 3 {
            return Err(MeshError::DegenerateResult(format!(
                "loop collapses to {} distinct corner(s)",
                loop_ids.len()
            )));
        }

        let face = self
            .add_face(&loop_ids)
            .ok_or_else(|| MeshError::InvalidTopology("face vertices vanished".to_string()))?;
        debug!("create_face_from_vertices: {:?} with {} corners", face, loop_ids.len());
        Ok(face)
    }

    /// Connect two vertices with an edge, or three or more with a face.
    pub fn create_edge_face_from_vertices(&mut self, vertex_ids: &[VertexId]) -> Result<EdgeOrFace> {
        match vertex_ids {
            [a, b] => {
                for &v in [a, b] {
                    if !self.contains_vertex(v) {
                        return Err(MeshError::missing_vertex(v));
                    }
                }
                if a == b {
                    return Err(MeshError::DegenerateResult(
                        "cannot connect a vertex to itself".to_string(),
                    ));
                }
                let edge = self
                    .add_edge(*a, *b)
                    .ok_or_else(|| MeshError::InvalidTopology("edge endpoints vanished".to_string()))?;
                Ok(EdgeOrFace::Edge(edge))
            }
            ids if ids.len() >= 3 => self.create_face_from_vertices(ids).map(EdgeOrFace::Face),
            ids => Err(MeshError::InvalidTopology(format!(
                "need 2 vertices for an edge or 3+ for a face, got {}",
                ids.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn four_points() -> (MeshData, Vec<VertexId>) {
        let mut mesh = MeshData::new();
        let ids = [Vec3::ZERO, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::Y]
            .into_iter()
            .map(|p| mesh.add_vertex(p))
            .collect();
        (mesh, ids)
    }

    #[test]
    fn test_create_face_skips_missing_ids() {
        let (mut mesh, ids) = four_points();
        let face = mesh
            .create_face_from_vertices(&[ids[0], VertexId(50), ids[1], ids[2]])
            .unwrap();
        assert_eq!(mesh.face(face).unwrap().vertex_ids, vec![ids[0], ids[1], ids[2]]);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_create_face_errors() {
        let (mut mesh, ids) = four_points();
        assert!(matches!(
            mesh.create_face_from_vertices(&[ids[0], ids[1], VertexId(9)]),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            mesh.create_face_from_vertices(&[ids[0], ids[1], ids[1], ids[0]]),
            Err(MeshError::DegenerateResult(_))
        ));
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn test_create_edge_or_face() {
        let (mut mesh, ids) = four_points();

        let edge = mesh.create_edge_face_from_vertices(&ids[..2]).unwrap();
        assert!(matches!(edge, EdgeOrFace::Edge(_)));
        assert_eq!(mesh.face_count(), 0);

        let face = mesh.create_edge_face_from_vertices(&ids).unwrap();
        assert!(matches!(face, EdgeOrFace::Face(_)));
        // The earlier edge is reused by the face
        assert_eq!(mesh.edge_count(), 4);

        assert!(matches!(
            mesh.create_edge_face_from_vertices(&ids[..1]),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            mesh.create_edge_face_from_vertices(&[ids[0], VertexId(40)]),
            Err(MeshError::MissingElement { .. })
        ));
    }
}
