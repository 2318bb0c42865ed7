//! Edge split: insert a vertex part-way along an edge.

use tracing::debug;

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{EdgeId, FaceId, VertexId};

impl MeshData {
    /// Insert a vertex at parameter `t` (clamped to `[0, 1]`) from `v1`
    /// toward `v2` of `edge`.
    ///
    /// The vertex is spliced into every face that walks the edge, the old
    /// edge is replaced by two new ones, and the new vertex is returned.
    pub fn split_edge(&mut self, edge: EdgeId, t: f32) -> Result<VertexId> {
        let e = self.edge(edge).ok_or_else(|| MeshError::missing_edge(edge))?;
        let (a, b) = (e.v1, e.v2);
        let faces: Vec<FaceId> = e.face_ids.iter().copied().collect();

        let (pa, pb) = match (self.position(a), self.position(b)) {
            (Some(pa), Some(pb)) => (pa, pb),
            _ => {
                return Err(MeshError::InvalidTopology(format!(
                    "edge {} has a missing endpoint",
                    edge.0
                )));
            }
        };
        let mid = self.add_vertex(pa.lerp(pb, t.clamp(0.0, 1.0)));

        for face in &faces {
            let Some(old_loop) = self.face(*face).map(|f| f.vertex_ids.clone()) else {
                continue;
            };
            let n = old_loop.len();
            let mut new_loop = Vec::with_capacity(n + 1);
            for i in 0..n {
                let (x, y) = (old_loop[i], old_loop[(i + 1) % n]);
                new_loop.push(x);
                if (x == a && y == b) || (x == b && y == a) {
                    new_loop.push(mid);
                }
            }
            self.relink_face(*face, new_loop);
        }

        self.delete_edge(edge);
        self.add_edge(a, mid);
        self.add_edge(mid, b);

        debug!(
            "split_edge: {:?} at t={:.3} -> {:?}, {} face(s) updated",
            edge,
            t,
            mid,
            faces.len()
        );
        Ok(mid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::{grid, unit_quad};
    use glam::Vec3;

    #[test]
    fn test_split_quad_edge() {
        let (mut mesh, [v0, v1, v2, v3], face) = unit_quad();
        let e01 = mesh.edge_between(v0, v1).unwrap();

        let mid = mesh.split_edge(e01, 0.25).unwrap();
        assert_eq!(mesh.position(mid).unwrap(), Vec3::new(0.25, 0.0, 0.0));
        assert_eq!(mesh.face(face).unwrap().vertex_ids, vec![v0, mid, v1, v2, v3]);
        assert!(!mesh.contains_edge(e01));
        assert_eq!(mesh.edge_count(), 5);
        assert_eq!(mesh.vertex(mid).unwrap().degree(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_split_shared_edge_updates_both_faces() {
        let mut mesh = grid(2);
        let shared = mesh.edge_between(VertexId(1), VertexId(4)).unwrap();
        let mid = mesh.split_edge(shared, 0.5).unwrap();

        assert_eq!(mesh.vertex(mid).unwrap().face_ids.len(), 2);
        for face in &mesh.vertex(mid).unwrap().face_ids {
            assert_eq!(mesh.face(*face).unwrap().len(), 5);
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_split_wire_edge_and_missing_edge() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X * 2.0);
        let e = mesh.add_edge(a, b).unwrap();

        let mid = mesh.split_edge(e, 0.5).unwrap();
        assert_eq!(mesh.vertex_neighbors(mid).len(), 2);
        assert!(mesh.edge_between(a, b).is_none());
        assert!(mesh.validate().is_ok());

        assert!(matches!(
            mesh.split_edge(e, 0.5),
            Err(MeshError::MissingElement { .. })
        ));
    }
}
