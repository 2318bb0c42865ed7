//! Vertex merge (collapse N vertices into one).

use std::collections::BTreeSet;
use tracing::{debug, trace};

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{EditResult, EdgeId, FaceId, VertexId, collapse_loop};

impl MeshData {
    /// Collapse two or more vertices into the first one, placed at their
    /// centroid. Returns the surviving vertex.
    ///
    /// See [`MeshData::merge_vertices_tracked`] for the id bookkeeping.
    pub fn merge_vertices(&mut self, vertex_ids: &[VertexId]) -> Result<VertexId> {
        self.merge_vertices_tracked(vertex_ids).map(|(target, _)| target)
    }

    /// Merge vertices and report what was created and deleted.
    ///
    /// Missing ids are skipped. Edges between two merged vertices are
    /// deleted; an edge whose far endpoint the target already reaches is
    /// dropped as a duplicate; every other edge keeps its id and is
    /// re-pointed at the target. Faces touching a removed vertex get the
    /// target substituted in, consecutive duplicates collapsed, and are
    /// deleted if fewer than three distinct corners remain.
    pub fn merge_vertices_tracked(
        &mut self,
        vertex_ids: &[VertexId],
    ) -> Result<(VertexId, EditResult)> {
        let mut seen = BTreeSet::new();
        let live: Vec<VertexId> = vertex_ids
            .iter()
            .copied()
            .filter(|&v| self.contains_vertex(v) && seen.insert(v))
            .collect();

        if live.is_empty() {
            if let Some(&first) = vertex_ids.first() {
                return Err(MeshError::missing_vertex(first));
            }
        }
        if live.len() < 2 {
            return Err(MeshError::InvalidTopology(format!(
                "merge needs at least 2 live vertices, got {}",
                live.len()
            )));
        }

        let mark = self.id_mark();
        let target = live[0];
        let removed: BTreeSet<VertexId> = live[1..].iter().copied().collect();
        if let Some(centroid) = self.centroid_of(&live) {
            self.set_vertex_position(target, centroid);
        }

        // ===== PHASE 1: edges =====
        // Re-point what can be kept now; deletions wait until the faces that
        // use those edges have been rebuilt.
        let mut doomed_edges: Vec<EdgeId> = Vec::new();
        for &r in &removed {
            let incident: Vec<EdgeId> = self
                .vertex(r)
                .map(|v| v.edge_ids.iter().copied().collect())
                .unwrap_or_default();
            for edge in incident {
                let Some(far) = self.edge(edge).and_then(|e| e.other(r)) else {
                    continue;
                };
                if far == target || removed.contains(&far) {
                    doomed_edges.push(edge);
                } else if self.edge_between(target, far).is_some() {
                    trace!("merge: {:?} duplicates target edge toward {:?}", edge, far);
                    doomed_edges.push(edge);
                } else if !self.repoint_edge(edge, r, target) {
                    doomed_edges.push(edge);
                }
            }
        }

        // ===== PHASE 2: faces =====
        let touched: BTreeSet<FaceId> = removed
            .iter()
            .filter_map(|&r| self.vertex(r))
            .flat_map(|v| v.face_ids.iter().copied())
            .collect();

        let mut deleted_faces = Vec::new();
        for face in touched {
            let Some(old_loop) = self.face(face).map(|f| f.vertex_ids.clone()) else {
                continue;
            };
            let substituted: Vec<VertexId> = old_loop
                .iter()
                .map(|v| if removed.contains(v) { target } else { *v })
                .collect();
            let new_loop = collapse_loop(&substituted);
            let distinct: BTreeSet<VertexId> = new_loop.iter().copied().collect();

            if distinct.len() < 3 {
                trace!("merge: {:?} collapsed to {} corner(s)", face, new_loop.len());
                self.delete_face(face);
                deleted_faces.push(face);
            } else {
                self.relink_face(face, new_loop);
            }
        }

        // ===== PHASE 3: cleanup =====
        let mut deleted_edges = Vec::new();
        for edge in doomed_edges {
            if self.delete_edge(edge) {
                deleted_edges.push(edge);
            }
        }
        let mut deleted_vertices = Vec::new();
        for &r in &removed {
            if self.delete_vertex(r) {
                deleted_vertices.push(r);
            }
        }

        let mut result = EditResult {
            created_edges: self.edges_since(mark),
            deleted_vertices,
            deleted_edges,
            deleted_faces,
            ..Default::default()
        };
        result.normalize();

        debug!(
            "merge_vertices: {} into {:?}, {} edge(s) and {} face(s) removed",
            removed.len(),
            target,
            result.deleted_edges.len(),
            result.deleted_faces.len()
        );
        Ok((target, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::{grid, triangle, unit_quad};
    use glam::Vec3;

    #[test]
    fn test_merge_quad_corner_pair() {
        let (mut mesh, [v0, v1, v2, v3], face) = unit_quad();
        let merged = mesh.merge_vertices(&[v0, v1]).unwrap();

        assert_eq!(merged, v0);
        assert_eq!(mesh.position(merged).unwrap(), Vec3::new(0.5, 0.0, 0.0));
        assert_eq!(mesh.face(face).unwrap().vertex_ids, vec![merged, v2, v3]);
        assert_eq!(mesh.face(face).unwrap().edge_ids.len(), 3);
        assert_eq!(mesh.edge_count(), 3);
        assert!(!mesh.contains_vertex(v1));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_whole_triangle() {
        let (mut mesh, [a, b, c], face) = triangle();
        let (merged, result) = mesh.merge_vertices_tracked(&[a, b, c]).unwrap();

        assert_eq!(merged, a);
        assert!(!mesh.contains_face(face));
        assert_eq!(result.deleted_faces, vec![face]);
        assert_eq!(result.deleted_vertices, vec![b, c]);
        assert_eq!(result.deleted_edges.len(), 3);
        assert_eq!(mesh.edge_count(), 0);
        assert!(mesh.edge_between(a, b).is_none());
        assert!(mesh.vertex(a).unwrap().is_orphan());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_keeps_edge_ids_when_repointing() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        let far = mesh.add_vertex(Vec3::Y);
        let wire = mesh.add_edge(b, far).unwrap();

        let merged = mesh.merge_vertices(&[a, b]).unwrap();
        assert_eq!(mesh.edge_between(merged, far), Some(wire));
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_grid_neighbours() {
        let mut mesh = grid(2);
        let (merged, result) = mesh
            .merge_vertices_tracked(&[VertexId(3), VertexId(4)])
            .unwrap();

        assert_eq!(merged, VertexId(3));
        // The two faces on the merged edge become triangles, none vanish
        assert!(result.deleted_faces.is_empty());
        assert_eq!(result.deleted_edges.len(), 1);
        assert_eq!(mesh.face(FaceId(0)).unwrap().len(), 3);
        assert_eq!(mesh.face(FaceId(2)).unwrap().len(), 3);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_drops_duplicate_edges() {
        // Opposite corners of a grid cell both reach vertices 1 and 3
        let mut mesh = grid(2);
        let (_, result) = mesh
            .merge_vertices_tracked(&[VertexId(0), VertexId(4)])
            .unwrap();

        assert_eq!(result.deleted_edges.len(), 2);
        assert_eq!(mesh.edge_count(), 10);
        assert_eq!(mesh.vertex_neighbors(VertexId(0)).len(), 4);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_needs_two_live_vertices() {
        let (mut mesh, [v0, ..], _) = unit_quad();
        assert!(matches!(
            mesh.merge_vertices(&[v0, VertexId(99)]),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            mesh.merge_vertices(&[VertexId(98), VertexId(99)]),
            Err(MeshError::MissingElement { .. })
        ));
        assert!(mesh.validate().is_ok());
    }
}
