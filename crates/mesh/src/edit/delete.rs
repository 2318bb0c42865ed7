//! Element-type and selection-scoped delete.

use std::collections::BTreeSet;
use tracing::debug;

use crate::error::Result;
use crate::graph::MeshData;
use crate::types::{EditResult, EdgeId, FaceId, Selection, VertexId};

/// Which elements a selection delete treats as the named set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DeleteMode {
    Vertices,
    Edges,
    Faces,
}

/// Bookkeeping shared by the delete flavours
#[derive(Default)]
struct DeletePass {
    deleted_faces: Vec<FaceId>,
    deleted_edges: Vec<EdgeId>,
    deleted_vertices: Vec<VertexId>,
    edge_candidates: BTreeSet<EdgeId>,
    vertex_candidates: BTreeSet<VertexId>,
}

impl DeletePass {
    fn delete_face(&mut self, mesh: &mut MeshData, face: FaceId, sweep_edges: bool) {
        let Some(f) = mesh.face(face) else {
            return;
        };
        if sweep_edges {
            self.edge_candidates.extend(f.edge_ids.iter().copied());
            self.vertex_candidates.extend(f.vertex_ids.iter().copied());
        }
        if mesh.delete_face(face) {
            self.deleted_faces.push(face);
        }
    }

    /// Delete an edge and the faces that would otherwise dangle. Those faces'
    /// other edges are not sweep candidates.
    fn delete_edge(&mut self, mesh: &mut MeshData, edge: EdgeId) {
        let Some(e) = mesh.edge(edge) else {
            return;
        };
        let faces: Vec<FaceId> = e.face_ids.iter().copied().collect();
        self.vertex_candidates.insert(e.v1);
        self.vertex_candidates.insert(e.v2);
        for face in faces {
            self.delete_face(mesh, face, false);
        }
        if mesh.delete_edge(edge) {
            self.deleted_edges.push(edge);
        }
    }

    /// Delete a vertex with its edges and faces
    fn delete_vertex(&mut self, mesh: &mut MeshData, vertex: VertexId) {
        let Some(v) = mesh.vertex(vertex) else {
            return;
        };
        let faces: Vec<FaceId> = v.face_ids.iter().copied().collect();
        let edges: Vec<EdgeId> = v.edge_ids.iter().copied().collect();
        for face in faces {
            self.delete_face(mesh, face, false);
        }
        for edge in edges {
            self.delete_edge(mesh, edge);
        }
        self.vertex_candidates.remove(&vertex);
        if mesh.delete_vertex(vertex) {
            self.deleted_vertices.push(vertex);
        }
    }

    fn finish(mut self, mesh: &mut MeshData) -> EditResult {
        let (swept_edges, swept_vertices) =
            mesh.sweep_orphans(self.edge_candidates, self.vertex_candidates);
        self.deleted_edges.extend(swept_edges);
        self.deleted_vertices.extend(swept_vertices);

        let mut result = EditResult {
            deleted_vertices: self.deleted_vertices,
            deleted_edges: self.deleted_edges,
            deleted_faces: self.deleted_faces,
            ..Default::default()
        };
        result.normalize();
        result
    }
}

impl MeshData {
    /// Delete exactly the named vertices, with the edges and faces that
    /// would dangle without them.
    ///
    /// Far endpoints left with nothing attached are swept. The other edges
    /// of removed faces stay behind as boundary or wire edges.
    pub fn delete_vertices(&mut self, vertices: &[VertexId]) -> Result<EditResult> {
        self.require_vertices(vertices)?;
        let mut pass = DeletePass::default();
        for &v in vertices {
            pass.delete_vertex(self, v);
        }
        let result = pass.finish(self);
        log_delete("delete_vertices", &result);
        Ok(result)
    }

    /// Delete exactly the named edges and the faces they border.
    ///
    /// Endpoints left with nothing attached are swept.
    pub fn delete_edges(&mut self, edges: &[EdgeId]) -> Result<EditResult> {
        self.require_edges(edges)?;
        let mut pass = DeletePass::default();
        for &e in edges {
            pass.delete_edge(self, e);
        }
        let result = pass.finish(self);
        log_delete("delete_edges", &result);
        Ok(result)
    }

    /// Delete the named faces, then sweep the edges and vertices that only
    /// they used.
    pub fn delete_faces(&mut self, faces: &[FaceId]) -> Result<EditResult> {
        self.require_faces(faces)?;
        let mut pass = DeletePass::default();
        for &f in faces {
            pass.delete_face(self, f, true);
        }
        let result = pass.finish(self);
        log_delete("delete_faces", &result);
        Ok(result)
    }

    /// Vertex-mode selection delete.
    ///
    /// Faces fully inside the selection go first, and everything they used
    /// is swept for orphans. Then the selected vertices go as in
    /// [`MeshData::delete_vertices`].
    pub fn delete_selection_vertices(&mut self, selection: &Selection) -> Result<EditResult> {
        self.delete_selection(selection, DeleteMode::Vertices)
    }

    /// Edge-mode selection delete; see [`MeshData::delete_selection_vertices`].
    pub fn delete_selection_edges(&mut self, selection: &Selection) -> Result<EditResult> {
        self.delete_selection(selection, DeleteMode::Edges)
    }

    /// Face-mode selection delete; see [`MeshData::delete_selection_vertices`].
    pub fn delete_selection_faces(&mut self, selection: &Selection) -> Result<EditResult> {
        self.delete_selection(selection, DeleteMode::Faces)
    }

    fn delete_selection(&mut self, selection: &Selection, mode: DeleteMode) -> Result<EditResult> {
        self.require_vertices(&selection.vertices)?;
        self.require_edges(&selection.edges)?;
        self.require_faces(&selection.faces)?;

        let covered = self.selection_vertex_set(selection);
        let contained: Vec<FaceId> = self
            .faces()
            .filter(|f| f.vertex_ids.iter().all(|v| covered.contains(v)))
            .map(|f| f.id)
            .collect();

        let mut pass = DeletePass::default();
        for face in contained {
            pass.delete_face(self, face, true);
        }
        match mode {
            DeleteMode::Vertices => {
                for &v in &selection.vertices {
                    pass.delete_vertex(self, v);
                }
            }
            DeleteMode::Edges => {
                for &e in &selection.edges {
                    pass.delete_edge(self, e);
                }
            }
            DeleteMode::Faces => {
                for &f in &selection.faces {
                    pass.delete_face(self, f, true);
                }
            }
        }

        let result = pass.finish(self);
        log_delete("delete_selection", &result);
        Ok(result)
    }

    /// Selected vertices plus the endpoints of selected edges and the
    /// corners of selected faces
    pub(crate) fn selection_vertex_set(&self, selection: &Selection) -> BTreeSet<VertexId> {
        let mut covered = selection.vertices.clone();
        for e in selection.edges.iter().filter_map(|&e| self.edge(e)) {
            covered.insert(e.v1);
            covered.insert(e.v2);
        }
        for f in selection.faces.iter().filter_map(|&f| self.face(f)) {
            covered.extend(f.vertex_ids.iter().copied());
        }
        covered
    }
}

fn log_delete(op: &str, result: &EditResult) {
    debug!(
        "{}: removed {} vertex(es), {} edge(s), {} face(s)",
        op,
        result.deleted_vertices.len(),
        result.deleted_edges.len(),
        result.deleted_faces.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeshError;
    use crate::graph::test_fixtures::{grid, unit_quad};

    #[test]
    fn test_delete_faces_sweeps_unshared_elements() {
        let mut mesh = grid(2);
        let result = mesh.delete_faces(&[FaceId(0)]).unwrap();

        assert_eq!(result.deleted_faces, vec![FaceId(0)]);
        // Only the corner vertex and its two edges were exclusive to face 0
        assert_eq!(result.deleted_vertices, vec![VertexId(0)]);
        assert_eq!(result.deleted_edges.len(), 2);
        assert_eq!(mesh.face_count(), 3);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_delete_center_vertex_keeps_outer_ring() {
        let mut mesh = grid(2);
        let result = mesh.delete_vertices(&[VertexId(4)]).unwrap();

        assert_eq!(result.deleted_vertices, vec![VertexId(4)]);
        assert_eq!(result.deleted_faces.len(), 4);
        assert_eq!(result.deleted_edges.len(), 4);
        assert_eq!(mesh.vertex_count(), 8);
        assert_eq!(mesh.edge_count(), 8);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_delete_edge_removes_bordering_faces() {
        let (mut mesh, [v0, v1, ..], _) = unit_quad();
        let e = mesh.edge_between(v0, v1).unwrap();
        let result = mesh.delete_edges(&[e]).unwrap();

        assert_eq!(result.deleted_faces.len(), 1);
        assert_eq!(result.deleted_edges, vec![e]);
        assert!(result.deleted_vertices.is_empty());
        assert_eq!(mesh.edge_count(), 3);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_missing_id_aborts_without_mutation() {
        let (mut mesh, [v0, ..], _) = unit_quad();
        let before = mesh.to_snapshot();
        assert!(matches!(
            mesh.delete_vertices(&[v0, VertexId(42)]),
            Err(MeshError::MissingElement { .. })
        ));
        assert_eq!(mesh.to_snapshot(), before);
    }

    #[test]
    fn test_selection_delete_removes_contained_faces() {
        let mut mesh = grid(2);
        // The bottom row of vertices plus the middle row encloses faces 0 and 1
        let selection = Selection::from_vertices((0..6).map(VertexId));
        let result = mesh.delete_selection_vertices(&selection).unwrap();

        assert_eq!(result.deleted_vertices.len(), 6);
        assert_eq!(mesh.face_count(), 0);
        // The top row keeps its two edges
        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.edge_count(), 2);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_selection_delete_edges_takes_enclosed_face_and_neighbours() {
        let mut mesh = grid(2);
        let ring = [(0, 1), (1, 4), (4, 3), (3, 0)];
        let selection = Selection {
            edges: ring
                .iter()
                .map(|&(a, b)| mesh.edge_between(VertexId(a), VertexId(b)).unwrap())
                .collect(),
            ..Default::default()
        };
        let result = mesh.delete_selection_edges(&selection).unwrap();

        // Face 0 is enclosed; faces 1 and 2 would dangle without their edges
        assert_eq!(result.deleted_faces, vec![FaceId(0), FaceId(1), FaceId(2)]);
        assert_eq!(result.deleted_edges.len(), 4);
        assert_eq!(result.deleted_vertices, vec![VertexId(0)]);
        assert_eq!(mesh.face_count(), 1);
        assert_eq!(mesh.edge_count(), 8);
        assert_eq!(mesh.vertex_count(), 8);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_selection_delete_faces_sweeps_everything_inside() {
        let mut mesh = grid(2);
        let faces = Selection::from_faces(mesh.face_ids());
        let result = mesh.delete_selection_faces(&faces).unwrap();

        assert_eq!(result.deleted_faces.len(), 4);
        assert_eq!(result.deleted_edges.len(), 12);
        assert_eq!(result.deleted_vertices.len(), 9);
        assert!(mesh.is_empty());
    }
}
