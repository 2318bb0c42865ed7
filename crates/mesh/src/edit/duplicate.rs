//! Duplicate selected geometry in place.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::Result;
use crate::graph::MeshData;
use crate::types::{DuplicateResult, EditResult, EdgeId, FaceId, VertexId};

impl MeshData {
    /// Copy the selected vertices, plus every edge and face whose vertices
    /// are all selected.
    pub fn duplicate_selection_vertices(&mut self, vertices: &[VertexId]) -> Result<DuplicateResult> {
        self.require_vertices(vertices)?;
        let selected: BTreeSet<VertexId> = vertices.iter().copied().collect();

        let edges: Vec<EdgeId> = self
            .edges()
            .filter(|e| selected.contains(&e.v1) && selected.contains(&e.v2))
            .map(|e| e.id)
            .collect();
        let faces: Vec<FaceId> = self
            .faces()
            .filter(|f| f.vertex_ids.iter().all(|v| selected.contains(v)))
            .map(|f| f.id)
            .collect();

        Ok(self.duplicate_parts(&selected, &edges, &faces))
    }

    /// Copy the selected edges with their endpoints, plus every face whose
    /// edges are all selected.
    pub fn duplicate_selection_edges(&mut self, edges: &[EdgeId]) -> Result<DuplicateResult> {
        self.require_edges(edges)?;
        let selected: BTreeSet<EdgeId> = edges.iter().copied().collect();

        let mut vertices = BTreeSet::new();
        let mut candidate_faces = BTreeSet::new();
        for e in selected.iter().filter_map(|&e| self.edge(e)) {
            vertices.insert(e.v1);
            vertices.insert(e.v2);
            candidate_faces.extend(e.face_ids.iter().copied());
        }
        let faces: Vec<FaceId> = candidate_faces
            .into_iter()
            .filter(|&f| {
                self.face(f)
                    .is_some_and(|face| face.edge_ids.is_subset(&selected))
            })
            .collect();
        let edges: Vec<EdgeId> = selected.into_iter().collect();

        Ok(self.duplicate_parts(&vertices, &edges, &faces))
    }

    /// Copy the selected faces with their vertices and edges.
    pub fn duplicate_selection_faces(&mut self, faces: &[FaceId]) -> Result<DuplicateResult> {
        self.require_faces(faces)?;
        let selected: BTreeSet<FaceId> = faces.iter().copied().collect();

        let vertices: BTreeSet<VertexId> = selected
            .iter()
            .filter_map(|&f| self.face(f))
            .flat_map(|f| f.vertex_ids.iter().copied())
            .collect();
        let faces: Vec<FaceId> = selected.into_iter().collect();

        Ok(self.duplicate_parts(&vertices, &[], &faces))
    }

    /// Clone `vertices` at their current positions, then rebuild `faces` and
    /// `edges` over the clones. Every element named must only use vertices
    /// from `vertices`.
    fn duplicate_parts(
        &mut self,
        vertices: &BTreeSet<VertexId>,
        edges: &[EdgeId],
        faces: &[FaceId],
    ) -> DuplicateResult {
        let mark = self.id_mark();

        let mut vertex_map = BTreeMap::new();
        for &v in vertices {
            if let Some(position) = self.position(v) {
                vertex_map.insert(v, self.add_vertex(position));
            }
        }
        let mapped = |ids: &[VertexId]| -> Option<Vec<VertexId>> {
            ids.iter().map(|v| vertex_map.get(v).copied()).collect()
        };

        let loops: Vec<Vec<VertexId>> = faces
            .iter()
            .filter_map(|&f| self.face(f))
            .filter_map(|f| mapped(&f.vertex_ids))
            .collect();
        let pairs: Vec<Vec<VertexId>> = edges
            .iter()
            .filter_map(|&e| self.edge(e))
            .filter_map(|e| mapped(&[e.v1, e.v2]))
            .collect();

        for loop_ids in loops {
            self.add_face(&loop_ids);
        }
        for pair in pairs {
            self.add_edge(pair[0], pair[1]);
        }

        let edit = EditResult {
            created_vertices: self.vertices_since(mark),
            created_edges: self.edges_since(mark),
            created_faces: self.faces_since(mark),
            ..Default::default()
        };
        debug!(
            "duplicate: {} vertex(es), {} edge(s), {} face(s)",
            edit.created_vertices.len(),
            edit.created_edges.len(),
            edit.created_faces.len()
        );
        DuplicateResult { vertex_map, edit }
    }
}
