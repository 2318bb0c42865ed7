//! Face-region extrusion.

use glam::Vec3;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::error::Result;
use crate::graph::MeshData;
use crate::types::{EditResult, FaceId, VertexId};

impl MeshData {
    /// Extrude a region of faces by `offset`.
    ///
    /// The region's vertices are copied and moved by `offset`, a cap face
    /// with the original winding is built for every selected face, and each
    /// boundary edge of the region is bridged to its copy by a side quad
    /// facing outward. The original faces are removed and anything only they
    /// used is swept.
    pub fn extrude_faces(&mut self, faces: &[FaceId], offset: Vec3) -> Result<EditResult> {
        self.require_faces(faces)?;
        let region: BTreeSet<FaceId> = faces.iter().copied().collect();
        if region.is_empty() {
            return Ok(EditResult::default());
        }
        let mark = self.id_mark();

        // Directed boundary pairs, walked as the owning face walks them
        let mut boundary: Vec<(VertexId, VertexId)> = Vec::new();
        let mut loops: Vec<Vec<VertexId>> = Vec::new();
        let mut vertices: BTreeSet<VertexId> = BTreeSet::new();
        let mut edge_candidates = BTreeSet::new();
        for face in region.iter().filter_map(|&f| self.face(f)) {
            for (a, b) in face.vertex_pairs() {
                let shared = self
                    .edge_between(a, b)
                    .and_then(|e| self.edge(e))
                    .is_some_and(|e| e.face_ids.iter().any(|f| *f != face.id && region.contains(f)));
                if !shared {
                    boundary.push((a, b));
                }
            }
            loops.push(face.vertex_ids.clone());
            vertices.extend(face.vertex_ids.iter().copied());
            edge_candidates.extend(face.edge_ids.iter().copied());
        }

        let mut copies: BTreeMap<VertexId, VertexId> = BTreeMap::new();
        for &v in &vertices {
            if let Some(position) = self.position(v) {
                copies.insert(v, self.add_vertex(position));
            }
        }
        let moved: Vec<VertexId> = copies.values().copied().collect();
        self.translate_vertices(&moved, offset);
        let copy_of = |v: VertexId| copies.get(&v).copied().unwrap_or(v);

        for loop_ids in &loops {
            let cap: Vec<VertexId> = loop_ids.iter().map(|&v| copy_of(v)).collect();
            self.add_face(&cap);
        }
        for &(a, b) in &boundary {
            self.add_face(&[a, b, copy_of(b), copy_of(a)]);
        }

        let mut deleted_faces = Vec::new();
        for &face in &region {
            if self.delete_face(face) {
                deleted_faces.push(face);
            }
        }
        let (deleted_edges, deleted_vertices) = self.sweep_orphans(edge_candidates, vertices);

        let mut result = EditResult {
            created_vertices: self.vertices_since(mark),
            created_edges: self.edges_since(mark),
            created_faces: self.faces_since(mark),
            deleted_vertices,
            deleted_edges,
            deleted_faces,
        };
        result.normalize();
        debug!(
            "extrude_faces: {} face(s), {} side quad(s)",
            region.len(),
            boundary.len()
        );
        Ok(result)
    }
}
