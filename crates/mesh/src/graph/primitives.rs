//! Primitive creation and deletion for MeshData.
//!
//! Primitives are total: missing ids produce `None` or a silent no-op, never
//! an error, because higher layers routinely probe for existence as control
//! flow. Deletes never cascade; orphan cleanup is the caller's call.

use glam::Vec3;
use std::collections::BTreeSet;
use tracing::{trace, warn};

use super::MeshData;
use crate::types::{Edge, EdgeId, EdgeKey, Face, FaceId, Vertex, VertexId, loop_pairs};

impl MeshData {
    // ========================================================================
    // Symmetric adjacency helpers
    // ========================================================================

    fn link_vertex_edge(&mut self, vertex: VertexId, edge: EdgeId) {
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.edge_ids.insert(edge);
        }
    }

    fn unlink_vertex_edge(&mut self, vertex: VertexId, edge: EdgeId) {
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.edge_ids.remove(&edge);
        }
    }

    /// Record that `face` borders `edge` on both sides of the relationship
    fn link_edge_face(&mut self, edge: EdgeId, face: FaceId) {
        if let Some(e) = self.edges.get_mut(&edge) {
            e.face_ids.insert(face);
        }
        if let Some(f) = self.faces.get_mut(&face) {
            f.edge_ids.insert(edge);
        }
    }

    fn unlink_edge_face(&mut self, edge: EdgeId, face: FaceId) {
        if let Some(e) = self.edges.get_mut(&edge) {
            e.face_ids.remove(&face);
        }
        if let Some(f) = self.faces.get_mut(&face) {
            f.edge_ids.remove(&edge);
        }
    }

    /// The face side of this relationship is the face's vertex loop, which
    /// is written once when the loop is set.
    fn link_vertex_face(&mut self, vertex: VertexId, face: FaceId) {
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.face_ids.insert(face);
        }
    }

    fn unlink_vertex_face(&mut self, vertex: VertexId, face: FaceId) {
        if let Some(v) = self.vertices.get_mut(&vertex) {
            v.face_ids.remove(&face);
        }
    }

    // ========================================================================
    // Creation
    // ========================================================================

    /// Add a new vertex to the mesh.
    ///
    /// Always succeeds and returns the next vertex id.
    pub fn add_vertex(&mut self, position: Vec3) -> VertexId {
        let id = VertexId(self.next_vertex_id);
        self.next_vertex_id += 1;
        self.vertices.insert(
            id,
            Vertex {
                id,
                position,
                edge_ids: BTreeSet::new(),
                face_ids: BTreeSet::new(),
            },
        );
        id
    }

    /// Add an edge between two vertices.
    ///
    /// Returns the existing edge if one already connects the pair (in either
    /// order). Returns `None` if either vertex is missing or both ids are the
    /// same vertex.
    pub fn add_edge(&mut self, v1: VertexId, v2: VertexId) -> Option<EdgeId> {
        if v1 == v2 || !self.vertices.contains_key(&v1) || !self.vertices.contains_key(&v2) {
            return None;
        }

        let key = EdgeKey::new(v1, v2);
        if let Some(&existing) = self.edge_index.get(&key) {
            return Some(existing);
        }

        let id = EdgeId(self.next_edge_id);
        self.next_edge_id += 1;
        self.edges.insert(
            id,
            Edge {
                id,
                v1,
                v2,
                face_ids: BTreeSet::new(),
            },
        );
        self.edge_index.insert(key, id);
        self.link_vertex_edge(v1, id);
        self.link_vertex_edge(v2, id);
        Some(id)
    }

    /// Add a face from an ordered vertex loop.
    ///
    /// Creates (or reuses) one edge per consecutive pair, including the
    /// wrap-around pair, and registers the face on every edge and vertex.
    /// Planarity, convexity, winding, and loop length are not checked here;
    /// callers guarantee at least three vertices. Returns `None` if any
    /// vertex is missing.
    pub fn add_face(&mut self, vertex_ids: &[VertexId]) -> Option<FaceId> {
        if vertex_ids.iter().any(|v| !self.vertices.contains_key(v)) {
            return None;
        }

        let id = FaceId(self.next_face_id);
        self.next_face_id += 1;
        self.faces.insert(
            id,
            Face {
                id,
                vertex_ids: vertex_ids.to_vec(),
                edge_ids: BTreeSet::new(),
            },
        );
        self.link_face_loop(id);
        Some(id)
    }

    /// Create edges for every pair of the face's loop and link everything.
    fn link_face_loop(&mut self, face: FaceId) {
        let Some(loop_ids) = self.faces.get(&face).map(|f| f.vertex_ids.clone()) else {
            return;
        };

        for (a, b) in loop_pairs(&loop_ids) {
            if let Some(edge) = self.add_edge(a, b) {
                self.link_edge_face(edge, face);
            }
        }
        for &v in &loop_ids {
            self.link_vertex_face(v, face);
        }
    }

    /// Detach a face from all of its edges and vertices, keeping the entity.
    fn unlink_face_loop(&mut self, face: FaceId) {
        let Some((edge_ids, loop_ids)) = self
            .faces
            .get(&face)
            .map(|f| (f.edge_ids.clone(), f.vertex_ids.clone()))
        else {
            return;
        };

        for edge in edge_ids {
            self.unlink_edge_face(edge, face);
        }
        for v in loop_ids {
            self.unlink_vertex_face(v, face);
        }
    }

    /// Replace a face's vertex loop and rebuild its edge links from scratch.
    ///
    /// Edges the old loop used but the new one does not are left in place
    /// (possibly orphaned). Returns `false` if the face or any vertex of the
    /// new loop is missing, in which case nothing changes.
    pub(crate) fn relink_face(&mut self, face: FaceId, new_loop: Vec<VertexId>) -> bool {
        if !self.faces.contains_key(&face) || new_loop.iter().any(|v| !self.vertices.contains_key(v))
        {
            return false;
        }

        self.unlink_face_loop(face);
        if let Some(f) = self.faces.get_mut(&face) {
            f.vertex_ids = new_loop;
            f.edge_ids.clear();
        }
        self.link_face_loop(face);
        true
    }

    /// Move one endpoint of an edge to another vertex, keeping the edge id.
    ///
    /// Fails (returns `false`) if the move would duplicate an existing edge
    /// or collapse the edge onto a single vertex.
    pub(crate) fn repoint_edge(&mut self, edge: EdgeId, from: VertexId, to: VertexId) -> bool {
        let Some(e) = self.edges.get(&edge) else {
            return false;
        };
        let Some(far) = e.other(from) else {
            return false;
        };
        if far == to || !self.vertices.contains_key(&to) {
            return false;
        }
        let new_key = EdgeKey::new(to, far);
        if self.edge_index.contains_key(&new_key) {
            return false;
        }

        let old_key = e.key();
        if let Some(e) = self.edges.get_mut(&edge) {
            if e.v1 == from {
                e.v1 = to;
            } else {
                e.v2 = to;
            }
        }
        if self.edge_index.get(&old_key) == Some(&edge) {
            self.edge_index.remove(&old_key);
        }
        self.edge_index.insert(new_key, edge);
        self.unlink_vertex_edge(from, edge);
        self.link_vertex_edge(to, edge);
        trace!("repoint_edge: {:?} {:?} -> {:?}", edge, from, to);
        true
    }

    // ========================================================================
    // Deletion
    // ========================================================================

    /// Delete a face.
    ///
    /// Removes the face id from its edges and vertices, then removes the
    /// face. Edges and vertices stay in place even if now orphaned.
    pub fn delete_face(&mut self, face: FaceId) -> bool {
        if !self.faces.contains_key(&face) {
            return false;
        }
        self.unlink_face_loop(face);
        self.faces.remove(&face);
        true
    }

    /// Delete an edge.
    ///
    /// Call only after the faces referencing it are gone. Any face that still
    /// lists the edge has the reference dropped so no id dangles, but the
    /// face itself is left untouched.
    pub fn delete_edge(&mut self, edge: EdgeId) -> bool {
        let Some(e) = self.edges.get(&edge) else {
            return false;
        };
        let (v1, v2, key) = (e.v1, e.v2, e.key());
        let still_referenced: Vec<FaceId> = e.face_ids.iter().copied().collect();
        if !still_referenced.is_empty() {
            warn!(
                "delete_edge: {:?} still bordered by {} face(s)",
                edge,
                still_referenced.len()
            );
            for face in still_referenced {
                self.unlink_edge_face(edge, face);
            }
        }

        self.unlink_vertex_edge(v1, edge);
        self.unlink_vertex_edge(v2, edge);
        if self.edge_index.get(&key) == Some(&edge) {
            self.edge_index.remove(&key);
        }
        self.edges.remove(&edge);
        true
    }

    /// Delete a vertex.
    ///
    /// Call only once no edge or face references it; the vertex is removed
    /// regardless, and a warning is logged if references remain.
    pub fn delete_vertex(&mut self, vertex: VertexId) -> bool {
        let Some(v) = self.vertices.remove(&vertex) else {
            return false;
        };
        if !v.is_orphan() {
            warn!(
                "delete_vertex: {:?} removed with {} edge(s) and {} face(s) still attached",
                vertex,
                v.edge_ids.len(),
                v.face_ids.len()
            );
        }
        true
    }

    // ========================================================================
    // Positions
    // ========================================================================

    /// Set the position of a vertex. Adjacency is untouched.
    pub fn set_vertex_position(&mut self, vertex: VertexId, position: Vec3) -> bool {
        match self.vertices.get_mut(&vertex) {
            Some(v) => {
                v.position = position;
                true
            }
            None => false,
        }
    }

    /// Translate a set of vertices, returning the ids that were moved.
    pub fn translate_vertices(&mut self, vertices: &[VertexId], offset: Vec3) -> Vec<VertexId> {
        let mut moved = Vec::new();
        for &id in vertices {
            if let Some(v) = self.vertices.get_mut(&id) {
                v.position += offset;
                moved.push(id);
            }
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::unit_quad;

    #[test]
    fn test_add_edge_returns_existing_edge() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);

        let first = mesh.add_edge(a, b).unwrap();
        let second = mesh.add_edge(a, b).unwrap();
        let reversed = mesh.add_edge(b, a).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, reversed);
        assert_eq!(mesh.edge_count(), 1);
    }

    #[test]
    fn test_add_edge_rejects_missing_or_identical_vertices() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        assert!(mesh.add_edge(a, a).is_none());
        assert!(mesh.add_edge(a, VertexId(42)).is_none());
        assert_eq!(mesh.edge_count(), 0);
    }

    #[test]
    fn test_add_face_links_everything() {
        let (mesh, verts, face) = unit_quad();

        assert_eq!(mesh.edge_count(), 4);
        let f = mesh.face(face).unwrap();
        assert_eq!(f.edge_ids.len(), 4);
        for v in verts {
            assert!(mesh.vertex(v).unwrap().face_ids.contains(&face));
            assert_eq!(mesh.vertex(v).unwrap().degree(), 2);
        }
        for edge in &f.edge_ids {
            assert!(mesh.edge(*edge).unwrap().face_ids.contains(&face));
        }
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_add_face_with_missing_vertex_is_noop() {
        let (mut mesh, verts, _) = unit_quad();
        let faces_before = mesh.face_count();
        assert!(mesh.add_face(&[verts[0], verts[1], VertexId(99)]).is_none());
        assert_eq!(mesh.face_count(), faces_before);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_delete_face_does_not_cascade() {
        let (mut mesh, verts, face) = unit_quad();

        assert!(mesh.delete_face(face));
        assert_eq!(mesh.face_count(), 0);
        assert_eq!(mesh.edge_count(), 4);
        assert_eq!(mesh.vertex_count(), 4);
        for v in verts {
            assert!(mesh.vertex(v).unwrap().face_ids.is_empty());
        }
        assert!(mesh.edges().all(|e| e.is_orphan()));
        assert!(mesh.validate().is_ok());

        // Second delete is a silent no-op
        assert!(!mesh.delete_face(face));
    }

    #[test]
    fn test_delete_edge_unlinks_endpoints_and_index() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        let e = mesh.add_edge(a, b).unwrap();

        assert!(mesh.delete_edge(e));
        assert!(mesh.edge_between(a, b).is_none());
        assert!(mesh.vertex(a).unwrap().edge_ids.is_empty());
        assert!(mesh.vertex(b).unwrap().edge_ids.is_empty());

        // A fresh edge gets a fresh id
        let e2 = mesh.add_edge(a, b).unwrap();
        assert_ne!(e, e2);
    }

    #[test]
    fn test_ids_are_monotonic_after_delete() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        mesh.delete_vertex(a);
        let b = mesh.add_vertex(Vec3::ZERO);
        assert!(b > a);
    }

    #[test]
    fn test_relink_face_rebuilds_edges() {
        let (mut mesh, [v0, v1, v2, v3], face) = unit_quad();
        assert!(mesh.relink_face(face, vec![v0, v2, v3]));

        let f = mesh.face(face).unwrap();
        assert_eq!(f.vertex_ids, vec![v0, v2, v3]);
        assert_eq!(f.edge_ids.len(), 3);
        assert!(mesh.vertex(v1).unwrap().face_ids.is_empty());
        // The diagonal was created, the dropped edges stay as orphans
        assert!(mesh.edge_between(v0, v2).is_some());
        let e01 = mesh.edge_between(v0, v1).unwrap();
        assert!(mesh.edge(e01).unwrap().is_orphan());
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_translate_vertices_skips_missing() {
        let (mut mesh, [v0, ..], _) = unit_quad();
        let moved = mesh.translate_vertices(&[v0, VertexId(77)], Vec3::Z);
        assert_eq!(moved, vec![v0]);
        assert_eq!(mesh.vertex(v0).unwrap().position, Vec3::Z);
    }
}
