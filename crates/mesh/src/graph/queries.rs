//! Read-only queries on MeshData.

use glam::Vec3;
use std::collections::BTreeSet;

use super::MeshData;
use crate::types::{Edge, EdgeId, EdgeKey, Face, FaceId, Vertex, VertexId};

impl MeshData {
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(&id)
    }

    pub fn position(&self, id: VertexId) -> Option<Vec3> {
        self.vertices.get(&id).map(|v| v.position)
    }

    /// The edge connecting two vertices, in either order
    pub fn edge_between(&self, a: VertexId, b: VertexId) -> Option<EdgeId> {
        self.edge_index.get(&EdgeKey::new(a, b)).copied()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }

    /// Vertices in ascending id order
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.vertices.values()
    }

    /// Edges in ascending id order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// Faces in ascending id order
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.faces.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    pub fn edge_ids(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.keys().copied()
    }

    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.faces.keys().copied()
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn contains_face(&self, id: FaceId) -> bool {
        self.faces.contains_key(&id)
    }

    /// Vertices connected to `vertex` by an edge
    pub fn vertex_neighbors(&self, vertex: VertexId) -> BTreeSet<VertexId> {
        let Some(v) = self.vertices.get(&vertex) else {
            return BTreeSet::new();
        };
        v.edge_ids
            .iter()
            .filter_map(|e| self.edges.get(e))
            .filter_map(|e| e.other(vertex))
            .collect()
    }

    /// Faces on the other side of each edge of `face`
    pub fn face_neighbors(&self, face: FaceId) -> BTreeSet<FaceId> {
        let Some(f) = self.faces.get(&face) else {
            return BTreeSet::new();
        };
        f.edge_ids
            .iter()
            .filter_map(|e| self.edges.get(e))
            .flat_map(|e| e.face_ids.iter().copied())
            .filter(|&other| other != face)
            .collect()
    }

    /// Positions of a face's loop, in winding order
    pub fn face_positions(&self, face: FaceId) -> Option<Vec<Vec3>> {
        let f = self.faces.get(&face)?;
        f.vertex_ids.iter().map(|&v| self.position(v)).collect()
    }

    /// Unnormalized face normal via Newell's method.
    ///
    /// Its length is twice the polygon area, which is what area-weighted
    /// smoothing wants.
    pub fn face_area_normal(&self, face: FaceId) -> Option<Vec3> {
        let positions = self.face_positions(face)?;
        Some(newell_normal(&positions))
    }

    /// Unit face normal, or `None` for missing or degenerate faces
    pub fn face_normal(&self, face: FaceId) -> Option<Vec3> {
        self.face_area_normal(face)?.try_normalize()
    }

    /// Average of a face's vertex positions
    pub fn face_centroid(&self, face: FaceId) -> Option<Vec3> {
        let positions = self.face_positions(face)?;
        if positions.is_empty() {
            return None;
        }
        Some(positions.iter().copied().sum::<Vec3>() / positions.len() as f32)
    }

    /// Average of the positions of the given vertices that exist
    pub fn centroid_of(&self, vertices: &[VertexId]) -> Option<Vec3> {
        let positions: Vec<Vec3> = vertices.iter().filter_map(|&v| self.position(v)).collect();
        if positions.is_empty() {
            return None;
        }
        Some(positions.iter().copied().sum::<Vec3>() / positions.len() as f32)
    }
}

/// Newell's method normal of a closed polygon (not normalized)
pub(crate) fn newell_normal(positions: &[Vec3]) -> Vec3 {
    let n = positions.len();
    let mut normal = Vec3::ZERO;
    for i in 0..n {
        let current = positions[i];
        let next = positions[(i + 1) % n];
        normal.x += (current.y - next.y) * (current.z + next.z);
        normal.y += (current.z - next.z) * (current.x + next.x);
        normal.z += (current.x - next.x) * (current.y + next.y);
    }
    normal
}
