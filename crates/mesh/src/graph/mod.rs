//! Boundary-representation mesh graph
//!
//! Stores vertices, edges, and faces with explicit adjacency sets on each
//! side of every relationship. All adjacency mutation goes through the
//! symmetric link/unlink helpers in [`primitives`], so the two sides of a
//! relationship never drift apart.

mod construction;
mod primitives;
mod queries;
pub mod snapshot;
mod validation;

use std::collections::{BTreeMap, HashMap};

use crate::types::{Edge, EdgeId, EdgeKey, Face, FaceId, Vertex, VertexId};

pub(crate) use queries::newell_normal;
pub use snapshot::{EdgeRecord, FaceRecord, MeshSnapshot, VertexRecord};
pub use validation::TopologyViolation;

/// Editable polygon mesh
///
/// Owns its entities and its id counters; ids are monotonic per mesh and
/// never reused, so two meshes may hand out the same ids independently.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub(crate) vertices: BTreeMap<VertexId, Vertex>,
    pub(crate) edges: BTreeMap<EdgeId, Edge>,
    pub(crate) faces: BTreeMap<FaceId, Face>,
    /// Normalized vertex pair to the single edge connecting it
    pub(crate) edge_index: HashMap<EdgeKey, EdgeId>,
    pub(crate) next_vertex_id: u32,
    pub(crate) next_edge_id: u32,
    pub(crate) next_face_id: u32,
}

/// Next-id counters captured before an operation.
///
/// Because ids are monotonic, anything alive afterwards with an id at or
/// above the mark was created by the operation.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdMark {
    vertex: u32,
    edge: u32,
    face: u32,
}

impl MeshData {
    /// Create an empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn id_mark(&self) -> IdMark {
        IdMark {
            vertex: self.next_vertex_id,
            edge: self.next_edge_id,
            face: self.next_face_id,
        }
    }

    pub(crate) fn vertices_since(&self, mark: IdMark) -> Vec<VertexId> {
        self.vertices
            .range(VertexId(mark.vertex)..)
            .map(|(&id, _)| id)
            .collect()
    }

    pub(crate) fn edges_since(&self, mark: IdMark) -> Vec<EdgeId> {
        self.edges
            .range(EdgeId(mark.edge)..)
            .map(|(&id, _)| id)
            .collect()
    }

    pub(crate) fn faces_since(&self, mark: IdMark) -> Vec<FaceId> {
        self.faces
            .range(FaceId(mark.face)..)
            .map(|(&id, _)| id)
            .collect()
    }
}
