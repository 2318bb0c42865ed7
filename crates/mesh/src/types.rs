//! Type definitions for the editable polygon mesh.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Type-safe vertex identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(pub u32);

/// Type-safe edge identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub u32);

/// Type-safe face identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FaceId(pub u32);

/// Element kind, used in error reports and validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Vertex,
    Edge,
    Face,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Edge => write!(f, "edge"),
            Self::Face => write!(f, "face"),
        }
    }
}

/// Unordered vertex pair, normalized so that `.0 <= .1`.
///
/// Used as the key of the edge index and for counting face references
/// per edge without caring about winding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub VertexId, pub VertexId);

impl EdgeKey {
    pub fn new(a: VertexId, b: VertexId) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// A vertex in the mesh graph
#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    pub position: Vec3,
    /// Edges that have this vertex as an endpoint
    pub edge_ids: BTreeSet<EdgeId>,
    /// Faces whose loop contains this vertex
    pub face_ids: BTreeSet<FaceId>,
}

impl Vertex {
    /// Number of incident edges
    pub fn degree(&self) -> usize {
        self.edge_ids.len()
    }

    /// A vertex is an orphan when nothing references it
    pub fn is_orphan(&self) -> bool {
        self.edge_ids.is_empty() && self.face_ids.is_empty()
    }
}

/// An edge between two vertices (unordered)
#[derive(Debug, Clone)]
pub struct Edge {
    pub id: EdgeId,
    pub v1: VertexId,
    pub v2: VertexId,
    /// Faces bordering this edge (two for an interior manifold edge)
    pub face_ids: BTreeSet<FaceId>,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey::new(self.v1, self.v2)
    }

    pub fn contains(&self, vertex: VertexId) -> bool {
        self.v1 == vertex || self.v2 == vertex
    }

    /// The endpoint opposite `vertex`, if `vertex` is an endpoint
    pub fn other(&self, vertex: VertexId) -> Option<VertexId> {
        if self.v1 == vertex {
            Some(self.v2)
        } else if self.v2 == vertex {
            Some(self.v1)
        } else {
            None
        }
    }

    /// An edge is an orphan when no face borders it
    pub fn is_orphan(&self) -> bool {
        self.face_ids.is_empty()
    }
}

/// A polygon face
#[derive(Debug, Clone)]
pub struct Face {
    pub id: FaceId,
    /// Ordered vertex loop; the winding defines the face normal
    pub vertex_ids: Vec<VertexId>,
    /// One edge per consecutive vertex pair (wrapping)
    pub edge_ids: BTreeSet<EdgeId>,
}

impl Face {
    pub fn len(&self) -> usize {
        self.vertex_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_ids.is_empty()
    }

    pub fn contains_vertex(&self, vertex: VertexId) -> bool {
        self.vertex_ids.contains(&vertex)
    }

    /// Consecutive vertex pairs of the loop, including the wrap-around pair
    pub fn vertex_pairs(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        loop_pairs(&self.vertex_ids)
    }

    /// Whether the loop walks `a -> b` (as opposed to `b -> a`)
    pub fn has_directed_pair(&self, a: VertexId, b: VertexId) -> bool {
        self.vertex_pairs().any(|(x, y)| x == a && y == b)
    }
}

/// Consecutive pairs of a closed vertex loop, including the wrap-around pair
pub fn loop_pairs(vertex_ids: &[VertexId]) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
    let n = vertex_ids.len();
    (0..n).map(move |i| (vertex_ids[i], vertex_ids[(i + 1) % n]))
}

/// Remove consecutive duplicate ids from a closed loop, including a
/// duplicate across the wrap-around pair.
pub fn collapse_loop(vertex_ids: &[VertexId]) -> Vec<VertexId> {
    let mut collapsed: Vec<VertexId> = Vec::with_capacity(vertex_ids.len());
    for &id in vertex_ids {
        if collapsed.last() != Some(&id) {
            collapsed.push(id);
        }
    }
    while collapsed.len() > 1 && collapsed.first() == collapsed.last() {
        collapsed.pop();
    }
    collapsed
}

/// A selection of mesh elements, as handed to selection-scoped operations
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub vertices: BTreeSet<VertexId>,
    pub edges: BTreeSet<EdgeId>,
    pub faces: BTreeSet<FaceId>,
}

impl Selection {
    pub fn from_vertices(ids: impl IntoIterator<Item = VertexId>) -> Self {
        Self {
            vertices: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn from_faces(ids: impl IntoIterator<Item = FaceId>) -> Self {
        Self {
            faces: ids.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() && self.edges.is_empty() && self.faces.is_empty()
    }
}

/// Ids created and deleted by a selection-scoped operation.
///
/// Callers use the lists to update selection state and to skip committing an
/// undo entry when nothing changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditResult {
    pub created_vertices: Vec<VertexId>,
    pub created_edges: Vec<EdgeId>,
    pub created_faces: Vec<FaceId>,
    pub deleted_vertices: Vec<VertexId>,
    pub deleted_edges: Vec<EdgeId>,
    pub deleted_faces: Vec<FaceId>,
}

impl EditResult {
    pub fn is_empty(&self) -> bool {
        self.created_vertices.is_empty()
            && self.created_edges.is_empty()
            && self.created_faces.is_empty()
            && self.deleted_vertices.is_empty()
            && self.deleted_edges.is_empty()
            && self.deleted_faces.is_empty()
    }

    /// Fold another result into this one.
    ///
    /// Elements created by one step and deleted by a later one are dropped
    /// from both lists so the combined result only names ids the caller
    /// could have seen before or can see after the edit.
    pub fn absorb(&mut self, other: EditResult) {
        self.created_vertices.extend(other.created_vertices);
        self.created_edges.extend(other.created_edges);
        self.created_faces.extend(other.created_faces);
        self.deleted_vertices.extend(other.deleted_vertices);
        self.deleted_edges.extend(other.deleted_edges);
        self.deleted_faces.extend(other.deleted_faces);
        self.normalize();
    }

    /// Sort, dedup, and cancel out ids that were both created and deleted.
    pub fn normalize(&mut self) {
        cancel_transient(&mut self.created_vertices, &mut self.deleted_vertices);
        cancel_transient(&mut self.created_edges, &mut self.deleted_edges);
        cancel_transient(&mut self.created_faces, &mut self.deleted_faces);
    }
}

fn cancel_transient<T: Ord + Copy>(created: &mut Vec<T>, deleted: &mut Vec<T>) {
    created.sort();
    created.dedup();
    deleted.sort();
    deleted.dedup();
    let transient: BTreeSet<T> = created
        .iter()
        .filter(|id| deleted.binary_search(id).is_ok())
        .copied()
        .collect();
    if !transient.is_empty() {
        created.retain(|id| !transient.contains(id));
        deleted.retain(|id| !transient.contains(id));
    }
}

/// Result of a duplicate operation
#[derive(Debug, Clone, Default)]
pub struct DuplicateResult {
    /// Original vertex id to its copy
    pub vertex_map: BTreeMap<VertexId, VertexId>,
    pub edit: EditResult,
}

/// What `create_edge_face_from_vertices` produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrFace {
    Edge(EdgeId),
    Face(FaceId),
}
