//! Plain-data snapshots of a mesh.
//!
//! Adjacency sets are stored as arrays; restoring rebuilds the sets, the
//! edge index, and the id counters, then validates the result so a corrupt
//! snapshot is rejected rather than half-loaded.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::debug;

use super::MeshData;
use crate::error::{MeshError, Result};
use crate::types::{Edge, EdgeId, EdgeKey, Face, FaceId, Vertex, VertexId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VertexRecord {
    pub id: u32,
    pub position: [f32; 3],
    pub edge_ids: Vec<u32>,
    pub face_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: u32,
    pub v1: u32,
    pub v2: u32,
    pub face_ids: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceRecord {
    pub id: u32,
    pub vertex_ids: Vec<u32>,
    pub edge_ids: Vec<u32>,
}

/// Serializable copy of a mesh, including its id counters
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshSnapshot {
    pub vertices: Vec<VertexRecord>,
    pub edges: Vec<EdgeRecord>,
    pub faces: Vec<FaceRecord>,
    #[serde(default)]
    pub next_vertex_id: u32,
    #[serde(default)]
    pub next_edge_id: u32,
    #[serde(default)]
    pub next_face_id: u32,
}

fn raw<T, F: Fn(&T) -> u32>(ids: &BTreeSet<T>, f: F) -> Vec<u32> {
    ids.iter().map(f).collect()
}

impl MeshData {
    pub fn to_snapshot(&self) -> MeshSnapshot {
        MeshSnapshot {
            vertices: self
                .vertices
                .values()
                .map(|v| VertexRecord {
                    id: v.id.0,
                    position: v.position.to_array(),
                    edge_ids: raw(&v.edge_ids, |e| e.0),
                    face_ids: raw(&v.face_ids, |f| f.0),
                })
                .collect(),
            edges: self
                .edges
                .values()
                .map(|e| EdgeRecord {
                    id: e.id.0,
                    v1: e.v1.0,
                    v2: e.v2.0,
                    face_ids: raw(&e.face_ids, |f| f.0),
                })
                .collect(),
            faces: self
                .faces
                .values()
                .map(|f| FaceRecord {
                    id: f.id.0,
                    vertex_ids: f.vertex_ids.iter().map(|v| v.0).collect(),
                    edge_ids: raw(&f.edge_ids, |e| e.0),
                })
                .collect(),
            next_vertex_id: self.next_vertex_id,
            next_edge_id: self.next_edge_id,
            next_face_id: self.next_face_id,
        }
    }

    /// Rehydrate a mesh from a snapshot.
    ///
    /// Counters are raised to at least one past the largest stored id, so a
    /// snapshot written without counters still hands out fresh ids.
    pub fn from_snapshot(snapshot: &MeshSnapshot) -> Result<Self> {
        let mut mesh = Self::new();

        for record in &snapshot.vertices {
            let id = VertexId(record.id);
            mesh.vertices.insert(
                id,
                Vertex {
                    id,
                    position: Vec3::from_array(record.position),
                    edge_ids: record.edge_ids.iter().map(|&e| EdgeId(e)).collect(),
                    face_ids: record.face_ids.iter().map(|&f| FaceId(f)).collect(),
                },
            );
        }

        for record in &snapshot.edges {
            let id = EdgeId(record.id);
            let (v1, v2) = (VertexId(record.v1), VertexId(record.v2));
            if mesh.edge_index.insert(EdgeKey::new(v1, v2), id).is_some() {
                return Err(MeshError::InvalidTopology(format!(
                    "snapshot has two edges between vertices {} and {}",
                    record.v1, record.v2
                )));
            }
            mesh.edges.insert(
                id,
                Edge {
                    id,
                    v1,
                    v2,
                    face_ids: record.face_ids.iter().map(|&f| FaceId(f)).collect(),
                },
            );
        }

        for record in &snapshot.faces {
            let id = FaceId(record.id);
            mesh.faces.insert(
                id,
                Face {
                    id,
                    vertex_ids: record.vertex_ids.iter().map(|&v| VertexId(v)).collect(),
                    edge_ids: record.edge_ids.iter().map(|&e| EdgeId(e)).collect(),
                },
            );
        }

        let max_plus_one = |max: Option<u32>| max.map_or(0, |m| m.saturating_add(1));
        mesh.next_vertex_id = snapshot
            .next_vertex_id
            .max(max_plus_one(mesh.vertices.keys().next_back().map(|v| v.0)));
        mesh.next_edge_id = snapshot
            .next_edge_id
            .max(max_plus_one(mesh.edges.keys().next_back().map(|e| e.0)));
        mesh.next_face_id = snapshot
            .next_face_id
            .max(max_plus_one(mesh.faces.keys().next_back().map(|f| f.0)));

        mesh.validate()
            .map_err(|violation| MeshError::InvalidTopology(violation.to_string()))?;

        debug!(
            "from_snapshot: {} vertices, {} edges, {} faces",
            mesh.vertex_count(),
            mesh.edge_count(),
            mesh.face_count()
        );
        Ok(mesh)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: MeshSnapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }
}
