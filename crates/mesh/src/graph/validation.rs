//! Validation methods for MeshData.
//!
//! Checks that every adjacency relationship is recorded on both sides, that
//! no id dangles, and that the edge index agrees with the edge store. Edit
//! operators never call this on the hot path; it backs tests, snapshot
//! restore, and debugging.

use std::collections::BTreeSet;

use super::MeshData;
use crate::types::{EdgeId, EdgeKey, ElementKind};

/// A broken mesh invariant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TopologyViolation {
    #[error("{from} {from_id} references missing {to} {to_id}")]
    DanglingReference {
        from: ElementKind,
        from_id: u32,
        to: ElementKind,
        to_id: u32,
    },

    #[error("{from} {from_id} lists {to} {to_id}, but not the other way around")]
    AsymmetricLink {
        from: ElementKind,
        from_id: u32,
        to: ElementKind,
        to_id: u32,
    },

    #[error("Edge {0} connects a vertex to itself")]
    SelfLoopEdge(u32),

    #[error("Face {face} has {len} vertices")]
    ShortFace { face: u32, len: usize },

    #[error("Face {0} repeats a vertex across consecutive corners")]
    RepeatedCorner(u32),

    #[error("Face {0} edge set does not match its vertex loop")]
    FaceEdgeMismatch(u32),

    #[error("Edge index inconsistent: {0}")]
    EdgeIndex(String),

    #[error("{kind} {id} is not below the next-id counter")]
    IdAboveCounter { kind: ElementKind, id: u32 },
}

use ElementKind::{Edge as E, Face as F, Vertex as V};

impl MeshData {
    /// Validate every mesh invariant, returning the first violation found.
    pub fn validate(&self) -> Result<(), TopologyViolation> {
        self.validate_counters()?;
        self.validate_vertices()?;
        self.validate_edges()?;
        self.validate_faces()?;
        self.validate_edge_index()
    }

    fn validate_counters(&self) -> Result<(), TopologyViolation> {
        if let Some(id) = self.vertices.keys().next_back() {
            if id.0 >= self.next_vertex_id {
                return Err(TopologyViolation::IdAboveCounter { kind: V, id: id.0 });
            }
        }
        if let Some(id) = self.edges.keys().next_back() {
            if id.0 >= self.next_edge_id {
                return Err(TopologyViolation::IdAboveCounter { kind: E, id: id.0 });
            }
        }
        if let Some(id) = self.faces.keys().next_back() {
            if id.0 >= self.next_face_id {
                return Err(TopologyViolation::IdAboveCounter { kind: F, id: id.0 });
            }
        }
        Ok(())
    }

    fn validate_vertices(&self) -> Result<(), TopologyViolation> {
        for v in self.vertices.values() {
            for edge_id in &v.edge_ids {
                let edge = self.edges.get(edge_id).ok_or(TopologyViolation::DanglingReference {
                    from: V,
                    from_id: v.id.0,
                    to: E,
                    to_id: edge_id.0,
                })?;
                if !edge.contains(v.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: V,
                        from_id: v.id.0,
                        to: E,
                        to_id: edge_id.0,
                    });
                }
            }
            for face_id in &v.face_ids {
                let face = self.faces.get(face_id).ok_or(TopologyViolation::DanglingReference {
                    from: V,
                    from_id: v.id.0,
                    to: F,
                    to_id: face_id.0,
                })?;
                if !face.contains_vertex(v.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: V,
                        from_id: v.id.0,
                        to: F,
                        to_id: face_id.0,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_edges(&self) -> Result<(), TopologyViolation> {
        for e in self.edges.values() {
            if e.v1 == e.v2 {
                return Err(TopologyViolation::SelfLoopEdge(e.id.0));
            }
            for endpoint in [e.v1, e.v2] {
                let v = self.vertices.get(&endpoint).ok_or(TopologyViolation::DanglingReference {
                    from: E,
                    from_id: e.id.0,
                    to: V,
                    to_id: endpoint.0,
                })?;
                if !v.edge_ids.contains(&e.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: E,
                        from_id: e.id.0,
                        to: V,
                        to_id: endpoint.0,
                    });
                }
            }
            for face_id in &e.face_ids {
                let face = self.faces.get(face_id).ok_or(TopologyViolation::DanglingReference {
                    from: E,
                    from_id: e.id.0,
                    to: F,
                    to_id: face_id.0,
                })?;
                if !face.edge_ids.contains(&e.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: E,
                        from_id: e.id.0,
                        to: F,
                        to_id: face_id.0,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_faces(&self) -> Result<(), TopologyViolation> {
        for f in self.faces.values() {
            if f.len() < 3 {
                return Err(TopologyViolation::ShortFace {
                    face: f.id.0,
                    len: f.len(),
                });
            }

            let mut expected: BTreeSet<EdgeId> = BTreeSet::new();
            for (a, b) in f.vertex_pairs() {
                if a == b {
                    return Err(TopologyViolation::RepeatedCorner(f.id.0));
                }
                let v = self.vertices.get(&a).ok_or(TopologyViolation::DanglingReference {
                    from: F,
                    from_id: f.id.0,
                    to: V,
                    to_id: a.0,
                })?;
                if !v.face_ids.contains(&f.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: F,
                        from_id: f.id.0,
                        to: V,
                        to_id: a.0,
                    });
                }
                let edge = self
                    .edge_between(a, b)
                    .ok_or(TopologyViolation::FaceEdgeMismatch(f.id.0))?;
                expected.insert(edge);
            }
            if expected != f.edge_ids {
                return Err(TopologyViolation::FaceEdgeMismatch(f.id.0));
            }

            for edge_id in &f.edge_ids {
                let edge = self.edges.get(edge_id).ok_or(TopologyViolation::DanglingReference {
                    from: F,
                    from_id: f.id.0,
                    to: E,
                    to_id: edge_id.0,
                })?;
                if !edge.face_ids.contains(&f.id) {
                    return Err(TopologyViolation::AsymmetricLink {
                        from: F,
                        from_id: f.id.0,
                        to: E,
                        to_id: edge_id.0,
                    });
                }
            }
        }
        Ok(())
    }

    fn validate_edge_index(&self) -> Result<(), TopologyViolation> {
        if self.edge_index.len() != self.edges.len() {
            return Err(TopologyViolation::EdgeIndex(format!(
                "{} index entries for {} edges",
                self.edge_index.len(),
                self.edges.len()
            )));
        }
        for (key, edge_id) in &self.edge_index {
            let edge = self.edges.get(edge_id).ok_or_else(|| {
                TopologyViolation::EdgeIndex(format!("entry points at missing edge {}", edge_id.0))
            })?;
            if edge.key() != *key {
                return Err(TopologyViolation::EdgeIndex(format!(
                    "edge {} filed under ({}, {})",
                    edge_id.0, key.0.0, key.1.0
                )));
            }
        }
        for e in self.edges.values() {
            if self.edge_index.get(&EdgeKey::new(e.v1, e.v2)) != Some(&e.id) {
                return Err(TopologyViolation::EdgeIndex(format!(
                    "edge {} missing from index",
                    e.id.0
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::{grid, unit_quad};
    use crate::types::FaceId;

    #[test]
    fn test_valid_meshes_pass() {
        assert!(MeshData::new().validate().is_ok());
        assert!(grid(3).validate().is_ok());
        assert!(MeshData::cube(0.5).validate().is_ok());
    }

    #[test]
    fn test_detects_asymmetric_vertex_face_link() {
        let (mut mesh, [v0, ..], face) = unit_quad();
        mesh.vertices.get_mut(&v0).unwrap().face_ids.remove(&face);
        assert!(matches!(
            mesh.validate(),
            Err(TopologyViolation::AsymmetricLink { .. })
        ));
    }

    #[test]
    fn test_detects_dangling_face_reference() {
        let (mut mesh, [v0, ..], _) = unit_quad();
        mesh.vertices.get_mut(&v0).unwrap().face_ids.insert(FaceId(99));
        assert_eq!(
            mesh.validate(),
            Err(TopologyViolation::DanglingReference {
                from: ElementKind::Vertex,
                from_id: v0.0,
                to: ElementKind::Face,
                to_id: 99,
            })
        );
    }

    #[test]
    fn test_detects_stale_edge_index() {
        let (mut mesh, [v0, v1, ..], _) = unit_quad();
        mesh.edge_index.remove(&EdgeKey::new(v0, v1));
        assert!(mesh.validate().is_err());
    }

    #[test]
    fn test_detects_counter_behind_ids() {
        let (mut mesh, _, _) = unit_quad();
        mesh.next_vertex_id = 2;
        assert_eq!(
            mesh.validate(),
            Err(TopologyViolation::IdAboveCounter {
                kind: ElementKind::Vertex,
                id: 3
            })
        );
    }
}
