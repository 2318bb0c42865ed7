//! Selection-scoped edit operations
//!
//! Delete, dissolve, duplicate, and extrude over sets of ids. Every
//! operation checks its whole selection before touching the graph, so a
//! stale id fails the call with [`crate::MeshError::MissingElement`] and
//! leaves the mesh as it was. Each returns an [`crate::EditResult`] naming
//! the ids it created and deleted.

mod delete;
mod dissolve;
mod duplicate;
mod extrude;

use std::collections::BTreeSet;
use tracing::trace;

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{EdgeId, FaceId, VertexId};

impl MeshData {
    /// Delete candidate edges that no face borders.
    ///
    /// Idempotent; ids that no longer exist are ignored.
    pub fn sweep_orphan_edges(&mut self, candidates: impl IntoIterator<Item = EdgeId>) -> Vec<EdgeId> {
        let mut swept = Vec::new();
        for edge in candidates {
            if self.edge(edge).is_some_and(|e| e.is_orphan()) && self.delete_edge(edge) {
                swept.push(edge);
            }
        }
        swept.sort();
        swept.dedup();
        swept
    }

    /// Delete candidate vertices that no edge or face references.
    ///
    /// Idempotent; ids that no longer exist are ignored.
    pub fn sweep_orphan_vertices(
        &mut self,
        candidates: impl IntoIterator<Item = VertexId>,
    ) -> Vec<VertexId> {
        let mut swept = Vec::new();
        for vertex in candidates {
            if self.vertex(vertex).is_some_and(|v| v.is_orphan()) && self.delete_vertex(vertex) {
                swept.push(vertex);
            }
        }
        swept.sort();
        swept.dedup();
        swept
    }

    /// Sweep edges first, then vertices, counting the endpoints of swept
    /// edges as vertex candidates too.
    pub(crate) fn sweep_orphans(
        &mut self,
        edges: BTreeSet<EdgeId>,
        mut vertices: BTreeSet<VertexId>,
    ) -> (Vec<EdgeId>, Vec<VertexId>) {
        for edge in &edges {
            if let Some(e) = self.edge(*edge) {
                vertices.insert(e.v1);
                vertices.insert(e.v2);
            }
        }
        let swept_edges = self.sweep_orphan_edges(edges);
        let swept_vertices = self.sweep_orphan_vertices(vertices);
        if !swept_edges.is_empty() || !swept_vertices.is_empty() {
            trace!(
                "sweep_orphans: {} edge(s), {} vertex(es)",
                swept_edges.len(),
                swept_vertices.len()
            );
        }
        (swept_edges, swept_vertices)
    }

    pub(crate) fn require_vertices<'a>(
        &self,
        ids: impl IntoIterator<Item = &'a VertexId>,
    ) -> Result<()> {
        match ids.into_iter().find(|v| !self.contains_vertex(**v)) {
            Some(&missing) => Err(MeshError::missing_vertex(missing)),
            None => Ok(()),
        }
    }

    pub(crate) fn require_edges<'a>(&self, ids: impl IntoIterator<Item = &'a EdgeId>) -> Result<()> {
        match ids.into_iter().find(|e| !self.contains_edge(**e)) {
            Some(&missing) => Err(MeshError::missing_edge(missing)),
            None => Ok(()),
        }
    }

    pub(crate) fn require_faces<'a>(&self, ids: impl IntoIterator<Item = &'a FaceId>) -> Result<()> {
        match ids.into_iter().find(|f| !self.contains_face(**f)) {
            Some(&missing) => Err(MeshError::missing_face(missing)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::graph::test_fixtures::unit_quad;
    use crate::types::VertexId;

    #[test]
    fn test_sweeps_are_idempotent() {
        let (mut mesh, verts, face) = unit_quad();
        let edges: Vec<_> = mesh.face(face).unwrap().edge_ids.iter().copied().collect();

        // Nothing is orphaned while the face exists
        assert!(mesh.sweep_orphan_edges(edges.clone()).is_empty());
        assert!(mesh.sweep_orphan_vertices(verts).is_empty());

        mesh.delete_face(face);
        assert_eq!(mesh.sweep_orphan_edges(edges.clone()).len(), 4);
        assert_eq!(mesh.sweep_orphan_vertices(verts).len(), 4);
        assert!(mesh.is_empty());

        assert!(mesh.sweep_orphan_edges(edges).is_empty());
        assert!(mesh.sweep_orphan_vertices([VertexId(0), VertexId(100)]).is_empty());
    }
}
