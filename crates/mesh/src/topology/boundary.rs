//! Boundary extraction and boundary-loop ordering for sub-selections.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::trace;

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{EdgeId, EdgeKey, FaceId, VertexId, loop_pairs};

impl MeshData {
    /// Boundary edges of a selection.
    ///
    /// Only selected faces whose every vertex is in `vertices` take part.
    /// Each of their loop pairs is counted per normalized key; a pair used
    /// by exactly one such face is boundary. Explicitly selected edges that
    /// border none of those faces are boundary too, which is how a closed
    /// wire loop becomes fillable. Sorted by id.
    pub fn get_boundary_edges(
        &self,
        vertices: &BTreeSet<VertexId>,
        edges: &BTreeSet<EdgeId>,
        faces: &BTreeSet<FaceId>,
    ) -> Vec<EdgeId> {
        let enclosed: BTreeSet<FaceId> = faces
            .iter()
            .copied()
            .filter(|&f| {
                self.face(f)
                    .is_some_and(|face| face.vertex_ids.iter().all(|v| vertices.contains(v)))
            })
            .collect();

        let mut counts: HashMap<EdgeKey, usize> = HashMap::new();
        for face in enclosed.iter().filter_map(|&f| self.face(f)) {
            // A loop like [a, b, a, c] walks a-b twice but is one reference
            let keys: BTreeSet<EdgeKey> = face
                .vertex_pairs()
                .map(|(a, b)| EdgeKey::new(a, b))
                .collect();
            for key in keys {
                *counts.entry(key).or_insert(0) += 1;
            }
        }

        let mut boundary: BTreeSet<EdgeId> = counts
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .filter_map(|(key, _)| self.edge_between(key.0, key.1))
            .collect();

        for &edge in edges {
            if let Some(e) = self.edge(edge) {
                if e.face_ids.is_disjoint(&enclosed) {
                    boundary.insert(edge);
                }
            }
        }

        boundary.into_iter().collect()
    }

    /// Order boundary edges into a single closed vertex loop.
    ///
    /// Walks from the first edge's first endpoint to unvisited neighbours
    /// until the walk returns to the start. Fails with `InvalidTopology`
    /// when there are fewer than three edges, when the walk dead-ends, or
    /// when it closes without using every edge (more than one loop).
    pub fn order_boundary_loop(&self, edges: &[EdgeId]) -> Result<Vec<VertexId>> {
        let unique: BTreeSet<EdgeId> = edges.iter().copied().collect();
        if unique.len() < 3 {
            return Err(MeshError::InvalidTopology(format!(
                "a boundary loop needs at least 3 edges, got {}",
                unique.len()
            )));
        }

        let mut adjacency: BTreeMap<VertexId, Vec<VertexId>> = BTreeMap::new();
        let mut start = None;
        for &id in edges {
            if !unique.contains(&id) {
                continue;
            }
            let e = self.edge(id).ok_or_else(|| MeshError::missing_edge(id))?;
            start.get_or_insert(e.v1);
            adjacency.entry(e.v1).or_default().push(e.v2);
            adjacency.entry(e.v2).or_default().push(e.v1);
        }
        let Some(start) = start else {
            return Err(MeshError::InvalidTopology("empty boundary".to_string()));
        };

        let mut ordered = vec![start];
        let mut visited: BTreeSet<VertexId> = BTreeSet::from([start]);
        let mut current = start;
        loop {
            let neighbours = adjacency.get(&current).map(Vec::as_slice).unwrap_or(&[]);
            if let Some(&next) = neighbours.iter().find(|n| !visited.contains(n)) {
                visited.insert(next);
                ordered.push(next);
                current = next;
                continue;
            }
            if ordered.len() >= 3 && neighbours.contains(&start) {
                break;
            }
            return Err(MeshError::InvalidTopology(format!(
                "boundary walk from {:?} dead-ends at {:?}",
                start, current
            )));
        }

        if ordered.len() != unique.len() {
            return Err(MeshError::InvalidTopology(format!(
                "boundary loop covers {} of {} edges",
                ordered.len(),
                unique.len()
            )));
        }

        trace!("order_boundary_loop: {} vertices", ordered.len());
        Ok(ordered)
    }
}

/// Reverse `loop_ids` if it runs against the winding of the faces it bounds.
///
/// The first loop pair that one of `faces` also walks decides; a loop that
/// touches none of them is returned unchanged.
pub(crate) fn orient_loop_to_faces(
    mesh: &MeshData,
    mut loop_ids: Vec<VertexId>,
    faces: &BTreeSet<FaceId>,
) -> Vec<VertexId> {
    let pairs: Vec<(VertexId, VertexId)> = loop_pairs(&loop_ids).collect();
    for (a, b) in pairs {
        let Some(edge) = mesh.edge_between(a, b).and_then(|e| mesh.edge(e)) else {
            continue;
        };
        for face in edge.face_ids.intersection(faces).filter_map(|&f| mesh.face(f)) {
            if face.has_directed_pair(a, b) {
                return loop_ids;
            }
            if face.has_directed_pair(b, a) {
                loop_ids.reverse();
                return loop_ids;
            }
        }
    }
    loop_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::{grid, unit_quad};
    use glam::Vec3;

    fn all_vertices(mesh: &MeshData) -> BTreeSet<VertexId> {
        mesh.vertex_ids().collect()
    }

    #[test]
    fn test_quad_boundary_is_all_four_edges() {
        let (mesh, _, face) = unit_quad();
        let boundary =
            mesh.get_boundary_edges(&all_vertices(&mesh), &BTreeSet::new(), &BTreeSet::from([face]));
        assert_eq!(boundary.len(), 4);
    }

    #[test]
    fn test_grid_boundary_skips_interior_edges() {
        let mesh = grid(2);
        let faces: BTreeSet<FaceId> = mesh.face_ids().collect();
        let boundary = mesh.get_boundary_edges(&all_vertices(&mesh), &BTreeSet::new(), &faces);
        assert_eq!(boundary.len(), 8);
        for edge in &boundary {
            assert_eq!(mesh.edge(*edge).unwrap().face_ids.len(), 1);
        }

        let ordered = mesh.order_boundary_loop(&boundary).unwrap();
        assert_eq!(ordered.len(), 8);
        assert!(!ordered.contains(&VertexId(4)));
    }

    #[test]
    fn test_faces_outside_vertex_set_are_ignored() {
        let (mesh, [v0, v1, v2, _], face) = unit_quad();
        let boundary =
            mesh.get_boundary_edges(&BTreeSet::from([v0, v1, v2]), &BTreeSet::new(), &BTreeSet::from([face]));
        assert!(boundary.is_empty());
    }

    #[test]
    fn test_wire_loop_boundary() {
        let mut mesh = MeshData::new();
        let a = mesh.add_vertex(Vec3::ZERO);
        let b = mesh.add_vertex(Vec3::X);
        let c = mesh.add_vertex(Vec3::Y);
        let edges: BTreeSet<EdgeId> = [(a, b), (b, c), (c, a)]
            .into_iter()
            .filter_map(|(x, y)| mesh.add_edge(x, y))
            .collect();

        let boundary = mesh.get_boundary_edges(&BTreeSet::new(), &edges, &BTreeSet::new());
        assert_eq!(boundary.len(), 3);
        assert_eq!(mesh.order_boundary_loop(&boundary).unwrap().len(), 3);
    }

    #[test]
    fn test_open_chain_does_not_close() {
        let mut mesh = MeshData::new();
        let ids: Vec<VertexId> = (0..4).map(|i| mesh.add_vertex(Vec3::X * i as f32)).collect();
        let edges: Vec<EdgeId> = ids.windows(2).filter_map(|w| mesh.add_edge(w[0], w[1])).collect();

        assert!(matches!(
            mesh.order_boundary_loop(&edges),
            Err(MeshError::InvalidTopology(_))
        ));
        assert!(matches!(
            mesh.order_boundary_loop(&edges[..2]),
            Err(MeshError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_two_loops_are_rejected() {
        let mut mesh = MeshData::new();
        let mut edges = Vec::new();
        for offset in [0.0, 10.0] {
            let a = mesh.add_vertex(Vec3::new(offset, 0.0, 0.0));
            let b = mesh.add_vertex(Vec3::new(offset + 1.0, 0.0, 0.0));
            let c = mesh.add_vertex(Vec3::new(offset, 1.0, 0.0));
            edges.extend([(a, b), (b, c), (c, a)].into_iter().filter_map(|(x, y)| mesh.add_edge(x, y)));
        }
        assert!(matches!(
            mesh.order_boundary_loop(&edges),
            Err(MeshError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_orient_loop_matches_face_winding() {
        let (mesh, [v0, v1, v2, v3], face) = unit_quad();
        let faces = BTreeSet::from([face]);
        let reversed = vec![v0, v3, v2, v1];
        assert_eq!(orient_loop_to_faces(&mesh, reversed, &faces), vec![v1, v2, v3, v0]);
        assert_eq!(orient_loop_to_faces(&mesh, vec![v0, v1, v2, v3], &faces), vec![v0, v1, v2, v3]);
    }
}
