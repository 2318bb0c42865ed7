//! Dissolve: remove elements while keeping the surface closed over the gap.
//!
//! Degree-2 vertices are spliced out of their faces. Everything else goes
//! through region dissolve: the selection is split into islands, each island
//! is widened to the faces it touches, and those faces are replaced by a
//! single face built from the island's ordered boundary loop.
//!
//! Every island is planned (boundary found and loop ordered) before any of
//! them is applied, so a region that cannot be closed fails the whole call
//! and the graph is left untouched.

use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::graph::MeshData;
use crate::topology::disjoint_set::DisjointSet;
use crate::topology::orient_loop_to_faces;
use crate::types::{EditResult, EdgeId, FaceId, Selection, VertexId, collapse_loop};

/// One island, ready to apply
#[derive(Debug)]
struct RegionPlan {
    faces: BTreeSet<FaceId>,
    loop_ids: Vec<VertexId>,
}

impl MeshData {
    /// Dissolve vertices.
    ///
    /// Vertices with other than two edges are region-dissolved first. Then
    /// each selected vertex that is left with exactly two edges is spliced
    /// out of its faces and replaced by an edge between its neighbours, and
    /// selected vertices left with at most one edge and no faces are
    /// removed.
    pub fn dissolve_vertices(&mut self, vertices: &[VertexId]) -> Result<EditResult> {
        self.require_vertices(vertices)?;
        let mark = self.id_mark();

        let regional: Vec<VertexId> = vertices
            .iter()
            .copied()
            .filter(|&v| self.vertex(v).is_some_and(|v| v.degree() != 2))
            .collect();
        let mut result = self.dissolve_region(&Selection::from_vertices(regional))?;

        for &v in vertices {
            let Some(vertex) = self.vertex(v) else {
                continue;
            };
            let degree = vertex.degree();
            let faceless = vertex.face_ids.is_empty();
            let edges: Vec<EdgeId> = vertex.edge_ids.iter().copied().collect();

            match (degree, faceless) {
                (2, _) => result.absorb(self.splice_vertex(v)),
                (0, _) | (1, true) => {
                    for edge in edges {
                        if self.delete_edge(edge) {
                            result.deleted_edges.push(edge);
                        }
                    }
                    if self.delete_vertex(v) {
                        result.deleted_vertices.push(v);
                    }
                }
                _ => trace!("dissolve_vertices: {:?} kept with degree {}", v, degree),
            }
        }

        result.created_vertices = self.vertices_since(mark);
        result.created_edges = self.edges_since(mark);
        result.created_faces = self.faces_since(mark);
        result.normalize();
        debug!(
            "dissolve_vertices: {} selected, {} face(s) created, {} removed",
            vertices.len(),
            result.created_faces.len(),
            result.deleted_faces.len()
        );
        Ok(result)
    }

    /// Dissolve edges.
    ///
    /// Edges are grouped by face adjacency (two edges bordering a common
    /// face dissolve together) and the faces of each group are merged.
    /// A border edge whose only face has no partner is left alone, and wire
    /// edges with no faces are simply deleted.
    pub fn dissolve_edges(&mut self, edges: &[EdgeId]) -> Result<EditResult> {
        self.require_edges(edges)?;

        let mut groups = Vec::new();
        let mut wire = Vec::new();
        for &edge in edges {
            if let Some(e) = self.edge(edge) {
                if e.face_ids.is_empty() {
                    wire.push(edge);
                } else {
                    groups.push(e.face_ids.clone());
                }
            }
        }

        let mut result = self.dissolve_face_groups(groups)?;
        if !wire.is_empty() {
            let mut endpoints = BTreeSet::new();
            for edge in wire {
                if let Some(e) = self.edge(edge) {
                    endpoints.insert(e.v1);
                    endpoints.insert(e.v2);
                }
                if self.delete_edge(edge) {
                    result.deleted_edges.push(edge);
                }
            }
            result.deleted_vertices.extend(self.sweep_orphan_vertices(endpoints));
            result.normalize();
        }
        Ok(result)
    }

    /// Merge each edge-connected group of selected faces into one face.
    ///
    /// A selected face with no selected neighbour is left alone.
    pub fn dissolve_faces(&mut self, faces: &[FaceId]) -> Result<EditResult> {
        self.require_faces(faces)?;

        let selected: Vec<FaceId> = faces
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: BTreeMap<FaceId, usize> =
            selected.iter().enumerate().map(|(i, &f)| (f, i)).collect();

        let mut set = DisjointSet::new(selected.len());
        for (i, &face) in selected.iter().enumerate() {
            for neighbour in self.face_neighbors(face) {
                if let Some(&j) = index.get(&neighbour) {
                    set.union(i, j);
                }
            }
        }

        let groups = set
            .groups()
            .into_iter()
            .map(|members| members.into_iter().map(|i| selected[i]).collect())
            .collect();
        self.dissolve_face_groups(groups)
    }

    /// Region dissolve over a mixed selection.
    ///
    /// Two elements are in the same island when a selected edge connects
    /// them, they are corners of the same selected face, or (for selected
    /// vertices) an edge joins them. Each island is widened to every face
    /// it touches; islands that touch a common face are merged.
    pub fn dissolve_region(&mut self, selection: &Selection) -> Result<EditResult> {
        self.require_vertices(&selection.vertices)?;
        self.require_edges(&selection.edges)?;
        self.require_faces(&selection.faces)?;

        let members: Vec<VertexId> = self.selection_vertex_set(selection).into_iter().collect();
        let index: BTreeMap<VertexId, usize> =
            members.iter().enumerate().map(|(i, &v)| (v, i)).collect();
        let mut set = DisjointSet::new(members.len());
        let join = |a: VertexId, b: VertexId, set: &mut DisjointSet| {
            if let (Some(&i), Some(&j)) = (index.get(&a), index.get(&b)) {
                set.union(i, j);
            }
        };

        for e in selection.edges.iter().filter_map(|&e| self.edge(e)) {
            join(e.v1, e.v2, &mut set);
        }
        for f in selection.faces.iter().filter_map(|&f| self.face(f)) {
            for (a, b) in f.vertex_pairs() {
                join(a, b, &mut set);
            }
        }
        for &v in &selection.vertices {
            for far in self.vertex_neighbors(v) {
                if selection.vertices.contains(&far) {
                    join(v, far, &mut set);
                }
            }
        }

        let mut touching: BTreeMap<usize, BTreeSet<FaceId>> = BTreeMap::new();
        let island_of = |v: VertexId, set: &mut DisjointSet| index.get(&v).map(|&i| set.find(i));
        for v in selection.vertices.iter().filter_map(|&v| self.vertex(v)) {
            if let Some(island) = island_of(v.id, &mut set) {
                touching.entry(island).or_default().extend(v.face_ids.iter().copied());
            }
        }
        for e in selection.edges.iter().filter_map(|&e| self.edge(e)) {
            if let Some(island) = island_of(e.v1, &mut set) {
                touching.entry(island).or_default().extend(e.face_ids.iter().copied());
            }
        }
        for f in selection.faces.iter().filter_map(|&f| self.face(f)) {
            if let Some(island) = f.vertex_ids.first().and_then(|&v| island_of(v, &mut set)) {
                touching.entry(island).or_default().insert(f.id);
            }
        }

        self.dissolve_face_groups(touching.into_values().collect())
    }

    /// Merge face groups that share a face, plan every resulting region,
    /// then apply them all.
    fn dissolve_face_groups(&mut self, groups: Vec<BTreeSet<FaceId>>) -> Result<EditResult> {
        let mark = self.id_mark();
        let merged = merge_overlapping(groups);

        // ===== PHASE 1: plan =====
        let mut plans = Vec::new();
        for faces in merged.into_iter().filter(|g| g.len() >= 2) {
            match self.plan_region(faces) {
                Ok(plan) => plans.push(plan),
                Err(err) => {
                    warn!("dissolve: region cannot be closed, aborting: {}", err);
                    return Err(err);
                }
            }
        }
        if plans.is_empty() {
            return Ok(EditResult::default());
        }

        // ===== PHASE 2: apply =====
        let mut deleted_faces = Vec::new();
        let mut edge_candidates = BTreeSet::new();
        let mut vertex_candidates = BTreeSet::new();
        for plan in &plans {
            for face in &plan.faces {
                if let Some(f) = self.face(*face) {
                    edge_candidates.extend(f.edge_ids.iter().copied());
                    vertex_candidates.extend(f.vertex_ids.iter().copied());
                }
                if self.delete_face(*face) {
                    deleted_faces.push(*face);
                }
            }
            if let Some(face) = self.add_face(&plan.loop_ids) {
                trace!(
                    "dissolve: {} face(s) -> {:?} with {} corners",
                    plan.faces.len(),
                    face,
                    plan.loop_ids.len()
                );
            }
        }

        // ===== PHASE 3: cleanup =====
        let (deleted_edges, deleted_vertices) = self.sweep_orphans(edge_candidates, vertex_candidates);

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
            "dissolve_region: {} island(s), {} face(s) in, {} out",
            plans.len(),
            result.deleted_faces.len(),
            result.created_faces.len()
        );
        Ok(result)
    }

    fn plan_region(&self, faces: BTreeSet<FaceId>) -> Result<RegionPlan> {
        let vertices: BTreeSet<VertexId> = faces
            .iter()
            .filter_map(|&f| self.face(f))
            .flat_map(|f| f.vertex_ids.iter().copied())
            .collect();
        let boundary = self.get_boundary_edges(&vertices, &BTreeSet::new(), &faces);
        let loop_ids = self.order_boundary_loop(&boundary)?;
        let loop_ids = orient_loop_to_faces(self, loop_ids, &faces);
        Ok(RegionPlan { faces, loop_ids })
    }

    /// Splice a degree-2 vertex out of its faces and bridge its neighbours.
    ///
    /// Each incident face is deleted and recreated without the vertex, or
    /// dropped when fewer than three distinct corners remain.
    fn splice_vertex(&mut self, vertex: VertexId) -> EditResult {
        let mark = self.id_mark();
        let mut result = EditResult::default();
        let Some(v) = self.vertex(vertex) else {
            return result;
        };
        let edges: Vec<EdgeId> = v.edge_ids.iter().copied().collect();
        let faces: Vec<FaceId> = v.face_ids.iter().copied().collect();
        let neighbours: Vec<VertexId> = edges
            .iter()
            .filter_map(|&e| self.edge(e))
            .filter_map(|e| e.other(vertex))
            .collect();

        for face in faces {
            let Some(old_loop) = self.face(face).map(|f| f.vertex_ids.clone()) else {
                continue;
            };
            let without: Vec<VertexId> = old_loop.into_iter().filter(|&id| id != vertex).collect();
            let new_loop = collapse_loop(&without);
            let distinct: BTreeSet<VertexId> = new_loop.iter().copied().collect();

            if self.delete_face(face) {
                result.deleted_faces.push(face);
            }
            if distinct.len() >= 3 {
                self.add_face(&new_loop);
            }
        }

        for edge in edges {
            if self.delete_edge(edge) {
                result.deleted_edges.push(edge);
            }
        }
        if self.delete_vertex(vertex) {
            result.deleted_vertices.push(vertex);
        }
        if let [p, q] = neighbours[..] {
            self.add_edge(p, q);
        }

        result.created_edges = self.edges_since(mark);
        result.created_faces = self.faces_since(mark);
        result.normalize();
        trace!("splice_vertex: {:?}", vertex);
        result
    }
}

/// Union groups that share at least one face
fn merge_overlapping(groups: Vec<BTreeSet<FaceId>>) -> Vec<BTreeSet<FaceId>> {
    let mut set = DisjointSet::new(groups.len());
    let mut owner: BTreeMap<FaceId, usize> = BTreeMap::new();
    for (i, group) in groups.iter().enumerate() {
        for &face in group {
            if let Some(&j) = owner.get(&face) {
                set.union(i, j);
            } else {
                owner.insert(face, i);
            }
        }
    }

    set.groups()
        .into_iter()
        .map(|members| {
            members
                .into_iter()
                .flat_map(|i| groups[i].iter().copied())
                .collect()
        })
        .collect()
}
