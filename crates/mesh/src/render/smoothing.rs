//! Smoothing groups for auto shading.
//!
//! Around each vertex, two incident faces land in the same group when they
//! share an edge at that vertex and the angle between their normals is
//! within the smoothing threshold. Each group becomes one buffer slot.

use glam::Vec3;
use std::collections::BTreeMap;

use crate::graph::MeshData;
use crate::topology::disjoint_set::DisjointSet;
use crate::types::{FaceId, VertexId};

/// Faces around `vertex`, partitioned into smoothing groups.
///
/// `normals` holds unit face normals (zero for degenerate faces); `cos_threshold`
/// is the cosine of the smoothing angle. Groups come back ordered by their
/// lowest face id.
pub(crate) fn vertex_smoothing_groups(
    mesh: &MeshData,
    vertex: VertexId,
    normals: &BTreeMap<FaceId, Vec3>,
    cos_threshold: f32,
) -> Vec<Vec<FaceId>> {
    let Some(v) = mesh.vertex(vertex) else {
        return Vec::new();
    };
    let faces: Vec<FaceId> = v.face_ids.iter().copied().collect();
    let index: BTreeMap<FaceId, usize> = faces.iter().enumerate().map(|(i, &f)| (f, i)).collect();
    let normal = |f: FaceId| normals.get(&f).copied().unwrap_or(Vec3::ZERO);

    let mut set = DisjointSet::new(faces.len());
    for edge in v.edge_ids.iter().filter_map(|&e| mesh.edge(e)) {
        let around: Vec<FaceId> = edge
            .face_ids
            .iter()
            .copied()
            .filter(|f| index.contains_key(f))
            .collect();
        for (i, &a) in around.iter().enumerate() {
            for &b in &around[i + 1..] {
                if normal(a).dot(normal(b)) >= cos_threshold {
                    set.union(index[&a], index[&b]);
                }
            }
        }
    }

    set.groups()
        .into_iter()
        .map(|members| members.into_iter().map(|i| faces[i]).collect())
        .collect()
}

/// Normalized mean of the member faces' unit normals
pub(crate) fn group_normal(group: &[FaceId], normals: &BTreeMap<FaceId, Vec3>) -> Vec3 {
    group
        .iter()
        .filter_map(|f| normals.get(f))
        .copied()
        .sum::<Vec3>()
        .normalize_or_zero()
}
