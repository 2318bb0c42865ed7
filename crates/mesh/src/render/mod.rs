//! Render buffer generation
//!
//! Turns the mesh graph into triangle data for the viewport: per-slot
//! positions and normals, triangle indices, and the mapping between logical
//! vertices and buffer slots that picking reads back. The generator is
//! read-only over the graph and is rebuilt after every edit.
//!
//! How vertices are shared between faces depends on [`ShadingMode`]:
//! - Flat: every face corner gets its own slot with the face normal
//! - Smooth: one slot per logical vertex with an area-weighted normal
//! - Auto: one slot per smoothing group around each vertex

mod smoothing;
mod triangulate;

use glam::Vec3;
use polyedit_config::{RenderConfig, ShadingMode};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use crate::graph::MeshData;
use crate::types::{FaceId, VertexId};
use smoothing::{group_normal, vertex_smoothing_groups};
use triangulate::triangulate_polygon;

/// Normal given to slots that have no usable face normal
const FALLBACK_NORMAL: Vec3 = Vec3::Z;

/// Interleaved vertex as uploaded to the GPU
///
/// Field order matches the vertex layout: position then normal, tightly
/// packed with no padding.
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct GpuVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

/// Drawable triangle data derived from a mesh
#[derive(Debug, Clone, Default)]
pub struct RenderBuffer {
    /// Position per buffer slot
    pub positions: Vec<[f32; 3]>,
    /// Normal per buffer slot
    pub normals: Vec<[f32; 3]>,
    /// Three slot indices per triangle
    pub indices: Vec<u32>,
    /// Logical vertex to every slot that carries it
    pub vertex_index_map: HashMap<VertexId, Vec<u32>>,
    /// Slot to the logical vertex it carries
    pub buffer_slot_to_vertex: Vec<VertexId>,
    /// Source face per triangle; `None` for the degenerate triangles that
    /// keep isolated vertices pickable
    pub triangle_faces: Vec<Option<FaceId>>,
}

impl RenderBuffer {
    /// Build the buffer for `mesh` under `config`.
    pub fn build(mesh: &MeshData, config: &RenderConfig) -> Self {
        let mut buffer = Self::default();
        let unit_normals: BTreeMap<FaceId, Vec3> = mesh
            .face_ids()
            .map(|f| (f, mesh.face_normal(f).unwrap_or(Vec3::ZERO)))
            .collect();

        // Slot of every (vertex, face) corner
        let mut corner_slots: HashMap<(VertexId, FaceId), u32> = HashMap::new();

        match config.shading {
            ShadingMode::Flat => {
                for face in mesh.faces() {
                    let normal = unit_normals.get(&face.id).copied().unwrap_or(Vec3::ZERO);
                    for &v in &face.vertex_ids {
                        if let Some(position) = mesh.position(v) {
                            let slot = buffer.push_slot(v, position, normal);
                            corner_slots.insert((v, face.id), slot);
                        }
                    }
                }
            }
            ShadingMode::Smooth => {
                for vertex in mesh.vertices() {
                    let normal: Vec3 = vertex
                        .face_ids
                        .iter()
                        .filter_map(|&f| mesh.face_area_normal(f))
                        .sum();
                    let slot = buffer.push_slot(vertex.id, vertex.position, normal.normalize_or_zero());
                    for &f in &vertex.face_ids {
                        corner_slots.insert((vertex.id, f), slot);
                    }
                }
            }
            ShadingMode::Auto => {
                let cos_threshold = config.smoothing_cos();
                for vertex in mesh.vertices() {
                    for group in vertex_smoothing_groups(mesh, vertex.id, &unit_normals, cos_threshold) {
                        let normal = group_normal(&group, &unit_normals);
                        let slot = buffer.push_slot(vertex.id, vertex.position, normal);
                        for f in group {
                            corner_slots.insert((vertex.id, f), slot);
                        }
                    }
                }
            }
        }

        for face in mesh.faces() {
            let Some(positions) = mesh.face_positions(face.id) else {
                continue;
            };
            let slots: Option<Vec<u32>> = face
                .vertex_ids
                .iter()
                .map(|&v| corner_slots.get(&(v, face.id)).copied())
                .collect();
            let Some(slots) = slots else {
                continue;
            };
            for [a, b, c] in triangulate_polygon(&positions, config.collinear_epsilon, config.triangulate) {
                buffer.indices.extend([slots[a], slots[b], slots[c]]);
                buffer.triangle_faces.push(Some(face.id));
            }
        }

        // Vertices no face uses still need a pickable triangle
        for vertex in mesh.vertices().filter(|v| v.face_ids.is_empty()) {
            let slot = match buffer.vertex_index_map.get(&vertex.id).and_then(|s| s.first()) {
                Some(&slot) => slot,
                None => buffer.push_slot(vertex.id, vertex.position, Vec3::ZERO),
            };
            buffer.indices.extend([slot, slot, slot]);
            buffer.triangle_faces.push(None);
        }

        debug!(
            "RenderBuffer::build: {} shading, {} slots, {} triangles",
            config.shading.name(),
            buffer.slot_count(),
            buffer.triangle_count()
        );
        buffer
    }

    fn push_slot(&mut self, vertex: VertexId, position: Vec3, normal: Vec3) -> u32 {
        let slot = self.positions.len() as u32;
        let normal = if normal == Vec3::ZERO { FALLBACK_NORMAL } else { normal };
        self.positions.push(position.to_array());
        self.normals.push(normal.to_array());
        self.buffer_slot_to_vertex.push(vertex);
        self.vertex_index_map.entry(vertex).or_default().push(slot);
        slot
    }

    pub fn slot_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Every slot carrying `vertex` (several under flat or auto shading)
    pub fn slots_for(&self, vertex: VertexId) -> &[u32] {
        self.vertex_index_map
            .get(&vertex)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn vertex_for_slot(&self, slot: u32) -> Option<VertexId> {
        self.buffer_slot_to_vertex.get(slot as usize).copied()
    }

    /// Logical vertices of a triangle, for picking
    pub fn triangle_vertices(&self, triangle: usize) -> Option<[VertexId; 3]> {
        let base = triangle.checked_mul(3)?;
        let tri = self.indices.get(base..base + 3)?;
        Some([
            self.vertex_for_slot(tri[0])?,
            self.vertex_for_slot(tri[1])?,
            self.vertex_for_slot(tri[2])?,
        ])
    }

    /// Face a triangle was cut from, if any
    pub fn triangle_face(&self, triangle: usize) -> Option<FaceId> {
        self.triangle_faces.get(triangle).copied().flatten()
    }

    /// Interleaved position/normal vertices ready for upload
    pub fn gpu_vertices(&self) -> Vec<GpuVertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| GpuVertex { position, normal })
            .collect()
    }

    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
