//! Results reported back to the editor shell.

use serde::{Deserialize, Serialize};

/// Ids created and deleted by one edit.
///
/// The shell uses these lists to update selection state (new elements
/// usually become the selection) and to decide whether an undo entry is
/// worth committing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditReport {
    pub created_vertices: Vec<u32>,
    pub created_edges: Vec<u32>,
    pub created_faces: Vec<u32>,
    pub deleted_vertices: Vec<u32>,
    pub deleted_edges: Vec<u32>,
    pub deleted_faces: Vec<u32>,
    /// Vertices whose position changed without a topology change
    pub moved_vertices: Vec<u32>,
    /// Surviving vertex of a merge
    pub merged_into: Option<u32>,
    /// Original to copy vertex pairs from a duplicate
    pub vertex_map: Vec<(u32, u32)>,
}

impl EditReport {
    /// True when the edit changed nothing.
    pub fn is_empty(&self) -> bool {
        self.created_vertices.is_empty()
            && self.created_edges.is_empty()
            && self.created_faces.is_empty()
            && self.deleted_vertices.is_empty()
            && self.deleted_edges.is_empty()
            && self.deleted_faces.is_empty()
            && self.moved_vertices.is_empty()
    }
}

/// Size of the most recently generated render buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderStats {
    pub vertices: u32,
    pub edges: u32,
    pub faces: u32,
    /// Buffer slots (GPU vertices) after shading-dependent splitting
    pub buffer_slots: u32,
    pub triangles: u32,
}
