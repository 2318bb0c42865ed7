//! Mesh editing command types.

use polyedit_config::ShadingMode;
use serde::{Deserialize, Serialize};

use crate::types::SelectionIds;

/// Sub-object selection mode for mesh editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MeshSelectionMode {
    /// Select individual vertices
    #[default]
    Vertex,
    /// Select edges
    Edge,
    /// Select faces
    Face,
}

/// Which flavor of delete a tool asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeleteScope {
    /// Remove exactly the named elements (and whatever would dangle)
    #[default]
    Elements,
    /// Also remove every face fully enclosed by the selection
    Selection,
}

/// Commands that mutate or re-render the mesh being edited.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "op", content = "args")]
pub enum MeshEditCommand {
    /// Add a loose vertex at a local-space position
    AddVertex { position: [f32; 3] },
    /// Move vertices to new local-space positions
    SetVertexPositions { positions: Vec<(u32, [f32; 3])> },
    /// Two ids create an edge, three or more create a face
    CreateEdgeOrFace { vertex_ids: Vec<u32> },
    /// Collapse vertices into the first id, at their centroid
    MergeVertices { vertex_ids: Vec<u32> },
    /// Insert a vertex on an edge at `factor` (0 = first endpoint)
    SplitEdge { edge_id: u32, factor: f32 },
    /// Delete the selection
    Delete {
        mode: MeshSelectionMode,
        scope: DeleteScope,
        selection: SelectionIds,
    },
    /// Dissolve the selection, rebuilding the surrounding surface
    Dissolve {
        mode: MeshSelectionMode,
        selection: SelectionIds,
    },
    /// Duplicate the selection in place
    Duplicate {
        mode: MeshSelectionMode,
        selection: SelectionIds,
    },
    /// Extrude faces and move the new cap by `offset`
    ExtrudeFaces { face_ids: Vec<u32>, offset: [f32; 3] },
    /// Change the shading policy of the render buffer
    SetShading {
        mode: ShadingMode,
        smoothing_angle_degrees: Option<f32>,
    },
}

impl MeshEditCommand {
    /// Short name used in logs and error reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AddVertex { .. } => "add_vertex",
            Self::SetVertexPositions { .. } => "set_vertex_positions",
            Self::CreateEdgeOrFace { .. } => "create_edge_or_face",
            Self::MergeVertices { .. } => "merge_vertices",
            Self::SplitEdge { .. } => "split_edge",
            Self::Delete { .. } => "delete",
            Self::Dissolve { .. } => "dissolve",
            Self::Duplicate { .. } => "duplicate",
            Self::ExtrudeFaces { .. } => "extrude_faces",
            Self::SetShading { .. } => "set_shading",
        }
    }

    /// Whether the command changes topology or positions (and therefore
    /// deserves an undo entry when it succeeds).
    pub fn mutates_mesh(&self) -> bool {
        !matches!(self, Self::SetShading { .. })
    }
}
