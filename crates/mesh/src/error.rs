//! Error types for mesh kernel operations.

use crate::types::ElementKind;

/// Result type alias using [`MeshError`].
pub type Result<T> = std::result::Result<T, MeshError>;

/// Errors surfaced by topology operators and selection-scoped edits.
///
/// The primitive layer (`add_*`, `delete_*`, lookups) never produces these;
/// it answers missing ids with `None` or a silent no-op.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The operation needs at least three vertices, or a boundary loop
    /// could not be closed.
    #[error("Invalid mesh topology: {0}")]
    InvalidTopology(String),

    /// The operation referenced an id that is no longer in the graph.
    #[error("Missing {kind} {id}")]
    MissingElement { kind: ElementKind, id: u32 },

    /// Collapsing duplicate ids left fewer than three distinct vertices.
    #[error("Degenerate result: {0}")]
    DegenerateResult(String),

    /// A snapshot could not be encoded or decoded.
    #[error("Snapshot serialization failed: {0}")]
    Snapshot(#[from] serde_json::Error),
}

impl MeshError {
    /// Stable machine-readable code for the editor shell.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTopology(_) => "invalid_topology",
            Self::MissingElement { .. } => "missing_element",
            Self::DegenerateResult(_) => "degenerate_result",
            Self::Snapshot(_) => "snapshot",
        }
    }

    pub(crate) fn missing_vertex(id: crate::types::VertexId) -> Self {
        Self::MissingElement {
            kind: ElementKind::Vertex,
            id: id.0,
        }
    }

    pub(crate) fn missing_edge(id: crate::types::EdgeId) -> Self {
        Self::MissingElement {
            kind: ElementKind::Edge,
            id: id.0,
        }
    }

    pub(crate) fn missing_face(id: crate::types::FaceId) -> Self {
        Self::MissingElement {
            kind: ElementKind::Face,
            id: id.0,
        }
    }
}
