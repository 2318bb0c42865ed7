//! Main IPC message enums for communication between the shell and the kernel.

use serde::{Deserialize, Serialize};

use crate::commands::MeshEditCommand;
use crate::error::IpcError;
use crate::types::{EditReport, RenderStats};

/// Messages from the editor shell to the mesh kernel.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum UiToMesh {
    /// Apply an edit command to the current mesh
    Edit(MeshEditCommand),
    /// Request an undo snapshot of the current mesh
    RequestSnapshot,
    /// Replace the current mesh with a previously taken snapshot
    RestoreSnapshot { snapshot: String },
}

/// Messages from the mesh kernel to the editor shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum MeshToUi {
    /// An edit succeeded; the render buffer has been regenerated
    EditApplied {
        command: String,
        report: EditReport,
        stats: RenderStats,
    },
    /// An edit was rejected and the mesh left unchanged
    EditFailed {
        command: String,
        code: String,
        message: String,
    },
    /// Serialized mesh snapshot for the undo history
    Snapshot { snapshot: String },
    /// A snapshot was restored
    SnapshotRestored { stats: RenderStats },
}

impl UiToMesh {
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl MeshToUi {
    pub fn from_json(json: &str) -> Result<Self, IpcError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, IpcError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{DeleteScope, MeshSelectionMode};
    use crate::types::SelectionIds;

    #[test]
    fn test_edit_command_json_shape() {
        let msg = UiToMesh::Edit(MeshEditCommand::MergeVertices {
            vertex_ids: vec![3, 4],
        });
        let json = msg.to_json().unwrap();
        assert!(json.contains(r#""type":"Edit""#));
        assert!(json.contains(r#""op":"MergeVertices""#));

        match UiToMesh::from_json(&json).unwrap() {
            UiToMesh::Edit(MeshEditCommand::MergeVertices { vertex_ids }) => {
                assert_eq!(vertex_ids, vec![3, 4]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_delete_command_from_shell_json() {
        let json = r#"{"type":"Edit","data":{"op":"Delete","args":{
            "mode":"Face","scope":"Selection","selection":{"faces":[7]}}}}"#;
        match UiToMesh::from_json(json).unwrap() {
            UiToMesh::Edit(MeshEditCommand::Delete {
                mode,
                scope,
                selection,
            }) => {
                assert_eq!(mode, MeshSelectionMode::Face);
                assert_eq!(scope, DeleteScope::Selection);
                assert_eq!(selection, SelectionIds::faces([7]));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_malformed_message_is_an_error() {
        let err = UiToMesh::from_json(r#"{"type":"Teleport"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Malformed shell message"));
    }

    #[test]
    fn test_empty_report() {
        let mut report = EditReport::default();
        assert!(report.is_empty());
        report.deleted_faces.push(1);
        assert!(!report.is_empty());
    }
}
