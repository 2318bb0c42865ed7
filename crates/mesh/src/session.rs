//! Editing session: one mesh, its render config and its current buffer.
//!
//! The session is the kernel-side end of the shell protocol. It applies
//! [`UiToMesh`] messages, keeps the render buffer in step with the mesh,
//! and answers with a [`MeshToUi`] message.

use polyedit_config::{RenderConfig, ShadingMode};
use polyedit_ipc::{EditReport, MeshEditCommand, MeshToUi, RenderStats, UiToMesh};
use tracing::{debug, warn};

use crate::command::apply_command;
use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::render::RenderBuffer;

#[derive(Debug, Clone)]
pub struct EditSession {
    mesh: MeshData,
    config: RenderConfig,
    buffer: RenderBuffer,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(MeshData::new(), RenderConfig::default())
    }
}

impl EditSession {
    pub fn new(mesh: MeshData, config: RenderConfig) -> Self {
        let buffer = RenderBuffer::build(&mesh, &config);
        Self {
            mesh,
            config,
            buffer,
        }
    }

    pub fn mesh(&self) -> &MeshData {
        &self.mesh
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn buffer(&self) -> &RenderBuffer {
        &self.buffer
    }

    /// Handle one message from the shell.
    pub fn handle(&mut self, message: UiToMesh) -> MeshToUi {
        match message {
            UiToMesh::Edit(command) => {
                let name = command.name().to_string();
                match self.apply(&command) {
                    Ok(report) => MeshToUi::EditApplied {
                        command: name,
                        report,
                        stats: self.render_stats(),
                    },
                    Err(err) => {
                        warn!("{} rejected: {}", name, err);
                        MeshToUi::EditFailed {
                            command: name,
                            code: err.code().to_string(),
                            message: err.to_string(),
                        }
                    }
                }
            }
            UiToMesh::RequestSnapshot => match self.mesh.to_json() {
                Ok(snapshot) => MeshToUi::Snapshot { snapshot },
                Err(err) => Self::failure("request_snapshot", &err),
            },
            UiToMesh::RestoreSnapshot { snapshot } => match self.restore(&snapshot) {
                Ok(()) => MeshToUi::SnapshotRestored {
                    stats: self.render_stats(),
                },
                Err(err) => Self::failure("restore_snapshot", &err),
            },
        }
    }

    /// Apply a command, update the render config for shading changes, and
    /// rebuild the buffer if anything visible changed.
    pub fn apply(&mut self, command: &MeshEditCommand) -> Result<EditReport> {
        let report = apply_command(&mut self.mesh, command)?;

        if let MeshEditCommand::SetShading {
            mode,
            smoothing_angle_degrees,
        } = command
        {
            self.set_shading(*mode, *smoothing_angle_degrees);
            self.rebuild();
        } else if command.mutates_mesh() {
            self.rebuild();
        }
        Ok(report)
    }

    fn set_shading(&mut self, mode: ShadingMode, smoothing_angle_degrees: Option<f32>) {
        self.config.shading = mode;
        if let Some(angle) = smoothing_angle_degrees {
            self.config = std::mem::take(&mut self.config).with_smoothing_angle(angle);
        }
        debug!(
            "shading set to {} ({} deg)",
            mode.name(),
            self.config.smoothing_angle_degrees
        );
    }

    /// Replace the mesh with a snapshot. On failure the current mesh stays.
    pub fn restore(&mut self, snapshot: &str) -> Result<()> {
        self.mesh = MeshData::from_json(snapshot)?;
        self.rebuild();
        Ok(())
    }

    pub fn rebuild(&mut self) {
        self.buffer = RenderBuffer::build(&self.mesh, &self.config);
    }

    pub fn render_stats(&self) -> RenderStats {
        RenderStats {
            vertices: self.mesh.vertex_count() as u32,
            edges: self.mesh.edge_count() as u32,
            faces: self.mesh.face_count() as u32,
            buffer_slots: self.buffer.slot_count() as u32,
            triangles: self.buffer.triangle_count() as u32,
        }
    }

    fn failure(command: &str, err: &MeshError) -> MeshToUi {
        warn!("{} failed: {}", command, err);
        MeshToUi::EditFailed {
            command: command.to_string(),
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polyedit_ipc::{MeshSelectionMode, SelectionIds};

    fn cube_session() -> EditSession {
        EditSession::new(MeshData::cube(1.0), RenderConfig::new(ShadingMode::Flat))
    }

    #[test]
    fn test_edit_rebuilds_buffer() {
        let mut session = cube_session();
        assert_eq!(session.render_stats().triangles, 12);

        let reply = session.handle(UiToMesh::Edit(MeshEditCommand::Delete {
            mode: MeshSelectionMode::Face,
            scope: polyedit_ipc::DeleteScope::Elements,
            selection: SelectionIds::faces([0]),
        }));
        match reply {
            MeshToUi::EditApplied { command, stats, .. } => {
                assert_eq!(command, "delete");
                assert_eq!(stats.faces, 5);
                assert_eq!(stats.triangles, 10);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_failed_edit_reports_code() {
        let mut session = cube_session();
        let reply = session.handle(UiToMesh::Edit(MeshEditCommand::SplitEdge {
            edge_id: 500,
            factor: 0.5,
        }));
        match reply {
            MeshToUi::EditFailed { code, .. } => assert_eq!(code, "missing_element"),
            other => panic!("unexpected reply: {:?}", other),
        }
        assert_eq!(session.mesh().edge_count(), 12);
    }

    #[test]
    fn test_set_shading_changes_slot_layout() {
        let mut session = cube_session();
        assert_eq!(session.buffer().slot_count(), 24);

        session
            .apply(&MeshEditCommand::SetShading {
                mode: ShadingMode::Smooth,
                smoothing_angle_degrees: None,
            })
            .unwrap();
        assert_eq!(session.config().shading, ShadingMode::Smooth);
        assert_eq!(session.buffer().slot_count(), 8);

        session
            .apply(&MeshEditCommand::SetShading {
                mode: ShadingMode::Auto,
                smoothing_angle_degrees: Some(120.0),
            })
            .unwrap();
        assert_eq!(session.buffer().slot_count(), 8);
    }

    #[test]
    fn test_snapshot_restore_undoes_edit() {
        let mut session = cube_session();
        let snapshot = match session.handle(UiToMesh::RequestSnapshot) {
            MeshToUi::Snapshot { snapshot } => snapshot,
            other => panic!("unexpected reply: {:?}", other),
        };

        session
            .apply(&MeshEditCommand::ExtrudeFaces {
                face_ids: vec![0],
                offset: [0.0, 0.0, 1.0],
            })
            .unwrap();
        assert_eq!(session.mesh().face_count(), 10);

        match session.handle(UiToMesh::RestoreSnapshot { snapshot }) {
            MeshToUi::SnapshotRestored { stats } => {
                assert_eq!(stats.faces, 6);
                assert_eq!(stats.triangles, 12);
            }
            other => panic!("unexpected reply: {:?}", other),
        }
    }

    #[test]
    fn test_bad_snapshot_keeps_mesh() {
        let mut session = cube_session();
        let reply = session.handle(UiToMesh::RestoreSnapshot {
            snapshot: "{not json".to_string(),
        });
        assert!(matches!(reply, MeshToUi::EditFailed { ref code, .. } if code == "snapshot"));
        assert_eq!(session.mesh().face_count(), 6);
    }
}
