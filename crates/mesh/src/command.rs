//! Applies editor-shell commands to a mesh.
//!
//! Translates the `u32` ids of [`MeshEditCommand`] into typed ids, calls the
//! matching kernel operation, and reports what changed as an [`EditReport`].

use glam::Vec3;
use polyedit_ipc::{DeleteScope, EditReport, MeshEditCommand, MeshSelectionMode, SelectionIds};
use tracing::debug;

use crate::error::{MeshError, Result};
use crate::graph::MeshData;
use crate::types::{DuplicateResult, EditResult, EdgeId, EdgeOrFace, FaceId, Selection, VertexId};

impl From<EditResult> for EditReport {
    fn from(result: EditResult) -> Self {
        Self {
            created_vertices: result.created_vertices.into_iter().map(|v| v.0).collect(),
            created_edges: result.created_edges.into_iter().map(|e| e.0).collect(),
            created_faces: result.created_faces.into_iter().map(|f| f.0).collect(),
            deleted_vertices: result.deleted_vertices.into_iter().map(|v| v.0).collect(),
            deleted_edges: result.deleted_edges.into_iter().map(|e| e.0).collect(),
            deleted_faces: result.deleted_faces.into_iter().map(|f| f.0).collect(),
            ..Default::default()
        }
    }
}

impl From<DuplicateResult> for EditReport {
    fn from(result: DuplicateResult) -> Self {
        let vertex_map = result.vertex_map.iter().map(|(k, v)| (k.0, v.0)).collect();
        Self {
            vertex_map,
            ..result.edit.into()
        }
    }
}

impl From<&SelectionIds> for Selection {
    fn from(ids: &SelectionIds) -> Self {
        Self {
            vertices: ids.vertices.iter().map(|&v| VertexId(v)).collect(),
            edges: ids.edges.iter().map(|&e| EdgeId(e)).collect(),
            faces: ids.faces.iter().map(|&f| FaceId(f)).collect(),
        }
    }
}

fn vertex_ids(raw: &[u32]) -> Vec<VertexId> {
    raw.iter().map(|&v| VertexId(v)).collect()
}

fn edge_ids(raw: &[u32]) -> Vec<EdgeId> {
    raw.iter().map(|&e| EdgeId(e)).collect()
}

fn face_ids(raw: &[u32]) -> Vec<FaceId> {
    raw.iter().map(|&f| FaceId(f)).collect()
}

/// Apply one command and report the ids it touched.
///
/// A dissolve whose selection mixes element kinds runs as a region
/// dissolve regardless of mode. Shading changes do not touch the mesh and
/// report nothing; the caller owns the render config.
pub fn apply_command(mesh: &mut MeshData, command: &MeshEditCommand) -> Result<EditReport> {
    let mark = mesh.id_mark();

    let report = match command {
        MeshEditCommand::AddVertex { position } => {
            let id = mesh.add_vertex(Vec3::from_array(*position));
            EditReport {
                created_vertices: vec![id.0],
                ..Default::default()
            }
        }

        MeshEditCommand::SetVertexPositions { positions } => {
            if let Some(&(missing, _)) = positions.iter().find(|(v, _)| !mesh.contains_vertex(VertexId(*v))) {
                return Err(MeshError::missing_vertex(VertexId(missing)));
            }
            let mut moved: Vec<u32> = positions
                .iter()
                .filter(|(v, p)| mesh.set_vertex_position(VertexId(*v), Vec3::from_array(*p)))
                .map(|(v, _)| *v)
                .collect();
            moved.sort_unstable();
            moved.dedup();
            EditReport {
                moved_vertices: moved,
                ..Default::default()
            }
        }

        MeshEditCommand::CreateEdgeOrFace { vertex_ids: ids } => {
            let created = mesh.create_edge_face_from_vertices(&vertex_ids(ids))?;
            let mut report = EditReport {
                created_edges: mesh.edges_since(mark).into_iter().map(|e| e.0).collect(),
                created_faces: mesh.faces_since(mark).into_iter().map(|f| f.0).collect(),
                ..Default::default()
            };
            if let EdgeOrFace::Face(face) = created {
                report.created_faces = vec![face.0];
            }
            report
        }

        MeshEditCommand::MergeVertices { vertex_ids: ids } => {
            let (target, result) = mesh.merge_vertices_tracked(&vertex_ids(ids))?;
            EditReport {
                merged_into: Some(target.0),
                moved_vertices: vec![target.0],
                ..result.into()
            }
        }

        MeshEditCommand::SplitEdge { edge_id, factor } => {
            let edge = EdgeId(*edge_id);
            let vertex = mesh.split_edge(edge, *factor)?;
            EditReport {
                created_vertices: vec![vertex.0],
                created_edges: mesh.edges_since(mark).into_iter().map(|e| e.0).collect(),
                deleted_edges: vec![edge.0],
                ..Default::default()
            }
        }

        MeshEditCommand::Delete {
            mode,
            scope,
            selection,
        } => {
            let result = match (scope, mode) {
                (DeleteScope::Elements, MeshSelectionMode::Vertex) => {
                    mesh.delete_vertices(&vertex_ids(&selection.vertices))?
                }
                (DeleteScope::Elements, MeshSelectionMode::Edge) => {
                    mesh.delete_edges(&edge_ids(&selection.edges))?
                }
                (DeleteScope::Elements, MeshSelectionMode::Face) => {
                    mesh.delete_faces(&face_ids(&selection.faces))?
                }
                (DeleteScope::Selection, MeshSelectionMode::Vertex) => {
                    mesh.delete_selection_vertices(&selection.into())?
                }
                (DeleteScope::Selection, MeshSelectionMode::Edge) => {
                    mesh.delete_selection_edges(&selection.into())?
                }
                (DeleteScope::Selection, MeshSelectionMode::Face) => {
                    mesh.delete_selection_faces(&selection.into())?
                }
            };
            result.into()
        }

        MeshEditCommand::Dissolve { mode, selection } => {
            let kinds = [
                !selection.vertices.is_empty(),
                !selection.edges.is_empty(),
                !selection.faces.is_empty(),
            ];
            let mixed = kinds.iter().filter(|&&k| k).count() > 1;
            let result = match mode {
                _ if mixed => mesh.dissolve_region(&selection.into())?,
                MeshSelectionMode::Vertex => mesh.dissolve_vertices(&vertex_ids(&selection.vertices))?,
                MeshSelectionMode::Edge => mesh.dissolve_edges(&edge_ids(&selection.edges))?,
                MeshSelectionMode::Face => mesh.dissolve_faces(&face_ids(&selection.faces))?,
            };
            result.into()
        }

        MeshEditCommand::Duplicate { mode, selection } => {
            let result = match mode {
                MeshSelectionMode::Vertex => {
                    mesh.duplicate_selection_vertices(&vertex_ids(&selection.vertices))?
                }
                MeshSelectionMode::Edge => mesh.duplicate_selection_edges(&edge_ids(&selection.edges))?,
                MeshSelectionMode::Face => mesh.duplicate_selection_faces(&face_ids(&selection.faces))?,
            };
            result.into()
        }

        MeshEditCommand::ExtrudeFaces { face_ids: ids, offset } => mesh
            .extrude_faces(&face_ids(ids), Vec3::from_array(*offset))?
            .into(),

        MeshEditCommand::SetShading { .. } => EditReport::default(),
    };

    debug!(
        "apply_command: {} (+{}v/{}e/{}f, -{}v/{}e/{}f)",
        command.name(),
        report.created_vertices.len(),
        report.created_edges.len(),
        report.created_faces.len(),
        report.deleted_vertices.len(),
        report.deleted_edges.len(),
        report.deleted_faces.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::test_fixtures::{grid, unit_quad};

    #[test]
    fn test_add_vertex_and_create_face() {
        let mut mesh = MeshData::new();
        let mut ids = Vec::new();
        for position in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
            let report = apply_command(&mut mesh, &MeshEditCommand::AddVertex { position }).unwrap();
            ids.extend(report.created_vertices);
        }

        let report = apply_command(
            &mut mesh,
            &MeshEditCommand::CreateEdgeOrFace { vertex_ids: ids },
        )
        .unwrap();
        assert_eq!(report.created_faces.len(), 1);
        assert_eq!(report.created_edges.len(), 3);
        assert!(mesh.validate().is_ok());
    }

    #[test]
    fn test_merge_reports_survivor() {
        let (mut mesh, [v0, v1, ..], _) = unit_quad();
        let report = apply_command(
            &mut mesh,
            &MeshEditCommand::MergeVertices {
                vertex_ids: vec![v0.0, v1.0],
            },
        )
        .unwrap();
        assert_eq!(report.merged_into, Some(v0.0));
        assert_eq!(report.deleted_vertices, vec![v1.0]);
    }

    #[test]
    fn test_selection_delete_via_command() {
        let mut mesh = grid(2);
        let report = apply_command(
            &mut mesh,
            &MeshEditCommand::Delete {
                mode: MeshSelectionMode::Face,
                scope: DeleteScope::Selection,
                selection: SelectionIds::faces([0, 1, 2, 3]),
            },
        )
        .unwrap();
        assert_eq!(report.deleted_faces.len(), 4);
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_duplicate_reports_vertex_map() {
        let (mut mesh, _, face) = unit_quad();
        let report = apply_command(
            &mut mesh,
            &MeshEditCommand::Duplicate {
                mode: MeshSelectionMode::Face,
                selection: SelectionIds::faces([face.0]),
            },
        )
        .unwrap();
        assert_eq!(report.vertex_map.len(), 4);
        assert_eq!(report.created_faces.len(), 1);
    }

    #[test]
    fn test_extrude_report_lists_new_geometry() {
        let (mut mesh, _, face) = unit_quad();
        let report = apply_command(
            &mut mesh,
            &MeshEditCommand::ExtrudeFaces {
                face_ids: vec![face.0],
                offset: [0.0, 0.0, 2.0],
            },
        )
        .unwrap();

        assert_eq!(report.deleted_faces, vec![face.0]);
        assert_eq!(report.created_faces.len(), 5);
        assert_eq!(report.created_vertices.len(), 4);
        // Only duplicate reports a vertex map
        assert!(report.vertex_map.is_empty());
        for &v in &report.created_vertices {
            assert_eq!(mesh.position(VertexId(v)).unwrap().z, 2.0);
        }
    }

    #[test]
    fn test_stale_ids_fail_without_change() {
        let (mut mesh, _, _) = unit_quad();
        let before = mesh.to_snapshot();

        let err = apply_command(
            &mut mesh,
            &MeshEditCommand::SetVertexPositions {
                positions: vec![(0, [1.0, 1.0, 1.0]), (99, [0.0, 0.0, 0.0])],
            },
        )
        .unwrap_err();
        assert_eq!(err.code(), "missing_element");
        assert_eq!(mesh.to_snapshot(), before);
    }

    #[test]
    fn test_split_then_dissolve_round_trip() {
        let (mut mesh, [v0, v1, ..], face) = unit_quad();
        let edge = mesh.edge_between(v0, v1).unwrap();

        let split = apply_command(
            &mut mesh,
            &MeshEditCommand::SplitEdge {
                edge_id: edge.0,
                factor: 0.5,
            },
        )
        .unwrap();
        assert_eq!(mesh.face(face).unwrap().len(), 5);

        let dissolve = apply_command(
            &mut mesh,
            &MeshEditCommand::Dissolve {
                mode: MeshSelectionMode::Vertex,
                selection: SelectionIds::vertices(split.created_vertices),
            },
        )
        .unwrap();
        assert_eq!(dissolve.created_faces.len(), 1);
        assert_eq!(mesh.face(FaceId(dissolve.created_faces[0])).unwrap().len(), 4);
        assert!(mesh.validate().is_ok());
    }
}
