//! Polyedit mesh kernel - editable polygon meshes
//!
//! This crate holds the geometry side of the editor:
//! - [`MeshData`] - B-rep graph of vertices, edges and N-gon faces with
//!   symmetric adjacency, primitive mutation, queries and validation
//! - [`topology`] - face/edge creation from vertex loops, vertex merge,
//!   boundary extraction and edge split
//! - [`edit`] - selection-scoped delete, dissolve, duplicate and extrude
//! - [`render`] - render buffer generation with flat, smooth and auto
//!   shading, ear-clipping triangulation and picking maps
//! - [`apply_command`] / [`EditSession`] - the kernel end of the shell
//!   protocol in `polyedit-ipc`
//!
//! Ids are plain `u32` newtypes, monotonic per mesh and never reused.

pub mod command;
pub mod edit;
pub mod error;
pub mod graph;
pub mod render;
pub mod session;
pub mod topology;
pub mod types;

pub use command::apply_command;
pub use error::{MeshError, Result};
pub use graph::{MeshData, MeshSnapshot, TopologyViolation};
pub use render::{GpuVertex, RenderBuffer};
pub use session::EditSession;
pub use types::*;

pub use polyedit_config::{RenderConfig, ShadingMode};
