//! IPC message protocol for Polyedit
//!
//! Defines the message types exchanged between the editor shell (tools,
//! selection state, undo history, viewport) and the mesh kernel. Ids travel
//! as plain `u32` values so the shell can keep them in its own selection
//! sets without depending on the kernel's newtypes.

pub mod commands;
pub mod error;
pub mod messages;
pub mod types;

pub use commands::*;
pub use error::IpcError;
pub use messages::{MeshToUi, UiToMesh};
pub use types::*;
