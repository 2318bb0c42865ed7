//! Type definitions for IPC messages.

mod report;
mod selection;

pub use report::*;
pub use selection::*;
