//! Topology operators
//!
//! Face and edge creation from vertex loops, vertex merge, boundary
//! extraction and loop ordering, and edge splitting. Unlike the primitive
//! layer these return [`crate::MeshError`] on bad input.

mod boundary;
mod create;
pub(crate) mod disjoint_set;
mod merge;
mod split;

pub(crate) use boundary::orient_loop_to_faces;
