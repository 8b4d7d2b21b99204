//! Errors raised while building inputs for the mesher.
//!
//! Meshing itself never fails: degenerate input falls back to safe defaults.
//! These errors only come from the strict constructors a host uses when it
//! wants to validate its data up front.

use thiserror::Error;

use crate::types::NodeId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
  #[error("Duplicate node id {id:?} at positions {first} and {second}")]
  DuplicateNode { id: NodeId, first: usize, second: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GeometryError {
  #[error("Index count {count} is not a multiple of 3")]
  IncompleteTriangle { count: usize },

  #[error("Index {index} out of range for {vertex_count} vertices")]
  IndexOutOfRange { index: u32, vertex_count: usize },

  #[error("Normal count {normals} does not match vertex count {vertices}")]
  NormalCountMismatch { normals: usize, vertices: usize },
}

pub type SceneResult<T> = Result<T, SceneError>;
