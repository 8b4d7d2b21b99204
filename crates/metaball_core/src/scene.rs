//! Immutable node arena for one evaluation pass.
//!
//! Nodes are addressed by handle (their position in the input list). Parent
//! references are resolved to handles once, so later passes never touch the
//! id index again.

use std::collections::HashMap;

use crate::error::{SceneError, SceneResult};
use crate::types::{Node, NodeId};

/// Arena index of a node inside a [`SceneSnapshot`].
pub type NodeHandle = usize;

/// Read-only view of an ordered node list with resolved parent handles.
#[derive(Debug)]
pub struct SceneSnapshot<'a> {
  nodes: &'a [Node],
  index: HashMap<NodeId, NodeHandle>,
  parents: Vec<Option<NodeHandle>>,
}

impl<'a> SceneSnapshot<'a> {
  /// Build a snapshot, keeping the first node for a duplicated id.
  pub fn new(nodes: &'a [Node]) -> Self {
    let mut index = HashMap::with_capacity(nodes.len());
    for (handle, node) in nodes.iter().enumerate() {
      index.entry(node.id).or_insert(handle);
    }
    Self::with_index(nodes, index)
  }

  /// Build a snapshot, rejecting duplicated ids.
  pub fn try_new(nodes: &'a [Node]) -> SceneResult<Self> {
    let mut index = HashMap::with_capacity(nodes.len());
    for (handle, node) in nodes.iter().enumerate() {
      if let Some(&first) = index.get(&node.id) {
        return Err(SceneError::DuplicateNode {
          id: node.id,
          first,
          second: handle,
        });
      }
      index.insert(node.id, handle);
    }
    Ok(Self::with_index(nodes, index))
  }

  fn with_index(nodes: &'a [Node], index: HashMap<NodeId, NodeHandle>) -> Self {
    // Dangling parent ids become roots. A self-parent is a one-node cycle.
    let parents = nodes
      .iter()
      .enumerate()
      .map(|(handle, node)| {
        node
          .parent
          .and_then(|id| index.get(&id).copied())
          .filter(|&parent| parent != handle)
      })
      .collect();

    Self {
      nodes,
      index,
      parents,
    }
  }

  pub fn len(&self) -> usize {
    self.nodes.len()
  }

  pub fn is_empty(&self) -> bool {
    self.nodes.is_empty()
  }

  pub fn nodes(&self) -> &'a [Node] {
    self.nodes
  }

  #[inline]
  pub fn node(&self, handle: NodeHandle) -> &'a Node {
    &self.nodes[handle]
  }

  #[inline]
  pub fn handle_of(&self, id: NodeId) -> Option<NodeHandle> {
    self.index.get(&id).copied()
  }

  #[inline]
  pub fn parent_of(&self, handle: NodeHandle) -> Option<NodeHandle> {
    self.parents[handle]
  }

  /// Iterate `(handle, node)` pairs in list order.
  pub fn iter(&self) -> impl Iterator<Item = (NodeHandle, &'a Node)> + 'a {
    let nodes = self.nodes;
    nodes.iter().enumerate()
  }

  /// True if at least one node is sampled by the scalar field.
  pub fn has_primitives(&self) -> bool {
    self.nodes.iter().any(Node::contributes_to_field)
  }
}

#[cfg(test)]
#[path = "scene_test.rs"]
mod scene_test;
