//! World transform resolution with a pass-scoped memo.
//!
//! ```text
//! world(node) = world(parent) · T(translation) · R(rotation) · S(scale)
//! ```
//!
//! The memo lives inside the resolver and is dropped with it, so nothing
//! survives from one evaluation pass to the next.

use glam::{EulerRot, Mat4, Quat, Vec3};
use smallvec::SmallVec;

use crate::scene::{NodeHandle, SceneSnapshot};
use crate::types::{Node, NodeId};

/// Local matrix of a node: translate ∘ rotate ∘ uniform scale.
///
/// Non-finite parameters degrade to identity.
pub fn local_matrix(node: &Node) -> Mat4 {
  let rotation = Quat::from_euler(EulerRot::XYZ, node.rotation.x, node.rotation.y, node.rotation.z);
  let matrix =
    Mat4::from_scale_rotation_translation(Vec3::splat(node.scale), rotation, node.translation);

  if matrix.is_finite() {
    matrix
  } else {
    #[cfg(feature = "tracing")]
    tracing::debug!(node = ?node.id, "non-finite local transform, using identity");
    Mat4::IDENTITY
  }
}

/// Resolves and caches world matrices for one snapshot.
pub struct TransformResolver<'s, 'a> {
  snapshot: &'s SceneSnapshot<'a>,
  memo: Vec<Option<Mat4>>,
  /// Marks the nodes on the walk currently being resolved.
  on_chain: Vec<bool>,
}

impl<'s, 'a> TransformResolver<'s, 'a> {
  pub fn new(snapshot: &'s SceneSnapshot<'a>) -> Self {
    Self {
      snapshot,
      memo: vec![None; snapshot.len()],
      on_chain: vec![false; snapshot.len()],
    }
  }

  pub fn snapshot(&self) -> &'s SceneSnapshot<'a> {
    self.snapshot
  }

  /// World matrix of a node by id. Unknown ids resolve to identity.
  pub fn resolve_id(&mut self, id: NodeId) -> Mat4 {
    match self.snapshot.handle_of(id) {
      Some(handle) => self.resolve(handle),
      None => Mat4::IDENTITY,
    }
  }

  /// World matrix of a node by handle.
  ///
  /// Walks up the parent chain until a root or an already resolved ancestor,
  /// then composes back down, filling the memo for every node on the way.
  /// If the chain revisits a node, the node that closes the loop is treated
  /// as a root.
  pub fn resolve(&mut self, handle: NodeHandle) -> Mat4 {
    if let Some(matrix) = self.memo[handle] {
      return matrix;
    }

    let mut chain: SmallVec<[NodeHandle; 16]> = SmallVec::new();
    let mut base = Mat4::IDENTITY;
    let mut current = Some(handle);

    while let Some(h) = current {
      if let Some(matrix) = self.memo[h] {
        base = matrix;
        break;
      }
      if self.on_chain[h] {
        #[cfg(feature = "tracing")]
        tracing::debug!(node = ?self.snapshot.node(h).id, "parent cycle, treating as root");
        break;
      }
      self.on_chain[h] = true;
      chain.push(h);
      current = self.snapshot.parent_of(h);
    }

    for &h in chain.iter().rev() {
      base *= local_matrix(self.snapshot.node(h));
      self.memo[h] = Some(base);
      self.on_chain[h] = false;
    }

    base
  }

  /// World-space origin of a node.
  pub fn world_position(&mut self, handle: NodeHandle) -> Vec3 {
    self.resolve(handle).w_axis.truncate()
  }
}

/// Length of each basis column: the per-axis scale of an affine matrix.
#[inline]
pub fn axis_scales(matrix: &Mat4) -> Vec3 {
  Vec3::new(
    matrix.x_axis.truncate().length(),
    matrix.y_axis.truncate().length(),
    matrix.z_axis.truncate().length(),
  )
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod transform_test;
