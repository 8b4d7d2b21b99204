//! Bone segments derived from the node hierarchy.

use glam::Vec3;

use crate::constants::MIN_BONE_LENGTH;
use crate::transform::TransformResolver;

/// Segment from a parent's world origin to its child's world origin.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoneSegment {
  pub start: Vec3,
  pub end: Vec3,
  /// Unit vector from `start` to `end`.
  pub direction: Vec3,
  pub length: f32,
}

impl BoneSegment {
  /// Returns `None` for zero-length or non-finite segments.
  pub fn new(start: Vec3, end: Vec3) -> Option<Self> {
    let offset = end - start;
    let length = offset.length();
    if !length.is_finite() || length < MIN_BONE_LENGTH {
      return None;
    }
    Some(Self {
      start,
      end,
      direction: offset / length,
      length,
    })
  }

  /// Clamped projection of `point` onto the segment.
  ///
  /// Returns the distance along the bone from `start` (in `[0, length]`) and
  /// the distance from `point` to the projected point.
  #[inline]
  pub fn project(&self, point: Vec3) -> (f32, f32) {
    let t = (point - self.start).dot(self.direction).clamp(0.0, self.length);
    let closest = self.start + self.direction * t;
    (t, point.distance(closest))
  }
}

/// One bone per node whose parent resolves in the snapshot.
///
/// Parent cycles are broken by the resolver, so every walk terminates.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "retopo::bones"))]
pub fn extract_bones(resolver: &mut TransformResolver<'_, '_>) -> Vec<BoneSegment> {
  let snapshot = resolver.snapshot();
  let mut bones = Vec::new();

  for handle in 0..snapshot.len() {
    let Some(parent) = snapshot.parent_of(handle) else {
      continue;
    };
    let start = resolver.world_position(parent);
    let end = resolver.world_position(handle);
    if let Some(bone) = BoneSegment::new(start, end) {
      bones.push(bone);
    }
  }

  bones
}

/// Nearest bone to `point` and its projection, if any bones exist.
pub fn nearest<'b>(bones: &'b [BoneSegment], point: Vec3) -> Option<(&'b BoneSegment, f32, f32)> {
  bones
    .iter()
    .map(|bone| {
      let (t, distance) = bone.project(point);
      (bone, t, distance)
    })
    .min_by(|a, b| a.2.total_cmp(&b.2))
}

#[cfg(test)]
#[path = "bones_test.rs"]
mod bones_test;
