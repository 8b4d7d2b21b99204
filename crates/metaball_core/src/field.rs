//! Combined signed distance field over the node tree.
//!
//! Each primitive is evaluated in its own unit local space and rescaled back
//! to world units, then folded into a running distance in list order:
//!
//! ```text
//! d = item[0]                       (seed, its operation is ignored)
//! for item in item[1..]:
//!   Union     → d = smin(d,  item)
//!   Subtract  → d = smax(d, -item)
//!   Intersect → d = smax(d,  item)
//! ```
//!
//! Negative = inside, positive = outside.

use glam::{Mat4, Vec3};

use crate::constants::{EMPTY_FIELD_DISTANCE, GRADIENT_EPSILON_SQ, SINGULAR_DETERMINANT, UP};
use crate::scene::SceneSnapshot;
use crate::transform::{axis_scales, TransformResolver};
use crate::types::{BooleanOp, Node, PrimitiveKind};

/// A scalar field that can be sampled anywhere in world space.
///
/// Implementations must be total: finite input gives finite output.
pub trait DistanceField: Sync {
  fn distance(&self, point: Vec3) -> f32;

  /// Central finite difference gradient with step `h`.
  fn gradient(&self, point: Vec3, h: f32) -> Vec3 {
    let dx = Vec3::new(h, 0.0, 0.0);
    let dy = Vec3::new(0.0, h, 0.0);
    let dz = Vec3::new(0.0, 0.0, h);
    let inv = 0.5 / h;
    Vec3::new(
      (self.distance(point + dx) - self.distance(point - dx)) * inv,
      (self.distance(point + dy) - self.distance(point - dy)) * inv,
      (self.distance(point + dz) - self.distance(point - dz)) * inv,
    )
  }

  /// Unit gradient, falling back to +Y where the gradient vanishes.
  fn normal(&self, point: Vec3, h: f32) -> Vec3 {
    let gradient = self.gradient(point, h);
    let len_sq = gradient.length_squared();
    if len_sq < GRADIENT_EPSILON_SQ || !len_sq.is_finite() {
      return Vec3::from_array(UP);
    }
    gradient * len_sq.sqrt().recip()
  }
}

impl<F> DistanceField for F
where
  F: Fn(Vec3) -> f32 + Sync,
{
  #[inline]
  fn distance(&self, point: Vec3) -> f32 {
    self(point)
  }
}

// =============================================================================
// Unit primitives
// =============================================================================

/// Sphere of radius 0.5 at the origin.
#[inline]
pub fn sphere_distance(p: Vec3) -> f32 {
  p.length() - 0.5
}

/// Axis-aligned box with half-extent 0.5.
#[inline]
pub fn box_distance(p: Vec3) -> f32 {
  let q = p.abs() - Vec3::splat(0.5);
  q.max(Vec3::ZERO).length() + q.max_element().min(0.0)
}

/// Capsule along Y: segment from y=-0.5 to y=0.5, radius 0.5.
#[inline]
pub fn capsule_distance(p: Vec3) -> f32 {
  let y = p.y - p.y.clamp(-0.5, 0.5);
  Vec3::new(p.x, y, p.z).length() - 0.5
}

/// Distance to a unit primitive, or `None` for kinds without a field.
#[inline]
pub fn primitive_distance(kind: PrimitiveKind, p: Vec3) -> Option<f32> {
  match kind {
    PrimitiveKind::Sphere => Some(sphere_distance(p)),
    PrimitiveKind::Box => Some(box_distance(p)),
    PrimitiveKind::Capsule => Some(capsule_distance(p)),
    PrimitiveKind::Custom | PrimitiveKind::Group => None,
  }
}

// =============================================================================
// Smooth booleans
// =============================================================================

/// Polynomial smooth minimum. `k <= 0` is an exact minimum.
#[inline]
pub fn smooth_min(a: f32, b: f32, k: f32) -> f32 {
  if k <= 0.0 {
    return a.min(b);
  }
  let h = (k - (a - b).abs()).clamp(0.0, k) / k;
  a.min(b) - h * h * k * 0.25
}

/// Polynomial smooth maximum. `k <= 0` is an exact maximum.
#[inline]
pub fn smooth_max(a: f32, b: f32, k: f32) -> f32 {
  if k <= 0.0 {
    return a.max(b);
  }
  let h = (k - (a - b).abs()).clamp(0.0, k) / k;
  a.max(b) + h * h * k * 0.25
}

/// Fold one candidate distance into the running value.
#[inline]
pub fn combine(running: f32, candidate: f32, operation: BooleanOp, k: f32) -> f32 {
  match operation {
    BooleanOp::Union => smooth_min(running, candidate, k),
    BooleanOp::Subtract => smooth_max(running, -candidate, k),
    BooleanOp::Intersect => smooth_max(running, candidate, k),
  }
}

// =============================================================================
// Scalar field
// =============================================================================

/// Precomputed per-primitive evaluation data.
#[derive(Clone, Debug)]
pub struct FieldItem {
  /// World → local.
  pub inverse: Mat4,
  pub kind: PrimitiveKind,
  pub operation: BooleanOp,
  /// Mean axis scale, converts unit-space distance back to world units.
  pub scale: f32,
}

impl FieldItem {
  /// Build from a node and its world matrix.
  ///
  /// Returns `None` for non-primitive kinds and singular transforms.
  pub fn new(node: &Node, world: &Mat4) -> Option<Self> {
    if !node.kind.is_primitive() {
      return None;
    }
    let det = world.determinant();
    if !det.is_finite() || det.abs() < SINGULAR_DETERMINANT {
      #[cfg(feature = "tracing")]
      tracing::debug!(node = ?node.id, det, "singular world transform, skipping primitive");
      return None;
    }
    let inverse = world.inverse();
    if !inverse.is_finite() {
      return None;
    }
    let scales = axis_scales(world);
    Some(Self {
      inverse,
      kind: node.kind,
      operation: node.operation,
      scale: (scales.x + scales.y + scales.z) / 3.0,
    })
  }

  /// World-space distance to this item alone.
  #[inline]
  pub fn distance(&self, point: Vec3) -> f32 {
    let local = self.inverse.transform_point3(point);
    primitive_distance(self.kind, local).unwrap_or(EMPTY_FIELD_DISTANCE) * self.scale
  }
}

/// Signed distance to the whole tree.
#[derive(Clone, Debug, Default)]
pub struct ScalarField {
  items: Vec<FieldItem>,
  blend_strength: f32,
}

impl ScalarField {
  /// Build the field for a node list with a fresh resolver.
  pub fn build(nodes: &[Node], blend_strength: f32) -> Self {
    let snapshot = SceneSnapshot::new(nodes);
    let mut resolver = TransformResolver::new(&snapshot);
    Self::from_resolver(&mut resolver, blend_strength)
  }

  /// Build the field sharing a resolver (and its memo) with other stages.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "field::build"))]
  pub fn from_resolver(resolver: &mut TransformResolver<'_, '_>, blend_strength: f32) -> Self {
    let snapshot = resolver.snapshot();
    let mut items = Vec::with_capacity(snapshot.len());
    for (handle, node) in snapshot.iter() {
      if !node.contributes_to_field() {
        continue;
      }
      let world = resolver.resolve(handle);
      if let Some(item) = FieldItem::new(node, &world) {
        items.push(item);
      }
    }

    let blend_strength = if blend_strength.is_finite() {
      blend_strength.max(0.0)
    } else {
      0.0
    };

    Self {
      items,
      blend_strength,
    }
  }

  pub fn items(&self) -> &[FieldItem] {
    &self.items
  }

  pub fn blend_strength(&self) -> f32 {
    self.blend_strength
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }
}

impl DistanceField for ScalarField {
  fn distance(&self, point: Vec3) -> f32 {
    let Some((first, rest)) = self.items.split_first() else {
      return EMPTY_FIELD_DISTANCE;
    };

    let k = self.blend_strength;
    rest.iter().fold(first.distance(point), |running, item| {
      combine(running, item.distance(point), item.operation, k)
    })
  }
}

#[cfg(test)]
#[path = "field_test.rs"]
mod field_test;
