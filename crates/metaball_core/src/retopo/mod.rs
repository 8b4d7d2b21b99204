//! Smart retopology: flow-aligned relaxation of an extracted surface.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  adjacency (once): deduplicated neighbour sets from triangles   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  per iteration, every vertex in parallel, reading the previous  │
//! │  positions and writing a fresh buffer:                          │
//! │    d = mean(neighbours) - p                                     │
//! │    n = unit field gradient at p                                 │
//! │    p += λ · (d - (d·n) n)              tangential smoothing     │
//! │    p += s · Δt · bone.dir              ring snap (near a bone)  │
//! │    p -= ∇f · f / max(|∇f|², ε)         Newton back to surface   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  normals + bounds recomputed; indices and edges are untouched   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Ring snapping pulls vertices near a bone toward evenly spaced cross
//! sections along it, so edge loops line up around limbs.

pub mod adjacency;
pub mod bones;

use glam::Vec3;
use rayon::prelude::*;

use crate::constants::{
  GRADIENT_STEP_FACTOR, MIN_GRADIENT_STEP, NEWTON_EPSILON, RETOPO_ITERATIONS,
  RETOPO_MIN_RING_SPACING, RETOPO_MIN_SNAP_RADIUS, RETOPO_RING_SPACING_STEPS,
  RETOPO_SMOOTHING, RETOPO_SNAP_RADIUS_STEPS, RETOPO_SNAP_STRENGTH,
};
use crate::field::DistanceField;
use crate::surface_nets::normals;
use crate::types::Mesh;

pub use adjacency::{build_adjacency, Neighbours};
pub use bones::{extract_bones, BoneSegment};

/// Relaxation settings. Distances are derived from the grid step at refine
/// time.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RefineConfig {
  /// Jacobi iterations.
  pub iterations: usize,
  /// Tangential smoothing factor λ.
  pub smoothing: f32,
  /// Snap radius around a bone, in grid steps.
  pub snap_radius_steps: f32,
  pub min_snap_radius: f32,
  /// Ring spacing along a bone, in grid steps.
  pub ring_spacing_steps: f32,
  pub min_ring_spacing: f32,
  /// Fraction of the distance to the nearest ring covered per iteration.
  pub snap_strength: f32,
}

impl Default for RefineConfig {
  fn default() -> Self {
    Self {
      iterations: RETOPO_ITERATIONS,
      smoothing: RETOPO_SMOOTHING,
      snap_radius_steps: RETOPO_SNAP_RADIUS_STEPS,
      min_snap_radius: RETOPO_MIN_SNAP_RADIUS,
      ring_spacing_steps: RETOPO_RING_SPACING_STEPS,
      min_ring_spacing: RETOPO_MIN_RING_SPACING,
      snap_strength: RETOPO_SNAP_STRENGTH,
    }
  }
}

impl RefineConfig {
  pub fn with_iterations(mut self, iterations: usize) -> Self {
    self.iterations = iterations;
    self
  }

  pub fn with_smoothing(mut self, smoothing: f32) -> Self {
    self.smoothing = smoothing;
    self
  }

  pub fn with_snap_strength(mut self, snap_strength: f32) -> Self {
    self.snap_strength = snap_strength;
    self
  }

  pub fn with_snap_radius_steps(mut self, steps: f32) -> Self {
    self.snap_radius_steps = steps;
    self
  }

  pub fn with_ring_spacing_steps(mut self, steps: f32) -> Self {
    self.ring_spacing_steps = steps;
    self
  }

  /// Snap radius for a grid step.
  pub fn snap_radius(&self, grid_step: f32) -> f32 {
    (self.snap_radius_steps * grid_step).max(self.min_snap_radius)
  }

  /// Ring spacing for a grid step.
  pub fn ring_spacing(&self, grid_step: f32) -> f32 {
    (self.ring_spacing_steps * grid_step).max(self.min_ring_spacing)
  }
}

/// Resolved per-pass parameters.
#[derive(Clone, Copy, Debug)]
struct Relax {
  smoothing: f32,
  snap_radius: f32,
  ring_spacing: f32,
  snap_strength: f32,
  h: f32,
}

/// Refine `mesh` in place with the default settings.
pub fn refine<F: DistanceField + ?Sized>(
  mesh: &mut Mesh,
  field: &F,
  bones: &[BoneSegment],
  grid_step: f32,
) {
  refine_with(mesh, field, bones, grid_step, &RefineConfig::default());
}

/// Refine `mesh` in place.
///
/// Only positions move. Normals and bounds are recomputed afterwards; the
/// wireframe shares the position buffer and follows automatically.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "retopo::refine"))]
pub fn refine_with<F: DistanceField + ?Sized>(
  mesh: &mut Mesh,
  field: &F,
  bones: &[BoneSegment],
  grid_step: f32,
  config: &RefineConfig,
) {
  if mesh.positions.is_empty() || config.iterations == 0 {
    return;
  }

  let grid_step = if grid_step.is_finite() {
    grid_step.max(0.0)
  } else {
    0.0
  };
  let relax = Relax {
    smoothing: config.smoothing,
    snap_radius: config.snap_radius(grid_step),
    ring_spacing: config.ring_spacing(grid_step),
    snap_strength: config.snap_strength,
    h: (GRADIENT_STEP_FACTOR * grid_step).max(MIN_GRADIENT_STEP),
  };

  let adjacency = build_adjacency(mesh.positions.len(), &mesh.indices);
  let mut current: Vec<Vec3> = mesh.positions.iter().map(|&p| Vec3::from_array(p)).collect();
  let mut next: Vec<Vec3> = Vec::with_capacity(current.len());

  for _ in 0..config.iterations {
    (0..current.len())
      .into_par_iter()
      .map(|i| relax_vertex(i, &current, &adjacency[i], field, bones, &relax))
      .collect_into_vec(&mut next);
    std::mem::swap(&mut current, &mut next);
  }

  for (dst, src) in mesh.positions.iter_mut().zip(&current) {
    *dst = src.to_array();
  }
  mesh.normals = normals::angle_weighted(&mesh.positions, &mesh.indices);
  mesh.recompute_bounds();

  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = mesh.positions.len(),
    bones = bones.len(),
    iterations = config.iterations,
    "retopology refined"
  );
}

/// One Jacobi update of vertex `i`.
#[inline]
fn relax_vertex<F: DistanceField + ?Sized>(
  i: usize,
  positions: &[Vec3],
  neighbours: &Neighbours,
  field: &F,
  bones: &[BoneSegment],
  relax: &Relax,
) -> Vec3 {
  let p = positions[i];
  if neighbours.is_empty() {
    return p;
  }

  let sum: Vec3 = neighbours.iter().map(|&j| positions[j as usize]).sum();
  let target = sum / neighbours.len() as f32;
  let d = target - p;

  let n = field.normal(p, relax.h);
  let mut q = p + relax.smoothing * (d - d.dot(n) * n);

  q = snap_to_ring(q, bones, relax.snap_radius, relax.ring_spacing, relax.snap_strength);
  q = newton_project(q, field, relax.h);

  if q.is_finite() {
    q
  } else {
    p
  }
}

/// Nudge `point` along its nearest bone toward the closest ring.
///
/// Points further than `snap_radius` from every bone are returned as is.
pub fn snap_to_ring(
  point: Vec3,
  bones: &[BoneSegment],
  snap_radius: f32,
  ring_spacing: f32,
  strength: f32,
) -> Vec3 {
  let Some((bone, t, distance)) = bones::nearest(bones, point) else {
    return point;
  };
  if distance > snap_radius {
    return point;
  }
  let ring = (t / ring_spacing).round() * ring_spacing;
  point + bone.direction * ((ring - t) * strength)
}

/// One Newton step toward the zero level set.
#[inline]
pub fn newton_project<F: DistanceField + ?Sized>(point: Vec3, field: &F, h: f32) -> Vec3 {
  let gradient = field.gradient(point, h);
  let value = field.distance(point);
  point - gradient * (value / gradient.length_squared().max(NEWTON_EPSILON))
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
