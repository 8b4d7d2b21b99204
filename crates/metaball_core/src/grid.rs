//! Uniform sample grid sized to bound the tree.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │ 1. Bounds: per visible primitive, cube of half-size             │
//! │      max(axis scale) × 1.5 + blend  around its world origin     │
//! │    then pad by 1.0 on every side                                │
//! │ 2. Cells:  n = clamp(floor(resolution × 4), 2, 128) per axis    │
//! │ 3. Step:   extent / n  (degenerate axis → fixed small step)     │
//! │ 4. Sample: field at every corner, z-slabs in parallel           │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use glam::Vec3;
use rayon::prelude::*;

use crate::constants::{
  cells_for_resolution, BOUNDS_MARGIN, BOUNDS_SCALE_FACTOR, DEGENERATE_EXTENT, DEGENERATE_STEP,
  GRADIENT_STEP_FACTOR, MIN_GRADIENT_STEP,
};
use crate::field::DistanceField;
use crate::transform::{axis_scales, TransformResolver};
use crate::types::MinMaxAABB;

/// Bounds enclosing every visible primitive plus blend fillets.
///
/// Returns `None` when there is no primitive to mesh.
pub fn estimate_bounds(
  resolver: &mut TransformResolver<'_, '_>,
  blend_strength: f32,
) -> Option<MinMaxAABB> {
  let snapshot = resolver.snapshot();
  let blend = if blend_strength.is_finite() {
    blend_strength.max(0.0)
  } else {
    0.0
  };

  let mut bounds = MinMaxAABB::empty();
  let mut primitives = 0usize;
  for (handle, node) in snapshot.iter() {
    if !node.contributes_to_field() {
      continue;
    }
    let world = resolver.resolve(handle);
    let center = world.w_axis.truncate();
    let radius = axis_scales(&world).max_element() * BOUNDS_SCALE_FACTOR + blend;
    bounds.encapsulate_cube(center.to_array(), radius);
    primitives += 1;
  }

  if primitives == 0 {
    return None;
  }
  Some(bounds.padded(BOUNDS_MARGIN))
}

/// Placement and dimensions of the sample lattice.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSpec {
  /// World position of corner (0, 0, 0).
  pub origin: Vec3,
  /// World distance between neighbouring corners, per axis.
  pub step: Vec3,
  /// Cells per axis. Corners per axis are `cells + 1`.
  pub cells: [usize; 3],
}

impl GridSpec {
  pub fn from_bounds(bounds: &MinMaxAABB, resolution: f32) -> Self {
    let n = cells_for_resolution(resolution);
    let extent = bounds.extent();
    let step = std::array::from_fn(|i| {
      let e = extent[i];
      if e.is_finite() && e > DEGENERATE_EXTENT {
        e / n as f32
      } else {
        DEGENERATE_STEP
      }
    });
    let origin = bounds.min.map(|v| if v.is_finite() { v } else { 0.0 });

    Self {
      origin: Vec3::from_array(origin),
      step: Vec3::from_array(step),
      cells: [n; 3],
    }
  }

  /// Corners per axis.
  #[inline]
  pub fn samples(&self) -> [usize; 3] {
    self.cells.map(|c| c + 1)
  }

  #[inline]
  pub fn sample_count(&self) -> usize {
    let [sx, sy, sz] = self.samples();
    sx * sy * sz
  }

  /// Flat index of a corner: `x + y·(nx+1) + z·(nx+1)(ny+1)`.
  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    let [sx, sy, _] = self.samples();
    x + y * sx + z * sx * sy
  }

  #[inline]
  pub fn corner_position(&self, x: usize, y: usize, z: usize) -> Vec3 {
    self.origin + self.step * Vec3::new(x as f32, y as f32, z as f32)
  }

  pub fn average_step(&self) -> f32 {
    (self.step.x + self.step.y + self.step.z) / 3.0
  }

  /// Finite difference step used for gradients on this grid.
  pub fn gradient_step(&self) -> f32 {
    (GRADIENT_STEP_FACTOR * self.average_step()).max(MIN_GRADIENT_STEP)
  }

  /// Length of one cell diagonal.
  pub fn cell_diagonal(&self) -> f32 {
    self.step.length()
  }
}

/// Field values at every grid corner.
#[derive(Clone, Debug)]
pub struct SampleGrid {
  spec: GridSpec,
  values: Vec<f32>,
}

impl SampleGrid {
  /// Evaluate `field` at every corner of `spec`.
  #[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "grid::sample"))]
  pub fn sample<F: DistanceField + ?Sized>(spec: GridSpec, field: &F) -> Self {
    let [sx, sy, _] = spec.samples();
    let slab = sx * sy;
    let mut values = vec![0.0f32; spec.sample_count()];

    values
      .par_chunks_mut(slab)
      .enumerate()
      .for_each(|(z, slab_values)| {
        for y in 0..sy {
          for x in 0..sx {
            slab_values[x + y * sx] = field.distance(spec.corner_position(x, y, z));
          }
        }
      });

    Self { spec, values }
  }

  pub fn spec(&self) -> &GridSpec {
    &self.spec
  }

  pub fn values(&self) -> &[f32] {
    &self.values
  }

  #[inline]
  pub fn value(&self, x: usize, y: usize, z: usize) -> f32 {
    self.values[self.spec.index(x, y, z)]
  }
}

#[cfg(test)]
#[path = "grid_test.rs"]
mod grid_test;
