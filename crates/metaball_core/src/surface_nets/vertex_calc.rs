//! Vertex placement inside an active cell.
//!
//! A cell edge joins corner `c` to corner `c | 1 << axis` for every axis
//! bit clear in `c`, following the bit layout of [`CORNER_OFFSETS`].

use glam::Vec3A;

use crate::constants::CORNER_OFFSETS;

/// Sign-changing cell edges as `(low corner, axis)`, each edge once.
#[inline]
pub fn crossing_edges(samples: &[f32; 8]) -> impl Iterator<Item = (usize, usize)> + '_ {
  (0..8usize).flat_map(move |low| {
    (0..3usize).filter_map(move |axis| {
      let high = low | 1 << axis;
      let crosses = high != low && (samples[low] < 0.0) != (samples[high] < 0.0);
      crosses.then_some((low, axis))
    })
  })
}

/// Centroid of the edge crossings of a cell, in unit cell coordinates.
///
/// A crossing sits at `t = s_low / (s_low - s_high)` along its edge, so only
/// the edge's own axis moves off the low corner. `None` without crossings.
#[inline]
pub fn compute_position(samples: &[f32; 8]) -> Option<Vec3A> {
  let mut sum = Vec3A::ZERO;
  let mut count = 0u32;

  for (low, axis) in crossing_edges(samples) {
    let s_low = samples[low];
    let s_high = samples[low | 1 << axis];
    let mut crossing = Vec3A::from(CORNER_OFFSETS[low].map(|o| o as f32));
    crossing[axis] = s_low / (s_low - s_high);
    sum += crossing;
    count += 1;
  }

  (count > 0).then(|| sum / count as f32)
}

#[cfg(test)]
#[path = "vertex_calc_test.rs"]
mod vertex_calc_test;
