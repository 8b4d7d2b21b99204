//! Tuning constants for grid sizing, field evaluation and retopology.
//!
//! # Grid Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SAMPLE GRID LAYOUT                              │
//! ├─────────────────────────────────────────────────────────────────────────┤
//! │                                                                         │
//! │  cells per axis  n = clamp(floor(resolution × 4), 2, 128)               │
//! │  samples per axis  = n + 1 (one per cell corner)                        │
//! │                                                                         │
//! │  Corner index:  0     1     2    ...    n-1    n                        │
//! │                 │     │                  │     │                        │
//! │                 └─────┴──── n cells ─────┴─────┘                        │
//! │                                                                         │
//! │  index = x + y·(nx+1) + z·(nx+1)(ny+1)      (X innermost)               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Cell Corner Layout
//!
//! ```text
//! Cell corner indices (binary: ZYX):
//!   0 = (0,0,0)    4 = (0,0,1)
//!   1 = (1,0,0)    5 = (1,0,1)
//!   2 = (0,1,0)    6 = (0,1,1)
//!   3 = (1,1,0)    7 = (1,1,1)
//! ```

/// Cells per axis generated for each unit of user resolution.
pub const CELLS_PER_RESOLUTION: f32 = 4.0;

/// Minimum cells per axis.
pub const MIN_CELLS_PER_AXIS: usize = 2;

/// Maximum cells per axis. Bounds the O(n³) sampling cost.
pub const MAX_CELLS_PER_AXIS: usize = 128;

/// Multiplier on a primitive's largest axis scale when growing the bounds.
pub const BOUNDS_SCALE_FACTOR: f32 = 1.5;

/// Fixed padding added on every side of the estimated bounds (world units).
pub const BOUNDS_MARGIN: f32 = 1.0;

/// Extent below which an axis is considered degenerate.
pub const DEGENERATE_EXTENT: f32 = 1e-6;

/// Step substituted on a degenerate axis.
pub const DEGENERATE_STEP: f32 = 0.01;

/// Distance reported by a field with no primitives.
pub const EMPTY_FIELD_DISTANCE: f32 = 1.0e6;

/// Determinant below which a world transform is treated as singular.
pub const SINGULAR_DETERMINANT: f32 = 1e-12;

/// Gradient step as a fraction of the average grid step.
pub const GRADIENT_STEP_FACTOR: f32 = 0.35;

/// Lower bound for the finite difference step.
pub const MIN_GRADIENT_STEP: f32 = 1e-4;

/// Squared gradient length below which a gradient is considered zero.
pub const GRADIENT_EPSILON_SQ: f32 = 1e-12;

/// Fallback normal when the gradient vanishes.
pub const UP: [f32; 3] = [0.0, 1.0, 0.0];

// =============================================================================
// Retopology
// =============================================================================

/// Relaxation iterations per refine pass.
pub const RETOPO_ITERATIONS: usize = 10;

/// Fraction of the tangential Laplacian displacement applied per iteration.
pub const RETOPO_SMOOTHING: f32 = 0.55;

/// Snap radius in grid steps (see [`RETOPO_MIN_SNAP_RADIUS`]).
pub const RETOPO_SNAP_RADIUS_STEPS: f32 = 6.0;

/// Lower bound for the bone snap radius.
pub const RETOPO_MIN_SNAP_RADIUS: f32 = 0.25;

/// Ring spacing along bones, in grid steps.
pub const RETOPO_RING_SPACING_STEPS: f32 = 1.6;

/// Lower bound for the ring spacing.
pub const RETOPO_MIN_RING_SPACING: f32 = 1e-3;

/// Fraction of the distance to the nearest ring applied per iteration.
pub const RETOPO_SNAP_STRENGTH: f32 = 0.35;

/// Denominator floor for the Newton re-projection step.
pub const NEWTON_EPSILON: f32 = 1e-8;

/// Bones shorter than this are ignored.
pub const MIN_BONE_LENGTH: f32 = 1e-6;

/// Offsets of the 8 cell corners in grid coordinates.
///
/// Corner i = (x=bit0, y=bit1, z=bit2).
pub const CORNER_OFFSETS: [[usize; 3]; 8] = [
  [0, 0, 0],
  [1, 0, 0],
  [0, 1, 0],
  [1, 1, 0],
  [0, 0, 1],
  [1, 0, 1],
  [0, 1, 1],
  [1, 1, 1],
];

/// Cells per axis for a user resolution.
#[inline]
pub fn cells_for_resolution(resolution: f32) -> usize {
  let raw = (resolution * CELLS_PER_RESOLUTION).floor();
  if raw.is_nan() {
    return MIN_CELLS_PER_AXIS;
  }
  // Float-to-int casts saturate, so infinities land on the clamp bounds.
  (raw as usize).clamp(MIN_CELLS_PER_AXIS, MAX_CELLS_PER_AXIS)
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
