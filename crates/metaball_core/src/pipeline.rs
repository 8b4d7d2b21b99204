//! One full evaluation pass over a node list.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  nodes ──► SceneSnapshot ──► TransformResolver (pass-scoped memo)       │
//! │                                   │                                     │
//! │              ┌────────────────────┼────────────────────┐                │
//! │              ▼                    ▼                    ▼                │
//! │       estimate_bounds       ScalarField          extract_bones          │
//! │              │                    │              (retopology only)      │
//! │              ▼                    │                    │                │
//! │   GridSpec ──► SampleGrid ◄───────┘                    │                │
//! │                    │                                   │                │
//! │                    ▼                                   ▼                │
//! │           surface_nets::extract ─────────────► retopo::refine           │
//! │                    │                                   │                │
//! │                    └──────────────► MeshResult ◄───────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The resolver and everything derived from it are dropped at the end of the
//! call; nothing is cached between passes.

use web_time::Instant;

use crate::field::ScalarField;
use crate::grid::{estimate_bounds, GridSpec, SampleGrid};
use crate::retopo::{self, extract_bones, RefineConfig};
use crate::scene::SceneSnapshot;
use crate::surface_nets;
use crate::transform::TransformResolver;
use crate::types::{Mesh, Node};

/// Default meshing resolution (4 cells per unit → 32 cells per axis).
pub const DEFAULT_RESOLUTION: f32 = 8.0;

/// Default smooth blend radius.
pub const DEFAULT_BLEND_STRENGTH: f32 = 0.3;

/// Parameters for one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct MeshParams {
  /// Grid density. Cells per axis are `clamp(floor(resolution × 4), 2, 128)`.
  pub resolution: f32,
  /// Smooth min/max radius. `0` gives hard booleans.
  pub blend_strength: f32,
  /// Run the retopology refiner after extraction.
  pub smart_retopology: bool,
  pub refine: RefineConfig,
}

impl Default for MeshParams {
  fn default() -> Self {
    Self {
      resolution: DEFAULT_RESOLUTION,
      blend_strength: DEFAULT_BLEND_STRENGTH,
      smart_retopology: false,
      refine: RefineConfig::default(),
    }
  }
}

impl MeshParams {
  pub fn with_resolution(mut self, resolution: f32) -> Self {
    self.resolution = resolution;
    self
  }

  pub fn with_blend_strength(mut self, blend_strength: f32) -> Self {
    self.blend_strength = blend_strength;
    self
  }

  pub fn with_smart_retopology(mut self, enabled: bool) -> Self {
    self.smart_retopology = enabled;
    self
  }

  pub fn with_refine_config(mut self, refine: RefineConfig) -> Self {
    self.refine = refine;
    self
  }
}

/// Per-stage wall time of a pass, in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassTiming {
  /// Field construction and grid sampling.
  pub sample_us: u64,
  pub extract_us: u64,
  /// Zero unless retopology ran.
  pub refine_us: u64,
  pub total_us: u64,
}

/// Output of [`generate`].
#[derive(Debug, Clone)]
pub struct MeshResult {
  pub mesh: Mesh,
  /// Grid used for extraction. `None` when there was nothing to mesh.
  pub grid: Option<GridSpec>,
  pub timing: PassTiming,
}

impl MeshResult {
  pub fn is_empty(&self) -> bool {
    self.mesh.is_empty()
  }
}

/// Mesh a node list: snapshot, field, grid, Surface Nets, optional refine.
#[cfg_attr(feature = "tracing", tracing::instrument(skip_all, name = "pipeline::generate"))]
pub fn generate(nodes: &[Node], params: &MeshParams) -> MeshResult {
  let total_start = Instant::now();
  let mut timing = PassTiming::default();

  let snapshot = SceneSnapshot::new(nodes);
  let mut resolver = TransformResolver::new(&snapshot);

  let Some(bounds) = estimate_bounds(&mut resolver, params.blend_strength) else {
    #[cfg(feature = "tracing")]
    tracing::debug!(nodes = nodes.len(), "no visible primitives, empty mesh");
    timing.total_us = total_start.elapsed().as_micros() as u64;
    return MeshResult {
      mesh: Mesh::new(),
      grid: None,
      timing,
    };
  };

  // Stage 1: field + sampling
  let sample_start = Instant::now();
  let (field, grid) = {
    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!("sample_stage").entered();
    let field = ScalarField::from_resolver(&mut resolver, params.blend_strength);
    let spec = GridSpec::from_bounds(&bounds, params.resolution);
    let grid = SampleGrid::sample(spec, &field);
    (field, grid)
  };
  timing.sample_us = sample_start.elapsed().as_micros() as u64;

  // Stage 2: Surface Nets
  let extract_start = Instant::now();
  let mut mesh = surface_nets::extract(&grid, &field);
  timing.extract_us = extract_start.elapsed().as_micros() as u64;

  // Stage 3: retopology
  if params.smart_retopology && !mesh.is_empty() {
    let refine_start = Instant::now();
    {
      #[cfg(feature = "tracing")]
      let _span = tracing::info_span!("refine_stage").entered();
      let bones = extract_bones(&mut resolver);
      retopo::refine_with(
        &mut mesh,
        &field,
        &bones,
        grid.spec().average_step(),
        &params.refine,
      );
    }
    timing.refine_us = refine_start.elapsed().as_micros() as u64;
  }

  timing.total_us = total_start.elapsed().as_micros() as u64;

  #[cfg(feature = "tracing")]
  tracing::debug!(
    vertices = mesh.vertex_count(),
    triangles = mesh.triangle_count(),
    total_us = timing.total_us,
    "pass complete"
  );

  MeshResult {
    mesh,
    grid: Some(*grid.spec()),
    timing,
  }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;
