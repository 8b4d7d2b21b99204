//! Benchmarks for the meshing pass, plus a comparison of the extraction stage
//! against the fast_surface_nets crate on the same sampled grid.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fast_surface_nets::ndshape::RuntimeShape;
use fast_surface_nets::{surface_nets, SurfaceNetsBuffer};
use metaball_core::grid::{estimate_bounds, GridSpec, SampleGrid};
use metaball_core::{
  generate, surface_nets as my_surface_nets, BooleanOp, MeshParams, Node, ScalarField,
  SceneSnapshot, TransformResolver,
};

/// Small character-like tree: body, head, two arms, a carved notch.
fn figure() -> Vec<Node> {
  vec![
    Node::sphere(1).with_scale(1.2),
    Node::sphere(2).with_translation([0.0, 0.9, 0.0]).with_scale(0.7).with_parent(1),
    Node::capsule(3)
      .with_translation([0.6, 0.2, 0.0])
      .with_rotation([0.0, 0.0, 1.2])
      .with_scale(0.5)
      .with_parent(1),
    Node::capsule(4)
      .with_translation([-0.6, 0.2, 0.0])
      .with_rotation([0.0, 0.0, -1.2])
      .with_scale(0.5)
      .with_parent(1),
    Node::cuboid(5)
      .with_translation([0.0, -0.2, 0.6])
      .with_scale(0.4)
      .with_operation(BooleanOp::Subtract),
  ]
}

/// Field and sampled grid for a tree at a resolution.
fn sampled(nodes: &[Node], resolution: f32) -> (ScalarField, SampleGrid) {
  let snapshot = SceneSnapshot::new(nodes);
  let mut resolver = TransformResolver::new(&snapshot);
  let bounds = estimate_bounds(&mut resolver, 0.3).expect("tree has primitives");
  let field = ScalarField::from_resolver(&mut resolver, 0.3);
  let grid = SampleGrid::sample(GridSpec::from_bounds(&bounds, resolution), &field);
  (field, grid)
}

// ============================================================================
// Full pass
// ============================================================================

/// Whole pass across the typical resolution range.
fn bench_generate(c: &mut Criterion) {
  let nodes = figure();
  let mut group = c.benchmark_group("generate");
  group.sample_size(20);

  for resolution in [4.0f32, 8.0, 16.0] {
    let params = MeshParams::default().with_resolution(resolution);
    group.bench_with_input(
      BenchmarkId::from_parameter(resolution),
      &params,
      |b, params| b.iter(|| black_box(generate(black_box(&nodes), params))),
    );
  }

  group.finish();
}

/// Extraction with and without retopology.
fn bench_retopology(c: &mut Criterion) {
  let nodes = figure();
  let mut group = c.benchmark_group("retopology");
  group.sample_size(20);

  for enabled in [false, true] {
    let params = MeshParams::default().with_smart_retopology(enabled);
    group.bench_with_input(
      BenchmarkId::from_parameter(if enabled { "on" } else { "off" }),
      &params,
      |b, params| b.iter(|| black_box(generate(black_box(&nodes), params))),
    );
  }

  group.finish();
}

// ============================================================================
// Stages
// ============================================================================

fn bench_sampling(c: &mut Criterion) {
  let nodes = figure();
  let mut group = c.benchmark_group("grid_sample");

  for resolution in [8.0f32, 16.0] {
    let (field, grid) = sampled(&nodes, resolution);
    let spec = *grid.spec();
    group.throughput(Throughput::Elements(spec.sample_count() as u64));
    group.bench_with_input(BenchmarkId::from_parameter(resolution), &spec, |b, spec| {
      b.iter(|| black_box(SampleGrid::sample(*spec, &field)))
    });
  }

  group.finish();
}

/// Our extraction vs fast_surface_nets on identical samples.
fn bench_extract_comparison(c: &mut Criterion) {
  let nodes = figure();
  let mut group = c.benchmark_group("surface_nets_comparison");

  for resolution in [8.0f32, 16.0] {
    let (field, grid) = sampled(&nodes, resolution);
    let [sx, sy, sz] = grid.spec().samples();
    let shape = RuntimeShape::<u32, 3>::new([sx as u32, sy as u32, sz as u32]);
    let max = [sx as u32 - 1, sy as u32 - 1, sz as u32 - 1];

    group.bench_with_input(
      BenchmarkId::new("metaball_core", resolution),
      &resolution,
      |b, _| b.iter(|| black_box(my_surface_nets::extract(black_box(&grid), &field))),
    );

    group.bench_with_input(
      BenchmarkId::new("fast_surface_nets", resolution),
      &resolution,
      |b, _| {
        b.iter(|| {
          let mut buffer = SurfaceNetsBuffer::default();
          surface_nets(black_box(grid.values()), &shape, [0; 3], max, &mut buffer);
          black_box(buffer)
        })
      },
    );
  }

  group.finish();
}

criterion_group!(
  benches,
  bench_generate,
  bench_retopology,
  bench_sampling,
  bench_extract_comparison
);
criterion_main!(benches);
