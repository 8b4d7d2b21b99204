use super::*;
use crate::field::ScalarField;
use crate::grid::{estimate_bounds, GridSpec, SampleGrid};
use crate::scene::SceneSnapshot;
use crate::surface_nets;
use crate::transform::TransformResolver;
use crate::types::Node;

/// Extracted mesh, field and grid step for a node list.
fn extract(nodes: &[Node], resolution: f32) -> (Mesh, ScalarField, f32) {
  let snapshot = SceneSnapshot::new(nodes);
  let mut resolver = TransformResolver::new(&snapshot);
  let bounds = estimate_bounds(&mut resolver, 0.3).unwrap();
  let field = ScalarField::from_resolver(&mut resolver, 0.3);
  let spec = GridSpec::from_bounds(&bounds, resolution);
  let grid = SampleGrid::sample(spec, &field);
  let mesh = surface_nets::extract(&grid, &field);
  (mesh, field, spec.average_step())
}

fn unit_sphere() -> Vec<Node> {
  vec![Node::sphere(1).with_scale(2.0)]
}

#[test]
fn test_config_defaults_and_builders() {
  let config = RefineConfig::default();
  assert_eq!(config.iterations, 10);
  assert_eq!(config.smoothing, 0.55);
  assert_eq!(config.snap_strength, 0.35);

  // Floors apply for tiny grid steps.
  assert_eq!(config.snap_radius(0.01), 0.25);
  assert_eq!(config.ring_spacing(0.0), 1e-3);
  assert!((config.snap_radius(0.1) - 0.6).abs() < 1e-6);
  assert!((config.ring_spacing(0.5) - 0.8).abs() < 1e-6);

  let config = config.with_iterations(3).with_smoothing(0.2).with_snap_strength(0.0);
  assert_eq!(config.iterations, 3);
  assert_eq!(config.smoothing, 0.2);
  assert_eq!(config.snap_strength, 0.0);
}

#[test]
fn test_refine_empty_mesh_is_noop() {
  let mut mesh = Mesh::new();
  let field = |p: Vec3| p.length() - 1.0;
  refine(&mut mesh, &field, &[], 0.1);
  assert!(mesh.is_empty());
  assert!(mesh.normals.is_empty());
}

#[test]
fn test_zero_iterations_leaves_mesh_untouched() {
  let (mut mesh, field, step) = extract(&unit_sphere(), 6.0);
  let before = mesh.clone();
  refine_with(&mut mesh, &field, &[], step, &RefineConfig::default().with_iterations(0));
  assert_eq!(mesh, before);
}

#[test]
fn test_refine_keeps_topology() {
  let (mut mesh, field, step) = extract(&unit_sphere(), 6.0);
  let indices = mesh.indices.clone();
  let edges = mesh.edges.clone();
  let count = mesh.vertex_count();

  refine(&mut mesh, &field, &[], step);

  assert_eq!(mesh.indices, indices);
  assert_eq!(mesh.edges, edges);
  assert_eq!(mesh.vertex_count(), count);
  assert_eq!(mesh.normals.len(), count);
}

#[test]
fn test_refined_vertices_lie_on_surface() {
  let (mut mesh, field, step) = extract(&unit_sphere(), 6.0);
  refine(&mut mesh, &field, &[], step);

  for p in &mesh.positions {
    let r = Vec3::from_array(*p).length();
    assert!((r - 1.0).abs() < 5e-3, "vertex at radius {r}");
  }
}

#[test]
fn test_single_iteration_displacement_bound() {
  let (mut mesh, field, step) = extract(&unit_sphere(), 6.0);
  let config = RefineConfig::default().with_iterations(1);
  let before: Vec<Vec3> = mesh.positions.iter().map(|&p| Vec3::from_array(p)).collect();
  let adjacency = build_adjacency(before.len(), &mesh.indices);

  refine_with(&mut mesh, &field, &[], step, &config);

  for (i, p) in mesh.positions.iter().enumerate() {
    let p0 = before[i];
    let neighbours = &adjacency[i];
    if neighbours.is_empty() {
      assert_eq!(Vec3::from_array(*p), p0);
      continue;
    }
    let target =
      neighbours.iter().map(|&j| before[j as usize]).sum::<Vec3>() / neighbours.len() as f32;
    let laplacian = (target - p0).length();

    // Tangential move, then a Newton step no longer than the distance to
    // the surface from the moved point.
    let tangential = config.smoothing * laplacian;
    let bound = tangential + 1.1 * (field.distance(p0).abs() + tangential) + 1e-4;
    let moved = Vec3::from_array(*p).distance(p0);
    assert!(moved <= bound, "vertex {i} moved {moved}, bound {bound}");
  }
}

#[test]
fn test_single_iteration_displacement_bound_with_bones() {
  // Bone from (0, -1, 0) up to the sphere centre, so the lower hemisphere
  // sits inside the snap radius.
  let nodes = vec![
    Node::group(1).with_translation([0.0, -1.0, 0.0]),
    Node::sphere(2)
      .with_translation([0.0, 1.0, 0.0])
      .with_scale(2.0)
      .with_parent(1),
  ];
  let (mut mesh, field, step) = extract(&nodes, 6.0);
  let mut unsnapped = mesh.clone();

  let snapshot = SceneSnapshot::new(&nodes);
  let mut resolver = TransformResolver::new(&snapshot);
  let bones = extract_bones(&mut resolver);
  assert_eq!(bones.len(), 1);
  assert!((bones[0].end - Vec3::ZERO).length() < 1e-6);

  let config = RefineConfig::default().with_iterations(1);
  let snap_radius = config.snap_radius(step);
  let ring_spacing = config.ring_spacing(step);
  let before: Vec<Vec3> = mesh.positions.iter().map(|&p| Vec3::from_array(p)).collect();
  let adjacency = build_adjacency(before.len(), &mesh.indices);

  refine_with(&mut mesh, &field, &bones, step, &config);
  refine_with(&mut unsnapped, &field, &[], step, &config);
  assert_ne!(mesh.positions, unsnapped.positions);

  let mut near_bone = 0usize;
  for (i, p) in mesh.positions.iter().enumerate() {
    let p0 = before[i];
    let neighbours = &adjacency[i];
    if neighbours.is_empty() {
      assert_eq!(Vec3::from_array(*p), p0);
      continue;
    }
    let target =
      neighbours.iter().map(|&j| before[j as usize]).sum::<Vec3>() / neighbours.len() as f32;
    let tangential = config.smoothing * (target - p0).length();

    // A snap covers a fraction of at most half a ring spacing, and never
    // more than the snap radius.
    let snap = (config.snap_strength * ring_spacing * 0.5).min(snap_radius);
    let (_, distance) = bones[0].project(p0);
    if distance <= snap_radius {
      near_bone += 1;
    }

    let pre_newton = tangential + snap;
    let bound = pre_newton + 1.1 * (field.distance(p0).abs() + pre_newton) + 1e-4;
    let moved = Vec3::from_array(*p).distance(p0);
    assert!(moved <= bound, "vertex {i} moved {moved}, bound {bound}");
  }
  assert!(near_bone > 0);
}

#[test]
fn test_refine_is_deterministic() {
  let nodes = vec![
    Node::sphere(1),
    Node::capsule(2).with_translation([0.0, 0.8, 0.0]).with_parent(1),
  ];
  let (mut a, field, step) = extract(&nodes, 6.0);
  let mut b = a.clone();

  let snapshot = SceneSnapshot::new(&nodes);
  let mut resolver = TransformResolver::new(&snapshot);
  let bones = extract_bones(&mut resolver);
  assert_eq!(bones.len(), 1);

  refine(&mut a, &field, &bones, step);
  refine(&mut b, &field, &bones, step);
  assert_eq!(a, b);
}

// =============================================================================
// Pieces
// =============================================================================

#[test]
fn test_snap_moves_toward_nearest_ring() {
  let bones = [BoneSegment::new(Vec3::ZERO, Vec3::new(0.0, 4.0, 0.0)).unwrap()];

  // t = 1.3, rings every 1.0 → target 1.0, half of the way.
  let snapped = snap_to_ring(Vec3::new(0.2, 1.3, 0.0), &bones, 1.0, 1.0, 0.5);
  assert!((snapped - Vec3::new(0.2, 1.15, 0.0)).length() < 1e-5);

  // Already on a ring.
  let snapped = snap_to_ring(Vec3::new(0.2, 2.0, 0.0), &bones, 1.0, 1.0, 0.5);
  assert_eq!(snapped, Vec3::new(0.2, 2.0, 0.0));
}

#[test]
fn test_snap_ignores_far_points_and_no_bones() {
  let bones = [BoneSegment::new(Vec3::ZERO, Vec3::Y).unwrap()];
  let far = Vec3::new(3.0, 0.3, 0.0);
  assert_eq!(snap_to_ring(far, &bones, 1.0, 0.5, 0.35), far);
  assert_eq!(snap_to_ring(far, &[], 10.0, 0.5, 0.35), far);
}

#[test]
fn test_newton_lands_on_plane() {
  let field = |p: Vec3| p.y - 0.5;
  let projected = newton_project(Vec3::new(0.3, 2.0, -1.0), &field, 0.01);
  assert!((projected - Vec3::new(0.3, 0.5, -1.0)).length() < 1e-4);
}

#[test]
fn test_newton_flat_field_stays_finite() {
  let field = |_: Vec3| 0.0;
  let p = Vec3::new(1.0, 2.0, 3.0);
  assert_eq!(newton_project(p, &field, 0.01), p);
}
