use super::*;

const SQUARE: [[f32; 3]; 4] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]];

fn assert_close(a: [f32; 3], b: [f32; 3]) {
  for axis in 0..3 {
    assert!((a[axis] - b[axis]).abs() < 1e-5, "{a:?} vs {b:?}");
  }
}

#[test]
fn test_flat_square_faces_plus_z() {
  let normals = angle_weighted(&SQUARE, &[0, 1, 2, 0, 2, 3]);
  assert_eq!(normals.len(), 4);
  for n in normals {
    assert_close(n, [0.0, 0.0, 1.0]);
  }
}

#[test]
fn test_reversed_winding_faces_minus_z() {
  for n in angle_weighted(&SQUARE, &[0, 2, 1, 0, 3, 2]) {
    assert_close(n, [0.0, 0.0, -1.0]);
  }
}

#[test]
fn test_unreferenced_and_degenerate_fall_back_to_up() {
  let mut positions = SQUARE.to_vec();
  positions.push([5.0, 5.0, 5.0]);
  assert_eq!(angle_weighted(&positions, &[0, 1, 2])[4], UP);

  // Collinear triangle.
  let line = [[0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]];
  assert!(angle_weighted(&line, &[0, 1, 2]).iter().all(|&n| n == UP));
}

#[test]
fn test_corner_angle_weights_the_average() {
  // Two faces meet at vertex 0: a right angle in the XY plane and a
  // 45 degree wedge in the XZ plane.
  let positions = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
  ];
  let normals = angle_weighted(&positions, &[0, 1, 2, 0, 3, 1]);

  // +Z with weight π/2, +Y with weight π/4.
  let expected = Vec3A::new(0.0, 0.25, 0.5).normalize().to_array();
  assert_close(normals[0], expected);
  for n in &normals {
    assert!((Vec3A::from_array(*n).length() - 1.0).abs() < 1e-5);
  }
}
