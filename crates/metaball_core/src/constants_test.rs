use super::*;

#[test]
fn test_cells_scale_with_resolution() {
  assert_eq!(cells_for_resolution(2.0), 8);
  assert_eq!(cells_for_resolution(8.0), 32);
  assert_eq!(cells_for_resolution(8.9), 35);
}

#[test]
fn test_cells_are_clamped() {
  assert_eq!(cells_for_resolution(0.0), MIN_CELLS_PER_AXIS);
  assert_eq!(cells_for_resolution(-5.0), MIN_CELLS_PER_AXIS);
  assert_eq!(cells_for_resolution(32.0), MAX_CELLS_PER_AXIS);
  assert_eq!(cells_for_resolution(1000.0), MAX_CELLS_PER_AXIS);
}

#[test]
fn test_cells_non_finite_resolution() {
  assert_eq!(cells_for_resolution(f32::NAN), MIN_CELLS_PER_AXIS);
  assert_eq!(cells_for_resolution(f32::INFINITY), MAX_CELLS_PER_AXIS);
  assert_eq!(cells_for_resolution(f32::NEG_INFINITY), MIN_CELLS_PER_AXIS);
}

#[test]
fn test_corner_offsets_match_bit_layout() {
  for (i, offset) in CORNER_OFFSETS.iter().enumerate() {
    assert_eq!(offset[0], i & 1);
    assert_eq!(offset[1], (i >> 1) & 1);
    assert_eq!(offset[2], (i >> 2) & 1);
  }
}
