//! Quad orientation, triangulation and wireframe edges.

use glam::Vec3A;

use crate::constants::GRADIENT_EPSILON_SQ;
use crate::field::DistanceField;

/// Four vertex indices in winding order.
pub type Quad = [u32; 4];

/// Reverse the winding of a quad, keeping its first vertex.
#[inline]
pub fn reversed(quad: Quad) -> Quad {
  [quad[0], quad[3], quad[2], quad[1]]
}

#[inline]
fn corners(quad: &Quad, positions: &[[f32; 3]]) -> [Vec3A; 4] {
  quad.map(|i| Vec3A::from_array(positions[i as usize]))
}

/// Face normal implied by the quad's vertex order (cross of its diagonals).
#[inline]
pub fn face_normal(quad: &Quad, positions: &[[f32; 3]]) -> Vec3A {
  let [p0, p1, p2, p3] = corners(quad, positions);
  (p2 - p0).cross(p3 - p1)
}

#[inline]
pub fn centroid(quad: &Quad, positions: &[[f32; 3]]) -> Vec3A {
  let [p0, p1, p2, p3] = corners(quad, positions);
  (p0 + p1 + p2 + p3) * 0.25
}

/// Field gradient at `point`, or `None` where it vanishes.
#[inline]
pub fn field_gradient<F: DistanceField + ?Sized>(field: &F, point: Vec3A, h: f32) -> Option<Vec3A> {
  let gradient = Vec3A::from(field.gradient(point.into(), h));
  let len_sq = gradient.length_squared();
  if len_sq < GRADIENT_EPSILON_SQ || !len_sq.is_finite() {
    return None;
  }
  Some(gradient)
}

/// Unit field gradient at the quad centroid, or `None` where it vanishes.
pub fn outward_normal<F: DistanceField + ?Sized>(
  quad: &Quad,
  positions: &[[f32; 3]],
  field: &F,
  h: f32,
) -> Option<Vec3A> {
  field_gradient(field, centroid(quad, positions), h).map(Vec3A::normalize)
}

/// Unnormalized face normal of a triangle, following its winding.
#[inline]
pub fn triangle_normal(tri: &[u32], positions: &[[f32; 3]]) -> Vec3A {
  let p0 = Vec3A::from_array(positions[tri[0] as usize]);
  let p1 = Vec3A::from_array(positions[tri[1] as usize]);
  let p2 = Vec3A::from_array(positions[tri[2] as usize]);
  (p1 - p0).cross(p2 - p0)
}

/// Triangle centroid, summed in index order so it does not depend on winding.
#[inline]
pub fn triangle_centroid(tri: &[u32], positions: &[[f32; 3]]) -> Vec3A {
  let mut sorted = [tri[0], tri[1], tri[2]];
  sorted.sort_unstable();
  sorted
    .iter()
    .fold(Vec3A::ZERO, |acc, &i| acc + Vec3A::from_array(positions[i as usize]))
    / 3.0
}

/// Reverse each triangle whose face normal opposes the field gradient at its
/// own centroid.
///
/// Catches folded quads where neither diagonal split faces outward.
pub fn orient_triangles<F: DistanceField + ?Sized>(
  tris: &mut [u32; 6],
  positions: &[[f32; 3]],
  field: &F,
  h: f32,
) {
  for tri in tris.chunks_exact_mut(3) {
    let Some(gradient) = field_gradient(field, triangle_centroid(tri, positions), h) else {
      continue;
    };
    if triangle_normal(tri, positions).dot(gradient) < 0.0 {
      tri.swap(1, 2);
    }
  }
}

/// Flip the quad if its face normal disagrees with the outward normal.
#[inline]
pub fn orient(quad: Quad, positions: &[[f32; 3]], outward: Option<Vec3A>) -> Quad {
  match outward {
    Some(n) if face_normal(&quad, positions).dot(n) < 0.0 => reversed(quad),
    _ => quad,
  }
}

/// The two ways of cutting a quad into triangles, both keeping its winding.
#[inline]
fn split(quad: &Quad, along_02: bool) -> [u32; 6] {
  let [a, b, c, d] = *quad;
  if along_02 {
    [a, b, c, a, c, d]
  } else {
    [b, c, d, b, d, a]
  }
}

#[inline]
fn split_faces_outward(tris: &[u32; 6], positions: &[[f32; 3]], outward: Vec3A) -> bool {
  tris
    .chunks_exact(3)
    .all(|t| triangle_normal(t, positions).dot(outward) >= 0.0)
}

/// Triangulate an oriented quad.
///
/// Splits along the shorter diagonal unless that makes a triangle face
/// against the outward normal while the other diagonal does not.
pub fn triangulate(quad: &Quad, positions: &[[f32; 3]], outward: Option<Vec3A>) -> [u32; 6] {
  let [p0, p1, p2, p3] = corners(quad, positions);
  let along_02 = p0.distance_squared(p2) <= p1.distance_squared(p3);
  let preferred = split(quad, along_02);

  let Some(n) = outward else {
    return preferred;
  };
  if split_faces_outward(&preferred, positions, n) {
    return preferred;
  }
  let alternative = split(quad, !along_02);
  if split_faces_outward(&alternative, positions, n) {
    alternative
  } else {
    preferred
  }
}

/// Deduplicated undirected boundary edges of a set of quads.
///
/// Each edge is stored as `[low, high]`; the output is sorted.
pub fn wireframe_edges(quads: &[Quad]) -> Vec<[u32; 2]> {
  let mut edges: Vec<[u32; 2]> = quads
    .iter()
    .flat_map(|q| {
      [(q[0], q[1]), (q[1], q[2]), (q[2], q[3]), (q[3], q[0])]
        .map(|(a, b)| if a < b { [a, b] } else { [b, a] })
    })
    .collect();
  edges.sort_unstable();
  edges.dedup();
  edges
}

#[cfg(test)]
#[path = "quads_test.rs"]
mod quads_test;
