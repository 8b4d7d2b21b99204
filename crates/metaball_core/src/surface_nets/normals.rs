//! Per-vertex normals from the triangle list.

use glam::Vec3A;

use crate::constants::UP;

/// Unit normal per vertex: the sum of incident face normals, each weighted by
/// the triangle's corner angle at that vertex.
///
/// Degenerate triangles add nothing. Vertices left without a direction get
/// [`UP`].
pub fn angle_weighted(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
  let mut sums = vec![Vec3A::ZERO; positions.len()];

  for tri in indices.chunks_exact(3) {
    let corners = [tri[0], tri[1], tri[2]].map(|i| Vec3A::from_array(positions[i as usize]));
    let Some(face) = (corners[1] - corners[0])
      .cross(corners[2] - corners[0])
      .try_normalize()
    else {
      continue;
    };

    for (k, &vertex) in tri.iter().enumerate() {
      let here = corners[k];
      let angle = (corners[(k + 1) % 3] - here).angle_between(corners[(k + 2) % 3] - here);
      sums[vertex as usize] += face * angle;
    }
  }

  sums
    .into_iter()
    .map(|n| n.try_normalize().map_or(UP, |n| n.to_array()))
    .collect()
}

#[cfg(test)]
#[path = "normals_test.rs"]
mod normals_test;
